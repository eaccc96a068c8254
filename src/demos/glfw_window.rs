//! An empty window: the smallest program that gets a GLES context on screen.

use std::time::Duration;

use crate::error::Error;
use crate::window::Demo;

/// Does nothing but keep the window open.
#[derive(Debug, Default)]
pub struct EmptyWindow;

impl Demo for EmptyWindow {
    unsafe fn new(_gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        Ok(Self)
    }

    unsafe fn render(&mut self, _gl: &glow::Context, _elapsed: Duration) {}

    unsafe fn destroy(&self, _gl: &glow::Context) {}
}
