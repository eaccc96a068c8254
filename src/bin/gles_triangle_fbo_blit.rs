//! Render into a framebuffer object and blit it into the window.

use std::process::ExitCode;

use gles_tutorials::demos::fbo_blit::FboBlit;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<FboBlit>())
}
