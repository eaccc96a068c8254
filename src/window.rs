//! Windowed tutorials: a winit window with an EGL-backed GLES context, and
//! the render loop that drives a [`Demo`].
//!
//! The window and context are created on the first `resumed` event, as winit
//! requires. Each redraw lets the demo render one frame, swaps buffers and
//! immediately asks for the next redraw, so the loop runs as fast as the swap
//! interval allows.

use std::ffi::CStr;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use glutin::config::{Api, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{ApiPreference, DisplayBuilder, GlWindow};
use glow::HasContext;
use log::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowId};

use crate::context::install_debug_output;
use crate::error::Error;
use crate::resources::gl_size;

/// Window and context parameters for one tutorial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Requested inner width in logical pixels.
    pub width: u32,
    /// Requested inner height in logical pixels.
    pub height: u32,
    /// Requested GLES version `(major, minor)`.
    pub gles_version: (u8, u8),
    /// Create a debug context and log `KHR_debug` messages.
    pub debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "GLDEMO".to_owned(),
            width: 1024,
            height: 600,
            gles_version: (3, 0),
            debug: false,
        }
    }
}

impl WindowConfig {
    /// The default window with a GLES 3.1 context, needed for compute
    /// shaders.
    #[must_use]
    pub fn gles31() -> Self {
        Self {
            gles_version: (3, 1),
            ..Self::default()
        }
    }

    /// Enable or disable the debug context.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// One windowed tutorial.
///
/// All GL objects are created in [`new`](Demo::new) and released in
/// [`destroy`](Demo::destroy), both with the context current.
pub trait Demo: Sized {
    /// Window and context parameters.
    fn config() -> WindowConfig {
        WindowConfig::default()
    }

    /// Create the tutorial's GL objects.
    ///
    /// `framebuffer_size` is the window's drawable size in physical pixels;
    /// the viewport has already been set to it.
    ///
    /// # Safety
    ///
    /// Requires the window's GL context to be current.
    ///
    /// # Errors
    ///
    /// Any failure aborts the program with that error's exit code.
    unsafe fn new(gl: &glow::Context, framebuffer_size: [u32; 2]) -> Result<Self, Error>;

    /// Render one frame. `elapsed` is the time since the window opened.
    ///
    /// # Safety
    ///
    /// Requires the window's GL context to be current.
    unsafe fn render(&mut self, gl: &glow::Context, elapsed: Duration);

    /// A key was pressed (repeats are filtered out).
    fn key_pressed(&mut self, _key: &Key) {}

    /// Delete the tutorial's GL objects.
    ///
    /// # Safety
    ///
    /// Requires the window's GL context to be current. Called exactly once.
    unsafe fn destroy(&self, gl: &glow::Context);
}

/// Open a window, run `D` until the window is closed, then clean up.
///
/// # Errors
///
/// [`Error::Window`] if the event loop or window cannot be created,
/// [`Error::Context`] for EGL failures, and whatever [`Demo::new`] returns.
pub fn run<D: Demo>() -> Result<(), Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::<D>::new(D::config());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Everything that exists once the window is up.
struct Running<D> {
    demo: D,
    gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

struct App<D> {
    config: WindowConfig,
    running: Option<Running<D>>,
    started: Instant,
    error: Option<Error>,
}

impl<D: Demo> App<D> {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            running: None,
            started: Instant::now(),
            error: None,
        }
    }

    /// Create the window, its GLES context and the demo.
    fn create(&self, event_loop: &ActiveEventLoop) -> Result<Running<D>, Error> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let template = ConfigTemplateBuilder::new()
            .with_api(Api::GLES3)
            .with_depth_size(24);
        let display_builder = DisplayBuilder::new()
            .with_preference(ApiPreference::PreferEgl)
            .with_window_attributes(Some(window_attributes));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                // glutin only calls the picker with at least one config.
                configs
                    .reduce(|best, config| {
                        if config.depth_size() > best.depth_size() {
                            config
                        } else {
                            best
                        }
                    })
                    .expect("config picker called without configs")
            })
            .map_err(|err| Error::Window(err.to_string()))?;
        let window = window.ok_or_else(|| Error::Window("window was not created".into()))?;

        let gl_display = gl_config.display();
        let raw_window_handle = window
            .window_handle()
            .map_err(|err| Error::Window(err.to_string()))?
            .as_raw();
        let (major, minor) = self.config.gles_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_debug(self.config.debug)
            .with_context_api(ContextApi::Gles(Some(Version::new(major, minor))))
            .build(Some(raw_window_handle));
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .map_err(|err| Error::Window(err.to_string()))?;
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }?;
        let gl_context = not_current.make_current(&gl_surface)?;

        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|name: &CStr| {
                gl_display.get_proc_address(name)
            })
        };
        if self.config.debug {
            unsafe { install_debug_output(&mut gl) };
        }

        let size = window.inner_size();
        info!(
            "window {}x{} (physical), {}",
            size.width,
            size.height,
            gl_display.version_string()
        );

        unsafe { gl.viewport(0, 0, gl_size(size.width), gl_size(size.height)) };
        let demo = unsafe { D::new(&gl, [size.width, size.height]) }?;

        Ok(Running {
            demo,
            gl,
            gl_surface,
            gl_context,
            window,
        })
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            unsafe { running.demo.destroy(&running.gl) };
        }
        event_loop.exit();
    }
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        match self.create(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
                self.started = Instant::now();
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    running.gl_surface.resize(&running.gl_context, width, height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => running.demo.key_pressed(&logical_key),
            WindowEvent::RedrawRequested => {
                unsafe { running.demo.render(&running.gl, self.started.elapsed()) };
                if let Err(err) = running.gl_surface.swap_buffers(&running.gl_context) {
                    error!("failed to swap buffers: {err}");
                }
                running.window.request_redraw();
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            unsafe { running.demo.destroy(&running.gl) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_classic_demo_window() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (1024, 600));
        assert_eq!(config.title, "GLDEMO");
        assert_eq!(config.gles_version, (3, 0));
    }

    #[test]
    fn compute_config_asks_for_gles_31() {
        let config = WindowConfig::gles31().with_debug(true);
        assert_eq!(config.gles_version, (3, 1));
        assert!(config.debug);
        assert_eq!(config.title, WindowConfig::default().title);
    }
}
