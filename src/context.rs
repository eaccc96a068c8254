//! Head-less EGL contexts for tutorials that never open a window.
//!
//! The display comes from the first EGL device that can be initialized, the
//! context is a GLES context with the debug flag, and it is made current
//! either on an in-memory pbuffer surface or without any surface at all
//! (compute-only work).

use std::ffi::CStr;
use std::num::NonZeroU32;

use glutin::api::egl::context::PossiblyCurrentContext;
use glutin::api::egl::device::Device;
use glutin::api::egl::display::Display;
use glutin::api::egl::surface::Surface;
use glutin::config::{Api, ColorBufferType, ConfigSurfaceTypes, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::prelude::*;
use glutin::surface::{PbufferSurface, SurfaceAttributesBuilder};
use glow::HasContext;
use log::{debug, info, warn};

use crate::error::Error;

/// What the head-less context renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadlessSurface {
    /// A memory-backed pbuffer; its color buffer is the default framebuffer.
    Pbuffer {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// No default framebuffer. Requires `EGL_KHR_surfaceless_context`.
    Surfaceless,
}

/// A current GLES context without a window.
///
/// Dropping it releases the context and terminates the EGL display.
pub struct HeadlessContext {
    // Field order is drop order: GL function table, then context, surface,
    // and finally the display.
    gl: glow::Context,
    _context: PossiblyCurrentContext,
    _surface: Option<Surface<PbufferSurface>>,
    _display: Display,
}

impl HeadlessContext {
    /// Create a GLES `major.minor` context and make it current.
    ///
    /// # Errors
    ///
    /// [`Error::Context`] if no EGL device can be initialized, no config
    /// matches, or context/surface creation fails.
    pub fn new(surface: HeadlessSurface, (major, minor): (u8, u8)) -> Result<Self, Error> {
        let display = open_display()?;
        info!("{}", display.version_string());

        let surface_types = match surface {
            HeadlessSurface::Pbuffer { .. } => ConfigSurfaceTypes::PBUFFER,
            HeadlessSurface::Surfaceless => ConfigSurfaceTypes::empty(),
        };
        let template = ConfigTemplateBuilder::new()
            .with_buffer_type(ColorBufferType::Rgb {
                r_size: 8,
                g_size: 8,
                b_size: 8,
            })
            .with_api(Api::GLES3)
            .with_surface_type(surface_types)
            .build();

        // Take the first config matching the template.
        let config = unsafe { display.find_configs(template) }?
            .next()
            .ok_or_else(|| Error::Context("couldn't get an EGL visual config".into()))?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_debug(true)
            .with_context_api(ContextApi::Gles(Some(Version::new(major, minor))))
            .build(None);
        let not_current = unsafe { display.create_context(&config, &context_attributes) }?;

        let (context, surface) = match surface {
            HeadlessSurface::Pbuffer { width, height } => {
                let size = |v: u32| {
                    NonZeroU32::new(v)
                        .ok_or_else(|| Error::Context("pbuffer size must be non-zero".into()))
                };
                let attributes = SurfaceAttributesBuilder::<PbufferSurface>::new()
                    .build(size(width)?, size(height)?);
                let pbuffer = unsafe { display.create_pbuffer_surface(&config, &attributes) }?;
                let context = not_current.make_current(&pbuffer)?;
                (context, Some(pbuffer))
            }
            HeadlessSurface::Surfaceless => (not_current.make_current_surfaceless()?, None),
        };

        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|name: &CStr| display.get_proc_address(name))
        };
        unsafe { install_debug_output(&mut gl) };

        Ok(Self {
            gl,
            _context: context,
            _surface: surface,
            _display: display,
        })
    }

    /// The GL function table of the current context.
    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

/// Initialize the first EGL device that accepts a display.
fn open_display() -> Result<Display, Error> {
    let devices = Device::query_devices()?;
    let mut last_error = None;
    for device in devices {
        debug!("trying EGL device {:?}", device.name());
        match unsafe { Display::with_device(&device, None) } {
            Ok(display) => return Ok(display),
            Err(err) => last_error = Some(err),
        }
    }
    Err(match last_error {
        Some(err) => err.into(),
        None => Error::Context("no EGL device found".into()),
    })
}

/// Route `KHR_debug` messages to the `log` crate, synchronously.
///
/// Does nothing when the context was not created with debug support.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
pub unsafe fn install_debug_output(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        debug!("GL debug output not supported by this context");
        return;
    }
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|_source, _ty, _id, severity, message| {
            if severity == glow::DEBUG_SEVERITY_HIGH {
                warn!("-> {message}");
            } else {
                debug!("-> {message}");
            }
        });
    }
}
