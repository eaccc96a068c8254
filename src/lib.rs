//! Small, single-purpose OpenGL ES 3.x programs on top of EGL, using [glow]
//! for GL calls and [glutin]/[winit] for contexts and windows.
//!
//! Every binary in `src/bin` is one tutorial step: an empty window, a
//! head-less triangle saved as a PPM image, textures, transforms, a 3D cube,
//! framebuffer objects, depth textures, a shader-side wireframe and three
//! compute shader programs. The pieces they share live in this library.
//!
//! # Building blocks
//!
//! - **Shader programs**: [`shaders::ProgramBuilder`] compiles and links a
//!   vertex+fragment or compute-only program, reports the driver's info log
//!   on failure and never leaks shader objects.
//! - **Head-less contexts**: [`context::HeadlessContext`] creates a GLES
//!   context on an EGL device, either on a pbuffer or surfaceless.
//! - **Windows**: [`window::run`] opens a window and drives a
//!   [`window::Demo`] until it is closed.
//! - **Errors**: every failure is an [`Error`]; [`report`] logs it and maps it
//!   to a distinct process exit code.
//!
//! # Logging
//!
//! Binaries call [`init_logging`] first. The filter comes from `RUST_LOG` and
//! defaults to `info`. GL debug messages are logged at `debug` (or `warn` for
//! high severity) when the context has the debug flag.
//!
//! # Safety
//!
//! Everything that issues GL calls is `unsafe` and requires the matching
//! context to be current on the calling thread.
//!
//! [glow]: https://docs.rs/glow
//! [glutin]: https://docs.rs/glutin
//! [winit]: https://docs.rs/winit

pub mod context;
pub mod demos;
mod error;
pub mod glsl;
pub mod ppm;
pub mod resources;
pub mod shaders;
pub mod types;
pub mod window;

pub use error::{report, Error};

/// Initialize `env_logger` with an `info` default filter.
///
/// Safe to call more than once; later calls only print a warning.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(err) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Warning: could not initialize logger: {err}");
    }
}
