//! Crate-wide error type and the process exit codes derived from it.
//!
//! Every failure is fatal for a tutorial program: the binary logs the error
//! and exits with the code returned by [`Error::exit_code`]. Each failure site
//! has its own negative code so a script driving the programs can tell them
//! apart.

use std::fmt;
use std::process::ExitCode;

use crate::shaders::ShaderError;

/// Everything that can stop a tutorial program.
#[derive(Debug)]
pub enum Error {
    /// EGL display, config, context or surface creation failed.
    Context(String),
    /// The event loop or the window could not be created.
    Window(String),
    /// A shader failed to compile or a program failed to link.
    Shader(ShaderError),
    /// A GL object could not be created, or a named attribute/uniform is
    /// missing from a linked program.
    Gl(String),
    /// `glCheckFramebufferStatus` reported something other than
    /// `FRAMEBUFFER_COMPLETE`. Carries the raw status.
    FramebufferIncomplete(u32),
    /// Decoding or encoding an image failed.
    Image(image::ImageError),
    /// Reading or writing a file failed.
    Io(std::io::Error),
}

impl Error {
    /// The process exit code for this failure site.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Context(_) => -1,
            Self::Window(_) => -2,
            Self::Shader(_) => -3,
            Self::Gl(_) => -4,
            Self::FramebufferIncomplete(_) => -5,
            Self::Image(_) => -6,
            Self::Io(_) => -7,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(msg) => write!(f, "EGL context error: {msg}"),
            Self::Window(msg) => write!(f, "window error: {msg}"),
            Self::Shader(err) => write!(f, "{err}"),
            Self::Gl(msg) => write!(f, "GL error: {msg}"),
            Self::FramebufferIncomplete(status) => {
                write!(f, "framebuffer is not complete (0x{status:x})")
            }
            Self::Image(err) => write!(f, "image error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shader(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for Error {
    fn from(err: ShaderError) -> Self {
        Self::Shader(err)
    }
}

impl From<glutin::error::Error> for Error {
    fn from(err: glutin::error::Error) -> Self {
        Self::Context(err.to_string())
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(err: winit::error::EventLoopError) -> Self {
        Self::Window(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        // Negative codes wrap the same way a C `return -1` does.
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        ExitCode::from(err.exit_code() as u8)
    }
}

/// Log `result` and turn it into the process exit code.
///
/// This is what every binary's `main` returns.
pub fn report(result: Result<(), Error>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::ShaderStage;

    #[test]
    fn every_failure_site_has_its_own_code() {
        let errors = [
            Error::Context(String::new()),
            Error::Window(String::new()),
            Error::Shader(ShaderError::Link { log: "x".into() }),
            Error::Gl(String::new()),
            Error::FramebufferIncomplete(0),
            Error::Image(image::ImageError::IoError(std::io::Error::other("x"))),
            Error::Io(std::io::Error::other("x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|code| *code < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn shader_errors_exit_with_minus_three() {
        let err: Error = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "0:3: error".into(),
        }
        .into();
        assert_eq!(err.exit_code(), -3);
        assert!(err.to_string().starts_with("Vertex shader error:"));
    }

    #[test]
    fn framebuffer_status_is_printed_in_hex() {
        let err = Error::FramebufferIncomplete(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
        assert_eq!(err.to_string(), "framebuffer is not complete (0x8cd6)");
    }
}
