//! Wireframe drawing from barycentric weights, toggled with the `W` key.

use std::fmt;
use std::time::Duration;

use glow::HasContext;
use log::info;
use winit::keyboard::Key;

use crate::error::Error;
use crate::glsl;
use crate::resources::{create_empty_vertex_array, uniform_location};
use crate::shaders::compile_program;
use crate::window::Demo;

/// What the fragment shader draws. The discriminant is the
/// `wireframeToggle` uniform value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(i32)]
pub enum WireframeMode {
    /// Solid triangles.
    #[default]
    Fill = 0,
    /// Solid triangles with white edges.
    EdgesAndFill = 1,
    /// White edges only.
    EdgesOnly = 2,
}

impl WireframeMode {
    /// The next mode, wrapping around after [`EdgesOnly`](Self::EdgesOnly).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Fill => Self::EdgesAndFill,
            Self::EdgesAndFill => Self::EdgesOnly,
            Self::EdgesOnly => Self::Fill,
        }
    }

    /// Value for the `wireframeToggle` uniform.
    #[must_use]
    pub const fn uniform_value(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for WireframeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uniform_value())
    }
}

/// Whether `key` switches the wireframe mode.
#[must_use]
pub fn is_toggle_key(key: &Key) -> bool {
    matches!(key, Key::Character(text) if text.eq_ignore_ascii_case("w"))
}

/// Wireframe tutorial.
pub struct Wireframe {
    program: glow::Program,
    vao: glow::VertexArray,
    toggle: glow::UniformLocation,
    mode: WireframeMode,
}

impl Demo for Wireframe {
    unsafe fn new(gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let program =
                compile_program(gl, glsl::WIREFRAME_VERTEX_SRC, glsl::WIREFRAME_FRAGMENT_SRC)?;
            let vao = create_empty_vertex_array(gl)?;
            let toggle = uniform_location(gl, program, "wireframeToggle")?;

            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            info!("Press 'W' to switch wireframe mode.");
            Ok(Self {
                program,
                vao,
                toggle,
                mode: WireframeMode::default(),
            })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        unsafe {
            super::clear(gl, glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(self.program));
            gl.uniform_1_i32(Some(&self.toggle), self.mode.uniform_value());
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 6);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    fn key_pressed(&mut self, key: &Key) {
        if is_toggle_key(key) {
            self.mode = self.mode.next();
            info!("Wireframe Mode: {}", self.mode);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NamedKey;

    #[test]
    fn modes_cycle_through_all_three() {
        let mut mode = WireframeMode::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode.uniform_value());
            mode = mode.next();
        }
        assert_eq!(seen, [0, 1, 2, 0]);
    }

    #[test]
    fn mode_prints_as_its_uniform_value() {
        assert_eq!(WireframeMode::EdgesOnly.to_string(), "2");
    }

    #[test]
    fn only_w_toggles() {
        assert!(is_toggle_key(&Key::Character("w".into())));
        assert!(is_toggle_key(&Key::Character("W".into())));
        assert!(!is_toggle_key(&Key::Character("q".into())));
        assert!(!is_toggle_key(&Key::Named(NamedKey::Space)));
    }
}
