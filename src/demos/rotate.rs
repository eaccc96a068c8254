//! A triangle rotated by a fixed transform, with a pulsing red channel.

use std::time::Duration;

use cgmath::{Deg, Matrix4};
use glow::HasContext;

use crate::error::Error;
use crate::glsl;
use crate::resources::{
    create_buffer, create_vertex_array, set_matrix, uniform_location, VertexAttribute,
};
use crate::shaders::compile_program;
use crate::types::{stride_of, PosVertex, TRIANGLE};
use crate::window::Demo;

/// A value that climbs by [`ColorRamp::STEP`] per frame and drops back to
/// zero once it passes `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorRamp {
    value: f32,
}

impl ColorRamp {
    /// Increment per frame.
    pub const STEP: f32 = 0.01;

    /// Step the ramp and return the value to use this frame.
    ///
    /// The frame that crosses `1.0` still sees the crossing value; the reset
    /// is visible from the next frame on.
    pub fn advance(&mut self) -> f32 {
        self.value += Self::STEP;
        let current = self.value;
        if self.value > 1.0 {
            self.value = 0.0;
        }
        current
    }
}

/// The transform applied to the triangle: 90° about Z.
#[must_use]
pub fn triangle_transform() -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(90.0))
}

/// Rotated triangle tutorial.
pub struct RotatedTriangle {
    program: glow::Program,
    vbo: glow::Buffer,
    vao: glow::VertexArray,
    color: glow::UniformLocation,
    ramp: ColorRamp,
}

impl Demo for RotatedTriangle {
    unsafe fn new(gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let program =
                compile_program(gl, glsl::TRANSFORM_VERTEX_SRC, glsl::COLOR_FRAGMENT_SRC)?;
            let vbo = create_buffer(gl, glow::ARRAY_BUFFER, &TRIANGLE, glow::STATIC_DRAW)?;
            let vao = create_vertex_array(
                gl,
                program,
                vbo,
                stride_of::<PosVertex>(),
                &[VertexAttribute::new("aPos", 2, 0)],
            )?;
            let color = uniform_location(gl, program, "uColor")?;
            let transform = uniform_location(gl, program, "transform")?;

            gl.use_program(Some(program));
            set_matrix(gl, &transform, &triangle_transform());
            gl.use_program(None);

            Ok(Self {
                program,
                vbo,
                vao,
                color,
                ramp: ColorRamp::default(),
            })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        let red = self.ramp.advance();
        unsafe {
            super::clear(gl, glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(self.program));
            gl.uniform_3_f32(Some(&self.color), red, 0.1, 0.1);
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn ramp_starts_at_one_step() {
        let mut ramp = ColorRamp::default();
        assert!((ramp.advance() - ColorRamp::STEP).abs() < f32::EPSILON);
    }

    #[test]
    fn ramp_wraps_after_passing_one() {
        let mut ramp = ColorRamp::default();
        let mut last = 0.0;
        let mut frames = 0;
        while last <= 1.0 {
            last = ramp.advance();
            frames += 1;
            assert!(frames <= 102, "ramp never passed 1.0");
        }
        assert!(last < 1.0 + 2.0 * ColorRamp::STEP);
        assert!((ramp.advance() - ColorRamp::STEP).abs() < f32::EPSILON);
    }

    #[test]
    fn transform_turns_x_into_y() {
        let rotated = triangle_transform() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((rotated - Vector4::new(0.0, 1.0, 0.0, 1.0)).magnitude() < 1e-6);
    }
}
