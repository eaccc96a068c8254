//! A spinning checkered cube with black edges, using a depth buffer.

use std::time::Duration;

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Vector3};
use glow::HasContext;

use crate::error::Error;
use crate::glsl;
use crate::resources::{
    create_buffer, create_vertex_array, set_matrix, uniform_location, VertexAttribute,
};
use crate::shaders::compile_program;
use crate::types::{stride_of, CUBE_STRIDE_FLOATS, CUBE_VERTEX_COUNT, CUBE_VERTICES};
use crate::window::Demo;

/// Rotation speed in degrees per second.
pub const DEGREES_PER_SECOND: f32 = 50.0;

/// Fill color of the cube faces.
const FACE_COLOR: [f32; 3] = [0.1, 0.8, 0.9];

/// Model matrix after `elapsed` time: a rotation about `(0.5, 1, 0)`.
#[must_use]
pub fn cube_model(elapsed: Duration) -> Matrix4<f32> {
    let axis = Vector3::new(0.5, 1.0, 0.0).normalize();
    Matrix4::from_axis_angle(axis, Deg(elapsed.as_secs_f32() * DEGREES_PER_SECOND))
}

/// View matrix: the camera sits `distance` units in front of the cube.
#[must_use]
pub fn cube_view(distance: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, 0.0, -distance))
}

/// 45° perspective projection for a `[width, height]` framebuffer.
#[must_use]
pub fn cube_projection([width, height]: [u32; 2]) -> Matrix4<f32> {
    #[expect(clippy::cast_precision_loss)]
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    perspective(Deg(45.0), aspect, 0.1, 100.0)
}

/// The cube program, its geometry and uniforms. Shared with the depth
/// tutorial.
pub struct CubeRenderer {
    program: glow::Program,
    vbo: glow::Buffer,
    vao: glow::VertexArray,
    color: glow::UniformLocation,
    model: glow::UniformLocation,
    view: glow::UniformLocation,
}

impl CubeRenderer {
    /// Build the program and upload the cube. The projection is fixed for
    /// `framebuffer_size`.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES context.
    ///
    /// # Errors
    ///
    /// [`Error::Shader`] or [`Error::Gl`].
    pub unsafe fn new(gl: &glow::Context, framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let program = compile_program(gl, glsl::CUBE_VERTEX_SRC, glsl::CUBE_FRAGMENT_SRC)?;
            let vbo = create_buffer(gl, glow::ARRAY_BUFFER, &CUBE_VERTICES, glow::STATIC_DRAW)?;
            let vao = create_vertex_array(
                gl,
                program,
                vbo,
                stride_of::<[f32; CUBE_STRIDE_FLOATS]>(),
                &[VertexAttribute::new("aPos", 3, 0)],
            )?;

            let color = uniform_location(gl, program, "uColor")?;
            let model = uniform_location(gl, program, "model")?;
            let view = uniform_location(gl, program, "view")?;
            let projection = uniform_location(gl, program, "projection")?;

            gl.use_program(Some(program));
            set_matrix(gl, &projection, &cube_projection(framebuffer_size));
            gl.use_program(None);

            Ok(Self {
                program,
                vbo,
                vao,
                color,
                model,
                view,
            })
        }
    }

    /// Draw the filled cube, then its edges in black, into the bound
    /// framebuffer.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES context.
    pub unsafe fn draw(&self, gl: &glow::Context, elapsed: Duration, view_distance: f32) {
        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));

            set_matrix(gl, &self.model, &cube_model(elapsed));
            set_matrix(gl, &self.view, &cube_view(view_distance));

            let [r, g, b] = FACE_COLOR;
            gl.uniform_3_f32(Some(&self.color), r, g, b);
            gl.draw_arrays(glow::TRIANGLES, 0, CUBE_VERTEX_COUNT);

            gl.uniform_3_f32(Some(&self.color), 0.0, 0.0, 0.0);
            gl.draw_arrays(glow::LINES, 0, CUBE_VERTEX_COUNT);

            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    /// Delete the program and buffers.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES context.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.program);
        }
    }
}

/// Spinning cube tutorial.
pub struct SpinningCube {
    cube: CubeRenderer,
}

impl SpinningCube {
    /// Camera distance.
    pub const VIEW_DISTANCE: f32 = 3.0;
}

impl Demo for SpinningCube {
    unsafe fn new(gl: &glow::Context, framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        let cube = unsafe { CubeRenderer::new(gl, framebuffer_size) }?;
        unsafe { gl.enable(glow::DEPTH_TEST) };
        Ok(Self { cube })
    }

    unsafe fn render(&mut self, gl: &glow::Context, elapsed: Duration) {
        unsafe {
            super::clear(gl, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.cube.draw(gl, elapsed, Self::VIEW_DISTANCE);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { self.cube.destroy(gl) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn assert_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn model_starts_unrotated() {
        assert_close(cube_model(Duration::ZERO), Matrix4::identity());
    }

    #[test]
    fn model_keeps_the_rotation_axis_fixed() {
        let axis = Vector3::new(0.5, 1.0, 0.0).normalize();
        let rotated = cube_model(Duration::from_millis(1700)) * axis.extend(0.0);
        assert!((rotated - axis.extend(0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn full_turn_takes_seven_point_two_seconds() {
        assert_close(
            cube_model(Duration::from_secs_f32(360.0 / DEGREES_PER_SECOND)),
            Matrix4::identity(),
        );
    }

    #[test]
    fn view_moves_the_cube_away_from_the_camera() {
        let origin = cube_view(SpinningCube::VIEW_DISTANCE) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vector4::new(0.0, 0.0, -3.0, 1.0));
    }

    #[test]
    fn projection_survives_a_zero_height_framebuffer() {
        let projection = cube_projection([1024, 0]);
        let values: &[f32; 16] = projection.as_ref();
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
