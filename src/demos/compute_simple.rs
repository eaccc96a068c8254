//! A compute shader writes the triangle's vertices straight into a vertex
//! buffer, which is then drawn every frame.

use std::time::Duration;

use cgmath::{Matrix4, SquareMatrix};
use glow::HasContext;

use crate::error::Error;
use crate::glsl;
use crate::resources::{
    create_buffer, create_empty_buffer, create_vertex_array, set_matrix, uniform_location,
    VertexAttribute,
};
use crate::shaders::{compile_compute_program, compile_program};
use crate::types::stride_of;
use crate::window::{Demo, WindowConfig};

/// Triangle fill color.
const TRIANGLE_COLOR: [f32; 3] = [1.0, 0.1, 0.1];

/// Three `vec4` vertices: `xy` is the position, `zw` is free for the compute
/// shader.
pub type ComputeVertices = [[f32; 4]; 3];

/// A vertex buffer shared between a compute program (as storage buffer
/// binding 0) and a draw program (as `aPos`).
pub struct ComputedTriangle {
    compute_program: glow::Program,
    draw_program: glow::Program,
    vbo: glow::Buffer,
    vao: glow::VertexArray,
    color: glow::UniformLocation,
}

impl ComputedTriangle {
    /// Build both programs and the shared buffer.
    ///
    /// Without `initial` the buffer is left undefined for the compute shader
    /// to fill.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES 3.1 context.
    ///
    /// # Errors
    ///
    /// [`Error::Shader`] or [`Error::Gl`].
    pub unsafe fn new(
        gl: &glow::Context,
        compute_src: &str,
        initial: Option<&ComputeVertices>,
    ) -> Result<Self, Error> {
        unsafe {
            let compute_program = compile_compute_program(gl, compute_src)?;
            let draw_program =
                compile_program(gl, glsl::COMPUTE_DRAW_VERTEX_SRC, glsl::COLOR_FRAGMENT_SRC)?;

            let vbo = match initial {
                Some(vertices) => {
                    create_buffer(gl, glow::ARRAY_BUFFER, vertices, glow::DYNAMIC_DRAW)?
                }
                None => create_empty_buffer(
                    gl,
                    glow::ARRAY_BUFFER,
                    stride_of::<ComputeVertices>(),
                    glow::DYNAMIC_DRAW,
                )?,
            };
            let vao = create_vertex_array(
                gl,
                draw_program,
                vbo,
                stride_of::<[f32; 4]>(),
                &[VertexAttribute::new("aPos", 4, 0)],
            )?;

            let color = uniform_location(gl, draw_program, "uColor")?;
            let transform = uniform_location(gl, draw_program, "transform")?;
            gl.use_program(Some(draw_program));
            set_matrix(gl, &transform, &Matrix4::identity());
            gl.use_program(None);

            Ok(Self {
                compute_program,
                draw_program,
                vbo,
                vao,
                color,
            })
        }
    }

    /// Run the compute program over the buffer with `groups` work groups.
    ///
    /// The buffer is bound to every index in `bindings`. A barrier makes the
    /// writes visible to the following vertex fetches.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES 3.1 context.
    pub unsafe fn dispatch(&self, gl: &glow::Context, groups: u32, bindings: &[u32]) {
        unsafe {
            gl.use_program(Some(self.compute_program));
            for &index in bindings {
                gl.bind_buffer_base(glow::SHADER_STORAGE_BUFFER, index, Some(self.vbo));
            }
            gl.dispatch_compute(groups, 1, 1);
            for &index in bindings {
                gl.bind_buffer_base(glow::SHADER_STORAGE_BUFFER, index, None);
            }
            gl.use_program(None);
            gl.memory_barrier(glow::VERTEX_ATTRIB_ARRAY_BARRIER_BIT);
        }
    }

    /// Clear the window and draw the triangle.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES 3.1 context.
    pub unsafe fn draw(&self, gl: &glow::Context) {
        unsafe {
            super::clear(gl, glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(self.draw_program));
            let [r, g, b] = TRIANGLE_COLOR;
            gl.uniform_3_f32(Some(&self.color), r, g, b);
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    /// Delete both programs and the buffer.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL ES context.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.draw_program);
            gl.delete_program(self.compute_program);
        }
    }
}

/// Compute-generated triangle tutorial.
pub struct ComputeSimple {
    triangle: ComputedTriangle,
}

impl Demo for ComputeSimple {
    fn config() -> WindowConfig {
        WindowConfig::gles31()
    }

    unsafe fn new(gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let triangle = ComputedTriangle::new(gl, glsl::COMPUTE_SIMPLE_SRC, None)?;
            // One invocation per vertex, once.
            triangle.dispatch(gl, 3, &[0]);
            Ok(Self { triangle })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        unsafe { self.triangle.draw(gl) };
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { self.triangle.destroy(gl) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_buffer_is_three_vec4() {
        assert_eq!(stride_of::<ComputeVertices>(), 48);
    }
}
