//! Render a triangle into a texture-backed framebuffer and blit the result
//! into the window, inset by [`BLIT_INSET`] pixels on every side.

use std::time::Duration;

use glow::HasContext;

use crate::error::Error;
use crate::glsl;
use crate::resources::{
    check_framebuffer, create_buffer, create_texture_2d, create_vertex_array, gl_size,
    uniform_location, TextureFormat, VertexAttribute,
};
use crate::shaders::compile_program;
use crate::types::{stride_of, PosTexVertex, TEXTURED_TRIANGLE};
use crate::window::Demo;

/// Distance in pixels between the window edge and the blitted image.
pub const BLIT_INSET: i32 = 200;

const TRIANGLE_COLOR: [f32; 3] = [1.0, 0.5, 1.0];
const TEXTURE_UNIT: u32 = 1;

/// Destination rectangle `[x0, y0, x1, y1]` of the blit for a
/// `[width, height]` window.
///
/// Collapses to an empty rectangle when the window is smaller than twice the
/// inset.
#[must_use]
pub fn blit_target([width, height]: [u32; 2]) -> [i32; 4] {
    let x1 = (gl_size(width) - BLIT_INSET).max(BLIT_INSET);
    let y1 = (gl_size(height) - BLIT_INSET).max(BLIT_INSET);
    [BLIT_INSET, BLIT_INSET, x1, y1]
}

/// Framebuffer blit tutorial.
pub struct FboBlit {
    program: glow::Program,
    vbo: glow::Buffer,
    vao: glow::VertexArray,
    target_texture: glow::Texture,
    fbo: glow::Framebuffer,
    color: glow::UniformLocation,
    use_texture: glow::UniformLocation,
    size: [u32; 2],
}

impl Demo for FboBlit {
    unsafe fn new(gl: &glow::Context, framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let program =
                compile_program(gl, glsl::TEXTURED_VERTEX_SRC, glsl::SWITCHED_FRAGMENT_SRC)?;

            // Storage only; the triangle pass fills it.
            let target_texture = create_texture_2d(
                gl,
                framebuffer_size,
                TextureFormat::RGB8,
                None,
                glow::REPEAT,
                glow::LINEAR,
            )?;

            let vbo = create_buffer(gl, glow::ARRAY_BUFFER, &TEXTURED_TRIANGLE, glow::STATIC_DRAW)?;
            let vao = create_vertex_array(
                gl,
                program,
                vbo,
                stride_of::<PosTexVertex>(),
                &[
                    VertexAttribute::new("aPos", 2, 0),
                    VertexAttribute::new("aTex", 2, 8),
                ],
            )?;

            let color = uniform_location(gl, program, "uColor")?;
            let use_texture = uniform_location(gl, program, "useTexture")?;
            let sampler = uniform_location(gl, program, "image")?;

            gl.active_texture(glow::TEXTURE0 + TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(target_texture));
            gl.active_texture(glow::TEXTURE0);
            gl.use_program(Some(program));
            gl.uniform_1_i32(Some(&sampler), gl_size(TEXTURE_UNIT));
            gl.use_program(None);

            let fbo = gl.create_framebuffer().map_err(Error::Gl)?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(target_texture),
                0,
            );
            let status = check_framebuffer(gl, glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            status?;

            Ok(Self {
                program,
                vbo,
                vao,
                target_texture,
                fbo,
                color,
                use_texture,
                size: framebuffer_size,
            })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        let [width, height] = self.size.map(gl_size);
        let [x0, y0, x1, y1] = blit_target(self.size);

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            super::clear(gl, glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.uniform_1_i32(Some(&self.use_texture), 0);
            let [r, g, b] = TRIANGLE_COLOR;
            gl.uniform_3_f32(Some(&self.color), r, g, b);
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.use_program(None);

            // The FBO stays bound for reading.
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.blit_framebuffer(
                0,
                0,
                width,
                height,
                x0,
                y0,
                x1,
                y1,
                glow::COLOR_BUFFER_BIT,
                glow::LINEAR,
            );
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.target_texture);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_is_inset_on_every_side() {
        assert_eq!(blit_target([1024, 600]), [200, 200, 824, 400]);
    }

    #[test]
    fn tiny_window_gets_an_empty_target() {
        let [x0, y0, x1, y1] = blit_target([300, 100]);
        assert_eq!((x0, y0), (200, 200));
        assert_eq!((x1, y1), (200, 200));
    }
}
