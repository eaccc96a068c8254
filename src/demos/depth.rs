//! The spinning cube rendered into a framebuffer with a depth texture. The
//! color result is blitted to the window and the depth texture is shown in a
//! small inset.

use std::time::Duration;

use glow::HasContext;

use super::cube::CubeRenderer;
use crate::error::Error;
use crate::glsl;
use crate::resources::{
    check_framebuffer, create_buffer, create_texture_2d, create_vertex_array, gl_size,
    uniform_location, TextureFormat, VertexAttribute,
};
use crate::shaders::compile_program;
use crate::types::{stride_of, PosTexVertex, TEXTURE_QUAD};
use crate::window::{Demo, WindowConfig};

/// Inset rectangle `(x, y, width, height)` that shows the depth texture.
pub const DEPTH_INSET: [i32; 4] = [10, 10, 300, 300];

const VIEW_DISTANCE: f32 = 1.5;
const TEXTURE_UNIT: u32 = 5;

/// Depth texture tutorial.
pub struct DepthCube {
    cube: CubeRenderer,
    depth_texture: glow::Texture,
    color_renderbuffer: glow::Renderbuffer,
    fbo: glow::Framebuffer,
    quad_program: glow::Program,
    quad_vbo: glow::Buffer,
    quad_vao: glow::VertexArray,
    size: [u32; 2],
}

impl DepthCube {
    /// Create the off-screen target: a float depth texture and an RGB565
    /// color renderbuffer.
    unsafe fn create_target(
        gl: &glow::Context,
        [width, height]: [u32; 2],
    ) -> Result<(glow::Framebuffer, glow::Texture, glow::Renderbuffer), Error> {
        unsafe {
            // Float depth textures are not filterable in ES 3.
            let depth_texture = create_texture_2d(
                gl,
                [width, height],
                TextureFormat::DEPTH32F,
                None,
                glow::CLAMP_TO_EDGE,
                glow::NEAREST,
            )?;

            let color_renderbuffer = gl.create_renderbuffer().map_err(Error::Gl)?;
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(color_renderbuffer));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::RGB565,
                gl_size(width),
                gl_size(height),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            let fbo = gl.create_framebuffer().map_err(Error::Gl)?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::TEXTURE_2D,
                Some(depth_texture),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::RENDERBUFFER,
                Some(color_renderbuffer),
            );
            let status = check_framebuffer(gl, glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            status?;

            Ok((fbo, depth_texture, color_renderbuffer))
        }
    }
}

impl Demo for DepthCube {
    fn config() -> WindowConfig {
        WindowConfig::default().with_debug(true)
    }

    unsafe fn new(gl: &glow::Context, framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        unsafe {
            let cube = CubeRenderer::new(gl, framebuffer_size)?;
            let (fbo, depth_texture, color_renderbuffer) =
                Self::create_target(gl, framebuffer_size)?;

            let quad_program = compile_program(
                gl,
                glsl::TEXTURE_DISPLAY_VERTEX_SRC,
                glsl::TEXTURE_DISPLAY_FRAGMENT_SRC,
            )?;
            let quad_vbo = create_buffer(gl, glow::ARRAY_BUFFER, &TEXTURE_QUAD, glow::STATIC_DRAW)?;
            let quad_vao = create_vertex_array(
                gl,
                quad_program,
                quad_vbo,
                stride_of::<PosTexVertex>(),
                &[
                    VertexAttribute::new("aPos", 2, 0),
                    VertexAttribute::new("aTex", 2, 8),
                ],
            )?;

            gl.active_texture(glow::TEXTURE0 + TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(depth_texture));
            gl.active_texture(glow::TEXTURE0);

            let sampler = uniform_location(gl, quad_program, "inputImage")?;
            gl.use_program(Some(quad_program));
            gl.uniform_1_i32(Some(&sampler), gl_size(TEXTURE_UNIT));
            gl.use_program(None);

            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::SCISSOR_TEST);

            Ok(Self {
                cube,
                depth_texture,
                color_renderbuffer,
                fbo,
                quad_program,
                quad_vbo,
                quad_vao,
                size: framebuffer_size,
            })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, elapsed: Duration) {
        let [width, height] = self.size.map(gl_size);
        let [x, y, inset_w, inset_h] = DEPTH_INSET;

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, width, height);
            gl.scissor(0, 0, width, height);
            super::clear(gl, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.cube.draw(gl, elapsed, VIEW_DISTANCE);

            // Copy the color result; the FBO stays bound for reading.
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
            gl.blit_framebuffer(
                0,
                0,
                width,
                height,
                0,
                0,
                width,
                height,
                glow::COLOR_BUFFER_BIT,
                glow::NEAREST,
            );

            gl.viewport(x, y, inset_w, inset_h);
            gl.scissor(x, y, inset_w, inset_h);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.quad_program));
            gl.bind_vertex_array(Some(self.quad_vao));
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
            gl.bind_vertex_array(None);
            gl.use_program(None);

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, width, height);
            gl.scissor(0, 0, width, height);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.quad_vao);
            gl.delete_buffer(self.quad_vbo);
            gl.delete_program(self.quad_program);
            gl.delete_framebuffer(self.fbo);
            gl.delete_renderbuffer(self.color_renderbuffer);
            gl.delete_texture(self.depth_texture);
            self.cube.destroy(gl);
        }
    }
}
