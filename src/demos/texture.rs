//! A triangle textured with `kitten_10.jpg`.

use std::path::PathBuf;
use std::time::Duration;

use glow::HasContext;
use log::info;

use crate::error::Error;
use crate::glsl;
use crate::resources::{
    create_buffer, create_texture_2d, create_vertex_array, gl_size, uniform_location,
    TextureFormat, VertexAttribute,
};
use crate::shaders::compile_program;
use crate::types::{stride_of, PosTexVertex, TEXTURED_TRIANGLE};
use crate::window::Demo;

/// Image file looked up next to the executable.
pub const IMAGE_FILE: &str = "kitten_10.jpg";

/// Texture unit the image is bound to.
const TEXTURE_UNIT: u32 = 1;

/// Path of [`IMAGE_FILE`] in the executable's directory.
///
/// # Errors
///
/// [`Error::Io`] if the executable path is unknown.
pub fn image_path() -> Result<PathBuf, Error> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().map(PathBuf::from).unwrap_or_default();
    Ok(dir.join(IMAGE_FILE))
}

/// Decode an image into tightly packed RGB rows, bottom row first so that
/// texture coordinate `(0, 0)` is the lower-left corner.
///
/// # Errors
///
/// [`Error::Image`] if the file is missing or cannot be decoded.
pub fn load_rgb_flipped(path: &std::path::Path) -> Result<image::RgbImage, Error> {
    let image = image::open(path)?.flipv().to_rgb8();
    info!(
        "Image {} WxH: {}x{}",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Textured triangle tutorial.
pub struct TexturedTriangle {
    program: glow::Program,
    vbo: glow::Buffer,
    vao: glow::VertexArray,
    texture: glow::Texture,
    color: glow::UniformLocation,
}

impl Demo for TexturedTriangle {
    unsafe fn new(gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        let image = load_rgb_flipped(&image_path()?)?;

        unsafe {
            let program =
                compile_program(gl, glsl::TEXTURED_VERTEX_SRC, glsl::TEXTURED_FRAGMENT_SRC)?;
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
            let sampler = uniform_location(gl, program, "image")?;

            // RGB rows are not 4-byte aligned for odd widths.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            let texture = create_texture_2d(
                gl,
                [image.width(), image.height()],
                TextureFormat::RGB8,
                Some(image.as_raw().as_slice()),
                glow::REPEAT,
                glow::LINEAR,
            )?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.generate_mipmap(glow::TEXTURE_2D);

            gl.active_texture(glow::TEXTURE0 + TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.active_texture(glow::TEXTURE0);

            gl.use_program(Some(program));
            gl.uniform_1_i32(Some(&sampler), gl_size(TEXTURE_UNIT));
            gl.use_program(None);

            Ok(Self {
                program,
                vbo,
                vao,
                texture,
                color,
            })
        }
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        unsafe {
            super::clear(gl, glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(self.program));
            gl.uniform_3_f32(Some(&self.color), 1.0, 1.0, 1.0);
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_texture(self.texture);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn image_is_looked_up_next_to_the_executable() {
        let path = image_path().unwrap();
        assert_eq!(path.file_name().unwrap(), IMAGE_FILE);
        assert_eq!(path.parent(), std::env::current_exe().unwrap().parent());
    }

    #[test]
    fn missing_image_is_an_image_error() {
        let err = load_rgb_flipped(std::path::Path::new("does/not/exist.jpg")).unwrap_err();
        assert_eq!(err.exit_code(), -6);
    }
}
