//! Head-less triangle: render into a pbuffer, read the pixels back and save
//! them as `out.ppm`.

use glow::{HasContext, PixelPackData};
use log::info;

use crate::context::{HeadlessContext, HeadlessSurface};
use crate::error::Error;
use crate::glsl;
use crate::ppm::write_ppm_file;
use crate::resources::{create_empty_vertex_array, gl_size};
use crate::shaders::compile_program;

/// Where [`run`] writes the rendered image.
pub const OUTPUT_FILE: &str = "out.ppm";

/// Size of the off-screen surface.
pub const IMAGE_SIZE: [u32; 2] = [256, 256];

/// Render the triangle into a `width`×`height` viewport of the bound
/// framebuffer and return its pixels as bottom-up RGBA rows.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context whose bound framebuffer is at
/// least `width`×`height`.
///
/// # Errors
///
/// [`Error::Shader`] or [`Error::Gl`] if the program or vertex array cannot
/// be created.
pub unsafe fn render_offscreen(
    gl: &glow::Context,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, Error> {
    unsafe {
        gl.viewport(0, 0, gl_size(width), gl_size(height));

        let program = compile_program(gl, glsl::TRIANGLE_VERTEX_SRC, glsl::TRIANGLE_FRAGMENT_SRC)?;
        let vao = match create_empty_vertex_array(gl) {
            Ok(vao) => vao,
            Err(err) => {
                gl.delete_program(program);
                return Err(err);
            }
        };

        gl.clear_color(0.0, 0.5, 0.5, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);
        gl.use_program(Some(program));
        gl.bind_vertex_array(Some(vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);

        // glReadPixels waits for the draw to finish.
        let mut pixels = vec![0_u8; width as usize * height as usize * 4];
        gl.pixel_store_i32(glow::PACK_ALIGNMENT, 4);
        gl.read_pixels(
            0,
            0,
            gl_size(width),
            gl_size(height),
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelPackData::Slice(Some(&mut pixels)),
        );

        gl.bind_vertex_array(None);
        gl.use_program(None);
        gl.delete_vertex_array(vao);
        gl.delete_program(program);

        Ok(pixels)
    }
}

/// Create a pbuffer context, draw the triangle and write [`OUTPUT_FILE`].
///
/// # Errors
///
/// Context, shader, GL, image and I/O failures, each as its own [`Error`]
/// variant.
pub fn run() -> Result<(), Error> {
    let [width, height] = IMAGE_SIZE;
    let context = HeadlessContext::new(HeadlessSurface::Pbuffer { width, height }, (3, 0))?;

    let pixels = unsafe { render_offscreen(context.gl(), width, height) }?;
    write_ppm_file(OUTPUT_FILE, width, height, &pixels)?;
    info!("done");
    Ok(())
}
