//! Small helpers for creating and wiring GL objects.
//!
//! These cover the steps every tutorial repeats: uploading a vertex buffer,
//! describing it with a vertex array, looking up attributes and uniforms,
//! configuring a texture, and checking framebuffer completeness.

use bytemuck::Pod;
use glow::{HasContext, PixelUnpackData};

use crate::error::Error;

/// Convert a `u32` to `i32` for GL API calls, saturating at `i32::MAX`.
#[must_use]
pub fn gl_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// One vertex attribute inside an interleaved buffer.
#[derive(Clone, Copy, Debug)]
pub struct VertexAttribute {
    /// Attribute name in the vertex shader.
    pub name: &'static str,
    /// Number of float components (1–4).
    pub components: i32,
    /// Byte offset inside one vertex.
    pub offset: i32,
}

impl VertexAttribute {
    /// A float attribute at `offset` bytes into the vertex.
    #[must_use]
    pub const fn new(name: &'static str, components: i32, offset: i32) -> Self {
        Self {
            name,
            components,
            offset,
        }
    }
}

/// Create a buffer bound to `target` and fill it with `data`.
///
/// The buffer is unbound again before returning.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the buffer cannot be created.
pub unsafe fn create_buffer<T: Pod>(
    gl: &glow::Context,
    target: u32,
    data: &[T],
    usage: u32,
) -> Result<glow::Buffer, Error> {
    unsafe {
        let buffer = gl.create_buffer().map_err(Error::Gl)?;
        gl.bind_buffer(target, Some(buffer));
        gl.buffer_data_u8_slice(target, bytemuck::cast_slice(data), usage);
        gl.bind_buffer(target, None);
        Ok(buffer)
    }
}

/// Create a buffer of `size` bytes with undefined contents.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the buffer cannot be created.
pub unsafe fn create_empty_buffer(
    gl: &glow::Context,
    target: u32,
    size: i32,
    usage: u32,
) -> Result<glow::Buffer, Error> {
    unsafe {
        let buffer = gl.create_buffer().map_err(Error::Gl)?;
        gl.bind_buffer(target, Some(buffer));
        gl.buffer_data_size(target, size, usage);
        gl.bind_buffer(target, None);
        Ok(buffer)
    }
}

/// Look up a vertex attribute of a linked program.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the program has no active attribute called `name`.
pub unsafe fn attrib_location(
    gl: &glow::Context,
    program: glow::Program,
    name: &str,
) -> Result<u32, Error> {
    unsafe { gl.get_attrib_location(program, name) }
        .ok_or_else(|| Error::Gl(format!("attribute `{name}` missing from program")))
}

/// Look up a uniform of a linked program.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the program has no active uniform called `name`.
pub unsafe fn uniform_location(
    gl: &glow::Context,
    program: glow::Program,
    name: &str,
) -> Result<glow::UniformLocation, Error> {
    unsafe { gl.get_uniform_location(program, name) }
        .ok_or_else(|| Error::Gl(format!("uniform `{name}` missing from program")))
}

/// Create a vertex array describing `buffer` for `program`.
///
/// Every attribute is a float attribute read with the shared `stride`.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the vertex array cannot be created or an attribute is
/// missing from `program`.
pub unsafe fn create_vertex_array(
    gl: &glow::Context,
    program: glow::Program,
    buffer: glow::Buffer,
    stride: i32,
    attributes: &[VertexAttribute],
) -> Result<glow::VertexArray, Error> {
    unsafe {
        let vao = gl.create_vertex_array().map_err(Error::Gl)?;
        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));

        for attribute in attributes {
            let location = match attrib_location(gl, program, attribute.name) {
                Ok(location) => location,
                Err(err) => {
                    gl.bind_vertex_array(None);
                    gl.delete_vertex_array(vao);
                    return Err(err);
                }
            };
            gl.vertex_attrib_pointer_f32(
                location,
                attribute.components,
                glow::FLOAT,
                false,
                stride,
                attribute.offset,
            );
            gl.enable_vertex_attrib_array(location);
        }

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        Ok(vao)
    }
}

/// Create an attribute-less vertex array, for draws that index a constant
/// array with `gl_VertexID`.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the vertex array cannot be created.
pub unsafe fn create_empty_vertex_array(gl: &glow::Context) -> Result<glow::VertexArray, Error> {
    unsafe { gl.create_vertex_array() }.map_err(Error::Gl)
}

/// Set wrap and filter parameters on the texture bound to `TEXTURE_2D`.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
pub unsafe fn set_texture_params(gl: &glow::Context, wrap: u32, filter: u32) {
    // GL constant values are small enough that the cast is always safe.
    #[expect(clippy::cast_possible_wrap)]
    unsafe {
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter as i32);
    }
}

/// Storage description for [`create_texture_2d`].
#[derive(Clone, Copy, Debug)]
pub struct TextureFormat {
    /// Sized or unsized internal format.
    pub internal_format: u32,
    /// Pixel transfer format.
    pub format: u32,
    /// Pixel transfer type.
    pub ty: u32,
}

impl TextureFormat {
    /// 8-bit RGB.
    pub const RGB8: Self = Self {
        internal_format: glow::RGB,
        format: glow::RGB,
        ty: glow::UNSIGNED_BYTE,
    };

    /// 32-bit float depth.
    pub const DEPTH32F: Self = Self {
        internal_format: glow::DEPTH_COMPONENT32F,
        format: glow::DEPTH_COMPONENT,
        ty: glow::FLOAT,
    };
}

/// Create a 2D texture, allocate its storage and optionally upload `pixels`.
///
/// Leaves `TEXTURE_2D` unbound.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::Gl`] if the texture cannot be created.
pub unsafe fn create_texture_2d(
    gl: &glow::Context,
    [width, height]: [u32; 2],
    format: TextureFormat,
    pixels: Option<&[u8]>,
    wrap: u32,
    filter: u32,
) -> Result<glow::Texture, Error> {
    unsafe {
        let texture = gl.create_texture().map_err(Error::Gl)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        set_texture_params(gl, wrap, filter);
        // GL constant values are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            format.internal_format as i32,
            gl_size(width),
            gl_size(height),
            0,
            format.format,
            format.ty,
            PixelUnpackData::Slice(pixels),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

/// Check the completeness of the framebuffer bound to `target`.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// [`Error::FramebufferIncomplete`] with the raw status.
pub unsafe fn check_framebuffer(gl: &glow::Context, target: u32) -> Result<(), Error> {
    let status = unsafe { gl.check_framebuffer_status(target) };
    if status == glow::FRAMEBUFFER_COMPLETE {
        Ok(())
    } else {
        Err(Error::FramebufferIncomplete(status))
    }
}

/// Upload a 4×4 matrix uniform on the current program.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context with the owning program in
/// use.
pub unsafe fn set_matrix(
    gl: &glow::Context,
    location: &glow::UniformLocation,
    matrix: &cgmath::Matrix4<f32>,
) {
    let columns: &[f32; 16] = matrix.as_ref();
    unsafe { gl.uniform_matrix_4_f32_slice(Some(location), false, columns) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_size_saturates() {
        assert_eq!(gl_size(1024), 1024);
        assert_eq!(gl_size(u32::MAX), i32::MAX);
    }
}
