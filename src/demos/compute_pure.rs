//! A compute shader with no graphics at all: fill a storage buffer on the
//! GPU and print it.

use glow::HasContext;
use log::info;

use crate::context::{HeadlessContext, HeadlessSurface};
use crate::error::Error;
use crate::glsl;
use crate::resources::create_empty_buffer;
use crate::shaders::compile_compute_program;
use crate::types::{stride_of, Std140IVec2};

/// Elements in the shader's `ivec2 values[10]` block, one work group each.
pub const ELEMENT_COUNT: u32 = 10;

/// Ints in the buffer: every std140 element is four ints wide.
pub const INT_COUNT: usize = ELEMENT_COUNT as usize * size_of::<Std140IVec2>() / size_of::<i32>();

/// The buffer contents before the dispatch: `1, 2, ..., INT_COUNT`.
#[must_use]
pub fn initial_values() -> Vec<i32> {
    (1..).take(INT_COUNT).collect()
}

fn byte_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// Copy `data` into `buffer` through a write mapping.
unsafe fn write_mapped(
    gl: &glow::Context,
    buffer: glow::Buffer,
    data: &[i32],
) -> Result<(), Error> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    unsafe {
        gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(buffer));
        let ptr = gl.map_buffer_range(
            glow::SHADER_STORAGE_BUFFER,
            0,
            byte_len(bytes.len()),
            glow::MAP_WRITE_BIT,
        );
        if ptr.is_null() {
            gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
            return Err(Error::Gl("glMapBufferRange for writing failed".into()));
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
        gl.unmap_buffer(glow::SHADER_STORAGE_BUFFER);
        gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
    }
    Ok(())
}

/// Read `count` ints from `buffer` through a read mapping.
unsafe fn read_mapped(
    gl: &glow::Context,
    buffer: glow::Buffer,
    count: usize,
) -> Result<Vec<i32>, Error> {
    let len = count * size_of::<i32>();
    unsafe {
        gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(buffer));
        let ptr = gl.map_buffer_range(
            glow::SHADER_STORAGE_BUFFER,
            0,
            byte_len(len),
            glow::MAP_READ_BIT,
        );
        if ptr.is_null() {
            gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
            return Err(Error::Gl("glMapBufferRange for reading failed".into()));
        }
        // The mapping has no alignment guarantee for i32.
        let values = std::slice::from_raw_parts(ptr, len)
            .chunks_exact(size_of::<i32>())
            .map(bytemuck::pod_read_unaligned)
            .collect();
        gl.unmap_buffer(glow::SHADER_STORAGE_BUFFER);
        gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
        Ok(values)
    }
}

/// Fill a buffer with [`initial_values`], run the compute shader over it and
/// return the buffer contents afterwards.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES 3.1 context.
///
/// # Errors
///
/// [`Error::Shader`] if the compute shader fails to build, [`Error::Gl`] if
/// the buffer cannot be created or mapped.
pub unsafe fn run_compute(gl: &glow::Context) -> Result<Vec<i32>, Error> {
    unsafe {
        let program = compile_compute_program(gl, glsl::COMPUTE_PURE_SRC)?;
        let size = stride_of::<[i32; INT_COUNT]>();
        let buffer =
            match create_empty_buffer(gl, glow::SHADER_STORAGE_BUFFER, size, glow::STATIC_DRAW) {
                Ok(buffer) => buffer,
                Err(err) => {
                    gl.delete_program(program);
                    return Err(err);
                }
            };

        let result = write_mapped(gl, buffer, &initial_values()).and_then(|()| {
            gl.use_program(Some(program));
            gl.bind_buffer_base(glow::SHADER_STORAGE_BUFFER, 0, Some(buffer));
            gl.dispatch_compute(ELEMENT_COUNT, 1, 1);
            gl.memory_barrier(glow::BUFFER_UPDATE_BARRIER_BIT);
            gl.bind_buffer_base(glow::SHADER_STORAGE_BUFFER, 0, None);
            gl.use_program(None);

            read_mapped(gl, buffer, INT_COUNT)
        });

        gl.delete_buffer(buffer);
        gl.delete_program(program);
        result
    }
}

/// Create a surfaceless GLES 3.1 context, run the compute shader and log
/// every int of the result.
///
/// # Errors
///
/// Context, shader and GL failures.
pub fn run() -> Result<(), Error> {
    let context = HeadlessContext::new(HeadlessSurface::Surfaceless, (3, 1))?;
    let values = unsafe { run_compute(context.gl()) }?;

    for (idx, value) in values.iter().enumerate() {
        info!("-> pos: {:2} => {:2}", idx + 1, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_holds_ten_padded_ivec2() {
        assert_eq!(INT_COUNT, 40);
    }

    #[test]
    fn initial_values_count_from_one() {
        let values = initial_values();
        assert_eq!(values.len(), INT_COUNT);
        assert_eq!(values.first(), Some(&1));
        assert_eq!(values.last(), Some(&40));
    }
}
