//! Vertex layouts and constant geometry shared by the tutorials.

use bytemuck::{Pod, Zeroable};

/// A 2D position.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PosVertex {
    /// `aPos`.
    pub position: [f32; 2],
}

/// A 2D position with a texture coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PosTexVertex {
    /// `aPos`.
    pub position: [f32; 2],
    /// `aTex`, GL convention (origin bottom-left).
    pub tex_coord: [f32; 2],
}

/// One element of an std140 `ivec2[]` storage block.
///
/// std140 rounds array strides up to 16 bytes, so each `ivec2` is followed by
/// two ints of padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Std140IVec2 {
    /// The `ivec2` itself.
    pub value: [i32; 2],
    /// Layout padding; the shader never writes it.
    pub padding: [i32; 2],
}

/// Size in bytes of a vertex type, as the `i32` stride GL expects.
// Vertex types are a few floats wide.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn stride_of<T>() -> i32 {
    std::mem::size_of::<T>() as i32
}

/// Number of vertices in [`CUBE_VERTICES`].
pub const CUBE_VERTEX_COUNT: i32 = 36;

/// Floats per vertex in [`CUBE_VERTICES`]: position (3) + texture coords (2).
pub const CUBE_STRIDE_FLOATS: usize = 5;

/// Unit cube centered on the origin as 12 triangles. The texture coordinates
/// are carried along but unused by the cube shader.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; CUBE_VERTEX_COUNT as usize * CUBE_STRIDE_FLOATS] = [
    // positions          // texture coords
    -0.5, -0.5, -0.5,     0.0, 0.0,
     0.5, -0.5, -0.5,     1.0, 0.0,
     0.5,  0.5, -0.5,     1.0, 1.0,
     0.5,  0.5, -0.5,     1.0, 1.0,
    -0.5,  0.5, -0.5,     0.0, 1.0,
    -0.5, -0.5, -0.5,     0.0, 0.0,

    -0.5, -0.5,  0.5,     0.0, 0.0,
     0.5, -0.5,  0.5,     1.0, 0.0,
     0.5,  0.5,  0.5,     1.0, 1.0,
     0.5,  0.5,  0.5,     1.0, 1.0,
    -0.5,  0.5,  0.5,     0.0, 1.0,
    -0.5, -0.5,  0.5,     0.0, 0.0,

    -0.5,  0.5,  0.5,     1.0, 0.0,
    -0.5,  0.5, -0.5,     1.0, 1.0,
    -0.5, -0.5, -0.5,     0.0, 1.0,
    -0.5, -0.5, -0.5,     0.0, 1.0,
    -0.5, -0.5,  0.5,     0.0, 0.0,
    -0.5,  0.5,  0.5,     1.0, 0.0,

     0.5,  0.5,  0.5,     1.0, 0.0,
     0.5,  0.5, -0.5,     1.0, 1.0,
     0.5, -0.5, -0.5,     0.0, 1.0,
     0.5, -0.5, -0.5,     0.0, 1.0,
     0.5, -0.5,  0.5,     0.0, 0.0,
     0.5,  0.5,  0.5,     1.0, 0.0,

    -0.5, -0.5, -0.5,     0.0, 1.0,
     0.5, -0.5, -0.5,     1.0, 1.0,
     0.5, -0.5,  0.5,     1.0, 0.0,
     0.5, -0.5,  0.5,     1.0, 0.0,
    -0.5, -0.5,  0.5,     0.0, 0.0,
    -0.5, -0.5, -0.5,     0.0, 1.0,

    -0.5,  0.5, -0.5,     0.0, 1.0,
     0.5,  0.5, -0.5,     1.0, 1.0,
     0.5,  0.5,  0.5,     1.0, 0.0,
     0.5,  0.5,  0.5,     1.0, 0.0,
    -0.5,  0.5,  0.5,     0.0, 0.0,
    -0.5,  0.5, -0.5,     0.0, 1.0,
];

/// Upright triangle with texture coordinates covering the lower half of the
/// image, GL convention.
pub const TEXTURED_TRIANGLE: [PosTexVertex; 3] = [
    PosTexVertex { position: [0.0, 0.5], tex_coord: [0.5, 1.0] },
    PosTexVertex { position: [0.5, -0.5], tex_coord: [1.0, 0.0] },
    PosTexVertex { position: [-0.5, -0.5], tex_coord: [0.0, 0.0] },
];

/// Downward-pointing triangle, positions only.
pub const TRIANGLE: [PosVertex; 3] = [
    PosVertex { position: [-0.5, 0.5] },
    PosVertex { position: [0.5, 0.5] },
    PosVertex { position: [0.0, -0.5] },
];

/// Full-viewport quad drawn as a 4-vertex triangle strip.
pub const TEXTURE_QUAD: [PosTexVertex; 4] = [
    PosTexVertex { position: [-1.0, 1.0], tex_coord: [0.0, 1.0] },
    PosTexVertex { position: [-1.0, -1.0], tex_coord: [0.0, 0.0] },
    PosTexVertex { position: [1.0, 1.0], tex_coord: [1.0, 1.0] },
    PosTexVertex { position: [1.0, -1.0], tex_coord: [1.0, 0.0] },
];

/// Split a read-back std140 `ivec2[]` block into its elements.
///
/// Trailing ints that do not fill a whole 16-byte element are ignored.
#[must_use]
pub fn decode_std140_ivec2(words: &[i32]) -> Vec<Std140IVec2> {
    let whole = words.len() - words.len() % 4;
    bytemuck::cast_slice::<i32, Std140IVec2>(&words[..whole]).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_gl_layout() {
        assert_eq!(stride_of::<PosVertex>(), 8);
        assert_eq!(stride_of::<PosTexVertex>(), 16);
        assert_eq!(stride_of::<Std140IVec2>(), 16);
    }

    #[test]
    fn cube_corners_stay_on_the_unit_cube() {
        for vertex in CUBE_VERTICES.chunks_exact(CUBE_STRIDE_FLOATS) {
            assert!(vertex[..3].iter().all(|c| c.abs() == 0.5), "{vertex:?}");
        }
    }

    #[test]
    fn std140_decoding_skips_padding() {
        let words = [1000, 2000, 3, 4, 1001, 2001, 7, 8, 99];
        let decoded = decode_std140_ivec2(&words);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].value, [1000, 2000]);
        assert_eq!(decoded[0].padding, [3, 4]);
        assert_eq!(decoded[1].value, [1001, 2001]);
    }
}
