//! A compute shader moves the triangle every frame and bounces it off the
//! edges of the window.

use std::time::Duration;

use super::compute_simple::{ComputeVertices, ComputedTriangle};
use crate::error::Error;
use crate::glsl;
use crate::window::{Demo, WindowConfig};

/// Starting triangle. `data[0].zw` is the direction, `data[1].zw` the speed
/// per frame.
pub const INITIAL_VERTICES: ComputeVertices = [
    [-0.5, 0.5, 1.0, 1.0],
    [0.5, 0.5, 0.005, 0.01],
    [0.0, -0.5, 0.0, 0.0],
];

/// Storage buffer bindings: the shader writes binding 0 and reads binding 1,
/// both backed by the vertex buffer.
const BINDINGS: [u32; 2] = [0, 1];

/// Bouncing triangle tutorial.
pub struct ComputeCollision {
    triangle: ComputedTriangle,
}

impl Demo for ComputeCollision {
    fn config() -> WindowConfig {
        WindowConfig::gles31().with_debug(true)
    }

    unsafe fn new(gl: &glow::Context, _framebuffer_size: [u32; 2]) -> Result<Self, Error> {
        let triangle = unsafe {
            ComputedTriangle::new(gl, glsl::COMPUTE_COLLISION_SRC, Some(&INITIAL_VERTICES))
        }?;
        Ok(Self { triangle })
    }

    unsafe fn render(&mut self, gl: &glow::Context, _elapsed: Duration) {
        unsafe {
            self.triangle.dispatch(gl, 1, &BINDINGS);
            self.triangle.draw(gl);
        }
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { self.triangle.destroy(gl) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_triangle_is_inside_the_window() {
        for [x, y, ..] in INITIAL_VERTICES {
            assert!(x.abs() < 1.0 && y.abs() < 1.0);
        }
    }

    #[test]
    fn starting_direction_is_unit_per_axis() {
        let [_, _, dx, dy] = INITIAL_VERTICES[0];
        assert_eq!((dx.abs(), dy.abs()), (1.0, 1.0));
    }
}
