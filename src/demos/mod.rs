//! The tutorial programs, one module per binary.
//!
//! Head-less tutorials expose a `run` function that does all the work. The
//! windowed ones implement [`Demo`](crate::window::Demo) and are started with
//! [`window::run`](crate::window::run).

pub mod compute_collision;
pub mod compute_pure;
pub mod compute_simple;
pub mod cube;
pub mod depth;
pub mod fbo_blit;
pub mod glfw_window;
pub mod rotate;
pub mod texture;
pub mod triangle;
pub mod wireframe;

/// Clear color shared by the windowed tutorials.
pub const CLEAR_COLOR: [f32; 3] = [0.0, 0.3, 0.3];

/// Clear the bound framebuffer's color buffer with [`CLEAR_COLOR`].
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
pub(crate) unsafe fn clear(gl: &glow::Context, mask: u32) {
    use glow::HasContext;

    let [r, g, b] = CLEAR_COLOR;
    unsafe {
        gl.clear_color(r, g, b, 1.0);
        gl.clear(mask);
    }
}
