//! Move a triangle with a compute shader and bounce it off the window edges.

use std::process::ExitCode;

use gles_tutorials::demos::compute_collision::ComputeCollision;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<ComputeCollision>())
}
