//! Generate a triangle's vertices with a compute shader and draw it.

use std::process::ExitCode;

use gles_tutorials::demos::compute_simple::ComputeSimple;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<ComputeSimple>())
}
