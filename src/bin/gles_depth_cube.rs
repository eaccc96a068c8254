//! Render a cube off-screen and show its depth texture in an inset.

use std::process::ExitCode;

use gles_tutorials::demos::depth::DepthCube;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<DepthCube>())
}
