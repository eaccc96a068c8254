//! Draw a spinning checkered cube.

use std::process::ExitCode;

use gles_tutorials::demos::cube::SpinningCube;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<SpinningCube>())
}
