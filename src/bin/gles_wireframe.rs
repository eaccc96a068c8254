//! Draw two triangles with a toggleable wireframe. Press `W` to switch modes.

use std::process::ExitCode;

use gles_tutorials::demos::wireframe::Wireframe;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<Wireframe>())
}
