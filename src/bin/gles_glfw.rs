//! Open an empty window with a GLES context and wait for it to close.

use std::process::ExitCode;

use gles_tutorials::demos::glfw_window::EmptyWindow;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<EmptyWindow>())
}
