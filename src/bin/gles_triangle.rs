//! Render an orange triangle without a window and save it as `out.ppm`.

use std::process::ExitCode;

use gles_tutorials::demos::triangle;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(triangle::run())
}
