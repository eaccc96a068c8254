//! Run a compute shader on a surfaceless context and print the buffer it wrote.

use std::process::ExitCode;

use gles_tutorials::demos::compute_pure;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(compute_pure::run())
}
