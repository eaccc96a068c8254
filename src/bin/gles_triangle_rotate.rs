//! Draw a rotated triangle whose red channel pulses.

use std::process::ExitCode;

use gles_tutorials::demos::rotate::RotatedTriangle;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<RotatedTriangle>())
}
