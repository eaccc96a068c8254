//! Draw a triangle textured with `kitten_10.jpg` from the executable's directory.

use std::process::ExitCode;

use gles_tutorials::demos::texture::TexturedTriangle;
use gles_tutorials::window;

fn main() -> ExitCode {
    gles_tutorials::init_logging();
    gles_tutorials::report(window::run::<TexturedTriangle>())
}
