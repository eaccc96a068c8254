//! Tests against a real GLES driver. They need an EGL device (a GPU or
//! Mesa's software rasterizer), so they only build with `--features gpu-tests`.

#![cfg(feature = "gpu-tests")]
#![allow(clippy::unwrap_used)]

use gles_tutorials::context::{HeadlessContext, HeadlessSurface};
use gles_tutorials::demos::{compute_pure, triangle};
use gles_tutorials::glsl;
use gles_tutorials::shaders::{compile_program, ProgramBuilder, ShaderError, ShaderStage};
use gles_tutorials::types::decode_std140_ivec2;
use glow::HasContext;

fn pbuffer_context() -> HeadlessContext {
    HeadlessContext::new(HeadlessSurface::Pbuffer { width: 64, height: 64 }, (3, 0)).unwrap()
}

#[test]
fn valid_sources_link_into_a_program() {
    let context = pbuffer_context();
    let gl = context.gl();

    let program =
        unsafe { compile_program(gl, glsl::TRIANGLE_VERTEX_SRC, glsl::TRIANGLE_FRAGMENT_SRC) }
            .unwrap();
    unsafe {
        assert!(gl.get_program_link_status(program));
        assert!(gl.get_attached_shaders(program).is_empty());
        gl.delete_program(program);
    }
}

#[test]
fn missing_semicolon_reports_the_compile_log() {
    let context = pbuffer_context();
    let broken = glsl::TRIANGLE_FRAGMENT_SRC.replace("1.0f);", "1.0f)");

    let err = unsafe {
        ProgramBuilder::new()
            .vertex(glsl::TRIANGLE_VERTEX_SRC)
            .fragment(&broken)
            .build(context.gl())
    }
    .unwrap_err();

    match &err {
        ShaderError::Compile { stage, log } => {
            assert_eq!(*stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Fragment shader error:\n"));
}

#[test]
fn unmatched_varying_fails_to_link() {
    let context = pbuffer_context();
    let fragment = r"#version 310 es
precision highp float;

in vec2 neverWritten;
out vec4 outColor;

void main() {
    outColor = vec4(neverWritten, 0.0, 1.0);
}
";

    let err = unsafe { compile_program(context.gl(), glsl::TRIANGLE_VERTEX_SRC, fragment) }
        .unwrap_err();
    assert!(matches!(err, ShaderError::Link { .. }), "{err:?}");
    assert!(err.to_string().starts_with("Program error:\n"));
}

#[test]
fn offscreen_triangle_is_orange_on_teal() {
    let [width, height] = triangle::IMAGE_SIZE;
    let context = HeadlessContext::new(HeadlessSurface::Pbuffer { width, height }, (3, 0)).unwrap();

    let pixels = unsafe { triangle::render_offscreen(context.gl(), width, height) }.unwrap();
    assert_eq!(pixels.len(), (width * height * 4) as usize);

    let pixel = |x: u32, y: u32| {
        let offset = ((y * width + x) * 4) as usize;
        <[u8; 4]>::try_from(&pixels[offset..offset + 4]).unwrap()
    };
    let near = |actual: u8, expected: u8| actual.abs_diff(expected) <= 1;

    let [r, g, b, a] = pixel(width / 2, height / 2);
    assert!(r == 255 && near(g, 128) && near(b, 26) && a == 255, "{:?}", [r, g, b, a]);

    let [r, g, b, _] = pixel(0, 0);
    assert!(r == 0 && near(g, 128) && near(b, 128), "{:?}", [r, g, b]);
}

#[test]
fn compute_fills_every_element_and_keeps_padding() {
    let context = HeadlessContext::new(HeadlessSurface::Surfaceless, (3, 1)).unwrap();

    let values = unsafe { compute_pure::run_compute(context.gl()) }.unwrap();
    assert_eq!(values.len(), compute_pure::INT_COUNT);

    for (i, element) in decode_std140_ivec2(&values).into_iter().enumerate() {
        let i = i32::try_from(i).unwrap();
        assert_eq!(element.value, [1000 + i, 2000 + i]);
        assert_eq!(element.padding, [4 * i + 3, 4 * i + 4]);
    }
}
