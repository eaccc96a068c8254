//! Shader compilation and program linking.
//!
//! Every tutorial program builds its GL programs through [`ProgramBuilder`]
//! (or the [`compile_program`] / [`compile_compute_program`] shorthands). The
//! builder compiles one shader object per stage, links them, and deletes the
//! shader objects again once the program exists.
//!
//! The GL calls go through the [`ShaderBackend`] trait so the pipeline can be
//! exercised without a driver.

use std::fmt;

use glow::HasContext;

/// Maximum number of bytes of a compile or link log kept in a
/// [`ShaderError`].
pub const INFO_LOG_LIMIT: usize = 512;

/// Shown instead of the driver's log when the driver returned nothing.
const EMPTY_LOG: &str = "(driver returned an empty info log)";

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
    /// Compute shader (GLES 3.1+).
    Compute,
}

impl ShaderStage {
    /// The GL shader type enum for this stage.
    #[must_use]
    pub const fn gl_type(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
            Self::Compute => glow::COMPUTE_SHADER,
        }
    }

    /// Human readable stage name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::Fragment => "Fragment",
            Self::Compute => "Compute",
        }
    }
}

/// Why a program could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The stage set is neither vertex+fragment nor compute alone.
    UnsupportedStages(Vec<ShaderStage>),
    /// The driver refused to allocate a shader or program object.
    Create(String),
    /// A stage failed to compile. `log` is the (truncated) compiler output.
    Compile {
        /// The stage that failed.
        stage: ShaderStage,
        /// Compiler info log, at most [`INFO_LOG_LIMIT`] bytes.
        log: String,
    },
    /// The program failed to link. `log` is the (truncated) linker output.
    Link {
        /// Linker info log, at most [`INFO_LOG_LIMIT`] bytes.
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedStages(stages) => {
                write!(f, "unsupported shader stage combination: {stages:?}")
            }
            Self::Create(msg) => write!(f, "could not create GL object: {msg}"),
            Self::Compile { stage, log } => write!(f, "{} shader error:\n{log}", stage.name()),
            Self::Link { log } => write!(f, "Program error:\n{log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// The handful of GL entry points needed to build a program.
///
/// Implemented for [`glow::Context`]. Every method mirrors one GL call (or a
/// call plus its status query).
///
/// # Safety
///
/// All methods require the backend's context to be current on this thread.
pub trait ShaderBackend {
    /// Shader object handle.
    type Shader: Copy;
    /// Program object handle.
    type Program: Copy;

    /// `glCreateShader`.
    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// `glShaderSource` + `glCompileShader`, returning `COMPILE_STATUS`.
    unsafe fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;
    /// `glGetShaderInfoLog`.
    unsafe fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// `glDeleteShader`.
    unsafe fn delete_shader(&self, shader: Self::Shader);
    /// `glCreateProgram`.
    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    /// `glAttachShader`.
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `glDetachShader`.
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `glLinkProgram`, returning `LINK_STATUS`.
    unsafe fn link_program(&self, program: Self::Program) -> bool;
    /// `glGetProgramInfoLog`.
    unsafe fn program_info_log(&self, program: Self::Program) -> String;
    /// `glDeleteProgram`.
    unsafe fn delete_program(&self, program: Self::Program);
}

impl ShaderBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_type()) }
    }

    unsafe fn compile_shader(&self, shader: glow::Shader, source: &str) -> bool {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            self.get_shader_compile_status(shader)
        }
    }

    unsafe fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    unsafe fn delete_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    unsafe fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    unsafe fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    unsafe fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    unsafe fn link_program(&self, program: glow::Program) -> bool {
        unsafe {
            HasContext::link_program(self, program);
            self.get_program_link_status(program)
        }
    }

    unsafe fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    unsafe fn delete_program(&self, program: glow::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }
}

/// Collects the source of each stage and builds a linked program from them.
///
/// Valid stage sets are vertex+fragment, or compute on its own.
///
/// ```no_run
/// # use gles_tutorials::shaders::ProgramBuilder;
/// # fn example(gl: &glow::Context, vs: &str, fs: &str) {
/// let program = unsafe { ProgramBuilder::new().vertex(vs).fragment(fs).build(gl) };
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder<'a> {
    stages: Vec<(ShaderStage, &'a str)>,
}

impl<'a> ProgramBuilder<'a> {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the source for `stage`.
    #[must_use]
    pub fn stage(mut self, stage: ShaderStage, source: &'a str) -> Self {
        self.stages.retain(|(existing, _)| *existing != stage);
        self.stages.push((stage, source));
        self
    }

    /// Add the vertex stage.
    #[must_use]
    pub fn vertex(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Vertex, source)
    }

    /// Add the fragment stage.
    #[must_use]
    pub fn fragment(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Fragment, source)
    }

    /// Add the compute stage.
    #[must_use]
    pub fn compute(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Compute, source)
    }

    fn validate(&self) -> Result<(), ShaderError> {
        let has = |stage| self.stages.iter().any(|(s, _)| *s == stage);
        let graphics =
            self.stages.len() == 2 && has(ShaderStage::Vertex) && has(ShaderStage::Fragment);
        let compute = self.stages.len() == 1 && has(ShaderStage::Compute);
        if graphics || compute {
            Ok(())
        } else {
            Err(ShaderError::UnsupportedStages(
                self.stages.iter().map(|(stage, _)| *stage).collect(),
            ))
        }
    }

    /// Compile every stage and link them into one program.
    ///
    /// On success the per-stage shader objects are detached and deleted; only
    /// the returned program needs cleaning up by the caller. On failure every
    /// object created so far is deleted.
    ///
    /// # Safety
    ///
    /// Requires the backend's context to be current.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnsupportedStages`] before touching GL,
    /// [`ShaderError::Compile`] for the first stage that fails,
    /// [`ShaderError::Link`] if linking fails, or [`ShaderError::Create`] if
    /// the driver cannot allocate an object.
    pub unsafe fn build<B: ShaderBackend>(&self, backend: &B) -> Result<B::Program, ShaderError> {
        self.validate()?;

        let mut compiled = Vec::with_capacity(self.stages.len());
        for &(stage, source) in &self.stages {
            match unsafe { compile_stage(backend, stage, source) } {
                Ok(shader) => compiled.push(shader),
                Err(err) => {
                    for shader in compiled {
                        unsafe { backend.delete_shader(shader) };
                    }
                    return Err(err);
                }
            }
        }

        let program = match unsafe { backend.create_program() } {
            Ok(program) => program,
            Err(msg) => {
                for shader in compiled {
                    unsafe { backend.delete_shader(shader) };
                }
                return Err(ShaderError::Create(msg));
            }
        };

        unsafe {
            for &shader in &compiled {
                backend.attach_shader(program, shader);
            }

            if !backend.link_program(program) {
                let log = truncate_info_log(backend.program_info_log(program));
                backend.delete_program(program);
                for shader in compiled {
                    backend.delete_shader(shader);
                }
                return Err(ShaderError::Link { log });
            }

            // Shaders can be detached and deleted after successful linking.
            for shader in compiled {
                backend.detach_shader(program, shader);
                backend.delete_shader(shader);
            }
        }

        log::debug!("linked program from {} stage(s)", self.stages.len());
        Ok(program)
    }
}

/// Compile a single stage, deleting the shader object again on failure.
unsafe fn compile_stage<B: ShaderBackend>(
    backend: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    unsafe {
        let shader = backend.create_shader(stage).map_err(ShaderError::Create)?;
        if backend.compile_shader(shader, source) {
            return Ok(shader);
        }
        let log = truncate_info_log(backend.shader_info_log(shader));
        backend.delete_shader(shader);
        Err(ShaderError::Compile { stage, log })
    }
}

/// Compile a vertex+fragment program.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES context.
///
/// # Errors
///
/// See [`ProgramBuilder::build`].
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    unsafe {
        ProgramBuilder::new()
            .vertex(vertex_src)
            .fragment(fragment_src)
            .build(gl)
    }
}

/// Compile a compute-only program.
///
/// # Safety
///
/// Requires a valid, current OpenGL ES 3.1 context.
///
/// # Errors
///
/// See [`ProgramBuilder::build`].
pub unsafe fn compile_compute_program(
    gl: &glow::Context,
    compute_src: &str,
) -> Result<glow::Program, ShaderError> {
    unsafe { ProgramBuilder::new().compute(compute_src).build(gl) }
}

/// Trim a driver info log and cap it at [`INFO_LOG_LIMIT`] bytes.
fn truncate_info_log(log: String) -> String {
    let trimmed = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return EMPTY_LOG.to_owned();
    }
    let mut end = trimmed.len().min(INFO_LOG_LIMIT);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// In-memory backend. A source "compiles" unless it contains
    /// `#error`; linking fails when `fail_link` is set and program
    /// allocation fails when `fail_create_program` is set.
    #[derive(Default)]
    struct FakeGl {
        next_id: RefCell<u32>,
        shaders: RefCell<HashSet<u32>>,
        programs: RefCell<HashSet<u32>>,
        attached: RefCell<HashMap<u32, Vec<u32>>>,
        logs: RefCell<HashMap<u32, String>>,
        fail_link: bool,
        fail_create_program: bool,
        link_log: String,
    }

    impl FakeGl {
        fn alloc(&self) -> u32 {
            let mut id = self.next_id.borrow_mut();
            *id += 1;
            *id
        }
    }

    impl ShaderBackend for FakeGl {
        type Shader = u32;
        type Program = u32;

        unsafe fn create_shader(&self, _stage: ShaderStage) -> Result<u32, String> {
            let id = self.alloc();
            self.shaders.borrow_mut().insert(id);
            Ok(id)
        }

        unsafe fn compile_shader(&self, shader: u32, source: &str) -> bool {
            match source.find("#error") {
                Some(at) => {
                    let line = source[..at].lines().count();
                    let log = format!("0:{line}: error: '#error' : {}\0\n", "x".repeat(600));
                    self.logs.borrow_mut().insert(shader, log);
                    false
                }
                None => true,
            }
        }

        unsafe fn shader_info_log(&self, shader: u32) -> String {
            self.logs.borrow().get(&shader).cloned().unwrap_or_default()
        }

        unsafe fn delete_shader(&self, shader: u32) {
            assert!(self.shaders.borrow_mut().remove(&shader), "double delete");
        }

        unsafe fn create_program(&self) -> Result<u32, String> {
            if self.fail_create_program {
                return Err("out of program names".into());
            }
            let id = self.alloc();
            self.programs.borrow_mut().insert(id);
            Ok(id)
        }

        unsafe fn attach_shader(&self, program: u32, shader: u32) {
            self.attached.borrow_mut().entry(program).or_default().push(shader);
        }

        unsafe fn detach_shader(&self, program: u32, shader: u32) {
            if let Some(list) = self.attached.borrow_mut().get_mut(&program) {
                list.retain(|s| *s != shader);
            }
        }

        unsafe fn link_program(&self, _program: u32) -> bool {
            !self.fail_link
        }

        unsafe fn program_info_log(&self, _program: u32) -> String {
            self.link_log.clone()
        }

        unsafe fn delete_program(&self, program: u32) {
            assert!(self.programs.borrow_mut().remove(&program), "double delete");
        }
    }

    const VS: &str = "#version 310 es\nvoid main() { gl_Position = vec4(0.0); }\n";
    const FS: &str =
        "#version 310 es\nprecision highp float;\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";
    const BROKEN_FS: &str = "#version 310 es\nprecision highp float;\n#error missing semicolon\n";

    #[test]
    fn valid_pair_links_and_releases_shaders() {
        let gl = FakeGl::default();
        let program = unsafe { ProgramBuilder::new().vertex(VS).fragment(FS).build(&gl) }.unwrap();

        assert!(gl.programs.borrow().contains(&program));
        assert!(gl.shaders.borrow().is_empty());
        assert!(gl.attached.borrow()[&program].is_empty());
    }

    #[test]
    fn compile_failure_reports_stage_and_log() {
        let gl = FakeGl::default();
        let err = unsafe { ProgramBuilder::new().vertex(VS).fragment(BROKEN_FS).build(&gl) }
            .unwrap_err();

        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.starts_with("0:2: error"));
                assert!(log.len() <= INFO_LOG_LIMIT);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(gl.shaders.borrow().is_empty(), "vertex shader leaked");
        assert!(gl.programs.borrow().is_empty());
    }

    #[test]
    fn link_failure_deletes_program_and_shaders() {
        let gl = FakeGl {
            fail_link: true,
            link_log: "error: varying `v_uv` not written\n".into(),
            ..FakeGl::default()
        };
        let err = unsafe { compile_stages(&gl, VS, FS) }.unwrap_err();

        assert_eq!(
            err,
            ShaderError::Link {
                log: "error: varying `v_uv` not written".into()
            }
        );
        assert!(gl.shaders.borrow().is_empty());
        assert!(gl.programs.borrow().is_empty());
    }

    #[test]
    fn program_allocation_failure_deletes_compiled_shaders() {
        let gl = FakeGl {
            fail_create_program: true,
            ..FakeGl::default()
        };
        let err = unsafe { compile_stages(&gl, VS, FS) }.unwrap_err();

        assert_eq!(err, ShaderError::Create("out of program names".into()));
        assert_eq!(*gl.next_id.borrow(), 2, "both stages should have compiled");
        assert!(gl.shaders.borrow().is_empty());
        assert!(gl.programs.borrow().is_empty());
    }

    #[test]
    fn empty_link_log_still_produces_a_diagnostic() {
        let gl = FakeGl {
            fail_link: true,
            ..FakeGl::default()
        };
        let err = unsafe { compile_stages(&gl, VS, FS) }.unwrap_err();
        assert_eq!(err.to_string(), format!("Program error:\n{EMPTY_LOG}"));
    }

    #[test]
    fn compute_builds_on_its_own() {
        let gl = FakeGl::default();
        let program = unsafe { ProgramBuilder::new().compute(VS).build(&gl) }.unwrap();
        assert!(gl.programs.borrow().contains(&program));
    }

    #[test]
    fn incomplete_or_mixed_stage_sets_are_rejected_before_gl() {
        let gl = FakeGl::default();
        let only_vertex = unsafe { ProgramBuilder::new().vertex(VS).build(&gl) };
        assert_eq!(
            only_vertex.unwrap_err(),
            ShaderError::UnsupportedStages(vec![ShaderStage::Vertex])
        );

        let mixed = unsafe { ProgramBuilder::new().vertex(VS).fragment(FS).compute(VS).build(&gl) };
        assert!(matches!(mixed, Err(ShaderError::UnsupportedStages(_))));
        assert_eq!(*gl.next_id.borrow(), 0);
    }

    #[test]
    fn adding_a_stage_twice_replaces_it() {
        let builder = ProgramBuilder::new().vertex(BROKEN_FS).vertex(VS).fragment(FS);
        let gl = FakeGl::default();
        assert!(unsafe { builder.build(&gl) }.is_ok());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let log = "é".repeat(INFO_LOG_LIMIT);
        let truncated = truncate_info_log(log);
        assert_eq!(truncated.len(), INFO_LOG_LIMIT);
        assert!(truncated.chars().all(|c| c == 'é'));

        let odd = format!("a{}", "é".repeat(INFO_LOG_LIMIT));
        assert_eq!(truncate_info_log(odd).len(), INFO_LOG_LIMIT - 1);
    }

    unsafe fn compile_stages(gl: &FakeGl, vs: &str, fs: &str) -> Result<u32, ShaderError> {
        unsafe { ProgramBuilder::new().vertex(vs).fragment(fs).build(gl) }
    }
}
