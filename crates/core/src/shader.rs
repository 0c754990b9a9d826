//! Shader program lifecycle: compile, link, validate, introspect, release.
//!
//! Provides error types, source formatting for debugging, free functions to
//! compile individual shader stages and link them into programs, and the
//! [`ShaderProgram`] wrapper that owns a linked+validated program together
//! with its cached `model`/`projection` uniform locations. The GL-facing
//! functions require a `glow::Context` and are only usable with a live GPU
//! context; the formatting utilities are pure string processing.

use thiserror::Error;

/// Errors that can occur while building a shader program.
///
/// Each variant corresponds to one fallible stage of the pipeline. All of
/// them are terminal for the current compile: nothing is retried, and any
/// partially created GPU object has already been released by the time the
/// error reaches the caller.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// The driver failed to allocate a program or shader-stage object.
    #[error("shader object creation failed: {0}")]
    Creation(String),
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    Compile {
        /// The shader stage that failed (e.g. "vertex", "fragment").
        stage: String,
        /// Line-numbered source plus the driver's info log.
        log: String,
    },
    /// The stages compiled but the program failed to link.
    #[error("shader link error:\n{0}")]
    Link(String),
    /// The program linked but failed the post-link validation pass.
    #[error("shader validation error:\n{0}")]
    Validate(String),
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. This makes it easy to correlate
/// error messages (which reference line numbers) with the actual GLSL.
///
/// Both `source` and `log` may be empty; the function handles all
/// combinations gracefully.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = if source.is_empty() {
        Vec::new()
    } else {
        source.lines().collect()
    };

    let line_count = source_lines.len();
    let width = if line_count == 0 {
        1
    } else {
        line_count.to_string().len()
    };

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Compiles a single shader stage.
///
/// Requires a live `glow::Context`. Returns the compiled stage handle. The
/// stage object is deleted before returning on the failure path, so the
/// caller never has to clean up after an error.
///
/// # Errors
///
/// Returns [`ShaderError::Creation`] if the driver cannot allocate a stage
/// object, or [`ShaderError::Compile`] if the GLSL source fails to compile.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader_type
    // constants and valid source strings. Resource cleanup is handled on
    // all error paths.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(ShaderError::Creation)?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::Compile {
            stage: stage_name(shader_type).to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// Requires a live `glow::Context`. Attaches both shaders, links, and
/// detaches them afterward (the program retains its own copies). The
/// program object is deleted before returning on the failure path.
///
/// # Errors
///
/// Returns [`ShaderError::Creation`] if the driver cannot allocate a
/// program object, or [`ShaderError::Link`] if linking fails.
#[allow(unsafe_code)]
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader/program
    // handles obtained from prior glow calls. Resources are cleaned up on error.
    let program = unsafe { gl.create_program().map_err(ShaderError::Creation)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        // Detach shaders regardless of link success -- the program owns copies.
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    let linked = unsafe { gl.get_program_link_status(program) };

    if linked {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ShaderError::Link(info_log))
    }
}

/// Runs the post-link validation pass on a linked program.
///
/// Validation checks that the program can execute against the pipeline
/// state current at the time of the call. The caller keeps ownership of
/// `program` on both paths; on failure it is expected to delete it.
///
/// # Errors
///
/// Returns [`ShaderError::Validate`] with the driver's info log if the
/// program does not validate.
#[allow(unsafe_code)]
pub fn validate_program(gl: &glow::Context, program: glow::Program) -> Result<(), ShaderError> {
    use glow::HasContext;

    // SAFETY: program is a valid linked program handle from link_program.
    unsafe {
        gl.validate_program(program);
    }

    let valid = unsafe { gl.get_program_validate_status(program) };

    if valid {
        Ok(())
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        Err(ShaderError::Validate(info_log))
    }
}

/// Compiles vertex and fragment sources and links them into a program.
///
/// This is a convenience wrapper around [`compile_shader`] and
/// [`link_program`]. Shader stage objects are deleted after linking
/// regardless of success or failure; the program retains its own copies.
///
/// # Errors
///
/// Returns [`ShaderError::Compile`] if either shader fails to compile,
/// or [`ShaderError::Link`] if linking fails.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid shader handle from a successful compile_shader call.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    // SAFETY: vert and frag are valid shader handles. The linked program
    // retains its own copies, so deleting these is correct.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

/// A linked+validated GPU shader program with cached uniform locations.
///
/// The value starts empty and is populated by [`ShaderProgram::compile`],
/// which either fully succeeds (program held, `model`/`projection` uniform
/// locations resolved) or leaves the value observably equal to a released
/// one. `None` for a uniform location means the name is not active in the
/// program; that is not an error.
///
/// GL objects cannot be deleted without a context, so deterministic
/// teardown is [`ShaderProgram::release`]'s job; dropping a value that
/// still holds a program only logs a warning.
#[derive(Debug, Default)]
pub struct ShaderProgram {
    program: Option<glow::Program>,
    model_location: Option<glow::UniformLocation>,
    projection_location: Option<glow::UniformLocation>,
}

impl ShaderProgram {
    /// Creates an empty `ShaderProgram` holding no GPU resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a GPU program from vertex and fragment sources.
    ///
    /// Runs the full pipeline: compile both stages, link, validate, then
    /// resolve and cache the `model` and `projection` uniform locations.
    /// Stage objects are deleted as soon as linking finishes. A failure in
    /// any stage releases every partially created GPU object, so after an
    /// error the value holds nothing and [`ShaderProgram::bind`] is a
    /// no-op. Compiling over a still-held program releases the old program
    /// first.
    ///
    /// # Errors
    ///
    /// Returns the [`ShaderError`] of the first stage that failed.
    #[allow(unsafe_code)]
    pub fn compile(
        &mut self,
        gl: &glow::Context,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<(), ShaderError> {
        use glow::HasContext;

        self.release(gl);

        let program = compile_program(gl, vertex_src, fragment_src)?;

        if let Err(e) = validate_program(gl, program) {
            // SAFETY: program is a valid handle from compile_program.
            unsafe { gl.delete_program(program) };
            return Err(e);
        }

        // SAFETY: program is a valid linked program; uniform lookup by name
        // has no failure mode beyond returning None for inactive names.
        let (model, projection) = unsafe {
            (
                gl.get_uniform_location(program, "model"),
                gl.get_uniform_location(program, "projection"),
            )
        };

        log::debug!(
            "shader program compiled (model uniform: {}, projection uniform: {})",
            if model.is_some() { "found" } else { "absent" },
            if projection.is_some() { "found" } else { "absent" },
        );

        self.program = Some(program);
        self.model_location = model;
        self.projection_location = projection;

        Ok(())
    }

    /// Makes this program the active one for subsequent draw calls.
    ///
    /// When no program is held (never compiled, failed, or released) this
    /// binds program zero, which unbinds any active program -- a safe
    /// no-op rather than undefined behavior.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is either a valid handle from compile() or
        // None, which glow maps to glUseProgram(0).
        unsafe { gl.use_program(self.program) };
    }

    /// Releases the GPU program and resets the cached uniform locations.
    ///
    /// Idempotent: calling it on an already-released (or never-compiled)
    /// value does nothing.
    #[allow(unsafe_code)]
    pub fn release(&mut self, gl: &glow::Context) {
        use glow::HasContext;

        if let Some(program) = self.program.take() {
            // SAFETY: program is a valid handle from compile(), taken so it
            // can never be deleted twice.
            unsafe { gl.delete_program(program) };
        }
        self.model_location = None;
        self.projection_location = None;
    }

    /// Returns the cached location of the `model` uniform, or `None` if the
    /// name is not active in the program (or nothing is compiled).
    pub fn model_location(&self) -> Option<glow::UniformLocation> {
        self.model_location
    }

    /// Returns the cached location of the `projection` uniform, or `None`
    /// if the name is not active in the program (or nothing is compiled).
    pub fn projection_location(&self) -> Option<glow::UniformLocation> {
        self.projection_location
    }

    /// Returns whether a linked+validated program is currently held.
    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.program.is_some() {
            log::warn!("ShaderProgram dropped without release(); the GPU program object leaks");
        }
    }
}
