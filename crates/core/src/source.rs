//! Shader source text: built-in demo GLSL and file loading.
//!
//! The built-in pair renders the demo tetrahedron with a per-vertex color
//! derived from the clamped position. User-supplied sources are read from
//! files with [`ShaderSource::from_files`]; the sources are plain text
//! blobs consumed once by `ShaderProgram::compile` and not retained after
//! linking.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// GLSL 3.30 vertex shader for the demo tetrahedron.
///
/// Expects a vec3 position at attribute location 0, transforms it by the
/// `projection` and `model` uniforms, and derives a vertex color by
/// clamping the untransformed position into [0, 1].
pub const DEMO_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 pos;
out vec4 v_color;
uniform mat4 model;
uniform mat4 projection;
void main() {
    gl_Position = projection * model * vec4(pos, 1.0);
    v_color = vec4(clamp(pos, 0.0, 1.0), 1.0);
}
"#;

/// GLSL 3.30 fragment shader for the demo tetrahedron.
///
/// Passes the interpolated vertex color straight through.
pub const DEMO_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec4 v_color;
out vec4 color;
void main() {
    color = v_color;
}
"#;

/// Errors from loading shader source files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to read shader source {}: {message}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error text.
        message: String,
    },
    /// The file was read but contains no shader text.
    #[error("shader source {} is empty", path.display())]
    Empty {
        /// Path of the empty file.
        path: PathBuf,
    },
}

/// A vertex/fragment source pair, ready to hand to `ShaderProgram::compile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source text.
    pub vertex: String,
    /// Fragment stage source text.
    pub fragment: String,
}

impl ShaderSource {
    /// Returns the built-in demo shader pair.
    pub fn builtin() -> Self {
        Self {
            vertex: DEMO_VERTEX_SHADER.to_string(),
            fragment: DEMO_FRAGMENT_SHADER.to_string(),
        }
    }

    /// Reads a vertex/fragment source pair from two files.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if either file cannot be read, or
    /// [`SourceError::Empty`] if either file contains only whitespace
    /// (compiling an empty stage is never what the caller meant).
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            vertex: read_source(vertex_path.as_ref())?,
            fragment: read_source(fragment_path.as_ref())?,
        })
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(SourceError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glimpse-{}-{name}", std::process::id()));
        let mut f = std::fs::File::create(&path).expect("create temp file");
        f.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    // --- built-in source structure ---

    #[test]
    fn demo_vertex_shader_declares_version_and_main() {
        assert!(
            DEMO_VERTEX_SHADER.contains("#version 330 core"),
            "expected GLSL 3.30 version directive in:\n{DEMO_VERTEX_SHADER}"
        );
        assert!(
            DEMO_VERTEX_SHADER.contains("void main()"),
            "expected main function in:\n{DEMO_VERTEX_SHADER}"
        );
    }

    #[test]
    fn demo_vertex_shader_declares_both_uniforms() {
        assert!(
            DEMO_VERTEX_SHADER.contains("uniform mat4 model"),
            "expected model uniform in:\n{DEMO_VERTEX_SHADER}"
        );
        assert!(
            DEMO_VERTEX_SHADER.contains("uniform mat4 projection"),
            "expected projection uniform in:\n{DEMO_VERTEX_SHADER}"
        );
    }

    #[test]
    fn demo_vertex_shader_reads_position_attribute_zero() {
        assert!(
            DEMO_VERTEX_SHADER.contains("layout (location = 0) in vec3 pos"),
            "expected position attribute at location 0 in:\n{DEMO_VERTEX_SHADER}"
        );
        assert!(
            DEMO_VERTEX_SHADER.contains("gl_Position"),
            "expected gl_Position assignment in:\n{DEMO_VERTEX_SHADER}"
        );
    }

    #[test]
    fn demo_fragment_shader_writes_an_output_color() {
        assert!(
            DEMO_FRAGMENT_SHADER.contains("out vec4 color"),
            "expected color output in:\n{DEMO_FRAGMENT_SHADER}"
        );
        assert!(
            DEMO_FRAGMENT_SHADER.contains("in vec4 v_color"),
            "expected v_color varying in:\n{DEMO_FRAGMENT_SHADER}"
        );
    }

    #[test]
    fn shader_stages_agree_on_the_varying_name() {
        // The vertex output and fragment input must match for the link to
        // succeed on real drivers.
        assert!(DEMO_VERTEX_SHADER.contains("out vec4 v_color"));
        assert!(DEMO_FRAGMENT_SHADER.contains("in vec4 v_color"));
    }

    // --- ShaderSource ---

    #[test]
    fn builtin_returns_the_demo_pair() {
        let src = ShaderSource::builtin();
        assert_eq!(src.vertex, DEMO_VERTEX_SHADER);
        assert_eq!(src.fragment, DEMO_FRAGMENT_SHADER);
    }

    #[test]
    fn default_is_builtin() {
        assert_eq!(ShaderSource::default(), ShaderSource::builtin());
    }

    #[test]
    fn from_files_reads_both_stages() {
        let vert = temp_file("ok.vert", "void main() { gl_Position = vec4(0.0); }");
        let frag = temp_file("ok.frag", "void main() {}");

        let src = ShaderSource::from_files(&vert, &frag).expect("from_files should succeed");
        assert!(src.vertex.contains("gl_Position"));
        assert!(src.fragment.contains("main"));

        let _ = std::fs::remove_file(vert);
        let _ = std::fs::remove_file(frag);
    }

    #[test]
    fn from_files_missing_path_is_io_error() {
        let vert = temp_file("lonely.vert", "void main() {}");
        let missing = std::env::temp_dir().join("glimpse-definitely-not-here.frag");

        let err = ShaderSource::from_files(&vert, &missing).unwrap_err();
        match err {
            SourceError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Io error, got: {other}"),
        }

        let _ = std::fs::remove_file(vert);
    }

    #[test]
    fn from_files_whitespace_only_is_empty_error() {
        let vert = temp_file("blank.vert", "  \n\t\n");
        let frag = temp_file("blank.frag", "void main() {}");

        let err = ShaderSource::from_files(&vert, &frag).unwrap_err();
        assert!(
            matches!(err, SourceError::Empty { .. }),
            "expected Empty error, got: {err}"
        );

        let _ = std::fs::remove_file(vert);
        let _ = std::fs::remove_file(frag);
    }

    #[test]
    fn source_error_display_names_the_path() {
        let err = SourceError::Io {
            path: PathBuf::from("shaders/tri.vert"),
            message: "no such file".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("tri.vert"), "missing path in: {msg}");
        assert!(msg.contains("no such file"), "missing cause in: {msg}");
    }
}
