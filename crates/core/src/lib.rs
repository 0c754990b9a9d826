#![deny(unsafe_code)]
//! Core types for the glimpse OpenGL demo harness.
//!
//! Provides the shader program lifecycle (`ShaderProgram`), tetrahedron mesh
//! upload (`MeshData`/`Mesh`), the per-frame animation state (`SpinState`),
//! the render-context bundle (`Scene`), built-in demo shader sources, and the
//! demo configuration (`DemoConfig`).
//!
//! Everything that touches the GPU goes through a caller-supplied
//! `glow::Context`; this crate never creates or owns one. The windowed
//! binary in `crates/demo` wires a context up via glutin/winit.

pub mod config;
pub mod mesh;
pub mod scene;
pub mod shader;
pub mod source;
pub mod spin;

pub use config::{ConfigError, DemoConfig, SpinSettings};
pub use mesh::{Mesh, MeshData, MeshError};
pub use scene::{Scene, SceneError};
pub use shader::{ShaderError, ShaderProgram};
pub use source::{ShaderSource, SourceError, DEMO_FRAGMENT_SHADER, DEMO_VERTEX_SHADER};
pub use spin::SpinState;
