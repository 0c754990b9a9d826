//! The render-context bundle driven by the per-frame loop.
//!
//! `Scene` owns the shader program, the uploaded mesh, and the animation
//! state as one explicit value -- the loop borrows it instead of reaching
//! for globals. Each frame the loop calls [`Scene::advance`] once and then
//! [`Scene::draw`] with the current framebuffer size; clearing the frame
//! is the caller's job, since the overlay UI owns the clear color.

use glam::Mat4;
use thiserror::Error;

use crate::config::DemoConfig;
use crate::mesh::{Mesh, MeshData, MeshError};
use crate::shader::{ShaderError, ShaderProgram};
use crate::source::ShaderSource;
use crate::spin::SpinState;

/// Errors from building a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The shader program failed to build.
    #[error(transparent)]
    Shader(#[from] ShaderError),
    /// The mesh failed to validate or upload.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Everything the render loop needs for one frame: program, mesh, spin
/// state, and the projection parameters.
#[derive(Debug)]
pub struct Scene {
    program: ShaderProgram,
    mesh: Mesh,
    spin: SpinState,
    fov_y_degrees: f32,
    z_near: f32,
    z_far: f32,
}

impl Scene {
    /// Compiles the shader pair and uploads the mesh.
    ///
    /// On a mesh failure the already-compiled program is released before
    /// returning, so a failed construction never holds GPU objects.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Shader`] or [`SceneError::Mesh`] from the
    /// first step that failed.
    pub fn new(
        gl: &glow::Context,
        sources: &ShaderSource,
        mesh_data: &MeshData,
        config: &DemoConfig,
    ) -> Result<Self, SceneError> {
        let mut program = ShaderProgram::new();
        program.compile(gl, &sources.vertex, &sources.fragment)?;

        let mesh = match Mesh::upload(gl, mesh_data) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.release(gl);
                return Err(e.into());
            }
        };

        Ok(Self {
            program,
            mesh,
            spin: SpinState::new(config.spin),
            fov_y_degrees: config.fov_y_degrees,
            z_near: config.z_near,
            z_far: config.z_far,
        })
    }

    /// Advances the animation by one frame.
    pub fn advance(&mut self) {
        self.spin.advance();
    }

    /// Renders the mesh with the current animation state.
    ///
    /// Enables depth testing, sets the viewport, binds the program,
    /// uploads the `model` and `projection` matrices to whichever of the
    /// two uniforms the program actually declares, draws, and unbinds the
    /// program. The caller clears the frame beforehand.
    #[allow(unsafe_code)]
    pub fn draw(&self, gl: &glow::Context, width: u32, height: u32) {
        use glow::HasContext;

        // SAFETY: fixed-function state changes with valid constants; the
        // uniform locations were resolved against the bound program.
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.viewport(0, 0, width as i32, height as i32);
        }

        self.program.bind(gl);

        if let Some(loc) = self.program.model_location() {
            let model = self.spin.model_matrix();
            unsafe {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &model.to_cols_array());
            }
        }

        if let Some(loc) = self.program.projection_location() {
            let projection = self.projection_matrix(width, height);
            unsafe {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &projection.to_cols_array());
            }
        }

        self.mesh.draw(gl);

        // SAFETY: binding program zero unbinds the active program.
        unsafe { gl.use_program(None) };
    }

    /// Perspective projection for the given framebuffer size.
    ///
    /// A zero dimension (minimized window) is clamped to one pixel so the
    /// aspect ratio stays finite.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            aspect,
            self.z_near,
            self.z_far,
        )
    }

    /// The current animation state.
    pub fn spin(&self) -> &SpinState {
        &self.spin
    }

    /// The shader program the scene draws with.
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Releases the program and the mesh. Idempotent.
    pub fn release(&mut self, gl: &glow::Context) {
        self.program.release(gl);
        self.mesh.release(gl);
    }
}
