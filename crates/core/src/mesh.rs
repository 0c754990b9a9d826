//! Indexed triangle mesh data and GPU upload.
//!
//! Mesh data is an input to the GL wrapper, not baked into it: the demo's
//! tetrahedron is just one [`MeshData`] value. [`Mesh`] owns the VAO, the
//! vertex buffer, and the index buffer, and knows how to draw and release
//! them. Positions are tightly packed vec3s bound to attribute location 0,
//! matching the built-in vertex shader.

use thiserror::Error;

/// Errors from validating or uploading mesh data.
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// The mesh has no vertices or no indices.
    #[error("mesh has no geometry: {vertices} vertex floats, {indices} indices")]
    Empty {
        /// Number of floats in the vertex buffer.
        vertices: usize,
        /// Number of indices.
        indices: usize,
    },
    /// The vertex float count does not form whole vec3 positions.
    #[error("vertex data length {0} is not a multiple of 3")]
    RaggedVertices(usize),
    /// An index points past the last vertex.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// Number of vec3 positions available.
        vertex_count: usize,
    },
    /// The driver failed to allocate a buffer or vertex-array object.
    #[error("mesh upload failed: {0}")]
    Gpu(String),
}

/// CPU-side mesh data: packed vec3 positions plus triangle indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex positions, three floats per vertex.
    pub vertices: Vec<f32>,
    /// Triangle indices into the vertex list.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// The demo tetrahedron: four vertices, four triangular faces.
    pub fn tetrahedron() -> Self {
        Self {
            vertices: vec![
                -1.0, -1.0, 0.0, //
                0.0, -1.0, 1.0, //
                1.0, -1.0, 0.0, //
                0.0, 1.0, 0.0, //
            ],
            indices: vec![
                0, 3, 1, //
                1, 3, 2, //
                2, 3, 0, //
                0, 1, 2, //
            ],
        }
    }

    /// Number of vec3 positions.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Checks that the data describes a drawable indexed mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Empty`] when either list is empty,
    /// [`MeshError::RaggedVertices`] when the float count is not a
    /// multiple of 3, or [`MeshError::IndexOutOfRange`] for an index
    /// pointing past the last vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(MeshError::Empty {
                vertices: self.vertices.len(),
                indices: self.indices.len(),
            });
        }

        if self.vertices.len() % 3 != 0 {
            return Err(MeshError::RaggedVertices(self.vertices.len()));
        }

        let vertex_count = self.vertex_count();
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}

/// GPU-side mesh: VAO + vertex buffer + index buffer.
///
/// Created by [`Mesh::upload`]; freed by [`Mesh::release`], which is
/// idempotent. Dropping an unreleased mesh logs a warning, mirroring
/// `ShaderProgram` -- GL objects cannot be deleted without a context.
#[derive(Debug, Default)]
pub struct Mesh {
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ebo: Option<glow::Buffer>,
    index_count: i32,
}

impl Mesh {
    /// Uploads validated mesh data into freshly created GL objects.
    ///
    /// Attribute 0 is set up as a tightly packed vec3. All bindings are
    /// cleared before returning: the VAO is unbound first so it keeps its
    /// element-buffer association, then the buffer targets are unbound.
    /// Any object created before a failure is deleted on the error path.
    ///
    /// # Errors
    ///
    /// Returns a validation [`MeshError`] for malformed data, or
    /// [`MeshError::Gpu`] when the driver cannot allocate an object.
    #[allow(unsafe_code)]
    pub fn upload(gl: &glow::Context, data: &MeshData) -> Result<Self, MeshError> {
        use glow::HasContext;

        data.validate()?;

        // SAFETY: glow wraps raw GL calls as unsafe. Objects are created,
        // filled while bound, and deleted on every early-exit path.
        let vao = unsafe { gl.create_vertex_array().map_err(MeshError::Gpu)? };

        let vbo = match unsafe { gl.create_buffer() } {
            Ok(b) => b,
            Err(e) => {
                unsafe { gl.delete_vertex_array(vao) };
                return Err(MeshError::Gpu(e));
            }
        };

        let ebo = match unsafe { gl.create_buffer() } {
            Ok(b) => b,
            Err(e) => {
                unsafe {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                }
                return Err(MeshError::Gpu(e));
            }
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&data.indices),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data.vertices),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(0);

            // Unbind the VAO before the element buffer so the VAO keeps it.
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }

        Ok(Self {
            vao: Some(vao),
            vbo: Some(vbo),
            ebo: Some(ebo),
            index_count: data.indices.len() as i32,
        })
    }

    /// Draws the mesh as indexed triangles.
    ///
    /// A no-op when the mesh was never uploaded or already released. The
    /// caller is responsible for having a program bound.
    #[allow(unsafe_code)]
    pub fn draw(&self, gl: &glow::Context) {
        use glow::HasContext;

        let Some(vao) = self.vao else { return };

        // SAFETY: vao is a valid handle from upload(); the VAO carries the
        // element-buffer binding set up there.
        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            gl.bind_vertex_array(None);
        }
    }

    /// Deletes the VAO and both buffers. Idempotent.
    #[allow(unsafe_code)]
    pub fn release(&mut self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: each handle is taken before deletion so none can be
        // deleted twice.
        unsafe {
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
            }
            if let Some(ebo) = self.ebo.take() {
                gl.delete_buffer(ebo);
            }
        }
        self.index_count = 0;
    }

    /// Number of indices the draw call submits.
    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    /// Returns whether GPU objects are currently held.
    pub fn is_uploaded(&self) -> bool {
        self.vao.is_some()
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if self.vao.is_some() {
            log::warn!("Mesh dropped without release(); GPU buffer objects leak");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- MeshData ---

    #[test]
    fn tetrahedron_has_four_vertices_and_twelve_indices() {
        let data = MeshData::tetrahedron();
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.index_count(), 12);
    }

    #[test]
    fn tetrahedron_validates() {
        MeshData::tetrahedron()
            .validate()
            .expect("the built-in tetrahedron must always validate");
    }

    #[test]
    fn tetrahedron_indices_form_four_faces() {
        let data = MeshData::tetrahedron();
        assert_eq!(data.indices.len() % 3, 0, "indices must form whole triangles");
        // Every vertex participates in at least one face.
        for v in 0..4u32 {
            assert!(
                data.indices.contains(&v),
                "vertex {v} is not referenced by any face"
            );
        }
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let data = MeshData {
            vertices: vec![],
            indices: vec![],
        };
        assert!(matches!(data.validate(), Err(MeshError::Empty { .. })));
    }

    #[test]
    fn ragged_vertex_data_is_rejected() {
        let data = MeshData {
            vertices: vec![0.0, 1.0, 2.0, 3.0],
            indices: vec![0],
        };
        match data.validate() {
            Err(MeshError::RaggedVertices(4)) => {}
            other => panic!("expected RaggedVertices(4), got: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let data = MeshData {
            vertices: vec![0.0; 9],
            indices: vec![0, 1, 3],
        };
        match data.validate() {
            Err(MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3,
            }) => {}
            other => panic!("expected IndexOutOfRange, got: {other:?}"),
        }
    }

    #[test]
    fn mesh_error_display_is_readable() {
        let err = MeshError::IndexOutOfRange {
            index: 7,
            vertex_count: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains('7'), "missing index in: {msg}");
        assert!(msg.contains('4'), "missing vertex count in: {msg}");
    }

    #[test]
    fn unuploaded_mesh_reports_no_geometry() {
        let mesh = Mesh::default();
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.index_count(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // -- any index within range validates, any outside fails --

            #[test]
            fn indices_within_range_always_validate(
                vertex_count in 1usize..64,
                index_seed in proptest::collection::vec(0u32..u32::MAX, 3..48),
            ) {
                let data = MeshData {
                    vertices: vec![0.0; vertex_count * 3],
                    indices: index_seed
                        .iter()
                        .map(|i| i % vertex_count as u32)
                        .collect(),
                };
                prop_assert!(data.validate().is_ok(), "in-range indices must validate");
            }

            #[test]
            fn one_out_of_range_index_fails_validation(
                vertex_count in 1usize..64,
                overshoot in 0u32..1000,
            ) {
                let bad = vertex_count as u32 + overshoot;
                let data = MeshData {
                    vertices: vec![0.0; vertex_count * 3],
                    indices: vec![0, bad, 0],
                };
                prop_assert!(
                    matches!(data.validate(), Err(MeshError::IndexOutOfRange { index, .. }) if index == bad),
                    "index {bad} must be rejected for {vertex_count} vertices"
                );
            }
        }
    }

    // GL-facing behavior requires a live context.

    #[test]
    #[ignore = "requires GL context"]
    fn upload_then_draw_submits_twelve_indices() {
        // Would test: Mesh::upload(gl, &MeshData::tetrahedron()) succeeds,
        // is_uploaded() is true, index_count() == 12, draw() does not error.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn release_twice_is_safe() {
        // Would test: release() twice leaves is_uploaded() false both times.
    }
}
