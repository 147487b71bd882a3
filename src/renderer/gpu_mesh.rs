//! Geometries uploaded to the GPU.

use crate::color;
use crate::context::Context;
use crate::procedural::RenderMesh;
use crate::resource::Geometry;
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use std::rc::Rc;

/// One interleaved vertex, as read by `vs_main`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Linear vertex color.
    pub color: [f32; 4],
}

impl MeshVertex {
    /// The vertex buffer layout matching this struct.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// Interleaves the attributes of a mesh.
///
/// Missing normals are recomputed, missing colors default to white.
pub fn interleave(mesh: &RenderMesh) -> Vec<MeshVertex> {
    let recomputed;
    let normals = match mesh.normals.as_ref() {
        Some(normals) => normals,
        None => {
            let mut copy = mesh.clone();
            copy.recompute_normals();
            recomputed = copy.normals.unwrap_or_default();
            &recomputed
        }
    };

    mesh.coords
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: p.to_array(),
            normal: normals.get(i).map(|n| n.to_array()).unwrap_or([0.0, 1.0, 0.0]),
            color: mesh
                .colors
                .as_ref()
                .and_then(|c| c.get(i))
                .map(|c| color::to_array(*c))
                .unwrap_or([1.0; 4]),
        })
        .collect()
}

/// The vertex and index buffers of one geometry.
pub struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh {
    /// Uploads a mesh.
    pub fn new(label: &str, mesh: &RenderMesh) -> GpuMesh {
        let ctxt = Context::get();
        let vertices = interleave(mesh);

        GpuMesh {
            vertices: ctxt.create_buffer_init(
                Some(label),
                bytemuck::cast_slice(&vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: ctxt.create_buffer_init(
                Some(label),
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            num_indices: (mesh.indices.len() * 3) as u32,
        }
    }

    /// Binds the buffers and draws every triangle.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

/// Uploads each shared geometry once, the first time it is drawn.
///
/// Entries are keyed by the address of the shared `Rc<Geometry>`; the cache keeps a
/// reference so the address stays valid.
#[derive(Default)]
pub struct GpuMeshCache {
    meshes: HashMap<*const Geometry, (Rc<Geometry>, GpuMesh)>,
}

impl GpuMeshCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The GPU mesh of `geometry`, uploading it if needed.
    pub fn get_or_upload(&mut self, geometry: &Rc<Geometry>) -> &GpuMesh {
        let (_, mesh) = self
            .meshes
            .entry(Rc::as_ptr(geometry))
            .or_insert_with(|| {
                log::debug!(
                    "Uploading {} ({} vertices).",
                    geometry.shape(),
                    geometry.num_vertices()
                );
                (
                    geometry.clone(),
                    GpuMesh::new(geometry.shape().name(), geometry.mesh()),
                )
            });
        mesh
    }

    /// The number of uploaded geometries.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether nothing was uploaded yet.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural;
    use crate::resource::{GeometryManager, Shape};

    #[test]
    fn vertex_layout_matches_the_struct() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 40);
        assert_eq!(MeshVertex::LAYOUT.array_stride, 40);
    }

    #[test]
    fn painted_meshes_keep_their_colors() {
        let geometries = GeometryManager::new();
        let pixel = geometries.get(Shape::Cylinder);
        let vertices = interleave(pixel.mesh());
        assert_eq!(vertices.len(), pixel.num_vertices());
        assert!(vertices.iter().any(|v| v.color != [1.0; 4]));
    }

    #[test]
    fn missing_attributes_are_filled_in() {
        let mut mesh = procedural::cuboid(glamx::Vec3::ONE);
        mesh.normals = None;
        mesh.colors = None;

        let vertices = interleave(&mesh);
        assert!(vertices.iter().all(|v| v.color == [1.0; 4]));
        assert!(vertices
            .iter()
            .all(|v| (glamx::Vec3::from(v.normal).length() - 1.0).abs() < 1.0e-5));
    }
}
