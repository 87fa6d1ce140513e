//! Shared flat-shaded mesh geometry.
//!
//! Vertices are never shared across faces: every quad pushes four fresh
//! vertices and six indices, matching the flat-shading convention used
//! throughout the pipeline.

use crate::types::BoundingBox;

/// A single mesh vertex. No vertex-color channel — this pipeline's output
/// carries no per-vertex tint or ambient occlusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// A flat, indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    fn push_vertex(&mut self, v: Vertex) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(v);
        idx
    }

    /// Push a quad given in winding order `[p0, p1, p2, p3]` sharing one
    /// normal, with per-corner UVs in the same order. Emits two triangles
    /// `(0,1,2)` and `(0,2,3)` as six indices.
    pub fn add_quad(&mut self, positions: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = [
            Vertex { position: positions[0], normal, uv: uvs[0] },
            Vertex { position: positions[1], normal, uv: uvs[1] },
            Vertex { position: positions[2], normal, uv: uvs[2] },
            Vertex { position: positions[3], normal, uv: uvs[3] },
        ];
        let i0 = self.push_vertex(base[0]);
        let i1 = self.push_vertex(base[1]);
        let i2 = self.push_vertex(base[2]);
        let i3 = self.push_vertex(base[3]);
        self.indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
    }

    pub fn merge(&mut self, mut other: Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.append(&mut other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.position).collect()
    }

    pub fn normals_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.normal).collect()
    }

    pub fn uvs_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.uv).collect()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().map(|v| v.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_quad_pushes_four_vertices_and_six_indices() {
        let mut mesh = Mesh::new();
        mesh.add_quad(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            [0.0, 0.0, 1.0],
            [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        );
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn merge_offsets_indices() {
        let mut a = Mesh::new();
        a.add_quad(
            [[0.0; 3]; 4],
            [0.0, 0.0, 1.0],
            [[0.0, 0.0]; 4],
        );
        let mut b = Mesh::new();
        b.add_quad(
            [[1.0; 3]; 4],
            [0.0, 0.0, 1.0],
            [[0.0, 0.0]; 4],
        );
        a.merge(b);
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(a.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn bounds_none_for_empty_mesh() {
        assert!(Mesh::new().bounds().is_none());
    }
}
