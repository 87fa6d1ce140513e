//! Component D — turns a JSON model's elements into a mesh.

use std::collections::HashMap;

use glam::Vec3;

use crate::atlas::TextureAtlas;
use crate::error::Warning;
use crate::mesh::Mesh;
use crate::model::ModelElement;
use crate::types::Direction;

/// Default scale: 0-16 Minecraft units map to a 1-unit cube.
pub const DEFAULT_SCALE: f32 = 1.0 / 16.0;

fn componentwise_min_max(from: [f32; 3], to: [f32; 3]) -> ([f32; 3], [f32; 3]) {
    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    for i in 0..3 {
        lo[i] = from[i].min(to[i]);
        hi[i] = from[i].max(to[i]);
    }
    (lo, hi)
}

/// The eight corners of a box spanned by `lo`/`hi`. Corner `i` is
/// determined by the bit pattern bit0=x, bit1=y, bit2=z (0=lo, 1=hi), so
/// corner 5 = (hi.x, lo.y, hi.z).
fn corners_from(lo: [f32; 3], hi: [f32; 3]) -> [[f32; 3]; 8] {
    [
        [lo[0], lo[1], lo[2]],
        [hi[0], lo[1], lo[2]],
        [hi[0], hi[1], lo[2]],
        [lo[0], hi[1], lo[2]],
        [lo[0], lo[1], hi[2]],
        [hi[0], lo[1], hi[2]],
        [hi[0], hi[1], hi[2]],
        [lo[0], hi[1], hi[2]],
    ]
}

fn rotate_uv_cycle(uvs: [[f32; 2]; 4], rotation: i32) -> [[f32; 2]; 4] {
    let steps = ((rotation / 90) % 4 + 4) % 4;
    let mut result = uvs;
    for _ in 0..steps {
        result = [result[3], result[0], result[1], result[2]];
    }
    result
}

/// Derive a face's raw 0-16 UV rectangle `(u1, v1, u2, v2)` from the
/// element's extent, per §4.D, when the face does not specify its own.
fn auto_uv(direction: Direction, lo: [f32; 3], hi: [f32; 3]) -> [f32; 4] {
    match direction {
        Direction::North | Direction::South => [lo[0], 16.0 - hi[1], hi[0], 16.0 - lo[1]],
        Direction::East | Direction::West => [lo[2], 16.0 - hi[1], hi[2], 16.0 - lo[1]],
        Direction::Up | Direction::Down => [lo[0], lo[2], hi[0], hi[2]],
    }
}

/// Assemble the four per-corner UVs (already atlas-remapped and re-flipped)
/// for one face, in the winding order matching `Direction::corner_indices`.
fn uv_quad_for(direction: Direction, u1: f32, v1: f32, u2: f32, v2: f32) -> [[f32; 2]; 4] {
    match direction {
        Direction::Up => [[u1, v1], [u1, v2], [u2, v2], [u2, v1]],
        Direction::Down => [[u1, v1], [u2, v1], [u2, v2], [u1, v2]],
        _ => [[u1, v2], [u2, v2], [u2, v1], [u1, v1]],
    }
}

/// Build the mesh for every element's defined faces. `texture_lookup` maps
/// a face's raw `texture` value (as written in the JSON, alias or literal)
/// to the resolved atlas identifier, as produced by
/// [`crate::model::loader::load_model`]; a face whose value has no entry is
/// dropped with a warning. `atlas` supplies the UV remap for whichever
/// texture each face actually resolved to.
pub fn build_cuboid_mesh(
    elements: &[ModelElement],
    texture_lookup: &HashMap<String, String>,
    atlas: &TextureAtlas,
    scale: f32,
) -> (Mesh, Vec<Warning>) {
    let mut mesh = Mesh::new();
    let mut warnings = Vec::new();

    for (element_index, elem) in elements.iter().enumerate() {
        let (lo, hi) = componentwise_min_max(elem.from, elem.to);
        let raw_corners = corners_from(lo, hi);

        let corners: [[f32; 3]; 8] = match &elem.rotation {
            Some(rot) => {
                let mut out = [[0.0; 3]; 8];
                for (i, c) in raw_corners.iter().enumerate() {
                    let rotated = rot.apply_to_point(Vec3::from(*c));
                    out[i] = rotated.into();
                }
                out
            }
            None => raw_corners,
        };

        // Center (0-16 -> -8..+8) then scale, after rotation.
        let scaled: [[f32; 3]; 8] = corners.map(|c| [
            (c[0] - 8.0) * scale,
            (c[1] - 8.0) * scale,
            (c[2] - 8.0) * scale,
        ]);

        for direction in Direction::ALL {
            let Some(face) = elem.faces.get(&direction) else {
                continue;
            };

            let resolved_id = face.texture.as_ref().and_then(|t| texture_lookup.get(t));
            let Some(resolved_id) = resolved_id else {
                warnings.push(Warning::FaceDropped {
                    element_index,
                    face: direction_name(direction).to_string(),
                });
                continue;
            };

            let mut normal = Vec3::from(direction.normal());
            if let Some(rot) = &elem.rotation {
                normal = rot.apply_to_normal(normal);
            }

            let raw_uv = face.uv.unwrap_or_else(|| auto_uv(direction, lo, hi));
            let (mut u1, mut v1, mut u2, mut v2) =
                (raw_uv[0] / 16.0, raw_uv[1] / 16.0, raw_uv[2] / 16.0, raw_uv[3] / 16.0);

            let flip_u = u1 > u2;
            if flip_u {
                std::mem::swap(&mut u1, &mut u2);
            }
            let flip_v = v1 > v2;
            if flip_v {
                std::mem::swap(&mut v1, &mut v2);
            }

            let (ru1, rv1, used_fallback_1) = atlas.map_uv(resolved_id, u1, v1);
            let (ru2, rv2, used_fallback_2) = atlas.map_uv(resolved_id, u2, v2);
            if used_fallback_1 || used_fallback_2 {
                warnings.push(Warning::MissingTexture(resolved_id.clone()));
            }

            let (eff_u1, eff_u2) = if flip_u { (ru2, ru1) } else { (ru1, ru2) };
            let (eff_v1, eff_v2) = if flip_v { (rv2, rv1) } else { (rv1, rv2) };

            let uvs = rotate_uv_cycle(uv_quad_for(direction, eff_u1, eff_v1, eff_u2, eff_v2), face.rotation);

            let corner_indices = direction.corner_indices();
            let positions = [
                scaled[corner_indices[0]],
                scaled[corner_indices[1]],
                scaled[corner_indices[2]],
                scaled[corner_indices[3]],
            ];

            mesh.add_quad(positions, normal.into(), uvs);
        }
    }

    (mesh, warnings)
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "north",
        Direction::South => "south",
        Direction::East => "east",
        Direction::West => "west",
        Direction::Up => "up",
        Direction::Down => "down",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{build_atlas, InMemoryTextureSource};
    use crate::model::ModelFace;
    use crate::pixel_source::PixelGrid;

    fn face(texture: &str) -> ModelFace {
        ModelFace { texture: Some(texture.to_string()), uv: Some([0.0, 0.0, 16.0, 16.0]), rotation: 0, cullface: None }
    }

    fn chest_like_element() -> ModelElement {
        let mut faces = HashMap::new();
        for d in Direction::ALL {
            faces.insert(d, face("#all"));
        }
        ModelElement { from: [1.0, 0.0, 1.0], to: [15.0, 10.0, 15.0], rotation: None, shade: true, faces }
    }

    fn identity_atlas_with(id: &str) -> (TextureAtlas, HashMap<String, String>) {
        let mut source = InMemoryTextureSource::new();
        let mut rgba = Vec::new();
        for _ in 0..(16 * 16) {
            rgba.extend_from_slice(&[10, 20, 30, 255]);
        }
        source.insert(id, PixelGrid::new(16, 16, rgba));
        let (atlas, warnings) = build_atlas(&[id.to_string()], &source);
        assert!(warnings.is_empty());
        let mut lookup = HashMap::new();
        lookup.insert("#all".to_string(), id.to_string());
        (atlas, lookup)
    }

    #[test]
    fn chest_like_single_element_scenario() {
        let elements = vec![chest_like_element()];
        let (atlas, lookup) = identity_atlas_with("block/planks");
        let (mesh, warnings) = build_cuboid_mesh(&elements, &lookup, &atlas, 1.0);
        assert!(warnings.is_empty());
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let north_normals = mesh.vertices.iter().filter(|v| v.normal == [0.0, 0.0, -1.0]).count();
        assert_eq!(north_normals, 4);
    }

    #[test]
    fn element_with_k_faces_yields_4k_vertices_and_6k_indices() {
        let mut faces = HashMap::new();
        faces.insert(Direction::Up, face("#all"));
        faces.insert(Direction::North, face("#all"));
        faces.insert(Direction::East, face("#all"));
        let elem = ModelElement { from: [0.0, 0.0, 0.0], to: [16.0, 16.0, 16.0], rotation: None, shade: true, faces };
        let (atlas, lookup) = identity_atlas_with("block/stone");
        let (mesh, warnings) = build_cuboid_mesh(&[elem], &lookup, &atlas, DEFAULT_SCALE);
        assert!(warnings.is_empty());
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.indices.len(), 18);
    }

    #[test]
    fn dangling_texture_reference_drops_face_with_warning() {
        let mut faces = HashMap::new();
        faces.insert(Direction::Up, face("#undefined_key"));
        let elem = ModelElement { from: [0.0, 0.0, 0.0], to: [16.0, 16.0, 16.0], rotation: None, shade: true, faces };
        let (atlas, _lookup) = identity_atlas_with("block/stone");
        let empty_lookup = HashMap::new();
        let (mesh, warnings) = build_cuboid_mesh(&[elem], &empty_lookup, &atlas, DEFAULT_SCALE);
        assert!(mesh.is_empty());
        assert_eq!(warnings, vec![Warning::FaceDropped { element_index: 0, face: "up".to_string() }]);
    }

    #[test]
    fn face_omitting_texture_drops_with_warning() {
        let mut faces = HashMap::new();
        faces.insert(Direction::Up, ModelFace { texture: None, uv: None, rotation: 0, cullface: None });
        let elem = ModelElement { from: [0.0, 0.0, 0.0], to: [16.0, 16.0, 16.0], rotation: None, shade: true, faces };
        let (atlas, lookup) = identity_atlas_with("block/stone");
        let (mesh, warnings) = build_cuboid_mesh(&[elem], &lookup, &atlas, DEFAULT_SCALE);
        assert!(mesh.is_empty());
        assert_eq!(warnings, vec![Warning::FaceDropped { element_index: 0, face: "up".to_string() }]);
    }

    #[test]
    fn rotated_handle_plane_scenario() {
        use crate::types::{Axis, ElementRotation};
        let mut faces = HashMap::new();
        faces.insert(Direction::North, face("#all"));
        faces.insert(Direction::South, face("#all"));
        let elem = ModelElement {
            from: [6.5, 9.0, 8.0],
            to: [9.5, 11.0, 8.0],
            rotation: Some(ElementRotation { origin: [8.0, 8.0, 8.0], axis: Axis::Y, angle: 45.0 }),
            shade: true,
            faces,
        };
        let (atlas, lookup) = identity_atlas_with("block/lever");
        let (mesh, warnings) = build_cuboid_mesh(&[elem], &lookup, &atlas, 1.0);
        assert!(warnings.is_empty());
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 12);

        let expected = -((45f32).to_radians().sin());
        let north_vertex = mesh.vertices.iter().find(|v| (v.normal[0] - expected).abs() < 1e-3);
        assert!(north_vertex.is_some(), "expected a north-face vertex with rotated normal");
    }

    #[test]
    fn auto_uv_matches_spec_formula_for_north() {
        let uv = auto_uv(Direction::North, [1.0, 0.0, 1.0], [15.0, 10.0, 15.0]);
        assert_eq!(uv, [1.0, 6.0, 15.0, 16.0]);
    }

    #[test]
    fn uv_rotation_cycles_by_90_degree_steps() {
        let base = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let rotated = rotate_uv_cycle(base, 90);
        assert_eq!(rotated, [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        let full_circle = rotate_uv_cycle(base, 360);
        assert_eq!(full_circle, base);
    }
}
