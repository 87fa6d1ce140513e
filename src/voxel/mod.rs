//! Component B — turns an image's opaque pixels into a cuboid mesh.
//!
//! Each opaque pixel becomes an independent unit box; there is no
//! inter-voxel face culling (every opaque pixel contributes all six faces).

use crate::mesh::Mesh;
use crate::pixel_source::{opaque_pixels, PixelSource};
use crate::types::CoordSystem;

/// One quad's corner indices (into the per-pixel 8-corner table), its
/// pre-rotation normal, and the four UVs in the same winding order. Voxels
/// are axis-aligned so no rotation matrix is needed, unlike cuboid elements.
struct FaceSpec {
    corners: [usize; 4],
    normal: [f32; 3],
}

const FACES: [FaceSpec; 6] = [
    FaceSpec { corners: [1, 0, 3, 2], normal: [0.0, 0.0, -1.0] }, // north (back)
    FaceSpec { corners: [4, 5, 6, 7], normal: [0.0, 0.0, 1.0] },  // south (front)
    FaceSpec { corners: [5, 1, 2, 6], normal: [1.0, 0.0, 0.0] },  // east
    FaceSpec { corners: [0, 4, 7, 3], normal: [-1.0, 0.0, 0.0] }, // west
    FaceSpec { corners: [3, 7, 6, 2], normal: [0.0, 1.0, 0.0] },  // up
    FaceSpec { corners: [0, 1, 5, 4], normal: [0.0, -1.0, 0.0] }, // down
];

/// Build the voxel mesh for one pixel source. `coord_system` is not used to
/// transform geometry (positions are always emitted in the same frame); it
/// is accepted here purely so callers can thread it straight through to the
/// GLB emitter, which is the component that actually attaches the Z-up root
/// rotation. Returns `None` if the source has no opaque pixels (the "empty
/// mesh" sentinel).
pub fn build_voxel_mesh(source: &dyn PixelSource, scale: f32, _coord_system: CoordSystem) -> Option<Mesh> {
    let pixels = opaque_pixels(source);
    if pixels.is_empty() {
        return None;
    }

    let w = source.width() as f32;
    let h = source.height() as f32;
    let p = scale / w.max(h);

    let mut mesh = Mesh::new();
    for (x, y) in pixels {
        add_voxel(&mut mesh, x, y, w, h, p);
    }
    Some(mesh)
}

fn add_voxel(mesh: &mut Mesh, x: u32, y: u32, w: f32, h: f32, p: f32) {
    let xf = x as f32;
    let yf = y as f32;

    let x0 = xf * p - w * p / 2.0;
    let x1 = (xf + 1.0) * p - w * p / 2.0;
    let y0 = (h - yf - 1.0) * p - h * p / 2.0;
    let y1 = (h - yf) * p - h * p / 2.0;
    let z0 = -p / 4.0;
    let z1 = p / 4.0;

    let u0 = xf / w;
    let u1 = (xf + 1.0) / w;
    let v0 = yf / h;
    let v1 = (yf + 1.0) / h;

    // Corner i: bit0=x (0=x0,1=x1), bit1=y, bit2=z — same convention the
    // cuboid builder uses, so the face tables above line up directly.
    let corners = [
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ];

    // front/back receive the pixel's own UV rectangle; side faces reuse the
    // same rectangle (an edge extrusion of the same source color) varying
    // across whichever two axes that face actually spans.
    let uv_front = [[u0, v1], [u1, v1], [u1, v0], [u0, v0]]; // south, +Z
    let uv_back = [[u1, v1], [u0, v1], [u0, v0], [u1, v0]]; // north, -Z
    let uv_east = [[u1, v1], [u0, v1], [u0, v0], [u1, v0]];
    let uv_west = [[u0, v1], [u1, v1], [u1, v0], [u0, v0]];
    let uv_up = [[u0, v0], [u0, v1], [u1, v1], [u1, v0]];
    let uv_down = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];

    let uv_tables = [uv_back, uv_front, uv_east, uv_west, uv_up, uv_down];

    for (face, uvs) in FACES.iter().zip(uv_tables.iter()) {
        let positions = [
            corners[face.corners[0]],
            corners[face.corners[1]],
            corners[face.corners[2]],
            corners[face.corners[3]],
        ];
        mesh.add_quad(positions, face.normal, *uvs);
    }
}
