//! Component F — serializes a mesh (+ optional atlas) into a conformant GLB.

use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;

use crate::atlas::TextureAtlas;
use crate::error::MesherError;
use crate::mesh::Mesh;
use crate::types::CoordSystem;

/// +90 degree rotation about X, attached to the root node for Z-up models
/// so Y-up consumers render them upright (§4.B/§9).
const Z_UP_ROOT_ROTATION: [f32; 4] = [std::f32::consts::FRAC_1_SQRT_2, 0.0, 0.0, std::f32::consts::FRAC_1_SQRT_2];

fn align4(buffer: &mut Vec<u8>) {
    let padding = (4 - (buffer.len() % 4)) % 4;
    buffer.extend(std::iter::repeat(0u8).take(padding));
}

struct Section {
    byte_offset: usize,
    byte_length: usize,
}

fn write_section<F: FnOnce(&mut Vec<u8>)>(buffer: &mut Vec<u8>, write: F) -> Section {
    let byte_offset = buffer.len();
    write(buffer);
    let byte_length = buffer.len() - byte_offset;
    align4(buffer);
    Section { byte_offset, byte_length }
}

fn buffer_view(section: &Section, target: Option<json::buffer::Target>) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(section.byte_length as u64),
        byte_offset: Some(USize64(section.byte_offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

fn accessor(
    view_index: u32,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<json::Value>,
    max: Option<json::Value>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(view_index)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min,
        max,
        normalized: false,
        sparse: None,
    }
}

/// Assemble and serialize a GLB buffer for `mesh`. `atlas` is embedded as a
/// PNG image and referenced from the one material iff present. `model_name`
/// feeds the asset generator string; `coord_system` decides whether a
/// root-node rotation is attached.
pub fn export_glb(
    mesh: &Mesh,
    atlas: Option<&TextureAtlas>,
    model_name: &str,
    coord_system: CoordSystem,
) -> Result<Vec<u8>, MesherError> {
    if mesh.is_empty() {
        return Err(MesherError::EmptyMesh);
    }
    let bounds = mesh.bounds().expect("non-empty mesh has bounds");

    let vertex_count = mesh.vertices.len();
    let index_count = mesh.indices.len();
    let use_u16 = vertex_count <= 65535;

    let mut buffer_data = Vec::new();
    let pos_section = write_section(&mut buffer_data, |buf| {
        for v in &mesh.vertices {
            for comp in v.position {
                buf.extend_from_slice(&comp.to_le_bytes());
            }
        }
    });
    let norm_section = write_section(&mut buffer_data, |buf| {
        for v in &mesh.vertices {
            for comp in v.normal {
                buf.extend_from_slice(&comp.to_le_bytes());
            }
        }
    });
    let uv_section = write_section(&mut buffer_data, |buf| {
        for v in &mesh.vertices {
            for comp in v.uv {
                buf.extend_from_slice(&comp.to_le_bytes());
            }
        }
    });
    let idx_section = write_section(&mut buffer_data, |buf| {
        if use_u16 {
            for &i in &mesh.indices {
                buf.extend_from_slice(&(i as u16).to_le_bytes());
            }
        } else {
            for &i in &mesh.indices {
                buf.extend_from_slice(&i.to_le_bytes());
            }
        }
    });

    let png_bytes = atlas.map(|a| a.to_png()).transpose()?;
    let image_section = png_bytes.as_ref().map(|bytes| {
        write_section(&mut buffer_data, |buf| {
            buf.extend_from_slice(bytes);
        })
    });

    let total_buffer_size = buffer_data.len();

    let mut buffer_views = vec![
        buffer_view(&pos_section, Some(json::buffer::Target::ArrayBuffer)),
        buffer_view(&norm_section, Some(json::buffer::Target::ArrayBuffer)),
        buffer_view(&uv_section, Some(json::buffer::Target::ArrayBuffer)),
        buffer_view(&idx_section, Some(json::buffer::Target::ElementArrayBuffer)),
    ];

    let accessors = vec![
        accessor(
            0,
            vertex_count,
            json::accessor::Type::Vec3,
            json::accessor::ComponentType::F32,
            Some(json::Value::from(vec![bounds.min[0], bounds.min[1], bounds.min[2]])),
            Some(json::Value::from(vec![bounds.max[0], bounds.max[1], bounds.max[2]])),
        ),
        accessor(1, vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, None, None),
        accessor(2, vertex_count, json::accessor::Type::Vec2, json::accessor::ComponentType::F32, None, None),
        accessor(
            3,
            index_count,
            json::accessor::Type::Scalar,
            if use_u16 { json::accessor::ComponentType::U16 } else { json::accessor::ComponentType::U32 },
            None,
            None,
        ),
    ];

    let mut images = Vec::new();
    let mut textures = Vec::new();
    let mut samplers = Vec::new();
    let base_color_texture;

    if let Some(section) = &image_section {
        buffer_views.push(buffer_view(section, None));
        let image_view_index = (buffer_views.len() - 1) as u32;
        images.push(json::Image {
            buffer_view: Some(json::Index::new(image_view_index)),
            mime_type: Some(json::image::MimeType("image/png".to_string())),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        });
        samplers.push(json::texture::Sampler {
            mag_filter: Some(Valid(json::texture::MagFilter::Nearest)),
            min_filter: Some(Valid(json::texture::MinFilter::Nearest)),
            wrap_s: Valid(json::texture::WrappingMode::ClampToEdge),
            wrap_t: Valid(json::texture::WrappingMode::ClampToEdge),
            extensions: Default::default(),
            extras: Default::default(),
        });
        textures.push(json::Texture {
            sampler: Some(json::Index::new(0)),
            source: json::Index::new(0),
            extensions: Default::default(),
            extras: Default::default(),
        });
        base_color_texture = Some(json::texture::Info {
            index: json::Index::new(0),
            tex_coord: 0,
            extensions: Default::default(),
            extras: Default::default(),
        });
    } else {
        base_color_texture = None;
    }

    let material = json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture,
            base_color_factor: json::material::PbrBaseColorFactor([1.0, 1.0, 1.0, 1.0]),
            metallic_factor: json::material::StrengthFactor(0.0),
            roughness_factor: json::material::StrengthFactor(1.0),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(json::material::AlphaMode::Mask),
        alpha_cutoff: Some(json::material::AlphaCutoff(0.5)),
        double_sided: true,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    };

    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(Valid(json::mesh::Semantic::Positions), json::Index::new(0));
    attributes.insert(Valid(json::mesh::Semantic::Normals), json::Index::new(1));
    attributes.insert(Valid(json::mesh::Semantic::TexCoords(0)), json::Index::new(2));

    let primitive = json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(3)),
        material: Some(json::Index::new(0)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    };

    let rotation = match coord_system {
        CoordSystem::ZUp => Some(json::scene::UnitQuaternion(Z_UP_ROOT_ROTATION)),
        CoordSystem::YUp => None,
    };

    let root = json::Root {
        asset: json::Asset {
            version: "2.0".to_string(),
            generator: Some(format!("texpack-mesher ({model_name})")),
            ..Default::default()
        },
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(total_buffer_size as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images,
        samplers,
        textures,
        materials: vec![material],
        meshes: vec![json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives: vec![primitive],
            weights: None,
        }],
        nodes: vec![json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(0)),
            rotation,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        }],
        scenes: vec![json::Scene { extensions: Default::default(), extras: Default::default(), nodes: vec![json::Index::new(0)] }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    let json_string =
        json::serialize::to_string(&root).map_err(|e| MesherError::Export(format!("failed to serialize glTF JSON: {e}")))?;
    let json_bytes = json_string.as_bytes();
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    let total_size = 12 + 8 + padded_json_len + 8 + padded_buffer_len;
    let mut glb = Vec::with_capacity(total_size);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_size as u32).to_le_bytes());

    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding));

    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    glb.extend_from_slice(&buffer_data);
    glb.extend(std::iter::repeat(0u8).take(buffer_padding));

    debug_assert_eq!(glb.len(), total_size);
    Ok(glb)
}
