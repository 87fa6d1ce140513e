//! Component C — JSON model schema and texture reference resolution.

pub mod loader;

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::Warning;
use crate::types::{Direction, ElementRotation};

fn default_true() -> bool {
    true
}

/// One block/entity model document, mirroring the JSON schema in full:
/// optional `parent`, a `textures` alias/reference map, and zero or more
/// cuboid `elements`. Produced only by [`parse_model`], which validates face
/// names along the way — never deserialized directly (see [`RawModel`]).
#[derive(Debug, Clone)]
pub struct Model {
    pub name: Option<String>,
    pub parent: Option<String>,
    pub textures: HashMap<String, String>,
    pub elements: Vec<ModelElement>,
    pub ambient_occlusion: bool,
}

/// One cuboid in the model, `from`/`to` in the 0-16 Minecraft unit space.
#[derive(Debug, Clone)]
pub struct ModelElement {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub rotation: Option<ElementRotation>,
    /// Ignored (§7 Silent condition): rendering hint only.
    pub shade: bool,
    pub faces: HashMap<Direction, ModelFace>,
}

/// Mirrors [`Model`]'s JSON shape exactly, before face names are validated.
#[derive(Debug, Clone, Deserialize)]
struct RawModel {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    textures: HashMap<String, String>,
    #[serde(default)]
    elements: Vec<RawModelElement>,
    #[serde(default = "default_true", rename = "ambientocclusion")]
    ambient_occlusion: bool,
}

/// Mirrors [`ModelElement`], keeping `faces` string-keyed so an unrecognized
/// face name can be reported as a [`Warning::UnknownFaceName`] instead of
/// failing the whole document's parse (§7).
#[derive(Debug, Clone, Deserialize)]
struct RawModelElement {
    from: [f32; 3],
    to: [f32; 3],
    #[serde(default)]
    rotation: Option<ElementRotation>,
    #[serde(default = "default_true")]
    shade: bool,
    #[serde(default)]
    faces: HashMap<String, ModelFace>,
}

fn normalize_element(raw: RawModelElement) -> (ModelElement, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut faces = HashMap::new();
    for (name, face) in raw.faces {
        match Direction::from_str_opt(&name) {
            Some(direction) => {
                faces.insert(direction, face);
            }
            None => warnings.push(Warning::UnknownFaceName(name)),
        }
    }
    (ModelElement { from: raw.from, to: raw.to, rotation: raw.rotation, shade: raw.shade, faces }, warnings)
}

/// Parse one model JSON document, validating face names along the way. An
/// unrecognized face key is reported as a [`Warning`] and skipped rather
/// than failing the parse; only malformed JSON is fatal.
pub fn parse_model(json_text: &str) -> Result<(Model, Vec<Warning>), serde_json::Error> {
    let raw: RawModel = serde_json::from_str(json_text)?;
    let mut warnings = Vec::new();
    let mut elements = Vec::with_capacity(raw.elements.len());
    for raw_elem in raw.elements {
        let (elem, elem_warnings) = normalize_element(raw_elem);
        warnings.extend(elem_warnings);
        elements.push(elem);
    }
    let model = Model {
        name: raw.name,
        parent: raw.parent,
        textures: raw.textures,
        elements,
        ambient_occlusion: raw.ambient_occlusion,
    };
    Ok((model, warnings))
}

/// One named face of an element. `texture` is required by the schema, but a
/// document that omits it is not treated as a parse error (§4.D): the face
/// is dropped with a warning once the mesh builder reaches it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFace {
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    #[serde(default)]
    pub rotation: i32,
    /// Ignored (§7 Silent condition): a culling hint the mesh builder never
    /// acts on.
    #[serde(default)]
    pub cullface: Option<String>,
}

impl Model {
    /// Merge `self` (the child) on top of `parent`: elements are inherited
    /// wholesale when the child defines none of its own; texture maps merge
    /// key-by-key with the child's value winning on conflict.
    pub fn merge_with_parent(mut self, parent: Model) -> Model {
        if self.elements.is_empty() {
            self.elements = parent.elements;
        }
        let mut merged_textures = parent.textures;
        merged_textures.extend(self.textures);
        self.textures = merged_textures;
        self
    }
}

/// Strip a leading `minecraft:` namespace prefix, if present.
pub fn strip_namespace(raw: &str) -> &str {
    raw.strip_prefix("minecraft:").unwrap_or(raw)
}

/// Resolve a texture value to an opaque identifier the atlas component can
/// load, applying the category-prefix rules: `block/NAME`, `entity/PATH`,
/// `item/NAME`, or (falling back) treated as `block/VALUE`.
pub fn resolve_texture_reference(raw: &str) -> String {
    let raw = strip_namespace(raw);
    if let Some(name) = raw.strip_prefix("block/") {
        format!("block/{name}")
    } else if let Some(path) = raw.strip_prefix("entity/") {
        format!("entity/{path}")
    } else if let Some(name) = raw.strip_prefix("item/") {
        format!("item/{name}")
    } else {
        format!("block/{raw}")
    }
}

/// Maximum alias-chain depth before a texture key resolves to "missing"
/// rather than looping forever on a cycle.
pub const MAX_ALIAS_DEPTH: usize = 10;

/// Resolve a face's raw `texture` value. A `#`-prefixed value is an alias
/// into `textures`, chased (through further aliases) up to
/// [`MAX_ALIAS_DEPTH`] hops; anything else is a literal path resolved
/// directly. Returns `None` if an alias key is undefined, `Err(())` if the
/// chain exceeds the depth cap (the caller is expected to push a
/// [`crate::error::Warning`] in the latter case).
pub fn resolve_face_texture(textures: &HashMap<String, String>, raw: &str) -> Result<Option<String>, ()> {
    let first_key = match raw.strip_prefix('#') {
        Some(key) => key,
        None => return Ok(Some(resolve_texture_reference(raw))),
    };
    let mut current = first_key.to_string();
    for _ in 0..MAX_ALIAS_DEPTH {
        let value = match textures.get(&current) {
            Some(v) => v,
            None => return Ok(None),
        };
        if let Some(alias) = value.strip_prefix('#') {
            current = alias.to_string();
        } else {
            return Ok(Some(resolve_texture_reference(value)));
        }
    }
    Err(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_elements_inherited_when_child_defines_none() {
        let parent = Model {
            name: None,
            parent: None,
            textures: HashMap::new(),
            elements: vec![ModelElement {
                from: [0.0, 0.0, 0.0],
                to: [16.0, 16.0, 16.0],
                rotation: None,
                shade: true,
                faces: HashMap::new(),
            }],
            ambient_occlusion: true,
        };
        let child = Model {
            name: None,
            parent: Some("parent".into()),
            textures: HashMap::new(),
            elements: vec![],
            ambient_occlusion: true,
        };
        let merged = child.merge_with_parent(parent);
        assert_eq!(merged.elements.len(), 1);
    }

    #[test]
    fn child_textures_override_parent() {
        let mut parent_tex = HashMap::new();
        parent_tex.insert("all".to_string(), "block/stone".to_string());
        let parent = Model {
            name: None,
            parent: None,
            textures: parent_tex,
            elements: vec![],
            ambient_occlusion: true,
        };
        let mut child_tex = HashMap::new();
        child_tex.insert("all".to_string(), "block/dirt".to_string());
        let child = Model {
            name: None,
            parent: Some("parent".into()),
            textures: child_tex,
            elements: vec![],
            ambient_occlusion: true,
        };
        let merged = child.merge_with_parent(parent);
        assert_eq!(merged.textures.get("all").unwrap(), "block/dirt");
    }

    #[test]
    fn category_prefix_resolution() {
        assert_eq!(resolve_texture_reference("block/stone"), "block/stone");
        assert_eq!(resolve_texture_reference("entity/chest/normal"), "entity/chest/normal");
        assert_eq!(resolve_texture_reference("item/apple"), "item/apple");
        assert_eq!(resolve_texture_reference("stone"), "block/stone");
        assert_eq!(resolve_texture_reference("minecraft:block/stone"), "block/stone");
    }

    #[test]
    fn alias_resolves_through_chain() {
        let mut textures = HashMap::new();
        textures.insert("particle".to_string(), "#all".to_string());
        textures.insert("all".to_string(), "block/stone".to_string());
        let resolved = resolve_face_texture(&textures, "#particle").unwrap();
        assert_eq!(resolved, Some("block/stone".to_string()));
    }

    #[test]
    fn alias_cycle_exceeds_depth_cap() {
        let mut textures = HashMap::new();
        textures.insert("a".to_string(), "#b".to_string());
        textures.insert("b".to_string(), "#a".to_string());
        assert!(resolve_face_texture(&textures, "#a").is_err());
    }

    #[test]
    fn undefined_key_is_none() {
        let textures = HashMap::new();
        assert_eq!(resolve_face_texture(&textures, "#missing").unwrap(), None);
    }

    #[test]
    fn direct_path_resolves_without_textures_map() {
        let textures = HashMap::new();
        let resolved = resolve_face_texture(&textures, "block/stone").unwrap();
        assert_eq!(resolved, Some("block/stone".to_string()));
    }

    #[test]
    fn parse_model_reports_unknown_face_name_without_failing() {
        let json = r#"{
            "elements": [{
                "from": [0,0,0], "to": [16,16,16],
                "faces": { "up": {"texture": "block/stone"}, "bogus": {"texture": "block/stone"} }
            }]
        }"#;
        let (model, warnings) = parse_model(json).unwrap();
        assert_eq!(warnings, vec![Warning::UnknownFaceName("bogus".to_string())]);
        assert_eq!(model.elements[0].faces.len(), 1);
    }

    #[test]
    fn parse_model_fails_only_on_malformed_json() {
        assert!(parse_model("{not json").is_err());
    }
}
