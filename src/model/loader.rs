//! Parent lookup and top-level model loading.

use std::collections::HashMap;

use crate::error::{MesherError, Warning};
use crate::model::{parse_model, resolve_face_texture, strip_namespace, Model};

/// Supplies raw model JSON documents by name, so [`load_model`] can resolve
/// a `parent` reference. Directory discovery of the underlying pack is an
/// external-collaborator concern; this trait is the seam a caller plugs
/// into.
pub trait ModelSource {
    fn load_model_json(&self, name: &str) -> Option<String>;
}

/// An in-memory `ModelSource` keyed by bare model name, handy for tests and
/// the optional CLI.
#[derive(Debug, Default, Clone)]
pub struct InMemoryModelSource {
    pub models: HashMap<String, String>,
}

impl InMemoryModelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.models.insert(name.into(), json.into());
    }
}

impl ModelSource for InMemoryModelSource {
    fn load_model_json(&self, name: &str) -> Option<String> {
        self.models.get(name).cloned()
    }
}

/// Look up a parent model by bare name, then by name with a leading
/// `block/` prefix stripped, matching §4.C's parent-lookup rule.
fn find_parent_json(store: &dyn ModelSource, raw_name: &str) -> Option<String> {
    let name = strip_namespace(raw_name);
    if let Some(json) = store.load_model_json(name) {
        return Some(json);
    }
    if let Some(stripped) = name.strip_prefix("block/") {
        if let Some(json) = store.load_model_json(stripped) {
            return Some(json);
        }
    }
    None
}

/// The fully resolved output of loading one model document: its merged
/// elements/textures, and the set of external texture identifiers the atlas
/// component should load, keyed by the `textures` map key that referenced
/// them, in first-appearance order.
pub struct ResolvedModel {
    pub model: Model,
    /// `(raw_face_texture, resolved_identifier)` pairs, keyed by the exact
    /// string each face's `texture` field carries (alias or literal path),
    /// in first-appearance order — atlas placement determinism depends on
    /// this order, not on `HashMap` iteration order.
    pub texture_refs: Vec<(String, String)>,
}

/// Parse `json_text`, merge a single parent (if referenced) via `store`, and
/// resolve every texture key to its opaque atlas identifier. Fatal only on
/// unparseable JSON; a missing parent or an over-deep alias chain is
/// recorded as a [`Warning`] and the pipeline continues.
pub fn load_model(
    store: &dyn ModelSource,
    json_text: &str,
) -> Result<(ResolvedModel, Vec<Warning>), MesherError> {
    let (model, parse_warnings) = parse_model(json_text)?;
    let mut warnings = parse_warnings;

    let model = match model.parent.clone() {
        Some(parent_name) => match find_parent_json(store, &parent_name) {
            Some(parent_json) => {
                let (parent_model, parent_warnings) = parse_model(&parent_json)?;
                warnings.extend(parent_warnings);
                model.merge_with_parent(parent_model)
            }
            None => {
                warnings.push(Warning::MissingParent(parent_name));
                model
            }
        },
        None => model,
    };

    // First-appearance order: elements in their Vec order, faces within an
    // element in the fixed Direction::ALL order — never HashMap iteration
    // order, which is unstable across runs.
    let mut ordered_refs: Vec<String> = Vec::new();
    for elem in &model.elements {
        for direction in crate::types::Direction::ALL {
            if let Some(face) = elem.faces.get(&direction) {
                // A face omitting `texture` entirely has nothing to resolve
                // here; the cuboid builder drops it with a warning (§4.D).
                if let Some(texture) = &face.texture {
                    if !ordered_refs.contains(texture) {
                        ordered_refs.push(texture.clone());
                    }
                }
            }
        }
    }

    let mut texture_refs = Vec::new();
    for raw in ordered_refs {
        match resolve_face_texture(&model.textures, &raw) {
            Ok(Some(resolved)) => texture_refs.push((raw, resolved)),
            // Undefined alias key: no texture_refs entry. The cuboid
            // builder treats any face whose raw value has no entry here as
            // a dangling reference and drops the face with its own warning
            // (§4.D) — not duplicated here.
            Ok(None) => {}
            Err(()) => {
                warnings.push(Warning::AliasDepthExceeded(raw));
            }
        }
    }

    Ok((ResolvedModel { model, texture_refs }, warnings))
}

/// Look up `name` in `store` and load it via [`load_model`]. Unlike a
/// missing *parent* (a [`Warning::MissingParent`]), a missing top-level,
/// caller-requested model path is Fatal (§7): [`MesherError::ModelNotFound`].
pub fn load_model_by_name(
    store: &dyn ModelSource,
    name: &str,
) -> Result<(ResolvedModel, Vec<Warning>), MesherError> {
    let json_text =
        store.load_model_json(name).ok_or_else(|| MesherError::ModelNotFound(name.to_string()))?;
    load_model(store, &json_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parent_is_a_warning_not_fatal() {
        let store = InMemoryModelSource::new();
        let json = r#"{"parent": "block/nonexistent", "elements": []}"#;
        let (resolved, warnings) = load_model(&store, json).unwrap();
        assert!(resolved.model.elements.is_empty());
        assert_eq!(warnings, vec![Warning::MissingParent("block/nonexistent".to_string())]);
    }

    #[test]
    fn parent_lookup_strips_block_prefix() {
        let mut store = InMemoryModelSource::new();
        store.insert(
            "cube_all",
            r#"{"elements": [{"from":[0,0,0],"to":[16,16,16],"faces":{}}]}"#,
        );
        let json = r#"{"parent": "block/cube_all", "elements": []}"#;
        let (resolved, warnings) = load_model(&store, json).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(resolved.model.elements.len(), 1);
    }

    #[test]
    fn unparseable_json_is_fatal() {
        let store = InMemoryModelSource::new();
        assert!(load_model(&store, "{not json").is_err());
    }

    #[test]
    fn texture_refs_resolved_in_first_appearance_order() {
        let store = InMemoryModelSource::new();
        let json = r#"{
            "textures": {"side": "block/stone", "top": "block/dirt"},
            "elements": [{
                "from": [0,0,0], "to": [16,16,16],
                "faces": {
                    "up": {"texture": "#top"},
                    "north": {"texture": "#side"}
                }
            }]
        }"#;
        let (resolved, warnings) = load_model(&store, json).unwrap();
        assert!(warnings.is_empty());
        // Direction::ALL lists north before up, so "side" (north) resolves
        // before "top" (up) regardless of HashMap<Direction, _> iteration.
        let keys: Vec<&str> = resolved.texture_refs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["#side", "#top"]);
    }

    #[test]
    fn face_omitting_texture_parses_fine_and_yields_no_ref() {
        let store = InMemoryModelSource::new();
        let json = r#"{
            "elements": [{
                "from": [0,0,0], "to": [16,16,16],
                "faces": { "up": {} }
            }]
        }"#;
        let (resolved, warnings) = load_model(&store, json).unwrap();
        assert!(warnings.is_empty());
        assert!(resolved.texture_refs.is_empty());
        assert!(resolved.model.elements[0].faces.get(&crate::types::Direction::Up).unwrap().texture.is_none());
    }

    #[test]
    fn unrecognized_face_name_is_a_warning_not_fatal() {
        let store = InMemoryModelSource::new();
        let json = r#"{
            "elements": [{
                "from": [0,0,0], "to": [16,16,16],
                "faces": {
                    "up": {"texture": "block/stone"},
                    "northeast": {"texture": "block/stone"}
                }
            }]
        }"#;
        let (resolved, warnings) = load_model(&store, json).unwrap();
        assert_eq!(warnings, vec![Warning::UnknownFaceName("northeast".to_string())]);
        assert_eq!(resolved.model.elements[0].faces.len(), 1);
        assert!(resolved.model.elements[0].faces.contains_key(&crate::types::Direction::Up));
    }

    #[test]
    fn missing_top_level_model_is_fatal_not_found() {
        let store = InMemoryModelSource::new();
        let err = load_model_by_name(&store, "item/nonexistent").unwrap_err();
        assert!(matches!(err, MesherError::ModelNotFound(name) if name == "item/nonexistent"));
    }
}
