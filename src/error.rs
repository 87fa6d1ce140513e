//! Error and warning types for the texture-pack mesher.

use thiserror::Error;

/// Result type alias using [`MesherError`].
pub type Result<T> = std::result::Result<T, MesherError>;

/// Fatal errors abort the current model. They never abort sibling models in
/// a batch.
#[derive(Error, Debug)]
pub enum MesherError {
    /// Failed to parse JSON model data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A required (not merely parent) model path does not exist.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The mesh has no geometry and cannot be emitted as a GLB.
    #[error("Cannot export empty mesh")]
    EmptyMesh,

    /// glTF JSON serialization failed.
    #[error("GLB export error: {0}")]
    Export(String),
}

/// Non-fatal conditions the pipeline recovers from by falling back to a
/// default. Never aborts the build; callers decide whether/how to surface
/// these (the core never writes to stdout/stderr itself).
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A model's `parent` reference could not be found; treated as an empty
    /// parent.
    MissingParent(String),
    /// A texture alias chain exceeded the resolution depth cap (10) and was
    /// treated as missing.
    AliasDepthExceeded(String),
    /// A face referenced a texture that could not be located in the loaded
    /// set; the atlas's first loaded texture was substituted.
    MissingTexture(String),
    /// A face's JSON key did not match one of the six known face names.
    UnknownFaceName(String),
    /// A face was present but had no resolvable texture reference and was
    /// dropped entirely.
    FaceDropped { element_index: usize, face: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MissingParent(p) => write!(f, "missing parent model: {p}"),
            Warning::AliasDepthExceeded(key) => {
                write!(f, "texture alias chain too deep, treated as missing: {key}")
            }
            Warning::MissingTexture(t) => write!(f, "missing texture, using fallback: {t}"),
            Warning::UnknownFaceName(name) => write!(f, "unknown face name, skipped: {name}"),
            Warning::FaceDropped { element_index, face } => write!(
                f,
                "face '{face}' on element {element_index} dropped: no resolvable texture"
            ),
        }
    }
}
