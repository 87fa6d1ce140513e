//! Component E — texture atlas construction and UV remapping.

use std::collections::HashMap;

use image::{imageops, ImageBuffer, Rgba, RgbaImage};

use crate::error::{MesherError, Warning};
use crate::pixel_source::PixelGrid;

/// A 16x16 opaque magenta tile used whenever no texture could be loaded for
/// a model. The exact color is advisory (§9 Open Question 3); magenta is
/// simply visually distinctive.
const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 255, 255];
const PLACEHOLDER_SIZE: u32 = 16;
const PLACEHOLDER_ID: &str = "__placeholder__";

/// Supplies decoded pixel data for a resolved texture identifier (the
/// opaque string the model loader produces, e.g. `"block/stone"`). PNG
/// decoding itself is an external-collaborator concern; this is the seam a
/// caller plugs into.
pub trait TextureSource {
    fn load_texture(&self, identifier: &str) -> Option<PixelGrid>;
}

/// An in-memory `TextureSource` over already-decoded grids, handy for tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTextureSource {
    pub textures: HashMap<String, PixelGrid>,
}

impl InMemoryTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, grid: PixelGrid) {
        self.textures.insert(identifier.into(), grid);
    }
}

impl TextureSource for InMemoryTextureSource {
    fn load_texture(&self, identifier: &str) -> Option<PixelGrid> {
        self.textures.get(identifier).cloned()
    }
}

/// A `TextureSource` decoding raw PNG bytes on demand via the `image`
/// crate — the convenience adapter for tests and the optional CLI; the
/// core pipeline itself never assumes PNG as the input encoding.
#[derive(Debug, Default, Clone)]
pub struct PngTextureSource {
    pub png_bytes: HashMap<String, Vec<u8>>,
}

impl PngTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, png_bytes: Vec<u8>) {
        self.png_bytes.insert(identifier.into(), png_bytes);
    }
}

impl TextureSource for PngTextureSource {
    fn load_texture(&self, identifier: &str) -> Option<PixelGrid> {
        let bytes = self.png_bytes.get(identifier)?;
        let img = image::load_from_memory(bytes).ok()?.to_rgba8();
        let (w, h) = img.dimensions();
        Some(PixelGrid::new(w, h, img.into_raw()))
    }
}

/// A packed texture atlas: one RGBA image plus the grid cell each loaded
/// texture identifier landed in.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub rgba: Vec<u8>,
    regions: HashMap<String, (u32, u32)>,
    first_identifier: Option<String>,
}

impl TextureAtlas {
    /// Map a UV coordinate in `[0,1]` for `identifier`'s own tile-local
    /// space into atlas space. Falls back to the first successfully loaded
    /// texture (or the placeholder) if `identifier` was never loaded; the
    /// returned `bool` is `true` when that fallback occurred, so the caller
    /// can raise a [`Warning::MissingTexture`].
    pub fn map_uv(&self, identifier: &str, u: f32, v: f32) -> (f32, f32, bool) {
        let used_fallback = !self.regions.contains_key(identifier);
        let region = self
            .regions
            .get(identifier)
            .or_else(|| self.first_identifier.as_ref().and_then(|id| self.regions.get(id)));
        let Some(&(gx, gy)) = region else {
            return (u, v, used_fallback);
        };
        let t = self.tile_size as f32;
        let tx = gx as f32 * t;
        let ty = gy as f32 * t;
        let up = (tx + u * t) / self.width as f32;
        let vp = (ty + v * t) / self.height as f32;
        (up, vp, used_fallback)
    }

    /// Encode the atlas as PNG bytes for GLB embedding.
    pub fn to_png(&self) -> Result<Vec<u8>, MesherError> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            &self.rgba,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(buf)
    }
}

fn placeholder_atlas() -> TextureAtlas {
    let mut regions = HashMap::new();
    regions.insert(PLACEHOLDER_ID.to_string(), (0, 0));
    let mut rgba = Vec::with_capacity((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
    for _ in 0..(PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) {
        rgba.extend_from_slice(&PLACEHOLDER_COLOR);
    }
    TextureAtlas {
        width: PLACEHOLDER_SIZE,
        height: PLACEHOLDER_SIZE,
        tile_size: PLACEHOLDER_SIZE,
        rgba,
        regions,
        first_identifier: Some(PLACEHOLDER_ID.to_string()),
    }
}

fn to_rgba_image(grid: &PixelGrid) -> RgbaImage {
    RgbaImage::from_raw(grid.width, grid.height, grid.rgba.clone())
        .expect("PixelGrid invariant: rgba.len() == width*height*4")
}

fn resized_to(grid: &PixelGrid, size: u32) -> RgbaImage {
    let img = to_rgba_image(grid);
    if grid.width == size && grid.height == size {
        img
    } else {
        imageops::resize(&img, size, size, imageops::FilterType::Nearest)
    }
}

/// Build a texture atlas from `identifiers` (the resolved texture
/// identifiers referenced by a model, in first-appearance order — possibly
/// containing duplicates, which are collapsed to their first occurrence),
/// loading each through `source`. A texture `source` fails to load becomes
/// a [`Warning::MissingTexture`]; the face(s) referencing it fall back to
/// the first successfully loaded texture (or the placeholder) via
/// [`TextureAtlas::map_uv`].
pub fn build_atlas(identifiers: &[String], source: &dyn TextureSource) -> (TextureAtlas, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut loaded: Vec<(String, PixelGrid)> = Vec::new();

    for id in identifiers {
        if !seen.insert(id.clone()) {
            continue;
        }
        match source.load_texture(id) {
            Some(grid) => loaded.push((id.clone(), grid)),
            None => warnings.push(Warning::MissingTexture(id.clone())),
        }
    }

    if loaded.is_empty() {
        return (placeholder_atlas(), warnings);
    }

    if loaded.len() == 1 {
        let (id, grid) = &loaded[0];
        let t = grid.width;
        let mut regions = HashMap::new();
        regions.insert(id.clone(), (0, 0));
        return (
            TextureAtlas {
                width: t,
                height: t,
                tile_size: t,
                rgba: to_rgba_image(grid).into_raw(),
                regions,
                first_identifier: Some(id.clone()),
            },
            warnings,
        );
    }

    let t = loaded.iter().map(|(_, g)| g.width).max().unwrap_or(16).max(16);
    let count = loaded.len() as u32;
    let n = (count as f64).sqrt().ceil() as u32;
    let raw_size = n * t;
    let size = raw_size.next_power_of_two();

    let mut atlas_img: RgbaImage = ImageBuffer::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let mut regions = HashMap::new();
    for (i, (id, grid)) in loaded.iter().enumerate() {
        let gx = i as u32 % n;
        let gy = i as u32 / n;
        let tile = resized_to(grid, t);
        imageops::replace(&mut atlas_img, &tile, (gx * t) as i64, (gy * t) as i64);
        regions.insert(id.clone(), (gx, gy));
    }

    let first_identifier = loaded.first().map(|(id, _)| id.clone());
    (
        TextureAtlas {
            width: size,
            height: size,
            tile_size: t,
            rgba: atlas_img.into_raw(),
            regions,
            first_identifier,
        },
        warnings,
    )
}
