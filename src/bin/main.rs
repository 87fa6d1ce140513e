//! texpack-mesher CLI
//!
//! Generate GLB meshes from a single item texture or a JSON block model.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use texpack_mesher::atlas::{build_atlas, TextureSource};
use texpack_mesher::model::loader::{load_model_by_name, ModelSource};
use texpack_mesher::pixel_source::PixelGrid;
use texpack_mesher::{build_cuboid_mesh, build_voxel_mesh, export_glb, CoordSystem};

#[derive(Parser)]
#[command(name = "texpack-mesher")]
#[command(author, version, about = "Generate GLB meshes from texture pack assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extrude a flat item texture's opaque pixels into a voxel mesh
    Voxel {
        /// Input PNG texture
        #[arg(short, long)]
        input: PathBuf,

        /// Output GLB path
        #[arg(short, long)]
        output: PathBuf,

        /// World-space size of the texture's longer dimension
        #[arg(long, default_value = "1.0")]
        scale: f32,

        #[arg(long, value_enum, default_value = "z-up")]
        coord_system: CoordSystemArg,
    },

    /// Build a mesh from a JSON block model, pulling referenced textures
    /// from an assets directory laid out like a resource pack
    /// (`models/<name>.json`, `textures/<identifier>.png`)
    Model {
        /// Model name to load (without the .json extension)
        #[arg(short, long)]
        model: String,

        /// Assets directory containing `models/` and `textures/`
        #[arg(short, long)]
        assets: PathBuf,

        /// Output GLB path
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = texpack_mesher::cuboid::DEFAULT_SCALE)]
        scale: f32,

        #[arg(long, value_enum, default_value = "z-up")]
        coord_system: CoordSystemArg,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CoordSystemArg {
    ZUp,
    YUp,
}

impl From<CoordSystemArg> for CoordSystem {
    fn from(value: CoordSystemArg) -> Self {
        match value {
            CoordSystemArg::ZUp => CoordSystem::ZUp,
            CoordSystemArg::YUp => CoordSystem::YUp,
        }
    }
}

/// A `ModelSource`/`TextureSource` backed by a resource-pack-shaped directory.
struct AssetDir {
    root: PathBuf,
}

impl ModelSource for AssetDir {
    fn load_model_json(&self, name: &str) -> Option<String> {
        let path = self.root.join("models").join(format!("{name}.json"));
        fs::read_to_string(path).ok()
    }
}

impl TextureSource for AssetDir {
    fn load_texture(&self, identifier: &str) -> Option<PixelGrid> {
        let path = self.root.join("textures").join(format!("{identifier}.png"));
        let bytes = fs::read(path).ok()?;
        let img = image::load_from_memory(&bytes).ok()?.to_rgba8();
        let (w, h) = img.dimensions();
        Some(PixelGrid::new(w, h, img.into_raw()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Voxel { input, output, scale, coord_system } => {
            voxel_command(&input, &output, scale, coord_system.into())
        }
        Commands::Model { model, assets, output, scale, coord_system } => {
            model_command(&model, &assets, &output, scale, coord_system.into())
        }
    }
}

fn voxel_command(
    input: &Path,
    output: &Path,
    scale: f32,
    coord_system: CoordSystem,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading texture from {input:?}...");
    let bytes = fs::read(input)?;
    let img = image::load_from_memory(&bytes)?.to_rgba8();
    let (w, h) = img.dimensions();
    let grid = PixelGrid::new(w, h, img.into_raw());

    let mesh = build_voxel_mesh(&grid, scale, coord_system)
        .ok_or("texture has no opaque pixels; nothing to mesh")?;
    println!("  Generated {} vertices, {} indices", mesh.vertices.len(), mesh.indices.len());

    let name = input.file_stem().and_then(|s| s.to_str()).unwrap_or("voxel");
    let glb = export_glb(&mesh, None, name, coord_system)?;
    fs::write(output, &glb)?;
    println!("Exported GLB ({} bytes) to {output:?}", glb.len());
    Ok(())
}

fn model_command(
    model_name: &str,
    assets: &Path,
    output: &Path,
    scale: f32,
    coord_system: CoordSystem,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = AssetDir { root: assets.to_path_buf() };

    println!("Loading model {model_name:?} from {assets:?}...");
    let (resolved, warnings) = load_model_by_name(&store, model_name)?;
    for w in &warnings {
        eprintln!("warning: {w}");
    }

    // Ordered by first appearance (per `resolved.texture_refs`'s own contract) so
    // atlas tile placement, and therefore every remapped UV and the output bytes,
    // is deterministic across runs. `texture_lookup` stays a HashMap only for the
    // cuboid builder's raw-key -> resolved-identifier lookup, never for ordering.
    let identifiers: Vec<String> = resolved.texture_refs.iter().map(|(_, id)| id.clone()).collect();
    let texture_lookup: std::collections::HashMap<String, String> = resolved.texture_refs.into_iter().collect();
    let (atlas, atlas_warnings) = build_atlas(&identifiers, &store);
    for w in &atlas_warnings {
        eprintln!("warning: {w}");
    }

    let (mesh, mesh_warnings) = build_cuboid_mesh(&resolved.model.elements, &texture_lookup, &atlas, scale);
    for w in &mesh_warnings {
        eprintln!("warning: {w}");
    }
    println!("  Generated {} vertices, {} indices", mesh.vertices.len(), mesh.indices.len());
    println!("  Atlas: {}x{}", atlas.width, atlas.height);

    let glb = export_glb(&mesh, Some(&atlas), model_name, coord_system)?;
    fs::write(output, &glb)?;
    println!("Exported GLB ({} bytes) to {output:?}", glb.len());
    Ok(())
}
