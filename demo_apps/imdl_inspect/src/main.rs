//! IMDL Inspector
//!
//! Prints the tables of an IMDL file and, optionally, plays one of its clips
//! headless to show the resulting node positions.
//!
//! Usage:
//! ```text
//! imdl_inspect <model.imdl> [--settings loader.json] [--clip NAME] [--seconds S]
//! ```
//!
//! Set `RUST_LOG=debug` to see chunk-level diagnostics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use imdl::assets::LoaderSettings;
use imdl::renderer::{RecordingRegistry, collect_draw_items};
use imdl::{Animator, ImdlLoader, LoopMode, Model};

const TICK: f32 = 1.0 / 60.0;

struct Args {
    model: PathBuf,
    settings: Option<PathBuf>,
    clip: Option<String>,
    seconds: f32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut model = None;
    let mut settings = None;
    let mut clip = None;
    let mut seconds = 1.0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => settings = Some(args.next().context("--settings needs a path")?.into()),
            "--clip" => clip = Some(args.next().context("--clip needs a name")?),
            "--seconds" => {
                seconds = args
                    .next()
                    .context("--seconds needs a value")?
                    .parse()
                    .context("--seconds must be a number")?;
            }
            _ if arg.starts_with("--") => bail!("unknown option {arg}"),
            _ => model = Some(PathBuf::from(arg)),
        }
    }

    Ok(Args {
        model: model.context("usage: imdl_inspect <model.imdl> [--settings loader.json] [--clip NAME] [--seconds S]")?,
        settings,
        clip,
        seconds,
    })
}

fn print_tables(model: &Model) {
    println!("textures:    {}", model.textures().len());
    for (i, texture) in model.textures().iter().enumerate() {
        println!("  [{i}] {:?}, {} bytes", texture.kind, texture.data.len());
    }

    println!("materials:   {}", model.materials().len());
    for (i, m) in model.materials().iter().enumerate() {
        println!(
            "  [{i}] base {:?} metallic {:.2} roughness {:.2} textures {:?}",
            m.base_color.to_array(),
            m.metallic_factor,
            m.roughness_factor,
            m.texture_slots().map(|(_, t)| t),
        );
    }

    println!("vertices:    {}", model.vertices().len());
    println!("indices:     {}", model.indices().len());
    println!("sub-meshes:  {}", model.sub_meshes().len());
    println!("mesh groups: {}", model.mesh_groups().len());

    println!(
        "nodes:       {} ({} roots{})",
        model.nodes().len(),
        model.hierarchy().roots().count(),
        if model.hierarchy().is_sorted() { "" } else { ", reordered" }
    );

    let mut draws = Vec::new();
    collect_draw_items(model, &mut draws);
    println!("draw calls:  {}", draws.len());

    println!("clips:       {}", model.animations().len());
    for (i, clip) in model.animations().iter().enumerate() {
        println!(
            "  [{i}] '{}' {:.3}s, {} channels",
            clip.name,
            clip.duration,
            clip.channel_count()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let settings = match &args.settings {
        Some(path) => LoaderSettings::from_json_file(path)
            .with_context(|| format!("Failed to read loader settings {}", path.display()))?,
        None => LoaderSettings::default(),
    };

    let model = ImdlLoader::new(settings)
        .load_file(&args.model)
        .with_context(|| format!("Failed to load {}", args.model.display()))?;

    println!("=== {} ===", args.model.display());
    print_tables(&model);

    let mut registry = RecordingRegistry::default();
    model.register_resources(&mut registry);
    log::debug!(
        "Registered {} textures, {} materials",
        registry.textures.len(),
        registry.materials.len()
    );

    let Some(name) = args.clip else {
        return Ok(());
    };

    let model = Arc::new(model);
    let mut animator = Animator::new(Arc::clone(&model));
    if !animator.play_by_name(&name, LoopMode::Loop) {
        bail!("no clip named '{name}'");
    }

    let ticks = (args.seconds / TICK).round() as usize;
    for _ in 0..ticks {
        animator.update(TICK);
    }

    println!("=== '{name}' after {:.3}s (clip time {:.3}s) ===", args.seconds, animator.time());
    for (i, world) in animator.world_matrices().iter().enumerate() {
        let p = world.translation;
        println!("  node {i:>4}: ({:>9.4}, {:>9.4}, {:>9.4})", p.x, p.y, p.z);
    }

    Ok(())
}
