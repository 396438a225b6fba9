// wallsnap - Render wallpaper frames to disk for visual review
//
// Pipeline:
//   1. Build a config (defaults, JSON file or WALLPAPER_* variables)
//   2. Apply command-line overrides
//   3. Advance the chosen backend N frames
//   4. Write the last layer: PNG for pixel backends, SVG for vector
//
// Usage: cargo run --bin wallsnap -- --backend shader --frames 120 -o rain

mod export;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rain_wallpaper::{BackendKind, BackendRegistry, Layer, Wallpaper, WallpaperConfig};

#[derive(Parser)]
#[command(name = "wallsnap")]
#[command(about = "Render rain wallpaper frames to PNG or SVG", long_about = None)]
struct Cli {
    /// vector, raster, shader, sprite-physics or legacy-raster-physics
    #[arg(short, long)]
    backend: Option<BackendKind>,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 960)]
    height: u32,
    /// Frames to advance; the last one is written
    #[arg(short, long, default_value_t = 1)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    #[arg(long)]
    seed: Option<i64>,
    #[arg(long)]
    count: Option<i64>,
    /// JSON config file; flags override it
    #[arg(long, conflicts_with = "env")]
    config: Option<PathBuf>,
    /// Start from the WALLPAPER_* environment variables
    #[arg(long)]
    env: bool,
    /// Output path; the extension is set from the layer type
    #[arg(short, long, default_value = "wallpaper")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = if cli.env {
        WallpaperConfig::from_vars(std::env::vars())?
    } else if let Some(path) = &cli.config {
        WallpaperConfig::from_json(&std::fs::read_to_string(path)?)?
    } else {
        WallpaperConfig::default()
    };
    if let Some(kind) = cli.backend {
        config.backend = kind;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(count) = cli.count {
        config.drop_count = count;
    }

    let registry = BackendRegistry::with_defaults();
    let mut wallpaper = Wallpaper::new(config, &registry, cli.width, cli.height)?;

    println!(
        "Rendering {} frames of {} at {}x{}",
        cli.frames.max(1),
        wallpaper.config().backend,
        cli.width,
        cli.height
    );
    for _ in 1..cli.frames.max(1) {
        let _ = wallpaper.tick(cli.dt);
    }

    let path = match wallpaper.tick(cli.dt) {
        Layer::Empty => return Err("backend produced an empty layer".into()),
        Layer::Markup(svg) => {
            let path = cli.out.with_extension("svg");
            export::write_svg(&path, svg)?;
            path
        }
        Layer::Pixels(frame) => {
            let path = cli.out.with_extension("png");
            export::write_png(&path, frame)?;
            path
        }
    };

    if let Some(engine) = wallpaper.engine() {
        println!("  Live drops: {}", engine.len());
    }
    println!("  Elapsed: {:.2}s", wallpaper.elapsed());
    println!("Wrote {}", path.display());
    Ok(())
}
