// img2mask - Build a silhouette from an image and preview seeded dirt
//
// Pipeline:
//   1. Load image, resample alpha to the grid, threshold into a mask
//   2. Seed the coverage maps for the requested level
//   3. Print per-layer coverage
//   4. Write a debug-colored PNG preview
//
// Usage: cargo run --bin img2mask -- <image> [--size N] [--seed S]
//        [--threshold T] [--config FILE] [--out FILE] [--shader]

mod report;

use std::env;
use std::path::PathBuf;
use std::rc::Rc;

use grime_engine::{logging, Result, Session, SessionConfig, SilhouetteMask, SurfaceRect, TextureEncoder};

struct Args {
    image: PathBuf,
    size: Option<usize>,
    seed: u32,
    threshold: Option<f32>,
    config: Option<PathBuf>,
    out: PathBuf,
    shader: bool,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return None;
    }

    let mut parsed = Args {
        image: PathBuf::from(&args[1]),
        size: None,
        seed: 1,
        threshold: None,
        config: None,
        out: PathBuf::from("mask_preview.png"),
        shader: false,
    };

    let mut i = 2;
    while i < args.len() {
        let next = args.get(i + 1);
        match args[i].as_str() {
            "--size" => { parsed.size = next.and_then(|s| s.parse().ok()); i += 2; }
            "--seed" => { parsed.seed = next.and_then(|s| s.parse().ok()).unwrap_or(1); i += 2; }
            "--threshold" => { parsed.threshold = next.and_then(|s| s.parse().ok()); i += 2; }
            "--config" => { parsed.config = next.map(PathBuf::from); i += 2; }
            "--out" => { if let Some(p) = next { parsed.out = PathBuf::from(p); } i += 2; }
            "--shader" => { parsed.shader = true; i += 1; }
            other => { log::warn!("Ignoring unknown argument {}", other); i += 1; }
        }
    }
    Some(parsed)
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            SessionConfig::from_json(&json)?
        }
        None => SessionConfig::default(),
    };
    if let Some(size) = args.size { config.dirt.size = size; }
    if let Some(t) = args.threshold { config.dirt.alpha_threshold = t; }

    println!("Processing {} ({}x{} grid, seed {})...", args.image.display(), config.dirt.size, config.dirt.size, args.seed);

    println!("  Building silhouette...");
    let img = image::open(&args.image)?;
    let mask = SilhouetteMask::from_image(&img, config.dirt.size, config.dirt.alpha_threshold)?;
    let size = mask.size();

    println!("  Seeding dirt...");
    let surface = SurfaceRect::new(0.0, 0.0, img.width() as f32, img.height() as f32);
    let session = Session::new(Rc::new(mask), config, surface, args.seed)?;
    report::print(&session);

    println!("  Writing preview...");
    let mut encoder = TextureEncoder::new(size);
    if args.shader {
        encoder.encode(session.dirt());
    } else {
        encoder.encode_debug(session.dirt());
    }
    if let Some(preview) = encoder.to_image() {
        preview.save(&args.out)?;
        println!("  Wrote {}", args.out.display());
    }

    println!("Done!");
    Ok(())
}

fn main() {
    logging::init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: img2mask <image> [--size N] [--seed S] [--threshold T] [--config FILE] [--out FILE] [--shader]");
        std::process::exit(1);
    };

    if let Err(e) = run(args) {
        eprintln!("img2mask: {e}");
        std::process::exit(1);
    }
}
