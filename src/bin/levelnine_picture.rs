//! Render one picture from a picture file to a PPM image
use levelnine::config::Config;
use levelnine::gfx::GraphicsEngine;
use levelnine::picture::PictureData;
use log::{debug, info};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <picture_file> <picture_id>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(path: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let code: u16 = id
        .parse()
        .map_err(|_| format!("invalid picture id: {id}"))?;

    let bytes = std::fs::read(path).map_err(|e| format!("cannot read picture file '{path}': {e}"))?;
    let pictures = PictureData::from_bytes(bytes)?;

    let mut engine = GraphicsEngine::new(pictures);
    engine.draw_picture(code)?;
    if engine.state.scale_overflows > 0 {
        info!("{} scale overflows", engine.state.scale_overflows);
    }

    let output = &config.graphics.output;
    debug!("writing {}", output.display());
    let mut out = BufWriter::new(File::create(output)?);
    engine.write_ppm(&mut out, &config.graphics.colours)?;
    out.flush()?;
    Ok(())
}
