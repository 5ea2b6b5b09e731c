//! Generates the keyboard case as OpenSCAD files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use dactyl_scad::output::write_parts;
use dactyl_scad::parts::{generate, GenerationMode};

/// Dactyl case generator - writes one OpenSCAD file per printable part
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the .scad files are written to
    #[arg(short, long, value_name = "DIR", default_value = "out")]
    out_dir: PathBuf,

    /// What to generate
    #[arg(short, long, value_enum, default_value_t = GenerationMode::Case)]
    mode: GenerationMode,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!(mode = %args.mode, "generating");
    let parts = generate(args.mode).with_context(|| format!("Failed to generate {}", args.mode))?;
    let written = write_parts(&args.out_dir, &parts)?;
    info!(files = written.len(), dir = %args.out_dir.display(), "done");

    Ok(())
}
