//! Voiceshape - bakes a narration-driven polygon into a frame track
//!
//! The square outline breathes with the voice: each vertex is pushed out by
//! the energy of its frequency band and the whole shape spins with the highs.

mod cli;

use std::fs::File;
use std::io::{self, BufWriter};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Args;
use voiceshape::audio::AudioDecoder;
use voiceshape::frame::NarrationScene;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs on stderr, track JSON may go to stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let decoder =
        AudioDecoder::new(args.decoder_config()).context("invalid decoder configuration")?;
    let scene = NarrationScene::new(
        args.shape_config(),
        args.analysis_config(),
        args.deform_mapping(),
        args.scene_timing(),
    )
    .context("invalid scene configuration")?;

    // Decode failures abort the run: no partial tracks
    let buffer = decoder
        .decode(&args.audio)
        .with_context(|| format!("failed to load narration {}", args.audio.display()))?;

    let track = scene.bake(Arc::new(buffer))?;

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            track.write_json(BufWriter::new(file), args.pretty)?;
            info!(
                path = %path.display(),
                frames = track.frames.len(),
                updated = track.updated_frames(),
                "frame track written"
            );
        }
        None => {
            track.write_json(io::stdout().lock(), args.pretty)?;
        }
    }

    Ok(())
}
