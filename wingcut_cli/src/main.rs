mod args;
mod config;
mod export;
mod image_io;
mod metadata;
mod navigator;
mod script;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use crate::args::Args;
use crate::config::Config;
use crate::metadata::MetadataStore;
use crate::navigator::Navigator;
use crate::script::Script;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(&args.config);
    common::setup_logging(&config.log_level);

    let images = collect_images(&args)?;
    if images.is_empty() {
        warn!("no images to process");
        return Ok(());
    }

    let metadata_dir = args.metadata.clone().unwrap_or_else(|| config.metadata_dir.clone());
    let metadata = MetadataStore::open(&metadata_dir)?;
    let script = args.script.as_deref().map(Script::load).transpose()?;

    let summary = Navigator::new(&config, metadata, script, args.all).run(&images)?;
    info!(
        "visited {}, saved {}, skipped {}, failed {}",
        summary.visited, summary.saved, summary.skipped, summary.failed
    );
    Ok(())
}

fn collect_images(args: &Args) -> anyhow::Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = args.image.iter().map(|p| absolute(p)).collect();
    for dir in &args.recursive {
        images.extend(find_images(&absolute(dir))?);
    }
    Ok(images)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Every jpg/jpeg/png below `dir`, grouped by extension like the glob order.
fn find_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        let pattern = format!("{}/**/*.{ext}", dir.display());
        let paths = glob::glob(&pattern).with_context(|| format!("bad search pattern {pattern}"))?;
        for entry in paths {
            match entry {
                Ok(path) => found.push(path),
                Err(err) => warn!("skipping unreadable path: {err}"),
            }
        }
    }
    Ok(found)
}
