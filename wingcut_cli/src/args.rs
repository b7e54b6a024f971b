use std::path::PathBuf;

use clap::Parser;

/// Separate moth specimen photographs into wing and body components
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Args {
    /// Image files to process
    #[arg(short, long, num_args = 1..)]
    pub image: Vec<PathBuf>,

    /// Directories searched recursively for jpg/jpeg/png images
    #[arg(short, long, num_args = 1..)]
    pub recursive: Vec<PathBuf>,

    /// Revisit images already marked done
    #[arg(short, long, default_value_t = false)]
    pub all: bool,

    /// Configuration file (YAML)
    #[arg(short, long, default_value = "wingcut.yaml")]
    pub config: PathBuf,

    /// Metadata directory, overrides the configured one
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Scripted interaction replayed on every visited image (YAML)
    #[arg(short, long)]
    pub script: Option<PathBuf>,
}
