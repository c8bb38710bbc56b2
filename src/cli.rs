use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Terminal story player for release themes", long_about = None)]
pub struct Cli {
    /// Catalog file (TOML); uses the built-in release catalog when absent
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Auto-advance slide duration in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub slide_duration: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the themes in the catalog
    Themes,

    /// List the tracks of a theme
    Tracks {
        /// Theme id (see `themes`)
        theme: String,
    },
}
