//! CLI definitions for DeskPilot.

use std::path::PathBuf;

use clap::Parser;

/// DeskPilot CLI.
#[derive(Parser)]
#[command(name = "deskpilot")]
#[command(about = "Run a desktop automation task described in natural language")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.deskpilot/config.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for relative file paths
    #[arg(short, long)]
    pub work_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Task description, e.g. "Открыть калькулятор"
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,
}

impl Cli {
    /// Description words joined with single spaces.
    pub fn description(&self) -> String {
        self.description.join(" ")
    }
}
