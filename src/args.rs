//! Command-line arguments of the configuration check.

use clap::Parser;
use std::path::PathBuf;

/// Check a SchemaCanvas canvas configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Canvas configuration file (JSON or TOML); the platform default when omitted
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the defaults when the configuration file does not exist yet
    #[arg(long)]
    pub init: bool,
}
