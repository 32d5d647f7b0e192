use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Brandkit CLI entrypoint.
#[derive(Parser, Debug)]
#[command(name = "brandkit", version, about = "Brand document generator")]
pub struct Cli {
    /// Show debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template to a PDF.
    Generate {
        /// Template name (see `brandkit list`).
        #[arg(short, long)]
        template: String,
        /// Output PDF path (default: output/<template default name>).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Directory holding brand_colors.json, fonts and images.
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// Brand profile TOML (default: <assets>/brand.toml when present).
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Date printed on the document (default: today).
        #[arg(long)]
        date: Option<String>,
        /// Create the output's parent directory if it does not exist.
        #[arg(long)]
        create_dirs: bool,
    },
    /// List available templates.
    List,
    /// Show palette values with color swatches.
    Show {
        /// Directory holding brand_colors.json.
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
    },
    /// Validate palette, fonts and profile without writing outputs.
    Check {
        /// Directory holding brand_colors.json, fonts and images.
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// Brand profile TOML (default: <assets>/brand.toml when present).
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}
