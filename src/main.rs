mod cli;
mod copy;
mod error;
mod fonts;
mod layout;
mod logging;
mod metrics;
mod palette;
mod pdf;
mod profile;
mod resources;
mod show;
mod templates;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use resources::Resources;
use templates::TemplateKind;

const DEFAULT_OUTPUT_DIR: &str = "output";

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            template,
            output,
            assets,
            profile,
            date,
            create_dirs,
        } => {
            let kind: TemplateKind = template.parse()?;
            let date = date.unwrap_or_else(resources::today);
            let res = Resources::resolve(&assets, profile.as_deref(), &date)?;
            let output = prepare_output(kind, output, create_dirs)?;
            kind.generate(&res, &output)
                .with_context(|| format!("generating {kind}"))?;
            println!("Generated {}", output.display());
        }
        Command::List => {
            for kind in TemplateKind::ALL {
                println!("{:<20} {}", kind.name(), kind.default_file_name());
            }
        }
        Command::Show { assets } => {
            show::run(&assets)?;
        }
        Command::Check { assets, profile } => {
            check(&assets, profile.as_deref())?;
        }
    }

    Ok(())
}

/// Picks the output path. The default location is created on demand; an
/// explicit path's parent only with `--create-dirs`.
fn prepare_output(kind: TemplateKind, output: Option<PathBuf>, create_dirs: bool) -> Result<PathBuf> {
    let (path, create) = match output {
        Some(path) => (path, create_dirs),
        None => (
            Path::new(DEFAULT_OUTPUT_DIR).join(kind.default_file_name()),
            true,
        ),
    };
    if create {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(path)
}

fn check(assets: &Path, profile: Option<&Path>) -> Result<()> {
    let res = Resources::resolve(assets, profile, &resources::today())?;
    for kind in TemplateKind::ALL {
        kind.check_palette(&res)
            .with_context(|| format!("template {kind}"))?;
    }
    println!(
        "ok: {} colors, font {}{}",
        res.palette.len(),
        res.fonts.family(),
        if res.fonts.is_custom() {
            ""
        } else {
            " (built-in fallback)"
        }
    );
    Ok(())
}
