use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    copy::DocumentCopy,
    error::Result,
    fonts::{FontResolution, resolve_fonts},
    palette::{Palette, load_palette},
    profile::{AssetNames, load_profile},
};

pub const PALETTE_FILE: &str = "brand_colors.json";

/// Everything a template draws with, resolved once before any drawing.
#[derive(Debug, Clone)]
pub struct Resources {
    pub palette: Palette,
    pub fonts: FontResolution,
    pub copy: DocumentCopy,
    pub assets: AssetNames,
    pub assets_dir: PathBuf,
}

impl Resources {
    pub fn resolve(assets_dir: &Path, profile: Option<&Path>, date: &str) -> Result<Self> {
        let palette = load_palette(&assets_dir.join(PALETTE_FILE))?;
        let profile = load_profile(profile, assets_dir)?;
        let copy = DocumentCopy::render(&profile, date)?;
        let fonts = resolve_fonts(assets_dir);
        info!(
            colors = palette.len(),
            font = fonts.family(),
            custom_font = fonts.is_custom(),
            "brand resources resolved"
        );
        Ok(Resources {
            palette,
            fonts,
            copy,
            assets: profile.assets,
            assets_dir: assets_dir.to_path_buf(),
        })
    }

    pub fn asset(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name)
    }
}

/// Today's date the way documents print it, e.g. `18 October 2026`.
pub fn today() -> String {
    chrono::Local::now().format("%d %B %Y").to_string()
}
