//! Custom font discovery with a built-in fallback.
//!
//! The resolver probes a fixed list of candidate locations for a regular and
//! bold pair, loads the first complete pair it finds and hands the result to
//! the canvas as an explicit value. Any failure degrades to Helvetica.

use std::{
    fs,
    path::{Path, PathBuf},
};

use fontdue::{Font, FontSettings};
use tracing::{debug, info, warn};

use crate::{
    error::FontError,
    metrics::{FIRST_CHAR, LAST_CHAR, WidthTable, win_ansi_char},
};

pub const CUSTOM_FAMILY: &str = "Satoshi";
pub const FALLBACK_FAMILY: &str = "Helvetica";

const REGULAR_FILE: &str = "Satoshi-Regular.ttf";
const BOLD_FILE: &str = "Satoshi-Bold.ttf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Face {
    Regular,
    Bold,
}

/// A loaded font file ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub base_name: String,
    pub data: Vec<u8>,
    pub widths: WidthTable,
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    /// Union of glyph bounds over the WinAnsi range, `[x_min, y_min, x_max, y_max]`.
    pub bbox: [i64; 4],
}

impl FontFace {
    pub fn load(base_name: &str, path: &Path) -> Result<Self, FontError> {
        let data = fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(base_name, path, data)
    }

    fn parse(base_name: &str, path: &Path, data: Vec<u8>) -> Result<Self, FontError> {
        let font = Font::from_bytes(data.as_slice(), FontSettings::default()).map_err(|e| {
            FontError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let space = font.metrics(' ', 1000.0).advance_width;
        let widths = WidthTable::from_fn(|code| {
            let advance = win_ansi_char(code)
                .map(|ch| font.metrics(ch, 1000.0).advance_width)
                .unwrap_or(space);
            advance.round().max(0.0) as u16
        });
        let (ascent, descent) = font
            .horizontal_line_metrics(1000.0)
            .map(|m| (m.ascent.round() as i64, m.descent.round() as i64))
            .unwrap_or((800, -200));

        let bounds = |ch: char| {
            let b = font.metrics(ch, 1000.0).bounds;
            (b.width > 0.0 && b.height > 0.0)
                .then(|| [b.xmin, b.ymin, b.xmin + b.width, b.ymin + b.height])
        };
        let bbox = (FIRST_CHAR..=LAST_CHAR)
            .filter_map(win_ansi_char)
            .filter_map(bounds)
            .reduce(|a, b| [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])])
            .map(|b| b.map(|v| v.round() as i64))
            .unwrap_or([0, descent, 1000, ascent]);
        let cap_height = bounds('H').map(|b| b[3].round() as i64).unwrap_or(ascent);

        Ok(FontFace {
            base_name: base_name.to_string(),
            data,
            widths,
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomFamily {
    pub regular: FontFace,
    pub bold: FontFace,
}

/// Which family the drawing code should use.
#[derive(Debug, Clone, PartialEq)]
pub struct FontResolution {
    family: String,
    custom: Option<CustomFamily>,
}

impl FontResolution {
    pub fn fallback() -> Self {
        FontResolution {
            family: FALLBACK_FAMILY.to_string(),
            custom: None,
        }
    }

    pub fn custom(family: &str, faces: CustomFamily) -> Self {
        FontResolution {
            family: family.to_string(),
            custom: Some(faces),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// The embedded face for `face`, or `None` when the built-in family is
    /// active.
    pub fn face(&self, face: Face) -> Option<&FontFace> {
        self.custom.as_ref().map(|c| match face {
            Face::Regular => &c.regular,
            Face::Bold => &c.bold,
        })
    }

    /// PDF base font name for `face`.
    pub fn base_name(&self, face: Face) -> String {
        match (self.face(face), face) {
            (Some(f), _) => f.base_name.clone(),
            (None, Face::Regular) => FALLBACK_FAMILY.to_string(),
            (None, Face::Bold) => format!("{FALLBACK_FAMILY}-Bold"),
        }
    }
}

/// A location that qualifies only when both files exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCandidate {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl FontCandidate {
    fn in_dir(dir: &Path) -> Self {
        FontCandidate {
            regular: dir.join(REGULAR_FILE),
            bold: dir.join(BOLD_FILE),
        }
    }

    fn is_complete(&self) -> bool {
        self.regular.is_file() && self.bold.is_file()
    }
}

/// Candidate locations in probe order: `<assets>/fonts`, then the project
/// root (the parent of the assets directory).
pub fn font_candidates(assets_dir: &Path) -> Vec<FontCandidate> {
    let mut candidates = vec![FontCandidate::in_dir(&assets_dir.join("fonts"))];
    let root = match assets_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    candidates.push(FontCandidate::in_dir(&root));
    candidates
}

pub fn load_family(candidate: &FontCandidate) -> Result<CustomFamily, FontError> {
    Ok(CustomFamily {
        regular: FontFace::load(&format!("{CUSTOM_FAMILY}-Regular"), &candidate.regular)?,
        bold: FontFace::load(&format!("{CUSTOM_FAMILY}-Bold"), &candidate.bold)?,
    })
}

pub fn resolve_fonts(assets_dir: &Path) -> FontResolution {
    resolve_with(&font_candidates(assets_dir), load_family)
}

/// Probes `candidates` in order and loads the first complete pair with
/// `load`. Never fails: missing or unloadable fonts yield the fallback.
pub fn resolve_with<F>(candidates: &[FontCandidate], load: F) -> FontResolution
where
    F: Fn(&FontCandidate) -> Result<CustomFamily, FontError>,
{
    let Some(found) = candidates.iter().find(|c| c.is_complete()) else {
        debug!("no custom font pair found; using {FALLBACK_FAMILY}");
        return FontResolution::fallback();
    };

    match load(found) {
        Ok(faces) => {
            info!(
                family = CUSTOM_FAMILY,
                regular = %found.regular.display(),
                "custom font registered"
            );
            FontResolution::custom(CUSTOM_FAMILY, faces)
        }
        Err(err) => {
            warn!("{err}; falling back to {FALLBACK_FAMILY}");
            FontResolution::fallback()
        }
    }
}

#[cfg(test)]
pub(crate) fn stub_face(base_name: &str) -> FontFace {
    FontFace {
        base_name: base_name.to_string(),
        data: b"stub font bytes".to_vec(),
        widths: WidthTable::helvetica(false),
        ascent: 750,
        descent: -250,
        cap_height: 700,
        bbox: [-100, -250, 1000, 750],
    }
}
