use std::path::Path;

use anyhow::Result;

use crate::{
    palette::{LEGACY_ALIASES, Palette, load_palette},
    resources::PALETTE_FILE,
};

pub fn run(assets_dir: &Path) -> Result<()> {
    let path = assets_dir.join(PALETTE_FILE);
    let palette = load_palette(&path)?;
    println!("{} ({} colors)", path.display(), palette.len());
    for line in palette_lines(&palette, true) {
        println!("{line}");
    }
    Ok(())
}

/// One line per color. Aliased legacy keys name the key they mirror.
fn palette_lines(palette: &Palette, color: bool) -> Vec<String> {
    let width = palette.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    palette
        .iter()
        .map(|(key, rgb)| {
            let value = if color {
                rgb.ansi_swatch()
            } else {
                format!(" {rgb} ")
            };
            let line = format!("  {key:<width$}  {value}");
            match alias_target(palette, key) {
                Some(canonical) => format!("{line}  = {canonical}"),
                None => line,
            }
        })
        .collect()
}

fn alias_target(palette: &Palette, key: &str) -> Option<&'static str> {
    if !palette.is_aliased(key) {
        return None;
    }
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map(|(_, canonical)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::resolve_palette;

    #[test]
    fn aliased_keys_name_their_canonical_key() {
        let raw = serde_json::json!({"primary_indigo": "#2B2D6E", "coral": "#FF7F50"});
        let palette = resolve_palette(raw.as_object().unwrap(), LEGACY_ALIASES);
        let lines = palette_lines(&palette, false);
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&"  coral            #FF7F50 ".to_string()), "{lines:?}");
        assert!(
            lines
                .iter()
                .any(|l| l.trim_start().starts_with("indigo ") && l.ends_with("= primary_indigo")),
            "{lines:?}"
        );
    }

    #[test]
    fn explicit_legacy_keys_are_not_marked() {
        let raw = serde_json::json!({"primary_indigo": "#2B2D6E", "indigo": "#000080"});
        let palette = resolve_palette(raw.as_object().unwrap(), LEGACY_ALIASES);
        assert!(palette_lines(&palette, false).iter().all(|l| !l.contains('=')));
    }
}
