use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{BrandError, Result};

/// Legacy key -> canonical key. Older templates still look colors up by the
/// legacy names; they resolve to the canonical value unless the palette file
/// defines them explicitly.
pub const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("indigo", "primary_indigo"),
    ("cyan_turquoise", "accent_teal"),
    ("warm_brown", "secondary_clay"),
    ("light_silver", "neutral_silver"),
    ("neutral_white", "neutral_paper"),
];

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#RRGGBB`, ignoring surrounding whitespace.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !HEX_RE.is_match(raw) {
            return None;
        }
        let r = u8::from_str_radix(&raw[1..3], 16).ok()?;
        let g = u8::from_str_radix(&raw[3..5], 16).ok()?;
        let b = u8::from_str_radix(&raw[5..7], 16).ok()?;
        Some(Rgb { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0.0..=1.0 (ITU-R BT.601 weights).
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// The hex code printed on a background of this color, with black or
    /// white text picked for contrast.
    pub fn ansi_swatch(self) -> String {
        let Rgb { r, g, b } = self;
        let ink = if self.luminance() < 0.5 { "97" } else { "30" };
        format!("\u{1b}[48;2;{r};{g};{b}m\u{1b}[{ink}m {self} \u{1b}[0m")
    }

    /// Channels scaled to 0.0..=1.0, the form PDF color operators take.
    pub fn fractions(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Raw palette entry: a hex string, an `[r, g, b]` array of 0-255 integers,
/// or an array of 0.0-1.0 fractions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawColor {
    Hex(String),
    Channels(Vec<i64>),
    Fractions(Vec<f64>),
}

impl RawColor {
    fn to_rgb(&self) -> Option<Rgb> {
        match self {
            RawColor::Hex(s) => Rgb::from_hex(s),
            RawColor::Channels(c) => match c.as_slice() {
                [r, g, b] => Some(Rgb::new(
                    u8::try_from(*r).ok()?,
                    u8::try_from(*g).ok()?,
                    u8::try_from(*b).ok()?,
                )),
                _ => None,
            },
            RawColor::Fractions(c) => match c.as_slice() {
                [r, g, b] => Some(Rgb::new(
                    fraction_to_channel(*r)?,
                    fraction_to_channel(*g)?,
                    fraction_to_channel(*b)?,
                )),
                _ => None,
            },
        }
    }
}

fn fraction_to_channel(v: f64) -> Option<u8> {
    (0.0..=1.0)
        .contains(&v)
        .then(|| (v * 255.0).round() as u8)
}

#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: BTreeMap<String, Rgb>,
    aliased: BTreeSet<String>,
}

impl Palette {
    pub fn color(&self, name: &str) -> Result<Rgb> {
        self.get(name)
            .ok_or_else(|| BrandError::MissingColor(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.colors.get(name).copied()
    }

    /// True when `name` was filled in from the aliasing table rather than
    /// read from the palette file.
    pub fn is_aliased(&self, name: &str) -> bool {
        self.aliased.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns the first name in `names` that the palette does not define.
    pub fn first_missing<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|n| !self.colors.contains_key(*n))
    }
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    let raw = fs::read_to_string(path)
        .map_err(|e| BrandError::config(path, format!("reading palette file: {e}")))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| BrandError::config(path, format!("parsing JSON: {e}")))?;
    let Value::Object(entries) = value else {
        return Err(BrandError::config(
            path,
            "palette must be a JSON object of color names",
        ));
    };
    let palette = resolve_palette(&entries, LEGACY_ALIASES);
    debug!(
        path = %path.display(),
        colors = palette.len(),
        aliased = palette.aliased.len(),
        "palette loaded"
    );
    Ok(palette)
}

/// Builds a palette from parsed JSON entries and an alias table.
///
/// Entries that are not valid colors are skipped. Each legacy key then takes
/// its canonical key's value unless the entries already defined it with a
/// valid color.
pub fn resolve_palette(entries: &Map<String, Value>, aliases: &[(&str, &str)]) -> Palette {
    let mut colors = BTreeMap::new();
    for (key, value) in entries {
        let parsed = RawColor::deserialize(value)
            .ok()
            .and_then(|raw| raw.to_rgb());
        match parsed {
            Some(rgb) => {
                colors.insert(key.clone(), rgb);
            }
            None => warn!(key = %key, value = %value, "skipping invalid palette entry"),
        }
    }

    let mut aliased = BTreeSet::new();
    for (legacy, canonical) in aliases {
        if colors.contains_key(*legacy) {
            continue;
        }
        if let Some(rgb) = colors.get(*canonical).copied() {
            colors.insert(legacy.to_string(), rgb);
            aliased.insert(legacy.to_string());
        }
    }

    Palette { colors, aliased }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn entries(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    fn brand_json() -> Value {
        json!({
            "primary_indigo": "#2B2D6E",
            "accent_teal": "#17B3A6",
            "secondary_clay": "#8A5A3C",
            "neutral_silver": "#C9CCD1",
            "neutral_paper": "#FAFAF7",
            "highlight": [255, 200, 0]
        })
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::from_hex("#A1B2C3"), Some(Rgb::new(0xA1, 0xB2, 0xC3)));
        assert_eq!(Rgb::from_hex("  #a1b2c3 "), Some(Rgb::new(0xA1, 0xB2, 0xC3)));
        assert_eq!(Rgb::from_hex("123456"), None);
        assert_eq!(Rgb::from_hex("#ffff"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn luminance_orders_dark_before_light() {
        assert_eq!(Rgb::new(0, 0, 0).luminance(), 0.0);
        assert!((Rgb::new(255, 255, 255).luminance() - 1.0).abs() < 1e-6);
        assert!(Rgb::new(0x2B, 0x2D, 0x6E).luminance() < 0.5);
    }

    #[test]
    fn swatch_prints_hex_in_contrasting_ink() {
        let dark = Rgb::new(1, 2, 3).ansi_swatch();
        assert!(dark.starts_with("\u{1b}[48;2;1;2;3m\u{1b}[97m #010203 "));
        assert!(dark.ends_with("\u{1b}[0m"));
        assert!(Rgb::new(0xFA, 0xFA, 0xF7).ansi_swatch().contains("\u{1b}[30m"));
    }

    #[test]
    fn legacy_keys_match_their_canonical_values() {
        let palette = resolve_palette(&entries(brand_json()), LEGACY_ALIASES);
        for (legacy, canonical) in LEGACY_ALIASES {
            assert_eq!(
                palette.get(legacy),
                palette.get(canonical),
                "{legacy} should mirror {canonical}"
            );
            assert!(palette.is_aliased(legacy));
        }
        assert!(!palette.is_aliased("primary_indigo"));
    }

    #[test]
    fn unaliased_keys_pass_through() {
        let palette = resolve_palette(&entries(brand_json()), LEGACY_ALIASES);
        assert_eq!(palette.get("highlight"), Some(Rgb::new(255, 200, 0)));
    }

    #[test]
    fn invalid_legacy_value_is_replaced_by_alias() {
        let raw = entries(json!({"brandBlue": "#1A2B3C", "legacyBlue": "brandBlue-alias"}));
        let palette = resolve_palette(&raw, &[("legacyBlue", "brandBlue")]);
        assert_eq!(palette.color("legacyBlue").unwrap().to_hex(), "#1A2B3C");
        assert!(palette.is_aliased("legacyBlue"));
    }

    #[test]
    fn explicit_legacy_value_wins_over_alias() {
        let mut raw = entries(brand_json());
        raw.insert("indigo".into(), json!("#000080"));
        let palette = resolve_palette(&raw, LEGACY_ALIASES);
        assert_eq!(palette.get("indigo"), Some(Rgb::new(0, 0, 0x80)));
        assert!(!palette.is_aliased("indigo"));
    }

    #[test]
    fn legacy_key_stays_missing_without_canonical() {
        let raw = entries(json!({"accent_teal": "#17B3A6"}));
        let palette = resolve_palette(&raw, LEGACY_ALIASES);
        assert!(palette.get("cyan_turquoise").is_some());
        let err = palette.color("indigo").unwrap_err();
        assert!(
            err.to_string().contains("no color named 'indigo'"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn skips_invalid_entries() {
        let raw = entries(json!({
            "ok": "#010203",
            "short": "#123",
            "channels_out_of_range": [300, 0, 0],
            "two_channels": [1, 2],
            "nested": {"a": 1},
            "number": 7
        }));
        let palette = resolve_palette(&raw, &[]);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get("ok"), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn accepts_fractional_channels() {
        let raw = entries(json!({
            "soft": [0.5, 0.2, 0.1],
            "mixed": [1, 0.5, 0],
            "too_bright": [1.5, 0.0, 0.0],
            "negative": [-0.1, 0.2, 0.3]
        }));
        let palette = resolve_palette(&raw, &[]);
        assert_eq!(palette.get("soft"), Some(Rgb::new(128, 51, 26)));
        assert_eq!(palette.get("mixed"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(palette.get("too_bright"), None);
        assert_eq!(palette.get("negative"), None);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn loads_palette_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", brand_json()).unwrap();
        let palette = load_palette(file.path()).unwrap();
        assert_eq!(palette.color("warm_brown").unwrap().to_hex(), "#8A5A3C");
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brand_colors.json");
        let err = load_palette(&path).unwrap_err();
        assert!(matches!(err, BrandError::Config { .. }), "unexpected: {err:?}");
        assert!(err.to_string().contains("brand_colors.json"));
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"indigo\": \"#111111\",").unwrap();
        let err = load_palette(file.path()).unwrap_err();
        assert!(matches!(err, BrandError::Config { .. }), "unexpected: {err:?}");
        assert!(err.to_string().contains("parsing JSON"));
    }

    #[test]
    fn non_object_json_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[\"#111111\"]").unwrap();
        let err = load_palette(file.path()).unwrap_err();
        assert!(matches!(err, BrandError::Config { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn reports_first_missing_color() {
        let palette = resolve_palette(&entries(brand_json()), LEGACY_ALIASES);
        assert_eq!(palette.first_missing(&["indigo", "warm_brown"]), None);
        assert_eq!(palette.first_missing(&["indigo", "coral"]), Some("coral"));
    }
}
