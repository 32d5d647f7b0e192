//! Brand profile: company details, asset names and document copy.
//!
//! Every field has a default, so a profile file only needs the values it
//! changes. Text fields are rendered through `copy` and may use
//! `{{ company.* }}` and `{{ date }}`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BrandError, Result};

pub const PROFILE_FILE: &str = "brand.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BrandProfile {
    pub company: Company,
    pub assets: AssetNames,
    pub footer: Footer,
    pub letterhead: LetterheadCopy,
    pub cover: CoverCopy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    pub legal_name: String,
    pub registration: String,
    pub address: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub social: String,
}

impl Default for Company {
    fn default() -> Self {
        Company {
            name: "ACCESS DISCREETKIT LTD".into(),
            legal_name: "Access DiscreetKit Ltd".into(),
            registration: "Registered in Ghana".into(),
            address: "House No. 57, Kofi Annan East Avenue, Madina, Accra".into(),
            website: "www.discreetkit.com".into(),
            email: "info@discreetkit.com".into(),
            phone: "+233 20 300 1107".into(),
            social: "Twitter: @discreetkit | LinkedIn: /company/discreetkit".into(),
        }
    }
}

/// Image file names, relative to the assets directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetNames {
    pub logo: String,
    pub fallback_logo: String,
    pub watermark: String,
    pub icon: String,
    pub watermark_icon: String,
}

impl Default for AssetNames {
    fn default() -> Self {
        AssetNames {
            logo: "logos/logo_small.png".into(),
            fallback_logo: "logo.png".into(),
            watermark: "watermark.png".into(),
            icon: "Artboard 2.png".into(),
            watermark_icon: "Artboard 8.png".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Footer {
    pub lines: Vec<String>,
}

impl Default for Footer {
    fn default() -> Self {
        Footer {
            lines: vec![
                "{{ company.legal_name }} | {{ company.registration }}".into(),
                "{{ company.website }} | {{ company.email }} | {{ company.phone }}".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LetterheadCopy {
    pub subject: String,
    pub recipient: Vec<String>,
    pub body: Vec<String>,
}

impl Default for LetterheadCopy {
    fn default() -> Self {
        let body = [
            "Dear Mr. Doe,",
            "",
            "We are writing to propose a strategic partnership between {{ company.legal_name }} \
             and Innovate Corp. Our goal is to leverage our combined strengths to drive \
             innovation and create mutually beneficial opportunities.",
            "",
            "Our analysis indicates that a collaboration could unlock significant value in the \
             market. We have attached a detailed proposal for your review and would be pleased \
             to discuss this further at your convenience.",
            "",
            "Thank you for considering our proposal. We look forward to the possibility of \
             working together.",
            "",
            "Sincerely,",
            "",
            "Jane Smith",
            "Director of Business Development",
            "{{ company.legal_name }}",
        ];
        LetterheadCopy {
            subject: "Proposal for Strategic Partnership".into(),
            recipient: vec![
                "Mr. John Doe".into(),
                "Chief Executive Officer".into(),
                "Innovate Corp.".into(),
                "123 Innovation Drive, Accra, Ghana".into(),
            ],
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoverCopy {
    pub title: String,
    pub subtitle: String,
}

impl Default for CoverCopy {
    fn default() -> Self {
        CoverCopy {
            title: "Access DiscreetKit".into(),
            subtitle: "Investor Pack".into(),
        }
    }
}

/// Loads the profile at `explicit`, else `<assets>/brand.toml` when it
/// exists, else the built-in defaults.
pub fn load_profile(explicit: Option<&Path>, assets_dir: &Path) -> Result<BrandProfile> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = assets_dir.join(PROFILE_FILE);
            if !candidate.is_file() {
                debug!("no brand profile found; using defaults");
                return Ok(BrandProfile::default());
            }
            candidate
        }
    };
    let raw = fs::read_to_string(&path)
        .map_err(|e| BrandError::config(&path, format!("reading brand profile: {e}")))?;
    let profile: BrandProfile = toml::from_str(&raw)
        .map_err(|e| BrandError::config(&path, format!("parsing TOML: {e}")))?;
    debug!(path = %path.display(), "brand profile loaded");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_keeps_defaults() {
        let profile: BrandProfile = toml::from_str(
            r#"
[company]
legal_name = "Northwind Ltd"

[cover]
subtitle = "Annual Report"
"#,
        )
        .unwrap();
        assert_eq!(profile.company.legal_name, "Northwind Ltd");
        assert_eq!(profile.company.website, "www.discreetkit.com");
        assert_eq!(profile.cover.subtitle, "Annual Report");
        assert_eq!(profile.cover.title, "Access DiscreetKit");
        assert_eq!(profile.footer.lines.len(), 2);
    }

    #[test]
    fn defaults_when_no_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let profile = load_profile(None, dir.path()).unwrap();
        assert_eq!(profile.assets.watermark, "watermark.png");
        assert_eq!(profile.letterhead.recipient.len(), 4);
    }

    #[test]
    fn reads_profile_from_assets_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROFILE_FILE),
            "[letterhead]\nsubject = \"Quarterly Update\"\n",
        )
        .unwrap();
        let profile = load_profile(None, dir.path()).unwrap();
        assert_eq!(profile.letterhead.subject, "Quarterly Update");
    }

    #[test]
    fn missing_explicit_profile_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_profile(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
        assert!(matches!(err, BrandError::Config { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[company\nname = 1").unwrap();
        let err = load_profile(Some(&path), dir.path()).unwrap_err();
        assert!(err.to_string().contains("parsing TOML"), "unexpected: {err}");
    }
}
