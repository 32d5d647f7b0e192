use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandError {
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("palette has no color named '{0}'")]
    MissingColor(String),

    #[error("copy template '{name}' failed to render: {message}")]
    Copy { name: String, message: String },

    #[error("unknown template '{name}' (available: {available})")]
    UnknownTemplate { name: String, available: String },

    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}

impl BrandError {
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        BrandError::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Font loading failures. Never surfaced to the user: the font resolver
/// logs them and falls back to the built-in family.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("reading font {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing font {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Image assets that could not be embedded. Layout code falls back to a
/// placeholder or skips the element.
#[derive(Error, Debug)]
#[error("loading image {}: {message}", path.display())]
pub struct AssetError {
    pub path: PathBuf,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, BrandError>;
