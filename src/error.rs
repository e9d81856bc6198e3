//! Error types for the catalog.
//!
//! | Variant | Raised by | Recovered? |
//! |---------|-----------|------------|
//! | [`Validation`](CatalogError::Validation) | entity constructors | No, the construction attempt fails |
//! | [`MissingSource`](CatalogError::MissingSource) | `copy_from` | No |
//! | [`Parse`](CatalogError::Parse) | record parser | Yes, the line is skipped during a load |
//! | [`Io`](CatalogError::Io) | load / save | Load falls back to sample data, save reports |
//! | [`TypeMismatch`](CatalogError::TypeMismatch) | cross-variant comparison | No |
//! | [`Computation`](CatalogError::Computation) | derived facts | No |
//!
//! A name lookup that finds nothing is not an error: lookups return `Option`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::BodyKind;

/// Why a derived quantity could not be computed.
#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationKind {
    #[strum(to_string = "luminosity must be greater than zero")]
    NonPositiveLuminosity,
    #[strum(to_string = "mass must be greater than zero")]
    NonPositiveMass,
    #[strum(to_string = "radius must be greater than zero")]
    ZeroRadius,
    #[strum(to_string = "volume must be greater than zero")]
    ZeroVolume,
    #[strum(to_string = "result is not a finite number")]
    NotFinite,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("cannot copy from an absent {0}")]
    MissingSource(BodyKind),

    #[error("malformed record: {0}")]
    Parse(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot compare a {left} with a {right}")]
    TypeMismatch { left: BodyKind, right: BodyKind },

    #[error("cannot compute {quantity}: {kind}")]
    Computation {
        quantity: &'static str,
        kind: ComputationKind,
    },

    #[error("configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn computation(quantity: &'static str, kind: ComputationKind) -> Self {
        Self::Computation { quantity, kind }
    }

    /// True for an I/O failure caused by the file not existing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
