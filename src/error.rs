//! Error types for catalog loading and configuration parsing.

use core::fmt;

/// A color literal that is not `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl ColorParseError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color literal {:?} (expected #rrggbb)", self.input)
    }
}

impl std::error::Error for ColorParseError {}

/// Failure while loading or parsing a catalog file (flags, default texts,
/// translation bundles). Callers normally degrade to built-in defaults.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "catalog read failed: {err}"),
            CatalogError::Parse(err) => write!(f, "catalog parse failed: {err}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}
