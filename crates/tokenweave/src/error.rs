//! Error types for token resolution, theme loading and the style registry.
//!
//! Every error is local to a single resolution call. A failed resolution never
//! leaves anything behind in the style cache.

use std::path::PathBuf;

use thiserror::Error;

use crate::token::TokenKind;

/// Error raised while merging, validating or deriving tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    /// An overlay or builder names a token the schema does not declare.
    #[error("token '{name}' is not declared in the schema")]
    InvalidToken { name: String },

    /// A token needed by a derivation or a builder is absent.
    #[error("missing token '{token}' (required by '{required_by}')")]
    MissingToken { token: String, required_by: String },

    /// A token exists but holds a different kind of value.
    #[error("token '{name}' should be {expected}, found {found}")]
    KindMismatch {
        name: String,
        expected: TokenKind,
        found: TokenKind,
    },

    /// A numeric derivation produced NaN or an infinity.
    #[error("derived token '{name}' is not a finite number")]
    NonFinite { name: String },
}

impl TokenError {
    pub(crate) fn missing(token: impl Into<String>, required_by: impl Into<String>) -> Self {
        TokenError::MissingToken {
            token: token.into(),
            required_by: required_by.into(),
        }
    }
}

/// Error raised while loading a theme from text or from disk.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The theme text is not valid YAML or JSON.
    #[error("failed to parse theme{}: {message}", display_path(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// The theme parsed, but its top level is not a map of tokens.
    #[error("theme{} must be a map of token names to values", display_path(.path))]
    NotATokenMap { path: Option<PathBuf> },

    /// The theme file could not be read.
    #[error("failed to read theme {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

/// Error raised by the style registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No component was registered under this name.
    #[error("no styles registered for component '{0}'")]
    UnknownComponent(String),

    /// Token resolution for the component failed.
    #[error("cannot resolve styles for '{component}'")]
    Token {
        component: String,
        #[source]
        source: TokenError,
    },
}

impl RegistryError {
    /// Returns the underlying token error, if this is a resolution failure.
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            RegistryError::Token { source, .. } => Some(source),
            RegistryError::UnknownComponent(_) => None,
        }
    }
}
