//! Themes: the outer token context components are styled against.
//!
//! A theme is a [`TokenSet`] of global design values plus an optional
//! `components` section holding per-component overrides:
//!
//! ```yaml
//! colorPrimary: "#722ed1"
//! borderRadiusLG: 12
//! components:
//!   Calendar:
//!     fullBg: "#fafafa"
//!     yearControlWidth: 96
//! ```
//!
//! Parsed themes are merged on top of [`default_tokens`], so a theme file only
//! needs to list what it changes.
//!
//! # Loading
//!
//! ```rust
//! use tokenweave::Theme;
//!
//! let theme = Theme::from_yaml(r##"
//! colorPrimary: "#722ed1"
//! components:
//!   Calendar:
//!     fullBg: "#fafafa"
//! "##).unwrap();
//!
//! assert_eq!(theme.tokens().get_str("colorPrimary"), Some("#722ed1"));
//! assert_eq!(theme.tokens().get_number("marginXS"), Some(8.0));
//! assert!(theme.component_overrides("Calendar").is_some());
//! ```

use std::path::{Path, PathBuf};

use crate::error::{ThemeError, TokenError};
use crate::merge::merge;
use crate::token::{TokenKind, TokenSchema, TokenSet, TokenValue};

/// Key of the per-component override section.
pub const COMPONENTS_KEY: &str = "components";

const NUMBER_TOKENS: &[&str] = &[
    "borderRadiusLG",
    "controlHeightSM",
    "fontSize",
    "fontSizeSM",
    "lineHeight",
    "lineHeightSM",
    "lineWidth",
    "lineWidthBold",
    "marginXS",
    "paddingSM",
    "paddingXS",
    "paddingXXS",
    "screenXS",
];

const STRING_TOKENS: &[&str] = &[
    "colorBgContainer",
    "colorPrimary",
    "colorSplit",
    "colorText",
    "componentCls",
    "controlItemBgActive",
    "controlItemBgHover",
    "fontFamily",
    "lineType",
    "motionDurationSlow",
];

/// The declared global tokens and their kinds.
pub fn global_schema() -> TokenSchema {
    TokenSchema::new()
        .declare_all(NUMBER_TOKENS.iter().copied(), TokenKind::Number)
        .declare_all(STRING_TOKENS.iter().copied(), TokenKind::String)
        .declare(COMPONENTS_KEY, TokenKind::Nested)
}

/// The default light theme values.
pub fn default_tokens() -> TokenSet {
    TokenSet::new()
        .with("borderRadiusLG", 8)
        .with("colorBgContainer", "#ffffff")
        .with("colorPrimary", "#1677ff")
        .with("colorSplit", "rgba(5, 5, 5, 0.06)")
        .with("colorText", "rgba(0, 0, 0, 0.88)")
        .with("controlHeightSM", 24)
        .with("controlItemBgActive", "#e6f4ff")
        .with("controlItemBgHover", "rgba(0, 0, 0, 0.04)")
        .with(
            "fontFamily",
            "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, \
             'Noto Sans', sans-serif, 'Apple Color Emoji', 'Segoe UI Emoji', 'Segoe UI Symbol', \
             'Noto Color Emoji'",
        )
        .with("fontSize", 14)
        .with("fontSizeSM", 12)
        .with("lineHeight", 22.0 / 14.0)
        .with("lineHeightSM", 20.0 / 12.0)
        .with("lineType", "solid")
        .with("lineWidth", 1)
        .with("lineWidthBold", 2)
        .with("marginXS", 8)
        .with("motionDurationSlow", "0.3s")
        .with("paddingSM", 12)
        .with("paddingXS", 8)
        .with("paddingXXS", 4)
        .with("screenXS", 480)
}

/// Parses a token map from YAML (or JSON, which YAML accepts).
pub fn parse_tokens(text: &str) -> Result<TokenSet, ThemeError> {
    parse_tokens_at(text, None)
}

fn parse_tokens_at(text: &str, path: Option<&Path>) -> Result<TokenSet, ThemeError> {
    let parse_err = |e: serde_yaml::Error| ThemeError::Parse {
        path: path.map(Path::to_path_buf),
        message: e.to_string(),
    };
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_err)?;
    match value {
        serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value).map_err(parse_err),
        serde_yaml::Value::Null => Ok(TokenSet::new()),
        _ => Err(ThemeError::NotATokenMap {
            path: path.map(Path::to_path_buf),
        }),
    }
}

/// A named token context with optional per-component overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: Option<String>,
    source_path: Option<PathBuf>,
    tokens: TokenSet,
}

impl Theme {
    /// A theme holding exactly `tokens`, without the defaults underneath.
    pub fn from_tokens(tokens: TokenSet) -> Self {
        Self {
            name: None,
            source_path: None,
            tokens,
        }
    }

    /// The default light theme.
    pub fn new() -> Self {
        Self::from_tokens(default_tokens())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides one global token.
    pub fn set(mut self, name: &str, value: impl Into<TokenValue>) -> Self {
        self.tokens = self.tokens.with(name, value);
        self
    }

    /// Replaces the override section of `component`.
    pub fn with_component_overrides(mut self, component: &str, overrides: TokenSet) -> Self {
        let components = self
            .tokens
            .get_nested(COMPONENTS_KEY)
            .cloned()
            .unwrap_or_default()
            .with(component, overrides);
        self.tokens = self.tokens.with(COMPONENTS_KEY, components);
        self
    }

    /// Parses YAML and merges it over the default tokens.
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let overlay = parse_tokens(yaml)?;
        Ok(Self::from_tokens(merge(&default_tokens(), &[&overlay])))
    }

    /// Parses JSON and merges it over the default tokens.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let overlay: TokenSet = serde_json::from_str(json).map_err(|e| ThemeError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        Ok(Self::from_tokens(merge(&default_tokens(), &[&overlay])))
    }

    /// Loads a theme file; the name is taken from the file stem.
    ///
    /// `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let overlay = read_tokens(path)?;
        Ok(Self {
            name: path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string()),
            source_path: Some(path.to_path_buf()),
            tokens: merge(&default_tokens(), &[&overlay]),
        })
    }

    /// Re-reads the theme from its source file.
    ///
    /// A theme that was not loaded from a file is left unchanged.
    pub fn refresh(&mut self) -> Result<(), ThemeError> {
        if let Some(path) = &self.source_path {
            let overlay = read_tokens(path)?;
            self.tokens = merge(&default_tokens(), &[&overlay]);
        }
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    /// The override section for `component`, if the theme has one.
    pub fn component_overrides(&self, component: &str) -> Option<&TokenSet> {
        self.tokens
            .get_nested(COMPONENTS_KEY)
            .and_then(|c| c.get_nested(component))
    }

    /// Checks the global tokens against [`global_schema`].
    pub fn validate(&self) -> Result<(), TokenError> {
        global_schema().validate(&self.tokens)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

fn read_tokens(path: &Path) -> Result<TokenSet, ThemeError> {
    let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).map_err(|e| ThemeError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    } else {
        parse_tokens_at(&content, Some(path))
    }
}
