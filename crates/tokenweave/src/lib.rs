//! # Tokenweave - design tokens in, component style trees out
//!
//! Tokenweave turns a theme's design tokens into per-component style trees.
//! A component declares how its own tokens default from the theme and which
//! tokens derive from others; a pure builder then maps the resolved tokens to a
//! nested [`StyleNode`] tree. Built trees are cached by component name and a
//! fingerprint of the resolved tokens, so styling the same component against
//! the same theme twice builds once.
//!
//! ## Pipeline
//!
//! ```text
//! Theme tokens ─► component defaults ─► theme overrides ─► derived tokens
//!                                                              │
//!                       cache (name, fingerprint) ◄── builder ◄┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tokenweave::components::{calendar_component, CALENDAR};
//! use tokenweave::{to_css, StyleRegistry, Theme};
//!
//! let registry = StyleRegistry::new();
//! let calendar = registry.register(calendar_component());
//!
//! let theme = Theme::new();
//! let tree = calendar.styles_for_theme(&theme, "ant-picker").unwrap();
//! let css = to_css(&tree);
//!
//! assert!(css.contains(".ant-picker-calendar-rtl {\n  direction: rtl;\n}"));
//!
//! // Same theme, same prefix: served from the cache.
//! let again = registry.styles_for(CALENDAR, theme.tokens(), "ant-picker").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&tree, &again));
//! ```
//!
//! ## Core Concepts
//!
//! - [`TokenSet`] / [`TokenValue`]: immutable token maps with typed values
//! - [`merge`] / [`TokenMerger`]: right-biased overlays, optionally schema-checked
//! - [`DerivedTokenCalculator`]: pure rules computing secondary tokens
//! - [`StyleNode`]: the style tree, rendered with [`to_css`] or serde
//! - [`StyleRegistry`]: component registration and the style cache
//! - [`Theme`]: token defaults, per-component overrides, YAML/JSON loading
//!
//! The [`form`] module carries the explicit scope used to hand form-bound
//! controls their form, and [`is_numeric_like`] is the shared numeric check.

pub mod components;
pub mod derive;
mod error;
pub mod form;
pub mod merge;
pub mod registry;
pub mod style;
pub mod theme;
pub mod token;
mod util;

// Errors
pub use error::{RegistryError, ThemeError, TokenError};

// Tokens
pub use token::{Fingerprint, TokenKind, TokenReader, TokenSchema, TokenSet, TokenValue};

// Resolution
pub use derive::{Derivation, DerivedTokenCalculator};
pub use merge::{merge, TokenMerger};

// Style trees
pub use style::{kebab_case, reset_component, to_css, MediaQuery, PropValue, Property, StyleNode};

// Registration and caching
pub use registry::{
    register, register_component, reset_style_cache, styles_for, CacheKey, CacheStats,
    ComponentStyle, StyleAccessor, StyleCache, StyleRegistry,
};

// Themes
pub use theme::{default_tokens, global_schema, Theme, COMPONENTS_KEY};

// Collaborators
pub use form::{active_form_handle, try_active_form_handle, FormError, FormHandle, Scope};
pub use util::{is_numeric_like, NumericLike};
