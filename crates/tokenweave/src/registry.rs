//! Component style registration and the process-wide style cache.
//!
//! A component registers a name, a builder and a defaults function. Styling it
//! against a theme runs the resolution pipeline:
//!
//! 1. seed `componentCls` (`.` + the prefix class) into the theme tokens
//! 2. merge the component defaults, then the theme's override section for the
//!    component (strictly, when the component declares a schema)
//! 3. resolve derived tokens
//! 4. fingerprint the resolved set and look up `(name, fingerprint)` in the
//!    cache; build and insert on a miss
//!
//! Builders are pure, so a cached tree is always the tree a rebuild would
//! produce. Entries are never evicted; [`reset_style_cache`] exists for test
//! isolation.
//!
//! # Concurrency
//!
//! The registry and cache sit behind `RwLock`s. Builders run outside any lock,
//! so two threads missing on the same key may both build. Insertion keeps the
//! first tree and hands it to both callers, so every caller sees the same
//! `Arc`. A failed resolution inserts nothing.
//!
//! # Example
//!
//! ```rust
//! use tokenweave::{StyleNode, StyleRegistry, TokenSet};
//!
//! let registry = StyleRegistry::new();
//! let badge = registry.register_fn(
//!     "Badge",
//!     |tokens| {
//!         let t = tokens.reader("Badge");
//!         Ok(StyleNode::root().child(
//!             StyleNode::new(t.text("componentCls")?).prop("height", t.number("badgeHeight")?),
//!         ))
//!     },
//!     |_| TokenSet::new().with("badgeHeight", 20),
//! );
//!
//! let first = badge.styles(&TokenSet::new(), "ant-badge").unwrap();
//! let second = badge.styles(&TokenSet::new(), "ant-badge").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::derive::DerivedTokenCalculator;
use crate::error::{RegistryError, TokenError};
use crate::merge::TokenMerger;
use crate::style::StyleNode;
use crate::theme::{Theme, COMPONENTS_KEY};
use crate::token::{Fingerprint, TokenKind, TokenSchema, TokenSet, TokenValue};

type StyleBuilder = Arc<dyn Fn(&TokenSet) -> Result<StyleNode, TokenError> + Send + Sync>;
type DefaultsFn = Arc<dyn Fn(&TokenSet) -> TokenSet + Send + Sync>;

/// A registered component: builder, defaults and optional derivations/schema.
#[derive(Clone)]
pub struct ComponentStyle {
    name: String,
    builder: StyleBuilder,
    defaults: DefaultsFn,
    derivations: DerivedTokenCalculator,
    schema: Option<TokenSchema>,
}

impl ComponentStyle {
    pub fn new<B, D>(name: impl Into<String>, builder: B, defaults: D) -> Self
    where
        B: Fn(&TokenSet) -> Result<StyleNode, TokenError> + Send + Sync + 'static,
        D: Fn(&TokenSet) -> TokenSet + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            builder: Arc::new(builder),
            defaults: Arc::new(defaults),
            derivations: DerivedTokenCalculator::new(),
            schema: None,
        }
    }

    /// Sets the derivations applied after merging.
    pub fn with_derivations(mut self, derivations: DerivedTokenCalculator) -> Self {
        self.derivations = derivations;
        self
    }

    /// Declares the component's own tokens; overlays are then merged strictly.
    pub fn with_schema(mut self, schema: TokenSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&TokenSchema> {
        self.schema.as_ref()
    }

    /// Runs steps 1 to 3 of the pipeline and returns the resolved token set.
    pub fn resolve_tokens(&self, theme: &TokenSet, prefix_cls: &str) -> Result<TokenSet, TokenError> {
        let outer = theme
            .without(COMPONENTS_KEY)
            .with("componentCls", format!(".{}", prefix_cls));
        let defaults = (self.defaults)(&outer);
        let overrides = self.overrides(theme)?;

        let merger = match &self.schema {
            Some(schema) => TokenMerger::strict(schema.clone()),
            None => TokenMerger::new(),
        };
        let merged = merger.merge(&outer, &[&defaults, &overrides])?;
        self.derivations.resolve(&merged)
    }

    /// The theme's `components.<Name>` section; absent sections are empty.
    fn overrides(&self, theme: &TokenSet) -> Result<TokenSet, TokenError> {
        let section = match theme.get(COMPONENTS_KEY) {
            None => return Ok(TokenSet::new()),
            Some(TokenValue::Nested(section)) => section,
            Some(other) => {
                return Err(TokenError::KindMismatch {
                    name: COMPONENTS_KEY.to_string(),
                    expected: TokenKind::Nested,
                    found: other.kind(),
                })
            }
        };
        match section.get(&self.name) {
            None => Ok(TokenSet::new()),
            Some(TokenValue::Nested(overrides)) => Ok(overrides.clone()),
            Some(other) => Err(TokenError::KindMismatch {
                name: format!("{}.{}", COMPONENTS_KEY, self.name),
                expected: TokenKind::Nested,
                found: other.kind(),
            }),
        }
    }

    /// Invokes the builder directly, bypassing the cache.
    pub fn build(&self, resolved: &TokenSet) -> Result<StyleNode, TokenError> {
        (self.builder)(resolved)
    }
}

impl fmt::Debug for ComponentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStyle")
            .field("name", &self.name)
            .field("derivations", &self.derivations)
            .field("strict", &self.schema.is_some())
            .finish_non_exhaustive()
    }
}

/// Cache key: component name plus resolved-token fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub component: String,
    pub fingerprint: Fingerprint,
}

/// Hit and miss counters of a [`StyleCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Write-once-per-key store of built style trees.
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: RwLock<HashMap<CacheKey, Arc<StyleNode>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a tree, counting the hit or miss.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<StyleNode>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Inserts `tree` unless the key is already present.
    ///
    /// Returns whichever tree ends up stored under `key`.
    pub fn insert(&self, key: CacheKey, tree: StyleNode) -> Arc<StyleNode> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert_with(|| Arc::new(tree)).clone()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drops every entry and zeroes the counters.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Registered components plus their shared style cache.
///
/// [`StyleRegistry::global`] is the process-wide instance behind the free
/// functions; [`StyleRegistry::new`] gives an isolated one.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    components: RwLock<HashMap<String, Arc<ComponentStyle>>>,
    cache: StyleCache,
}

static GLOBAL_REGISTRY: Lazy<StyleRegistry> = Lazy::new(StyleRegistry::new);

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static StyleRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers a component, replacing any earlier one with the same name.
    ///
    /// Cached trees are kept: re-registering the same component is cheap and
    /// keeps serving the trees already built.
    pub fn register(&self, component: ComponentStyle) -> StyleAccessor<'_> {
        let component = Arc::new(component);
        let previous = self
            .components
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(component.name.clone(), Arc::clone(&component));
        debug!(
            "{} component styles for {}",
            if previous.is_some() { "re-registered" } else { "registered" },
            component.name
        );
        StyleAccessor {
            registry: self,
            component,
        }
    }

    /// Registers a component from a builder and a defaults function.
    pub fn register_fn<B, D>(&self, name: &str, builder: B, defaults: D) -> StyleAccessor<'_>
    where
        B: Fn(&TokenSet) -> Result<StyleNode, TokenError> + Send + Sync + 'static,
        D: Fn(&TokenSet) -> TokenSet + Send + Sync + 'static,
    {
        self.register(ComponentStyle::new(name, builder, defaults))
    }

    /// Returns an accessor for a registered component.
    pub fn get(&self, name: &str) -> Option<StyleAccessor<'_>> {
        let component = self
            .components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;
        Some(StyleAccessor {
            registry: self,
            component,
        })
    }

    /// Registered component names, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Styles the named component.
    pub fn styles_for(
        &self,
        name: &str,
        theme: &TokenSet,
        prefix_cls: &str,
    ) -> Result<Arc<StyleNode>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownComponent(name.to_string()))?
            .styles(theme, prefix_cls)
    }

    pub fn cache(&self) -> &StyleCache {
        &self.cache
    }
}

/// Handle returned by registration; styles one component against themes.
#[derive(Debug, Clone)]
pub struct StyleAccessor<'r> {
    registry: &'r StyleRegistry,
    component: Arc<ComponentStyle>,
}

impl StyleAccessor<'_> {
    pub fn component(&self) -> &ComponentStyle {
        &self.component
    }

    /// The resolved tokens the builder would see for this theme.
    pub fn resolved_tokens(&self, theme: &TokenSet, prefix_cls: &str) -> Result<TokenSet, RegistryError> {
        self.component
            .resolve_tokens(theme, prefix_cls)
            .map_err(|source| self.token_error(source))
    }

    /// Returns the style tree for `theme`, building it on first use.
    pub fn styles(&self, theme: &TokenSet, prefix_cls: &str) -> Result<Arc<StyleNode>, RegistryError> {
        let resolved = self.resolved_tokens(theme, prefix_cls)?;
        let key = CacheKey {
            component: self.component.name.clone(),
            fingerprint: resolved.fingerprint(),
        };

        let cache = &self.registry.cache;
        if let Some(tree) = cache.get(&key) {
            trace!("style cache hit for {} ({})", key.component, key.fingerprint.short());
            return Ok(tree);
        }

        debug!("building styles for {} ({})", key.component, key.fingerprint.short());
        let tree = self
            .component
            .build(&resolved)
            .map_err(|source| self.token_error(source))?;
        Ok(cache.insert(key, tree))
    }

    /// Same as [`styles`](Self::styles) for a [`Theme`].
    pub fn styles_for_theme(&self, theme: &Theme, prefix_cls: &str) -> Result<Arc<StyleNode>, RegistryError> {
        self.styles(theme.tokens(), prefix_cls)
    }

    fn token_error(&self, source: TokenError) -> RegistryError {
        RegistryError::Token {
            component: self.component.name.clone(),
            source,
        }
    }
}

/// Registers a component in the global registry.
pub fn register<B, D>(name: &str, builder: B, defaults: D) -> StyleAccessor<'static>
where
    B: Fn(&TokenSet) -> Result<StyleNode, TokenError> + Send + Sync + 'static,
    D: Fn(&TokenSet) -> TokenSet + Send + Sync + 'static,
{
    StyleRegistry::global().register_fn(name, builder, defaults)
}

/// Registers a prepared component in the global registry.
pub fn register_component(component: ComponentStyle) -> StyleAccessor<'static> {
    StyleRegistry::global().register(component)
}

/// Styles a globally registered component by name.
pub fn styles_for(name: &str, theme: &TokenSet, prefix_cls: &str) -> Result<Arc<StyleNode>, RegistryError> {
    StyleRegistry::global().styles_for(name, theme, prefix_cls)
}

/// Empties the global style cache. Registered components are kept.
pub fn reset_style_cache() {
    StyleRegistry::global().cache().clear();
}
