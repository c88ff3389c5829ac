//! Derived tokens.
//!
//! A derivation computes one secondary token from a fixed list of source
//! tokens. Formulas receive only their declared sources, in declaration order,
//! so a derived value cannot depend on anything else in the set.
//!
//! ```rust
//! use tokenweave::{DerivedTokenCalculator, TokenSet};
//!
//! let calc = DerivedTokenCalculator::new()
//!     .numeric("weekHeight", &["controlHeightSM"], |v| v[0] * 0.75)
//!     .text("calendarCls", &["componentCls"], |v| format!("{}-calendar", v[0]));
//!
//! let tokens = TokenSet::new()
//!     .with("controlHeightSM", 24)
//!     .with("componentCls", ".ant-picker");
//!
//! let derived = calc.derive(&tokens).unwrap();
//! assert_eq!(derived.get_number("weekHeight"), Some(18.0));
//! assert_eq!(derived.get_str("calendarCls"), Some(".ant-picker-calendar"));
//! ```

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::error::TokenError;
use crate::merge::merge;
use crate::token::{TokenSet, TokenValue};

type NumericFormula = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;
type TextFormula = Arc<dyn Fn(&[&str]) -> String + Send + Sync>;

#[derive(Clone)]
enum Formula {
    Numeric(NumericFormula),
    Text(TextFormula),
    Copy,
}

/// A single derivation rule: target name, source names and formula.
#[derive(Clone)]
pub struct Derivation {
    name: String,
    sources: Vec<String>,
    formula: Formula,
}

impl Derivation {
    /// A numeric rule. The formula receives the source values in order.
    pub fn numeric<F>(name: impl Into<String>, sources: &[&str], formula: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            formula: Formula::Numeric(Arc::new(formula)),
        }
    }

    /// A string rule. The formula receives the source strings in order.
    pub fn text<F>(name: impl Into<String>, sources: &[&str], formula: F) -> Self
    where
        F: Fn(&[&str]) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            formula: Formula::Text(Arc::new(formula)),
        }
    }

    /// A rule that copies one token under a new name, whatever its kind.
    pub fn alias(name: impl Into<String>, source: &str) -> Self {
        Self {
            name: name.into(),
            sources: vec![source.to_string()],
            formula: Formula::Copy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Evaluates this rule against `tokens`.
    pub fn evaluate(&self, tokens: &TokenSet) -> Result<TokenValue, TokenError> {
        let reader = tokens.reader(&self.name);
        match &self.formula {
            Formula::Numeric(f) => {
                let inputs = self
                    .sources
                    .iter()
                    .map(|s| reader.number(s))
                    .collect::<Result<Vec<_>, _>>()?;
                let value = f(&inputs);
                if !value.is_finite() {
                    return Err(TokenError::NonFinite {
                        name: self.name.clone(),
                    });
                }
                Ok(TokenValue::Number(value))
            }
            Formula::Text(f) => {
                let inputs = self
                    .sources
                    .iter()
                    .map(|s| reader.text(s))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TokenValue::Str(f(&inputs)))
            }
            Formula::Copy => {
                let value = reader.value(&self.sources[0])?;
                if let TokenValue::Number(n) = value {
                    if !n.is_finite() {
                        return Err(TokenError::NonFinite {
                            name: self.name.clone(),
                        });
                    }
                }
                Ok(value.clone())
            }
        }
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.formula {
            Formula::Numeric(_) => "numeric",
            Formula::Text(_) => "text",
            Formula::Copy => "alias",
        };
        f.debug_struct("Derivation")
            .field("name", &self.name)
            .field("sources", &self.sources)
            .field("kind", &kind)
            .finish()
    }
}

/// An ordered list of derivation rules.
#[derive(Debug, Clone, Default)]
pub struct DerivedTokenCalculator {
    rules: Vec<Derivation>,
}

impl DerivedTokenCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prepared rule.
    pub fn rule(mut self, rule: Derivation) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a numeric rule.
    pub fn numeric<F>(self, name: impl Into<String>, sources: &[&str], formula: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.rule(Derivation::numeric(name, sources, formula))
    }

    /// Adds a string rule.
    pub fn text<F>(self, name: impl Into<String>, sources: &[&str], formula: F) -> Self
    where
        F: Fn(&[&str]) -> String + Send + Sync + 'static,
    {
        self.rule(Derivation::text(name, sources, formula))
    }

    pub fn rules(&self) -> &[Derivation] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Computes the derived tokens only.
    ///
    /// Every rule reads from `tokens`, never from another rule's output. The
    /// first failing rule aborts the whole derivation.
    pub fn derive(&self, tokens: &TokenSet) -> Result<TokenSet, TokenError> {
        let mut derived = TokenSet::new();
        for rule in &self.rules {
            let value = rule.evaluate(tokens)?;
            trace!("derived {} = {}", rule.name, value);
            derived.insert(rule.name.clone(), value);
        }
        Ok(derived)
    }

    /// Returns `tokens` with the derived tokens merged on top.
    pub fn resolve(&self, tokens: &TokenSet) -> Result<TokenSet, TokenError> {
        let derived = self.derive(tokens)?;
        Ok(merge(tokens, &[&derived]))
    }
}
