//! Explicit scope passing for form handles.
//!
//! Form-bound controls need the handle of the form they sit in. Rather than an
//! ambient global, the caller threads a [`Scope`] through: a type-keyed bag of
//! values where the enclosing form stores its [`FormHandle`]. Scopes nest, and
//! lookups fall back to the enclosing scope.
//!
//! Outside any form there is no handle. [`active_form_handle`] reports that as
//! [`FormError::OutsideScope`]; [`try_active_form_handle`] returns `None`.
//!
//! ```rust
//! use tokenweave::form::{active_form_handle, FormHandle, Scope};
//!
//! let mut scope = Scope::new();
//! scope.provide(FormHandle::new("booking").with_field("nights", 3));
//!
//! let inner = scope.child();
//! let form = active_form_handle(&inner).unwrap();
//! assert_eq!(form.name(), "booking");
//! ```

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::util::parse_numeric;

/// A type-keyed context that may enclose another one.
#[derive(Default)]
pub struct Scope<'p> {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    /// Creates an empty top-level scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scope nested inside this one.
    pub fn child(&self) -> Scope<'_> {
        Scope {
            values: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Stores a value in this scope, returning the one it replaces.
    pub fn provide<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Removes a value from this scope. Enclosing scopes are untouched.
    pub fn withdraw<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Looks a value up here, then in the enclosing scopes.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
            .or_else(|| self.parent.and_then(|parent| parent.get::<T>()))
    }

    /// Mutable access to a value stored in this scope itself.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Nesting depth; a top-level scope is 0.
    pub fn depth(&self) -> usize {
        self.parent.map_or(0, |parent| parent.depth() + 1)
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("len", &self.values.len())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// A form's field store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormHandle {
    name: String,
    fields: BTreeMap<String, Value>,
}

impl FormHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets a field, returning its previous value.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// A field's value as a number, if it holds a number or a numeric string.
    pub fn numeric_field(&self, field: &str) -> Option<f64> {
        match self.field(field)? {
            Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
            Value::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    pub fn remove_field(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Clears every field.
    pub fn reset(&mut self) {
        self.fields.clear();
    }
}

/// How a missing form handle is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// A missing handle is an error.
    #[default]
    Strict,
    /// A missing handle is `None`.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no form handle in scope; form-bound controls must be used inside a form")]
    OutsideScope,
}

/// The nearest enclosing form's handle.
pub fn active_form_handle<'s>(scope: &'s Scope<'_>) -> Result<&'s FormHandle, FormError> {
    scope.get::<FormHandle>().ok_or(FormError::OutsideScope)
}

/// The nearest enclosing form's handle, or `None` outside any form.
pub fn try_active_form_handle<'s>(scope: &'s Scope<'_>) -> Option<&'s FormHandle> {
    scope.get::<FormHandle>()
}

/// Looks the form handle up with the given strictness.
///
/// Lenient lookups never fail; they yield `Ok(None)` outside a form.
pub fn form_handle<'s>(
    scope: &'s Scope<'_>,
    strictness: Strictness,
) -> Result<Option<&'s FormHandle>, FormError> {
    match strictness {
        Strictness::Strict => active_form_handle(scope).map(Some),
        Strictness::Lenient => Ok(try_active_form_handle(scope)),
    }
}
