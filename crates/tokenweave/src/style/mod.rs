//! Style trees and their stylesheet rendering.
//!
//! - [`StyleNode`]: selector + ordered properties + ordered children
//! - [`MediaQuery`]: breakpoint predicates for responsive branches
//! - [`to_css`]: flattens a tree into stylesheet text
//! - [`reset_component`]: the shared reset spread into component roots
//!
//! Trees are plain data. Builders produce them fresh from resolved tokens and
//! the registry caches them; nothing here holds state.

mod css;
mod node;
mod reset;

pub use css::{kebab_case, to_css};
pub use node::{MediaQuery, PropValue, Property, StyleNode};
pub use reset::reset_component;
