//! Design tokens: values, sets and schemas.
//!
//! - [`TokenValue`]: a number, string or nested set
//! - [`TokenSet`]: an immutable, sorted mapping of token names to values
//! - [`TokenSchema`]: declared token names and kinds, for strict merging
//! - [`Fingerprint`]: the identity of a resolved set, used by the style cache

mod schema;
mod set;
mod value;

pub use schema::TokenSchema;
pub use set::{Fingerprint, TokenReader, TokenSet};
pub use value::{TokenKind, TokenValue};
