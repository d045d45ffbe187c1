//! Source-independent building blocks: the element tree, leaf coercion,
//! controlled vocabularies and the crate error type.

mod coerce;
mod element;
mod error;
mod vocab;

pub use coerce::*;
pub use element::{Element, decode_document};
pub use error::*;
pub use vocab::*;
