//! Abra Flexi ("Flexibee") issued-invoice export.
//!
//! The export wraps each invoice in `<faktura-vydana>`; identifiers arrive as
//! repeated `<id>` elements distinguished by prefix (`ext:`, `key:`, `code:`).

mod parse;
mod record;
mod types;

pub use parse::*;
pub use record::{FieldKind, FieldSpec};
pub use types::*;
