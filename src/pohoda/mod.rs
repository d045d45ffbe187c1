//! Pohoda (Stormware) `dataPack` invoice export.
//!
//! [`PohodaBuilder`] maps stored Abra records onto [`PohodaInvoice`];
//! [`serialize`] renders them as Windows-1250 XML.

mod builder;
mod encoding;
mod types;
mod xml;
mod xml_utils;

pub use builder::*;
pub use encoding::*;
pub use types::*;
pub use xml::*;
pub use xml_utils::format_fixed;

/// Pohoda XML namespace URIs.
pub mod ns {
    pub const DAT: &str = "http://www.stormware.cz/schema/version_2/data.xsd";
    pub const INV: &str = "http://www.stormware.cz/schema/version_2/invoice.xsd";
    pub const TYP: &str = "http://www.stormware.cz/schema/version_2/type.xsd";
}
