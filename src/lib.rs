//! # fakturace
//!
//! Moves issued invoices from Abra Flexi ("Flexibee") into Pohoda: parses the
//! `faktura-vydana` XML export, stages it in SQLite with idempotent upserts,
//! and writes a Pohoda `dataPack` in Windows-1250.
//!
//! Money in the Pohoda output uses [`rust_decimal::Decimal`]; source amounts
//! stay `f64` exactly as the export carries them.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fakturace::abra::parse_invoices;
//! use fakturace::pohoda::{DataPackOptions, PohodaBuilder, to_xml_string};
//!
//! let xml = r#"<winstrom>
//!   <faktura-vydana>
//!     <id>ext:FV-1</id>
//!     <kod>2024001</kod>
//!     <datVyst>2024-01-05+01:00</datVyst>
//!     <polozkyFaktury>
//!       <faktura-vydana-polozka>
//!         <id>ext:FV-1-1</id>
//!         <nazev>Konzultace</nazev>
//!         <szbDph>21.0</szbDph>
//!         <cenaMj>100.0</cenaMj>
//!       </faktura-vydana-polozka>
//!     </polozkyFaktury>
//!   </faktura-vydana>
//! </winstrom>"#;
//!
//! let invoices = parse_invoices(xml).unwrap();
//! let pohoda = PohodaBuilder::default().build_all(&invoices);
//! let opts = DataPackOptions {
//!     ico: "29318513".into(),
//!     application: "fakturace".into(),
//!     id_prefix: "demo".into(),
//!     note: String::new(),
//!     generated_at: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(12, 0, 0).unwrap(),
//! };
//! let out = to_xml_string(&pohoda, &opts).unwrap();
//! assert!(out.contains("<inv:rateVAT>high</inv:rateVAT>"));
//! assert!(out.contains("<typ:unitPrice>100.00</typ:unitPrice>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `store` (default) | SQLite staging store and file pipeline |
//! | `cli` (default) | `fakturace` binary |

pub mod abra;
pub mod core;
pub mod pohoda;
pub mod settings;

#[cfg(feature = "store")]
pub mod pipeline;

#[cfg(feature = "store")]
pub mod store;

pub use crate::core::{FakturaceError, Result};
