//! File-level orchestration: XML file → store, store → Pohoda file.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::abra::InvoiceParser;
use crate::core::{Result, decode_document};
use crate::pohoda::{PohodaBuilder, serialize};
use crate::settings::Settings;
use crate::store::{InvoiceStore, SyncReport};

/// Counts for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub parsed: usize,
    pub skipped: usize,
    pub dropped_items: usize,
    pub sync: SyncReport,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parsed {} invoices ({} skipped, {} items dropped); {}",
            self.parsed, self.skipped, self.dropped_items, self.sync
        )
    }
}

/// Parse `xml_path` and upsert every invoice that parsed. The file is decoded
/// per its XML declaration (see [`decode_document`]).
pub fn import_file(store: &InvoiceStore, xml_path: &Path, settings: &Settings) -> Result<RunSummary> {
    info!(path = %xml_path.display(), "importing Abra export");
    let xml = decode_document(&std::fs::read(xml_path)?)?;
    import_str(store, &xml, settings)
}

pub fn import_str(store: &InvoiceStore, xml: &str, settings: &Settings) -> Result<RunSummary> {
    let report = InvoiceParser::new(settings.date_resolution).parse_report(xml)?;
    let sync = store.upsert_all(&report.invoices);
    let summary = RunSummary {
        parsed: report.invoices.len(),
        skipped: report.failures.len(),
        dropped_items: report.dropped_items,
        sync,
    };
    info!(%summary, "import finished");
    Ok(summary)
}

/// `pohoda-cp1250-<YYYYMMDDHHMMSS>.xml`
pub fn default_output_name(at: NaiveDateTime) -> String {
    format!("pohoda-cp1250-{}.xml", at.format("%Y%m%d%H%M%S"))
}

/// Export everything in the store. Relative `output` paths resolve against
/// the output directory; `None` picks [`default_output_name`].
pub fn migrate_to_file(store: &InvoiceStore, settings: &Settings, output: Option<&Path>) -> Result<(PathBuf, usize)> {
    let now = Local::now().naive_local();
    let path = match output {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => settings.output_dir().join(p),
        None => settings.output_dir().join(default_output_name(now)),
    };

    let invoices = store.load_all()?;
    let pohoda = PohodaBuilder::new(settings.issuer.clone()).build_all(&invoices);
    let bytes = serialize(&pohoda, &settings.data_pack_options(now))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), invoices = pohoda.len(), "saved Pohoda export");
    Ok((path, pohoda.len()))
}
