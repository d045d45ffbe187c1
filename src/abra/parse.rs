//! Abra Flexi `faktura-vydana` reader.

use tracing::{debug, warn};

use crate::core::{Coercion, DateResolution, Element, FakturaceError, Result, get_text};

use super::types::{AbraInvoice, AbraInvoiceItem, InvoiceHeader, ItemDetail, render_key};

/// Tag of one issued invoice, matched at any depth.
pub const INVOICE_TAG: &str = "faktura-vydana";
/// Tag of a line-item container, matched at any depth under an invoice.
pub const ITEMS_TAG: &str = "polozkyFaktury";

/// An invoice that could not be turned into a record.
#[derive(Debug)]
pub struct InvoiceFailure {
    /// Rendered natural key (see [`AbraInvoice::natural_key`]).
    pub key: String,
    pub error: FakturaceError,
}

/// Outcome of reading one export document.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub invoices: Vec<AbraInvoice>,
    pub failures: Vec<InvoiceFailure>,
    /// Line items skipped because their id could not be decomposed.
    pub dropped_items: usize,
}

/// Reads Abra exports with a fixed coercion setup.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceParser {
    coercion: Coercion,
}

impl InvoiceParser {
    pub fn new(date_resolution: DateResolution) -> Self {
        Self {
            coercion: Coercion::new(date_resolution),
        }
    }

    /// Parse every invoice in `xml`, collecting per-invoice failures.
    ///
    /// Only a document that is not well-formed fails as a whole.
    pub fn parse_report(&self, xml: &str) -> Result<ParseReport> {
        let root = Element::parse(xml)?;
        let mut report = ParseReport::default();

        for el in root.descendants_named(INVOICE_TAG) {
            let (ext_id, id) = invoice_ids(el);
            let key = render_key(ext_id.as_deref(), id.as_deref());
            match self.parse_invoice(el, &mut report.dropped_items) {
                Ok(invoice) => {
                    debug!(invoice = %key, items = invoice.items.len(), "parsed invoice");
                    report.invoices.push(invoice);
                }
                Err(error) => {
                    warn!(invoice = %key, %error, "skipping invoice");
                    report.failures.push(InvoiceFailure { key, error });
                }
            }
        }
        Ok(report)
    }

    /// Read one `faktura-vydana` element. `dropped` is incremented per skipped item.
    pub fn parse_invoice(&self, el: &Element, dropped: &mut usize) -> Result<AbraInvoice> {
        let (ext_id, id) = invoice_ids(el);
        if ext_id.is_none() && id.is_none() {
            return Err(FakturaceError::MissingInvoiceKey {
                kod: get_text("kod", el),
            });
        }
        let key = render_key(ext_id.as_deref(), id.as_deref());

        let header = InvoiceHeader::read(el, &self.coercion).map_err(|e| e.for_invoice(&key))?;

        let mut items = Vec::new();
        for container in el.descendants_named(ITEMS_TAG) {
            for item_el in &container.children {
                match self.parse_item(item_el).map_err(|e| e.for_invoice(&key))? {
                    Some(item) => items.push(item),
                    None => {
                        *dropped += 1;
                        let name = get_text("nazev", item_el).unwrap_or_default();
                        warn!(invoice = %key, item = %name, "dropping line item without ext:<code>-<seq> id");
                    }
                }
            }
        }

        Ok(AbraInvoice {
            ext_id,
            id,
            header,
            items,
        })
    }

    /// `Ok(None)` when the item has no decomposable `ext:` id.
    fn parse_item(&self, el: &Element) -> Result<Option<AbraInvoiceItem>> {
        let mut ext = None;
        let mut id = None;
        for text in el.children_named("id").map(|c| c.text.trim()) {
            if text.starts_with("ext:") {
                ext = Some(decompose_item_id(text));
            } else if !text.is_empty() {
                id = Some(text.to_string());
            }
        }
        let Some(Some((ext_kod, ext_kod_k))) = ext else {
            return Ok(None);
        };
        debug!(ext_kod = %ext_kod, ext_kod_k, "parsing line item");
        Ok(Some(AbraInvoiceItem {
            ext_kod,
            ext_kod_k,
            id,
            detail: ItemDetail::read(el, &self.coercion)?,
        }))
    }
}

/// Strict variant of [`InvoiceParser::parse_report`] with default settings:
/// the first failing invoice fails the call.
pub fn parse_invoices(xml: &str) -> Result<Vec<AbraInvoice>> {
    let report = InvoiceParser::default().parse_report(xml)?;
    match report.failures.into_iter().next() {
        Some(failure) => Err(failure.error),
        None => Ok(report.invoices),
    }
}

/// Split `ext:<code>-<seq>` at the last `-`.
pub fn decompose_item_id(text: &str) -> Option<(String, i64)> {
    let rest = text.trim().strip_prefix("ext:")?;
    let (code, seq) = rest.rsplit_once('-')?;
    if code.is_empty() {
        return None;
    }
    Some((code.to_string(), seq.parse().ok()?))
}

/// `ext:` and `key:` identifiers among the direct `<id>` children.
fn invoice_ids(el: &Element) -> (Option<String>, Option<String>) {
    let mut ext_id = None;
    let mut id = None;
    for text in el.children_named("id").map(|c| c.text.trim()) {
        if let Some(v) = text.strip_prefix("ext:") {
            ext_id = Some(v.to_string());
        } else if let Some(v) = text.strip_prefix("key:") {
            id = Some(v.to_string());
        }
    }
    (ext_id, id)
}
