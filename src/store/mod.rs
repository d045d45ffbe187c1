//! SQLite staging store for parsed Abra invoices.
//!
//! Invoices are keyed by `(ext_id, id)` and items by `(ext_kod, ext_kod_k)`;
//! both are unique indexes driving `INSERT ... ON CONFLICT DO UPDATE`. A
//! missing key half is stored as `''` so the index still applies.

pub mod schema;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::abra::{AbraInvoice, AbraInvoiceItem, InvoiceHeader, ItemDetail};
use crate::core::Result;

/// Whether an upsert created or overwrote a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowChange {
    Inserted,
    Updated,
}

/// Result of upserting one invoice and its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub invoice: RowChange,
    pub items_inserted: usize,
    pub items_updated: usize,
    /// Items rolled back individually; the invoice itself was kept.
    pub items_failed: usize,
}

/// Counters for a batch upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub invoices_inserted: usize,
    pub invoices_updated: usize,
    pub invoices_failed: usize,
    pub items_inserted: usize,
    pub items_updated: usize,
    pub items_failed: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: &UpsertOutcome) {
        match outcome.invoice {
            RowChange::Inserted => self.invoices_inserted += 1,
            RowChange::Updated => self.invoices_updated += 1,
        }
        self.items_inserted += outcome.items_inserted;
        self.items_updated += outcome.items_updated;
        self.items_failed += outcome.items_failed;
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invoices: {} inserted, {} updated, {} failed; items: {} inserted, {} updated, {} failed",
            self.invoices_inserted,
            self.invoices_updated,
            self.invoices_failed,
            self.items_inserted,
            self.items_updated,
            self.items_failed
        )
    }
}

/// Filter for [`InvoiceStore::search`]. Empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    /// Substring of `kod`.
    pub code: Option<String>,
    /// Substring of `naz_firmy`.
    pub partner: Option<String>,
    /// Only the most recently stored match.
    pub last: bool,
    pub limit: Option<usize>,
}

pub struct InvoiceStore {
    conn: Connection,
}

impl InvoiceStore {
    /// Open (or create) the database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!(path = %path.display(), "opened invoice store");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create tables and indexes if missing.
    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(&schema::create_schema())?;
        Ok(())
    }

    /// Drop both tables. Call [`Self::init`] afterwards to recreate them.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(&schema::drop_schema())?;
        info!("invoice tables dropped");
        Ok(())
    }

    /// Whether either table exists.
    pub fn is_initialised(&self) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2) LIMIT 1",
                params![schema::INVOICES, schema::INVOICE_ITEMS],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert or update one invoice, then each of its items.
    ///
    /// The invoice header and its items share a transaction. A failing item is
    /// rolled back on its own and counted; a failing header fails the call.
    pub fn upsert(&self, invoice: &AbraInvoice) -> Result<UpsertOutcome> {
        let ext_id = invoice.ext_id.as_deref().unwrap_or_default();
        let id = invoice.id.as_deref().unwrap_or_default();

        let mut tx = self.conn.unchecked_transaction()?;
        let invoice_change = upsert_invoice_row(&tx, ext_id, id, &invoice.header)?;

        let mut outcome = UpsertOutcome {
            invoice: invoice_change,
            items_inserted: 0,
            items_updated: 0,
            items_failed: 0,
        };
        for item in &invoice.items {
            let sp = tx.savepoint()?;
            match upsert_item_row(&sp, ext_id, id, item) {
                Ok(change) => {
                    sp.commit()?;
                    match change {
                        RowChange::Inserted => outcome.items_inserted += 1,
                        RowChange::Updated => outcome.items_updated += 1,
                    }
                }
                Err(error) => {
                    warn!(
                        invoice = %invoice.natural_key(),
                        item = %item.natural_key(),
                        %error,
                        "item upsert failed"
                    );
                    outcome.items_failed += 1;
                }
            }
        }
        tx.commit()?;
        debug!(invoice = %invoice.natural_key(), ?outcome, "upserted invoice");
        Ok(outcome)
    }

    /// Upsert every invoice; failures are logged and counted, never fatal.
    pub fn upsert_all(&self, invoices: &[AbraInvoice]) -> SyncReport {
        let mut report = SyncReport::default();
        for invoice in invoices {
            match self.upsert(invoice) {
                Ok(outcome) => report.record(&outcome),
                Err(error) => {
                    warn!(invoice = %invoice.natural_key(), %error, "invoice upsert failed");
                    report.invoices_failed += 1;
                }
            }
        }
        info!(%report, "sync finished");
        report
    }

    /// Every stored invoice in storage order, items attached in storage order.
    pub fn load_all(&self) -> Result<Vec<AbraInvoice>> {
        self.select_invoices("", &[], "ORDER BY rowid", None)
    }

    /// Stored invoices matching `query`, oldest first (`last` returns only the newest).
    pub fn search(&self, query: &InvoiceQuery) -> Result<Vec<AbraInvoice>> {
        let mut clauses = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let Some(code) = &query.code {
            args.push(code.clone());
            clauses.push(format!("\"kod\" LIKE '%' || ?{} || '%'", args.len()));
        }
        if let Some(partner) = &query.partner {
            args.push(partner.clone());
            clauses.push(format!("\"naz_firmy\" LIKE '%' || ?{} || '%'", args.len()));
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let (order, limit) = if query.last {
            ("ORDER BY rowid DESC", Some(1))
        } else {
            ("ORDER BY rowid", query.limit)
        };
        self.select_invoices(&filter, &args, order, limit)
    }

    pub fn count_invoices(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {}", schema::INVOICES), [], |r| r.get(0))?;
        Ok(n as usize)
    }

    fn select_invoices(
        &self,
        filter: &str,
        args: &[String],
        order: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AbraInvoice>> {
        let limit = limit.map(|n| format!("LIMIT {n}")).unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM {} {filter} {order} {limit}",
            schema::invoice_select_list(),
            schema::INVOICES
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut invoices = stmt
            .query_map(rusqlite::params_from_iter(args), invoice_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut items = self.load_items()?;
        for inv in &mut invoices {
            let key = (
                inv.ext_id.clone().unwrap_or_default(),
                inv.id.clone().unwrap_or_default(),
            );
            inv.items = items.remove(&key).unwrap_or_default();
        }
        Ok(invoices)
    }

    /// All items grouped by parent key, each group in storage order.
    fn load_items(&self) -> Result<HashMap<(String, String), Vec<AbraInvoiceItem>>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            schema::item_select_list(),
            schema::INVOICE_ITEMS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let parent: (String, String) = (row.get(0)?, row.get(1)?);
            Ok((parent, item_from_row(row)?))
        })?;

        let mut grouped: HashMap<(String, String), Vec<AbraInvoiceItem>> = HashMap::new();
        for row in rows {
            let (parent, item) = row?;
            grouped.entry(parent).or_default().push(item);
        }
        Ok(grouped)
    }
}

fn exists(conn: &Connection, sql: &str, a: &dyn rusqlite::ToSql, b: &dyn rusqlite::ToSql) -> Result<bool> {
    let found: Option<i64> = conn.query_row(sql, &[a, b][..], |r| r.get(0)).optional()?;
    Ok(found.is_some())
}

fn upsert_invoice_row(conn: &Connection, ext_id: &str, id: &str, header: &InvoiceHeader) -> Result<RowChange> {
    let existed = exists(
        conn,
        "SELECT 1 FROM invoices WHERE \"ext_id\" = ?1 AND \"id\" = ?2",
        &ext_id,
        &id,
    )?;
    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&ext_id, &id];
    params.extend(header.sql_params());
    conn.execute(&schema::upsert_invoice_sql(), params.as_slice())?;
    Ok(if existed { RowChange::Updated } else { RowChange::Inserted })
}

fn upsert_item_row(conn: &Connection, ext_id: &str, id: &str, item: &AbraInvoiceItem) -> Result<RowChange> {
    let existed = exists(
        conn,
        "SELECT 1 FROM invoice_items WHERE \"ext_kod\" = ?1 AND \"ext_kod_k\" = ?2",
        &item.ext_kod,
        &item.ext_kod_k,
    )?;
    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&ext_id, &id, &item.ext_kod, &item.ext_kod_k, &item.id];
    params.extend(item.detail.sql_params());
    conn.execute(&schema::upsert_item_sql(), params.as_slice())?;
    Ok(if existed { RowChange::Updated } else { RowChange::Inserted })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn invoice_from_row(row: &Row<'_>) -> rusqlite::Result<AbraInvoice> {
    Ok(AbraInvoice {
        ext_id: non_empty(row.get(0)?),
        id: non_empty(row.get(1)?),
        header: InvoiceHeader::from_row(row, schema::INVOICE_KEY_COLUMNS.len())?,
        items: Vec::new(),
    })
}

/// Expects the [`schema::item_select_list`] column order.
fn item_from_row(row: &Row<'_>) -> rusqlite::Result<AbraInvoiceItem> {
    Ok(AbraInvoiceItem {
        ext_kod: row.get(2)?,
        ext_kod_k: row.get(3)?,
        id: row.get(4)?,
        detail: ItemDetail::from_row(row, schema::ITEM_KEY_COLUMNS.len())?,
    })
}
