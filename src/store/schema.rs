//! DDL and SQL text generated from the record field tables.

use crate::abra::{FieldSpec, InvoiceHeader, ItemDetail};

pub const INVOICES: &str = "invoices";
pub const INVOICE_ITEMS: &str = "invoice_items";

/// Leading invoice columns, before the header fields.
pub const INVOICE_KEY_COLUMNS: &[&str] = &["ext_id", "id"];
/// Leading item columns, before the detail fields.
pub const ITEM_KEY_COLUMNS: &[&str] = &["invoice_ext_id", "invoice_id", "ext_kod", "ext_kod_k", "id"];

fn quote(col: &str) -> String {
    format!("\"{col}\"")
}

fn field_columns(fields: &[FieldSpec]) -> impl Iterator<Item = String> + '_ {
    fields.iter().map(|f| format!("    {} {}", quote(f.column), f.kind.sql_type()))
}

/// Full schema; every statement is `IF NOT EXISTS`.
pub fn create_schema() -> String {
    let mut invoices = vec![
        "    \"ext_id\" TEXT NOT NULL DEFAULT ''".to_string(),
        "    \"id\" TEXT NOT NULL DEFAULT ''".to_string(),
    ];
    invoices.extend(field_columns(InvoiceHeader::FIELDS));

    let mut items = vec![
        "    \"invoice_ext_id\" TEXT NOT NULL DEFAULT ''".to_string(),
        "    \"invoice_id\" TEXT NOT NULL DEFAULT ''".to_string(),
        "    \"ext_kod\" TEXT NOT NULL".to_string(),
        "    \"ext_kod_k\" INTEGER NOT NULL".to_string(),
        "    \"id\" TEXT".to_string(),
    ];
    items.extend(field_columns(ItemDetail::FIELDS));

    format!(
        "CREATE TABLE IF NOT EXISTS {INVOICES} (\n{}\n);\n\
         CREATE UNIQUE INDEX IF NOT EXISTS invoices_natural_key ON {INVOICES} (\"ext_id\", \"id\");\n\
         CREATE TABLE IF NOT EXISTS {INVOICE_ITEMS} (\n{}\n);\n\
         CREATE UNIQUE INDEX IF NOT EXISTS invoice_items_natural_key ON {INVOICE_ITEMS} (\"ext_kod\", \"ext_kod_k\");\n\
         CREATE INDEX IF NOT EXISTS invoice_items_parent ON {INVOICE_ITEMS} (\"invoice_ext_id\", \"invoice_id\");\n",
        invoices.join(",\n"),
        items.join(",\n"),
    )
}

pub fn drop_schema() -> String {
    format!("DROP TABLE IF EXISTS {INVOICE_ITEMS};\nDROP TABLE IF EXISTS {INVOICES};\n")
}

/// `INSERT ... ON CONFLICT (conflict) DO UPDATE SET` every non-conflict column.
fn upsert_sql(table: &str, keys: &[&str], fields: &[FieldSpec], conflict: &[&str]) -> String {
    let columns: Vec<&str> = keys
        .iter()
        .copied()
        .chain(fields.iter().map(|f| f.column))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let updates: Vec<String> = columns
        .iter()
        .filter(|c| !conflict.contains(*c))
        .map(|c| format!("{q} = excluded.{q}", q = quote(c)))
        .collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
        columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", "),
        placeholders.join(", "),
        conflict.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", "),
        updates.join(", "),
    )
}

pub fn upsert_invoice_sql() -> String {
    upsert_sql(INVOICES, INVOICE_KEY_COLUMNS, InvoiceHeader::FIELDS, &["ext_id", "id"])
}

pub fn upsert_item_sql() -> String {
    upsert_sql(INVOICE_ITEMS, ITEM_KEY_COLUMNS, ItemDetail::FIELDS, &["ext_kod", "ext_kod_k"])
}

fn select_list(keys: &[&str], fields: &[FieldSpec]) -> String {
    keys.iter()
        .copied()
        .chain(fields.iter().map(|f| f.column))
        .map(quote)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Invoice columns in [`INVOICE_KEY_COLUMNS`] + header field order.
pub fn invoice_select_list() -> String {
    select_list(INVOICE_KEY_COLUMNS, InvoiceHeader::FIELDS)
}

/// Item columns in [`ITEM_KEY_COLUMNS`] + detail field order.
pub fn item_select_list() -> String {
    select_list(ITEM_KEY_COLUMNS, ItemDetail::FIELDS)
}
