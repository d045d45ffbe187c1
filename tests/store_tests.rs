#![cfg(feature = "store")]

use fakturace::abra::{AbraInvoice, parse_invoices};
use fakturace::store::*;

const FIXTURE: &str = include_str!("fixtures/faktura-vydana.xml");

fn store() -> InvoiceStore {
    let store = InvoiceStore::open_in_memory().unwrap();
    store.init().unwrap();
    store
}

fn fixture() -> Vec<AbraInvoice> {
    parse_invoices(FIXTURE).unwrap()
}

// --- Schema lifecycle ---

#[test]
fn init_is_idempotent_and_reset_drops_tables() {
    let store = InvoiceStore::open_in_memory().unwrap();
    assert!(!store.is_initialised().unwrap());
    store.init().unwrap();
    store.init().unwrap();
    assert!(store.is_initialised().unwrap());

    store.upsert_all(&fixture());
    store.reset().unwrap();
    assert!(!store.is_initialised().unwrap());
    store.init().unwrap();
    assert_eq!(store.count_invoices().unwrap(), 0);
}

#[test]
fn file_store_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoices.sqlite");
    {
        let store = InvoiceStore::open(&path).unwrap();
        store.init().unwrap();
        store.upsert_all(&fixture());
    }
    let store = InvoiceStore::open(&path).unwrap();
    assert!(store.is_initialised().unwrap());
    assert_eq!(store.count_invoices().unwrap(), 2);
}

// --- Upsert ---

#[test]
fn round_trip_preserves_records() {
    let store = store();
    let invoices = fixture();
    let report = store.upsert_all(&invoices);
    assert_eq!(report.invoices_inserted, 2);
    assert_eq!(report.items_inserted, 2);

    assert_eq!(store.load_all().unwrap(), invoices);
}

#[test]
fn second_import_updates_in_place() {
    let store = store();
    let mut invoices = fixture();
    store.upsert_all(&invoices);

    invoices[0].header.sum_celkem = Some(242.0);
    invoices[0].items[0].detail.nazev = Some("Kabel CYKY 3x4".into());
    let report = store.upsert_all(&invoices);

    assert_eq!(report.invoices_inserted, 0);
    assert_eq!(report.invoices_updated, 2);
    assert_eq!(report.items_updated, 2);
    assert_eq!(store.count_invoices().unwrap(), 2);

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded[0].header.sum_celkem, Some(242.0));
    assert_eq!(loaded[0].items[0].detail.nazev.as_deref(), Some("Kabel CYKY 3x4"));
    assert_eq!(loaded[0].items.len(), 1);
}

#[test]
fn single_upsert_reports_row_change() {
    let store = store();
    let inv = fixture().remove(0);
    let first = store.upsert(&inv).unwrap();
    assert_eq!(first.invoice, RowChange::Inserted);
    assert_eq!(first.items_inserted, 1);

    let second = store.upsert(&inv).unwrap();
    assert_eq!(second.invoice, RowChange::Updated);
    assert_eq!(second.items_updated, 1);
}

#[test]
fn failing_item_is_rolled_back_alone() {
    let store = store();
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_item BEFORE INSERT ON invoice_items
             WHEN NEW.ext_kod = 'FV-2024002'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let report = store.upsert_all(&fixture());
    assert_eq!(report.invoices_inserted, 2);
    assert_eq!(report.items_inserted, 1);
    assert_eq!(report.items_failed, 1);

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].items.len(), 1);
    assert!(loaded[1].items.is_empty());
}

#[test]
fn failing_invoice_does_not_stop_the_batch() {
    let store = store();
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_invoice BEFORE INSERT ON invoices
             WHEN NEW.kod = '2024001'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let report = store.upsert_all(&fixture());
    assert_eq!(report.invoices_failed, 1);
    assert_eq!(report.invoices_inserted, 1);
    // Items of the failed invoice went with it.
    assert_eq!(report.items_inserted, 1);

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].header.kod.as_deref(), Some("2024002"));
    let items: i64 = store
        .connection()
        .query_row("SELECT count(*) FROM invoice_items", [], |r| r.get(0))
        .unwrap();
    assert_eq!(items, 1);
}

// --- Search ---

#[test]
fn search_filters_by_code_and_partner() {
    let store = store();
    store.upsert_all(&fixture());

    let all = store.search(&InvoiceQuery::default()).unwrap();
    assert_eq!(all.len(), 2);

    let by_code = store
        .search(&InvoiceQuery {
            code: Some("002".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].header.kod.as_deref(), Some("2024002"));
    assert_eq!(by_code[0].items.len(), 1);

    let by_partner = store
        .search(&InvoiceQuery {
            partner: Some("Novák".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_partner.len(), 1);
    assert_eq!(by_partner[0].ext_id.as_deref(), Some("FV-2024001"));

    let none = store
        .search(&InvoiceQuery {
            code: Some("002".into()),
            partner: Some("Novák".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn search_last_and_limit() {
    let store = store();
    store.upsert_all(&fixture());

    let last = store
        .search(&InvoiceQuery {
            last: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].header.kod.as_deref(), Some("2024002"));

    let limited = store
        .search(&InvoiceQuery {
            limit: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].header.kod.as_deref(), Some("2024001"));
}

#[test]
fn search_text_is_bound_not_interpolated() {
    let store = store();
    store.upsert_all(&fixture());
    let hostile = store
        .search(&InvoiceQuery {
            code: Some("' OR 1=1 --".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(hostile.is_empty());
}
