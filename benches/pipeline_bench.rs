use chrono::NaiveDate;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use fakturace::abra::{AbraInvoice, InvoiceParser};
use fakturace::pohoda::{DataPackOptions, PohodaBuilder, serialize};
use fakturace::settings::default_issuer;
use fakturace::store::InvoiceStore;

fn export_xml(invoices: usize, items: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><winstrom version="1.0">"#);
    for n in 1..=invoices {
        xml.push_str(&format!(
            "<faktura-vydana><id>ext:FV-{n:05}</id><id>key:{n}</id><kod>2024{n:05}</kod>\
             <datVyst>2024-01-05+01:00</datVyst><datSplat>2024-01-19+01:00</datSplat>\
             <lastUpdate>2024-01-05T09:12:44.511+01:00</lastUpdate>\
             <nazFirmy>Stavby Novák s.r.o.</nazFirmy><mesto>Praha</mesto><stat>code:CZ</stat>\
             <sumZklZakl>1000.0</sumZklZakl><sumDphZakl>210.0</sumDphZakl><sumCelkem>1210.0</sumCelkem>\
             <mena>code:CZK</mena><polozkyFaktury>"
        ));
        for k in 1..=items {
            xml.push_str(&format!(
                "<faktura-vydana-polozka><id>ext:FV-{n:05}-{k}</id><kod>ZBOZI-{k}</kod>\
                 <nazev>Položka {k}</nazev><mnozMj>2.0</mnozMj><mj>code:KS</mj>\
                 <szbDph>21.0</szbDph><cenaMj>49.90</cenaMj></faktura-vydana-polozka>"
            ));
        }
        xml.push_str("</polozkyFaktury></faktura-vydana>");
    }
    xml.push_str("</winstrom>");
    xml
}

fn parsed(invoices: usize, items: usize) -> Vec<AbraInvoice> {
    InvoiceParser::default()
        .parse_report(&export_xml(invoices, items))
        .unwrap()
        .invoices
}

fn opts() -> DataPackOptions {
    DataPackOptions {
        ico: "29318513".into(),
        application: "bench".into(),
        id_prefix: "bench".into(),
        note: "bench".into(),
        generated_at: NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    }
}

fn bench_parse(c: &mut Criterion) {
    let xml = export_xml(100, 10);
    let parser = InvoiceParser::default();
    c.bench_function("abra_parse_100x10", |b| {
        b.iter(|| black_box(parser.parse_report(black_box(&xml))));
    });
}

fn bench_build_serialize(c: &mut Criterion) {
    let invoices = parsed(100, 10);
    let builder = PohodaBuilder::new(default_issuer());
    let opts = opts();
    c.bench_function("pohoda_build_serialize_100x10", |b| {
        b.iter(|| {
            let pohoda = builder.build_all(black_box(&invoices));
            black_box(serialize(&pohoda, &opts))
        });
    });
}

fn bench_upsert(c: &mut Criterion) {
    let invoices = parsed(50, 10);
    c.bench_function("store_upsert_50x10", |b| {
        b.iter_batched(
            || {
                let store = InvoiceStore::open_in_memory().unwrap();
                store.init().unwrap();
                store
            },
            |store| black_box(store.upsert_all(&invoices)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_parse, bench_build_serialize, bench_upsert);
criterion_main!(benches);
