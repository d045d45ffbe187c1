#![no_main]

use fakturace::abra::InvoiceParser;
use fakturace::pohoda::{DataPackOptions, PohodaBuilder, to_xml_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(report) = InvoiceParser::default().parse_report(s) {
            let pohoda = PohodaBuilder::default().build_all(&report.invoices);
            let opts = DataPackOptions {
                ico: String::new(),
                application: String::new(),
                id_prefix: "fuzz".into(),
                note: String::new(),
                generated_at: chrono::NaiveDateTime::default(),
            };
            let _ = to_xml_string(&pohoda, &opts);
        }
    }
});
