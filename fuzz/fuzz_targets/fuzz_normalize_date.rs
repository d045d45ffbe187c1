#![no_main]

use fakturace::core::{DateResolution, normalize_date};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = normalize_date(s, DateResolution::FirstMatch);
        let _ = normalize_date(s, DateResolution::LastMatch);
    }
});
