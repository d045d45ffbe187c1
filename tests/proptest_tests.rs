//! Property-based tests for coercion, vocabulary mapping and output helpers.
//!
//! Run with: `cargo test --test proptest_tests`

use chrono::{Datelike, NaiveDate};
use fakturace::abra::decompose_item_id;
use fakturace::core::*;
use fakturace::pohoda::{encode_windows_1250, format_fixed};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Proptest Strategies ─────────────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..=2099, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_resolution() -> impl Strategy<Value = DateResolution> {
    prop_oneof![Just(DateResolution::FirstMatch), Just(DateResolution::LastMatch)]
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// Arbitrary input never panics; anything accepted is canonical and stable.
    #[test]
    fn normalize_date_is_total(text in "\\PC{0,40}", resolution in arb_resolution()) {
        if let Some(dt) = normalize_date(&text, resolution) {
            let canonical = dt.format(CANONICAL_DATE_FORMAT).to_string();
            if (1000..=9999).contains(&dt.year()) {
                let again = normalize_date(&canonical, DateResolution::FirstMatch)
                    .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string());
                prop_assert_eq!(again, Some(canonical));
            }
        }
    }

    /// Export-shaped dates land on midnight of the same day under either resolution.
    #[test]
    fn export_dates_normalize_to_midnight(date in arb_date(), resolution in arb_resolution()) {
        let expected = date.and_hms_opt(0, 0, 0).unwrap();
        for text in [
            date.format("%Y-%m-%d").to_string(),
            date.format("%Y%m%d").to_string(),
            date.format("%Y-%m-%d+01:00").to_string(),
        ] {
            prop_assert_eq!(normalize_date(&text, resolution), Some(expected), "input {}", text);
        }
    }

    #[test]
    fn day_first_dates_need_first_match(date in arb_date()) {
        let text = date.format("%d.%m.%Y").to_string();
        prop_assert_eq!(
            normalize_date(&text, DateResolution::FirstMatch),
            date.and_hms_opt(0, 0, 0)
        );
        prop_assert_eq!(normalize_date(&text, DateResolution::LastMatch), None);
    }

    /// Every number maps to a bucket; bucket edges honour the tolerance.
    #[test]
    fn vat_mapping_is_total(rate in any::<f64>()) {
        let bucket = VatRate::from_percent(rate);
        prop_assert!(matches!(bucket, VatRate::High | VatRate::Low | VatRate::None));
        prop_assert_eq!(map_vat_rate(&rate.to_string()), bucket);
    }

    #[test]
    fn vat_rates_near_standard_are_high(delta in -0.009f64..0.009) {
        prop_assert_eq!(VatRate::from_percent(21.0 + delta), VatRate::High);
        prop_assert_eq!(VatRate::from_percent(23.0 + delta), VatRate::High);
        prop_assert_eq!(VatRate::from_percent(15.0 + delta), VatRate::Low);
        prop_assert_eq!(VatRate::from_percent(10.0 + delta), VatRate::Low);
    }

    #[test]
    fn vat_rates_between_bands_are_none(
        rate in prop_oneof![0.0f64..9.98, 10.02f64..14.98, 15.02f64..20.98, 21.02f64..22.98, 23.02f64..1000.0]
    ) {
        prop_assert_eq!(VatRate::from_percent(rate), VatRate::None);
    }

    #[test]
    fn vat_text_never_panics(text in "\\PC{0,20}") {
        let _ = map_vat_rate(&text);
    }

    #[test]
    fn item_ids_split_at_last_dash(code in "[A-Z0-9][A-Z0-9-]{0,11}", seq in 0i64..1_000_000) {
        let id = format!("ext:{code}-{seq}");
        prop_assert_eq!(decompose_item_id(&id), Some((code, seq)));
    }

    #[test]
    fn ascii_passes_through_cp1250(text in "[ -~\\n]{0,200}") {
        let encoded = encode_windows_1250(&text);
        prop_assert_eq!(encoded.bytes, text.as_bytes().to_vec());
        prop_assert_eq!(encoded.escaped, 0);
    }

    /// Fixed-place output keeps exactly `dp` decimals and the rounded value.
    #[test]
    fn fixed_places_are_exact(cents in -10_000_000i64..10_000_000, dp in prop_oneof![Just(2u32), Just(4u32)]) {
        let value = Decimal::new(cents, 3);
        let text = format_fixed(value, dp);
        let (_, frac) = text.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), dp as usize);
        let back: Decimal = text.parse().unwrap();
        prop_assert_eq!(back, value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero));
    }
}
