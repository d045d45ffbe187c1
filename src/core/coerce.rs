//! Leaf-value coercion for the Abra export.
//!
//! Every getter looks at the first direct child named `tag`. Text, float and
//! date getters return `None` for a missing or blank node; [`get_bool`] returns
//! `false` instead, which the stored schema relies on (boolean columns are
//! never NULL).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::element::Element;
use super::error::{FakturaceError, Result};

/// Canonical textual form of every stored date.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How the date normalizer picks between strategies that all succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateResolution {
    /// Stop at the first strategy that parses the value.
    #[default]
    FirstMatch,
    /// Legacy behavior: the leading `YYYY-MM-DD` extraction always has the
    /// final word, so times are dropped and values without a leading date are
    /// rejected even when an earlier strategy understood them.
    LastMatch,
}

/// Coercion settings shared by every field of a parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coercion {
    pub date_resolution: DateResolution,
}

impl Coercion {
    pub fn new(date_resolution: DateResolution) -> Self {
        Self { date_resolution }
    }

    /// Read `tag` as a date and render it in [`CANONICAL_DATE_FORMAT`].
    ///
    /// Returns `Ok(None)` when the node is missing or blank and an
    /// [`FakturaceError::InvalidDate`] when the text is not a date.
    pub fn get_date(&self, tag: &str, el: &Element) -> Result<Option<String>> {
        let Some(text) = get_text(tag, el) else {
            return Ok(None);
        };
        match normalize_date(&text, self.date_resolution) {
            Some(dt) => Ok(Some(dt.format(CANONICAL_DATE_FORMAT).to_string())),
            None => Err(FakturaceError::InvalidDate {
                tag: tag.to_string(),
                value: text,
            }),
        }
    }
}

/// Trimmed text of `tag`, or `None` when absent or blank.
pub fn get_text(tag: &str, el: &Element) -> Option<String> {
    el.child_text(tag)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `tag` parsed as a float; absent, blank and unparsable values are all `None`.
pub fn get_float(tag: &str, el: &Element) -> Option<f64> {
    el.child_text(tag).and_then(|s| s.trim().parse::<f64>().ok())
}

/// `true` iff `tag` reads `true` or `1` (case-insensitive), `false` otherwise.
pub fn get_bool(tag: &str, el: &Element) -> bool {
    get_opt_bool(tag, el).unwrap_or(false)
}

/// Like [`get_bool`] but keeps absence distinct: `None` for a missing or blank node.
///
/// The text is compared untrimmed, so `" true "` reads as `false`.
pub fn get_opt_bool(tag: &str, el: &Element) -> Option<bool> {
    el.child_text(tag)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_lowercase() == "true" || s == "1")
}

/// [`Coercion::get_date`] with the default resolution.
pub fn get_date(tag: &str, el: &Element) -> Result<Option<String>> {
    Coercion::default().get_date(tag, el)
}

/// Normalize one date string. `None` means no strategy accepted it.
pub fn normalize_date(text: &str, resolution: DateResolution) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match resolution {
        DateResolution::FirstMatch => strict_offset(text)
            .or_else(|| iso_8601(text))
            .or_else(|| human_readable(text))
            .or_else(|| leading_date(text)),
        // The extraction stage overrides or rejects whatever came before it.
        DateResolution::LastMatch => leading_date(text),
    }
}

/// Strategy 1: `YYYY-MM-DDTHH:MM:SS±HH:MM`.
fn strict_offset(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%:z")
        .ok()
        .map(|dt| dt.naive_local())
}

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y-%j"];

/// Strategy 2: ISO-8601 in extended or basic form, with or without an offset.
fn iso_8601(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    let body = strip_offset(text);
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(body, f).ok())
        .or_else(|| {
            ISO_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(body, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// Czech exports are day-first.
const HUMAN_DATETIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d. %m. %Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%B %d, %Y %H:%M:%S",
];

const HUMAN_DATE_FORMATS: &[&str] = &[
    "%d.%m.%Y",
    "%d. %m. %Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a, %d %b %Y",
];

/// Strategy 3: common human-written forms.
fn human_readable(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local());
    }
    HUMAN_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            HUMAN_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

static LEADING_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-?(\d{2})-?(\d{2})").expect("leading date pattern is valid")
});

/// Strategy 4: a leading `YYYY-?MM-?DD`, re-validated as a calendar date.
fn leading_date(text: &str) -> Option<NaiveDateTime> {
    let caps = LEADING_DATE.captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Drop a trailing `Z` or `±HH:MM` / `±HHMM` offset from a date-only value.
fn strip_offset(text: &str) -> &str {
    if let Some(body) = text.strip_suffix('Z') {
        return body;
    }
    for width in [6usize, 5] {
        let Some(cut) = text.len().checked_sub(width).filter(|&c| c > 0) else {
            continue;
        };
        // A multibyte tail can never be an offset.
        let Some((body, tail)) = text.split_at_checked(cut) else {
            continue;
        };
        let t = tail.as_bytes();
        let sign = t[0] == b'+' || t[0] == b'-';
        let digits_ok = match width {
            6 => t[3] == b':' && [1, 2, 4, 5].iter().all(|&i| t[i].is_ascii_digit()),
            _ => t[1..].iter().all(u8::is_ascii_digit),
        };
        let preceded_by_digit = body.as_bytes().last().is_some_and(u8::is_ascii_digit);
        if sign && digits_ok && preceded_by_digit {
            return body;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(children: &[(&str, &str)]) -> Element {
        Element::node(
            "faktura-vydana",
            children.iter().map(|(n, t)| Element::leaf(*n, *t)).collect(),
        )
    }

    fn norm(text: &str) -> Option<String> {
        normalize_date(text, DateResolution::FirstMatch)
            .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
    }

    #[test]
    fn text_is_trimmed_and_blank_is_none() {
        let e = el(&[("kod", "  FV-1 "), ("popis", "   ")]);
        assert_eq!(get_text("kod", &e).as_deref(), Some("FV-1"));
        assert_eq!(get_text("popis", &e), None);
        assert_eq!(get_text("missing", &e), None);
    }

    #[test]
    fn float_never_fails() {
        let e = el(&[("a", "12.5"), ("b", ""), ("c", "12,5"), ("d", " 3 ")]);
        assert_eq!(get_float("a", &e), Some(12.5));
        assert_eq!(get_float("b", &e), None);
        assert_eq!(get_float("c", &e), None);
        assert_eq!(get_float("d", &e), Some(3.0));
        assert_eq!(get_float("zz", &e), None);
    }

    #[test]
    fn bool_defaults_to_false() {
        let e = el(&[("a", "true"), ("b", "TRUE"), ("c", "1"), ("d", "yes"), ("e", "")]);
        assert!(get_bool("a", &e));
        assert!(get_bool("b", &e));
        assert!(get_bool("c", &e));
        assert!(!get_bool("d", &e));
        assert!(!get_bool("e", &e));
        assert!(!get_bool("zz", &e));
        assert_eq!(get_opt_bool("zz", &e), None);
        assert_eq!(get_opt_bool("d", &e), Some(false));
    }

    #[test]
    fn bool_text_is_not_trimmed() {
        let e = el(&[("a", " true "), ("b", "True"), ("c", " 1")]);
        assert!(!get_bool("a", &e));
        assert!(get_bool("b", &e));
        assert!(!get_bool("c", &e));
        assert_eq!(get_opt_bool("a", &e), Some(false));
    }

    #[test]
    fn strategies_cover_export_shapes() {
        assert_eq!(norm("2024-03-15T10:00:00+01:00").as_deref(), Some("2024-03-15T10:00:00"));
        assert_eq!(norm("2024-03-15+01:00").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(norm("2024-03-15T10:00:00.250Z").as_deref(), Some("2024-03-15T10:00:00"));
        assert_eq!(norm("20240315").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(norm("15.03.2024").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(norm("March 15, 2024").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(norm("2024-03-15 trailing words").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(norm("garbage"), None);
        assert_eq!(norm("2024-13-45"), None);
    }

    #[test]
    fn last_match_keeps_only_the_leading_date() {
        let last = |t: &str| {
            normalize_date(t, DateResolution::LastMatch)
                .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        };
        assert_eq!(last("2024-03-15T10:00:00+01:00").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(last("20240315").as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(last("15.03.2024"), None);
    }

    #[test]
    fn get_date_reports_tag() {
        let e = el(&[("datVyst", "2024-01-05+01:00"), ("datSplat", "soon"), ("datUcto", " ")]);
        assert_eq!(
            get_date("datVyst", &e).unwrap().as_deref(),
            Some("2024-01-05T00:00:00")
        );
        assert_eq!(get_date("datUcto", &e).unwrap(), None);
        assert_eq!(get_date("missing", &e).unwrap(), None);
        match get_date("datSplat", &e) {
            Err(FakturaceError::InvalidDate { tag, value }) => {
                assert_eq!(tag, "datSplat");
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn offset_stripping_leaves_dates_alone() {
        assert_eq!(strip_offset("2024-01-05"), "2024-01-05");
        assert_eq!(strip_offset("2024-01-05+01:00"), "2024-01-05");
        assert_eq!(strip_offset("2024-01-05-0100"), "2024-01-05");
        assert_eq!(strip_offset("20240105"), "20240105");
        assert_eq!(strip_offset("€€€"), "€€€");
        assert_eq!(strip_offset("2024-01-05+01:0€"), "2024-01-05+01:0€");
    }

    #[test]
    fn multibyte_garbage_is_rejected_not_panicking() {
        assert_eq!(norm("€€€"), None);
        assert_eq!(norm("ř"), None);
        assert_eq!(norm("2024-01-0€"), None);
        let e = el(&[("datVyst", "€€€")]);
        assert!(matches!(
            get_date("datVyst", &e),
            Err(FakturaceError::InvalidDate { .. })
        ));
    }
}
