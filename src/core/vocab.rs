//! Controlled vocabularies shared by the Abra source and the Pohoda target.
//!
//! Unknown source codes never fail; they fall back to the most common target
//! value.

use serde::{Deserialize, Serialize};

/// Pohoda `inv:invoiceType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceType {
    /// `issuedInvoice`
    #[default]
    IssuedInvoice,
}

impl InvoiceType {
    /// Pohoda code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IssuedInvoice => "issuedInvoice",
        }
    }
}

/// Pohoda `typ:paymentType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// Bank transfer.
    #[default]
    Transfer,
    /// Payment card.
    Card,
}

impl PaymentType {
    /// Pohoda code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Card => "card",
        }
    }
}

/// Pohoda VAT-rate bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatRate {
    High,
    Low,
    #[default]
    None,
}

/// A source rate must lie strictly closer than this to a bucket's nominal rate.
pub const VAT_RATE_EPSILON: f64 = 0.01;

const LOW_RATES: [f64; 2] = [10.0, 15.0];
const HIGH_RATES: [f64; 2] = [21.0, 23.0];

impl VatRate {
    /// Pohoda code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::None => "none",
        }
    }

    /// Bucket a percentage. Only near-exact matches land in `low`/`high`.
    pub fn from_percent(rate: f64) -> Self {
        let near = |nominal: &f64| (rate - nominal).abs() < VAT_RATE_EPSILON;
        if rate == 0.0 || !rate.is_finite() {
            Self::None
        } else if LOW_RATES.iter().any(near) {
            Self::Low
        } else if HIGH_RATES.iter().any(near) {
            Self::High
        } else {
            Self::None
        }
    }
}

/// Abra `typDokl` → Pohoda invoice type. Every issued-invoice type maps to
/// `issuedInvoice`.
pub fn map_invoice_type(_code: &str) -> InvoiceType {
    InvoiceType::IssuedInvoice
}

/// Abra `formaUhradyCis` → Pohoda payment type.
pub fn map_payment_type(code: &str) -> PaymentType {
    match code.trim() {
        "code:PREVOD" => PaymentType::Transfer,
        "code:KARTA" => PaymentType::Card,
        _ => PaymentType::Transfer,
    }
}

/// Abra `szbDph` text → Pohoda rate bucket.
pub fn map_vat_rate(text: &str) -> VatRate {
    text.trim()
        .parse::<f64>()
        .map(VatRate::from_percent)
        .unwrap_or(VatRate::None)
}
