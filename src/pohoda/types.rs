use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{InvoiceType, PaymentType, VatRate};

/// `typ:address` block used for both the issuer and the partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub company: Option<String>,
    /// Contact person.
    pub name: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub ico: Option<String>,
    pub dic: Option<String>,
    /// Country code (`typ:country/typ:ids`).
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `inv:invoiceHeader`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PohodaHeader {
    pub invoice_type: InvoiceType,
    pub number: Option<String>,
    pub sym_var: Option<String>,
    pub sym_par: Option<String>,
    pub sym_const: Option<String>,
    pub sym_spec: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_tax: Option<NaiveDate>,
    pub date_accounting: Option<NaiveDate>,
    pub date_due: Option<NaiveDate>,
    pub date_order: Option<NaiveDate>,
    pub number_order: Option<String>,
    /// Whole VAT percentage written as `inv:classificationVAT/typ:ids`.
    pub classification_vat: Option<i64>,
    pub text: Option<String>,
    pub payment_type: PaymentType,
    pub my_identity: Identity,
    pub partner_identity: Identity,
    pub note: Option<String>,
}

/// `inv:invoiceItem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PohodaItem {
    pub text: Option<String>,
    pub note: Option<String>,
    pub code: Option<String>,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub pay_vat: bool,
    pub rate_vat: VatRate,
    /// Home-currency unit price.
    pub unit_price: Decimal,
    /// Stock card reference (`inv:stockItem/typ:stockItem/typ:ids`).
    pub stock_item: Option<String>,
}

/// `inv:invoiceSummary/inv:homeCurrency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeCurrency {
    pub price_none: Option<Decimal>,
    pub price_low: Option<Decimal>,
    pub price_low_vat: Option<Decimal>,
    pub price_low_sum: Option<Decimal>,
    pub price_high: Option<Decimal>,
    pub price_high_vat: Option<Decimal>,
    pub price_high_sum: Option<Decimal>,
}

/// `inv:invoiceSummary/inv:foreignCurrency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignCurrency {
    /// ISO code, e.g. `EUR`.
    pub currency: String,
    pub rate: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub price_sum: Option<Decimal>,
}

/// `inv:invoiceSummary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PohodaSummary {
    pub home_currency: HomeCurrency,
    pub foreign_currency: Option<ForeignCurrency>,
}

/// One Pohoda invoice ready for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PohodaInvoice {
    pub header: PohodaHeader,
    pub detail: Vec<PohodaItem>,
    pub summary: PohodaSummary,
}
