//! Abra record → Pohoda invoice mapping.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::abra::{AbraInvoice, AbraInvoiceItem};
use crate::core::{CANONICAL_DATE_FORMAT, map_invoice_type, map_payment_type, map_vat_rate};

use super::types::*;

/// Currency the summary's home block is expressed in.
pub const HOME_CURRENCY: &str = "CZK";

/// Maps stored Abra invoices onto Pohoda invoices for one issuer.
#[derive(Debug, Clone, Default)]
pub struct PohodaBuilder {
    issuer: Identity,
}

impl PohodaBuilder {
    pub fn new(issuer: Identity) -> Self {
        Self { issuer }
    }

    pub fn issuer(&self) -> &Identity {
        &self.issuer
    }

    pub fn build(&self, invoice: &AbraInvoice) -> PohodaInvoice {
        let h = &invoice.header;

        let header = PohodaHeader {
            invoice_type: map_invoice_type(h.typ_dokl.as_deref().unwrap_or_default()),
            number: h.kod.clone(),
            sym_var: h.var_sym.clone(),
            sym_par: h.cis_obj.clone(),
            sym_const: h.kon_sym.clone(),
            sym_spec: h.spec_sym.clone(),
            date: to_date(&h.dat_vyst),
            date_tax: to_date(&h.duzp_puv),
            date_accounting: to_date(&h.dat_ucto),
            date_due: to_date(&h.dat_splat),
            date_order: to_date(&h.dat_vyst),
            number_order: h.cis_obj.clone(),
            classification_vat: classification_vat(&invoice.items),
            text: h.popis.clone(),
            payment_type: map_payment_type(h.forma_uhrady_cis.as_deref().unwrap_or_default()),
            my_identity: self.issuer.clone(),
            partner_identity: Identity {
                company: h.naz_firmy.clone(),
                name: h.kontakt_jmeno.clone(),
                city: h.mesto.clone(),
                street: h.ulice.clone(),
                zip: h.psc.clone(),
                ico: h.ic.clone(),
                dic: h.dic.clone(),
                country: h.stat.as_deref().map(strip_code),
                phone: h.kontakt_tel.clone(),
                email: h.kontakt_email.clone(),
            },
            note: h.poznam.clone(),
        };

        let summary = PohodaSummary {
            home_currency: HomeCurrency {
                price_none: to_decimal(h.sum_osv),
                price_low: to_decimal(h.sum_zkl_sniz),
                price_low_vat: to_decimal(h.sum_dph_sniz),
                price_low_sum: to_decimal(h.sum_celk_sniz),
                price_high: to_decimal(h.sum_zkl_zakl),
                price_high_vat: to_decimal(h.sum_dph_zakl),
                price_high_sum: to_decimal(h.sum_celkem),
            },
            foreign_currency: h
                .mena
                .as_deref()
                .map(strip_code)
                .filter(|c| !c.eq_ignore_ascii_case(HOME_CURRENCY))
                .map(|currency| ForeignCurrency {
                    currency,
                    rate: to_decimal(h.kurz),
                    amount: to_decimal(h.kurz_mnozstvi),
                    price_sum: to_decimal(h.sum_celkem_men),
                }),
        };

        PohodaInvoice {
            header,
            detail: invoice.items.iter().map(build_item).collect(),
            summary,
        }
    }

    pub fn build_all(&self, invoices: &[AbraInvoice]) -> Vec<PohodaInvoice> {
        invoices.iter().map(|inv| self.build(inv)).collect()
    }
}

fn build_item(item: &AbraInvoiceItem) -> PohodaItem {
    let d = &item.detail;
    PohodaItem {
        text: d.nazev.clone(),
        note: d.poznam.clone(),
        code: d.kod.clone(),
        quantity: to_decimal(d.mnoz_mj).unwrap_or(Decimal::ONE),
        unit: d.mj.clone(),
        pay_vat: d.szb_dph.is_some(),
        rate_vat: map_vat_rate(&d.szb_dph.map(|r| r.to_string()).unwrap_or_default()),
        unit_price: to_decimal(d.cena_mj).unwrap_or(Decimal::ZERO),
        stock_item: d.kod.clone(),
    }
}

/// Whole part of the first positive item rate.
fn classification_vat(items: &[AbraInvoiceItem]) -> Option<i64> {
    items
        .iter()
        .filter_map(|i| i.detail.szb_dph)
        .find(|r| *r > 0.0)
        .map(|r| r.trunc() as i64)
}

fn to_date(stored: &Option<String>) -> Option<NaiveDate> {
    stored
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s, CANONICAL_DATE_FORMAT).ok())
        .map(|dt| dt.date())
}

fn to_decimal(v: Option<f64>) -> Option<Decimal> {
    v.and_then(Decimal::from_f64)
}

/// `code:EUR` → `EUR`.
fn strip_code(v: &str) -> String {
    v.strip_prefix("code:").unwrap_or(v).to_string()
}
