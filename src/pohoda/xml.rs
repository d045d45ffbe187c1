use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::Result;

use super::encoding::{WINDOWS_1250_LABEL, encode_windows_1250};
use super::ns;
use super::types::*;
use super::xml_utils::XmlWriter;

/// Decimal places for quantities.
pub const QUANTITY_DP: u32 = 4;
/// Decimal places for money.
pub const MONEY_DP: u32 = 2;

const DATA_VERSION: &str = "2.0";

/// `dat:dataPack` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPackOptions {
    /// IČO of the importing company.
    pub ico: String,
    pub application: String,
    /// Pack id is `<id_prefix>-<YYYYMMDDHHMMSS>`.
    pub id_prefix: String,
    pub note: String,
    pub generated_at: NaiveDateTime,
}

impl DataPackOptions {
    pub fn pack_id(&self) -> String {
        format!("{}-{}", self.id_prefix, self.generated_at.format("%Y%m%d%H%M%S"))
    }

    /// Copy with `generated_at` set to the current local time.
    pub fn now(mut self) -> Self {
        self.generated_at = Local::now().naive_local();
        self
    }
}

/// Render invoices as a Windows-1250 Pohoda `dataPack`.
pub fn serialize(invoices: &[PohodaInvoice], opts: &DataPackOptions) -> Result<Vec<u8>> {
    let xml = to_xml_string(invoices, opts)?;
    let encoded = encode_windows_1250(&xml);
    info!(
        invoices = invoices.len(),
        escaped = encoded.escaped,
        bytes = encoded.bytes.len(),
        "serialized Pohoda data pack"
    );
    Ok(encoded.bytes)
}

/// The document before transcoding, declaring Windows-1250.
pub fn to_xml_string(invoices: &[PohodaInvoice], opts: &DataPackOptions) -> Result<String> {
    let mut w = XmlWriter::new(WINDOWS_1250_LABEL)?;
    let pack_id = opts.pack_id();

    w.start_element_with_attrs(
        "dat:dataPack",
        &[
            ("xmlns:dat", ns::DAT),
            ("xmlns:inv", ns::INV),
            ("xmlns:typ", ns::TYP),
            ("id", pack_id.as_str()),
            ("ico", opts.ico.as_str()),
            ("application", opts.application.as_str()),
            ("version", DATA_VERSION),
            ("note", opts.note.as_str()),
        ],
    )?;

    for invoice in invoices {
        let number = invoice.header.number.as_deref().unwrap_or_default();
        debug!(number, items = invoice.detail.len(), "writing invoice");
        w.start_element_with_attrs("dat:dataPackItem", &[("id", number), ("version", DATA_VERSION)])?;
        w.start_element_with_attrs("inv:invoice", &[("version", DATA_VERSION)])?;
        write_header(&mut w, &invoice.header)?;
        write_detail(&mut w, &invoice.detail)?;
        write_summary(&mut w, &invoice.summary)?;
        w.end_element("inv:invoice")?;
        w.end_element("dat:dataPackItem")?;
    }

    w.end_element("dat:dataPack")?;
    w.into_string()
}

fn write_header(w: &mut XmlWriter, h: &PohodaHeader) -> Result<()> {
    w.start_element("inv:invoiceHeader")?;
    w.text_element("inv:invoiceType", h.invoice_type.code())?;
    if let Some(number) = h.number.as_deref() {
        w.wrapped_text_element("inv:number", "typ:numberRequested", number)?;
    }
    w.opt_text_element("inv:symVar", h.sym_var.as_deref())?;
    w.opt_text_element("inv:symPar", h.sym_par.as_deref())?;
    write_date(w, "inv:date", h.date)?;
    write_date(w, "inv:dateTax", h.date_tax)?;
    write_date(w, "inv:dateAccounting", h.date_accounting)?;
    write_date(w, "inv:dateDue", h.date_due)?;
    if let Some(rate) = h.classification_vat {
        w.wrapped_text_element("inv:classificationVAT", "typ:ids", &rate.to_string())?;
    }
    w.opt_text_element("inv:text", h.text.as_deref())?;
    write_identity(w, "inv:partnerIdentity", &h.partner_identity)?;
    write_identity(w, "inv:myIdentity", &h.my_identity)?;
    w.opt_text_element("inv:numberOrder", h.number_order.as_deref())?;
    write_date(w, "inv:dateOrder", h.date_order)?;
    w.wrapped_text_element("inv:paymentType", "typ:paymentType", h.payment_type.code())?;
    w.opt_text_element("inv:symConst", h.sym_const.as_deref())?;
    w.opt_text_element("inv:symSpec", h.sym_spec.as_deref())?;
    w.opt_text_element("inv:note", h.note.as_deref())?;
    w.end_element("inv:invoiceHeader")?;
    Ok(())
}

fn write_identity(w: &mut XmlWriter, name: &str, id: &Identity) -> Result<()> {
    if id.is_empty() {
        return Ok(());
    }
    w.start_element(name)?;
    w.start_element("typ:address")?;
    w.opt_text_element("typ:company", id.company.as_deref())?;
    w.opt_text_element("typ:name", id.name.as_deref())?;
    w.opt_text_element("typ:city", id.city.as_deref())?;
    w.opt_text_element("typ:street", id.street.as_deref())?;
    w.opt_text_element("typ:zip", id.zip.as_deref())?;
    w.opt_text_element("typ:ico", id.ico.as_deref())?;
    w.opt_text_element("typ:dic", id.dic.as_deref())?;
    if let Some(country) = id.country.as_deref().filter(|c| !c.is_empty()) {
        w.wrapped_text_element("typ:country", "typ:ids", country)?;
    }
    w.opt_text_element("typ:phone", id.phone.as_deref())?;
    w.opt_text_element("typ:email", id.email.as_deref())?;
    w.end_element("typ:address")?;
    w.end_element(name)?;
    Ok(())
}

fn write_detail(w: &mut XmlWriter, items: &[PohodaItem]) -> Result<()> {
    w.start_element("inv:invoiceDetail")?;
    for item in items {
        w.start_element("inv:invoiceItem")?;
        w.opt_text_element("inv:text", item.text.as_deref())?;
        w.decimal_element("inv:quantity", item.quantity, QUANTITY_DP)?;
        w.opt_text_element("inv:unit", item.unit.as_deref())?;
        w.text_element("inv:payVAT", if item.pay_vat { "true" } else { "false" })?;
        w.text_element("inv:rateVAT", item.rate_vat.code())?;
        w.start_element("inv:homeCurrency")?;
        w.decimal_element("typ:unitPrice", item.unit_price, MONEY_DP)?;
        w.end_element("inv:homeCurrency")?;
        w.opt_text_element("inv:note", item.note.as_deref())?;
        w.opt_text_element("inv:code", item.code.as_deref())?;
        if let Some(ids) = item.stock_item.as_deref().filter(|s| !s.is_empty()) {
            w.start_element("inv:stockItem")?;
            w.wrapped_text_element("typ:stockItem", "typ:ids", ids)?;
            w.end_element("inv:stockItem")?;
        }
        w.end_element("inv:invoiceItem")?;
    }
    w.end_element("inv:invoiceDetail")?;
    Ok(())
}

fn write_summary(w: &mut XmlWriter, s: &PohodaSummary) -> Result<()> {
    w.start_element("inv:invoiceSummary")?;

    let home = &s.home_currency;
    w.start_element("inv:homeCurrency")?;
    for (name, value) in [
        ("typ:priceNone", home.price_none),
        ("typ:priceLow", home.price_low),
        ("typ:priceLowVAT", home.price_low_vat),
        ("typ:priceLowSum", home.price_low_sum),
        ("typ:priceHigh", home.price_high),
        ("typ:priceHighVAT", home.price_high_vat),
        ("typ:priceHighSum", home.price_high_sum),
    ] {
        if let Some(v) = value {
            w.decimal_element(name, v, MONEY_DP)?;
        }
    }
    w.end_element("inv:homeCurrency")?;

    if let Some(fc) = &s.foreign_currency {
        w.start_element("inv:foreignCurrency")?;
        w.wrapped_text_element("typ:currency", "typ:ids", &fc.currency)?;
        if let Some(rate) = fc.rate {
            w.text_element("typ:rate", &rate.normalize().to_string())?;
        }
        if let Some(amount) = fc.amount {
            w.text_element("typ:amount", &amount.normalize().to_string())?;
        }
        if let Some(sum) = fc.price_sum {
            w.decimal_element("typ:priceSum", sum, MONEY_DP)?;
        }
        w.end_element("inv:foreignCurrency")?;
    }

    w.end_element("inv:invoiceSummary")?;
    Ok(())
}

fn write_date(w: &mut XmlWriter, name: &str, date: Option<NaiveDate>) -> Result<()> {
    if let Some(d) = date {
        w.text_element(name, &d.format("%Y-%m-%d").to_string())?;
    }
    Ok(())
}
