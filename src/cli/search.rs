use anyhow::Result;

use fakturace::abra::AbraInvoice;
use fakturace::store::InvoiceQuery;

use super::Context;

pub fn run(ctx: &Context, query: &InvoiceQuery, json: bool) -> Result<()> {
    let store = ctx.open_store()?;
    if !store.is_initialised()? {
        println!("No invoices found.");
        return Ok(());
    }

    let invoices = store.search(query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&invoices)?);
        return Ok(());
    }
    if invoices.is_empty() {
        println!("No invoices found.");
        return Ok(());
    }

    println!(
        "{:<14} {:<14} {:<10} {:<32} {:>12} {:>5}",
        "Code", "Ext ID", "Issued", "Partner", "Total", "Items"
    );
    println!("{}", "-".repeat(92));
    for inv in &invoices {
        println!("{}", row(inv));
    }
    println!("{} invoice(s)", invoices.len());
    Ok(())
}

fn row(inv: &AbraInvoice) -> String {
    let h = &inv.header;
    let issued = h.dat_vyst.as_deref().map(|d| &d[..d.len().min(10)]).unwrap_or("");
    let total = h.sum_celkem.map(|t| format!("{t:.2}")).unwrap_or_default();
    format!(
        "{:<14} {:<14} {:<10} {:<32} {:>12} {:>5}",
        h.kod.as_deref().unwrap_or(""),
        inv.ext_id.as_deref().unwrap_or(""),
        issued,
        truncate(h.naz_firmy.as_deref().unwrap_or(""), 32),
        total,
        inv.items.len()
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
