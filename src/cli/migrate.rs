use std::path::Path;

use anyhow::Result;

use fakturace::pipeline::migrate_to_file;

use super::Context;

pub fn run(ctx: &Context, output: Option<&Path>) -> Result<()> {
    let store = ctx.open_store()?;
    store.init()?;
    let (path, count) = migrate_to_file(&store, &ctx.settings, output)?;
    println!("Saved {count} invoices to {}", path.display());
    Ok(())
}
