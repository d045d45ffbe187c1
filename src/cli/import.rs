use std::path::Path;

use anyhow::{Context as _, Result, bail};

use fakturace::pipeline::{import_file, migrate_to_file};

use super::Context;

pub fn run(ctx: &Context, xml: &Path, reset: bool, migrate: bool, output: Option<&Path>) -> Result<()> {
    if !xml.is_file() {
        bail!("input file not found: {}", xml.display());
    }

    let store = ctx.open_store()?;
    if reset {
        store.reset()?;
    }
    store.init()?;

    let summary = import_file(&store, xml, &ctx.settings)
        .with_context(|| format!("importing {}", xml.display()))?;
    println!("{summary}");

    if migrate {
        let (path, count) = migrate_to_file(&store, &ctx.settings, output)?;
        println!("Saved {count} invoices to {}", path.display());
    }
    Ok(())
}
