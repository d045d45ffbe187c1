use anyhow::Result;
use tracing::info;

use super::Context;

pub fn run(ctx: &Context, reset: bool) -> Result<()> {
    let store = ctx.open_store()?;

    if store.is_initialised()? {
        if !reset {
            println!("Database already initialised at {}", ctx.db_path.display());
            return Ok(());
        }
        store.reset()?;
        println!("Database reset");
    }

    info!(path = %ctx.db_path.display(), "initialising database");
    store.init()?;
    println!("Database initialised at {}", ctx.db_path.display());
    Ok(())
}
