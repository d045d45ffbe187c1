mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Context};
use fakturace::settings::Settings;
use fakturace::store::InvoiceQuery;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(cli.verbose || settings.debug);
    let ctx = Context::new(settings, cli.db_path)?;

    match cli.command {
        Commands::InitDb { reset } => cli::init_db::run(&ctx, reset),
        Commands::Import {
            xml,
            reset,
            migrate,
            output,
        } => cli::import::run(&ctx, &xml, reset, migrate, output.as_deref()),
        Commands::Search {
            code,
            partner,
            last,
            limit,
            json,
        } => {
            let query = InvoiceQuery {
                code,
                partner,
                last,
                limit,
            };
            cli::search::run(&ctx, &query, json)
        }
        Commands::Migrate { output } => cli::migrate::run(&ctx, output.as_deref()),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
