use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::sync::Arc;

mod cli;
mod ui;

use cli::Cli;
use cli::app::Commands;
use domain_mapper::options::registrations;
use domain_mapper::{AppConfig, ConfigRegistry, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    info!("Starting domain-mapper");

    let config = AppConfig::resolve(cli.db.clone(), cli.strict)?;

    let schema = registrations::default_schema()?;
    debug!("Initialized options schema with {} options", schema.count());

    let store = SqliteStore::open(&config.db_path).await?;
    let mut registry = ConfigRegistry::new(Arc::new(schema), Arc::new(store))
        .with_keys(config.keys.clone())
        .with_strictness(config.strictness);

    registry.load(false).await?;
    cli::commands::apply_overrides(&mut registry, &cli.overrides)?;

    match cli.command {
        Commands::Options(args) => {
            cli::commands::options_command(args, &mut registry).await?;
        }
        Commands::Domains(args) => {
            cli::commands::domains_command(args, &mut registry).await?;
        }
        Commands::Export { path } => {
            cli::commands::export_command(&registry, &path).await?;
        }
        Commands::Import { path, force } => {
            cli::commands::import_command(&mut registry, &path, force).await?;
        }
    }

    Ok(())
}
