use super::commands::{DomainsCommands, OptionsCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "domain-mapper")]
#[command(about = "Manage custom domain mappings and options of a multisite network")]
pub struct Cli {
    /// SQLite database holding the options and domains
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Treat unknown option names as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Override an option for this invocation only (NAME=VALUE, repeatable)
    #[arg(short = 'o', long = "override", value_name = "NAME=VALUE", global = true)]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Network-wide option management
    Options(OptionsCommands),
    /// Mapped domain management
    Domains(DomainsCommands),
    /// Write stored options and domains to a TOML file
    Export {
        /// Target file
        path: PathBuf,
    },
    /// Replace stored options and domains with a TOML file
    Import {
        /// Source file
        path: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
