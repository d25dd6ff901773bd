use super::parse_option_value;
use domain_mapper::registry::{ConfigRegistry, SaveScope};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use log::info;

#[derive(Args)]
pub struct OptionsCommands {
    #[command(subcommand)]
    pub command: OptionsSubcommands,
}

#[derive(Subcommand)]
pub enum OptionsSubcommands {
    /// Show every option with its effective value
    List,
    /// Get the value of an option
    Get {
        /// Option name
        name: String,
        /// Show the stored value even if an override is active
        #[arg(long)]
        bypass_override: bool,
    },
    /// Set and save the value of an option
    Set {
        /// Option name
        name: String,
        /// Option value
        value: String,
    },
    /// Reset an option to its default value
    Reset {
        /// Option name
        name: String,
    },
}

pub async fn options_command(args: OptionsCommands, registry: &mut ConfigRegistry) -> Result<()> {
    match args.command {
        OptionsSubcommands::List => list_command(registry),
        OptionsSubcommands::Get { name, bypass_override } => get_command(registry, &name, bypass_override),
        OptionsSubcommands::Set { name, value } => set_command(registry, &name, &value).await,
        OptionsSubcommands::Reset { name } => reset_command(registry, &name).await,
    }
}

fn note_deprecated(registry: &ConfigRegistry, name: &str) {
    if registry.schema().is_deprecated(name) {
        eprintln!(
            "{} '{}' is deprecated, use '{}'",
            "note:".yellow(),
            name,
            registry.resolve(name)
        );
    }
}

fn list_command(registry: &ConfigRegistry) -> Result<()> {
    for def in registry.schema().list_all() {
        let lookup = registry.lookup(&def.key, false)?;
        let value = lookup.value.unwrap_or_else(|| def.default.clone());

        let mut line = format!("{} {}", format!("{:<24}", def.key).bold(), value);
        if lookup.has_override {
            line.push_str(&format!(" {}", "(override)".yellow()));
        } else if value == def.default {
            line.push_str(&format!(" {}", "(default)".dimmed()));
        }
        println!("{}", line);
        if !def.description.is_empty() {
            println!("    {}", def.description.dimmed());
        }
    }
    Ok(())
}

fn get_command(registry: &ConfigRegistry, name: &str, bypass_override: bool) -> Result<()> {
    note_deprecated(registry, name);

    let lookup = registry.lookup(name, bypass_override)?;
    match lookup.value.or_else(|| registry.definition(name).map(|def| def.default.clone())) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!("Option '{}' has no value", name),
    }
    Ok(())
}

async fn set_command(registry: &mut ConfigRegistry, name: &str, raw: &str) -> Result<()> {
    note_deprecated(registry, name);
    info!("Setting {} to {}", name, raw);

    let value = parse_option_value(registry, name, raw)?;
    registry.set(name, value.clone())?;
    registry.save(SaveScope::Options).await?;

    println!("{} {} = {}", "✓".green(), registry.resolve(name), value);
    if registry.is_overridden(name) {
        println!("  an override is active for this invocation, reads still see the override");
    }
    Ok(())
}

async fn reset_command(registry: &mut ConfigRegistry, name: &str) -> Result<()> {
    note_deprecated(registry, name);
    info!("Resetting option: {}", name);

    let Some(def) = registry.definition(name) else {
        anyhow::bail!("Unknown option: {}", name);
    };
    let (key, default) = (def.key.clone(), def.default.clone());

    registry.set(&key, default.clone())?;
    registry.save(SaveScope::Options).await?;

    println!("{} Reset {} to {}", "✓".green(), key, default);
    Ok(())
}
