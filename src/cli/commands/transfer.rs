use domain_mapper::registry::ConfigRegistry;
use domain_mapper::storage::compat;
use crate::ui::prompts::prompt_import_confirmation;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Export the stored (not the overridden) configuration to TOML
pub async fn export_command(registry: &ConfigRegistry, path: &Path) -> Result<()> {
    compat::export_to_toml(registry.store(), registry.keys(), path).await?;
    println!("{} Exported configuration to {}", "✓".green(), path.display());
    Ok(())
}

/// Replace the stored configuration with a TOML file
pub async fn import_command(registry: &mut ConfigRegistry, path: &Path, force: bool) -> Result<()> {
    if !force && !prompt_import_confirmation(&path.display().to_string())? {
        println!("Operation cancelled.");
        return Ok(());
    }

    compat::import_from_toml(registry.store(), registry.keys(), path).await?;
    registry.load(true).await?;

    println!(
        "{} Imported {} domains from {}",
        "✓".green(),
        registry.domains().count(),
        path.display()
    );
    Ok(())
}
