use domain_mapper::domain::{Domain, WwwRule};
use domain_mapper::registry::{ConfigRegistry, SaveScope};
use crate::ui::prompts::prompt_remove_confirmation;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use log::info;

#[derive(Args)]
pub struct DomainsCommands {
    #[command(subcommand)]
    pub command: DomainsSubcommands,
}

#[derive(Subcommand)]
pub enum DomainsSubcommands {
    /// List mapped domains
    List,
    /// Show a mapped domain, or one of its fields
    Show {
        /// Domain name
        name: String,
        /// Field to print (name, site, active, primary, www, https, redirect)
        field: Option<String>,
    },
    /// Map a domain to a site, replacing an existing mapping
    Add {
        /// Domain name
        name: String,
        /// Site id the domain serves
        #[arg(long, default_value_t = 0)]
        site: u64,
        /// Make this the canonical domain of its site
        #[arg(long)]
        primary: bool,
        /// www prefix preference (auto, always, never)
        #[arg(long, default_value = "auto")]
        www: WwwRule,
        /// Force https
        #[arg(long)]
        https: bool,
        /// Redirect every request to this domain
        #[arg(long)]
        redirect: Option<String>,
        /// Register the mapping without enforcing it
        #[arg(long)]
        inactive: bool,
    },
    /// Remove a mapped domain
    Remove {
        /// Domain name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn domains_command(args: DomainsCommands, registry: &mut ConfigRegistry) -> Result<()> {
    match args.command {
        DomainsSubcommands::List => list_command(registry),
        DomainsSubcommands::Show { name, field } => show_command(registry, &name, field.as_deref()),
        DomainsSubcommands::Add {
            name,
            site,
            primary,
            www,
            https,
            redirect,
            inactive,
        } => {
            let mut domain = Domain::new(&name, site)?;
            domain.primary = primary;
            domain.www = www;
            domain.https = https;
            domain.active = !inactive;
            domain.redirect = redirect
                .map(|target| domain_mapper::domain::sanitize(&target))
                .filter(|target| !target.is_empty());
            add_command(registry, domain).await
        }
        DomainsSubcommands::Remove { name, force } => remove_command(registry, &name, force).await,
    }
}

fn list_command(registry: &ConfigRegistry) -> Result<()> {
    let mut count = 0;
    for domain in registry.domains() {
        count += 1;
        let mut flags = Vec::new();
        if domain.primary {
            flags.push("primary".green().to_string());
        }
        if !domain.active {
            flags.push("inactive".red().to_string());
        }
        if domain.https {
            flags.push("https".to_string());
        }
        if domain.www != WwwRule::Auto {
            flags.push(format!("www={}", domain.www));
        }
        if let Some(target) = &domain.redirect {
            flags.push(format!("-> {}", target));
        }

        println!(
            "{} site {} {}",
            format!("{:<32}", domain.name).bold(),
            domain.site,
            flags.join(" ")
        );
    }

    if count == 0 {
        println!("No domains mapped.");
    }
    Ok(())
}

fn show_command(registry: &ConfigRegistry, name: &str, field: Option<&str>) -> Result<()> {
    let Some(domain) = registry.domain(name) else {
        anyhow::bail!("Domain '{}' not found", name);
    };

    match field {
        Some(field) => match domain.field(field) {
            Some(serde_json::Value::String(value)) => println!("{}", value),
            Some(serde_json::Value::Null) => println!(),
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Domains have no field '{}'", field),
        },
        None => {
            let record = serde_json::Value::Object(domain.dump());
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

/// Register `domain`, keeping at most one primary domain per site
///
/// Returns the names of domains that lost their primary flag.
pub fn register_domain(registry: &mut ConfigRegistry, domain: Domain) -> Result<Vec<String>> {
    let replacing = registry.domain(&domain.name).is_some();

    let limit = registry.get_int("max_domains_per_site")?;
    if !replacing && limit > 0 {
        let mapped = registry.domains().filter(|d| d.site == domain.site).count();
        if mapped as i64 >= limit {
            anyhow::bail!(
                "Site {} already has {} domains (max_domains_per_site = {})",
                domain.site,
                mapped,
                limit
            );
        }
    }

    let mut demoted = Vec::new();
    if domain.primary {
        let others: Vec<Domain> = registry
            .domains()
            .filter(|d| d.site == domain.site && d.primary && d.name != domain.name)
            .cloned()
            .collect();
        for mut other in others {
            other.primary = false;
            demoted.push(other.name.clone());
            registry.add_domain(other);
        }
    }

    registry.add_domain(domain);
    Ok(demoted)
}

async fn add_command(registry: &mut ConfigRegistry, domain: Domain) -> Result<()> {
    info!("Adding domain: {} -> site {}", domain.name, domain.site);
    let name = domain.name.clone();

    let demoted = register_domain(registry, domain)?;
    registry.save(SaveScope::Domains).await?;

    println!("{} Mapped {}", "✓".green(), name);
    for other in demoted {
        println!("  {} is no longer primary", other);
    }
    Ok(())
}

async fn remove_command(registry: &mut ConfigRegistry, name: &str, force: bool) -> Result<()> {
    info!("Removing domain: {}", name);

    if registry.domain(name).is_none() {
        anyhow::bail!("Domain '{}' not found", name);
    }

    if !force && !prompt_remove_confirmation(name)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    registry.remove_domain(name);
    registry.save(SaveScope::Domains).await?;

    println!("{} Removed {}", "✓".green(), name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_mapper::options::registrations::default_schema;
    use domain_mapper::storage::MemoryStore;
    use std::sync::Arc;

    async fn registry() -> ConfigRegistry {
        let mut registry =
            ConfigRegistry::new(Arc::new(default_schema().unwrap()), Arc::new(MemoryStore::new()));
        registry.load(false).await.unwrap();
        registry
    }

    fn primary(name: &str, site: u64) -> Domain {
        let mut domain = Domain::new(name, site).unwrap();
        domain.primary = true;
        domain
    }

    #[tokio::test]
    async fn test_single_primary_per_site() {
        let mut registry = registry().await;
        register_domain(&mut registry, primary("a.example.com", 1)).unwrap();
        register_domain(&mut registry, primary("c.example.com", 2)).unwrap();

        let demoted = register_domain(&mut registry, primary("b.example.com", 1)).unwrap();
        assert_eq!(demoted, vec!["a.example.com".to_string()]);
        assert!(!registry.domain("a.example.com").unwrap().primary);
        assert!(registry.domain("b.example.com").unwrap().primary);
        assert!(registry.domain("c.example.com").unwrap().primary);
    }

    #[tokio::test]
    async fn test_domain_limit() {
        let mut registry = registry().await;
        registry.set("max_domains_per_site", 1i64).unwrap();

        register_domain(&mut registry, Domain::new("a.example.com", 1).unwrap()).unwrap();
        assert!(register_domain(&mut registry, Domain::new("b.example.com", 1).unwrap()).is_err());
        register_domain(&mut registry, Domain::new("a.example.com", 1).unwrap()).unwrap();
        register_domain(&mut registry, Domain::new("b.example.com", 2).unwrap()).unwrap();
    }
}
