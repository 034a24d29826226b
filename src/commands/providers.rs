//! # Providers Command Implementation
//!
//! Lists the configured source-control providers with their stable ids and
//! the configuration steps each one contributes to the wizard.

use anyhow::Result;
use clap::Args;
use console::style;

use repo_import::provider::ProviderRegistry;

/// List the configured source-control providers
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Show the configuration steps each provider contributes
    #[arg(long)]
    pub detailed: bool,
}

/// Execute the `providers` command.
pub fn execute(args: ProvidersArgs) -> Result<()> {
    let registry = ProviderRegistry::with_defaults();

    if registry.providers().is_empty() {
        println!("No providers configured");
        return Ok(());
    }

    for (index, provider) in registry.providers().iter().enumerate() {
        let default_marker = if index == 0 { " (default)" } else { "" };
        println!(
            "{}  {}{}",
            style(provider.id()).bold(),
            provider.name(),
            default_marker
        );
        if args.detailed {
            for step in provider.configure_steps() {
                println!("    - {}", step.label());
            }
            if let Some(url) = provider.default_api_url() {
                println!("    api: {}", url);
            }
        }
    }

    Ok(())
}
