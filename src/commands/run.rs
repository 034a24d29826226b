//! # Run Command Implementation
//!
//! Drives one interactive wizard session: provider selection, the selected
//! provider's configuration prompts, repository listing + pattern entry, and
//! final execution. Every step is sequenced by the library's `WizardEngine`;
//! this module only renders prompts and collects answers into the session
//! context.
//!
//! All answers can be pre-seeded with flags (or `REPO_IMPORT_*` environment
//! variables), so a fully-specified invocation never prompts. With
//! `--non-interactive`, a missing answer is an error instead of a prompt.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use repo_import::cache::RepositoryCache;
use repo_import::error::Error;
use repo_import::lister::{GiteaLister, GithubLister, RemoteRepositoryLister};
use repo_import::provider::{ConfigureStep, ProviderKind, ProviderRegistry};
use repo_import::session::{ExtensionKey, SessionContext};
use repo_import::wizard::{Step, WizardEngine};

/// Run the interactive import wizard
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Provider id (see `repo-import providers`); prompted when omitted
    #[arg(short, long, value_name = "ID")]
    pub provider: Option<String>,

    /// Account the listing is performed as
    #[arg(short, long, value_name = "NAME", env = "REPO_IMPORT_IDENTITY")]
    pub identity: Option<String>,

    /// Organization whose repositories to import
    #[arg(short, long, value_name = "NAME")]
    pub organization: Option<String>,

    /// Repository name pattern (full-string regex; blank matches all)
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// API endpoint override for self-hosted instances
    #[arg(long, value_name = "URL", env = "REPO_IMPORT_API_URL")]
    pub api_url: Option<String>,

    /// Access token for the listing call
    #[arg(
        long,
        value_name = "TOKEN",
        env = "REPO_IMPORT_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Timeout in seconds for remote listing calls
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Fail on missing answers instead of prompting
    #[arg(long)]
    pub non_interactive: bool,

    /// Skip the final confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Execute the `run` command.
pub fn execute(args: RunArgs) -> Result<()> {
    let lister = Arc::new(SessionLister::default());
    let engine = WizardEngine::new(
        ProviderRegistry::with_defaults(),
        RepositoryCache::new(),
        Arc::clone(&lister) as Arc<dyn RemoteRepositoryLister>,
    );

    let mut ctx = SessionContext::new();
    seed_context(&engine, &mut ctx, &args)?;

    println!("🎯 Importing repositories into a new project");

    let mut current = Step::Init;
    loop {
        let next = engine.advance(&current, &ctx);
        let Some(step) = next.first().copied() else {
            break;
        };

        // The repository listing needs a concrete HTTP lister; the provider
        // configuration that decides which one is complete at this point.
        if step == Step::RepositorySelect {
            lister.configure(&ctx, Duration::from_secs(args.timeout))?;
        }

        engine.initialize(&step, &mut ctx)?;
        prompt(&engine, &step, &mut ctx, &args)?;

        for finding in engine.validate(&step, &ctx) {
            if finding.is_blocking() {
                bail!("{}", finding.message);
            }
            eprintln!("{} {}", style("warning:").yellow().bold(), finding.message);
        }

        engine.execute(&step, &mut ctx)?;
        current = step;
    }

    report(&ctx);
    Ok(())
}

/// Pre-seed the session context from flags and environment.
fn seed_context(engine: &WizardEngine, ctx: &mut SessionContext, args: &RunArgs) -> Result<()> {
    if let Some(id) = &args.provider {
        ctx.provider = Some(engine.registry().provider_by_id(id)?);
    }
    ctx.identity = args.identity.clone();
    ctx.organization = args.organization.clone();
    ctx.pattern_input = args.pattern.clone();
    if let Some(url) = &args.api_url {
        ctx.set_extension(ExtensionKey::ApiEndpoint, url.clone());
    }
    if let Some(token) = &args.token {
        ctx.set_extension(ExtensionKey::AuthToken, token.clone());
    }
    Ok(())
}

/// Collect the answers a step needs, prompting only for what is missing.
fn prompt(
    engine: &WizardEngine,
    step: &Step,
    ctx: &mut SessionContext,
    args: &RunArgs,
) -> Result<()> {
    match step {
        Step::Init => Ok(()),
        Step::ProviderSelect => prompt_provider(engine, ctx, args),
        Step::ProviderConfigure(configure) => prompt_configure(*configure, ctx, args),
        Step::RepositorySelect => prompt_pattern(engine, ctx, args),
        Step::Execute => confirm_execute(ctx, args),
    }
}

fn confirm_execute(ctx: &SessionContext, args: &RunArgs) -> Result<()> {
    if args.yes || args.non_interactive {
        return Ok(());
    }
    let count = ctx.selected_repositories.as_ref().map_or(0, Vec::len);
    let proceed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Import {} repositories?", count))
        .default(true)
        .interact()
        .context("confirmation aborted")?;
    if !proceed {
        bail!("import cancelled");
    }
    Ok(())
}

fn prompt_provider(engine: &WizardEngine, ctx: &mut SessionContext, args: &RunArgs) -> Result<()> {
    // preset via --provider, or nothing to choose from
    if args.provider.is_some() || engine.registry().providers().is_empty() {
        return Ok(());
    }
    if args.non_interactive {
        // initialize already picked the registry default
        return Ok(());
    }

    let providers = engine.registry().providers();
    let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("git provider")
        .items(&names)
        .default(0)
        .interact()
        .context("provider selection aborted")?;
    ctx.provider = Some(providers[selection]);
    Ok(())
}

fn prompt_configure(
    configure: ConfigureStep,
    ctx: &mut SessionContext,
    args: &RunArgs,
) -> Result<()> {
    match configure {
        ConfigureStep::ApiEndpoint => {
            if ctx.extension(ExtensionKey::ApiEndpoint).is_some() {
                return Ok(());
            }
            if let Some(url) = ctx.provider.and_then(|p| p.default_api_url()) {
                ctx.set_extension(ExtensionKey::ApiEndpoint, url);
                return Ok(());
            }
            let url = required_input(configure.label(), args)?;
            ctx.set_extension(ExtensionKey::ApiEndpoint, url);
            Ok(())
        }
        ConfigureStep::Account => {
            if ctx.identity.is_none() {
                ctx.identity = Some(required_input(configure.label(), args)?);
            }
            Ok(())
        }
        ConfigureStep::Organization => {
            if ctx.organization.is_none() {
                ctx.organization = Some(required_input(configure.label(), args)?);
            }
            Ok(())
        }
    }
}

fn prompt_pattern(engine: &WizardEngine, ctx: &mut SessionContext, args: &RunArgs) -> Result<()> {
    if let Some(names) = &ctx.repository_names {
        println!(
            "Found {} repositories in {}",
            style(names.len()).bold(),
            ctx.organization.as_deref().unwrap_or("<unknown>")
        );
        for name in names {
            println!("  {}", name);
        }
    }

    if ctx.pattern_input.is_some() || args.non_interactive {
        return Ok(());
    }

    // re-prompt while the entered pattern draws a validation warning
    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Repository name pattern")
            .default(".*".to_string())
            .allow_empty(true)
            .interact_text()
            .context("pattern entry aborted")?;
        ctx.pattern_input = Some(input);

        let findings = engine.validate(&Step::RepositorySelect, ctx);
        if findings.is_empty() {
            return Ok(());
        }
        for finding in findings {
            eprintln!("{} {}", style("warning:").yellow().bold(), finding.message);
        }
    }
}

fn required_input(label: &str, args: &RunArgs) -> Result<String> {
    if args.non_interactive {
        bail!(
            "{} is required; pass it as a flag when running non-interactively",
            label
        );
    }
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("{} entry aborted", label))
}

fn report(ctx: &SessionContext) {
    let selected = ctx.selected_repositories.as_deref().unwrap_or_default();
    println!(
        "✅ Selected {} repositories matching `{}`",
        selected.len(),
        ctx.pattern.as_deref().unwrap_or(".*")
    );
    for name in selected {
        println!("  {}", name);
    }
}

/// Lister handed to the engine before the provider is known.
///
/// The engine holds one lister for the whole session, but which HTTP
/// implementation applies is only decided once the provider configuration
/// subgraph has run. This wrapper is wired up at that point; a listing call
/// before then reports the missing configuration instead of panicking.
#[derive(Default)]
struct SessionLister {
    inner: Mutex<Option<Box<dyn RemoteRepositoryLister>>>,
}

impl SessionLister {
    fn configure(&self, ctx: &SessionContext, timeout: Duration) -> Result<()> {
        let Some(provider) = ctx.provider else {
            // nothing selected; the engine will fail the step with context
            return Ok(());
        };
        let api_url = ctx
            .extension(ExtensionKey::ApiEndpoint)
            .map(str::to_string)
            .or_else(|| provider.default_api_url().map(str::to_string));
        let Some(api_url) = api_url else {
            bail!(
                "{} requires --api-url (no default endpoint)",
                provider.name()
            );
        };
        let token = ctx.extension(ExtensionKey::AuthToken).map(str::to_string);

        let lister: Box<dyn RemoteRepositoryLister> = match provider {
            ProviderKind::GitHub => Box::new(GithubLister::new(&api_url, token, timeout)?),
            ProviderKind::Gitea => Box::new(GiteaLister::new(&api_url, token, timeout)?),
        };
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lister lock poisoned"))?;
        *inner = Some(lister);
        Ok(())
    }
}

impl RemoteRepositoryLister for SessionLister {
    fn list_repositories_for_organization(
        &self,
        identity: &str,
        organization: &str,
    ) -> repo_import::error::Result<Vec<String>> {
        let inner = self.inner.lock().map_err(|_| Error::LockPoisoned {
            context: "session lister".to_string(),
        })?;
        match inner.as_ref() {
            Some(lister) => lister.list_repositories_for_organization(identity, organization),
            None => Err(Error::Listing {
                organization: organization.to_string(),
                message: "no provider configured for this session".to_string(),
            }),
        }
    }
}
