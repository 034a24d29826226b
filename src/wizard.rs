//! The import wizard step state machine
//!
//! A session walks `Init → ProviderSelect → ProviderConfigure* →
//! RepositorySelect → Execute`, where `ProviderConfigure*` is the opaque
//! step subgraph contributed by the selected provider. The engine sequences
//! steps, initializes their choices, collects validation findings and
//! executes them; it never renders anything. One engine instance is shared
//! by every session (the registry is read-only and the cache synchronizes
//! itself); each session owns its [`SessionContext`].
//!
//! Step semantics, in order of invocation:
//! 1. `initialize` — populate step-local choices; idempotent, so a user
//!    navigating back and forward never double-fetches.
//! 2. `validate` — returns warnings (never block) and errors (block
//!    advancing); invoked before the session is configured it degrades to
//!    no findings, since steps are probed speculatively.
//! 3. `execute` — performs the step; mutates the context only on success.

use std::sync::Arc;

use crate::cache::{CacheKey, RepositoryCache};
use crate::error::{Error, Result};
use crate::lister::RemoteRepositoryLister;
use crate::pattern;
use crate::provider::{ConfigureStep, ProviderKind, ProviderRegistry};
use crate::session::SessionContext;

/// A state of the wizard state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    ProviderSelect,
    /// Provider-contributed configuration step; opaque to the engine.
    ProviderConfigure(ConfigureStep),
    RepositorySelect,
    Execute,
}

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Surfaced to the user; never blocks advancing.
    Warning,
    /// Blocks advancing until resolved.
    Error,
}

/// A finding produced by [`WizardEngine::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
}

impl ValidationMessage {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Whether this finding blocks advancing past the step.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

fn execution_failure(message: impl Into<String>) -> Error {
    Error::ExecutionFailure {
        message: message.into(),
        cause: None,
    }
}

/// The step state machine shared by all wizard sessions.
pub struct WizardEngine {
    registry: ProviderRegistry,
    cache: RepositoryCache,
    lister: Arc<dyn RemoteRepositoryLister>,
}

impl WizardEngine {
    pub fn new(
        registry: ProviderRegistry,
        cache: RepositoryCache,
        lister: Arc<dyn RemoteRepositoryLister>,
    ) -> Self {
        Self {
            registry,
            cache,
            lister,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The steps remaining after `state`, as a pure function of state and
    /// context.
    ///
    /// After `ProviderSelect` the selected provider's contributed subgraph
    /// comes first; with no selection (empty registry, or probing before a
    /// choice was made) the generic successors still follow, so navigation
    /// proceeds and the failure surfaces at `execute` with a real message.
    pub fn advance(&self, state: &Step, ctx: &SessionContext) -> Vec<Step> {
        match state {
            Step::Init => {
                let mut steps = vec![Step::ProviderSelect];
                steps.extend(self.advance(&Step::ProviderSelect, ctx));
                steps
            }
            Step::ProviderSelect => {
                let mut steps: Vec<Step> = ctx
                    .provider
                    .map(|p| {
                        p.configure_steps()
                            .into_iter()
                            .map(Step::ProviderConfigure)
                            .collect()
                    })
                    .unwrap_or_default();
                steps.push(Step::RepositorySelect);
                steps.push(Step::Execute);
                steps
            }
            Step::ProviderConfigure(current) => {
                let mut steps: Vec<Step> = ctx
                    .provider
                    .map(|p| remaining_configure_steps(p, *current))
                    .unwrap_or_default();
                steps.push(Step::RepositorySelect);
                steps.push(Step::Execute);
                steps
            }
            Step::RepositorySelect => vec![Step::Execute],
            Step::Execute => vec![],
        }
    }

    /// Populate the step's choices. Idempotent: re-entering a step neither
    /// double-fetches nor duplicates state.
    pub fn initialize(&self, state: &Step, ctx: &mut SessionContext) -> Result<()> {
        match state {
            Step::Init | Step::Execute => Ok(()),
            Step::ProviderSelect => {
                if ctx.provider.is_none() {
                    // empty registry leaves no default selection
                    ctx.provider = self.registry.default_provider();
                }
                Ok(())
            }
            Step::ProviderConfigure(_) => Ok(()),
            Step::RepositorySelect => self.initialize_repository_select(ctx),
        }
    }

    fn initialize_repository_select(&self, ctx: &mut SessionContext) -> Result<()> {
        if !ctx.is_configured() {
            // probed before the provider subgraph ran; nothing to load yet
            return Ok(());
        }
        if ctx.repository_names.is_some() {
            return Ok(());
        }
        let identity = ctx.identity.clone().unwrap_or_default();
        let organization = ctx.organization.clone().unwrap_or_default();
        let key = CacheKey::new(&identity, &organization);
        let lister = Arc::clone(&self.lister);
        let names = self.cache.get_or_fetch(key, || {
            lister.list_repositories_for_organization(&identity, &organization)
        })?;
        log::debug!(
            "repository selection initialized with {} names for {}",
            names.len(),
            organization
        );
        ctx.repository_names = Some(names);
        Ok(())
    }

    /// Collect validation findings for a step.
    ///
    /// Warnings never block; errors do. Probing a step before the session
    /// is configured yields no findings rather than failing.
    pub fn validate(&self, state: &Step, ctx: &SessionContext) -> Vec<ValidationMessage> {
        match state {
            Step::Init | Step::Execute | Step::ProviderConfigure(_) => vec![],
            Step::ProviderSelect => {
                if self.registry.providers().is_empty() {
                    vec![ValidationMessage::warning(
                        "no providers are configured; the import cannot complete",
                    )]
                } else {
                    vec![]
                }
            }
            Step::RepositorySelect => {
                if !ctx.is_configured() {
                    // invoked too early, before the account is set up
                    return vec![];
                }
                match ctx.pattern_input.as_deref() {
                    Some(input) if !input.trim().is_empty() => match pattern::check(input) {
                        Ok(()) => vec![],
                        Err(e) => vec![ValidationMessage::warning(format!(
                            "Not a valid regular expression: {}",
                            e
                        ))],
                    },
                    _ => vec![],
                }
            }
        }
    }

    /// Execute a step. The context is mutated only on success.
    pub fn execute(&self, state: &Step, ctx: &mut SessionContext) -> Result<()> {
        match state {
            Step::Init => Ok(()),
            Step::ProviderSelect => {
                if ctx.provider.is_none() {
                    return Err(execution_failure(
                        "no provider selected; configure at least one provider",
                    ));
                }
                Ok(())
            }
            // Opaque: the surface driving the session collects the values.
            Step::ProviderConfigure(_) => Ok(()),
            Step::RepositorySelect => self.execute_repository_select(ctx),
            Step::Execute => {
                let selected = ctx.selected_repositories.as_ref().ok_or_else(|| {
                    execution_failure("no repositories were selected for import")
                })?;
                log::info!(
                    "importing {} repositories from {}",
                    selected.len(),
                    ctx.organization.as_deref().unwrap_or("<unknown>")
                );
                Ok(())
            }
        }
    }

    fn execute_repository_select(&self, ctx: &mut SessionContext) -> Result<()> {
        let names = ctx.repository_names.clone().ok_or_else(|| {
            execution_failure("no repository listing available; provider not configured")
        })?;
        let input = ctx.pattern_input.clone().unwrap_or_default();
        let compiled = pattern::compile(&input)?;
        let selected = compiled.filter(names.iter().map(String::as_str));
        ctx.pattern = Some(input);
        ctx.selected_repositories = Some(selected);
        Ok(())
    }

    /// Drive a whole session through the state chain.
    ///
    /// Steps run strictly sequentially; the first blocking validation error
    /// or execution failure ends the session. Returns the repository names
    /// selected for import.
    pub fn run(&self, ctx: &mut SessionContext) -> Result<Vec<String>> {
        let mut current = Step::Init;
        loop {
            let next = self.advance(&current, ctx);
            let Some(step) = next.first().copied() else {
                break;
            };
            log::debug!("entering step {:?}", step);
            self.initialize(&step, ctx)?;
            let findings = self.validate(&step, ctx);
            for finding in &findings {
                log::warn!("{:?} validation: {}", step, finding.message);
            }
            if let Some(blocker) = findings.iter().find(|f| f.is_blocking()) {
                return Err(execution_failure(blocker.message.clone()));
            }
            self.execute(&step, ctx)?;
            current = step;
        }
        ctx.selected_repositories
            .clone()
            .ok_or_else(|| execution_failure("session ended without a repository selection"))
    }
}

/// The part of `provider`'s configuration subgraph that follows `current`.
fn remaining_configure_steps(provider: ProviderKind, current: ConfigureStep) -> Vec<Step> {
    let steps = provider.configure_steps();
    steps
        .iter()
        .position(|s| *s == current)
        .map(|idx| {
            steps[idx + 1..]
                .iter()
                .copied()
                .map(Step::ProviderConfigure)
                .collect()
        })
        .unwrap_or_default()
}
