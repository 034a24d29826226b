//! Source-control providers and the provider registry
//!
//! Providers are a closed set of variants rather than trait objects: each
//! [`ProviderKind`] knows its stable id, display name, default API endpoint
//! and the configuration steps it contributes to the wizard. The engine
//! sequences those steps without inspecting them; only the user-facing
//! surface gives them prompts.

use crate::error::{Error, Result};

/// A configured source-control backend.
///
/// Immutable after registration; lives for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
    Gitea,
}

/// A provider-contributed configuration step.
///
/// The wizard engine treats these as opaque data to sequence; what each one
/// collects is between the provider and the UI driving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureStep {
    /// Pick the API endpoint of a self-hosted instance.
    ApiEndpoint,
    /// Identify the account the listing is performed as.
    Account,
    /// Pick the organization whose repositories will be imported.
    Organization,
}

impl ConfigureStep {
    /// Short prompt label for the UI surface.
    pub fn label(&self) -> &'static str {
        match self {
            ConfigureStep::ApiEndpoint => "API endpoint",
            ConfigureStep::Account => "Account",
            ConfigureStep::Organization => "Organization",
        }
    }
}

impl ProviderKind {
    /// Stable identifier used on the CLI and in logs.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Gitea => "gitea",
        }
    }

    /// Human-readable display name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "GitHub",
            ProviderKind::Gitea => "Gitea",
        }
    }

    /// Default API endpoint; Gitea has none (self-hosted, must be supplied).
    pub fn default_api_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::GitHub => Some("https://api.github.com"),
            ProviderKind::Gitea => None,
        }
    }

    /// The configuration step subgraph this provider contributes.
    ///
    /// Returned as plain engine-typed data; the engine appends it after the
    /// provider-selection step and never looks inside.
    pub fn configure_steps(&self) -> Vec<ConfigureStep> {
        match self {
            ProviderKind::GitHub => {
                vec![ConfigureStep::Account, ConfigureStep::Organization]
            }
            ProviderKind::Gitea => vec![
                ConfigureStep::ApiEndpoint,
                ConfigureStep::Account,
                ConfigureStep::Organization,
            ],
        }
    }
}

/// Registry of configured providers.
///
/// Read-only after construction and safe to share across sessions. Order is
/// registration order; the first entry is the default selection.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderKind>,
}

impl ProviderRegistry {
    /// Create a registry from an explicit provider list, keeping its order.
    pub fn new(providers: Vec<ProviderKind>) -> Self {
        Self { providers }
    }

    /// Registry with all built-in providers.
    pub fn with_defaults() -> Self {
        Self::new(vec![ProviderKind::GitHub, ProviderKind::Gitea])
    }

    /// All configured providers in registration order.
    pub fn providers(&self) -> &[ProviderKind] {
        &self.providers
    }

    /// The default selection: the first registered provider, if any.
    pub fn default_provider(&self) -> Option<ProviderKind> {
        self.providers.first().copied()
    }

    /// Look up a provider by its stable id.
    pub fn provider_by_id(&self, id: &str) -> Result<ProviderKind> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .copied()
            .ok_or_else(|| Error::ProviderNotFound {
                id: id.to_string(),
                known: self
                    .providers
                    .iter()
                    .map(|p| p.id())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
