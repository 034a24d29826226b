//! Per-run wizard session state
//!
//! One [`SessionContext`] is owned by exactly one wizard run and dropped
//! when the run ends; it is never shared across sessions and therefore
//! needs no synchronization. The fields are the closed set of values the
//! built-in steps read and write. Provider-specific configuration steps get
//! a narrow escape hatch in [`ExtensionKey`] instead of a loose string map.

use std::collections::HashMap;

use crate::provider::ProviderKind;

/// Extension values a provider's configuration steps may stash.
///
/// Deliberately a small closed enum: a new key means a conscious API change
/// rather than a stringly-typed free-for-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKey {
    /// Override for the provider's API endpoint (self-hosted instances).
    ApiEndpoint,
    /// Authentication token for the listing call.
    AuthToken,
}

/// Mutable state of one wizard run.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Provider chosen at the selection step.
    pub provider: Option<ProviderKind>,
    /// Identity the listing is performed as; part of the cache key.
    pub identity: Option<String>,
    /// Organization whose repositories are being imported.
    pub organization: Option<String>,
    /// Full listing resolved by the repository-selection step.
    pub repository_names: Option<Vec<String>>,
    /// Pattern text the user settled on (stored by a successful execute).
    pub pattern: Option<String>,
    /// Pattern text currently being edited (input to validate/execute).
    pub pattern_input: Option<String>,
    /// Names that survived the pattern filter (stored by a successful execute).
    pub selected_repositories: Option<Vec<String>>,
    /// Provider-specific extension values.
    extensions: HashMap<ExtensionKey, String>,
}

impl SessionContext {
    /// Create an empty session context
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a provider-specific extension value.
    pub fn set_extension(&mut self, key: ExtensionKey, value: impl Into<String>) {
        self.extensions.insert(key, value.into());
    }

    /// Read a provider-specific extension value.
    pub fn extension(&self, key: ExtensionKey) -> Option<&str> {
        self.extensions.get(&key).map(String::as_str)
    }

    /// Whether the provider configuration subgraph has produced everything
    /// the repository-selection step needs.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some() && self.identity.is_some() && self.organization.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_unconfigured() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_configured());
        assert!(ctx.provider.is_none());
        assert!(ctx.repository_names.is_none());
    }

    #[test]
    fn test_is_configured_requires_all_three_fields() {
        let mut ctx = SessionContext::new();
        ctx.provider = Some(ProviderKind::GitHub);
        assert!(!ctx.is_configured());
        ctx.identity = Some("alice".to_string());
        assert!(!ctx.is_configured());
        ctx.organization = Some("acme".to_string());
        assert!(ctx.is_configured());
    }

    #[test]
    fn test_extension_round_trip() {
        let mut ctx = SessionContext::new();
        assert_eq!(ctx.extension(ExtensionKey::ApiEndpoint), None);
        ctx.set_extension(ExtensionKey::ApiEndpoint, "https://git.example.com");
        assert_eq!(
            ctx.extension(ExtensionKey::ApiEndpoint),
            Some("https://git.example.com")
        );
        // overwriting replaces, not accumulates
        ctx.set_extension(ExtensionKey::ApiEndpoint, "https://other.example.com");
        assert_eq!(
            ctx.extension(ExtensionKey::ApiEndpoint),
            Some("https://other.example.com")
        );
    }
}
