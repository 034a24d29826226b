//! # Repository Import Library
//!
//! Core functionality for the `repo-import` interactive import wizard: pick
//! a source-control provider, configure it, and select a subset of an
//! organization's repositories via a regex-style name filter. The
//! `repo-import` binary is a thin terminal surface over this library.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use repo_import::cache::RepositoryCache;
//! use repo_import::error::Result;
//! use repo_import::lister::RemoteRepositoryLister;
//! use repo_import::provider::ProviderRegistry;
//! use repo_import::session::SessionContext;
//! use repo_import::wizard::WizardEngine;
//!
//! struct FixedLister;
//!
//! impl RemoteRepositoryLister for FixedLister {
//!     fn list_repositories_for_organization(
//!         &self,
//!         _identity: &str,
//!         _organization: &str,
//!     ) -> Result<Vec<String>> {
//!         Ok(vec!["web".into(), "api".into(), "infra".into()])
//!     }
//! }
//!
//! let engine = WizardEngine::new(
//!     ProviderRegistry::with_defaults(),
//!     RepositoryCache::new(),
//!     Arc::new(FixedLister),
//! );
//!
//! let mut ctx = SessionContext::new();
//! ctx.identity = Some("alice".into());
//! ctx.organization = Some("acme".into());
//! ctx.pattern_input = Some("ap.*".into());
//!
//! let selected = engine.run(&mut ctx).unwrap();
//! assert_eq!(selected, vec!["api".to_string()]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Wizard engine (`wizard`)**: the step state machine. Provider
//!   selection is followed by the opaque configuration subgraph the chosen
//!   provider contributes, then repository selection and execution. Steps
//!   expose `initialize` (idempotent), `validate` (warnings never block,
//!   errors do) and `execute` (mutates the session only on success).
//! - **Session state (`session`)**: typed per-run context, owned by exactly
//!   one session.
//! - **Repository cache (`cache`)**: process-wide memoization of name
//!   listings per (identity, organization) with a single-flight guarantee;
//!   failures are never cached.
//! - **Pattern filter (`pattern`)**: full-string regex matching over
//!   repository names; blank input means match-all.
//! - **Providers (`provider`)** and **listers (`lister`)**: the closed set
//!   of configured backends and the remote-listing seam behind them.

pub mod cache;
pub mod error;
pub mod lister;
pub mod pattern;
pub mod provider;
pub mod session;
pub mod wizard;

#[cfg(test)]
mod pattern_proptest;
