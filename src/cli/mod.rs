//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod browse;
mod expand;
mod hierarchy;

pub use browse::run_browse;
pub use expand::run_expand;
pub use hierarchy::{run_hierarchy, HierarchyRequest};

use crate::config::AppConfig;
use crate::provider::{AccessToken, FixtureProvider, HierarchyProvider, RequestContext};
use anyhow::{Context, Result};

/// Settings shared by every command that talks to a provider.
#[derive(Debug, Clone)]
pub struct Session {
    /// Effective configuration (file merged with CLI flags)
    pub config: AppConfig,
    /// Bearer token forwarded on every provider call
    pub token: AccessToken,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl Session {
    pub fn new(config: AppConfig, token: AccessToken) -> Self {
        Self {
            config,
            token,
            quiet: false,
        }
    }

    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the configured provider: the fixture when one is set, the
    /// GraphQL API otherwise.
    pub fn provider(&self) -> Result<Box<dyn HierarchyProvider>> {
        if let Some(path) = &self.config.provider.fixture {
            let provider = FixtureProvider::load(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            tracing::info!("Serving data from fixture {}", path.display());
            return Ok(Box::new(provider));
        }
        self.remote_provider()
    }

    #[cfg(feature = "graphql")]
    fn remote_provider(&self) -> Result<Box<dyn HierarchyProvider>> {
        if self.token.is_empty() {
            tracing::warn!("No access token given; set --token or MODEL_HIERARCHY_TOKEN");
        }
        let provider = crate::provider::GraphQlProvider::new(self.config.provider.graphql_config())
            .context("Failed to create GraphQL client")?;
        Ok(Box::new(provider))
    }

    #[cfg(not(feature = "graphql"))]
    fn remote_provider(&self) -> Result<Box<dyn HierarchyProvider>> {
        anyhow::bail!(
            "built without the 'graphql' feature; pass --fixture or rebuild with --features graphql"
        )
    }

    /// A fresh request context, starting the configured deadline now.
    #[must_use]
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new(self.token.clone());
        match self.config.pagination.deadline() {
            Some(deadline) => ctx.with_timeout(deadline),
            None => ctx,
        }
    }
}
