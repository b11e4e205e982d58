//! **Browse remote hub/project/folder hierarchies and rebuild component assemblies.**
//!
//! `model-hierarchy` sits on top of a paginated, cursor-based query API that
//! returns flat, parent-referenced result pages. It provides two things:
//!
//! - a lazily expandable hub → project → folder → item tree, addressed by
//!   stable composite identifiers ([`NodeId`]) that carry everything needed to
//!   expand a node without revisiting its ancestors;
//! - a fully materialized component tree rebuilt from the flat list of
//!   `(parent, child, name)` occurrence records of an assembly, following
//!   every continuation cursor first.
//!
//! ## Core Concepts & Modules
//!
//! - **[`provider`]**: the [`HierarchyProvider`] trait the core consumes, the
//!   per-call [`RequestContext`], a GraphQL implementation (feature `graphql`)
//!   and an offline [`FixtureProvider`].
//! - **[`model`]**: node identifiers, tree rows, provider records and the
//!   materialized [`ComponentNode`].
//! - **[`browse`]**: the [`TreeExpander`], one level of children per call.
//! - **[`hierarchy`]**: occurrence pagination, the two-pass [`TreeBuilder`]
//!   and the indented text renderer.
//! - **[`pipeline`]**: name resolution plus the paginate → build → render
//!   workflow behind [`get_component_hierarchy`].
//! - **[`reports`]**: text, JSON and outline output.
//! - **[`config`]**, **[`cli`]**, **[`tui`]**: the ambient application layers.
//!
//! ## Getting Started
//!
//! ```no_run
//! use model_hierarchy::{
//!     get_component_hierarchy, AccessToken, FixtureProvider, HierarchyOptions, RequestContext,
//! };
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FixtureProvider::load(Path::new("tests/fixtures/workspace.json"))?;
//!     let ctx = RequestContext::new(AccessToken::new("token"));
//!
//!     let hierarchy = get_component_hierarchy(
//!         &provider,
//!         &ctx,
//!         "Hub One",
//!         "Alpha",
//!         "Widget",
//!         &HierarchyOptions::default(),
//!     )?;
//!     print!("{}", hierarchy.hierarchy_text);
//!     Ok(())
//! }
//! ```
//!
//! ### Expanding the tree
//!
//! ```no_run
//! use model_hierarchy::{AccessToken, FixtureProvider, RequestContext, TreeExpander};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FixtureProvider::load(Path::new("tests/fixtures/workspace.json"))?;
//!     let ctx = RequestContext::new(AccessToken::new("token"));
//!
//!     for hub in TreeExpander::new(&provider).expand(&ctx, "#")? {
//!         println!("{} {}", hub.id, hub.label);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    // TUI render functions are inherently long
    clippy::too_many_lines
)]

pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod reports;
pub mod tui;

// Re-export main types for convenience
pub use browse::{ExpansionCache, TreeExpander};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{ErrorContext, HierarchyError, OptionContext, ProtocolErrorKind, Result};
pub use hierarchy::{
    parse_indented, render_text, to_outline, OccurrencePaginator, OrphanPolicy, OutlineNode,
    TreeBuilder, INDENT_WIDTH,
};
pub use model::{ComponentNode, NodeId, NodeKind, OccurrenceRecord, TreeNode};
pub use pipeline::{
    get_component_hierarchy, resolve_hierarchy, ComponentHierarchy, HierarchyOptions,
    ResolutionPolicy,
};
#[cfg(feature = "graphql")]
pub use provider::{GraphQlConfig, GraphQlProvider};
pub use provider::{AccessToken, FixtureProvider, HierarchyProvider, RequestContext};
pub use reports::{ReportFormat, ReportGenerator};
