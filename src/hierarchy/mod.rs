//! Component assembly hierarchies.
//!
//! - [`paginator`]: accumulates flat occurrence records across cursor pages
//! - [`builder`]: links those records into an owned [`ComponentNode`] tree
//! - [`render`]: indented text and outline forms of that tree
//!
//! [`ComponentNode`]: crate::model::ComponentNode

pub mod builder;
pub mod paginator;
pub mod render;
mod stats;

pub use builder::{OrphanPolicy, TreeBuilder};
pub use paginator::{collect_pages, OccurrencePaginator, DEFAULT_MAX_PAGES};
pub use render::{
    parse_indented, render_text, render_text_with_indent, repeated_parts, root_line, to_outline,
    OutlineNode, INDENT_WIDTH,
};
pub use stats::{BuildStats, PaginationStats};
