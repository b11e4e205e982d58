//! Lazy browsing of the hub → project → folder → item tree.

mod cache;
pub mod expander;

pub use cache::ExpansionCache;
pub use expander::{TreeExpander, UNNAMED_HUB};
