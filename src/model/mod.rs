//! Data model shared by the provider, the expander and the hierarchy builder.
//!
//! - [`NodeId`] / [`TreeNode`]: the lazily expanded hub → project → folder → item tree
//! - [`OccurrenceRecord`] / [`ComponentNode`]: component assemblies
//! - [`Hub`], [`Project`], [`Folder`], [`ContentEntry`], [`Page`]: provider records

mod component;
mod node_id;
mod provider;
mod tree;

pub use component::{ComponentNode, OccurrenceRecord};
pub use node_id::{NodeId, NodeKind, ROOT_SENTINEL};
pub use provider::{ContentEntry, Folder, Hub, Page, Project, FOLDER_TYPE_NAME};
pub use tree::TreeNode;
