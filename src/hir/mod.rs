//! Declaration model consumed and produced by the extension phases.
//!
//! - [`DeclarationStatus`], [`Modality`], [`Visibility`] - modifier records
//! - [`ModuleTree`], [`DeclNode`], [`NodeId`], [`DeclKind`] - the declaration tree

mod status;
mod tree;

pub use status::{DeclarationStatus, Modality, Visibility};
pub use tree::{DeclKind, DeclNode, ModuleTree, NodeId};
