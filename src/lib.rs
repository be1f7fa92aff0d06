//! # lumen-plugin-core
//!
//! Pluggable extension core for the Lumen compiler frontend: plugins
//! adjust default declaration modifiers, synthesize new classes from
//! annotated declarations, and resolve qualified names into symbols that
//! may live in not-yet-materialized precompiled libraries.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! session     → session lifecycle, extension instantiation, phase drivers
//!   ↓
//! extensions  → registry, registrar, status pipeline, class generation
//!   ↓
//! resolve     → module descriptors, symbol table, lazy resolution context
//!   ↓
//! hir         → declaration tree, declaration statuses
//!   ↓
//! base        → primitives (QualifiedName)
//! ```
//!
//! A typical session: plugins register factories through their
//! [`extensions::ExtensionRegistrar`], a [`session::CompilationSession`]
//! instantiates them, the analysis phase runs the status pipeline once per
//! declaration, the generation phase splices plugin-generated classes into
//! the tree, and plugin code resolves names on demand through a
//! [`resolve::PluginContext`].

/// Foundation types: qualified names
pub mod base;

/// Declaration model: statuses and the module tree
pub mod hir;

/// Extension protocol: registry, registrar, and the built-in points
pub mod extensions;

/// Lazy cross-module symbol resolution
pub mod resolve;

/// Session lifecycle and phase entry points
pub mod session;

// Re-export commonly needed items
pub use base::QualifiedName;
pub use extensions::{ExtensionPointName, ExtensionPointRegistry, ExtensionRegistrar};
pub use resolve::PluginContext;
pub use session::{CompilationSession, SessionInfo};
