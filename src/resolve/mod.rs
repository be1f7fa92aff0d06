//! Lazy, recursive, cross-module symbol resolution.
//!
//! - [`ModuleDescriptor`], [`MemberScope`] - read-only package/declaration tree
//! - [`Symbol`], [`SymbolTable`] - deduplicated handles with monotonic binding
//! - [`Deserializer`] - on-demand materialization from precompiled data
//! - [`PluginContext`] - the resolver plugins call into

mod context;
mod module;
mod symbol;

pub use context::{PluginContext, ResolveError};
pub use module::{
    ClassifierDescriptor, ConstructorDescriptor, DescriptorId, FunctionDescriptor,
    MemberScope, ModuleDescriptor, ModuleDescriptorBuilder, PackageFragment,
    PropertyDescriptor,
};
pub use symbol::{
    AlreadyBound, DeclarationBody, Deserializer, MaterializeError, Symbol, SymbolKind,
    SymbolTable,
};
