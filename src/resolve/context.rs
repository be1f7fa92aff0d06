//! The plugin-facing resolution context.
//!
//! [`PluginContext`] turns fully-qualified names into usable symbols, even
//! for names reachable only through precompiled libraries. Resolution is
//! lazy: a symbol stays unbound until a consumer actually needs it, at
//! which point the deserializer materializes its body exactly once. Eager
//! resolution would force loading every dependency transitively; deferring
//! keeps large dependency graphs tractable behind a simple synchronous
//! lookup-by-name surface.
//!
//! Everyday "not found" outcomes are absence values, never errors; abrupt
//! failure is reserved for plugin-author misuse and broken module data.

use smol_str::SmolStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::base::QualifiedName;

use super::module::{MemberScope, ModuleDescriptor};
use super::symbol::{Deserializer, MaterializeError, Symbol, SymbolTable};

/// Failures of symbol resolution that are not routine misses.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The root namespace names no declaration; passing it to a
    /// `reference_*` call is plugin misuse.
    #[error("the root namespace cannot be referenced as a symbol")]
    RootName,

    /// A class that must exist for the requested lookup is missing.
    #[error("cannot find class `{0}`")]
    MissingClass(QualifiedName),

    /// Materialization completed without binding the symbol; the handle
    /// would be half-initialized, so the resolution fails instead.
    #[error("symbol `{0}` remained unbound after materialization")]
    Unbound(QualifiedName),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Lazy, recursive, cross-module name-to-symbol resolver.
///
/// Owns the symbol table for its compilation unit; parallel units each own
/// their own context, nothing is shared across units.
pub struct PluginContext {
    module: Arc<ModuleDescriptor>,
    symbols: SymbolTable,
    deserializer: Box<dyn Deserializer>,
}

impl PluginContext {
    pub fn new(module: Arc<ModuleDescriptor>, deserializer: Box<dyn Deserializer>) -> Self {
        Self {
            module,
            symbols: SymbolTable::new(),
            deserializer,
        }
    }

    /// The module this context resolves against.
    pub fn module(&self) -> &ModuleDescriptor {
        &self.module
    }

    /// The context's symbol table.
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Resolve a qualified name to the member scope it denotes.
    ///
    /// The root namespace and packages with declared contents
    /// short-circuit to the package's scope. Otherwise the parent's scope
    /// is resolved recursively and the final segment looked up as a
    /// classifier, whose own (unsubstituted) scope is returned: resolving
    /// `a.b.C.D` resolves `a.b.C` first, then looks up `D` inside it.
    ///
    /// Absence is `None`, never an error.
    pub fn resolve_member_scope(&self, fq_name: &QualifiedName) -> Option<MemberScope<'_>> {
        if fq_name.is_root() {
            return self.module.package(fq_name).map(|p| p.member_scope());
        }
        if let Some(pkg) = self.module.package(fq_name) {
            if pkg.has_declarations() {
                return Some(pkg.member_scope());
            }
        }

        let parent_scope = self.resolve_member_scope(&fq_name.parent()?)?;
        let short = fq_name.short_name()?;
        let classifier = parent_scope.classifier(short)?;
        Some(classifier.member_scope())
    }

    /// Resolve one symbol out of a scope, binding it on demand.
    ///
    /// An unresolved scope or an empty lookup propagates as absence.
    fn resolve_symbol<F>(
        &self,
        scope_name: &QualifiedName,
        referencer: F,
    ) -> Result<Option<Arc<Symbol>>, ResolveError>
    where
        F: FnOnce(&MemberScope<'_>, &SymbolTable) -> Option<Arc<Symbol>>,
    {
        let Some(scope) = self.resolve_member_scope(scope_name) else {
            return Ok(None);
        };
        let Some(symbol) = referencer(&scope, &self.symbols) else {
            return Ok(None);
        };
        self.ensure_bound(&symbol)?;
        Ok(Some(symbol))
    }

    /// Element-wise binding-on-demand for multi-result lookups.
    ///
    /// An unresolved scope yields an empty collection: "no scope" and
    /// "scope with zero matches" are indistinguishable at this layer.
    fn resolve_symbol_collection<F>(
        &self,
        scope_name: &QualifiedName,
        referencer: F,
    ) -> Result<Vec<Arc<Symbol>>, ResolveError>
    where
        F: FnOnce(&MemberScope<'_>, &SymbolTable) -> Vec<Arc<Symbol>>,
    {
        let Some(scope) = self.resolve_member_scope(scope_name) else {
            return Ok(Vec::new());
        };
        let symbols = referencer(&scope, &self.symbols);
        for symbol in &symbols {
            self.ensure_bound(symbol)?;
        }
        Ok(symbols)
    }

    fn ensure_bound(&self, symbol: &Arc<Symbol>) -> Result<(), ResolveError> {
        if symbol.is_bound() {
            return Ok(());
        }
        debug!(symbol = %symbol.fq_name(), "materializing unbound symbol");
        self.deserializer.materialize(symbol)?;
        if !symbol.is_bound() {
            return Err(ResolveError::Unbound(symbol.fq_name().clone()));
        }
        Ok(())
    }

    fn split(fq_name: &QualifiedName) -> Result<(QualifiedName, SmolStr), ResolveError> {
        match (fq_name.parent(), fq_name.short_name()) {
            (Some(parent), Some(short)) => Ok((parent, short.clone())),
            _ => Err(ResolveError::RootName),
        }
    }

    /// Reference the class with the given qualified name.
    ///
    /// A missing class is a routine miss and soft-fails to `Ok(None)`.
    pub fn reference_class(
        &self,
        fq_name: &QualifiedName,
    ) -> Result<Option<Arc<Symbol>>, ResolveError> {
        let (parent, short) = Self::split(fq_name)?;
        self.resolve_symbol(&parent, |scope, table| {
            scope.classifier(&short).map(|d| table.reference_class(d))
        })
    }

    /// Reference the constructors of a class.
    ///
    /// The class itself must exist: a plugin asking for constructors of a
    /// missing class is an author error, not a routine miss.
    pub fn reference_constructors(
        &self,
        class_fq_name: &QualifiedName,
    ) -> Result<Vec<Arc<Symbol>>, ResolveError> {
        self.reference_class(class_fq_name)?
            .ok_or_else(|| ResolveError::MissingClass(class_fq_name.clone()))?;

        let (parent, short) = Self::split(class_fq_name)?;
        self.resolve_symbol_collection(&parent, |scope, table| {
            scope
                .classifier(&short)
                .map(|d| {
                    d.constructors()
                        .iter()
                        .map(|c| table.reference_constructor(c))
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Reference the functions with the given qualified name (an overload
    /// set). An unresolved parent scope yields an empty collection.
    pub fn reference_functions(
        &self,
        fq_name: &QualifiedName,
    ) -> Result<Vec<Arc<Symbol>>, ResolveError> {
        let (parent, short) = Self::split(fq_name)?;
        self.resolve_symbol_collection(&parent, |scope, table| {
            scope
                .functions(&short)
                .iter()
                .map(|d| table.reference_function(d))
                .collect()
        })
    }

    /// Reference the properties with the given qualified name.
    pub fn reference_properties(
        &self,
        fq_name: &QualifiedName,
    ) -> Result<Vec<Arc<Symbol>>, ResolveError> {
        let (parent, short) = Self::split(fq_name)?;
        self.resolve_symbol_collection(&parent, |scope, table| {
            scope
                .properties(&short)
                .iter()
                .map(|d| table.reference_property(d))
                .collect()
        })
    }

    /// Eagerly resolve and bind everything the named scope contributes.
    ///
    /// The deliberate counterpart of the lazy `reference_*` surface, for
    /// consumers that need a fully-materialized scope (whole-scope
    /// validation, serialization): every classifier with its constructors,
    /// every function, every property, recursing into nested classifier
    /// scopes. Returns the bound symbols in traversal order.
    ///
    /// An unresolved scope yields an empty collection, matching the
    /// collection lookups. The first materialization failure aborts the
    /// walk.
    pub fn force_resolve_all(
        &self,
        scope_fq_name: &QualifiedName,
    ) -> Result<Vec<Arc<Symbol>>, ResolveError> {
        let Some(scope) = self.resolve_member_scope(scope_fq_name) else {
            return Ok(Vec::new());
        };
        debug!(scope = %scope_fq_name, "force-resolving scope contents");
        let mut bound = Vec::new();
        self.force_resolve_scope(scope, &mut bound)?;
        Ok(bound)
    }

    fn force_resolve_scope(
        &self,
        scope: MemberScope<'_>,
        bound: &mut Vec<Arc<Symbol>>,
    ) -> Result<(), ResolveError> {
        for classifier in scope.classifiers() {
            let symbol = self.symbols.reference_class(classifier);
            self.ensure_bound(&symbol)?;
            bound.push(symbol);
            for constructor in classifier.constructors() {
                let symbol = self.symbols.reference_constructor(constructor);
                self.ensure_bound(&symbol)?;
                bound.push(symbol);
            }
            self.force_resolve_scope(classifier.member_scope(), bound)?;
        }
        for function in scope.all_functions() {
            let symbol = self.symbols.reference_function(function);
            self.ensure_bound(&symbol)?;
            bound.push(symbol);
        }
        for property in scope.all_properties() {
            let symbol = self.symbols.reference_property(property);
            self.ensure_bound(&symbol)?;
            bound.push(symbol);
        }
        Ok(())
    }
}
