//! Symbols and the deduplicating symbol table.
//!
//! A [`Symbol`] is a handle to a declaration. It starts unbound — carrying
//! only its identity (qualified name + kind) — and is bound at most once,
//! when a consumer forces materialization of its full body. Binding is
//! monotonic: unbound → bound, never reversed.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::base::QualifiedName;

use super::module::{
    ClassifierDescriptor, ConstructorDescriptor, DescriptorId, FunctionDescriptor,
    PropertyDescriptor,
};

/// The kind of declaration a symbol refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Constructor,
    Function,
    Property,
}

/// The materialized form of a declaration, produced by the deserializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationBody {
    pub kind: SymbolKind,
    pub fq_name: QualifiedName,
    /// Qualified names of the declarations this one contains.
    pub declarations: Vec<QualifiedName>,
}

impl DeclarationBody {
    /// A body with no contained declarations.
    pub fn leaf(kind: SymbolKind, fq_name: QualifiedName) -> Self {
        Self {
            kind,
            fq_name,
            declarations: Vec::new(),
        }
    }
}

/// Attempt to re-bind an already-bound symbol.
#[derive(Debug, Error)]
#[error("symbol `{0}` is already bound")]
pub struct AlreadyBound(pub QualifiedName);

/// A handle to a declaration, bound (materialized) or unbound
/// (identity-only).
pub struct Symbol {
    id: DescriptorId,
    fq_name: QualifiedName,
    kind: SymbolKind,
    body: RwLock<Option<DeclarationBody>>,
}

impl Symbol {
    fn new(id: DescriptorId, fq_name: QualifiedName, kind: SymbolKind) -> Self {
        Self {
            id,
            fq_name,
            kind,
            body: RwLock::new(None),
        }
    }

    /// Descriptor identity of this symbol.
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn fq_name(&self) -> &QualifiedName {
        &self.fq_name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Check whether the symbol has been materialized.
    pub fn is_bound(&self) -> bool {
        self.body.read().is_some()
    }

    /// Bind the symbol to its materialized body.
    ///
    /// Binding happens at most once; a second call is an error, the
    /// original body stays in place.
    pub fn bind(&self, body: DeclarationBody) -> Result<(), AlreadyBound> {
        let mut slot = self.body.write();
        if slot.is_some() {
            return Err(AlreadyBound(self.fq_name.clone()));
        }
        *slot = Some(body);
        Ok(())
    }

    /// The materialized body, if bound.
    pub fn body(&self) -> Option<DeclarationBody> {
        self.body.read().clone()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Symbol({:?} {} {})",
            self.kind,
            self.fq_name,
            if self.is_bound() { "bound" } else { "unbound" }
        )
    }
}

/// Deduplicating registry of symbols keyed by descriptor identity.
///
/// Repeated references to the same descriptor return the same
/// [`Arc<Symbol>`] instance, so binding state is shared by every holder.
#[derive(Default)]
pub struct SymbolTable {
    inner: RwLock<FxHashMap<DescriptorId, Arc<Symbol>>>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn reference(&self, id: DescriptorId, fq_name: &QualifiedName, kind: SymbolKind) -> Arc<Symbol> {
        // Fast path: already referenced (read lock).
        {
            let inner = self.inner.read();
            if let Some(symbol) = inner.get(&id) {
                return symbol.clone();
            }
        }

        // Slow path: insert (write lock), double-checking after acquiring.
        let mut inner = self.inner.write();
        if let Some(symbol) = inner.get(&id) {
            return symbol.clone();
        }
        let symbol = Arc::new(Symbol::new(id, fq_name.clone(), kind));
        inner.insert(id, symbol.clone());
        symbol
    }

    /// Reference a class symbol.
    pub fn reference_class(&self, descriptor: &ClassifierDescriptor) -> Arc<Symbol> {
        self.reference(descriptor.id, &descriptor.fq_name, SymbolKind::Class)
    }

    /// Reference a function symbol.
    pub fn reference_function(&self, descriptor: &FunctionDescriptor) -> Arc<Symbol> {
        self.reference(descriptor.id, &descriptor.fq_name, SymbolKind::Function)
    }

    /// Reference a property symbol.
    pub fn reference_property(&self, descriptor: &PropertyDescriptor) -> Arc<Symbol> {
        self.reference(descriptor.id, &descriptor.fq_name, SymbolKind::Property)
    }

    /// Reference a constructor symbol.
    pub fn reference_constructor(&self, descriptor: &ConstructorDescriptor) -> Arc<Symbol> {
        self.reference(descriptor.id, &descriptor.class, SymbolKind::Constructor)
    }

    /// Number of distinct symbols referenced so far.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check whether any symbol has been referenced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Materializes the full body of a named, unbound symbol from precompiled
/// module data.
///
/// Owned by module loading. The call may block on reading module data; it
/// has no cancellation and no timeout, and a failure is terminal for that
/// symbol — no retry is attempted.
pub trait Deserializer {
    fn materialize(&self, symbol: &Symbol) -> Result<(), MaterializeError>;
}

/// Failures of lazy materialization.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("no declaration for `{0}` in precompiled module data")]
    MissingDeclaration(QualifiedName),

    #[error("precompiled module data unreadable: {0}")]
    Unreadable(String),
}
