//! The extension point registry.
//!
//! Holds, per named extension point, the ordered list of factories
//! contributed by all plugins for one compilation session. The registry is
//! built once at session setup, read-only once phases start, and dropped at
//! session teardown — no cross-session state survives.
//!
//! Extension points follow a capability model: each point is a stable name
//! plus a fixed [`ExtensionMode`] tag, and each contribution is a tagged
//! factory. Registering under an unknown point, or contributing the wrong
//! kind of factory to a point, is a configuration error reported
//! immediately.

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::generation::ClassGenerationExtension;
use super::status::StatusTransformerExtension;
use crate::session::SessionInfo;

/// Stable identifier for a category of pluggable behavior.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtensionPointName(SmolStr);

impl ExtensionPointName {
    /// The declaration status transformation point.
    pub const STATUS_TRANSFORMER: ExtensionPointName =
        ExtensionPointName(SmolStr::new_static("StatusTransformer"));

    /// The class generation point.
    pub const CLASS_GENERATION: ExtensionPointName =
        ExtensionPointName(SmolStr::new_static("ClassGeneration"));

    /// Create a point name. Only names seeded into the registry are
    /// registrable.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionPointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ExtensionPointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtensionPointName({})", self.0)
    }
}

/// How often a point's extensions run during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionMode {
    /// Once per declaration (status transformation).
    AllDeclarations,
    /// Once per annotated declaration (class generation).
    AnnotatedElement,
}

/// The kind of extension a factory produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    StatusTransformer,
    ClassGeneration,
}

/// Deferred constructor for a status transformer extension.
///
/// Takes the compilation-session handle and produces one extension
/// instance. Never invoked at registration time, only at session start.
pub type StatusTransformerFactory =
    Box<dyn Fn(&SessionInfo) -> Box<dyn StatusTransformerExtension>>;

/// Deferred constructor for a class generation extension.
pub type ClassGeneratorFactory =
    Box<dyn Fn(&SessionInfo) -> Box<dyn ClassGenerationExtension>>;

/// A factory contributed by a plugin, tagged with the kind of extension it
/// produces.
pub enum ContributedFactory {
    StatusTransformer(StatusTransformerFactory),
    ClassGeneration(ClassGeneratorFactory),
}

impl ContributedFactory {
    /// The kind of extension this factory produces.
    pub fn kind(&self) -> ExtensionKind {
        match self {
            ContributedFactory::StatusTransformer(_) => ExtensionKind::StatusTransformer,
            ContributedFactory::ClassGeneration(_) => ExtensionKind::ClassGeneration,
        }
    }
}

impl fmt::Debug for ContributedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContributedFactory({:?})", self.kind())
    }
}

/// Configuration errors raised at registration time.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown extension point `{0}`")]
    UnknownPoint(ExtensionPointName),

    #[error("extension point `{point}` takes {expected:?} contributions, got {found:?}")]
    KindMismatch {
        point: ExtensionPointName,
        expected: ExtensionKind,
        found: ExtensionKind,
    },
}

struct ExtensionPoint {
    mode: ExtensionMode,
    kind: ExtensionKind,
    factories: Vec<ContributedFactory>,
}

/// Session-scoped registry of extension point contributions.
///
/// Multiple plugins may contribute to the same point; contributions are
/// never deduplicated, and their order is registration order.
pub struct ExtensionPointRegistry {
    points: IndexMap<ExtensionPointName, ExtensionPoint>,
}

impl ExtensionPointRegistry {
    /// Create a registry seeded with the built-in extension points.
    pub fn new() -> Self {
        let mut points = IndexMap::new();
        points.insert(
            ExtensionPointName::STATUS_TRANSFORMER,
            ExtensionPoint {
                mode: ExtensionMode::AllDeclarations,
                kind: ExtensionKind::StatusTransformer,
                factories: Vec::new(),
            },
        );
        points.insert(
            ExtensionPointName::CLASS_GENERATION,
            ExtensionPoint {
                mode: ExtensionMode::AnnotatedElement,
                kind: ExtensionKind::ClassGeneration,
                factories: Vec::new(),
            },
        );
        Self { points }
    }

    /// Append factories to a point's ordered list.
    ///
    /// Fails immediately if the point is unknown or a factory's kind does
    /// not match the point.
    pub fn register(
        &mut self,
        point: &ExtensionPointName,
        factories: Vec<ContributedFactory>,
    ) -> Result<(), RegistryError> {
        let slot = self
            .points
            .get_mut(point)
            .ok_or_else(|| RegistryError::UnknownPoint(point.clone()))?;

        for factory in &factories {
            if factory.kind() != slot.kind {
                return Err(RegistryError::KindMismatch {
                    point: point.clone(),
                    expected: slot.kind,
                    found: factory.kind(),
                });
            }
        }

        debug!(
            point = %point,
            count = factories.len(),
            "registered extension factories"
        );
        slot.factories.extend(factories);
        Ok(())
    }

    /// The ordered factory list for a point, for instantiation at session
    /// start. Unknown points have no contributions.
    pub fn extensions_for(&self, point: &ExtensionPointName) -> &[ContributedFactory] {
        self.points
            .get(point)
            .map(|p| p.factories.as_slice())
            .unwrap_or(&[])
    }

    /// The run mode of a point.
    pub fn mode(&self, point: &ExtensionPointName) -> Option<ExtensionMode> {
        self.points.get(point).map(|p| p.mode)
    }

    /// Total number of contributed factories across all points.
    pub fn len(&self) -> usize {
        self.points.values().map(|p| p.factories.len()).sum()
    }

    /// Check whether no factories have been contributed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ExtensionPointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
