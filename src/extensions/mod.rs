//! The extension protocol: registry, per-plugin registrar, and the two
//! built-in extension points.
//!
//! - [`ExtensionPointRegistry`] - ordered, session-scoped factory lists
//! - [`ExtensionRegistrar`], [`RegistrarContext`] - per-plugin configuration
//! - [`StatusTransformerExtension`], [`StatusTransformPipeline`] - modifier defaults
//! - [`ClassGenerationExtension`], [`GeneratedClass`] - tree-splicing generation

mod generation;
mod registrar;
mod registry;
mod status;

pub use generation::{
    ClassBlueprint, ClassGenerationExtension, GeneratedClass, GenerationError,
    GenerationOutcome, run_generation_phase,
};
pub use registrar::{
    ExtensionRegistrar, RegisteredExtensions, RegistrarContext, register_extensions,
};
pub use registry::{
    ClassGeneratorFactory, ContributedFactory, ExtensionKind, ExtensionMode,
    ExtensionPointName, ExtensionPointRegistry, RegistryError, StatusTransformerFactory,
};
pub use status::{
    AllOpenStatusTransformer, PipelineError, StatusTransformPipeline,
    StatusTransformerExtension,
};
