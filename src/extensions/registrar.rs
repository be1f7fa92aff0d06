//! Per-plugin extension registration.
//!
//! Each plugin implements [`ExtensionRegistrar`] and contributes its
//! factories through a [`RegistrarContext`] — a plain builder that records
//! contributions in call order. [`register_extensions`] drives one plugin's
//! configuration step and hands the result to the registry.

use crate::session::SessionInfo;

use super::generation::ClassGenerationExtension;
use super::registry::{
    ClassGeneratorFactory, ContributedFactory, ExtensionPointName, ExtensionPointRegistry,
    RegistryError, StatusTransformerFactory,
};
use super::status::StatusTransformerExtension;

/// The configuration step of one plugin.
///
/// `configure` is called once, at session setup, before any phase runs.
pub trait ExtensionRegistrar {
    fn configure(&self, ctx: &mut RegistrarContext);
}

/// Ordered collector for one plugin's contributed factories.
#[derive(Default)]
pub struct RegistrarContext {
    status_transformers: Vec<StatusTransformerFactory>,
    class_generators: Vec<ClassGeneratorFactory>,
}

impl RegistrarContext {
    /// Contribute a status transformer factory.
    ///
    /// The factory is deferred: it runs at session start, not here.
    pub fn register_status_transformer<F>(&mut self, factory: F)
    where
        F: Fn(&SessionInfo) -> Box<dyn StatusTransformerExtension> + 'static,
    {
        self.status_transformers.push(Box::new(factory));
    }

    /// Contribute a class generator factory.
    pub fn register_class_generator<F>(&mut self, factory: F)
    where
        F: Fn(&SessionInfo) -> Box<dyn ClassGenerationExtension> + 'static,
    {
        self.class_generators.push(Box::new(factory));
    }
}

/// The factories one plugin contributed, per extension point.
pub struct RegisteredExtensions {
    pub status_transformers: Vec<StatusTransformerFactory>,
    pub class_generators: Vec<ClassGeneratorFactory>,
}

impl RegisteredExtensions {
    /// Run a plugin's configuration step and collect its contributions.
    pub fn configure(registrar: &dyn ExtensionRegistrar) -> Self {
        let mut ctx = RegistrarContext::default();
        registrar.configure(&mut ctx);
        Self {
            status_transformers: ctx.status_transformers,
            class_generators: ctx.class_generators,
        }
    }
}

/// Register one plugin's contributions into the registry.
///
/// Contributions land under their point in the plugin's call order;
/// plugins registered earlier keep earlier positions.
pub fn register_extensions(
    registry: &mut ExtensionPointRegistry,
    registrar: &dyn ExtensionRegistrar,
) -> Result<(), RegistryError> {
    let extensions = RegisteredExtensions::configure(registrar);

    registry.register(
        &ExtensionPointName::STATUS_TRANSFORMER,
        extensions
            .status_transformers
            .into_iter()
            .map(ContributedFactory::StatusTransformer)
            .collect(),
    )?;
    registry.register(
        &ExtensionPointName::CLASS_GENERATION,
        extensions
            .class_generators
            .into_iter()
            .map(ContributedFactory::ClassGeneration)
            .collect(),
    )?;
    Ok(())
}
