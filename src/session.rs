//! Compilation session lifecycle.
//!
//! A [`CompilationSession`] is an explicit context object: created at
//! session start from a fully-populated registry, discarded at session end.
//! Registration completes entirely before a session starts, so the
//! instantiated extensions are read-only for the session's lifetime.
//!
//! One session runs on one logical sequential thread of control; parallel
//! compilation of independent modules gives each unit its own session,
//! registry, and resolution context.

use smol_str::SmolStr;
use tracing::debug;

use crate::extensions::{
    ClassGenerationExtension, ContributedFactory, ExtensionPointName, ExtensionPointRegistry,
    GenerationOutcome, PipelineError, StatusTransformPipeline, run_generation_phase,
};
use crate::hir::{DeclKind, DeclarationStatus, DeclNode, ModuleTree, NodeId};

/// Language settings extensions may consult.
#[derive(Clone, Debug)]
pub struct LanguageSettings {
    pub language_version: SmolStr,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            language_version: SmolStr::new_static("1.0"),
        }
    }
}

/// The compilation-session handle passed to extension factories.
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub module_name: SmolStr,
    pub settings: LanguageSettings,
}

impl SessionInfo {
    pub fn new(module_name: impl Into<SmolStr>) -> Self {
        Self {
            module_name: module_name.into(),
            settings: LanguageSettings::default(),
        }
    }
}

/// One compilation session's instantiated extensions and phase drivers.
pub struct CompilationSession {
    info: SessionInfo,
    status_pipeline: StatusTransformPipeline,
    class_generators: Vec<Box<dyn ClassGenerationExtension>>,
}

impl CompilationSession {
    /// Instantiate every registered factory, in registration order, and
    /// start the session.
    pub fn start(info: SessionInfo, registry: &ExtensionPointRegistry) -> Self {
        let mut transformers = Vec::new();
        for factory in registry.extensions_for(&ExtensionPointName::STATUS_TRANSFORMER) {
            // The registry only admits matching kinds per point.
            if let ContributedFactory::StatusTransformer(make) = factory {
                transformers.push(make(&info));
            }
        }

        let mut generators = Vec::new();
        for factory in registry.extensions_for(&ExtensionPointName::CLASS_GENERATION) {
            if let ContributedFactory::ClassGeneration(make) = factory {
                generators.push(make(&info));
            }
        }

        debug!(
            module = %info.module_name,
            status_transformers = transformers.len(),
            class_generators = generators.len(),
            "compilation session started"
        );
        Self {
            info,
            status_pipeline: StatusTransformPipeline::new(transformers),
            class_generators: generators,
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn status_pipeline(&self) -> &StatusTransformPipeline {
        &self.status_pipeline
    }

    /// Run the status pipeline for one declaration.
    ///
    /// Invoked by the semantic-analysis phase once per declaration; the
    /// composed result is what later phases consume.
    pub fn transform_status(
        &self,
        declaration: &DeclNode,
        status: DeclarationStatus,
    ) -> Result<DeclarationStatus, PipelineError> {
        self.status_pipeline.transform(declaration, status)
    }

    /// Run the status pipeline over every declaration in the tree and
    /// store the composed statuses back.
    pub fn transform_module(&self, tree: &mut ModuleTree) -> Result<(), PipelineError> {
        for raw in 0..tree.len() as u32 {
            let id = NodeId::new(raw);
            if tree.kind(id) == DeclKind::File {
                continue;
            }
            let transformed = self.status_pipeline.transform(tree.node(id), tree.node(id).status)?;
            tree.set_status(id, transformed);
        }
        Ok(())
    }

    /// Run the class generation phase, splicing generated classes into the
    /// tree the analysis phase owns.
    pub fn run_generation(&self, tree: &mut ModuleTree) -> GenerationOutcome {
        run_generation_phase(tree, &self.class_generators)
    }
}
