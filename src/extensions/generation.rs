//! Class generation — synthesizing new class nodes from annotated
//! declarations.
//!
//! Generation runs in a dedicated phase that precedes full resolution of
//! the generated members. Every contributing plugin observes the
//! pre-generation tree within one pass; spliced classes become visible only
//! to later phases. A malformed result aborts that plugin's contribution
//! for that declaration with a localized error instead of silently
//! corrupting the tree.

use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::hir::{DeclKind, DeclarationStatus, ModuleTree, NodeId};

/// The payload of a class to be spliced into the tree.
#[derive(Clone, Debug)]
pub struct ClassBlueprint {
    pub name: SmolStr,
    pub status: DeclarationStatus,
    pub annotations: Vec<SmolStr>,
}

impl ClassBlueprint {
    /// A blueprint with the given name and no modifiers or annotations.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            status: DeclarationStatus::unset(),
            annotations: Vec::new(),
        }
    }

    /// Set the status of the generated class.
    pub fn with_status(mut self, status: DeclarationStatus) -> Self {
        self.status = status;
        self
    }
}

/// Failures of the class generation phase, attributable to one plugin.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generated class `{class}` attached to a {kind:?} node; only File and RegularClass containers are legal")]
    InvalidContainer { class: SmolStr, kind: DeclKind },

    #[error("generated class `{class}` attached to a container that is neither the containing file nor an ancestor class of the annotated declaration")]
    UnreachableContainer { class: SmolStr },
}

/// A new class node paired with the container it attaches to.
///
/// Construction validates the container kind: only a File or RegularClass
/// node is a legal attachment point, and a violation fails here, never
/// later.
#[derive(Debug)]
pub struct GeneratedClass {
    blueprint: ClassBlueprint,
    container: NodeId,
}

impl GeneratedClass {
    /// Pair a blueprint with its container, checking the container kind.
    pub fn new(
        tree: &ModuleTree,
        blueprint: ClassBlueprint,
        container: NodeId,
    ) -> Result<Self, GenerationError> {
        let kind = tree.kind(container);
        if !kind.is_container() {
            return Err(GenerationError::InvalidContainer {
                class: blueprint.name,
                kind,
            });
        }
        Ok(Self { blueprint, container })
    }

    pub fn name(&self) -> &SmolStr {
        &self.blueprint.name
    }

    pub fn container(&self) -> NodeId {
        self.container
    }
}

/// Per-declaration synthesis of new class nodes.
pub trait ClassGenerationExtension {
    /// Generate zero or more classes for one annotated declaration.
    ///
    /// Each result's container must be `containing_file` or an ancestor
    /// class of `annotated`; the phase driver rejects anything else and
    /// drops this plugin's contribution for the declaration.
    fn generate_class(
        &self,
        tree: &ModuleTree,
        containing_file: NodeId,
        annotated: NodeId,
    ) -> Result<Vec<GeneratedClass>, GenerationError>;
}

/// What a generation pass produced.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    /// Ids of the spliced class nodes, in splice order.
    pub generated: Vec<NodeId>,
    /// Plugin-attributable failures; each aborted only that plugin's
    /// contribution for one declaration.
    pub errors: Vec<GenerationError>,
}

impl GenerationOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run class generation over every annotated declaration.
///
/// Plugins run in registration order and all observe the pre-generation
/// snapshot of the tree: splices are collected during the pass and applied
/// only after every plugin has run.
pub fn run_generation_phase(
    tree: &mut ModuleTree,
    generators: &[Box<dyn ClassGenerationExtension>],
) -> GenerationOutcome {
    let mut outcome = GenerationOutcome::default();
    let mut pending: Vec<GeneratedClass> = Vec::new();

    let annotated = tree.annotated_declarations();
    for &(file, decl) in &annotated {
        for generator in generators {
            match generator.generate_class(tree, file, decl) {
                Ok(classes) => {
                    match validate_containers(tree, file, decl, &classes) {
                        Ok(()) => pending.extend(classes),
                        Err(err) => {
                            warn!(
                                declaration = %tree.node(decl).name,
                                error = %err,
                                "dropping generation contribution"
                            );
                            outcome.errors.push(err);
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        declaration = %tree.node(decl).name,
                        error = %err,
                        "generation plugin failed"
                    );
                    outcome.errors.push(err);
                }
            }
        }
    }

    for generated in pending {
        let id = tree.splice_class(
            generated.blueprint.name.clone(),
            generated.blueprint.status,
            generated.blueprint.annotations,
            generated.container,
        );
        debug!(class = %tree.node(id).name, "spliced generated class");
        outcome.generated.push(id);
    }

    outcome
}

fn validate_containers(
    tree: &ModuleTree,
    file: NodeId,
    annotated: NodeId,
    classes: &[GeneratedClass],
) -> Result<(), GenerationError> {
    for class in classes {
        let container = class.container();
        let reachable = container == file || tree.is_class_ancestor(container, annotated);
        if !reachable {
            return Err(GenerationError::UnreachableContainer {
                class: class.name().clone(),
            });
        }
    }
    Ok(())
}
