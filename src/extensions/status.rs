//! Status transformation — filling in unspecified declaration modifiers.
//!
//! Transformers run in registration order; each sees the output of the
//! previous one, and the final composed status is what later phases
//! consume. A transformer must not mutate its input and may only fill in
//! fields the source left unset — the pipeline itself polices that
//! contract and fails fast on a violation rather than letting a malformed
//! plugin silently rewrite explicit modifiers.

use thiserror::Error;
use tracing::trace;

use crate::hir::{DeclNode, DeclarationStatus, Modality};

/// A hook that adjusts the default modifiers of one declaration.
pub trait StatusTransformerExtension {
    /// Produce the transformed status for `declaration`.
    ///
    /// Contract: return `status` with zero or more previously-unset fields
    /// filled in. Already-explicit modifiers must be carried over
    /// unchanged.
    fn transform_status(
        &self,
        declaration: &DeclNode,
        status: &DeclarationStatus,
    ) -> DeclarationStatus;
}

/// Monotonic-update violations detected while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "status transformer #{index} overwrote the explicit `{field}` of `{declaration}`"
    )]
    ExplicitOverwritten {
        /// Position of the offending transformer in registration order.
        index: usize,
        field: &'static str,
        declaration: String,
    },
}

/// Ordered application of declaration-modifier transformers.
#[derive(Default)]
pub struct StatusTransformPipeline {
    transformers: Vec<Box<dyn StatusTransformerExtension>>,
}

impl StatusTransformPipeline {
    /// Build a pipeline from transformers in registration order.
    pub fn new(transformers: Vec<Box<dyn StatusTransformerExtension>>) -> Self {
        Self { transformers }
    }

    /// Run every transformer over `status` and return the composed result.
    ///
    /// Each stage sees the previous stage's output. After each stage the
    /// pipeline verifies that no explicitly-set field was overwritten; a
    /// violation aborts with an error naming the offending transformer.
    ///
    /// Running the pipeline on an already-transformed status is a no-op:
    /// once every transformer's defaults are applied, a second pass has
    /// nothing left to fill in.
    pub fn transform(
        &self,
        declaration: &DeclNode,
        status: DeclarationStatus,
    ) -> Result<DeclarationStatus, PipelineError> {
        let mut current = status;
        for (index, transformer) in self.transformers.iter().enumerate() {
            let next = transformer.transform_status(declaration, &current);
            if let Some(field) = current.preserves(&next) {
                return Err(PipelineError::ExplicitOverwritten {
                    index,
                    field,
                    declaration: declaration.name.to_string(),
                });
            }
            trace!(
                declaration = %declaration.name,
                stage = index,
                status = %next,
                "status transform stage"
            );
            current = next;
        }
        Ok(current)
    }

    /// Number of transformers in the pipeline.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Check whether the pipeline has no transformers.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

/// The canonical "default to overridable" transformer: sets modality to
/// [`Modality::Open`] whenever the source left it unset. Explicit
/// `Final`/`Abstract`/`Sealed` declarations are untouched.
pub struct AllOpenStatusTransformer;

impl StatusTransformerExtension for AllOpenStatusTransformer {
    fn transform_status(
        &self,
        _declaration: &DeclNode,
        status: &DeclarationStatus,
    ) -> DeclarationStatus {
        if status.modality.is_some() {
            return *status;
        }
        status.with_default_modality(Modality::Open)
    }
}
