//! End-to-end tests for the registration, status transform, and class
//! generation phases.

use rstest::rstest;

use lumen_plugin::extensions::{
    AllOpenStatusTransformer, ClassBlueprint, ClassGenerationExtension, ExtensionPointName,
    ExtensionPointRegistry, ExtensionRegistrar, GeneratedClass, GenerationError,
    RegistrarContext, StatusTransformerExtension, register_extensions,
};
use lumen_plugin::hir::{DeclKind, DeclNode, DeclarationStatus, Modality, ModuleTree, NodeId};
use lumen_plugin::session::{CompilationSession, SessionInfo};

/// Fills unset modality with `Final` — the counterpart of the all-open
/// transformer used to check order sensitivity.
struct DefaultFinalTransformer;

impl StatusTransformerExtension for DefaultFinalTransformer {
    fn transform_status(
        &self,
        _declaration: &DeclNode,
        status: &DeclarationStatus,
    ) -> DeclarationStatus {
        status.with_default_modality(Modality::Final)
    }
}

struct AllOpenPlugin;

impl ExtensionRegistrar for AllOpenPlugin {
    fn configure(&self, ctx: &mut RegistrarContext) {
        ctx.register_status_transformer(|_session| Box::new(AllOpenStatusTransformer));
    }
}

struct AllFinalPlugin;

impl ExtensionRegistrar for AllFinalPlugin {
    fn configure(&self, ctx: &mut RegistrarContext) {
        ctx.register_status_transformer(|_session| Box::new(DefaultFinalTransformer));
    }
}

/// Generates one `<name>Builder` class attached to the containing file for
/// every declaration annotated `@Builder`.
struct BuilderPlugin;

struct BuilderGenerator;

impl ClassGenerationExtension for BuilderGenerator {
    fn generate_class(
        &self,
        tree: &ModuleTree,
        containing_file: NodeId,
        annotated: NodeId,
    ) -> Result<Vec<GeneratedClass>, GenerationError> {
        if !tree.node(annotated).has_annotation("Builder") {
            return Ok(Vec::new());
        }
        let name = format!("{}Builder", tree.node(annotated).name);
        // Generated builders are never subclassed.
        let blueprint = ClassBlueprint::named(name)
            .with_status(DeclarationStatus::with_modality(Modality::Final));
        let class = GeneratedClass::new(tree, blueprint, containing_file)?;
        Ok(vec![class])
    }
}

impl ExtensionRegistrar for BuilderPlugin {
    fn configure(&self, ctx: &mut RegistrarContext) {
        ctx.register_class_generator(|_session| Box::new(BuilderGenerator));
    }
}

fn session_with(registrars: &[&dyn ExtensionRegistrar]) -> CompilationSession {
    let mut registry = ExtensionPointRegistry::new();
    for registrar in registrars {
        register_extensions(&mut registry, *registrar).unwrap();
    }
    CompilationSession::start(SessionInfo::new("app"), &registry)
}

#[test]
fn all_open_defaults_unset_modality_to_open() {
    let session = session_with(&[&AllOpenPlugin]);

    let mut tree = ModuleTree::new();
    let file = tree.add_file("main.lm");
    let unset = tree.add_declaration(
        file,
        "Widget",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );
    let explicit = tree.add_declaration(
        file,
        "Frozen",
        DeclKind::RegularClass,
        DeclarationStatus::with_modality(Modality::Final),
    );

    session.transform_module(&mut tree).unwrap();

    assert_eq!(tree.node(unset).status.modality, Some(Modality::Open));
    assert_eq!(tree.node(explicit).status.modality, Some(Modality::Final));
}

#[rstest]
#[case(true, Modality::Open)]
#[case(false, Modality::Final)]
fn transformer_order_decides_the_winner(#[case] open_first: bool, #[case] expected: Modality) {
    let session = if open_first {
        session_with(&[&AllOpenPlugin, &AllFinalPlugin])
    } else {
        session_with(&[&AllFinalPlugin, &AllOpenPlugin])
    };

    let mut tree = ModuleTree::new();
    let file = tree.add_file("main.lm");
    let class = tree.add_declaration(
        file,
        "Widget",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );

    let status = session
        .transform_status(tree.node(class), DeclarationStatus::unset())
        .unwrap();
    assert_eq!(status.modality, Some(expected));
}

#[test]
fn pipeline_is_idempotent_at_fixed_point() {
    let session = session_with(&[&AllOpenPlugin, &AllFinalPlugin]);

    let mut tree = ModuleTree::new();
    let file = tree.add_file("main.lm");
    let class = tree.add_declaration(
        file,
        "Widget",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );

    let once = session
        .transform_status(tree.node(class), DeclarationStatus::unset())
        .unwrap();
    let twice = session.transform_status(tree.node(class), once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn generation_attaches_one_class_under_the_file() {
    let session = session_with(&[&BuilderPlugin]);

    let mut tree = ModuleTree::new();
    let file = tree.add_file("main.lm");
    let widget = tree.add_declaration(
        file,
        "Widget",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );
    tree.annotate(widget, "Builder");

    let children_before = tree.node(file).children().len();
    let outcome = session.run_generation(&mut tree);

    assert!(outcome.is_clean());
    assert_eq!(outcome.generated.len(), 1);
    assert_eq!(tree.node(file).children().len(), children_before + 1);

    let spliced = outcome.generated[0];
    assert_eq!(tree.node(spliced).name.as_str(), "WidgetBuilder");
    assert_eq!(tree.kind(spliced), DeclKind::RegularClass);
    assert_eq!(tree.node(spliced).parent(), Some(file));
    // The blueprint's status travels through the splice.
    assert_eq!(tree.node(spliced).status.modality, Some(Modality::Final));
}

#[test]
fn generation_runs_once_per_annotated_declaration() {
    let session = session_with(&[&BuilderPlugin]);

    let mut tree = ModuleTree::new();
    let file = tree.add_file("main.lm");
    let first = tree.add_declaration(
        file,
        "First",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );
    let second = tree.add_declaration(
        file,
        "Second",
        DeclKind::RegularClass,
        DeclarationStatus::unset(),
    );
    // Only one of the two is annotated.
    tree.annotate(first, "Builder");
    let _ = second;

    let outcome = session.run_generation(&mut tree);
    assert_eq!(outcome.generated.len(), 1);
    assert_eq!(tree.node(outcome.generated[0]).name.as_str(), "FirstBuilder");
}

#[test]
fn contributing_to_the_wrong_point_is_a_configuration_error() {
    use lumen_plugin::extensions::{ContributedFactory, RegistryError};

    let mut registry = ExtensionPointRegistry::new();
    let err = registry
        .register(
            &ExtensionPointName::STATUS_TRANSFORMER,
            vec![ContributedFactory::ClassGeneration(Box::new(|_| {
                Box::new(BuilderGenerator)
            }))],
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::KindMismatch { .. }));
}
