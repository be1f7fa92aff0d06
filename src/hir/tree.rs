//! The module declaration tree.
//!
//! An arena of declaration nodes owned by the semantic-analysis phase.
//! Files sit at the roots; classes, functions, and properties hang below
//! them. The class-generation phase splices new class nodes into this tree
//! through [`ModuleTree::splice_class`].

use smol_str::SmolStr;
use std::fmt;

use super::status::DeclarationStatus;

/// Index of a node in a [`ModuleTree`].
///
/// Ids are assigned sequentially as declarations are added and stay stable
/// for the lifetime of the tree; splicing only appends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The kind of a declaration node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    File,
    RegularClass,
    Function,
    Property,
}

impl DeclKind {
    /// Check whether nodes of this kind may contain other declarations.
    pub fn is_container(self) -> bool {
        matches!(self, DeclKind::File | DeclKind::RegularClass)
    }
}

/// One declaration in the module tree.
#[derive(Clone, Debug)]
pub struct DeclNode {
    pub name: SmolStr,
    pub kind: DeclKind,
    pub status: DeclarationStatus,
    /// Annotation names attached to this declaration.
    pub annotations: Vec<SmolStr>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DeclNode {
    /// The enclosing declaration, if any. Files have no parent.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child declarations in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check whether this declaration carries the given annotation.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Check whether this declaration carries any annotation.
    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }
}

/// Arena of declaration nodes for one module.
#[derive(Clone, Debug, Default)]
pub struct ModuleTree {
    nodes: Vec<DeclNode>,
    files: Vec<NodeId>,
}

impl ModuleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file node at the root of the tree.
    pub fn add_file(&mut self, name: impl Into<SmolStr>) -> NodeId {
        let id = self.push(DeclNode {
            name: name.into(),
            kind: DeclKind::File,
            status: DeclarationStatus::unset(),
            annotations: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        self.files.push(id);
        id
    }

    /// Add a declaration under an existing container.
    ///
    /// # Panics
    /// Panics if `parent` is not a File or RegularClass node; only
    /// containers may hold declarations.
    pub fn add_declaration(
        &mut self,
        parent: NodeId,
        name: impl Into<SmolStr>,
        kind: DeclKind,
        status: DeclarationStatus,
    ) -> NodeId {
        assert!(
            self.node(parent).kind.is_container(),
            "declarations can only be added under a File or RegularClass node"
        );
        let id = self.push(DeclNode {
            name: name.into(),
            kind,
            status,
            annotations: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index() as usize].children.push(id);
        id
    }

    /// Attach an annotation to a declaration.
    pub fn annotate(&mut self, node: NodeId, annotation: impl Into<SmolStr>) {
        self.nodes[node.index() as usize]
            .annotations
            .push(annotation.into());
    }

    /// Replace the status of a declaration with its transformed form.
    ///
    /// Called once per declaration by the analysis phase after the status
    /// pipeline has run.
    pub fn set_status(&mut self, node: NodeId, status: DeclarationStatus) {
        self.nodes[node.index() as usize].status = status;
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &DeclNode {
        &self.nodes[id.index() as usize]
    }

    /// Get the kind of a node.
    pub fn kind(&self, id: NodeId) -> DeclKind {
        self.node(id).kind
    }

    /// File nodes in insertion order.
    pub fn files(&self) -> &[NodeId] {
        &self.files
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The file a declaration belongs to.
    ///
    /// For a file node this is the node itself.
    pub fn containing_file(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            current = parent;
        }
        current
    }

    /// Check whether `candidate` is a RegularClass node strictly above
    /// `of` in the tree.
    pub fn is_class_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        if self.kind(candidate) != DeclKind::RegularClass {
            return false;
        }
        let mut current = self.node(of).parent();
        while let Some(ancestor) = current {
            if ancestor == candidate {
                return true;
            }
            current = self.node(ancestor).parent();
        }
        false
    }

    /// All annotated declarations, paired with their containing file, in
    /// tree order (files in insertion order, declarations depth-first).
    ///
    /// File nodes themselves are never annotated elements.
    pub fn annotated_declarations(&self) -> Vec<(NodeId, NodeId)> {
        let mut result = Vec::new();
        for &file in &self.files {
            self.collect_annotated(file, file, &mut result);
        }
        result
    }

    fn collect_annotated(&self, file: NodeId, node: NodeId, out: &mut Vec<(NodeId, NodeId)>) {
        for &child in self.node(node).children() {
            if self.node(child).is_annotated() {
                out.push((file, child));
            }
            self.collect_annotated(file, child, out);
        }
    }

    /// Splice a generated class under a container node.
    ///
    /// Only called by the generation phase after container validation; the
    /// new node is appended, so existing [`NodeId`]s stay valid.
    pub(crate) fn splice_class(
        &mut self,
        name: SmolStr,
        status: DeclarationStatus,
        annotations: Vec<SmolStr>,
        container: NodeId,
    ) -> NodeId {
        let id = self.push(DeclNode {
            name,
            kind: DeclKind::RegularClass,
            status,
            annotations,
            parent: Some(container),
            children: Vec::new(),
        });
        self.nodes[container.index() as usize].children.push(id);
        id
    }

    fn push(&mut self, node: DeclNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
