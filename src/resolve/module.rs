//! Read-only module descriptors used during resolution.
//!
//! A [`ModuleDescriptor`] is the root of a module's package and declaration
//! tree, built once by module loading and consulted (never mutated) by the
//! resolution context. [`MemberScope`] is the queryable namespace over the
//! declared members of one package or classifier.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

use crate::base::QualifiedName;

/// Identity of a descriptor within one module.
///
/// Assigned sequentially by the builder; the symbol table keys its
/// deduplication on this.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DescriptorId(u32);

impl DescriptorId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DescriptorId({})", self.0)
    }
}

/// A function declared in a package or classifier.
#[derive(Clone, Debug)]
pub struct FunctionDescriptor {
    pub id: DescriptorId,
    pub fq_name: QualifiedName,
    pub arity: usize,
}

/// A property declared in a package or classifier.
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    pub id: DescriptorId,
    pub fq_name: QualifiedName,
}

/// A constructor of a classifier.
#[derive(Clone, Debug)]
pub struct ConstructorDescriptor {
    pub id: DescriptorId,
    /// Qualified name of the constructed class.
    pub class: QualifiedName,
    pub arity: usize,
}

/// Declared members of one package or classifier.
///
/// Functions and properties may have several entries per simple name
/// (overload sets, accessor groups); classifiers are unique per name.
#[derive(Clone, Debug, Default)]
pub struct Members {
    classifiers: IndexMap<SmolStr, ClassifierDescriptor>,
    functions: IndexMap<SmolStr, Vec<FunctionDescriptor>>,
    properties: IndexMap<SmolStr, Vec<PropertyDescriptor>>,
}

impl Members {
    fn is_empty(&self) -> bool {
        self.classifiers.is_empty() && self.functions.is_empty() && self.properties.is_empty()
    }
}

/// A class-like declaration with its own member scope.
#[derive(Clone, Debug)]
pub struct ClassifierDescriptor {
    pub id: DescriptorId,
    pub fq_name: QualifiedName,
    constructors: Vec<ConstructorDescriptor>,
    members: Members,
}

impl ClassifierDescriptor {
    /// The classifier's constructors in declaration order.
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// The classifier's own (unsubstituted) member scope.
    pub fn member_scope(&self) -> MemberScope<'_> {
        MemberScope::Classifier(self)
    }
}

/// The declarations of one package.
#[derive(Clone, Debug)]
pub struct PackageFragment {
    pub fq_name: QualifiedName,
    members: Members,
}

impl PackageFragment {
    /// Check whether the package has any declared contents.
    pub fn has_declarations(&self) -> bool {
        !self.members.is_empty()
    }

    /// The package's member scope.
    pub fn member_scope(&self) -> MemberScope<'_> {
        MemberScope::Package(self)
    }
}

/// Queryable namespace over the declared members of one package or
/// classifier.
#[derive(Clone, Copy, Debug)]
pub enum MemberScope<'a> {
    Package(&'a PackageFragment),
    Classifier(&'a ClassifierDescriptor),
}

impl<'a> MemberScope<'a> {
    fn members(&self) -> &'a Members {
        match self {
            MemberScope::Package(pkg) => &pkg.members,
            MemberScope::Classifier(class) => &class.members,
        }
    }

    /// Look up a classifier by simple name.
    pub fn classifier(&self, name: &str) -> Option<&'a ClassifierDescriptor> {
        self.members().classifiers.get(name)
    }

    /// Look up the functions with a simple name (an overload set).
    pub fn functions(&self, name: &str) -> &'a [FunctionDescriptor] {
        self.members()
            .functions
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Look up the properties with a simple name.
    pub fn properties(&self, name: &str) -> &'a [PropertyDescriptor] {
        self.members()
            .properties
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every classifier declared in this scope, in declaration order.
    pub fn classifiers(&self) -> impl Iterator<Item = &'a ClassifierDescriptor> {
        self.members().classifiers.values()
    }

    /// Every function declared in this scope; overload sets are flattened,
    /// declaration order preserved.
    pub fn all_functions(&self) -> impl Iterator<Item = &'a FunctionDescriptor> {
        self.members().functions.values().flatten()
    }

    /// Every property declared in this scope.
    pub fn all_properties(&self) -> impl Iterator<Item = &'a PropertyDescriptor> {
        self.members().properties.values().flatten()
    }
}

/// Read-only root of a module's package and declaration tree.
#[derive(Clone, Debug)]
pub struct ModuleDescriptor {
    name: SmolStr,
    packages: FxHashMap<QualifiedName, PackageFragment>,
}

impl ModuleDescriptor {
    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a package by qualified name.
    ///
    /// The root package always exists.
    pub fn package(&self, fq_name: &QualifiedName) -> Option<&PackageFragment> {
        self.packages.get(fq_name)
    }
}

/// Builder for [`ModuleDescriptor`], used by module loading.
///
/// Assigns [`DescriptorId`]s sequentially as declarations are added.
///
/// # Panics
/// The `add_*` methods panic if the named parent package or classifier was
/// never added; a module's structure is built outermost-first.
pub struct ModuleDescriptorBuilder {
    name: SmolStr,
    packages: FxHashMap<QualifiedName, PackageFragment>,
    next_id: u32,
}

impl ModuleDescriptorBuilder {
    /// Start a module with an empty root package.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        let mut packages = FxHashMap::default();
        packages.insert(
            QualifiedName::root(),
            PackageFragment {
                fq_name: QualifiedName::root(),
                members: Members::default(),
            },
        );
        Self {
            name: name.into(),
            packages,
            next_id: 0,
        }
    }

    fn fresh_id(&mut self) -> DescriptorId {
        let id = DescriptorId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an (initially empty) package.
    pub fn add_package(&mut self, fq_name: impl Into<QualifiedName>) -> &mut Self {
        let fq_name = fq_name.into();
        self.packages.entry(fq_name.clone()).or_insert(PackageFragment {
            fq_name,
            members: Members::default(),
        });
        self
    }

    /// Add a classifier; its parent may be a package or another classifier.
    pub fn add_class(&mut self, fq_name: impl Into<QualifiedName>) -> &mut Self {
        let fq_name = fq_name.into();
        let id = self.fresh_id();
        let short = fq_name
            .short_name()
            .expect("cannot add a class at the root namespace")
            .clone();
        let class = ClassifierDescriptor {
            id,
            fq_name: fq_name.clone(),
            constructors: Vec::new(),
            members: Members::default(),
        };
        let parent = fq_name.parent().unwrap_or_else(QualifiedName::root);
        self.members_mut(&parent).classifiers.insert(short, class);
        self
    }

    /// Add a function overload with the given arity.
    pub fn add_function(&mut self, fq_name: impl Into<QualifiedName>, arity: usize) -> &mut Self {
        let fq_name = fq_name.into();
        let id = self.fresh_id();
        let short = fq_name
            .short_name()
            .expect("cannot add a function at the root namespace")
            .clone();
        let parent = fq_name.parent().unwrap_or_else(QualifiedName::root);
        self.members_mut(&parent)
            .functions
            .entry(short)
            .or_default()
            .push(FunctionDescriptor { id, fq_name, arity });
        self
    }

    /// Add a property.
    pub fn add_property(&mut self, fq_name: impl Into<QualifiedName>) -> &mut Self {
        let fq_name = fq_name.into();
        let id = self.fresh_id();
        let short = fq_name
            .short_name()
            .expect("cannot add a property at the root namespace")
            .clone();
        let parent = fq_name.parent().unwrap_or_else(QualifiedName::root);
        self.members_mut(&parent)
            .properties
            .entry(short)
            .or_default()
            .push(PropertyDescriptor { id, fq_name });
        self
    }

    /// Add a constructor to an existing classifier.
    pub fn add_constructor(
        &mut self,
        class: impl Into<QualifiedName>,
        arity: usize,
    ) -> &mut Self {
        let class = class.into();
        let id = self.fresh_id();
        let ctor = ConstructorDescriptor {
            id,
            class: class.clone(),
            arity,
        };
        self.classifier_mut(&class).constructors.push(ctor);
        self
    }

    /// Finish building.
    pub fn build(self) -> ModuleDescriptor {
        ModuleDescriptor {
            name: self.name,
            packages: self.packages,
        }
    }

    /// The member table a declaration with the given parent lands in.
    fn members_mut(&mut self, parent: &QualifiedName) -> &mut Members {
        if self.packages.contains_key(parent) {
            // Borrow-checker friendly double lookup.
            return &mut self
                .packages
                .get_mut(parent)
                .expect("package just checked")
                .members;
        }
        &mut self.classifier_mut(parent).members
    }

    /// Find a classifier by walking down from its innermost enclosing
    /// package through the nested-classifier chain.
    fn classifier_mut(&mut self, fq_name: &QualifiedName) -> &mut ClassifierDescriptor {
        // Longest package prefix.
        let mut prefix = fq_name.clone();
        while !self.packages.contains_key(&prefix) {
            prefix = match prefix.parent() {
                Some(p) => p,
                None => break,
            };
        }
        let depth = prefix.len();
        assert!(
            depth < fq_name.len(),
            "no classifier at `{fq_name}`: the name denotes a package"
        );

        let package = self
            .packages
            .get_mut(&prefix)
            .unwrap_or_else(|| panic!("no package enclosing `{fq_name}`"));

        let segments = fq_name.segments();
        let mut current = package
            .members
            .classifiers
            .get_mut(segments[depth].as_str())
            .unwrap_or_else(|| panic!("unknown classifier `{fq_name}`"));
        for segment in &segments[depth + 1..] {
            current = current
                .members
                .classifiers
                .get_mut(segment.as_str())
                .unwrap_or_else(|| panic!("unknown classifier `{fq_name}`"));
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_module() -> ModuleDescriptor {
        let mut builder = ModuleDescriptorBuilder::new("stdlib");
        builder
            .add_package("a")
            .add_package("a.b")
            .add_class("a.b.C")
            .add_constructor("a.b.C", 0)
            .add_class("a.b.C.D")
            .add_function("a.b.C.greet", 1)
            .add_function("a.b.C.greet", 2)
            .add_property("a.b.value");
        builder.build()
    }

    #[test]
    fn test_root_package_always_exists() {
        let module = ModuleDescriptorBuilder::new("empty").build();
        let root = module.package(&QualifiedName::root()).unwrap();
        assert!(!root.has_declarations());
    }

    #[test]
    fn test_package_members() {
        let module = sample_module();
        let pkg = module.package(&QualifiedName::parse("a.b")).unwrap();
        assert!(pkg.has_declarations());

        let scope = pkg.member_scope();
        assert!(scope.classifier("C").is_some());
        assert_eq!(scope.properties("value").len(), 1);
        assert!(scope.classifier("Missing").is_none());
    }

    #[test]
    fn test_nested_classifier_scope() {
        let module = sample_module();
        let pkg = module.package(&QualifiedName::parse("a.b")).unwrap();
        let c = pkg.member_scope().classifier("C").unwrap();

        let d = c.member_scope().classifier("D").unwrap();
        assert_eq!(d.fq_name.to_string(), "a.b.C.D");

        // Overload set is kept in declaration order.
        let greets = c.member_scope().functions("greet");
        assert_eq!(greets.len(), 2);
        assert_eq!(greets[0].arity, 1);
        assert_eq!(greets[1].arity, 2);
    }

    #[test]
    fn test_constructors() {
        let module = sample_module();
        let pkg = module.package(&QualifiedName::parse("a.b")).unwrap();
        let c = pkg.member_scope().classifier("C").unwrap();
        assert_eq!(c.constructors().len(), 1);
        assert_eq!(c.constructors()[0].class.to_string(), "a.b.C");
    }

    #[test]
    fn test_scope_iteration_covers_every_member() {
        let module = sample_module();
        let pkg = module.package(&QualifiedName::parse("a.b")).unwrap();
        let scope = pkg.member_scope();

        assert_eq!(scope.classifiers().count(), 1);
        assert_eq!(scope.all_properties().count(), 1);

        let c = scope.classifier("C").unwrap();
        // Both greet overloads, flattened in declaration order.
        let arities: Vec<usize> = c.member_scope().all_functions().map(|f| f.arity).collect();
        assert_eq!(arities, vec![1, 2]);
    }

    #[test]
    fn test_descriptor_ids_are_distinct() {
        let module = sample_module();
        let pkg = module.package(&QualifiedName::parse("a.b")).unwrap();
        let c = pkg.member_scope().classifier("C").unwrap();
        let d = c.member_scope().classifier("D").unwrap();
        assert_ne!(c.id, d.id);
    }
}
