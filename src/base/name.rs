//! Qualified names for packages, classes, and members.

use smol_str::SmolStr;
use std::fmt;

/// A fully-qualified dotted name like `a.b.C.D`.
///
/// The root namespace is the empty name. Names are immutable values:
/// `parent` and `child` return new names rather than mutating.
///
/// Segments are [`SmolStr`]s, so cloning a name is cheap for the short
/// identifiers that dominate compiler workloads.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QualifiedName {
    segments: Vec<SmolStr>,
}

impl QualifiedName {
    /// The root namespace (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a name from segments.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted name. The empty string is the root namespace.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self {
            segments: dotted.split('.').map(SmolStr::new).collect(),
        }
    }

    /// Check whether this is the root namespace.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The enclosing name: `a.b.C` → `a.b`, `a` → root.
    ///
    /// Returns `None` for the root namespace, which has no parent.
    pub fn parent(&self) -> Option<QualifiedName> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The final segment: `a.b.C` → `C`. `None` for the root namespace.
    pub fn short_name(&self) -> Option<&SmolStr> {
        self.segments.last()
    }

    /// Extend this name with one more segment.
    pub fn child(&self, segment: impl Into<SmolStr>) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The segments of this name, outermost first.
    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// Number of segments (0 for the root namespace).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check whether this name has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("QualifiedName(<root>)")
        } else {
            write!(f, "QualifiedName({})", self)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = QualifiedName::parse("a.b.C");
        assert_eq!(name.len(), 3);
        assert_eq!(name.to_string(), "a.b.C");
    }

    #[test]
    fn test_root() {
        let root = QualifiedName::root();
        assert!(root.is_root());
        assert!(root.parent().is_none());
        assert!(root.short_name().is_none());
        assert_eq!(QualifiedName::parse(""), root);
    }

    #[test]
    fn test_parent_chain() {
        let name = QualifiedName::parse("a.b.C");
        let parent = name.parent().unwrap();
        assert_eq!(parent.to_string(), "a.b");

        let grandparent = parent.parent().unwrap();
        assert_eq!(grandparent.to_string(), "a");

        let root = grandparent.parent().unwrap();
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(
            QualifiedName::parse("a.b.C").short_name().unwrap().as_str(),
            "C"
        );
        assert_eq!(QualifiedName::parse("a").short_name().unwrap().as_str(), "a");
    }

    #[test]
    fn test_child() {
        let name = QualifiedName::parse("a.b").child("C");
        assert_eq!(name.to_string(), "a.b.C");
    }

    #[test]
    fn test_from_segments() {
        assert_eq!(
            QualifiedName::from_segments(["a", "b", "C"]),
            QualifiedName::parse("a.b.C")
        );
        assert!(QualifiedName::from_segments(Vec::<&str>::new()).is_root());
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(
            QualifiedName::parse("a.b"),
            QualifiedName::root().child("a").child("b")
        );
        assert_ne!(QualifiedName::parse("a.b"), QualifiedName::parse("a.c"));
    }
}
