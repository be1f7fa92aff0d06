//! Declaration statuses — the modifier record attached to every declaration.
//!
//! A [`DeclarationStatus`] is created once per declaration and transformed
//! exactly once by the status pipeline before later phases freeze and
//! consume it. Fields left unset by the source stay `None` until a
//! transformer fills them in.

use std::fmt;

/// Modality of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    Open,
    Final,
    Abstract,
    Sealed,
}

/// Visibility of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// Immutable record of a declaration's modifiers.
///
/// `None` means the source left the modifier unspecified; status
/// transformers may fill it in, but an explicit modifier is never
/// overwritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeclarationStatus {
    pub modality: Option<Modality>,
    pub visibility: Option<Visibility>,
}

impl DeclarationStatus {
    /// A status with every modifier unset.
    pub fn unset() -> Self {
        Self::default()
    }

    /// A status with an explicit modality.
    pub fn with_modality(modality: Modality) -> Self {
        Self {
            modality: Some(modality),
            ..Self::default()
        }
    }

    /// Return a copy with the modality filled in, unless it is already set.
    pub fn with_default_modality(self, modality: Modality) -> Self {
        Self {
            modality: self.modality.or(Some(modality)),
            ..self
        }
    }

    /// Return a copy with the visibility filled in, unless it is already set.
    pub fn with_default_visibility(self, visibility: Visibility) -> Self {
        Self {
            visibility: self.visibility.or(Some(visibility)),
            ..self
        }
    }

    /// Check that `next` carries over every field this status has set.
    ///
    /// Returns the name of the first explicitly-set field that `next`
    /// dropped or changed. Used by the pipeline to police the
    /// monotonic-update contract.
    pub fn preserves(&self, next: &DeclarationStatus) -> Option<&'static str> {
        if self.modality.is_some() && next.modality != self.modality {
            return Some("modality");
        }
        if self.visibility.is_some() && next.visibility != self.visibility {
            return Some("visibility");
        }
        None
    }

    /// Check whether every modifier has a value.
    pub fn is_complete(&self) -> bool {
        self.modality.is_some() && self.visibility.is_some()
    }
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modality {
            Some(m) => write!(f, "{:?}", m)?,
            None => f.write_str("<modality unset>")?,
        }
        f.write_str(" ")?;
        match self.visibility {
            Some(v) => write!(f, "{:?}", v),
            None => f.write_str("<visibility unset>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fills_only_unset() {
        let unset = DeclarationStatus::unset();
        let filled = unset.with_default_modality(Modality::Open);
        assert_eq!(filled.modality, Some(Modality::Open));

        let explicit = DeclarationStatus::with_modality(Modality::Final);
        let untouched = explicit.with_default_modality(Modality::Open);
        assert_eq!(untouched.modality, Some(Modality::Final));
    }

    #[test]
    fn test_preserves_detects_overwrite() {
        let prior = DeclarationStatus::with_modality(Modality::Final);
        let overwritten = DeclarationStatus::with_modality(Modality::Open);
        assert_eq!(prior.preserves(&overwritten), Some("modality"));
    }

    #[test]
    fn test_preserves_allows_fill_in() {
        let prior = DeclarationStatus::unset();
        let filled = prior
            .with_default_modality(Modality::Open)
            .with_default_visibility(Visibility::Public);
        assert_eq!(prior.preserves(&filled), None);
    }

    #[test]
    fn test_complete_needs_both_modifiers() {
        assert!(!DeclarationStatus::unset().is_complete());
        assert!(!DeclarationStatus::with_modality(Modality::Open).is_complete());
        let both = DeclarationStatus::with_modality(Modality::Open)
            .with_default_visibility(Visibility::Public);
        assert!(both.is_complete());
    }

    #[test]
    fn test_preserves_detects_dropped_visibility() {
        let prior = DeclarationStatus::unset().with_default_visibility(Visibility::Private);
        let dropped = DeclarationStatus::unset();
        assert_eq!(prior.preserves(&dropped), Some("visibility"));
    }
}
