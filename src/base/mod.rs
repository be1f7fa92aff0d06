//! Foundation types for the extension core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`QualifiedName`] - Dotted qualified names (`a.b.C.D`)
//!
//! This module has NO dependencies on other lumen_plugin modules.

mod name;

pub use name::QualifiedName;
