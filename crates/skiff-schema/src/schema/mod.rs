//! Every schema version of the pipeline document.
//!
//! Versions are append-only: a new schema gets a new module, the previous
//! latest module gains an `upgrade` function into it, and the registry and
//! upgrade chain each gain one entry. Old modules are never removed.
//!
//! Section types that never changed shape live in [`common`] and are shared
//! by every version, so upgrades move them by value.

pub mod common;
pub mod v1;
pub mod v1alpha1;
pub mod v1alpha2;
pub mod v1beta1;
pub mod v1beta2;

pub use v1 as latest;

/// `skip_serializing_if` helper for non-optional struct sections.
pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
