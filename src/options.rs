//! Optional knobs for `Provide`/`Invoke`.
//!
//! A composable functional-options builder covering `Name`/`Group`/
//! `Export`/`FillProvideInfo` all at once doesn't fit Rust well; instead
//! `Name`/`Group` are separate, explicitly named methods on
//! [`crate::container::Scope`] (`provide_named`, `provide_group`, ...),
//! and returning [`ProvideInfo`] directly from every `provide_*` call is
//! simpler than filling an out-parameter. `Export` is still common enough
//! across every `provide_*` method to be worth a shared options struct.

use std::panic::Location;

use crate::key::Key;

/// Options shared by every `provide_*` method.
#[derive(Clone, Debug, Default)]
pub struct ProvideOptions {
    /// When true, the provider is also registered in every ancestor scope:
    /// a provider exported from a child scope becomes visible to ancestor
    /// scopes as well as descendants.
    pub export: bool,
}

/// Options for `Invoke`. Left empty by design: this is the type a
/// before/after callback hook would hang its fields off, if this crate
/// ever grew one.
#[derive(Clone, Debug, Default)]
pub struct InvokeOptions {}

/// What a successful `provide_*` call registered, returned directly
/// rather than written into an out-parameter.
#[derive(Clone, Debug)]
pub struct ProvideInfo {
    pub function: &'static str,
    pub keys: Vec<Key>,
    pub location: &'static Location<'static>,
}
