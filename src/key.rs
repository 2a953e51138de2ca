//! Canonical identity of a "slot" in the dependency graph.
//!
//! A [`Key`] is either a [`ValueKey`] (exactly one provider may ever claim
//! it) or a [`GroupKey`] (any number of providers may each contribute one
//! element). [`TypeId`] plus [`std::any::type_name`] stand in for runtime
//! type reflection, which Rust doesn't otherwise provide.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Identity of a Rust type, as seen by the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeMeta {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeMeta {
    pub fn of<T: 'static>() -> Self {
        TypeMeta {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A single-valued slot: at most one provider may exist for a given
/// `(type, name)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueKey {
    pub ty: TypeMeta,
    pub name: Cow<'static, str>,
}

impl ValueKey {
    pub fn new<T: 'static>(name: impl Into<Cow<'static, str>>) -> Self {
        ValueKey {
            ty: TypeMeta::of::<T>(),
            name: name.into(),
        }
    }

    pub fn unnamed<T: 'static>() -> Self {
        Self::new::<T>("")
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{}(name={:?})", self.ty, self.name)
        }
    }
}

/// A multi-valued slot: any number of providers may contribute an element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub ty: TypeMeta,
    pub group: Cow<'static, str>,
}

impl GroupKey {
    pub fn new<T: 'static>(group: impl Into<Cow<'static, str>>) -> Self {
        GroupKey {
            ty: TypeMeta::of::<T>(),
            group: group.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(group={:?})", self.ty, self.group)
    }
}

/// Either kind of slot. A `ValueKey` and a `GroupKey` of the same
/// `(type, name/group)` are always distinct slots — enforced at the
/// [`KeySet`] boundary rather than encoded in this type, since the two
/// kinds are never compared against each other directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Value(ValueKey),
    Group(GroupKey),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Value(k) => write!(f, "{k}"),
            Key::Group(k) => write!(f, "{k}"),
        }
    }
}

impl From<ValueKey> for Key {
    fn from(k: ValueKey) -> Self {
        Key::Value(k)
    }
}

impl From<GroupKey> for Key {
    fn from(k: GroupKey) -> Self {
        Key::Group(k)
    }
}

/// Joins a list of [`Key`]s for display in error messages (e.g. a missing
/// dependency list or a cycle path).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyList(pub Vec<Key>);

impl fmt::Display for KeyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for key in &self.0 {
            if !first {
                f.write_str(" -> ")?;
            }
            first = false;
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// Tracks every [`ValueKey`] introduced by a single result tree (one
/// `Provide` call) so that a struct returning the same value twice — or two
/// fields of an `Out` object colliding on the same name — is rejected
/// before it ever reaches the registry.
///
/// Group keys are exempt: any number of results may contribute to the same
/// `GroupKey`.
#[derive(Default)]
pub struct KeySet {
    sources: HashMap<ValueKey, &'static str>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` as introduced by `source` (a human-readable field or
    /// function name). Returns an error naming both the new and the
    /// existing source if `key` was already claimed.
    pub fn insert(&mut self, key: ValueKey, source: &'static str) -> Result<(), KeySetConflict> {
        if let Some(existing) = self.sources.get(&key) {
            return Err(KeySetConflict {
                key,
                existing_source: existing,
                new_source: source,
            });
        }
        self.sources.insert(key, source);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct KeySetConflict {
    pub key: ValueKey,
    pub existing_source: &'static str,
    pub new_source: &'static str,
}

impl fmt::Display for KeySetConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is produced by both `{}` and `{}`",
            self.key, self.existing_source, self.new_source
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_key_equality_ignores_name_case_sensitivity_but_not_value() {
        let a = ValueKey::new::<i32>("x");
        let b = ValueKey::new::<i32>("x");
        let c = ValueKey::new::<i32>("y");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_set_rejects_duplicate_value_key() {
        let mut set = KeySet::new();
        set.insert(ValueKey::unnamed::<i32>(), "NewA").unwrap();
        let err = set.insert(ValueKey::unnamed::<i32>(), "NewB").unwrap_err();
        assert_eq!(err.existing_source, "NewA");
        assert_eq!(err.new_source, "NewB");
    }

    #[test]
    fn display_distinguishes_named_keys() {
        let unnamed = ValueKey::unnamed::<i32>();
        let named = ValueKey::new::<i32>("primary");
        assert_ne!(format!("{unnamed}"), format!("{named}"));
    }
}
