//! The all-or-nothing commit sink a provider's constructor scatters its
//! results into before anything reaches a scope's real caches. Folding
//! this straight into the main value/group maps would let a constructor
//! that fails halfway through publish partial results.
//!
//! A provider call builds a fresh [`Staging`], runs the constructor,
//! scatters its output into it, and only merges it into the owning
//! [`crate::container::Scope`] if the constructor's trailing result (if
//! any) was `Ok`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::key::{GroupKey, ValueKey};

type AnyValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Staging {
    values: HashMap<ValueKey, AnyValue>,
    groups: HashMap<GroupKey, Vec<AnyValue>>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a single-valued production. Field-level uniqueness is
    /// already guaranteed by [`crate::key::KeySet`] at `Provide` time, so
    /// this never fails.
    pub fn put_value<T: Send + Sync + 'static>(&mut self, key: ValueKey, value: Arc<T>) {
        self.values.insert(key, value as AnyValue);
    }

    pub fn add_group<T: Send + Sync + 'static>(&mut self, key: GroupKey, value: Arc<T>) {
        self.groups.entry(key).or_default().push(value as AnyValue);
    }

    pub fn into_parts(self) -> (HashMap<ValueKey, AnyValue>, HashMap<GroupKey, Vec<AnyValue>>) {
        (self.values, self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_values_and_groups_are_retrievable_after_split() {
        let mut staging = Staging::new();
        staging.put_value(ValueKey::unnamed::<i32>(), Arc::new(7i32));
        staging.add_group(GroupKey::new::<i32>("nums"), Arc::new(1i32));
        staging.add_group(GroupKey::new::<i32>("nums"), Arc::new(2i32));
        let (values, groups) = staging.into_parts();
        assert_eq!(values.len(), 1);
        assert_eq!(groups[&GroupKey::new::<i32>("nums")].len(), 2);
    }
}
