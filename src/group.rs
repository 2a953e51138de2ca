//! Value groups: a set of equally-typed contributions addressed
//! collectively as a slice.

use std::ops::Deref;
use std::sync::Arc;

/// The concatenation of every contribution to a [`crate::key::GroupKey`],
/// in the order the build engine happened to call their providers —
/// randomised unless the scope's RNG is pinned.
///
/// Consumers declare a dependency on a group by taking `Group<T>` as a
/// parameter; see [`crate::object::define_params!`] for naming the group.
#[derive(Debug)]
pub struct Group<T>(pub Vec<Arc<T>>);

impl<T> Group<T> {
    pub fn new(values: Vec<Arc<T>>) -> Self {
        Group(values)
    }

    pub fn into_inner(self) -> Vec<Arc<T>> {
        self.0
    }
}

impl<T> Deref for Group<T> {
    type Target = [Arc<T>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Group(Vec::new())
    }
}

impl<T> IntoIterator for Group<T> {
    type Item = Arc<T>;
    type IntoIter = std::vec::IntoIter<Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
