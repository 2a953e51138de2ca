//! Shared parameter/result tree vocabulary and the pure tree-walking
//! helpers the build engine and the cycle detector both need.
//!
//! Rust has no runtime-queryable function signatures, so the *values*
//! backing a constructor call are always built through the statically
//! dispatched [`crate::object::Param`]/[`crate::constructor::ConstructorFn`]
//! trait machinery, monomorphised per constructor at `Provide`/`Invoke`
//! time. The trees defined here are the parallel, runtime-inspectable
//! description of that same shape — built once per constructor and kept
//! around for diagnostics, the shallow missing-dependency check, and cycle
//! detection. Keeping both representations in sync is the responsibility
//! of each `Param`/`ResultsObject` impl (hand-written or macro-generated);
//! see `src/object.rs`.

use crate::key::{GroupKey, Key, ValueKey};

/// The "how to build each argument" tree, one per constructor parameter list.
#[derive(Clone, Debug)]
pub enum ParamNode {
    /// Resolves from a single `ValueKey`; optional params tolerate a miss.
    Single { key: ValueKey, optional: bool },
    /// A parameter object: each field is itself a [`ParamNode`].
    Object {
        type_name: &'static str,
        fields: Vec<(&'static str, ParamNode)>,
    },
    /// The full parameter list of a function.
    List(Vec<ParamNode>),
    /// Resolves to the concatenation of all contributions to a group.
    GroupSlice { key: GroupKey },
}

impl ParamNode {
    /// Flattens this node to the leaf keys it ultimately touches,
    /// regardless of optionality — used to build cycle-detection edges.
    pub fn leaf_keys(&self) -> Vec<Key> {
        let mut out = Vec::new();
        self.collect_leaf_keys(&mut out);
        out
    }

    fn collect_leaf_keys(&self, out: &mut Vec<Key>) {
        match self {
            ParamNode::Single { key, .. } => out.push(Key::Value(key.clone())),
            ParamNode::GroupSlice { key } => out.push(Key::Group(key.clone())),
            ParamNode::Object { fields, .. } => {
                for (_, field) in fields {
                    field.collect_leaf_keys(out);
                }
            }
            ParamNode::List(items) => {
                for item in items {
                    item.collect_leaf_keys(out);
                }
            }
        }
    }

    /// Lists every *required* (non-optional) leaf `ValueKey` — used for the
    /// shallow dependency check that runs before a constructor is called
    /// or a function is invoked. This check is intentionally shallow, not
    /// transitive: it only reports keys this node directly needs, not
    /// keys needed further down the graph. Group slices are never
    /// "missing" — an empty group is a valid, if unusual, result.
    pub fn required_value_keys(&self) -> Vec<ValueKey> {
        let mut out = Vec::new();
        self.collect_required(&mut out);
        out
    }

    fn collect_required(&self, out: &mut Vec<ValueKey>) {
        match self {
            ParamNode::Single {
                key,
                optional: false,
            } => out.push(key.clone()),
            ParamNode::Single { optional: true, .. } => {}
            ParamNode::GroupSlice { .. } => {}
            ParamNode::Object { fields, .. } => {
                for (_, field) in fields {
                    field.collect_required(out);
                }
            }
            ParamNode::List(items) => {
                for item in items {
                    item.collect_required(out);
                }
            }
        }
    }
}

/// The "how to distribute each return" tree, one per constructor output.
#[derive(Clone, Debug)]
pub enum ResultNode {
    /// Exposes one `ValueKey`.
    Single(ValueKey),
    /// A result object: each exposed field is itself a [`ResultNode`].
    Object {
        type_name: &'static str,
        fields: Vec<(&'static str, ResultNode)>,
    },
    /// One per return slot of the constructor (the trailing error, if any,
    /// is not represented here — it is the failure channel, handled
    /// outside the result tree; see `src/provider.rs`).
    List(Vec<ResultNode>),
    /// Contributes one element to a `GroupKey`.
    Grouped(GroupKey),
}

impl ResultNode {
    /// All the `ValueKey`s this result tree produces, paired with a
    /// human-readable source label (the field name, or the function name
    /// for a bare single result) for [`crate::key::KeySet`] conflict
    /// reporting.
    pub fn value_keys(&self, source: &'static str) -> Vec<(ValueKey, &'static str)> {
        let mut out = Vec::new();
        self.collect_value_keys(source, &mut out);
        out
    }

    fn collect_value_keys<'a>(&'a self, source: &'static str, out: &mut Vec<(ValueKey, &'static str)>) {
        match self {
            ResultNode::Single(key) => out.push((key.clone(), source)),
            ResultNode::Grouped(_) => {}
            ResultNode::Object { fields, .. } => {
                for (name, field) in fields {
                    field.collect_value_keys(name, out);
                }
            }
            ResultNode::List(items) => {
                for item in items {
                    item.collect_value_keys(source, out);
                }
            }
        }
    }

    /// All the `GroupKey`s this result tree contributes to.
    pub fn group_keys(&self) -> Vec<GroupKey> {
        let mut out = Vec::new();
        self.collect_group_keys(&mut out);
        out
    }

    fn collect_group_keys(&self, out: &mut Vec<GroupKey>) {
        match self {
            ResultNode::Single(_) => {}
            ResultNode::Grouped(key) => out.push(key.clone()),
            ResultNode::Object { fields, .. } => {
                for (_, field) in fields {
                    field.collect_group_keys(out);
                }
            }
            ResultNode::List(items) => {
                for item in items {
                    item.collect_group_keys(out);
                }
            }
        }
    }

    /// Every key (value or group) this result tree touches, as [`Key`] —
    /// used when registering the dependency-graph edges a freshly
    /// inserted provider adds: the cycle check runs once per produced key.
    pub fn all_keys(&self, source: &'static str) -> Vec<Key> {
        let mut out: Vec<Key> = self
            .value_keys(source)
            .into_iter()
            .map(|(k, _)| Key::Value(k))
            .collect();
        out.extend(self.group_keys().into_iter().map(Key::Group));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_required_is_reported() {
        let node = ParamNode::Single {
            key: ValueKey::unnamed::<i32>(),
            optional: false,
        };
        assert_eq!(node.required_value_keys().len(), 1);
    }

    #[test]
    fn optional_single_is_not_required() {
        let node = ParamNode::Single {
            key: ValueKey::unnamed::<i32>(),
            optional: true,
        };
        assert!(node.required_value_keys().is_empty());
        assert_eq!(node.leaf_keys().len(), 1);
    }

    #[test]
    fn object_flattens_to_field_leaves() {
        let node = ParamNode::Object {
            type_name: "Foo",
            fields: vec![
                (
                    "a",
                    ParamNode::Single {
                        key: ValueKey::unnamed::<i32>(),
                        optional: false,
                    },
                ),
                (
                    "b",
                    ParamNode::GroupSlice {
                        key: GroupKey::new::<i32>("nums"),
                    },
                ),
            ],
        };
        assert_eq!(node.leaf_keys().len(), 2);
        // group slices are never "required" in the missing-dependency sense
        assert_eq!(node.required_value_keys().len(), 1);
    }

    #[test]
    fn result_object_separates_values_and_groups() {
        let node = ResultNode::Object {
            type_name: "Out",
            fields: vec![
                ("x", ResultNode::Single(ValueKey::new::<i32>("x"))),
                ("nums", ResultNode::Grouped(GroupKey::new::<i32>("nums"))),
            ],
        };
        assert_eq!(node.value_keys("Out").len(), 1);
        assert_eq!(node.group_keys().len(), 1);
    }
}
