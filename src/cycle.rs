//! DFS-based cycle detector, run after every `Provide`.
//!
//! An edge from key `K` to key `K'` exists iff the sole (or, for group
//! keys, any) provider of `K` has a parameter that resolves to `K'`;
//! object params are flattened to their leaves before this module ever
//! sees them.

use std::collections::HashSet;

use crate::error::CyclePath;
use crate::key::Key;

/// Read-only view of the dependency graph the detector walks: the current
/// registry plus whatever tentative edges `Provide` is about to add.
pub trait DependencyGraph {
    fn edges(&self, key: &Key) -> Vec<Key>;
}

/// Runs a DFS from `start`. Returns the first cycle found, if any.
///
/// The visited set is per-call, but within one call a key that was fully
/// explored without closing a cycle is not re-explored, so the overall
/// cost stays linear in the number of edges reachable from `start`.
pub fn check(graph: &dyn DependencyGraph, start: &Key) -> Option<CyclePath> {
    let mut stack = Vec::new();
    let mut on_stack = HashSet::new();
    let mut fully_explored = HashSet::new();
    dfs(graph, start, &mut stack, &mut on_stack, &mut fully_explored)
}

fn dfs(
    graph: &dyn DependencyGraph,
    key: &Key,
    stack: &mut Vec<Key>,
    on_stack: &mut HashSet<Key>,
    fully_explored: &mut HashSet<Key>,
) -> Option<CyclePath> {
    if on_stack.contains(key) {
        return Some(CyclePath {
            path: stack.clone(),
            closing_key: key.clone(),
        });
    }
    if fully_explored.contains(key) {
        return None;
    }

    stack.push(key.clone());
    on_stack.insert(key.clone());

    for dep in graph.edges(key) {
        if let Some(cycle) = dfs(graph, &dep, stack, on_stack, fully_explored) {
            return Some(cycle);
        }
    }

    stack.pop();
    on_stack.remove(key);
    fully_explored.insert(key.clone());
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ValueKey;
    use std::collections::HashMap;

    struct MapGraph(HashMap<Key, Vec<Key>>);

    impl DependencyGraph for MapGraph {
        fn edges(&self, key: &Key) -> Vec<Key> {
            self.0.get(key).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn no_cycle_in_acyclic_graph() {
        let a = Key::Value(ValueKey::unnamed::<u8>());
        let b = Key::Value(ValueKey::unnamed::<u16>());
        let mut map = HashMap::new();
        map.insert(a.clone(), vec![b.clone()]);
        map.insert(b.clone(), vec![]);
        let graph = MapGraph(map);
        assert!(check(&graph, &a).is_none());
    }

    #[test]
    fn direct_cycle_detected() {
        // A depends on B, B depends on A.
        let a = Key::Value(ValueKey::unnamed::<u8>());
        let b = Key::Value(ValueKey::unnamed::<u16>());
        let mut map = HashMap::new();
        map.insert(a.clone(), vec![b.clone()]);
        map.insert(b.clone(), vec![a.clone()]);
        let graph = MapGraph(map);
        let cycle = check(&graph, &a).expect("cycle expected");
        assert_eq!(cycle.closing_key, a);
        assert!(cycle.path.contains(&a));
        assert!(cycle.path.contains(&b));
    }

    #[test]
    fn diamond_dependency_is_not_a_cycle() {
        // A depends on B and C; both B and C depend on D. Visiting D twice
        // must not be mistaken for a cycle.
        let a = Key::Value(ValueKey::unnamed::<u8>());
        let b = Key::Value(ValueKey::unnamed::<u16>());
        let c = Key::Value(ValueKey::unnamed::<u32>());
        let d = Key::Value(ValueKey::unnamed::<u64>());
        let mut map = HashMap::new();
        map.insert(a.clone(), vec![b.clone(), c.clone()]);
        map.insert(b.clone(), vec![d.clone()]);
        map.insert(c.clone(), vec![d.clone()]);
        map.insert(d.clone(), vec![]);
        let graph = MapGraph(map);
        assert!(check(&graph, &a).is_none());
    }
}
