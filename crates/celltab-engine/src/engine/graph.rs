//! The dependency graph: a set of ordered (dependee, dependent) pairs.
//!
//! An edge `(s, t)` means "t's formula reads s", so `t` is a *dependent*
//! of `s` and `s` is a *dependee* of `t`. The graph keeps two mirrored
//! adjacency maps so that both directions answer in O(1) amortized time
//! instead of scanning the pair set. It knows nothing about formulas or
//! cells; every operation is a pure structure mutation.

use std::collections::{HashMap, HashSet};

/// A set of ordered (dependee, dependent) string pairs with queries in
/// both directions.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// dependee -> its dependents: all `t` with an edge `(s, t)`.
    dependents: HashMap<String, HashSet<String>>,
    /// dependent -> its dependees: all `s` with an edge `(s, t)`.
    dependees: HashMap<String, HashSet<String>>,
    /// Number of distinct ordered pairs currently stored.
    pairs: usize,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    /// The number of distinct ordered pairs in the graph.
    pub fn size(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Whether any edge `(s, *)` exists.
    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.contains_key(s)
    }

    /// Whether any edge `(*, t)` exists.
    pub fn has_dependees(&self, t: &str) -> bool {
        self.dependees.contains_key(t)
    }

    /// All `t` with an edge `(s, t)`; empty when there are none.
    pub fn dependents<'a>(&'a self, s: &str) -> impl Iterator<Item = &'a str> {
        self.dependents
            .get(s)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// All `s` with an edge `(s, t)`; empty when there are none.
    pub fn dependees<'a>(&'a self, t: &str) -> impl Iterator<Item = &'a str> {
        self.dependees
            .get(t)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Insert the edge `(s, t)`. A pair already present is left alone and
    /// does not change the size.
    pub fn add_dependency(&mut self, s: &str, t: &str) {
        let inserted = self
            .dependents
            .entry(s.to_string())
            .or_default()
            .insert(t.to_string());
        if inserted {
            self.dependees
                .entry(t.to_string())
                .or_default()
                .insert(s.to_string());
            self.pairs += 1;
        }
        debug_assert!(self.mirrors_consistent());
    }

    /// Remove the edge `(s, t)`. An absent pair is a no-op. The last edge
    /// under a key removes the key itself, so `has_dependents`/
    /// `has_dependees` never see dangling empty sets.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        let mut removed = false;
        if let Some(set) = self.dependents.get_mut(s) {
            removed = set.remove(t);
            if set.is_empty() {
                self.dependents.remove(s);
            }
        }
        if removed {
            if let Some(set) = self.dependees.get_mut(t) {
                set.remove(s);
                if set.is_empty() {
                    self.dependees.remove(t);
                }
            }
            self.pairs -= 1;
        }
        debug_assert!(self.mirrors_consistent());
    }

    /// Remove every edge `(s, *)`, then add `(s, t)` for each `t` in
    /// `new_dependents`.
    pub fn replace_dependents<I, T>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for t in self.dependents.get(s).cloned().unwrap_or_default() {
            self.remove_dependency(s, &t);
        }
        for t in new_dependents {
            self.add_dependency(s, t.as_ref());
        }
    }

    /// Remove every edge `(*, t)`, then add `(s, t)` for each `s` in
    /// `new_dependees`.
    pub fn replace_dependees<I, T>(&mut self, t: &str, new_dependees: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for s in self.dependees.get(t).cloned().unwrap_or_default() {
            self.remove_dependency(&s, t);
        }
        for s in new_dependees {
            self.add_dependency(s.as_ref(), t);
        }
    }

    /// Invariant: the two adjacency maps mirror each other exactly, both
    /// agree with the pair counter, and neither retains an empty set.
    fn mirrors_consistent(&self) -> bool {
        let forward: usize = self.dependents.values().map(HashSet::len).sum();
        let backward: usize = self.dependees.values().map(HashSet::len).sum();
        forward == self.pairs
            && backward == self.pairs
            && self.dependents.values().all(|set| !set.is_empty())
            && self.dependees.values().all(|set| !set.is_empty())
            && self.dependents.iter().all(|(s, ts)| {
                ts.iter()
                    .all(|t| self.dependees.get(t).is_some_and(|ss| ss.contains(s)))
            })
    }
}
