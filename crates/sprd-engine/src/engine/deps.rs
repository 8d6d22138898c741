//! Dependency graph between named cells.
//!
//! A pair `(s, t)` means "t depends on s": `s` must be evaluated before `t`.
//! In that pair `t` is a *dependent* of `s` and `s` is a *dependee* of `t`.
//!
//! The relation is stored twice, once keyed by dependee and once keyed by
//! dependent, so both directions are a single map lookup. The two views are
//! only ever changed together, which keeps them mirrored: `t` is in
//! `dependents[s]` exactly when `s` is in `dependees[t]`. Empty sets are
//! removed rather than stored. Sets are ordered so traversals are
//! deterministic.
//!
//! Self-loops are allowed here; rejecting cycles is the caller's job.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    /// s -> {t : t depends on s}
    dependents: BTreeMap<String, BTreeSet<String>>,
    /// t -> {s : t depends on s}
    dependees: BTreeMap<String, BTreeSet<String>>,
    /// Number of distinct pairs.
    size: usize,
}

fn detach(map: &mut BTreeMap<String, BTreeSet<String>>, key: &str, member: &str) {
    if let Some(set) = map.get_mut(key) {
        set.remove(member);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ordered pairs in the graph.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cells that directly depend on `s`.
    pub fn dependents(&self, s: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependents
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Cells that `s` directly depends on.
    pub fn dependees(&self, s: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependees
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.contains_key(s)
    }

    pub fn has_dependees(&self, s: &str) -> bool {
        self.dependees.contains_key(s)
    }

    pub fn num_dependents(&self, s: &str) -> usize {
        self.dependents.get(s).map_or(0, BTreeSet::len)
    }

    pub fn num_dependees(&self, s: &str) -> usize {
        self.dependees.get(s).map_or(0, BTreeSet::len)
    }

    /// Record that `t` depends on `s`. Adding an existing pair is a no-op.
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
            self.size += 1;
        }
    }

    /// Remove the pair `(s, t)` if present.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        let present = self
            .dependents
            .get(s)
            .is_some_and(|set| set.contains(t));
        if present {
            detach(&mut self.dependents, s, t);
            detach(&mut self.dependees, t, s);
            self.size -= 1;
        }
    }

    /// Replace every `(s, r)` pair with `(s, t)` for each `t` in `new_dependents`.
    pub fn replace_dependents<I, S>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let old: Vec<String> = self.dependents(s).map(str::to_string).collect();
        for r in &old {
            self.remove_dependency(s, r);
        }
        for t in new_dependents {
            self.add_dependency(s, t.as_ref());
        }
    }

    /// Replace every `(r, s)` pair with `(t, s)` for each `t` in `new_dependees`.
    pub fn replace_dependees<I, S>(&mut self, s: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let old: Vec<String> = self.dependees(s).map(str::to_string).collect();
        for r in &old {
            self.remove_dependency(r, s);
        }
        for t in new_dependees {
            self.add_dependency(t.as_ref(), s);
        }
    }
}
