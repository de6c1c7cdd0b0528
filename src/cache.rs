//! Resource Cache
//!
//! Holds the last accepted collection for one resource and decides whether
//! a freshly fetched collection is new information.
//!
//! The default strategy is growth-based: a collection replaces the cached
//! one only when it is strictly longer. Shrinkage, reordering and same-size
//! edits are never observed. The gossiper only ever appends to these
//! collections, so a longer list is the only change worth re-rendering.

use serde::{Deserialize, Serialize};

/// How a cache decides that an incoming collection differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDetection {
    /// Replace iff `len(incoming) > len(current)`
    #[default]
    Growth,
    /// Replace iff `incoming != current`
    Content,
}

/// Outcome of reconciling one fetched collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Changed,
    Unchanged,
}

impl Reconciliation {
    pub fn is_changed(self) -> bool {
        self == Reconciliation::Changed
    }
}

/// Last-known collection for one resource
#[derive(Debug, Clone)]
pub struct ResourceCache<T> {
    current: Vec<T>,
    strategy: ChangeDetection,
    generation: u64,
}

impl<T> ResourceCache<T> {
    /// Create an empty cache with growth-based change detection
    pub fn new() -> Self {
        Self::with_strategy(ChangeDetection::Growth)
    }

    pub fn with_strategy(strategy: ChangeDetection) -> Self {
        Self {
            current: Vec::new(),
            strategy,
            generation: 0,
        }
    }

    /// The most recently accepted collection
    pub fn current(&self) -> &[T] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of collections accepted so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn strategy(&self) -> ChangeDetection {
        self.strategy
    }
}

impl<T: PartialEq> ResourceCache<T> {
    /// Compare `incoming` against the cached collection.
    ///
    /// On `Changed` the cache holds exactly `incoming`; on `Unchanged` it
    /// is left untouched.
    pub fn reconcile(&mut self, incoming: Vec<T>) -> Reconciliation {
        let changed = match self.strategy {
            ChangeDetection::Growth => incoming.len() > self.current.len(),
            ChangeDetection::Content => incoming != self.current,
        };

        if !changed {
            return Reconciliation::Unchanged;
        }

        self.current = incoming;
        self.generation += 1;
        Reconciliation::Changed
    }
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
