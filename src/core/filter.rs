//! Record suppression rules
//!
//! Three independent rules can veto a record:
//!
//! - **module**: the record's module id is in the module set
//! - **and**: the message does not contain every substring of the AND set
//! - **or**: the message contains none of the substrings of the OR set
//!
//! Any single veto suppresses the record. In reverse mode each rule's
//! outcome is inverted on its own before the vetoes are combined. Empty sets
//! never veto, in either mode.

use parking_lot::RwLock;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default, Clone)]
struct FilterSets {
    and_filters: BTreeSet<String>,
    or_filters: BTreeSet<String>,
    module_filters: HashSet<i32>,
    reverse: bool,
}

impl FilterSets {
    fn module_veto(&self, module: i32) -> bool {
        if self.module_filters.is_empty() {
            return false;
        }
        self.module_filters.contains(&module) != self.reverse
    }

    fn and_veto(&self, message: &str) -> bool {
        if self.and_filters.is_empty() {
            return false;
        }
        let passes = self.and_filters.iter().all(|f| message.contains(f.as_str()));
        passes == self.reverse
    }

    fn or_veto(&self, message: &str) -> bool {
        if self.or_filters.is_empty() {
            return false;
        }
        let passes = self.or_filters.iter().any(|f| message.contains(f.as_str()));
        passes == self.reverse
    }
}

/// Shared filter state, read by producers and mutated from any thread
#[derive(Debug, Default)]
pub struct FilterEngine {
    sets: RwLock<FilterSets>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a record must be dropped before formatting
    pub fn should_suppress(&self, module: i32, message: &str) -> bool {
        let sets = self.sets.read();
        sets.module_veto(module) || sets.and_veto(message) || sets.or_veto(message)
    }

    pub fn set_reverse(&self, reverse: bool) {
        self.sets.write().reverse = reverse;
    }

    /// Flip reverse mode, returning the new value
    pub fn toggle_reverse(&self) -> bool {
        let mut sets = self.sets.write();
        sets.reverse = !sets.reverse;
        sets.reverse
    }

    pub fn is_reverse(&self) -> bool {
        self.sets.read().reverse
    }

    pub fn add_and_filter(&self, filter: impl Into<String>) {
        self.sets.write().and_filters.insert(filter.into());
    }

    pub fn add_and_filters<I, S>(&self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sets = self.sets.write();
        sets.and_filters.extend(filters.into_iter().map(Into::into));
    }

    pub fn remove_and_filter(&self, filter: &str) {
        self.sets.write().and_filters.remove(filter);
    }

    pub fn remove_and_filters<I, S>(&self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sets = self.sets.write();
        for filter in filters {
            sets.and_filters.remove(filter.as_ref());
        }
    }

    pub fn clear_and_filters(&self) {
        self.sets.write().and_filters.clear();
    }

    pub fn add_or_filter(&self, filter: impl Into<String>) {
        self.sets.write().or_filters.insert(filter.into());
    }

    pub fn add_or_filters<I, S>(&self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sets = self.sets.write();
        sets.or_filters.extend(filters.into_iter().map(Into::into));
    }

    pub fn remove_or_filter(&self, filter: &str) {
        self.sets.write().or_filters.remove(filter);
    }

    pub fn remove_or_filters<I, S>(&self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sets = self.sets.write();
        for filter in filters {
            sets.or_filters.remove(filter.as_ref());
        }
    }

    pub fn clear_or_filters(&self) {
        self.sets.write().or_filters.clear();
    }

    pub fn add_module_filter(&self, module: i32) {
        self.sets.write().module_filters.insert(module);
    }

    pub fn add_module_filters<I: IntoIterator<Item = i32>>(&self, modules: I) {
        self.sets.write().module_filters.extend(modules);
    }

    pub fn remove_module_filter(&self, module: i32) {
        self.sets.write().module_filters.remove(&module);
    }

    pub fn remove_module_filters<I: IntoIterator<Item = i32>>(&self, modules: I) {
        let mut sets = self.sets.write();
        for module in modules {
            sets.module_filters.remove(&module);
        }
    }

    pub fn clear_module_filters(&self) {
        self.sets.write().module_filters.clear();
    }

    /// Empty all three sets; reverse mode is left as is
    pub fn clear_all(&self) {
        let mut sets = self.sets.write();
        sets.and_filters.clear();
        sets.or_filters.clear();
        sets.module_filters.clear();
    }

    pub fn and_filters(&self) -> Vec<String> {
        self.sets.read().and_filters.iter().cloned().collect()
    }

    pub fn or_filters(&self) -> Vec<String> {
        self.sets.read().or_filters.iter().cloned().collect()
    }

    pub fn module_filters(&self) -> Vec<i32> {
        let mut modules: Vec<i32> = self.sets.read().module_filters.iter().copied().collect();
        modules.sort_unstable();
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sets_never_filter() {
        let engine = FilterEngine::new();
        assert!(!engine.should_suppress(0, "anything"));

        engine.set_reverse(true);
        assert!(!engine.should_suppress(0, "anything"));
    }

    #[test]
    fn test_and_rule() {
        let engine = FilterEngine::new();
        engine.add_and_filters(["a", "b"]);

        assert!(!engine.should_suppress(0, "a and b"));
        assert!(engine.should_suppress(0, "only a"));
        assert!(engine.should_suppress(0, "neither"));

        engine.set_reverse(true);
        assert!(engine.should_suppress(0, "a and b"));
        assert!(!engine.should_suppress(0, "only a"));
    }

    #[test]
    fn test_or_rule() {
        let engine = FilterEngine::new();
        engine.add_or_filters(["disk", "net"]);

        assert!(!engine.should_suppress(0, "disk full"));
        assert!(!engine.should_suppress(0, "net down"));
        assert!(engine.should_suppress(0, "cpu hot"));

        engine.set_reverse(true);
        assert!(engine.should_suppress(0, "disk full"));
        assert!(!engine.should_suppress(0, "cpu hot"));
    }

    #[test]
    fn test_module_rule() {
        let engine = FilterEngine::new();
        engine.add_module_filters([3, 4]);

        assert!(engine.should_suppress(3, "x"));
        assert!(!engine.should_suppress(5, "x"));

        engine.set_reverse(true);
        assert!(!engine.should_suppress(3, "x"));
        assert!(engine.should_suppress(5, "x"));

        engine.remove_module_filters([3, 4]);
        assert!(!engine.should_suppress(5, "x"));
    }

    #[test]
    fn test_reverse_applies_per_rule() {
        // Fails AND ("b" missing) but passes OR ("a" present)
        let engine = FilterEngine::new();
        engine.add_and_filters(["a", "b"]);
        engine.add_or_filter("a");
        let message = "has a only";

        assert!(engine.should_suppress(0, message));

        // Reversed: AND no longer vetoes, OR now vetoes
        engine.set_reverse(true);
        assert!(engine.should_suppress(0, message));

        // A message passing both rules is vetoed only in reverse mode
        assert!(engine.should_suppress(0, "a b"));
        engine.set_reverse(false);
        assert!(!engine.should_suppress(0, "a b"));
    }

    #[test]
    fn test_double_toggle_restores_behavior() {
        let engine = FilterEngine::new();
        engine.add_or_filter("keep");

        let before = engine.should_suppress(0, "drop me");
        assert!(engine.toggle_reverse());
        assert_ne!(engine.should_suppress(0, "drop me"), before);
        assert!(!engine.toggle_reverse());
        assert_eq!(engine.should_suppress(0, "drop me"), before);
    }

    #[test]
    fn test_remove_and_clear() {
        let engine = FilterEngine::new();
        engine.add_and_filter("x");
        engine.add_or_filter("y");
        engine.add_module_filter(1);

        engine.remove_and_filter("x");
        assert!(engine.and_filters().is_empty());

        engine.add_or_filters(["z", "w"]);
        engine.remove_or_filters(["y", "z"]);
        assert_eq!(engine.or_filters(), vec!["w".to_string()]);

        engine.set_reverse(true);
        engine.clear_all();
        assert!(engine.or_filters().is_empty());
        assert!(engine.module_filters().is_empty());
        assert!(engine.is_reverse());
    }
}
