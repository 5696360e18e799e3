//! Module id to display name mapping

use parking_lot::RwLock;
use std::collections::HashMap;

/// Names shown in the `[<module>]` column of every line
///
/// Lookups of ids that were never registered yield an empty name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<i32, String>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, module: i32, name: impl Into<String>) {
        self.modules.write().insert(module, name.into());
    }

    pub fn add_all<I, S>(&self, modules: I)
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        let mut guard = self.modules.write();
        for (module, name) in modules {
            guard.insert(module, name.into());
        }
    }

    pub fn remove(&self, module: i32) {
        self.modules.write().remove(&module);
    }

    pub fn clear(&self) {
        self.modules.write().clear();
    }

    pub fn name(&self, module: i32) -> String {
        self.modules.read().get(&module).cloned().unwrap_or_default()
    }

    pub fn contains(&self, module: i32) -> bool {
        self.modules.read().contains_key(&module)
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_unknown_module_is_empty_name() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.name(99), "");
    }

    #[test]
    fn test_register_then_remove() {
        let registry = ModuleRegistry::new();
        registry.add(7, "network");
        assert_eq!(registry.name(7), "network");

        registry.remove(7);
        assert_eq!(registry.name(7), "");
        assert!(!registry.contains(7));
    }

    #[test]
    fn test_add_all_overwrites_existing() {
        let registry = ModuleRegistry::new();
        registry.add(1, "old");
        registry.add_all([(1, "db"), (2, "cache")]);

        assert_eq!(registry.name(1), "db");
        assert_eq!(registry.name(2), "cache");
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_mutation() {
        let registry = Arc::new(ModuleRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        let id = t * 100 + i;
                        registry.add(id, format!("m{}", id));
                        let _ = registry.name(id);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 200);
        assert_eq!(registry.name(305), "m305");
    }
}
