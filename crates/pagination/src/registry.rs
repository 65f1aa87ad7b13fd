//! Producer registry for command handlers.

use crate::producer::ResultProducer;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Registry of available result producers.
pub struct ProducerRegistry {
    producers: HashMap<String, Arc<dyn ResultProducer>>,
    enabled: HashSet<String>,
}

impl ProducerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            producers: HashMap::new(),
            enabled: HashSet::new(),
        }
    }

    /// Register a producer (enabled by default).
    pub fn register(&mut self, producer: Arc<dyn ResultProducer>) {
        let name = producer.name().to_string();
        self.producers.insert(name.clone(), producer);
        self.enabled.insert(name);
    }

    /// Enable a producer by name.
    pub fn enable(&mut self, name: &str) {
        if self.producers.contains_key(name) {
            self.enabled.insert(name.to_string());
        }
    }

    /// Disable a producer by name.
    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Get a producer by name (only if enabled).
    pub fn get(&self, name: &str) -> Option<Arc<dyn ResultProducer>> {
        if self.enabled.contains(name) {
            self.producers.get(name).cloned()
        } else {
            None
        }
    }

    /// List enabled producer names, sorted.
    pub fn list_enabled(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.enabled.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ProducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
