//! Registry of named schemas discovered during a conversion session.

use std::collections::HashMap;

/// One named top-level schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    /// Unprefixed type name the schema was registered under.
    pub name: String,
    /// Discovery position, assigned on first registration.
    pub order: usize,
    /// Schema constant declaration followed by its inferred type alias.
    pub body: String,
}

/// Insertion-ordered store of named schemas.
///
/// Registration is idempotent: the first body registered under a name wins.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaEntry>,
    next_order: usize,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema body. Returns `false` if `name` was already taken.
    pub fn register(&mut self, name: impl Into<String>, body: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::debug!(schema = %name, "schema already registered, keeping first");
            return false;
        }
        let order = self.next_order;
        self.next_order += 1;
        tracing::debug!(schema = %name, order, "registered schema");
        self.entries.insert(
            name.clone(),
            SchemaEntry {
                name,
                order,
                body: body.into(),
            },
        );
        true
    }

    /// Get a schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in discovery order.
    pub fn entries(&self) -> Vec<&SchemaEntry> {
        let mut sorted: Vec<&SchemaEntry> = self.entries.values().collect();
        sorted.sort_by_key(|entry| entry.order);
        sorted
    }

    /// Concatenate every body in discovery order, each followed by a blank
    /// line.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for entry in self.entries() {
            output.push_str(&entry.body);
            output.push_str("\n\n");
        }
        output
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_one_entry_per_name(names in proptest::collection::vec("[A-D]", 0..20)) {
            let mut registry = SchemaRegistry::new();
            for (i, name) in names.iter().enumerate() {
                registry.register(name.clone(), i.to_string());
            }

            let unique: std::collections::HashSet<_> = names.iter().collect();
            prop_assert_eq!(registry.len(), unique.len());

            // The first body registered under each name survives, and the
            // order follows first appearance.
            let mut first_seen = Vec::new();
            for (i, name) in names.iter().enumerate() {
                if !first_seen.iter().any(|(n, _)| n == name) {
                    first_seen.push((name.clone(), i.to_string()));
                }
            }
            let entries: Vec<(String, String)> = registry
                .entries()
                .into_iter()
                .map(|e| (e.name.clone(), e.body.clone()))
                .collect();
            prop_assert_eq!(entries, first_seen);
        }
    }
}
