//! Category (dictionary type) bookkeeping.
//!
//! Keeps the menu grouping in insertion order, the configured search
//! priority, the default selection, and which categories carry a display
//! annotation that must be prefixed to their results.

use ahash::{AHashMap, AHashSet};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A named menu group and the categories listed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    groups: Vec<CategoryGroup>,
    /// Every registered category, first registration order.
    all: IndexSet<String>,
    priority: AHashMap<String, usize>,
    default_selected: Vec<String>,
    prefixed: AHashSet<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search priority: earlier names rank first, names absent from
    /// the list rank after all of them. A name listed twice takes the rank
    /// of its last occurrence.
    pub fn with_search_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.priority.clear();
        for (rank, name) in order.iter().enumerate() {
            self.priority.insert(name.as_ref().to_string(), rank);
        }
        self
    }

    pub fn with_default_selected<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.default_selected = names.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Make sure a menu group exists (possibly empty) and return its slot.
    pub fn add_group(&mut self, group: &str) -> usize {
        if let Some(pos) = self.groups.iter().position(|g| g.name == group) {
            return pos;
        }
        self.groups.push(CategoryGroup {
            name: group.to_string(),
            categories: Vec::new(),
        });
        self.groups.len() - 1
    }

    /// Register `category` under `group`. Registering the same category
    /// twice keeps its first position.
    pub fn register(&mut self, group: &str, category: &str) {
        let slot = self.add_group(group);
        let listed = &mut self.groups[slot].categories;
        if !listed.iter().any(|c| c == category) {
            listed.push(category.to_string());
        }
        self.all.insert(category.to_string());
    }

    /// Mark `category` as carrying a display annotation that prefixes its
    /// results.
    pub fn set_prefix_annotation(&mut self, category: &str, enabled: bool) {
        if enabled {
            self.prefixed.insert(category.to_string());
        } else {
            self.prefixed.remove(category);
        }
    }

    pub fn has_prefix_annotation(&self, category: &str) -> bool {
        self.prefixed.contains(category)
    }

    /// Menu groups in insertion order.
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// All registered categories in registration order.
    pub fn categories(&self) -> &IndexSet<String> {
        &self.all
    }

    pub fn contains(&self, category: &str) -> bool {
        self.all.contains(category)
    }

    /// Priority rank; unranked categories share the last rank.
    pub fn rank(&self, category: &str) -> usize {
        self.priority.get(category).copied().unwrap_or(usize::MAX)
    }

    /// Stable sort by priority, so unranked names keep their relative order.
    pub fn sort_by_priority(&self, names: &mut [String]) {
        names.sort_by_key(|name| self.rank(name));
    }

    /// All registered categories sorted by priority.
    pub fn all_types_ordered(&self) -> Vec<String> {
        let mut names: Vec<String> = self.all.iter().cloned().collect();
        self.sort_by_priority(&mut names);
        names
    }

    pub fn default_selected(&self) -> &[String] {
        &self.default_selected
    }
}
