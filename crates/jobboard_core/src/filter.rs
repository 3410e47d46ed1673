//! Search/facet reconciliation over the fetched collection.
//!
//! The reconciler caches its derived output against the inputs that produced it,
//! so re-running it with unchanged inputs is free and reports "no change".
use std::collections::HashSet;

use crate::Item;

/// User-controlled narrowing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_text: String,
    pub selected_facet: Option<String>,
}

impl FilterState {
    /// Sets the facet, treating an empty selection as "no restriction".
    pub fn select_facet(&mut self, facet: Option<String>) {
        self.selected_facet = facet.filter(|value| !value.is_empty());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    source_revision: u64,
    search_lower: String,
    selected_facet: Option<String>,
}

/// Owns the filter inputs and the memoized derived collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciler {
    filter: FilterState,
    key: Option<CacheKey>,
    filtered: Vec<usize>,
    facet_options: Vec<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Indices into the source collection that survive both predicates, in source order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Distinct locations reachable under the current search text.
    pub fn facet_options(&self) -> &[String] {
        &self.facet_options
    }

    /// Returns `true` when the text actually changed.
    pub fn set_search_text(&mut self, text: String) -> bool {
        if self.filter.search_text == text {
            return false;
        }
        self.filter.search_text = text;
        true
    }

    /// Returns `true` when the selection actually changed.
    pub fn set_selected_facet(&mut self, facet: Option<String>) -> bool {
        let before = self.filter.selected_facet.clone();
        self.filter.select_facet(facet);
        before != self.filter.selected_facet
    }

    /// Recomputes the filtered indices and facet options if any input changed since the
    /// last run. Returns `true` only when the derived output differs from before.
    pub fn reconcile(&mut self, source_revision: u64, items: &[Item]) -> bool {
        let key = CacheKey {
            source_revision,
            search_lower: self.filter.search_text.to_lowercase(),
            selected_facet: self.filter.selected_facet.clone(),
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }

        let (filtered, facet_options) =
            derive(items, &key.search_lower, key.selected_facet.as_deref());
        self.key = Some(key);

        if filtered == self.filtered && facet_options == self.facet_options {
            return false;
        }
        self.filtered = filtered;
        self.facet_options = facet_options;
        true
    }
}

fn derive(items: &[Item], search_lower: &str, facet: Option<&str>) -> (Vec<usize>, Vec<String>) {
    let mut filtered = Vec::new();
    let mut facet_options = Vec::new();
    let mut seen = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        if !matches_search(item, search_lower) {
            continue;
        }
        if !item.location.is_empty() && seen.insert(item.location.as_str()) {
            facet_options.push(item.location.clone());
        }
        if matches_facet(item, facet) {
            filtered.push(index);
        }
    }

    (filtered, facet_options)
}

/// Case-insensitive substring match against the title. `search_lower` must already be lowercased.
pub fn matches_search(item: &Item, search_lower: &str) -> bool {
    search_lower.is_empty() || item.title.to_lowercase().contains(search_lower)
}

/// Exact location match; no facet means no restriction.
pub fn matches_facet(item: &Item, facet: Option<&str>) -> bool {
    facet.is_none_or(|facet| item.location == facet)
}
