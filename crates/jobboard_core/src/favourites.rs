use std::collections::HashMap;

use crate::ItemId;

/// Per-session favourite flags keyed by item id. Absent means "not favourite".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Favourites {
    flags: HashMap<ItemId, bool>,
}

impl Favourites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `id` and returns the new value.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        let flag = self.flags.entry(id.clone()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_favourite(&self, id: &ItemId) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Number of ids currently marked favourite.
    pub fn count(&self) -> usize {
        self.flags.values().filter(|flag| **flag).count()
    }
}
