use crate::ItemId;

/// Shown above stale rows while a refresh is in flight.
pub const REFRESHING_NOTICE: &str = "Refreshing...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    /// First load in progress; nothing to show yet.
    Loading { bytes: Option<u64> },
    /// Load failed with nothing to fall back on; replaces the whole list.
    Failed(String),
    #[default]
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: ListStatus,
    pub notice: Option<String>,
    pub last_updated: Option<String>,
    pub search_text: String,
    pub selected_facet: Option<String>,
    /// False when the selected location is no longer reachable under the search text.
    pub selected_facet_available: bool,
    pub facet_options: Vec<String>,
    pub rows: Vec<ItemRowView>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub favourite_count: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    /// 1-based position within the filtered collection.
    pub position: usize,
    pub id: ItemId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub is_favourite: bool,
}
