use crate::{FetchGeneration, Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The fetch target changed; also sent once at startup.
    SourceChanged(String),
    /// User asked to re-fetch the current target.
    RefreshRequested,
    /// The view is going away; abandon any in-flight request.
    Detached,
    /// Engine progress for a request.
    FetchProgress {
        generation: FetchGeneration,
        bytes: u64,
    },
    /// Engine delivered a decoded collection.
    FetchSucceeded {
        generation: FetchGeneration,
        items: Vec<Item>,
        fetched_at: String,
    },
    /// Engine gave up on a request (transport, status, or decode failure).
    FetchFailed {
        generation: FetchGeneration,
        detail: String,
    },
    /// Engine confirmed a request was abandoned.
    FetchCancelled { generation: FetchGeneration },
    /// User edited the search box.
    SearchChanged(String),
    /// User picked a location; `None` means "Any".
    FacetSelected(Option<String>),
    /// User clicked Next.
    NextPage,
    /// User clicked Previous.
    PreviousPage,
    /// User toggled the favourite button on a row.
    FavouriteToggled(ItemId),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
