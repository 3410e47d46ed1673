//! Jobboard core: pure state machine and view-model helpers.
mod effect;
mod favourites;
mod fetch;
mod filter;
mod item;
mod msg;
mod pagination;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use favourites::Favourites;
pub use fetch::{
    normalize_url, FetchController, FetchGeneration, FetchRequest, FetchState, FetchTicket,
    GENERIC_FETCH_ERROR, INVALID_URL_ERROR,
};
pub use filter::{matches_facet, matches_search, FilterState, Reconciler};
pub use item::{Item, ItemId};
pub use msg::Msg;
pub use pagination::{compute_window, total_pages, PageWindow, Pagination, DEFAULT_PAGE_SIZE};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView, ListStatus, REFRESHING_NOTICE};
