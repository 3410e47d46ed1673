use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourceChanged(url) => state.activate_source(&url),
        Msg::RefreshRequested => state.refresh(),
        Msg::Detached => state.detach(),
        Msg::FetchProgress { generation, bytes } => {
            state.apply_progress(generation, bytes);
            Vec::new()
        }
        Msg::FetchSucceeded {
            generation,
            items,
            fetched_at,
        } => {
            state.apply_success(generation, items, fetched_at);
            Vec::new()
        }
        Msg::FetchFailed { generation, detail } => {
            state.apply_failure(generation, &detail);
            Vec::new()
        }
        Msg::FetchCancelled { generation } => {
            state.apply_cancelled(generation);
            Vec::new()
        }
        Msg::SearchChanged(text) => {
            state.set_search_text(text);
            Vec::new()
        }
        Msg::FacetSelected(facet) => {
            state.select_facet(facet);
            Vec::new()
        }
        Msg::NextPage => {
            state.next_page();
            Vec::new()
        }
        Msg::PreviousPage => {
            state.previous_page();
            Vec::new()
        }
        Msg::FavouriteToggled(id) => {
            state.toggle_favourite(&id);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
