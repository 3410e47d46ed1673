use std::num::NonZeroUsize;

use crate::fetch::{normalize_url, FetchTicket};
use crate::view_model::{AppViewModel, ItemRowView, ListStatus, REFRESHING_NOTICE};
use crate::{
    Effect, Favourites, FetchController, FetchGeneration, Item, ItemId, Pagination, Reconciler,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    fetch: FetchController,
    reconciler: Reconciler,
    pagination: Pagination,
    favourites: Favourites,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: NonZeroUsize) -> Self {
        Self {
            pagination: Pagination::new(page_size),
            ..Self::default()
        }
    }

    pub fn fetch(&self) -> &FetchController {
        &self.fetch
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn favourites(&self) -> &Favourites {
        &self.favourites
    }

    /// Filtered items in source order.
    pub fn filtered_items(&self) -> impl Iterator<Item = &Item> {
        let data = &self.fetch.state().data;
        self.reconciler
            .filtered()
            .iter()
            .filter_map(move |index| data.get(*index))
    }

    pub fn view(&self) -> AppViewModel {
        let fetch = self.fetch.state();
        let has_data = !fetch.data.is_empty();

        let status = match (&fetch.error, fetch.loading, has_data) {
            (_, true, false) => ListStatus::Loading {
                bytes: fetch.bytes_received,
            },
            (Some(error), false, false) => ListStatus::Failed(error.clone()),
            _ => ListStatus::Ready,
        };
        let notice = match (&fetch.error, fetch.loading, has_data) {
            (Some(error), _, true) => Some(error.clone()),
            (None, true, true) => Some(REFRESHING_NOTICE.to_string()),
            _ => None,
        };

        let window = self.pagination.window();
        let visible = window.slice(self.reconciler.filtered());
        let rows = visible
            .iter()
            .enumerate()
            .filter_map(|(offset, index)| {
                fetch.data.get(*index).map(|item| ItemRowView {
                    position: window.start_index + offset + 1,
                    id: item.id.clone(),
                    title: item.title.clone(),
                    company: item.company.clone(),
                    location: item.location.clone(),
                    description: item.description.clone(),
                    is_favourite: self.favourites.is_favourite(&item.id),
                })
            })
            .collect();

        let filter = self.reconciler.filter();
        let facet_options = self.reconciler.facet_options().to_vec();
        let selected_facet_available = filter
            .selected_facet
            .as_ref()
            .is_none_or(|facet| facet_options.contains(facet));

        AppViewModel {
            status,
            notice,
            last_updated: fetch.last_updated.clone(),
            search_text: filter.search_text.clone(),
            selected_facet: filter.selected_facet.clone(),
            selected_facet_available,
            facet_options,
            rows,
            page: self.pagination.page(),
            total_pages: self.pagination.total_pages(),
            filtered_count: self.reconciler.filtered().len(),
            total_count: fetch.data.len(),
            favourite_count: self.favourites.count(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn activate_source(&mut self, url: &str) -> Vec<Effect> {
        let rejected = normalize_url(url).is_none();
        let ticket = self.fetch.activate(url);
        if rejected || !ticket.is_empty() {
            self.mark_dirty();
        }
        ticket_effects(ticket)
    }

    pub(crate) fn refresh(&mut self) -> Vec<Effect> {
        let ticket = self.fetch.refresh();
        if !ticket.is_empty() {
            self.mark_dirty();
        }
        ticket_effects(ticket)
    }

    pub(crate) fn detach(&mut self) -> Vec<Effect> {
        match self.fetch.detach() {
            Some(generation) => {
                self.mark_dirty();
                vec![Effect::CancelFetch { generation }]
            }
            None => Vec::new(),
        }
    }

    pub(crate) fn apply_progress(&mut self, generation: FetchGeneration, bytes: u64) {
        // Byte counts only render while nothing has loaded yet.
        if self.fetch.apply_progress(generation, bytes) && self.fetch.state().data.is_empty() {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_success(
        &mut self,
        generation: FetchGeneration,
        items: Vec<Item>,
        fetched_at: String,
    ) {
        if self.fetch.apply_success(generation, items, fetched_at) {
            self.reconcile();
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_failure(&mut self, generation: FetchGeneration, detail: &str) {
        if self.fetch.apply_failure(generation, detail) {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_cancelled(&mut self, generation: FetchGeneration) {
        self.fetch.apply_cancelled(generation);
    }

    pub(crate) fn set_search_text(&mut self, text: String) {
        if self.reconciler.set_search_text(text) {
            self.reconcile();
            self.mark_dirty();
        }
    }

    pub(crate) fn select_facet(&mut self, facet: Option<String>) {
        if self.reconciler.set_selected_facet(facet) {
            self.reconcile();
            self.mark_dirty();
        }
    }

    pub(crate) fn next_page(&mut self) {
        if self.pagination.increment() {
            self.mark_dirty();
        }
    }

    pub(crate) fn previous_page(&mut self) {
        if self.pagination.decrement() {
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_favourite(&mut self, id: &ItemId) {
        self.favourites.toggle(id);
        self.mark_dirty();
    }

    /// Re-derives the filtered collection and pushes its length into pagination,
    /// but only when the derived output actually changed.
    fn reconcile(&mut self) {
        let changed = self
            .reconciler
            .reconcile(self.fetch.revision(), &self.fetch.state().data);
        if changed {
            self.pagination
                .set_total_items(self.reconciler.filtered().len());
        }
    }
}

fn ticket_effects(ticket: FetchTicket) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(generation) = ticket.cancel {
        effects.push(Effect::CancelFetch { generation });
    }
    if let Some(request) = ticket.start {
        effects.push(Effect::StartFetch {
            generation: request.generation,
            url: request.url,
        });
    }
    effects
}
