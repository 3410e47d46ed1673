//! Page window arithmetic and the clamped page cursor.
use std::num::NonZeroUsize;

/// Rows shown per page unless the app configures otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Contiguous index range of the filtered collection visible on one page.
///
/// `end_index` is inclusive; `None` means the window is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start_index: usize,
    pub end_index: Option<usize>,
}

impl PageWindow {
    /// Number of items covered by the window, never negative.
    pub fn len(&self) -> usize {
        match self.end_index {
            Some(end) if end >= self.start_index => end - self.start_index + 1,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slices `items` to this window. Out-of-range or empty windows yield an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.is_empty() || self.start_index >= items.len() {
            return &[];
        }
        let end = (self.start_index + self.len()).min(items.len());
        &items[self.start_index..end]
    }
}

/// `max(1, ceil(total_items / page_size))`.
pub fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size.get())
    }
}

/// Maps `(total_items, page, page_size)` to the visible window. Pages are 1-based;
/// page 0 is treated as page 1.
pub fn compute_window(total_items: usize, page: usize, page_size: NonZeroUsize) -> PageWindow {
    let size = page_size.get();
    let start_index = page.saturating_sub(1).saturating_mul(size);
    let upper = total_items.min(page.saturating_mul(size));
    PageWindow {
        start_index,
        end_index: upper.checked_sub(1),
    }
}

/// Current page cursor over a collection whose length is driven by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: NonZeroUsize,
    total_items: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page: 1,
            page_size,
            total_items: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    pub fn window(&self) -> PageWindow {
        compute_window(self.total_items, self.page, self.page_size)
    }

    /// Advances one page unless already on the last. Returns whether the page moved.
    pub fn increment(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page unless already on the first. Returns whether the page moved.
    pub fn decrement(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Updates the collection length and pulls the page back into `[1, total_pages]`.
    /// Returns whether the page had to be clamped.
    pub fn set_total_items(&mut self, total_items: usize) -> bool {
        self.total_items = total_items;
        let clamped = self.page.clamp(1, self.total_pages());
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }
}
