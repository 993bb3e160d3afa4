//! Observable filter/pagination state store.
//!
//! Holds the current list-view query state and notifies subscribers on
//! every transition. No validation happens here: an out-of-range page or
//! malformed sort string passes through, the query translator degrades
//! gracefully, and the server is the final arbiter of valid ranges.

use std::sync::Weak;

use parking_lot::RwLock;
use roster_model::{FilterState, FilterUpdate};

/// Components notified when the filter state changes.
pub trait FilterSubscriber: Send + Sync {
    fn on_filters_changed(&self, state: &FilterState);
}

/// Single source of truth for the list view's query state.
pub struct FilterStore {
    state: RwLock<FilterState>,
    subscribers: RwLock<Vec<Weak<dyn FilterSubscriber>>>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FilterState::default()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self, subscriber: Weak<dyn FilterSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    /// Current state, by value.
    pub fn snapshot(&self) -> FilterState {
        self.state.read().clone()
    }

    /// Move to a page. The only transition that leaves the page alone.
    pub fn set_page(&self, page: u32) {
        {
            let mut state = self.state.write();
            state.page = page;
        }
        self.notify();
    }

    /// Change the sort expression and restart from the first page.
    pub fn set_sort(&self, sort: impl Into<String>) {
        {
            let mut state = self.state.write();
            state.sort = sort.into();
            state.page = 0;
        }
        self.notify();
    }

    /// Apply a filter-field update; the page resets to 0.
    pub fn set_filter(&self, update: FilterUpdate) {
        {
            let mut state = self.state.write();
            update.apply_to(&mut state);
        }
        self.notify();
    }

    /// Restore the full initial state.
    pub fn reset(&self) {
        *self.state.write() = FilterState::default();
        self.notify();
    }

    /// Notify live subscribers and drop dead ones.
    fn notify(&self) {
        let state = self.snapshot();
        self.subscribers.write().retain(|weak| {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_filters_changed(&state);
                true
            } else {
                false
            }
        });
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &*self.state.read())
            .field("subscriber_count", &self.subscribers.read().len())
            .finish()
    }
}
