//! Navigation state synchronizer.
//!
//! [`Navigator`] owns the [`NavigationState`] and decides how a change of it
//! turns into a new page. In [`PagingMode::Local`] it holds a snapshot of
//! the whole dataset and re-slices it: rows are filtered by an optional
//! [`RowPredicate`], ordered by an optional [`CompareFn`], and the page
//! window `[start, min(start + size, n))` is cut from the result. In
//! [`PagingMode::Remote`] it only keeps the cursor and the last page
//! received; fetching is the host's job.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rowline_core::Debouncer;
use rowline_core::logging::{span_names, targets};

use crate::error::Result;
use crate::model::{DataPage, Entity, NavigationState, SortSpec};

/// Decides whether a row of the local snapshot passes the current filters.
///
/// Receives the navigation state so filter values and the search term can
/// be evaluated.
pub type RowPredicate<E> = Arc<dyn Fn(&E, &NavigationState) -> bool + Send + Sync>;

/// Orders two rows of the local snapshot under a sort spec.
pub type CompareFn<E> = Arc<dyn Fn(&E, &E, &SortSpec) -> Ordering + Send + Sync>;

/// Where paging and filtering are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// Slicing an in-memory snapshot.
    Local,
    /// Delegated to a backend returning one page per request.
    #[default]
    Remote,
}

/// Snapshot rows that pass the predicate, in display order.
#[derive(Debug, Default)]
struct RowMapping {
    visible: Vec<usize>,
}

impl RowMapping {
    fn row_count(&self) -> usize {
        self.visible.len()
    }

    fn rows(&self, range: std::ops::Range<usize>) -> &[usize] {
        &self.visible[range]
    }
}

/// Owns the navigation state and produces the current page.
pub struct Navigator<E: Entity> {
    mode: PagingMode,
    state: NavigationState,
    snapshot: Vec<E>,
    mapping: RowMapping,
    predicate: Option<RowPredicate<E>>,
    compare: Option<CompareFn<E>>,
    search: Debouncer<String>,
    page: DataPage<E>,
}

impl<E: Entity> fmt::Debug for Navigator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("snapshot", &self.snapshot.len())
            .field("visible", &self.mapping.row_count())
            .field("page", &self.page.len())
            .finish()
    }
}

impl<E: Entity> Navigator<E> {
    /// Creates a navigator; search input settles after `search_quiet`.
    pub fn new(mode: PagingMode, search_quiet: Duration) -> Self {
        Self {
            mode,
            state: NavigationState::default(),
            snapshot: Vec::new(),
            mapping: RowMapping::default(),
            predicate: None,
            compare: None,
            search: Debouncer::with_initial(search_quiet, String::new()),
            page: DataPage::empty(),
        }
    }

    /// Sets the row predicate used for local slicing.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &NavigationState) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Sets the comparator used for local sorting.
    pub fn with_compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&E, &E, &SortSpec) -> Ordering + Send + Sync + 'static,
    {
        self.compare = Some(Arc::new(compare));
        self
    }

    /// Replaces the row predicate. Takes effect on the next slice.
    pub fn set_predicate(&mut self, predicate: Option<RowPredicate<E>>) {
        self.predicate = predicate;
    }

    /// Replaces the comparator. Takes effect on the next slice.
    pub fn set_compare(&mut self, compare: Option<CompareFn<E>>) {
        self.compare = compare;
    }

    /// The paging mode.
    pub fn mode(&self) -> PagingMode {
        self.mode
    }

    /// Returns true in local mode.
    pub fn is_local(&self) -> bool {
        self.mode == PagingMode::Local
    }

    /// The current navigation state.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut NavigationState {
        &mut self.state
    }

    /// The page currently displayed.
    pub fn page(&self) -> &DataPage<E> {
        &self.page
    }

    /// The full local snapshot; empty in remote mode.
    pub fn snapshot(&self) -> &[E] {
        &self.snapshot
    }

    // =========================================================================
    // Dataset and pages
    // =========================================================================

    /// Starts over with a new logical dataset.
    ///
    /// In local mode `data` becomes the snapshot and the displayed page is
    /// emptied until [`slice`](Self::slice) runs. In remote mode `data` is
    /// the page for `state`.
    pub fn reset(&mut self, state: NavigationState, data: DataPage<E>) {
        self.search.cancel();
        self.search
            .mark_released(state.search().unwrap_or_default().to_string());
        self.state = state;
        self.mapping = RowMapping::default();

        match self.mode {
            PagingMode::Local => {
                self.snapshot = data.data;
                self.page = DataPage::empty();
            }
            PagingMode::Remote => {
                self.snapshot.clear();
                self.page = data;
            }
        }
        tracing::debug!(
            target: targets::NAVIGATION,
            mode = ?self.mode,
            rows = self.snapshot.len().max(self.page.len()),
            "navigation reset for new dataset"
        );
    }

    /// Takes in fresh data for the same logical dataset.
    ///
    /// Local mode replaces the snapshot and re-slices immediately; remote
    /// mode replaces the displayed page. The last page received wins.
    pub fn receive(&mut self, data: DataPage<E>) {
        match self.mode {
            PagingMode::Local => {
                self.snapshot = data.data;
                self.slice();
            }
            PagingMode::Remote => {
                tracing::debug!(
                    target: targets::NAVIGATION,
                    rows = data.len(),
                    total = data.total_count,
                    "remote page received"
                );
                self.page = data;
            }
        }
    }

    /// Recomputes the displayed page from the snapshot.
    ///
    /// Does nothing in remote mode.
    pub fn slice(&mut self) {
        if !self.is_local() {
            return;
        }
        let _span = tracing::debug_span!(span_names::LOCAL_SLICE).entered();

        let mut visible: Vec<usize> = match &self.predicate {
            Some(predicate) => (0..self.snapshot.len())
                .filter(|&row| predicate(&self.snapshot[row], &self.state))
                .collect(),
            None => (0..self.snapshot.len()).collect(),
        };
        if let (Some(compare), Some(sort)) = (&self.compare, self.state.sort()) {
            visible.sort_by(|&a, &b| compare(&self.snapshot[a], &self.snapshot[b], sort));
        }
        self.mapping = RowMapping { visible };

        let total = self.mapping.row_count();
        let window = self.state.window(total);
        let data = self
            .mapping
            .rows(window.clone())
            .iter()
            .map(|&row| self.snapshot[row].clone())
            .collect();
        self.page = DataPage::new(data, total);

        tracing::debug!(
            target: targets::NAVIGATION,
            start = window.start,
            size = self.state.page_size(),
            total,
            shown = self.page.len(),
            "local page sliced"
        );
    }

    // =========================================================================
    // Cursor changes
    // =========================================================================

    /// Moves to another page. Returns true if the cursor changed.
    ///
    /// A zero page size is rejected and leaves the state untouched.
    pub fn set_page(&mut self, start_index: usize, page_size: usize) -> Result<bool> {
        let before = (self.state.start_index(), self.state.page_size());
        self.state.set_page_size(page_size)?;
        self.state.set_start_index(start_index);
        let changed = before != (start_index, page_size);
        if changed {
            self.slice();
        }
        Ok(changed)
    }

    /// Replaces the whole navigation state, e.g. from a paginator.
    ///
    /// Returns true if it differed from the current one.
    pub fn replace_state(&mut self, state: NavigationState) -> bool {
        if state == self.state {
            return false;
        }
        self.search
            .mark_released(state.search().unwrap_or_default().to_string());
        self.state = state;
        self.slice();
        true
    }

    /// Changes the sort. The page cursor is kept.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> bool {
        if self.state.sort() == sort.as_ref() {
            return false;
        }
        self.state.set_sort(sort);
        self.slice();
        true
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Feeds search input typed at `now`.
    pub fn submit_search_at(&mut self, text: impl Into<String>, now: Instant) {
        self.search.submit_at(text.into(), now);
    }

    /// Time left before pending search input settles.
    pub fn search_ready_in(&self, now: Instant) -> Option<Duration> {
        self.search.time_until_ready(now)
    }

    /// Returns settled search input that differs from the applied term.
    pub fn poll_search_at(&mut self, now: Instant) -> Option<String> {
        self.search.poll_at(now)
    }

    /// Applies a search term right away. Returns true if it changed.
    ///
    /// A changed term moves the cursor back to the first row.
    pub fn apply_search(&mut self, text: Option<String>) -> bool {
        let text = text.filter(|t| !t.is_empty());
        self.search.cancel();
        self.search
            .mark_released(text.clone().unwrap_or_default());
        if self.state.search() == text.as_deref() {
            return false;
        }
        self.state.set_search(text);
        self.state.set_start_index(0);
        self.slice();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32);

    impl Entity for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.0
        }
    }

    const QUIET: Duration = Duration::from_millis(300);

    fn items(n: u32) -> Vec<Item> {
        (0..n).map(Item).collect()
    }

    fn ids(page: &DataPage<Item>) -> Vec<u32> {
        page.data.iter().map(|i| i.0).collect()
    }

    fn local(n: u32, page_size: usize) -> Navigator<Item> {
        let mut navigator = Navigator::new(PagingMode::Local, QUIET);
        let state = NavigationState::with_page_size(page_size).unwrap();
        navigator.reset(state, DataPage::complete(items(n)));
        navigator
    }

    #[test]
    fn test_local_slice_window() {
        let mut navigator = local(25, 10);
        assert!(navigator.page().is_empty());

        navigator.slice();
        assert_eq!(ids(navigator.page()), (0..10).collect::<Vec<_>>());
        assert_eq!(navigator.page().total_count, 25);

        assert!(navigator.set_page(20, 10).unwrap());
        assert_eq!(ids(navigator.page()), vec![20, 21, 22, 23, 24]);

        assert!(!navigator.set_page(20, 10).unwrap());
        assert!(navigator.set_page(30, 10).unwrap());
        assert!(navigator.page().is_empty());
    }

    #[test]
    fn test_zero_page_size_keeps_state() {
        let mut navigator = local(25, 10);
        navigator.set_page(10, 10).unwrap();

        assert!(navigator.set_page(0, 0).is_err());
        assert_eq!(navigator.state().start_index(), 10);
        assert_eq!(navigator.state().page_size(), 10);
    }

    #[test]
    fn test_predicate_sees_navigation_state() {
        let mut navigator = local(25, 10).with_predicate(|item: &Item, state: &NavigationState| {
            match state.filter("parity") {
                Some("even") => item.0 % 2 == 0,
                _ => true,
            }
        });
        navigator.state_mut().set_filter("parity", Some("even"));
        navigator.slice();

        assert_eq!(navigator.page().total_count, 13);
        assert_eq!(ids(navigator.page()), vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_sort_keeps_cursor() {
        let mut navigator = local(25, 10).with_compare(|a: &Item, b: &Item, sort: &SortSpec| {
            let ordering = a.0.cmp(&b.0);
            match sort.direction {
                crate::model::SortDirection::Ascending => ordering,
                crate::model::SortDirection::Descending => ordering.reverse(),
            }
        });
        navigator.set_page(20, 10).unwrap();

        assert!(navigator.set_sort(Some(SortSpec::descending("id"))));
        assert_eq!(navigator.state().start_index(), 20);
        assert_eq!(ids(navigator.page()), vec![4, 3, 2, 1, 0]);
        assert!(!navigator.set_sort(Some(SortSpec::descending("id"))));
    }

    #[test]
    fn test_search_is_debounced_and_distinct() {
        let start = Instant::now();
        let mut navigator = local(25, 10);

        navigator.submit_search_at("b", start);
        navigator.submit_search_at("bo", start + Duration::from_millis(100));
        assert_eq!(navigator.poll_search_at(start + Duration::from_millis(200)), None);
        let settled = navigator.poll_search_at(start + Duration::from_millis(400));
        assert_eq!(settled.as_deref(), Some("bo"));

        navigator.set_page(10, 10).unwrap();
        assert!(navigator.apply_search(settled));
        assert_eq!(navigator.state().search(), Some("bo"));
        assert_eq!(navigator.state().start_index(), 0);

        navigator.submit_search_at("bo", start + Duration::from_secs(1));
        assert_eq!(navigator.poll_search_at(start + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_remote_mode_keeps_received_page() {
        let mut navigator = Navigator::<Item>::new(PagingMode::Remote, QUIET);
        navigator.reset(NavigationState::default(), DataPage::new(items(3), 100));
        assert_eq!(navigator.page().total_count, 100);
        assert!(navigator.snapshot().is_empty());

        assert!(navigator.set_page(25, 25).unwrap());
        assert_eq!(navigator.page().len(), 3);

        navigator.receive(DataPage::new(vec![Item(25), Item(26)], 100));
        assert_eq!(ids(navigator.page()), vec![25, 26]);
    }

    #[test]
    fn test_replace_state() {
        let mut navigator = local(25, 10);
        let mut state = navigator.state().clone();
        assert!(!navigator.replace_state(state.clone()));

        state.set_start_index(10);
        assert!(navigator.replace_state(state));
        assert_eq!(ids(navigator.page())[0], 10);
    }
}
