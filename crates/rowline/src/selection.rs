//! Selection model for list views.
//!
//! [`SelectionModel`] tracks which rows are selected independently of which
//! page is currently materialized. Membership is keyed by entity identity,
//! so a row selected on page 2 stays selected while page 1 is shown, and
//! stays selected after a refresh drops it from the current page. Only an
//! explicit deselection or [`clear`](SelectionModel::clear) removes it.
//!
//! # Example
//!
//! ```ignore
//! use rowline::selection::SelectionModel;
//!
//! let mut selection = SelectionModel::new();
//! selection.selection_changed.connect(|change| {
//!     println!("Selection changed: +{} -{}", change.added.len(), change.removed.len());
//! });
//!
//! selection.toggle(&row);
//! assert!(selection.is_selected(&row));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rowline_core::Signal;
use rowline_core::logging::targets;

use crate::model::Entity;

/// The delta published for every selection mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<E> {
    /// Rows that became selected.
    pub added: Vec<E>,
    /// Rows that became unselected.
    pub removed: Vec<E>,
}

impl<E> SelectionChange<E> {
    fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Decides whether a row may be selected.
pub struct ItemStatus<E> {
    enabled: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> ItemStatus<E> {
    /// Creates an item status from a predicate.
    pub fn new<F>(enabled: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            enabled: Arc::new(enabled),
        }
    }

    /// Returns true if `item` is selectable.
    pub fn enabled(&self, item: &E) -> bool {
        (self.enabled)(item)
    }
}

impl<E> Default for ItemStatus<E> {
    fn default() -> Self {
        Self::new(|_| true)
    }
}

impl<E> Clone for ItemStatus<E> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled.clone(),
        }
    }
}

impl<E> fmt::Debug for ItemStatus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStatus").finish_non_exhaustive()
    }
}

/// Manages the set of selected rows.
///
/// # Signals
///
/// - `selection_changed`: emitted with the delta of every mutation that
///   changed membership, unless emission is suspended
pub struct SelectionModel<E: Entity> {
    /// Set of selected ids for O(1) lookup.
    selected_ids: HashSet<E::Id>,

    /// Selected rows in selection order.
    selected: Vec<E>,

    /// Emitted when selection changes.
    pub selection_changed: Signal<SelectionChange<E>>,
}

impl<E: Entity> Default for SelectionModel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for SelectionModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("selected", &self.selected_ids)
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

impl<E: Entity> SelectionModel<E> {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self {
            selected_ids: HashSet::new(),
            selected: Vec::new(),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Suspension
    // =========================================================================

    /// Suspends or resumes change emission.
    ///
    /// Mutations still apply while suspended; only the notifications are
    /// dropped. Used while preselected rows are applied in bulk.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.selection_changed.set_blocked(suspended);
    }

    /// Returns true while change emission is suspended.
    pub fn is_suspended(&self) -> bool {
        self.selection_changed.is_blocked()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks if a row is selected.
    pub fn is_selected(&self, item: &E) -> bool {
        self.selected_ids.contains(&item.id())
    }

    /// Returns true if any rows are selected.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Returns the number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Snapshot of the selected rows in selection order.
    pub fn selected(&self) -> &[E] {
        &self.selected
    }

    /// Number of rows of `page` that are selected.
    pub fn selected_on_page(&self, page: &[E]) -> usize {
        page.iter().filter(|item| self.is_selected(item)).count()
    }

    /// Number of rows of `page` that may be selected.
    pub fn selectable_count(&self, page: &[E], status: &ItemStatus<E>) -> usize {
        page.iter().filter(|item| status.enabled(item)).count()
    }

    /// Returns true if as many rows of `page` are selected as are selectable.
    pub fn all_selected_on_page(&self, page: &[E], status: &ItemStatus<E>) -> bool {
        self.selected_on_page(page) == self.selectable_count(page, status)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Selects the row if unselected, deselects it otherwise.
    pub fn toggle(&mut self, item: &E) {
        let mut change = SelectionChange::new();
        if self.is_selected(item) {
            self.remove(item, &mut change);
        } else {
            self.add(item, &mut change);
        }
        self.publish(change);
    }

    /// Selects the row; no-op if already selected.
    pub fn checked(&mut self, item: &E) {
        let mut change = SelectionChange::new();
        self.add(item, &mut change);
        self.publish(change);
    }

    /// Deselects the row; no-op if not selected.
    pub fn un_checked(&mut self, item: &E) {
        let mut change = SelectionChange::new();
        self.remove(item, &mut change);
        self.publish(change);
    }

    /// Selects every row of `items`, publishing one combined delta.
    pub fn check_all<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a E>,
    {
        let mut change = SelectionChange::new();
        for item in items {
            self.add(item, &mut change);
        }
        self.publish(change);
    }

    /// Deselects every row of `items`, publishing one combined delta.
    pub fn un_check_all<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a E>,
    {
        let mut change = SelectionChange::new();
        for item in items {
            self.remove(item, &mut change);
        }
        self.publish(change);
    }

    /// Selects every enabled row of `page` that is not selected yet.
    pub fn select_all_on_page(&mut self, page: &[E], status: &ItemStatus<E>) {
        self.check_all(page.iter().filter(|item| status.enabled(item)));
    }

    /// Deselects the whole page if all its selectable rows are selected,
    /// otherwise selects every selectable row on it.
    pub fn toggle_page(&mut self, page: &[E], status: &ItemStatus<E>) {
        if self.all_selected_on_page(page, status) {
            self.un_check_all(page);
        } else {
            self.select_all_on_page(page, status);
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.selected_ids.clear();
        let change = SelectionChange {
            added: Vec::new(),
            removed: std::mem::take(&mut self.selected),
        };
        self.publish(change);
    }

    fn add(&mut self, item: &E, change: &mut SelectionChange<E>) {
        if self.selected_ids.insert(item.id()) {
            self.selected.push(item.clone());
            change.added.push(item.clone());
        }
    }

    fn remove(&mut self, item: &E, change: &mut SelectionChange<E>) {
        let id = item.id();
        if self.selected_ids.remove(&id) {
            if let Some(pos) = self.selected.iter().position(|s| s.id() == id) {
                change.removed.push(self.selected.remove(pos));
            }
        }
    }

    fn publish(&self, change: SelectionChange<E>) {
        if change.is_empty() {
            return;
        }
        tracing::debug!(
            target: targets::SELECTION,
            added = change.added.len(),
            removed = change.removed.len(),
            total = self.selected.len(),
            suspended = self.is_suspended(),
            "selection changed"
        );
        self.selection_changed.emit(change);
    }
}
