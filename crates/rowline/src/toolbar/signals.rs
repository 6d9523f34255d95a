//! Events published by the toolbar.

use std::sync::Arc;

use rowline_core::Signal;

use crate::model::{ColumnDescriptor, DataPage, EntitySchema, NavigationState};

/// The toolbar's output boundary.
///
/// Selection deltas are published by the selection model and removed
/// custom filters by the filter composer; everything else goes through
/// these signals. Emission is synchronous, so slots must not call back
/// into the toolbar.
pub struct ToolbarSignals<E> {
    /// The navigation state changed; a remote host fetches the new page.
    pub navigation_state_changed: Signal<NavigationState>,
    /// The displayed page changed.
    pub settings_changed: Signal<DataPage<E>>,
    /// A new logical dataset was resolved; carries the extended schema.
    pub entity_schema_changed: Signal<Arc<EntitySchema>>,
    /// The shown table columns changed.
    pub shown_columns_changed: Signal<Vec<ColumnDescriptor>>,
    /// The additional list elements changed.
    pub additional_list_elements_changed: Signal<Vec<ColumnDescriptor>>,
    /// Grouping was applied (label) or cleared (`None`).
    pub grouping_changed: Signal<Option<String>>,
    /// A search term was submitted.
    pub search: Signal<Option<String>>,
    /// The filter tree selection changed; carries the filter expressions.
    pub filter_tree_selection_changed: Signal<Vec<String>>,
}

impl<E: Send + Sync + 'static> ToolbarSignals<E> {
    pub fn new() -> Self {
        Self {
            navigation_state_changed: Signal::new(),
            settings_changed: Signal::new(),
            entity_schema_changed: Signal::new(),
            shown_columns_changed: Signal::new(),
            additional_list_elements_changed: Signal::new(),
            grouping_changed: Signal::new(),
            search: Signal::new(),
            filter_tree_selection_changed: Signal::new(),
        }
    }
}

impl<E: Send + Sync + 'static> Default for ToolbarSignals<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ToolbarSignals<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarSignals")
            .field("navigation_state_changed", &self.navigation_state_changed)
            .field("settings_changed", &self.settings_changed)
            .finish_non_exhaustive()
    }
}
