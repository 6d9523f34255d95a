//! The toolbar controller.
//!
//! [`Toolbar`] is the composition root of the list control plane. It owns
//! the [`SelectionModel`], the [`FilterComposer`], the [`ViewResolver`] and
//! the [`Navigator`], reacts to [`ToolbarSettings`] pushed by its host and
//! publishes everything that changed through [`ToolbarSignals`].
//!
//! # Datasets and refreshes
//!
//! The host pushes settings whenever its data changes. A schema `Arc` the
//! toolbar has not seen before starts a new logical dataset: columns are
//! resolved, filters start over and initial filter values are applied. In
//! local mode the new snapshot is sliced one batch later, see
//! [`process_deferred`](Toolbar::process_deferred). Pushing the same schema
//! `Arc` again only refreshes the data.
//!
//! # Example
//!
//! ```ignore
//! use rowline::prelude::*;
//!
//! let mut toolbar = Toolbar::<Person>::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()));
//! toolbar.signals.settings_changed.connect(|page| render(&page.data));
//!
//! toolbar.apply_settings(ToolbarSettings::new(schema, DataPage::complete(people), NavigationState::default()));
//! toolbar.process_deferred();
//!
//! toolbar.apply_option("status", "active", true);
//! toolbar.set_page(25, 25)?;
//! ```

mod settings;
mod signals;

pub use settings::{
    FilterTree, FilterTreeElement, Group, GroupCategory, GroupData, GroupFn, Grouping,
    ToolbarSettings,
};
pub use signals::ToolbarSignals;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rowline_core::logging::{span_names, targets};
use rowline_core::{TaskId, TaskQueue};

use crate::collaborators::{
    ColumnPicker, ColumnPickerRequest, FilterTreePicker, FilterTreeRequest, PageSource,
};
use crate::config::ToolbarConfig;
use crate::error::{Error, Result};
use crate::filter::{FilterComposer, FilterDefinition, FilterOption};
use crate::model::{ColumnDescriptor, DataPage, Entity, EntitySchema, NavigationState, SortSpec};
use crate::navigator::{Navigator, PagingMode};
use crate::selection::{ItemStatus, SelectionModel};
use crate::store::PreferenceStore;
use crate::view::ViewResolver;

/// Controller behind a paginated, filterable, groupable, multi-select list.
pub struct Toolbar<E: Entity> {
    config: ToolbarConfig,
    store: Arc<dyn PreferenceStore>,

    selection: SelectionModel<E>,
    item_status: ItemStatus<E>,
    filters: FilterComposer,
    view: ViewResolver,
    navigator: Navigator<E>,

    /// The schema as pushed by the host; compared by identity.
    source_schema: Option<Arc<EntitySchema>>,
    /// The schema extended with the data model's columns.
    schema: Option<Arc<EntitySchema>>,
    displayed_columns: Vec<ColumnDescriptor>,
    limit_reached: bool,

    filter_tree: Option<FilterTree>,
    tree_selection: Vec<FilterTreeElement>,
    group_data: Option<GroupData<E>>,
    grouping: Option<Grouping<E>>,

    keywords: Option<String>,
    tasks: TaskQueue<Toolbar<E>>,
    pending_slice: Option<TaskId>,

    /// Events for the rendering layer and the remote data source.
    pub signals: ToolbarSignals<E>,
}

impl<E: Entity> fmt::Debug for Toolbar<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbar")
            .field("mode", &self.navigator.mode())
            .field("dataset", &self.schema.as_ref().map(|s| s.display().to_string()))
            .field("navigation_state", self.navigator.state())
            .field("selected", &self.selection.selected_count())
            .field("pending_tasks", &self.tasks.pending_count())
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Toolbar<E> {
    /// Creates a toolbar; column choices are kept in `store`.
    pub fn new(config: ToolbarConfig, store: Arc<dyn PreferenceStore>) -> Self {
        let navigator = Navigator::new(config.paging_mode(), config.search_quiet());
        let keywords = config.keywords.clone().filter(|k| !k.is_empty());
        Self {
            config,
            store,
            selection: SelectionModel::new(),
            item_status: ItemStatus::default(),
            filters: FilterComposer::new(),
            view: ViewResolver::new(),
            navigator,
            source_schema: None,
            schema: None,
            displayed_columns: Vec::new(),
            limit_reached: false,
            filter_tree: None,
            tree_selection: Vec::new(),
            group_data: None,
            grouping: None,
            keywords,
            tasks: TaskQueue::new(),
            pending_slice: None,
            signals: ToolbarSignals::new(),
        }
    }

    /// Sets the predicate local slicing filters rows with.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &NavigationState) -> bool + Send + Sync + 'static,
    {
        self.navigator.set_predicate(Some(Arc::new(predicate)));
        self
    }

    /// Sets the comparator local slicing sorts rows with.
    pub fn with_compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&E, &E, &SortSpec) -> Ordering + Send + Sync + 'static,
    {
        self.navigator.set_compare(Some(Arc::new(compare)));
        self
    }

    /// Sets which rows may be selected.
    pub fn with_item_status(mut self, status: ItemStatus<E>) -> Self {
        self.item_status = status;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    /// The selection; connect to its `selection_changed` signal for deltas.
    pub fn selection(&self) -> &SelectionModel<E> {
        &self.selection
    }

    /// The filters; connect to `custom_filter_removed` for custom entries.
    pub fn filters(&self) -> &FilterComposer {
        &self.filters
    }

    pub fn navigation_state(&self) -> &NavigationState {
        self.navigator.state()
    }

    pub fn paging_mode(&self) -> PagingMode {
        self.navigator.mode()
    }

    /// The page currently displayed.
    pub fn page(&self) -> &DataPage<E> {
        self.navigator.page()
    }

    /// The resolved (extended) schema of the current dataset.
    pub fn schema(&self) -> Option<&Arc<EntitySchema>> {
        self.schema.as_ref()
    }

    pub fn displayed_columns(&self) -> &[ColumnDescriptor] {
        &self.displayed_columns
    }

    pub fn shown_columns(&self) -> &[ColumnDescriptor] {
        self.view.shown_columns()
    }

    pub fn optional_columns(&self) -> &[ColumnDescriptor] {
        self.view.optional_columns()
    }

    pub fn list_elements(&self) -> &[ColumnDescriptor] {
        self.view.list_elements()
    }

    /// Returns true if there are column settings to offer.
    pub fn has_view_settings(&self) -> bool {
        self.view.has_view_settings()
    }

    /// Total number of rows of the dataset.
    pub fn total_count(&self) -> usize {
        match self.navigator.mode() {
            PagingMode::Local => self.navigator.snapshot().len(),
            PagingMode::Remote => self.navigator.page().total_count,
        }
    }

    /// Whether the data source truncated the result.
    pub fn is_limit_reached(&self) -> bool {
        self.limit_reached
    }

    /// Returns true if the toolbar has anything to show.
    pub fn show_toolbar(&self) -> bool {
        self.config.always_visible
            || self.navigator.state().search_applied()
            || self.filters.filters_applied()
            || self.total_count() > 0
    }

    /// Filter definitions offered to the user, hidden ones left out.
    pub fn visible_filters(&self) -> Vec<&FilterDefinition> {
        self.filters
            .visible_definitions(&self.config.hidden_filters)
            .collect()
    }

    /// Returns true if filter `name` has too many options to show inline.
    pub fn uses_select_list(&self, name: &str) -> bool {
        self.filters
            .definition(name)
            .is_some_and(|d| d.uses_select_list(self.config.filter_option_threshold))
    }

    /// Returns true if deferred effects are waiting.
    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.has_pending()
    }

    // =========================================================================
    // Settings input
    // =========================================================================

    /// Takes in settings pushed by the host.
    pub fn apply_settings(&mut self, settings: ToolbarSettings<E>) {
        let same_dataset = self
            .source_schema
            .as_ref()
            .is_some_and(|s| Arc::ptr_eq(s, &settings.schema));
        if same_dataset {
            self.refresh(settings);
        } else {
            self.change_dataset(settings);
        }
    }

    fn change_dataset(&mut self, settings: ToolbarSettings<E>) {
        let _span =
            tracing::debug_span!(span_names::DATASET_CHANGE, dataset = settings.schema.display())
                .entered();

        self.cancel_pending_slice();

        let ToolbarSettings {
            data,
            displayed_columns,
            schema,
            mut navigation_state,
            filters,
            filter_tree,
            group_data,
            data_model,
        } = settings;

        let resolution = self.view.resolve(
            &schema,
            &displayed_columns,
            data_model.as_ref(),
            self.store.as_ref(),
        );
        self.source_schema = Some(schema);
        self.schema = Some(resolution.schema.clone());
        self.displayed_columns = displayed_columns;
        self.limit_reached = data.is_limit_reached;
        self.filter_tree = filter_tree;
        self.tree_selection.clear();
        self.group_data = group_data;
        let had_grouping = self.grouping.take().is_some();

        let keywords = self
            .keywords
            .take()
            .filter(|_| !navigation_state.search_applied());
        if let Some(keywords) = &keywords {
            navigation_state.set_search(Some(keywords.clone()));
        }

        self.navigator.reset(navigation_state, data);
        self.filters.reset(filters.unwrap_or_default());
        self.filters.adopt_navigation(self.navigator.state());
        let seeded = self.filters.apply_initial_values(self.navigator.state_mut());

        tracing::debug!(
            target: targets::TOOLBAR,
            mode = ?self.navigator.mode(),
            seeded,
            keywords = keywords.is_some(),
            "dataset changed"
        );

        self.signals
            .entity_schema_changed
            .emit(resolution.schema.clone());
        if resolution.shown_changed {
            self.signals
                .shown_columns_changed
                .emit(self.view.shown_columns().to_vec());
        }
        if resolution.list_changed {
            self.signals
                .additional_list_elements_changed
                .emit(self.view.list_elements().to_vec());
        }
        if had_grouping {
            self.signals.grouping_changed.emit(None);
        }
        if keywords.is_some() {
            self.signals
                .search
                .emit(self.navigator.state().search().map(str::to_string));
        }
        if seeded || keywords.is_some() {
            self.signals
                .navigation_state_changed
                .emit(self.navigator.state().clone());
        }

        match self.navigator.mode() {
            PagingMode::Local => {
                let task = self.tasks.post(|toolbar: &mut Toolbar<E>| {
                    toolbar.pending_slice = None;
                    toolbar.navigator.slice();
                    toolbar.publish_page();
                });
                self.pending_slice = Some(task);
            }
            PagingMode::Remote => self.publish_page(),
        }
    }

    fn refresh(&mut self, settings: ToolbarSettings<E>) {
        let ToolbarSettings {
            data,
            navigation_state,
            filters,
            filter_tree,
            group_data,
            ..
        } = settings;

        if let Some(filters) = filters {
            self.filters.set_definitions(filters);
        }
        if let Some(tree) = filter_tree {
            self.filter_tree = Some(tree);
        }
        if let Some(group_data) = group_data {
            self.group_data = Some(group_data);
        }
        self.limit_reached = data.is_limit_reached;

        match self.navigator.mode() {
            PagingMode::Local => {
                self.cancel_pending_slice();
                self.filters.mirror_into(self.navigator.state_mut());
            }
            PagingMode::Remote => {
                let tree_filters = self.navigator.state().tree_filters().to_vec();
                self.navigator.replace_state(navigation_state);
                let state = self.navigator.state_mut();
                self.filters.mirror_into(state);
                if state.tree_filters().is_empty() {
                    state.set_tree_filters(tree_filters);
                }
            }
        }
        self.navigator.receive(data);

        tracing::debug!(
            target: targets::TOOLBAR,
            rows = self.navigator.page().len(),
            total = self.total_count(),
            "dataset refreshed"
        );
        self.publish_page();
    }

    // =========================================================================
    // Remote data
    // =========================================================================

    /// Fetches the page for the current navigation state from `source`.
    ///
    /// On failure nothing changes and the error is returned.
    pub fn sync_remote(&mut self, source: &dyn PageSource<E>) -> Result<()> {
        let page = source
            .fetch(self.navigator.state())
            .map_err(Error::page_source)?;
        self.receive_page(page);
        Ok(())
    }

    /// Takes in a page the host fetched. The last page received wins.
    pub fn receive_page(&mut self, page: DataPage<E>) {
        self.limit_reached = page.is_limit_reached;
        self.navigator.receive(page);
        self.publish_page();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles a row.
    ///
    /// Item status only governs the page-wide operations; single rows are
    /// toggled as asked.
    pub fn toggle(&mut self, item: &E) {
        self.selection.toggle(item);
    }

    /// Selects a row.
    pub fn checked(&mut self, item: &E) {
        self.selection.checked(item);
    }

    /// Unselects a row.
    pub fn un_checked(&mut self, item: &E) {
        self.selection.un_checked(item);
    }

    /// Selects every selectable row of the displayed page.
    pub fn select_all_on_page(&mut self) {
        self.selection
            .select_all_on_page(&self.navigator.page().data, &self.item_status);
    }

    /// Selects or unselects the displayed page as a whole.
    pub fn toggle_page(&mut self) {
        self.selection
            .toggle_page(&self.navigator.page().data, &self.item_status);
    }

    /// Returns true if every selectable row of the displayed page is
    /// selected.
    pub fn all_selected_on_page(&self) -> bool {
        self.selection
            .all_selected_on_page(&self.navigator.page().data, &self.item_status)
    }

    /// Number of selected rows on the displayed page.
    pub fn selected_on_page(&self) -> usize {
        self.selection.selected_on_page(&self.navigator.page().data)
    }

    /// Number of selectable rows on the displayed page.
    pub fn selectable_count(&self) -> usize {
        self.selection
            .selectable_count(&self.navigator.page().data, &self.item_status)
    }

    /// Selects `items` after the current batch without publishing deltas.
    ///
    /// Emission is suspended right away and resumed once the deferred
    /// selection has run.
    pub fn preselect(&mut self, items: Vec<E>) -> TaskId {
        self.selection.set_suspended(true);
        self.tasks.post(move |toolbar: &mut Toolbar<E>| {
            toolbar.selection.check_all(items.iter());
            toolbar.selection.set_suspended(false);
            tracing::debug!(target: targets::TOOLBAR, count = items.len(), "preselection applied");
        })
    }

    /// Clears the selection after the current batch.
    pub fn clear_selection(&mut self) -> TaskId {
        self.tasks
            .post(|toolbar: &mut Toolbar<E>| toolbar.selection.clear())
    }

    /// Runs deferred effects until none are left. Returns how many ran.
    pub fn process_deferred(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let batch = self.tasks.take_all();
            if batch.is_empty() {
                return processed;
            }
            for task in batch {
                task.run(self);
                processed += 1;
            }
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Checks or unchecks an option of a filter.
    pub fn apply_option(&mut self, name: &str, value: &str, is_set: bool) {
        if self
            .filters
            .apply_option(name, value, is_set, self.navigator.state_mut())
        {
            self.filters_changed();
        }
    }

    /// Sets or clears the value of an exclusive filter.
    pub fn apply_exclusive(&mut self, name: &str, value: Option<&str>) {
        if self
            .filters
            .apply_exclusive(name, value, self.navigator.state_mut())
        {
            self.filters_changed();
        }
    }

    /// Replaces the selected options of a filter.
    pub fn apply_multi_selection<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self
            .filters
            .apply_multi_selection(name, values, self.navigator.state_mut())
        {
            self.filters_changed();
        }
    }

    /// Removes one selected filter entry.
    ///
    /// The cursor is reset and the page re-sliced either way; `emit`
    /// only decides whether `navigation_state_changed` goes out.
    pub fn remove_selected_filter(&mut self, name: &str, option_value: Option<&str>, emit: bool) {
        if !self
            .filters
            .remove_selected_filter(name, option_value, self.navigator.state_mut())
        {
            return;
        }
        if emit {
            self.filters_changed();
            return;
        }
        self.cancel_pending_slice();
        self.navigator.slice();
        if self.navigator.is_local() {
            self.publish_page();
        }
    }

    /// Adds a filter entry owned by an outside collaborator.
    pub fn add_custom_filter(&mut self, filter_name: impl Into<String>, option: FilterOption) {
        self.filters.add_custom_filter(filter_name, option);
    }

    /// Clears every filter.
    pub fn clear_filters(&mut self) {
        self.filters.clear_all(self.navigator.state_mut());
        self.filters_changed();
    }

    /// Returns true if any filter is applied.
    pub fn filters_applied(&self) -> bool {
        self.filters.filters_applied()
    }

    /// Returns true if a search term is applied.
    pub fn search_applied(&self) -> bool {
        self.navigator.state().search_applied()
    }

    // =========================================================================
    // Filter tree
    // =========================================================================

    pub fn filter_tree(&self) -> Option<&FilterTree> {
        self.filter_tree.as_ref()
    }

    /// Returns true if a filter tree with elements is offered.
    pub fn has_filter_tree(&self) -> bool {
        self.filter_tree
            .as_ref()
            .is_some_and(FilterTree::has_elements)
    }

    /// The chosen filter tree elements.
    pub fn tree_selection(&self) -> &[FilterTreeElement] {
        &self.tree_selection
    }

    /// Opens the filter tree picker. Returns true if a selection was made.
    pub fn show_filter_tree(&mut self, picker: &dyn FilterTreePicker) -> Result<bool> {
        let Some(tree) = self.filter_tree.clone().filter(FilterTree::has_elements) else {
            return Ok(false);
        };
        let request = FilterTreeRequest {
            tree,
            selected: self.tree_selection.clone(),
        };
        let Some(selection) = picker
            .pick(request)
            .map_err(|e| Error::dialog("filter tree", e))?
        else {
            tracing::debug!(target: targets::TOOLBAR, "filter tree dialog cancelled");
            return Ok(false);
        };
        self.apply_tree_selection(selection);
        Ok(true)
    }

    /// Removes every filter tree choice.
    pub fn clear_tree_filter(&mut self) {
        self.apply_tree_selection(Vec::new());
    }

    fn apply_tree_selection(&mut self, selection: Vec<FilterTreeElement>) {
        let expressions: Vec<String> = selection.iter().map(|e| e.filter.clone()).collect();
        self.tree_selection = selection;

        let state = self.navigator.state_mut();
        state.set_tree_filters(expressions.clone());
        state.set_start_index(0);
        self.navigator.slice();

        self.signals.filter_tree_selection_changed.emit(expressions);
        self.navigation_changed();
    }

    // =========================================================================
    // Search, paging and sorting
    // =========================================================================

    /// Feeds search input typed now.
    pub fn submit_search(&mut self, text: impl Into<String>) {
        self.submit_search_at(text, Instant::now());
    }

    /// Feeds search input typed at `now`.
    pub fn submit_search_at(&mut self, text: impl Into<String>, now: Instant) {
        self.navigator.submit_search_at(text, now);
    }

    /// Time left before pending search input settles.
    pub fn search_ready_in(&self, now: Instant) -> Option<Duration> {
        self.navigator.search_ready_in(now)
    }

    /// Applies settled search input. Returns true if the search changed.
    pub fn poll_search(&mut self) -> bool {
        self.poll_search_at(Instant::now())
    }

    /// Applies search input settled by `now`.
    pub fn poll_search_at(&mut self, now: Instant) -> bool {
        match self.navigator.poll_search_at(now) {
            Some(text) => self.search(Some(text)),
            None => false,
        }
    }

    /// Searches right away, bypassing the quiet window.
    pub fn search(&mut self, keywords: Option<String>) -> bool {
        if !self.navigator.apply_search(keywords) {
            return false;
        }
        self.signals
            .search
            .emit(self.navigator.state().search().map(str::to_string));
        self.navigation_changed();
        true
    }

    /// Moves to another page.
    pub fn set_page(&mut self, start_index: usize, page_size: usize) -> Result<()> {
        if self.navigator.set_page(start_index, page_size)? {
            self.navigation_changed();
        }
        Ok(())
    }

    /// Changes the sort; the page cursor is kept.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        if self.navigator.set_sort(sort) {
            self.navigation_changed();
        }
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    pub fn group_data(&self) -> Option<&GroupData<E>> {
        self.group_data.as_ref()
    }

    pub fn grouping(&self) -> Option<&Grouping<E>> {
        self.grouping.as_ref()
    }

    /// Groups by the group labelled `group`, inside `category` if given.
    ///
    /// Returns false if no such group is offered.
    pub fn select_group(&mut self, group: &str, category: Option<&str>) -> bool {
        let Some(found) = self
            .group_data
            .as_ref()
            .and_then(|data| data.find(group, category))
            .cloned()
        else {
            tracing::warn!(target: targets::TOOLBAR, group, ?category, "unknown group");
            return false;
        };

        let display = match category {
            Some(category) => format!("{category} - {group}"),
            None => group.to_string(),
        };
        self.grouping = Some(Grouping {
            display: display.clone(),
            group: found,
        });
        self.regrouped(Some(display));
        true
    }

    /// Removes the grouping. Returns false if none was applied.
    pub fn clear_grouping(&mut self) -> bool {
        if self.grouping.take().is_none() {
            return false;
        }
        self.regrouped(None);
        true
    }

    /// The displayed page bucketed by the current grouping, in order of
    /// first appearance. Empty when no grouping is applied.
    pub fn grouped_page(&self) -> Vec<(String, Vec<E>)> {
        let Some(grouping) = &self.grouping else {
            return Vec::new();
        };
        let mut buckets: Vec<(String, Vec<E>)> = Vec::new();
        for item in &self.navigator.page().data {
            let key = grouping.group.key(item);
            match buckets.iter_mut().find(|(k, _)| *k == key) {
                Some((_, items)) => items.push(item.clone()),
                None => buckets.push((key, vec![item.clone()])),
            }
        }
        buckets
    }

    fn regrouped(&mut self, label: Option<String>) {
        tracing::debug!(target: targets::TOOLBAR, grouping = ?label, "grouping changed");
        self.navigator.state_mut().set_start_index(0);
        self.navigator.slice();
        self.signals.grouping_changed.emit(label);
        self.navigation_changed();
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Opens the column picker. Returns true if the shown columns changed.
    pub fn update_additional(&mut self, picker: &dyn ColumnPicker) -> Result<bool> {
        let request = ColumnPickerRequest {
            shown: self.view.shown_columns().to_vec(),
            optional: self.view.optional_columns().to_vec(),
            defaults: self.view.default_columns().to_vec(),
        };
        let Some(columns) = picker
            .pick(request)
            .map_err(|e| Error::dialog("column picker", e))?
        else {
            tracing::debug!(target: targets::TOOLBAR, "column picker cancelled");
            return Ok(false);
        };
        Ok(self.set_shown_columns(columns))
    }

    /// Replaces the shown columns and persists them.
    pub fn set_shown_columns(&mut self, columns: Vec<ColumnDescriptor>) -> bool {
        if !self.view.set_shown_columns(columns, self.store.as_ref()) {
            return false;
        }
        self.signals
            .shown_columns_changed
            .emit(self.view.shown_columns().to_vec());
        true
    }

    /// Replaces the additional list elements and persists them.
    pub fn set_list_elements(&mut self, columns: Vec<ColumnDescriptor>) -> bool {
        if !self.view.set_list_elements(columns, self.store.as_ref()) {
            return false;
        }
        self.signals
            .additional_list_elements_changed
            .emit(self.view.list_elements().to_vec());
        true
    }

    /// Restores the default columns and persists them.
    pub fn reset_view(&mut self) {
        let (shown_changed, list_changed) = self.view.reset(self.store.as_ref());
        if shown_changed {
            self.signals
                .shown_columns_changed
                .emit(self.view.shown_columns().to_vec());
        }
        if list_changed {
            self.signals
                .additional_list_elements_changed
                .emit(self.view.list_elements().to_vec());
        }
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn filters_changed(&mut self) {
        self.navigator.slice();
        self.navigation_changed();
    }

    /// Announces the navigation state once; in local mode also the page it
    /// was sliced into.
    fn navigation_changed(&mut self) {
        let state = self.navigator.state();
        tracing::debug!(
            target: targets::TOOLBAR,
            start = state.start_index(),
            size = state.page_size(),
            filters = state.filters().len(),
            "navigation state changed"
        );
        self.signals.navigation_state_changed.emit(state.clone());
        if self.navigator.is_local() {
            self.cancel_pending_slice();
            self.publish_page();
        }
    }

    /// Drops a deferred slice; the page is already current.
    fn cancel_pending_slice(&mut self) {
        if let Some(task) = self.pending_slice.take() {
            self.tasks.cancel(task);
        }
    }

    fn publish_page(&self) {
        self.signals
            .settings_changed
            .emit(self.navigator.page().clone());
    }
}
