//! Folding filter interactions into the navigation state.

use std::collections::HashSet;

use rowline_core::Signal;
use rowline_core::logging::targets;

use super::definition::{
    FilterDefinition, FilterMode, FilterOption, SelectedFilter, find_custom, find_selected,
    join_values, split_values,
};
use crate::model::NavigationState;

/// Owns the filter definitions and the list of selected filters.
///
/// Every mutating operation ends by mirroring each definition's current
/// value into the given [`NavigationState`]. Operations that changed the
/// active filter set also move the page cursor back to the first row and
/// return `true`; the caller announces the new navigation state.
///
/// # Signals
///
/// - `custom_filter_removed`: emitted with the removed entries whenever
///   collaborator-injected filters are dropped, instead of a resync
#[derive(Debug, Default)]
pub struct FilterComposer {
    definitions: Vec<FilterDefinition>,
    selected: Vec<SelectedFilter>,

    /// Emitted when custom selected filters are removed.
    pub custom_filter_removed: Signal<Vec<SelectedFilter>>,
}

impl FilterComposer {
    /// Creates a composer without filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a composer over the given definitions.
    pub fn with_definitions(definitions: impl IntoIterator<Item = FilterDefinition>) -> Self {
        let mut composer = Self::new();
        composer.set_definitions(definitions);
        composer
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All filter definitions.
    pub fn definitions(&self) -> &[FilterDefinition] {
        &self.definitions
    }

    /// Looks up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&FilterDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Definitions not listed in `hidden`.
    pub fn visible_definitions<'a>(
        &'a self,
        hidden: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a FilterDefinition> + 'a {
        self.definitions
            .iter()
            .filter(move |d| !hidden.contains(&d.name))
    }

    /// The selected filters in selection order.
    pub fn selected(&self) -> &[SelectedFilter] {
        &self.selected
    }

    /// Returns true if any filter has a current value or a custom filter
    /// is selected.
    pub fn filters_applied(&self) -> bool {
        self.definitions.iter().any(|d| d.current_value().is_some())
            || self.selected.iter().any(|s| s.is_custom)
    }

    /// The options a multi-select control should show as checked.
    ///
    /// Values of the current value that match no option are left out.
    pub fn multi_select_values(&self, name: &str) -> Vec<FilterOption> {
        let Some(definition) = self.definition(name) else {
            return Vec::new();
        };
        let values = match (&definition.delimiter, definition.current_value()) {
            (Some(delimiter), Some(value)) => split_values(value, delimiter),
            (None, Some(value)) => vec![value.to_string()],
            (_, None) => Vec::new(),
        };
        values
            .iter()
            .filter_map(|v| definition.option(v).cloned())
            .collect()
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Replaces the filter definitions.
    ///
    /// A definition whose name was already known keeps its current value
    /// unless the new one carries its own. Selected entries of filters that
    /// no longer exist are dropped; custom entries are kept.
    pub fn set_definitions(&mut self, definitions: impl IntoIterator<Item = FilterDefinition>) {
        let previous = std::mem::take(&mut self.definitions);
        self.definitions = definitions.into_iter().collect();

        for definition in &mut self.definitions {
            if definition.current_value().is_some() {
                continue;
            }
            if let Some(old) = previous.iter().find(|p| p.name == definition.name) {
                definition.set_current_value(old.current_value().map(str::to_string));
            }
        }

        let definitions = &self.definitions;
        self.selected
            .retain(|s| s.is_custom || definitions.iter().any(|d| d.name == s.filter_name));

        tracing::debug!(
            target: targets::FILTER,
            filters = self.definitions.len(),
            selected = self.selected.len(),
            "filter definitions replaced"
        );
    }

    /// Starts over with the definitions of a new logical dataset.
    ///
    /// Current values and regular entries are dropped; custom entries stay
    /// with their collaborator.
    pub fn reset(&mut self, definitions: impl IntoIterator<Item = FilterDefinition>) {
        self.definitions.clear();
        self.selected.retain(|s| s.is_custom);
        self.set_definitions(definitions);
    }

    /// Seeds the selected filters from each definition's initial value.
    ///
    /// Only definitions without a current value are seeded. The navigation
    /// state is synchronized once at the end, however many filters were
    /// seeded. Initial values that match no option are skipped.
    pub fn apply_initial_values(&mut self, nav: &mut NavigationState) -> bool {
        let mut seeded = false;
        for index in 0..self.definitions.len() {
            let definition = &self.definitions[index];
            if definition.current_value().is_some() {
                continue;
            }
            let Some(initial) = definition.initial_value.clone().filter(|v| !v.is_empty()) else {
                continue;
            };
            seeded |= self.seed(index, &initial);
        }
        self.finish(seeded, nav)
    }

    /// Takes over filter values already present in `nav`.
    ///
    /// Used when a host hands in a navigation state that carries filter
    /// values. Definitions that have a current value are left alone and
    /// `nav` is not touched.
    pub fn adopt_navigation(&mut self, nav: &NavigationState) {
        for index in 0..self.definitions.len() {
            let definition = &self.definitions[index];
            if definition.current_value().is_some() {
                continue;
            }
            if let Some(value) = nav.filter(&definition.name).map(str::to_string) {
                self.seed(index, &value);
            }
        }
    }

    /// Replaces the entries of one definition with the options named by a
    /// folded value.
    fn seed(&mut self, index: usize, value: &str) -> bool {
        let definition = &self.definitions[index];
        let values = match &definition.delimiter {
            Some(delimiter) => split_values(value, delimiter),
            None => vec![value.to_string()],
        };

        let mut options = Vec::new();
        for value in &values {
            match definition.option(value) {
                Some(option) => options.push(option.clone()),
                None => tracing::warn!(
                    target: targets::FILTER,
                    filter = %definition.name,
                    value = %value,
                    "filter value matches no option"
                ),
            }
        }
        if options.is_empty() {
            return false;
        }
        if definition.mode() == FilterMode::Exclusive {
            options.truncate(1);
        }

        let name = definition.name.clone();
        self.remove_entries(&name);
        self.selected
            .extend(options.into_iter().map(|o| SelectedFilter::new(name.as_str(), o)));
        self.rebuild_current(&name);
        true
    }

    // =========================================================================
    // Filter interactions
    // =========================================================================

    /// Checks or unchecks one option of a filter.
    ///
    /// For exclusive filters a newly set option replaces the prior entry in
    /// place. Unsetting matches the entry by filter name and option value
    /// for multi-valued filters, by filter name alone otherwise.
    pub fn apply_option(
        &mut self,
        name: &str,
        value: &str,
        is_set: bool,
        nav: &mut NavigationState,
    ) -> bool {
        let Some(definition) = self.definition(name) else {
            tracing::warn!(target: targets::FILTER, filter = name, "unknown filter");
            return false;
        };
        let mode = definition.mode();

        let entries_changed = if is_set {
            let Some(option) = definition.option(value).cloned() else {
                tracing::warn!(target: targets::FILTER, filter = name, value, "unknown filter option");
                return false;
            };
            match mode {
                FilterMode::Exclusive => self.select_exclusive(name, option),
                FilterMode::Checkbox | FilterMode::Delimited => {
                    if find_selected(&self.selected, name, Some(value)).is_some() {
                        false
                    } else {
                        self.selected.push(SelectedFilter::new(name, option));
                        true
                    }
                }
            }
        } else {
            let option_value = mode.is_multi_valued().then_some(value);
            match find_selected(&self.selected, name, option_value) {
                Some(index) => {
                    self.selected.remove(index);
                    true
                }
                None => false,
            }
        };

        let current_changed = self.rebuild_current(name);
        tracing::debug!(target: targets::FILTER, filter = name, value, is_set, ?mode, "filter option applied");
        self.finish(entries_changed || current_changed, nav)
    }

    /// Sets the value of an exclusive filter shown as a select list.
    ///
    /// `None`, or a value that matches no option, removes the filter's
    /// entry.
    pub fn apply_exclusive(
        &mut self,
        name: &str,
        value: Option<&str>,
        nav: &mut NavigationState,
    ) -> bool {
        let Some(definition) = self.definition(name) else {
            tracing::warn!(target: targets::FILTER, filter = name, "unknown filter");
            return false;
        };
        let option = value.and_then(|v| {
            let option = definition.option(v).cloned();
            if option.is_none() {
                tracing::warn!(target: targets::FILTER, filter = name, value = v, "unknown filter option");
            }
            option
        });

        let entries_changed = match option {
            Some(option) => self.select_exclusive(name, option),
            None => self.remove_entries(name),
        };
        let current_changed = self.rebuild_current(name);
        self.finish(entries_changed || current_changed, nav)
    }

    /// Replaces every selected entry of a filter with one per value.
    ///
    /// Values that match no option are omitted; duplicates collapse.
    pub fn apply_multi_selection<I, S>(
        &mut self,
        name: &str,
        values: I,
        nav: &mut NavigationState,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(definition) = self.definition(name) else {
            tracing::warn!(target: targets::FILTER, filter = name, "unknown filter");
            return false;
        };

        let mut replacement: Vec<SelectedFilter> = Vec::new();
        for value in values {
            let value = value.as_ref();
            match definition.option(value) {
                Some(option) if !replacement.iter().any(|s| s.option.value == value) => {
                    replacement.push(SelectedFilter::new(name, option.clone()));
                }
                Some(_) => {}
                None => tracing::warn!(
                    target: targets::FILTER,
                    filter = name,
                    value,
                    "multi-selected value matches no option"
                ),
            }
        }

        let before: Vec<&SelectedFilter> = self.entries_for(name).collect();
        let entries_changed = before.len() != replacement.len()
            || before.iter().zip(&replacement).any(|(a, b)| *a != b);

        self.remove_entries(name);
        self.selected.extend(replacement);
        let current_changed = self.rebuild_current(name);
        self.finish(entries_changed || current_changed, nav)
    }

    /// Removes one selected entry.
    ///
    /// `option_value` narrows the match for multi-valued filters. Regular
    /// entries are removed first: the current value is rebuilt, mirrored
    /// into `nav`, the page cursor reset and `true` returned. Otherwise a
    /// matching custom entry is removed and announced through
    /// `custom_filter_removed`, leaving `nav` alone.
    pub fn remove_selected_filter(
        &mut self,
        name: &str,
        option_value: Option<&str>,
        nav: &mut NavigationState,
    ) -> bool {
        if let Some(index) = find_selected(&self.selected, name, option_value) {
            self.selected.remove(index);
            self.rebuild_current(name);
            return self.finish(true, nav);
        }

        if let Some(index) = find_custom(&self.selected, name, option_value) {
            let removed = self.selected.remove(index);
            tracing::debug!(target: targets::FILTER, filter = name, "custom filter removed");
            self.custom_filter_removed.emit(vec![removed]);
        }
        false
    }

    /// Adds an entry owned by an outside collaborator.
    pub fn add_custom_filter(&mut self, filter_name: impl Into<String>, option: FilterOption) {
        self.selected.push(SelectedFilter::custom(filter_name, option));
    }

    /// Resets every filter and empties the selected list.
    ///
    /// Removed custom entries are announced through `custom_filter_removed`.
    /// Calling this twice leaves the same navigation state as calling it
    /// once.
    pub fn clear_all(&mut self, nav: &mut NavigationState) {
        for definition in &mut self.definitions {
            definition.set_current_value(None);
        }
        let custom: Vec<SelectedFilter> = self.selected.drain(..).filter(|s| s.is_custom).collect();

        self.mirror_into(nav);
        nav.set_start_index(0);
        tracing::debug!(target: targets::FILTER, custom = custom.len(), "filters cleared");

        if !custom.is_empty() {
            self.custom_filter_removed.emit(custom);
        }
    }

    /// Writes every definition's current value into `nav`.
    pub fn mirror_into(&self, nav: &mut NavigationState) {
        for definition in &self.definitions {
            nav.set_filter(&definition.name, definition.current_value());
        }
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn entries_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SelectedFilter> + 'a {
        self.selected
            .iter()
            .filter(move |s| !s.is_custom && s.filter_name == name)
    }

    fn select_exclusive(&mut self, name: &str, option: FilterOption) -> bool {
        let entry = SelectedFilter::new(name, option);
        match find_selected(&self.selected, name, None) {
            Some(index) if self.selected[index] == entry => false,
            Some(index) => {
                self.selected[index] = entry;
                true
            }
            None => {
                self.selected.push(entry);
                true
            }
        }
    }

    fn remove_entries(&mut self, name: &str) -> bool {
        let before = self.selected.len();
        self.selected
            .retain(|s| s.is_custom || s.filter_name != name);
        self.selected.len() != before
    }

    /// Recomputes a definition's current value from its selected entries.
    ///
    /// Delimited filters join every entry in selection order. Other filters
    /// take the last remaining entry.
    fn rebuild_current(&mut self, name: &str) -> bool {
        let Some(index) = self.definitions.iter().position(|d| d.name == name) else {
            return false;
        };
        let definition = &self.definitions[index];
        let value = match &definition.delimiter {
            Some(delimiter) => join_values(
                self.entries_for(name).map(|s| s.option.value.as_str()),
                delimiter,
            ),
            None => self.entries_for(name).last().map(|s| s.option.value.clone()),
        };
        let changed = definition.current_value() != value.as_deref();
        self.definitions[index].set_current_value(value);
        changed
    }

    fn finish(&self, changed: bool, nav: &mut NavigationState) -> bool {
        self.mirror_into(nav);
        if changed {
            nav.set_start_index(0);
        }
        changed
    }
}
