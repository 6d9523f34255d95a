//! Filter definitions and selected filter values.

use serde::{Deserialize, Serialize};

/// One selectable value of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// The value folded into the navigation state.
    pub value: String,
    /// Display label.
    pub display: String,
}

impl FilterOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: display.into(),
        }
    }
}

/// How selecting an option of a filter composes with earlier selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Radio/select: at most one selected option, replaced in place.
    Exclusive,
    /// Independent checkboxes, one selected entry per checked option.
    Checkbox,
    /// Several options folded into one delimiter-joined value.
    Delimited,
}

impl FilterMode {
    /// Returns true if several options may be selected at once.
    pub fn is_multi_valued(self) -> bool {
        !matches!(self, Self::Exclusive)
    }
}

/// A filter offered by the toolbar.
///
/// A filter with a delimiter accepts several simultaneously selected
/// values. Its current value is always the delimiter-joined list of the
/// selected option values, so option values must not contain the
/// delimiter themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Key of the filter, unique within a filter set.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub display: String,
    /// Selectable options.
    #[serde(default)]
    pub options: Vec<FilterOption>,
    /// Separator for multi-valued filters.
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Value applied once when a dataset is first shown.
    #[serde(default)]
    pub initial_value: Option<String>,
    /// Shown as independent checkboxes instead of a single choice.
    #[serde(default)]
    pub checkbox: bool,
    /// Derived from the selected entries, never read from input.
    #[serde(skip)]
    current_value: Option<String>,
}

impl FilterDefinition {
    /// Creates a single-valued filter.
    pub fn new(name: impl Into<String>, options: impl IntoIterator<Item = FilterOption>) -> Self {
        let name = name.into();
        Self {
            display: name.clone(),
            name,
            options: options.into_iter().collect(),
            delimiter: None,
            initial_value: None,
            checkbox: false,
            current_value: None,
        }
    }

    /// Shows the options as independent checkboxes.
    pub fn as_checkbox(mut self) -> Self {
        self.checkbox = true;
        self
    }

    /// Sets the display label.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// Makes the filter multi-valued with the given separator.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Sets the value applied when the dataset is first shown.
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// The currently applied (folded) value.
    pub fn current_value(&self) -> Option<&str> {
        self.current_value.as_deref()
    }

    pub(crate) fn set_current_value(&mut self, value: Option<String>) {
        self.current_value = value.filter(|v| !v.is_empty());
    }

    /// Returns true if the filter has a delimiter.
    pub fn is_delimited(&self) -> bool {
        self.delimiter.is_some()
    }

    /// The composition mode. A delimiter wins over the checkbox flag.
    pub fn mode(&self) -> FilterMode {
        if self.delimiter.is_some() {
            FilterMode::Delimited
        } else if self.checkbox {
            FilterMode::Checkbox
        } else {
            FilterMode::Exclusive
        }
    }

    /// Finds the option with the given value.
    pub fn option(&self, value: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Returns true if the filter has more options than `threshold` and
    /// should be offered as a select list rather than inline choices.
    pub fn uses_select_list(&self, threshold: usize) -> bool {
        self.options.len() > threshold
    }

    /// The constituent values of a delimited current value.
    ///
    /// Empty for filters without delimiter or without a current value.
    pub fn split_current_value(&self) -> Vec<String> {
        match (&self.delimiter, &self.current_value) {
            (Some(delimiter), Some(value)) => split_values(value, delimiter),
            _ => Vec::new(),
        }
    }
}

/// Splits a folded value into its constituents.
pub fn split_values(value: &str, delimiter: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(delimiter).map(str::to_string).collect()
}

/// Folds values into one delimiter-joined string; `None` if there are none.
pub fn join_values<'a, I>(values: I, delimiter: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = values.into_iter().collect::<Vec<_>>().join(delimiter);
    (!joined.is_empty()).then_some(joined)
}

/// A chosen option of a filter.
///
/// Several entries may refer to the same filter when it is multi-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFilter {
    /// Name of the filter definition this entry belongs to.
    pub filter_name: String,
    /// The chosen option.
    pub option: FilterOption,
    /// Whether the entry was injected by a collaborator rather than chosen
    /// through the filter's options.
    #[serde(default)]
    pub is_custom: bool,
}

impl SelectedFilter {
    /// Creates an entry for a regular option.
    pub fn new(filter_name: impl Into<String>, option: FilterOption) -> Self {
        Self {
            filter_name: filter_name.into(),
            option,
            is_custom: false,
        }
    }

    /// Creates an entry injected by a collaborator.
    pub fn custom(filter_name: impl Into<String>, option: FilterOption) -> Self {
        Self {
            is_custom: true,
            ..Self::new(filter_name, option)
        }
    }

    fn matches(&self, filter_name: &str, option_value: Option<&str>) -> bool {
        self.filter_name == filter_name && option_value.is_none_or(|v| self.option.value == v)
    }
}

/// Index of the first regular entry of `filter_name`, narrowed by
/// `option_value`. Custom entries never match.
pub(crate) fn find_selected(
    selected: &[SelectedFilter],
    filter_name: &str,
    option_value: Option<&str>,
) -> Option<usize> {
    selected
        .iter()
        .position(|s| !s.is_custom && s.matches(filter_name, option_value))
}

/// Index of the first custom entry of `filter_name`.
pub(crate) fn find_custom(
    selected: &[SelectedFilter],
    filter_name: &str,
    option_value: Option<&str>,
) -> Option<usize> {
    selected
        .iter()
        .position(|s| s.is_custom && s.matches(filter_name, option_value))
}
