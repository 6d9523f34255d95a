//! The paging/search/sort/filter cursor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort by one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort by `column`.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort by `column`.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// What page of data is requested (remote) or sliced (local).
///
/// Filter values are folded in as a name → value map. An entry exists only
/// for filters whose current value is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNavigationState")]
pub struct NavigationState {
    start_index: usize,
    page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tree_filters: Vec<String>,
    #[serde(flatten)]
    filters: BTreeMap<String, String>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            start_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort: None,
            tree_filters: Vec::new(),
            filters: BTreeMap::new(),
        }
    }
}

/// Wire shape of [`NavigationState`], checked before it is accepted.
#[derive(Deserialize)]
struct RawNavigationState {
    start_index: usize,
    page_size: usize,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sort: Option<SortSpec>,
    #[serde(default)]
    tree_filters: Vec<String>,
    #[serde(flatten)]
    filters: BTreeMap<String, String>,
}

impl TryFrom<RawNavigationState> for NavigationState {
    type Error = Error;

    fn try_from(raw: RawNavigationState) -> Result<Self> {
        let mut state = Self::with_page_size(raw.page_size)?;
        state.start_index = raw.start_index;
        state.set_search(raw.search);
        state.sort = raw.sort;
        state.tree_filters = raw.tree_filters;
        state.filters = raw
            .filters
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Ok(state)
    }
}

impl NavigationState {
    /// Creates a state at the first page with the given page size.
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        let mut state = Self::default();
        state.set_page_size(page_size)?;
        Ok(state)
    }

    /// Index of the first row of the page.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Number of rows per page; always greater than zero.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves the page cursor.
    pub fn set_start_index(&mut self, start_index: usize) {
        self.start_index = start_index;
    }

    /// Changes the page size.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        self.page_size = page_size;
        Ok(())
    }

    /// The search term, if one is applied.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Sets the search term; an empty string clears it.
    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search.filter(|s| !s.is_empty());
    }

    /// Returns true if a non-empty search term is applied.
    pub fn search_applied(&self) -> bool {
        self.search.is_some()
    }

    /// The sort, if any.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Sets or clears the sort.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Filter expressions chosen in the hierarchical filter tree.
    pub fn tree_filters(&self) -> &[String] {
        &self.tree_filters
    }

    /// Replaces the filter tree expressions.
    pub fn set_tree_filters(&mut self, filters: Vec<String>) {
        self.tree_filters = filters;
    }

    /// The folded value of filter `name`.
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// All folded filter values.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Sets or removes the folded value of filter `name`.
    ///
    /// `None` and empty strings remove the entry.
    pub fn set_filter(&mut self, name: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.filters.insert(name.to_string(), v.to_string());
            }
            None => {
                self.filters.remove(name);
            }
        }
    }

    /// Removes every folded filter value.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Row range of the current page within `total` rows.
    pub fn window(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.start_index.min(total);
        let end = self.start_index.saturating_add(self.page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            NavigationState::with_page_size(0),
            Err(Error::InvalidPageSize)
        ));
        let mut state = NavigationState::default();
        assert!(state.set_page_size(0).is_err());
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_deserialize_rejects_zero_page_size() {
        let json = r#"{"start_index":0,"page_size":0}"#;
        let err = serde_json::from_str::<NavigationState>(json).unwrap_err();
        assert!(err.to_string().contains("Page size must be greater than zero"));
    }

    #[test]
    fn test_deserialize_restores_state() {
        let json = r#"{"start_index":20,"page_size":10,"search":"","status":"active","tags":""}"#;
        let state: NavigationState = serde_json::from_str(json).unwrap();

        assert_eq!(state.start_index(), 20);
        assert_eq!(state.page_size(), 10);
        assert!(!state.search_applied());
        assert_eq!(state.filter("status"), Some("active"));
        assert_eq!(state.filter("tags"), None);
    }

    #[test]
    fn test_empty_filter_value_removes_entry() {
        let mut state = NavigationState::default();
        state.set_filter("status", Some("active"));
        assert_eq!(state.filter("status"), Some("active"));

        state.set_filter("status", Some(""));
        assert_eq!(state.filter("status"), None);
        assert!(state.filters().is_empty());
    }

    #[test]
    fn test_window_is_clamped() {
        let mut state = NavigationState::with_page_size(10).unwrap();
        state.set_start_index(20);
        assert_eq!(state.window(25), 20..25);

        state.set_start_index(30);
        assert_eq!(state.window(25), 25..25);
    }

    #[test]
    fn test_filters_flatten_into_json() {
        let mut state = NavigationState::with_page_size(10).unwrap();
        state.set_search(Some("bob".into()));
        state.set_filter("status", Some("active"));
        state.set_tree_filters(vec!["dept = 'sales'".into()]);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["search"], "bob");
        assert_eq!(json["page_size"], 10);

        let back: NavigationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
