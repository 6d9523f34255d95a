//! Toolbar configuration.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::navigator::PagingMode;

/// Features a toolbar may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarOption {
    Search,
    Filter,
    GroupBy,
    Settings,
    SelectedViewGroup,
    FilterTree,
}

impl ToolbarOption {
    /// Every option.
    pub const ALL: [ToolbarOption; 6] = [
        Self::Search,
        Self::Filter,
        Self::GroupBy,
        Self::Settings,
        Self::SelectedViewGroup,
        Self::FilterTree,
    ];
}

/// Configuration of a toolbar.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Page and filter the data in memory instead of asking a backend.
    pub local: bool,
    /// Quiet window for search input, in milliseconds.
    pub search_debounce_ms: u64,
    /// Filters with more options than this are offered as a select list.
    pub filter_option_threshold: usize,
    /// Filters that are applied but never offered to the user.
    pub hidden_filters: HashSet<String>,
    /// Offered features.
    pub options: HashSet<ToolbarOption>,
    /// Search term applied with the first dataset.
    pub keywords: Option<String>,
    /// Show the toolbar even when there is nothing to show.
    pub always_visible: bool,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            local: false,
            search_debounce_ms: 300,
            filter_option_threshold: 5,
            hidden_filters: HashSet::new(),
            options: ToolbarOption::ALL.into_iter().collect(),
            keywords: None,
            always_visible: false,
        }
    }
}

impl ToolbarConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Local configuration with defaults otherwise.
    pub fn local() -> Self {
        Self {
            local: true,
            ..Self::default()
        }
    }

    /// Returns true if the toolbar offers `option`.
    pub fn has_option(&self, option: ToolbarOption) -> bool {
        self.options.contains(&option)
    }

    /// The paging mode implied by [`local`](Self::local).
    pub fn paging_mode(&self) -> PagingMode {
        if self.local {
            PagingMode::Local
        } else {
            PagingMode::Remote
        }
    }

    /// The search quiet window.
    pub fn search_quiet(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
