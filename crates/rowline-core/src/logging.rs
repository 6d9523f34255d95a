//! Logging facilities for Rowline.
//!
//! Rowline uses the `tracing` crate for instrumentation. The libraries never
//! install a subscriber; to see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("rowline=debug")
//!     .init();
//! ```

/// Span names used throughout Rowline for tracing.
pub mod span_names {
    /// Dataset (schema identity) change handling.
    pub const DATASET_CHANGE: &str = "rowline::dataset_change";
    /// Local re-slicing of a snapshot.
    pub const LOCAL_SLICE: &str = "rowline::local_slice";
    /// Column resolution against stored preferences.
    pub const VIEW_RESOLVE: &str = "rowline::view_resolve";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "rowline_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rowline_core::signal";
    /// Deferred task queue target.
    pub const TASK: &str = "rowline_core::task";
    /// Debouncer target.
    pub const DEBOUNCE: &str = "rowline_core::debounce";
    /// Selection model target.
    pub const SELECTION: &str = "rowline::selection";
    /// Filter composer target.
    pub const FILTER: &str = "rowline::filter";
    /// Navigation state synchronizer target.
    pub const NAVIGATION: &str = "rowline::navigation";
    /// View configuration resolver target.
    pub const VIEW: &str = "rowline::view";
    /// Toolbar controller target.
    pub const TOOLBAR: &str = "rowline::toolbar";
    /// Preference store target.
    pub const STORE: &str = "rowline::store";
}
