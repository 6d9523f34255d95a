//! Rowline - the control plane behind a paginated list view.
//!
//! Rowline keeps the state of a list toolbar consistent: which rows are
//! selected, which filters are applied, which columns are shown and which
//! slice of the data is on screen. Rendering is left to the host, which
//! listens to the [`Toolbar`](toolbar::Toolbar)'s signals.
//!
//! The pieces:
//!
//! - [`selection`] - the selected rows, kept across pages
//! - [`filter`] - filter definitions and their composition into the
//!   navigation state
//! - [`view`] - shown columns resolved against stored preferences
//! - [`navigator`] - local slicing or remote paging of the data
//! - [`toolbar`] - the controller tying them together
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rowline::prelude::*;
//!
//! let mut toolbar = Toolbar::<Person>::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()))
//!     .with_predicate(|person, state| state.filter("status").is_none_or(|s| person.status == s));
//!
//! toolbar.signals.settings_changed.connect(|page| println!("{} rows", page.len()));
//! toolbar.apply_settings(ToolbarSettings::new(schema, DataPage::complete(people), NavigationState::default()));
//! toolbar.process_deferred();
//! ```

pub use rowline_core::*;

pub mod collaborators;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod navigator;
pub mod prelude;
pub mod selection;
pub mod store;
pub mod toolbar;
pub mod view;

pub use error::{CollaboratorError, Error, Result};
