//! Data model shared by the toolbar components.
//!
//! - [`Entity`] / [`DataPage`] - row items and pages of them
//! - [`EntitySchema`] / [`ColumnDescriptor`] - the column catalog
//! - [`DataModel`] / [`ViewConfig`] - declarative view-model description
//! - [`NavigationState`] - the paging/search/sort/filter cursor

mod entity;
mod navigation_state;
mod schema;

pub use entity::{DataPage, Entity};
pub use navigation_state::{DEFAULT_PAGE_SIZE, NavigationState, SortDirection, SortSpec};
pub use schema::{ColumnDescriptor, DataModel, DataModelProperty, EntitySchema, ViewConfig};
