//! Interfaces of the collaborators the toolbar calls out to.
//!
//! All of them are synchronous from the toolbar's point of view. A dialog
//! answers `Ok(None)` when the user dismissed it; failures are returned as
//! [`CollaboratorError`] and leave the toolbar untouched.
//!
//! Closures with the matching signature implement the traits, which keeps
//! tests and small hosts short:
//!
//! ```ignore
//! let source = |state: &NavigationState| -> Result<DataPage<Person>, CollaboratorError> {
//!     backend.query(state)
//! };
//! toolbar.sync_remote(&source)?;
//! ```

use crate::error::CollaboratorError;
use crate::model::{ColumnDescriptor, DataPage, Entity, NavigationState};
use crate::toolbar::{FilterTree, FilterTreeElement};

/// A backend returning one page per navigation state.
pub trait PageSource<E: Entity> {
    /// Fetches the page described by `state`.
    fn fetch(&self, state: &NavigationState) -> Result<DataPage<E>, CollaboratorError>;
}

impl<E, F> PageSource<E> for F
where
    E: Entity,
    F: Fn(&NavigationState) -> Result<DataPage<E>, CollaboratorError>,
{
    fn fetch(&self, state: &NavigationState) -> Result<DataPage<E>, CollaboratorError> {
        self(state)
    }
}

/// What the column picker is opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPickerRequest {
    /// Columns shown right now, in order.
    pub shown: Vec<ColumnDescriptor>,
    /// Columns that may be added.
    pub optional: Vec<ColumnDescriptor>,
    /// The shown columns before any user choice.
    pub defaults: Vec<ColumnDescriptor>,
}

/// Dialog for choosing the shown columns.
pub trait ColumnPicker {
    /// Returns the new shown columns, or `None` if cancelled.
    fn pick(
        &self,
        request: ColumnPickerRequest,
    ) -> Result<Option<Vec<ColumnDescriptor>>, CollaboratorError>;
}

impl<F> ColumnPicker for F
where
    F: Fn(ColumnPickerRequest) -> Result<Option<Vec<ColumnDescriptor>>, CollaboratorError>,
{
    fn pick(
        &self,
        request: ColumnPickerRequest,
    ) -> Result<Option<Vec<ColumnDescriptor>>, CollaboratorError> {
        self(request)
    }
}

/// What the filter tree picker is opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTreeRequest {
    /// The tree to choose from.
    pub tree: FilterTree,
    /// Elements chosen so far.
    pub selected: Vec<FilterTreeElement>,
}

/// Dialog for choosing elements of a hierarchical filter.
pub trait FilterTreePicker {
    /// Returns the chosen elements, or `None` if cancelled.
    fn pick(
        &self,
        request: FilterTreeRequest,
    ) -> Result<Option<Vec<FilterTreeElement>>, CollaboratorError>;
}

impl<F> FilterTreePicker for F
where
    F: Fn(FilterTreeRequest) -> Result<Option<Vec<FilterTreeElement>>, CollaboratorError>,
{
    fn pick(
        &self,
        request: FilterTreeRequest,
    ) -> Result<Option<Vec<FilterTreeElement>>, CollaboratorError> {
        self(request)
    }
}
