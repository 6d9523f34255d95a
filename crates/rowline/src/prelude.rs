//! Prelude module for Rowline.
//!
//! ```ignore
//! use rowline::prelude::*;
//! ```
//!
//! Re-exports the controller, its inputs and the types most hosts touch.

// ============================================================================
// Controller
// ============================================================================

pub use crate::config::{ToolbarConfig, ToolbarOption};
pub use crate::toolbar::{
    FilterTree, FilterTreeElement, Group, GroupCategory, GroupData, Toolbar, ToolbarSettings,
};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::model::{
    ColumnDescriptor, DataModel, DataModelProperty, DataPage, Entity, EntitySchema,
    NavigationState, SortDirection, SortSpec, ViewConfig,
};

// ============================================================================
// Filters and Selection
// ============================================================================

pub use crate::filter::{FilterDefinition, FilterOption, SelectedFilter};
pub use crate::selection::{ItemStatus, SelectionChange};

// ============================================================================
// Collaborators
// ============================================================================

pub use crate::collaborators::{
    ColumnPicker, ColumnPickerRequest, FilterTreePicker, FilterTreeRequest, PageSource,
};
pub use crate::error::{CollaboratorError, Error};
pub use crate::store::{MemoryStore, PreferenceStore};

// ============================================================================
// Signal/Slot
// ============================================================================

pub use crate::{ConnectionId, Signal};
