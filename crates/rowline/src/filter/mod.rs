//! Filter definitions and the filter composer.
//!
//! A filter is composed in one of three [`FilterMode`]s:
//!
//! - **Exclusive**: at most one selected option; a new choice replaces the
//!   previous entry in place
//! - **Checkbox**: one selected entry per checked option; the current value
//!   is that of the last remaining entry
//! - **Delimited**: every checked option is folded into one
//!   delimiter-joined value, rebuilt from the entries after each change
//!
//! The [`FilterComposer`] mirrors every definition's current value into the
//! [`NavigationState`](crate::model::NavigationState) as the last step of
//! each operation.

mod composer;
mod definition;

pub use composer::FilterComposer;
pub use definition::{
    FilterDefinition, FilterMode, FilterOption, SelectedFilter, join_values, split_values,
};
