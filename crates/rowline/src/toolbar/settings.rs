//! Settings pushed into the toolbar by its host.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::FilterDefinition;
use crate::model::{ColumnDescriptor, DataModel, DataPage, Entity, EntitySchema, NavigationState};

/// One node of a hierarchical filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTreeElement {
    /// Identifier of the node.
    pub id: String,
    /// Display label.
    pub display: String,
    /// Filter expression applied when the node is chosen.
    pub filter: String,
}

impl FilterTreeElement {
    /// Creates a tree element.
    pub fn new(id: impl Into<String>, display: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            filter: filter.into(),
        }
    }
}

/// A hierarchical filter offered next to the regular filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterTree {
    /// Label of the filter tree button.
    #[serde(default)]
    pub description: String,
    /// Top-level elements.
    #[serde(default)]
    pub elements: Vec<FilterTreeElement>,
}

impl FilterTree {
    /// Returns true if the tree has anything to choose from.
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }
}

/// Buckets a row into a group by returning the group key.
pub type GroupFn<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// A way of grouping rows.
pub struct Group<E> {
    /// Display label.
    pub display: String,
    bucket: GroupFn<E>,
}

impl<E> Group<E> {
    /// Creates a group from a bucketing function.
    pub fn new<F>(display: impl Into<String>, bucket: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        Self {
            display: display.into(),
            bucket: Arc::new(bucket),
        }
    }

    /// The group key of `item`.
    pub fn key(&self, item: &E) -> String {
        (self.bucket)(item)
    }
}

impl<E> Clone for Group<E> {
    fn clone(&self) -> Self {
        Self {
            display: self.display.clone(),
            bucket: self.bucket.clone(),
        }
    }
}

impl<E> fmt::Debug for Group<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Groups organized under a common label.
pub struct GroupCategory<E> {
    pub display: String,
    pub groups: Vec<Group<E>>,
}

impl<E> Clone for GroupCategory<E> {
    fn clone(&self) -> Self {
        Self {
            display: self.display.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<E> fmt::Debug for GroupCategory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupCategory")
            .field("display", &self.display)
            .field("groups", &self.groups)
            .finish()
    }
}

/// The groupings a dataset offers.
pub struct GroupData<E> {
    /// Groups without category.
    pub groups: Vec<Group<E>>,
    /// Groups organized in categories.
    pub categories: Vec<GroupCategory<E>>,
}

impl<E> Default for GroupData<E> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl<E> Clone for GroupData<E> {
    fn clone(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            categories: self.categories.clone(),
        }
    }
}

impl<E> fmt::Debug for GroupData<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupData")
            .field("groups", &self.groups)
            .field("categories", &self.categories)
            .finish()
    }
}

impl<E> GroupData<E> {
    /// Returns true if no group is offered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.categories.iter().all(|c| c.groups.is_empty())
    }

    /// Finds a group by label, inside `category` if given.
    pub fn find(&self, group: &str, category: Option<&str>) -> Option<&Group<E>> {
        match category {
            Some(category) => self
                .categories
                .iter()
                .find(|c| c.display == category)?
                .groups
                .iter()
                .find(|g| g.display == group),
            None => self.groups.iter().find(|g| g.display == group),
        }
    }
}

/// The grouping currently applied.
pub struct Grouping<E> {
    /// Label shown for the grouping, `"<category> - <group>"` for groups
    /// inside a category.
    pub display: String,
    /// The applied group.
    pub group: Group<E>,
}

impl<E> Clone for Grouping<E> {
    fn clone(&self) -> Self {
        Self {
            display: self.display.clone(),
            group: self.group.clone(),
        }
    }
}

impl<E> fmt::Debug for Grouping<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Everything a host pushes into the toolbar when its data changes.
///
/// The toolbar compares `schema` by `Arc` identity with the previous push:
/// a different `Arc` starts a new logical dataset, the same `Arc` is a
/// refresh of the current one.
pub struct ToolbarSettings<E> {
    /// The rows: the whole dataset in local mode, one page in remote mode.
    pub data: DataPage<E>,
    /// Columns shown by default.
    pub displayed_columns: Vec<ColumnDescriptor>,
    /// Column catalog; its identity marks the logical dataset.
    pub schema: Arc<EntitySchema>,
    /// Paging, search, sort and filter cursor.
    pub navigation_state: NavigationState,
    pub filters: Option<Vec<FilterDefinition>>,
    pub filter_tree: Option<FilterTree>,
    pub group_data: Option<GroupData<E>>,
    pub data_model: Option<DataModel>,
}

impl<E: Entity> ToolbarSettings<E> {
    /// Creates settings without filters, grouping or data model.
    pub fn new(schema: Arc<EntitySchema>, data: DataPage<E>, navigation_state: NavigationState) -> Self {
        Self {
            data,
            displayed_columns: schema
                .columns()
                .iter()
                .filter(|c| !c.is_additional)
                .cloned()
                .collect(),
            schema,
            navigation_state,
            filters: None,
            filter_tree: None,
            group_data: None,
            data_model: None,
        }
    }

    /// Sets the columns shown by default.
    pub fn with_displayed_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.displayed_columns = columns;
        self
    }

    /// Sets the filter definitions.
    pub fn with_filters(mut self, filters: Vec<FilterDefinition>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the hierarchical filter.
    pub fn with_filter_tree(mut self, tree: FilterTree) -> Self {
        self.filter_tree = Some(tree);
        self
    }

    /// Sets the offered groupings.
    pub fn with_group_data(mut self, group_data: GroupData<E>) -> Self {
        self.group_data = Some(group_data);
        self
    }

    /// Sets the view-model description.
    pub fn with_data_model(mut self, model: DataModel) -> Self {
        self.data_model = Some(model);
        self
    }
}

impl<E> fmt::Debug for ToolbarSettings<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarSettings")
            .field("rows", &self.data.len())
            .field("total_count", &self.data.total_count)
            .field("schema", &self.schema.display())
            .field("navigation_state", &self.navigation_state)
            .finish_non_exhaustive()
    }
}
