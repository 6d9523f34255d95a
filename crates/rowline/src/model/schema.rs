//! Column descriptors, entity schemas and view-model descriptions.

use serde::{Deserialize, Serialize};

/// Describes one column of an entity schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Identifier, unique within a schema.
    pub name: String,
    /// Display label.
    pub display: String,
    /// Whether this is an optional column the user may add.
    #[serde(default)]
    pub is_additional: bool,
}

impl ColumnDescriptor {
    /// Creates a column descriptor.
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
            is_additional: false,
        }
    }

    /// Marks the column as an optional/additional one.
    pub fn additional(mut self) -> Self {
        self.is_additional = true;
        self
    }
}

/// The column catalog of one logical dataset.
///
/// A schema is immutable once built. Extending it produces a new value with
/// a bumped [`version`](Self::version); holders of the old value are not
/// affected. The toolbar compares schemas by `Arc` identity to detect a
/// change of logical dataset, so a page refresh must keep passing the same
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntitySchema {
    display: String,
    columns: Vec<ColumnDescriptor>,
    version: u32,
}

impl EntitySchema {
    /// Creates a schema. Later duplicates of a column identifier are dropped.
    pub fn new(display: impl Into<String>, columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        let mut schema = Self {
            display: display.into(),
            columns: Vec::new(),
            version: 0,
        };
        for column in columns {
            schema.push_unique(column);
        }
        schema
    }

    fn push_unique(&mut self, column: ColumnDescriptor) -> bool {
        if self.contains(&column.name) {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// The dataset kind this schema describes (used in preference keys).
    pub fn display(&self) -> &str {
        &self.display
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Looks up a column by identifier.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns true if the schema declares the column.
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Extension counter; 0 for a freshly built schema.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns a new schema with `extra` columns merged in.
    ///
    /// Columns already present keep their descriptor. The version is bumped
    /// only if at least one column was added.
    pub fn extended(&self, extra: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        let mut next = self.clone();
        let mut added = false;
        for column in extra {
            added |= next.push_unique(column);
        }
        if added {
            next.version += 1;
        }
        next
    }
}

/// A property offered by the view-model description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModelProperty {
    /// The column the property maps to.
    pub property: ColumnDescriptor,
    /// Whether the column is optional (not displayed by default).
    #[serde(default)]
    pub is_additional_column: bool,
}

/// A named view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Configuration identifier.
    pub id: String,
    /// Optional columns pre-included as table columns.
    #[serde(default)]
    pub additional_table_columns: Vec<String>,
    /// Columns rendered as extra lines in compact/list layouts.
    #[serde(default)]
    pub additional_list_columns: Vec<String>,
}

/// Declarative description of the columns a view can show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataModel {
    /// Full column catalog.
    #[serde(default)]
    pub properties: Vec<DataModelProperty>,
    /// Available view configurations.
    #[serde(default)]
    pub configurations: Vec<ViewConfig>,
    /// Identifier of the configuration to use.
    #[serde(default)]
    pub default_config_id: Option<String>,
}

impl DataModel {
    /// The configuration named by `default_config_id`, if any.
    pub fn default_configuration(&self) -> Option<&ViewConfig> {
        let id = self.default_config_id.as_deref()?;
        self.configurations.iter().find(|c| c.id == id)
    }

    /// Looks up a property by column identifier, ignoring case.
    pub fn property(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.properties
            .iter()
            .map(|p| &p.property)
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Identifiers of all optional columns, in catalog order.
    pub fn additional_column_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.is_additional_column)
            .map(|p| p.property.name.clone())
            .collect()
    }
}
