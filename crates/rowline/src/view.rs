//! View configuration resolver.
//!
//! [`ViewResolver`] merges a [`DataModel`] (column catalog, optional
//! columns, a default configuration) with the user's stored column choices
//! into the columns that are actually shown.
//!
//! Shown columns are seeded once per dataset kind. After that only an
//! explicit column choice replaces them, so a schema swap for the same kind
//! of data never reorders or drops what the user picked.

use std::sync::Arc;

use rowline_core::logging::{span_names, targets};

use crate::model::{ColumnDescriptor, DataModel, EntitySchema, ViewConfig};
use crate::store::{PreferenceStore, columns_key, list_elements_key};

/// Outcome of [`ViewResolver::resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The schema extended with the data model's columns. Identical (same
    /// `Arc`) to the input if nothing had to be added.
    pub schema: Arc<EntitySchema>,
    /// Whether the shown columns changed.
    pub shown_changed: bool,
    /// Whether the additional list elements changed.
    pub list_changed: bool,
}

/// Resolves shown columns and list elements for a dataset.
#[derive(Debug, Default)]
pub struct ViewResolver {
    dataset_kind: Option<String>,
    config: Option<ViewConfig>,
    optional: Vec<ColumnDescriptor>,
    default_shown: Vec<ColumnDescriptor>,
    default_list: Vec<ColumnDescriptor>,
    shown: Vec<ColumnDescriptor>,
    list_elements: Vec<ColumnDescriptor>,
}

impl ViewResolver {
    /// Creates a resolver with nothing resolved yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the view for a (new) schema.
    ///
    /// `displayed` are the base columns the host shows by default. Stored
    /// preferences are read from `store` the first time a dataset kind is
    /// seen. Identifiers that match nothing are dropped with a warning.
    pub fn resolve(
        &mut self,
        schema: &Arc<EntitySchema>,
        displayed: &[ColumnDescriptor],
        model: Option<&DataModel>,
        store: &dyn PreferenceStore,
    ) -> Resolution {
        let _span = tracing::debug_span!(span_names::VIEW_RESOLVE, dataset = schema.display()).entered();

        self.config = model.and_then(DataModel::default_configuration).cloned();
        let extended = match model {
            Some(model) => self.extend_schema(schema, model),
            None => schema.clone(),
        };

        self.optional = match model {
            Some(model) => self.compute_optional(&extended, model),
            None => Vec::new(),
        };

        let table_columns = self
            .config
            .as_ref()
            .map(|c| c.additional_table_columns.as_slice())
            .unwrap_or_default();
        self.default_shown = dedup(
            displayed
                .iter()
                .cloned()
                .chain(table_columns.iter().filter_map(|name| {
                    lookup(name, &extended, displayed, model)
                })),
        );

        let list_columns = self
            .config
            .as_ref()
            .map(|c| c.additional_list_columns.as_slice())
            .unwrap_or_default();
        self.default_list = dedup(
            list_columns
                .iter()
                .filter_map(|name| lookup(name, &extended, displayed, model)),
        );

        let kind = extended.display().to_string();
        let first_seen = self.dataset_kind.as_deref() != Some(kind.as_str());
        let mut shown_changed = false;
        let mut list_changed = false;

        if first_seen {
            let stored = store.get(&columns_key(&kind));
            let shown = if stored.is_empty() {
                self.default_shown.clone()
            } else {
                self.from_identifiers(&stored, &extended, displayed, model)
            };
            shown_changed = shown != self.shown;
            self.shown = shown;

            let stored = store.get(&list_elements_key(&kind));
            let list = if stored.is_empty() {
                self.default_list.clone()
            } else {
                self.from_identifiers(&stored, &extended, displayed, model)
            };
            list_changed = list != self.list_elements;
            self.list_elements = list;

            self.dataset_kind = Some(kind);
        }

        tracing::debug!(
            target: targets::VIEW,
            schema_version = extended.version(),
            optional = self.optional.len(),
            shown = self.shown.len(),
            list_elements = self.list_elements.len(),
            seeded = first_seen,
            "view resolved"
        );

        Resolution {
            schema: extended,
            shown_changed,
            list_changed,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The active view configuration.
    pub fn config(&self) -> Option<&ViewConfig> {
        self.config.as_ref()
    }

    /// Columns the user may add, minus those the configuration already
    /// includes.
    pub fn optional_columns(&self) -> &[ColumnDescriptor] {
        &self.optional
    }

    /// The shown table columns in display order.
    pub fn shown_columns(&self) -> &[ColumnDescriptor] {
        &self.shown
    }

    /// Columns rendered as extra lines in compact layouts.
    pub fn list_elements(&self) -> &[ColumnDescriptor] {
        &self.list_elements
    }

    /// The shown columns before any user choice.
    pub fn default_columns(&self) -> &[ColumnDescriptor] {
        &self.default_shown
    }

    /// Returns true if a configuration is active and there is at least one
    /// optional column to offer.
    pub fn has_view_settings(&self) -> bool {
        self.config.is_some() && !self.optional.is_empty()
    }

    // =========================================================================
    // Column choices
    // =========================================================================

    /// Replaces the shown columns and persists the choice.
    ///
    /// Returns true if the columns changed.
    pub fn set_shown_columns(
        &mut self,
        columns: Vec<ColumnDescriptor>,
        store: &dyn PreferenceStore,
    ) -> bool {
        let columns = dedup(columns);
        if columns == self.shown {
            return false;
        }
        self.shown = columns;
        self.save(store);
        true
    }

    /// Replaces the additional list elements and persists the choice.
    pub fn set_list_elements(
        &mut self,
        columns: Vec<ColumnDescriptor>,
        store: &dyn PreferenceStore,
    ) -> bool {
        let columns = dedup(columns);
        if columns == self.list_elements {
            return false;
        }
        self.list_elements = columns;
        if let Some(kind) = &self.dataset_kind {
            store.set(&list_elements_key(kind), names(&self.list_elements));
        }
        true
    }

    /// Writes the shown column identifiers to the store.
    pub fn save(&self, store: &dyn PreferenceStore) {
        if let Some(kind) = &self.dataset_kind {
            store.set(&columns_key(kind), names(&self.shown));
        }
    }

    /// Restores the default columns.
    ///
    /// Persists the default column identifiers and an empty list of list
    /// elements. Returns `(shown_changed, list_changed)`.
    pub fn reset(&mut self, store: &dyn PreferenceStore) -> (bool, bool) {
        let shown_changed = self.shown != self.default_shown;
        let list_changed = self.list_elements != self.default_list;
        self.shown = self.default_shown.clone();
        self.list_elements = self.default_list.clone();

        if let Some(kind) = &self.dataset_kind {
            store.set(&list_elements_key(kind), Vec::new());
            store.set(&columns_key(kind), names(&self.shown));
        }
        tracing::debug!(target: targets::VIEW, "view reset to defaults");
        (shown_changed, list_changed)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Adds every data model column the schema lacks, as a new schema.
    fn extend_schema(&self, schema: &Arc<EntitySchema>, model: &DataModel) -> Arc<EntitySchema> {
        let mut wanted: Vec<&str> = model
            .properties
            .iter()
            .filter(|p| p.is_additional_column)
            .map(|p| p.property.name.as_str())
            .collect();
        if let Some(config) = &self.config {
            wanted.extend(config.additional_table_columns.iter().map(String::as_str));
            wanted.extend(config.additional_list_columns.iter().map(String::as_str));
        }

        let extra: Vec<ColumnDescriptor> = wanted
            .into_iter()
            .filter(|name| !schema.contains(name))
            .filter_map(|name| match model.property(name) {
                Some(property) => Some(property.clone()),
                None => {
                    tracing::warn!(target: targets::VIEW, column = name, "configured column missing from data model");
                    None
                }
            })
            .map(|c| c.additional())
            .collect();

        let extended = schema.extended(extra);
        if extended.version() == schema.version() {
            schema.clone()
        } else {
            Arc::new(extended)
        }
    }

    fn compute_optional(&self, schema: &EntitySchema, model: &DataModel) -> Vec<ColumnDescriptor> {
        let included: &[String] = self
            .config
            .as_ref()
            .map(|c| c.additional_table_columns.as_slice())
            .unwrap_or_default();
        dedup(
            model
                .additional_column_names()
                .iter()
                .filter(|name| !included.iter().any(|i| i.eq_ignore_ascii_case(name)))
                .filter_map(|name| {
                    schema
                        .column(name)
                        .or_else(|| model.property(name))
                        .cloned()
                }),
        )
    }

    fn from_identifiers(
        &self,
        identifiers: &[String],
        schema: &EntitySchema,
        displayed: &[ColumnDescriptor],
        model: Option<&DataModel>,
    ) -> Vec<ColumnDescriptor> {
        dedup(identifiers.iter().filter_map(|name| {
            let column = lookup(name, schema, displayed, model);
            if column.is_none() {
                tracing::warn!(target: targets::VIEW, column = %name, "stored column no longer exists, dropping");
            }
            column
        }))
    }
}

/// Finds a descriptor by identifier: the schema first, then the base
/// displayed columns, then the data model.
fn lookup(
    name: &str,
    schema: &EntitySchema,
    displayed: &[ColumnDescriptor],
    model: Option<&DataModel>,
) -> Option<ColumnDescriptor> {
    schema
        .column(name)
        .or_else(|| displayed.iter().find(|c| c.name == name))
        .or_else(|| model.and_then(|m| m.property(name)))
        .cloned()
}

fn dedup(columns: impl IntoIterator<Item = ColumnDescriptor>) -> Vec<ColumnDescriptor> {
    let mut out: Vec<ColumnDescriptor> = Vec::new();
    for column in columns {
        if !out.iter().any(|c| c.name == column.name) {
            out.push(column);
        }
    }
    out
}

fn names(columns: &[ColumnDescriptor]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}
