//! Tests for preference persistence across toolbar sessions.

use std::sync::Arc;

use rowline::prelude::*;
use rowline::store::{columns_key, list_elements_key};

#[derive(Debug, Clone, PartialEq)]
struct Ticket(u64);

impl Entity for Ticket {
    type Id = u64;

    fn id(&self) -> u64 {
        self.0
    }
}

fn settings() -> ToolbarSettings<Ticket> {
    let schema = Arc::new(EntitySchema::new(
        "Ticket",
        [
            ColumnDescriptor::new("title", "Title"),
            ColumnDescriptor::new("state", "State"),
            ColumnDescriptor::new("assignee", "Assignee").additional(),
        ],
    ));
    ToolbarSettings::new(schema, DataPage::empty(), NavigationState::default())
}

#[test]
fn test_choices_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let store = Arc::new(MemoryStore::new());
    store.set_auto_save(&path);
    let mut toolbar = Toolbar::<Ticket>::new(ToolbarConfig::default(), store);
    toolbar.apply_settings(settings());
    assert!(toolbar.set_shown_columns(vec![
        ColumnDescriptor::new("title", "Title"),
        ColumnDescriptor::new("assignee", "Assignee").additional(),
    ]));
    assert!(toolbar.set_list_elements(vec![ColumnDescriptor::new("state", "State")]));

    let reloaded = Arc::new(MemoryStore::load_json(&path).unwrap());
    assert_eq!(
        reloaded.get(&columns_key("Ticket")),
        vec!["title".to_string(), "assignee".to_string()]
    );
    assert_eq!(reloaded.get(&list_elements_key("Ticket")), vec!["state".to_string()]);

    let mut restarted = Toolbar::<Ticket>::new(ToolbarConfig::default(), reloaded);
    restarted.apply_settings(settings());
    let shown: Vec<&str> = restarted.shown_columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(shown, vec!["title", "assignee"]);
    let list: Vec<&str> = restarted.list_elements().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(list, vec!["state"]);
}

#[test]
fn test_corrupt_preferences_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = MemoryStore::load_json(&path).unwrap_err();
    assert!(matches!(err, Error::StoreFormat { .. }));

    let err = MemoryStore::load_json(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::StoreIo { .. }));
}
