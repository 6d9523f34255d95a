//! Tests for the toolbar controller driven end to end.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rowline::prelude::*;
use rowline::store::columns_key;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: u32,
    name: String,
    status: &'static str,
}

impl Entity for Person {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn people(n: u32) -> Vec<Person> {
    (0..n)
        .map(|id| Person {
            id,
            name: format!("person {id}"),
            status: if id % 2 == 0 { "active" } else { "inactive" },
        })
        .collect()
}

fn person_schema() -> Arc<EntitySchema> {
    Arc::new(EntitySchema::new(
        "Person",
        [
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
        ],
    ))
}

fn status_filter() -> FilterDefinition {
    FilterDefinition::new(
        "status",
        [
            FilterOption::new("active", "Active"),
            FilterOption::new("inactive", "Inactive"),
        ],
    )
}

fn tags_filter() -> FilterDefinition {
    FilterDefinition::new(
        "tags",
        [
            FilterOption::new("a", "A"),
            FilterOption::new("b", "B"),
            FilterOption::new("c", "C"),
        ],
    )
    .with_delimiter(",")
}

fn remote_toolbar() -> Toolbar<Person> {
    init_logging();
    let mut toolbar = Toolbar::new(ToolbarConfig::default(), Arc::new(MemoryStore::new()));
    toolbar.apply_settings(
        ToolbarSettings::new(person_schema(), DataPage::new(people(10), 100), NavigationState::default())
            .with_filters(vec![status_filter(), tags_filter()]),
    );
    toolbar
}

fn local_toolbar(n: u32) -> Toolbar<Person> {
    init_logging();
    let mut toolbar = Toolbar::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()));
    toolbar.apply_settings(ToolbarSettings::new(
        person_schema(),
        DataPage::complete(people(n)),
        NavigationState::with_page_size(10).unwrap(),
    ));
    toolbar.process_deferred();
    toolbar
}

#[test]
fn test_exclusive_filter_keeps_one_entry() {
    let mut toolbar = remote_toolbar();

    toolbar.apply_option("status", "active", true);
    toolbar.apply_option("status", "inactive", true);

    let entries: Vec<_> = toolbar
        .filters()
        .selected()
        .iter()
        .filter(|s| s.filter_name == "status")
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].option.value, "inactive");
    assert_eq!(toolbar.navigation_state().filter("status"), Some("inactive"));
}

#[test]
fn test_delimited_filter_folds_values() {
    let mut toolbar = remote_toolbar();

    toolbar.apply_option("tags", "a", true);
    toolbar.apply_option("tags", "b", true);
    assert_eq!(
        toolbar.filters().definition("tags").and_then(|d| d.current_value()),
        Some("a,b")
    );
    assert_eq!(toolbar.navigation_state().filter("tags"), Some("a,b"));

    toolbar.apply_option("tags", "a", false);
    assert_eq!(
        toolbar.filters().definition("tags").and_then(|d| d.current_value()),
        Some("b")
    );
    assert_eq!(toolbar.navigation_state().filter("tags"), Some("b"));
}

#[test]
fn test_selection_persists_off_page() {
    let mut toolbar = local_toolbar(25);

    toolbar.set_page(20, 10).unwrap();
    assert_eq!(toolbar.page().len(), 5);
    let ids: Vec<u32> = toolbar.page().data.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![20, 21, 22, 23, 24]);

    let item = toolbar.page().data[3].clone();
    toolbar.checked(&item);

    toolbar.set_page(0, 10).unwrap();
    assert_eq!(toolbar.page().len(), 10);
    assert!(toolbar.selection().is_selected(&item));
    assert_eq!(toolbar.selected_on_page(), 0);
    assert_eq!(toolbar.selection().selected_count(), 1);
}

#[test]
fn test_stored_columns_missing_from_schema() {
    init_logging();
    let mut data = HashMap::new();
    data.insert(
        columns_key("Person"),
        vec!["name".to_string(), "status".to_string()],
    );
    let store = Arc::new(MemoryStore::from_data(data));

    // Not in the schema and not displayed: omitted.
    let mut toolbar = Toolbar::<Person>::new(ToolbarConfig::default(), store.clone());
    toolbar.apply_settings(ToolbarSettings::new(person_schema(), DataPage::empty(), NavigationState::default()));
    let shown: Vec<&str> = toolbar.shown_columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(shown, vec!["name"]);

    // Not in the schema but among the displayed columns: falls back.
    let mut toolbar = Toolbar::<Person>::new(ToolbarConfig::default(), store);
    toolbar.apply_settings(
        ToolbarSettings::new(person_schema(), DataPage::empty(), NavigationState::default())
            .with_displayed_columns(vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("status", "Status"),
            ]),
    );
    let shown: Vec<&str> = toolbar.shown_columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(shown, vec!["name", "status"]);
}

#[test]
fn test_clear_filters_is_idempotent() {
    let mut toolbar = remote_toolbar();
    toolbar.apply_option("status", "active", true);
    toolbar.apply_option("tags", "c", true);
    toolbar.set_page(50, 25).unwrap();

    toolbar.clear_filters();
    let once = toolbar.navigation_state().clone();
    toolbar.clear_filters();

    assert_eq!(toolbar.navigation_state(), &once);
    assert_eq!(once.start_index(), 0);
    assert!(once.filters().is_empty());
    assert!(!toolbar.filters_applied());
}

#[test]
fn test_start_index_resets_only_on_filter_changes() {
    let mut toolbar = local_toolbar(40);
    toolbar.set_page(20, 10).unwrap();

    toolbar.set_sort(Some(SortSpec::descending("name")));
    assert_eq!(toolbar.navigation_state().start_index(), 20);

    toolbar.search(Some("person".into()));
    assert_eq!(toolbar.navigation_state().start_index(), 0);

    toolbar.set_page(30, 10).unwrap();
    toolbar.set_sort(None);
    assert_eq!(toolbar.navigation_state().start_index(), 30);
}

#[test]
fn test_remote_sync_failure_leaves_state() {
    let mut toolbar = remote_toolbar();
    toolbar.apply_option("status", "active", true);
    let before = toolbar.navigation_state().clone();
    let pages = Arc::new(Mutex::new(0usize));
    let pages_clone = pages.clone();
    toolbar
        .signals
        .settings_changed
        .connect(move |_| *pages_clone.lock() += 1);

    let failing = |_: &NavigationState| -> Result<DataPage<Person>, CollaboratorError> {
        Err("backend offline".into())
    };
    let result = toolbar.sync_remote(&failing);

    assert!(matches!(result, Err(Error::Source(_))));
    assert_eq!(toolbar.navigation_state(), &before);
    assert_eq!(toolbar.page().len(), 10);
    assert_eq!(*pages.lock(), 0);
}

#[test]
fn test_remote_sync_replaces_page() {
    let mut toolbar = remote_toolbar();
    toolbar.apply_option("status", "inactive", true);

    let source = |state: &NavigationState| -> Result<DataPage<Person>, CollaboratorError> {
        let status = state.filter("status").unwrap_or_default();
        let rows: Vec<Person> = people(20).into_iter().filter(|p| p.status == status).collect();
        Ok(DataPage::new(rows, 10).with_limit_reached(true))
    };
    toolbar.sync_remote(&source).unwrap();

    assert_eq!(toolbar.page().len(), 10);
    assert!(toolbar.page().data.iter().all(|p| p.status == "inactive"));
    assert!(toolbar.is_limit_reached());
}

#[test]
fn test_navigation_changes_reach_remote_host() {
    let mut toolbar = remote_toolbar();
    let states = Arc::new(Mutex::new(Vec::new()));
    let states_clone = states.clone();
    toolbar
        .signals
        .navigation_state_changed
        .connect(move |state: &NavigationState| states_clone.lock().push(state.clone()));

    toolbar.set_page(25, 25).unwrap();
    toolbar.apply_option("status", "active", true);
    toolbar.apply_option("status", "active", true);
    toolbar.remove_selected_filter("status", None, true);

    let states = states.lock();
    assert_eq!(states.len(), 3);
    assert_eq!(states[0].start_index(), 25);
    assert_eq!(states[1].filter("status"), Some("active"));
    assert_eq!(states[1].start_index(), 0);
    assert_eq!(states[2].filter("status"), None);
}

#[test]
fn test_custom_filter_removal_is_announced() {
    let mut toolbar = remote_toolbar();
    let removed = Arc::new(Mutex::new(Vec::new()));
    let removed_clone = removed.clone();
    toolbar
        .filters()
        .custom_filter_removed
        .connect(move |entries: &Vec<SelectedFilter>| removed_clone.lock().extend(entries.iter().cloned()));

    toolbar.add_custom_filter("owner", FilterOption::new("me", "Mine"));
    assert!(toolbar.filters_applied());
    toolbar.remove_selected_filter("owner", Some("me"), true);

    assert!(!toolbar.filters_applied());
    assert_eq!(toolbar.navigation_state().filter("owner"), None);
    let removed = removed.lock();
    assert_eq!(removed.len(), 1);
    assert!(removed[0].is_custom);
    assert_eq!(removed[0].option.value, "me");
}

#[test]
fn test_column_choice_is_persisted() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let optional = |name: &str, display: &str| DataModelProperty {
        property: ColumnDescriptor::new(name, display),
        is_additional_column: true,
    };
    let model = DataModel {
        properties: vec![optional("phone", "Phone"), optional("manager", "Manager")],
        configurations: vec![ViewConfig {
            id: "default".into(),
            ..ViewConfig::default()
        }],
        default_config_id: Some("default".into()),
    };

    let mut toolbar = Toolbar::<Person>::new(ToolbarConfig::default(), store.clone());
    toolbar.apply_settings(
        ToolbarSettings::new(person_schema(), DataPage::empty(), NavigationState::default())
            .with_data_model(model.clone()),
    );
    assert!(toolbar.has_view_settings());

    let add_phone = |request: ColumnPickerRequest| -> Result<Option<Vec<ColumnDescriptor>>, CollaboratorError> {
        let mut shown = request.shown;
        shown.extend(request.optional.into_iter().filter(|c| c.name == "phone"));
        Ok(Some(shown))
    };
    assert!(toolbar.update_additional(&add_phone).unwrap());
    assert_eq!(
        store.get(&columns_key("Person")),
        vec!["name".to_string(), "email".to_string(), "phone".to_string()]
    );

    let mut reopened = Toolbar::<Person>::new(ToolbarConfig::default(), store.clone());
    reopened.apply_settings(
        ToolbarSettings::new(person_schema(), DataPage::empty(), NavigationState::default())
            .with_data_model(model),
    );
    let shown: Vec<&str> = reopened.shown_columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(shown, vec!["name", "email", "phone"]);

    reopened.reset_view();
    assert_eq!(
        store.get(&columns_key("Person")),
        vec!["name".to_string(), "email".to_string()]
    );
}

#[test]
fn test_failing_column_picker_changes_nothing() {
    let mut toolbar = remote_toolbar();
    let before = toolbar.shown_columns().to_vec();

    let failing = |_: ColumnPickerRequest| -> Result<Option<Vec<ColumnDescriptor>>, CollaboratorError> {
        Err("renderer gone".into())
    };
    let err = toolbar.update_additional(&failing).unwrap_err();

    assert!(matches!(err, Error::Dialog { dialog: "column picker", .. }));
    assert_eq!(toolbar.shown_columns(), before.as_slice());
}

#[test]
fn test_hidden_filters_and_select_lists() {
    init_logging();
    let config = ToolbarConfig {
        hidden_filters: ["tags".to_string()].into_iter().collect(),
        filter_option_threshold: 2,
        ..ToolbarConfig::default()
    };
    let mut toolbar = Toolbar::<Person>::new(config, Arc::new(MemoryStore::new()));
    toolbar.apply_settings(
        ToolbarSettings::new(person_schema(), DataPage::empty(), NavigationState::default())
            .with_filters(vec![status_filter(), tags_filter()]),
    );

    let visible: Vec<&str> = toolbar.visible_filters().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(visible, vec!["status"]);
    assert!(!toolbar.uses_select_list("status"));
    assert!(toolbar.uses_select_list("tags"));
    assert!(!toolbar.uses_select_list("missing"));
}

fn filtered_local_toolbar(n: u32) -> Toolbar<Person> {
    init_logging();
    let mut toolbar = Toolbar::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()))
        .with_predicate(|person: &Person, state: &NavigationState| {
            state.filter("status").is_none_or(|status| person.status == status)
        });
    toolbar.apply_settings(
        ToolbarSettings::new(
            person_schema(),
            DataPage::complete(people(n)),
            NavigationState::with_page_size(10).unwrap(),
        )
        .with_filters(vec![status_filter(), tags_filter()]),
    );
    toolbar
}

fn record<T: Clone + Send + Sync + 'static>(signal: &Signal<T>) -> Arc<Mutex<Vec<T>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    signal.connect(move |value: &T| log_clone.lock().push(value.clone()));
    log
}

#[test]
fn test_silent_filter_removal_reslices_page() {
    let mut toolbar = filtered_local_toolbar(40);
    toolbar.process_deferred();
    toolbar.apply_option("status", "active", true);
    toolbar.set_page(10, 10).unwrap();
    assert_eq!(toolbar.page().total_count, 20);

    let states = record(&toolbar.signals.navigation_state_changed);
    let pages = record(&toolbar.signals.settings_changed);
    toolbar.remove_selected_filter("status", None, false);

    assert_eq!(toolbar.navigation_state().start_index(), 0);
    assert_eq!(toolbar.navigation_state().filter("status"), None);
    assert_eq!(toolbar.page().total_count, 40);
    assert_eq!(toolbar.page().len(), 10);
    assert_eq!(toolbar.page().data[1].status, "inactive");
    assert!(states.lock().is_empty());
    assert_eq!(pages.lock().len(), 1);
}

#[test]
fn test_disabled_rows_can_be_selected_individually() {
    let mut toolbar =
        local_toolbar(25).with_item_status(ItemStatus::new(|person: &Person| person.status == "active"));
    let rows = people(10);

    toolbar.toggle(&rows[3]);
    toolbar.checked(&rows[5]);
    toolbar.preselect(vec![rows[7].clone(), rows[8].clone()]);
    toolbar.process_deferred();

    for id in [3, 5, 7, 8] {
        assert!(toolbar.selection().is_selected(&rows[id]), "row {id}");
    }
    assert_eq!(toolbar.selection().selected_count(), 4);

    toolbar.toggle(&rows[3]);
    assert!(!toolbar.selection().is_selected(&rows[3]));

    toolbar.select_all_on_page();
    assert_eq!(toolbar.selectable_count(), 5);
    assert!(!toolbar.selection().is_selected(&rows[1]));
    assert!(toolbar.selection().is_selected(&rows[2]));
}

#[test]
fn test_custom_entry_outlives_regular_filter_of_same_name() {
    let mut toolbar = remote_toolbar();
    let removed = Arc::new(Mutex::new(0usize));
    let removed_clone = removed.clone();
    toolbar
        .filters()
        .custom_filter_removed
        .connect(move |entries: &Vec<SelectedFilter>| *removed_clone.lock() += entries.len());

    toolbar.add_custom_filter("status", FilterOption::new("mine", "Mine"));
    toolbar.apply_option("status", "active", true);
    toolbar.apply_option("status", "inactive", true);
    assert_eq!(toolbar.filters().selected().len(), 2);
    assert_eq!(toolbar.navigation_state().filter("status"), Some("inactive"));

    toolbar.remove_selected_filter("status", None, true);
    assert_eq!(toolbar.navigation_state().filter("status"), None);
    assert_eq!(*removed.lock(), 0);
    let remaining = toolbar.filters().selected();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].is_custom);
    assert_eq!(remaining[0].option.value, "mine");
}

#[test]
fn test_filter_before_deferred_slice_publishes_once() {
    let mut toolbar = filtered_local_toolbar(40);
    let pages = record(&toolbar.signals.settings_changed);

    toolbar.apply_option("status", "inactive", true);
    assert_eq!(pages.lock().len(), 1);
    assert_eq!(pages.lock()[0].total_count, 20);

    assert_eq!(toolbar.process_deferred(), 0);
    assert_eq!(pages.lock().len(), 1);
    assert_eq!(toolbar.page().total_count, 20);
}
