//! Property tests for selection across paging.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use rowline::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Row(u32);

impl Entity for Row {
    type Id = u32;

    fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(u32),
    Checked(u32),
    UnChecked(u32),
    Page(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..30).prop_map(Op::Toggle),
        (0u32..30).prop_map(Op::Checked),
        (0u32..30).prop_map(Op::UnChecked),
        (0usize..3).prop_map(|page| Op::Page(page * 10)),
    ]
}

fn toolbar() -> Toolbar<Row> {
    let mut toolbar = Toolbar::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()));
    let schema = Arc::new(EntitySchema::new("Row", [ColumnDescriptor::new("id", "Id")]));
    toolbar.apply_settings(ToolbarSettings::new(
        schema,
        DataPage::complete((0..25).map(Row).collect()),
        NavigationState::with_page_size(10).unwrap(),
    ));
    toolbar.process_deferred();
    toolbar
}

proptest! {
    #[test]
    fn selection_follows_calls_regardless_of_paging(ops in prop::collection::vec(op(), 0..60)) {
        let mut toolbar = toolbar();
        let mut expected: HashSet<u32> = HashSet::new();

        for op in &ops {
            match *op {
                Op::Toggle(id) => {
                    toolbar.toggle(&Row(id));
                    if !expected.remove(&id) {
                        expected.insert(id);
                    }
                }
                Op::Checked(id) => {
                    toolbar.checked(&Row(id));
                    expected.insert(id);
                }
                Op::UnChecked(id) => {
                    toolbar.un_checked(&Row(id));
                    expected.remove(&id);
                }
                Op::Page(start) => toolbar.set_page(start, 10).unwrap(),
            }
        }

        let actual: HashSet<u32> = toolbar.selection().selected().iter().map(|r| r.0).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn toggles_leave_parity(ids in prop::collection::vec(0u32..10, 0..40)) {
        let mut toolbar = toolbar();
        for id in &ids {
            toolbar.toggle(&Row(*id));
        }
        for id in 0..10u32 {
            let toggles = ids.iter().filter(|i| **i == id).count();
            prop_assert_eq!(toolbar.selection().is_selected(&Row(id)), toggles % 2 == 1);
        }
    }

    #[test]
    fn local_slice_is_the_window(total in 0u32..60, size in 1usize..15, start in 0usize..70) {
        let mut toolbar = Toolbar::new(ToolbarConfig::local(), Arc::new(MemoryStore::new()));
        let schema = Arc::new(EntitySchema::new("Row", [ColumnDescriptor::new("id", "Id")]));
        toolbar.apply_settings(ToolbarSettings::new(
            schema,
            DataPage::complete((0..total).map(Row).collect()),
            NavigationState::default(),
        ));
        toolbar.process_deferred();
        toolbar.set_page(start, size).unwrap();

        let expected: Vec<u32> = (0..total)
            .skip(start)
            .take(size)
            .collect();
        let actual: Vec<u32> = toolbar.page().data.iter().map(|r| r.0).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(toolbar.page().total_count, total as usize);
    }
}
