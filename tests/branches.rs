//! Branch grafting: owners, scoping, runtime re-entry.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{app, app_with};
use spark_tree::primitives::same_component;
use spark_tree::{as_widget, BuilderConfig, ErrorKind, VarValue, SUBTREE_ADDED};

#[test]
fn test_checkbox_flag_toggled_by_command() {
    let (app, _) = app();
    let flag = app.variable("flag").expect("flag declared by the checkbox");
    assert_eq!(flag.get(), VarValue::Bool(false));

    let checkbox = app.widget("show_done").unwrap();
    let checkbox = as_widget(&checkbox).unwrap();
    assert!(checkbox.variable().unwrap().same(&flag));
    assert!(!checkbox.is_selected());

    app.widget("toggle_button").unwrap().activate().unwrap();
    assert_eq!(flag.get(), VarValue::Bool(true));
    assert!(checkbox.is_selected());

    app.run_method("toggle").unwrap();
    assert!(!checkbox.is_selected());
}

#[test]
fn test_clicking_checkbox_is_seen_by_command() {
    let (app, _) = app();
    let flag = app.variable("flag").unwrap();
    let writes = Rc::new(Cell::new(0));
    let writes_clone = writes.clone();
    let _untrace = flag.trace(move |_| writes_clone.set(writes_clone.get() + 1));

    app.widget("show_done").unwrap().activate().unwrap();
    assert_eq!(flag.get_bool(), Some(true));
    app.widget("toggle_button").unwrap().activate().unwrap();
    assert_eq!(flag.get_bool(), Some(false));
    assert_eq!(writes.get(), 2);
}

#[test]
fn test_names_register_on_the_owner_current_at_graft_time() {
    let (app, _) = app();
    let root = app.root();

    assert!(root.child("header").is_some());
    let footer = root.child("footer").expect("footer named on root");
    assert!(app.widget("footer").is_some());

    let footer_owner = app.builder().owner_of(&footer).unwrap();
    assert_eq!(footer_owner.type_name(), "TitleFrame");
    assert!(footer_owner.child("caption").is_some());
    assert!(root.child("caption").is_none());
    assert_eq!(footer_owner.variable("caption").unwrap().get_string(), "Totals");
    assert!(root.variable("caption").is_none());
}

#[test]
fn test_inline_data_applies_to_backing_component() {
    let (app, _) = app();
    let footer = app.child("footer").unwrap();
    assert_eq!(footer.type_name(), "LabelFrame");
    assert_eq!(footer.cget("text").unwrap().to_value(), serde_json::json!("Summary"));
}

#[test]
fn test_runtime_grafts_are_independent() {
    let (app, _) = app();
    let list = app.widget("item_list").unwrap();

    let first = app.builder().add_branch("Item", None, Some(&list), None).unwrap();
    let second = app.builder().add_branch("Item", None, Some(&list), None).unwrap();

    assert_eq!(list.children().len(), 2);
    assert!(!same_component(first.component(), second.component()));
    let done_a = first.variable("done").unwrap();
    let done_b = second.variable("done").unwrap();
    assert!(!done_a.same(&done_b));

    done_a.set(true).unwrap();
    assert_eq!(done_b.get_bool(), Some(false));
    assert!(app.variable("done").is_none());
}

#[test]
fn test_add_button_grafts_from_a_command() {
    let (app, _) = app();
    let list = app.widget("item_list").unwrap();
    let added = Rc::new(Cell::new(0));
    let added_clone = added.clone();
    let _unbind = list.bind(SUBTREE_ADDED, Rc::new(move |_| added_clone.set(added_clone.get() + 1)));

    let add = app.widget("add_button").unwrap();
    add.activate().unwrap();
    add.activate().unwrap();

    assert_eq!(added.get(), 2);
    assert_eq!(list.children().len(), 2);
    let item = app.builder().owner_of(&list.children()[0]).unwrap();
    assert_eq!(item.variable("label").unwrap().get_string(), "Untitled");
    assert!(app.builder().current_owner().is_none());
}

#[test]
fn test_hook_args_inline_override() {
    let (app, _) = app();
    let list = app.widget("item_list").unwrap();
    let inline = serde_json::json!({ "post_build_kwargs": { "label": "Milk" } });
    let item = app
        .builder()
        .add_branch("Item", Some("milk"), Some(&list), inline.as_object())
        .unwrap();
    assert_eq!(item.variable("label").unwrap().get_string(), "Milk");
}

#[test]
fn test_cursor_restored_after_failing_graft() {
    let (app, _) = app();
    let builder = app.builder();
    let list = app.widget("item_list").unwrap();
    let before_ids = builder.widget_ids();

    let result = builder.with_owner(app.root(), |ctx| {
        let err = ctx
            .add_branch_with("Broken", Some("broken"), &list, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Attribute);
        let current = ctx.builder().current_owner().unwrap();
        assert!(std::rc::Rc::ptr_eq(&current, app.root()));
        Ok(())
    });
    result.unwrap();

    assert!(builder.current_owner().is_none());
    assert!(builder.add_branch("Broken", None, Some(&list), None).is_err());
    assert!(builder.current_owner().is_none());
    assert_eq!(builder.widget_ids(), before_ids);
}

#[test]
fn test_failed_graft_leaves_partial_component_attached() {
    let (app, _) = app();
    let list = app.widget("item_list").unwrap();
    assert!(app.builder().add_branch("Broken", None, Some(&list), None).is_err());
    assert_eq!(list.children().len(), 1);
    assert!(app.builder().owner_of(&list.children()[0]).is_none());
}

#[test]
fn test_remove_drops_registry_entries() {
    let (app, _) = app();
    let builder = app.builder();
    let list = app.widget("item_list").unwrap();
    let item = builder
        .with_owner(app.root(), |ctx| ctx.add_branch_with("Item", Some("first"), &list, None))
        .unwrap();
    assert!(app.widget("first").is_some());
    assert!(app.child("first").is_some());

    let remove = item.child("remove").unwrap();
    remove.activate().unwrap();

    assert!(list.children().is_empty());
    assert!(app.widget("first").is_none());
    assert!(app.child("first").is_none());
    assert!(builder.owner_of(item.component()).is_none());
}

#[test]
fn test_app_command_event_reaches_the_owner() {
    let (app, _) = app();
    let footer = app.child("footer").unwrap();
    let refreshed = Rc::new(Cell::new(0));
    let refreshed_clone = refreshed.clone();
    let _unbind = footer.bind("<<Refresh>>", Rc::new(move |_| refreshed_clone.set(refreshed_clone.get() + 1)));

    app.widget("refresh_button").unwrap().activate().unwrap();
    assert_eq!(refreshed.get(), 1);
}

#[test]
fn test_subtree_added_can_be_disabled() {
    let (app, _) = app_with(BuilderConfig {
        notify_parent: false,
        ..Default::default()
    });
    let list = app.widget("item_list").unwrap();
    let added = Rc::new(Cell::new(0));
    let added_clone = added.clone();
    let _unbind = list.bind(SUBTREE_ADDED, Rc::new(move |_| added_clone.set(added_clone.get() + 1)));

    app.builder().add_branch("Item", None, Some(&list), None).unwrap();
    assert_eq!(added.get(), 0);
}

#[test]
fn test_commands_fail_once_the_session_is_gone() {
    let (app, _) = app();
    let toggle = app.widget("toggle_button").unwrap();
    drop(app);

    let err = toggle.activate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Command);
}

#[test]
fn test_root_construction_order_and_shape() {
    let (app, toolkit) = app();
    assert_eq!(
        toolkit.created(),
        [
            "Tk", "Frame", "Label", "Button", "Checkbutton", "Button", "Frame", "LabelFrame",
            "Label", "Button",
        ]
    );
    let root = as_widget(app.component()).unwrap();
    assert_eq!(root.min_size(), Some((320.0, 200.0)));
    assert_eq!(root.calls()[0].method, "title");
    let kinds: Vec<String> = app
        .component()
        .children()
        .iter()
        .map(|child| child.type_name().to_string())
        .collect();
    assert_eq!(kinds, ["Frame", "Checkbutton", "Button", "Frame", "LabelFrame"]);
}

#[test]
fn test_file_loader_builds_the_same_tree() {
    let config = BuilderConfig {
        document_root: Some(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")),
        ..Default::default()
    };
    let toolkit = Rc::new(spark_tree::MemoryToolkit::new());
    let app = spark_tree::build(
        common::root_type(),
        common::branch_types(),
        toolkit.clone(),
        Rc::new(spark_tree::FileLoader),
        config,
    )
    .unwrap();
    assert_eq!(toolkit.created_count(), 10);
    assert!(app.variable("flag").is_some());
}
