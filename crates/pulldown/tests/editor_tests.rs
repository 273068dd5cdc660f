//! Configuration editor driven through a mock dialog host.

use std::cell::RefCell;
use std::rc::Rc;

use pulldown::{CardConfig, ConfigEditor, EditorDialogHost, EditorError, PanelTarget};
use pulldown_test_utils::MockDialogHost;
use serde_json::{Value, json};

fn editor() -> (ConfigEditor, Rc<RefCell<Vec<Value>>>) {
    let mut editor = ConfigEditor::new();
    editor.set_config(&CardConfig::stub_value());
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    editor.subscribe(move |config| sink.borrow_mut().push(config.clone()));
    (editor, changes)
}

#[test]
fn test_add_then_edit_new_panel() {
    let (mut editor, changes) = editor();
    let host = MockDialogHost::saving(json!({ "type": "custom:mini-graph-card" }));

    let target = editor.add_drawer_panel();
    assert_eq!(target, PanelTarget::Drawer(2));

    let saved = pollster::block_on(editor.edit_panel(target, Some(&host as &dyn EditorDialogHost)));
    assert_eq!(saved, Ok(true));
    assert_eq!(
        host.opened_with(),
        vec![Some(json!({ "type": "markdown", "content": "New card" }))]
    );
    assert_eq!(
        editor.drawer_labels(),
        vec!["Markdown", "Markdown", "Mini Graph Card"]
    );
    assert_eq!(changes.borrow().len(), 2);
}

#[test]
fn test_every_change_carries_full_config() {
    let (mut editor, changes) = editor();
    editor.set_handle_color("white");
    editor.move_down(0);

    let last = changes.borrow().last().cloned().unwrap();
    assert_eq!(last["handle_color"], "white");
    assert_eq!(last["main_card"]["content"], "Main content");
    assert_eq!(last["drawer_cards"][0]["content"], "Drawer card 2");
    assert_eq!(last["auto_close_on_tap"], true);
}

#[test]
fn test_edited_config_is_valid_card_config() {
    let (mut editor, changes) = editor();
    editor.set_drawer_blur("8");
    editor.set_animation_duration("450ms");
    editor.set_auto_close_on_tap(false);

    let last = changes.borrow().last().cloned().unwrap();
    let config = CardConfig::from_value(&last).unwrap();
    assert_eq!(config.drawer_blur, 8.0);
    assert_eq!(config.animation_duration, 450);
    assert!(!config.auto_close_on_tap);
}

#[test]
fn test_missing_host_aborts_only_that_action() {
    let (mut editor, changes) = editor();

    let result = pollster::block_on(editor.edit_panel(PanelTarget::Main, None));
    assert_eq!(result, Err(EditorError::MissingHost));
    assert!(changes.borrow().is_empty());

    editor.delete_drawer_panel(0).unwrap();
    assert_eq!(editor.drawer_len(), 1);
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn test_dialog_failure_leaves_config() {
    let (mut editor, changes) = editor();
    let before = editor.config();
    let host = MockDialogHost::failing("dialog element not defined");

    let result = pollster::block_on(editor.edit_panel(PanelTarget::Drawer(1), Some(&host as &dyn EditorDialogHost)));
    assert_eq!(result, Err(EditorError::Dialog("dialog element not defined".into())));
    assert_eq!(editor.config(), before);
    assert!(changes.borrow().is_empty());
}

#[test]
fn test_dismissed_dialog_changes_nothing() {
    let (mut editor, changes) = editor();
    let host = MockDialogHost::dismissing();

    let result = pollster::block_on(editor.edit_panel(PanelTarget::Main, Some(&host as &dyn EditorDialogHost)));
    assert_eq!(result, Ok(false));
    assert_eq!(host.opened_with(), vec![Some(json!({ "type": "markdown", "content": "Main content" }))]);
    assert!(changes.borrow().is_empty());
}
