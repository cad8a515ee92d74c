use std::cell::RefCell;
use std::rc::Rc;

use it_elements::prelude::*;
use it_elements::GroupLayout;
use pretty_assertions::assert_eq;

fn document() -> Document {
    Document::new(ElementRegistry::with_all())
}

fn record(doc: &mut Document, node: NodeId, name: &str) -> Rc<RefCell<Vec<EventDetail>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    doc.add_event_listener(node, name, move |event| {
        log.borrow_mut().push(event.detail().clone());
    });
    seen
}

#[test]
fn boolean_attributes_round_trip_through_properties() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, TextInput::TAG, &[("label", "Nome")])
        .expect("input");

    let mut input = doc.element::<TextInput>(node).expect("input");
    assert!(!input.required());
    input.set_required(true);
    assert_eq!(input.attribute("required"), Some(""));
    assert!(input.required());
    input.set_required(false);
    assert!(!input.has_attribute("required"));
    assert!(!input.required());

    doc.set_attribute(node, "disabled", "false").expect("disabled");
    assert!(doc.element::<TextInput>(node).expect("input").disabled());
}

#[test]
fn rerender_is_idempotent_after_patches() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(
            body,
            TextInput::TAG,
            &[("label", "Email"), ("type", "email"), ("help-text", "Aziendale")],
        )
        .expect("input");

    doc.set_attribute(node, "placeholder", "nome@example.it").expect("placeholder");
    doc.set_attribute(node, "disabled", "").expect("disabled");
    doc.set_attribute(node, "aria-label", "Indirizzo email").expect("aria");
    let patched = doc.element::<TextInput>(node).expect("input").shadow_html();

    doc.rerender(node);
    let first = doc.element::<TextInput>(node).expect("input").shadow_html();
    doc.rerender(node);
    let second = doc.element::<TextInput>(node).expect("input").shadow_html();
    assert_eq!(patched, first);
    assert_eq!(first, second);
}

#[test]
fn feedback_renders_only_with_state_and_message() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, TextArea::TAG, &[("label", "Note")])
        .expect("textarea");
    let mut textarea = doc.element::<TextArea>(node).expect("textarea");

    textarea.set_validation(Validation::Invalid);
    assert!(!textarea.shadow_html().contains("invalid-feedback"));
    assert!(textarea.shadow_html().contains("is-invalid"));

    textarea.set_validation_message("Campo obbligatorio");
    assert!(textarea.shadow_html().contains("invalid-feedback"));

    textarea.set_validation(Validation::Valid);
    assert!(textarea.shadow_html().contains("valid-feedback"));
    assert!(!textarea.shadow_html().contains("invalid-feedback"));

    textarea.set_validation(Validation::Unset);
    assert!(!textarea.shadow_html().contains("feedback"));
}

#[test]
fn group_aggregates_descendant_validation() {
    let mut doc = document();
    let body = doc.body();
    let group = doc.append_element(body, FormGroup::TAG, &[]).expect("group");
    let first = doc
        .append_element(group, TextInput::TAG, &[("validation", "valid")])
        .expect("first");
    let second = doc
        .append_element(group, Checkbox::TAG, &[("validation", "invalid")])
        .expect("second");

    doc.interact(first, Interaction::Input("Ada".to_string())).expect("input");
    assert_eq!(doc.attribute(group, "validation"), Some("invalid"));

    doc.set_attribute(second, "validation", "valid").expect("valid");
    doc.interact(second, Interaction::Click).expect("click");
    assert_eq!(doc.attribute(group, "validation"), Some("valid"));

    doc.remove_attribute(first, "validation").expect("unset");
    doc.interact(first, Interaction::Input("Grace".to_string())).expect("input");
    assert_eq!(doc.attribute(group, "validation"), None);

    let mut handle = doc.element::<FormGroup>(group).expect("group");
    handle.set_layout(GroupLayout::Horizontal);
    assert!(handle.shadow_html().contains("group-content horizontal"));
}

#[test]
fn alert_dismiss_and_show() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, Alert::TAG, &[("type", "warning"), ("dismissible", "")])
        .expect("alert");
    let dismissed = record(&mut doc, node, "it-alert-dismiss");

    let mut alert = doc.element::<Alert>(node).expect("alert");
    alert.dismiss();
    assert!(alert.dismissed());
    assert!(alert.shadow_html().contains(" hidden"));
    alert.show();
    assert!(!alert.dismissed());
    assert!(!alert.shadow_html().contains(" hidden"));
    assert_eq!(dismissed.borrow().len(), 1);
}

#[test]
fn cancelled_dismiss_keeps_alert_visible() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, Alert::TAG, &[("dismissible", "")])
        .expect("alert");
    doc.add_event_listener(body, "it-alert-dismiss", |event| event.prevent_default());

    doc.element::<Alert>(node).expect("alert").dismiss();
    assert!(!doc.has_attribute(node, "dismissed"));
}

#[test]
fn disabled_or_loading_button_emits_no_click() {
    let mut doc = document();
    let body = doc.body();
    let node = doc.append_element(body, Button::TAG, &[]).expect("button");
    let clicks = record(&mut doc, body, "it-button-click");

    let mut button = doc.element::<Button>(node).expect("button");
    button.click();
    button.set_disabled(true);
    button.click();
    button.set_disabled(false);
    button.set_loading(true);
    button.click();
    button.set_loading(false);
    button.click();
    assert_eq!(clicks.borrow().len(), 2);
}

#[test]
fn file_removal_reindexes_remaining_files() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, FileInput::TAG, &[("multiple", "")])
        .expect("file");
    let removed = record(&mut doc, node, "it-form-file-remove");
    let files = vec![
        FileDescriptor::new("a.pdf", 100),
        FileDescriptor::new("b.pdf", 2048),
        FileDescriptor::new("c.pdf", 0),
    ];
    doc.interact(node, Interaction::Files(files.clone())).expect("files");

    let mut picker = doc.element::<FileInput>(node).expect("file");
    picker.remove_file(1);
    let remaining = vec![files[0].clone(), files[2].clone()];
    assert_eq!(picker.files(), remaining);
    let html = picker.shadow_html();
    assert!(html.contains(r#"data-index="1""#));
    assert!(!html.contains(r#"data-index="2""#));
    assert!(!html.contains("b.pdf"));
    assert_eq!(
        *removed.borrow(),
        vec![EventDetail::FileRemoved {
            files: remaining,
            removed_index: 1,
            element: node,
        }]
    );
}

#[test]
fn required_checkbox_becomes_valid_when_checked() {
    let mut doc = document();
    let body = doc.body();
    let node = doc
        .append_element(body, Checkbox::TAG, &[("required", ""), ("label", "Accetto")])
        .expect("checkbox");
    let changes = record(&mut doc, body, "it-form-checkbox-change");

    assert!(!doc.check_validity(node));
    doc.element::<Checkbox>(node).expect("checkbox").click();
    assert!(doc.check_validity(node));
    assert_eq!(
        *changes.borrow(),
        vec![EventDetail::Checkable {
            checked: true,
            value: String::new(),
            name: None,
            element: node,
        }]
    );
}
