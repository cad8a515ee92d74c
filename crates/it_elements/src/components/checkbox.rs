//! `it-form-checkbox`: labelled checkbox with an indeterminate state.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    text_properties, Component, Effect, ElementRef, Host, IdAllocator, Interaction,
};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::FormEntry;
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::checkable::{check_entries, check_interaction, checkable_attributes, Checkable};
use super::field::{field_attributes, FieldIds, FieldState, HasField};

/// State of one `it-form-checkbox`.
#[derive(Debug, Clone)]
pub struct Checkbox {
    ids: FieldIds,
    field: FieldState,
    value: String,
    checked: bool,
    indeterminate: bool,
}

impl HasField for Checkbox {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl Checkable for Checkbox {
    fn checked_state(&self) -> bool {
        self.checked
    }

    fn set_checked_state(&mut self, on: bool) {
        self.checked = on;
    }

    fn value_attribute(&self) -> &str {
        &self.value
    }

    fn set_value_attribute(&mut self, value: String) {
        self.value = value;
    }
}

impl Component for Checkbox {
    const TAG: &'static str = "it-form-checkbox";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[
        field_attributes!(Checkbox),
        checkable_attributes!(Checkbox),
        &[AttributeSpec {
            name: "indeterminate",
            update: Update::Patch,
            apply: |state, raw| state.indeterminate = attributes::flag(raw),
        }],
    ];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "checkbox"),
            field: FieldState::default(),
            value: String::new(),
            checked: false,
            indeterminate: false,
        }
    }

    fn control_id(&self) -> &str {
        &self.ids.control
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        let label = self.field.label_element(
            &self.ids,
            "form-check-label",
            &host.config().required_marker,
        );
        self.field
            .fragment(&self.ids, "form-check", None, self.control(host), label)
    }

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        MarkupElement::new("input")
            .attr("type", "checkbox")
            .attr("id", self.ids.control.as_str())
            .classes(self.field.control_classes("form-check-input"))
            .attr_opt("value", Some(self.value.as_str()).filter(|value| !value.is_empty()))
            .flag("checked", self.checked)
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .attr_opt("name", self.field.name.as_deref())
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        self.field.accessibility(&self.ids, tree);
        if let Some(control) = tree.by_id_mut(&self.ids.control) {
            control.set_or_remove("aria-checked", self.indeterminate.then_some("mixed"));
        }
    }

    fn live(&self, _host: &Host<'_>) -> LiveControl {
        LiveControl {
            checked: self.checked,
            indeterminate: self.indeterminate,
            ..LiveControl::default()
        }
    }

    fn adopt_live(&mut self, live: &LiveControl) {
        self.checked = live.checked;
        self.indeterminate = live.indeterminate;
    }

    fn patch_live(&self, _host: &Host<'_>, attribute: &str, live: &mut LiveControl) {
        match attribute {
            "checked" => live.checked = self.checked,
            "indeterminate" => live.indeterminate = self.indeterminate,
            _ => {}
        }
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        let was_mixed = live.indeterminate;
        let disabled = self.field.disabled;
        let node = host.node();
        let mut effects = check_interaction(self, Self::TAG, node, disabled, live, interaction);
        if was_mixed && !live.indeterminate {
            self.indeterminate = false;
            effects.insert(0, Effect::Render(node));
        }
        effects
    }

    fn focusable(&self) -> bool {
        !self.field.disabled
    }

    fn field(&self) -> Option<&FieldState> {
        Some(&self.field)
    }

    fn validity(&self, _host: &Host<'_>, live: &LiveControl) -> Option<ValidityState> {
        let constraints = Constraints {
            value: self.submitted_value(),
            required: self.field.required,
            disabled: self.field.disabled,
            checked: live.checked,
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(ControlKind::Checkbox, &constraints))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        check_entries(self, self.field.name.as_deref(), live)
    }
}

text_properties!(Checkbox {
    value / set_value => "value" : |state| state.value.clone();
});

impl ElementRef<'_, Checkbox> {
    /// Current indeterminate state: the live control once rendered, the in-memory flag before.
    pub fn indeterminate(&self) -> bool {
        self.read(|state, live| match live {
            Some(live) => live.indeterminate,
            None => state.indeterminate,
        })
    }

    /// Sets or removes `indeterminate` and updates the live control.
    pub fn set_indeterminate(&mut self, on: bool) {
        self.set_flag("indeterminate", on);
        self.with_live(|live| live.indeterminate = on);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::document::Document;
    use crate::events::EventDetail;
    use crate::model::NodeId;
    use crate::registry::ElementRegistry;

    use super::*;

    fn checkbox(attributes: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let node = doc
            .append_element(body, Checkbox::TAG, attributes)
            .expect("checkbox");
        (doc, node)
    }

    #[test]
    fn renders_input_before_label() {
        let (mut doc, node) = checkbox(&[("label", "Accetto"), ("checked", "")]);
        let html = doc.element::<Checkbox>(node).expect("checkbox").shadow_html();
        let input = html.find("<input").expect("input");
        let label = html.find("<label").expect("label");
        assert!(input < label);
        assert!(html.contains(r#"class="form-check""#));
        assert!(html.contains(r#"class="form-check-label""#));
        assert!(html.contains(" checked "));
    }

    #[test]
    fn required_checkbox_validates_on_checked() {
        let (mut doc, node) = checkbox(&[("required", "")]);
        let mut handle = doc.element::<Checkbox>(node).expect("checkbox");
        assert!(!handle.check_validity());
        handle.set_checked(true);
        assert!(handle.check_validity());
        assert!(handle.has_attribute("checked"));
    }

    #[test]
    fn click_flips_and_emits_change() {
        let (mut doc, node) = checkbox(&[("value", "privacy"), ("name", "consensi")]);
        let details = Rc::new(RefCell::new(Vec::new()));
        let log = details.clone();
        doc.add_event_listener(node, "it-form-checkbox-change", move |event| {
            log.borrow_mut().push(event.detail().clone());
        });
        doc.element::<Checkbox>(node).expect("checkbox").click();
        doc.element::<Checkbox>(node).expect("checkbox").click();
        assert_eq!(
            *details.borrow(),
            vec![
                EventDetail::Checkable {
                    checked: true,
                    value: "privacy".to_string(),
                    name: None,
                    element: node,
                },
                EventDetail::Checkable {
                    checked: false,
                    value: "privacy".to_string(),
                    name: None,
                    element: node,
                },
            ]
        );
    }

    #[test]
    fn disabled_checkbox_ignores_activation() {
        let (mut doc, node) = checkbox(&[("disabled", "")]);
        doc.interact(node, Interaction::Toggle(true)).expect("toggle");
        assert!(!doc.element::<Checkbox>(node).expect("checkbox").checked());
    }

    #[test]
    fn indeterminate_is_mixed_until_activated() {
        let (mut doc, node) = checkbox(&[]);
        let mut handle = doc.element::<Checkbox>(node).expect("checkbox");
        handle.set_indeterminate(true);
        assert!(handle.indeterminate());
        assert!(handle.shadow_html().contains(r#"aria-checked="mixed""#));
        handle.click();
        let handle = doc.element::<Checkbox>(node).expect("checkbox");
        assert!(!handle.indeterminate());
        assert!(handle.checked());
        assert!(!handle.shadow_html().contains("aria-checked"));
    }

    #[test]
    fn submits_value_or_on_when_checked() {
        let (mut doc, node) = checkbox(&[("name", "newsletter"), ("checked", "")]);
        assert_eq!(doc.form_entries(node), vec![FormEntry::text("newsletter", "on")]);
        doc.element::<Checkbox>(node).expect("checkbox").set_value("si");
        assert_eq!(doc.form_entries(node), vec![FormEntry::text("newsletter", "si")]);
        doc.element::<Checkbox>(node).expect("checkbox").set_checked(false);
        assert!(doc.form_entries(node).is_empty());
    }
}
