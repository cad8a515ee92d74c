//! `it-form-radio`: labelled radio button, exclusive across hosts sharing a `name`.

use crate::attributes::AttributeSpec;
use crate::element::{text_properties, Component, Effect, Host, IdAllocator, Interaction};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::FormEntry;
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::checkable::{check_entries, check_interaction, checkable_attributes, Checkable};
use super::field::{field_attributes, FieldIds, FieldState, HasField};

/// State of one `it-form-radio`.
#[derive(Debug, Clone)]
pub struct Radio {
    ids: FieldIds,
    field: FieldState,
    value: String,
    checked: bool,
}

impl Radio {
    /// Whether this radio or any other connected radio with the same name is checked.
    fn group_checked(&self, host: &Host<'_>, live: &LiveControl) -> bool {
        if live.checked {
            return true;
        }
        let Some(name) = self.field.name.as_deref() else {
            return false;
        };
        let document = host.document();
        document
            .query_all(document.body(), &[Self::TAG])
            .into_iter()
            .filter(|node| *node != host.node())
            .filter(|node| document.attribute(*node, "name") == Some(name))
            .any(|node| {
                document
                    .shadow(node)
                    .and_then(|shadow| shadow.live())
                    .is_some_and(|live| live.checked)
            })
    }
}

impl HasField for Radio {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl Checkable for Radio {
    const EXCLUSIVE: bool = true;

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

    fn group_name(&self) -> Option<&str> {
        self.field.name.as_deref()
    }
}

impl Component for Radio {
    const TAG: &'static str = "it-form-radio";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] =
        &[field_attributes!(Radio), checkable_attributes!(Radio)];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "radio"),
            field: FieldState::default(),
            value: String::new(),
            checked: false,
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
            .attr("type", "radio")
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
    }

    fn live(&self, _host: &Host<'_>) -> LiveControl {
        LiveControl {
            checked: self.checked,
            ..LiveControl::default()
        }
    }

    fn adopt_live(&mut self, live: &LiveControl) {
        self.checked = live.checked;
    }

    fn patch_live(&self, _host: &Host<'_>, attribute: &str, live: &mut LiveControl) {
        if attribute == "checked" {
            live.checked = self.checked;
        }
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        let disabled = self.field.disabled;
        check_interaction(self, Self::TAG, host.node(), disabled, live, interaction)
    }

    fn focusable(&self) -> bool {
        !self.field.disabled
    }

    fn field(&self) -> Option<&FieldState> {
        Some(&self.field)
    }

    fn validity(&self, host: &Host<'_>, live: &LiveControl) -> Option<ValidityState> {
        let constraints = Constraints {
            value: self.submitted_value(),
            required: self.field.required,
            disabled: self.field.disabled,
            checked: live.checked,
            group_checked: self.group_checked(host, live),
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(ControlKind::Radio, &constraints))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        check_entries(self, self.field.name.as_deref(), live)
    }
}

text_properties!(Radio {
    value / set_value => "value" : |state| state.value.clone();
});

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

    fn radios(values: &[&str], extra: &[(&str, &str)]) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let nodes = values
            .iter()
            .map(|value| {
                let mut attributes = vec![("name", "colore"), ("value", *value)];
                attributes.extend_from_slice(extra);
                doc.append_element(body, Radio::TAG, &attributes)
                    .expect("radio")
            })
            .collect();
        (doc, nodes)
    }

    fn checked(doc: &mut Document, nodes: &[NodeId]) -> Vec<bool> {
        nodes
            .iter()
            .map(|node| doc.element::<Radio>(*node).expect("radio").checked())
            .collect()
    }

    #[test]
    fn checking_one_unchecks_the_group() {
        let (mut doc, nodes) = radios(&["rosso", "verde", "blu"], &[]);
        doc.element::<Radio>(nodes[0]).expect("radio").click();
        assert_eq!(checked(&mut doc, &nodes), vec![true, false, false]);
        doc.interact(nodes[2], Interaction::Toggle(true)).expect("toggle");
        assert_eq!(checked(&mut doc, &nodes), vec![false, false, true]);
        doc.element::<Radio>(nodes[1]).expect("radio").set_checked(true);
        assert_eq!(checked(&mut doc, &nodes), vec![false, true, false]);
    }

    #[test]
    fn unchecked_state_survives_rerender() {
        let (mut doc, nodes) = radios(&["a", "b"], &[]);
        doc.element::<Radio>(nodes[0]).expect("radio").click();
        doc.element::<Radio>(nodes[1]).expect("radio").click();
        doc.element::<Radio>(nodes[0]).expect("radio").set_label("A");
        assert_eq!(checked(&mut doc, &nodes), vec![false, true]);
        let html = doc.element::<Radio>(nodes[0]).expect("radio").shadow_html();
        assert!(!html.contains(" checked"));
    }

    #[test]
    fn clicking_a_checked_radio_is_a_no_op() {
        let (mut doc, nodes) = radios(&["a"], &[("checked", "")]);
        let count = Rc::new(RefCell::new(0));
        let seen = count.clone();
        doc.add_event_listener(nodes[0], "it-form-radio-change", move |_| *seen.borrow_mut() += 1);
        doc.element::<Radio>(nodes[0]).expect("radio").click();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn change_detail_carries_group_name() {
        let (mut doc, nodes) = radios(&["verde"], &[]);
        let details = Rc::new(RefCell::new(Vec::new()));
        let log = details.clone();
        doc.add_event_listener(doc.body(), "it-form-radio-change", move |event| {
            log.borrow_mut().push(event.detail().clone());
        });
        doc.element::<Radio>(nodes[0]).expect("radio").click();
        assert_eq!(
            *details.borrow(),
            vec![EventDetail::Checkable {
                checked: true,
                value: "verde".to_string(),
                name: Some("colore".to_string()),
                element: nodes[0],
            }]
        );
    }

    #[test]
    fn required_group_is_satisfied_by_any_member() {
        let (mut doc, nodes) = radios(&["a", "b"], &[("required", "")]);
        assert!(!doc.check_validity(nodes[0]));
        doc.element::<Radio>(nodes[1]).expect("radio").click();
        assert!(doc.check_validity(nodes[0]));
        assert!(doc.check_validity(nodes[1]));
    }

    #[test]
    fn only_the_checked_member_submits() {
        let (mut doc, nodes) = radios(&["a", "b"], &[]);
        doc.element::<Radio>(nodes[1]).expect("radio").click();
        assert!(doc.form_entries(nodes[0]).is_empty());
        assert_eq!(doc.form_entries(nodes[1]), vec![FormEntry::text("colore", "b")]);
    }
}
