//! `it-form-toggle`: on/off switch rendered with the `toggles` lever markup.

use crate::attributes::AttributeSpec;
use crate::element::{text_properties, Component, Effect, Host, IdAllocator, Interaction};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::FormEntry;
use crate::styles::{style_block, HostDisplay};
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::checkable::{check_entries, check_interaction, checkable_attributes, Checkable};
use super::field::{field_attributes, FieldIds, FieldState, HasField};

/// State of one `it-form-toggle`.
#[derive(Debug, Clone)]
pub struct Toggle {
    ids: FieldIds,
    field: FieldState,
    value: String,
    checked: bool,
}

impl HasField for Toggle {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl Checkable for Toggle {
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

impl Component for Toggle {
    const TAG: &'static str = "it-form-toggle";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] =
        &[field_attributes!(Toggle), checkable_attributes!(Toggle)];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "toggle"),
            field: FieldState::default(),
            value: String::new(),
            checked: false,
        }
    }

    fn control_id(&self) -> &str {
        &self.ids.control
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        let caption = MarkupElement::new("span")
            .attr("id", self.ids.label())
            .classes(["toggle-label"])
            .text(self.field.label.as_str())
            .child_opt(
                self.field
                    .required_marker("required", &host.config().required_marker),
            );
        let switch = MarkupElement::new("label")
            .attr("for", self.ids.control.as_str())
            .child(self.control(host))
            .child(MarkupElement::new("span").classes(["lever"]))
            .child(caption);
        MarkupElement::fragment().child(style_block(HostDisplay::Block)).child(
            MarkupElement::new("div")
                .classes(["toggles"])
                .child(switch)
                .child_opt(self.field.help_element(&self.ids))
                .child_opt(self.field.feedback_element(&self.ids)),
        )
    }

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        MarkupElement::new("input")
            .attr("type", "checkbox")
            .attr("id", self.ids.control.as_str())
            .classes([self.field.validation.control_class().unwrap_or_default()])
            .attr_opt("value", Some(self.value.as_str()).filter(|value| !value.is_empty()))
            .flag("checked", self.checked)
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .attr_opt("name", self.field.name.as_deref())
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        self.field.accessibility(&self.ids, tree);
        if let Some(control) = tree.by_id_mut(&self.ids.control) {
            control.set_attribute("role", "switch");
        }
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

text_properties!(Toggle {
    value / set_value => "value" : |state| state.value.clone();
});
