//! `it-form-input`: labelled single-line text control.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, optional_properties, text_properties, token_properties, Component, Effect,
    ElementRef, Host, IdAllocator, Interaction,
};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{FormEntry, InputType, Token};
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::field::{field_attributes, value_interaction, FieldIds, FieldState, HasField, HasValue};

/// State of one `it-form-input`.
#[derive(Debug, Clone)]
pub struct TextInput {
    ids: FieldIds,
    field: FieldState,
    input_type: InputType,
    placeholder: String,
    value: String,
    readonly: bool,
    min: Option<String>,
    max: Option<String>,
    step: Option<String>,
    pattern: Option<String>,
    min_length: Option<u32>,
    max_length: Option<u32>,
    autocomplete: Option<String>,
}

impl TextInput {
    /// Input type.
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    fn accepts_pattern(&self) -> bool {
        matches!(
            self.input_type,
            InputType::Text
                | InputType::Email
                | InputType::Url
                | InputType::Tel
                | InputType::Search
                | InputType::Password
        )
    }

    fn is_numeric(&self) -> bool {
        self.input_type == InputType::Number
    }
}

impl HasField for TextInput {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl HasValue for TextInput {
    fn value_state(&self) -> &str {
        &self.value
    }
}

impl Component for TextInput {
    const TAG: &'static str = "it-form-input";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[
        field_attributes!(TextInput),
        &[
            AttributeSpec {
                name: "type",
                update: Update::Patch,
                apply: |state, raw| state.input_type = attributes::token("type", raw),
            },
            AttributeSpec {
                name: "placeholder",
                update: Update::Patch,
                apply: |state, raw| state.placeholder = attributes::text(raw),
            },
            AttributeSpec {
                name: "value",
                update: Update::Patch,
                apply: |state, raw| state.value = attributes::text(raw),
            },
            AttributeSpec {
                name: "readonly",
                update: Update::Patch,
                apply: |state, raw| state.readonly = attributes::flag(raw),
            },
            AttributeSpec {
                name: "min",
                update: Update::Render,
                apply: |state, raw| state.min = attributes::optional(raw),
            },
            AttributeSpec {
                name: "max",
                update: Update::Render,
                apply: |state, raw| state.max = attributes::optional(raw),
            },
            AttributeSpec {
                name: "step",
                update: Update::Render,
                apply: |state, raw| state.step = attributes::optional(raw),
            },
            AttributeSpec {
                name: "pattern",
                update: Update::Render,
                apply: |state, raw| state.pattern = attributes::optional(raw),
            },
            AttributeSpec {
                name: "minlength",
                update: Update::Render,
                apply: |state, raw| state.min_length = attributes::number(raw),
            },
            AttributeSpec {
                name: "maxlength",
                update: Update::Render,
                apply: |state, raw| state.max_length = attributes::number(raw),
            },
            AttributeSpec {
                name: "autocomplete",
                update: Update::Render,
                apply: |state, raw| state.autocomplete = attributes::optional(raw),
            },
        ],
    ];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "input"),
            field: FieldState::default(),
            input_type: InputType::default(),
            placeholder: String::new(),
            value: String::new(),
            readonly: false,
            min: None,
            max: None,
            step: None,
            pattern: None,
            min_length: None,
            max_length: None,
            autocomplete: None,
        }
    }

    fn control_id(&self) -> &str {
        &self.ids.control
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        let label = self
            .field
            .label_element(&self.ids, "form-label", &host.config().required_marker);
        self.field
            .fragment(&self.ids, "form-group", label, self.control(host), None)
    }

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        let numeric = |value: &Option<String>| value.clone().filter(|_| self.is_numeric());
        MarkupElement::new("input")
            .attr("type", self.input_type.token())
            .attr("id", self.ids.control.as_str())
            .classes(self.field.control_classes("form-control"))
            .attr_opt(
                "placeholder",
                Some(self.placeholder.as_str()).filter(|value| !value.is_empty()),
            )
            .attr_opt("value", Some(self.value.as_str()).filter(|value| !value.is_empty()))
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .flag("readonly", self.readonly)
            .attr_opt("min", numeric(&self.min))
            .attr_opt("max", numeric(&self.max))
            .attr_opt("step", numeric(&self.step))
            .attr_opt("pattern", self.pattern.clone().filter(|_| self.accepts_pattern()))
            .attr_opt("minlength", self.min_length.map(|length| length.to_string()))
            .attr_opt("maxlength", self.max_length.map(|length| length.to_string()))
            .attr_opt("name", self.field.name.as_deref())
            .attr_opt("autocomplete", self.autocomplete.as_deref())
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        self.field.accessibility(&self.ids, tree);
    }

    fn live(&self, _host: &Host<'_>) -> LiveControl {
        LiveControl {
            value: self.value.clone(),
            ..LiveControl::default()
        }
    }

    fn adopt_live(&mut self, live: &LiveControl) {
        self.value.clone_from(&live.value);
    }

    fn patch_live(&self, _host: &Host<'_>, attribute: &str, live: &mut LiveControl) {
        if attribute == "value" {
            live.value.clone_from(&self.value);
        }
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        let blocked = self.field.disabled || self.readonly;
        value_interaction(Self::TAG, host.node(), blocked, &mut self.value, live, interaction)
    }

    fn focusable(&self) -> bool {
        !self.field.disabled
    }

    fn field(&self) -> Option<&FieldState> {
        Some(&self.field)
    }

    fn validity(&self, _host: &Host<'_>, live: &LiveControl) -> Option<ValidityState> {
        let constraints = Constraints {
            value: &live.value,
            required: self.field.required,
            disabled: self.field.disabled || self.readonly,
            pattern: self.pattern.as_deref(),
            min_length: self.min_length,
            max_length: self.max_length,
            min: self.min.as_deref(),
            max: self.max.as_deref(),
            step: self.step.as_deref(),
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(
            ControlKind::Input(self.input_type),
            &constraints,
        ))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        self.field
            .name
            .iter()
            .map(|name| FormEntry::text(name, &live.value))
            .collect()
    }
}

token_properties!(TextInput {
    input_type / set_input_type => "type" : InputType : |state| state.input_type;
});

text_properties!(TextInput {
    placeholder / set_placeholder => "placeholder" : |state| state.placeholder.clone();
});

flag_properties!(TextInput {
    readonly / set_readonly => "readonly" : |state| state.readonly;
});

optional_properties!(TextInput {
    min / set_min => "min" : |state| state.min.clone();
    max / set_max => "max" : |state| state.max.clone();
    step / set_step => "step" : |state| state.step.clone();
    pattern / set_pattern => "pattern" : |state| state.pattern.clone();
    autocomplete / set_autocomplete => "autocomplete" : |state| state.autocomplete.clone();
});

impl ElementRef<'_, TextInput> {
    /// `minlength` property.
    pub fn min_length(&self) -> Option<u32> {
        self.read(|state, _| state.min_length)
    }

    /// Sets or removes `minlength`.
    pub fn set_min_length(&mut self, length: Option<u32>) {
        self.set_optional("minlength", length.map(|length| length.to_string()).as_deref());
    }

    /// `maxlength` property.
    pub fn max_length(&self) -> Option<u32> {
        self.read(|state, _| state.max_length)
    }

    /// Sets or removes `maxlength`.
    pub fn set_max_length(&mut self, length: Option<u32>) {
        self.set_optional("maxlength", length.map(|length| length.to_string()).as_deref());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::document::Document;
    use crate::events::EventDetail;
    use crate::model::{NodeId, Validation};
    use crate::registry::ElementRegistry;

    use super::*;

    fn input(attributes: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let node = doc
            .append_element(body, TextInput::TAG, attributes)
            .expect("input");
        (doc, node)
    }

    #[test]
    fn renders_label_help_and_feedback_with_aria_links() {
        let (mut doc, node) = input(&[
            ("label", "Email"),
            ("type", "email"),
            ("required", ""),
            ("help-text", "Usa l'indirizzo istituzionale"),
            ("validation", "invalid"),
            ("validation-message", "Indirizzo non valido"),
        ]);
        let handle = doc.element::<TextInput>(node).expect("input");
        let shadow = handle.shadow().expect("shadow");
        let control = shadow.by_id("input-1").expect("control");
        assert_eq!(control.attribute("type"), Some("email"));
        assert_eq!(control.attribute("class"), Some("form-control is-invalid"));
        assert_eq!(control.attribute("aria-labelledby"), Some("input-1-label"));
        assert_eq!(control.attribute("aria-describedby"), Some("help-2 validation-3"));
        assert_eq!(control.attribute("aria-required"), Some("true"));
        assert_eq!(control.attribute("aria-invalid"), Some("true"));
        assert!(shadow.by_id("validation-3").expect("feedback").has_class("invalid-feedback"));
        let marker = r#"<span aria-hidden="true" class="text-danger">*</span>"#;
        assert!(handle.shadow_html().contains(marker));
    }

    #[test]
    fn patched_attributes_match_a_fresh_render() {
        let (mut doc, node) = input(&[("label", "Nome")]);
        let mut handle = doc.element::<TextInput>(node).expect("input");
        handle.set_disabled(true);
        handle.set_placeholder("Mario");
        handle.set_input_type(InputType::Search);
        handle.set_aria_label(Some("Nome completo"));
        let patched = handle.shadow_html();
        doc.rerender(node);
        assert_eq!(patched, doc.element::<TextInput>(node).expect("input").shadow_html());
    }

    #[test]
    fn typing_updates_value_and_emits_change() {
        let (mut doc, node) = input(&[("value", "a")]);
        let values = Rc::new(RefCell::new(Vec::new()));
        let log = values.clone();
        doc.add_event_listener(node, "it-form-input-change", move |event| {
            if let EventDetail::Value { value, .. } = event.detail() {
                log.borrow_mut().push(value.clone());
            }
        });
        doc.interact(node, Interaction::Input("abc".to_string())).expect("input");
        assert_eq!(doc.element::<TextInput>(node).expect("input").value(), "abc");
        assert_eq!(*values.borrow(), vec!["abc"]);
        assert_eq!(doc.attribute(node, "value"), Some("a"));

        doc.element::<TextInput>(node).expect("input").set_label("Nuovo");
        assert_eq!(doc.element::<TextInput>(node).expect("input").value(), "abc");
    }

    #[test]
    fn readonly_and_disabled_block_entry() {
        for flag in ["readonly", "disabled"] {
            let (mut doc, node) = input(&[(flag, "")]);
            let count = Rc::new(RefCell::new(0));
            let seen = count.clone();
            doc.add_event_listener(node, "it-form-input-change", move |_| *seen.borrow_mut() += 1);
            doc.interact(node, Interaction::Input("x".to_string())).expect("input");
            assert_eq!(*count.borrow(), 0);
            assert_eq!(doc.element::<TextInput>(node).expect("input").value(), "");
        }
    }

    #[test]
    fn value_setter_updates_live_control() {
        let (mut doc, node) = input(&[]);
        let mut handle = doc.element::<TextInput>(node).expect("input");
        handle.set_value("ciao");
        assert_eq!(handle.value(), "ciao");
        assert_eq!(handle.attribute("value"), Some("ciao"));
    }

    #[test]
    fn validity_follows_constraints() {
        let (mut doc, node) = input(&[("type", "email"), ("required", "")]);
        let mut handle = doc.element::<TextInput>(node).expect("input");
        assert!(handle.validity().expect("validity").value_missing);
        handle.set_value("non-una-mail");
        assert!(handle.validity().expect("validity").type_mismatch);
        handle.set_value("nome@example.it");
        assert!(handle.check_validity());
        handle.set_custom_validity("Dominio non ammesso");
        assert!(!handle.check_validity());
    }

    #[test]
    fn report_validity_announces_message() {
        let (mut doc, node) =
            input(&[("required", ""), ("validation-message", "Campo obbligatorio")]);
        assert!(!doc.element::<TextInput>(node).expect("input").report_validity());
        let messages: Vec<_> = doc
            .announcements()
            .iter()
            .map(|announcement| announcement.message.clone())
            .collect();
        assert_eq!(messages, vec!["Campo obbligatorio"]);
    }

    #[test]
    fn validation_round_trips_through_attribute() {
        let (mut doc, node) = input(&[]);
        let mut handle = doc.element::<TextInput>(node).expect("input");
        handle.set_validation(Validation::Valid);
        assert_eq!(handle.attribute("validation"), Some("valid"));
        handle.set_validation(Validation::Unset);
        assert!(!handle.has_attribute("validation"));
        assert_eq!(handle.validation(), Validation::Unset);
    }

    #[test]
    fn named_inputs_submit_their_value() {
        let (mut doc, node) = input(&[("name", "città"), ("value", "Roma")]);
        assert_eq!(doc.form_entries(node), vec![FormEntry::text("città", "Roma")]);
    }
}
