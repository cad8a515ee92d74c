//! State, markup and property surface shared by every form control.

use crate::attributes;
use crate::element::{Component, Effect, ElementRef, Host, IdAllocator, Interaction};
use crate::events::{Event, EventDetail, EventKind};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{NodeId, Validation};
use crate::styles::{style_block, HostDisplay};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Stable accessibility identifiers of one form control.
pub struct FieldIds {
    /// Internal control id.
    pub control: String,
    /// Help text id.
    pub help: String,
    /// Validation feedback id.
    pub validation: String,
}

impl FieldIds {
    /// Allocates the control, help and validation ids.
    pub fn new(ids: &mut IdAllocator, prefix: &str) -> Self {
        Self {
            control: ids.allocate(prefix),
            help: ids.allocate("help"),
            validation: ids.allocate("validation"),
        }
    }

    /// Label id, derived from the control id.
    pub fn label(&self) -> String {
        format!("{}-label", self.control)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Attributes every form control observes.
pub struct FieldState {
    /// Visible label.
    pub label: String,
    /// `required` flag.
    pub required: bool,
    /// `disabled` flag.
    pub disabled: bool,
    /// Tri-state validation.
    pub validation: Validation,
    /// Feedback message shown while validation is set.
    pub validation_message: String,
    /// Help text.
    pub help_text: String,
    /// Submission name.
    pub name: Option<String>,
    /// Consumer `aria-label`.
    pub aria_label: Option<String>,
    /// Consumer `aria-describedby` ids, merged after the computed ones.
    pub aria_describedby: Option<String>,
}

/// Access to the shared field state of a component.
pub trait HasField {
    /// Shared field state.
    fn field_state(&self) -> &FieldState;
    /// Mutable shared field state.
    fn field_state_mut(&mut self) -> &mut FieldState;
}

macro_rules! field_apply {
    ($($name:ident => |$field:ident, $raw:ident| $body:expr;)+) => {
        $(
            #[doc = concat!("Applies the field attribute handled by `", stringify!($name), "`.")]
            pub fn $name<S: HasField>(state: &mut S, $raw: Option<&str>) {
                let $field = state.field_state_mut();
                $body;
            }
        )+
    };
}

field_apply! {
    apply_label => |field, raw| field.label = attributes::text(raw);
    apply_required => |field, raw| field.required = attributes::flag(raw);
    apply_disabled => |field, raw| field.disabled = attributes::flag(raw);
    apply_validation => |field, raw| field.validation = Validation::from_attribute(raw);
    apply_validation_message => |field, raw| field.validation_message = attributes::text(raw);
    apply_help_text => |field, raw| field.help_text = attributes::text(raw);
    apply_name => |field, raw| field.name = attributes::optional(raw);
    apply_aria_label => |field, raw| field.aria_label = attributes::optional(raw);
    apply_aria_describedby => |field, raw| field.aria_describedby = attributes::optional(raw);
}

/// Attribute table of the shared field attributes for component `$component`.
macro_rules! field_attributes {
    ($component:ty) => {
        &[
            $crate::attributes::AttributeSpec {
                name: "label",
                update: $crate::attributes::Update::Render,
                apply: $crate::components::field::apply_label::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "required",
                update: $crate::attributes::Update::Render,
                apply: $crate::components::field::apply_required::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "disabled",
                update: $crate::attributes::Update::Patch,
                apply: $crate::components::field::apply_disabled::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "validation",
                update: $crate::attributes::Update::Render,
                apply: $crate::components::field::apply_validation::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "validation-message",
                update: $crate::attributes::Update::Render,
                apply: $crate::components::field::apply_validation_message::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "help-text",
                update: $crate::attributes::Update::Render,
                apply: $crate::components::field::apply_help_text::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "name",
                update: $crate::attributes::Update::Patch,
                apply: $crate::components::field::apply_name::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "aria-label",
                update: $crate::attributes::Update::Accessibility,
                apply: $crate::components::field::apply_aria_label::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "aria-describedby",
                update: $crate::attributes::Update::Accessibility,
                apply: $crate::components::field::apply_aria_describedby::<$component>,
            },
        ]
    };
}

pub(crate) use field_attributes;

impl FieldState {
    /// Whether validation feedback is rendered: a state is set and the message is non-empty.
    pub fn shows_feedback(&self) -> bool {
        self.validation.is_set() && !self.validation_message.is_empty()
    }

    /// `base` plus the validation class, if any.
    pub fn control_classes(&self, base: &'static str) -> [&'static str; 2] {
        [base, self.validation.control_class().unwrap_or_default()]
    }

    /// `<label>` with the required marker, when a label is set.
    pub fn label_element(
        &self,
        ids: &FieldIds,
        class: &'static str,
        marker: &str,
    ) -> Option<MarkupElement> {
        if self.label.is_empty() {
            return None;
        }
        Some(
            MarkupElement::new("label")
                .attr("for", ids.control.as_str())
                .attr("id", ids.label())
                .classes([class])
                .text(self.label.as_str())
                .child_opt(self.required_marker("text-danger", marker)),
        )
    }

    /// Required marker span.
    pub fn required_marker(&self, class: &'static str, marker: &str) -> Option<MarkupElement> {
        self.required.then(|| {
            MarkupElement::new("span")
                .classes([class])
                .attr("aria-hidden", "true")
                .text(marker)
        })
    }

    /// Help text block, when help text is set.
    pub fn help_element(&self, ids: &FieldIds) -> Option<MarkupElement> {
        (!self.help_text.is_empty()).then(|| {
            MarkupElement::new("div")
                .attr("id", ids.help.as_str())
                .classes(["form-text"])
                .text(self.help_text.as_str())
        })
    }

    /// Validation feedback block, when [`FieldState::shows_feedback`].
    pub fn feedback_element(&self, ids: &FieldIds) -> Option<MarkupElement> {
        self.shows_feedback().then(|| {
            MarkupElement::new("div")
                .attr("id", ids.validation.as_str())
                .classes([self.validation.feedback_class()])
                .text(self.validation_message.as_str())
        })
    }

    /// `aria-describedby` value: help and feedback ids present in the fragment, then consumer ids.
    pub fn described_by(&self, ids: &FieldIds) -> Option<String> {
        let mut tokens: Vec<&str> = Vec::new();
        if !self.help_text.is_empty() {
            tokens.push(&ids.help);
        }
        if self.shows_feedback() {
            tokens.push(&ids.validation);
        }
        for token in self
            .aria_describedby
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
        {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        (!tokens.is_empty()).then(|| tokens.join(" "))
    }

    /// Applies label association, description, required, invalid and consumer label.
    pub fn apply_aria(
        &self,
        ids: &FieldIds,
        labelled_by: Option<String>,
        control: &mut MarkupElement,
    ) {
        control.set_or_remove("aria-labelledby", labelled_by.as_deref());
        control.set_or_remove("aria-describedby", self.described_by(ids).as_deref());
        control.set_or_remove("aria-required", self.required.then_some("true"));
        control.set_or_remove("aria-invalid", self.validation.aria_invalid());
        control.set_or_remove("aria-label", self.aria_label.as_deref());
    }

    /// Finds the control in `tree` and applies [`FieldState::apply_aria`], linking the label
    /// when one is rendered.
    pub fn accessibility(&self, ids: &FieldIds, tree: &mut MarkupElement) {
        let labelled_by = (!self.label.is_empty()).then(|| ids.label());
        if let Some(control) = tree.by_id_mut(&ids.control) {
            self.apply_aria(ids, labelled_by, control);
        }
    }

    /// Standard field fragment: label, control, extra blocks, help, feedback.
    pub fn fragment(
        &self,
        ids: &FieldIds,
        container_class: &'static str,
        label: Option<MarkupElement>,
        control: MarkupElement,
        extra: Option<MarkupElement>,
    ) -> MarkupElement {
        MarkupElement::fragment().child(style_block(HostDisplay::Block)).child(
            MarkupElement::new("div")
                .classes([container_class])
                .child_opt(label)
                .child(control)
                .child_opt(extra)
                .child_opt(self.help_element(ids))
                .child_opt(self.feedback_element(ids)),
        )
    }
}

/// Value entry, focus and blur on text-like controls and selects. Blocked controls ignore entry.
pub fn value_interaction(
    tag: &str,
    node: NodeId,
    blocked: bool,
    value: &mut String,
    live: &mut LiveControl,
    interaction: Interaction,
) -> Vec<Effect> {
    let kind = match interaction {
        Interaction::Input(entered) | Interaction::Select(entered) if !blocked => {
            live.value.clone_from(&entered);
            *value = entered;
            EventKind::Change
        }
        Interaction::Focus => EventKind::Focus,
        Interaction::Blur => EventKind::Blur,
        _ => return Vec::new(),
    };
    vec![value_event(tag, kind, &live.value, node)]
}

/// Change, focus or blur event of a text-like control.
pub fn value_event(tag: &str, kind: EventKind, value: &str, node: NodeId) -> Effect {
    Effect::emit(Event::element(
        tag,
        kind,
        EventDetail::Value {
            value: value.to_string(),
            element: node,
        },
    ))
}

/// Access to the in-memory value of text-like controls and selects.
pub trait HasValue {
    /// Value mirrored from the `value` attribute.
    fn value_state(&self) -> &str;

    /// Value the live control shows after `requested` is assigned.
    fn shown_value(&self, _host: &Host<'_>, requested: &str) -> String {
        requested.to_string()
    }
}

impl<C: Component + HasField> ElementRef<'_, C> {
    /// `label` property.
    pub fn label(&self) -> String {
        self.read(|state, _| state.field_state().label.clone())
    }

    /// Sets the `label` attribute.
    pub fn set_label(&mut self, value: &str) {
        self.set_text("label", value);
    }

    /// `required` property.
    pub fn required(&self) -> bool {
        self.read(|state, _| state.field_state().required)
    }

    /// Sets or removes `required`.
    pub fn set_required(&mut self, on: bool) {
        self.set_flag("required", on);
    }

    /// `disabled` property.
    pub fn disabled(&self) -> bool {
        self.read(|state, _| state.field_state().disabled)
    }

    /// Sets or removes `disabled`.
    pub fn set_disabled(&mut self, on: bool) {
        self.set_flag("disabled", on);
    }

    /// `validation` property.
    pub fn validation(&self) -> Validation {
        self.read(|state, _| state.field_state().validation)
    }

    /// Sets `validation`, removing the attribute for [`Validation::Unset`].
    pub fn set_validation(&mut self, validation: Validation) {
        self.set_optional("validation", validation.token());
    }

    /// `validation-message` property.
    pub fn validation_message(&self) -> String {
        self.read(|state, _| state.field_state().validation_message.clone())
    }

    /// Sets `validation-message`.
    pub fn set_validation_message(&mut self, value: &str) {
        self.set_text("validation-message", value);
    }

    /// `help-text` property.
    pub fn help_text(&self) -> String {
        self.read(|state, _| state.field_state().help_text.clone())
    }

    /// Sets `help-text`.
    pub fn set_help_text(&mut self, value: &str) {
        self.set_text("help-text", value);
    }

    /// `name` property.
    pub fn name(&self) -> Option<String> {
        self.read(|state, _| state.field_state().name.clone())
    }

    /// Sets or removes `name`.
    pub fn set_name(&mut self, value: Option<&str>) {
        self.set_optional("name", value);
    }

    /// Consumer `aria-label`.
    pub fn aria_label(&self) -> Option<String> {
        self.read(|state, _| state.field_state().aria_label.clone())
    }

    /// Sets or removes `aria-label`.
    pub fn set_aria_label(&mut self, value: Option<&str>) {
        self.set_optional("aria-label", value);
    }

    /// Consumer `aria-describedby` ids.
    pub fn aria_describedby(&self) -> Option<String> {
        self.read(|state, _| state.field_state().aria_describedby.clone())
    }

    /// Sets or removes `aria-describedby`.
    pub fn set_aria_describedby(&mut self, value: Option<&str>) {
        self.set_optional("aria-describedby", value);
    }
}

impl<C: Component + HasValue> ElementRef<'_, C> {
    /// Current value: the live control once rendered, the in-memory value before.
    pub fn value(&self) -> String {
        self.read(|state, live| match live {
            Some(live) => live.value.clone(),
            None => state.value_state().to_string(),
        })
    }

    /// Sets the `value` attribute and the live value.
    pub fn set_value(&mut self, value: &str) {
        self.set_text("value", value);
        let node = self.node();
        let shown = self
            .state()
            .map(|state| state.shown_value(&Host::new(self.document(), node), value));
        if let Some(shown) = shown {
            self.with_live(|live| live.value = shown);
        }
    }
}
