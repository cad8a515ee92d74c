//! `it-form-select`: labelled select whose options come from the host's `<option>` children.

use crate::attributes::{self, AttributeSpec, Update};
use crate::document::Document;
use crate::element::{
    flag_properties, Component, Effect, ElementRef, Host, IdAllocator, Interaction,
};
use crate::error::ElementError;
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{FormEntry, NodeId};
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::field::{field_attributes, value_interaction, FieldIds, FieldState, HasField, HasValue};

const OPTION_TAG: &str = "option";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `<option>` child of a select host.
pub struct SelectOption {
    /// Submitted value; empty when the option has no `value`.
    pub value: String,
    /// Visible text.
    pub text: String,
    /// Initially selected.
    pub selected: bool,
    /// Not selectable.
    pub disabled: bool,
}

impl SelectOption {
    fn markup(&self) -> MarkupElement {
        MarkupElement::new("option")
            .attr("value", self.value.as_str())
            .flag("selected", self.selected)
            .flag("disabled", self.disabled)
            .text(self.text.as_str())
    }
}

/// Options of the select hosted at `node`, in document order.
pub fn host_options(document: &Document, node: NodeId) -> Vec<SelectOption> {
    document
        .children(node)
        .iter()
        .copied()
        .filter(|child| document.tag(*child) == Some(OPTION_TAG))
        .map(|option| SelectOption {
            value: document.attribute(option, "value").unwrap_or_default().to_string(),
            text: document.text_content(option).trim().to_string(),
            selected: document.has_attribute(option, "selected"),
            disabled: document.has_attribute(option, "disabled"),
        })
        .collect()
}

/// State of one `it-form-select`.
#[derive(Debug, Clone)]
pub struct Select {
    ids: FieldIds,
    field: FieldState,
    value: String,
    multiple: bool,
    size: Option<u32>,
}

impl Select {
    /// Value the rendered control shows for `requested`: the requested value when an option
    /// carries it, else the first `selected` option, else the first option of a single select.
    fn resolve_value(&self, requested: &str, options: &[SelectOption]) -> String {
        if !requested.is_empty() && options.iter().any(|option| option.value == requested) {
            return requested.to_string();
        }
        options
            .iter()
            .find(|option| option.selected)
            .or_else(|| options.first().filter(|_| !self.multiple))
            .map(|option| option.value.clone())
            .unwrap_or_default()
    }
}

impl HasField for Select {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl HasValue for Select {
    fn value_state(&self) -> &str {
        &self.value
    }

    fn shown_value(&self, host: &Host<'_>, requested: &str) -> String {
        self.resolve_value(requested, &host_options(host.document(), host.node()))
    }
}

impl Component for Select {
    const TAG: &'static str = "it-form-select";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[
        field_attributes!(Select),
        &[
            AttributeSpec {
                name: "value",
                update: Update::Patch,
                apply: |state, raw| state.value = attributes::text(raw),
            },
            AttributeSpec {
                name: "multiple",
                update: Update::Render,
                apply: |state, raw| state.multiple = attributes::flag(raw),
            },
            AttributeSpec {
                name: "size",
                update: Update::Patch,
                apply: |state, raw| state.size = attributes::number(raw),
            },
        ],
    ];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "select"),
            field: FieldState::default(),
            value: String::new(),
            multiple: false,
            size: None,
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

    fn control(&self, host: &Host<'_>) -> MarkupElement {
        let options = host_options(host.document(), host.node());
        let select = MarkupElement::new("select")
            .attr("id", self.ids.control.as_str())
            .classes(self.field.control_classes("form-control"))
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .flag("multiple", self.multiple)
            .attr_opt("size", self.size.map(|size| size.to_string()))
            .attr_opt("name", self.field.name.as_deref());
        if options.is_empty() {
            return select.child(
                MarkupElement::new("option")
                    .attr("value", "")
                    .text(host.config().select_placeholder.as_str()),
            );
        }
        select.children_from(options.iter().map(SelectOption::markup))
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        self.field.accessibility(&self.ids, tree);
    }

    fn live(&self, host: &Host<'_>) -> LiveControl {
        LiveControl {
            value: self.shown_value(host, &self.value),
            ..LiveControl::default()
        }
    }

    fn adopt_live(&mut self, live: &LiveControl) {
        self.value.clone_from(&live.value);
    }

    fn patch_live(&self, host: &Host<'_>, attribute: &str, live: &mut LiveControl) {
        if attribute == "value" {
            live.value = self.shown_value(host, &self.value);
        }
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        value_interaction(
            Self::TAG,
            host.node(),
            self.field.disabled,
            &mut self.value,
            live,
            interaction,
        )
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
            disabled: self.field.disabled,
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(ControlKind::Select, &constraints))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        self.field
            .name
            .iter()
            .map(|name| FormEntry::text(name, &live.value))
            .collect()
    }
}

flag_properties!(Select {
    multiple / set_multiple => "multiple" : |state| state.multiple;
});

impl ElementRef<'_, Select> {
    /// `size` property.
    pub fn size(&self) -> Option<u32> {
        self.read(|state, _| state.size)
    }

    /// Sets or removes `size`.
    pub fn set_size(&mut self, size: Option<u32>) {
        self.set_optional("size", size.map(|size| size.to_string()).as_deref());
    }

    /// Options currently declared on the host.
    pub fn options(&self) -> Vec<SelectOption> {
        host_options(self.document(), self.node())
    }

    /// Appends an `<option>` child and re-renders; a selected option becomes the value.
    ///
    /// # Errors
    ///
    /// Returns the document error when the host is no longer part of the document.
    pub fn add_option(
        &mut self,
        value: &str,
        text: &str,
        selected: bool,
    ) -> Result<NodeId, ElementError> {
        let node = self.node();
        let document = self.document_mut();
        let option = document.create_element(OPTION_TAG);
        document.set_attribute(option, "value", value)?;
        document.toggle_attribute(option, "selected", selected)?;
        document.append_text(option, text)?;
        document.append_child(node, option)?;
        document.rerender(node);
        if selected {
            self.with_live(|live| live.value = value.to_string());
        }
        Ok(option)
    }

    /// Removes every `<option>` child whose value is `value` and re-renders.
    ///
    /// # Errors
    ///
    /// Returns the document error when an option cannot be detached.
    pub fn remove_option(&mut self, value: &str) -> Result<(), ElementError> {
        self.remove_options(|document, option| {
            document.attribute(option, "value").unwrap_or_default() == value
        })
    }

    /// Removes every `<option>` child and re-renders.
    ///
    /// # Errors
    ///
    /// Returns the document error when an option cannot be detached.
    pub fn clear_options(&mut self) -> Result<(), ElementError> {
        self.remove_options(|_, _| true)
    }

    fn remove_options(
        &mut self,
        matches: impl Fn(&Document, NodeId) -> bool,
    ) -> Result<(), ElementError> {
        let node = self.node();
        let options: Vec<NodeId> = {
            let document = self.document();
            document
                .children(node)
                .iter()
                .copied()
                .filter(|child| {
                    document.tag(*child) == Some(OPTION_TAG) && matches(document, *child)
                })
                .collect()
        };
        let document = self.document_mut();
        for option in options {
            document.remove(option)?;
        }
        document.rerender(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::events::EventDetail;
    use crate::registry::ElementRegistry;

    use super::*;

    fn select(options: &[(&str, &str, bool)], attributes: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let node = doc.create_element(Select::TAG);
        for (name, value) in attributes {
            doc.set_attribute(node, name, value).expect("attribute");
        }
        for (value, text, selected) in options {
            let option = doc
                .append_element(node, "option", &[("value", *value)])
                .expect("option");
            doc.toggle_attribute(option, "selected", *selected).expect("selected");
            doc.append_text(option, text).expect("text");
        }
        doc.append_child(body, node).expect("append");
        (doc, node)
    }

    #[test]
    fn empty_select_renders_placeholder() {
        let (mut doc, node) = select(&[], &[]);
        let html = doc.element::<Select>(node).expect("select").shadow_html();
        assert!(html.contains("<option value>Seleziona un'opzione...</option>"));
    }

    #[test]
    fn value_resolves_against_options() {
        let (mut doc, node) = select(&[("rm", "Roma", false), ("mi", "Milano", true)], &[]);
        let mut handle = doc.element::<Select>(node).expect("select");
        assert_eq!(handle.value(), "mi");
        handle.set_value("rm");
        assert_eq!(handle.value(), "rm");
        handle.set_value("na");
        assert_eq!(handle.value(), "mi");
    }

    #[test]
    fn options_are_managed_through_host_children() {
        let (mut doc, node) = select(&[("rm", "Roma", false)], &[]);
        let mut handle = doc.element::<Select>(node).expect("select");
        handle.add_option("to", "Torino", true).expect("add");
        assert_eq!(handle.value(), "to");
        assert!(handle.shadow_html().contains("Torino"));

        handle.remove_option("rm").expect("remove");
        let values: Vec<_> = handle.options().into_iter().map(|option| option.value).collect();
        assert_eq!(values, vec!["to"]);

        handle.clear_options().expect("clear");
        assert!(handle.options().is_empty());
        assert!(handle.shadow_html().contains("Seleziona"));
    }

    #[test]
    fn choosing_emits_change() {
        let (mut doc, node) =
            select(&[("a", "A", false), ("b", "B", false)], &[("name", "scelta")]);
        let details = Rc::new(RefCell::new(Vec::new()));
        let log = details.clone();
        doc.add_event_listener(node, "it-form-select-change", move |event| {
            log.borrow_mut().push(event.detail().clone());
        });
        doc.interact(node, Interaction::Select("b".to_string())).expect("select");
        assert_eq!(
            *details.borrow(),
            vec![EventDetail::Value {
                value: "b".to_string(),
                element: node,
            }]
        );
        assert_eq!(doc.form_entries(node), vec![FormEntry::text("scelta", "b")]);
    }

    #[test]
    fn required_placeholder_is_missing() {
        let (mut doc, node) = select(&[], &[("required", "")]);
        assert!(!doc.element::<Select>(node).expect("select").check_validity());
    }
}
