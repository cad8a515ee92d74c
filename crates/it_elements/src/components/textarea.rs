//! `it-form-textarea`: labelled multi-line text control.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, text_properties, Component, Effect, ElementRef, Host, IdAllocator,
    Interaction,
};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::FormEntry;
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::field::{field_attributes, value_interaction, FieldIds, FieldState, HasField, HasValue};

/// Rows rendered when `rows` is absent or invalid.
pub const DEFAULT_ROWS: u32 = 3;

/// State of one `it-form-textarea`.
#[derive(Debug, Clone)]
pub struct TextArea {
    ids: FieldIds,
    field: FieldState,
    placeholder: String,
    value: String,
    readonly: bool,
    rows: u32,
    cols: Option<u32>,
    min_length: Option<u32>,
    max_length: Option<u32>,
}

impl HasField for TextArea {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl HasValue for TextArea {
    fn value_state(&self) -> &str {
        &self.value
    }
}

impl Component for TextArea {
    const TAG: &'static str = "it-form-textarea";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[
        field_attributes!(TextArea),
        &[
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
                name: "rows",
                update: Update::Patch,
                apply: |state, raw| state.rows = attributes::number(raw).unwrap_or(DEFAULT_ROWS),
            },
            AttributeSpec {
                name: "cols",
                update: Update::Patch,
                apply: |state, raw| state.cols = attributes::number(raw),
            },
            AttributeSpec {
                name: "minlength",
                update: Update::Patch,
                apply: |state, raw| state.min_length = attributes::number(raw),
            },
            AttributeSpec {
                name: "maxlength",
                update: Update::Patch,
                apply: |state, raw| state.max_length = attributes::number(raw),
            },
        ],
    ];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "textarea"),
            field: FieldState::default(),
            placeholder: String::new(),
            value: String::new(),
            readonly: false,
            rows: DEFAULT_ROWS,
            cols: None,
            min_length: None,
            max_length: None,
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
        MarkupElement::new("textarea")
            .attr("id", self.ids.control.as_str())
            .classes(self.field.control_classes("form-control"))
            .attr("rows", self.rows.to_string())
            .attr_opt("cols", self.cols.map(|cols| cols.to_string()))
            .attr_opt(
                "placeholder",
                Some(self.placeholder.as_str()).filter(|value| !value.is_empty()),
            )
            .attr_opt("minlength", self.min_length.map(|length| length.to_string()))
            .attr_opt("maxlength", self.max_length.map(|length| length.to_string()))
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .flag("readonly", self.readonly)
            .attr_opt("name", self.field.name.as_deref())
            .text(self.value.as_str())
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
            min_length: self.min_length,
            max_length: self.max_length,
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(ControlKind::TextArea, &constraints))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        self.field
            .name
            .iter()
            .map(|name| FormEntry::text(name, &live.value))
            .collect()
    }
}

text_properties!(TextArea {
    placeholder / set_placeholder => "placeholder" : |state| state.placeholder.clone();
});

flag_properties!(TextArea {
    readonly / set_readonly => "readonly" : |state| state.readonly;
});

impl ElementRef<'_, TextArea> {
    /// `rows` property.
    pub fn rows(&self) -> u32 {
        self.read(|state, _| state.rows)
    }

    /// Sets `rows`.
    pub fn set_rows(&mut self, rows: u32) {
        self.set_text("rows", &rows.to_string());
    }

    /// `cols` property.
    pub fn cols(&self) -> Option<u32> {
        self.read(|state, _| state.cols)
    }

    /// Sets or removes `cols`.
    pub fn set_cols(&mut self, cols: Option<u32>) {
        self.set_optional("cols", cols.map(|cols| cols.to_string()).as_deref());
    }

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
    use pretty_assertions::assert_eq;

    use crate::document::Document;
    use crate::model::NodeId;
    use crate::registry::ElementRegistry;

    use super::*;

    fn textarea(attributes: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let node = doc
            .append_element(body, TextArea::TAG, attributes)
            .expect("textarea");
        (doc, node)
    }

    #[test]
    fn rows_default_and_coerce() {
        let (mut doc, node) = textarea(&[("rows", "zero")]);
        let mut handle = doc.element::<TextArea>(node).expect("textarea");
        assert_eq!(handle.rows(), DEFAULT_ROWS);
        handle.set_rows(8);
        assert!(handle.shadow_html().contains(r#"rows="8""#));
    }

    #[test]
    fn value_renders_as_escaped_text() {
        let (mut doc, node) = textarea(&[("value", "<b>ciao</b>")]);
        let html = doc.element::<TextArea>(node).expect("textarea").shadow_html();
        assert!(html.contains("&lt;b&gt;ciao&lt;/b&gt;</textarea>"));
    }

    #[test]
    fn length_limits_drive_validity() {
        let (mut doc, node) = textarea(&[("minlength", "5"), ("maxlength", "10")]);
        let mut handle = doc.element::<TextArea>(node).expect("textarea");
        assert!(handle.check_validity());
        handle.set_value("abc");
        assert!(handle.validity().expect("validity").too_short);
        handle.set_value("abcdefghijkl");
        assert!(handle.validity().expect("validity").too_long);
        handle.set_value("abcdef");
        assert!(handle.check_validity());
    }

    #[test]
    fn entered_text_is_submitted() {
        let (mut doc, node) = textarea(&[("name", "note")]);
        doc.interact(node, Interaction::Input("riga uno\nriga due".to_string()))
            .expect("input");
        assert_eq!(
            doc.form_entries(node),
            vec![FormEntry::text("note", "riga uno\nriga due")]
        );
    }
}
