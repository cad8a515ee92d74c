//! `it-form-group`: container that aggregates the validation state of its form controls.

use leptos::logging::warn;

use crate::attributes::{self, AttributeSpec, Update};
use crate::document::Document;
use crate::element::{
    optional_properties, text_properties, token_properties, Component, Effect, ElementRef, Host,
    IdAllocator,
};
use crate::events::{event_name, Event, EventKind};
use crate::markup::MarkupElement;
use crate::model::{FormEntry, GroupLayout, NodeId, Validation};
use crate::registry::FORM_CONTROL_TAGS;
use crate::styles::{style_block, HostDisplay};

use super::field::{FieldIds, FieldState};
use super::{Checkbox, FileInput, Radio, Select, TextArea, TextInput, Toggle};

/// Aggregate of descendant validation states, evaluated in order: any `invalid` wins; all
/// set (and at least one present) is `valid`; anything else, including no descendants, is unset.
pub fn aggregate(states: impl IntoIterator<Item = Validation>) -> Validation {
    let mut seen = false;
    let mut all_set = true;
    for state in states {
        match state {
            Validation::Invalid => return Validation::Invalid,
            Validation::Valid => seen = true,
            Validation::Unset => all_set = false,
        }
    }
    if seen && all_set {
        Validation::Valid
    } else {
        Validation::Unset
    }
}

/// State of one `it-form-group`.
#[derive(Debug, Clone)]
pub struct FormGroup {
    ids: FieldIds,
    content_id: String,
    field: FieldState,
    layout: GroupLayout,
    role: Option<String>,
}

impl FormGroup {
    fn aggregate_effects(&self, host: &Host<'_>) -> Vec<Effect> {
        let document = host.document();
        let node = host.node();
        let validation = aggregate(
            document
                .query_all(node, &FORM_CONTROL_TAGS)
                .into_iter()
                .map(|control| document.attribute(control, "validation"))
                .map(Validation::from_attribute),
        );
        let config = host.config();
        let message = match validation {
            Validation::Invalid => config.group_invalid_message.as_str(),
            Validation::Valid => config.group_valid_message.as_str(),
            Validation::Unset => "",
        };

        let mut effects = vec![
            Effect::attribute(node, "validation", validation.token()),
            Effect::attribute(
                node,
                "validation-message",
                Some(message).filter(|message| !message.is_empty()),
            ),
        ];
        if validation != self.field.validation && !message.is_empty() {
            effects.push(Effect::Announce(message.to_string()));
        }
        effects
    }
}

impl Component for FormGroup {
    const TAG: &'static str = "it-form-group";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[&[
        AttributeSpec {
            name: "label",
            update: Update::Render,
            apply: |state, raw| state.field.label = attributes::text(raw),
        },
        AttributeSpec {
            name: "help-text",
            update: Update::Render,
            apply: |state, raw| state.field.help_text = attributes::text(raw),
        },
        AttributeSpec {
            name: "validation",
            update: Update::Render,
            apply: |state, raw| state.field.validation = Validation::from_attribute(raw),
        },
        AttributeSpec {
            name: "validation-message",
            update: Update::Render,
            apply: |state, raw| state.field.validation_message = attributes::text(raw),
        },
        AttributeSpec {
            name: "layout",
            update: Update::Patch,
            apply: |state, raw| state.layout = attributes::token("layout", raw),
        },
        AttributeSpec {
            name: "role",
            update: Update::Accessibility,
            apply: |state, raw| state.role = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-label",
            update: Update::Accessibility,
            apply: |state, raw| state.field.aria_label = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-describedby",
            update: Update::Accessibility,
            apply: |state, raw| state.field.aria_describedby = attributes::optional(raw),
        },
    ]];

    fn new(ids: &mut IdAllocator) -> Self {
        let ids = FieldIds::new(ids, "group");
        Self {
            content_id: format!("{}-content", ids.control),
            ids,
            field: FieldState::default(),
            layout: GroupLayout::default(),
            role: None,
        }
    }

    fn control_id(&self) -> &str {
        &self.content_id
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        let label = (!self.field.label.is_empty()).then(|| {
            MarkupElement::new("div")
                .attr("id", self.ids.label())
                .classes(["group-label"])
                .text(self.field.label.as_str())
        });
        MarkupElement::fragment().child(style_block(HostDisplay::Block)).child(
            MarkupElement::new("div")
                .attr("id", self.ids.control.as_str())
                .classes(self.field.control_classes("form-group"))
                .child_opt(label)
                .child(self.control(host))
                .child_opt(self.field.help_element(&self.ids))
                .child_opt(self.field.feedback_element(&self.ids)),
        )
    }

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        let horizontal = match self.layout {
            GroupLayout::Horizontal => "horizontal",
            GroupLayout::Vertical => "",
        };
        MarkupElement::new("div")
            .attr("id", self.content_id.as_str())
            .classes(["group-content", horizontal])
            .child(MarkupElement::new("slot"))
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        let Some(group) = tree.by_id_mut(&self.ids.control) else {
            return;
        };
        let labelled_by = (!self.field.label.is_empty()).then(|| self.ids.label());
        group.set_attribute("role", self.role.as_deref().unwrap_or("group"));
        group.set_or_remove("aria-labelledby", labelled_by.as_deref());
        group.set_or_remove("aria-describedby", self.field.described_by(&self.ids).as_deref());
        group.set_or_remove("aria-label", self.field.aria_label.as_deref());
    }

    fn on_event(&mut self, host: &Host<'_>, event: &Event) -> Vec<Effect> {
        let aggregates = FORM_CONTROL_TAGS
            .iter()
            .any(|tag| event.name() == event_name(tag, EventKind::Change));
        if !aggregates {
            return Vec::new();
        }
        self.aggregate_effects(host)
    }

    fn focusable(&self) -> bool {
        false
    }
}

text_properties!(FormGroup {
    label / set_label => "label" : |state| state.field.label.clone();
    help_text / set_help_text => "help-text" : |state| state.field.help_text.clone();
    validation_message / set_validation_message => "validation-message" : |state| state.field.validation_message.clone();
});

optional_properties!(FormGroup {
    role / set_role => "role" : |state| state.role.clone();
    aria_label / set_aria_label => "aria-label" : |state| state.field.aria_label.clone();
    aria_describedby / set_aria_describedby => "aria-describedby" : |state| state.field.aria_describedby.clone();
});

token_properties!(FormGroup {
    layout / set_layout => "layout" : GroupLayout : |state| state.layout;
});

fn reset_control(document: &mut Document, node: NodeId) {
    let tag = document.tag(node).unwrap_or_default().to_string();
    match tag.as_str() {
        TextInput::TAG => {
            if let Ok(mut input) = document.element::<TextInput>(node) {
                input.set_value("");
            }
        }
        TextArea::TAG => {
            if let Ok(mut textarea) = document.element::<TextArea>(node) {
                textarea.set_value("");
            }
        }
        Select::TAG => {
            if let Ok(mut select) = document.element::<Select>(node) {
                select.set_value("");
            }
        }
        Checkbox::TAG => {
            if let Ok(mut checkbox) = document.element::<Checkbox>(node) {
                checkbox.set_checked(false);
                checkbox.set_indeterminate(false);
            }
        }
        Radio::TAG => {
            if let Ok(mut radio) = document.element::<Radio>(node) {
                radio.set_checked(false);
            }
        }
        Toggle::TAG => {
            if let Ok(mut toggle) = document.element::<Toggle>(node) {
                toggle.set_checked(false);
            }
        }
        FileInput::TAG => {
            if let Ok(mut file) = document.element::<FileInput>(node) {
                file.clear_files();
            }
        }
        _ => return,
    }
    clear_validation(document, node);
}

fn clear_validation(document: &mut Document, node: NodeId) {
    for name in ["validation", "validation-message"] {
        if let Err(err) = document.remove_attribute(node, name) {
            warn!("failed to clear `{name}` on {node}: {err}");
        }
    }
}

impl ElementRef<'_, FormGroup> {
    /// `validation` property.
    pub fn validation(&self) -> Validation {
        self.read(|state, _| state.field.validation)
    }

    /// Sets `validation`, removing the attribute for [`Validation::Unset`].
    pub fn set_validation(&mut self, validation: Validation) {
        self.set_optional("validation", validation.token());
    }

    /// Descendant form controls in tree order.
    pub fn controls(&self) -> Vec<NodeId> {
        self.document().query_all(self.node(), &FORM_CONTROL_TAGS)
    }

    /// Recomputes the aggregate from the current descendant states.
    pub fn refresh(&mut self) {
        let node = self.node();
        let effects = self
            .state()
            .map(|state| state.aggregate_effects(&Host::new(self.document(), node)))
            .unwrap_or_default();
        self.document_mut().apply(effects);
    }

    /// Checks every descendant without stopping at the first failure, then recomputes the
    /// aggregate. Returns whether all of them are valid.
    pub fn validate(&mut self) -> bool {
        let results: Vec<bool> = self
            .controls()
            .into_iter()
            .map(|control| self.document().check_validity(control))
            .collect();
        self.refresh();
        results.into_iter().all(|valid| valid)
    }

    /// Empties values, unchecks, clears files and validation on every descendant, then clears
    /// the aggregate.
    pub fn reset(&mut self) {
        for control in self.controls() {
            reset_control(self.document_mut(), control);
        }
        let node = self.node();
        clear_validation(self.document_mut(), node);
    }

    /// Submission payload of the named descendants, in tree order.
    pub fn form_data(&self) -> Vec<FormEntry> {
        self.controls()
            .into_iter()
            .flat_map(|control| self.document().form_entries(control))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::element::Interaction;
    use crate::model::FileDescriptor;
    use crate::registry::ElementRegistry;

    use super::*;

    fn group(children: &[(&str, &[(&str, &str)])]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let group = doc
            .append_element(body, FormGroup::TAG, &[("label", "Anagrafica")])
            .expect("group");
        let nodes = children
            .iter()
            .map(|(tag, attributes)| doc.append_element(group, tag, attributes).expect("child"))
            .collect();
        (doc, group, nodes)
    }

    #[test]
    fn aggregation_rule_is_ordered() {
        use Validation::{Invalid, Unset, Valid};
        assert_eq!(aggregate([Invalid, Valid]), Invalid);
        assert_eq!(aggregate([Valid, Valid]), Valid);
        assert_eq!(aggregate([Unset, Valid]), Unset);
        assert_eq!(aggregate([Valid, Unset, Invalid]), Invalid);
        assert_eq!(aggregate([]), Unset);
    }

    #[test]
    fn child_change_recomputes_and_announces() {
        let (mut doc, group, nodes) = group(&[
            (TextInput::TAG, &[("validation", "invalid")]),
            (TextInput::TAG, &[("validation", "valid")]),
        ]);
        doc.interact(nodes[1], Interaction::Input("x".to_string()))
            .expect("input");
        assert_eq!(doc.attribute(group, "validation"), Some("invalid"));
        assert_eq!(
            doc.attribute(group, "validation-message"),
            Some("Alcuni campi contengono errori")
        );
        let html = doc.element::<FormGroup>(group).expect("group").shadow_html();
        assert!(html.contains(r#"class="form-group is-invalid""#));
        assert!(html.contains("invalid-feedback"));
        assert_eq!(
            doc.announcements().last().map(|a| a.message.as_str()),
            Some("Alcuni campi contengono errori")
        );

        doc.set_attribute(nodes[0], "validation", "valid").expect("valid");
        doc.interact(nodes[0], Interaction::Input("y".to_string()))
            .expect("input");
        assert_eq!(doc.attribute(group, "validation"), Some("valid"));
        assert_eq!(
            doc.attribute(group, "validation-message"),
            Some("Tutti i campi sono validi")
        );

        doc.remove_attribute(nodes[0], "validation").expect("unset");
        doc.interact(nodes[0], Interaction::Input("z".to_string()))
            .expect("input");
        assert!(!doc.has_attribute(group, "validation"));
        assert!(!doc.has_attribute(group, "validation-message"));
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let (mut doc, group, nodes) = group(&[(TextInput::TAG, &[("validation", "valid")])]);
        doc.focus(nodes[0]).expect("focus");
        assert!(!doc.has_attribute(group, "validation"));
    }

    #[test]
    fn validate_checks_every_control() {
        let (mut doc, group, nodes) = group(&[
            (TextInput::TAG, &[("required", "")]),
            (Checkbox::TAG, &[("required", "")]),
        ]);
        assert!(!doc.element::<FormGroup>(group).expect("group").validate());
        doc.element::<TextInput>(nodes[0]).expect("input").set_value("Mario");
        assert!(!doc.element::<FormGroup>(group).expect("group").validate());
        doc.element::<Checkbox>(nodes[1]).expect("checkbox").set_checked(true);
        assert!(doc.element::<FormGroup>(group).expect("group").validate());
    }

    #[test]
    fn form_data_follows_submission_rules() {
        let (mut doc, group, nodes) = group(&[
            (TextInput::TAG, &[("name", "nome"), ("value", "Ada")]),
            (TextInput::TAG, &[("value", "senza nome")]),
            (Checkbox::TAG, &[("name", "privacy"), ("checked", "")]),
            (Checkbox::TAG, &[("name", "newsletter")]),
            (FileInput::TAG, &[("name", "allegati"), ("multiple", "")]),
        ]);
        let files = vec![FileDescriptor::new("a.pdf", 10), FileDescriptor::new("b.pdf", 20)];
        doc.interact(nodes[4], Interaction::Files(files.clone()))
            .expect("files");
        let data = doc.element::<FormGroup>(group).expect("group").form_data();
        assert_eq!(
            data,
            vec![
                FormEntry::text("nome", "Ada"),
                FormEntry::text("privacy", "on"),
                FormEntry::file("allegati", files[0].clone()),
                FormEntry::file("allegati", files[1].clone()),
            ]
        );
    }

    #[test]
    fn reset_clears_every_control_and_the_aggregate() {
        let (mut doc, group, nodes) = group(&[
            (TextInput::TAG, &[("value", "Ada"), ("validation", "valid")]),
            (Toggle::TAG, &[("checked", ""), ("validation", "valid")]),
            (FileInput::TAG, &[("validation", "valid")]),
        ]);
        doc.interact(nodes[2], Interaction::Files(vec![FileDescriptor::new("a.pdf", 1)]))
            .expect("files");
        doc.element::<FormGroup>(group).expect("group").refresh();
        assert_eq!(doc.attribute(group, "validation"), Some("valid"));

        doc.element::<FormGroup>(group).expect("group").reset();
        assert_eq!(doc.element::<TextInput>(nodes[0]).expect("input").value(), "");
        assert!(!doc.element::<Toggle>(nodes[1]).expect("toggle").checked());
        assert!(doc.element::<FileInput>(nodes[2]).expect("file").files().is_empty());
        for node in &nodes {
            assert!(!doc.has_attribute(*node, "validation"));
        }
        assert!(!doc.has_attribute(group, "validation"));
        assert_eq!(
            doc.element::<FormGroup>(group).expect("group").validation(),
            Validation::Unset
        );
    }

    #[test]
    fn layout_patch_matches_render() {
        let (mut doc, group, _) = group(&[]);
        let mut handle = doc.element::<FormGroup>(group).expect("group");
        handle.set_layout(GroupLayout::Horizontal);
        assert_eq!(handle.attribute("layout"), Some("horizontal"));
        let patched = handle.shadow_html();
        assert!(patched.contains(r#"class="group-content horizontal""#));
        doc.rerender(group);
        assert_eq!(patched, doc.element::<FormGroup>(group).expect("group").shadow_html());
    }

    #[test]
    fn renders_role_and_label_link() {
        let (mut doc, group, _) = group(&[]);
        let handle = doc.element::<FormGroup>(group).expect("group");
        let shadow = handle.shadow().expect("shadow");
        let outer = shadow.by_id("group-1").expect("group");
        assert_eq!(outer.attribute("role"), Some("group"));
        assert_eq!(outer.attribute("aria-labelledby"), Some("group-1-label"));
        assert!(shadow.by_id("group-1-content").expect("content").by_tag("slot").is_some());
    }
}
