//! `it-button`: design-system button with variants, sizes, icon and loading state.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, optional_properties, token_properties, Component, Effect, ElementRef, Host,
    IdAllocator, Interaction,
};
use crate::events::{Event, EventDetail, EventKind};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{
    ButtonKind, ButtonSize, ButtonVariant, IconPosition, NativeButtonType, NodeId, Token,
};
use crate::styles::{style_block, HostDisplay};

/// State of one `it-button`.
#[derive(Debug, Clone)]
pub struct Button {
    id: String,
    kind: ButtonKind,
    size: Option<ButtonSize>,
    variant: Option<ButtonVariant>,
    disabled: bool,
    loading: bool,
    icon: Option<String>,
    icon_position: IconPosition,
    button_type: NativeButtonType,
    aria_label: Option<String>,
    aria_describedby: Option<String>,
    title: Option<String>,
}

impl Button {
    /// Contextual type.
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Fill variant.
    pub fn variant(&self) -> Option<ButtonVariant> {
        self.variant
    }

    /// Whether activation is blocked.
    pub fn is_inert(&self) -> bool {
        self.disabled || self.loading
    }

    fn classes(&self) -> Vec<String> {
        let mut classes = vec!["btn".to_string()];
        classes.push(match self.variant {
            Some(ButtonVariant::Outline) => format!("btn-outline-{}", self.kind.token()),
            Some(ButtonVariant::Ghost) => format!("btn-ghost-{}", self.kind.token()),
            None => format!("btn-{}", self.kind.token()),
        });
        if let Some(size) = self.size {
            classes.push(format!("btn-{}", size.token()));
        }
        classes
    }

    fn content(&self, text: &str) -> Vec<MarkupElement> {
        let mut content = Vec::new();
        if self.loading {
            content.push(
                MarkupElement::new("span")
                    .classes(["spinner-border", "spinner-border-sm", "me-2"])
                    .attr("role", "status")
                    .attr("aria-hidden", "true"),
            );
        }
        let icon = self.icon.as_deref().filter(|_| !self.loading).map(|icon| {
            MarkupElement::new("i")
                .attr("class", icon)
                .attr("aria-hidden", "true")
        });
        let label = |class: &'static str| {
            (!text.is_empty()).then(|| MarkupElement::new("span").classes([class]).text(text))
        };
        match (icon, self.icon_position) {
            (Some(icon), IconPosition::Left) => {
                content.push(icon);
                content.extend(label("ms-2"));
            }
            (Some(icon), IconPosition::Right) => {
                content.extend(label("me-2"));
                content.push(icon);
            }
            (None, _) => content.extend(label("")),
        }
        content
    }

    fn event(&self, kind: EventKind, node: NodeId) -> Effect {
        let detail = match kind {
            EventKind::Click => EventDetail::Button {
                kind: self.kind,
                variant: self.variant,
                element: node,
            },
            _ => EventDetail::Element { element: node },
        };
        Effect::emit(Event::element(Self::TAG, kind, detail))
    }
}

impl Component for Button {
    const TAG: &'static str = "it-button";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[&[
        AttributeSpec {
            name: "type",
            update: Update::Render,
            apply: |state, raw| state.kind = attributes::token("type", raw),
        },
        AttributeSpec {
            name: "size",
            update: Update::Render,
            apply: |state, raw| state.size = attributes::optional_token("size", raw),
        },
        AttributeSpec {
            name: "variant",
            update: Update::Render,
            apply: |state, raw| state.variant = attributes::optional_token("variant", raw),
        },
        AttributeSpec {
            name: "disabled",
            update: Update::Patch,
            apply: |state, raw| state.disabled = attributes::flag(raw),
        },
        AttributeSpec {
            name: "loading",
            update: Update::Render,
            apply: |state, raw| state.loading = attributes::flag(raw),
        },
        AttributeSpec {
            name: "icon",
            update: Update::Render,
            apply: |state, raw| state.icon = attributes::optional(raw),
        },
        AttributeSpec {
            name: "icon-position",
            update: Update::Render,
            apply: |state, raw| state.icon_position = attributes::token("icon-position", raw),
        },
        AttributeSpec {
            name: "button-type",
            update: Update::Patch,
            apply: |state, raw| state.button_type = attributes::token("button-type", raw),
        },
        AttributeSpec {
            name: "aria-label",
            update: Update::Accessibility,
            apply: |state, raw| state.aria_label = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-describedby",
            update: Update::Accessibility,
            apply: |state, raw| state.aria_describedby = attributes::optional(raw),
        },
        AttributeSpec {
            name: "title",
            update: Update::Accessibility,
            apply: |state, raw| state.title = attributes::optional(raw),
        },
    ]];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            id: ids.allocate("button"),
            kind: ButtonKind::default(),
            size: None,
            variant: None,
            disabled: false,
            loading: false,
            icon: None,
            icon_position: IconPosition::default(),
            button_type: NativeButtonType::default(),
            aria_label: None,
            aria_describedby: None,
            title: None,
        }
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        MarkupElement::fragment()
            .child(style_block(HostDisplay::InlineBlock))
            .child(self.control(host))
    }

    fn control(&self, host: &Host<'_>) -> MarkupElement {
        let classes = self.classes();
        MarkupElement::new("button")
            .attr("id", self.id.as_str())
            .classes(classes.iter().map(String::as_str))
            .attr("type", self.button_type.token())
            .flag("disabled", self.is_inert())
            .children_from(self.content(&host.text_content()))
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        let Some(button) = tree.by_id_mut(&self.id) else {
            return;
        };
        button.set_or_remove("aria-label", self.aria_label.as_deref());
        button.set_or_remove("aria-describedby", self.aria_describedby.as_deref());
        button.set_or_remove("title", self.title.as_deref());
        button.set_or_remove("aria-disabled", self.disabled.then_some("true"));
        button.set_or_remove("aria-busy", self.loading.then_some("true"));
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        _live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        let kind = match interaction {
            Interaction::Click if !self.is_inert() => EventKind::Click,
            Interaction::Focus => EventKind::Focus,
            Interaction::Blur => EventKind::Blur,
            _ => return Vec::new(),
        };
        vec![self.event(kind, host.node())]
    }

    fn focusable(&self) -> bool {
        !self.is_inert()
    }
}

token_properties!(Button {
    kind / set_kind => "type" : ButtonKind : |state| state.kind;
    icon_position / set_icon_position => "icon-position" : IconPosition : |state| state.icon_position;
    button_type / set_button_type => "button-type" : NativeButtonType : |state| state.button_type;
});

flag_properties!(Button {
    disabled / set_disabled => "disabled" : |state| state.disabled;
    loading / set_loading => "loading" : |state| state.loading;
});

optional_properties!(Button {
    icon / set_icon => "icon" : |state| state.icon.clone();
    aria_label / set_aria_label => "aria-label" : |state| state.aria_label.clone();
    aria_describedby / set_aria_describedby => "aria-describedby" : |state| state.aria_describedby.clone();
    title / set_title => "title" : |state| state.title.clone();
});

impl ElementRef<'_, Button> {
    /// `size` property.
    pub fn size(&self) -> Option<ButtonSize> {
        self.read(|state, _| state.size)
    }

    /// Sets or removes `size`.
    pub fn set_size(&mut self, size: Option<ButtonSize>) {
        self.set_optional("size", size.map(Token::token));
    }

    /// `variant` property.
    pub fn variant(&self) -> Option<ButtonVariant> {
        self.read(|state, _| state.variant)
    }

    /// Sets or removes `variant`.
    pub fn set_variant(&mut self, variant: Option<ButtonVariant>) {
        self.set_optional("variant", variant.map(Token::token));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::document::Document;
    use crate::registry::ElementRegistry;

    use super::*;

    fn button(attributes: &[(&str, &str)], text: &str) -> (Document, NodeId) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let node = doc.create_element(Button::TAG);
        for (name, value) in attributes {
            doc.set_attribute(node, name, value).expect("attribute");
        }
        doc.append_text(node, text).expect("text");
        doc.append_child(body, node).expect("append");
        (doc, node)
    }

    fn control_html(doc: &mut Document, node: NodeId) -> String {
        doc.element::<Button>(node).expect("button").shadow_html()
    }

    #[test]
    fn classes_follow_type_variant_and_size() {
        let (mut doc, node) = button(
            &[("type", "danger"), ("variant", "outline"), ("size", "lg")],
            "Elimina",
        );
        let html = control_html(&mut doc, node);
        assert!(html.contains(r#"class="btn btn-outline-danger btn-lg""#));
        assert!(html.contains("<span>Elimina</span>"));
        assert!(html.contains(r#"type="button""#));
    }

    #[test]
    fn icon_position_controls_text_spacing() {
        let (mut doc, node) = button(&[("icon", "it-check"), ("icon-position", "right")], "Salva");
        let html = control_html(&mut doc, node);
        assert!(html.contains(
            r#"<span class="me-2">Salva</span><i aria-hidden="true" class="it-check"></i>"#
        ));
    }

    #[test]
    fn loading_shows_spinner_and_disables() {
        let (mut doc, node) = button(&[("icon", "it-check")], "Invio");
        doc.element::<Button>(node).expect("button").set_loading(true);
        let html = control_html(&mut doc, node);
        assert!(html.contains("spinner-border"));
        assert!(!html.contains("it-check"));
        assert!(html.contains(r#"aria-busy="true""#));
        assert!(html.contains(" disabled"));
    }

    #[test]
    fn disabled_patch_sets_native_and_aria_state() {
        let (mut doc, node) = button(&[], "Ok");
        doc.element::<Button>(node).expect("button").set_disabled(true);
        let patched = control_html(&mut doc, node);
        assert!(patched.contains(r#"aria-disabled="true""#));
        doc.rerender(node);
        assert_eq!(patched, control_html(&mut doc, node));
    }

    #[test]
    fn click_carries_type_and_variant() {
        let (mut doc, node) = button(&[("type", "success"), ("variant", "ghost")], "Ok");
        let details = Rc::new(RefCell::new(Vec::new()));
        let log = details.clone();
        doc.add_event_listener(node, "it-button-click", move |event| {
            log.borrow_mut().push(event.detail().clone());
        });
        doc.element::<Button>(node).expect("button").click();
        assert_eq!(
            *details.borrow(),
            vec![EventDetail::Button {
                kind: ButtonKind::Success,
                variant: Some(ButtonVariant::Ghost),
                element: node,
            }]
        );
    }

    #[test]
    fn focus_and_blur_emit_events() {
        let (mut doc, node) = button(&[], "Ok");
        let names = Rc::new(RefCell::new(Vec::new()));
        for name in ["it-button-focus", "it-button-blur"] {
            let log = names.clone();
            doc.add_event_listener(node, name, move |event| {
                log.borrow_mut().push(event.name().to_string());
            });
        }
        let mut button = doc.element::<Button>(node).expect("button");
        button.focus();
        button.blur();
        assert_eq!(*names.borrow(), vec!["it-button-focus", "it-button-blur"]);
    }
}
