//! `it-button-group`: groups `it-button` children and applies bulk updates to them.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, optional_properties, Component, Effect, ElementRef, Host, IdAllocator,
};
use crate::events::{event_name, Event, EventDetail, EventKind};
use crate::markup::MarkupElement;
use crate::model::{ButtonKind, ButtonSize, ButtonVariant, NodeId, Token};
use crate::styles::{style_block, HostDisplay};

use super::Button;

/// State of one `it-button-group`.
#[derive(Debug, Clone)]
pub struct ButtonGroup {
    id: String,
    size: Option<ButtonSize>,
    vertical: bool,
    role: Option<String>,
    aria_label: Option<String>,
}

impl Component for ButtonGroup {
    const TAG: &'static str = "it-button-group";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[&[
        AttributeSpec {
            name: "size",
            update: Update::Render,
            apply: |state, raw| state.size = attributes::optional_token("size", raw),
        },
        AttributeSpec {
            name: "vertical",
            update: Update::Render,
            apply: |state, raw| state.vertical = attributes::flag(raw),
        },
        AttributeSpec {
            name: "role",
            update: Update::Accessibility,
            apply: |state, raw| state.role = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-label",
            update: Update::Accessibility,
            apply: |state, raw| state.aria_label = attributes::optional(raw),
        },
    ]];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            id: ids.allocate("button-group"),
            size: None,
            vertical: false,
            role: None,
            aria_label: None,
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

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        let size = self
            .size
            .map(|size| format!("btn-group-{}", size.token()))
            .unwrap_or_default();
        let vertical = if self.vertical {
            "btn-group-vertical"
        } else {
            ""
        };
        MarkupElement::new("div")
            .attr("id", self.id.as_str())
            .classes(["btn-group", vertical, size.as_str()])
            .child(MarkupElement::new("slot"))
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        if let Some(group) = tree.by_id_mut(&self.id) {
            group.set_attribute("role", self.role.as_deref().unwrap_or("group"));
            group.set_or_remove("aria-label", self.aria_label.as_deref());
        }
    }

    fn on_event(&mut self, host: &Host<'_>, event: &Event) -> Vec<Effect> {
        if event.name() != event_name(Button::TAG, EventKind::Click) {
            return Vec::new();
        }
        let EventDetail::Button {
            kind,
            variant,
            element,
        } = event.detail()
        else {
            return Vec::new();
        };
        vec![Effect::emit(Event::element(
            Self::TAG,
            EventKind::Click,
            EventDetail::GroupClick {
                button: *element,
                button_type: *kind,
                button_variant: *variant,
                group_size: self.size,
                group_vertical: self.vertical,
                element: host.node(),
            },
        ))]
    }

    fn focusable(&self) -> bool {
        false
    }
}

flag_properties!(ButtonGroup {
    vertical / set_vertical => "vertical" : |state| state.vertical;
});

optional_properties!(ButtonGroup {
    role / set_role => "role" : |state| state.role.clone();
    aria_label / set_aria_label => "aria-label" : |state| state.aria_label.clone();
});

impl ElementRef<'_, ButtonGroup> {
    /// `size` property.
    pub fn size(&self) -> Option<ButtonSize> {
        self.read(|state, _| state.size)
    }

    /// Sets or removes `size`.
    pub fn set_size(&mut self, size: Option<ButtonSize>) {
        self.set_optional("size", size.map(Token::token));
    }

    /// Descendant `it-button` hosts in tree order.
    pub fn buttons(&self) -> Vec<NodeId> {
        self.document().query_all(self.node(), &[Button::TAG])
    }

    fn each_button(&mut self, mut update: impl FnMut(&mut ElementRef<'_, Button>)) {
        for node in self.buttons() {
            if let Ok(mut button) = self.document_mut().element::<Button>(node) {
                update(&mut button);
            }
        }
    }

    /// Sets `size` on every descendant button.
    pub fn set_button_size(&mut self, size: Option<ButtonSize>) {
        self.each_button(|button| button.set_size(size));
    }

    /// Sets `type` on every descendant button.
    pub fn set_button_type(&mut self, kind: ButtonKind) {
        self.each_button(|button| button.set_kind(kind));
    }

    /// Sets `variant` on every descendant button.
    pub fn set_button_variant(&mut self, variant: Option<ButtonVariant>) {
        self.each_button(|button| button.set_variant(variant));
    }

    /// Disables every descendant button.
    pub fn disable_all(&mut self) {
        self.each_button(|button| button.set_disabled(true));
    }

    /// Enables every descendant button.
    pub fn enable_all(&mut self) {
        self.each_button(|button| button.set_disabled(false));
    }

    /// Sets `loading` on every descendant button.
    pub fn set_loading_all(&mut self, loading: bool) {
        self.each_button(|button| button.set_loading(loading));
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

    fn group() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new(ElementRegistry::with_all());
        let body = doc.body();
        let group = doc
            .append_element(body, ButtonGroup::TAG, &[("size", "lg"), ("vertical", "")])
            .expect("group");
        let buttons = ["primary", "secondary"]
            .into_iter()
            .map(|kind| {
                doc.append_element(group, Button::TAG, &[("type", kind)])
                    .expect("button")
            })
            .collect();
        (doc, group, buttons)
    }

    #[test]
    fn renders_group_classes_and_default_role() {
        let (mut doc, group, _) = group();
        let html = doc.element::<ButtonGroup>(group).expect("group").shadow_html();
        assert!(html.contains(r#"class="btn-group btn-group-vertical btn-group-lg""#));
        assert!(html.contains(r#"role="group""#));
    }

    #[test]
    fn button_clicks_are_reemitted_by_the_group() {
        let (mut doc, group, buttons) = group();
        let details = Rc::new(RefCell::new(Vec::new()));
        let log = details.clone();
        doc.add_event_listener(doc.body(), "it-button-group-click", move |event| {
            log.borrow_mut().push(event.detail().clone());
        });
        doc.element::<Button>(buttons[1]).expect("button").click();
        assert_eq!(
            *details.borrow(),
            vec![EventDetail::GroupClick {
                button: buttons[1],
                button_type: ButtonKind::Secondary,
                button_variant: None,
                group_size: Some(ButtonSize::Lg),
                group_vertical: true,
                element: group,
            }]
        );
    }

    #[test]
    fn bulk_setters_reach_every_button() {
        let (mut doc, group, buttons) = group();
        let mut handle = doc.element::<ButtonGroup>(group).expect("group");
        assert_eq!(handle.buttons(), buttons);
        handle.set_button_variant(Some(ButtonVariant::Outline));
        handle.disable_all();
        for node in &buttons {
            assert_eq!(doc.attribute(*node, "variant"), Some("outline"));
            assert!(doc.has_attribute(*node, "disabled"));
        }
        doc.element::<ButtonGroup>(group).expect("group").enable_all();
        assert!(buttons.iter().all(|node| !doc.has_attribute(*node, "disabled")));
    }

    #[test]
    fn disabled_buttons_are_not_reemitted() {
        let (mut doc, group, buttons) = group();
        doc.element::<ButtonGroup>(group).expect("group").set_loading_all(true);
        let count = Rc::new(RefCell::new(0));
        let seen = count.clone();
        doc.add_event_listener(group, "it-button-group-click", move |_| *seen.borrow_mut() += 1);
        doc.element::<Button>(buttons[0]).expect("button").click();
        assert_eq!(*count.borrow(), 0);
    }
}
