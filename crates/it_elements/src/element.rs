//! Shared attribute/property/render synchronization protocol.
//!
//! A [`Component`] describes one element kind: its state record, attribute table, markup and
//! behaviour. [`Element`] wraps it with a [`ShadowRoot`] and implements the protocol once for
//! every kind. The document stores elements as [`CustomElement`] trait objects.

use std::any::Any;
use std::marker::PhantomData;

use leptos::logging::warn;

use crate::attributes::{self, AttributeSpec, Update};
use crate::components::field::FieldState;
use crate::config::ElementsConfig;
use crate::document::Document;
use crate::error::ElementError;
use crate::events::Event;
use crate::markup::{LiveControl, MarkupElement, ShadowRoot};
use crate::model::{FileDescriptor, FormEntry, NodeId};
use crate::validity::ValidityState;

#[derive(Debug, Default)]
/// Source of per-instance accessibility identifiers. Ids are unique within one document.
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Returns `{prefix}-{n}` with a fresh `n`.
    pub fn allocate(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Input delivered by the platform to an element's internal control.
pub enum Interaction {
    /// Text entered into an input or textarea.
    Input(String),
    /// Option chosen in a select.
    Select(String),
    /// Checkbox, radio or toggle changed to the given state.
    Toggle(bool),
    /// Files chosen in the picker.
    Files(Vec<FileDescriptor>),
    /// Internal control focused.
    Focus,
    /// Internal control blurred.
    Blur,
    /// Internal control activated.
    Click,
    /// Per-file remove control activated.
    RemoveFile(usize),
}

#[derive(Debug, Clone)]
/// Document mutation requested by an element; applied after the element is back in place.
pub enum Effect {
    /// Set a host attribute.
    SetAttribute {
        /// Target node.
        node: NodeId,
        /// Attribute name.
        name: &'static str,
        /// New value.
        value: String,
    },
    /// Remove a host attribute.
    RemoveAttribute {
        /// Target node.
        node: NodeId,
        /// Attribute name.
        name: &'static str,
    },
    /// Re-render an element.
    Render(NodeId),
    /// Dispatch an event; `revert` runs when a cancelable event is cancelled.
    Emit {
        /// Event to dispatch at its detail's element.
        event: Event,
        /// Effects undoing the default action.
        revert: Vec<Effect>,
    },
    /// Uncheck every other radio sharing `name`.
    UncheckRadios {
        /// Radio group name.
        name: String,
        /// Radio that stays checked.
        except: NodeId,
    },
    /// Announce a message through the live region.
    Announce(String),
}

impl Effect {
    /// Dispatch without a revert action.
    pub fn emit(event: Event) -> Self {
        Self::Emit {
            event,
            revert: Vec::new(),
        }
    }

    /// Sets `name` to `value`, or removes it when `None`.
    pub fn attribute(node: NodeId, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => Self::SetAttribute {
                node,
                name,
                value: value.to_string(),
            },
            None => Self::RemoveAttribute { node, name },
        }
    }
}

/// Read-only view of the document from one element's point of view.
pub struct Host<'a> {
    document: &'a Document,
    node: NodeId,
}

impl<'a> Host<'a> {
    pub(crate) fn new(document: &'a Document, node: NodeId) -> Self {
        Self { document, node }
    }

    /// Host node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whole document.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Runtime configuration.
    pub fn config(&self) -> &'a ElementsConfig {
        self.document.config()
    }

    /// Host attribute.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.document.attribute(self.node, name)
    }

    /// Trimmed text content of the host's light DOM.
    pub fn text_content(&self) -> String {
        self.document.text_content(self.node).trim().to_string()
    }

    /// Direct element children with tag `tag`.
    pub fn children_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.document
            .children(self.node)
            .iter()
            .copied()
            .filter(|child| self.document.tag(*child) == Some(tag))
            .collect()
    }
}

/// Behaviour of one element kind.
pub trait Component: Sized + 'static {
    /// Custom element tag.
    const TAG: &'static str;
    /// Observed attribute tables, searched in order.
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]];

    /// Default state with freshly allocated identifiers.
    fn new(ids: &mut IdAllocator) -> Self;

    /// Id of the element that patches replace and ARIA targets.
    fn control_id(&self) -> &str;

    /// Full fragment, without accessibility attributes.
    fn render(&self, host: &Host<'_>) -> MarkupElement;

    /// Internal control subtree as [`Component::render`] would produce it.
    fn control(&self, host: &Host<'_>) -> MarkupElement;

    /// Re-applies accessibility attributes to a rendered fragment.
    fn accessibility(&self, host: &Host<'_>, tree: &mut MarkupElement);

    /// Live properties seeded on every render.
    fn live(&self, _host: &Host<'_>) -> LiveControl {
        LiveControl::default()
    }

    /// Copies live properties the user may have changed back into the state before a re-render.
    fn adopt_live(&mut self, _live: &LiveControl) {}

    /// Syncs live properties after a patch of `attribute`.
    fn patch_live(&self, _host: &Host<'_>, _attribute: &str, _live: &mut LiveControl) {}

    /// Handles an interaction on a rendered control.
    fn interact(
        &mut self,
        _host: &Host<'_>,
        _live: &mut LiveControl,
        _interaction: Interaction,
    ) -> Vec<Effect> {
        Vec::new()
    }

    /// Handles an event reaching the host during dispatch.
    fn on_event(&mut self, _host: &Host<'_>, _event: &Event) -> Vec<Effect> {
        Vec::new()
    }

    /// Whether the internal control accepts focus.
    fn focusable(&self) -> bool {
        true
    }

    /// Shared form-control state, for form controls.
    fn field(&self) -> Option<&FieldState> {
        None
    }

    /// Constraint validation of the live control, for form controls.
    fn validity(&self, _host: &Host<'_>, _live: &LiveControl) -> Option<ValidityState> {
        None
    }

    /// Values submitted under the control's name.
    fn form_entries(&self, _live: &LiveControl) -> Vec<FormEntry> {
        Vec::new()
    }
}

/// Object-safe element interface stored by the document.
pub trait CustomElement: Any {
    /// Custom element tag.
    fn tag(&self) -> &'static str;
    /// Encapsulated fragment.
    fn shadow(&self) -> &ShadowRoot;
    /// Mutable encapsulated fragment.
    fn shadow_mut(&mut self) -> &mut ShadowRoot;
    /// Reads every observed attribute and performs the initial render.
    fn connected(&mut self, host: &Host<'_>);
    /// Applies one attribute change and runs its update path.
    fn attribute_changed(
        &mut self,
        host: &Host<'_>,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    );
    /// Full re-render.
    fn rerender(&mut self, host: &Host<'_>);
    /// Handles an interaction; no-op before the first render.
    fn interact(&mut self, host: &Host<'_>, interaction: Interaction) -> Vec<Effect>;
    /// Handles an event passing through the host.
    fn handle_event(&mut self, host: &Host<'_>, event: &Event) -> Vec<Effect>;
    /// Whether the rendered control accepts focus.
    fn focusable(&self) -> bool;
    /// Shared form-control state.
    fn field(&self) -> Option<&FieldState>;
    /// Constraint validation; `None` before render or for non form controls.
    fn validity(&self, host: &Host<'_>) -> Option<ValidityState>;
    /// Submission entries.
    fn form_entries(&self) -> Vec<FormEntry>;
    /// Upcast for typed handles.
    fn as_any(&self) -> &dyn Any;
}

/// One element instance: component state plus its shadow root.
pub struct Element<C: Component> {
    state: C,
    shadow: ShadowRoot,
}

impl<C: Component> Element<C> {
    /// Unconnected instance with default state.
    pub fn new(ids: &mut IdAllocator) -> Self {
        Self {
            state: C::new(ids),
            shadow: ShadowRoot::default(),
        }
    }

    /// Component state.
    pub fn state(&self) -> &C {
        &self.state
    }

    fn render(&mut self, host: &Host<'_>) {
        if let Some(live) = self.shadow.live() {
            self.state.adopt_live(live);
        }
        let mut tree = self.state.render(host);
        self.state.accessibility(host, &mut tree);
        let live = self.state.live(host);
        self.shadow.replace(tree, live);
    }

    fn patch(&mut self, host: &Host<'_>, attribute: &str) {
        let control = self.state.control(host);
        let Some(tree) = self.shadow.tree_mut() else {
            return;
        };
        if let Some(target) = tree.by_id_mut(self.state.control_id()) {
            *target = control;
        }
        self.state.accessibility(host, tree);
        if let Some(live) = self.shadow.live_mut() {
            self.state.patch_live(host, attribute, live);
        }
    }

    fn reapply_accessibility(&mut self, host: &Host<'_>) {
        if let Some(tree) = self.shadow.tree_mut() {
            self.state.accessibility(host, tree);
        }
    }
}

/// Boxed constructor registered for a tag.
pub fn construct<C: Component>(ids: &mut IdAllocator) -> Box<dyn CustomElement> {
    Box::new(Element::<C>::new(ids))
}

impl<C: Component> CustomElement for Element<C> {
    fn tag(&self) -> &'static str {
        C::TAG
    }

    fn shadow(&self) -> &ShadowRoot {
        &self.shadow
    }

    fn shadow_mut(&mut self) -> &mut ShadowRoot {
        &mut self.shadow
    }

    fn connected(&mut self, host: &Host<'_>) {
        for spec in attributes::all(C::ATTRIBUTES) {
            (spec.apply)(&mut self.state, host.attribute(spec.name));
        }
        self.render(host);
    }

    fn attribute_changed(
        &mut self,
        host: &Host<'_>,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) {
        if old == new {
            return;
        }
        let Some(spec) = attributes::find(C::ATTRIBUTES, name) else {
            return;
        };
        (spec.apply)(&mut self.state, new);
        if !self.shadow.is_rendered() {
            return;
        }
        match spec.update {
            Update::Render => self.render(host),
            Update::Patch => self.patch(host, name),
            Update::Accessibility => self.reapply_accessibility(host),
            Update::Ignore => {}
        }
    }

    fn rerender(&mut self, host: &Host<'_>) {
        if self.shadow.is_rendered() {
            self.render(host);
        }
    }

    fn interact(&mut self, host: &Host<'_>, interaction: Interaction) -> Vec<Effect> {
        let Some(live) = self.shadow.live_mut() else {
            return Vec::new();
        };
        self.state.interact(host, live, interaction)
    }

    fn handle_event(&mut self, host: &Host<'_>, event: &Event) -> Vec<Effect> {
        if !self.shadow.is_rendered() {
            return Vec::new();
        }
        self.state.on_event(host, event)
    }

    fn focusable(&self) -> bool {
        self.shadow.is_rendered() && self.state.focusable()
    }

    fn field(&self) -> Option<&FieldState> {
        self.state.field()
    }

    fn validity(&self, host: &Host<'_>) -> Option<ValidityState> {
        let live = self.shadow.live()?;
        self.state.validity(host, live)
    }

    fn form_entries(&self) -> Vec<FormEntry> {
        self.shadow
            .live()
            .map(|live| self.state.form_entries(live))
            .unwrap_or_default()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Typed handle on one upgraded element: the property surface of a custom element.
///
/// Setters write host attributes, so they follow the same update paths as markup changes.
pub struct ElementRef<'d, C: Component> {
    document: &'d mut Document,
    node: NodeId,
    marker: PhantomData<C>,
}

impl<'d, C: Component> ElementRef<'d, C> {
    pub(crate) fn new(document: &'d mut Document, node: NodeId) -> Self {
        Self {
            document,
            node,
            marker: PhantomData,
        }
    }

    /// Host node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Owning document.
    pub fn document(&self) -> &Document {
        &*self.document
    }

    /// Mutable owning document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    fn element(&self) -> Option<&Element<C>> {
        self.document
            .custom_element(self.node)
            .and_then(|element| element.as_any().downcast_ref::<Element<C>>())
    }

    /// Component state.
    pub fn state(&self) -> Option<&C> {
        self.element().map(Element::state)
    }

    /// Encapsulated fragment.
    pub fn shadow(&self) -> Option<&ShadowRoot> {
        self.element().map(|element| &element.shadow)
    }

    /// Serialized fragment markup.
    pub fn shadow_html(&self) -> String {
        self.shadow().map(ShadowRoot::to_html).unwrap_or_default()
    }

    /// Reads state and, once rendered, live control properties.
    pub(crate) fn read<R: Default>(&self, read: impl FnOnce(&C, Option<&LiveControl>) -> R) -> R {
        self.element()
            .map(|element| read(&element.state, element.shadow.live()))
            .unwrap_or_default()
    }

    /// Host attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.document.attribute(self.node, name)
    }

    /// Whether the host attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.document.has_attribute(self.node, name)
    }

    /// Sets a string attribute.
    pub fn set_text(&mut self, name: &str, value: &str) {
        let result = self.document.set_attribute(self.node, name, value);
        report(result);
    }

    /// Sets an attribute or removes it when `None`.
    pub fn set_optional(&mut self, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.document.set_attribute(self.node, name, value),
            None => self.document.remove_attribute(self.node, name),
        };
        report(result);
    }

    /// Sets a boolean attribute to presence with an empty value, or removes it.
    pub fn set_flag(&mut self, name: &str, on: bool) {
        let result = self.document.toggle_attribute(self.node, name, on);
        report(result);
    }

    /// Mutates live control properties of a rendered control.
    pub(crate) fn with_live(&mut self, update: impl FnOnce(&mut LiveControl)) {
        if let Some(live) = self.document.live_mut(self.node) {
            update(live);
        }
    }

    /// Full re-render, as after a change of light-DOM children.
    pub fn rerender(&mut self) {
        self.document.rerender(self.node);
    }

    /// Focuses the internal control.
    pub fn focus(&mut self) {
        report(self.document.focus(self.node));
    }

    /// Blurs the internal control.
    pub fn blur(&mut self) {
        report(self.document.blur(self.node));
    }

    /// Activates the internal control.
    pub fn click(&mut self) {
        report(self.document.interact(self.node, Interaction::Click));
    }

    /// Installs a custom validity message; empty clears it.
    pub fn set_custom_validity(&mut self, message: &str) {
        self.with_live(|live| live.custom_validity = message.to_string());
    }

    /// Validity flags of the live control.
    pub fn validity(&self) -> Option<ValidityState> {
        self.document.validity(self.node)
    }

    /// Whether the live control satisfies its constraints; `false` before render.
    pub fn check_validity(&self) -> bool {
        self.document.check_validity(self.node)
    }

    /// Like [`ElementRef::check_validity`], announcing the message of an invalid control.
    pub fn report_validity(&mut self) -> bool {
        self.document.report_validity(self.node)
    }
}

fn report(result: Result<(), ElementError>) {
    if let Err(err) = result {
        warn!("element property update failed: {err}");
    }
}

/// Generates string accessor pairs on [`ElementRef`].
macro_rules! text_properties {
    ($component:ty { $($getter:ident / $setter:ident => $attribute:literal : |$state:ident| $read:expr;)+ }) => {
        impl $crate::element::ElementRef<'_, $component> {
            $(
                #[doc = concat!("`", $attribute, "` property.")]
                pub fn $getter(&self) -> String {
                    self.read(|$state, _| $read)
                }

                #[doc = concat!("Sets the `", $attribute, "` attribute.")]
                pub fn $setter(&mut self, value: &str) {
                    self.set_text($attribute, value);
                }
            )+
        }
    };
}

/// Generates optional string accessor pairs on [`ElementRef`].
macro_rules! optional_properties {
    ($component:ty { $($getter:ident / $setter:ident => $attribute:literal : |$state:ident| $read:expr;)+ }) => {
        impl $crate::element::ElementRef<'_, $component> {
            $(
                #[doc = concat!("`", $attribute, "` property.")]
                pub fn $getter(&self) -> Option<String> {
                    self.read(|$state, _| $read)
                }

                #[doc = concat!("Sets or removes the `", $attribute, "` attribute.")]
                pub fn $setter(&mut self, value: Option<&str>) {
                    self.set_optional($attribute, value);
                }
            )+
        }
    };
}

/// Generates boolean accessor pairs on [`ElementRef`].
macro_rules! flag_properties {
    ($component:ty { $($getter:ident / $setter:ident => $attribute:literal : |$state:ident| $read:expr;)+ }) => {
        impl $crate::element::ElementRef<'_, $component> {
            $(
                #[doc = concat!("`", $attribute, "` property.")]
                pub fn $getter(&self) -> bool {
                    self.read(|$state, _| $read)
                }

                #[doc = concat!("Sets or removes the `", $attribute, "` attribute.")]
                pub fn $setter(&mut self, on: bool) {
                    self.set_flag($attribute, on);
                }
            )+
        }
    };
}

/// Generates enumerated accessor pairs on [`ElementRef`].
macro_rules! token_properties {
    ($component:ty { $($getter:ident / $setter:ident => $attribute:literal : $token:ty : |$state:ident| $read:expr;)+ }) => {
        impl $crate::element::ElementRef<'_, $component> {
            $(
                #[doc = concat!("`", $attribute, "` property.")]
                pub fn $getter(&self) -> $token {
                    self.read(|$state, _| $read)
                }

                #[doc = concat!("Sets the `", $attribute, "` attribute.")]
                pub fn $setter(&mut self, value: $token) {
                    self.set_text($attribute, $crate::model::Token::token(value));
                }
            )+
        }
    };
}

pub(crate) use {flag_properties, optional_properties, text_properties, token_properties};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.allocate("input"), "input-1");
        assert_eq!(ids.allocate("help"), "help-2");
    }

    #[test]
    fn attribute_effect_removes_on_none() {
        assert!(matches!(
            Effect::attribute(NodeId(1), "validation", None),
            Effect::RemoveAttribute { name: "validation", .. }
        ));
        assert!(matches!(
            Effect::attribute(NodeId(1), "validation", Some("valid")),
            Effect::SetAttribute { name: "validation", .. }
        ));
    }
}
