//! Host document: the light-DOM tree, element upgrade and teardown, event dispatch with
//! bubbling, focus tracking, and the screen-reader live region.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use leptos::logging::warn;
use serde::Serialize;

use crate::components::Radio;
use crate::config::ElementsConfig;
use crate::element::{Component, CustomElement, Effect, ElementRef, Host, IdAllocator, Interaction};
use crate::error::ElementError;
use crate::events::Event;
use crate::markup::{LiveControl, ShadowRoot};
use crate::model::{FormEntry, NodeId};
use crate::registry::ElementRegistry;
use crate::validity::ValidityState;

/// Listener registered on a host node.
pub type Listener = Rc<dyn Fn(&Event)>;
/// Observer of element-emitted events; returning `false` cancels a cancelable event.
pub type EmitHook = Rc<dyn Fn(&Event) -> bool>;
/// Observer of new announcements.
pub type AnnounceHook = Rc<dyn Fn(&Announcement)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Transient live-region message.
pub struct Announcement {
    /// Live-region node appended to the body.
    pub node: NodeId,
    /// Announced text.
    pub message: String,
    /// Milliseconds until the node should be retired.
    pub ttl_ms: u64,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct HostNode {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Light-DOM document hosting custom elements.
pub struct Document {
    nodes: BTreeMap<NodeId, HostNode>,
    next_node: u64,
    body: NodeId,
    registry: ElementRegistry,
    config: ElementsConfig,
    ids: IdAllocator,
    elements: HashMap<NodeId, Box<dyn CustomElement>>,
    listeners: HashMap<(NodeId, String), Vec<Listener>>,
    emit_hooks: Vec<EmitHook>,
    announce_hooks: Vec<AnnounceHook>,
    focused: Option<NodeId>,
    announcements: Vec<Announcement>,
}

impl Document {
    /// Empty document using `registry` and the default configuration.
    pub fn new(registry: ElementRegistry) -> Self {
        Self::with_config(registry, ElementsConfig::default())
    }

    /// Empty document with an explicit configuration.
    pub fn with_config(registry: ElementRegistry, config: ElementsConfig) -> Self {
        let body = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            body,
            HostNode {
                data: NodeData::Element {
                    tag: "body".to_string(),
                    attributes: BTreeMap::new(),
                },
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            next_node: 1,
            body,
            registry,
            config,
            ids: IdAllocator::default(),
            elements: HashMap::new(),
            listeners: HashMap::new(),
            emit_hooks: Vec::new(),
            announce_hooks: Vec::new(),
            focused: None,
            announcements: Vec::new(),
        }
    }

    /// Document body; elements upgrade when connected under it.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Runtime configuration.
    pub fn config(&self) -> &ElementsConfig {
        &self.config
    }

    /// Registry used for upgrades.
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    fn insert_node(&mut self, data: NodeData) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            node,
            HostNode {
                data,
                parent: None,
                children: Vec::new(),
            },
        );
        node
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert_node(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert_node(NodeData::Text(text.to_string()))
    }

    /// Creates an element with attributes and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// Fails like [`Document::append_child`].
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId, ElementError> {
        let node = self.create_element(tag);
        if let Some(HostNode {
            data: NodeData::Element { attributes: map, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            for (name, value) in attributes {
                map.insert(name.to_string(), value.to_string());
            }
        }
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Creates a text node and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// Fails like [`Document::append_child`].
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, ElementError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    fn node(&self, node: NodeId) -> Result<&HostNode, ElementError> {
        self.nodes.get(&node).ok_or(ElementError::UnknownNode(node))
    }

    /// Appends `child` to `parent`, moving it if already attached. Newly connected
    /// registered elements are upgraded in tree order.
    ///
    /// # Errors
    ///
    /// Unknown nodes, text parents, cycles and moving the body are rejected.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ElementError> {
        if !matches!(self.node(parent)?.data, NodeData::Element { .. }) {
            return Err(ElementError::NotAContainer(parent));
        }
        self.node(child)?;
        if child == self.body || self.is_inclusive_ancestor(child, parent) {
            return Err(ElementError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        if let Some(entry) = self.nodes.get_mut(&parent) {
            entry.children.push(child);
        }
        if let Some(entry) = self.nodes.get_mut(&child) {
            entry.parent = Some(parent);
        }
        if self.is_connected(child) {
            self.connect_subtree(child);
        }
        Ok(())
    }

    /// Detaches `node` from its parent, discarding element state in the subtree.
    ///
    /// # Errors
    ///
    /// Unknown nodes and the body are rejected.
    pub fn remove(&mut self, node: NodeId) -> Result<(), ElementError> {
        let parent = self.node(node)?.parent;
        if node == self.body {
            return Err(ElementError::HierarchyRequest {
                parent: parent.unwrap_or(node),
                child: node,
            });
        }
        self.detach(node);
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).and_then(|entry| entry.parent) else {
            return;
        };
        let was_connected = self.is_connected(node);
        if let Some(entry) = self.nodes.get_mut(&parent) {
            entry.children.retain(|child| *child != node);
        }
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.parent = None;
        }
        if was_connected {
            self.disconnect_subtree(node);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn connect_subtree(&mut self, root: NodeId) {
        let mut order = vec![root];
        order.extend(self.descendants(root));
        for node in order {
            self.upgrade_node(node);
        }
    }

    fn disconnect_subtree(&mut self, root: NodeId) {
        let mut order = vec![root];
        order.extend(self.descendants(root));
        for node in order {
            self.elements.remove(&node);
            if self.focused == Some(node) {
                self.focused = None;
            }
        }
    }

    fn upgrade_node(&mut self, node: NodeId) {
        if self.elements.contains_key(&node) {
            return;
        }
        let Some(constructor) = self.tag(node).and_then(|tag| self.registry.get(tag)) else {
            return;
        };
        let mut element = constructor(&mut self.ids);
        element.connected(&Host::new(self, node));
        self.elements.insert(node, element);
    }

    /// Upgrades connected elements whose tag was defined after they were inserted.
    pub fn upgrade(&mut self) {
        self.connect_subtree(self.body);
    }

    /// Parent node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|entry| entry.parent)
    }

    /// Child nodes in order; empty for unknown nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|entry| entry.children.as_slice())
            .unwrap_or_default()
    }

    /// Tag of an element node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(&node)?.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Whether `node` is attached under the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.body, node)
    }

    /// Descendants of `root` in tree order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `root` whose tag is in `tags`, in tree order.
    pub fn query_all(&self, root: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.tag(*node).is_some_and(|tag| tags.contains(&tag)))
            .collect()
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(HostNode {
            data: NodeData::Text(text),
            ..
        }) = self.nodes.get(&node)
        {
            out.push_str(text);
        }
        for descendant in self.descendants(node) {
            if let Some(HostNode {
                data: NodeData::Text(text),
                ..
            }) = self.nodes.get(&descendant)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Attribute value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(&node)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Every attribute of an element node, in lexical order.
    pub fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        match self.nodes.get(&node).map(|host| &host.data) {
            Some(NodeData::Element { attributes, .. }) => attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn write_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), ElementError> {
        let entry = self.nodes.get_mut(&node).ok_or(ElementError::UnknownNode(node))?;
        let NodeData::Element { attributes, .. } = &mut entry.data else {
            return Err(ElementError::NotAContainer(node));
        };
        let old = match value {
            Some(value) => attributes.insert(name.to_string(), value.to_string()),
            None => attributes.remove(name),
        };
        if old.as_deref() == value {
            return Ok(());
        }

        if let Some(mut element) = self.elements.remove(&node) {
            element.attribute_changed(&Host::new(self, node), name, old.as_deref(), value);
            self.elements.insert(node, element);
        }
        Ok(())
    }

    /// Sets an attribute, notifying an upgraded element.
    ///
    /// # Errors
    ///
    /// Unknown nodes and text nodes are rejected.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), ElementError> {
        self.write_attribute(node, name, Some(value))
    }

    /// Removes an attribute, notifying an upgraded element.
    ///
    /// # Errors
    ///
    /// Unknown nodes and text nodes are rejected.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), ElementError> {
        self.write_attribute(node, name, None)
    }

    /// Sets a boolean attribute to the empty value or removes it.
    ///
    /// # Errors
    ///
    /// Unknown nodes and text nodes are rejected.
    pub fn toggle_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        on: bool,
    ) -> Result<(), ElementError> {
        self.write_attribute(node, name, on.then_some(""))
    }

    /// Upgraded element at `node`.
    pub fn custom_element(&self, node: NodeId) -> Option<&dyn CustomElement> {
        self.elements.get(&node).map(|element| element.as_ref())
    }

    /// Whether `node` hosts an upgraded element.
    pub fn is_upgraded(&self, node: NodeId) -> bool {
        self.elements.contains_key(&node)
    }

    /// Shadow root of an upgraded element.
    pub fn shadow(&self, node: NodeId) -> Option<&ShadowRoot> {
        self.custom_element(node).map(|element| element.shadow())
    }

    pub(crate) fn live_mut(&mut self, node: NodeId) -> Option<&mut LiveControl> {
        self.elements
            .get_mut(&node)
            .and_then(|element| element.shadow_mut().live_mut())
    }

    /// Typed handle on an upgraded element.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnknownNode`] for unknown nodes and
    /// [`ElementError::WrongElement`] when `node` is not an upgraded `C`.
    pub fn element<C: Component>(
        &mut self,
        node: NodeId,
    ) -> Result<ElementRef<'_, C>, ElementError> {
        self.node(node)?;
        let upgraded_as_c = self
            .elements
            .get(&node)
            .is_some_and(|element| element.tag() == C::TAG);
        if !upgraded_as_c {
            return Err(ElementError::WrongElement {
                node,
                expected: C::TAG,
            });
        }
        Ok(ElementRef::new(self, node))
    }

    /// Full re-render of an upgraded element.
    pub fn rerender(&mut self, node: NodeId) {
        if let Some(mut element) = self.elements.remove(&node) {
            element.rerender(&Host::new(self, node));
            self.elements.insert(node, element);
        }
    }

    /// Registers a listener for events named `name` reaching `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        name: &str,
        listener: impl Fn(&Event) + 'static,
    ) {
        self.listeners
            .entry((node, name.to_string()))
            .or_default()
            .push(Rc::new(listener));
    }

    /// Registers an observer of every element-emitted event.
    pub fn on_emit(&mut self, hook: impl Fn(&Event) -> bool + 'static) {
        self.emit_hooks.push(Rc::new(hook));
    }

    /// Registers an observer of new announcements.
    pub fn on_announce(&mut self, hook: impl Fn(&Announcement) + 'static) {
        self.announce_hooks.push(Rc::new(hook));
    }

    /// Dispatches `event` at its target and, when it bubbles, at every ancestor.
    ///
    /// At each node the upgraded element handles the event before user listeners run.
    /// Returns `false` when a cancelable event was cancelled.
    pub fn dispatch(&mut self, event: Event) -> bool {
        for hook in self.emit_hooks.clone() {
            if !hook(&event) {
                event.prevent_default();
            }
        }

        let mut path = vec![event.target()];
        if event.bubbles() {
            let mut current = event.target();
            while let Some(parent) = self.parent(current) {
                path.push(parent);
                current = parent;
            }
        }

        for node in path {
            event.set_current_target(node);
            if let Some(mut element) = self.elements.remove(&node) {
                let effects = element.handle_event(&Host::new(self, node), &event);
                self.elements.insert(node, element);
                self.apply(effects);
            }
            let listeners = self
                .listeners
                .get(&(node, event.name().to_string()))
                .cloned()
                .unwrap_or_default();
            for listener in listeners {
                listener(&event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        !event.default_prevented()
    }

    pub(crate) fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let result = match effect {
                Effect::SetAttribute { node, name, value } => {
                    self.set_attribute(node, name, &value)
                }
                Effect::RemoveAttribute { node, name } => self.remove_attribute(node, name),
                Effect::Render(node) => {
                    self.rerender(node);
                    Ok(())
                }
                Effect::Emit { event, revert } => {
                    if !self.dispatch(event) {
                        self.apply(revert);
                    }
                    Ok(())
                }
                Effect::UncheckRadios { name, except } => {
                    self.uncheck_radios(&name, except);
                    Ok(())
                }
                Effect::Announce(message) => {
                    self.announce(&message);
                    Ok(())
                }
            };
            if let Err(err) = result {
                warn!("element effect failed: {err}");
            }
        }
    }

    fn uncheck_radios(&mut self, name: &str, except: NodeId) {
        let radios: Vec<NodeId> = self
            .elements
            .iter()
            .filter(|(node, element)| {
                **node != except
                    && element.tag() == Radio::TAG
                    && self.attribute(**node, "name") == Some(name)
            })
            .map(|(node, _)| *node)
            .collect();
        for radio in radios {
            if let Some(live) = self.live_mut(radio) {
                live.checked = false;
            }
        }
    }

    /// Delivers an interaction to an element's internal control.
    ///
    /// Focus and blur go through focus tracking.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnknownNode`] for unknown nodes.
    pub fn interact(&mut self, node: NodeId, interaction: Interaction) -> Result<(), ElementError> {
        self.node(node)?;
        match interaction {
            Interaction::Focus => self.focus(node),
            Interaction::Blur => self.blur(node),
            interaction => {
                self.deliver(node, interaction);
                Ok(())
            }
        }
    }

    fn deliver(&mut self, node: NodeId, interaction: Interaction) {
        let Some(mut element) = self.elements.remove(&node) else {
            return;
        };
        let effects = element.interact(&Host::new(self, node), interaction);
        self.elements.insert(node, element);
        self.apply(effects);
    }

    /// Focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Moves focus to `node`, blurring the previously focused element.
    /// Unrendered and disabled controls do not take focus.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnknownNode`] for unknown nodes.
    pub fn focus(&mut self, node: NodeId) -> Result<(), ElementError> {
        self.node(node)?;
        let focusable = self
            .elements
            .get(&node)
            .is_some_and(|element| element.focusable());
        if !focusable || self.focused == Some(node) {
            return Ok(());
        }
        if let Some(previous) = self.focused.take() {
            self.deliver(previous, Interaction::Blur);
        }
        self.focused = Some(node);
        self.deliver(node, Interaction::Focus);
        Ok(())
    }

    /// Blurs `node` when it holds focus.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnknownNode`] for unknown nodes.
    pub fn blur(&mut self, node: NodeId) -> Result<(), ElementError> {
        self.node(node)?;
        if self.focused == Some(node) {
            self.focused = None;
            self.deliver(node, Interaction::Blur);
        }
        Ok(())
    }

    /// Validity flags of a rendered form control.
    pub fn validity(&self, node: NodeId) -> Option<ValidityState> {
        self.custom_element(node)?
            .validity(&Host::new(self, node))
    }

    /// Whether a rendered form control satisfies its constraints.
    pub fn check_validity(&self, node: NodeId) -> bool {
        self.validity(node).is_some_and(|validity| validity.valid())
    }

    /// Checks validity and announces the message of an invalid control.
    pub fn report_validity(&mut self, node: NodeId) -> bool {
        let valid = self.check_validity(node);
        if valid {
            return true;
        }
        let message = self.custom_element(node).and_then(|element| {
            let custom = element
                .shadow()
                .live()
                .map(|live| live.custom_validity.clone())
                .filter(|message| !message.is_empty());
            custom.or_else(|| {
                element
                    .field()
                    .map(|field| field.validation_message.clone())
                    .filter(|message| !message.is_empty())
            })
        });
        if let Some(message) = message {
            self.announce(&message);
        }
        false
    }

    /// Submission entries of one form control.
    pub fn form_entries(&self, node: NodeId) -> Vec<FormEntry> {
        self.custom_element(node)
            .map(|element| element.form_entries())
            .unwrap_or_default()
    }

    /// Appends a polite, visually hidden live region carrying `message`.
    pub fn announce(&mut self, message: &str) -> NodeId {
        let node = self.create_element("div");
        if let Some(HostNode {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            for (name, value) in [
                ("aria-atomic", "true"),
                ("aria-live", "polite"),
                ("class", "visually-hidden"),
                ("role", "status"),
            ] {
                attributes.insert(name.to_string(), value.to_string());
            }
        }
        let body = self.body;
        if let Err(err) = self
            .append_text(node, message)
            .and_then(|_| self.append_child(body, node))
        {
            warn!("announcement failed: {err}");
        }

        let announcement = Announcement {
            node,
            message: message.to_string(),
            ttl_ms: self.config.announcement_ttl_ms,
        };
        self.announcements.push(announcement.clone());
        for hook in self.announce_hooks.clone() {
            hook(&announcement);
        }
        node
    }

    /// Live announcements not yet retired.
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Removes an announcement's live region and drops its nodes from the document.
    ///
    /// Nodes that are not live announcements are left alone.
    pub fn retire_announcement(&mut self, node: NodeId) {
        let before = self.announcements.len();
        self.announcements.retain(|announcement| announcement.node != node);
        if self.announcements.len() == before {
            return;
        }
        if let Err(err) = self.remove(node) {
            warn!("announcement removal failed: {err}");
        }
        self.discard(node);
    }

    /// Drops a detached subtree for good, with its element state and listeners.
    fn discard(&mut self, root: NodeId) {
        let mut order = vec![root];
        order.extend(self.descendants(root));
        for node in &order {
            self.nodes.remove(node);
            self.elements.remove(node);
            if self.focused == Some(*node) {
                self.focused = None;
            }
        }
        self.listeners.retain(|(node, _), _| !order.contains(node));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::{Alert, TextInput};

    fn document() -> Document {
        Document::new(ElementRegistry::with_all())
    }

    #[test]
    fn elements_upgrade_on_connect_and_reset_on_removal() {
        let mut doc = document();
        let body = doc.body();
        let detached = doc.create_element("it-form-input");
        assert!(!doc.is_upgraded(detached));

        doc.append_child(body, detached).expect("append");
        assert!(doc.is_upgraded(detached));
        let first_id = doc
            .element::<TextInput>(detached)
            .expect("input")
            .state()
            .map(|state| state.control_id().to_string());

        doc.remove(detached).expect("remove");
        assert!(!doc.is_upgraded(detached));
        doc.append_child(body, detached).expect("re-append");
        let second_id = doc
            .element::<TextInput>(detached)
            .expect("input")
            .state()
            .map(|state| state.control_id().to_string());
        assert_ne!(first_id, second_id);
    }

    #[test]
    fn late_definitions_upgrade_on_demand() {
        let registry = ElementRegistry::default();
        let mut doc = Document::new(registry.clone());
        let body = doc.body();
        let alert = doc.append_element(body, "it-alert", &[]).expect("alert");
        assert!(!doc.is_upgraded(alert));
        registry.define_component::<Alert>();
        doc.upgrade();
        assert!(doc.is_upgraded(alert));
    }

    #[test]
    fn hierarchy_errors_are_reported() {
        let mut doc = document();
        let body = doc.body();
        let outer = doc.append_element(body, "div", &[]).expect("outer");
        let inner = doc.append_element(outer, "div", &[]).expect("inner");
        let text = doc.append_text(inner, "x").expect("text");

        assert!(matches!(
            doc.append_child(inner, outer),
            Err(ElementError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            doc.append_child(text, outer),
            Err(ElementError::NotAContainer(_))
        ));
        assert!(matches!(
            doc.element::<Alert>(outer),
            Err(ElementError::WrongElement { expected: "it-alert", .. })
        ));
        assert!(matches!(
            doc.set_attribute(NodeId(999), "a", "b"),
            Err(ElementError::UnknownNode(NodeId(999)))
        ));
    }

    #[test]
    fn events_bubble_until_stopped() {
        let mut doc = document();
        let body = doc.body();
        let outer = doc.append_element(body, "div", &[]).expect("outer");
        let alert = doc
            .append_element(outer, "it-alert", &[("dismissible", "")])
            .expect("alert");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        doc.add_event_listener(outer, "it-alert-dismiss", move |event| {
            log.borrow_mut().push(("outer", event.current_target()));
            event.stop_propagation();
        });
        let log = seen.clone();
        doc.add_event_listener(body, "it-alert-dismiss", move |_| {
            log.borrow_mut().push(("body", NodeId(0)));
        });

        doc.element::<Alert>(alert).expect("alert").dismiss();
        assert_eq!(*seen.borrow(), vec![("outer", outer)]);
    }

    #[test]
    fn focus_moves_between_controls() {
        let mut doc = document();
        let body = doc.body();
        let first = doc.append_element(body, "it-form-input", &[]).expect("first");
        let second = doc.append_element(body, "it-form-input", &[]).expect("second");
        let disabled = doc
            .append_element(body, "it-form-input", &[("disabled", "")])
            .expect("disabled");
        let blurs = Rc::new(RefCell::new(Vec::new()));
        let log = blurs.clone();
        doc.add_event_listener(body, "it-form-input-blur", move |event| {
            log.borrow_mut().push(event.target());
        });

        doc.focus(first).expect("focus");
        doc.focus(second).expect("focus");
        doc.focus(disabled).expect("focus");
        assert_eq!(doc.focused(), Some(second));
        assert_eq!(*blurs.borrow(), vec![first]);
    }

    #[test]
    fn announcements_live_until_retired() {
        let mut doc = document();
        let scheduled = Rc::new(RefCell::new(Vec::new()));
        let log = scheduled.clone();
        doc.on_announce(move |announcement| log.borrow_mut().push(announcement.ttl_ms));

        let node = doc.announce("Salvato");
        assert_eq!(doc.attribute(node, "role"), Some("status"));
        assert_eq!(doc.attribute(node, "aria-live"), Some("polite"));
        assert_eq!(doc.text_content(node), "Salvato");
        assert_eq!(doc.children(doc.body()), &[node]);
        assert_eq!(*scheduled.borrow(), vec![1000]);

        doc.retire_announcement(node);
        assert!(doc.announcements().is_empty());
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn retired_announcements_leave_no_nodes_behind() {
        let mut doc = document();
        let baseline = doc.nodes.len();
        for round in 0..50 {
            let node = doc.announce(&format!("Messaggio {round}"));
            doc.add_event_listener(node, "click", |_| {});
            doc.retire_announcement(node);
            assert!(doc.tag(node).is_none());
        }
        assert_eq!(doc.nodes.len(), baseline);
        assert!(doc.listeners.is_empty());
    }

    #[test]
    fn retiring_an_ordinary_node_is_ignored() {
        let mut doc = document();
        let body = doc.body();
        let node = doc.append_element(body, "div", &[]).expect("div");
        doc.retire_announcement(node);
        assert_eq!(doc.children(body), &[node]);
    }
}
