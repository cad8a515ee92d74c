//! Encapsulated markup fragments: the element tree each instance renders into its shadow root,
//! plus the live properties of the internal form control.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::model::FileDescriptor;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// One node of a rendered fragment.
pub enum MarkupNode {
    /// Nested element.
    Element(MarkupElement),
    /// Escaped text.
    Text(String),
    /// Unescaped text (style sheet bodies).
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Element inside a rendered fragment.
///
/// Attributes are kept sorted so serialization does not depend on the order in which a render
/// or a later patch set them.
pub struct MarkupElement {
    tag: &'static str,
    attributes: BTreeMap<String, String>,
    children: Vec<MarkupNode>,
}

impl MarkupElement {
    /// Creates an empty element.
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Root of a shadow fragment; only its children are serialized.
    pub fn fragment() -> Self {
        Self::new("#fragment")
    }

    /// Sets an attribute (builder form).
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute when a value is present (builder form).
    pub fn attr_opt<V: Into<String>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.set_attribute(name, value);
        }
        self
    }

    /// Sets a boolean attribute when `on` (builder form).
    pub fn flag(mut self, name: &str, on: bool) -> Self {
        self.toggle_attribute(name, on);
        self
    }

    /// Sets the class list from non-empty tokens (builder form).
    pub fn classes<'a>(mut self, classes: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = classes
            .into_iter()
            .filter(|class| !class.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            self.set_attribute("class", joined);
        }
        self
    }

    /// Appends a child element (builder form).
    pub fn child(mut self, child: MarkupElement) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    /// Appends a child element when present (builder form).
    pub fn child_opt(mut self, child: Option<MarkupElement>) -> Self {
        if let Some(child) = child {
            self.children.push(MarkupNode::Element(child));
        }
        self
    }

    /// Appends several child elements (builder form).
    pub fn children_from(mut self, children: impl IntoIterator<Item = MarkupElement>) -> Self {
        self.children
            .extend(children.into_iter().map(MarkupNode::Element));
        self
    }

    /// Appends escaped text (builder form). Empty text is skipped.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(MarkupNode::Text(text));
        }
        self
    }

    /// Appends unescaped text (builder form).
    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.children.push(MarkupNode::Raw(raw.into()));
        self
    }

    /// Tag name.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Child nodes.
    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    /// Attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Sets an attribute to `value` or removes it when `None`.
    pub fn set_or_remove(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => self.set_attribute(name, value),
            None => self.remove_attribute(name),
        }
    }

    /// Sets or removes a boolean attribute.
    pub fn toggle_attribute(&mut self, name: &str, on: bool) {
        if on {
            self.set_attribute(name, "");
        } else {
            self.remove_attribute(name);
        }
    }

    /// Class tokens.
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_whitespace()
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|token| token == class)
    }

    /// Adds or removes one class token, keeping the remaining order.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        let mut tokens = self
            .class_list()
            .filter(|token| *token != class)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if on {
            tokens.push(class.to_string());
        }
        if tokens.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", tokens.join(" "));
        }
    }

    /// First element in document order (self included) matching `predicate`.
    pub fn find(&self, predicate: &dyn Fn(&MarkupElement) -> bool) -> Option<&MarkupElement> {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find(predicate))
    }

    /// Mutable variant of [`MarkupElement::find`].
    pub fn find_mut(
        &mut self,
        predicate: &dyn Fn(&MarkupElement) -> bool,
    ) -> Option<&mut MarkupElement> {
        if predicate(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let MarkupNode::Element(element) = child {
                if let Some(found) = element.find_mut(predicate) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// All elements in document order (self included) matching `predicate`.
    pub fn find_all(&self, predicate: &dyn Fn(&MarkupElement) -> bool) -> Vec<&MarkupElement> {
        let mut found = Vec::new();
        self.collect_matching(predicate, &mut found);
        found
    }

    fn collect_matching<'a>(
        &'a self,
        predicate: &dyn Fn(&MarkupElement) -> bool,
        found: &mut Vec<&'a MarkupElement>,
    ) {
        if predicate(self) {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(predicate, found);
        }
    }

    /// Element with the given `id`.
    pub fn by_id(&self, id: &str) -> Option<&MarkupElement> {
        self.find(&|element| element.attribute("id") == Some(id))
    }

    /// Mutable element with the given `id`.
    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut MarkupElement> {
        self.find_mut(&|element| element.attribute("id") == Some(id))
    }

    /// First element carrying `class`.
    pub fn by_class(&self, class: &str) -> Option<&MarkupElement> {
        self.find(&|element| element.has_class(class))
    }

    /// Mutable first element carrying `class`.
    pub fn by_class_mut(&mut self, class: &str) -> Option<&mut MarkupElement> {
        self.find_mut(&|element| element.has_class(class))
    }

    /// First element with tag `tag`.
    pub fn by_tag(&self, tag: &str) -> Option<&MarkupElement> {
        self.find(&|element| element.tag == tag)
    }

    fn child_elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|child| match child {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Concatenated text of all descendants, ignoring raw style text.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                MarkupNode::Element(element) => element.collect_text(out),
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Raw(_) => {}
            }
        }
    }

    /// Serializes the element to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                let _ = write!(out, "=\"{}\"", escape(value, true));
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                MarkupNode::Element(element) => element.write_html(out),
                MarkupNode::Text(text) => out.push_str(&escape(text, false)),
                MarkupNode::Raw(raw) => out.push_str(raw),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Live (property, not attribute) state of the internal form control.
///
/// Seeded from the element state on every render; afterwards it follows user interaction and
/// is the authoritative source for value and checked getters.
pub struct LiveControl {
    /// Current value.
    pub value: String,
    /// Current checked state.
    pub checked: bool,
    /// Current indeterminate state.
    pub indeterminate: bool,
    /// Files reported by the platform picker.
    pub files: Vec<FileDescriptor>,
    /// Message installed through `setCustomValidity`.
    pub custom_validity: String,
}

#[derive(Debug, Clone, Default)]
/// Encapsulated render target of one element instance.
pub struct ShadowRoot {
    tree: Option<MarkupElement>,
    live: LiveControl,
    renders: u64,
}

impl ShadowRoot {
    /// Whether a render has completed.
    pub fn is_rendered(&self) -> bool {
        self.tree.is_some()
    }

    /// Rendered tree.
    pub fn tree(&self) -> Option<&MarkupElement> {
        self.tree.as_ref()
    }

    /// Mutable rendered tree.
    pub fn tree_mut(&mut self) -> Option<&mut MarkupElement> {
        self.tree.as_mut()
    }

    /// Live control properties, when rendered.
    pub fn live(&self) -> Option<&LiveControl> {
        self.tree.as_ref().map(|_| &self.live)
    }

    /// Mutable live control properties, when rendered.
    pub fn live_mut(&mut self) -> Option<&mut LiveControl> {
        if self.tree.is_some() {
            Some(&mut self.live)
        } else {
            None
        }
    }

    /// Number of full renders performed.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Serialized inner markup; empty before the first render.
    pub fn to_html(&self) -> String {
        self.tree
            .as_ref()
            .map(MarkupElement::children_html)
            .unwrap_or_default()
    }

    /// Element with `id` in the rendered tree.
    pub fn by_id(&self, id: &str) -> Option<&MarkupElement> {
        self.tree.as_ref().and_then(|tree| tree.by_id(id))
    }

    /// Mutable element with `id` in the rendered tree.
    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut MarkupElement> {
        self.tree.as_mut().and_then(|tree| tree.by_id_mut(id))
    }

    /// Replaces the whole fragment in one step.
    pub(crate) fn replace(&mut self, tree: MarkupElement, live: LiveControl) {
        self.tree = Some(tree);
        self.live = live;
        self.renders += 1;
    }
}

impl MarkupElement {
    /// Serialized children, used for fragment roots.
    fn children_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                MarkupNode::Element(element) => element.write_html(&mut out),
                MarkupNode::Text(text) => out.push_str(&escape(text, false)),
                MarkupNode::Raw(raw) => out.push_str(raw),
            }
        }
        out
    }
}
