//! Shared runtime driving one headless [`Document`] from the page.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use it_elements::{Document, ElementRegistry, ElementsConfig, LiveControl, NodeId, ShadowRoot};
use leptos::logging::warn;

use crate::interop;
use crate::translate::{self, ControlSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MountedHost {
    html: String,
    attributes: BTreeMap<String, String>,
    live: Option<LiveControl>,
}

type Mounted = Rc<RefCell<BTreeMap<NodeId, MountedHost>>>;

/// Cloneable handle to the page's element document.
///
/// Every mutation goes through [`ElementsRuntime::update`], which mirrors changed fragments and
/// host attributes into the mounted page elements afterwards. Emitted element events are
/// re-dispatched on the page as bubbling, composed `CustomEvent`s; page listeners run while the
/// document is busy, so re-entrant calls from them are rejected with a warning.
#[derive(Clone)]
pub struct ElementsRuntime {
    document: Rc<RefCell<Document>>,
    mounted: Mounted,
}

impl Default for ElementsRuntime {
    fn default() -> Self {
        Self::new(ElementsConfig::default())
    }
}

impl ElementsRuntime {
    /// Runtime over a fresh document with every element defined.
    pub fn new(config: ElementsConfig) -> Self {
        let document = Rc::new(RefCell::new(Document::with_config(
            ElementRegistry::with_all(),
            config,
        )));
        let mounted: Mounted = Rc::default();

        {
            let mut doc = document.borrow_mut();
            let targets = mounted.clone();
            doc.on_emit(move |event| {
                if !targets.borrow().contains_key(&event.target()) {
                    return true;
                }
                interop::dispatch_custom_event(event).unwrap_or_else(|err| {
                    warn!("dispatch of `{}` failed: {err}", event.name());
                    true
                })
            });

            let weak = Rc::downgrade(&document);
            doc.on_announce(move |announcement| {
                let node = announcement.node;
                if let Err(err) = interop::append_live_region(node, &announcement.message) {
                    warn!("live region for announcement {node} failed: {err}");
                }
                let weak = weak.clone();
                interop::schedule(announcement.ttl_ms, move || {
                    if let Some(document) = weak.upgrade() {
                        match document.try_borrow_mut() {
                            Ok(mut document) => document.retire_announcement(node),
                            Err(_) => warn!("document busy, announcement {node} left in place"),
                        }
                    }
                    if let Err(err) = interop::remove_host(node) {
                        warn!("live region {node} removal failed: {err}");
                    }
                });
            });
        }

        Self { document, mounted }
    }

    /// Reads the document; `None` while it is busy.
    pub fn read<R>(&self, read: impl FnOnce(&Document) -> R) -> Option<R> {
        match self.document.try_borrow() {
            Ok(document) => Some(read(&document)),
            Err(_) => {
                warn!("element document busy, read skipped");
                None
            }
        }
    }

    /// Mutates the document, then mirrors the result into the page. `None` while it is busy.
    pub fn update<R>(&self, update: impl FnOnce(&mut Document) -> R) -> Option<R> {
        let result = match self.document.try_borrow_mut() {
            Ok(mut document) => update(&mut document),
            Err(_) => {
                warn!("element document busy, update skipped");
                return None;
            }
        };
        self.sync();
        Some(result)
    }

    /// Creates the page host of `node` inside its mount container, renders its fragment into an
    /// open shadow root and starts delegating native events. Repeated calls only re-sync.
    pub fn connect(&self, node: NodeId) {
        if self.mounted.borrow().contains_key(&node) {
            self.sync();
            return;
        }
        let host = self.read(|document| {
            let attributes = document
                .attributes(node)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<Vec<_>>();
            document.tag(node).map(|tag| (tag.to_string(), attributes))
        });
        let Some((tag, attributes)) = host.flatten() else {
            warn!("cannot mount unknown element {node}");
            return;
        };

        if let Err(err) = interop::create_host(node, &tag, &attributes) {
            warn!("mounting <{tag}> {node} failed: {err}");
            return;
        }
        self.mounted.borrow_mut().insert(
            node,
            MountedHost {
                html: String::new(),
                attributes: attributes.into_iter().collect(),
                live: None,
            },
        );
        self.sync();

        let runtime = self.clone();
        let handler: interop::ControlHandler = Rc::new(move |event_type, control| {
            runtime.native_event(node, event_type, &control);
        });
        if let Err(err) = interop::listen(node, handler) {
            warn!("event delegation for {node} failed: {err}");
        }
    }

    /// Forgets the page host of `node`.
    pub fn disconnect(&self, node: NodeId) {
        self.mounted.borrow_mut().remove(&node);
    }

    /// Whether `node` has a page host.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.mounted.borrow().contains_key(&node)
    }

    /// Delivers a native event on `node`'s internal control. Returns whether it mapped to an
    /// interaction.
    pub fn native_event(&self, node: NodeId, event_type: &str, control: &ControlSnapshot) -> bool {
        let Some(interaction) = translate::interaction(event_type, control) else {
            return false;
        };
        if let Some(Err(err)) = self.update(|document| document.interact(node, interaction)) {
            warn!("`{event_type}` on {node} failed: {err}");
        }
        true
    }

    /// Mirrors changed fragments, live control properties and host attributes into the page.
    /// Returns the hosts touched.
    pub fn sync(&self) -> Vec<NodeId> {
        let Ok(document) = self.document.try_borrow() else {
            return Vec::new();
        };
        let mut mounted = self.mounted.borrow_mut();
        mounted.retain(|node, _| document.is_connected(*node));

        let mut touched = Vec::new();
        for (node, host) in mounted.iter_mut() {
            let mut changed = false;
            if let Some(shadow) = document.shadow(*node).filter(|shadow| shadow.is_rendered()) {
                let html = shadow.to_html();
                if html != host.html {
                    if let Err(err) = interop::mount_shadow(*node, &html) {
                        warn!("shadow root of {node} not updated: {err}");
                    }
                    host.html = html;
                    changed = true;
                }
            }

            let live = document.shadow(*node).and_then(ShadowRoot::live).cloned();
            if live != host.live || changed {
                if let Some(live) = &live {
                    if let Err(err) = interop::set_live(*node, live) {
                        warn!("live control of {node} not updated: {err}");
                    }
                }
                changed |= live != host.live;
                host.live = live;
            }

            let current: BTreeMap<String, String> = document
                .attributes(*node)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            let names: BTreeSet<&String> = current.keys().chain(host.attributes.keys()).collect();
            for name in names {
                let value = current.get(name);
                if value == host.attributes.get(name) {
                    continue;
                }
                let mirrored = interop::set_host_attribute(*node, name, value.map(String::as_str));
                if let Err(err) = mirrored {
                    warn!("attribute `{name}` of {node} not mirrored: {err}");
                }
                changed = true;
            }
            host.attributes = current;

            if changed {
                touched.push(*node);
            }
        }
        touched
    }

    /// Resolves once every element is defined, polling on the configured interval.
    pub async fn ready(&self) {
        let Some((registry, interval)) = self.read(|document| {
            (document.registry().clone(), document.config().ready_poll_interval())
        }) else {
            return;
        };
        registry.ready(interval, interop::sleep).await;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use it_elements::{
        Checkbox, Component, FormGroup, Interaction, Radio, TextInput, Validation,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn runtime_with(tag: &str, attributes: &[(&str, &str)]) -> (ElementsRuntime, NodeId) {
        let runtime = ElementsRuntime::default();
        let node = runtime
            .update(|document| {
                let body = document.body();
                document.append_element(body, tag, attributes)
            })
            .expect("idle")
            .expect("element");
        (runtime, node)
    }

    #[test]
    fn connect_mirrors_fragment_and_attributes() {
        let (runtime, node) = runtime_with(TextInput::TAG, &[("label", "Nome")]);
        assert!(!runtime.is_connected(node));
        runtime.connect(node);
        assert!(runtime.is_connected(node));
        assert_eq!(runtime.sync(), Vec::<NodeId>::new());

        runtime.update(|document| {
            document
                .element::<TextInput>(node)
                .expect("input")
                .set_validation(Validation::Invalid);
        });
        assert_eq!(runtime.sync(), Vec::<NodeId>::new());
        let mounted = runtime.mounted.borrow();
        let host = mounted.get(&node).expect("mounted");
        assert_eq!(host.attributes.get("validation").map(String::as_str), Some("invalid"));
        assert!(host.html.contains("is-invalid"));
    }

    #[test]
    fn native_events_drive_interactions() {
        let (runtime, node) = runtime_with(Checkbox::TAG, &[("name", "privacy")]);
        runtime.connect(node);
        let control = ControlSnapshot {
            input_type: Some("checkbox".to_string()),
            checked: true,
            ..ControlSnapshot::new("input")
        };
        assert!(runtime.native_event(node, "change", &control));
        assert!(!runtime.native_event(node, "keydown", &control));
        let checked = runtime
            .update(|document| document.element::<Checkbox>(node).expect("checkbox").checked())
            .expect("idle");
        assert!(checked);
    }

    #[test]
    fn group_reset_reaches_live_controls() {
        let (runtime, group) = runtime_with(FormGroup::TAG, &[]);
        let (input, checkbox) = runtime
            .update(|document| {
                let input = document.append_element(group, TextInput::TAG, &[("name", "nome")]);
                let checkbox = document.append_element(group, Checkbox::TAG, &[]);
                (input.expect("input"), checkbox.expect("checkbox"))
            })
            .expect("idle");
        for node in [group, input, checkbox] {
            runtime.connect(node);
        }
        let typed = ControlSnapshot {
            input_type: Some("text".to_string()),
            value: "abc".to_string(),
            ..ControlSnapshot::new("input")
        };
        let ticked = ControlSnapshot {
            input_type: Some("checkbox".to_string()),
            checked: true,
            ..ControlSnapshot::new("input")
        };
        assert!(runtime.native_event(input, "input", &typed));
        assert!(runtime.native_event(checkbox, "change", &ticked));
        assert_eq!(runtime.sync(), Vec::<NodeId>::new());

        runtime
            .document
            .borrow_mut()
            .element::<FormGroup>(group)
            .expect("group")
            .reset();
        let touched = runtime.sync();
        assert!(touched.contains(&input));
        assert!(touched.contains(&checkbox));

        let mounted = runtime.mounted.borrow();
        let live = |node: NodeId| mounted.get(&node).and_then(|host| host.live.clone());
        assert_eq!(live(input).map(|live| live.value), Some(String::new()));
        assert_eq!(live(checkbox).map(|live| live.checked), Some(false));
    }

    #[test]
    fn checking_a_radio_unchecks_its_mounted_peer() {
        let (runtime, first) = runtime_with(Radio::TAG, &[("name", "r"), ("value", "a")]);
        let second = runtime
            .update(|document| {
                let body = document.body();
                document.append_element(body, Radio::TAG, &[("name", "r"), ("value", "b")])
            })
            .expect("idle")
            .expect("radio");
        runtime.connect(first);
        runtime.connect(second);
        let checked = ControlSnapshot {
            input_type: Some("radio".to_string()),
            checked: true,
            ..ControlSnapshot::new("input")
        };

        runtime.native_event(first, "change", &checked);
        runtime.native_event(second, "change", &checked);
        let mounted = runtime.mounted.borrow();
        let live = |node: NodeId| mounted.get(&node).and_then(|host| host.live.clone());
        assert_eq!(live(first).map(|live| live.checked), Some(false));
        assert_eq!(live(second).map(|live| live.checked), Some(true));
    }

    #[test]
    fn removed_hosts_are_forgotten() {
        let (runtime, node) = runtime_with(FormGroup::TAG, &[]);
        runtime.connect(node);
        runtime.update(|document| document.remove(node).expect("remove"));
        assert!(!runtime.is_connected(node));
    }

    #[test]
    fn busy_document_rejects_reentrant_updates() {
        let (runtime, node) = runtime_with(TextInput::TAG, &[]);
        let inner = runtime.clone();
        let nested = runtime.update(move |document| {
            document.interact(node, Interaction::Input("x".to_string())).expect("input");
            inner.update(|_| ())
        });
        assert_eq!(nested, Some(None));
    }

    #[test]
    fn ready_resolves_with_every_element_defined() {
        let runtime = ElementsRuntime::default();
        block_on(runtime.ready());
    }
}
