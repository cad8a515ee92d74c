//! Explicit element registration and the asynchronous readiness check.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use leptos::logging::log;

use crate::components::{
    Alert, Button, ButtonGroup, Checkbox, FileInput, FormGroup, Radio, Select, TextArea,
    TextInput, Toggle,
};
use crate::element::{construct, Component, CustomElement, IdAllocator};

/// Builds a fresh, unconnected element instance.
pub type Constructor = fn(&mut IdAllocator) -> Box<dyn CustomElement>;

/// Tags of every element shipped by this crate.
pub const ELEMENT_TAGS: [&str; 11] = [
    Alert::TAG,
    Button::TAG,
    ButtonGroup::TAG,
    TextInput::TAG,
    TextArea::TAG,
    Select::TAG,
    Checkbox::TAG,
    Radio::TAG,
    FileInput::TAG,
    Toggle::TAG,
    FormGroup::TAG,
];

/// Tags of the descendant form controls a group aggregates.
pub const FORM_CONTROL_TAGS: [&str; 7] = [
    TextInput::TAG,
    TextArea::TAG,
    Select::TAG,
    Checkbox::TAG,
    Radio::TAG,
    FileInput::TAG,
    Toggle::TAG,
];

#[derive(Default)]
struct RegistryState {
    constructors: BTreeMap<String, Constructor>,
}

/// Shared custom-element registry.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ElementRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl ElementRegistry {
    /// Registry with every element of this crate defined.
    pub fn with_all() -> Self {
        let registry = Self::default();
        registry.define_all();
        registry
    }

    /// Registers `constructor` for `tag`; returns `false` when the tag is already defined.
    pub fn define(&self, tag: &str, constructor: Constructor) -> bool {
        let mut state = self.state.borrow_mut();
        if state.constructors.contains_key(tag) {
            log!("custom element `{tag}` already defined, skipping");
            return false;
        }
        state.constructors.insert(tag.to_string(), constructor);
        true
    }

    /// Registers component `C` under its tag.
    pub fn define_component<C: Component>(&self) -> bool {
        self.define(C::TAG, construct::<C>)
    }

    /// Registers every element of this crate, skipping tags already defined.
    pub fn define_all(&self) {
        self.define_component::<Alert>();
        self.define_component::<Button>();
        self.define_component::<ButtonGroup>();
        self.define_component::<TextInput>();
        self.define_component::<TextArea>();
        self.define_component::<Select>();
        self.define_component::<Checkbox>();
        self.define_component::<Radio>();
        self.define_component::<FileInput>();
        self.define_component::<Toggle>();
        self.define_component::<FormGroup>();
    }

    /// Constructor registered for `tag`.
    pub fn get(&self, tag: &str) -> Option<Constructor> {
        self.state.borrow().constructors.get(tag).copied()
    }

    /// Whether `tag` is defined.
    pub fn is_defined(&self, tag: &str) -> bool {
        self.state.borrow().constructors.contains_key(tag)
    }

    /// Whether every element of this crate is defined.
    pub fn is_ready(&self) -> bool {
        ELEMENT_TAGS.iter().all(|tag| self.is_defined(tag))
    }

    /// Resolves once [`ElementRegistry::is_ready`] holds, checking every `interval`.
    ///
    /// There is no timeout: the future stays pending until every tag is defined.
    pub async fn ready<S, F>(&self, interval: Duration, sleep: S)
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        while !self.is_ready() {
            sleep(interval).await;
        }
    }
}
