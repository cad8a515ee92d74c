//! Checked state, interaction rules and property surface shared by checkbox, radio and toggle.

use crate::attributes;
use crate::element::{Component, Effect, ElementRef, Interaction};
use crate::events::{Event, EventDetail, EventKind};
use crate::markup::LiveControl;
use crate::model::{FormEntry, NodeId};

/// Value submitted by a checked control without a `value` attribute.
pub const DEFAULT_SUBMITTED_VALUE: &str = "on";

/// In-memory checked state and submitted value of a checkable control.
pub trait Checkable {
    /// Whether checking this control unchecks others sharing its name.
    const EXCLUSIVE: bool = false;

    /// Checked state mirrored from the `checked` attribute.
    fn checked_state(&self) -> bool;
    /// Updates the in-memory checked state.
    fn set_checked_state(&mut self, on: bool);
    /// `value` attribute.
    fn value_attribute(&self) -> &str;
    /// Updates the in-memory `value`.
    fn set_value_attribute(&mut self, value: String);

    /// Name reported in change details.
    fn group_name(&self) -> Option<&str> {
        None
    }

    /// Value submitted while checked.
    fn submitted_value(&self) -> &str {
        match self.value_attribute() {
            "" => DEFAULT_SUBMITTED_VALUE,
            value => value,
        }
    }

    /// Change, focus or blur event carrying the checked state.
    fn check_event(&self, tag: &str, kind: EventKind, checked: bool, node: NodeId) -> Effect {
        Effect::emit(Event::element(
            tag,
            kind,
            EventDetail::Checkable {
                checked,
                value: self.value_attribute().to_string(),
                name: self.group_name().map(str::to_string),
                element: node,
            },
        ))
    }
}

/// Applies the `checked` attribute.
pub fn apply_checked<S: Checkable>(state: &mut S, raw: Option<&str>) {
    state.set_checked_state(attributes::flag(raw));
}

/// Applies the `value` attribute.
pub fn apply_value<S: Checkable>(state: &mut S, raw: Option<&str>) {
    state.set_value_attribute(attributes::text(raw));
}

/// Attribute table of `value` and `checked` for component `$component`.
macro_rules! checkable_attributes {
    ($component:ty) => {
        &[
            $crate::attributes::AttributeSpec {
                name: "value",
                update: $crate::attributes::Update::Patch,
                apply: $crate::components::checkable::apply_value::<$component>,
            },
            $crate::attributes::AttributeSpec {
                name: "checked",
                update: $crate::attributes::Update::Patch,
                apply: $crate::components::checkable::apply_checked::<$component>,
            },
        ]
    };
}

pub(crate) use checkable_attributes;

/// Toggle, activation, focus and blur on a checkable control.
///
/// Activation flips checkboxes and checks radios. Disabled controls ignore both; a checked
/// radio ignores activation.
pub fn check_interaction<S: Checkable>(
    state: &mut S,
    tag: &str,
    node: NodeId,
    disabled: bool,
    live: &mut LiveControl,
    interaction: Interaction,
) -> Vec<Effect> {
    let target = match interaction {
        Interaction::Focus => {
            return vec![state.check_event(tag, EventKind::Focus, live.checked, node)];
        }
        Interaction::Blur => {
            return vec![state.check_event(tag, EventKind::Blur, live.checked, node)];
        }
        Interaction::Toggle(on) => on,
        Interaction::Click if S::EXCLUSIVE => true,
        Interaction::Click => !live.checked,
        _ => return Vec::new(),
    };
    if disabled || (S::EXCLUSIVE && live.checked && target) {
        return Vec::new();
    }
    live.checked = target;
    live.indeterminate = false;
    state.set_checked_state(target);

    let mut effects = Vec::new();
    if S::EXCLUSIVE && target {
        if let Some(name) = state.group_name() {
            effects.push(Effect::UncheckRadios {
                name: name.to_string(),
                except: node,
            });
        }
    }
    effects.push(state.check_event(tag, EventKind::Change, target, node));
    effects
}

/// Submission entry of a checked, named control.
pub fn check_entries<S: Checkable>(
    state: &S,
    name: Option<&str>,
    live: &LiveControl,
) -> Vec<FormEntry> {
    match name {
        Some(name) if live.checked => vec![FormEntry::text(name, state.submitted_value())],
        _ => Vec::new(),
    }
}

impl<C: Component + Checkable> ElementRef<'_, C> {
    /// Current checked state: the live control once rendered, the in-memory flag before.
    pub fn checked(&self) -> bool {
        self.read(|state, live| match live {
            Some(live) => live.checked,
            None => state.checked_state(),
        })
    }

    /// Sets or removes `checked` and updates the live control.
    ///
    /// Checking an exclusive control unchecks the others sharing its name.
    pub fn set_checked(&mut self, on: bool) {
        self.set_flag("checked", on);
        self.with_live(|live| live.checked = on);
        if !(C::EXCLUSIVE && on) {
            return;
        }
        let name = self
            .attribute("name")
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        if let Some(name) = name {
            let node = self.node();
            self.document_mut()
                .apply(vec![Effect::UncheckRadios { name, except: node }]);
        }
    }

    /// Submitted value, `on` when `value` is unset.
    pub fn submitted_value(&self) -> String {
        self.read(|state, _| state.submitted_value().to_string())
    }
}
