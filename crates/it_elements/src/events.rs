//! Namespaced element events and their serializable detail payloads.

use std::cell::Cell;

use serde::Serialize;

use crate::model::{AlertKind, ButtonKind, ButtonSize, ButtonVariant, FileDescriptor, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Interaction class carried in the event name suffix.
pub enum EventKind {
    /// Value, checked or file list changed.
    Change,
    /// Internal control gained focus.
    Focus,
    /// Internal control lost focus.
    Blur,
    /// Activation of a button.
    Click,
    /// Alert dismissed.
    Dismiss,
    /// One selected file removed.
    Remove,
    /// Selected files cleared.
    Clear,
}

impl EventKind {
    /// Suffix appended to the element tag.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Click => "click",
            Self::Dismiss => "dismiss",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }
}

/// Full event name for `tag`, e.g. `it-form-input-change`.
pub fn event_name(tag: &str, kind: EventKind) -> String {
    format!("{tag}-{}", kind.suffix())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
/// `detail` payload of an element event. `element` is the originating host node.
pub enum EventDetail {
    /// Text-like controls and selects.
    Value {
        /// Current value.
        value: String,
        /// Originating element.
        element: NodeId,
    },
    /// Checkbox, radio and toggle.
    Checkable {
        /// Current checked state.
        checked: bool,
        /// Submitted value.
        value: String,
        /// Radio group name.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Originating element.
        element: NodeId,
    },
    /// File selection, focus and blur.
    Files {
        /// Selected files.
        files: Vec<FileDescriptor>,
        /// Originating element.
        element: NodeId,
    },
    /// One file removed.
    FileRemoved {
        /// Remaining files.
        files: Vec<FileDescriptor>,
        /// Index the file had before removal.
        #[serde(rename = "removedIndex")]
        removed_index: usize,
        /// Originating element.
        element: NodeId,
    },
    /// Alert dismissal.
    Alert {
        /// Alert type.
        #[serde(rename = "type")]
        kind: AlertKind,
        /// Originating element.
        element: NodeId,
    },
    /// Button activation.
    Button {
        /// Button type.
        #[serde(rename = "type")]
        kind: ButtonKind,
        /// Button variant.
        variant: Option<ButtonVariant>,
        /// Originating element.
        element: NodeId,
    },
    /// Button activation re-emitted by the enclosing group.
    GroupClick {
        /// Activated button.
        button: NodeId,
        /// Button type.
        #[serde(rename = "buttonType")]
        button_type: ButtonKind,
        /// Button variant.
        #[serde(rename = "buttonVariant")]
        button_variant: Option<ButtonVariant>,
        /// Group size.
        #[serde(rename = "groupSize")]
        group_size: Option<ButtonSize>,
        /// Whether the group is vertical.
        #[serde(rename = "groupVertical")]
        group_vertical: bool,
        /// Originating group.
        element: NodeId,
    },
    /// Events carrying only the originating element (button focus, file clear).
    Element {
        /// Originating element.
        element: NodeId,
    },
}

impl EventDetail {
    /// Originating element of the payload.
    pub fn element(&self) -> NodeId {
        match self {
            Self::Value { element, .. }
            | Self::Checkable { element, .. }
            | Self::Files { element, .. }
            | Self::FileRemoved { element, .. }
            | Self::Alert { element, .. }
            | Self::Button { element, .. }
            | Self::GroupClick { element, .. }
            | Self::Element { element } => *element,
        }
    }
}

#[derive(Debug, Clone)]
/// Event travelling through the host document.
///
/// Propagation flags use interior mutability so listeners receive a shared reference.
pub struct Event {
    name: String,
    detail: EventDetail,
    bubbles: bool,
    cancelable: bool,
    target: NodeId,
    current_target: Cell<NodeId>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Bubbling, non-cancelable element event named after `tag` and `kind`.
    pub fn element(tag: &str, kind: EventKind, detail: EventDetail) -> Self {
        let target = detail.element();
        Self {
            name: event_name(tag, kind),
            detail,
            bubbles: true,
            cancelable: false,
            target,
            current_target: Cell::new(target),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Marks the event cancelable.
    pub fn cancelable(mut self) -> Self {
        self.cancelable = true;
        self
    }

    /// Marks the event non-bubbling.
    pub fn non_bubbling(mut self) -> Self {
        self.bubbles = false;
        self
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detail payload.
    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Whether the event bubbles to ancestors.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether `prevent_default` has any effect.
    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Node the event was dispatched on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    /// Stops propagation after the current node's listeners.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Cancels the default action of a cancelable event.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Whether the default action was cancelled.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
