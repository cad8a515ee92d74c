//! Headless Bootstrap Italia custom elements.
//!
//! Each element keeps its attributes, in-memory state and rendered fragment in sync, applies
//! ARIA wiring, and emits namespaced bubbling events. Elements live in a [`Document`] arena
//! that stands in for the page: it upgrades registered tags, dispatches events with bubbling
//! and cancellation, tracks focus, and records screen-reader announcements. The browser
//! binding in `it_elements_web` mounts the fragments into a real page.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod attributes;
pub mod components;
pub mod config;
pub mod document;
pub mod element;
/// Errors raised by misuse of the host document API and by invalid configuration.
pub mod error;
pub mod events;
pub mod markup;
pub mod model;
pub mod registry;
pub mod styles;
pub mod validity;

pub use components::{
    Alert, Button, ButtonGroup, Checkbox, FileInput, FormGroup, Radio, Select, SelectOption,
    TextArea, TextInput, Toggle,
};
pub use config::ElementsConfig;
pub use document::{Announcement, Document};
pub use element::{Component, ElementRef, Interaction};
pub use error::ElementError;
pub use events::{event_name, Event, EventDetail, EventKind};
pub use markup::{LiveControl, MarkupElement, ShadowRoot};
pub use model::{
    format_file_size, AlertKind, ButtonKind, ButtonSize, ButtonVariant, FileDescriptor,
    FormEntry, FormValue, GroupLayout, IconPosition, InputType, NativeButtonType, NodeId, Token,
    Validation,
};
pub use registry::{ElementRegistry, ELEMENT_TAGS, FORM_CONTROL_TAGS};
pub use validity::ValidityState;

/// Everything needed to build a document and drive its elements.
pub mod prelude {
    pub use crate::components::{
        Alert, Button, ButtonGroup, Checkbox, FileInput, FormGroup, Radio, Select, TextArea,
        TextInput, Toggle,
    };
    pub use crate::{
        Component, Document, ElementRegistry, ElementsConfig, Event, EventDetail, FileDescriptor,
        FormEntry, Interaction, NodeId, Validation,
    };
}
