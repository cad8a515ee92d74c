//! Browser binding for `it_elements`.
//!
//! [`ElementsRuntime`] owns the page's headless document. [`ElementHost`] mounts an element into
//! the page through Leptos: the runtime renders its fragment into a real open shadow root,
//! translates native events on the internal controls into interactions, re-dispatches element
//! events as bubbling `CustomEvent`s with a serialized `detail`, and retires screen-reader
//! announcements with a browser timer. Non-wasm builds keep the same API over inert page
//! interop, so the runtime is testable on any target.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod interop;
pub mod runtime;
pub mod translate;
mod view;

pub use runtime::ElementsRuntime;
pub use translate::{interaction, ControlSnapshot};
pub use view::ElementHost;

pub use interop::{host_selector, mount_selector, DELEGATED_EVENTS};
