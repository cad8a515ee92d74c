//! Page interop for the element runtime.
//!
//! Routes calls to the wasm implementation in the browser and to inert fallbacks elsewhere, so
//! the runtime compiles and is testable on any target.

use std::rc::Rc;
use std::time::Duration;

use it_elements::{Event, LiveControl, NodeId};

use crate::translate::ControlSnapshot;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

/// Native events delegated from each shadow root.
pub const DELEGATED_EVENTS: [&str; 5] = ["input", "change", "click", "focusin", "focusout"];

/// Callback receiving a delegated native event type and the control it targeted.
pub type ControlHandler = Rc<dyn Fn(&str, ControlSnapshot)>;

/// Selector of the page element hosting `node`.
pub fn host_selector(node: NodeId) -> String {
    format!("[data-it-node=\"{}\"]", node.0)
}

/// Selector of the container `node` is mounted into.
pub fn mount_selector(node: NodeId) -> String {
    format!("[data-it-mount=\"{}\"]", node.0)
}

pub async fn sleep(duration: Duration) {
    imp::sleep(duration).await
}

pub fn dispatch_custom_event(event: &Event) -> Result<bool, String> {
    imp::dispatch_custom_event(event)
}

pub fn create_host(node: NodeId, tag: &str, attributes: &[(String, String)]) -> Result<(), String> {
    imp::create_host(node, tag, attributes)
}

pub fn mount_shadow(node: NodeId, html: &str) -> Result<(), String> {
    imp::mount_shadow(node, html)
}

pub fn set_host_attribute(node: NodeId, name: &str, value: Option<&str>) -> Result<(), String> {
    imp::set_host_attribute(node, name, value)
}

pub fn set_live(node: NodeId, live: &LiveControl) -> Result<(), String> {
    imp::set_live(node, live)
}

pub fn listen(node: NodeId, handler: ControlHandler) -> Result<(), String> {
    imp::listen(node, handler)
}

pub fn append_live_region(node: NodeId, message: &str) -> Result<(), String> {
    imp::append_live_region(node, message)
}

pub fn remove_host(node: NodeId) -> Result<(), String> {
    imp::remove_host(node)
}

pub fn schedule(delay_ms: u64, callback: impl FnOnce() + 'static) {
    imp::schedule(delay_ms, callback)
}
