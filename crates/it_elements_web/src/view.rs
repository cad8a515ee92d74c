//! Leptos mount point for one headless element.

use it_elements::NodeId;
use leptos::*;

use crate::runtime::ElementsRuntime;

/// Mount container of `node`.
///
/// Once the container is in the page the runtime creates the element's host inside it, moves
/// `children` into the host as its light DOM, and attaches the rendered shadow root. Nested
/// elements (group members, grouped buttons) are `ElementHost`s among the children.
#[component]
pub fn ElementHost(
    runtime: ElementsRuntime,
    node: NodeId,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let container = create_node_ref::<html::Div>();
    let mount_id = node.0.to_string();

    let mount_runtime = runtime.clone();
    create_effect(move |mounted: Option<bool>| {
        if mounted == Some(true) {
            return true;
        }
        if container.get().is_none() {
            return false;
        }
        mount_runtime.connect(node);
        true
    });
    on_cleanup(move || runtime.disconnect(node));

    view! {
        <div class="it-element-host" data-it-mount=mount_id node_ref=container>
            {children.map(|children| children())}
        </div>
    }
}
