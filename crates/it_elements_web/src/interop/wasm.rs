use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CustomEvent, CustomEventInit, Element, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, ShadowRootInit, ShadowRootMode,
};

use it_elements::FileDescriptor;

use super::*;

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

fn document() -> Result<web_sys::Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document unavailable".to_string())
}

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn query(selector: &str) -> Result<Element, String> {
    document()?
        .query_selector(selector)
        .map_err(js_error)?
        .ok_or_else(|| format!("no element matches {selector}"))
}

fn host(node: NodeId) -> Result<Element, String> {
    query(&host_selector(node))
}

fn timeout_ms(delay_ms: u64) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

pub async fn sleep(duration: Duration) {
    let delay = timeout_ms(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
    let promise = js_sys::Promise::new(&mut |resolve, _reject| match web_sys::window() {
        Some(window) => {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay);
        }
        None => {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

pub fn dispatch_custom_event(event: &Event) -> Result<bool, String> {
    let target = host(event.target())?;
    let detail = event
        .detail()
        .serialize(&Serializer::json_compatible())
        .map_err(|err| err.to_string())?;
    let init = CustomEventInit::new();
    init.set_bubbles(event.bubbles());
    init.set_cancelable(event.is_cancelable());
    init.set_composed(true);
    init.set_detail(&detail);
    let custom = CustomEvent::new_with_event_init_dict(event.name(), &init).map_err(js_error)?;
    target.dispatch_event(&custom).map_err(js_error)
}

pub fn create_host(node: NodeId, tag: &str, attributes: &[(String, String)]) -> Result<(), String> {
    let container = query(&mount_selector(node))?;
    let host = document()?.create_element(tag).map_err(js_error)?;
    host.set_attribute("data-it-node", &node.0.to_string())
        .map_err(js_error)?;
    for (name, value) in attributes {
        host.set_attribute(name, value).map_err(js_error)?;
    }
    while let Some(child) = container.first_child() {
        host.append_child(&child).map_err(js_error)?;
    }
    container.append_child(&host).map_err(js_error)?;
    Ok(())
}

pub fn mount_shadow(node: NodeId, html: &str) -> Result<(), String> {
    let host = host(node)?;
    let root = match host.shadow_root() {
        Some(root) => root,
        None => host
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(js_error)?,
    };
    root.set_inner_html(html);
    Ok(())
}

pub fn set_host_attribute(node: NodeId, name: &str, value: Option<&str>) -> Result<(), String> {
    let host = host(node)?;
    match value {
        Some(value) => host.set_attribute(name, value).map_err(js_error),
        None => host.remove_attribute(name).map_err(js_error),
    }
}

pub fn set_live(node: NodeId, live: &LiveControl) -> Result<(), String> {
    let Some(root) = host(node)?.shadow_root() else {
        return Ok(());
    };
    let Some(control) = root
        .query_selector("input, textarea, select")
        .map_err(js_error)?
    else {
        return Ok(());
    };
    if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        match input.type_().as_str() {
            "checkbox" | "radio" => {
                input.set_checked(live.checked);
                input.set_indeterminate(live.indeterminate);
            }
            "file" => {
                if live.files.is_empty() {
                    input.set_value("");
                }
            }
            _ if input.value() != live.value => input.set_value(&live.value),
            _ => {}
        }
    } else if let Some(textarea) = control.dyn_ref::<HtmlTextAreaElement>() {
        if textarea.value() != live.value {
            textarea.set_value(&live.value);
        }
    } else if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
        if select.value() != live.value {
            select.set_value(&live.value);
        }
    }
    Ok(())
}

fn snapshot(event_type: &str, target: Element) -> ControlSnapshot {
    let control = if event_type == "click" {
        target.closest("button").ok().flatten().unwrap_or(target)
    } else {
        target
    };
    let mut snapshot = ControlSnapshot {
        tag: control.tag_name().to_ascii_lowercase(),
        remove_index: control
            .get_attribute("data-index")
            .and_then(|index| index.parse().ok()),
        ..ControlSnapshot::default()
    };
    if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        snapshot.input_type = Some(input.type_());
        snapshot.value = input.value();
        snapshot.checked = input.checked();
        if let Some(list) = input.files() {
            snapshot.files = (0..list.length())
                .filter_map(|index| list.get(index))
                .map(|file| FileDescriptor::new(file.name(), file.size() as u64))
                .collect();
        }
    } else if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
        snapshot.value = select.value();
    } else if let Some(textarea) = control.dyn_ref::<HtmlTextAreaElement>() {
        snapshot.value = textarea.value();
    }
    snapshot
}

pub fn listen(node: NodeId, handler: ControlHandler) -> Result<(), String> {
    let host = host(node)?;
    let root = host
        .shadow_root()
        .ok_or_else(|| format!("host {node} has no shadow root"))?;
    for event_type in DELEGATED_EVENTS {
        let handler = handler.clone();
        let listener = move |event: web_sys::Event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            let event_type = event.type_();
            handler(&event_type, snapshot(&event_type, target));
        };
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(listener));
        root.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        callback.forget();
    }
    Ok(())
}

pub fn append_live_region(node: NodeId, message: &str) -> Result<(), String> {
    let document = document()?;
    let region = document.create_element("div").map_err(js_error)?;
    let id = node.0.to_string();
    for (name, value) in [
        ("aria-atomic", "true"),
        ("aria-live", "polite"),
        ("class", "visually-hidden"),
        ("data-it-node", id.as_str()),
        ("role", "status"),
    ] {
        region.set_attribute(name, value).map_err(js_error)?;
    }
    region.set_text_content(Some(message));
    document
        .body()
        .ok_or_else(|| "document body unavailable".to_string())?
        .append_child(&region)
        .map_err(js_error)?;
    Ok(())
}

pub fn remove_host(node: NodeId) -> Result<(), String> {
    host(node)?.remove();
    Ok(())
}

pub fn schedule(delay_ms: u64, callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(callback);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        timeout_ms(delay_ms),
    );
}
