//! View materialization and mount root management
//!
//! Turns a [`ViewNode`] tree into something visible. On wasm32 the mount
//! root wraps a live DOM element: mounting clears it and appends freshly
//! built nodes. Off-browser the mount root records the rendered HTML string,
//! which is what the integration tests inspect. The router core is identical
//! on both targets.

use crate::component::{el, ViewNode};
use crate::error::RenderError;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Build the inline error panel shown when a top-level render fails.
///
/// A broken page must stay visible and diagnosable, never a blank screen.
pub fn error_panel(message: &str) -> ViewNode {
    el("div")
        .attr("class", "router-error")
        .attr(
            "style",
            "padding:16px;margin:16px;border:1px solid #c00;background:#fff0f0;color:#900;font-family:monospace;",
        )
        .child(el("strong").text("Route render error").build())
        .child(el("pre").text(message).build())
        .build()
}

/// The element the router renders into.
#[derive(Debug)]
pub struct MountRoot {
    selector: String,
    #[cfg(target_arch = "wasm32")]
    element: web_sys::Element,
    #[cfg(not(target_arch = "wasm32"))]
    html: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl MountRoot {
    /// Create a mount root for the given selector.
    pub fn new(selector: impl Into<String>) -> Result<Self, RenderError> {
        Ok(Self {
            selector: selector.into(),
            html: String::new(),
        })
    }

    /// Replace the root's content with the rendered view.
    pub fn mount(&mut self, view: &ViewNode) -> Result<(), RenderError> {
        self.html = view.render_to_string();
        Ok(())
    }

    /// The HTML most recently mounted.
    pub fn html(&self) -> &str {
        &self.html
    }
}

#[cfg(target_arch = "wasm32")]
impl MountRoot {
    /// Look up the mount element by CSS selector.
    pub fn new(selector: impl Into<String>) -> Result<Self, RenderError> {
        let selector = selector.into();
        let document = document()?;
        let element = document
            .query_selector(&selector)
            .map_err(|e| RenderError::Dom(format!("{:?}", e)))?
            .ok_or_else(|| RenderError::Dom(format!("no element matches '{}'", selector)))?;
        Ok(Self { selector, element })
    }

    /// Replace the root's content with freshly materialized DOM nodes.
    pub fn mount(&mut self, view: &ViewNode) -> Result<(), RenderError> {
        let document = document()?;
        let fragment = document.create_document_fragment();
        append_view(&document, fragment.as_ref(), view)?;

        self.element.set_inner_html("");
        self.element
            .append_child(fragment.as_ref())
            .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
        Ok(())
    }

    /// Replace the root's content with a timed crossfade.
    ///
    /// The outgoing children move into an absolutely positioned overlay that
    /// fades to 0 while the incoming content fades in from 0; a wall-clock
    /// timer removes the overlay after `duration_ms`. The navigation itself
    /// never waits for the animation, and a later navigation that clears the
    /// root simply detaches the overlay before the timer fires.
    #[cfg(feature = "transition")]
    pub fn mount_fade(&mut self, view: &ViewNode, duration_ms: u64) -> Result<(), RenderError> {
        use wasm_bindgen::closure::Closure;

        let document = document()?;
        let dom_err = |e: wasm_bindgen::JsValue| RenderError::Dom(format!("{:?}", e));

        if let Some(host) = self.element.dyn_ref::<web_sys::HtmlElement>() {
            let _ = host.style().set_property("position", "relative");
        }

        let outgoing = document.create_element("div").map_err(dom_err)?;
        outgoing
            .set_attribute(
                "style",
                &format!(
                    "position:absolute;inset:0;opacity:1;transition:opacity {}ms ease;",
                    duration_ms
                ),
            )
            .map_err(dom_err)?;
        while let Some(child) = self.element.first_child() {
            outgoing.append_child(&child).map_err(dom_err)?;
        }

        let incoming = document.create_element("div").map_err(dom_err)?;
        incoming
            .set_attribute(
                "style",
                &format!("opacity:0;transition:opacity {}ms ease;", duration_ms),
            )
            .map_err(dom_err)?;
        append_view(&document, incoming.as_ref(), view)?;

        self.element.append_child(outgoing.as_ref()).map_err(dom_err)?;
        self.element.append_child(incoming.as_ref()).map_err(dom_err)?;

        // Reading offsetHeight commits the opacity-0 start state before the
        // transitions kick in.
        if let Some(element) = incoming.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.offset_height();
            let _ = element.style().set_property("opacity", "1");
        }
        if let Some(element) = outgoing.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.style().set_property("opacity", "0");
        }

        if let Some(window) = web_sys::window() {
            let callback = Closure::once_into_js(move || outgoing.remove());
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                duration_ms as i32,
            );
        }
        Ok(())
    }
}

impl MountRoot {
    /// The selector this root was created from.
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Materialize a view tree under `parent`.
#[cfg(target_arch = "wasm32")]
fn append_view(
    document: &web_sys::Document,
    parent: &web_sys::Node,
    view: &ViewNode,
) -> Result<(), RenderError> {
    match view {
        ViewNode::Element {
            tag,
            attrs,
            children,
        } => {
            let element = document
                .create_element(tag)
                .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
            for (name, value) in attrs {
                element
                    .set_attribute(name, value)
                    .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
            }
            for child in children {
                append_view(document, element.as_ref(), child)?;
            }
            parent
                .append_child(element.as_ref())
                .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
        }
        ViewNode::Text(text) => {
            let node = document.create_text_node(text);
            parent
                .append_child(node.as_ref())
                .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
        }
        ViewNode::RawHtml(html) => {
            // Parse through a detached element, then move the children over.
            let holder = document
                .create_element("div")
                .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
            holder.set_inner_html(html);
            while let Some(child) = holder.first_child() {
                parent
                    .append_child(&child)
                    .map_err(|e| RenderError::Dom(format!("{:?}", e)))?;
            }
        }
        ViewNode::Fragment(children) => {
            for child in children {
                append_view(document, parent, child)?;
            }
        }
        ViewNode::Empty => {}
    }
    Ok(())
}

/// Reset the viewport scroll after a committed navigation.
#[cfg(target_arch = "wasm32")]
pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_to_top() {}

/// Dispatch the `routechange` event on `window` with `{ path, params }`
/// detail, so collaborators like analytics can observe navigation without
/// holding a router handle.
#[cfg(target_arch = "wasm32")]
pub fn dispatch_route_change(path: &str, params: &crate::params::RouteParams) {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return;
    };

    let detail = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&detail, &JsValue::from_str("path"), &JsValue::from_str(path));
    let param_obj = js_sys::Object::new();
    for (name, value) in params.iter() {
        let _ = js_sys::Reflect::set(
            &param_obj,
            &JsValue::from_str(name),
            &JsValue::from_str(value),
        );
    }
    let _ = js_sys::Reflect::set(&detail, &JsValue::from_str("params"), &param_obj);

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict("routechange", &init) {
        let _ = window.dispatch_event(&event);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn dispatch_route_change(_path: &str, _params: &crate::params::RouteParams) {}

/// Extract a router-handled target path from a document click.
///
/// Returns `None` when the click must be left to the browser: modified
/// clicks, non-anchor targets, `target="_blank"`, `data-external` opt-outs,
/// downloads, and cross-origin destinations.
#[cfg(target_arch = "wasm32")]
pub fn anchor_target_from_click(event: &web_sys::MouseEvent) -> Option<String> {
    if event.default_prevented()
        || event.button() != 0
        || event.ctrl_key()
        || event.meta_key()
        || event.shift_key()
        || event.alt_key()
    {
        return None;
    }

    let target = event.target()?;
    let element = target.dyn_ref::<web_sys::Element>()?;
    let anchor = element
        .closest("a[href]")
        .ok()??
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .ok()?;

    if anchor.has_attribute("data-external")
        || anchor.has_attribute("download")
        || !anchor.target().is_empty()
    {
        return None;
    }

    let window = web_sys::window()?;
    let origin = window.location().origin().ok()?;
    if anchor.origin() != origin {
        return None;
    }

    Some(format!("{}{}", anchor.pathname(), anchor.search()))
}

#[cfg(target_arch = "wasm32")]
fn document() -> Result<web_sys::Document, RenderError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RenderError::Dom("no document".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_panel_shows_message() {
        let html = error_panel("component render failed: boom").render_to_string();
        assert!(html.contains("router-error"));
        assert!(html.contains("component render failed: boom"));
    }

    #[test]
    fn error_panel_escapes_message() {
        let html = error_panel("<script>alert(1)</script>").render_to_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn mount_root_records_html() {
        let mut root = MountRoot::new("#app").unwrap();
        assert_eq!(root.selector(), "#app");
        assert_eq!(root.html(), "");

        root.mount(&el("main").text("hello").build()).unwrap();
        assert_eq!(root.html(), "<main>hello</main>");
    }
}
