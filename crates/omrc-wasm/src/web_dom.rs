// File: omrc-wasm/src/web_dom.rs
// Purpose: `Dom` implementation over the live browser document

use omrc_ui::dom::{EventHandler, VisibilityHandler};
use omrc_ui::{Dom, DomError, DomEvent, EventKind, ScrollAlign, Subscription, VisibilityOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

type Result<T> = std::result::Result<T, DomError>;

/// Render a thrown JS value for error messages
pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn js_err(value: JsValue) -> DomError {
    DomError::Js(describe_js(&value))
}

/// Handle to the window's document. Clones share the same page.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| DomError::Js("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Js("window has no document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn html(node: &Element) -> Result<&HtmlElement> {
        node.dyn_ref::<HtmlElement>().ok_or_else(|| DomError::Unsupported {
            tag: node.tag_name().to_lowercase(),
            operation: "inline styles",
        })
    }

    fn attach(&self, target: EventTarget, kind: EventKind, mut handler: EventHandler<Element>) -> Result<Subscription> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let Some(origin) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let dom_event = DomEvent::new(kind, origin);
            handler(&dom_event);
            if dom_event.default_prevented() {
                event.prevent_default();
            }
        });

        target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            .map_err(js_err)?;

        Ok(Subscription::new(move || {
            if let Err(e) =
                target.remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            {
                tracing::warn!("removing {} listener failed: {}", kind, describe_js(&e));
            }
            drop(closure);
        }))
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, scope: Option<&Element>, selector: &str) -> Result<Vec<Element>> {
        let list = match scope {
            Some(scope) => scope.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        }
        .map_err(|e| DomError::selector(selector, describe_js(&e)))?;

        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn query_first(&self, scope: Option<&Element>, selector: &str) -> Result<Option<Element>> {
        match scope {
            Some(scope) => scope.query_selector(selector),
            None => self.document.query_selector(selector),
        }
        .map_err(|e| DomError::selector(selector, describe_js(&e)))
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let other: &web_sys::Node = node.as_ref();
        ancestor.contains(Some(other))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value).map_err(js_err)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list().remove_1(class).map_err(js_err)
    }

    fn style(&self, node: &Element, property: &str) -> String {
        Self::html(node)
            .ok()
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<()> {
        let style = Self::html(node)?.style();
        if value.is_empty() {
            style.remove_property(property).map(|_| ()).map_err(js_err)
        } else {
            style.set_property(property, value).map_err(js_err)
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            node.get_attribute("value").unwrap_or_default()
        }
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>()
            .map_or(false, HtmlInputElement::checked)
    }

    fn reset_form(&self, form: &Element) -> Result<()> {
        let form = form
            .dyn_ref::<HtmlFormElement>()
            .ok_or_else(|| DomError::Unsupported {
                tag: form.tag_name().to_lowercase(),
                operation: "reset",
            })?;
        form.reset();
        Ok(())
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document.create_element(tag).map_err(js_err)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn scroll_into_view(&self, node: &Element, align: ScrollAlign) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(match align {
            ScrollAlign::Start => ScrollLogicalPosition::Start,
            ScrollAlign::Center => ScrollLogicalPosition::Center,
        });
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!("alert failed: {}", describe_js(&e));
        }
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.window.location().set_href(url).map_err(js_err)
    }

    fn listen(&self, target: &Element, kind: EventKind, handler: EventHandler<Element>) -> Result<Subscription> {
        self.attach(target.clone().into(), kind, handler)
    }

    fn listen_document(&self, kind: EventKind, handler: EventHandler<Element>) -> Result<Subscription> {
        self.attach(self.document.clone().into(), kind, handler)
    }

    fn observe_visibility(
        &self,
        targets: &[Element],
        options: &VisibilityOptions,
        mut handler: VisibilityHandler<Element>,
    ) -> Result<Subscription> {
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(DomError::Js(format!(
                "threshold {} is outside 0.0..=1.0",
                options.threshold
            )));
        }

        let once = options.once;
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    handler(&target);
                    if once {
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(js_err)?;
        for target in targets {
            observer.observe(target);
        }

        Ok(Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}
