use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Node, Window};

use crate::error::{BehaviorError, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(BehaviorError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document> {
    window.document().ok_or(BehaviorError::NoDocument)
}

pub fn body(document: &Document) -> Result<HtmlElement> {
    document.body().ok_or(BehaviorError::NoBody)
}

/// First match for `selector`. An invalid selector counts as no match.
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn children(element: &Element) -> Vec<Element> {
    let collection = element.children();
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

pub fn set_style(element: &Element, property: &str, value: &str) -> Result<()> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.style().set_property(property, value)?;
    }
    Ok(())
}

pub fn clear_style(element: &Element, property: &str) -> Result<()> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.style().remove_property(property)?;
    }
    Ok(())
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn add_class(element: &Element, class: &str) -> Result<()> {
    element.class_list().add_1(class)?;
    Ok(())
}

pub fn remove_class(element: &Element, class: &str) -> Result<()> {
    element.class_list().remove_1(class)?;
    Ok(())
}

pub fn set_class(element: &Element, class: &str, on: bool) -> Result<()> {
    if on {
        add_class(element, class)
    } else {
        remove_class(element, class)
    }
}

/// Whether the event originated inside `container`.
pub fn event_within(event: &Event, container: &Node) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .map(|node| container.contains(Some(&node)))
        .unwrap_or(false)
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Reports a failed DOM write from inside a handler, where nothing can take
/// the error.
pub fn log_failure(what: &str, result: Result<()>) {
    if let Err(e) = result {
        log::debug!("{} failed: {}", what, e);
    }
}

/// Attaches a listener for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
