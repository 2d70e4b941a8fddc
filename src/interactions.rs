use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

use crate::dom;
use crate::error::Result;
use crate::page::Page;
use crate::schedule::Scheduler;

const RIPPLE_STYLE_ID: &str = "ripple-animation";
const RIPPLE_KEYFRAMES: &str = "@keyframes ripple { to { transform: scale(2); opacity: 0; } }";

/// Placement of one click ripple, relative to the button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl Ripple {
    /// Centres a circle as large as the button's longer side on the click point.
    pub fn at(
        rect_left: f64,
        rect_top: f64,
        width: f64,
        height: f64,
        client_x: f64,
        client_y: f64,
    ) -> Self {
        let size = width.max(height);
        Self {
            size,
            left: client_x - rect_left - size / 2.0,
            top: client_y - rect_top - size / 2.0,
        }
    }

    pub fn css(&self, duration_ms: u32) -> String {
        format!(
            "position: absolute; width: {size}px; height: {size}px; left: {left}px; top: {top}px; \
             background: rgba(255, 255, 255, 0.3); border-radius: 50%; transform: scale(0); \
             animation: ripple {duration_ms}ms ease-out; pointer-events: none;",
            size = self.size,
            left = self.left,
            top = self.top,
        )
    }
}

fn ensure_ripple_keyframes(document: &Document) -> Result<()> {
    if document.get_element_by_id(RIPPLE_STYLE_ID).is_some() {
        return Ok(());
    }
    let Some(head) = document.head() else {
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_id(RIPPLE_STYLE_ID);
    style.set_text_content(Some(RIPPLE_KEYFRAMES));
    head.append_child(&style)?;
    Ok(())
}

fn spawn_ripple(
    document: &Document,
    scheduler: &Scheduler,
    button: &Element,
    event: &MouseEvent,
    duration_ms: u32,
) -> Result<()> {
    let rect = button.get_bounding_client_rect();
    let ripple = Ripple::at(
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        f64::from(event.client_x()),
        f64::from(event.client_y()),
    );

    let overlay = document.create_element("div")?;
    overlay.set_attribute("style", &ripple.css(duration_ms))?;

    dom::set_style(button, "position", "relative")?;
    dom::set_style(button, "overflow", "hidden")?;
    button.append_child(&overlay)?;

    scheduler.after(duration_ms, move || overlay.remove());
    Ok(())
}

/// Underline grows under a card while it is hovered.
pub fn init_cards(page: &Page) -> Result<()> {
    let config = &page.config;
    for card in dom::query_all(&page.document, &config.card_selector) {
        let Some(underline) = card.query_selector(&config.underline_selector).ok().flatten() else {
            continue;
        };

        let shown = underline.clone();
        dom::listen(&card, "mouseenter", move |_| {
            dom::log_failure("Underline", dom::set_style(&shown, "width", "100%"));
        })?;
        dom::listen(&card, "mouseleave", move |_| {
            dom::log_failure("Underline", dom::set_style(&underline, "width", "0"));
        })?;
    }
    Ok(())
}

/// Hover lift and click ripple on every button.
pub fn init_buttons(page: &Page) -> Result<()> {
    let config = &page.config;
    let buttons = dom::query_all(&page.document, &config.button_selector);
    if buttons.is_empty() {
        return Ok(());
    }

    ensure_ripple_keyframes(&page.document)?;

    for button in buttons {
        let lifted = button.clone();
        dom::listen(&button, "mouseenter", move |_| {
            dom::log_failure("Button lift", dom::set_style(&lifted, "transform", "translateY(-2px)"));
        })?;
        let settled = button.clone();
        dom::listen(&button, "mouseleave", move |_| {
            dom::log_failure("Button lift", dom::set_style(&settled, "transform", "translateY(0)"));
        })?;

        let document = page.document.clone();
        let scheduler = page.scheduler.clone();
        let duration_ms = config.ripple_duration_ms;
        let clicked = button.clone();
        dom::listen(&button, "click", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Err(e) = spawn_ripple(&document, &scheduler, &clicked, event, duration_ms) {
                log::debug!("Ripple skipped: {}", e);
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ripple_is_centred_on_the_click() {
        // 200x50 button at (100, 300), clicked at (150, 320)
        let ripple = Ripple::at(100.0, 300.0, 200.0, 50.0, 150.0, 320.0);
        assert_eq!(ripple.size, 200.0);
        assert_eq!(ripple.left, -50.0);
        assert_eq!(ripple.top, -80.0);
    }

    #[test]
    fn ripple_uses_the_longer_side() {
        let tall = Ripple::at(0.0, 0.0, 40.0, 120.0, 20.0, 60.0);
        assert_eq!(tall.size, 120.0);
        assert_eq!((tall.left, tall.top), (-40.0, 0.0));
    }

    #[test]
    fn ripple_css_carries_geometry_and_duration() {
        let css = Ripple::at(0.0, 0.0, 100.0, 40.0, 50.0, 20.0).css(600);
        assert!(css.contains("width: 100px"));
        assert!(css.contains("height: 100px"));
        assert!(css.contains("left: 0px"));
        assert!(css.contains("top: -30px"));
        assert!(css.contains("animation: ripple 600ms ease-out"));
    }
}
