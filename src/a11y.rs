use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::dom;
use crate::error::Result;
use crate::nav::{Menu, MenuEvent};
use crate::observer::Subscription;
use crate::page::Page;

pub const ANNOUNCER_ID: &str = "section-announcer";
const ANNOUNCER_STYLE: &str =
    "position: absolute; left: -10000px; width: 1px; height: 1px; overflow: hidden;";

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Heading text, else the explicit label, else a name built from the id.
pub fn section_title(heading: Option<String>, label: Option<String>, id: &str) -> String {
    non_blank(heading)
        .or_else(|| non_blank(label))
        .unwrap_or_else(|| format!("Section {}", id))
}

pub fn announcement(title: &str) -> String {
    format!("Now viewing: {}", title)
}

fn describe(section: &Element) -> String {
    let heading = section
        .query_selector("h2")
        .ok()
        .flatten()
        .and_then(|h| h.text_content());
    section_title(heading, section.get_attribute("aria-label"), &section.id())
}

/// The polite live region, created on first use.
fn announcer(document: &Document, body: &HtmlElement) -> Result<Element> {
    if let Some(existing) = document.get_element_by_id(ANNOUNCER_ID) {
        return Ok(existing);
    }
    let region = document.create_element("div")?;
    region.set_id(ANNOUNCER_ID);
    region.set_attribute("aria-live", "polite")?;
    region.set_attribute("aria-atomic", "true")?;
    region.set_class_name("sr-only");
    region.set_attribute("style", ANNOUNCER_STYLE)?;
    body.append_child(&region)?;
    Ok(region)
}

pub fn init(page: &Page) -> Result<()> {
    init_escape(page)?;
    init_focus_outline(page)?;
    init_announcements(page)
}

fn init_escape(page: &Page) -> Result<()> {
    let document = page.document.clone();
    let body = page.body.clone();
    let config = page.config.clone();
    dom::listen(&page.document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if event.key() != "Escape" {
            return;
        }
        let Some(menu) = Menu::find(&document, &body, &config) else {
            return;
        };
        if menu.state().is_open() {
            if let Err(e) = menu.dispatch(MenuEvent::Escape) {
                log::debug!("Escape did not close the menu: {}", e);
            }
        }
    })
}

fn init_focus_outline(page: &Page) -> Result<()> {
    let outline = page.config.focus_outline.clone();
    for element in dom::query_all(&page.document, &page.config.focusable_selector) {
        let focused = element.clone();
        let outline = outline.clone();
        dom::listen(&element, "focus", move |_| {
            dom::log_failure(
                "Focus outline",
                dom::set_style(&focused, "outline", &outline)
                    .and_then(|_| dom::set_style(&focused, "outline-offset", "2px")),
            );
        })?;

        // Hand back to the stylesheet's own focus styling
        let blurred = element.clone();
        dom::listen(&element, "blur", move |_| {
            dom::log_failure(
                "Focus outline reset",
                dom::clear_style(&blurred, "outline")
                    .and_then(|_| dom::clear_style(&blurred, "outline-offset")),
            );
        })?;
    }
    Ok(())
}

fn init_announcements(page: &Page) -> Result<()> {
    let sections = dom::query_all(&page.document, &page.config.section_selector);
    if sections.is_empty() {
        return Ok(());
    }

    let region = announcer(&page.document, &page.body)?;
    let watch = Subscription::new(page.config.section_threshold).watch(&sections, move |visibility| {
        if visibility.visible {
            let message = announcement(&describe(&visibility.target));
            region.set_text_content(Some(&message));
        }
    })?;
    page.keep(watch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_wins_over_label_and_id() {
        let title = section_title(
            Some("Nuestros artistas".to_string()),
            Some("Artists".to_string()),
            "artistas",
        );
        assert_eq!(title, "Nuestros artistas");
    }

    #[test]
    fn label_is_used_without_a_heading() {
        let title = section_title(None, Some("Contact".to_string()), "contacto");
        assert_eq!(title, "Contact");
    }

    #[test]
    fn id_fallback_names_the_section() {
        assert_eq!(section_title(None, None, "hero"), "Section hero");
    }

    #[test]
    fn blank_heading_falls_through() {
        let title = section_title(Some("  \n ".to_string()), None, "galeria");
        assert_eq!(title, "Section galeria");
    }

    #[test]
    fn announcement_names_the_current_section() {
        assert_eq!(announcement("Contact"), "Now viewing: Contact");
    }
}
