use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::dom;
use crate::error::Result;
use crate::page::Page;

/// Where a link's `href` leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Another page; the browser handles it.
    Elsewhere,
    /// A bare `#`: stays in place, but must not jump to the top.
    Nowhere,
    Element(&'a str),
}

impl<'a> LinkTarget<'a> {
    pub fn of(href: &'a str) -> Self {
        match href.strip_prefix('#') {
            None => LinkTarget::Elsewhere,
            Some("") => LinkTarget::Nowhere,
            Some(id) => LinkTarget::Element(id),
        }
    }

    /// In-page links never fall through to the browser's own navigation.
    pub fn prevents_default(self) -> bool {
        self != LinkTarget::Elsewhere
    }
}

/// Scroll position that puts the target just below the fixed header.
pub fn scroll_top_for(target_offset_top: f64, header_height: f64) -> f64 {
    target_offset_top - header_height
}

/// What an anchor needs to scroll the window. Cheap to clone into handlers.
#[derive(Clone)]
struct Scroller {
    window: Window,
    document: Document,
    header_id: String,
}

impl Scroller {
    fn header_height(&self) -> f64 {
        self.document
            .get_element_by_id(&self.header_id)
            .and_then(|header| header.dyn_into::<HtmlElement>().ok())
            .map(|header| f64::from(header.offset_height()))
            .unwrap_or(0.0)
    }

    /// Smooth-scrolls to `#id`. Returns false when nothing on the page has that id.
    fn scroll_to(&self, id: &str) -> bool {
        let Some(target) = self
            .document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return false;
        };

        let options = ScrollToOptions::new();
        options.set_top(scroll_top_for(f64::from(target.offset_top()), self.header_height()));
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        true
    }

    /// Takes over clicks on an in-page link. Links to other pages are left alone.
    fn intercept(&self, link: &Element) -> Result<()> {
        let scroller = self.clone();
        let anchor = link.clone();
        dom::listen(link, "click", move |event| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let target = LinkTarget::of(&href);
            if target.prevents_default() {
                event.prevent_default();
            }
            if let LinkTarget::Element(id) = target {
                if !scroller.scroll_to(id) {
                    log::debug!("No scroll target for #{}", id);
                }
            }
        })
    }
}

pub fn init(page: &Page) -> Result<()> {
    let config = &page.config;
    let scroller = Scroller {
        window: page.window.clone(),
        document: page.document.clone(),
        header_id: config.header_id.clone(),
    };

    for link in dom::query_all(&page.document, &config.nav_link_selector) {
        scroller.intercept(&link)?;
    }

    if let Some(cta) = dom::query(&page.document, &config.hero_cta_selector) {
        scroller.intercept(&cta)?;
    }

    if let Some(control) = dom::query(&page.document, &config.hero_scroll_selector) {
        let scroller = scroller.clone();
        let target = config.hero_scroll_target.clone();
        dom::listen(&control, "click", move |_| {
            if let LinkTarget::Element(id) = LinkTarget::of(&target) {
                scroller.scroll_to(id);
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_page_links_resolve_to_their_id() {
        assert_eq!(LinkTarget::of("#artistas"), LinkTarget::Element("artistas"));
        assert_eq!(LinkTarget::of("#contact-form"), LinkTarget::Element("contact-form"));
        assert!(LinkTarget::of("#artistas").prevents_default());
    }

    #[test]
    fn bare_hash_is_swallowed_without_a_target() {
        let target = LinkTarget::of("#");
        assert_eq!(target, LinkTarget::Nowhere);
        assert!(target.prevents_default());
    }

    #[test]
    fn missing_fragment_still_blocks_navigation() {
        // Resolution happens later against the document; the click is already taken
        assert!(LinkTarget::of("#no-such-section").prevents_default());
    }

    #[test]
    fn external_links_are_left_to_the_browser() {
        for href in ["", "/pricing", "https://example.com/#top"] {
            let target = LinkTarget::of(href);
            assert_eq!(target, LinkTarget::Elsewhere, "{}", href);
            assert!(!target.prevents_default());
        }
    }

    #[test]
    fn target_lands_below_the_header() {
        assert_eq!(scroll_top_for(1200.0, 80.0), 1120.0);
        assert_eq!(scroll_top_for(40.0, 80.0), -40.0);
    }
}
