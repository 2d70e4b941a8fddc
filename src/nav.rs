use web_sys::{Document, Element, HtmlElement};

use crate::config::PageConfig;
use crate::dom;
use crate::error::Result;
use crate::page::Page;
use crate::schedule;

pub const ACTIVE: &str = "active";
pub const SCROLLED: &str = "scrolled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    LinkClicked,
    OutsideClick,
    Escape,
}

impl MenuState {
    pub fn apply(self, event: MenuEvent) -> MenuState {
        match event {
            MenuEvent::Toggle => match self {
                MenuState::Closed => MenuState::Open,
                MenuState::Open => MenuState::Closed,
            },
            MenuEvent::LinkClicked | MenuEvent::OutsideClick | MenuEvent::Escape => {
                MenuState::Closed
            }
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }
}

pub fn header_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y >= threshold
}

/// The mobile menu as it currently stands in the document.
///
/// The state lives in the `active` class, so a `Menu` can be looked up fresh
/// from any handler without sharing anything.
#[derive(Clone)]
pub struct Menu {
    toggle: Element,
    menu: Element,
    body: HtmlElement,
}

impl Menu {
    pub fn find(document: &Document, body: &HtmlElement, config: &PageConfig) -> Option<Menu> {
        Some(Menu {
            toggle: document.get_element_by_id(&config.nav_toggle_id)?,
            menu: document.get_element_by_id(&config.nav_menu_id)?,
            body: body.clone(),
        })
    }

    pub fn state(&self) -> MenuState {
        if dom::has_class(&self.menu, ACTIVE) {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn dispatch(&self, event: MenuEvent) -> Result<MenuState> {
        let current = self.state();
        let next = current.apply(event);
        if next != current {
            self.render(next)?;
        }
        Ok(next)
    }

    fn render(&self, state: MenuState) -> Result<()> {
        let open = state.is_open();
        dom::set_class(&self.menu, ACTIVE, open)?;
        dom::set_class(&self.toggle, ACTIVE, open)?;
        // No page scrolling behind an open menu
        let overflow = if open { "hidden" } else { "visible" };
        self.body.style().set_property("overflow", overflow)?;
        Ok(())
    }

    fn contains_event(&self, event: &web_sys::Event) -> bool {
        dom::event_within(event, &self.toggle) || dom::event_within(event, &self.menu)
    }
}

fn dispatch_logged(menu: &Menu, event: MenuEvent) {
    if let Err(e) = menu.dispatch(event) {
        log::debug!("Menu {:?} not applied: {}", event, e);
    }
}

pub fn init(page: &Page) -> Result<()> {
    init_menu(page)?;
    init_header(page)
}

fn init_menu(page: &Page) -> Result<()> {
    let Some(menu) = Menu::find(&page.document, &page.body, &page.config) else {
        return Ok(());
    };

    {
        let toggle = menu.toggle.clone();
        let menu = menu.clone();
        dom::listen(&toggle, "click", move |_| {
            dispatch_logged(&menu, MenuEvent::Toggle)
        })?;
    }

    for link in dom::query_all(&page.document, &page.config.nav_link_selector) {
        let menu = menu.clone();
        dom::listen(&link, "click", move |_| {
            dispatch_logged(&menu, MenuEvent::LinkClicked)
        })?;
    }

    dom::listen(&page.document, "click", move |event| {
        if !menu.contains_event(&event) {
            dispatch_logged(&menu, MenuEvent::OutsideClick);
        }
    })
}

fn init_header(page: &Page) -> Result<()> {
    let Some(header) = page.document.get_element_by_id(&page.config.header_id) else {
        return Ok(());
    };

    let window = page.window.clone();
    let threshold = page.config.header_scroll_threshold;
    schedule::on_scroll_frame(&page.window, move || {
        let scrolled = header_scrolled(dom::scroll_y(&window), threshold);
        if dom::has_class(&header, SCROLLED) != scrolled {
            dom::log_failure("Header style", dom::set_class(&header, SCROLLED, scrolled));
        }
    })
}
