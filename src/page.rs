use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, PageTransitionEvent, Window};

use crate::config::PageConfig;
use crate::dom;
use crate::error::Result;
use crate::observer::Watch;
use crate::schedule::Scheduler;
use crate::{a11y, anchor, effects, interactions, lazy, media, nav, reveal, splash};

/// Everything a behavior needs to wire itself to the document.
pub struct Page {
    pub window: Window,
    pub document: Document,
    pub body: HtmlElement,
    pub config: Rc<PageConfig>,
    pub scheduler: Scheduler,
    watches: RefCell<Vec<Watch>>,
}

pub type Initializer<C> = fn(&C) -> Result<()>;

const BEHAVIORS: &[(&str, Initializer<Page>)] = &[
    ("splash", splash::init),
    ("navigation", nav::init),
    ("scroll effects", effects::init),
    ("reveal", reveal::init),
    ("smooth scrolling", anchor::init),
    ("card underline", interactions::init_cards),
    ("buttons", interactions::init_buttons),
    ("video", media::init),
    ("lazy images", lazy::init),
    ("accessibility", a11y::init),
];

impl Page {
    pub fn new(window: Window, document: Document, config: PageConfig) -> Result<Self> {
        let body = dom::body(&document)?;
        Ok(Self {
            window,
            document,
            body,
            config: Rc::new(config),
            scheduler: Scheduler::new(),
            watches: RefCell::new(Vec::new()),
        })
    }

    /// Keeps an observer alive until teardown.
    pub fn keep(&self, watch: Option<Watch>) {
        if let Some(watch) = watch {
            self.watches.borrow_mut().push(watch);
        }
    }

    pub fn teardown(&self) {
        let cancelled = self.scheduler.cancel_all();
        let watches = self.watches.take();
        for watch in &watches {
            watch.disconnect();
        }
        debug!(
            "Page torn down: {} pending tasks cancelled, {} observers disconnected",
            cancelled,
            watches.len()
        );
    }
}

/// Runs every initializer once. A failing one is logged and skipped; the names
/// of the failures are returned.
pub fn run_all<C>(ctx: &C, initializers: &[(&'static str, Initializer<C>)]) -> Vec<&'static str> {
    let mut failed = Vec::new();
    for (name, init) in initializers {
        if let Err(e) = init(ctx) {
            warn!("{} behavior disabled: {}", name, e);
            failed.push(*name);
        }
    }
    failed
}

fn start(window: Window, document: Document) -> Result<()> {
    let config = PageConfig::load(&document);
    log::set_max_level(config.level().to_level_filter());

    let page = Rc::new(Page::new(window, document, config)?);
    let failed = run_all(page.as_ref(), BEHAVIORS);
    info!(
        "Page behaviors ready ({} of {})",
        BEHAVIORS.len() - failed.len(),
        BEHAVIORS.len()
    );

    let teardown_page = Rc::clone(&page);
    dom::listen(&page.window, "pagehide", move |event| {
        // A page kept in the back/forward cache comes back with its behaviors
        let cached = event
            .dyn_ref::<PageTransitionEvent>()
            .map(|e| e.persisted())
            .unwrap_or(false);
        if !cached {
            teardown_page.teardown();
        }
    })
}

/// Starts the behaviors now, or once the DOM is parsed if it is still loading.
pub fn boot() -> Result<()> {
    let window = dom::window()?;
    let document = dom::document(&window)?;

    if document.ready_state() != "loading" {
        return start(window, document);
    }

    let target = document.clone();
    let mut pending = Some((window, document));
    dom::listen(&target, "DOMContentLoaded", move |_| {
        let Some((window, document)) = pending.take() else {
            return;
        };
        if let Err(e) = start(window, document) {
            log::error!("Page behaviors not started: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BehaviorError;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        ran: Cell<u32>,
    }

    fn ok(counter: &Counter) -> Result<()> {
        counter.ran.set(counter.ran.get() + 1);
        Ok(())
    }

    fn broken(counter: &Counter) -> Result<()> {
        counter.ran.set(counter.ran.get() + 1);
        Err(BehaviorError::Js("boom".to_string()))
    }

    #[test]
    fn a_failing_initializer_does_not_stop_the_rest() {
        let counter = Counter::default();
        let inits: [(&'static str, Initializer<Counter>); 3] =
            [("first", ok), ("second", broken), ("third", ok)];
        let failed = run_all(&counter, &inits);

        assert_eq!(counter.ran.get(), 3);
        assert_eq!(failed, vec!["second"]);
    }

    #[test]
    fn every_initializer_runs_exactly_once() {
        let counter = Counter::default();
        let inits: [(&'static str, Initializer<Counter>); 2] = [("a", ok), ("b", ok)];
        let failed = run_all(&counter, &inits);

        assert!(failed.is_empty());
        assert_eq!(counter.ran.get(), 2);
    }
}
