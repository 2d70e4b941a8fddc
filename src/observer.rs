//! Visibility subscriptions backed by `IntersectionObserver`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stop watching a target after its first visible notification.
    Once,
    Repeating,
}

/// One notification for one watched element.
#[derive(Debug, Clone)]
pub struct Visibility {
    pub target: Element,
    /// At least `threshold` of the target is in view.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    threshold: f64,
    root_margin: Option<String>,
    mode: Mode,
}

impl Subscription {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: None,
            mode: Mode::Repeating,
        }
    }

    pub fn root_margin(mut self, margin: &str) -> Self {
        self.root_margin = Some(margin.to_string());
        self
    }

    pub fn once(mut self) -> Self {
        self.mode = Mode::Once;
        self
    }

    /// The observer also fires on the way out of view, still intersecting but
    /// below the threshold; only a ratio at or above it counts as visible.
    pub fn is_met(&self, intersecting: bool, ratio: f64) -> bool {
        intersecting && ratio >= self.threshold
    }

    /// Whether a target should be dropped after this notification.
    pub fn retires(&self, visible: bool) -> bool {
        self.mode == Mode::Once && visible
    }

    /// Starts watching `targets`. Returns `None` without creating an observer
    /// when there is nothing to watch.
    pub fn watch<F>(self, targets: &[Element], mut callback: F) -> Result<Option<Watch>>
    where
        F: FnMut(&Visibility) + 'static,
    {
        if targets.is_empty() {
            return Ok(None);
        }

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(self.threshold));
        if let Some(margin) = &self.root_margin {
            options.set_root_margin(margin);
        }

        let subscription = self.clone();
        let handler = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let visibility = Visibility {
                    target: entry.target(),
                    visible: subscription
                        .is_met(entry.is_intersecting(), entry.intersection_ratio()),
                };
                callback(&visibility);
                if subscription.retires(visibility.visible) {
                    observer.unobserve(&visibility.target);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let observer =
            IntersectionObserver::new_with_options(handler.as_ref().unchecked_ref(), &options)?;
        for target in targets {
            observer.observe(target);
        }

        Ok(Some(Watch {
            observer,
            _handler: handler,
        }))
    }
}

/// A live observer. Kept by the page until teardown.
pub struct Watch {
    observer: IntersectionObserver,
    _handler: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Watch {
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}
