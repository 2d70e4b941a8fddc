//! Deferred one-shot actions and per-frame scroll coalescing.
//!
//! Every timer a behavior starts goes through [`Scheduler`], which keeps the
//! `Timeout` handle until it fires. Dropping a handle cancels it, so tearing the
//! page down only has to clear the slab.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Function;
use web_sys::Window;

use crate::dom;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Pending handles keyed by the id handed back to the caller.
#[derive(Debug)]
pub struct TaskSlab<H> {
    next: u64,
    pending: BTreeMap<TaskId, H>,
}

impl<H> Default for TaskSlab<H> {
    fn default() -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<H> TaskSlab<H> {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }

    pub fn insert(&mut self, id: TaskId, handle: H) {
        self.pending.insert(id, handle);
    }

    pub fn remove(&mut self, id: TaskId) -> Option<H> {
        self.pending.remove(&id)
    }

    /// Drops every pending handle, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

}

#[derive(Clone, Default)]
pub struct Scheduler {
    tasks: Rc<RefCell<TaskSlab<Timeout>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` once after `delay_ms`.
    pub fn after<F>(&self, delay_ms: u32, action: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let id = self.tasks.borrow_mut().next_id();
        let tasks = Rc::clone(&self.tasks);
        let timeout = Timeout::new(delay_ms, move || {
            // Dropping our own handle mid-call is fine: wasm-bindgen defers
            // freeing a running closure, and clearTimeout on a fired timer is a no-op.
            let fired = tasks.borrow_mut().remove(id);
            drop(fired);
            action();
        });
        self.tasks.borrow_mut().insert(id, timeout);
        id
    }

    /// Cancels every timer that has not fired yet.
    pub fn cancel_all(&self) -> usize {
        self.tasks.borrow_mut().clear()
    }
}

/// Lets at most one frame callback be outstanding at a time.
#[derive(Debug, Default)]
pub struct FrameGate {
    requested: Cell<bool>,
}

impl FrameGate {
    /// Returns true when the caller should request a new frame.
    pub fn request(&self) -> bool {
        !self.requested.replace(true)
    }

    pub fn release(&self) {
        self.requested.set(false);
    }
}

/// Runs `work` on the next animation frame after a scroll, coalescing bursts of
/// scroll events into one call per frame. `work` also runs once immediately so
/// a restored scroll position is reflected without waiting for input.
pub fn on_scroll_frame<F>(window: &Window, work: F) -> Result<()>
where
    F: FnMut() + 'static,
{
    let work = Rc::new(RefCell::new(work));
    let gate = Rc::new(FrameGate::default());

    let frame: Function = {
        let gate = Rc::clone(&gate);
        let work = Rc::clone(&work);
        Closure::wrap(Box::new(move || {
            gate.release();
            (*work.borrow_mut())();
        }) as Box<dyn FnMut()>)
        .into_js_value()
        .unchecked_into()
    };

    let scroll_window = window.clone();
    dom::listen(window, "scroll", move |_| {
        if !gate.request() {
            return;
        }
        if let Err(e) = scroll_window.request_animation_frame(&frame) {
            gate.release();
            log::debug!("requestAnimationFrame failed: {:?}", e);
        }
    })?;

    (*work.borrow_mut())();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_hands_out_distinct_ids() {
        let mut slab = TaskSlab::default();
        let a = slab.next_id();
        let b = slab.next_id();
        assert_ne!(a, b);
        slab.insert(a, "splash");
        slab.insert(b, "ripple");
        assert_eq!(slab.len(), 2);
    }

    #[test]
    fn removing_a_fired_task_leaves_the_rest() {
        let mut slab = TaskSlab::default();
        let first = slab.next_id();
        let second = slab.next_id();
        slab.insert(first, 1);
        slab.insert(second, 2);

        assert_eq!(slab.remove(first), Some(1));
        assert_eq!(slab.remove(first), None);
        assert_eq!(slab.len(), 1);
    }

    #[test]
    fn clear_drops_everything_pending() {
        let dropped = Rc::new(Cell::new(0));

        struct Handle(Rc<Cell<u32>>);
        impl Drop for Handle {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut slab = TaskSlab::default();
        for _ in 0..3 {
            let id = slab.next_id();
            slab.insert(id, Handle(Rc::clone(&dropped)));
        }

        assert_eq!(slab.clear(), 3);
        assert_eq!(slab.len(), 0);
        assert_eq!(dropped.get(), 3);
    }

    #[test]
    fn frame_gate_coalesces_until_released() {
        let gate = FrameGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());

        gate.release();
        assert!(gate.request());
    }
}
