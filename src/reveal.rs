use web_sys::Element;

use crate::dom;
use crate::error::Result;
use crate::observer::Subscription;
use crate::page::Page;
use crate::schedule::Scheduler;

pub const REVEALED: &str = "revealed";
/// Set on a grid once its children have been scheduled.
const STAGGERED_ATTR: &str = "data-reveal-staggered";

/// `(child index, delay)` for every child of a grid.
pub fn stagger_schedule(count: usize, step_ms: u32) -> Vec<(usize, u32)> {
    (0..count)
        .map(|index| (index, step_ms.saturating_mul(index as u32)))
        .collect()
}

/// What one notification does to an element. There is no step that hides
/// an element again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealStep {
    pub reveal: bool,
    pub stagger_grid: bool,
}

/// `grid_staggered` is `None` outside a grid, otherwise whether that grid has
/// already been scheduled.
pub fn plan(visible: bool, revealed: bool, grid_staggered: Option<bool>) -> RevealStep {
    if !visible || revealed {
        return RevealStep::default();
    }
    RevealStep {
        reveal: true,
        stagger_grid: grid_staggered == Some(false),
    }
}

fn reveal(element: &Element) {
    if dom::has_class(element, REVEALED) {
        return;
    }
    dom::log_failure("Reveal", dom::add_class(element, REVEALED));
}

fn stagger_grid(scheduler: &Scheduler, grid: &Element, step_ms: u32) {
    if let Err(e) = grid.set_attribute(STAGGERED_ATTR, "") {
        // Without the marker the grid could be scheduled again
        log::debug!("Grid stagger skipped: {:?}", e);
        return;
    }

    let items = dom::children(grid);
    for (index, delay) in stagger_schedule(items.len(), step_ms) {
        let item = items[index].clone();
        scheduler.after(delay, move || reveal(&item));
    }
}

pub fn init(page: &Page) -> Result<()> {
    let config = &page.config;
    let targets = dom::query_all(&page.document, &config.reveal_selector);

    let scheduler = page.scheduler.clone();
    let grid_selector = config.reveal_grid_selector.clone();
    let step_ms = config.reveal_stagger_ms;

    let watch = Subscription::new(config.reveal_threshold)
        .root_margin(&config.reveal_root_margin)
        .once()
        .watch(&targets, move |visibility| {
            let target = &visibility.target;
            let grid = target.closest(&grid_selector).ok().flatten();
            let step = plan(
                visibility.visible,
                dom::has_class(target, REVEALED),
                grid.as_ref().map(|g| g.has_attribute(STAGGERED_ATTR)),
            );

            if step.reveal {
                reveal(target);
            }
            if let (true, Some(grid)) = (step.stagger_grid, grid) {
                stagger_grid(&scheduler, &grid, step_ms);
            }
        })?;

    page.keep(watch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_children_cascade_in_fixed_steps() {
        let schedule = stagger_schedule(5, 150);
        assert_eq!(
            schedule,
            vec![(0, 0), (1, 150), (2, 300), (3, 450), (4, 600)]
        );
    }

    #[test]
    fn empty_grid_schedules_nothing() {
        assert!(stagger_schedule(0, 150).is_empty());
    }

    #[test]
    fn every_child_is_scheduled_exactly_once() {
        let schedule = stagger_schedule(12, 150);
        let indices: Vec<usize> = schedule.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
        assert_eq!(schedule.last(), Some(&(11, 11 * 150)));
    }

    #[test]
    fn first_sighting_reveals() {
        assert_eq!(
            plan(true, false, None),
            RevealStep { reveal: true, stagger_grid: false }
        );
    }

    #[test]
    fn first_sighting_in_a_grid_staggers_it_once() {
        assert_eq!(
            plan(true, false, Some(false)),
            RevealStep { reveal: true, stagger_grid: true }
        );
        // Another child of the same grid comes into view later
        assert_eq!(
            plan(true, false, Some(true)),
            RevealStep { reveal: true, stagger_grid: false }
        );
    }

    #[test]
    fn revealed_elements_are_left_alone() {
        assert_eq!(plan(true, true, Some(false)), RevealStep::default());
        assert_eq!(plan(false, true, None), RevealStep::default());
    }

    #[test]
    fn notifications_below_the_threshold_change_nothing() {
        assert_eq!(plan(false, false, None), RevealStep::default());
        assert_eq!(plan(false, false, Some(false)), RevealStep::default());
    }
}
