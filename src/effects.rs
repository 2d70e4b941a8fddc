use crate::dom;
use crate::error::Result;
use crate::page::Page;
use crate::schedule;

/// Hero offset for the current scroll position, or `None` once the hero has
/// scrolled out of the first viewport.
pub fn parallax_offset(scroll_y: f64, viewport_height: f64, rate: f64) -> Option<f64> {
    (scroll_y < viewport_height).then(|| scroll_y * rate)
}

/// Indicator height in px. Grows past 100% on overscroll; a page that cannot
/// scroll stays at `base`.
pub fn indicator_height(scroll_y: f64, page_height: f64, viewport_height: f64, base: f64) -> f64 {
    let range = page_height - viewport_height;
    let percent = if range > 0.0 {
        scroll_y / range * 100.0
    } else {
        0.0
    };
    base + percent
}

pub fn init(page: &Page) -> Result<()> {
    init_parallax(page)?;
    init_indicator(page)
}

fn init_parallax(page: &Page) -> Result<()> {
    let Some(hero) = dom::query(&page.document, &page.config.hero_visual_selector) else {
        return Ok(());
    };

    let window = page.window.clone();
    let rate = page.config.parallax_rate;
    schedule::on_scroll_frame(&page.window, move || {
        let offset = parallax_offset(dom::scroll_y(&window), dom::viewport_height(&window), rate);
        if let Some(offset) = offset {
            let transform = format!("translateY({}px)", offset);
            dom::log_failure("Parallax", dom::set_style(&hero, "transform", &transform));
        }
    })
}

fn init_indicator(page: &Page) -> Result<()> {
    let Some(indicator) = dom::query(&page.document, &page.config.scroll_indicator_selector) else {
        return Ok(());
    };

    let window = page.window.clone();
    let body = page.body.clone();
    let base = page.config.scroll_indicator_base;
    schedule::on_scroll_frame(&page.window, move || {
        let height = indicator_height(
            dom::scroll_y(&window),
            f64::from(body.scroll_height()),
            dom::viewport_height(&window),
            base,
        );
        let height = format!("{}px", height);
        dom::log_failure("Scroll indicator", dom::set_style(&indicator, "height", &height));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallax_moves_at_half_speed_against_the_scroll() {
        assert_eq!(parallax_offset(0.0, 800.0, -0.5), Some(0.0));
        assert_eq!(parallax_offset(200.0, 800.0, -0.5), Some(-100.0));
        assert_eq!(parallax_offset(799.0, 800.0, -0.5), Some(-399.5));
    }

    #[test]
    fn parallax_stops_once_past_the_first_viewport() {
        assert_eq!(parallax_offset(800.0, 800.0, -0.5), None);
        assert_eq!(parallax_offset(5000.0, 800.0, -0.5), None);
    }

    #[test]
    fn indicator_tracks_scroll_progress() {
        // 3000px page, 1000px viewport: 2000px of scroll range
        assert_eq!(indicator_height(0.0, 3000.0, 1000.0, 30.0), 30.0);
        assert_eq!(indicator_height(1000.0, 3000.0, 1000.0, 30.0), 80.0);
        assert_eq!(indicator_height(2000.0, 3000.0, 1000.0, 30.0), 130.0);
    }

    #[test]
    fn indicator_is_unbounded_on_overscroll() {
        assert_eq!(indicator_height(3000.0, 3000.0, 1000.0, 30.0), 180.0);
    }

    #[test]
    fn unscrollable_page_keeps_the_base_height() {
        assert_eq!(indicator_height(0.0, 600.0, 800.0, 30.0), 30.0);
        assert_eq!(indicator_height(10.0, 800.0, 800.0, 30.0), 30.0);
    }
}
