use log::debug;

use crate::dom;
use crate::error::Result;
use crate::page::Page;

/// Holds the page still behind the splash screen, then hides it after the
/// configured delay.
pub fn init(page: &Page) -> Result<()> {
    let config = &page.config;
    let Some(splash) = page.document.get_element_by_id(&config.splash_id) else {
        return Ok(());
    };

    page.body.style().set_property("overflow", "hidden")?;

    let body = page.body.clone();
    page.scheduler.after(config.splash_delay_ms, move || {
        let hidden = dom::set_style(&splash, "display", "none")
            .and_then(|_| Ok(body.style().set_property("overflow", "visible")?));
        match hidden {
            Ok(()) => debug!("Splash screen dismissed"),
            Err(e) => debug!("Splash screen not dismissed: {}", e),
        }
    });
    Ok(())
}
