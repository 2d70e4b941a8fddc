use crate::dom;
use crate::error::Result;
use crate::observer::Subscription;
use crate::page::Page;

pub const DEFERRED_ATTR: &str = "data-src";

/// The source to promote for an image, if any. An image that has already been
/// loaded no longer carries `data-src` and yields nothing.
pub fn source_to_load(visible: bool, deferred: Option<String>) -> Option<String> {
    if !visible {
        return None;
    }
    deferred.filter(|src| !src.is_empty())
}

pub fn init(page: &Page) -> Result<()> {
    let images = dom::query_all(&page.document, &page.config.lazy_image_selector);

    let watch = Subscription::new(page.config.lazy_image_threshold)
        .once()
        .watch(&images, |visibility| {
            let img = &visibility.target;
            let Some(source) = source_to_load(visibility.visible, img.get_attribute(DEFERRED_ATTR))
            else {
                return;
            };
            let loaded = img
                .set_attribute("src", &source)
                .and_then(|_| img.remove_attribute(DEFERRED_ATTR));
            if let Err(e) = loaded {
                log::debug!("Lazy image not loaded: {:?}", e);
            }
        })?;

    page.keep(watch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_image_keeps_its_source_deferred() {
        assert_eq!(source_to_load(false, Some("/img/poster.jpg".to_string())), None);
    }

    #[test]
    fn visible_image_promotes_the_deferred_source() {
        assert_eq!(
            source_to_load(true, Some("/img/poster.jpg".to_string())),
            Some("/img/poster.jpg".to_string())
        );
    }

    #[test]
    fn a_loaded_image_is_never_processed_again() {
        // Loading strips data-src, so a later notification sees none
        assert_eq!(source_to_load(true, None), None);
    }

    #[test]
    fn empty_deferred_source_is_ignored() {
        assert_eq!(source_to_load(true, Some(String::new())), None);
    }
}
