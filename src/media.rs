use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlMediaElement};

use crate::dom;
use crate::error::Result;
use crate::observer::Subscription;
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCommand {
    Play,
    Pause,
}

impl VideoCommand {
    pub fn for_visibility(visible: bool) -> Self {
        if visible {
            VideoCommand::Play
        } else {
            VideoCommand::Pause
        }
    }
}

/// Starts playback. Browsers reject autoplay freely, so a refusal is only logged.
fn attempt_play(video: &HtmlMediaElement, context: &'static str) {
    let promise = match video.play() {
        Ok(promise) => promise,
        Err(e) => {
            log::info!("{}: {:?}", context, e);
            return;
        }
    };
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::info!("{}: {:?}", context, e);
        }
    });
}

fn apply(video: &HtmlMediaElement, command: VideoCommand) {
    match command {
        VideoCommand::Play => attempt_play(video, "Video play failed"),
        VideoCommand::Pause => {
            if let Err(e) = video.pause() {
                log::debug!("Video pause failed: {:?}", e);
            }
        }
    }
}

pub fn init(page: &Page) -> Result<()> {
    let Some(video) = dom::query(&page.document, &page.config.video_selector)
        .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
    else {
        return Ok(());
    };

    {
        let loaded = video.clone();
        dom::listen(&video, "loadeddata", move |_| {
            attempt_play(&loaded, "Video autoplay prevented")
        })?;
    }

    let target: Element = video.clone().into();
    let watch = Subscription::new(page.config.video_threshold).watch(&[target], move |visibility| {
        apply(&video, VideoCommand::for_visibility(visibility.visible));
    })?;
    page.keep(watch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_video_plays_and_hidden_video_pauses() {
        assert_eq!(VideoCommand::for_visibility(true), VideoCommand::Play);
        assert_eq!(VideoCommand::for_visibility(false), VideoCommand::Pause);
    }

    #[test]
    fn scrolling_past_and_back_alternates_commands() {
        let commands: Vec<_> = [true, false, true]
            .into_iter()
            .map(VideoCommand::for_visibility)
            .collect();
        assert_eq!(
            commands,
            vec![VideoCommand::Play, VideoCommand::Pause, VideoCommand::Play]
        );
    }
}
