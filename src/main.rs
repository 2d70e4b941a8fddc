use log::{error, info};

mod a11y;
mod anchor;
mod config;
mod dom;
mod effects;
mod error;
mod interactions;
mod lazy;
mod media;
mod nav;
mod observer;
mod page;
mod reveal;
mod schedule;
mod splash;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging; the page config may adjust the level once loaded
    console_log::init_with_level(config::default_log_level()).expect("error initializing log");

    info!("Starting page behaviors");
    if let Err(e) = page::boot() {
        error!("Page behaviors not started: {}", e);
    }
}
