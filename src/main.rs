//! Taskflow Frontend Entry Point

mod api;
mod app;
mod browser;
mod components;
mod context;
mod logger;
mod store;
mod view_model;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logger::init();
    log::info!("[APP] Starting, API at {}", api::client().config().base_url());
    mount_to_body(App);
}
