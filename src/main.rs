mod admin;
mod aggregator;
mod api;
mod app;
mod components;
mod config;
mod models;
mod pages;
mod refresh;
mod session;
mod workflow;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    leptos::mount::mount_to_body(App);
}
