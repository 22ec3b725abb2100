mod app;
mod components;
mod error;
mod models;
mod services;
mod state;
mod utils;

use wasm_bindgen::prelude::*;
use app::App;

#[wasm_bindgen(start)]
pub fn run_app() {
    utils::set_panic_hook();
    utils::init_logging(log::LevelFilter::Info);
    yew::Renderer::<App>::new().render();
}
