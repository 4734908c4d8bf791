//! Level Up core crate.
//!
//! A canvas scene where a sprite character climbs a staircase of platforms,
//! collecting one skill orb per jump. The scene itself (`game`, `character`,
//! `orb`, `effects`, `animation`) is plain Rust driven through the `Surface`
//! and `FrameScheduler` capabilities, so it runs natively under `cargo test`.
//! The browser binding lives in `web` and is exposed to JS through the
//! functions below.

use wasm_bindgen::prelude::*;

pub mod animation;
pub mod character;
pub mod config;
pub mod effects;
pub mod error;
pub mod game;
pub mod orb;
pub mod scheduler;
pub mod surface;
pub mod web;

pub use config::GameConfig;
pub use error::{AssetError, ScheduleError};
pub use game::{Assets, Clip, Game};
pub use scheduler::{FrameScheduler, ManualScheduler, TickHandle};
pub use surface::Surface;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging();
}

// -----------------------------------------------------------------------------
// JS surface: what the page binds its buttons and listeners to
// -----------------------------------------------------------------------------

/// Creates the scene on `#canvas` and starts loading assets in the background.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())?;
    Ok(())
}

/// Same as `start_game`, with tuning fields overridden from a JSON object.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(AssetError::from)?;
    web::start(config)?;
    Ok(())
}

#[wasm_bindgen]
pub fn play() {
    web::with_game(|g| g.play());
    web::sync_controls();
}

#[wasm_bindgen]
pub fn pause() {
    web::with_game(|g| g.pause());
    web::sync_controls();
}

#[wasm_bindgen]
pub fn reset() {
    web::with_game(|g| g.reset());
}

#[wasm_bindgen]
pub fn trigger_jump() -> bool {
    web::with_game(|g| g.trigger_jump()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn jump_to_platform(platform: u32) -> bool {
    web::with_game(|g| g.jump_to_platform(platform)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn resize_to(width: f64) {
    web::with_game(|g| g.resize_to(width));
}

#[wasm_bindgen]
pub fn is_ready() -> bool {
    web::with_game(|g| g.is_ready()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn jump_count() -> u32 {
    web::with_game(|g| g.jump_count()).unwrap_or(0)
}
