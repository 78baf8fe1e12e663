//! WASM bridge: one compositor per page, driven by free functions.
//!
//! wasm-bindgen cannot export the compositor directly, so it lives in a
//! `thread_local!` and every export borrows it through `with_runner`.

pub mod runner;

pub use runner::FxRunner;

use std::cell::RefCell;

use arcade_fx::{Color, FxConfig, GameState};
use glam::vec2;
use js_sys::Function;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<FxRunner<Function>>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Before `fx_init` this logs and returns
/// the default value.
fn with_runner<R: Default>(f: impl FnOnce(&mut FxRunner<Function>) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("effects not initialized, call fx_init() first");
            R::default()
        }
    })
}

fn color(hex: &str) -> Color {
    hex.parse().unwrap_or_else(|err| {
        log::warn!("bad color {hex:?}: {err}");
        Color::WHITE
    })
}

fn call_ready() {
    for f in with_runner(|r| r.take_ready()) {
        if let Err(err) = f.call0(&JsValue::NULL) {
            log::warn!("transition callback threw: {err:?}");
        }
    }
}

/// Create the compositor from a JSON `FxConfig`. Missing fields take their
/// defaults; malformed JSON falls back to the default config.
#[wasm_bindgen]
pub fn fx_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        FxConfig::default()
    } else {
        FxConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("bad config, using defaults: {err}");
            FxConfig::default()
        })
    };
    log::info!("arcade-fx: initialized {}x{}", config.width, config.height);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(FxRunner::new(config));
    });
}

#[wasm_bindgen]
pub fn fx_tick(dt: f32, player_speed: f32, fever_mode: bool) {
    with_runner(|r| {
        r.set_state(GameState::new(player_speed, fever_mode));
        r.tick(dt);
    });
    call_ready();
}

/// Like `fx_tick`, with the game state as JSON.
#[wasm_bindgen]
pub fn fx_tick_json(dt: f32, state_json: &str) {
    let state = serde_json::from_str::<GameState>(state_json).unwrap_or_else(|err| {
        log::warn!("bad game state: {err}");
        GameState::default()
    });
    with_runner(|r| {
        r.set_state(state);
        r.tick(dt);
    });
    call_ready();
}

#[wasm_bindgen]
pub fn fx_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

#[wasm_bindgen]
pub fn fx_set_enabled(enabled: bool) {
    with_runner(|r| r.fx().set_enabled(enabled));
}

#[wasm_bindgen]
pub fn fx_clear_scene() {
    with_runner(|r| r.fx().clear_scene());
}

// ---- Semantic events ----

#[wasm_bindgen]
pub fn fx_flag_collected(x: f32, y: f32, points: u32) {
    with_runner(|r| r.fx().flag_collected(vec2(x, y), points));
}

#[wasm_bindgen]
pub fn fx_powerup_collected(kind: &str, x: f32, y: f32) {
    with_runner(|r| r.fx().powerup_collected(kind, vec2(x, y)));
}

#[wasm_bindgen]
pub fn fx_combo_milestone(x: f32, y: f32, combo: u32) {
    with_runner(|r| r.fx().combo_milestone(vec2(x, y), combo));
}

#[wasm_bindgen]
pub fn fx_fever_mode_start() {
    with_runner(|r| r.fx().fever_mode_start());
}

#[wasm_bindgen]
pub fn fx_fever_mode_end() {
    with_runner(|r| r.fx().fever_mode_end());
}

#[wasm_bindgen]
pub fn fx_level_complete(level: u32, on_complete: Option<Function>) {
    with_runner(|r| {
        let cb = r.defer(on_complete);
        r.fx().level_complete(level, cb);
    });
}

#[wasm_bindgen]
pub fn fx_level_start(level: u32, on_complete: Option<Function>) {
    with_runner(|r| {
        let cb = r.defer(on_complete);
        r.fx().level_start(level, cb);
    });
}

#[wasm_bindgen]
pub fn fx_game_over(on_complete: Option<Function>) {
    with_runner(|r| {
        let cb = r.defer(on_complete);
        r.fx().game_over(cb);
    });
}

#[wasm_bindgen]
pub fn fx_level_up(level: u32) {
    with_runner(|r| r.fx().level_up(level));
}

#[wasm_bindgen]
pub fn fx_achievement_unlocked(name: &str) {
    with_runner(|r| r.fx().achievement_unlocked(name));
}

#[wasm_bindgen]
pub fn fx_mission_complete(name: &str, reward: u32) {
    with_runner(|r| r.fx().mission_complete(name, reward));
}

#[wasm_bindgen]
pub fn fx_player_trail(x: f32, y: f32, vx: f32, vy: f32, hex: &str) {
    let c = color(hex);
    with_runner(|r| r.fx().player_trail(vec2(x, y), vec2(vx, vy), c));
}

#[wasm_bindgen]
pub fn fx_powerup_aura(x: f32, y: f32, hex: &str, duration_ms: f32) {
    let c = color(hex);
    with_runner(|r| r.fx().powerup_aura(vec2(x, y), c, duration_ms));
}

#[wasm_bindgen]
pub fn fx_player_hit(x: f32, y: f32, direction: f32) {
    with_runner(|r| r.fx().player_hit(vec2(x, y), direction));
}

#[wasm_bindgen]
pub fn fx_enemy_destroyed(x: f32, y: f32, hex: &str) {
    let c = color(hex);
    with_runner(|r| r.fx().enemy_destroyed(vec2(x, y), c));
}

// ---- UI ----

#[wasm_bindgen]
pub fn fx_animate_bar(id: &str, target: f32, duration_ms: f32) {
    with_runner(|r| r.fx().ui.animate_bar(id, target, duration_ms));
}

#[wasm_bindgen]
pub fn fx_set_glow_marker(id: &str, x: f32, y: f32, hex: &str) {
    let c = color(hex);
    with_runner(|r| r.fx().ui.set_glow_marker(id, vec2(x, y), c));
}

#[wasm_bindgen]
pub fn fx_remove_glow_marker(id: &str) {
    with_runner(|r| {
        r.fx().ui.remove_glow_marker(id);
    });
}

// ---- Data accessors ----

/// This frame's draw commands for a Canvas 2D host to replay.
#[wasm_bindgen]
pub fn fx_draw_list_json() -> String {
    with_runner(|r| r.draw_list_json())
}

#[wasm_bindgen]
pub fn fx_draw_command_count() -> u32 {
    with_runner(|r| r.command_count())
}

#[wasm_bindgen]
pub fn fx_particle_count() -> u32 {
    with_runner(|r| r.particle_count())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn fx_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| Some(r.vector_vertices_ptr())).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn fx_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn fx_layer_batches_ptr() -> *const u32 {
    with_runner(|r| Some(r.layer_batches_ptr())).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn fx_layer_batch_count() -> u32 {
    with_runner(|r| r.layer_batch_count())
}

/// Text runs for the vector path as JSON, each tagged with its draw layer.
#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn fx_text_runs_json() -> String {
    with_runner(|r| r.text_runs_json())
}
