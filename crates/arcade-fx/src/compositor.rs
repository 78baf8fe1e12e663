//! Top-level orchestrator: fixed update/draw order and the semantic event
//! API gameplay code talks to.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use crate::api::{GameState, PowerupKind};
use crate::background::ParallaxBackground;
use crate::color::Color;
use crate::core::config::FxConfig;
use crate::core::rng::{derive_seed, Rng};
use crate::core::schedule::DelayQueue;
use crate::effects::EffectLibrary;
use crate::particles::{EmitConfig, ParticleEngine, ParticleShape};
use crate::renderer::{DrawLayer, Surface};
use crate::shake::ScreenShake;
use crate::transitions::{Callback, TransitionMachine};
use crate::ui::{FloatingText, Notification, UiLayer};

const CONFETTI: [Color; 5] = [Color::RED, Color::YELLOW, Color::CYAN, Color::MAGENTA, Color::GREEN];
const FEVER_PALETTE: [Color; 3] = [Color::MAGENTA, Color::ORANGE, Color::GOLD];

/// Stagger between staged fireworks and confetti volleys.
pub const VOLLEY_STEP_MS: f32 = 250.0;

/// Sub-bursts the compositor stages over several frames.
#[derive(Debug, Clone, PartialEq)]
enum Staged {
    Firework { pos: Vec2, palette: Vec<Color> },
    Confetti { pos: Vec2 },
}

pub struct EffectsCompositor {
    config: FxConfig,
    pub particles: ParticleEngine,
    pub effects: EffectLibrary,
    pub shake: ScreenShake,
    pub transitions: TransitionMachine,
    pub ui: UiLayer,
    pub background: ParallaxBackground,
    staged: DelayQueue<Staged>,
    enabled: bool,
    rng: Rng,
}

impl EffectsCompositor {
    pub fn new(config: FxConfig) -> Self {
        let seed = config.seed;
        let size = Vec2::new(config.width, config.height);
        Self {
            particles: ParticleEngine::new(config.max_particles, size, derive_seed(seed, 1)),
            effects: EffectLibrary::new(derive_seed(seed, 2)),
            shake: ScreenShake::new(derive_seed(seed, 3)).with_limits(
                config.shake_decay,
                config.shake_max_offset,
                config.shake_max_rotation,
            ),
            transitions: TransitionMachine::new(),
            ui: UiLayer::new(),
            background: ParallaxBackground::new(config.width, config.height, derive_seed(seed, 4))
                .with_speed_line_threshold(config.speed_line_threshold),
            staged: DelayQueue::new(),
            enabled: true,
            rng: Rng::derive(seed, 5),
            config,
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Turn every update and draw on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::info!("effects {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.background.resize(width, height);
        self.particles.set_bounds(Vec2::new(width, height));
    }

    /// Advance one frame of `dt` ms.
    pub fn update(&mut self, dt: f32, state: &GameState) {
        if !self.enabled {
            return;
        }
        for task in self.staged.advance(dt) {
            self.run_staged(task);
        }
        self.background.update(dt, state.player_speed, state.fever_mode);
        self.effects.update(dt);
        self.transitions.update(dt);
        self.ui.update(dt);
        self.particles.update(dt);
        self.shake.update(dt);
    }

    fn run_staged(&mut self, task: Staged) {
        match task {
            Staged::Firework { pos, palette } => {
                self.particles.firework(pos, &palette);
                self.effects.firework(pos, &palette);
            }
            Staged::Confetti { pos } => {
                self.particles.emit(
                    pos,
                    &EmitConfig::new()
                        .with_count(25)
                        .with_palette(&CONFETTI)
                        .with_shape(ParticleShape::Square)
                        .with_arc(-FRAC_PI_2, 1.4)
                        .with_speed(9.0)
                        .with_size(4.0)
                        .with_life(2.0)
                        .with_gravity(0.25)
                        .with_friction(0.97)
                        .with_rotation(0.0, 0.25),
                );
            }
        }
    }

    /// Draw every layer, calling `game` at the entity layer inside the
    /// screen-shake transform.
    pub fn draw_with(&self, surface: &mut dyn Surface, game: impl FnOnce(&mut dyn Surface)) {
        if !self.enabled {
            surface.begin_layer(DrawLayer::Game);
            game(&mut *surface);
            return;
        }

        surface.begin_layer(DrawLayer::Background);
        self.background.draw(surface);

        self.shake.apply(surface, self.center());
        surface.begin_layer(DrawLayer::Particles);
        self.particles.draw(surface);
        surface.begin_layer(DrawLayer::Effects);
        self.effects.draw(surface);
        surface.begin_layer(DrawLayer::Game);
        game(&mut *surface);
        self.shake.restore(surface);

        surface.begin_layer(DrawLayer::Ui);
        self.ui.draw_text_layer(surface);
        surface.begin_layer(DrawLayer::Notifications);
        self.ui.draw_notifications(surface);
        surface.begin_layer(DrawLayer::Transitions);
        self.transitions.draw(surface);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        self.draw_with(surface, |_| {});
    }

    /// Drop every live visual and cancel all pending sub-bursts. A running
    /// transition keeps going so it can bridge the scene change.
    pub fn clear_scene(&mut self) {
        let cancelled = self.staged.cancel_all() + self.particles.cancel_pending();
        log::info!("scene cleared, {cancelled} pending bursts cancelled");
        self.particles.clear();
        self.effects.clear();
        self.ui.clear();
        self.shake.reset();
    }

    /// Staged sub-bursts not yet fired, including the particle engine's own.
    pub fn pending_bursts(&self) -> usize {
        self.staged.len() + self.particles.pending_count()
    }

    // Semantic events

    pub fn flag_collected(&mut self, pos: Vec2, points: u32) {
        log::debug!("flag collected (+{points})");
        self.particles.collect_enhanced(pos, Color::MINT);
        self.ui.push_text(FloatingText::new(pos, format!("+{points}"), Color::GOLD).with_size(22.0));
        self.shake.small();
    }

    /// Unknown kinds get a plain white collect burst.
    pub fn powerup_collected(&mut self, kind: &str, pos: Vec2) {
        let kind = match kind.parse::<PowerupKind>() {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("{err}");
                self.particles.collect_enhanced(pos, Color::WHITE);
                return;
            }
        };
        log::debug!("powerup {}", kind.name());

        let color = kind.color();
        match kind {
            PowerupKind::Shield => self.effects.shield(pos, color),
            PowerupKind::Speed => self.effects.speed_burst(pos, color),
            PowerupKind::DoublePoints => self.effects.double_points(pos, color),
            PowerupKind::Magnet => self.effects.magnet(pos, color),
            PowerupKind::SlowTime => self.effects.slow_time(pos, color),
        }
        self.particles.collect_enhanced(pos, color);
        self.ui.floating_text(pos - Vec2::new(0.0, 20.0), kind.label(), color);
        self.shake.small();
    }

    pub fn combo_milestone(&mut self, pos: Vec2, combo: u32) {
        log::debug!("combo milestone x{combo}");
        self.effects.combo_milestone(pos, combo);
        self.particles.spiral(pos, crate::effects::combo_color(combo), 20);
        if combo >= 25 {
            self.shake.medium();
        } else {
            self.shake.small();
        }
    }

    /// Color shift, a banner, and a staged volley of fireworks.
    pub fn fever_mode_start(&mut self) {
        log::info!("fever mode start");
        self.transitions.fever_mode();
        self.ui.notify(
            Notification::new("FEVER MODE!")
                .with_subtitle("Double points")
                .with_icon("*")
                .with_color(Color::MAGENTA),
        );
        self.shake.medium();

        let size = self.size();
        for i in 0..3 {
            let pos = Vec2::new(
                self.rng.range(0.2, 0.8) * size.x,
                self.rng.range(0.2, 0.45) * size.y,
            );
            self.staged.schedule(
                i as f32 * VOLLEY_STEP_MS,
                Staged::Firework {
                    pos,
                    palette: FEVER_PALETTE.to_vec(),
                },
            );
        }
    }

    pub fn fever_mode_end(&mut self) {
        log::info!("fever mode end");
        let pos = self.center() - Vec2::new(0.0, 60.0);
        self.ui.push_text(FloatingText::new(pos, "Fever over", Color::MAGENTA).with_size(24.0));
    }

    pub fn level_complete(&mut self, level: u32, on_complete: Option<Callback>) {
        log::info!("level {level} complete");
        self.transitions.level_complete(on_complete);
        self.ui.notify(
            Notification::new("LEVEL COMPLETE")
                .with_subtitle(format!("Level {level} cleared"))
                .with_color(Color::GREEN),
        );
        self.confetti_volley(4);
    }

    pub fn level_start(&mut self, level: u32, on_complete: Option<Callback>) {
        log::info!("level {level} start");
        self.transitions.level_start(on_complete);
        self.ui.notify(Notification::new(format!("LEVEL {level}")).with_color(Color::CYAN));
    }

    pub fn game_over(&mut self, on_complete: Option<Callback>) {
        log::info!("game over");
        self.transitions.game_over(on_complete);
        self.shake.massive();
        let center = self.center();
        self.particles.explosion(center, Color::RED, 1.5);
    }

    pub fn level_up(&mut self, level: u32) {
        log::debug!("level up to {level}");
        self.ui.notify(
            Notification::new("LEVEL UP!")
                .with_subtitle(format!("Level {level}"))
                .with_color(Color::GOLD),
        );
        let pos = Vec2::new(self.center().x, self.size().y * 0.35);
        self.particles.firework(pos, &[Color::GOLD, Color::WHITE]);
        self.particles.text_particles(pos + Vec2::new(-40.0, 40.0), "LEVEL UP", Color::GOLD);
    }

    pub fn achievement_unlocked(&mut self, name: &str) {
        log::debug!("achievement unlocked: {name}");
        self.ui.notify(
            Notification::new("Achievement Unlocked")
                .with_subtitle(name)
                .with_icon("#")
                .with_color(Color::GOLD),
        );
        let pos = Vec2::new(self.center().x, 90.0);
        self.particles.collect_enhanced(pos, Color::GOLD);
    }

    pub fn mission_complete(&mut self, name: &str, reward: u32) {
        log::debug!("mission complete: {name}");
        self.ui.notify(
            Notification::new("Mission Complete")
                .with_subtitle(format!("{name}  +{reward}"))
                .with_color(Color::MINT),
        );
        self.confetti_volley(2);
    }

    pub fn player_trail(&mut self, pos: Vec2, velocity: Vec2, color: Color) {
        self.particles.trail_enhanced(pos, velocity, color);
    }

    pub fn powerup_aura(&mut self, pos: Vec2, color: Color, duration_ms: f32) {
        self.particles.powerup_aura_enhanced(pos, color, duration_ms);
    }

    /// `direction` is the angle the hit pushes debris toward.
    pub fn player_hit(&mut self, pos: Vec2, direction: f32) {
        log::debug!("player hit");
        self.shake.large();
        self.particles.impact(pos, direction, Color::RED);
    }

    pub fn enemy_destroyed(&mut self, pos: Vec2, color: Color) {
        log::debug!("enemy destroyed");
        self.shake.medium();
        self.particles.explosion(pos, color, 1.0);
    }

    fn confetti_volley(&mut self, volleys: usize) {
        let size = self.size();
        for i in 0..volleys {
            let x = size.x * if i % 2 == 0 { 0.2 } else { 0.8 };
            self.staged.schedule(
                i as f32 * VOLLEY_STEP_MS,
                Staged::Confetti {
                    pos: Vec2::new(x, size.y * 0.9),
                },
            );
        }
    }
}

impl Default for EffectsCompositor {
    fn default() -> Self {
        Self::new(FxConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    fn frames(fx: &mut EffectsCompositor, n: usize) {
        for _ in 0..n {
            fx.update(16.0, &GameState::default());
        }
    }

    #[test]
    fn powerup_maps_to_trigger_and_color() {
        let mut fx = EffectsCompositor::default();
        fx.powerup_collected("magnet", Vec2::new(100.0, 100.0));
        assert_eq!(fx.effects.len(), 1);
        assert_eq!(fx.effects.effects()[0].kind.name(), "magnetPulse");
        assert_eq!(fx.effects.effects()[0].color, Color::ORANGE);
        assert!(fx.particles.particle_count() > 0);
    }

    #[test]
    fn unknown_powerup_falls_back_to_plain_burst() {
        let mut fx = EffectsCompositor::default();
        fx.powerup_collected("jetpack", Vec2::ZERO);
        assert!(fx.effects.is_empty());
        assert!(fx.particles.particle_count() > 0);
        assert!(fx.particles.particles().iter().all(|p| p.color == Color::WHITE));
    }

    #[test]
    fn fever_start_stages_fireworks() {
        let mut fx = EffectsCompositor::default();
        fx.fever_mode_start();
        assert_eq!(fx.staged.len(), 3);
        assert_eq!(fx.ui.notification_count(), 1);
        frames(&mut fx, 1);
        assert_eq!(fx.staged.len(), 2);
        assert_eq!(fx.effects.len(), 1);
        frames(&mut fx, 40);
        assert!(fx.staged.is_empty());
    }

    #[test]
    fn disabled_compositor_is_frozen() {
        let mut fx = EffectsCompositor::default();
        fx.enemy_destroyed(Vec2::new(50.0, 50.0), Color::RED);
        let before = fx.particles.particle_count();
        fx.set_enabled(false);
        frames(&mut fx, 10);
        assert_eq!(fx.particles.particle_count(), before);

        let mut list = DrawList::new(800.0, 600.0);
        let mut drew_game = false;
        fx.draw_with(&mut list, |_| drew_game = true);
        assert!(drew_game);
        assert_eq!(list.layers(), vec![DrawLayer::Game]);
    }

    #[test]
    fn clear_scene_cancels_staged_work() {
        let mut fx = EffectsCompositor::default();
        fx.level_complete(1, None);
        fx.level_up(2);
        assert!(fx.pending_bursts() > 0);
        fx.clear_scene();
        assert_eq!(fx.pending_bursts(), 0);
        assert_eq!(fx.particles.particle_count(), 0);
        assert_eq!(fx.ui.notification_count(), 0);
        assert!(fx.transitions.is_active());
        frames(&mut fx, 60);
        assert_eq!(fx.particles.particle_count(), 0);
    }

    #[test]
    fn particle_stream_is_derived_from_config_seed() {
        let mut fx = EffectsCompositor::new(FxConfig::default().with_seed(99));
        let mut expected = Rng::derive(99, 1);
        for _ in 0..4 {
            assert_eq!(fx.particles.rng.next_f32(), expected.next_f32());
        }
    }

    #[test]
    fn resize_updates_background_and_floor() {
        let mut fx = EffectsCompositor::default();
        fx.resize(400.0, 300.0);
        assert_eq!(fx.size(), Vec2::new(400.0, 300.0));
        assert_eq!(fx.background.size(), Vec2::new(400.0, 300.0));
    }
}
