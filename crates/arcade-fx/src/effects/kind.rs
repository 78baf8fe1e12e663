//! Per-kind state and behavior for the effect library.
//!
//! Each variant carries only what its own animation needs. Motion is scaled
//! to 60 Hz frames so effects look the same at any frame rate.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::lightning::Bolt;
use crate::color::Color;
use crate::core::rng::Rng;
use crate::core::FRAME_MS;
use crate::renderer::{BlendMode, Gradient, Paint, Surface, TextStyle};
use crate::ui::easing::Easing;

#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
}

impl Spark {
    fn step(&mut self, frames: f32, gravity: f32, drag: f32) {
        self.pos += self.vel * frames;
        self.vel.y += gravity * frames;
        self.vel *= drag.powf(frames);
    }

    fn draw(&self, surface: &mut dyn Surface, alpha: f32) {
        surface.fill_circle(self.pos, self.size, &Paint::from(self.color.fade(alpha)));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Streak {
    pub dir: Vec2,
    pub travel: f32,
    pub speed: f32,
    pub length: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub angle: f32,
    pub radius: f32,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub enum EffectKind {
    /// Staggered expanding rings around a spinning hexagon.
    ShieldRing { spin: f32 },
    /// Streaks shooting outward from the pickup.
    SpeedBurst { streaks: Vec<Streak> },
    /// Two arms of dots spiralling outward under a "2X" badge.
    DoublePointsSpiral { orbits: Vec<Orbit> },
    /// Inward rings with lightning crackling toward the center.
    MagnetPulse {
        bolts: Vec<Bolt>,
        /// Bolts per second.
        rate: f32,
        reach: f32,
    },
    /// Slow concentric waves and a clock face.
    SlowTimeWave { hand: f32 },
    /// Popping combo label over a ring of sparks.
    ComboMilestone { combo: u32, sparks: Vec<Spark> },
    /// A shell that climbs, then bursts into sparks at its apex.
    Firework {
        shell: Vec2,
        shell_vel: Vec2,
        palette: Vec<Color>,
        sparks: Vec<Spark>,
    },
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::ShieldRing { .. } => "shieldRing",
            EffectKind::SpeedBurst { .. } => "speedBurst",
            EffectKind::DoublePointsSpiral { .. } => "doublePointsSpiral",
            EffectKind::MagnetPulse { .. } => "magnetPulse",
            EffectKind::SlowTimeWave { .. } => "slowTimeWave",
            EffectKind::ComboMilestone { .. } => "comboMilestone",
            EffectKind::Firework { .. } => "firework",
        }
    }

    pub(crate) fn speed_burst(rng: &mut Rng) -> Self {
        let streaks = (0..16)
            .map(|_| Streak {
                dir: rng.unit_vec2(),
                travel: rng.range(0.0, 10.0),
                speed: rng.range(6.0, 12.0),
                length: rng.range(15.0, 35.0),
            })
            .collect();
        EffectKind::SpeedBurst { streaks }
    }

    pub(crate) fn double_points() -> Self {
        const PER_ARM: usize = 12;
        let orbits = (0..PER_ARM * 2)
            .map(|i| {
                let arm = (i / PER_ARM) as f32 * std::f32::consts::PI;
                let k = (i % PER_ARM) as f32;
                Orbit {
                    angle: arm + k * 0.35,
                    radius: 4.0 + k * 3.0,
                    size: 3.0 - k * 0.15,
                }
            })
            .collect();
        EffectKind::DoublePointsSpiral { orbits }
    }

    pub(crate) fn magnet() -> Self {
        EffectKind::MagnetPulse {
            bolts: Vec::new(),
            rate: 25.0,
            reach: 90.0,
        }
    }

    pub(crate) fn combo(origin: Vec2, combo: u32, color: Color, rng: &mut Rng) -> Self {
        let count = 24;
        let sparks = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                Spark {
                    pos: origin,
                    vel: Vec2::from_angle(angle) * rng.range(2.0, 4.5),
                    color: if i % 3 == 0 { Color::WHITE } else { color },
                    size: rng.range(1.5, 3.0),
                }
            })
            .collect();
        EffectKind::ComboMilestone { combo, sparks }
    }

    pub(crate) fn firework(origin: Vec2, palette: &[Color]) -> Self {
        EffectKind::Firework {
            shell: origin,
            shell_vel: Vec2::new(0.0, -7.0),
            palette: palette.to_vec(),
            sparks: Vec::new(),
        }
    }
}

/// An active effect. The library ages it; the kind animates it.
#[derive(Debug, Clone)]
pub struct EffectInstance {
    pub pos: Vec2,
    pub color: Color,
    /// Elapsed ms.
    pub age: f32,
    /// Total lifetime in ms.
    pub duration: f32,
    pub kind: EffectKind,
}

impl EffectInstance {
    pub fn new(pos: Vec2, color: Color, duration: f32, kind: EffectKind) -> Self {
        Self {
            pos,
            color,
            age: 0.0,
            duration,
            kind,
        }
    }

    /// `age / duration` clamped to [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.age / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.duration
    }

    /// Advance kind-specific state. `age` has already been incremented.
    pub(crate) fn update(&mut self, dt: f32, rng: &mut Rng) {
        let frames = dt / FRAME_MS;
        let origin = self.pos;
        match &mut self.kind {
            EffectKind::ShieldRing { spin } => *spin += 0.05 * frames,
            EffectKind::SpeedBurst { streaks } => {
                for s in streaks {
                    s.travel += s.speed * frames;
                    s.speed *= 0.96f32.powf(frames);
                }
            }
            EffectKind::DoublePointsSpiral { orbits } => {
                for o in orbits {
                    o.angle += 0.08 * frames;
                    o.radius += 1.2 * frames;
                }
            }
            EffectKind::MagnetPulse { bolts, rate, reach } => {
                bolts.retain_mut(|b| b.tick(dt));
                for b in bolts.iter_mut() {
                    b.jitter(0.05, rng);
                }
                if rng.chance(*rate * dt / 1000.0) {
                    let dir = rng.unit_vec2();
                    let start = origin + dir * *reach * rng.range(0.7, 1.0);
                    let end = origin + dir * 12.0 + rng.unit_vec2() * 6.0;
                    bolts.push(Bolt::new(start, end, 3, rng));
                }
            }
            EffectKind::SlowTimeWave { hand } => *hand += 0.02 * frames,
            EffectKind::ComboMilestone { sparks, .. } => {
                for s in sparks {
                    s.step(frames, 0.12, 0.97);
                }
            }
            EffectKind::Firework {
                shell,
                shell_vel,
                palette,
                sparks,
            } => {
                if sparks.is_empty() {
                    *shell += *shell_vel * frames;
                    shell_vel.y += 0.15 * frames;
                    if shell_vel.y >= -0.5 {
                        burst_firework(*shell, palette, sparks, rng);
                    }
                } else {
                    for s in sparks {
                        s.step(frames, 0.06, 0.97);
                    }
                }
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let t = self.progress();
        let fade = 1.0 - t;
        surface.save();
        match &self.kind {
            EffectKind::ShieldRing { spin } => self.draw_shield(surface, *spin, fade),
            EffectKind::SpeedBurst { streaks } => {
                surface.set_blend(BlendMode::Additive);
                for s in streaks {
                    let head = self.pos + s.dir * s.travel;
                    let tail = head - s.dir * s.length;
                    surface.stroke_polyline(&[tail, head], 2.5, self.color.fade(fade));
                }
            }
            EffectKind::DoublePointsSpiral { orbits } => {
                surface.set_glow(8.0, self.color);
                for o in orbits {
                    let p = self.pos + Vec2::from_angle(o.angle) * o.radius;
                    surface.fill_circle(p, o.size.max(0.5), &Paint::from(self.color.fade(fade)));
                }
                surface.set_glow(0.0, self.color);
                let pop = Easing::BounceOut.apply(self.age / 400.0);
                let style = TextStyle::new(28.0 * pop, self.color.fade(fade)).bold();
                surface.fill_text("2X", self.pos - Vec2::new(0.0, 40.0), &style);
            }
            EffectKind::MagnetPulse { bolts, reach, .. } => {
                for i in 0..3 {
                    let phase = (self.age / 500.0 + i as f32 / 3.0).fract();
                    let radius = *reach * (1.0 - phase);
                    surface.stroke_circle(self.pos, radius, 2.0, self.color.fade(phase * fade));
                }
                for b in bolts {
                    b.draw(surface, self.color);
                }
            }
            EffectKind::SlowTimeWave { hand } => self.draw_slow_time(surface, *hand, fade),
            EffectKind::ComboMilestone { combo, sparks } => {
                for s in sparks {
                    s.draw(surface, fade);
                }
                let pop = Easing::BounceOut.apply(self.age / 400.0);
                let rise = self.age * 0.03;
                let style = TextStyle::new(32.0 * pop, self.color.fade(fade)).bold();
                surface.set_glow(12.0, self.color);
                surface.fill_text(
                    &format!("COMBO x{combo}"),
                    self.pos - Vec2::new(0.0, 30.0 + rise),
                    &style,
                );
            }
            EffectKind::Firework { shell, sparks, .. } => {
                surface.set_blend(BlendMode::Additive);
                if sparks.is_empty() {
                    surface.fill_circle(*shell, 3.0, &Paint::from(Color::WHITE));
                } else {
                    for s in sparks {
                        s.draw(surface, fade);
                    }
                }
            }
        }
        surface.restore();
    }

    fn draw_shield(&self, surface: &mut dyn Surface, spin: f32, fade: f32) {
        const RINGS: usize = 3;
        const STAGGER: f32 = 150.0;
        const MAX_RADIUS: f32 = 70.0;

        surface.fill_circle(
            self.pos,
            45.0,
            &Paint::radial(
                self.pos,
                0.0,
                45.0,
                Gradient::two(self.color.fade(0.0), self.color.fade(0.35 * fade)),
            ),
        );

        let ring_life = (self.duration - STAGGER * RINGS as f32).max(1.0);
        for i in 0..RINGS {
            let local = (self.age - i as f32 * STAGGER) / ring_life;
            if !(0.0..1.0).contains(&local) {
                continue;
            }
            let radius = MAX_RADIUS * Easing::QuadOut.apply(local);
            surface.stroke_circle(self.pos, radius, 3.0, self.color.fade(1.0 - local));
        }

        let mut hex: Vec<Vec2> = (0..=6)
            .map(|i| Vec2::from_angle(spin + i as f32 * TAU / 6.0) * 40.0)
            .collect();
        for p in &mut hex {
            *p += self.pos;
        }
        surface.set_glow(10.0, self.color);
        surface.stroke_polyline(&hex, 2.0, self.color.fade(fade));
    }

    fn draw_slow_time(&self, surface: &mut dyn Surface, hand: f32, fade: f32) {
        for i in 0..4 {
            let local = (self.progress() * 1.5 - i as f32 * 0.15).clamp(0.0, 1.0);
            if local <= 0.0 || local >= 1.0 {
                continue;
            }
            let radius = 160.0 * Easing::SineInOut.apply(local);
            surface.stroke_circle(self.pos, radius, 4.0, self.color.fade((1.0 - local) * 0.6));
        }

        surface.stroke_circle(self.pos, 30.0, 2.0, self.color.fade(fade));
        for i in 0..12 {
            let dir = Vec2::from_angle(i as f32 * TAU / 12.0);
            surface.stroke_polyline(
                &[self.pos + dir * 24.0, self.pos + dir * 28.0],
                1.5,
                self.color.fade(fade),
            );
        }
        let tip = self.pos + Vec2::from_angle(hand - FRAC_PI_2) * 22.0;
        surface.stroke_polyline(&[self.pos, tip], 2.0, Color::WHITE.fade(fade));
    }
}

fn burst_firework(at: Vec2, palette: &[Color], sparks: &mut Vec<Spark>, rng: &mut Rng) {
    for _ in 0..48 {
        sparks.push(Spark {
            pos: at,
            vel: rng.unit_vec2() * rng.range(1.0, 4.0),
            color: rng.pick(palette).copied().unwrap_or(Color::GOLD),
            size: rng.range(1.5, 2.5),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};

    #[test]
    fn progress_is_clamped() {
        let mut fx = EffectInstance::new(Vec2::ZERO, Color::CYAN, 1000.0, EffectKind::ShieldRing { spin: 0.0 });
        fx.age = 1500.0;
        assert_eq!(fx.progress(), 1.0);
        assert!(!fx.is_alive());
        let zero = EffectInstance::new(Vec2::ZERO, Color::CYAN, 0.0, EffectKind::SlowTimeWave { hand: 0.0 });
        assert_eq!(zero.progress(), 1.0);
    }

    #[test]
    fn firework_bursts_at_apex() {
        let mut rng = Rng::new(9);
        let mut fx = EffectInstance::new(
            Vec2::new(100.0, 400.0),
            Color::GOLD,
            2200.0,
            EffectKind::firework(Vec2::new(100.0, 400.0), &[Color::RED, Color::BLUE]),
        );
        for _ in 0..120 {
            fx.age += FRAME_MS;
            fx.update(FRAME_MS, &mut rng);
        }
        match &fx.kind {
            EffectKind::Firework { sparks, shell, .. } => {
                assert_eq!(sparks.len(), 48);
                assert!(shell.y < 400.0);
                assert!(sparks.iter().all(|s| s.color == Color::RED || s.color == Color::BLUE));
            }
            other => panic!("unexpected kind {}", other.name()),
        }
    }

    #[test]
    fn magnet_bolts_spawn_and_expire_on_their_own_clock() {
        let mut rng = Rng::new(4);
        let mut fx = EffectInstance::new(Vec2::ZERO, Color::ORANGE, 10_000.0, EffectKind::magnet());
        let mut seen = 0;
        for _ in 0..120 {
            fx.age += FRAME_MS;
            fx.update(FRAME_MS, &mut rng);
            if let EffectKind::MagnetPulse { bolts, .. } = &fx.kind {
                seen = seen.max(bolts.len());
                // 150 ms lifespan at 25/s keeps only a handful alive.
                assert!(bolts.len() <= 10);
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn draw_is_balanced_for_every_kind() {
        let mut rng = Rng::new(2);
        let kinds = vec![
            EffectKind::ShieldRing { spin: 0.0 },
            EffectKind::speed_burst(&mut rng),
            EffectKind::double_points(),
            EffectKind::magnet(),
            EffectKind::SlowTimeWave { hand: 0.0 },
            EffectKind::combo(Vec2::ZERO, 10, Color::GOLD, &mut rng),
            EffectKind::firework(Vec2::ZERO, &[Color::RED]),
        ];
        for kind in kinds {
            let mut fx = EffectInstance::new(Vec2::new(50.0, 50.0), Color::MINT, 1000.0, kind);
            fx.age = 300.0;
            fx.update(16.0, &mut rng);
            let mut list = DrawList::new(200.0, 200.0);
            fx.draw(&mut list);
            assert_eq!(list.depth(), 0, "{}", fx.kind.name());
            assert!(list.commands().iter().any(DrawCommand::is_paint), "{}", fx.kind.name());
        }
    }

    #[test]
    fn combo_label_shows_count() {
        let mut rng = Rng::new(2);
        let mut fx = EffectInstance::new(
            Vec2::ZERO,
            Color::GOLD,
            1500.0,
            EffectKind::combo(Vec2::ZERO, 25, Color::GOLD, &mut rng),
        );
        fx.age = 500.0;
        let mut list = DrawList::new(100.0, 100.0);
        fx.draw(&mut list);
        assert!(list.texts().contains(&"COMBO x25"));
    }
}
