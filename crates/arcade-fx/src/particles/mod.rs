//! Particle engine: bounded pool, short-lived emitters, scheduled bursts.
//!
//! The pool never grows past `max_particles`. Requests that do not fit are
//! dropped; live particles are never evicted to make room.

mod config;
mod emitter;
mod particle;
mod presets;

pub use config::{EmitConfig, EmitterConfig, ParticleColor};
pub use emitter::Emitter;
pub use particle::{star_points, Particle, ParticleShape};

use glam::Vec2;
use std::collections::VecDeque;

use crate::core::rng::Rng;
use crate::core::schedule::DelayQueue;
use crate::renderer::Surface;

/// Work the engine owes at a later time.
#[derive(Debug, Clone)]
enum Scheduled {
    Burst { origin: Vec2, config: EmitConfig },
    Emitter { origin: Vec2, config: EmitterConfig },
}

pub struct ParticleEngine {
    particles: Vec<Particle>,
    emitters: Vec<Emitter>,
    scheduled: DelayQueue<Scheduled>,
    max_particles: usize,
    bounds: Vec2,
    pub rng: Rng,
}

impl ParticleEngine {
    pub const DEFAULT_MAX_PARTICLES: usize = 500;

    /// `seed` is used as is; callers sharing a config seed pass a stream
    /// derived with `derive_seed`.
    pub fn new(max_particles: usize, bounds: Vec2, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            emitters: Vec::new(),
            scheduled: DelayQueue::new(),
            max_particles,
            bounds,
            rng: Rng::new(seed),
        }
    }

    /// Spawn one burst at `origin`. Returns how many particles were created,
    /// which is less than `config.count` when the pool is nearly full.
    pub fn emit(&mut self, origin: Vec2, config: &EmitConfig) -> usize {
        let room = self.max_particles.saturating_sub(self.particles.len());
        let count = config.count.min(room);
        if count < config.count {
            log::trace!("particle pool full: dropped {} of {}", config.count - count, config.count);
        }

        for _ in 0..count {
            let angle = config.sample_angle(&mut self.rng);
            let speed = config.speed * self.rng.range(0.5, 1.0);
            let size = config.size * self.rng.range(0.5, 1.0);
            let color = config.color.pick(&mut self.rng);

            let mut p = Particle::new(origin, Vec2::from_angle(angle) * speed, size, color, config.life);
            p.shape = config.shape;
            p.gravity = config.gravity;
            p.friction = config.friction;
            p.bounce = config.bounce;
            p.rotation = config.rotation;
            p.rotation_speed = config.rotation_speed;
            if config.trail {
                p.trail = Some(VecDeque::with_capacity(config.trail_length + 1));
                p.trail_length = config.trail_length;
            }
            if config.glow {
                p.glow = Some(config.glow_size);
            }
            self.particles.push(p);
        }
        count
    }

    /// Start continuous emission at `origin`.
    pub fn create_emitter(&mut self, origin: Vec2, config: EmitterConfig) {
        self.emitters.push(Emitter::new(origin, config));
    }

    /// Spawn a burst `delay_ms` from now. The pool cap is checked when it fires.
    pub fn emit_after(&mut self, delay_ms: f32, origin: Vec2, config: EmitConfig) {
        self.scheduled.schedule(delay_ms, Scheduled::Burst { origin, config });
    }

    /// Start an emitter `delay_ms` from now.
    pub fn emitter_after(&mut self, delay_ms: f32, origin: Vec2, config: EmitterConfig) {
        self.scheduled.schedule(delay_ms, Scheduled::Emitter { origin, config });
    }

    /// Advance everything by `dt` ms.
    pub fn update(&mut self, dt: f32) {
        for task in self.scheduled.advance(dt) {
            match task {
                Scheduled::Burst { origin, config } => {
                    self.emit(origin, &config);
                }
                Scheduled::Emitter { origin, config } => self.create_emitter(origin, config),
            }
        }

        let floor = self.bounds.y;
        self.particles.retain_mut(|p| p.tick(dt, floor));

        let mut emitters = std::mem::take(&mut self.emitters);
        for e in &mut emitters {
            for _ in 0..e.tick(dt) {
                if self.particles.len() >= self.max_particles {
                    break;
                }
                self.emit(e.origin, &e.template);
            }
        }
        emitters.retain(|e| !e.is_finished());
        // Anything created while the list was taken goes after the survivors.
        emitters.append(&mut self.emitters);
        self.emitters = emitters;
    }

    /// Draw every particle in spawn order.
    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            p.draw(surface);
        }
    }

    /// Remove every particle and emitter and cancel scheduled bursts.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.emitters.clear();
        self.scheduled.cancel_all();
    }

    /// Cancel scheduled bursts only. Returns how many were dropped.
    pub fn cancel_pending(&mut self) -> usize {
        self.scheduled.cancel_all()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn pending_count(&self) -> usize {
        self.scheduled.len()
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }
}
