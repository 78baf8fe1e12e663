//! Eased meters (fever gauge, progress bars) keyed by name.

use std::collections::HashMap;

use super::easing::{ease, Easing};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarTween {
    pub start: f32,
    pub target: f32,
    pub elapsed: f32,
    pub duration: f32,
    /// Currently displayed value.
    pub value: f32,
}

impl BarTween {
    fn settled(value: f32) -> Self {
        Self {
            start: value,
            target: value,
            elapsed: 0.0,
            duration: 0.0,
            value,
        }
    }

    fn tick(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        self.value = ease(self.start, self.target, t, Easing::CubicOut);
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }
}

#[derive(Debug, Clone, Default)]
pub struct BarAnimator {
    bars: HashMap<String, BarTween>,
}

impl BarAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ease `id` toward `target` over `duration` ms, starting from whatever
    /// is displayed now. Unknown bars start from 0.
    pub fn animate(&mut self, id: &str, target: f32, duration: f32) {
        let current = self.bars.get(id).map_or(0.0, |b| b.value);
        self.bars.insert(
            id.to_owned(),
            BarTween {
                start: current,
                target,
                elapsed: 0.0,
                duration,
                value: current,
            },
        );
    }

    /// Jump straight to `value`.
    pub fn set(&mut self, id: &str, value: f32) {
        self.bars.insert(id.to_owned(), BarTween::settled(value));
    }

    pub fn value(&self, id: &str) -> Option<f32> {
        self.bars.get(id).map(|b| b.value)
    }

    pub fn get(&self, id: &str) -> Option<&BarTween> {
        self.bars.get(id)
    }

    pub fn update(&mut self, dt: f32) {
        for bar in self.bars.values_mut() {
            if !bar.is_settled() {
                bar.tick(dt);
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.bars.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
