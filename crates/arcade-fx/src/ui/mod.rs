//! Floating text, notifications, eased bars and glow markers.

mod bar;
pub mod easing;
mod floating;
mod glow;
mod notification;

pub use bar::{BarAnimator, BarTween};
pub use easing::Easing;
pub use floating::FloatingText;
pub use glow::GlowMarker;
pub use notification::{Notification, Phase};

use glam::Vec2;
use std::collections::BTreeMap;

use crate::color::Color;
use crate::renderer::{Paint, Rect, Surface};

/// Vertical distance between stacked notifications.
const NOTIFICATION_SPACING: f32 = Notification::HEIGHT + 12.0;
const NOTIFICATION_TOP: f32 = 90.0;

#[derive(Debug, Clone, Default)]
pub struct UiLayer {
    texts: Vec<FloatingText>,
    notifications: Vec<Notification>,
    bars: BarAnimator,
    markers: BTreeMap<String, GlowMarker>,
    /// Running clock for glow pulses, in ms.
    elapsed: f32,
}

impl UiLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floating_text(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.texts.push(FloatingText::new(pos, text, color));
    }

    pub fn push_text(&mut self, text: FloatingText) {
        self.texts.push(text);
    }

    /// Queue a banner below any that are already showing.
    pub fn notify(&mut self, notification: Notification) {
        log::debug!("notification: {}", notification.title);
        self.notifications.push(notification);
    }

    pub fn animate_bar(&mut self, id: &str, target: f32, duration: f32) {
        self.bars.animate(id, target, duration);
    }

    pub fn set_bar(&mut self, id: &str, value: f32) {
        self.bars.set(id, value);
    }

    pub fn bar_value(&self, id: &str) -> Option<f32> {
        self.bars.value(id)
    }

    pub fn set_glow_marker(&mut self, id: &str, pos: Vec2, color: Color) {
        let marker = self.markers.entry(id.to_owned()).or_insert(GlowMarker {
            pos,
            color,
            radius: 30.0,
        });
        marker.pos = pos;
        marker.color = color;
    }

    pub fn remove_glow_marker(&mut self, id: &str) -> bool {
        self.markers.remove(id).is_some()
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        self.texts.retain_mut(|t| t.tick(dt));
        for n in &mut self.notifications {
            n.age += dt;
        }
        self.notifications.retain(Notification::is_alive);
        self.bars.update(dt);
    }

    /// Floating text and glow markers.
    pub fn draw_text_layer(&self, surface: &mut dyn Surface) {
        for marker in self.markers.values() {
            marker.draw(surface, self.elapsed);
        }
        for text in &self.texts {
            text.draw(surface);
        }
    }

    /// Stacked banners, newest at the bottom, centered horizontally.
    pub fn draw_notifications(&self, surface: &mut dyn Surface) {
        let x = surface.size().x * 0.5;
        for (i, n) in self.notifications.iter().enumerate() {
            n.draw(surface, Vec2::new(x, NOTIFICATION_TOP + i as f32 * NOTIFICATION_SPACING));
        }
    }

    /// Rounded meter filled to `value / max` of its width.
    pub fn draw_bar(&self, surface: &mut dyn Surface, id: &str, rect: Rect, max: f32, color: Color) {
        let Some(value) = self.bars.value(id) else {
            return;
        };
        let fill = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
        let radius = rect.size.y * 0.5;

        surface.save();
        surface.fill_rounded_rect(rect, radius, &Paint::from(Color::rgb(0.1, 0.1, 0.15).with_alpha(0.8)));
        if fill > 0.0 {
            let filled = Rect {
                pos: rect.pos,
                size: Vec2::new(rect.size.x * fill, rect.size.y),
            };
            surface.set_glow(8.0, color);
            surface.fill_rounded_rect(filled, radius.min(filled.size.x * 0.5), &Paint::from(color));
        }
        surface.restore();
    }

    pub fn clear(&mut self) {
        self.texts.clear();
        self.notifications.clear();
        self.markers.clear();
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};

    #[test]
    fn notification_lifetime_equals_duration() {
        let mut ui = UiLayer::new();
        ui.notify(Notification::new("Achievement").with_timing(1000.0, 200.0, 200.0));
        ui.update(999.0);
        assert_eq!(ui.notification_count(), 1);
        ui.update(1.0);
        assert_eq!(ui.notification_count(), 0);
    }

    #[test]
    fn notifications_stack_downward() {
        let mut ui = UiLayer::new();
        ui.notify(Notification::new("A"));
        ui.notify(Notification::new("B"));
        ui.update(600.0);
        let mut list = DrawList::new(800.0, 600.0);
        ui.draw_notifications(&mut list);
        let anchors: Vec<Vec2> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Translate { offset } => Some(*offset),
                _ => None,
            })
            .collect();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].x, 400.0);
        assert!((anchors[1].y - anchors[0].y - NOTIFICATION_SPACING).abs() < 1e-4);
        assert_eq!(list.texts(), vec!["A", "B"]);
    }

    #[test]
    fn glow_markers_upsert_by_key() {
        let mut ui = UiLayer::new();
        ui.set_glow_marker("flag", Vec2::ZERO, Color::GREEN);
        ui.set_glow_marker("flag", Vec2::ONE, Color::RED);
        assert_eq!(ui.marker_count(), 1);
        assert!(ui.remove_glow_marker("flag"));
        assert!(!ui.remove_glow_marker("flag"));
    }

    #[test]
    fn floating_text_expires() {
        let mut ui = UiLayer::new();
        ui.push_text(FloatingText::new(Vec2::ZERO, "+50", Color::GOLD).with_life(300.0));
        ui.update(200.0);
        assert_eq!(ui.text_count(), 1);
        ui.update(100.0);
        assert_eq!(ui.text_count(), 0);
    }

    #[test]
    fn draw_bar_fills_proportionally() {
        let mut ui = UiLayer::new();
        ui.set_bar("fever", 25.0);
        let mut list = DrawList::new(800.0, 600.0);
        ui.draw_bar(&mut list, "fever", Rect::new(0.0, 0.0, 200.0, 10.0), 100.0, Color::MAGENTA);
        let widths: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRoundedRect { rect, .. } => Some(rect.size.x),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![200.0, 50.0]);

        let mut empty = DrawList::new(800.0, 600.0);
        ui.draw_bar(&mut empty, "missing", Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, Color::RED);
        assert!(empty.is_empty());
    }
}
