//! Types the host game passes in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::color::Color;
use crate::core::error::UnknownName;

/// Per-tick input from the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub player_speed: f32,
    pub fever_mode: bool,
}

impl GameState {
    pub fn new(player_speed: f32, fever_mode: bool) -> Self {
        Self {
            player_speed,
            fever_mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerupKind {
    Shield,
    Speed,
    DoublePoints,
    Magnet,
    SlowTime,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Shield,
        PowerupKind::Speed,
        PowerupKind::DoublePoints,
        PowerupKind::Magnet,
        PowerupKind::SlowTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Shield => "shield",
            PowerupKind::Speed => "speed",
            PowerupKind::DoublePoints => "doublePoints",
            PowerupKind::Magnet => "magnet",
            PowerupKind::SlowTime => "slowTime",
        }
    }

    pub fn color(self) -> Color {
        match self {
            PowerupKind::Shield => Color::CYAN,
            PowerupKind::Speed => Color::YELLOW,
            PowerupKind::DoublePoints => Color::MAGENTA,
            PowerupKind::Magnet => Color::ORANGE,
            PowerupKind::SlowTime => Color::MINT,
        }
    }

    /// Short label for the floating popup.
    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::Shield => "SHIELD!",
            PowerupKind::Speed => "SPEED!",
            PowerupKind::DoublePoints => "2X POINTS!",
            PowerupKind::Magnet => "MAGNET!",
            PowerupKind::SlowTime => "SLOW TIME!",
        }
    }
}

impl FromStr for PowerupKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerupKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownName::new("powerup", s))
    }
}
