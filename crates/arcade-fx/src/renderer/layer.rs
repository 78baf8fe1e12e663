use serde::Serialize;

/// Draw layer in the compositor's fixed back-to-front order.
///
/// `Game` is never drawn by this crate; it marks where the host draws its
/// own entities. `Transitions` is always topmost so scene changes occlude
/// everything beneath them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum DrawLayer {
    Background = 0,
    Particles = 1,
    Effects = 2,
    Game = 3,
    Ui = 4,
    Notifications = 5,
    Transitions = 6,
}

impl DrawLayer {
    pub const COUNT: usize = 7;

    pub const ALL: [DrawLayer; Self::COUNT] = [
        Self::Background,
        Self::Particles,
        Self::Effects,
        Self::Game,
        Self::Ui,
        Self::Notifications,
        Self::Transitions,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
