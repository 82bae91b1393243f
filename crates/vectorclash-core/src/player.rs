use serde::{Deserialize, Serialize};

/// The four selectable character shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    /// Speedster: high jump, fast horizontal dive.
    Triangle,
    /// Balanced all-rounder.
    Square,
    /// Tank: heavy, crushing vertical dive.
    Pentagon,
    /// Sniper: extreme mobility, floaty.
    Diamond,
}

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; 4] = [
        ArchetypeKind::Triangle,
        ArchetypeKind::Square,
        ArchetypeKind::Pentagon,
        ArchetypeKind::Diamond,
    ];
}

/// AI difficulty on the 1–10 scale.
///
/// The simulation does not validate the value; hosts clamp with
/// [`Difficulty::clamped`] before configuring a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(pub u8);

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Normalized skill level: 0.0 at difficulty 1, 1.0 at difficulty 10.
    pub fn level(self) -> f32 {
        (f32::from(self.0) - 1.0) / 9.0
    }
}

/// Who drives a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSource {
    /// Held keyboard controls delivered by the host.
    Human,
    /// The heuristic AI opponent.
    Ai { difficulty: Difficulty },
}

/// Display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PlayerColor {
    pub const WHITE: PlayerColor = PlayerColor::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation used by the web renderer.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
