use vectorclash_core::player::{ArchetypeKind, PlayerColor};

/// 1–10 ratings shown on the selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub speed: u8,
    pub jump: u8,
    pub weight: u8,
}

/// Immutable stat profile for one character shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub kind: ArchetypeKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Vertical velocity set on jump (negative = upward).
    pub jump_impulse: f32,
    /// Horizontal dive speed; the sign comes from facing.
    pub dive_velocity_x: f32,
    /// Vertical velocity set on dive (positive = downward).
    pub dive_velocity_y: f32,
    /// Hitbox width and height.
    pub size: f32,
    /// Gravity multiplier.
    pub mass: f32,
    pub color: PlayerColor,
    pub glow: PlayerColor,
    pub attributes: Attributes,
}

pub static VECTOR: Archetype = Archetype {
    kind: ArchetypeKind::Triangle,
    name: "VECTOR",
    description: "High jump, fast horizontal attacks. A glass cannon.",
    jump_impulse: -18.0,
    dive_velocity_x: 18.0,
    dive_velocity_y: 12.0,
    size: 40.0,
    mass: 1.0,
    color: PlayerColor::rgb(0x00, 0xff, 0xff),
    glow: PlayerColor::rgb(0x00, 0xaa, 0xaa),
    attributes: Attributes {
        speed: 9,
        jump: 9,
        weight: 3,
    },
};

pub static BOXER: Archetype = Archetype {
    kind: ArchetypeKind::Square,
    name: "BOXER",
    description: "Balanced stats. Reliable and sturdy.",
    jump_impulse: -16.5,
    dive_velocity_x: 16.0,
    dive_velocity_y: 16.0,
    size: 45.0,
    mass: 1.2,
    color: PlayerColor::rgb(0xff, 0xd7, 0x00),
    glow: PlayerColor::rgb(0xaa, 0x88, 0x00),
    attributes: Attributes {
        speed: 6,
        jump: 6,
        weight: 6,
    },
};

pub static TANK: Archetype = Archetype {
    kind: ArchetypeKind::Pentagon,
    name: "TANK",
    description: "Heavy weight, crushing dive speed. Hard to move.",
    jump_impulse: -15.0,
    dive_velocity_x: 14.0,
    dive_velocity_y: 20.0,
    size: 50.0,
    mass: 1.5,
    color: PlayerColor::rgb(0xff, 0x00, 0xff),
    glow: PlayerColor::rgb(0xaa, 0x00, 0xaa),
    attributes: Attributes {
        speed: 4,
        jump: 4,
        weight: 10,
    },
};

pub static VIPER: Archetype = Archetype {
    kind: ArchetypeKind::Diamond,
    name: "VIPER",
    description: "Extreme mobility and range. Very floaty.",
    jump_impulse: -20.0,
    dive_velocity_x: 22.0,
    dive_velocity_y: 10.0,
    size: 40.0,
    mass: 0.8,
    color: PlayerColor::rgb(0x00, 0xff, 0x00),
    glow: PlayerColor::rgb(0x00, 0xaa, 0x00),
    attributes: Attributes {
        speed: 10,
        jump: 10,
        weight: 2,
    },
};

/// Look up the stat profile for a shape.
pub fn archetype(kind: ArchetypeKind) -> &'static Archetype {
    match kind {
        ArchetypeKind::Triangle => &VECTOR,
        ArchetypeKind::Square => &BOXER,
        ArchetypeKind::Pentagon => &TANK,
        ArchetypeKind::Diamond => &VIPER,
    }
}
