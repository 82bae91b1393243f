use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use vectorclash_core::game_trait::CombatantId;
use vectorclash_core::player::ArchetypeKind;

use crate::archetype::{Archetype, archetype};

/// Behavioral state of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Standing on the ground. Initial state.
    Ground,
    /// Reserved wind-up before a jump. Never assigned by the current rules.
    JumpSquat,
    /// Airborne after a jump or knockback.
    Air,
    /// Committed dive; velocity locked until grounded.
    Kicking,
    /// Knocked back by a clash. Moves like `Air`.
    Recoil,
    /// Reserved post-match pose. Never assigned by the current rules.
    Winner,
    /// Reserved post-match pose. Never assigned by the current rules.
    Loser,
}

impl BehaviorState {
    /// Whether gravity applies.
    pub fn is_grounded(self) -> bool {
        self == BehaviorState::Ground
    }

    /// Whether touching the ground counts as a landing.
    pub fn lands_on_contact(self) -> bool {
        !matches!(self, BehaviorState::Ground | BehaviorState::JumpSquat)
    }
}

/// Horizontal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Bounded history of recent positions, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, evicting the oldest beyond capacity.
    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&Point> {
        self.points.back()
    }
}

/// Mutable state of one combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: CombatantId,
    pub kind: ArchetypeKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    pub state: BehaviorState,
    pub trail: Trail,
    /// Round wins, mirrored from the host for display.
    pub score: u32,
    pub width: f32,
    pub height: f32,
}

impl Entity {
    /// Create a grounded combatant at `x` on the ground line. Entity 1 faces
    /// right, entity 2 faces left.
    pub fn spawn(
        id: CombatantId,
        kind: ArchetypeKind,
        x: f32,
        ground_y: f32,
        trail_length: usize,
    ) -> Self {
        let stats = archetype(kind);
        Self {
            id,
            kind,
            x,
            y: ground_y,
            vx: 0.0,
            vy: 0.0,
            facing: if id == 1 { Facing::Right } else { Facing::Left },
            state: BehaviorState::Ground,
            trail: Trail::new(trail_length),
            score: 0,
            width: stats.size,
            height: stats.size,
        }
    }

    pub fn archetype(&self) -> &'static Archetype {
        archetype(self.kind)
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    pub fn position(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Resting y on the ground line.
    pub fn ground_level(&self, ground_y: f32) -> f32 {
        ground_y - self.half_height()
    }

    /// Point under the combatant's feet.
    pub fn feet(&self) -> Point {
        Point {
            x: self.x,
            y: self.y + self.half_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_evicts_oldest() {
        let mut trail = Trail::new(12);
        for i in 0..20 {
            trail.push(Point {
                x: i as f32,
                y: 0.0,
            });
        }
        assert_eq!(trail.len(), 12);
        assert_eq!(trail.iter().next().unwrap().x, 8.0);
        assert_eq!(trail.newest().unwrap().x, 19.0);
    }

    #[test]
    fn spawn_uses_archetype_size() {
        let e = Entity::spawn(2, ArchetypeKind::Pentagon, 1000.0, 700.0, 12);
        assert_eq!(e.width, 50.0);
        assert_eq!(e.half_width(), 25.0);
        assert_eq!(e.ground_level(700.0), 675.0);
        assert_eq!(e.facing, Facing::Left);
        assert_eq!(e.state, BehaviorState::Ground);
        assert!(e.trail.is_empty());
    }

    #[test]
    fn landing_rules_exclude_reserved_wind_up() {
        assert!(!BehaviorState::Ground.lands_on_contact());
        assert!(!BehaviorState::JumpSquat.lands_on_contact());
        assert!(BehaviorState::Air.lands_on_contact());
        assert!(BehaviorState::Kicking.lands_on_contact());
        assert!(BehaviorState::Recoil.lands_on_contact());
    }
}
