use serde::{Deserialize, Serialize};

use vectorclash_core::player::PlayerColor;
use vectorclash_core::rng::RandomSource;

use crate::entity::Point;

pub const LANDING_PARTICLES: u32 = 5;
pub const JUMP_PARTICLES: u32 = 3;
pub const DIVE_PARTICLES: u32 = 5;
pub const CLASH_PARTICLES: u32 = 30;
pub const LOSER_PARTICLES: u32 = 50;
pub const WINNER_PARTICLES: u32 = 20;

/// Minimum particle speed.
const MIN_SPEED: f32 = 2.0;
/// Random speed range added on top of the minimum.
const SPEED_RANGE: f32 = 5.0;

/// A transient visual spark. Not part of simulation correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in (0, 1].
    pub life: f32,
    pub color: PlayerColor,
}

/// Side-channel effect raised by a simulation phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectEvent {
    /// Scatter `count` particles from a point.
    Burst {
        at: Point,
        color: PlayerColor,
        count: u32,
    },
}

impl EffectEvent {
    pub fn burst(at: Point, color: PlayerColor, count: u32) -> Self {
        EffectEvent::Burst { at, color, count }
    }
}

/// Expand an effect into particles with random direction and speed.
pub fn spawn_effect(
    particles: &mut Vec<Particle>,
    effect: &EffectEvent,
    rng: &mut dyn RandomSource,
) {
    match *effect {
        EffectEvent::Burst { at, color, count } => {
            particles.reserve(count as usize);
            for _ in 0..count {
                let angle = rng.next_f32() * std::f32::consts::TAU;
                let speed = rng.next_f32() * SPEED_RANGE + MIN_SPEED;
                particles.push(Particle {
                    x: at.x,
                    y: at.y,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    life: 1.0,
                    color,
                });
            }
        },
    }
}

/// Move every particle, age it by `decay`, and drop the expired ones.
pub fn update_particles(particles: &mut Vec<Particle>, decay: f32) {
    for p in particles.iter_mut() {
        p.x += p.vx;
        p.y += p.vy;
        p.life -= decay;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use vectorclash_core::test_helpers::ScriptedRandom;

    use super::*;

    fn origin() -> Point {
        Point { x: 100.0, y: 200.0 }
    }

    #[test]
    fn burst_spawns_count_particles_at_point() {
        let mut particles = Vec::new();
        let mut rng = ScriptedRandom::constant(0.25);
        spawn_effect(
            &mut particles,
            &EffectEvent::burst(origin(), PlayerColor::WHITE, 30),
            &mut rng,
        );
        assert_eq!(particles.len(), 30);
        assert_eq!(rng.draws(), 60);
        for p in &particles {
            assert_eq!((p.x, p.y), (100.0, 200.0));
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn scripted_draws_set_direction_and_speed() {
        let mut particles = Vec::new();
        // angle = 0, speed = 0.5 * 5 + 2
        let mut rng = ScriptedRandom::new(&[0.0, 0.5]);
        spawn_effect(
            &mut particles,
            &EffectEvent::burst(origin(), PlayerColor::WHITE, 1),
            &mut rng,
        );
        assert!((particles[0].vx - 4.5).abs() < 1e-5);
        assert!(particles[0].vy.abs() < 1e-5);
    }

    #[test]
    fn particles_expire_after_twenty_ticks() {
        let mut particles = Vec::new();
        let mut rng = ScriptedRandom::constant(0.1);
        spawn_effect(
            &mut particles,
            &EffectEvent::burst(origin(), PlayerColor::WHITE, 5),
            &mut rng,
        );
        let mut last_life = 1.0;
        for _ in 0..19 {
            update_particles(&mut particles, 0.05);
            assert_eq!(particles.len(), 5);
            assert!(particles[0].life < last_life, "life must decrease");
            last_life = particles[0].life;
        }
        // 1.0 - 20 * 0.05 reaches zero (within float error) on the next tick
        update_particles(&mut particles, 0.05);
        update_particles(&mut particles, 0.05);
        assert!(particles.is_empty());
    }
}
