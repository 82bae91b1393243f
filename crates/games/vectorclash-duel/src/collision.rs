use vectorclash_core::game_trait::CombatantId;
use vectorclash_core::player::PlayerColor;

use crate::config::DuelConfig;
use crate::entity::{BehaviorState, Entity, Point};
use crate::particles::{CLASH_PARTICLES, EffectEvent};

/// What an entity-vs-entity contact resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Bodies do not overlap.
    None,
    /// A dive connected; the round goes to `winner`.
    Win { winner: CombatantId },
    /// Two dives met at the same height; both recoil.
    Clash,
    /// Neither was diving; bodies pushed apart.
    Bump,
}

/// Circle-vs-circle overlap test using half the summed widths as the radius.
pub fn overlapping(a: &Entity, b: &Entity) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx.hypot(dy) < (a.width + b.width) / 2.0
}

/// Resolve contact between the two combatants after both have moved.
///
/// A lone diver wins. Two divers are decided by height: the one higher by
/// more than `clash_margin` wins, otherwise both recoil with reversed,
/// amplified horizontal velocity. Non-divers bump apart.
pub fn resolve_collision(
    entities: &mut [Entity; 2],
    config: &DuelConfig,
) -> (CollisionOutcome, Vec<EffectEvent>) {
    if !overlapping(&entities[0], &entities[1]) {
        return (CollisionOutcome::None, Vec::new());
    }

    let first_kicking = entities[0].state == BehaviorState::Kicking;
    let second_kicking = entities[1].state == BehaviorState::Kicking;

    match (first_kicking, second_kicking) {
        (true, false) => win(&entities[0]),
        (false, true) => win(&entities[1]),
        (true, true) => {
            // Positive when entity 1 is higher (y grows downward).
            let height_diff = entities[1].y - entities[0].y;
            if height_diff > config.clash_margin {
                win(&entities[0])
            } else if height_diff < -config.clash_margin {
                win(&entities[1])
            } else {
                for e in entities.iter_mut() {
                    e.vx = -e.vx * config.clash_recoil_scale;
                    e.vy = config.clash_recoil_vy;
                    e.state = BehaviorState::Recoil;
                }
                let midpoint = Point {
                    x: (entities[0].x + entities[1].x) / 2.0,
                    y: (entities[0].y + entities[1].y) / 2.0,
                };
                (
                    CollisionOutcome::Clash,
                    vec![EffectEvent::burst(
                        midpoint,
                        PlayerColor::WHITE,
                        CLASH_PARTICLES,
                    )],
                )
            }
        },
        (false, false) => {
            bump(entities, config.bump_force);
            (CollisionOutcome::Bump, Vec::new())
        },
    }
}

fn win(winner: &Entity) -> (CollisionOutcome, Vec<EffectEvent>) {
    (CollisionOutcome::Win { winner: winner.id }, Vec::new())
}

/// Push both bodies apart along the line between their centers.
///
/// Intended departure from a full push along that angle: grounded bodies
/// take only the horizontal part. Gravity is off while standing, so an
/// upward impulse would leave them floating.
fn bump(entities: &mut [Entity; 2], force: f32) {
    let angle = (entities[0].y - entities[1].y).atan2(entities[0].x - entities[1].x);
    let (push_x, push_y) = (angle.cos() * force, angle.sin() * force);

    for (e, sign) in entities.iter_mut().zip([1.0, -1.0]) {
        e.vx += sign * push_x;
        if !e.state.is_grounded() {
            e.vy += sign * push_y;
        }
    }
}
