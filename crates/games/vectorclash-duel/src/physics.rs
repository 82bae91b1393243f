use vectorclash_core::player::PlayerColor;

use crate::config::DuelConfig;
use crate::entity::{BehaviorState, Entity, Facing};
use crate::input::Action;
use crate::particles::{DIVE_PARTICLES, EffectEvent, JUMP_PARTICLES, LANDING_PARTICLES};

/// Turn both combatants toward each other. Entity 1 faces right exactly when
/// it is left of entity 2.
pub fn update_facing(entities: &mut [Entity; 2]) {
    let (first, second) = if entities[0].x < entities[1].x {
        (Facing::Right, Facing::Left)
    } else {
        (Facing::Left, Facing::Right)
    };
    entities[0].facing = first;
    entities[1].facing = second;
}

/// Advance one entity by one tick: gravity, drag, Euler step, ground and wall
/// clamps, trail. Returns the landing effect if the entity touched down.
pub fn integrate(
    entity: &mut Entity,
    config: &DuelConfig,
    record_trail: bool,
) -> Option<EffectEvent> {
    let stats = entity.archetype();

    if !entity.state.is_grounded() {
        entity.vy += config.gravity * stats.mass;
    }
    entity.vx *= config.drag;

    entity.x += entity.vx;
    entity.y += entity.vy;

    let mut landed = None;
    let floor = entity.ground_level(config.ground_y);
    if entity.y >= floor {
        entity.y = floor;
        entity.vy = 0.0;
        if entity.state.lands_on_contact() {
            entity.state = BehaviorState::Ground;
            landed = Some(EffectEvent::burst(
                entity.feet(),
                stats.color,
                LANDING_PARTICLES,
            ));
        }
    }

    let left = entity.half_width();
    let right = config.field_width - entity.half_width();
    if entity.x < left {
        entity.x = left;
        entity.vx = 0.0;
    }
    if entity.x > right {
        entity.x = right;
        entity.vx = 0.0;
    }

    if record_trail {
        entity.trail.push(entity.position());
    }

    landed
}

/// Apply a resolved jump/dive action. A jump only starts from the ground and a
/// dive only from plain `Air`, so one dive commits until the next landing.
pub fn apply_action(entity: &mut Entity, action: Action) -> Vec<EffectEvent> {
    let stats = entity.archetype();
    let mut effects = Vec::new();

    if action.jump && entity.state == BehaviorState::Ground {
        entity.state = BehaviorState::Air;
        entity.vy = stats.jump_impulse;
        effects.push(EffectEvent::burst(
            entity.feet(),
            PlayerColor::WHITE,
            JUMP_PARTICLES,
        ));
    }

    if action.dive && entity.state == BehaviorState::Air {
        entity.state = BehaviorState::Kicking;
        entity.vy = stats.dive_velocity_y;
        entity.vx = entity.facing.sign() * stats.dive_velocity_x;
        effects.push(EffectEvent::burst(
            entity.position(),
            stats.color,
            DIVE_PARTICLES,
        ));
    }

    effects
}
