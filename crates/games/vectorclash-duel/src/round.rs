use serde::{Deserialize, Serialize};

use vectorclash_core::game_trait::{CombatantId, GameEvent, slot_index};
use vectorclash_core::player::PlayerColor;

use crate::config::DuelConfig;
use crate::entity::Entity;
use crate::particles::{EffectEvent, LOSER_PARTICLES, WINNER_PARTICLES};

/// Round-scoped flags and timers. Reset wholesale at round start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Set by the first win of the round; blocks further win detection.
    pub round_over: bool,
    pub winner: Option<CombatantId>,
    /// Remaining slow-motion frames.
    pub slow_mo: u32,
    /// Screen-shake magnitude.
    pub shake: f32,
    /// Live simulation ticks this round. Drives the AI think schedule.
    pub tick: u64,
    /// Scheduler steps executed this round, including suppressed ones.
    pub steps: u64,
}

/// Result of declaring a round winner.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundWin {
    pub event: GameEvent,
    pub effects: Vec<EffectEvent>,
}

impl RoundState {
    /// Frame gate for the slow-motion policy. Outside slow motion every frame
    /// steps; inside it the counter drops each frame and only multiples of
    /// `divisor` step.
    pub fn frame_should_step(&mut self, divisor: u32) -> bool {
        if self.slow_mo == 0 {
            return true;
        }
        self.slow_mo -= 1;
        self.slow_mo % divisor.max(1) == 0
    }

    /// Award the round. Idempotent: returns `None` once the round is over.
    pub fn declare_winner(
        &mut self,
        winner: CombatantId,
        entities: &[Entity; 2],
        config: &DuelConfig,
    ) -> Option<RoundWin> {
        if self.round_over {
            return None;
        }
        self.round_over = true;
        self.winner = Some(winner);
        self.slow_mo = config.slow_mo_duration;
        self.shake = config.win_shake;

        let winner_slot = slot_index(winner);
        let won = &entities[winner_slot];
        let lost = &entities[1 - winner_slot];
        let effects = vec![
            EffectEvent::burst(lost.position(), lost.archetype().color, LOSER_PARTICLES),
            EffectEvent::burst(won.position(), PlayerColor::WHITE, WINNER_PARTICLES),
        ];

        tracing::info!(winner, tick = self.tick, "Round won");
        Some(RoundWin {
            event: GameEvent::RoundWon { winner },
            effects,
        })
    }

    pub fn decay_shake(&mut self, factor: f32) {
        if self.shake > 0.0 {
            self.shake *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use vectorclash_core::player::ArchetypeKind;

    use super::*;

    fn pair() -> [Entity; 2] {
        [
            Entity::spawn(1, ArchetypeKind::Triangle, 200.0, 700.0, 12),
            Entity::spawn(2, ArchetypeKind::Pentagon, 1000.0, 700.0, 12),
        ]
    }

    #[test]
    fn every_frame_steps_outside_slow_motion() {
        let mut round = RoundState::default();
        assert!((0..50).all(|_| round.frame_should_step(10)));
    }

    #[test]
    fn slow_motion_steps_once_per_ten_frames() {
        let mut round = RoundState {
            slow_mo: 60,
            ..Default::default()
        };
        for _ in 0..6 {
            let steps = (0..10).filter(|_| round.frame_should_step(10)).count();
            assert_eq!(steps, 1);
        }
        assert_eq!(round.slow_mo, 0);
        assert!(round.frame_should_step(10));
    }

    #[test]
    fn declare_winner_is_idempotent() {
        let config = DuelConfig::default();
        let entities = pair();
        let mut round = RoundState::default();

        let win = round.declare_winner(2, &entities, &config).unwrap();
        assert_eq!(win.event, GameEvent::RoundWon { winner: 2 });
        assert_eq!(win.effects.len(), 2);
        assert!(round.round_over);
        assert_eq!(round.slow_mo, 60);
        assert_eq!(round.shake, 20.0);

        assert!(round.declare_winner(1, &entities, &config).is_none());
        assert_eq!(round.winner, Some(2));
    }

    #[test]
    fn loser_burst_uses_loser_color() {
        let config = DuelConfig::default();
        let entities = pair();
        let mut round = RoundState::default();
        let win = round.declare_winner(1, &entities, &config).unwrap();
        let EffectEvent::Burst { color, count, at } = win.effects[0];
        assert_eq!(color, crate::archetype::TANK.color);
        assert_eq!(count, 50);
        assert_eq!(at.x, 1000.0);
    }

    #[test]
    fn shake_decays_geometrically() {
        let mut round = RoundState {
            shake: 20.0,
            ..Default::default()
        };
        round.decay_shake(0.9);
        assert!((round.shake - 18.0).abs() < 1e-5);
        round.decay_shake(0.9);
        assert!((round.shake - 16.2).abs() < 1e-4);
    }
}
