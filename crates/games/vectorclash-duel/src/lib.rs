pub mod archetype;
pub mod bot;
pub mod collision;
pub mod config;
pub mod entity;
pub mod input;
pub mod particles;
pub mod physics;
pub mod round;

use serde::{Deserialize, Serialize};

use vectorclash_core::duel_game_boilerplate;
use vectorclash_core::game_trait::{
    CombatantId, Control, ControlEvent, DuelGame, GameEvent, GameMetadata, MatchSetup, slot_index,
};
use vectorclash_core::player::ControlSource;
use vectorclash_core::rng::RandomSource;

use bot::AiState;
use collision::CollisionOutcome;
use config::DuelConfig;
use entity::Entity;
use input::HeldControls;
use particles::{EffectEvent, Particle, spawn_effect, update_particles};
use round::RoundState;

/// Full simulation state. Serialized as the between-tick snapshot the
/// renderer and host read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelState {
    pub entities: [Entity; 2],
    pub particles: Vec<Particle>,
    pub round: RoundState,
    /// AI bookkeeping per side; `None` for human-controlled combatants.
    pub ai: [Option<AiState>; 2],
}

/// The Vector Clash dive-kick duel.
pub struct VectorClash {
    state: DuelState,
    setup: MatchSetup,
    held: HeldControls,
    paused: bool,
    active: bool,
    scores: [u32; 2],
    reset_token: Option<u64>,
    config: DuelConfig,
}

impl VectorClash {
    pub fn new() -> Self {
        Self::with_config(DuelConfig::load())
    }

    pub fn with_config(config: DuelConfig) -> Self {
        let config = config.validated();
        let setup = MatchSetup::default();
        let state = fresh_round(&setup, [0, 0], &config);
        Self {
            state,
            setup,
            held: HeldControls::default(),
            paused: false,
            active: true,
            scores: [0, 0],
            reset_token: None,
            config,
        }
    }

    pub fn state(&self) -> &DuelState {
        &self.state
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// Whether the given control is currently held.
    pub fn is_held(&self, control: Control) -> bool {
        self.held.is_held(control)
    }

    /// Score last mirrored in for combatant `id`.
    pub fn score(&self, id: CombatantId) -> u32 {
        self.scores[slot_index(id)]
    }

    fn reset_round(&mut self) {
        self.state = fresh_round(&self.setup, self.scores, &self.config);
    }

    /// One simulation step. Returns the events raised by it.
    fn step(&mut self, rng: &mut dyn RandomSource) -> Vec<GameEvent> {
        let DuelState {
            entities,
            particles,
            round,
            ai,
        } = &mut self.state;
        let config = &self.config;
        round.steps += 1;

        if round.round_over {
            round.decay_shake(config.shake_decay);
            return Vec::new();
        }

        physics::update_facing(entities);

        for slot in 0..2 {
            if let ControlSource::Ai { difficulty } = self.setup.combatants[slot].control
                && let Some(brain) = ai[slot].as_mut()
            {
                let outcome = bot::think(
                    brain,
                    &entities[slot],
                    &entities[1 - slot],
                    difficulty,
                    round.tick,
                    config,
                    rng,
                );
                tracing::trace!(slot, ?outcome, "AI think");
            }
        }

        let actions = input::resolve_actions(&self.setup, &self.held, ai);

        let mut effects: Vec<EffectEvent> = Vec::new();
        for (entity, action) in entities.iter_mut().zip(actions) {
            effects.extend(physics::integrate(entity, config, self.active));
            effects.extend(physics::apply_action(entity, action));
        }

        let mut events = Vec::new();
        let (outcome, contact_effects) = collision::resolve_collision(entities, config);
        effects.extend(contact_effects);
        match outcome {
            CollisionOutcome::Win { winner } => {
                if let Some(win) = round.declare_winner(winner, entities, config) {
                    events.push(win.event);
                    effects.extend(win.effects);
                }
            },
            CollisionOutcome::Clash => {
                round.shake = config.clash_shake;
                tracing::debug!(tick = round.tick, "Clash");
                events.push(GameEvent::Clash);
            },
            CollisionOutcome::Bump | CollisionOutcome::None => {},
        }

        for effect in &effects {
            spawn_effect(particles, effect, rng);
        }
        update_particles(particles, config.particle_decay);
        round.decay_shake(config.shake_decay);
        round.tick += 1;

        events
    }
}

impl Default for VectorClash {
    fn default() -> Self {
        Self::with_config(DuelConfig::default())
    }
}

/// Build the initial state of a round: both combatants grounded at their
/// spawn points, no particles, timers cleared, AI waiting out the grace delay.
fn fresh_round(setup: &MatchSetup, scores: [u32; 2], config: &DuelConfig) -> DuelState {
    let spawn_x = [config.spawn_inset, config.field_width - config.spawn_inset];
    let entities: [Entity; 2] = std::array::from_fn(|slot| {
        let mut e = Entity::spawn(
            slot as u8 + 1,
            setup.combatants[slot].archetype,
            spawn_x[slot],
            config.ground_y,
            config.trail_length,
        );
        e.score = scores[slot];
        e
    });
    let ai = std::array::from_fn(|slot| match setup.combatants[slot].control {
        ControlSource::Ai { .. } => Some(AiState::at_round_start(config)),
        ControlSource::Human => None,
    });
    DuelState {
        entities,
        particles: Vec::new(),
        round: RoundState::default(),
        ai,
    }
}

impl DuelGame for VectorClash {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Vector Clash".to_string(),
            description: "Jump, dive, and kick first. Height wins the clash.".to_string(),
            combatants: 2,
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate
    }

    fn init(&mut self, setup: &MatchSetup) {
        self.setup = setup.clamped();
        self.held.clear();
        self.paused = false;
        self.scores = [0, 0];
        self.reset_token = None;
        self.reset_round();
        tracing::info!(
            p1 = ?self.setup.combatants[0],
            p2 = ?self.setup.combatants[1],
            "Match initialized"
        );
    }

    fn update(&mut self, rng: &mut dyn RandomSource) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        if !self
            .state
            .round
            .frame_should_step(self.config.slow_mo_divisor)
        {
            return Vec::new();
        }
        self.step(rng)
    }

    duel_game_boilerplate!(state_type: DuelState);

    fn apply_control(&mut self, event: ControlEvent) {
        self.held.apply(event);
    }

    fn apply_input(&mut self, input: &[u8]) {
        match rmp_serde::from_slice::<ControlEvent>(input) {
            Ok(event) => self.apply_control(event),
            Err(e) => tracing::debug!(error = %e, "Dropped malformed control input"),
        }
    }

    fn apply_reset_token(&mut self, token: u64) {
        if self.reset_token == Some(token) {
            return;
        }
        self.reset_token = Some(token);
        self.reset_round();
        tracing::debug!(token, "Round reset");
    }

    fn set_scores(&mut self, scores: [u32; 2]) {
        self.scores = scores;
        for (entity, score) in self.state.entities.iter_mut().zip(scores) {
            entity.score = score;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use vectorclash_core::player::{ArchetypeKind, Difficulty};
    use vectorclash_core::rng::SeededRandom;
    use vectorclash_core::test_helpers::{
        ScriptedRandom, cpu_setup, human_setup, round_wins, run_frames,
    };

    use super::*;
    use entity::BehaviorState;

    fn human_game() -> VectorClash {
        let mut game = VectorClash::default();
        game.init(&human_setup());
        game
    }

    /// Put entity 1 in a dive right above a grounded entity 2 so the next
    /// step connects.
    fn stage_winning_dive(game: &mut VectorClash) {
        let [p1, p2] = &mut game.state.entities;
        p1.x = 590.0;
        p1.y = 640.0;
        p1.vx = 0.0;
        p1.vy = 0.0;
        p1.state = BehaviorState::Kicking;
        p2.x = 610.0;
        p2.y = p2.ground_level(700.0);
        p2.state = BehaviorState::Ground;
    }

    // ================================================================
    // Setup and reset
    // ================================================================

    #[test]
    fn init_spawns_grounded_at_spawn_points() {
        let game = human_game();
        let [p1, p2] = &game.state.entities;
        assert_eq!((p1.x, p2.x), (200.0, 1000.0));
        assert_eq!(p1.kind, ArchetypeKind::Square);
        assert_eq!(p2.kind, ArchetypeKind::Pentagon);
        assert_eq!(p1.state, BehaviorState::Ground);
        assert!(game.state.ai.iter().all(Option::is_none));
    }

    #[test]
    fn with_config_corrects_invalid_values() {
        let config = DuelConfig {
            tick_rate: 0.0,
            slow_mo_divisor: 0,
            ..DuelConfig::default()
        };
        let game = VectorClash::with_config(config);
        assert_eq!(game.tick_rate(), 60.0);
        assert_eq!(game.config().slow_mo_divisor, 1);
    }

    #[test]
    fn ai_sides_get_brains_with_grace_delay() {
        let mut game = VectorClash::default();
        game.init(&MatchSetup::versus_cpu(
            ArchetypeKind::Diamond,
            ArchetypeKind::Triangle,
            Difficulty(7),
        ));
        assert!(game.state.ai[0].is_none());
        assert_eq!(game.state.ai[1].map(|b| b.next_think_tick), Some(60));
    }

    #[test]
    fn init_clamps_difficulty() {
        let mut game = VectorClash::default();
        game.init(&MatchSetup::versus_cpu(
            ArchetypeKind::Square,
            ArchetypeKind::Square,
            Difficulty(99),
        ));
        assert_eq!(
            game.setup().combatants[1].control,
            ControlSource::Ai {
                difficulty: Difficulty(10)
            }
        );
    }

    #[test]
    fn scores_mirror_into_entities_and_survive_reset() {
        let mut game = human_game();
        game.set_scores([3, 1]);
        assert_eq!(game.state.entities[0].score, 3);
        game.apply_reset_token(1);
        assert_eq!(game.state.entities[0].score, 3);
        assert_eq!(game.state.entities[1].score, 1);
        assert_eq!(game.score(2), 1);
    }

    #[test]
    fn reset_clears_round_over_and_particles() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(5);
        stage_winning_dive(&mut game);
        game.update(&mut rng);
        assert!(game.is_round_complete());
        assert!(!game.state.particles.is_empty());

        game.apply_reset_token(11);
        assert!(!game.is_round_complete());
        assert!(game.state.particles.is_empty());
        assert_eq!(game.state.round, RoundState::default());
    }

    // ================================================================
    // Round flow
    // ================================================================

    #[test]
    fn diving_into_grounded_opponent_wins_once() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(6);
        stage_winning_dive(&mut game);

        let events = game.update(&mut rng);
        assert_eq!(events, vec![GameEvent::RoundWon { winner: 1 }]);
        assert_eq!(game.state.round.slow_mo, 60);
        assert_eq!(game.state.round.winner, Some(1));
        // 50 loser sparks + 20 winner sparks, all alive after one update
        assert_eq!(game.state.particles.len(), 70);

        let later = run_frames(&mut game, 300, &mut rng);
        assert_eq!(round_wins(&later), 0);
    }

    #[test]
    fn slow_motion_runs_one_step_per_ten_frames() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(7);
        stage_winning_dive(&mut game);
        game.update(&mut rng);

        let steps_before = game.state.round.steps;
        for block in 1..=6 {
            run_frames(&mut game, 10, &mut rng);
            assert_eq!(game.state.round.steps, steps_before + block);
        }
        run_frames(&mut game, 5, &mut rng);
        assert_eq!(game.state.round.steps, steps_before + 11);
    }

    #[test]
    fn round_over_freezes_bodies_but_decays_shake() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(8);
        stage_winning_dive(&mut game);
        game.update(&mut rng);

        let bodies = game.state.entities.clone();
        let shake = game.state.round.shake;
        run_frames(&mut game, 30, &mut rng);
        assert_eq!(game.state.entities, bodies);
        assert!(game.state.round.shake < shake);
    }

    #[test]
    fn level_dives_clash_instead_of_winning() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(9);
        {
            let [p1, p2] = &mut game.state.entities;
            p1.x = 580.0;
            p1.y = 400.0;
            p1.vx = 16.0;
            p1.vy = 0.0;
            p1.state = BehaviorState::Kicking;
            p2.x = 620.0;
            p2.y = 400.0;
            p2.vx = -14.0;
            p2.vy = 0.0;
            p2.state = BehaviorState::Kicking;
        }
        let events = game.update(&mut rng);
        assert_eq!(events, vec![GameEvent::Clash]);
        assert!(!game.is_round_complete());
        assert!(game.state.entities.iter().all(|e| e.state == BehaviorState::Recoil));
        // clash shake 15 decayed once
        assert!((game.state.round.shake - 13.5).abs() < 1e-4);
        assert_eq!(game.state.particles.len(), 30);
    }

    // ================================================================
    // Input
    // ================================================================

    #[test]
    fn held_jump_launches_on_next_step() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(10);
        game.update(&mut rng);
        game.apply_control(ControlEvent::down(Control::P1Jump));
        game.update(&mut rng);
        assert_eq!(game.state.entities[0].state, BehaviorState::Air);
        assert_eq!(game.state.entities[0].vy, -16.5);
        assert_eq!(game.state.entities[1].state, BehaviorState::Ground);
    }

    #[test]
    fn encoded_control_is_applied() {
        let mut game = human_game();
        let bytes = rmp_serde::to_vec(&ControlEvent::down(Control::P2Dive)).unwrap();
        game.apply_input(&bytes);
        assert!(game.is_held(Control::P2Dive));
    }

    #[test]
    fn apply_input_garbage_no_panic() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(11);
        game.apply_input(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        game.update(&mut rng);
        assert!(!game.is_held(Control::P1Jump));
    }

    #[test]
    fn apply_state_truncated_no_panic() {
        let mut game = human_game();
        let before = game.state.clone();
        let bytes = game.serialize_state();
        game.apply_state(&bytes[..bytes.len() / 2]);
        assert_eq!(game.state, before);
    }

    #[test]
    fn ai_side_ignores_keyboard() {
        let mut game = VectorClash::default();
        game.init(&MatchSetup::versus_cpu(
            ArchetypeKind::Square,
            ArchetypeKind::Square,
            Difficulty(1),
        ));
        let mut rng = ScriptedRandom::constant(0.99);
        game.apply_control(ControlEvent::down(Control::P2Jump));
        run_frames(&mut game, 30, &mut rng);
        assert_eq!(game.state.entities[1].state, BehaviorState::Ground);
    }

    // ================================================================
    // Trails and pause
    // ================================================================

    #[test]
    fn trails_only_grow_while_active() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(12);
        game.set_active(false);
        run_frames(&mut game, 10, &mut rng);
        assert!(game.state.entities[0].trail.is_empty());

        game.set_active(true);
        run_frames(&mut game, 20, &mut rng);
        assert_eq!(game.state.entities[0].trail.len(), 12);
    }

    #[test]
    fn double_pause_single_resume() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(13);
        game.pause();
        game.pause();
        game.resume();
        game.update(&mut rng);
        assert_eq!(game.state.round.tick, 1);
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================

    #[test]
    fn contract_init_creates_state() {
        let mut game = VectorClash::default();
        vectorclash_core::test_helpers::contract_init_creates_state(&mut game);
    }

    #[test]
    fn contract_control_changes_state() {
        let mut game = VectorClash::default();
        vectorclash_core::test_helpers::contract_control_changes_state(
            &mut game,
            Control::P2Jump,
        );
    }

    #[test]
    fn contract_update_advances_state() {
        let mut game = VectorClash::default();
        vectorclash_core::test_helpers::contract_update_advances_state(&mut game);
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut game = human_game();
        let mut rng = SeededRandom::new(14);
        game.apply_control(ControlEvent::down(Control::P1Jump));
        run_frames(&mut game, 10, &mut rng);
        vectorclash_core::test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut game = human_game();
        vectorclash_core::test_helpers::contract_pause_stops_updates(&mut game);
    }

    #[test]
    fn contract_reset_token_reinitializes() {
        let mut game = VectorClash::default();
        vectorclash_core::test_helpers::contract_reset_token_reinitializes(&mut game);
    }

    #[test]
    fn contract_round_won_at_most_once() {
        for seed in [1, 2, 3] {
            let mut game = VectorClash::default();
            vectorclash_core::test_helpers::contract_round_won_at_most_once(
                &mut game, 3000, seed,
            );
        }
    }

    #[test]
    fn cpu_match_stays_in_bounds() {
        let mut game = VectorClash::default();
        game.init(&cpu_setup(6));
        let mut rng = SeededRandom::new(15);
        for _ in 0..2000 {
            game.update(&mut rng);
            for e in &game.state.entities {
                assert!(e.y <= e.ground_level(700.0));
                assert!(e.x >= e.half_width() && e.x <= 1200.0 - e.half_width());
            }
        }
    }
}
