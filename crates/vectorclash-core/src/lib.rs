pub mod game_trait;
pub mod player;
pub mod rng;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::game_trait::{Control, ControlEvent, DuelGame, GameEvent, MatchSetup};
    use crate::player::{ArchetypeKind, Difficulty};
    use crate::rng::{RandomSource, SeededRandom};

    /// Random source that replays a fixed script of draws, then repeats a
    /// fallback value. Lets tests pin down exact branches of probabilistic code.
    pub struct ScriptedRandom {
        script: VecDeque<f32>,
        fallback: f32,
        draws: usize,
    }

    impl ScriptedRandom {
        pub fn new(script: &[f32]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                fallback: 0.5,
                draws: 0,
            }
        }

        /// A source that always returns `value`.
        pub fn constant(value: f32) -> Self {
            Self::new(&[]).with_fallback(value)
        }

        pub fn with_fallback(mut self, fallback: f32) -> Self {
            self.fallback = fallback;
            self
        }

        /// Number of draws taken so far.
        pub fn draws(&self) -> usize {
            self.draws
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f32(&mut self) -> f32 {
            self.draws += 1;
            self.script.pop_front().unwrap_or(self.fallback)
        }
    }

    /// Two human players, square vs pentagon.
    pub fn human_setup() -> MatchSetup {
        MatchSetup::local_versus(ArchetypeKind::Square, ArchetypeKind::Pentagon)
    }

    /// Two AI players at the given difficulty.
    pub fn cpu_setup(difficulty: u8) -> MatchSetup {
        MatchSetup::cpu_versus_cpu(
            ArchetypeKind::Triangle,
            ArchetypeKind::Diamond,
            Difficulty(difficulty),
            Difficulty(difficulty),
        )
    }

    /// Run N frames, returning all accumulated events.
    pub fn run_frames(
        game: &mut dyn DuelGame,
        n: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(rng));
        }
        all_events
    }

    /// Count the round-won events in a list.
    pub fn round_wins(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundWon { .. }))
            .count()
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic suite every DuelGame implementation must pass. Game crates
    // call these from their own #[cfg(test)] modules.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(game: &mut dyn DuelGame) {
        game.init(&human_setup());
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// A held human control followed by frames must change state.
    pub fn contract_control_changes_state(game: &mut dyn DuelGame, control: Control) {
        game.init(&human_setup());
        let mut rng = SeededRandom::new(1);
        run_frames(game, 2, &mut rng);
        let before = game.serialize_state();
        game.apply_control(ControlEvent::down(control));
        run_frames(game, 3, &mut rng);
        let after = game.serialize_state();
        assert_ne!(before, after, "State must change after a held control");
    }

    /// update() must advance the simulation.
    pub fn contract_update_advances_state(game: &mut dyn DuelGame) {
        game.init(&human_setup());
        let mut rng = SeededRandom::new(2);
        let before = game.serialize_state();
        game.update(&mut rng);
        let after = game.serialize_state();
        assert_ne!(before, after, "update() must advance simulation state");
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn DuelGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn DuelGame) {
        let mut rng = SeededRandom::new(3);
        game.pause();
        let before = game.serialize_state();
        run_frames(game, 5, &mut rng);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        run_frames(game, 5, &mut rng);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// A new reset token restores the freshly-initialized round; repeating the
    /// same token is a no-op.
    pub fn contract_reset_token_reinitializes(game: &mut dyn DuelGame) {
        game.init(&human_setup());
        let fresh = game.serialize_state();
        let mut rng = SeededRandom::new(4);

        game.apply_reset_token(7);
        game.apply_control(ControlEvent::down(Control::P1Jump));
        run_frames(game, 20, &mut rng);
        game.apply_control(ControlEvent::up(Control::P1Jump));
        let played = game.serialize_state();
        assert_ne!(fresh, played, "Frames must have changed state");

        game.apply_reset_token(7);
        assert_eq!(
            played,
            game.serialize_state(),
            "Repeating a reset token must not reset"
        );

        game.apply_reset_token(8);
        assert_eq!(
            fresh,
            game.serialize_state(),
            "A new reset token must restore the initial round state"
        );
    }

    /// The round-won event fires at most once between resets.
    pub fn contract_round_won_at_most_once(game: &mut dyn DuelGame, frames: usize, seed: u64) {
        game.init(&cpu_setup(10));
        let mut rng = SeededRandom::new(seed);
        let events = run_frames(game, frames, &mut rng);
        assert!(
            round_wins(&events) <= 1,
            "RoundWon must fire at most once per round, got {}",
            round_wins(&events)
        );
        if round_wins(&events) == 1 {
            assert!(game.is_round_complete());
        }
    }
}
