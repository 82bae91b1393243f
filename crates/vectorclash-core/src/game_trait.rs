use serde::{Deserialize, Serialize};

use crate::player::{ArchetypeKind, ControlSource, Difficulty};
use crate::rng::RandomSource;

/// Combatant slot identifier (1 or 2).
pub type CombatantId = u8;

/// Core trait implemented by the duel simulation.
///
/// The host owns scorekeeping, round scheduling, and rendering; the game
/// only advances the simulation and reports what happened.
pub trait DuelGame: Send + Sync {
    /// Game metadata for the selection screen.
    fn metadata(&self) -> GameMetadata;

    /// Called once per match with the immutable match setup.
    fn init(&mut self, setup: &MatchSetup);

    /// Called once per animation frame. Returns the events raised by the
    /// simulation step, if one ran.
    fn update(&mut self, rng: &mut dyn RandomSource) -> Vec<GameEvent>;

    /// Serialize the full simulation state (a between-tick snapshot).
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized one.
    fn apply_state(&mut self, state: &[u8]);

    /// Apply a held-control change for a human-controlled combatant.
    fn apply_control(&mut self, event: ControlEvent);

    /// Apply an encoded [`ControlEvent`] received from the host.
    fn apply_input(&mut self, input: &[u8]);

    /// Opaque reset signal: any change of token reinitializes the round.
    fn apply_reset_token(&mut self, token: u64);

    /// Mirror the authoritative match score in for display.
    fn set_scores(&mut self, scores: [u32; 2]);

    /// Whether the session is in active play (trails are only recorded then).
    fn set_active(&mut self, active: bool);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        crate::time::DEFAULT_TICK_RATE_HZ
    }

    /// Freeze the simulation (frames become no-ops).
    fn pause(&mut self);

    /// Resume after a pause.
    fn resume(&mut self);

    /// Whether the current round has been decided.
    fn is_round_complete(&self) -> bool;
}

/// Game metadata for the selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub combatants: u8,
}

/// One side of the match: which archetype and who controls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSetup {
    pub archetype: ArchetypeKind,
    pub control: ControlSource,
}

/// Match configuration, fixed for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub combatants: [CombatantSetup; 2],
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self::versus_cpu(
            ArchetypeKind::Triangle,
            ArchetypeKind::Pentagon,
            Difficulty::default(),
        )
    }
}

impl MatchSetup {
    /// Human on side 1 against the CPU on side 2.
    pub fn versus_cpu(p1: ArchetypeKind, p2: ArchetypeKind, difficulty: Difficulty) -> Self {
        Self {
            combatants: [
                CombatantSetup {
                    archetype: p1,
                    control: ControlSource::Human,
                },
                CombatantSetup {
                    archetype: p2,
                    control: ControlSource::Ai { difficulty },
                },
            ],
        }
    }

    /// Two humans sharing one keyboard.
    pub fn local_versus(p1: ArchetypeKind, p2: ArchetypeKind) -> Self {
        Self {
            combatants: [
                CombatantSetup {
                    archetype: p1,
                    control: ControlSource::Human,
                },
                CombatantSetup {
                    archetype: p2,
                    control: ControlSource::Human,
                },
            ],
        }
    }

    /// Both sides driven by the AI (headless demos and soak tests).
    pub fn cpu_versus_cpu(
        p1: ArchetypeKind,
        p2: ArchetypeKind,
        difficulty_1: Difficulty,
        difficulty_2: Difficulty,
    ) -> Self {
        Self {
            combatants: [
                CombatantSetup {
                    archetype: p1,
                    control: ControlSource::Ai {
                        difficulty: difficulty_1,
                    },
                },
                CombatantSetup {
                    archetype: p2,
                    control: ControlSource::Ai {
                        difficulty: difficulty_2,
                    },
                },
            ],
        }
    }

    /// Setup for the given combatant id (1 or 2).
    pub fn combatant(&self, id: CombatantId) -> &CombatantSetup {
        &self.combatants[slot_index(id)]
    }

    /// Clamp every AI difficulty into the supported 1–10 range.
    pub fn clamped(mut self) -> Self {
        for side in &mut self.combatants {
            if let ControlSource::Ai { difficulty } = &mut side.control {
                *difficulty = Difficulty::clamped(difficulty.0);
            }
        }
        self
    }
}

/// Index into two-element per-combatant arrays.
pub fn slot_index(id: CombatantId) -> usize {
    if id == 2 { 1 } else { 0 }
}

/// A logical control on the shared keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    P1Jump,
    P1Dive,
    P2Jump,
    P2Dive,
}

impl Control {
    pub fn combatant(self) -> CombatantId {
        match self {
            Control::P1Jump | Control::P1Dive => 1,
            Control::P2Jump | Control::P2Dive => 2,
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Control::P1Jump | Control::P2Jump)
    }
}

/// Discrete "control down/up" event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub control: Control,
    pub pressed: bool,
}

impl ControlEvent {
    pub fn down(control: Control) -> Self {
        Self {
            control,
            pressed: true,
        }
    }

    pub fn up(control: Control) -> Self {
        Self {
            control,
            pressed: false,
        }
    }
}

/// Events emitted by the game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The round was decided. Raised exactly once per round.
    RoundWon { winner: CombatantId },
    /// Both combatants dove into each other at the same height and recoiled.
    Clash,
}

/// Generates the boilerplate `DuelGame` methods shared by implementations:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_round_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and `$StateType` to have a `round.round_over: bool`
/// field path.
#[macro_export]
macro_rules! duel_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("duel state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed duel state"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_round_complete(&self) -> bool {
            self.state.round.round_over
        }
    };
}
