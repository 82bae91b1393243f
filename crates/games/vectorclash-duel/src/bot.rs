use serde::{Deserialize, Serialize};

use vectorclash_core::player::Difficulty;
use vectorclash_core::rng::RandomSource;
use vectorclash_core::time::ms_to_ticks;

use crate::config::{AiConfig, DuelConfig};
use crate::entity::{BehaviorState, Entity};

/// Horizontal range inside which a grounded opponent counts as punishable.
const PUNISH_RANGE: f32 = 400.0;
/// Height advantage needed before committing to a punish dive.
const PUNISH_HEIGHT: f32 = 50.0;
/// Height advantage that counts as "above" in the air game.
const ABOVE_MARGIN: f32 = 20.0;
/// Horizontal range of the kill zone and of an imminent ground hit.
const CLOSE_RANGE: f32 = 150.0;
/// Horizontal range beyond which an airborne AI dives to close the gap.
const GAP_CLOSE_DIVE_RANGE: f32 = 300.0;
/// Distance at which an incoming attack is dangerous while airborne.
const AIR_DANGER_RANGE: f32 = 250.0;
/// Distance at which an incoming attack is dangerous while grounded.
const GROUND_DANGER_RANGE: f32 = 400.0;
/// Neutral spacing: farther than this is too far.
const NEUTRAL_FAR: f32 = 500.0;
/// Neutral spacing: closer than this is crowded.
const NEUTRAL_CLOSE: f32 = 200.0;

/// Per-round AI bookkeeping for one CPU-controlled combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    /// First round tick at which the AI may think again.
    pub next_think_tick: u64,
    pub holding_jump: bool,
    pub holding_dive: bool,
}

impl AiState {
    /// Fresh state for a new round: no intents, first think after the grace delay.
    pub fn at_round_start(config: &DuelConfig) -> Self {
        Self {
            next_think_tick: ms_to_ticks(config.ai.round_start_grace_ms, config.tick_rate),
            holding_jump: false,
            holding_dive: false,
        }
    }

    pub fn clear_intents(&mut self) {
        self.holding_jump = false;
        self.holding_dive = false;
    }

    fn jump(&mut self) {
        self.holding_jump = true;
    }

    fn dive(&mut self) {
        self.holding_dive = true;
    }
}

/// Named branch of the decision tree taken by a think.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    /// Dive onto a recoiling or grounded opponent from above.
    Punish,
    /// Jump over an incoming dive, with a quick re-think to counter.
    AntiAir,
    /// Low-skill dive from the ground against an incoming dive.
    AntiAirPanic,
    /// Airborne and above at close range: dive.
    KillZone,
    /// Airborne and above at long range: dive to close distance.
    GapCloseDive,
    /// Airborne under threat: drift and land safe.
    Disengage,
    /// Airborne under threat: dive anyway.
    PanicDive,
    /// Grounded under imminent threat: jump straight up.
    DodgeJump,
    /// Grounded under imminent threat: dive intent that cannot fire.
    Flinch,
    /// Grounded under distant threat: jump away.
    EvasiveJump,
    /// Neutral, too far: jump toward the opponent.
    GapCloseJump,
    /// Neutral, too close: jump to reposition.
    Reposition,
    /// No action this think.
    Hold,
}

/// Result of one `think` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkOutcome {
    /// Still inside the reaction delay; intents unchanged.
    Waiting,
    /// Random error: maybe jump, otherwise nothing.
    Panicked { jump: bool },
    Decided(Tactic),
}

/// Reaction delay at a normalized level: linear from `max_reaction_ms` at 0
/// down to 0 at 1.
pub fn reaction_latency_ms(level: f32, config: &AiConfig) -> f32 {
    (config.max_reaction_ms * (1.0 - level)).max(0.0)
}

/// Panic probability at a normalized level: linear from `max_error_chance`
/// at 0 down to 0 at 1.
pub fn error_chance(level: f32, config: &AiConfig) -> f32 {
    (config.max_error_chance * (1.0 - level)).max(0.0)
}

/// A tactic gated at `threshold` fails outright below it and otherwise
/// succeeds with probability `level`.
fn skill_check(level: f32, threshold: f32, rng: &mut dyn RandomSource) -> bool {
    if level < threshold {
        return false;
    }
    rng.next_f32() < level
}

/// Run the decision tree for `me` against `opponent` at round tick `tick`.
///
/// Thinks are throttled by a reaction delay. Each think clears the previous
/// intents, schedules the next think, then either panics or picks one tactic.
/// At most one of jump/dive is held afterwards.
pub fn think(
    brain: &mut AiState,
    me: &Entity,
    opponent: &Entity,
    difficulty: Difficulty,
    tick: u64,
    config: &DuelConfig,
    rng: &mut dyn RandomSource,
) -> ThinkOutcome {
    if tick < brain.next_think_tick {
        return ThinkOutcome::Waiting;
    }
    brain.clear_intents();

    let ai = &config.ai;
    let level = difficulty.level();
    let jitter = if level >= 1.0 {
        0.0
    } else {
        rng.next_f32() * ai.max_jitter_ms
    };
    let delay_ms = reaction_latency_ms(level, ai) + jitter;
    brain.next_think_tick = tick + ms_to_ticks(delay_ms, config.tick_rate);

    if rng.next_f32() < error_chance(level, ai) {
        let jump = rng.next_f32() < 0.5;
        if jump {
            brain.jump();
        }
        return ThinkOutcome::Panicked { jump };
    }

    let dx = opponent.x - me.x;
    let dy = opponent.y - me.y;
    let abs_dx = dx.abs();
    let dist = dx.hypot(dy);
    let opponent_attacking = opponent.state == BehaviorState::Kicking
        || (opponent.state == BehaviorState::Air && opponent.vy > 0.0);

    // Punish
    let opponent_vulnerable = opponent.state == BehaviorState::Recoil
        || (opponent.state == BehaviorState::Ground
            && opponent.vy == 0.0
            && abs_dx < PUNISH_RANGE);
    if opponent_vulnerable
        && me.state == BehaviorState::Air
        && me.y < opponent.y - PUNISH_HEIGHT
        && skill_check(level, 0.3, rng)
    {
        brain.dive();
        return ThinkOutcome::Decided(Tactic::Punish);
    }

    // Anti-air
    if opponent.state == BehaviorState::Kicking && me.state == BehaviorState::Ground {
        let closing_speed = opponent.vx.abs();
        if closing_speed > 0.0 && abs_dx / closing_speed < ai.anti_air_window_ticks {
            if skill_check(level, 0.5, rng) {
                brain.jump();
                brain.next_think_tick = tick + ms_to_ticks(ai.rethink_ms, config.tick_rate);
                return ThinkOutcome::Decided(Tactic::AntiAir);
            } else if level < 0.3 {
                brain.dive();
                return ThinkOutcome::Decided(Tactic::AntiAirPanic);
            }
        }
    }

    let tactic = match me.state {
        BehaviorState::Air => air_game(
            brain,
            me,
            opponent,
            level,
            abs_dx,
            dist,
            opponent_attacking,
            rng,
        ),
        BehaviorState::Ground => {
            ground_game(brain, level, abs_dx, dist, opponent_attacking, rng)
        },
        _ => Tactic::Hold,
    };
    ThinkOutcome::Decided(tactic)
}

#[allow(clippy::too_many_arguments)]
fn air_game(
    brain: &mut AiState,
    me: &Entity,
    opponent: &Entity,
    level: f32,
    abs_dx: f32,
    dist: f32,
    opponent_attacking: bool,
    rng: &mut dyn RandomSource,
) -> Tactic {
    if me.y < opponent.y - ABOVE_MARGIN {
        if abs_dx < CLOSE_RANGE {
            brain.dive();
            Tactic::KillZone
        } else if abs_dx > GAP_CLOSE_DIVE_RANGE && skill_check(level, 0.7, rng) {
            brain.dive();
            Tactic::GapCloseDive
        } else {
            Tactic::Hold
        }
    } else if opponent_attacking && dist < AIR_DANGER_RANGE {
        if skill_check(level, 0.4, rng) {
            Tactic::Disengage
        } else {
            brain.dive();
            Tactic::PanicDive
        }
    } else {
        Tactic::Hold
    }
}

fn ground_game(
    brain: &mut AiState,
    level: f32,
    abs_dx: f32,
    dist: f32,
    opponent_attacking: bool,
    rng: &mut dyn RandomSource,
) -> Tactic {
    if opponent_attacking && dist < GROUND_DANGER_RANGE {
        if abs_dx < CLOSE_RANGE {
            if skill_check(level, 0.6, rng) {
                brain.jump();
                Tactic::DodgeJump
            } else {
                brain.dive();
                Tactic::Flinch
            }
        } else if rng.next_f32() < 0.5 + 0.3 * level {
            brain.jump();
            Tactic::EvasiveJump
        } else {
            Tactic::Hold
        }
    } else if abs_dx > NEUTRAL_FAR {
        if rng.next_f32() < 0.05 * (1.0 + 2.0 * level) {
            brain.jump();
            Tactic::GapCloseJump
        } else {
            Tactic::Hold
        }
    } else if abs_dx < NEUTRAL_CLOSE && skill_check(level, 0.2, rng) {
        brain.jump();
        Tactic::Reposition
    } else {
        Tactic::Hold
    }
}
