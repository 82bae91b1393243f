use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use vectorclash_core::game_trait::{CombatantId, ControlEvent, DuelGame, GameEvent};
use vectorclash_core::rng::{RandomSource, SeededRandom};

use crate::config::HostConfig;
use crate::error::SessionError;
use crate::scoreboard::{RoundResult, Scoreboard};

/// Commands sent to a running match session.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Human control down/up.
    Control(ControlEvent),
    /// Mark the session as in active play (trails recorded) or not.
    Activate(bool),
    /// Start a fresh match with the same setup.
    Rematch,
    Stop,
}

/// Broadcasts sent from a match session to its observers.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// Encoded [`SnapshotFrame`]. `Bytes` for cheap cloning across observers.
    Snapshot(Bytes),
    /// A round was decided and another will follow.
    RoundOver {
        winner: CombatantId,
        scores: [u32; 2],
    },
    /// A combatant reached the win score.
    MatchOver {
        winner: CombatantId,
        scores: [u32; 2],
    },
    /// The session loop has exited.
    Ended,
}

/// Per-frame snapshot envelope: frame counter, authoritative scores, and the
/// game's serialized state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFrame {
    pub frame: u64,
    pub round: u32,
    pub scores: [u32; 2],
    pub state: Vec<u8>,
}

pub fn encode_snapshot(frame: &SnapshotFrame) -> Result<Bytes, SessionError> {
    Ok(Bytes::from(rmp_serde::to_vec(frame)?))
}

pub fn decode_snapshot(data: &[u8]) -> Result<SnapshotFrame, rmp_serde::decode::Error> {
    rmp_serde::from_slice(data)
}

/// Frame-driven match host: owns the game, the RNG, and the scoreboard, and
/// schedules the between-round reset.
pub struct MatchSession {
    game: Box<dyn DuelGame>,
    rng: Box<dyn RandomSource>,
    scoreboard: Scoreboard,
    between_rounds: Duration,
    reset_token: u64,
    next_round_at: Option<Instant>,
    match_winner: Option<CombatantId>,
    frame: u64,
}

impl MatchSession {
    pub fn new(mut game: Box<dyn DuelGame>, config: &HostConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        game.init(&config.setup);
        game.set_scores([0, 0]);
        game.apply_reset_token(0);
        game.set_active(true);
        Self {
            game,
            rng,
            scoreboard: Scoreboard::new(config.win_score),
            between_rounds: Duration::from_millis(config.between_round_ms),
            reset_token: 0,
            next_round_at: None,
            match_winner: None,
            frame: 0,
        }
    }

    pub fn game(&self) -> &dyn DuelGame {
        &*self.game
    }

    pub fn game_mut(&mut self) -> &mut dyn DuelGame {
        &mut *self.game
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn match_winner(&self) -> Option<CombatantId> {
        self.match_winner
    }

    /// Whether a decided round is waiting out the between-round delay.
    pub fn between_rounds(&self) -> bool {
        self.next_round_at.is_some()
    }

    pub fn apply_control(&mut self, event: ControlEvent) {
        self.game.apply_control(event);
    }

    pub fn set_active(&mut self, active: bool) {
        self.game.set_active(active);
    }

    /// Run one animation frame at wall-clock `now` and return what observers
    /// should see.
    pub fn frame(&mut self, now: Instant) -> Result<Vec<SessionBroadcast>, SessionError> {
        if let Some(at) = self.next_round_at
            && now >= at
        {
            self.next_round_at = None;
            self.start_next_round();
        }

        let events = self.game.update(&mut *self.rng);
        self.frame += 1;

        let mut out = Vec::new();
        for event in events {
            if let GameEvent::RoundWon { winner } = event {
                out.push(self.on_round_won(winner, now));
            }
        }

        let snapshot = SnapshotFrame {
            frame: self.frame,
            round: self.scoreboard.rounds_played() + 1,
            scores: self.scoreboard.scores(),
            state: self.game.serialize_state(),
        };
        out.push(SessionBroadcast::Snapshot(encode_snapshot(&snapshot)?));
        Ok(out)
    }

    fn on_round_won(&mut self, winner: CombatantId, now: Instant) -> SessionBroadcast {
        let result = self.scoreboard.record_round(winner);
        let scores = self.scoreboard.scores();
        match result {
            RoundResult::NextRound => {
                tracing::info!(
                    winner,
                    p1 = scores[0],
                    p2 = scores[1],
                    "Round over, next round scheduled"
                );
                self.next_round_at = Some(now + self.between_rounds);
                SessionBroadcast::RoundOver { winner, scores }
            },
            RoundResult::MatchWon(champion) => {
                tracing::info!(winner = champion, p1 = scores[0], p2 = scores[1], "Match over");
                self.match_winner = Some(champion);
                self.game.set_scores(scores);
                SessionBroadcast::MatchOver {
                    winner: champion,
                    scores,
                }
            },
        }
    }

    fn start_next_round(&mut self) {
        self.game.set_scores(self.scoreboard.scores());
        self.reset_token += 1;
        self.game.apply_reset_token(self.reset_token);
        tracing::info!(round = self.scoreboard.rounds_played() + 1, "Round started");
    }

    /// Start a fresh match with the same setup.
    pub fn restart(&mut self, config: &HostConfig) {
        self.scoreboard.reset();
        self.match_winner = None;
        self.next_round_at = None;
        self.game.init(&config.setup);
        self.game.set_scores([0, 0]);
        self.reset_token += 1;
        self.game.apply_reset_token(self.reset_token);
        tracing::info!("Match restarted");
    }
}
