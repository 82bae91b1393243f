use serde::{Deserialize, Serialize};

use vectorclash_core::game_trait::{CombatantId, slot_index};

/// What a decided round means for the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    /// Play continues with another round.
    NextRound,
    /// The winner reached the win score.
    MatchWon(CombatantId),
}

/// Authoritative round-win tally for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    wins: [u32; 2],
    win_score: u32,
    rounds_played: u32,
}

impl Scoreboard {
    pub fn new(win_score: u32) -> Self {
        Self {
            wins: [0, 0],
            win_score: win_score.max(1),
            rounds_played: 0,
        }
    }

    /// Credit a round to `winner`.
    pub fn record_round(&mut self, winner: CombatantId) -> RoundResult {
        let slot = slot_index(winner);
        self.wins[slot] += 1;
        self.rounds_played += 1;
        if self.wins[slot] >= self.win_score {
            RoundResult::MatchWon(winner)
        } else {
            RoundResult::NextRound
        }
    }

    /// Start a new match.
    pub fn reset(&mut self) {
        self.wins = [0, 0];
        self.rounds_played = 0;
    }

    pub fn scores(&self) -> [u32; 2] {
        self.wins
    }

    pub fn win_score(&self) -> u32 {
        self.win_score
    }

    /// Rounds decided so far; the current round number is one more.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }
}
