use vectorclash_core::game_trait::{Control, ControlEvent, MatchSetup, slot_index};
use vectorclash_core::player::ControlSource;

use crate::bot::AiState;

/// Jump/dive pair for one combatant on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Action {
    pub jump: bool,
    pub dive: bool,
}

/// Held state of the four shared-keyboard controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldControls {
    jump: [bool; 2],
    dive: [bool; 2],
}

impl HeldControls {
    /// Record a control going down or up.
    pub fn apply(&mut self, event: ControlEvent) {
        let slot = slot_index(event.control.combatant());
        if event.control.is_jump() {
            self.jump[slot] = event.pressed;
        } else {
            self.dive[slot] = event.pressed;
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        let slot = slot_index(control.combatant());
        if control.is_jump() {
            self.jump[slot]
        } else {
            self.dive[slot]
        }
    }

    /// Release everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn action(&self, slot: usize) -> Action {
        Action {
            jump: self.jump[slot],
            dive: self.dive[slot],
        }
    }
}

/// Sample this tick's action for both combatants: held keys for human sides,
/// the held intent for AI sides.
pub fn resolve_actions(
    setup: &MatchSetup,
    held: &HeldControls,
    ai: &[Option<AiState>; 2],
) -> [Action; 2] {
    std::array::from_fn(|slot| match (setup.combatants[slot].control, &ai[slot]) {
        (ControlSource::Ai { .. }, Some(brain)) => Action {
            jump: brain.holding_jump,
            dive: brain.holding_dive,
        },
        (ControlSource::Ai { .. }, None) => Action::default(),
        (ControlSource::Human, _) => held.action(slot),
    })
}
