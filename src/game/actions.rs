//! Player intents and agent decisions.

use crate::game::{Direction, Position};
use crate::items::Slot;
use crate::skills::TargetHint;
use crate::EntityId;

/// A discrete player intent for one turn.
///
/// Bump attacks are not a separate variant: moving into a hostile agent is
/// resolved as a melee attack against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Move(Direction),
    Cast {
        skill: String,
        target: Option<TargetHint>,
    },
    /// Drink or use a consumable from the inventory
    UseItem(EntityId),
    /// Equip an inventory item; costs a turn
    Equip(EntityId),
    /// Return an equipped item to the inventory; costs a turn
    Unequip(Slot),
    Wait,
}

impl PlayerAction {
    pub fn cast(skill: impl Into<String>) -> Self {
        PlayerAction::Cast {
            skill: skill.into(),
            target: None,
        }
    }

    pub fn cast_at(skill: impl Into<String>, target: TargetHint) -> Self {
        PlayerAction::Cast {
            skill: skill.into(),
            target: Some(target),
        }
    }
}

/// What an agent intends to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentDecision {
    MoveTo(Position),
    Attack(EntityId),
    Idle,
}
