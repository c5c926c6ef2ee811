//! Turn output events.
//!
//! Events are the only channel through which presentation and progress
//! tracking observe a turn. They are emitted in resolution order.

use crate::game::{Position, StatusKind};
use crate::skills::SkillId;
use crate::EntityId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Moved {
        agent_id: EntityId,
        from: Position,
        to: Position,
    },
    Swapped {
        player_id: EntityId,
        ally_id: EntityId,
    },
    SkillCast {
        caster_id: EntityId,
        skill: SkillId,
    },
    ToggleOff {
        agent_id: EntityId,
        skill: SkillId,
    },
    Damage {
        source_id: Option<EntityId>,
        target_id: EntityId,
        amount: i32,
    },
    Healed {
        agent_id: EntityId,
        amount: i32,
    },
    StatusApplied {
        agent_id: EntityId,
        status: StatusKind,
    },
    StatusExpired {
        agent_id: EntityId,
        status: StatusKind,
    },
    ItemUsed {
        item_id: EntityId,
        template_id: String,
    },
    ItemLooted {
        item_id: EntityId,
        name: String,
    },
    /// A drop was lost because the inventory was full
    LootLost {
        name: String,
    },
    GoldGained {
        amount: u32,
    },
    LevelUp {
        level: u32,
    },
    Defeated {
        agent_id: EntityId,
        template_id: String,
    },
    FloorTransition {
        floor: u32,
    },
    GameOver,
}

impl GameEvent {
    pub fn is_defeat(&self) -> bool {
        matches!(self, GameEvent::Defeated { .. })
    }
}
