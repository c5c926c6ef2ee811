//! # Delve
//!
//! A deterministic, turn-based dungeon crawler simulation core.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a single owner of mutable simulation state,
//! [`GameState`], which resolves one full turn per call. Everything else is a
//! pure collaborator that the turn engine consults:
//!
//! - **Generation**: procedural floors (with an arena every fifth floor),
//!   floor population and loot rolling
//! - **AI**: per-agent decisions from behavior tags under local perception
//! - **Skills**: static skill tables, modifier composition and cast resolution
//! - **Items & Stats**: parameterised equipment and final stat aggregation
//!
//! Presentation, audio and persistence transport are external. They observe
//! the simulation through [`GameEvent`]s and read-only snapshots.

pub mod ai;
pub mod game;
pub mod generation;
pub mod input;
pub mod items;
pub mod skills;
pub mod stats;
pub mod utils;

// Core module re-exports
pub use ai::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use items::*;
pub use skills::*;
pub use stats::*;

/// Core error type for the Delve simulation.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Cast or attack has no resolvable target
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Skill is still cooling down
    #[error("Skill {skill} is on cooldown for {remaining} more turns")]
    OnCooldown { skill: String, remaining: u32 },

    /// Caster cannot pay the resource cost
    #[error("Insufficient resource: need {needed}, have {available}")]
    InsufficientResource { needed: u32, available: u32 },

    /// Skill cannot be learned or raised
    #[error("Skill locked: {0}")]
    SkillLocked(String),

    /// Skill id is not in the skill table
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// Room placement produced no rooms
    #[error("Generation exhausted on floor {floor} after {attempts} attempts")]
    GenerationExhausted { floor: u32, attempts: u32 },

    /// Persisted snapshot failed structural validation
    #[error("Corrupted save state: {0}")]
    CorruptedSaveState(String),

    /// Inventory has no free slot
    #[error("Inventory is full")]
    InventoryFull,

    /// Not enough gold for a purchase
    #[error("Insufficient gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    /// A turn is already being resolved
    #[error("A turn is already in progress")]
    TurnInProgress,

    /// The player is dead and the encounter must be reset
    #[error("The encounter is over")]
    EncounterOver,
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tuning constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 60;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 40;

    /// Every n-th floor is an arena
    pub const ARENA_INTERVAL: u32 = 5;

    /// Side length of the square arena room
    pub const ARENA_SIZE: u32 = 15;

    /// Room proposals per generation attempt
    pub const ROOM_ATTEMPT_BUDGET: u32 = 60;

    /// Whole-floor retries before falling back to a single room
    pub const GENERATION_RETRIES: u32 = 3;

    /// Maximum number of items carried at once
    pub const INVENTORY_CAPACITY: usize = 20;

    /// Symmetric damage variance as a percentage of the base damage
    pub const DAMAGE_VARIANCE_PCT: i32 = 10;

    /// Preferred distance kept by ranged agents
    pub const RANGED_STANDOFF: u32 = 4;

    /// Chance that a random-behavior agent stands still
    pub const RANDOM_IDLE_CHANCE: f64 = 0.2;

    /// Chance that a lumbering boss moves on a given turn
    pub const LUMBERING_MOVE_CHANCE: f64 = 0.5;

    /// Character level at which loot reaches tier 2
    pub const TIER_2_LEVEL: u32 = 10;

    /// Character level at which loot reaches tier 3
    pub const TIER_3_LEVEL: u32 = 20;

    /// Base chances of rolling one, two and three enchantments
    pub const ENCHANT_CHANCES: [f64; 3] = [0.35, 0.15, 0.05];

    /// Per-level bonus added to every enchantment chance
    pub const ENCHANT_LEVEL_BONUS: f64 = 0.005;

    /// Maximum enchantments on a single item
    pub const MAX_ENCHANTS: usize = 3;

    /// Chance that a defeated hostile drops an item
    pub const LOOT_DROP_CHANCE: f64 = 0.3;

    /// Resource points regained by the player every turn
    pub const RESOURCE_REGEN_PER_TURN: u32 = 1;

    /// Experience required per character level
    pub const XP_PER_LEVEL: u32 = 100;

    /// Levels between mastery tier increases
    pub const MASTERY_LEVEL_STEP: u32 = 3;

    /// Maximum hostiles placed on a regular floor
    pub const MAX_HOSTILES_PER_FLOOR: usize = 12;
}
