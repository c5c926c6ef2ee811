//! # Command Definitions
//!
//! The text command vocabulary understood by the headless runner.

use crate::items::Slot;

/// One entry of the command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub keyword: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
}

impl Command {
    /// Whether `word` names this command.
    pub fn matches(&self, word: &str) -> bool {
        self.keyword == word || self.aliases.contains(&word)
    }
}

pub static COMMANDS: &[Command] = &[
    Command {
        keyword: "north",
        aliases: &["n", "k"],
        usage: "north",
        help: "Move or attack north",
    },
    Command {
        keyword: "south",
        aliases: &["s", "j"],
        usage: "south",
        help: "Move or attack south",
    },
    Command {
        keyword: "east",
        aliases: &["e", "l"],
        usage: "east",
        help: "Move or attack east",
    },
    Command {
        keyword: "west",
        aliases: &["w", "h"],
        usage: "west",
        help: "Move or attack west",
    },
    Command {
        keyword: "wait",
        aliases: &[".", "rest"],
        usage: "wait",
        help: "Skip a turn",
    },
    Command {
        keyword: "cast",
        aliases: &["c"],
        usage: "cast <skill> [x y]",
        help: "Cast a skill, optionally at a tile",
    },
    Command {
        keyword: "target",
        aliases: &["t"],
        usage: "target <skill>",
        help: "Start aiming a skill",
    },
    Command {
        keyword: "confirm",
        aliases: &["ok"],
        usage: "confirm [x y]",
        help: "Cast the skill being aimed",
    },
    Command {
        keyword: "cancel",
        aliases: &["x"],
        usage: "cancel",
        help: "Stop aiming",
    },
    Command {
        keyword: "use",
        aliases: &["u", "quaff"],
        usage: "use <slot number>",
        help: "Use an inventory item",
    },
    Command {
        keyword: "equip",
        aliases: &["wield", "wear"],
        usage: "equip <slot number>",
        help: "Equip an inventory item",
    },
    Command {
        keyword: "unequip",
        aliases: &["remove"],
        usage: "unequip <slot>",
        help: "Return an equipped item to the inventory",
    },
    Command {
        keyword: "learn",
        aliases: &[],
        usage: "learn <skill>",
        help: "Spend a skill point",
    },
    Command {
        keyword: "inventory",
        aliases: &["i", "inv"],
        usage: "inventory",
        help: "List carried items",
    },
    Command {
        keyword: "help",
        aliases: &["?"],
        usage: "help",
        help: "Show this list",
    },
    Command {
        keyword: "new",
        aliases: &["restart"],
        usage: "new",
        help: "Start over after a game over",
    },
    Command {
        keyword: "quit",
        aliases: &["q", "exit"],
        usage: "quit",
        help: "Leave the game",
    },
];

/// Finds the command named by `word`.
pub fn find_command(word: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.matches(word))
}

/// Multi-line usage summary of every command.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|c| format!("  {:<22} {}", c.usage, c.help))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses an equipment slot name.
pub fn parse_slot(word: &str) -> Option<Slot> {
    match word {
        "weapon" => Some(Slot::Weapon),
        "head" => Some(Slot::Head),
        "body" => Some(Slot::Body),
        "hands" => Some(Slot::Hands),
        "feet" => Some(Slot::Feet),
        "ring" => Some(Slot::Ring),
        "amulet" => Some(Slot::Amulet),
        _ => None,
    }
}
