//! # Input Module
//!
//! Text command parsing for the headless runner.
//!
//! Parsing turns a line into a [`PlayerInput`]; only inputs that cost a turn
//! become a [`PlayerAction`]. Everything else (help, targeting, learning) is
//! handled by the caller.

pub mod commands;

pub use commands::*;

use crate::game::{Direction, GameState, PlayerAction, Position};
use crate::items::Slot;
use crate::skills::TargetHint;
use crate::{DelveError, DelveResult};

/// Input handler for processing player commands.
#[derive(Debug, Clone, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{InputHandler, PlayerInput, Direction};
    ///
    /// let input_handler = InputHandler::new();
    /// let input = input_handler.parse("n").unwrap();
    /// assert_eq!(input, Some(PlayerInput::Move(Direction::North)));
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Parses one command line. Blank lines parse to `None`.
    pub fn parse(&self, line: &str) -> DelveResult<Option<PlayerInput>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((first, args)) = words.split_first() else {
            return Ok(None);
        };
        let lowered = first.to_ascii_lowercase();
        let command = find_command(&lowered)
            .ok_or_else(|| DelveError::InvalidAction(format!("unknown command '{first}'")))?;

        let input = match command.keyword {
            "north" => PlayerInput::Move(Direction::North),
            "south" => PlayerInput::Move(Direction::South),
            "east" => PlayerInput::Move(Direction::East),
            "west" => PlayerInput::Move(Direction::West),
            "wait" => PlayerInput::Wait,
            "cast" => {
                let (skill, rest) = skill_arg(command, args)?;
                PlayerInput::Cast {
                    skill,
                    target: tile_arg(command, rest)?,
                }
            }
            "target" => PlayerInput::BeginTargeting(skill_arg(command, args)?.0),
            "confirm" => PlayerInput::Confirm(tile_arg(command, args)?),
            "cancel" => PlayerInput::Cancel,
            "use" => PlayerInput::Use(index_arg(command, args)?),
            "equip" => PlayerInput::Equip(index_arg(command, args)?),
            "unequip" => {
                let slot = args
                    .first()
                    .and_then(|w| parse_slot(&w.to_ascii_lowercase()))
                    .ok_or_else(|| usage_error(command))?;
                PlayerInput::Unequip(slot)
            }
            "learn" => PlayerInput::Learn(skill_arg(command, args)?.0),
            "inventory" => PlayerInput::ShowInventory,
            "help" => PlayerInput::Help,
            "new" => PlayerInput::NewGame,
            _ => PlayerInput::Quit,
        };
        Ok(Some(input))
    }

    /// Converts player input to a turn action.
    ///
    /// Inventory numbers are 1-based positions in the carried item list.
    /// Inputs that do not cost a turn convert to `None`.
    pub fn input_to_action(
        &self,
        input: &PlayerInput,
        game_state: &GameState,
    ) -> DelveResult<Option<PlayerAction>> {
        let item_at = |index: usize| {
            index
                .checked_sub(1)
                .and_then(|i| game_state.inventory.items().get(i))
                .map(|item| item.id)
                .ok_or_else(|| DelveError::InvalidAction(format!("no item number {index}")))
        };

        let action = match input {
            PlayerInput::Move(direction) => PlayerAction::Move(*direction),
            PlayerInput::Wait => PlayerAction::Wait,
            PlayerInput::Cast { skill, target } => match target {
                Some(tile) => PlayerAction::cast_at(skill.clone(), TargetHint::Tile(*tile)),
                None => PlayerAction::cast(skill.clone()),
            },
            PlayerInput::Use(index) => PlayerAction::UseItem(item_at(*index)?),
            PlayerInput::Equip(index) => PlayerAction::Equip(item_at(*index)?),
            PlayerInput::Unequip(slot) => PlayerAction::Unequip(*slot),
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move or bump-attack in a direction
    Move(Direction),
    /// Wait/rest for one turn
    Wait,
    /// Cast immediately, optionally at a tile
    Cast {
        skill: String,
        target: Option<Position>,
    },
    /// Start aiming a skill
    BeginTargeting(String),
    /// Cast the aimed skill
    Confirm(Option<Position>),
    /// Stop aiming
    Cancel,
    /// Use the n-th inventory item
    Use(usize),
    /// Equip the n-th inventory item
    Equip(usize),
    Unequip(Slot),
    /// Spend a skill point
    Learn(String),
    /// Show inventory
    ShowInventory,
    /// Show help information
    Help,
    /// Start a new game (when game has ended)
    NewGame,
    /// Quit the game
    Quit,
}

fn usage_error(command: &Command) -> DelveError {
    DelveError::InvalidAction(format!("usage: {}", command.usage))
}

fn skill_arg<'a>(command: &Command, args: &'a [&'a str]) -> DelveResult<(String, &'a [&'a str])> {
    let (skill, rest) = args.split_first().ok_or_else(|| usage_error(command))?;
    Ok((skill.to_ascii_lowercase(), rest))
}

fn tile_arg(command: &Command, args: &[&str]) -> DelveResult<Option<Position>> {
    match args {
        [] => Ok(None),
        [x, y] => {
            let x = x.parse().map_err(|_| usage_error(command))?;
            let y = y.parse().map_err(|_| usage_error(command))?;
            Ok(Some(Position::new(x, y)))
        }
        _ => Err(usage_error(command)),
    }
}

fn index_arg(command: &Command, args: &[&str]) -> DelveResult<usize> {
    args.first()
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| usage_error(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Job;
    use crate::generation::GenerationConfig;
    use crate::items::{item_template, ItemInstance};

    #[test]
    fn test_movement_words() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse("n").unwrap(), Some(PlayerInput::Move(Direction::North)));
        assert_eq!(handler.parse("H").unwrap(), Some(PlayerInput::Move(Direction::West)));
        assert_eq!(handler.parse("  east ").unwrap(), Some(PlayerInput::Move(Direction::East)));
        assert_eq!(handler.parse("").unwrap(), None);
    }

    #[test]
    fn test_cast_with_and_without_tile() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.parse("cast fireball").unwrap(),
            Some(PlayerInput::Cast {
                skill: "fireball".to_string(),
                target: None
            })
        );
        assert_eq!(
            handler.parse("c Fireball 3 -2").unwrap(),
            Some(PlayerInput::Cast {
                skill: "fireball".to_string(),
                target: Some(Position::new(3, -2))
            })
        );
        assert!(handler.parse("cast").is_err());
        assert!(handler.parse("cast fireball 3").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let handler = InputHandler::new();
        assert!(matches!(
            handler.parse("dance"),
            Err(DelveError::InvalidAction(_))
        ));
        assert!(handler.parse("unequip tail").is_err());
    }

    #[test]
    fn test_input_to_action() {
        let handler = InputHandler::new();
        let mut state = GameState::with_config(GenerationConfig::for_testing(4), Job::Warrior).unwrap();
        let potion = ItemInstance::plain(item_template("healing_potion").unwrap());
        let id = potion.id;
        state.inventory.try_add(potion).unwrap();

        let use_first = handler.parse("use 1").unwrap().unwrap();
        assert_eq!(
            handler.input_to_action(&use_first, &state).unwrap(),
            Some(PlayerAction::UseItem(id))
        );
        let use_missing = handler.parse("use 2").unwrap().unwrap();
        assert!(handler.input_to_action(&use_missing, &state).is_err());
        assert_eq!(
            handler.input_to_action(&PlayerInput::Help, &state).unwrap(),
            None
        );
    }
}
