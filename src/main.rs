//! # Delve Headless Runner
//!
//! Runs the simulation from the command line: scripted commands, the
//! autopilot, or commands read line by line from standard input.

use clap::Parser;
use delve::{
    help_text, AutoexploreState, DelveError, DelveResult, GameEvent, GameState, InputHandler, Job,
    PlayerInput,
};
use log::{error, info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Command line arguments for the Delve runner.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A deterministic turn-based dungeon crawler")]
#[command(version)]
struct Args {
    /// Random seed for the run
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Maximum number of turns to play
    #[arg(short, long, default_value_t = 500)]
    turns: u64,

    /// Job of the character (warrior, mage, rogue)
    #[arg(short, long, default_value = "warrior")]
    job: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Let the autopilot play
    #[arg(long)]
    ai_player: bool,

    /// Write a JSON save snapshot here when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Comma-separated commands to play instead of reading standard input
    #[arg(long)]
    script: Option<String>,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    info!("Starting Delve v{}", delve::VERSION);

    let job = Job::from_name(&args.job)
        .ok_or_else(|| DelveError::InvalidAction(format!("unknown job '{}'", args.job)))?;
    let mut state = GameState::new(args.seed, job)?;

    if args.ai_player {
        info!("Starting in AI player mode");
        run_autopilot(&args, &mut state)?;
    } else if let Some(script) = &args.script {
        let lines: Vec<String> = script.split(',').map(str::to_string).collect();
        run_commands(&args, &mut state, lines.into_iter())?;
    } else {
        println!("{}", state.render());
        let stdin = io::stdin();
        let lines = stdin.lock().lines().map_while(Result::ok);
        run_commands(&args, &mut state, lines)?;
    }

    print_summary(&state);

    if let Some(path) = &args.save {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        std::fs::write(path, state.snapshot(timestamp).to_json()?)?;
        info!("Saved snapshot to {}", path.display());
    }
    Ok(())
}

/// Lets the autopilot play until the turn limit or game over.
fn run_autopilot(args: &Args, state: &mut GameState) -> DelveResult<()> {
    let mut autopilot = AutoexploreState::new();
    while state.turn_number < args.turns {
        let Some(action) = autopilot.next_action(state) else {
            break;
        };
        match state.take_turn(action) {
            Ok(events) => report(state, &events),
            Err(e) => {
                warn!("autopilot action rejected: {}", e);
                autopilot.current_path.clear();
                state.take_turn(delve::PlayerAction::Wait).map(|events| report(state, &events))?;
            }
        }
    }
    Ok(())
}

/// Plays text commands until they run out, the turn limit or `quit`.
fn run_commands(
    args: &Args,
    state: &mut GameState,
    lines: impl Iterator<Item = String>,
) -> DelveResult<()> {
    let handler = InputHandler::new();

    for line in lines {
        if state.turn_number >= args.turns {
            break;
        }
        let input = match handler.parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match &input {
            PlayerInput::Quit => break,
            PlayerInput::Help => {
                println!("{}", help_text());
                continue;
            }
            PlayerInput::ShowInventory => {
                print_inventory(state);
                continue;
            }
            PlayerInput::NewGame => {
                state.reset()?;
                println!("{}", state.render());
                continue;
            }
            _ => {}
        }

        let result = match &input {
            PlayerInput::BeginTargeting(skill) => state.begin_targeting(skill).map(|()| Vec::new()),
            PlayerInput::Cancel => {
                state.cancel_targeting();
                Ok(Vec::new())
            }
            PlayerInput::Confirm(tile) => state.commit_target(tile.map(delve::TargetHint::Tile)),
            PlayerInput::Learn(skill) => state.learn_skill(skill).map(|level| {
                println!("{skill} is now level {level}");
                Vec::new()
            }),
            _ => match handler.input_to_action(&input, state) {
                Ok(Some(action)) => state.take_turn(action),
                Ok(None) => Ok(Vec::new()),
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(events) => {
                report(state, &events);
                if !events.is_empty() {
                    println!("{}", state.render());
                }
            }
            Err(DelveError::GenerationExhausted { floor, attempts }) => {
                error!("floor {floor} could not be generated after {attempts} attempts");
                return Err(DelveError::GenerationExhausted { floor, attempts });
            }
            Err(e) => println!("{e}"),
        }
        io::stdout().flush()?;
    }
    Ok(())
}

fn report(state: &GameState, events: &[GameEvent]) {
    for event in events {
        if let Some(line) = describe(state, event) {
            println!("{line}");
        }
    }
}

fn describe(state: &GameState, event: &GameEvent) -> Option<String> {
    let name = |id| {
        state
            .agent(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "something".to_string())
    };
    let line = match event {
        GameEvent::Moved { .. } | GameEvent::Swapped { .. } => return None,
        GameEvent::SkillCast { caster_id, skill } => format!("{} casts {}", name(*caster_id), skill),
        GameEvent::ToggleOff { skill, .. } => format!("{skill} fades"),
        GameEvent::Damage {
            source_id,
            target_id,
            amount,
        } => match source_id {
            Some(source) => format!("{} hits {} for {}", name(*source), name(*target_id), amount),
            None => format!("{} takes {} damage", name(*target_id), amount),
        },
        GameEvent::Healed { agent_id, amount } => format!("{} recovers {}", name(*agent_id), amount),
        GameEvent::StatusApplied { agent_id, status } => format!("{} is affected by {:?}", name(*agent_id), status),
        GameEvent::StatusExpired { agent_id, status } => format!("{:?} wears off {}", status, name(*agent_id)),
        GameEvent::ItemUsed { template_id, .. } => format!("used {template_id}"),
        GameEvent::ItemLooted { name, .. } => format!("picked up {name}"),
        GameEvent::LootLost { name } => format!("no room for {name}"),
        GameEvent::GoldGained { amount } => format!("found {amount} gold"),
        GameEvent::LevelUp { level } => format!("reached level {level}"),
        GameEvent::Defeated { template_id, .. } => format!("{template_id} is defeated"),
        GameEvent::FloorTransition { floor } => format!("descended to floor {floor}"),
        GameEvent::GameOver => "you died".to_string(),
    };
    Some(line)
}

fn print_inventory(state: &GameState) {
    println!("gold: {}", state.inventory.gold);
    for (i, item) in state.inventory.items().iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, item.name, item.rarity.name());
    }
}

fn print_summary(state: &GameState) {
    let stats = &state.statistics;
    println!(
        "{} the {} | level {} | floor {} | turn {} | {} defeated | {} gold{}",
        state.character.name,
        state.character.job,
        state.character.level,
        state.floor,
        state.turn_number,
        stats.enemies_defeated,
        state.inventory.gold,
        if state.is_encounter_over() { " | dead" } else { "" }
    );
}
