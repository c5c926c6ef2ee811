//! Movement strategies, one per behavior tag.
//!
//! Strategies only run when no opponent is within attack reach.

use super::Perception;
use crate::config::{LUMBERING_MOVE_CHANCE, RANDOM_IDLE_CHANCE, RANGED_STANDOFF};
use crate::game::{AgentDecision, Behavior, Position};
use crate::utils::closest_to;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A movement strategy.
pub type Strategy = fn(&Perception<'_>, &mut StdRng) -> AgentDecision;

/// Strategy table indexed by behavior tag.
pub fn strategy_for(behavior: Behavior) -> Strategy {
    match behavior {
        Behavior::Chase | Behavior::BossChase => chase,
        Behavior::Ranged => keep_distance,
        Behavior::Random => wander,
        Behavior::Stationary => hold,
        Behavior::BossLumbering => lumber,
    }
}

// ============================================================================
// Pursuit
// ============================================================================

/// Steps to the free neighbour closest to the goal.
///
/// Candidates are shuffled first so agents with equal options do not all
/// pick the same tile.
pub fn chase(view: &Perception<'_>, rng: &mut StdRng) -> AgentDecision {
    let mut candidates = view.candidates();
    candidates.shuffle(rng);
    closest_to(&candidates, view.goal()).map_or(AgentDecision::Idle, AgentDecision::MoveTo)
}

/// Chase, but only on some turns.
pub fn lumber(view: &Perception<'_>, rng: &mut StdRng) -> AgentDecision {
    if rng.gen_bool(LUMBERING_MOVE_CHANCE) {
        chase(view, rng)
    } else {
        AgentDecision::Idle
    }
}

// ============================================================================
// Ranged
// ============================================================================

/// Keeps the goal at the standoff distance.
///
/// Too close: take the first neighbour that immediately increases distance.
/// Otherwise: take the neighbour whose distance is nearest the standoff, but
/// only if it improves on standing still.
pub fn keep_distance(view: &Perception<'_>, rng: &mut StdRng) -> AgentDecision {
    let mut candidates = view.candidates();
    candidates.shuffle(rng);
    let goal = view.goal();
    let current = view.agent.position.manhattan_distance(goal);

    if current < RANGED_STANDOFF {
        return candidates
            .into_iter()
            .find(|p| p.manhattan_distance(goal) > current)
            .map_or(AgentDecision::Idle, AgentDecision::MoveTo);
    }

    let off_by = |p: &Position| p.manhattan_distance(goal).abs_diff(RANGED_STANDOFF);
    let stay = current.abs_diff(RANGED_STANDOFF);
    candidates
        .into_iter()
        .min_by_key(off_by)
        .filter(|p| off_by(p) < stay)
        .map_or(AgentDecision::Idle, AgentDecision::MoveTo)
}

// ============================================================================
// Idle patterns
// ============================================================================

/// Uniformly random free neighbour, or a pause now and then.
pub fn wander(view: &Perception<'_>, rng: &mut StdRng) -> AgentDecision {
    if rng.gen_bool(RANDOM_IDLE_CHANCE) {
        return AgentDecision::Idle;
    }
    view.candidates()
        .choose(rng)
        .copied()
        .map_or(AgentDecision::Idle, AgentDecision::MoveTo)
}

/// Never moves.
pub fn hold(_view: &Perception<'_>, _rng: &mut StdRng) -> AgentDecision {
    AgentDecision::Idle
}
