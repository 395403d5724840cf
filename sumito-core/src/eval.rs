//! Position evaluation and per-move heuristics

use crate::ai::Difficulty;
use crate::board::{opposite, Hex, BOARD_RADIUS};
use crate::game::{GameState, Player};
use crate::movegen::Move;

// ============================================================================
// STATIC EVALUATION
// ============================================================================

/// The seven innermost cells
const CENTER_CELLS: [Hex; 7] = [
    Hex::new(0, 0),
    Hex::new(1, 0),
    Hex::new(-1, 0),
    Hex::new(0, 1),
    Hex::new(0, -1),
    Hex::new(1, -1),
    Hex::new(-1, 1),
];

/// Feature weights for the static evaluation
const SCORE_WEIGHT: i32 = 1000;
const CENTER_WEIGHT: i32 = 50;
const MARBLE_WEIGHT: i32 = 20;
const COHESION_WEIGHT: i32 = 5;

/// Evaluate a position from `perspective`'s point of view. Pure function
/// of (board, perspective, difficulty); the cohesion term participates on
/// Hard only.
pub fn evaluate(state: &GameState, perspective: Player, difficulty: Difficulty) -> i32 {
    let opponent = perspective.opponent();

    let mut score =
        (state.score(perspective) as i32 - state.score(opponent) as i32) * SCORE_WEIGHT;

    let mut center = 0;
    for pos in CENTER_CELLS {
        match state.occupant(pos) {
            Some(p) if p == perspective => center += 1,
            Some(_) => center -= 1,
            None => {}
        }
    }
    score += center * CENTER_WEIGHT;

    score += (state.marble_count(perspective) as i32 - state.marble_count(opponent) as i32)
        * MARBLE_WEIGHT;

    if difficulty == Difficulty::Hard {
        score += (cohesion(state, perspective) - cohesion(state, opponent)) * COHESION_WEIGHT;
    }

    score
}

/// Adjacent same-color pairs, counted from both ends
pub fn cohesion(state: &GameState, player: Player) -> i32 {
    let mut total = 0;
    for (hex, occupant) in state.occupied() {
        if occupant != player {
            continue;
        }
        for dir in 0..6u8 {
            if state.occupant(hex.neighbor(dir)) == Some(player) {
                total += 1;
            }
        }
    }
    total
}

// ============================================================================
// PER-MOVE HEURISTICS
// ============================================================================

/// Per-move weights (applied on top of the quick score)
const FORMATION_WEIGHT: i32 = 3;
const EDGE_ESCAPE_WEIGHT: i32 = 5;
const PUSH_SUPERIORITY_WEIGHT: i32 = 7;
const CENTER_CONTROL_WEIGHT: i32 = 4;
const EDGE_AVOIDANCE_WEIGHT: i32 = 2;
const ADVANCED_STRATEGY_WEIGHT: i32 = 6;

/// Cheap score for a candidate move: center pull, capture bonus, and
/// proximity to the nearest opponent marble
pub fn quick_move_score(state: &GameState, mv: &Move, player: Player) -> i32 {
    let opponent = player.opponent();
    let mut score = -2 * mv.target.distance_to_center() as i32;

    if state.occupant(mv.target) == Some(opponent) {
        score += 50;
    }

    let mut nearest = 10;
    for (hex, occupant) in state.occupied() {
        if occupant == opponent {
            nearest = nearest.min(mv.target.distance_to(hex) as i32);
        }
    }
    score += 3 * (5 - nearest).max(0);

    score
}

/// Full heuristic used by Medium and Hard move selection; Hard adds the
/// advanced-strategy term
pub fn move_score(state: &GameState, mv: &Move, player: Player, difficulty: Difficulty) -> i32 {
    let mut score = quick_move_score(state, mv, player);

    score += FORMATION_WEIGHT * formation(state, mv, player);
    score += EDGE_ESCAPE_WEIGHT * edge_escape(mv);
    score += PUSH_SUPERIORITY_WEIGHT * push_superiority(state, mv, player);
    score += CENTER_CONTROL_WEIGHT * center_control(mv);
    score += EDGE_AVOIDANCE_WEIGHT * edge_avoidance(mv);

    if difficulty == Difficulty::Hard {
        score += ADVANCED_STRATEGY_WEIGHT * advanced_strategy(state, mv, player);
    }

    score
}

fn edge_distance(hex: Hex) -> i8 {
    BOARD_RADIUS - hex.distance_to_center()
}

/// Own marbles adjacent to the destination
fn formation(state: &GameState, mv: &Move, player: Player) -> i32 {
    (0..6u8)
        .filter(|&dir| state.occupant(mv.target.neighbor(dir)) == Some(player))
        .count() as i32
}

/// Reward moving marbles that currently sit in the outermost rings
fn edge_escape(mv: &Move) -> i32 {
    mv.marbles
        .iter()
        .filter(|&&m| edge_distance(m) <= 1)
        .count() as i32
        * 10
}

/// Reward destinations that line up numerical superiority against an
/// adjacent opponent line
fn push_superiority(state: &GameState, mv: &Move, player: Player) -> i32 {
    let opponent = player.opponent();
    let mut bonus = 0;

    for dir in 0..6u8 {
        let ahead = mv.target.neighbor(dir);
        if state.occupant(ahead) != Some(opponent) {
            continue;
        }

        let mut ours = 1;
        let mut behind = mv.target.neighbor(opposite(dir));
        while behind.is_valid() && state.occupant(behind) == Some(player) {
            ours += 1;
            behind = behind.neighbor(opposite(dir));
        }

        let mut theirs = 1;
        let mut forward = ahead.neighbor(dir);
        while forward.is_valid() && state.occupant(forward) == Some(opponent) {
            theirs += 1;
            forward = forward.neighbor(dir);
        }

        if ours > theirs {
            bonus += (ours - theirs) * 15;
        }
    }

    bonus
}

fn center_control(mv: &Move) -> i32 {
    2 * (3 - mv.target.distance_to_center() as i32).max(0)
}

fn edge_avoidance(mv: &Move) -> i32 {
    match edge_distance(mv.target) {
        0 => -20,
        1 => -10,
        _ => 0,
    }
}

/// Hard-only: advance toward the opponent centroid, and favor group moves
fn advanced_strategy(state: &GameState, mv: &Move, player: Player) -> i32 {
    let opponent = player.opponent();
    let mut bonus = 0;

    let mut q_sum = 0i32;
    let mut r_sum = 0i32;
    let mut count = 0i32;
    for (hex, occupant) in state.occupied() {
        if occupant == opponent {
            q_sum += hex.q as i32;
            r_sum += hex.r as i32;
            count += 1;
        }
    }

    if count > 0 {
        let centroid = Hex::new(
            (q_sum as f64 / count as f64).round() as i8,
            (r_sum as f64 / count as f64).round() as i8,
        );
        if mv.target.distance_to(centroid) < mv.marbles[0].distance_to(centroid) {
            bonus += 5;
        }
    }

    if mv.marbles.len() > 1 {
        bonus += 2 * mv.marbles.len() as i32;
    }

    bonus
}

// ============================================================================
// TESTS
// ============================================================================
