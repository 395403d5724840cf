//! Search-based opponent: heuristic move selection and alpha-beta minimax

use crate::eval::{evaluate, move_score, quick_move_score};
use crate::game::{GameState, GameStatus, Player};
use crate::movegen::{generate_moves, Move};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Opponent strength; fixes search depth, move budget, and how much
/// randomness enters move selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn search_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn move_budget(self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Jitter ranges applied to heuristic scores (+-)
const EASY_JITTER: i32 = 15;
const MEDIUM_JITTER: i32 = 2;

// ============================================================================
// SEARCH AI
// ============================================================================

/// Artificial opponent. Easy picks half its moves at random and ranks the
/// rest by the quick heuristic; Medium ranks by the full heuristic with a
/// small jitter; Hard is deterministic and backs the heuristic ordering
/// with full alpha-beta look-ahead.
pub struct SearchAI {
    pub difficulty: Difficulty,
    rng: ChaCha8Rng,
    abort: Option<Arc<AtomicBool>>,
}

impl SearchAI {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::from_entropy(),
            abort: None,
        }
    }

    /// Fixed RNG seed, for reproducible games and tests
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
            abort: None,
        }
    }

    /// Install a cooperative cancellation flag, checked between recursive
    /// search calls; an aborted search returns the best move found so far
    pub fn with_abort(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    fn aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Pick a move for the player to move, or None when no candidate
    /// exists (the caller decides what a stalled player means)
    pub fn best_move(&mut self, state: &GameState) -> Option<Move> {
        let player = state.to_move()?;
        let moves = generate_moves(state, player, self.difficulty.move_budget());
        if moves.is_empty() {
            return None;
        }

        match self.difficulty {
            Difficulty::Easy => Some(self.pick_easy(state, moves)),
            Difficulty::Medium => Some(self.pick_medium(state, moves)),
            Difficulty::Hard => Some(self.pick_hard(state, moves)),
        }
    }

    /// 50% uniformly random, otherwise quick heuristic with a large jitter
    fn pick_easy(&mut self, state: &GameState, mut moves: Vec<Move>) -> Move {
        let player = state.to_move().expect("caller checked");

        if self.rng.gen_bool(0.5) {
            let index = self.rng.gen_range(0..moves.len());
            return moves.swap_remove(index);
        }

        let mut best = 0;
        let mut best_score = i32::MIN;
        for (index, mv) in moves.iter().enumerate() {
            let score = quick_move_score(state, mv, player)
                + self.rng.gen_range(-EASY_JITTER..=EASY_JITTER);
            if score > best_score {
                best_score = score;
                best = index;
            }
        }
        moves.swap_remove(best)
    }

    /// Full heuristic with a small jitter
    fn pick_medium(&mut self, state: &GameState, mut moves: Vec<Move>) -> Move {
        let player = state.to_move().expect("caller checked");

        let mut best = 0;
        let mut best_score = i32::MIN;
        for (index, mv) in moves.iter().enumerate() {
            let score = move_score(state, mv, player, self.difficulty)
                + self.rng.gen_range(-MEDIUM_JITTER..=MEDIUM_JITTER);
            if score > best_score {
                best_score = score;
                best = index;
            }
        }
        moves.swap_remove(best)
    }

    /// Deterministic: heuristic ordering (advanced-strategy terms
    /// included) feeding full-depth alpha-beta. Strict comparison keeps
    /// the first candidate on ties, so the generator's coordinate order is
    /// the tie-break.
    fn pick_hard(&mut self, state: &GameState, mut moves: Vec<Move>) -> Move {
        let player = state.to_move().expect("caller checked");
        let depth = self.difficulty.search_depth() as i32;

        moves.sort_by_key(|mv| Reverse(move_score(state, mv, player, self.difficulty)));

        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut chosen: Option<(Move, i32)> = None;

        for mv in moves {
            if chosen.is_some() && self.aborted() {
                break;
            }
            let mut child = state.clone();
            if !child.play(&mv.marbles, mv.target) {
                debug_assert!(false, "generated moves must apply");
                continue;
            }
            let score = self.minimax(&child, depth - 1, alpha, beta, false, player);
            if chosen.as_ref().map_or(true, |&(_, best)| score > best) {
                chosen = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        chosen.expect("moves is non-empty").0
    }

    /// Alpha-beta minimax from `perspective`'s point of view; maximizing
    /// on even plies, minimizing on odd. Every child node runs on its own
    /// full copy of the board, so sibling branches cannot contaminate
    /// each other.
    fn minimax(
        &self,
        state: &GameState,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        perspective: Player,
    ) -> i32 {
        if depth <= 0 || matches!(state.status(), GameStatus::Won(_)) || self.aborted() {
            return evaluate(state, perspective, self.difficulty);
        }

        let mover = state.to_move().expect("non-terminal state has a mover");
        let mut moves = generate_moves(state, mover, self.difficulty.move_budget());
        if moves.is_empty() {
            return evaluate(state, perspective, self.difficulty);
        }
        moves.sort_by_key(|mv| Reverse(quick_move_score(state, mv, mover)));

        if maximizing {
            let mut best = i32::MIN;
            for mv in &moves {
                let mut child = state.clone();
                if !child.play(&mv.marbles, mv.target) {
                    debug_assert!(false, "generated moves must apply");
                    continue;
                }
                let score = self.minimax(&child, depth - 1, alpha, beta, false, perspective);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in &moves {
                let mut child = state.clone();
                if !child.play(&mv.marbles, mv.target) {
                    debug_assert!(false, "generated moves must apply");
                    continue;
                }
                let score = self.minimax(&child, depth - 1, alpha, beta, true, perspective);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
