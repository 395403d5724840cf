//! Sumito Core - Game engine and AI
//!
//! This crate provides the core game logic for Sumito:
//! - Board geometry (hex grid with axial coordinates)
//! - Game state, selection rules, and push ("sumito") mechanics
//! - Candidate move generation
//! - Position evaluation with per-move heuristics
//! - Alpha-beta search opponent with three difficulty levels
//! - Game sessions and the relay/snapshot wire types

pub mod ai;
pub mod board;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod session;

// Re-exports for convenient access
pub use ai::{Difficulty, SearchAI};
pub use board::{all_cells, Hex, BOARD_RADIUS, CELL_COUNT, DIRECTIONS};
pub use eval::evaluate;
pub use game::{
    GameSnapshot, GameState, GameStatus, MessageError, MoveMessage, Player, SnapshotError,
    WINNING_SCORE,
};
pub use movegen::{generate_moves, Move};
pub use session::{AiOutcome, GameConfig, GameMode, Session};
