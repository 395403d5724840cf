//! Game state, selection rules, and move execution

use crate::board::{all_cells, opposite, Hex, DIRECTIONS, GRID_SLOTS};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Marbles a player must push off the board to win
pub const WINNING_SCORE: u8 = 6;

/// Marbles per player in the opening position
pub const MARBLES_PER_PLAYER: usize = 14;

/// Opening position, one edge of the board (the other side mirrors it)
const BLACK_START: [Hex; MARBLES_PER_PLAYER] = [
    Hex::new(-4, 0),
    Hex::new(-3, -1),
    Hex::new(-2, -2),
    Hex::new(-1, -3),
    Hex::new(0, -4),
    Hex::new(-4, 1),
    Hex::new(-3, 0),
    Hex::new(-2, -1),
    Hex::new(-1, -2),
    Hex::new(0, -3),
    Hex::new(1, -4),
    Hex::new(-2, 0),
    Hex::new(-1, -1),
    Hex::new(0, -2),
];

const WHITE_START: [Hex; MARBLES_PER_PLAYER] = [
    Hex::new(4, 0),
    Hex::new(3, 1),
    Hex::new(2, 2),
    Hex::new(1, 3),
    Hex::new(0, 4),
    Hex::new(4, -1),
    Hex::new(3, 0),
    Hex::new(2, 1),
    Hex::new(1, 2),
    Hex::new(0, 3),
    Hex::new(-1, 4),
    Hex::new(2, 0),
    Hex::new(1, 1),
    Hex::new(0, 2),
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black = 0,
    White = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Turn owner or final result; transitions only through move execution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    ToMove(Player),
    Won(Player),
}

/// A move message as relayed between peers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMessage {
    pub player: Player,
    pub marbles: Vec<Hex>,
    pub target: Hex,
}

/// Rejection reasons for relayed move messages
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("game is already over")]
    GameOver,
    #[error("message is not from the player to move")]
    NotYourTurn,
    #[error("selection was rejected")]
    SelectionRejected,
    #[error("target is not a legal destination")]
    IllegalTarget,
}

/// Serializable game snapshot (occupancy, scores, status); selection state
/// is transient and not part of it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub marbles: Vec<(Hex, Player)>,
    pub scores: [u8; 2],
    pub status: GameStatus,
}

/// Rejection reasons for snapshot restore
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("coordinate ({0}, {1}) is not a valid cell")]
    InvalidCell(i8, i8),
    #[error("coordinate ({0}, {1}) appears twice")]
    DuplicateCell(i8, i8),
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full game state. Cloning yields an independent copy; search relies on
/// this, so the occupancy lives in a fixed-size array rather than behind
/// any shared pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Occupancy, indexed by linearized coordinate; invalid slots stay None
    cells: [Option<Player>; GRID_SLOTS],

    /// Opposing marbles each player has pushed off the board
    scores: [u8; 2],

    /// Turn owner or result
    status: GameStatus,

    /// Current selection (0-3 own marbles, collinear when 2+)
    selection: Vec<Hex>,

    /// Destination -> direction for the current selection
    legal_moves: FxHashMap<Hex, u8>,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening position, Black to move
    pub fn new() -> Self {
        Self::with_position(&BLACK_START, &WHITE_START, Player::Black)
    }

    /// Arbitrary position; off-board coordinates are ignored
    pub fn with_position(black: &[Hex], white: &[Hex], to_move: Player) -> Self {
        let mut state = Self {
            cells: [None; GRID_SLOTS],
            scores: [0; 2],
            status: GameStatus::ToMove(to_move),
            selection: Vec::new(),
            legal_moves: FxHashMap::default(),
        };
        for &hex in black {
            debug_assert!(hex.is_valid());
            if hex.is_valid() {
                state.cells[hex.index()] = Some(Player::Black);
            }
        }
        for &hex in white {
            debug_assert!(hex.is_valid());
            if hex.is_valid() {
                state.cells[hex.index()] = Some(Player::White);
            }
        }
        state
    }

    /// Reinitialize for a new game / rematch
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Player to move, None once the game is won
    pub fn to_move(&self) -> Option<Player> {
        match self.status {
            GameStatus::ToMove(player) => Some(player),
            GameStatus::Won(_) => None,
        }
    }

    pub fn score(&self, player: Player) -> u8 {
        self.scores[player.index()]
    }

    /// Occupant of a cell, None when empty or off the board
    pub fn occupant(&self, hex: Hex) -> Option<Player> {
        if hex.is_valid() {
            self.cells[hex.index()]
        } else {
            None
        }
    }

    /// Iterate occupied cells in sorted (q, r) order
    pub fn occupied(&self) -> impl Iterator<Item = (Hex, Player)> + '_ {
        all_cells().filter_map(|hex| self.cells[hex.index()].map(|player| (hex, player)))
    }

    pub fn marble_count(&self, player: Player) -> usize {
        self.occupied().filter(|&(_, p)| p == player).count()
    }

    pub fn selection(&self) -> &[Hex] {
        &self.selection
    }

    /// Destination -> direction table for the current selection
    pub fn legal_moves(&self) -> &FxHashMap<Hex, u8> {
        &self.legal_moves
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Select a marble, or deselect it if already selected. Fails without
    /// mutation unless the cell holds the mover's marble and the resulting
    /// selection stays a straight run of at most three.
    pub fn select_or_toggle(&mut self, hex: Hex) -> bool {
        let Some(mover) = self.to_move() else {
            return false;
        };
        if self.occupant(hex) != Some(mover) {
            return false;
        }

        if let Some(pos) = self.selection.iter().position(|&m| m == hex) {
            self.selection.remove(pos);
            self.compute_legal_moves();
            return true;
        }

        if self.selection.len() >= 3 {
            return false;
        }

        self.selection.push(hex);
        if self.selection.len() >= 2 && straight_run_direction(&self.selection).is_none() {
            self.selection.pop();
            return false;
        }

        self.compute_legal_moves();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.legal_moves.clear();
    }

    // ========================================================================
    // LEGAL MOVES
    // ========================================================================

    fn compute_legal_moves(&mut self) {
        self.legal_moves.clear();

        let Some(mover) = self.to_move() else {
            return;
        };

        match self.selection.len() {
            0 => {}
            1 => {
                // Single marble: any adjacent empty cell
                let marble = self.selection[0];
                for dir in 0..6u8 {
                    let target = marble.neighbor(dir);
                    if target.is_valid() && self.occupant(target).is_none() {
                        self.legal_moves.insert(target, dir);
                    }
                }
            }
            _ => {
                // Toggling off the middle of a 3-run can leave a gapped
                // pair; such a selection simply has no moves
                let Some(line) = straight_run_direction(&self.selection) else {
                    return;
                };
                for dir in 0..6u8 {
                    let target = if dir == line || dir == opposite(line) {
                        self.inline_target(dir, mover)
                    } else {
                        self.broadside_target(dir)
                    };
                    if let Some(target) = target {
                        self.legal_moves.insert(target, dir);
                    }
                }
            }
        }
    }

    /// In-line destination in `dir`, if the move is legal: the cell ahead
    /// of the lead marble, which must be on the board and either empty or
    /// the head of a pushable opponent line
    fn inline_target(&self, dir: u8, mover: Player) -> Option<Hex> {
        let lead = self.lead_marble(dir);
        let target = lead.neighbor(dir);
        if !target.is_valid() {
            return None;
        }
        match self.occupant(target) {
            None => Some(target),
            Some(occupant) if occupant == mover => None,
            Some(_) => self.can_push(dir, mover).then_some(target),
        }
    }

    /// Broadside destination in `dir`, if every selected marble's neighbor
    /// is an empty cell; the first selected marble's neighbor stands in as
    /// the destination key
    fn broadside_target(&self, dir: u8) -> Option<Hex> {
        for &marble in &self.selection {
            let step = marble.neighbor(dir);
            if !step.is_valid() || self.occupant(step).is_some() {
                return None;
            }
        }
        Some(self.selection[0].neighbor(dir))
    }

    /// Selection member furthest along `dir` (maximum projection onto the
    /// direction vector)
    fn lead_marble(&self, dir: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[dir as usize % 6];
        let mut lead = self.selection[0];
        for &marble in &self.selection {
            let diff = marble.sub(lead);
            if diff.q as i32 * dq as i32 + diff.r as i32 * dr as i32 > 0 {
                lead = marble;
            }
        }
        lead
    }

    /// Sumito check: walk the opponent line ahead of the lead marble.
    /// Pushable iff attackers outnumber defenders and the cell beyond the
    /// line is empty or off the board.
    fn can_push(&self, dir: u8, mover: Player) -> bool {
        let attackers = self.selection.len();
        let opponent = mover.opponent();

        let mut defenders = 0;
        let mut current = self.lead_marble(dir).neighbor(dir);
        while current.is_valid() && self.occupant(current) == Some(opponent) {
            defenders += 1;
            current = current.neighbor(dir);
        }

        if attackers <= defenders {
            return false;
        }
        !current.is_valid() || self.occupant(current).is_none()
    }

    // ========================================================================
    // MOVE EXECUTION
    // ========================================================================

    /// Apply the move the current selection implies for `target`. Fails
    /// without mutation unless `target` is in the legal-move table. On
    /// success the selection is cleared, scores and win status are
    /// updated, and the turn switches unless the game just ended.
    pub fn try_move(&mut self, target: Hex) -> bool {
        let Some(&dir) = self.legal_moves.get(&target) else {
            return false;
        };
        let Some(mover) = self.to_move() else {
            debug_assert!(false, "legal moves exist only while the game is live");
            return false;
        };

        if self.selection.len() == 1 {
            let marble = self.selection[0];
            self.set(marble, None);
            self.set(target, Some(mover));
        } else {
            let Some(line) = straight_run_direction(&self.selection) else {
                debug_assert!(false, "multi-marble selection must form a line");
                return false;
            };
            if dir == line || dir == opposite(line) {
                self.execute_inline(dir, mover);
            } else {
                self.execute_broadside(dir, mover);
            }
        }

        self.clear_selection();

        // Win check pre-empts the turn switch
        if self.scores[Player::Black.index()] >= WINNING_SCORE {
            self.status = GameStatus::Won(Player::Black);
        } else if self.scores[Player::White.index()] >= WINNING_SCORE {
            self.status = GameStatus::Won(Player::White);
        } else {
            self.status = GameStatus::ToMove(mover.opponent());
        }

        true
    }

    /// End the game in the opponent's favor (stall/forfeit policy)
    pub fn forfeit(&mut self, player: Player) {
        self.clear_selection();
        self.status = GameStatus::Won(player.opponent());
    }

    fn set(&mut self, hex: Hex, value: Option<Player>) {
        debug_assert!(hex.is_valid());
        self.cells[hex.index()] = value;
    }

    /// Shift the selected line one step along `dir`, pushing any opponent
    /// line ahead of it first
    fn execute_inline(&mut self, dir: u8, mover: Player) {
        let (dq, dr) = DIRECTIONS[dir as usize % 6];
        let mut sorted = self.selection.clone();
        // Front to back, so each marble steps into a vacated cell
        sorted.sort_by_key(|m| -(m.q as i32 * dq as i32 + m.r as i32 * dr as i32));

        let lead = sorted[0];
        let ahead = lead.neighbor(dir);
        if self.occupant(ahead) == Some(mover.opponent()) {
            self.push_marbles(lead, dir, mover);
        }

        for marble in sorted {
            self.set(marble, None);
            self.set(marble.neighbor(dir), Some(mover));
        }
    }

    /// Relocate the opponent line ahead of `lead` one step, back to front;
    /// marbles leaving the board score for the mover
    fn push_marbles(&mut self, lead: Hex, dir: u8, mover: Player) {
        let opponent = mover.opponent();

        let mut run = Vec::new();
        let mut current = lead.neighbor(dir);
        while current.is_valid() && self.occupant(current) == Some(opponent) {
            run.push(current);
            current = current.neighbor(dir);
        }

        for &marble in run.iter().rev() {
            let dest = marble.neighbor(dir);
            self.set(marble, None);
            if dest.is_valid() {
                self.set(dest, Some(opponent));
            } else {
                self.scores[mover.index()] += 1;
            }
        }
    }

    /// Translate all selected marbles sideways; targets were pre-verified
    /// empty, so vacate everything before occupying anything
    fn execute_broadside(&mut self, dir: u8, mover: Player) {
        let marbles = self.selection.clone();
        for &marble in &marbles {
            self.set(marble, None);
        }
        for &marble in &marbles {
            self.set(marble.neighbor(dir), Some(mover));
        }
    }

    // ========================================================================
    // COMPOSITE MOVES (AI / relay)
    // ========================================================================

    /// Select `marbles` and move to `target` in one step. Any failure
    /// leaves the board unmutated with an empty selection.
    pub fn play(&mut self, marbles: &[Hex], target: Hex) -> bool {
        self.clear_selection();
        for &marble in marbles {
            if !self.select_or_toggle(marble) {
                self.clear_selection();
                return false;
            }
        }
        if self.try_move(target) {
            true
        } else {
            self.clear_selection();
            false
        }
    }

    /// Validate and apply a relayed move message. The acting player must
    /// match the player to move; replaying the same message sequence on
    /// any peer produces an identical board.
    pub fn apply_message(&mut self, message: &MoveMessage) -> Result<(), MessageError> {
        let mover = match self.status {
            GameStatus::ToMove(player) => player,
            GameStatus::Won(_) => return Err(MessageError::GameOver),
        };
        if message.player != mover {
            return Err(MessageError::NotYourTurn);
        }

        self.clear_selection();
        for &marble in &message.marbles {
            if !self.select_or_toggle(marble) {
                self.clear_selection();
                return Err(MessageError::SelectionRejected);
            }
        }
        if !self.try_move(message.target) {
            self.clear_selection();
            return Err(MessageError::IllegalTarget);
        }
        Ok(())
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            marbles: self.occupied().collect(),
            scores: self.scores,
            status: self.status,
        }
    }

    pub fn restore(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        let mut cells = [None; GRID_SLOTS];
        for &(hex, player) in &snapshot.marbles {
            if !hex.is_valid() {
                return Err(SnapshotError::InvalidCell(hex.q, hex.r));
            }
            if cells[hex.index()].is_some() {
                return Err(SnapshotError::DuplicateCell(hex.q, hex.r));
            }
            cells[hex.index()] = Some(player);
        }
        Ok(Self {
            cells,
            scores: snapshot.scores,
            status: snapshot.status,
            selection: Vec::new(),
            legal_moves: FxHashMap::default(),
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// LINE GEOMETRY
// ============================================================================

/// Direction along which `marbles` form a contiguous straight run, if any.
/// Insensitive to ordering; two marbles must be adjacent, three must form
/// a gap-free line.
pub fn straight_run_direction(marbles: &[Hex]) -> Option<u8> {
    if marbles.len() < 2 {
        return None;
    }
    let mut sorted = marbles.to_vec();
    sorted.sort();
    (0..6u8).find(|&dir| {
        sorted
            .windows(2)
            .all(|pair| pair[0].neighbor(dir) == pair[1])
    })
}

// ============================================================================
// TESTS
// ============================================================================
