//! Game session: configuration surface and AI turn driving

use crate::ai::{Difficulty, SearchAI};
use crate::board::Hex;
use crate::game::{GameState, MessageError, MoveMessage, Player};
use crate::movegen::Move;
use serde::{Deserialize, Serialize};

/// Who sits across the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    HumanVsHuman,
    HumanVsAi,
}

/// Recognized configuration options: mode, AI side, difficulty
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub ai_player: Player,
    pub difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::HumanVsAi,
            ai_player: Player::White,
            difficulty: Difficulty::Medium,
        }
    }
}

/// Result of asking the session to run the AI's turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiOutcome {
    /// The AI picked and applied this move
    Moved(Move),
    /// The AI had no legal move; the stalled player forfeits
    Forfeited(Player),
    /// It is not the AI's turn (or not an AI game)
    NotAiTurn,
}

/// A single game plus its configuration. Human input is ignored while the
/// AI is to move; after each successful human move the caller asks for
/// the AI's reply exactly once via [`Session::ai_move`].
pub struct Session {
    game: GameState,
    config: GameConfig,
    ai: SearchAI,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            game: GameState::new(),
            config,
            ai: SearchAI::new(config.difficulty),
        }
    }

    /// Fixed AI seed, for reproducible games and tests
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            game: GameState::new(),
            config,
            ai: SearchAI::with_seed(config.difficulty, seed),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_ai_turn(&self) -> bool {
        self.config.mode == GameMode::HumanVsAi
            && self.game.to_move() == Some(self.config.ai_player)
    }

    /// Human select/toggle; rejected while the AI is to move
    pub fn select(&mut self, hex: Hex) -> bool {
        if self.is_ai_turn() {
            return false;
        }
        self.game.select_or_toggle(hex)
    }

    pub fn clear_selection(&mut self) {
        self.game.clear_selection();
    }

    /// Human move; rejected while the AI is to move
    pub fn try_move(&mut self, target: Hex) -> bool {
        if self.is_ai_turn() {
            return false;
        }
        self.game.try_move(target)
    }

    /// Relayed move; the core validates the acting player
    pub fn apply_message(&mut self, message: &MoveMessage) -> Result<(), MessageError> {
        self.game.apply_message(message)
    }

    /// Run the AI's turn: one search, one applied move. A stalled AI
    /// (no candidates) forfeits.
    pub fn ai_move(&mut self) -> AiOutcome {
        if !self.is_ai_turn() {
            return AiOutcome::NotAiTurn;
        }
        match self.ai.best_move(&self.game) {
            Some(mv) => {
                let applied = self.game.play(&mv.marbles, mv.target);
                debug_assert!(applied, "search returned an unplayable move");
                AiOutcome::Moved(mv)
            }
            None => {
                let stalled = self.config.ai_player;
                self.game.forfeit(stalled);
                AiOutcome::Forfeited(stalled)
            }
        }
    }

    /// Apply the stall policy to `player`: no legal moves loses
    pub fn forfeit(&mut self, player: Player) {
        self.game.forfeit(player);
    }

    /// New game, same configuration
    pub fn reset(&mut self) {
        self.game.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    fn ai_game(difficulty: Difficulty) -> Session {
        Session::with_seed(
            GameConfig {
                mode: GameMode::HumanVsAi,
                ai_player: Player::White,
                difficulty,
            },
            11,
        )
    }

    #[test]
    fn test_human_then_ai_reply() {
        let mut session = ai_game(Difficulty::Easy);
        assert_eq!(session.ai_move(), AiOutcome::NotAiTurn);

        assert!(session.select(Hex::new(-2, 0)));
        assert!(session.try_move(Hex::new(-3, 1)));
        assert!(session.is_ai_turn());

        // Human input is ignored until the AI reply is applied
        assert!(!session.select(Hex::new(0, 2)));

        match session.ai_move() {
            AiOutcome::Moved(_) => {}
            other => panic!("expected an AI move, got {:?}", other),
        }
        assert_eq!(session.game().to_move(), Some(Player::Black));
    }

    #[test]
    fn test_pvp_has_no_ai_turn() {
        let mut session = Session::with_seed(
            GameConfig {
                mode: GameMode::HumanVsHuman,
                ai_player: Player::White,
                difficulty: Difficulty::Medium,
            },
            11,
        );
        assert!(session.select(Hex::new(-2, 0)));
        assert!(session.try_move(Hex::new(-3, 1)));
        assert!(!session.is_ai_turn());
        assert_eq!(session.ai_move(), AiOutcome::NotAiTurn);
        // White is a human here
        assert!(session.select(Hex::new(2, 0)));
    }

    #[test]
    fn test_stalled_ai_forfeits() {
        let mut session = ai_game(Difficulty::Medium);
        // Rebuild the board so White has a single boxed-in marble:
        // (4,0) walled in by black on every on-board neighbor
        let black = [Hex::new(3, 0), Hex::new(3, 1), Hex::new(4, -1)];
        let white = [Hex::new(4, 0)];
        session.game = GameState::with_position(&black, &white, Player::White);
        assert_eq!(session.ai_move(), AiOutcome::Forfeited(Player::White));
        assert_eq!(session.game().status(), GameStatus::Won(Player::Black));
    }

    #[test]
    fn test_reset_restores_opening() {
        let mut session = ai_game(Difficulty::Easy);
        assert!(session.select(Hex::new(-2, 0)));
        assert!(session.try_move(Hex::new(-3, 1)));
        session.reset();
        assert_eq!(session.game().to_move(), Some(Player::Black));
        assert_eq!(session.game().marble_count(Player::Black), 14);
    }
}
