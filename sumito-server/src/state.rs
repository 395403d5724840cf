//! Room store: create / join / lookup / expire
//!
//! The relay owns game rooms keyed by a short join code. It forwards
//! validated move messages into the core engine and never carries game
//! logic of its own.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use sumito_core::{GameConfig, GameMode, GameState, Player};

/// Rooms idle longer than this are expired by the sweeper
pub const ROOM_TTL: Duration = Duration::from_secs(2 * 60 * 60);

const ROOM_CODE_LEN: usize = 6;
const PLAYER_ID_LEN: usize = 16;

/// Why a room operation was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomError {
    NotFound,
    Full,
}

/// One game room. The host seat is assigned at creation; in a PvAI room
/// the AI occupies the other seat and no guest can join.
pub struct Room {
    pub code: String,
    pub config: GameConfig,
    pub game: GameState,
    pub host_id: String,
    pub host_color: Player,
    pub guest_id: Option<String>,
    pub last_activity: Instant,
}

impl Room {
    /// Seat color for a player id, if it belongs to this room
    pub fn player_color(&self, player_id: &str) -> Option<Player> {
        if self.host_id == player_id {
            Some(self.host_color)
        } else if self.guest_id.as_deref() == Some(player_id) {
            Some(self.host_color.opponent())
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.config.mode == GameMode::HumanVsAi || self.guest_id.is_some()
    }
}

/// Server-wide shared state
pub struct ServerState {
    rooms: RwLock<HashMap<String, Room>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room and seat the host. The host plays Black in a PvP
    /// room; in a PvAI room the host takes whichever side the AI does not.
    pub fn create_room(&self, config: GameConfig) -> (String, String, Player) {
        let host_id = random_token(PLAYER_ID_LEN);
        let host_color = match config.mode {
            GameMode::HumanVsHuman => Player::Black,
            GameMode::HumanVsAi => config.ai_player.opponent(),
        };

        let mut rooms = self.rooms.write().expect("room lock poisoned");
        let code = loop {
            let candidate = random_token(ROOM_CODE_LEN).to_ascii_uppercase();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        rooms.insert(
            code.clone(),
            Room {
                code: code.clone(),
                config,
                game: GameState::new(),
                host_id: host_id.clone(),
                host_color,
                guest_id: None,
                last_activity: Instant::now(),
            },
        );
        (code, host_id, host_color)
    }

    /// Seat a guest on the free side
    pub fn join_room(&self, code: &str) -> Result<(String, Player), RoomError> {
        let mut rooms = self.rooms.write().expect("room lock poisoned");
        let room = rooms.get_mut(code).ok_or(RoomError::NotFound)?;
        if room.is_full() {
            return Err(RoomError::Full);
        }
        let guest_id = random_token(PLAYER_ID_LEN);
        room.guest_id = Some(guest_id.clone());
        room.last_activity = Instant::now();
        Ok((guest_id, room.host_color.opponent()))
    }

    /// Run `f` against a room, refreshing its activity clock
    pub fn with_room<T>(&self, code: &str, f: impl FnOnce(&mut Room) -> T) -> Result<T, RoomError> {
        let mut rooms = self.rooms.write().expect("room lock poisoned");
        let room = rooms.get_mut(code).ok_or(RoomError::NotFound)?;
        room.last_activity = Instant::now();
        Ok(f(room))
    }

    /// Close a room explicitly (either player leaving ends the game)
    pub fn remove_room(&self, code: &str) -> bool {
        self.rooms
            .write()
            .expect("room lock poisoned")
            .remove(code)
            .is_some()
    }

    /// Drop rooms idle past the TTL; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut rooms = self.rooms.write().expect("room lock poisoned");
        let before = rooms.len();
        rooms.retain(|_, room| room.last_activity.elapsed() < ROOM_TTL);
        let purged = before - rooms.len();
        if purged > 0 {
            tracing::info!("expired {} idle room(s)", purged);
        }
        purged
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().expect("room lock poisoned").len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumito_core::Difficulty;

    fn pvp_config() -> GameConfig {
        GameConfig {
            mode: GameMode::HumanVsHuman,
            ai_player: Player::White,
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn test_create_and_join() {
        let state = ServerState::new();
        let (code, host_id, host_color) = state.create_room(pvp_config());
        assert_eq!(code.len(), ROOM_CODE_LEN);
        assert_eq!(host_color, Player::Black);

        let (guest_id, guest_color) = state.join_room(&code).unwrap();
        assert_eq!(guest_color, Player::White);
        assert_ne!(host_id, guest_id);

        assert_eq!(state.join_room(&code), Err(RoomError::Full));
        assert_eq!(state.join_room("NOPE42"), Err(RoomError::NotFound));
    }

    #[test]
    fn test_ai_room_rejects_guests() {
        let state = ServerState::new();
        let config = GameConfig {
            mode: GameMode::HumanVsAi,
            ..GameConfig::default()
        };
        let (code, _, host_color) = state.create_room(config);
        assert_eq!(host_color, Player::Black);
        assert_eq!(state.join_room(&code), Err(RoomError::Full));
    }

    #[test]
    fn test_player_color_lookup() {
        let state = ServerState::new();
        let (code, host_id, _) = state.create_room(pvp_config());
        let (guest_id, _) = state.join_room(&code).unwrap();
        state
            .with_room(&code, |room| {
                assert_eq!(room.player_color(&host_id), Some(Player::Black));
                assert_eq!(room.player_color(&guest_id), Some(Player::White));
                assert_eq!(room.player_color("stranger"), None);
            })
            .unwrap();
    }

    #[test]
    fn test_remove_room() {
        let state = ServerState::new();
        let (code, _, _) = state.create_room(pvp_config());
        assert_eq!(state.room_count(), 1);
        assert!(state.remove_room(&code));
        assert_eq!(state.room_count(), 0);
        assert!(!state.remove_room(&code));
    }
}
