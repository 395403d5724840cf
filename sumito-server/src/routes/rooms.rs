//! Room relay routes
//!
//! The relay forwards opaque move messages between peers; the core
//! validates the acting player and the move itself. In PvAI rooms the
//! AI reply runs on the blocking pool against a private copy of the
//! board, then is applied back through the same message path.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sumito_core::{
    Difficulty, GameConfig, GameMode, GameSnapshot, GameStatus, Hex, MoveMessage, Player,
    SearchAI,
};

use super::ApiError;
use crate::state::ServerState;

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CreateRoomRequest {
    pub mode: GameMode,
    pub ai_player: Player,
    pub difficulty: Difficulty,
}

impl Default for CreateRoomRequest {
    fn default() -> Self {
        Self {
            mode: GameMode::HumanVsHuman,
            ai_player: Player::White,
            difficulty: Difficulty::Medium,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub room_code: String,
    pub player_id: String,
    pub color: Player,
}

#[derive(Debug, Serialize)]
pub struct ScoreView {
    pub black: u8,
    pub white: u8,
}

/// Everything a peer (or a late joiner) needs to render the room
#[derive(Debug, Serialize)]
pub struct RoomView {
    pub room_code: String,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub to_move: Option<Player>,
    pub status: GameStatus,
    pub scores: ScoreView,
    pub snapshot: GameSnapshot,
    pub guest_joined: bool,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub player_id: String,
    pub marbles: Vec<Hex>,
    pub target: Hex,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub applied: MoveMessage,
    /// The AI's reply, when this is a PvAI room and the game goes on
    pub ai_reply: Option<MoveMessage>,
    pub room: RoomView,
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn create_room(
    State(state): State<Arc<ServerState>>,
    request: Option<Json<CreateRoomRequest>>,
) -> Result<Json<SeatResponse>, ApiError> {
    // Sweep opportunistically, like the reference relay did on a timer
    state.purge_expired();

    let request = request.map(|Json(r)| r).unwrap_or_default();
    let config = GameConfig {
        mode: request.mode,
        ai_player: request.ai_player,
        difficulty: request.difficulty,
    };

    let (room_code, player_id, color) = state.create_room(config);
    tracing::info!("room {} created ({:?})", room_code, config.mode);

    // If the AI owns the opening move, play it before the host looks
    drive_ai(&state, &room_code).await?;

    Ok(Json(SeatResponse {
        room_code,
        player_id,
        color,
    }))
}

pub async fn join_room(
    State(state): State<Arc<ServerState>>,
    Path(code): Path<String>,
) -> Result<Json<SeatResponse>, ApiError> {
    let (player_id, color) = state.join_room(&code)?;
    tracing::info!("guest joined room {}", code);
    Ok(Json(SeatResponse {
        room_code: code,
        player_id,
        color,
    }))
}

pub async fn get_room(
    State(state): State<Arc<ServerState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomView>, ApiError> {
    let view = room_view(&state, &code)?;
    Ok(Json(view))
}

pub async fn close_room(
    State(state): State<Arc<ServerState>>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.remove_room(&code) {
        tracing::info!("room {} closed", code);
        Ok(Json(serde_json::json!({ "closed": true })))
    } else {
        Err(crate::state::RoomError::NotFound.into())
    }
}

pub async fn post_move(
    State(state): State<Arc<ServerState>>,
    Path(code): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let applied = state.with_room(&code, |room| {
        let color = room
            .player_color(&request.player_id)
            .ok_or_else(|| ApiError::forbidden("player id does not belong to this room"))?;
        let message = MoveMessage {
            player: color,
            marbles: request.marbles.clone(),
            target: request.target,
        };
        room.game.apply_message(&message)?;
        Ok::<_, ApiError>(message)
    })??;

    let ai_reply = drive_ai(&state, &code).await?;
    let room = room_view(&state, &code)?;

    Ok(Json(MoveResponse {
        applied,
        ai_reply,
        room,
    }))
}

// ============================================================================
// HELPERS
// ============================================================================

fn room_view(state: &Arc<ServerState>, code: &str) -> Result<RoomView, ApiError> {
    let view = state.with_room(code, |room| RoomView {
        room_code: room.code.clone(),
        mode: room.config.mode,
        difficulty: room.config.difficulty,
        to_move: room.game.to_move(),
        status: room.game.status(),
        scores: ScoreView {
            black: room.game.score(Player::Black),
            white: room.game.score(Player::White),
        },
        snapshot: room.game.snapshot(),
        guest_joined: room.guest_id.is_some(),
    })?;
    Ok(view)
}

/// Post-move hook: when the room's AI is to move, run exactly one search
/// on a private copy of the board, then apply the result through the
/// regular message path. A stalled AI forfeits.
async fn drive_ai(
    state: &Arc<ServerState>,
    code: &str,
) -> Result<Option<MoveMessage>, ApiError> {
    let pending = state.with_room(code, |room| {
        if room.config.mode == GameMode::HumanVsAi
            && room.game.to_move() == Some(room.config.ai_player)
        {
            Some((room.game.clone(), room.config))
        } else {
            None
        }
    })?;

    let Some((board, config)) = pending else {
        return Ok(None);
    };

    let chosen = tokio::task::spawn_blocking(move || {
        SearchAI::new(config.difficulty).best_move(&board)
    })
    .await
    .map_err(|_| ApiError::internal("search task failed"))?;

    let reply = state.with_room(code, |room| -> Result<Option<MoveMessage>, ApiError> {
        // The seat cannot have changed hands, but re-check the turn so a
        // stale search result is dropped instead of misapplied
        if room.game.to_move() != Some(room.config.ai_player) {
            return Ok(None);
        }
        match chosen {
            Some(mv) => {
                let message = MoveMessage {
                    player: room.config.ai_player,
                    marbles: mv.marbles,
                    target: mv.target,
                };
                room.game.apply_message(&message)?;
                Ok(Some(message))
            }
            None => {
                tracing::info!("room {}: AI has no moves, forfeiting", room.code);
                room.game.forfeit(room.config.ai_player);
                Ok(None)
            }
        }
    })??;

    Ok(reply)
}
