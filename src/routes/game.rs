use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    auth::MaybeSession,
    error::AppError,
    game::{CardPairsGame, Game},
    models::{Card, CardId, Difficulty, GameResult, GameType},
    services::{lock, SharedGame},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateGameQuery {
    #[serde(rename = "type")]
    pub game_type: Option<GameType>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipRequest {
    pub card_id: CardId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPairRequest {
    pub card_id1: CardId,
    pub card_id2: CardId,
}

/// Everything a client needs to render a game
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub difficulty: Difficulty,
    /// Milliseconds the challenge stays visible
    pub memorization_time: u64,
    #[serde(flatten)]
    pub challenge: Challenge,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Challenge {
    Sequence { sequence: Vec<u32> },
    Cards(CardBoard),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBoard {
    pub cards: Vec<Card>,
    pub total_pairs: usize,
    pub moves: u32,
    pub pairs_found: usize,
    pub is_complete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipResponse {
    pub success: bool,
    pub cards: Vec<Card>,
    pub flipped_cards: Vec<CardId>,
    pub moves: u32,
    pub pairs_found: usize,
    pub is_complete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPairResponse {
    pub is_pair: bool,
    pub cards: Vec<Card>,
    pub flipped_cards: Vec<CardId>,
    pub moves: u32,
    pub pairs_found: usize,
    pub is_complete: bool,
    pub score: u32,
    pub message: String,
}

impl CardBoard {
    fn of(game: &CardPairsGame) -> Self {
        Self {
            cards: game.cards().to_vec(),
            total_pairs: game.total_pairs(),
            moves: game.moves(),
            pairs_found: game.pairs_found(),
            is_complete: game.is_game_complete(),
        }
    }
}

impl GameSnapshot {
    fn of(game_id: String, game: &Game) -> Self {
        let challenge = match game.as_cards() {
            Some(cards) => Challenge::Cards(CardBoard::of(cards)),
            None => Challenge::Sequence {
                sequence: game.sequence(),
            },
        };

        Self {
            game_id,
            game_type: game.game_type(),
            difficulty: game.difficulty(),
            memorization_time: game.memorization_time().as_millis() as u64,
            challenge,
        }
    }
}

/// Create a game and return its first snapshot
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateGameQuery>,
) -> Result<(StatusCode, Json<GameSnapshot>), AppError> {
    let game_type = query.game_type.unwrap_or(GameType::Sequence);
    let difficulty = query.difficulty.unwrap_or(Difficulty::Medium);

    let game_id = state.games.create_game(game_type, difficulty);
    let game = state
        .games
        .get_game(&game_id)
        .ok_or_else(|| AppError::Internal("Failed to create game".to_string()))?;

    let snapshot = GameSnapshot::of(game_id, &lock(&game));
    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let game = find_game(&state, &game_id)?;
    let snapshot = GameSnapshot::of(game_id, &lock(&game));
    Ok(Json(snapshot))
}

/// Judge a submitted answer; a logged-in player gets the result on their record
pub async fn check_answer(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    MaybeSession(session): MaybeSession,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<GameResult>, AppError> {
    let game = find_game(&state, &game_id)?;
    let result = lock(&game).check_answer(&payload.answer);

    record_result(&state, session.as_deref(), result.score, result.success);

    Ok(Json(result))
}

pub async fn flip_card(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(payload): Json<FlipRequest>,
) -> Result<Json<FlipResponse>, AppError> {
    let game = find_game(&state, &game_id)?;
    let mut game = lock(&game);
    let cards = card_game(&mut game)?;

    cards.flip_card(payload.card_id)?;
    tracing::debug!("Game {}: flipped card {}", game_id, payload.card_id);

    let (first, second) = cards.flipped_cards();
    let board = CardBoard::of(cards);
    Ok(Json(FlipResponse {
        success: true,
        cards: board.cards,
        flipped_cards: first.into_iter().chain(second).collect(),
        moves: board.moves,
        pairs_found: board.pairs_found,
        is_complete: board.is_complete,
    }))
}

/// Resolve a turn. The flip slots are always cleared afterwards, also when
/// the check is rejected; matched cards stay face up.
pub async fn check_card_pair(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    MaybeSession(session): MaybeSession,
    Json(payload): Json<CheckPairRequest>,
) -> Result<Json<CheckPairResponse>, AppError> {
    let game = find_game(&state, &game_id)?;

    let response = {
        let mut game = lock(&game);
        let cards = card_game(&mut game)?;

        let checked = cards.check_pair(payload.card_id1, payload.card_id2);
        cards.reset_flipped_cards();
        let is_pair = checked?;

        let is_complete = cards.is_game_complete();
        let score = if is_complete {
            cards.check_answer(&[]).score
        } else {
            0
        };

        tracing::debug!(
            "Game {}: cards {} and {} {}",
            game_id,
            payload.card_id1,
            payload.card_id2,
            if is_pair { "match" } else { "differ" }
        );

        let message = if is_complete {
            "All pairs found!"
        } else if is_pair {
            "Pair found!"
        } else {
            "Not a pair, try again"
        };

        let board = CardBoard::of(cards);
        CheckPairResponse {
            is_pair,
            cards: board.cards,
            flipped_cards: Vec::new(),
            moves: board.moves,
            pairs_found: board.pairs_found,
            is_complete,
            score,
            message: message.to_string(),
        }
    };

    if response.is_complete {
        record_result(&state, session.as_deref(), response.score, true);
    }

    Ok(Json(response))
}

pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Json<Value> {
    state.games.remove_game(&game_id);
    Json(json!({ "status": "deleted" }))
}

fn find_game(state: &AppState, game_id: &str) -> Result<SharedGame, AppError> {
    state
        .games
        .get_game(game_id)
        .ok_or_else(|| AppError::game_not_found(game_id))
}

fn card_game(game: &mut Game) -> Result<&mut CardPairsGame, AppError> {
    game.as_cards_mut()
        .ok_or_else(|| AppError::BadRequest("Game is not a card game".to_string()))
}

/// Add a finished game to the session owner's stats. Anonymous players and
/// stale sessions are ignored.
fn record_result(state: &AppState, session: Option<&str>, score: u32, won: bool) {
    let Some(user) = session.and_then(|s| state.users.get_user_by_session(s)) else {
        return;
    };

    if let Err(e) = state.users.update_user_stats(&user.id, score, won) {
        tracing::warn!("Failed to record result for {}: {}", user.id, e);
    }
}
