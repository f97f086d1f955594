//! JSON REST interface over the game authority.

use crate::authority::GameAuthority;
use crate::error::AuthorityError;
use crate::events::Ack;
use crate::identity::{MatchId, PlayerId};
use crate::matches::MatchStatus;
use crate::record::BoardSnapshot;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_shougi::SoldierId;
use tracing::{instrument, warn};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    authority: Arc<GameAuthority>,
}

/// Builds the router for `authority`.
#[instrument(skip(authority))]
pub fn router(authority: Arc<GameAuthority>) -> Router {
    Router::new()
        .route("/matches", get(list_matches))
        .route("/matches/{id}", get(get_board))
        .route("/matches/{id}/status", get(game_status))
        .route("/matches/{id}/propose", post(propose))
        .route("/matches/{id}/accept", post(accept))
        .route("/matches/{id}/moves", post(submit_move))
        .route("/matches/{id}/claim", post(claim))
        .route("/schema", get(schema))
        .with_state(AppState { authority })
}

// ─────────────────────────────────────────────────────────────
//  Request and response bodies
// ─────────────────────────────────────────────────────────────

/// Body of `propose` and `accept`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StakeRequest {
    /// Calling player.
    pub caller: PlayerId,
    /// Deposit offered.
    pub stake: u64,
}

/// Body of a move submission.
///
/// Coordinates are taken as signed integers so that any off-board square,
/// negative ones included, is answered with `InvalidDestination`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MoveRequest {
    /// Calling player.
    pub caller: PlayerId,
    /// Soldier id within the caller's army.
    pub soldier_id: u32,
    /// Destination file.
    pub x: i64,
    /// Destination rank.
    pub y: i64,
}

/// Narrows a requested coordinate to the board's range. Values outside
/// `u8` land on 0 or 255, which no valid rule set puts on the board.
fn coordinate(value: i64) -> u8 {
    value.clamp(0, i64::from(u8::MAX)) as u8
}

/// Body of a claim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClaimRequest {
    /// Calling player.
    pub caller: PlayerId,
}

/// Response of the status route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Numeric status code.
    pub code: u8,
}

/// Error body: `{ "error": "<Variant>", "message": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Variant name.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// A failed request rendered as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// The authority refused the operation.
    Authority(AuthorityError),
    /// The request could not be parsed.
    Rejected {
        /// Status chosen by the extractor.
        status: StatusCode,
        /// Error name for the body.
        error: &'static str,
        /// Extractor message.
        message: String,
    },
    /// The blocking task running the operation did not finish.
    Task(String),
}

impl From<AuthorityError> for ApiError {
    fn from(err: AuthorityError) -> Self {
        Self::Authority(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            error: "InvalidBody",
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            error: "InvalidPath",
            message: rejection.body_text(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

impl ApiError {
    /// HTTP status for the error.
    pub fn status(&self) -> StatusCode {
        let err = match self {
            ApiError::Authority(err) => err,
            ApiError::Rejected { status, .. } => return *status,
            ApiError::Task(_) => return StatusCode::INTERNAL_SERVER_ERROR,
        };
        match err {
            AuthorityError::NoSuchMatch(_) => StatusCode::NOT_FOUND,
            AuthorityError::NotWinner(_) => StatusCode::FORBIDDEN,
            AuthorityError::DuplicateMatch(_)
            | AuthorityError::AlreadyStarted(_)
            | AuthorityError::NotActive(_)
            | AuthorityError::NotYourTurn(_)
            | AuthorityError::NotConcluded(_)
            | AuthorityError::AlreadyClaimed(_) => StatusCode::CONFLICT,
            AuthorityError::StakeMismatch { .. }
            | AuthorityError::ZeroStake
            | AuthorityError::SelfChallenge(_)
            | AuthorityError::NoSuchSoldier(_)
            | AuthorityError::InvalidDestination(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthorityError::InvariantViolation(_) | AuthorityError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Authority(err) => ErrorBody {
                error: err.code().to_string(),
                message: err.to_string(),
            },
            ApiError::Rejected { error, message, .. } => ErrorBody {
                error: error.to_string(),
                message,
            },
            ApiError::Task(message) => ErrorBody {
                error: "Internal".to_string(),
                message,
            },
        };
        if status.is_server_error() {
            warn!(error = %body.message, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

/// Runs `op` on the blocking pool. Authority calls wait on match locks and
/// journal writes.
async fn blocking<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&GameAuthority) -> Result<T, AuthorityError> + Send + 'static,
{
    let authority = Arc::clone(&state.authority);
    let value = tokio::task::spawn_blocking(move || op(&authority)).await??;
    Ok(Json(value))
}

async fn list_matches(State(state): State<AppState>) -> ApiResult<Vec<MatchId>> {
    blocking(&state, |authority| Ok(authority.match_ids())).await
}

async fn get_board(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<BoardSnapshot> {
    let Path(id) = id?;
    blocking(&state, move |authority| authority.get_board(MatchId(id))).await
}

async fn game_status(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusResponse> {
    let Path(id) = id?;
    blocking(&state, move |authority| {
        let status = authority.game_status(MatchId(id))?;
        Ok(StatusResponse {
            status,
            code: status.code(),
        })
    })
    .await
}

async fn propose(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<StakeRequest>, JsonRejection>,
) -> ApiResult<Ack> {
    let Path(id) = id?;
    let Json(body) = body?;
    blocking(&state, move |authority| {
        authority.propose(MatchId(id), body.caller, body.stake)
    })
    .await
}

async fn accept(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<StakeRequest>, JsonRejection>,
) -> ApiResult<Ack> {
    let Path(id) = id?;
    let Json(body) = body?;
    blocking(&state, move |authority| {
        authority.accept(MatchId(id), body.caller, body.stake)
    })
    .await
}

async fn submit_move(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult<Ack> {
    let Path(id) = id?;
    let Json(body) = body?;
    blocking(&state, move |authority| {
        authority.submit_move(
            MatchId(id),
            &body.caller,
            SoldierId(body.soldier_id),
            coordinate(body.x),
            coordinate(body.y),
        )
    })
    .await
}

async fn claim(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> ApiResult<Ack> {
    let Path(id) = id?;
    let Json(body) = body?;
    blocking(&state, move |authority| authority.claim(MatchId(id), &body.caller)).await
}

async fn schema() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "propose": schemars::schema_for!(StakeRequest),
        "accept": schemars::schema_for!(StakeRequest),
        "moves": schemars::schema_for!(MoveRequest),
        "claim": schemars::schema_for!(ClaimRequest),
        "status": schemars::schema_for!(StatusResponse),
    }))
}
