//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::QuizError;
use crate::logic::{check_submitted, next_question};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_post_question(
  State(state): State<Arc<AppState>>,
  Json(body): Json<NextQuestionIn>,
) -> Result<Json<QuestionOut>, QuizError> {
  let out = next_question(&state.config, &body, &mut rand::thread_rng())?;
  info!(target: "quiz", text = %out.text, "HTTP question served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(body), fields(a = body.a, b = body.b, op = %body.op))]
pub async fn http_post_answer(Json(body): Json<CheckAnswerIn>) -> Result<Json<CheckAnswerOut>, QuizError> {
  let out = check_submitted(&body)?;
  info!(target: "quiz", ok = out.ok, "HTTP answer evaluated");
  Ok(Json(out))
}
