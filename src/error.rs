//! Error taxonomy shared by the engine and the HTTP/WebSocket boundary.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
  #[error("max must be a positive integer, got {0}")]
  InvalidMax(i64),

  #[error("max {max} exceeds the allowed bound {limit}")]
  BoundTooLarge { max: i64, limit: u32 },

  #[error("unknown mode '{0}'")]
  UnknownMode(String),

  #[error("term count must be 2, 3 or 4, got {0}")]
  InvalidTermCount(u8),

  #[error("unknown grade {0}")]
  UnknownGrade(u8),

  #[error("invalid question: {0}")]
  InvalidQuestion(String),

  #[error("question generation gave up after {attempts} attempts")]
  GenerationExhausted { attempts: usize },
}

impl QuizError {
  pub fn status(&self) -> StatusCode {
    match self {
      QuizError::GenerationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      _ => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    let body = serde_json::json!({ "error": self.to_string() });
    (self.status(), Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn configuration_errors_are_client_errors() {
    assert_eq!(QuizError::InvalidMax(0).status(), StatusCode::BAD_REQUEST);
    assert_eq!(QuizError::UnknownMode("div".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(QuizError::InvalidTermCount(7).status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn exhausted_generation_is_a_server_error() {
    let e = QuizError::GenerationExhausted { attempts: 4096 };
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(e.to_string().contains("4096"));
  }
}
