//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Extra, Operator, Question};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NextQuestion(NextQuestionIn),
    CheckAnswer(CheckAnswerIn),
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Question(QuestionOut),
    AnswerResult(CheckAnswerOut),
    Error { message: String },
}

//
// HTTP request/response DTOs
//

/// Every field optional; the boundary fills in configured defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionIn {
    #[serde(default)]
    pub mode: Option<String>,
    /// Signed so that `0` and negatives reach validation instead of failing to parse.
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub term_count: Option<u8>,
    #[serde(default)]
    pub grade: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionOut {
    pub question: Question,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckAnswerIn {
    pub a: u32,
    pub b: u32,
    pub op: Operator,
    #[serde(default)]
    pub extras: Option<Vec<Extra>>,
    /// Left untyped: anything that is not an integer simply fails the check.
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerOut {
    pub ok: bool,
    pub correct_answer: u32,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
