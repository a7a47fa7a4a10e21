//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Resolving request defaults/limits and generating the next question
//!   - Recomputing the expected result of a submitted question and checking the value

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::domain::{Mode, Question};
use crate::engine::{check_answer, evaluate_question, format_question, generate_question, generate_question_with_terms};
use crate::error::QuizError;
use crate::presets::generate_for_grade;
use crate::protocol::{CheckAnswerIn, CheckAnswerOut, NextQuestionIn, QuestionOut};

/// Apply configured defaults and reject out-of-range bounds.
pub fn resolve_max(cfg: &AppConfig, requested: Option<i64>) -> Result<Option<u32>, QuizError> {
  match requested {
    None => Ok(None),
    Some(m) if m <= 0 => Err(QuizError::InvalidMax(m)),
    Some(m) if m > i64::from(cfg.limits.max_bound) => {
      Err(QuizError::BoundTooLarge { max: m, limit: cfg.limits.max_bound })
    }
    Some(m) => Ok(Some(m as u32)),
  }
}

/// Integral JSON numbers only; `8` and `8.0` both count as 8.
pub fn submitted_integer(value: &serde_json::Value) -> Option<i64> {
  if let Some(v) = value.as_i64() {
    return Some(v);
  }
  let f = value.as_f64()?;
  if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
    Some(f as i64)
  } else {
    None
  }
}

pub fn resolve_mode(cfg: &AppConfig, requested: Option<&str>) -> Result<Mode, QuizError> {
  match requested {
    Some(s) if !s.trim().is_empty() => s.parse(),
    _ => Ok(cfg.defaults.mode),
  }
}

#[instrument(level = "info", skip(cfg, rng))]
pub fn next_question<R: Rng + ?Sized>(cfg: &AppConfig, req: &NextQuestionIn, rng: &mut R) -> Result<QuestionOut, QuizError> {
  let max = resolve_max(cfg, req.max)?;

  let question = match req.grade {
    Some(grade) => {
      if let Some(requested) = req.mode.as_deref().filter(|s| !s.trim().is_empty()) {
        let mode: Mode = requested.parse()?;
        debug!(target: "quiz", grade, %mode, "Grade preset overrides requested mode");
      }
      generate_for_grade(grade, max, req.term_count, rng)?
    }
    None => {
      let mode = resolve_mode(cfg, req.mode.as_deref())?;
      let max = max.unwrap_or(cfg.defaults.max);
      match req.term_count {
        Some(terms) => generate_question_with_terms(mode, max, terms, rng)?,
        None => generate_question(mode, max, rng)?,
      }
    }
  };

  let text = format_question(&question);
  debug!(target: "quiz", %text, terms = question.term_count(), answer = question.answer, "Question generated");
  Ok(QuestionOut { question, text })
}

/// The expected result is recomputed from the operands; nothing the client claims is trusted.
#[instrument(level = "info", skip(body), fields(a = body.a, b = body.b, op = %body.op))]
pub fn check_submitted(body: &CheckAnswerIn) -> Result<CheckAnswerOut, QuizError> {
  let mut question = Question {
    a: body.a,
    b: body.b,
    op: body.op,
    extras: body.extras.clone().filter(|e| !e.is_empty()),
    answer: 0,
    is_inverse: false,
    inverse_side: None,
  };

  let expected = evaluate_question(&question);
  question.answer = u32::try_from(expected)
    .map_err(|_| QuizError::InvalidQuestion(format!("{} evaluates to {expected}", format_question(&question))))?;

  let ok = submitted_integer(&body.value).map_or(false, |v| check_answer(&question, v));
  info!(target: "quiz", %ok, correct_answer = question.answer, "Answer checked");
  Ok(CheckAnswerOut { ok, correct_answer: question.answer })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Extra, Operator};
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use serde_json::json;

  fn check_body(a: u32, b: u32, op: Operator, value: serde_json::Value) -> CheckAnswerIn {
    CheckAnswerIn { a, b, op, extras: None, value }
  }

  #[test]
  fn defaults_apply_when_request_is_empty() {
    let cfg = AppConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
      let out = next_question(&cfg, &NextQuestionIn::default(), &mut rng).unwrap();
      assert!(out.question.extras.is_none());
      if out.question.op != Operator::Mul {
        assert!(out.question.answer <= 20);
      }
      assert_eq!(out.text, format_question(&out.question));
    }
  }

  #[test]
  fn non_positive_or_oversized_max_is_rejected() {
    let cfg = AppConfig::default();
    assert_eq!(resolve_max(&cfg, Some(0)), Err(QuizError::InvalidMax(0)));
    assert_eq!(resolve_max(&cfg, Some(-4)), Err(QuizError::InvalidMax(-4)));
    assert!(matches!(resolve_max(&cfg, Some(1001)), Err(QuizError::BoundTooLarge { .. })));
    assert_eq!(resolve_max(&cfg, Some(1000)), Ok(Some(1000)));
  }

  #[test]
  fn blank_mode_falls_back_and_unknown_mode_errors() {
    let cfg = AppConfig::default();
    assert_eq!(resolve_mode(&cfg, None), Ok(Mode::Mix));
    assert_eq!(resolve_mode(&cfg, Some("  ")), Ok(Mode::Mix));
    assert_eq!(resolve_mode(&cfg, Some("sub-inverse")), Ok(Mode::SubInverse));
    assert!(matches!(resolve_mode(&cfg, Some("div")), Err(QuizError::UnknownMode(_))));
  }

  #[test]
  fn grade_requests_use_presets() {
    let cfg = AppConfig::default();
    let mut rng = StdRng::seed_from_u64(8);
    let req = NextQuestionIn { grade: Some(1), term_count: Some(3), ..Default::default() };
    let out = next_question(&cfg, &req, &mut rng).unwrap();
    assert_eq!(out.question.term_count(), 3);

    let req = NextQuestionIn { grade: Some(12), ..Default::default() };
    assert_eq!(next_question(&cfg, &req, &mut rng).unwrap_err(), QuizError::UnknownGrade(12));
  }

  #[test]
  fn grade_requests_still_validate_mode() {
    let cfg = AppConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    let req = NextQuestionIn { grade: Some(1), mode: Some("divide".into()), ..Default::default() };
    assert_eq!(next_question(&cfg, &req, &mut rng).unwrap_err(), QuizError::UnknownMode("divide".into()));

    let req = NextQuestionIn { grade: Some(1), mode: Some("mul".into()), ..Default::default() };
    let out = next_question(&cfg, &req, &mut rng).unwrap();
    assert_ne!(out.question.op, Operator::Mul);
  }

  #[test]
  fn integral_float_submission_counts() {
    let out = check_submitted(&check_body(5, 3, Operator::Add, json!(8.0))).unwrap();
    assert!(out.ok);
    assert_eq!(submitted_integer(&json!(-2.0)), Some(-2));
    assert_eq!(submitted_integer(&json!(1e300)), None);
  }

  #[test]
  fn check_recomputes_expected_result() {
    let out = check_submitted(&check_body(5, 3, Operator::Add, json!(8))).unwrap();
    assert!(out.ok);
    assert_eq!(out.correct_answer, 8);

    let out = check_submitted(&check_body(6, 7, Operator::Mul, json!(41))).unwrap();
    assert!(!out.ok);
    assert_eq!(out.correct_answer, 42);
  }

  #[test]
  fn check_follows_extras() {
    let mut body = check_body(5, 3, Operator::Add, json!(9));
    body.extras = Some(vec![Extra { op: Operator::Add, value: 2 }, Extra { op: Operator::Sub, value: 1 }]);
    assert!(check_submitted(&body).unwrap().ok);
  }

  #[test]
  fn non_integer_values_are_simply_wrong() {
    for value in [json!("8"), json!(8.5), json!(null), json!([8])] {
      let out = check_submitted(&check_body(5, 3, Operator::Add, value)).unwrap();
      assert!(!out.ok);
      assert_eq!(out.correct_answer, 8);
    }
  }

  #[test]
  fn negative_chain_is_an_invalid_question() {
    let err = check_submitted(&check_body(3, 5, Operator::Sub, json!(-2))).unwrap_err();
    assert!(matches!(err, QuizError::InvalidQuestion(_)));
  }
}
