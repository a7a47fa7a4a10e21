//! Question generation and answer evaluation.
//!
//! Flow:
//! 1) A mode (or an explicit operator) picks the primary operator.
//! 2) The first pair of operands is drawn under that operator's policy.
//! 3) Extra terms are appended while the running total stays admissible.
//! 4) Inverse variants hide one operand of the first step and key `answer` to it.
//!
//! Every generator takes the random source as an argument so callers control seeding.

use std::fmt::Write as _;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Extra, InverseSide, Mode, Operator, Question};
use crate::error::QuizError;

/// Cap for the addition rejection loop.
pub const MAX_DRAW_ATTEMPTS: usize = 4096;

/// Largest `max` the engine accepts. Keeps every product inside `u32`.
pub const MAX_SUPPORTED_BOUND: u32 = 100_000;

const MIX_OPERATORS: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];
const ADD_SUB_OPERATORS: [Operator; 2] = [Operator::Add, Operator::Sub];

pub fn pick_operator<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Operator {
  match mode {
    Mode::Add | Mode::AddInverse => Operator::Add,
    Mode::Sub | Mode::SubInverse => Operator::Sub,
    Mode::Mul => Operator::Mul,
    Mode::Mix => *MIX_OPERATORS.choose(rng).unwrap_or(&Operator::Add),
    Mode::AddSubMix => *ADD_SUB_OPERATORS.choose(rng).unwrap_or(&Operator::Add),
  }
}

/// Per-operand bound for multiplication: `max(10, max / 2)`.
pub fn multiplication_bound(max: u32) -> u32 {
  (max / 2).max(10)
}

/// Two-term question for `mode`.
pub fn generate_question<R: Rng + ?Sized>(mode: Mode, max: u32, rng: &mut R) -> Result<Question, QuizError> {
  generate_question_with_terms(mode, max, 2, rng)
}

/// Question for `mode` with `term_count` terms (2, 3 or 4).
pub fn generate_question_with_terms<R: Rng + ?Sized>(
  mode: Mode,
  max: u32,
  term_count: u8,
  rng: &mut R,
) -> Result<Question, QuizError> {
  match mode {
    Mode::AddInverse => generate_inverse_question(max, term_count, rng),
    Mode::SubInverse => generate_subtraction_inverse_question(max, term_count, rng),
    _ => {
      let op = pick_operator(mode, rng);
      generate_single_operation_question(op, max, term_count, rng)
    }
  }
}

/// `a op b [op v1 [op v2]]` with every step using the same operator.
pub fn generate_single_operation_question<R: Rng + ?Sized>(
  op: Operator,
  max: u32,
  term_count: u8,
  rng: &mut R,
) -> Result<Question, QuizError> {
  check_bound(max)?;
  if !(2..=4).contains(&term_count) {
    return Err(QuizError::InvalidTermCount(term_count));
  }

  let (a, b) = draw_pair(op, max, rng)?;
  // Never negative: subtraction pairs are ordered.
  let mut total = op.apply(i64::from(a), i64::from(b)) as u64;

  let mut extras = Vec::with_capacity(usize::from(term_count - 2));
  for _ in 2..term_count {
    let value = draw_extra(op, total, max, rng);
    total = op.apply(total as i64, i64::from(value)) as u64;
    extras.push(Extra { op, value });
  }

  Ok(Question {
    a,
    b,
    op,
    extras: if extras.is_empty() { None } else { Some(extras) },
    answer: total as u32,
    is_inverse: false,
    inverse_side: None,
  })
}

/// `? + b = R` or `a + ? = R`.
pub fn generate_inverse_question<R: Rng + ?Sized>(max: u32, term_count: u8, rng: &mut R) -> Result<Question, QuizError> {
  let q = generate_single_operation_question(Operator::Add, max, term_count, rng)?;
  Ok(into_inverse(q, rng))
}

/// `? - b = R` or `a - ? = R`.
pub fn generate_subtraction_inverse_question<R: Rng + ?Sized>(
  max: u32,
  term_count: u8,
  rng: &mut R,
) -> Result<Question, QuizError> {
  let q = generate_single_operation_question(Operator::Sub, max, term_count, rng)?;
  Ok(into_inverse(q, rng))
}

/// Addition/subtraction question; picks 2 or 3 terms when `term_count` is `None`.
pub fn generate_grade_one_question<R: Rng + ?Sized>(
  max: u32,
  term_count: Option<u8>,
  rng: &mut R,
) -> Result<Question, QuizError> {
  let term_count = term_count.unwrap_or_else(|| if rng.gen_bool(0.5) { 2 } else { 3 });
  generate_question_with_terms(Mode::AddSubMix, max, term_count, rng)
}

/// Left-to-right fold over the primary step and every extra.
pub fn evaluate_question(q: &Question) -> i64 {
  fold_chain(q, i64::from(q.a), i64::from(q.b))
}

pub fn check_answer(q: &Question, submitted: i64) -> bool {
  submitted == i64::from(q.answer)
}

/// Total shown to the learner: the chain evaluated with the hidden slot filled by `answer`.
pub fn displayed_total(q: &Question) -> i64 {
  let answer = i64::from(q.answer);
  match q.hidden_side() {
    Some(InverseSide::Left) => fold_chain(q, answer, i64::from(q.b)),
    Some(InverseSide::Right) => fold_chain(q, i64::from(q.a), answer),
    None => evaluate_question(q),
  }
}

pub fn format_question(q: &Question) -> String {
  let hidden = q.hidden_side();
  let left = match hidden {
    Some(InverseSide::Left) => "?".to_string(),
    _ => q.a.to_string(),
  };
  let right = match hidden {
    Some(InverseSide::Right) => "?".to_string(),
    _ => q.b.to_string(),
  };

  let mut out = format!("{left} {} {right}", q.op);
  for e in q.extras() {
    let _ = write!(out, " {} {}", e.op, e.value);
  }
  if hidden.is_some() {
    let _ = write!(out, " = {}", displayed_total(q));
  }
  out
}

// -------- Sampling helpers --------

fn check_bound(max: u32) -> Result<(), QuizError> {
  if max > MAX_SUPPORTED_BOUND {
    return Err(QuizError::BoundTooLarge { max: i64::from(max), limit: MAX_SUPPORTED_BOUND });
  }
  Ok(())
}

fn draw_pair<R: Rng + ?Sized>(op: Operator, max: u32, rng: &mut R) -> Result<(u32, u32), QuizError> {
  match op {
    Operator::Add => {
      for _ in 0..MAX_DRAW_ATTEMPTS {
        let a = rng.gen_range(0..=max);
        let b = rng.gen_range(0..=max);
        if u64::from(a) + u64::from(b) <= u64::from(max) {
          return Ok((a, b));
        }
      }
      Err(QuizError::GenerationExhausted { attempts: MAX_DRAW_ATTEMPTS })
    }
    Operator::Sub => {
      let a = rng.gen_range(0..=max);
      let b = rng.gen_range(0..=max);
      Ok(if b > a { (b, a) } else { (a, b) })
    }
    Operator::Mul => {
      let upper = multiplication_bound(max);
      Ok((rng.gen_range(0..=upper), rng.gen_range(0..=upper)))
    }
  }
}

// Sampling straight from the admissible range matches redrawing over [0, max] until it fits.
fn draw_extra<R: Rng + ?Sized>(op: Operator, total: u64, max: u32, rng: &mut R) -> u32 {
  match op {
    Operator::Add => rng.gen_range(0..=u64::from(max).saturating_sub(total)) as u32,
    Operator::Sub => rng.gen_range(0..=total) as u32,
    Operator::Mul => {
      let upper = u64::from(multiplication_bound(max));
      let limit = if total == 0 { upper } else { upper.min(upper * upper / total) };
      rng.gen_range(0..=limit) as u32
    }
  }
}

fn into_inverse<R: Rng + ?Sized>(mut q: Question, rng: &mut R) -> Question {
  let side = if rng.gen_bool(0.5) { InverseSide::Left } else { InverseSide::Right };
  q.answer = match side {
    InverseSide::Left => q.a,
    InverseSide::Right => q.b,
  };
  q.is_inverse = true;
  q.inverse_side = Some(side);
  q
}

fn fold_chain(q: &Question, a: i64, b: i64) -> i64 {
  q.extras()
    .iter()
    .fold(q.op.apply(a, b), |acc, e| e.op.apply(acc, i64::from(e.value)))
}
