//! Built-in grade presets layered on top of the engine.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Mode, Question};
use crate::engine::{generate_grade_one_question, generate_question_with_terms};
use crate::error::QuizError;

pub const GRADE_ONE_MAX: u32 = 20;
pub const GRADE_TWO_MAX: u32 = 100;
pub const GRADE_THREE_MAX: u32 = 100;

/// Share of grade 2 questions asked in missing-operand form.
const GRADE_TWO_INVERSE_P: f64 = 0.25;

/// Generate a question the way a given school grade practises.
/// `max` and `term_count` override the preset when given.
pub fn generate_for_grade<R: Rng + ?Sized>(
  grade: u8,
  max: Option<u32>,
  term_count: Option<u8>,
  rng: &mut R,
) -> Result<Question, QuizError> {
  match grade {
    1 => generate_grade_one_question(max.unwrap_or(GRADE_ONE_MAX), term_count, rng),
    2 => {
      let terms = term_count.unwrap_or_else(|| *[2u8, 3].choose(rng).unwrap_or(&2));
      let mode = if rng.gen_bool(GRADE_TWO_INVERSE_P) {
        *[Mode::AddInverse, Mode::SubInverse].choose(rng).unwrap_or(&Mode::AddInverse)
      } else {
        Mode::AddSubMix
      };
      generate_question_with_terms(mode, max.unwrap_or(GRADE_TWO_MAX), terms, rng)
    }
    3 => generate_question_with_terms(Mode::Mix, max.unwrap_or(GRADE_THREE_MAX), term_count.unwrap_or(2), rng),
    other => Err(QuizError::UnknownGrade(other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Operator;
  use crate::engine::{displayed_total, evaluate_question};
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn grade_one_stays_small_and_additive() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
      let q = generate_for_grade(1, None, None, &mut rng).unwrap();
      assert_ne!(q.op, Operator::Mul);
      assert!((0..=i64::from(GRADE_ONE_MAX)).contains(&evaluate_question(&q)));
    }
  }

  #[test]
  fn grade_two_mixes_in_inverse_questions() {
    let mut rng = StdRng::seed_from_u64(2);
    let qs: Vec<_> = (0..200).map(|_| generate_for_grade(2, None, None, &mut rng).unwrap()).collect();
    assert!(qs.iter().any(|q| q.is_inverse));
    assert!(qs.iter().any(|q| !q.is_inverse));
    for q in &qs {
      assert!(q.term_count() <= 3);
      assert!((0..=i64::from(GRADE_TWO_MAX)).contains(&displayed_total(q)));
    }
  }

  #[test]
  fn grade_three_honours_overrides() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
      let q = generate_for_grade(3, Some(30), Some(3), &mut rng).unwrap();
      assert_eq!(q.term_count(), 3);
    }
  }

  #[test]
  fn unknown_grade_is_rejected() {
    let mut rng = StdRng::seed_from_u64(4);
    assert_eq!(generate_for_grade(9, None, None, &mut rng), Err(QuizError::UnknownGrade(9)));
    assert_eq!(generate_for_grade(0, None, None, &mut rng), Err(QuizError::UnknownGrade(0)));
  }
}
