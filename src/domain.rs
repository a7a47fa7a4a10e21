//! Domain models used by the engine: operators, modes, chained extras and the question itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Arithmetic operator of a step. Serialized with the symbol the learner sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
  #[serde(rename = "+")]
  Add,
  #[serde(rename = "-")]
  Sub,
  #[serde(rename = "×", alias = "*", alias = "x")]
  Mul,
}

impl Operator {
  pub fn symbol(self) -> &'static str {
    match self {
      Operator::Add => "+",
      Operator::Sub => "-",
      Operator::Mul => "×",
    }
  }

  /// Apply the operator without any bound checks.
  pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
    match self {
      Operator::Add => lhs.saturating_add(rhs),
      Operator::Sub => lhs.saturating_sub(rhs),
      Operator::Mul => lhs.saturating_mul(rhs),
    }
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Which operand is hidden in an inverse ("missing operand") question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverseSide {
  Left,
  Right,
}

/// Generation policy requested by a caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
  Add,
  Sub,
  Mul,
  #[default]
  Mix,
  AddSubMix,
  AddInverse,
  SubInverse,
}

impl Mode {
  pub fn as_str(self) -> &'static str {
    match self {
      Mode::Add => "add",
      Mode::Sub => "sub",
      Mode::Mul => "mul",
      Mode::Mix => "mix",
      Mode::AddSubMix => "add-sub-mix",
      Mode::AddInverse => "add-inverse",
      Mode::SubInverse => "sub-inverse",
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Mode {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "add" => Ok(Mode::Add),
      "sub" => Ok(Mode::Sub),
      "mul" => Ok(Mode::Mul),
      "mix" => Ok(Mode::Mix),
      "add-sub-mix" => Ok(Mode::AddSubMix),
      "add-inverse" => Ok(Mode::AddInverse),
      "sub-inverse" => Ok(Mode::SubInverse),
      other => Err(QuizError::UnknownMode(other.to_string())),
    }
  }
}

/// One chained operation applied after the primary step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
  pub op: Operator,
  pub value: u32,
}

/// A generated arithmetic question.
///
/// For inverse questions `answer` is the hidden operand, not the evaluated total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub a: u32,
  pub b: u32,
  pub op: Operator,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extras: Option<Vec<Extra>>,
  pub answer: u32,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub is_inverse: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub inverse_side: Option<InverseSide>,
}

impl Question {
  /// Hidden side, if this is a well-formed inverse question.
  pub fn hidden_side(&self) -> Option<InverseSide> {
    if self.is_inverse { self.inverse_side } else { None }
  }

  pub fn extras(&self) -> &[Extra] {
    self.extras.as_deref().unwrap_or(&[])
  }

  pub fn term_count(&self) -> usize {
    2 + self.extras().len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_json_uses_symbols_and_omits_empty_fields() {
    let q = Question { a: 4, b: 2, op: Operator::Mul, extras: None, answer: 8, is_inverse: false, inverse_side: None };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v, serde_json::json!({ "a": 4, "b": 2, "op": "×", "answer": 8 }));
  }

  #[test]
  fn inverse_fields_are_camel_case() {
    let q = Question {
      a: 5, b: 3, op: Operator::Add, extras: None, answer: 5,
      is_inverse: true, inverse_side: Some(InverseSide::Left),
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["isInverse"], true);
    assert_eq!(v["inverseSide"], "left");
  }

  #[test]
  fn operator_accepts_ascii_multiplication_aliases() {
    let op: Operator = serde_json::from_str("\"*\"").unwrap();
    assert_eq!(op, Operator::Mul);
    let op: Operator = serde_json::from_str("\"x\"").unwrap();
    assert_eq!(op, Operator::Mul);
  }

  #[test]
  fn default_mode_is_mix() {
    assert_eq!(Mode::default(), Mode::Mix);
  }

  #[test]
  fn inverse_sides_are_distinct_set_members() {
    let sides: std::collections::HashSet<InverseSide> =
      [InverseSide::Left, InverseSide::Right, InverseSide::Left].into_iter().collect();
    assert_eq!(sides.len(), 2);
  }

  #[test]
  fn mode_parses_every_name_and_rejects_others() {
    for m in [Mode::Add, Mode::Sub, Mode::Mul, Mode::Mix, Mode::AddSubMix, Mode::AddInverse, Mode::SubInverse] {
      assert_eq!(m.as_str().parse::<Mode>().unwrap(), m);
    }
    assert!(matches!("divide".parse::<Mode>(), Err(QuizError::UnknownMode(_))));
  }
}
