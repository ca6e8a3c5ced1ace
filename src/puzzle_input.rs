use std::io;
use std::io::{BufRead, Read};

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hanoi_board::Board;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("line {line}: missing {what}")]
  MissingLine { line: usize, what: &'static str },
  #[error("line {line}: {token:?} is not a non-negative integer")]
  InvalidToken { line: usize, token: String },
  #[error("line {line}: expected {expected} values, found {found}")]
  WrongCount { line: usize, expected: usize, found: usize },
  #[error("{what} lists {found} disks but the puzzle has {expected}")]
  AssignmentLength { what: &'static str, expected: usize, found: usize },
  #[error("{what}: peg {peg} for disk {disk} is outside 1..={num_pegs}")]
  PegOutOfRange { what: &'static str, disk: usize, peg: usize, num_pegs: usize },
  #[error("a puzzle needs at least one peg")]
  NoPegs,
  #[error("invalid JSON puzzle: {0}")]
  Json(#[from] serde_json::Error),
  #[error("{0}")]
  Io(#[from] io::Error),
}

pub type InputResult<T> = Result<T, InputError>;

/// A full puzzle: `initial[i]` and `target[i]` are the 1-based pegs of the disk with radius
/// `i + 1` before and after solving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleInstance {
  pub num_disks: usize,
  pub num_pegs: usize,
  pub initial: Vec<usize>,
  pub target: Vec<usize>,
}

impl PuzzleInstance {
  /// Parses the line format:
  ///
  /// ```text
  /// <num_disks> <num_pegs>
  /// <initial peg of disk 1> ... <initial peg of disk N>
  /// <target peg of disk 1> ... <target peg of disk N>
  /// ```
  pub fn parse(text: &str) -> InputResult<Self> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

    let header = lines.next().ok_or(InputError::MissingLine { line: 1, what: "disk and peg counts" })?;
    let counts = parse_numbers(1, header)?;
    if counts.len() != 2 {
      return Err(InputError::WrongCount { line: 1, expected: 2, found: counts.len() });
    }
    let (num_disks, num_pegs) = (counts[0], counts[1]);

    let initial = parse_assignment(2, lines.next(), num_disks, "initial configuration")?;
    let target = parse_assignment(3, lines.next(), num_disks, "target configuration")?;

    let trailing = lines.filter(|l| !l.trim().is_empty()).count();
    if trailing > 0 {
      warn!("Ignoring {trailing} non-empty lines after the target configuration");
    }

    let instance = Self { num_disks, num_pegs, initial, target };
    instance.validate()?;
    debug!("Parsed puzzle: {} disks on {} pegs", num_disks, num_pegs);
    Ok(instance)
  }

  pub fn from_reader(mut reader: impl BufRead) -> InputResult<Self> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Self::parse(&text)
  }

  pub fn from_json(reader: impl Read) -> InputResult<Self> {
    let instance: Self = serde_json::from_reader(reader)?;
    instance.validate()?;
    Ok(instance)
  }

  /// Both assignments must hold one peg index per disk, each within `1..=num_pegs`.
  pub fn validate(&self) -> InputResult<()> {
    if self.num_pegs == 0 {
      return Err(InputError::NoPegs);
    }
    for (what, assignment) in [("initial configuration", &self.initial), ("target configuration", &self.target)] {
      if assignment.len() != self.num_disks {
        return Err(InputError::AssignmentLength { what, expected: self.num_disks, found: assignment.len() });
      }
      if let Some((i, &peg)) = assignment.iter().enumerate().find(|(_, peg)| **peg < 1 || **peg > self.num_pegs) {
        return Err(InputError::PegOutOfRange { what, disk: i + 1, peg, num_pegs: self.num_pegs });
      }
    }
    Ok(())
  }

  pub fn board(&self) -> InputResult<Board> {
    self.validate()?;
    Ok(Board::new(self.num_pegs, &self.initial))
  }

  pub fn is_solved(&self) -> bool {
    self.initial == self.target
  }

  pub fn to_input_string(&self) -> String {
    format!(
      "{} {}\n{}\n{}\n",
      self.num_disks, self.num_pegs, join_pegs(&self.initial), join_pegs(&self.target))
  }

  /// A puzzle with every disk placed on a uniformly random peg, both before and after.
  pub fn random(num_disks: usize, num_pegs: usize, rng: &mut impl Rng) -> Self {
    let mut pick = |_: usize| rng.gen_range(1..=num_pegs);
    let initial = (0..num_disks).map(&mut pick).collect();
    let target = (0..num_disks).map(&mut pick).collect();
    Self { num_disks, num_pegs, initial, target }
  }
}

fn parse_numbers(line: usize, text: &str) -> InputResult<Vec<usize>> {
  text.split_whitespace()
      .map(|token| token.parse::<usize>()
          .map_err(|_| InputError::InvalidToken { line, token: token.to_string() }))
      .collect()
}

fn parse_assignment(
    line: usize,
    text: Option<&str>,
    num_disks: usize,
    what: &'static str) -> InputResult<Vec<usize>> {
  let values = match text {
    Some(text) => parse_numbers(line, text)?,
    None if num_disks == 0 => Vec::new(),
    None => return Err(InputError::MissingLine { line, what }),
  };
  if values.len() != num_disks {
    return Err(InputError::WrongCount { line, expected: num_disks, found: values.len() });
  }
  Ok(values)
}

fn join_pegs(pegs: &[usize]) -> String {
  pegs.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  #[test]
  fn test_parse_happy_path() {
    let instance = PuzzleInstance::parse("4 3\n1 1 2 3\r\n3 3 3 3\n").unwrap();
    assert_eq!(instance, PuzzleInstance {
      num_disks: 4,
      num_pegs: 3,
      initial: vec![1, 1, 2, 3],
      target: vec![3, 3, 3, 3],
    });
    assert!(!instance.is_solved());
    assert_eq!(instance.board().unwrap().configuration(), vec![1, 1, 2, 3]);
  }

  #[test]
  fn test_parse_zero_disks() {
    let instance = PuzzleInstance::parse("0 3\n").unwrap();
    assert_eq!(instance.num_disks, 0);
    assert!(instance.initial.is_empty());
    assert!(instance.is_solved());
  }

  #[test]
  fn test_parse_ignores_trailing_lines() {
    let instance = PuzzleInstance::parse("1 2\n1\n2\nPress any key\n").unwrap();
    assert_eq!(instance.target, vec![2]);
  }

  #[test]
  fn test_parse_errors() {
    assert!(matches!(
      PuzzleInstance::parse(""),
      Err(InputError::MissingLine { line: 1, .. })));
    assert!(matches!(
      PuzzleInstance::parse("3 3\n1 1 1\n"),
      Err(InputError::MissingLine { line: 3, .. })));
    assert!(matches!(
      PuzzleInstance::parse("3\n1 1 1\n3 3 3\n"),
      Err(InputError::WrongCount { line: 1, expected: 2, found: 1 })));
    assert!(matches!(
      PuzzleInstance::parse("3 3\n1 1\n3 3 3\n"),
      Err(InputError::WrongCount { line: 2, expected: 3, found: 2 })));
    assert!(matches!(
      PuzzleInstance::parse("3 3\n1 1 1\n3 x 3\n"),
      Err(InputError::InvalidToken { line: 3, ref token }) if token == "x"));
    assert!(matches!(
      PuzzleInstance::parse("2 -3\n1 1\n1 1\n"),
      Err(InputError::InvalidToken { line: 1, .. })));
  }

  #[test]
  fn test_validate_ranges() {
    assert!(matches!(
      PuzzleInstance::parse("2 3\n1 4\n1 1\n"),
      Err(InputError::PegOutOfRange { what: "initial configuration", disk: 2, peg: 4, num_pegs: 3 })));
    assert!(matches!(
      PuzzleInstance::parse("2 3\n1 1\n0 1\n"),
      Err(InputError::PegOutOfRange { what: "target configuration", disk: 1, peg: 0, .. })));
    assert!(matches!(PuzzleInstance::parse("0 0\n\n\n"), Err(InputError::NoPegs)));

    let short = PuzzleInstance { num_disks: 2, num_pegs: 3, initial: vec![1], target: vec![1, 1] };
    assert!(matches!(
      short.validate(),
      Err(InputError::AssignmentLength { expected: 2, found: 1, .. })));
  }

  #[test]
  fn test_json_input() {
    let json = r#"{"num_disks": 2, "num_pegs": 3, "initial": [1, 2], "target": [3, 3]}"#;
    let instance = PuzzleInstance::from_json(json.as_bytes()).unwrap();
    assert_eq!(instance.target, vec![3, 3]);

    let bad = r#"{"num_disks": 2, "num_pegs": 3, "initial": [1, 2], "target": [3, 9]}"#;
    assert!(matches!(PuzzleInstance::from_json(bad.as_bytes()), Err(InputError::PegOutOfRange { .. })));
    assert!(matches!(PuzzleInstance::from_json("[1, 2]".as_bytes()), Err(InputError::Json(_))));
  }

  #[test]
  fn test_input_string_parses_back() {
    let instance = PuzzleInstance { num_disks: 3, num_pegs: 4, initial: vec![4, 1, 2], target: vec![1, 1, 3] };
    assert_eq!(instance.to_input_string(), "3 4\n4 1 2\n1 1 3\n");
    assert_eq!(PuzzleInstance::parse(&instance.to_input_string()).unwrap(), instance);
  }

  #[test]
  fn test_random_is_seeded_and_in_range() {
    let a = PuzzleInstance::random(12, 5, &mut StdRng::seed_from_u64(7));
    let b = PuzzleInstance::random(12, 5, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
    a.validate().unwrap();
    assert_eq!(a.initial.len(), 12);
  }
}
