use log::trace;
use thiserror::Error;

use crate::hanoi_board::Board;
use crate::hanoi_solver::DiskMove;
use crate::puzzle_input::PuzzleInstance;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ReplayError {
  #[error("move {step}: peg {peg} does not exist")]
  PegOutOfRange { step: usize, peg: usize },
  #[error("move {step}: peg {peg} is empty")]
  EmptySource { step: usize, peg: usize },
  #[error("move {step}: disk {disk} cannot be placed on disk {onto}")]
  IllegalPlacement { step: usize, disk: usize, onto: usize },
  #[error("move {step}: disk {disk} moved onto the peg it came from")]
  SamePeg { step: usize, disk: usize },
  #[error("after move {step}: disk {disk} is on {count} pegs")]
  Conservation { step: usize, disk: usize, count: usize },
  #[error("target lists {expected} disks but the board holds {actual}")]
  DiskCount { expected: usize, actual: usize },
  #[error("disk {disk} ended on peg {actual}, expected peg {expected}")]
  TargetMismatch { disk: usize, expected: usize, actual: usize },
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// Applies `moves` one by one to a fresh board built from `initial`, checking that every move
/// is legal and that every disk stays on exactly one peg. Steps are numbered from 1.
pub fn replay(num_pegs: usize, initial: &[usize], moves: &[DiskMove]) -> ReplayResult<Board> {
  let mut board = Board::new(num_pegs, initial);

  for (i, disk_move) in moves.iter().enumerate() {
    let step = i + 1;
    let DiskMove { from_peg, to_peg } = *disk_move;
    for peg in [from_peg, to_peg] {
      if !board.has_peg(peg) {
        return Err(ReplayError::PegOutOfRange { step, peg });
      }
    }

    let disk = board.peg(from_peg).top_radius()
        .ok_or(ReplayError::EmptySource { step, peg: from_peg })?;
    if from_peg == to_peg {
      return Err(ReplayError::SamePeg { step, disk });
    }
    if let Some(onto) = board.peg(to_peg).top_radius().filter(|&onto| onto < disk) {
      return Err(ReplayError::IllegalPlacement { step, disk, onto });
    }

    board.move_top(from_peg, to_peg);
    trace!("replayed move {step}: disk {disk} peg {from_peg} -> peg {to_peg}");
    check_conservation(&board, step)?;
  }

  Ok(board)
}

/// Replays `moves` against `instance` and checks that every disk ends on its target peg.
pub fn validate_solution(instance: &PuzzleInstance, moves: &[DiskMove]) -> ReplayResult<()> {
  let board = replay(instance.num_pegs, &instance.initial, moves)?;
  let actual = board.configuration();
  if instance.target.len() != actual.len() {
    return Err(ReplayError::DiskCount { expected: instance.target.len(), actual: actual.len() });
  }
  for (i, (&expected, &actual)) in instance.target.iter().zip(&actual).enumerate() {
    if expected != actual {
      return Err(ReplayError::TargetMismatch { disk: i + 1, expected, actual });
    }
  }
  Ok(())
}

fn check_conservation(board: &Board, step: usize) -> ReplayResult<()> {
  let mut seen = vec![0; board.num_disks()];
  for peg in board.pegs() {
    for disk in peg.disks() {
      if let Some(count) = disk.radius.checked_sub(1).and_then(|i| seen.get_mut(i)) {
        *count += 1;
      }
    }
  }
  match seen.iter().position(|&count| count != 1) {
    Some(i) => Err(ReplayError::Conservation { step, disk: i + 1, count: seen[i] }),
    None => Ok(()),
  }
}
