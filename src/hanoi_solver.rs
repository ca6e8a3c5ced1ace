use std::io;

use derive_new::new;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hanoi_board::Board;

/// One physical move: the top disk of `from_peg` goes onto `to_peg`. Pegs are 1-based.
#[derive(new, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct DiskMove {
  pub from_peg: usize,
  pub to_peg: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanoiSolution {
  pub required_moves: Vec<DiskMove>,
}

#[derive(Error, Debug)]
pub enum SolveError {
  #[error("target lists {found} disks but the board holds {expected}")]
  TargetLength { expected: usize, found: usize },
  #[error("target peg {peg} for disk {disk} is outside 1..={num_pegs}")]
  TargetPegOutOfRange { disk: usize, peg: usize, num_pegs: usize },
  #[error("disk {0} is not on any peg")]
  MissingDisk(usize),
  #[error("cannot move disk {disk} from peg {from} to peg {to}: no free peg among {num_pegs} to park the disks above it")]
  Infeasible { disk: usize, from: usize, to: usize, num_pegs: usize },
  #[error("disk {disk} is still blocked on peg {from} (destination peg {to}) after clearing")]
  Stalled { disk: usize, from: usize, to: usize },
  #[error("failed to emit move: {0}")]
  Output(#[from] io::Error),
}

pub type SolveResult<T> = Result<T, SolveError>;

/// Relocates every disk of a [`Board`] to a target configuration, largest disk first.
///
/// Each disk is moved directly when it is on top of its peg and the destination can take it.
/// Otherwise every smaller disk sitting above it, or sitting on the destination, is first parked
/// on a third peg (recursively, largest first), after which the direct move is always legal.
/// Disks that already reached their target are never touched again since all later work only
/// concerns smaller disks.
pub struct HanoiSolver<'a> {
  board: &'a mut Board,
  on_move: &'a mut dyn FnMut(DiskMove) -> io::Result<()>,
  moves_performed: usize,
}

impl<'a> HanoiSolver<'a> {
  /// Solves towards `target` (`target[i]` is the peg for the disk of radius `i + 1`) and returns
  /// every move in the order it was performed. The board is left in the target configuration.
  pub fn solve(board: &mut Board, target: &[usize]) -> SolveResult<HanoiSolution> {
    let mut required_moves = Vec::new();
    HanoiSolver::solve_streaming(board, target, |disk_move| {
      required_moves.push(disk_move);
      Ok(())
    })?;
    Ok(HanoiSolution { required_moves })
  }

  /// Like [`HanoiSolver::solve`], but hands each move to `on_move` as soon as it is performed.
  /// Returns the number of moves.
  pub fn solve_streaming(
      board: &mut Board,
      target: &[usize],
      mut on_move: impl FnMut(DiskMove) -> io::Result<()>) -> SolveResult<usize> {
    check_target(board, target)?;

    let mut solver = HanoiSolver { board, on_move: &mut on_move, moves_performed: 0 };
    solver.solve_internal(target)?;

    info!(
      "Solved {} disks on {} pegs in {} moves",
      solver.board.num_disks(), solver.board.num_pegs(), solver.moves_performed);
    Ok(solver.moves_performed)
  }

  fn solve_internal(&mut self, target: &[usize]) -> SolveResult<()> {
    for disk in (1..=target.len()).rev() {
      self.move_disk(disk, target[disk - 1])?;
    }
    Ok(())
  }

  fn move_disk(&mut self, disk: usize, to: usize) -> SolveResult<()> {
    self.move_disk_attempt(disk, to, false)
  }

  fn move_disk_attempt(&mut self, disk: usize, to: usize, cleared: bool) -> SolveResult<()> {
    if self.board.peg(to).contains(disk) {
      trace!("disk {disk} already on peg {to}");
      return Ok(());
    }

    let from = self.board.locate(disk).ok_or(SolveError::MissingDisk(disk))?;
    let exposed = self.board.peg(from).top_radius() == Some(disk);
    if exposed && self.board.peg(to).accepts(disk) {
      self.perform_move(disk, from, to)?;
      return Ok(());
    }

    // Clearing removes every smaller disk from both pegs, so a second miss means the board was
    // not in a legal state to begin with.
    if cleared {
      return Err(SolveError::Stalled { disk, from, to });
    }

    let parking = self.first_available_peg_for(disk, &[from, to])
        .ok_or(SolveError::Infeasible { disk, from, to, num_pegs: self.board.num_pegs() })?;
    trace!("disk {disk} blocked on peg {from} -> peg {to}, parking smaller disks on peg {parking}");

    for blocker in (1..disk).rev() {
      let location = self.board.locate(blocker).ok_or(SolveError::MissingDisk(blocker))?;
      if location == from || location == to {
        self.move_disk(blocker, parking)?;
      }
    }

    self.move_disk_attempt(disk, to, true)
  }

  /// Picks a peg for `disk` outside `excluded` and other than its current peg. Pegs that can
  /// take the disk right away win over pegs topped by smaller disks; then the fewest disks win,
  /// then the lowest index.
  fn first_available_peg_for(&self, disk: usize, excluded: &[usize]) -> Option<usize> {
    let current = self.board.locate(disk);
    let mut best: Option<((bool, usize), usize)> = None;

    for peg in self.board.pegs() {
      if excluded.contains(&peg.index()) || current == Some(peg.index()) {
        continue;
      }
      let rank = (!peg.accepts(disk), peg.len());
      if best.map_or(true, |(best_rank, _)| rank < best_rank) {
        best = Some((rank, peg.index()));
      }
    }

    let selected = best.map(|(_, index)| index);
    debug!("first available peg for disk {disk} excluding {excluded:?}: {selected:?}");
    selected
  }

  fn perform_move(&mut self, disk: usize, from: usize, to: usize) -> SolveResult<()> {
    assert!(
      self.board.is_legal_move(from, to),
      "Illegal move of disk {} from peg {} to peg {}: {:?}", disk, from, to, self.board);

    self.board.move_top(from, to);
    self.moves_performed += 1;
    debug!("move #{}: disk {disk} peg {from} -> peg {to}", self.moves_performed);
    (self.on_move)(DiskMove::new(from, to))?;
    Ok(())
  }
}

fn check_target(board: &Board, target: &[usize]) -> SolveResult<()> {
  if target.len() != board.num_disks() {
    return Err(SolveError::TargetLength { expected: board.num_disks(), found: target.len() });
  }
  for (i, &peg) in target.iter().enumerate() {
    if !board.has_peg(peg) {
      return Err(SolveError::TargetPegOutOfRange { disk: i + 1, peg, num_pegs: board.num_pegs() });
    }
  }
  Ok(())
}
