use derive_new::new;
use serde::{Deserialize, Serialize};

/// A disk is identified by its radius; radii are `1..=num_disks` and unique on a board.
#[derive(new, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Disk {
  pub radius: usize,
}

/// One stack of disks. The last element of `stack` is the top of the peg.
///
/// Pushes are not checked here: keeping the stack strictly increasing in radius from top to
/// bottom is the caller's job (see [`Board::is_legal_move`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peg {
  index: usize,
  stack: Vec<Disk>,
}

impl Peg {
  pub fn new(index: usize, mut disks: Vec<Disk>) -> Self {
    // Largest at the bottom so that pop() yields the smallest.
    disks.sort_by(|a, b| b.radius.cmp(&a.radius));
    Self { index, stack: disks }
  }

  pub fn index(&self) -> usize {
    self.index
  }

  pub fn contains(&self, radius: usize) -> bool {
    self.stack.iter().any(|d| d.radius == radius)
  }

  pub fn top_radius(&self) -> Option<usize> {
    self.stack.last().map(|d| d.radius)
  }

  pub fn push(&mut self, disk: Disk) {
    self.stack.push(disk);
  }

  pub fn pop(&mut self) -> Option<Disk> {
    self.stack.pop()
  }

  pub fn len(&self) -> usize {
    self.stack.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stack.is_empty()
  }

  /// Disks from bottom to top.
  pub fn disks(&self) -> &[Disk] {
    &self.stack
  }

  /// Whether `radius` could be placed on this peg right now.
  pub fn accepts(&self, radius: usize) -> bool {
    self.top_radius().map_or(true, |top| top > radius)
  }
}

/// All pegs of one solving session. Peg indices are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
  num_disks: usize,
  pegs: Vec<Peg>,
}

impl Board {
  /// Builds a board where `assignment[i]` is the peg holding the disk of radius `i + 1`.
  ///
  /// The assignment must already be validated (every entry in `1..=num_pegs`); see
  /// [`crate::puzzle_input::PuzzleInstance::validate`]. Out-of-range entries are dropped.
  pub fn new(num_pegs: usize, assignment: &[usize]) -> Self {
    let mut per_peg: Vec<Vec<Disk>> = vec![Vec::new(); num_pegs];
    for (i, &peg) in assignment.iter().enumerate() {
      if let Some(disks) = peg.checked_sub(1).and_then(|slot| per_peg.get_mut(slot)) {
        disks.push(Disk::new(i + 1));
      }
    }

    let pegs = per_peg
        .into_iter()
        .enumerate()
        .map(|(slot, disks)| Peg::new(slot + 1, disks))
        .collect();
    Self { num_disks: assignment.len(), pegs }
  }

  pub fn num_disks(&self) -> usize {
    self.num_disks
  }

  pub fn num_pegs(&self) -> usize {
    self.pegs.len()
  }

  pub fn pegs(&self) -> &[Peg] {
    &self.pegs
  }

  pub fn has_peg(&self, index: usize) -> bool {
    (1..=self.pegs.len()).contains(&index)
  }

  /// Panics if `index` is not a peg of this board.
  pub fn peg(&self, index: usize) -> &Peg {
    &self.pegs[index - 1]
  }

  /// Index of the peg currently holding `radius`.
  pub fn locate(&self, radius: usize) -> Option<usize> {
    self.pegs.iter().find(|p| p.contains(radius)).map(|p| p.index)
  }

  /// Peg index per disk, in the same layout as the input assignments. Disks that are somehow
  /// missing from every peg are reported as peg 0.
  pub fn configuration(&self) -> Vec<usize> {
    let mut config = vec![0; self.num_disks];
    for peg in &self.pegs {
      for disk in peg.disks() {
        if let Some(slot) = disk.radius.checked_sub(1).and_then(|i| config.get_mut(i)) {
          *slot = peg.index;
        }
      }
    }
    config
  }

  pub fn is_legal_move(&self, from: usize, to: usize) -> bool {
    if from == to || !self.has_peg(from) || !self.has_peg(to) {
      return false;
    }
    match self.peg(from).top_radius() {
      Some(radius) => self.peg(to).accepts(radius),
      None => false,
    }
  }

  /// Moves the top disk of `from` onto `to` without checking legality. Returns the moved disk,
  /// or `None` when `from` is empty.
  pub fn move_top(&mut self, from: usize, to: usize) -> Option<Disk> {
    let disk = self.pegs[from - 1].pop()?;
    self.pegs[to - 1].push(disk);
    Some(disk)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_peg_sorts_unordered_input() {
    let peg = Peg::new(2, vec![Disk::new(1), Disk::new(4), Disk::new(2)]);
    assert_eq!(peg.index(), 2);
    assert_eq!(peg.top_radius(), Some(1));
    assert_eq!(peg.disks(), &[Disk::new(4), Disk::new(2), Disk::new(1)]);
    assert!(peg.contains(4));
    assert!(!peg.contains(3));
  }

  #[test]
  fn test_peg_stack_discipline() {
    let mut peg = Peg::new(1, vec![]);
    assert!(peg.is_empty());
    assert_eq!(peg.top_radius(), None);
    assert!(peg.accepts(7));

    peg.push(Disk::new(3));
    peg.push(Disk::new(1));
    assert_eq!(peg.len(), 2);
    assert!(!peg.accepts(2));
    assert_eq!(peg.pop(), Some(Disk::new(1)));
    assert!(peg.accepts(2));
    assert_eq!(peg.pop(), Some(Disk::new(3)));
    assert_eq!(peg.pop(), None);
  }

  #[test]
  fn test_board_from_assignment() {
    let board = Board::new(3, &[1, 3, 1, 2]);
    assert_eq!(board.num_disks(), 4);
    assert_eq!(board.num_pegs(), 3);
    assert_eq!(board.peg(1).disks(), &[Disk::new(3), Disk::new(1)]);
    assert_eq!(board.peg(2).top_radius(), Some(4));
    assert_eq!(board.peg(3).top_radius(), Some(2));
    assert_eq!(board.locate(3), Some(1));
    assert_eq!(board.locate(5), None);
    assert_eq!(board.configuration(), vec![1, 3, 1, 2]);
  }

  #[test]
  fn test_board_legal_moves() {
    let mut board = Board::new(3, &[1, 1, 2]);
    assert!(board.is_legal_move(1, 2));
    assert!(board.is_legal_move(1, 3));
    assert!(!board.is_legal_move(2, 1));
    assert!(!board.is_legal_move(3, 1));
    assert!(!board.is_legal_move(1, 1));
    assert!(!board.is_legal_move(1, 4));
    assert!(!board.is_legal_move(0, 1));

    assert_eq!(board.move_top(1, 3), Some(Disk::new(1)));
    assert_eq!(board.configuration(), vec![3, 1, 2]);

    let mut lonely = Board::new(2, &[1]);
    assert_eq!(lonely.move_top(2, 1), None);
    assert_eq!(lonely.configuration(), vec![1]);
  }
}
