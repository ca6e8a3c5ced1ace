//! Reads a Tower-of-Hanoi instance (disk count and peg count, then the initial and the target
//! peg of every disk) and prints the moves that turn one configuration into the other, one
//! `from to` line per move.

use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgEnum, Parser};
use log::info;

use hanoi_moves::hanoi_solver::{HanoiSolution, HanoiSolver, SolveError};
use hanoi_moves::puzzle_input::{InputError, PuzzleInstance};
use hanoi_moves::solution_replay::{validate_solution, ReplayError};

#[derive(Parser, Debug)]
#[clap(name = "hanoi_moves")]
struct Opts {
  /// Puzzle file; standard input when omitted.
  #[clap(short, long)]
  input: Option<PathBuf>,

  #[clap(long, arg_enum, default_value = "text")]
  input_format: Format,

  #[clap(short, long, arg_enum, default_value = "text")]
  format: Format,

  /// Replay the emitted moves on a fresh board and fail unless they reach the target legally.
  #[clap(long)]
  verify: bool,

  /// Report the number of moves on stderr.
  #[clap(long)]
  count: bool,
}

#[derive(ArgEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Format {
  Text,
  Json,
}

fn main() {
  env_logger::init();
  let opts: Opts = Opts::parse();

  if let Err(e) = run(&opts) {
    eprintln!("error: {e:#}");
    process::exit(exit_code(&e));
  }
}

fn run(opts: &Opts) -> anyhow::Result<()> {
  let instance = read_instance(opts)?;
  info!("Solving {} disks on {} pegs", instance.num_disks, instance.num_pegs);

  let mut board = instance.board()?;
  let mut required_moves = Vec::new();
  {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    HanoiSolver::solve_streaming(&mut board, &instance.target, |disk_move| {
      required_moves.push(disk_move);
      match opts.format {
        Format::Text => writeln!(out, "{} {}", disk_move.from_peg, disk_move.to_peg),
        Format::Json => Ok(()),
      }
    })?;

    if opts.format == Format::Json {
      serde_json::to_writer_pretty(&mut out, &HanoiSolution { required_moves: required_moves.clone() })?;
      writeln!(out)?;
    }
    out.flush()?;
  }

  if opts.count {
    eprintln!("{} moves", required_moves.len());
  }
  if opts.verify {
    validate_solution(&instance, &required_moves)?;
    info!("Verified {} moves", required_moves.len());
  }
  Ok(())
}

fn read_instance(opts: &Opts) -> anyhow::Result<PuzzleInstance> {
  let instance = match (&opts.input, opts.input_format) {
    (Some(path), Format::Text) => {
      PuzzleInstance::from_reader(BufReader::new(File::open(path).map_err(InputError::Io)?))?
    }
    (Some(path), Format::Json) => {
      PuzzleInstance::from_json(BufReader::new(File::open(path).map_err(InputError::Io)?))?
    }
    (None, Format::Text) => PuzzleInstance::from_reader(io::stdin().lock())?,
    (None, Format::Json) => PuzzleInstance::from_json(io::stdin().lock())?,
  };
  Ok(instance)
}

fn exit_code(e: &anyhow::Error) -> i32 {
  if e.is::<InputError>() {
    2
  } else if e.is::<SolveError>() {
    3
  } else if e.is::<ReplayError>() {
    4
  } else {
    1
  }
}
