use anyhow::anyhow;
use clap::{ArgEnum, Parser};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use hanoi_moves::puzzle_input::PuzzleInstance;

#[derive(Parser, Debug)]
#[clap(name = "puzzle_generator")]
struct Opts {
  #[clap(short = 'n', long, default_value = "8")]
  num_disks: usize,

  #[clap(short = 'p', long, default_value = "3")]
  num_pegs: usize,

  #[clap(long)]
  seed: Option<u64>,

  #[clap(short, long, arg_enum, default_value = "text")]
  format: Format,
}

#[derive(ArgEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Format {
  Text,
  Json,
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let opts: Opts = Opts::parse();
  if opts.num_pegs == 0 {
    return Err(anyhow!("need at least one peg"));
  }

  let mut rng = match opts.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_rng(thread_rng())?,
  };
  let instance = PuzzleInstance::random(opts.num_disks, opts.num_pegs, &mut rng);
  log::debug!("Generated {instance:?}");

  match opts.format {
    Format::Text => print!("{}", instance.to_input_string()),
    Format::Json => println!("{}", serde_json::to_string_pretty(&instance)?),
  }
  Ok(())
}
