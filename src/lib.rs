pub mod hanoi_board;
pub mod hanoi_solver;
pub mod puzzle_input;
pub mod solution_replay;
