//! A computer opponent for the board game 'Connect 4'
//!
//! The agent looks a fixed number of plies ahead with a minimax search,
//! the depth being chosen by a [`Difficulty`] level.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{board::Board, search::best_move, Difficulty};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // the human has three in a row along the bottom, columns are 0-indexed
//! let board = Board::from_moves("15253")?;
//! let column = best_move(&board, Difficulty::Easy)?;
//!
//! assert_eq!(column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod search;

pub mod game;


pub use board::{Board, Cell, GameOutcome, MoveError, Side};
pub use game::Game;
pub use search::{best_move, evaluate, Difficulty, Pruning, Searcher};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tiles needed to win
pub const WIN_LENGTH: usize = 4;

// the win scan assumes a window of four fits in every direction
const_assert!(WIDTH >= WIN_LENGTH && HEIGHT >= WIN_LENGTH);
