//! A depth-limited minimax agent choosing the computer's move

use log::{debug, trace};

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use crate::board::{Board, MoveError, Side};
use crate::WIDTH;

/// The score of a position holding an alignment for the computer
pub const WIN_SCORE: i32 = 1000;

/// How far ahead the computer looks before choosing a move
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The number of plies searched after the computer's candidate move
    pub fn max_depth(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("unknown difficulty '{0}', expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Whether the search may skip branches that cannot change the chosen move
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Pruning {
    AlphaBeta,
    Exhaustive,
}

impl Default for Pruning {
    fn default() -> Self {
        Pruning::AlphaBeta
    }
}

/// Scores a position: `WIN_SCORE` for a computer alignment, `-WIN_SCORE` for a human one, else 0
///
/// Partial alignments are not scored, only finished games.
pub fn evaluate(board: &Board) -> i32 {
    if board.check_winner(Side::Computer) {
        WIN_SCORE
    } else if board.check_winner(Side::Human) {
        -WIN_SCORE
    } else {
        0
    }
}

/// Chooses the computer's move for a position
///
/// The search runs on a copy, so `board` is left as it was.
/// Fails with [`MoveError::GameOver`] when no column is playable.
pub fn best_move(board: &Board, difficulty: Difficulty) -> Result<usize, MoveError> {
    let mut scratch = *board;
    let (_score, column) = Searcher::new(difficulty).search(&mut scratch)?;
    Ok(column)
}

/// A tile played for one branch of the search, taken back when the guard goes out of scope
struct Trial<'a> {
    board: &'a mut Board,
    column: usize,
}

impl<'a> Trial<'a> {
    fn play(board: &'a mut Board, column: usize, side: Side) -> Result<Self, MoveError> {
        board.drop_piece(column, side)?;
        Ok(Self { board, column })
    }
}

impl Deref for Trial<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &*self.board
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.board
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.board.undo_drop(self.column);
    }
}

/// A minimax agent for the computer player
///
/// # Notes
/// The computer maximises and the human minimises. The search explores every
/// playable column in ascending order, playing and taking back tiles on a
/// single board, until a side has an alignment or the depth limit is reached.
///
/// # Position Scoring
/// A searched leaf scores `evaluate(board) - depth`, so a win found early scores
/// more than the same win found late. A full board without an alignment scores 0.
/// At the root the first column with the strictly greatest score is chosen.
#[derive(Clone, Debug)]
pub struct Searcher {
    max_depth: usize,
    pruning: Pruning,

    /// The number of nodes searched by this `Searcher` so far (for diagnostics only)
    pub node_count: usize,
}

impl Searcher {
    /// Creates a new `Searcher` for a difficulty, pruning with alpha-beta
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            max_depth: difficulty.max_depth(),
            pruning: Pruning::default(),
            node_count: 0,
        }
    }

    /// Changes the pruning of an existing `Searcher`
    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Performs the top-level search, returning the score and column of the best move
    ///
    /// Every tile played while searching is taken back, so `board` is unchanged on return.
    pub fn search(&mut self, board: &mut Board) -> Result<(i32, usize), MoveError> {
        let start_count = self.node_count;
        let mut best: Option<(i32, usize)> = None;

        for column in 0..WIDTH {
            if board.is_column_full(column) {
                continue;
            }
            // columns scoring no better than the current best only need an upper bound
            let alpha = best.map_or(i32::MIN, |(score, _)| score);
            let score = {
                let mut trial = Trial::play(board, column, Side::Computer)?;
                self.minimax(&mut trial, 0, false, alpha, i32::MAX)?
            };
            trace!("column {} scored {}", column, score);

            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, column));
            }
        }

        let (score, column) = best.ok_or(MoveError::GameOver)?;
        debug!(
            "best move: column {}, score {}, {} nodes searched at depth {}",
            column,
            score,
            self.node_count - start_count,
            self.max_depth
        );
        Ok((score, column))
    }

    /// Performs game tree search
    ///
    /// Returns the score of the position (see [Position Scoring]). With alpha-beta
    /// pruning the score is exact inside `(alpha, beta)` and a bound outside it.
    ///
    /// [Position Scoring]: #position-scoring
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, MoveError> {
        self.node_count += 1;

        let score = evaluate(board);
        if score == WIN_SCORE || score == -WIN_SCORE || depth == self.max_depth {
            return Ok(score - depth as i32);
        }
        if board.is_full() {
            return Ok(0);
        }

        let side = if maximizing {
            Side::Computer
        } else {
            Side::Human
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for column in 0..WIDTH {
            if board.is_column_full(column) {
                continue;
            }
            let score = {
                let mut trial = Trial::play(board, column, side)?;
                self.minimax(&mut trial, depth + 1, !maximizing, alpha, beta)?
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            // the opponent already has a better option elsewhere
            if self.pruning == Pruning::AlphaBeta && alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}
