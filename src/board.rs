use anyhow::{anyhow, Context, Result};

use std::fmt;

use crate::{HEIGHT, WIDTH, WIN_LENGTH};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    /// The human player's tile (red)
    PlayerOne,
    /// The computer's tile (yellow)
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// One of the two participants of a game
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    /// The tile this side places on the board
    pub fn cell(self) -> Cell {
        match self {
            Side::Human => Cell::PlayerOne,
            Side::Computer => Cell::PlayerTwo,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameOutcome {
    InProgress,
    PlayerOneWins,
    ComputerWins,
    Draw,
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// Rejected moves, either against the board or against the turn order of a [`Game`]
///
/// Columns are stored 0-indexed and displayed 1-indexed.
///
/// [`Game`]: crate::game::Game
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid move, column {} out of range. Columns must be between 1 and {}", .column.saturating_add(1), WIDTH)]
    InvalidColumn { column: usize },

    #[error("Invalid move, column {} full", .column.saturating_add(1))]
    ColumnFull { column: usize },

    #[error("Invalid move, the game is over")]
    GameOver,

    #[error("Invalid move, it is not this player's turn")]
    NotYourTurn,
}

/// A Connect 4 board stored as a grid of tiles
///
/// Row 0 is the top of the board and row `HEIGHT - 1` the bottom, so tiles
/// settle towards higher row indices. The filled part of every column is a
/// contiguous run from the bottom, which `heights` tracks.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Creates a board from a string of 1-indexed columns, the human moving first
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut side = Side::Human;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    // abort if the position was already won
                    if board.outcome().is_over() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    board
                        .drop_piece(column - 1, side)
                        .with_context(|| format!("could not play move {}", column))?;
                    side = side.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    /// The number of tiles in a column
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// Out of range columns are never playable, so they count as full
    pub fn is_column_full(&self, column: usize) -> bool {
        column >= WIDTH || !self.cells[0][column].is_empty()
    }

    /// Columns that can still take a tile, in ascending order
    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| !self.is_column_full(column))
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Places a tile at the bottom-most empty row of a column, returning that row
    pub fn drop_piece(&mut self, column: usize, side: Side) -> Result<usize, MoveError> {
        if column >= WIDTH {
            return Err(MoveError::InvalidColumn { column });
        }
        if self.is_column_full(column) {
            return Err(MoveError::ColumnFull { column });
        }
        let row = HEIGHT - 1 - self.heights[column];
        debug_assert!(self.cells[row][column].is_empty());

        self.cells[row][column] = side.cell();
        self.heights[column] += 1;
        self.num_moves += 1;
        Ok(row)
    }

    /// Removes the top tile of a column
    ///
    /// # Panics
    /// Panics if the column is empty: every undo must pair with an earlier [`drop_piece`](Self::drop_piece)
    pub fn undo_drop(&mut self, column: usize) {
        assert!(
            column < WIDTH && self.heights[column] > 0,
            "undo on empty column {}",
            column
        );
        let row = HEIGHT - self.heights[column];

        self.cells[row][column] = Cell::Empty;
        self.heights[column] -= 1;
        self.num_moves -= 1;
    }

    /// Checks every window of `WIN_LENGTH` tiles in all four directions for `side`
    pub fn check_winner(&self, side: Side) -> bool {
        let cell = side.cell();
        let run = |row: usize, column: usize, dy: isize, dx: isize| {
            (0..WIN_LENGTH as isize).all(|i| {
                let y = (row as isize + dy * i) as usize;
                let x = (column as isize + dx * i) as usize;
                self.cells[y][x] == cell
            })
        };

        // horizontal
        for row in 0..HEIGHT {
            for column in 0..=WIDTH - WIN_LENGTH {
                if run(row, column, 0, 1) {
                    return true;
                }
            }
        }

        // vertical
        for column in 0..WIDTH {
            for row in 0..=HEIGHT - WIN_LENGTH {
                if run(row, column, 1, 0) {
                    return true;
                }
            }
        }

        // diagonal \
        for row in 0..=HEIGHT - WIN_LENGTH {
            for column in 0..=WIDTH - WIN_LENGTH {
                if run(row, column, 1, 1) {
                    return true;
                }
            }
        }

        // diagonal /
        for row in 0..=HEIGHT - WIN_LENGTH {
            for column in WIN_LENGTH - 1..WIDTH {
                if run(row, column, 1, -1) {
                    return true;
                }
            }
        }

        false
    }

    pub fn outcome(&self) -> GameOutcome {
        if self.check_winner(Side::Human) {
            GameOutcome::PlayerOneWins
        } else if self.check_winner(Side::Computer) {
            GameOutcome::ComputerWins
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        writeln!(f, "{}", columns)?;
        for row in self.cells.iter() {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
