//! A game between a human and the computer, the human moving first

use log::info;

use crate::board::{Board, GameOutcome, MoveError, Side};
use crate::search::{Difficulty, Pruning, Searcher};

#[derive(Copy, Clone, Debug)]
pub struct Game {
    board: Board,
    difficulty: Difficulty,
    pruning: Pruning,
    to_move: Side,
}

impl Game {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_board(Board::new(), difficulty)
    }

    /// Resumes a game from a position, the side to move following from the number of tiles
    pub fn from_board(board: Board, difficulty: Difficulty) -> Self {
        let to_move = if board.num_moves() % 2 == 0 {
            Side::Human
        } else {
            Side::Computer
        };
        Self {
            board,
            difficulty,
            pruning: Pruning::default(),
            to_move,
        }
    }

    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Clears the board and starts over at a new difficulty
    pub fn restart(&mut self, difficulty: Difficulty) {
        *self = Self::new(difficulty).with_pruning(self.pruning);
        info!("new game at {} difficulty", difficulty);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn outcome(&self) -> GameOutcome {
        self.board.outcome()
    }

    /// Plays the human's tile in a 0-indexed column
    pub fn play_human(&mut self, column: usize) -> Result<GameOutcome, MoveError> {
        self.play(Side::Human, column)
    }

    /// Searches for the computer's move and plays it, returning the column chosen
    pub fn play_computer(&mut self) -> Result<(usize, GameOutcome), MoveError> {
        self.check_turn(Side::Computer)?;

        let mut searcher = Searcher::new(self.difficulty).with_pruning(self.pruning);
        let (score, column) = searcher.search(&mut self.board)?;
        info!(
            "computer plays column {} (score {}, {} nodes)",
            column + 1,
            score,
            searcher.node_count
        );

        let outcome = self.play(Side::Computer, column)?;
        Ok((column, outcome))
    }

    fn check_turn(&self, side: Side) -> Result<(), MoveError> {
        if self.outcome().is_over() {
            return Err(MoveError::GameOver);
        }
        if self.to_move != side {
            return Err(MoveError::NotYourTurn);
        }
        Ok(())
    }

    fn play(&mut self, side: Side, column: usize) -> Result<GameOutcome, MoveError> {
        self.check_turn(side)?;
        self.board.drop_piece(column, side)?;
        self.to_move = side.opponent();

        let outcome = self.outcome();
        if outcome.is_over() {
            info!("game over: {:?}", outcome);
        }
        Ok(outcome)
    }
}
