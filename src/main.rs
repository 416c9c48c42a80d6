use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdin, stdout, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use connect4_minimax::*;

mod render;

/// Play Connect 4 against a minimax computer opponent.
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against the computer")]
struct Cli {
    /// Difficulty of the computer: easy, medium or hard (asked for when omitted)
    #[arg(long, short)]
    difficulty: Option<Difficulty>,

    /// Minimum time the computer spends thinking, in milliseconds
    #[arg(long, default_value_t = 1000)]
    think_ms: u64,

    /// Search every branch instead of pruning with alpha-beta
    #[arg(long)]
    exhaustive: bool,
}

fn main() -> Result<()> {
    // logs share the terminal with the board, so keep them quiet unless asked for
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let stdin = stdin();
    let mut input = stdin.lock();
    let think_time = Duration::from_millis(cli.think_ms);
    let pruning = if cli.exhaustive {
        Pruning::Exhaustive
    } else {
        Pruning::AlphaBeta
    };

    println!("Welcome to Connect 4\n");

    let difficulty = match cli.difficulty {
        Some(difficulty) => difficulty,
        None => match choose_difficulty(&mut input)? {
            Some(difficulty) => difficulty,
            None => return Ok(()),
        },
    };
    let mut game = Game::new(difficulty).with_pruning(pruning);

    // game loop
    loop {
        render::display(game.board())?;

        match game.outcome() {
            GameOutcome::InProgress => match game.to_move() {
                Side::Human => {
                    // end of input quits the game
                    let input_str = match prompt(&mut input, "Move input > ")? {
                        Some(line) => line,
                        None => break,
                    };

                    let column = match input_str.trim().parse::<usize>() {
                        Ok(column @ 1..=WIDTH) => column - 1,
                        _ => {
                            println!(
                                "Invalid move '{}'. Columns must be between 1 and {}",
                                input_str.trim(),
                                WIDTH
                            );
                            continue;
                        }
                    };
                    if let Err(err) = game.play_human(column) {
                        println!("{}", err);
                        // try the move again
                        continue;
                    }
                }
                Side::Computer => {
                    let column = computer_turn(&mut game, think_time)?;
                    println!("Computer plays column {}", column + 1);
                }
            },

            // end states
            outcome => {
                match outcome {
                    GameOutcome::PlayerOneWins => println!("Player 1 wins!"),
                    GameOutcome::ComputerWins => println!("Computer wins!"),
                    _ => println!("It's a draw!"),
                }
                if !ask_yes_no(&mut input, "Play again? y/n: ")? {
                    break;
                }
                match choose_difficulty(&mut input)? {
                    Some(difficulty) => game.restart(difficulty),
                    None => break,
                }
            }
        }
    }
    Ok(())
}

/// Runs the computer's search on a worker thread, spinning for at least `think_time`
fn computer_turn(game: &mut Game, think_time: Duration) -> Result<usize> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
    spinner.set_message(&format!("AI is thinking ({})...", game.difficulty()));
    spinner.enable_steady_tick(100);

    let start = Instant::now();
    let mut worker_game = *game;
    let worker = thread::spawn(move || {
        let result = worker_game.play_computer();
        (worker_game, result)
    });
    let (next_game, result) = worker
        .join()
        .map_err(|_| anyhow!("search thread panicked"))?;

    let elapsed = start.elapsed();
    if elapsed < think_time {
        thread::sleep(think_time - elapsed);
    }
    spinner.finish_and_clear();

    let (column, _outcome) = result?;
    *game = next_game;
    Ok(column)
}

/// Prints a prompt and reads one line, `None` once the input is closed
fn prompt<R: BufRead>(input: &mut R, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    stdout().flush()?;
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(buffer))
}

fn choose_difficulty<R: BufRead>(input: &mut R) -> Result<Option<Difficulty>> {
    loop {
        let buffer = match prompt(input, "Select difficulty (easy/medium/hard) [medium]: ")? {
            Some(buffer) => buffer,
            None => return Ok(None),
        };

        if buffer.trim().is_empty() {
            return Ok(Some(Difficulty::default()));
        }
        match buffer.parse::<Difficulty>() {
            Ok(difficulty) => return Ok(Some(difficulty)),
            Err(err) => println!("{}", err),
        }
    }
}

/// Asks until the answer starts with y or n, a closed input counting as no
fn ask_yes_no<R: BufRead>(input: &mut R, text: &str) -> Result<bool> {
    loop {
        let buffer = match prompt(input, text)? {
            Some(buffer) => buffer,
            None => return Ok(false),
        };

        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use std::io::Cursor;

    use super::*;

    #[test]
    pub fn closed_input() -> Result<()> {
        assert_eq!(prompt(&mut Cursor::new(""), "> ")?, None);
        assert_eq!(choose_difficulty(&mut Cursor::new(""))?, None);
        assert!(!ask_yes_no(&mut Cursor::new(""), "? ")?);

        // unknown answers are asked again until the input runs out
        assert_eq!(choose_difficulty(&mut Cursor::new("expert\n"))?, None);
        assert!(!ask_yes_no(&mut Cursor::new("maybe\n"), "? ")?);
        Ok(())
    }

    #[test]
    pub fn answers() -> Result<()> {
        assert_eq!(prompt(&mut Cursor::new("4\n"), "> ")?, Some("4\n".to_string()));
        assert_eq!(choose_difficulty(&mut Cursor::new("\n"))?, Some(Difficulty::Medium));
        assert_eq!(
            choose_difficulty(&mut Cursor::new("expert\nhard\n"))?,
            Some(Difficulty::Hard)
        );
        assert!(ask_yes_no(&mut Cursor::new("Yes\n"), "? ")?);
        assert!(!ask_yes_no(&mut Cursor::new("x\nn\n"), "? ")?);
        Ok(())
    }
}
