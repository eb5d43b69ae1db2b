use std::{
    io::{self, BufRead, Write as _},
    path::{Path, PathBuf},
};

use rand::{Rng, seq::IndexedRandom as _};

use noughts_engine::{Board, CanonicalTable, Move, Player, SIZE};
use noughts_training::{
    genetic::{self, TrainConfig},
    strategy::StrategyTable,
};

use crate::{
    command::DEFAULT_STRATEGY_PATH,
    schema::{self, StrategyModel},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Strategy file to play against
    #[arg(long, default_value = DEFAULT_STRATEGY_PATH)]
    strategy: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            strategy: PathBuf::from(DEFAULT_STRATEGY_PATH),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let table = CanonicalTable::build();
    let strategy = load_or_train(&arg.strategy, &table)?;

    let mut rng = rand::rng();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Welcome to Tic Tac Toe against the AI!");
    print_cell_index_help();
    loop {
        play_one_game(&strategy, &table, &mut rng, &mut input)?;
        println!("Game over.");
        if !prompt_yes_no(&mut input, "Play again? (y/n): ")? {
            return Ok(());
        }
        print_cell_index_help();
    }
}

/// Loads the persisted strategy; an absent file is not an error and
/// triggers a fresh training run with the default configuration.
fn load_or_train(path: &Path, table: &CanonicalTable) -> anyhow::Result<StrategyTable> {
    match util::read_json_file_opt::<StrategyModel, _>("strategy", path)? {
        Some(model) => schema::from_model(&model, table),
        None => {
            eprintln!(
                "No strategy file at {}; training a new one",
                path.display()
            );
            let mut rng = rand::rng();
            let strategy = genetic::train(&TrainConfig::default(), table, &mut rng)?;
            Output::save_json(&schema::to_model(&strategy, table), Some(path.to_path_buf()))?;
            eprintln!("Strategy saved to {}", path.display());
            Ok(strategy)
        }
    }
}

fn play_one_game<R>(
    strategy: &StrategyTable,
    table: &CanonicalTable,
    rng: &mut R,
    input: &mut impl BufRead,
) -> anyhow::Result<()>
where
    R: Rng + ?Sized,
{
    let mut board = Board::EMPTY;
    let mut mover = Player::X;
    loop {
        if mover == Player::X {
            let mv = ai_move(strategy, table, &board, rng);
            println!("AI plays {mv}");
            board
                .place(mv, mover)
                .expect("the AI move targets an empty cell");
        } else {
            let mv = prompt_user_move(input, &board)?;
            board
                .place(mv, mover)
                .expect("the prompt only accepts empty cells");
        }
        println!("{board}");

        if let Some(winner) = board.winner() {
            match winner {
                Player::X => println!("AI wins!"),
                Player::O => println!("Congratulations! You won!"),
            }
            return Ok(());
        }
        if board.is_full() {
            println!("It's a draw!");
            return Ok(());
        }
        mover = mover.opponent();
    }
}

/// Picks the AI's move: the strategy entry for the canonical state, or a
/// uniformly random legal move when the entry is absent or targets an
/// occupied cell on the live board.
fn ai_move<R>(
    strategy: &StrategyTable,
    table: &CanonicalTable,
    board: &Board,
    rng: &mut R,
) -> Move
where
    R: Rng + ?Sized,
{
    let state = table.canonicalize_board(board);
    let legal = board.legal_moves();
    if let Some(mv) = strategy.lookup(table, state)
        && legal.contains(&mv)
    {
        return mv;
    }
    println!("Fallback to a random move (no usable strategy entry).");
    *legal
        .choose(rng)
        .expect("an ongoing game always has a legal move")
}

fn print_cell_index_help() {
    println!("-------------");
    for row in 0..SIZE {
        for col in 0..SIZE {
            print!("| {} ", row * SIZE + col);
        }
        println!("|");
        println!("-------------");
    }
}

fn prompt_user_move(input: &mut impl BufRead, board: &Board) -> anyhow::Result<Move> {
    loop {
        print!("Enter your move (0-8): ");
        io::stdout().flush()?;
        let Some(line) = read_line(input)? else {
            anyhow::bail!("stdin closed while waiting for a move");
        };
        let Ok(index) = line.trim().parse::<usize>() else {
            println!("Invalid input. Please enter a number.");
            continue;
        };
        if index >= SIZE * SIZE {
            println!("Invalid move. Try again.");
            continue;
        }
        #[expect(clippy::cast_possible_truncation)]
        let mv = Move::new((index / SIZE) as u8, (index % SIZE) as u8)
            .expect("indices 0-8 are on the board");
        if board.legal_moves().contains(&mv) {
            return Ok(mv);
        }
        println!("Invalid move. Try again.");
    }
}

fn prompt_yes_no(input: &mut impl BufRead, prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let answer = read_line(input)?;
    Ok(answer.is_some_and(|line| line.trim().eq_ignore_ascii_case("y")))
}

/// Reads one line from the input, returning `None` at end of input.
fn read_line(input: &mut impl BufRead) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}
