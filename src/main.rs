use std::collections::BTreeMap;

use clap::{Args, Parser, Subcommand};
use fib_twenty_fourty_eight::{
    Direction, Engine, GameConfig, Turn,
    engine::ManualClock,
    tui,
};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fibonacci 2048 in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively
    Play(GameArgs),
    /// Play random games and report how they ended
    Simulate {
        #[command(flatten)]
        game: GameArgs,

        /// Number of games to play
        #[arg(short, long, default_value_t = 100)]
        games: u64,

        /// Moves after which a game is abandoned
        #[arg(long, default_value_t = 10_000)]
        max_moves: u32,
    },
}

#[derive(Args, Debug)]
struct GameArgs {
    /// Cells along each side of the board
    #[arg(short, long, default_value_t = 4)]
    dimension: usize,

    /// Value of the winning tile
    #[arg(short, long, default_value_t = 987)]
    threshold: u32,

    /// Remaining moves at the start of a game
    #[arg(long, default_value_t = 130)]
    moves: u32,

    /// Seed for tile placement
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

impl GameArgs {
    fn config(&self) -> GameConfig {
        GameConfig {
            dimension: self.dimension,
            threshold: self.threshold,
            initial_remaining_moves: self.moves,
            ..GameConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => {
            match tui::play(args.config(), args.seed)? {
                Some(Turn::Won(at)) => println!("Won at {at:?}"),
                Some(Turn::Lost) => println!("Lost"),
                _ => {}
            }
            Ok(())
        }
        Command::Simulate {
            game,
            games,
            max_moves,
        } => simulate(&game, games, max_moves),
    }
}

#[derive(Debug, Default)]
struct Tally {
    won: u64,
    lost: u64,
    abandoned: u64,
    highest: BTreeMap<u32, u64>,
}

fn simulate(args: &GameArgs, games: u64, max_moves: u32) -> anyhow::Result<()> {
    let config = args.config();
    let mut tally = Tally::default();

    let progress = ProgressBar::new(games);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} games [{elapsed_precise}, eta {eta}]",
    )?);

    for game in 0..games {
        let seed = args.seed.wrapping_add(game);
        let turn = play_random_game(config.clone(), seed, max_moves, &mut tally)?;
        match turn {
            Turn::Won(_) => tally.won += 1,
            Turn::Lost => tally.lost += 1,
            Turn::Continue => tally.abandoned += 1,
        }
        progress.inc(1);
    }

    progress.finish_and_clear();

    println!(
        "won: {}, lost: {}, abandoned: {}",
        tally.won, tally.lost, tally.abandoned
    );
    for (tile, count) in &tally.highest {
        println!("{tile:>5}: {count}");
    }

    Ok(())
}

fn play_random_game(
    config: GameConfig,
    seed: u64,
    max_moves: u32,
    tally: &mut Tally,
) -> anyhow::Result<Turn> {
    let clock = ManualClock::new();
    let mut engine = Engine::new(config, (), StdRng::seed_from_u64(seed), clock.clone());
    let mut policy = StdRng::seed_from_u64(!seed);
    engine.start();

    let mut turn = Turn::Continue;
    'game: for _ in 0..max_moves {
        let direction = Direction::ALL[policy.random_range(0..Direction::ALL.len())];
        engine.queue_move(direction)?;

        for outcome in engine.take_outcomes() {
            if outcome.changed {
                turn = engine.settle_turn();
                if turn != Turn::Continue {
                    break 'game;
                }
            }
        }

        // Lets the next move run straight away
        clock.advance(engine.config().queue_delay);
    }

    log::debug!("Game {seed} ended with {turn:?}:\n{:?}", engine.board());
    *tally.highest.entry(engine.user_has_reached()).or_default() += 1;

    Ok(turn)
}
