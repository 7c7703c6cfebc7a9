use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use mathionary_core::{
    DeckValues, GameSession, KeyValueStore, Operator, SMALL_DECK_SIZE, STORAGE_KEY, SessionConfig, TileIndex,
};

use crate::command::Command;
use crate::store::FileStore;

mod command;
mod store;
mod view;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Operator to play with: + - * / or their names
    #[arg(short, long)]
    operator: Option<Operator>,

    /// Number of tiles in a deck
    #[arg(long, default_value_t = SMALL_DECK_SIZE)]
    size: TileIndex,

    /// Deal random 1-9 tiles instead of the keypad digits
    #[arg(long)]
    random: bool,

    /// Directory the game is saved in
    #[arg(long, default_value = ".mathionary")]
    state: PathBuf,

    /// Start a new game even if one is saved
    #[arg(long)]
    fresh: bool,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let seed = self.seed.unwrap_or_else(clock_seed);
        log::debug!("seed: {}", seed);
        let deck_values = if self.random {
            DeckValues::Random
        } else {
            DeckValues::Keypad
        };
        SessionConfig::new(seed)
            .with_operator(self.operator.unwrap_or_default())
            .with_deck(self.size, deck_values)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn start(args: &Args, store: &mut FileStore) -> anyhow::Result<GameSession> {
    let config = args.session_config();
    if args.fresh {
        store.remove(STORAGE_KEY);
        return GameSession::new(config).context("Could not deal a deck");
    }

    let mut session = GameSession::load_or_new(&*store, config).context("Could not deal a deck")?;
    if let Some(operator) = args.operator
        && operator != session.operator()
    {
        session.switch_operator(operator)?;
    }
    Ok(session)
}

/// Runs one command, returns the line to show or `None` to quit.
fn apply(session: &mut GameSession, command: Command) -> anyhow::Result<Option<String>> {
    let message = match command {
        Command::Click(index) => {
            let outcome = session
                .click(index)
                .with_context(|| format!("No tile {index}"))?;
            view::outcome(&outcome, session.level())
        }
        Command::Reveal => {
            let solutions = session.reveal_solutions();
            view::solutions(&solutions, session.operator())
        }
        Command::Operator(operator) => {
            session.switch_operator(operator)?;
            format!("Now playing {operator}")
        }
        Command::Reset => {
            session.reset()?;
            "New deck".to_string()
        }
        Command::Help => command::HELP.to_string(),
        Command::Quit => return Ok(None),
    };
    Ok(Some(message))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let mut store = FileStore::new(&args.state);
    let mut session = start(&args, &mut store)?;
    log::info!("Game saved under {}", args.state.display());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n{}> ", view::render(&session));
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let command = match command::parse(&line?) {
            Ok(command) => command,
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };

        match apply(&mut session, command) {
            Ok(Some(message)) => println!("{message}"),
            Ok(None) => break,
            Err(err) => println!("{err:#}"),
        }
        session.save(&mut store);
    }

    session.save(&mut store);
    Ok(())
}
