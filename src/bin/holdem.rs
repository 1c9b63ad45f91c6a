use holdem_engine::action::Decision;
use holdem_engine::config::TableConfig;
use holdem_engine::deck::SeededShuffler;
use holdem_engine::engine::{MemoryRejoinStore, Table};
use holdem_engine::game::{GameError, GameState};
use holdem_engine::player::{Outcome, PlayerId};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
commands (one per line):
  ready <id>          toggle readiness in the lobby
  join <id> | leave <id>
  fold <id> | call <id> | raise <id> <amount> | allin <id>
  end                 finish the hand on display
  next                deal the next hand
  hole <id>           show a player's hole cards
  show                print the table
  quit";

fn parse_args() -> Result<(u64, Vec<PlayerId>), String> {
    let mut seed = None;
    let mut players = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse::<u64>().map_err(|e| format!("bad seed {value}: {e}"))?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => players.push(PlayerId::from(arg)),
        }
    }
    Ok((seed.unwrap_or(0), players))
}

fn print_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> io::Result<()> {
    match serde_json::to_string(value) {
        Ok(json) => writeln!(out, "{json}"),
        Err(e) => writeln!(out, "error: {e}"),
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let (seed, players) = match parse_args() {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };
    let state = match GameState::new(TableConfig::default(), format!("cli-{seed}"), players) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("cannot open table: {e}");
            return Ok(());
        }
    };
    let reporter = |session: &str, outcomes: &[(PlayerId, Outcome)]| {
        for (id, outcome) in outcomes {
            eprintln!("[{session}] {id}: {}", outcome.label());
        }
    };
    let mut table = Table::new(state, SeededShuffler::new(seed), reporter, MemoryRejoinStore::new());

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "holdem-engine {} (seed {seed})", holdem_engine::VERSION)?;
    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let result: Result<_, GameError> = match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => {
                writeln!(out, "{USAGE}")?;
                continue;
            }
            ["show"] => {
                print_json(&mut out, &table.snapshot())?;
                continue;
            }
            ["hole", id] => {
                match table.hole_cards(&PlayerId::from(*id)) {
                    Some(hole) => writeln!(out, "{id}: {} {}", hole.first(), hole.second())?,
                    None => writeln!(out, "{id} has no cards")?,
                }
                continue;
            }
            ["ready", id] => table.ready(*id),
            ["join", id] => table.join(*id),
            ["leave", id] => table.leave(*id),
            ["fold", id] => table.act(*id, Decision::Fold),
            ["call", id] | ["check", id] => table.act(*id, Decision::CheckOrCall),
            ["allin", id] => table.act(*id, Decision::AllIn),
            ["raise", id, amount] => match amount.parse::<u64>() {
                Ok(n) => table.act(*id, Decision::Raise(n)),
                Err(e) => {
                    writeln!(out, "error: bad amount {amount}: {e}")?;
                    continue;
                }
            },
            ["end"] => table.end_hand(),
            ["next"] => table.next_hand(),
            _ => {
                writeln!(out, "unknown command: {line}")?;
                continue;
            }
        };
        match result {
            Ok(effects) => {
                for effect in &effects {
                    print_json(&mut out, effect)?;
                }
                print_json(&mut out, &table.snapshot())?;
            }
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    Ok(())
}
