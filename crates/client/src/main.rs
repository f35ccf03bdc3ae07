//! `crosswordcoach-play`: practice crossword entries in the terminal.
//!
//! Type a guess and press enter. An empty line gives up (showing the answer);
//! a second empty line moves on. Commands:
//!
//! ```text
//! :source NYT     only entries from this source (`:source` alone clears)
//! :day 1          only entries from that weekday, 0 = Sunday (needs a source)
//! :length 3 7     answer length range, inclusive (`:length` alone clears)
//! :clear          remove all filters
//! :explain        explain the current entry
//! :restart        back to the first entry for this filter
//! :quit
//! ```

use std::sync::Arc;

use anyhow::Context;
use crosswordcoach_core::types::{AnswerLengthRange, EntryFilterOptions};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crosswordcoach_client::api::HttpCoachApi;
use crosswordcoach_client::coach::{Coach, GuessOutcome};
use crosswordcoach_client::config::ClientConfig;
use crosswordcoach_client::explanation::ExplanationStatus;
use crosswordcoach_client::progress::ProgressTracker;
use crosswordcoach_client::session::{EntrySession, EntryView};
use crosswordcoach_client::storage::FileStorage;

type PlayCoach = Coach<FileStorage>;

enum Command {
    Guess(String),
    GiveUpOrNext,
    Filter(EntryFilterOptions),
    Explain,
    Restart,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crosswordcoach_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    tracing::info!(api = %config.api_base_url, page_size = config.page_size, "Loaded client configuration");

    let api = Arc::new(HttpCoachApi::new(&config.api_base_url, &config.entries_path));
    let progress = ProgressTracker::new(FileStorage::new(&config.progress_file));
    let session = EntrySession::new(progress, config.page_size, config.entry_buffer);
    let mut coach = Coach::new(api, session);

    coach.select_filter(EntryFilterOptions::default());
    coach.wait_until_ready().await;
    render(&coach);

    let mut gave_up = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match parse_command(line.trim(), coach.session().filter()) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Guess(guess) => match coach.submit_guess(&guess) {
                GuessOutcome::Correct => {
                    println!("Correct!");
                    gave_up = false;
                    coach.next_entry();
                }
                GuessOutcome::Incorrect => {
                    println!("Not quite.");
                    continue;
                }
                GuessOutcome::NoEntry => {}
            },
            Command::GiveUpOrNext => {
                if gave_up {
                    gave_up = false;
                    coach.next_entry();
                } else if let Some(entry) = coach.give_up() {
                    println!("The answer was {}.", entry.answer);
                    gave_up = true;
                    continue;
                }
            }
            Command::Filter(filter) => {
                gave_up = false;
                coach.select_filter(filter);
            }
            Command::Explain => {
                coach.explain();
                coach.wait_for_explanation().await;
                match coach.explanation() {
                    ExplanationStatus::Shown(text) => println!("{text}"),
                    ExplanationStatus::Unavailable => println!("No explanation available."),
                    ExplanationStatus::Hidden | ExplanationStatus::Loading => {}
                }
                continue;
            }
            Command::Restart => {
                gave_up = false;
                coach.restart();
            }
        }

        coach.wait_until_ready().await;
        render(&coach);
    }

    Ok(())
}

fn parse_command(input: &str, current: &EntryFilterOptions) -> Result<Command, String> {
    let Some(rest) = input.strip_prefix(':') else {
        return Ok(if input.is_empty() {
            Command::GiveUpOrNext
        } else {
            Command::Guess(input.to_string())
        });
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("quit" | "q", []) => Ok(Command::Quit),
        ("explain", []) => Ok(Command::Explain),
        ("restart", []) => Ok(Command::Restart),
        ("clear", []) => Ok(Command::Filter(EntryFilterOptions::default())),
        ("source", []) => Ok(Command::Filter(EntryFilterOptions {
            source: None,
            day_of_week: None,
            ..current.clone()
        })),
        ("source", [source]) => Ok(Command::Filter(EntryFilterOptions {
            source: Some(source.to_string()),
            ..current.clone()
        })),
        ("day", []) => Ok(Command::Filter(EntryFilterOptions {
            day_of_week: None,
            ..current.clone()
        })),
        ("day", [day]) => {
            if current.source.is_none() {
                return Err("Pick a source first with :source.".to_string());
            }
            let day: u8 = day
                .parse()
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| "Day must be 0 (Sunday) to 6 (Saturday).".to_string())?;
            Ok(Command::Filter(EntryFilterOptions {
                day_of_week: Some(day),
                ..current.clone()
            }))
        }
        ("length", []) => Ok(Command::Filter(EntryFilterOptions {
            answer_length: None,
            ..current.clone()
        })),
        ("length", [min, max]) => {
            let (Ok(min), Ok(max)) = (min.parse::<u32>(), max.parse::<u32>()) else {
                return Err("Lengths must be non-negative integers.".to_string());
            };
            if min > max {
                return Err("The minimum length must not exceed the maximum.".to_string());
            }
            Ok(Command::Filter(EntryFilterOptions {
                answer_length: Some(AnswerLengthRange { min, max }),
                ..current.clone()
            }))
        }
        _ => Err(format!("Unknown command ':{rest}'.")),
    }
}

fn render(coach: &PlayCoach) {
    let score = coach.score();
    let accuracy = score
        .accuracy()
        .map(|a| format!("{a:.0}%"))
        .unwrap_or_else(|| "-".to_string());

    match coach.view() {
        EntryView::Loading => println!("Loading..."),
        EntryView::NoEntriesLeft => {
            println!("No entries left for this filter. Try :restart or another filter.")
        }
        EntryView::Entry(entry) => {
            println!();
            println!("{}  ({} letters)", entry.clue, entry.answer.chars().count());
            println!(
                "streak {}  correct {}/{}  accuracy {accuracy}",
                score.streak, score.correct, score.total
            );
        }
    }
}
