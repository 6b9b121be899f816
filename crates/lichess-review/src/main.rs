//! Lichess game review CLI
//!
//! Fetches a user's games, evaluates every move they played with a local
//! UCI engine, classifies the significant errors and writes an HTML report.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use error_analysis::{advice, AnalysisResult, ErrorSeverity, GameError};
use lichess_review::config::ReviewConfig;
use lichess_review::engine::UciEngine;
use lichess_review::explorer::OpeningExplorer;
use lichess_review::lichess::LichessClient;
use lichess_review::pipeline;
use lichess_review::report;

const USAGE: &str = "Usage: lichess-review --user <name> [--max-games N] \
[--since YYYY-MM-DD] [--until YYYY-MM-DD] [--depth N] [--output FILE]";

#[derive(Debug, PartialEq)]
struct CliArgs {
    user: String,
    max_games: Option<usize>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    depth: Option<u32>,
    output: String,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut user = None;
    let mut max_games = None;
    let mut since = None;
    let mut until = None;
    let mut depth = None;
    let mut output = "chess_analysis_report.html".to_string();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("Missing value for {flag}"))?;
        match flag {
            "--user" => user = Some(value.clone()),
            "--max-games" => {
                max_games = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid --max-games: {value}"))?,
                )
            }
            "--since" => since = Some(parse_date(value)?),
            "--until" => until = Some(parse_date(value)?),
            "--depth" => {
                depth = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid --depth: {value}"))?,
                )
            }
            "--output" => output = value.clone(),
            _ => return Err(format!("Unknown option: {flag}")),
        }
        i += 2;
    }

    Ok(CliArgs {
        user: user.ok_or("--user is required")?,
        max_games,
        since,
        until,
        depth,
        output,
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date (expected YYYY-MM-DD): {value}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let mut config = ReviewConfig::load();
    if let Some(depth) = args.depth {
        config.eval_depth = depth;
    }
    info!(
        engine = %config.engine_path,
        depth = config.eval_depth,
        "Configuration loaded"
    );

    let client = LichessClient::new(&config)?;
    let games = client
        .fetch_user_games(
            &args.user,
            args.max_games.or(Some(10)),
            args.since,
            args.until,
        )
        .await?;
    info!(user = %args.user, games = games.len(), "Fetched games");

    let num_workers = config
        .worker_count
        .unwrap_or_else(|| std::cmp::max(2, num_cpus::get() - 1));
    info!(num_workers, "Starting analysis workers");

    let config = Arc::new(config);
    let explorer = Arc::new(OpeningExplorer::new(&config)?);
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let all_errors: Arc<Mutex<Vec<GameError>>> = Arc::new(Mutex::new(Vec::new()));

    let games_fetched = games.len();
    let mut handles = Vec::with_capacity(games_fetched);

    for game in games {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = config.clone();
        let explorer = explorer.clone();
        let all_errors = all_errors.clone();
        let username = args.user.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit; // Hold until done

            let side = match pipeline::player_side(&game, &username) {
                Some(side) => side,
                None => {
                    warn!(game_id = %game.game_id, "User is not a player in this game, skipping");
                    return;
                }
            };

            // One exclusive engine session per game
            let mut engine =
                match UciEngine::new(&config.engine_path, config.eval_timeout_secs).await {
                    Ok(engine) => engine,
                    Err(e) => {
                        error!(game_id = %game.game_id, error = %e, "Failed to start engine");
                        return;
                    }
                };

            match pipeline::analyze_game(&mut engine, &explorer, &config, &game, side).await {
                Ok(errors) => {
                    let mut sink = all_errors.lock().await;
                    sink.extend(errors);
                }
                Err(e) => {
                    error!(game_id = %game.game_id, error = %e, "Game analysis failed");
                }
            }

            engine.quit().await;
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }

    let errors = Arc::try_unwrap(all_errors)
        .map(|m| m.into_inner())
        .unwrap_or_default();
    let result = AnalysisResult::new(errors, games_fetched);

    info!(
        total = result.errors().len(),
        blunders = result.count_by_severity(ErrorSeverity::Blunder),
        mistakes = result.count_by_severity(ErrorSeverity::Mistake),
        inaccuracies = result.count_by_severity(ErrorSeverity::Inaccuracy),
        avg_cp_loss = format!("{:.0}", result.average_cp_loss()),
        "Analysis complete"
    );
    info!(advice = %advice::suggest(&result), "Training suggestion");

    report::write_report(Path::new(&args.output), &result)?;
    info!(output = %args.output, "Report written");

    Ok(())
}
