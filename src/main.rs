use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod leaderboard;
mod models;
mod normalize;
mod session;
mod sort;

use crate::models::{AffiliateRecord, QueryConfig, RankedRow, SortOrder, SortState};
use crate::session::{Command, Effect, Phase, Session};

#[derive(Parser)]
#[command(name = "wager-leaderboard")]
#[command(about = "Affiliate wager leaderboard for the LuxDrop stats API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print the ranked leaderboard
    Show {
        #[arg(long, default_value = config::DEFAULT_AFFILIATE_CODE)]
        code: String,
        #[arg(long, default_value = config::DEFAULT_DATE_START)]
        start_date: NaiveDate,
        #[arg(long, default_value = config::DEFAULT_DATE_END)]
        end_date: NaiveDate,
        #[arg(long, default_value = "total_wagered")]
        sort_by: String,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Re-fetch on an interval and print each cycle
    Watch {
        #[arg(long, default_value = config::DEFAULT_AFFILIATE_CODE)]
        code: String,
        #[arg(long, default_value = config::DEFAULT_DATE_START)]
        start_date: NaiveDate,
        #[arg(long, default_value = config::DEFAULT_DATE_END)]
        end_date: NaiveDate,
        #[arg(long, default_value = "total_wagered")]
        sort_by: String,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
    /// Fetch once and write a markdown report
    Report {
        #[arg(long, default_value = config::DEFAULT_AFFILIATE_CODE)]
        code: String,
        #[arg(long, default_value = config::DEFAULT_DATE_START)]
        start_date: NaiveDate,
        #[arg(long, default_value = config::DEFAULT_DATE_END)]
        end_date: NaiveDate,
        #[arg(long, default_value = "total_wagered")]
        sort_by: String,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "leaderboard.md")]
        out: PathBuf,
    },
    /// Fetch once and write ranked rows as CSV
    Export {
        #[arg(long, default_value = config::DEFAULT_AFFILIATE_CODE)]
        code: String,
        #[arg(long, default_value = config::DEFAULT_DATE_START)]
        start_date: NaiveDate,
        #[arg(long, default_value = config::DEFAULT_DATE_END)]
        end_date: NaiveDate,
        #[arg(long, default_value = "total_wagered")]
        sort_by: String,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
        #[arg(long, default_value = "leaderboard.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Show {
            code,
            start_date,
            end_date,
            sort_by,
            order,
            limit,
        } => {
            let query = build_query(code, start_date, end_date);
            let mut session = Session::new(SortState {
                field: sort_by,
                order,
            });
            run_cycle(&client, &query, &mut session, limit).await;
        }
        Commands::Watch {
            code,
            start_date,
            end_date,
            sort_by,
            order,
            limit,
            interval_secs,
        } => {
            let query = build_query(code, start_date, end_date);
            let mut session = Session::new(SortState {
                field: sort_by,
                order,
            });
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

            loop {
                interval.tick().await;
                run_cycle(&client, &query, &mut session, limit).await;

                if matches!(session.phase, Phase::Failed { .. }) {
                    tokio::time::sleep(Duration::from_secs(session::ERROR_DISMISS_SECS as u64))
                        .await;
                    let effects = session.apply(Command::Tick(Utc::now()));
                    handle_effects(&session, effects, limit);
                }
            }
        }
        Commands::Report {
            code,
            start_date,
            end_date,
            sort_by,
            order,
            limit,
            out,
        } => {
            let query = build_query(code, start_date, end_date);
            let sort = SortState {
                field: sort_by,
                order,
            };
            let mut records = load_records(&client, &query)
                .await
                .context("failed to load affiliate data")?;
            sort::sort_records(&mut records, &sort);
            if let Some(limit) = limit {
                records.truncate(limit);
            }

            let rows = leaderboard::build_rows(&records);
            let report = leaderboard::build_report(&query, &sort, &rows);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            code,
            start_date,
            end_date,
            sort_by,
            order,
            out,
        } => {
            let query = build_query(code, start_date, end_date);
            let sort = SortState {
                field: sort_by,
                order,
            };
            let mut records = load_records(&client, &query)
                .await
                .context("failed to load affiliate data")?;
            sort::sort_records(&mut records, &sort);

            let exported = leaderboard::write_csv(&out, &records)?;
            println!("Exported {exported} rows to {}.", out.display());
        }
    }

    Ok(())
}

fn build_query(code: String, start_date: NaiveDate, end_date: NaiveDate) -> QueryConfig {
    QueryConfig {
        affiliate_code: code,
        date_start: start_date.to_string(),
        date_end: end_date.to_string(),
        credential: config::resolve_api_key(),
    }
}

async fn load_records(
    client: &reqwest::Client,
    query: &QueryConfig,
) -> Result<Vec<AffiliateRecord>, api::ApiError> {
    let body = api::fetch_affiliate_stats(client, query).await?;
    Ok(normalize::unwrap_records(&body)
        .iter()
        .map(normalize::normalize_record)
        .collect())
}

async fn run_cycle(
    client: &reqwest::Client,
    query: &QueryConfig,
    session: &mut Session,
    limit: Option<usize>,
) {
    let effects = session.apply(Command::FetchStarted);
    handle_effects(session, effects, limit);

    let command = match load_records(client, query).await {
        Ok(records) => Command::DataLoaded(records),
        Err(e) => {
            tracing::warn!("failed to fetch affiliate stats: {e}");
            Command::LoadFailed {
                message: e.user_message(),
                at: Utc::now(),
            }
        }
    };

    let effects = session.apply(command);
    handle_effects(session, effects, limit);
}

fn handle_effects(session: &Session, effects: Vec<Effect>, limit: Option<usize>) {
    for effect in effects {
        match effect {
            Effect::ShowLoading => {
                tracing::info!("loading affiliate stats...");
            }
            Effect::HideLoading => {}
            Effect::Render => {
                let rows = visible_rows(session, limit);
                println!(
                    "Top affiliates by {} ({}):",
                    session.sort.field,
                    session.sort.order.as_str()
                );
                print!("{}", leaderboard::render_text(&rows));
            }
            Effect::ShowError(message) => {
                eprintln!("ERROR: {message}");
            }
            Effect::HideError => {}
        }
    }
}

fn visible_rows(session: &Session, limit: Option<usize>) -> Vec<RankedRow> {
    let shown = match limit {
        Some(limit) => &session.records[..session.records.len().min(limit)],
        None => &session.records[..],
    };
    leaderboard::build_rows(shown)
}
