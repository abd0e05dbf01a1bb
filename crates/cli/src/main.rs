mod config;
mod error;

use std::path::PathBuf;

use broadcast::{Broadcaster, TelegramSender};
use clap::{Parser, Subcommand};
use db::{Database, params};
use telemetry::stats;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "mela.toml";

#[derive(Parser)]
#[command(name = "mela")]
#[command(about = "Festival info service admin tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the service tables if they do not exist
    Init,
    /// Run a single SQL statement and print the result
    Query {
        /// The statement to execute
        sql: String,
    },
    /// Store an announcement and broadcast it to every known user
    Announce {
        title: String,
        message: String,
    },
    /// Print usage statistics
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let db = Database::new(config.database.clone())?;

    match cli.command {
        Commands::Init => cmd_init(&db).await,
        Commands::Query { sql } => cmd_query(&db, &sql).await,
        Commands::Announce { title, message } => {
            cmd_announce(&db, &config, &title, &message).await
        }
        Commands::Stats => cmd_stats(&db).await,
    }
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        telegram_id INTEGER UNIQUE,
        username TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        last_active TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS telemetry (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        action TEXT NOT NULL,
        metadata TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS announcements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
];

async fn cmd_init(db: &Database) -> Result<()> {
    for statement in SCHEMA {
        db.execute(statement, params![]).await?;
    }
    println!("Tables initialized.");
    Ok(())
}

async fn cmd_query(db: &Database, sql: &str) -> Result<()> {
    let result = db.execute(sql, params![]).await?;

    if result.cols().is_empty() {
        println!("OK ({} rows affected)", result.affected_row_count());
        return Ok(());
    }

    println!("{}", result.cols().join(" | "));
    for row in result.into_tuples() {
        let cells: Vec<String> = row.iter().map(cell_display).collect();
        println!("{}", cells.join(" | "));
    }
    Ok(())
}

fn cell_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn cmd_announce(db: &Database, config: &Config, title: &str, message: &str) -> Result<()> {
    db.execute_write(
        "INSERT INTO announcements (title, message, created_at) VALUES (?, ?, datetime('now'))",
        params![title, message],
    )
    .await?;

    let sender = config.telegram.bot_token.clone().map(TelegramSender::new);
    let broadcaster = Broadcaster::new(db.clone(), sender);
    let outcome = broadcaster.broadcast(title, message).await;

    println!(
        "Broadcast complete. Sent: {}, failed: {}",
        outcome.sent, outcome.failed
    );
    Ok(())
}

async fn cmd_stats(db: &Database) -> Result<()> {
    let snapshot = stats::snapshot(db).await?;

    println!("Total users:  {}", snapshot.total_users);
    println!("Active (24h): {}", snapshot.active_24h);

    if !snapshot.top_events.is_empty() {
        println!("\nTop events:");
        for entry in &snapshot.top_events {
            println!("  {:<32} {}", entry.name, entry.views);
        }
    }

    if !snapshot.daily_activity.is_empty() {
        println!("\nInteractions per day:");
        for day in &snapshot.daily_activity {
            println!("  {}  {}", day.date, day.count);
        }
    }

    Ok(())
}
