//! sr-admin: Stock Roulette admin CLI.
//!
//! Usage:
//!   sr-admin [OPTIONS] <COMMAND>
//!
//! Commands:
//!   login         Authenticate and store the bearer token
//!   logout        Drop the stored token
//!   sessions      List sessions, with optional filters
//!   delete        Delete a session by id
//!   reset         Reset a session by id
//!   archive       Archive a session by id
//!   leaderboard   Show the player leaderboard
//!   export        Download a CSV export
//!
//! Every command except `login` goes through the navigation guard first:
//! a stored token is re-applied if present, and unauthenticated access is
//! turned away with a pointer to `login`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use roulette_common::{SessionFilterUpdate, StatusFilter};

use roulette_admin::api::{AdminApi, AuthSession, TokenStore};
use roulette_admin::config::AdminConfig;
use roulette_admin::export::{ExportKind, Exporter};
use roulette_admin::routes::{AdminRoute, Navigation, guard};
use roulette_admin::store::{LeaderboardStore, SessionStore};

/// CLI arguments for sr-admin.
#[derive(Parser, Debug)]
#[command(name = "sr-admin")]
#[command(about = "Stock Roulette admin client")]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config/admin.toml")]
    config: PathBuf,

    /// Admin API base URL (overrides config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory export files are written into (overrides config file)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate against the admin API and store the bearer token
    Login {
        /// Admin login name
        username: String,
        /// Admin password
        password: String,
    },
    /// Drop the stored token and the authenticated state
    Logout,
    /// List sessions, with optional filters
    Sessions {
        /// Case-insensitive substring match on the player nickname
        #[arg(long)]
        player: Option<String>,
        /// Status filter: all, active, ended, finished
        #[arg(long)]
        status: Option<StatusFilter>,
        /// Inclusive lower bound on the start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive upper bound on the start date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Delete a session by id
    Delete {
        /// Session identifier
        id: String,
    },
    /// Reset a session by id
    Reset {
        /// Session identifier
        id: String,
    },
    /// Archive a session by id
    Archive {
        /// Session identifier
        id: String,
    },
    /// Show the player leaderboard, best score first
    Leaderboard,
    /// Download a CSV export
    Export {
        /// Export kind: sessions or all
        kind: ExportKind,
    },
}

impl Command {
    /// Route the command navigates to.
    fn route(&self) -> AdminRoute {
        match self {
            Command::Login { .. } | Command::Logout => AdminRoute::Login,
            Command::Leaderboard => AdminRoute::Leaderboard,
            _ => AdminRoute::Sessions,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let args = Args::parse();

    // Load configuration
    let mut config = if args.config.exists() {
        AdminConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?
    } else {
        AdminConfig::default()
    };

    config.apply_env_overrides();
    config.apply_cli_overrides(args.api_url, args.export_dir);

    // Initialize logging
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global tracing subscriber")?;

    config.validate().context("Configuration validation failed")?;

    let api = Arc::new(AdminApi::new(config.base_url.clone()));
    let tokens = TokenStore::new(config.token_path.clone());
    let mut auth = AuthSession::new(api.clone(), tokens);

    // Gate the command behind the navigation guard.
    match guard(args.command.route(), &mut auth) {
        Navigation::Proceed(_) => {}
        Navigation::RedirectToLogin => {
            bail!("Not authenticated. Run `sr-admin login <username> <password>` first.");
        }
    }

    match args.command {
        Command::Login { username, password } => {
            if auth.login(&username, &password).await {
                info!("Logged in");
                Ok(())
            } else {
                match auth.error {
                    Some(message) => bail!(message),
                    None => bail!("Login rejected by the server"),
                }
            }
        }
        Command::Logout => {
            auth.logout();
            Ok(())
        }
        Command::Sessions {
            player,
            status,
            from,
            to,
        } => {
            let mut store = SessionStore::new(api);
            store.set_filters(SessionFilterUpdate {
                player,
                status,
                date_from: from.map(Some),
                date_to: to.map(Some),
            });
            store.fetch_sessions().await;
            if let Some(message) = store.error {
                bail!(message);
            }
            print_sessions(&store);
            Ok(())
        }
        Command::Delete { id } => {
            let mut store = SessionStore::new(api);
            store.delete_session(&id).await;
            match store.error {
                Some(message) => bail!(message),
                None => {
                    info!(session_id = %id, "Session deleted");
                    Ok(())
                }
            }
        }
        Command::Reset { id } => {
            let mut store = SessionStore::new(api);
            store.reset_session(&id).await;
            match store.error {
                Some(message) => bail!(message),
                None => {
                    info!(session_id = %id, "Session reset");
                    Ok(())
                }
            }
        }
        Command::Archive { id } => {
            let mut store = SessionStore::new(api);
            store.archive_session(&id).await;
            match store.error {
                Some(message) => bail!(message),
                None => {
                    info!(session_id = %id, "Session archived");
                    Ok(())
                }
            }
        }
        Command::Leaderboard => {
            let mut store = LeaderboardStore::new(api);
            store.fetch_leaderboard().await;
            if let Some(message) = store.error {
                bail!(message);
            }
            print_leaderboard(&store);
            Ok(())
        }
        Command::Export { kind } => {
            let mut exporter = Exporter::new(api, config.export_dir.clone());
            match exporter.export_data(kind).await {
                Some(path) => {
                    println!("Export written to {}", path.display());
                    Ok(())
                }
                None => match exporter.error {
                    Some(message) => bail!(message),
                    None => bail!("Failed to export data"),
                },
            }
        }
    }
}

/// Print the filtered session collection as a table.
fn print_sessions(store: &SessionStore) {
    let filtered = store.filtered_sessions();
    if filtered.is_empty() {
        println!("No sessions match the current filters.");
        return;
    }

    println!(
        "{:<38} {:<16} {:<10} {:>10} {:>8} {:>10} {:>7}  {}",
        "SESSION", "PLAYER", "STATUS", "BALANCE", "SCORE", "PROFIT", "TRADES", "STARTED"
    );
    for session in &filtered {
        println!(
            "{:<38} {:<16} {:<10} {:>10} {:>8} {:>10} {:>7}  {}",
            session.session_id,
            session.player_nickname,
            session.status,
            session.balance,
            session.total_score,
            session.total_profit,
            session.total_trades,
            session.started_at.format("%Y-%m-%d %H:%M"),
        );
    }
    println!("{} of {} sessions shown", filtered.len(), store.sessions.len());

    if filtered.len() < store.sessions.len() {
        warn!(
            hidden = store.sessions.len() - filtered.len(),
            "Some sessions are hidden by filters"
        );
    }
}

/// Print the leaderboard ordered by total score, highest first.
fn print_leaderboard(store: &LeaderboardStore) {
    let sorted = store.sorted_leaderboard();
    if sorted.is_empty() {
        println!("Leaderboard is empty.");
        return;
    }

    println!(
        "{:<6} {:<16} {:>8} {:>10} {:>7} {:>9} {:>10} {:>9}",
        "RANK", "PLAYER", "SCORE", "PROFIT", "TRADES", "SESSIONS", "AVG SCORE", "WIN RATE"
    );
    for entry in &sorted {
        println!(
            "{:<6} {:<16} {:>8} {:>10} {:>7} {:>9} {:>10.1} {:>8.0}%",
            entry.rank,
            entry.nickname,
            entry.total_score,
            entry.total_profit,
            entry.total_trades,
            entry.sessions_played,
            entry.average_score,
            entry.win_rate * 100.0,
        );
    }
}
