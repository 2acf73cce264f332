//! # roster
//!
//! Terminal client for the Roster user directory.
//!
//! ## Commands
//!
//! - `login`: Sign in and store the session token
//! - `logout`: Forget the session token
//! - `status`: Show session and API settings
//! - `list`: List users, with search and paging
//! - `edit`: Change a user's name or email
//! - `delete`: Delete a user
//! - `browse`: Interactive listing with incremental loading
//!
//! ## Example
//!
//! ```bash
//! # Sign in (prompts for the password)
//! roster login --email eve.holt@reqres.in
//!
//! # First page, then everything matching "weaver"
//! roster list
//! roster list --all --search weaver
//!
//! # Change an email, delete a user
//! roster edit 2 --email janet@example.com
//! roster delete 3 --yes
//!
//! # Try it offline against built-in sample data
//! roster --mock login --email demo@example.com --password demo
//! roster --mock browse
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roster_client::{FileTokenStore, HttpApi, MockApi, Session, UserApi, UserListClient};
use roster_types::UserId;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{browse, delete, edit, list, login, logout, status};
use config::{Config, CONFIG_FILE};

/// Size of the built-in sample directory served by `--mock`.
const MOCK_USERS: u64 = 12;
const MOCK_PER_PAGE: usize = 6;

/// Subdirectory of the data directory holding the `--mock` session, so a
/// sample token never replaces a real one.
const MOCK_SESSION_DIR: &str = "mock";

/// Terminal client for the Roster user directory.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the session token and default config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/roster.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Use built-in sample data instead of the network (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email (will prompt if not provided)
        #[arg(long, short)]
        email: Option<String>,

        /// Account password (will prompt if not provided)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Forget the session token
    Logout,

    /// Show session and API settings
    Status,

    /// List users
    List {
        /// Number of pages to load
        #[arg(long, default_value = "1", conflicts_with = "all")]
        pages: usize,

        /// Load every page
        #[arg(long)]
        all: bool,

        /// Only show users whose name or email contains this text
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Change a user's name or email
    Edit {
        /// User id
        id: UserId,

        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a user
    Delete {
        /// User id
        id: UserId,

        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Browse users interactively
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine data directory
    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }
    debug!(config = %config_path.display(), base_url = %config.api.base_url, "configuration loaded");

    let session_dir = session_dir(&data_dir, cli.mock);
    let mut session = Session::load(FileTokenStore::new(&session_dir))
        .await
        .context("Failed to read session")?;

    if cli.mock {
        let api = MockApi::with_users(MOCK_USERS, MOCK_PER_PAGE);
        execute(cli, api, &mut session, &config, &session_dir).await
    } else {
        let api = HttpApi::new(config.http_config())
            .context("Failed to create HTTP client")?
            .with_token(session.token().cloned());
        execute(cli, api, &mut session, &config, &session_dir).await
    }
}

/// Dispatch the parsed command against `api`.
async fn execute<A: UserApi>(
    cli: Cli,
    api: A,
    session: &mut Session<FileTokenStore>,
    config: &Config,
    data_dir: &Path,
) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Login { email, password } => {
            login::run(session, &api, email, password).await?;
        }
        Commands::Logout => {
            logout::run(session).await?;
        }
        Commands::Status => {
            status::run(&mut stdout, session, config, data_dir, cli.mock)?;
        }
        Commands::List { pages, all, search } => {
            commands::require_login(session)?;
            let limit = if all {
                list::PageLimit::All
            } else {
                list::PageLimit::Pages(pages)
            };
            let client = list_client(api, config);
            list::run(&mut stdout, &client, limit, search.as_deref()).await?;
        }
        Commands::Edit {
            id,
            first_name,
            last_name,
            email,
        } => {
            commands::require_login(session)?;
            let changes = edit::Changes {
                first_name,
                last_name,
                email,
            };
            edit::run(&mut stdout, &list_client(api, config), id, changes).await?;
        }
        Commands::Delete { id, yes } => {
            commands::require_login(session)?;
            let mut stdin = std::io::stdin().lock();
            delete::run(&mut stdin, &mut stdout, &list_client(api, config), id, yes).await?;
        }
        Commands::Browse => {
            commands::require_login(session)?;
            let mut stdin = std::io::stdin().lock();
            browse::run(&mut stdin, &mut stdout, &list_client(api, config)).await?;
        }
    }

    Ok(())
}

fn list_client<A: UserApi>(api: A, config: &Config) -> UserListClient<A> {
    UserListClient::with_backfill_threshold(api, config.list.backfill_threshold)
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,roster=debug,roster_client=debug,roster_core=debug"
    } else {
        "warn"
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Where the session file lives. `--mock` sessions are kept apart.
fn session_dir(data_dir: &Path, mock: bool) -> PathBuf {
    if mock {
        data_dir.join(MOCK_SESSION_DIR)
    } else {
        data_dir.to_path_buf()
    }
}

/// Get the default data directory for roster.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "roster", "roster")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
