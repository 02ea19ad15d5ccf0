//! Pair Admin - operator client for country-pair messaging routes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pair_admin::api::{ApiClient, ApiError, NumberList, RouteAction};
use pair_admin::config::{AdminConfig, ConfigError, ConfigLoader, ConfigSource};
use pair_admin::display;
use pair_admin::routes::{
    ActionDispatcher, CacheError, CreationPanel, PriorityCache, RefreshReason,
    ReorderCoordinator, ReorderError, ReorderOutcome, SubmitOutcome,
};
use pair_admin::session::{SessionError, SessionStore};
use pair_admin::stats::{RouteStats, StatsError, StatsView};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Start,
    Stop,
    Restart,
}

impl From<ActionArg> for RouteAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Start => RouteAction::Start,
            ActionArg::Stop => RouteAction::Stop,
            ActionArg::Restart => RouteAction::Restart,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pair-admin",
    about = "Manage country-pair messaging routes",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token.
    Signin {
        /// Email or username.
        identifier: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// List routes in priority order.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Create a route.
    Create {
        /// Pair name, e.g. "uk-de".
        pair_name: String,
        /// Proxy address for the route.
        proxy: String,
        /// File with the route's phone numbers.
        #[arg(long)]
        numbers: Option<PathBuf>,
    },
    /// Start, stop or restart a route.
    Action {
        #[arg(value_enum)]
        action: ActionArg,
        /// Pair name.
        pair_name: String,
    },
    /// Move a route to a new position (1-based, as shown by `list`).
    Move { from: usize, to: usize },
    /// Show overall stats, or one route's stats.
    Stats {
        /// Pair name; omit for overall stats.
        pair_name: Option<String>,
    },
    /// Overwrite a route's stats record.
    StatsSet {
        pair_name: String,
        #[arg(long)]
        sent: u64,
        #[arg(long)]
        failed: u64,
        /// Success rate in percent.
        #[arg(long)]
        success_rate: f64,
        /// Failure rate in percent.
        #[arg(long)]
        failure_rate: f64,
    },
    /// Delete a route's stats record.
    StatsDelete { pair_name: String },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Action(#[from] pair_admin::routes::ActionError),
    #[error("{0}")]
    Stats(#[from] StatsError),
    #[error("{0}")]
    Rejected(String),
    #[error("Position {0} is not valid; positions start at 1")]
    Position(usize),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<AdminConfig, ConfigError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let (mut config, source) = loader.load()?;
    match source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Loaded config file");
        }
        ConfigSource::Defaults => {
            tracing::debug!(searched = ?loader.search_paths(), "No config file found, using defaults");
        }
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    Ok(config)
}

fn to_index(position: usize) -> Result<usize, CliError> {
    position.checked_sub(1).ok_or(CliError::Position(position))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let sessions = SessionStore::new(config.storage.session_path());
    tracing::debug!(base_url = %config.api.base_url, "Loaded configuration");

    match cli.command {
        Commands::Signin {
            identifier,
            password,
        } => {
            let client = ApiClient::new(&config.api, None)?;
            let session = client.sign_in(&identifier, &password).await?;
            sessions.save(&session)?;
            let who = session.user.as_deref().unwrap_or(&identifier).to_string();
            display::print_ok(&format!("Signed in as {who}"));
        }
        Commands::Logout => {
            if sessions.clear()? {
                display::print_ok("Signed out");
            } else {
                display::print_ok("No stored session");
            }
        }
        Commands::List { json } => {
            let coordinator = coordinator(&config, &sessions)?;
            let routes = coordinator.refresh(RefreshReason::Mount).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                display::print_routes(&routes);
            }
        }
        Commands::Create {
            pair_name,
            proxy,
            numbers,
        } => {
            let client = ApiClient::new(&config.api, sessions.resolve()?)?;
            let mut panel = CreationPanel::new();
            panel.open();
            panel.set_pair_name(pair_name.as_str());
            panel.set_proxy(proxy);
            if let Some(path) = numbers {
                panel.attach_number_list(NumberList::from_path(&path)?);
            }
            if let SubmitOutcome::Rejected(message) = panel.submit(&client).await {
                return Err(CliError::Rejected(message));
            }
            display::print_ok(&format!("Created {pair_name}"));

            let coordinator = coordinator(&config, &sessions)?;
            display::print_routes(&coordinator.refresh(RefreshReason::PanelClosed).await?);
        }
        Commands::Action { action, pair_name } => {
            let client = ApiClient::new(&config.api, sessions.resolve()?)?;
            let dispatcher = ActionDispatcher::new(Arc::new(client));
            let action = RouteAction::from(action);
            dispatcher.dispatch(action, &pair_name).await?;
            display::print_ok(&format!("{action} sent to {pair_name}"));
        }
        Commands::Move { from, to } => {
            let (source, destination) = (to_index(from)?, to_index(to)?);
            let coordinator = coordinator(&config, &sessions)?;
            coordinator.refresh(RefreshReason::Mount).await?;
            match coordinator.reorder(source, Some(destination)).await? {
                ReorderOutcome::Persisted { updated } => {
                    display::print_ok(&format!("Saved new order ({updated} routes)"));
                }
                ReorderOutcome::Unchanged | ReorderOutcome::Superseded => {}
            }
            display::print_routes(&coordinator.routes().await);
        }
        Commands::Stats { pair_name } => {
            let client = ApiClient::new(&config.api, sessions.resolve()?)?;
            let view = StatsView::new(&client, config.health.clone());
            match pair_name {
                Some(name) => display::print_route_stats(&view.route(&name).await?),
                None => display::print_aggregate(&view.overall().await?),
            }
        }
        Commands::StatsSet {
            pair_name,
            sent,
            failed,
            success_rate,
            failure_rate,
        } => {
            let client = ApiClient::new(&config.api, sessions.resolve()?)?;
            let view = StatsView::new(&client, config.health.clone());
            let stats = RouteStats {
                total_sms_sent: sent,
                total_sms_failed: failed,
                total_rate_of_success: success_rate,
                total_rate_of_failure: failure_rate,
            };
            display::print_route_stats(&view.update(&pair_name, &stats).await?);
        }
        Commands::StatsDelete { pair_name } => {
            let client = ApiClient::new(&config.api, sessions.resolve()?)?;
            let view = StatsView::new(&client, config.health.clone());
            view.delete(&pair_name).await?;
            display::print_ok(&format!("Deleted stats for {pair_name}"));
        }
    }
    Ok(())
}

fn coordinator(
    config: &AdminConfig,
    sessions: &SessionStore,
) -> Result<ReorderCoordinator, CliError> {
    let client = ApiClient::new(&config.api, sessions.resolve()?)?;
    let cache = PriorityCache::load_or_empty(config.storage.priority_cache_path());
    Ok(ReorderCoordinator::new(Arc::new(client), cache))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        display::print_error(&e.to_string());
        std::process::exit(1);
    }
}
