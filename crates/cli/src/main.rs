//! Meract CLI - Platform administration from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from MERACT_PASSWORD or prompt-free flag)
//! meract sign-in -e admin@meract.app
//!
//! # Block three users one after another
//! meract users bulk block 4 8 15
//!
//! # Terminate a stream and show the refreshed list
//! meract streams terminate 42
//!
//! # Follow a stream's chat
//! meract streams chat 42 --follow
//! ```
//!
//! # Environment Variables
//!
//! - `MERACT_API_URL` - Backend base URL (required)
//! - `MERACT_STATE_DIR` - Where the session file lives
//! - `MERACT_LOG_JSON` - Emit JSON logs
//! - `SENTRY_DSN` - Enable error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use meract_admin::ConsoleConfig;
use sentry::integrations::tracing as sentry_tracing;
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Console;

#[derive(Parser)]
#[command(name = "meract")]
#[command(author, version, about = "Meract admin console")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an admin
    SignIn {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MERACT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    SignOut,
    /// Show the signed-in admin
    Whoami,
    /// Check whether the stored session is still valid
    Check,
    /// Show the sections available to the signed-in admin
    Menu,
    /// Platform counters and recent activity
    Dashboard,
    /// Manage platform users
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// Manage guilds
    Guilds {
        #[command(subcommand)]
        action: commands::guilds::GuildsAction,
    },
    /// Moderate live streams
    Streams {
        #[command(subcommand)]
        action: commands::streams::StreamsAction,
    },
    /// Manage ranks
    Ranks {
        #[command(subcommand)]
        action: commands::ranks::RanksAction,
    },
    /// Manage achievements
    Achievements {
        #[command(subcommand)]
        action: commands::achievements::AchievementsAction,
    },
    /// Manage admin accounts (main admin only)
    Admins {
        #[command(subcommand)]
        action: commands::admins::AdminsAction,
    },
    /// Print the public URL of an uploaded file
    ImageUrl {
        /// Upload category (`guild`, `stream`, ...)
        category: String,
        file_name: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.expose_secret(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meract_admin=info,meract_cli=info".into());

    let json = std::env::var_os("MERACT_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be up before the subscriber so the layer has a client.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::open(config, cli.json)?;
    match cli.command {
        Commands::SignIn { email, password } => {
            commands::auth::sign_in(&console, &email, password).await?;
        }
        Commands::SignOut => commands::auth::sign_out(&console)?,
        Commands::Whoami => commands::auth::whoami(&console)?,
        Commands::Check => commands::auth::check(&console).await?,
        Commands::Menu => commands::auth::menu(&console)?,
        Commands::Dashboard => commands::dashboard::show(&console).await?,
        Commands::Users { action } => commands::users::run(&console, action).await?,
        Commands::Guilds { action } => commands::guilds::run(&console, action).await?,
        Commands::Streams { action } => commands::streams::run(&console, action).await?,
        Commands::Ranks { action } => commands::ranks::run(&console, action).await?,
        Commands::Achievements { action } => commands::achievements::run(&console, action).await?,
        Commands::Admins { action } => commands::admins::run(&console, action).await?,
        Commands::ImageUrl {
            category,
            file_name,
        } => console.print_line(&console.api().image_url(&category, &file_name))?,
    }
    Ok(())
}
