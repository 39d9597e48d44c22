//! Senji CLI - Command-line admin console for the Senji store.
//!
//! # Usage
//!
//! ```bash
//! # Credentials come from SENJI_ADMIN_EMAIL / SENJI_ADMIN_PASSWORD or flags
//! senji dashboard
//! senji products list --category shirts
//! senji products add --name "Classic Tee" --price 10 --category Shirts --size S=5 --image tee.png
//! senji products edit 665f1c2a --size M=3 --remove-size S
//! senji orders set-status 665f1c2a Shipped
//!
//! # Interactive session reusing one login
//! senji shell
//! ```
//!
//! # Commands
//!
//! - `me` - Show the signed-in admin
//! - `dashboard` - Store totals and recent orders
//! - `customers` - Customer list
//! - `products` - List, add, edit and delete products
//! - `categories` - List, add, edit and delete categories
//! - `orders` - List orders, show one, change status
//! - `shell` - Interactive session
//!
//! # Logging
//!
//! `RUST_LOG` overrides the default filter; `SENJI_LOG_FORMAT=json` switches
//! to structured output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use senji_admin::config::{ConfigError, ConsoleConfig, LoginCredentials};

mod commands;

use commands::{CliError, Command, Console};

#[derive(Parser)]
#[command(name = "senji")]
#[command(author, version, about = "Senji store admin console")]
struct Cli {
    /// Admin email (overrides SENJI_ADMIN_EMAIL)
    #[arg(long, global = true)]
    email: Option<String>,

    /// Admin password (overrides SENJI_ADMIN_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: TopCommand,
}

#[derive(Subcommand)]
enum TopCommand {
    #[command(flatten)]
    Console(Command),
    /// Start an interactive session
    Shell,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
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
        .unwrap_or_else(|_| "senji_admin=info,senji_cli=info".into());

    let is_json = std::env::var("SENJI_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Flags win over the environment; both fields must end up set.
fn resolve_credentials(cli: &Cli, config: &ConsoleConfig) -> Result<LoginCredentials, ConfigError> {
    let configured = config.credentials.as_ref();
    let email = cli
        .email
        .clone()
        .or_else(|| configured.map(|c| c.email.clone()))
        .ok_or_else(|| ConfigError::MissingEnvVar("SENJI_ADMIN_EMAIL".to_string()))?;
    let password = cli
        .password
        .clone()
        .map(SecretString::from)
        .or_else(|| configured.map(|c| c.password.clone()))
        .ok_or_else(|| ConfigError::MissingEnvVar("SENJI_ADMIN_PASSWORD".to_string()))?;
    Ok(LoginCredentials { email, password })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before Sentry and tracing can start
    let config = ConsoleConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ConsoleConfig) -> Result<(), CliError> {
    let credentials = resolve_credentials(&cli, config)?;
    let mut console = Console::connect(config, &credentials).await?;

    let result = match cli.command {
        TopCommand::Console(command) => match console.execute(command).await {
            Ok(output) => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(output.as_bytes()).map_err(CliError::from)
            }
            Err(e) => Err(e),
        },
        TopCommand::Shell => commands::shell::run(&mut console).await,
    };

    match &result {
        Err(e) if e.requires_login() => console.expire(),
        _ => console.close().await,
    }
    result
}
