//! pinpod - CLI tool for PinPod landing-page analytics
//!
//! This tool provides commands for:
//! - Checking tracker, collector and backend configuration
//! - Replaying recorded page visits through the event tracker
//! - Registering early-access users and listing registrations
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/pinpod/config.toml (~/.config/pinpod/config.toml)
//! - Logs: $XDG_STATE_HOME/pinpod/pinpod.log (~/.local/state/pinpod/pinpod.log)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use pinpod_core::collector::{DeliveryStats, NullSink};
use pinpod_core::format::{format_duration_ms, format_relative_time};
use pinpod_core::registration::{submit_early_access, BackendClient, EarlyAccessForm};
use pinpod_core::tracker::{ReplayScript, Tracker};
use pinpod_core::{Config, Dispatcher, Event, EventSink, PageInfo, SessionSummary};

#[derive(Parser)]
#[command(name = "pinpod")]
#[command(about = "PinPod landing-page analytics and early-access tooling")]
#[command(version)]
struct Args {
    /// Write logs to the state directory
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show tracker, collector and backend configuration
    Status,

    /// Run a recorded page visit through the tracker
    Replay {
        /// Replay script: {"page": {...}, "signals": [...]}
        script: PathBuf,

        /// Do not deliver events even if the collector is enabled
        #[arg(long)]
        no_send: bool,

        /// Print the session summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register for early access
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        interest: String,

        /// Page URL recorded with the registration analytics row
        #[arg(long, default_value = "")]
        page_url: String,
    },

    /// List registered early-access users
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = if args.verbose {
        Some(pinpod_core::logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    match args.command {
        Command::Status => cmd_status(&config),
        Command::Replay {
            script,
            no_send,
            json,
        } => cmd_replay(config, &script, no_send, json).await,
        Command::Register {
            name,
            email,
            phone,
            interest,
            page_url,
        } => {
            let form = EarlyAccessForm {
                name,
                email,
                phone,
                interest,
            };
            cmd_register(&config, &form, page_url).await
        }
        Command::Users => cmd_users(&config).await,
    }
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("PinPod Configuration");
    println!("====================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!("Log file:        {}", Config::log_path().display());

    let tracker = &config.tracker;
    println!();
    println!("Tracker");
    println!("  Form:          #{} ({})", tracker.form_id, tracker.form_name);
    println!("  Sections:      {}", tracker.sections.join(", "));
    println!("  Dev hosts:     {}", tracker.dev_hosts.join(", "));

    let collector = &config.collector;
    println!();
    println!("Collector");
    println!("  Enabled:       {}", collector.enabled);
    if collector.enabled {
        println!(
            "  Endpoint:      {}",
            collector.endpoint_url().as_deref().unwrap_or("<not set>")
        );
        println!("  Transport:     {}", collector.transport.as_str());
        println!("  Timeout:       {}s", collector.timeout_secs);
        if let Err(e) = collector.validate() {
            println!("  Status:        Not ready ({})", e);
        } else {
            println!("  Status:        Ready to deliver");
        }
    } else {
        println!("  Events are recorded locally only. Enable delivery in config.toml:");
        println!();
        println!("    [collector]");
        println!("    enabled = true");
        println!("    base_url = \"https://pinpod.example.com\"");
    }

    let backend = &config.backend;
    println!();
    println!("Backend");
    println!("  Enabled:       {}", backend.enabled);
    if backend.enabled {
        println!(
            "  URL:           {}",
            backend.url.as_deref().unwrap_or("<not set>")
        );
        println!(
            "  Anon key:      {}",
            if backend.anon_key.is_some() {
                "<set>"
            } else {
                "<not set>"
            }
        );
        println!(
            "  Tables:        {}, {}, {}",
            backend.users_table, backend.analytics_table, backend.feedback_table
        );
        if backend.is_ready() {
            println!("  Status:        Ready");
        } else {
            println!("  Status:        Not ready (missing required configuration)");
        }
    }

    Ok(())
}

async fn cmd_replay(config: Config, script_path: &Path, no_send: bool, json: bool) -> Result<()> {
    let script = ReplayScript::load(script_path)
        .with_context(|| format!("failed to load replay script {}", script_path.display()))?;

    tracing::info!(
        script = %script_path.display(),
        signals = script.signals.len(),
        no_send,
        "Replaying visit"
    );

    let dispatcher = if no_send {
        None
    } else {
        Dispatcher::new(&config.collector).context("failed to create dispatcher")?
    };

    let (summary, events, stats) = match &dispatcher {
        Some(dispatcher) => {
            let (summary, events) = run_script(script, &config, dispatcher);
            dispatcher.shutdown().await;
            (summary, events, Some(dispatcher.stats()))
        }
        None => {
            let (summary, events) = run_script(script, &config, NullSink);
            (summary, events, None)
        }
    };

    tracing::info!(
        session_id = %summary.session_id,
        events = summary.events,
        delivered = ?stats.map(|s| s.delivered),
        "Replay finished"
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
        );
        return Ok(());
    }

    print_replay(&summary, &events, stats);
    Ok(())
}

fn run_script<S: EventSink>(
    script: ReplayScript,
    config: &Config,
    sink: S,
) -> (SessionSummary, Vec<Event>) {
    let mut tracker = Tracker::new(script.page, config.tracker.clone(), sink);
    for signal in script.signals {
        tracker.handle(signal);
    }
    (tracker.summary(), tracker.events().to_vec())
}

fn print_replay(summary: &SessionSummary, events: &[Event], stats: Option<DeliveryStats>) {
    println!("Session {}", summary.session_id);
    println!();
    for event in events {
        let payload = serde_json::Value::Object(event.payload().clone());
        println!("  {:<18} {}", event.name(), payload);
    }

    println!();
    println!("Summary:");
    println!("  Events:           {}", summary.events);
    println!("  Page views:       {}", summary.page_views);
    println!("  Button clicks:    {}", summary.button_clicks);
    println!("  Form submissions: {}", summary.form_submissions);
    println!("  Duration:         {}", format_duration_ms(summary.duration_ms));

    match stats {
        Some(stats) => {
            println!();
            println!("Delivery:");
            println!("  Queued:     {}", stats.queued);
            println!("  Delivered:  {}", stats.delivered);
            println!("  Failed:     {}", stats.failed);
        }
        None => {
            println!();
            println!("Events were not delivered (collector disabled or --no-send).");
        }
    }
}

async fn cmd_register(config: &Config, form: &EarlyAccessForm, page_url: String) -> Result<()> {
    form.validate()?;

    if !config.backend.is_ready() {
        println!("Backend is not configured. Run 'status' for details.");
        return Ok(());
    }

    let client =
        BackendClient::new(config.backend.clone()).context("failed to create backend client")?;
    let page = PageInfo::new(page_url)
        .with_user_agent(concat!("pinpod-cli/", env!("CARGO_PKG_VERSION")));

    tracing::info!(email = %form.email, interest = %form.interest, "Submitting registration");
    let rows = submit_early_access(&client, form, &page)
        .await
        .context("registration failed")?;

    println!(
        "Registered {} <{}> for early access ({} row(s) stored)",
        form.name,
        form.email,
        rows.len()
    );
    Ok(())
}

async fn cmd_users(config: &Config) -> Result<()> {
    if !config.backend.is_ready() {
        println!("Backend is not configured. Run 'status' for details.");
        return Ok(());
    }

    let client =
        BackendClient::new(config.backend.clone()).context("failed to create backend client")?;
    let users = client.list_users().await.context("failed to list users")?;
    tracing::debug!(count = users.len(), "Fetched registered users");

    if users.is_empty() {
        println!("No registered users.");
        return Ok(());
    }

    println!("Early-Access Registrations");
    println!("==========================");
    println!();
    println!(
        "{:<20} {:<28} {:<12} {:<10} {:>12}",
        "Name", "Email", "Interest", "Status", "Registered"
    );
    println!("{:-<86}", "");

    let now = Utc::now();
    for user in &users {
        println!(
            "{:<20} {:<28} {:<12} {:<10} {:>12}",
            truncate(&user.name, 20),
            truncate(&user.email, 28),
            truncate(&user.interest, 12),
            user.status,
            format_relative_time(user.created_at, now)
        );
    }

    println!();
    println!("{} registration(s)", users.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
