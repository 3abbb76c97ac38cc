//! # Postwire CLI
//!
//! Compose, validate, publish, and schedule social posts against a remote
//! posting backend, and run the due-post sweeper that auto-executes
//! anything past its scheduled time.
//!
//! Usage:
//!   postwire list                          # Show the scheduled-post mirror
//!   postwire publish -c "hello" -m pic.png # Post now
//!   postwire schedule -c "hi" --date 2026-09-01 --hour 5 --minute 30 --pm
//!   postwire execute <id>                  # Fire a scheduled post now
//!   postwire delete <id>                   # Remove a scheduled post
//!   postwire watch                         # Sweep every 60s until Ctrl-C
//!   postwire login --username jo --access-token T --access-token-secret S

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use postwire_client::ApiClient;
use postwire_composer::{Composer, Meridiem, ScheduleBuilder};
use postwire_core::types::{ExecuteOutcome, MediaFile, Platform, TwitterCredentials};
use postwire_core::{PostBackend, PostwireConfig};
use postwire_scheduler::{AlertReporter, PostStore, refresh_and_sweep, spawn_sweeper};

#[derive(Parser)]
#[command(name = "postwire", version, about = "Schedule and publish social posts")]
struct Cli {
    /// Backend base URL (overrides config and POSTWIRE_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List scheduled and completed posts
    List,
    /// Publish a post immediately
    Publish {
        /// Message text
        #[arg(short, long, default_value = "")]
        content: String,
        /// Media files to attach
        #[arg(short, long)]
        media: Vec<PathBuf>,
        /// Shorten over-limit content to fit before submitting
        #[arg(long)]
        truncate: bool,
    },
    /// Schedule a post for later
    Schedule {
        #[arg(short, long, default_value = "")]
        content: String,
        #[arg(short, long)]
        media: Vec<PathBuf>,
        /// Shorten over-limit content to fit before submitting
        #[arg(long)]
        truncate: bool,
        /// Exact timestamp (RFC 3339); overrides the field flags below
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Calendar date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Hour, 12-hour form (1-12)
        #[arg(long)]
        hour: Option<u32>,
        #[arg(long)]
        minute: Option<u32>,
        #[arg(long)]
        second: Option<u32>,
        /// Schedule in the afternoon (PM); default is AM
        #[arg(long)]
        pm: bool,
    },
    /// Execute a scheduled post now
    Execute { id: String },
    /// Delete a scheduled post
    Delete { id: String },
    /// Run the periodic due-post sweeper until interrupted
    Watch,
    /// Store the Twitter session used for authenticated posting
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        access_token_secret: String,
    },
    /// Forget the stored Twitter session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "postwire=debug"
    } else {
        "postwire=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let mut config = PostwireConfig::load()?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    tracing::debug!("Using posting backend at {}", config.api_base);
    let client = ApiClient::new(&config);
    let mut reporter = AlertReporter::new();

    match cli.command {
        Command::List => {
            let mut store = PostStore::new();
            let (refresh, report) = refresh_and_sweep(&mut store, &client).await;
            if refresh.is_err() {
                reporter.warning("Could not load scheduled posts. Using local data.");
            }
            if let Some(report) = &report
                && !report.executed.is_empty()
            {
                println!("Auto-executed {} past-due post(s)", report.executed.len());
            }
            print_posts(&store);
        }
        Command::Publish {
            content,
            media,
            truncate,
        } => {
            let draft = build_draft(&config, &content, &media, truncate, &mut reporter)?;
            match client.publish(&draft).await {
                Ok(outcome) => {
                    reporter.success(
                        outcome
                            .message
                            .clone()
                            .unwrap_or_else(|| "Post published successfully!".into()),
                    );
                    print_results(&outcome);
                }
                Err(e) => reporter.failure(&e),
            }
        }
        Command::Schedule {
            content,
            media,
            truncate,
            at,
            date,
            hour,
            minute,
            second,
            pm,
        } => {
            let when = at.unwrap_or_else(|| {
                let mut builder = ScheduleBuilder::now();
                if let Some(date) = date {
                    builder.set_date(date);
                }
                builder.set_meridiem(if pm { Meridiem::Pm } else { Meridiem::Am });
                if let Some(hour) = hour {
                    builder.set_hour(hour);
                }
                if let Some(minute) = minute {
                    builder.set_minute(minute);
                }
                if let Some(second) = second {
                    builder.set_second(second);
                }
                builder.build()
            });
            let draft = build_draft(&config, &content, &media, truncate, &mut reporter)?;
            match client.schedule(&draft, when).await {
                Ok(outcome) => {
                    reporter.success(
                        outcome
                            .message
                            .clone()
                            .unwrap_or_else(|| "Post scheduled successfully!".into()),
                    );
                    if let Some(id) = &outcome.post_id {
                        println!(
                            "Scheduled {} for {}",
                            id,
                            when.with_timezone(&Local).format("%b %e, %Y %r")
                        );
                    }
                }
                Err(e) => reporter.failure(&e),
            }
        }
        Command::Execute { id } => match client.execute(&id).await {
            Ok(outcome) => {
                reporter.success(
                    outcome
                        .message
                        .clone()
                        .unwrap_or_else(|| "Post executed successfully!".into()),
                );
                print_results(&outcome);
            }
            Err(e) => reporter.failure(&e),
        },
        Command::Delete { id } => {
            let mut store = PostStore::new();
            if store.refresh(&client).await.is_err() {
                reporter.warning("Could not load scheduled posts. Using local data.");
            }
            match store.remove(&id, &client).await {
                Ok(message) => reporter.success(message),
                Err(e) => reporter.failure(&e),
            }
        }
        Command::Watch => {
            let store = Arc::new(Mutex::new(PostStore::new()));
            let backend: Arc<dyn PostBackend> = Arc::new(ApiClient::new(&config));
            let shared_reporter = Arc::new(Mutex::new(AlertReporter::new()));
            let handle = spawn_sweeper(
                store.clone(),
                backend,
                shared_reporter.clone(),
                config.sweep_interval_secs,
            );
            println!(
                "Watching for due posts every {}s. Press Ctrl-C to stop.",
                config.sweep_interval_secs
            );
            tokio::signal::ctrl_c().await?;
            handle.stop().await;
            print_posts(&*store.lock().await);
            reporter = Arc::try_unwrap(shared_reporter)
                .map(|m| m.into_inner())
                .unwrap_or_default();
        }
        Command::Login {
            username,
            name,
            access_token,
            access_token_secret,
        } => {
            config.twitter = Some(TwitterCredentials {
                username: username.clone(),
                name,
                access_token,
                access_token_secret,
            });
            config.save()?;
            reporter.success(format!("Connected Twitter account @{username}"));
        }
        Command::Logout => {
            config.twitter = None;
            config.save()?;
            reporter.info("Twitter session removed");
        }
    }

    render_feedback(&reporter);
    Ok(())
}

/// Run the composer over the CLI inputs and produce a submittable draft.
/// With `truncate`, over-limit content is shortened to fit and an info
/// alert says so.
fn build_draft(
    config: &PostwireConfig,
    content: &str,
    media: &[PathBuf],
    truncate: bool,
    reporter: &mut AlertReporter,
) -> Result<postwire_core::types::PostDraft> {
    let mut composer = Composer::new(config.twitter_authenticated());
    composer
        .select(Platform::Twitter)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    composer.set_content(content);
    if truncate && composer.auto_truncate() {
        tracing::info!("Content truncated to fit the character limit");
        reporter.info("Content has been truncated to fit the character limit");
    }

    if !media.is_empty() {
        let mut files = Vec::with_capacity(media.len());
        for path in media {
            let data = std::fs::read(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".into());
            let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
            files.push(MediaFile::new(name, mime, data));
        }
        composer.attach(files).map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    composer
        .into_draft(config.twitter.clone())
        .map_err(|e| anyhow::anyhow!("{e}"))
}

fn print_posts(store: &PostStore) {
    if store.is_empty() {
        println!("No scheduled posts yet");
        return;
    }
    let now = Utc::now();
    for post in store.posts() {
        let platforms: Vec<&str> = post.platforms.iter().map(|p| p.as_str()).collect();
        let when = post.scheduled_time.with_timezone(&Local);
        let past_due = if post.is_due(now) { " (past due)" } else { "" };
        println!(
            "{}  {:9?}  {}{}  [{}]  {}",
            post.id,
            post.status,
            when.format("%Y-%m-%d %H:%M:%S"),
            past_due,
            platforms.join(","),
            post.content
        );
    }
}

/// Print the per-platform results map the way the backend reports it.
fn print_results(outcome: &ExecuteOutcome) {
    let Some(results) = &outcome.results else {
        return;
    };
    for (platform, result) in results {
        let mark = if result.success { "ok" } else { "failed" };
        match &result.url {
            Some(url) => println!("  {platform}: {mark} - {} ({url})", result.message),
            None => println!("  {platform}: {mark} - {}", result.message),
        }
    }
}

/// Show the final alert and any active rate-limit cool-down.
fn render_feedback(reporter: &AlertReporter) {
    if let Some(alert) = reporter.current(Utc::now()) {
        println!("[{:?}] {}", alert.severity, alert.message);
    }
    if let Some(limit) = reporter.rate_limit() {
        println!(
            "Rate limit active: {}. Try again after {}.",
            limit.message,
            limit.resets_at.with_timezone(&Local).format("%r")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postwire_scheduler::Severity;

    fn authed_config() -> PostwireConfig {
        PostwireConfig {
            twitter: Some(TwitterCredentials {
                username: "jo".into(),
                name: String::new(),
                access_token: "tok".into(),
                access_token_secret: "sec".into(),
            }),
            ..PostwireConfig::default()
        }
    }

    #[test]
    fn truncate_flag_shortens_and_informs() {
        let mut reporter = AlertReporter::new();
        let long = "x".repeat(300);
        let draft = build_draft(&authed_config(), &long, &[], true, &mut reporter).unwrap();
        assert_eq!(draft.content.chars().count(), 280);
        assert!(draft.content.ends_with("..."));
        let alert = reporter.current(Utc::now()).unwrap();
        assert_eq!(alert.severity, Severity::Info);
        assert!(alert.message.contains("truncated"));
    }

    #[test]
    fn over_limit_without_truncate_flag_is_rejected() {
        let mut reporter = AlertReporter::new();
        let long = "x".repeat(300);
        assert!(build_draft(&authed_config(), &long, &[], false, &mut reporter).is_err());
        assert!(reporter.current(Utc::now()).is_none());
    }
}
