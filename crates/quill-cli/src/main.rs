//! Quill CLI - automated drafting and publishing for one platform account
//!
//! Usage:
//!   quill init                Write a default quill.toml
//!   quill draft               Compose an article and save it as a draft
//!   quill publish             Publish queued drafts (bounded per run)
//!   quill follow              Run a bulk follow pass
//!   quill like                Run a bulk like pass
//!
//! Every command prints a JSON report on stdout; failures print a
//! structured error with a timestamp and exit non-zero.

use anyhow::Result;
use clap::{Parser, Subcommand};
use quill_browser::{CdpConfig, CdpDriver, PageDriver};
use quill_compose::{compose, draft};
use quill_core::{DraftReport, QuillConfig, RateLimitSignal, RunError};
use quill_gen::{CompletionClient, RetryPolicy};
use quill_publish::{
    Credentials, EngagementKind, EngagementRunner, PublishOrchestrator, QueueWalker,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about = "Automated article drafting and publishing")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run the browser with a visible window
    #[arg(long)]
    visible: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default quill.toml to a directory
    Init {
        /// Target directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Compose one article and save it as a platform draft
    Draft {
        /// Topic (picked from the catalog when omitted)
        #[arg(long)]
        topic: Option<String>,

        /// Editorial angle (picked from the catalog when omitted)
        #[arg(long)]
        pattern: Option<String>,

        /// Compose only; print the document instead of driving the browser
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish queued drafts, up to the configured quota
    Publish {
        /// Override the per-run publish quota
        #[arg(short = 'n', long)]
        quota: Option<usize>,
    },

    /// Follow authors from a platform search
    Follow,

    /// Like articles from a platform search
    Like,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting tracing subscriber");

    if let Err(e) = run(cli).await {
        let report = RunError::now(&e);
        println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = QuillConfig::load_or_default(&std::env::current_dir()?)?;

    match cli.command {
        Commands::Init { path } => {
            QuillConfig::write_default(&path)?;
            info!(path = %path.display(), "default configuration written");
            Ok(())
        }
        Commands::Draft {
            topic,
            pattern,
            dry_run,
        } => run_draft(config, topic, pattern, dry_run, cli.visible).await,
        Commands::Publish { quota } => run_publish(config, quota, cli.visible).await,
        Commands::Follow => run_engagement(config, EngagementKind::Follow, cli.visible).await,
        Commands::Like => run_engagement(config, EngagementKind::Like, cli.visible).await,
    }
}

fn browser_config(visible: bool) -> CdpConfig {
    CdpConfig {
        headless: !visible,
        ..CdpConfig::default()
    }
}

async fn run_draft(
    config: QuillConfig,
    topic: Option<String>,
    pattern: Option<String>,
    dry_run: bool,
    visible: bool,
) -> Result<()> {
    let topic = topic.unwrap_or_else(|| draft::pick(draft::TOPICS).to_string());
    let pattern = pattern.unwrap_or_else(|| draft::pick(draft::PATTERNS).to_string());

    let client = CompletionClient::from_config(&config.generation)?;
    let retry = RetryPolicy::from_config(&config.generation);
    let document = compose(
        Arc::new(client),
        retry,
        config.compose.clone(),
        &topic,
        &pattern,
    )
    .await?;

    if dry_run {
        println!("{}", document.final_text);
        return Ok(());
    }

    // Credentials are checked before the browser is paid for
    let credentials = Credentials::from_env(&config.platform)?;
    let driver = CdpDriver::launch_with_config(browser_config(visible)).await?;
    let orchestrator = PublishOrchestrator::new(driver, config.platform.clone(), credentials);
    orchestrator
        .run(&document.title, &document.final_text)
        .await?;

    let report = DraftReport {
        title: document.title.clone(),
        topic,
        pattern,
        length: document.final_text.chars().count(),
        finished_at: chrono::Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_publish(config: QuillConfig, quota: Option<usize>, visible: bool) -> Result<()> {
    let mut publish = config.publish.clone();
    if let Some(quota) = quota {
        publish.quota = quota;
    }

    let credentials = Credentials::from_env(&config.platform)?;
    let driver = CdpDriver::launch_with_config(browser_config(visible)).await?;

    // The drafts listing sits behind the login wall
    if let Err(e) = quill_publish::login(&driver, &config.platform.base_url, &credentials).await {
        let _ = driver.close().await;
        return Err(e.into());
    }

    let walker = QueueWalker::new(
        driver,
        config.platform.clone(),
        publish,
        RateLimitSignal::new(),
    );
    let report = walker.run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_engagement(config: QuillConfig, kind: EngagementKind, visible: bool) -> Result<()> {
    let credentials = Credentials::from_env(&config.platform)?;
    let driver = CdpDriver::launch_with_config(browser_config(visible)).await?;

    if let Err(e) = quill_publish::login(&driver, &config.platform.base_url, &credentials).await {
        let _ = driver.close().await;
        return Err(e.into());
    }

    let runner = EngagementRunner::new(
        driver,
        config.platform.clone(),
        config.engagement.clone(),
        RateLimitSignal::new(),
    );
    let report = runner.run(kind).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

