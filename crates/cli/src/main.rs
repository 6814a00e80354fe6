//! `flowline` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the API server.
//! - `migrate`  — run pending database migrations.
//! - `validate` — validate a workflow draft JSON file.
//! - `run`      — execute a workflow draft's nodes locally and print the verdict.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use engine::{EngineConfig, InMemoryStore, NewWorkflow, PgStore, StepOutcome, WorkflowRunner, WorkflowStore};

#[derive(Parser)]
#[command(
    name = "flowline",
    about = "Run linear API / email / text workflows and keep their pass/fail history",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that executes nodes.
#[derive(Args)]
struct EngineArgs {
    /// Bearer token sent with every API step.
    #[arg(long, env = "FLOWLINE_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Per-request timeout for API steps, in seconds.
    #[arg(long, env = "FLOWLINE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            request_timeout: Some(Duration::from_secs(self.request_timeout_secs)),
            ..EngineConfig::new(self.api_token.clone())
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        /// Postgres URL; workflows are kept in memory when unset.
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Run pending database migrations.
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
    /// Validate a workflow draft JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Execute a workflow draft's nodes once, without storing anything.
    Run {
        /// Path to the workflow JSON file.
        path: PathBuf,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            database_url,
            engine,
        } => {
            let store: Arc<dyn WorkflowStore> = match database_url {
                Some(url) => {
                    let pool = db::pool::create_pool(&url, 10)
                        .await
                        .context("failed to connect to database")?;
                    Arc::new(PgStore::new(pool))
                }
                None => {
                    warn!("DATABASE_URL not set; workflows will not outlive this process");
                    Arc::new(InMemoryStore::new())
                }
            };
            let service = engine.config().build_service(store)?;
            info!("Starting API server on {bind}");
            api::serve(&bind, Arc::new(service)).await?;
        }
        Command::Migrate { database_url } => {
            info!("Running migrations");
            let pool = db::pool::create_pool(&database_url, 2)
                .await
                .context("failed to connect to database")?;
            db::pool::run_migrations(&pool).await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
        Command::Validate { path } => {
            let draft = read_draft(&path)?;
            match draft.validate() {
                Ok(()) => println!("✅ Workflow is valid ({} nodes).", draft.nodes.len()),
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Run { path, engine } => {
            let draft = read_draft(&path)?;
            draft.validate()?;

            let runner = WorkflowRunner::new(engine.config().step_executor()?);
            let report = runner.run(&draft.nodes).await;

            for node in &report.nodes {
                println!("{:<8} {:<6} {}", node.outcome, node.node_type, node.node_id);
            }
            println!("workflow '{}': {}", draft.name, report.outcome);

            if report.outcome == StepOutcome::Failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_draft(path: &Path) -> Result<NewWorkflow> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid workflow JSON in {}", path.display()))
}
