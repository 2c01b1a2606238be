use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "startupquest-api")]
#[command(about = "Lesson and rubric API for StartupQuest, with a gated admin sync surface")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Run the standalone job worker loop
    Worker(WorkerArgs),
    /// Sync rubric and lesson files straight into the database
    Seed(SeedArgs),
    /// Ask a running API to sync, the way the admin page does
    Publish(PublishArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    #[command(flatten)]
    pub gate: GateArgs,

    #[command(flatten)]
    pub content: ContentArgs,

    #[arg(long, env = "DATABASE_PATH", default_value = "startupquest.redb")]
    pub database_path: PathBuf,

    // Bound of the in-process job queue
    #[arg(long, env = "JOB_QUEUE_CAPACITY", default_value_t = 100)]
    pub job_queue_capacity: usize,
}

// Admin gate settings, all env-backed
#[derive(Args, Debug, Clone)]
pub struct GateArgs {
    // Expected x-admin-key value; admin routes never authorize when empty
    #[arg(long, env = "ADMIN_KEY", default_value = "", hide_env_values = true)]
    pub admin_key: String,

    // Rate window in milliseconds
    #[arg(long, env = "ADMIN_RATE_WINDOW_MS", default_value_t = 60_000)]
    pub admin_rate_window_ms: u64,

    // Max admin requests per window per (client, route)
    #[arg(long, env = "ADMIN_RATE_MAX", default_value_t = 20)]
    pub admin_rate_max: u32,
}

impl GateArgs {
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            window: Duration::from_millis(self.admin_rate_window_ms),
            max_requests: self.admin_rate_max,
            secret: self.admin_key.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    #[arg(long, env = "LESSONS_DIR", default_value = "packages/lessons/content")]
    pub lessons_dir: PathBuf,

    #[arg(long, env = "RUBRICS_DIR", default_value = "packages/core/rubrics")]
    pub rubrics_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    // Poll interval in seconds
    #[arg(long, env = "WORKER_INTERVAL_SECS", default_value_t = 5)]
    pub interval_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[arg(long, env = "DATABASE_PATH", default_value = "startupquest.redb")]
    pub database_path: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget {
    Rubrics,
    Lessons,
}

impl PublishTarget {
    pub fn path(self) -> &'static str {
        match self {
            PublishTarget::Rubrics => "/admin/rubrics/publish",
            PublishTarget::Lessons => "/admin/lessons/sync",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[arg(value_enum)]
    pub target: PublishTarget,

    #[arg(long, env = "ADMIN_KEY", default_value = "", hide_env_values = true)]
    pub key: String,

    #[arg(long, env = "API_URL", default_value = "http://localhost:4000")]
    pub api_url: String,
}

/// Settings the admin gate is built from. Constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub window: Duration,
    pub max_requests: u32,
    pub secret: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            max_requests: 20,
            secret: String::new(),
        }
    }
}
