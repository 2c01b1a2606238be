use clap::Parser; // for cli
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

use startupquest_api::config::{Cli, Command};
use startupquest_api::{client, seed, serve, shutdown_signal, worker};

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // parse cli arguments
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await?,
        Command::Worker(args) => {
            tokio::select! {
                _ = worker::poll_loop(Duration::from_secs(args.interval_secs.max(1))) => {},
                _ = shutdown_signal() => {},
            }
        }
        Command::Seed(args) => {
            for report in seed(&args)? {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            println!("Seed completed");
        }
        Command::Publish(args) => {
            let result = client::run(&args).await?;
            println!("{} {}", result.status, result.body);
            if !(200..300).contains(&result.status) {
                anyhow::bail!("publish rejected with status {}", result.status);
            }
        }
    }

    Ok(())
}
