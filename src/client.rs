use anyhow::Context;
use serde_json::Value;
use tracing::info;

use crate::config::{PublishArgs, PublishTarget};
use crate::gate::ADMIN_KEY_HEADER;

// What the admin endpoint said back
#[derive(Debug)]
pub struct PublishResult {
    pub status: u16,
    pub body: Value,
}

/// Triggers a sync on a running API. A non-JSON reply becomes `{}`.
pub async fn publish(
    client: &reqwest::Client,
    api_url: &str,
    target: PublishTarget,
    key: &str,
) -> anyhow::Result<PublishResult> {
    let url = format!("{}{}", api_url.trim_end_matches('/'), target.path());
    info!("Publishing via {}", url);

    let res = client
        .post(&url)
        .header(ADMIN_KEY_HEADER, key)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;

    let status = res.status().as_u16();
    let body = res
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Object(Default::default()));

    Ok(PublishResult { status, body })
}

pub async fn run(args: &PublishArgs) -> anyhow::Result<PublishResult> {
    let client = reqwest::Client::new();
    publish(&client, &args.api_url, args.target, &args.key).await
}
