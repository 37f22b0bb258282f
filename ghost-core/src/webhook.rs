//! Fire-and-forget forwarding of lifecycle events to an external webhook.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Upper bound for one delivery attempt.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    BotReady,
    MemberJoin,
    ModerationAction,
    RoleMenuCreated,
}

/// Body posted to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub event: LifecycleEvent,
    pub data: Value,
}

/// Posts lifecycle events to `LUMI_WEBHOOK` when one is configured.
#[derive(Clone)]
pub struct EventForwarder {
    client: reqwest::Client,
    url: Option<Arc<str>>,
}

impl EventForwarder {
    pub fn new(url: Option<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;

        Ok(Self {
            client,
            url: url.map(Arc::from),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Deliver one event in the background.
    ///
    /// Returns the delivery task, or `None` when no destination is configured.
    /// Failures are logged and never retried.
    pub fn forward(&self, event: LifecycleEvent, data: Value) -> Option<JoinHandle<()>> {
        let url = Arc::clone(self.url.as_ref()?);
        let client = self.client.clone();
        let payload = WebhookPayload { event, data };

        Some(tokio::spawn(async move {
            match deliver(&client, &url, &payload).await {
                Ok(()) => debug!(event = ?payload.event, "webhook event delivered"),
                Err(source) => warn!(?source, event = ?payload.event, "webhook post failed"),
            }
        }))
    }
}

async fn deliver(
    client: &reqwest::Client,
    url: &str,
    payload: &WebhookPayload,
) -> reqwest::Result<()> {
    client
        .post(url)
        .json(payload)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}
