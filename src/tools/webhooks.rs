use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebhookListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebhookGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Webhook UUID (including braces).
    pub uid: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebhookCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// URL the webhook delivers to.
    pub url: String,
    /// Events to subscribe to (e.g. repo:push, pullrequest:created).
    pub events: Vec<String>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Whether the webhook is active. Defaults to true.
    pub active: Option<bool>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebhookUpdateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Webhook UUID (including braces).
    pub uid: String,
    /// New delivery URL.
    pub url: Option<String>,
    /// New event subscriptions (replaces the existing set).
    pub events: Option<Vec<String>>,
    /// New description.
    pub description: Option<String>,
    /// Whether the webhook is active.
    pub active: Option<bool>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebhookDeleteParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Webhook UUID (including braces).
    pub uid: String,
}

fn hooks_path(workspace: &str, repo_slug: &str) -> String {
    format!("/repositories/{workspace}/{repo_slug}/hooks")
}

pub async fn webhook_list(
    client: &BitbucketClient,
    p: WebhookListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &hooks_path(&p.workspace, &p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Webhook,
    )
    .await
}

pub async fn webhook_get(client: &BitbucketClient, p: WebhookGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!("{}/{}", hooks_path(&p.workspace, &p.repo_slug), p.uid),
        p.output_mode,
        EntityKind::Webhook,
    )
    .await
}

pub async fn webhook_create(
    client: &BitbucketClient,
    p: WebhookCreateParams,
) -> Result<CallToolResult> {
    let body = json!({
        "url": p.url,
        "events": p.events,
        "description": p.description.unwrap_or_default(),
        "active": p.active.unwrap_or(true),
    });
    common::create(
        client,
        &hooks_path(&p.workspace, &p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::Webhook,
    )
    .await
}

pub async fn webhook_update(
    client: &BitbucketClient,
    p: WebhookUpdateParams,
) -> Result<CallToolResult> {
    let mut body = json!({});
    if let Some(url) = &p.url {
        body["url"] = json!(url);
    }
    if let Some(events) = &p.events {
        body["events"] = json!(events);
    }
    if let Some(description) = &p.description {
        body["description"] = json!(description);
    }
    if let Some(active) = p.active {
        body["active"] = json!(active);
    }
    common::update(
        client,
        &format!("{}/{}", hooks_path(&p.workspace, &p.repo_slug), p.uid),
        &body,
        p.output_mode,
        EntityKind::Webhook,
    )
    .await
}

pub async fn webhook_delete(
    client: &BitbucketClient,
    p: WebhookDeleteParams,
) -> Result<CallToolResult> {
    common::remove(
        client,
        &format!("{}/{}", hooks_path(&p.workspace, &p.repo_slug), p.uid),
        &format!("Webhook {}", p.uid),
    )
    .await
}
