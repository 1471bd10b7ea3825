use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueListParams {
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
pub struct IssueGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID.
    pub id: i64,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue title.
    pub title: String,
    /// Issue description (markdown).
    pub content: Option<String>,
    /// Issue kind: bug, enhancement, proposal, or task.
    pub kind: Option<String>,
    /// Priority: trivial, minor, major, critical, or blocker.
    pub priority: Option<String>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueUpdateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID.
    pub id: i64,
    /// New title.
    pub title: Option<String>,
    /// New description (markdown).
    pub content: Option<String>,
    /// New state: new, open, resolved, on hold, invalid, duplicate, wontfix, or closed.
    pub state: Option<String>,
    /// New kind: bug, enhancement, proposal, or task.
    pub kind: Option<String>,
    /// New priority: trivial, minor, major, critical, or blocker.
    pub priority: Option<String>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

fn issue_path(workspace: &str, repo_slug: &str) -> String {
    format!("/repositories/{workspace}/{repo_slug}/issues")
}

pub async fn issue_list(client: &BitbucketClient, p: IssueListParams) -> Result<CallToolResult> {
    common::list(
        client,
        &issue_path(&p.workspace, &p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Issue,
    )
    .await
}

pub async fn issue_get(client: &BitbucketClient, p: IssueGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!("{}/{}", issue_path(&p.workspace, &p.repo_slug), p.id),
        p.output_mode,
        EntityKind::Issue,
    )
    .await
}

pub async fn issue_create(
    client: &BitbucketClient,
    p: IssueCreateParams,
) -> Result<CallToolResult> {
    let mut body = json!({"title": p.title});
    if let Some(content) = &p.content {
        body["content"] = json!({"raw": content});
    }
    if let Some(kind) = &p.kind {
        body["kind"] = Value::String(kind.clone());
    }
    if let Some(priority) = &p.priority {
        body["priority"] = Value::String(priority.clone());
    }
    common::create(
        client,
        &issue_path(&p.workspace, &p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::Issue,
    )
    .await
}

pub async fn issue_update(
    client: &BitbucketClient,
    p: IssueUpdateParams,
) -> Result<CallToolResult> {
    let mut body = json!({});
    if let Some(title) = &p.title {
        body["title"] = Value::String(title.clone());
    }
    if let Some(content) = &p.content {
        body["content"] = json!({"raw": content});
    }
    if let Some(state) = &p.state {
        body["state"] = Value::String(state.clone());
    }
    if let Some(kind) = &p.kind {
        body["kind"] = Value::String(kind.clone());
    }
    if let Some(priority) = &p.priority {
        body["priority"] = Value::String(priority.clone());
    }
    common::update(
        client,
        &format!("{}/{}", issue_path(&p.workspace, &p.repo_slug), p.id),
        &body,
        p.output_mode,
        EntityKind::Issue,
    )
    .await
}
