use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Filter by state: OPEN, MERGED, DECLINED, or SUPERSEDED. Defaults to OPEN.
    pub state: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request title.
    pub title: String,
    /// Source branch name.
    pub source_branch: String,
    /// Destination branch name. Defaults to the repository main branch.
    pub destination_branch: Option<String>,
    /// Pull request description.
    pub description: Option<String>,
    /// Close the source branch after the pull request is merged.
    pub close_source_branch: Option<bool>,
    /// Reviewer account UUIDs.
    pub reviewers: Option<Vec<String>>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrUpdateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New destination branch name.
    pub destination_branch: Option<String>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrMergeParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    /// Merge strategy: merge_commit, squash, or fast_forward.
    pub merge_strategy: Option<String>,
    /// Custom merge commit message.
    pub message: Option<String>,
    /// Close the source branch after merging.
    pub close_source_branch: Option<bool>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrIdParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCommitsParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

fn pr_path(workspace: &str, repo_slug: &str) -> String {
    format!("/repositories/{workspace}/{repo_slug}/pullrequests")
}

pub async fn pr_list(client: &BitbucketClient, p: PrListParams) -> Result<CallToolResult> {
    let state = p.state.unwrap_or_else(|| "OPEN".to_string());
    common::list(
        client,
        &pr_path(&p.workspace, &p.repo_slug),
        &[("state", state)],
        &p.page,
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_get(client: &BitbucketClient, p: PrGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!("{}/{}", pr_path(&p.workspace, &p.repo_slug), p.id),
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_create(client: &BitbucketClient, p: PrCreateParams) -> Result<CallToolResult> {
    let mut body = json!({
        "title": p.title,
        "source": {"branch": {"name": p.source_branch}},
    });
    if let Some(dest) = &p.destination_branch {
        body["destination"] = json!({"branch": {"name": dest}});
    }
    if let Some(description) = &p.description {
        body["description"] = Value::String(description.clone());
    }
    if let Some(close) = p.close_source_branch {
        body["close_source_branch"] = Value::Bool(close);
    }
    if let Some(reviewers) = &p.reviewers {
        body["reviewers"] = reviewers.iter().map(|uuid| json!({"uuid": uuid})).collect();
    }
    common::create(
        client,
        &pr_path(&p.workspace, &p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_update(client: &BitbucketClient, p: PrUpdateParams) -> Result<CallToolResult> {
    let mut body = json!({});
    if let Some(title) = &p.title {
        body["title"] = Value::String(title.clone());
    }
    if let Some(description) = &p.description {
        body["description"] = Value::String(description.clone());
    }
    if let Some(dest) = &p.destination_branch {
        body["destination"] = json!({"branch": {"name": dest}});
    }
    common::update(
        client,
        &format!("{}/{}", pr_path(&p.workspace, &p.repo_slug), p.id),
        &body,
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_merge(client: &BitbucketClient, p: PrMergeParams) -> Result<CallToolResult> {
    let mut body = json!({});
    if let Some(strategy) = &p.merge_strategy {
        body["merge_strategy"] = Value::String(strategy.clone());
    }
    if let Some(message) = &p.message {
        body["message"] = Value::String(message.clone());
    }
    if let Some(close) = p.close_source_branch {
        body["close_source_branch"] = Value::Bool(close);
    }
    common::create(
        client,
        &format!("{}/{}/merge", pr_path(&p.workspace, &p.repo_slug), p.id),
        &body,
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_decline(client: &BitbucketClient, p: PrIdParams) -> Result<CallToolResult> {
    common::create(
        client,
        &format!("{}/{}/decline", pr_path(&p.workspace, &p.repo_slug), p.id),
        &json!({}),
        p.output_mode,
        EntityKind::PullRequest,
    )
    .await
}

pub async fn pr_approve(client: &BitbucketClient, p: PrIdParams) -> Result<CallToolResult> {
    client
        .post(
            &format!("{}/{}/approve", pr_path(&p.workspace, &p.repo_slug), p.id),
            &json!({}),
        )
        .await?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "Pull request #{} approved.",
        p.id
    ))]))
}

pub async fn pr_unapprove(client: &BitbucketClient, p: PrIdParams) -> Result<CallToolResult> {
    client
        .delete(&format!(
            "{}/{}/approve",
            pr_path(&p.workspace, &p.repo_slug),
            p.id
        ))
        .await?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "Approval removed from pull request #{}.",
        p.id
    ))]))
}

pub async fn pr_diff(client: &BitbucketClient, p: PrIdParams) -> Result<CallToolResult> {
    common::raw(
        client,
        &format!("{}/{}/diff", pr_path(&p.workspace, &p.repo_slug), p.id),
    )
    .await
}

pub async fn pr_commits(client: &BitbucketClient, p: PrCommitsParams) -> Result<CallToolResult> {
    common::list(
        client,
        &format!("{}/{}/commits", pr_path(&p.workspace, &p.repo_slug), p.id),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Commit,
    )
    .await
}
