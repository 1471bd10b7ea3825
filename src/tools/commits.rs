use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommitListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Restrict to a branch, tag, or commit hash. Defaults to the main branch.
    pub revision: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommitGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Commit hash.
    pub commit: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommitDiffParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Diff spec: a single commit hash, or `rev1..rev2` to compare two revisions.
    pub spec: String,
}

pub async fn commit_list(client: &BitbucketClient, p: CommitListParams) -> Result<CallToolResult> {
    let path = match &p.revision {
        Some(revision) => format!(
            "/repositories/{}/{}/commits/{revision}",
            p.workspace, p.repo_slug
        ),
        None => format!("/repositories/{}/{}/commits", p.workspace, p.repo_slug),
    };
    common::list(client, &path, &[], &p.page, p.output_mode, EntityKind::Commit).await
}

pub async fn commit_get(client: &BitbucketClient, p: CommitGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!(
            "/repositories/{}/{}/commit/{}",
            p.workspace, p.repo_slug, p.commit
        ),
        p.output_mode,
        EntityKind::Commit,
    )
    .await
}

pub async fn commit_diff(client: &BitbucketClient, p: CommitDiffParams) -> Result<CallToolResult> {
    common::raw(
        client,
        &format!(
            "/repositories/{}/{}/diff/{}",
            p.workspace, p.repo_slug, p.spec
        ),
    )
    .await
}
