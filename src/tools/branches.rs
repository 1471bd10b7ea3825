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
pub struct BranchListParams {
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
pub struct BranchCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Name of the new branch.
    pub name: String,
    /// Commit hash (or branch name) the new branch starts from.
    pub target: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BranchDeleteParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Name of the branch to delete.
    pub name: String,
}

pub async fn branch_list(client: &BitbucketClient, p: BranchListParams) -> Result<CallToolResult> {
    common::list(
        client,
        &format!("/repositories/{}/{}/refs/branches", p.workspace, p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Branch,
    )
    .await
}

pub async fn branch_create(
    client: &BitbucketClient,
    p: BranchCreateParams,
) -> Result<CallToolResult> {
    let body = json!({
        "name": p.name,
        "target": {"hash": p.target},
    });
    common::create(
        client,
        &format!("/repositories/{}/{}/refs/branches", p.workspace, p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::Branch,
    )
    .await
}

pub async fn branch_delete(
    client: &BitbucketClient,
    p: BranchDeleteParams,
) -> Result<CallToolResult> {
    common::remove(
        client,
        &format!(
            "/repositories/{}/{}/refs/branches/{}",
            p.workspace, p.repo_slug, p.name
        ),
        &format!("Branch `{}`", p.name),
    )
    .await
}
