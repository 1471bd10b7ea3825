use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RepoListParams {
    /// Workspace slug to list repositories from.
    pub workspace: String,
    /// Filter by user role: member, contributor, admin, or owner.
    pub role: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RepoGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn repo_list(client: &BitbucketClient, p: RepoListParams) -> Result<CallToolResult> {
    let mut extra = Vec::new();
    if let Some(role) = p.role {
        extra.push(("role", role));
    }
    common::list(
        client,
        &format!("/repositories/{}", p.workspace),
        &extra,
        &p.page,
        p.output_mode,
        EntityKind::Repository,
    )
    .await
}

pub async fn repo_get(client: &BitbucketClient, p: RepoGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!("/repositories/{}/{}", p.workspace, p.repo_slug),
        p.output_mode,
        EntityKind::Repository,
    )
    .await
}
