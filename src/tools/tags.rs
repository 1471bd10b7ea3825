use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagListParams {
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
pub struct TagGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Tag name.
    pub name: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn tag_list(client: &BitbucketClient, p: TagListParams) -> Result<CallToolResult> {
    common::list(
        client,
        &format!("/repositories/{}/{}/refs/tags", p.workspace, p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Tag,
    )
    .await
}

pub async fn tag_get(client: &BitbucketClient, p: TagGetParams) -> Result<CallToolResult> {
    common::get(
        client,
        &format!(
            "/repositories/{}/{}/refs/tags/{}",
            p.workspace, p.repo_slug, p.name
        ),
        p.output_mode,
        EntityKind::Tag,
    )
    .await
}
