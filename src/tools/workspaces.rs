use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WorkspaceListParams {
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WorkspaceGetParams {
    /// Workspace slug or UUID.
    pub workspace: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn workspace_list(
    client: &BitbucketClient,
    p: WorkspaceListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        "/workspaces",
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Workspace,
    )
    .await
}

pub async fn workspace_get(
    client: &BitbucketClient,
    p: WorkspaceGetParams,
) -> Result<CallToolResult> {
    common::get(
        client,
        &format!("/workspaces/{}", p.workspace),
        p.output_mode,
        EntityKind::Workspace,
    )
    .await
}
