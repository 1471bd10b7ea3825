use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FileSourceParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Branch, tag, or commit hash to read from.
    pub revision: String,
    /// File path within the repository.
    pub path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DirectoryListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Branch, tag, or commit hash to read from.
    pub revision: String,
    /// Directory path within the repository. Defaults to the repository root.
    pub path: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn file_source(client: &BitbucketClient, p: FileSourceParams) -> Result<CallToolResult> {
    common::raw(
        client,
        &format!(
            "/repositories/{}/{}/src/{}/{}",
            p.workspace,
            p.repo_slug,
            p.revision,
            p.path.trim_start_matches('/')
        ),
    )
    .await
}

pub async fn directory_list(
    client: &BitbucketClient,
    p: DirectoryListParams,
) -> Result<CallToolResult> {
    let dir = p
        .path
        .as_deref()
        .unwrap_or("")
        .trim_matches('/')
        .to_string();
    let path = if dir.is_empty() {
        format!(
            "/repositories/{}/{}/src/{}/",
            p.workspace, p.repo_slug, p.revision
        )
    } else {
        format!(
            "/repositories/{}/{}/src/{}/{dir}/",
            p.workspace, p.repo_slug, p.revision
        )
    };
    common::list(client, &path, &[], &p.page, p.output_mode, EntityKind::Other).await
}
