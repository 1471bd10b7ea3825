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
pub struct PrCommentListParams {
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

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCommentCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pull request ID.
    pub id: i64,
    /// Comment text (markdown).
    pub content: String,
    /// File path, to attach the comment inline to a changed file.
    pub file_path: Option<String>,
    /// Line number in the new version of the file (requires file_path).
    pub line: Option<i64>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCommentListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID.
    pub id: i64,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCommentCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID.
    pub id: i64,
    /// Comment text (markdown).
    pub content: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn pr_comment_list(
    client: &BitbucketClient,
    p: PrCommentListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &format!(
            "/repositories/{}/{}/pullrequests/{}/comments",
            p.workspace, p.repo_slug, p.id
        ),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Comment,
    )
    .await
}

pub async fn pr_comment_create(
    client: &BitbucketClient,
    p: PrCommentCreateParams,
) -> Result<CallToolResult> {
    let mut body = json!({"content": {"raw": p.content}});
    if let Some(path) = &p.file_path {
        let mut inline = json!({"path": path});
        if let Some(line) = p.line {
            inline["to"] = json!(line);
        }
        body["inline"] = inline;
    }
    common::create(
        client,
        &format!(
            "/repositories/{}/{}/pullrequests/{}/comments",
            p.workspace, p.repo_slug, p.id
        ),
        &body,
        p.output_mode,
        EntityKind::Comment,
    )
    .await
}

pub async fn issue_comment_list(
    client: &BitbucketClient,
    p: IssueCommentListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &format!(
            "/repositories/{}/{}/issues/{}/comments",
            p.workspace, p.repo_slug, p.id
        ),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Comment,
    )
    .await
}

pub async fn issue_comment_create(
    client: &BitbucketClient,
    p: IssueCommentCreateParams,
) -> Result<CallToolResult> {
    common::create(
        client,
        &format!(
            "/repositories/{}/{}/issues/{}/comments",
            p.workspace, p.repo_slug, p.id
        ),
        &json!({"content": {"raw": p.content}}),
        p.output_mode,
        EntityKind::Comment,
    )
    .await
}
