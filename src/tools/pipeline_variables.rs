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
pub struct VariableListParams {
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
pub struct VariableCreateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Mask the value in logs and the API. Defaults to false.
    pub secured: Option<bool>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct VariableUpdateParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Variable UUID (including braces).
    pub variable: String,
    /// New variable name.
    pub key: Option<String>,
    /// New variable value.
    pub value: Option<String>,
    /// Mask the value in logs and the API.
    pub secured: Option<bool>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct VariableDeleteParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Variable UUID (including braces).
    pub variable: String,
}

fn variables_path(workspace: &str, repo_slug: &str) -> String {
    format!("/repositories/{workspace}/{repo_slug}/pipelines_config/variables")
}

pub async fn variable_list(
    client: &BitbucketClient,
    p: VariableListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &variables_path(&p.workspace, &p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Other,
    )
    .await
}

pub async fn variable_create(
    client: &BitbucketClient,
    p: VariableCreateParams,
) -> Result<CallToolResult> {
    let body = json!({
        "key": p.key,
        "value": p.value,
        "secured": p.secured.unwrap_or(false),
    });
    common::create(
        client,
        &variables_path(&p.workspace, &p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::Other,
    )
    .await
}

pub async fn variable_update(
    client: &BitbucketClient,
    p: VariableUpdateParams,
) -> Result<CallToolResult> {
    let mut body = json!({});
    if let Some(key) = &p.key {
        body["key"] = json!(key);
    }
    if let Some(value) = &p.value {
        body["value"] = json!(value);
    }
    if let Some(secured) = p.secured {
        body["secured"] = json!(secured);
    }
    common::update(
        client,
        &format!(
            "{}/{}",
            variables_path(&p.workspace, &p.repo_slug),
            p.variable
        ),
        &body,
        p.output_mode,
        EntityKind::Other,
    )
    .await
}

pub async fn variable_delete(
    client: &BitbucketClient,
    p: VariableDeleteParams,
) -> Result<CallToolResult> {
    common::remove(
        client,
        &format!(
            "{}/{}",
            variables_path(&p.workspace, &p.repo_slug),
            p.variable
        ),
        &format!("Pipeline variable {}", p.variable),
    )
    .await
}
