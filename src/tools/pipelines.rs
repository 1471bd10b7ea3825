use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::pagination::PageParams;
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PipelineListParams {
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
pub struct PipelineGetParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pipeline UUID (including braces) or build number.
    pub pipeline: String,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PipelineTriggerParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Branch to run the pipeline on.
    pub branch: String,
    /// Custom pipeline name from bitbucket-pipelines.yml (runs the branch
    /// pipeline when absent).
    pub custom_pipeline: Option<String>,
    /// Pipeline variables as key/value pairs.
    pub variables: Option<std::collections::BTreeMap<String, String>>,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PipelineStopParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pipeline UUID (including braces) or build number.
    pub pipeline: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PipelineStepListParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pipeline UUID (including braces) or build number.
    pub pipeline: String,
    #[serde(flatten)]
    pub page: PageParams,
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PipelineStepLogParams {
    /// Workspace slug the repository belongs to.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Pipeline UUID (including braces) or build number.
    pub pipeline: String,
    /// Step UUID (including braces).
    pub step: String,
}

fn pipeline_path(workspace: &str, repo_slug: &str) -> String {
    format!("/repositories/{workspace}/{repo_slug}/pipelines")
}

pub async fn pipeline_list(
    client: &BitbucketClient,
    p: PipelineListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &pipeline_path(&p.workspace, &p.repo_slug),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Pipeline,
    )
    .await
}

pub async fn pipeline_get(
    client: &BitbucketClient,
    p: PipelineGetParams,
) -> Result<CallToolResult> {
    common::get(
        client,
        &format!(
            "{}/{}",
            pipeline_path(&p.workspace, &p.repo_slug),
            p.pipeline
        ),
        p.output_mode,
        EntityKind::Pipeline,
    )
    .await
}

pub async fn pipeline_trigger(
    client: &BitbucketClient,
    p: PipelineTriggerParams,
) -> Result<CallToolResult> {
    let mut target = json!({
        "type": "pipeline_ref_target",
        "ref_type": "branch",
        "ref_name": p.branch,
    });
    if let Some(name) = &p.custom_pipeline {
        target["selector"] = json!({"type": "custom", "pattern": name});
    }
    let mut body = json!({"target": target});
    if let Some(variables) = &p.variables {
        body["variables"] = variables
            .iter()
            .map(|(key, value)| json!({"key": key, "value": value}))
            .collect();
    }
    common::create(
        client,
        &pipeline_path(&p.workspace, &p.repo_slug),
        &body,
        p.output_mode,
        EntityKind::Pipeline,
    )
    .await
}

pub async fn pipeline_stop(
    client: &BitbucketClient,
    p: PipelineStopParams,
) -> Result<CallToolResult> {
    client
        .post_no_content(
            &format!(
                "{}/{}/stopPipeline",
                pipeline_path(&p.workspace, &p.repo_slug),
                p.pipeline
            ),
            &json!({}),
        )
        .await?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "Stop requested for pipeline {}.",
        p.pipeline
    ))]))
}

pub async fn pipeline_step_list(
    client: &BitbucketClient,
    p: PipelineStepListParams,
) -> Result<CallToolResult> {
    common::list(
        client,
        &format!(
            "{}/{}/steps",
            pipeline_path(&p.workspace, &p.repo_slug),
            p.pipeline
        ),
        &[],
        &p.page,
        p.output_mode,
        EntityKind::Other,
    )
    .await
}

pub async fn pipeline_step_log(
    client: &BitbucketClient,
    p: PipelineStepLogParams,
) -> Result<CallToolResult> {
    common::raw(
        client,
        &format!(
            "{}/{}/steps/{}/log",
            pipeline_path(&p.workspace, &p.repo_slug),
            p.pipeline,
            p.step
        ),
    )
    .await
}
