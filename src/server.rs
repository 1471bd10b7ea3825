use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use crate::client::BitbucketClient;
use crate::config::Config;
use crate::error::BitbucketError;

// Tool parameter types
use crate::tools::branches::{BranchCreateParams, BranchDeleteParams, BranchListParams};
use crate::tools::comments::{
    IssueCommentCreateParams, IssueCommentListParams, PrCommentCreateParams, PrCommentListParams,
};
use crate::tools::commits::{CommitDiffParams, CommitGetParams, CommitListParams};
use crate::tools::files::{DirectoryListParams, FileSourceParams};
use crate::tools::issues::{IssueCreateParams, IssueGetParams, IssueListParams, IssueUpdateParams};
use crate::tools::pipeline_variables::{
    VariableCreateParams, VariableDeleteParams, VariableListParams, VariableUpdateParams,
};
use crate::tools::pipelines::{
    PipelineGetParams, PipelineListParams, PipelineStepListParams, PipelineStepLogParams,
    PipelineStopParams, PipelineTriggerParams,
};
use crate::tools::pulls::{
    PrCommitsParams, PrCreateParams, PrGetParams, PrIdParams, PrListParams, PrMergeParams,
    PrUpdateParams,
};
use crate::tools::repos::{RepoGetParams, RepoListParams};
use crate::tools::tags::{TagGetParams, TagListParams};
use crate::tools::users::CurrentUserParams;
use crate::tools::webhooks::{
    WebhookCreateParams, WebhookDeleteParams, WebhookGetParams, WebhookListParams,
    WebhookUpdateParams,
};
use crate::tools::workspaces::{WorkspaceGetParams, WorkspaceListParams};

/// The bitbucket-mcp server. Holds the HTTP client and routes all 48 tools.
#[derive(Debug, Clone)]
pub struct BitbucketMcp {
    client: BitbucketClient,
    tool_router: ToolRouter<Self>,
}

/// Convert a handler outcome into the uniform response envelope. Errors are
/// classified into an error-flagged tool result; they never surface as
/// protocol-level failures.
fn respond(
    result: crate::error::Result<CallToolResult>,
) -> std::result::Result<CallToolResult, ErrorData> {
    Ok(result.unwrap_or_else(|err| err.to_tool_result()))
}

#[tool_router]
impl BitbucketMcp {
    pub fn new(config: Config) -> std::result::Result<Self, BitbucketError> {
        let client = BitbucketClient::new(&config)?;
        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }

    // ── Workspaces ──────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list the workspaces the authenticated user has access to. Supports query filtering and sorting.")]
    async fn list_workspaces(&self, Parameters(p): Parameters<WorkspaceListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::workspaces::workspace_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need details of a specific workspace by its slug.")]
    async fn get_workspace(&self, Parameters(p): Parameters<WorkspaceGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::workspaces::workspace_get(&self.client, p).await)
    }

    // ── Repositories ────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list repositories in a workspace. Supports filtering by role, query expression (e.g. name ~ \"api\"), and sorting.")]
    async fn list_repositories(&self, Parameters(p): Parameters<RepoListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::repos::repo_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need metadata about a repository: description, main branch, language, size, and visibility.")]
    async fn get_repository(&self, Parameters(p): Parameters<RepoGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::repos::repo_get(&self.client, p).await)
    }

    // ── Branches ────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list branches in a repository with their latest commit and author.")]
    async fn list_branches(&self, Parameters(p): Parameters<BranchListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::branches::branch_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to create a new branch from a commit hash or existing branch.")]
    async fn create_branch(&self, Parameters(p): Parameters<BranchCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::branches::branch_create(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to delete a branch from a repository.")]
    async fn delete_branch(&self, Parameters(p): Parameters<BranchDeleteParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::branches::branch_delete(&self.client, p).await)
    }

    // ── Tags ────────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list tags in a repository.")]
    async fn list_tags(&self, Parameters(p): Parameters<TagListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::tags::tag_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need details of a specific tag by its name.")]
    async fn get_tag(&self, Parameters(p): Parameters<TagGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::tags::tag_get(&self.client, p).await)
    }

    // ── Commits ─────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list commits in a repository, optionally restricted to a branch, tag, or commit hash.")]
    async fn list_commits(&self, Parameters(p): Parameters<CommitListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::commits::commit_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need the full details of a specific commit by its hash.")]
    async fn get_commit(&self, Parameters(p): Parameters<CommitGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::commits::commit_get(&self.client, p).await)
    }

    #[tool(description = "Use this when you need the raw unified diff of a commit, or between two revisions using the rev1..rev2 spec.")]
    async fn get_commit_diff(&self, Parameters(p): Parameters<CommitDiffParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::commits::commit_diff(&self.client, p).await)
    }

    // ── Pull Requests ───────────────────────────────────────────────

    #[tool(description = "Use this when you need to list pull requests in a repository. Filter by state: OPEN, MERGED, DECLINED, or SUPERSEDED (defaults to OPEN).")]
    async fn list_pull_requests(&self, Parameters(p): Parameters<PrListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need full details of a specific pull request including branches, state, author, and description.")]
    async fn get_pull_request(&self, Parameters(p): Parameters<PrGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_get(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to create a pull request. Provide source branch, title, and optionally destination branch, description, and reviewers.")]
    async fn create_pull_request(&self, Parameters(p): Parameters<PrCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_create(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to update a pull request's title, description, or destination branch.")]
    async fn update_pull_request(&self, Parameters(p): Parameters<PrUpdateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_update(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to merge a pull request. Supports merge_commit, squash, and fast_forward strategies.")]
    async fn merge_pull_request(&self, Parameters(p): Parameters<PrMergeParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_merge(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to decline (close without merging) a pull request.")]
    async fn decline_pull_request(&self, Parameters(p): Parameters<PrIdParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_decline(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to approve a pull request as the authenticated user.")]
    async fn approve_pull_request(&self, Parameters(p): Parameters<PrIdParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_approve(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to withdraw your approval from a pull request.")]
    async fn unapprove_pull_request(&self, Parameters(p): Parameters<PrIdParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_unapprove(&self.client, p).await)
    }

    #[tool(description = "Use this when you need the raw unified diff of all changes in a pull request.")]
    async fn get_pull_request_diff(&self, Parameters(p): Parameters<PrIdParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_diff(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to list the commits contained in a pull request.")]
    async fn list_pull_request_commits(&self, Parameters(p): Parameters<PrCommitsParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pulls::pr_commits(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to list comments on a pull request, including inline code comments.")]
    async fn list_pull_request_comments(&self, Parameters(p): Parameters<PrCommentListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::comments::pr_comment_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to add a comment to a pull request, optionally inline on a specific file and line.")]
    async fn create_pull_request_comment(&self, Parameters(p): Parameters<PrCommentCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::comments::pr_comment_create(&self.client, p).await)
    }

    // ── Issues ──────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list issues in a repository. Supports query filtering (e.g. state=\"open\") and sorting.")]
    async fn list_issues(&self, Parameters(p): Parameters<IssueListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::issues::issue_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need full details of a specific issue by its ID.")]
    async fn get_issue(&self, Parameters(p): Parameters<IssueGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::issues::issue_get(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to create an issue. Provide a title and optionally content, kind, and priority.")]
    async fn create_issue(&self, Parameters(p): Parameters<IssueCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::issues::issue_create(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to update an issue's title, content, state, kind, or priority.")]
    async fn update_issue(&self, Parameters(p): Parameters<IssueUpdateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::issues::issue_update(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to list comments on an issue.")]
    async fn list_issue_comments(&self, Parameters(p): Parameters<IssueCommentListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::comments::issue_comment_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to add a comment to an issue.")]
    async fn create_issue_comment(&self, Parameters(p): Parameters<IssueCommentCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::comments::issue_comment_create(&self.client, p).await)
    }

    // ── Pipelines ───────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list pipeline runs for a repository with their state and target branch.")]
    async fn list_pipelines(&self, Parameters(p): Parameters<PipelineListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need details of a specific pipeline run by its UUID or build number.")]
    async fn get_pipeline(&self, Parameters(p): Parameters<PipelineGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_get(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to trigger a pipeline on a branch, optionally a custom pipeline with variables.")]
    async fn trigger_pipeline(&self, Parameters(p): Parameters<PipelineTriggerParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_trigger(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to stop a running pipeline.")]
    async fn stop_pipeline(&self, Parameters(p): Parameters<PipelineStopParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_stop(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to list the steps of a pipeline run with their state.")]
    async fn list_pipeline_steps(&self, Parameters(p): Parameters<PipelineStepListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_step_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need the log output of a specific pipeline step to debug failures.")]
    async fn get_pipeline_step_log(&self, Parameters(p): Parameters<PipelineStepLogParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipelines::pipeline_step_log(&self.client, p).await)
    }

    // ── Pipeline Variables ──────────────────────────────────────────

    #[tool(description = "Use this when you need to list the pipeline variables configured for a repository.")]
    async fn list_pipeline_variables(&self, Parameters(p): Parameters<VariableListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipeline_variables::variable_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to create a pipeline variable. Mark it secured to mask the value.")]
    async fn create_pipeline_variable(&self, Parameters(p): Parameters<VariableCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipeline_variables::variable_create(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to update a pipeline variable's key, value, or secured flag.")]
    async fn update_pipeline_variable(&self, Parameters(p): Parameters<VariableUpdateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipeline_variables::variable_update(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to delete a pipeline variable by its UUID.")]
    async fn delete_pipeline_variable(&self, Parameters(p): Parameters<VariableDeleteParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::pipeline_variables::variable_delete(&self.client, p).await)
    }

    // ── Webhooks ────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list the webhooks configured on a repository.")]
    async fn list_webhooks(&self, Parameters(p): Parameters<WebhookListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::webhooks::webhook_list(&self.client, p).await)
    }

    #[tool(description = "Use this when you need details of a specific webhook by its UUID.")]
    async fn get_webhook(&self, Parameters(p): Parameters<WebhookGetParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::webhooks::webhook_get(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to create a webhook. Provide the delivery URL and the events to subscribe to.")]
    async fn create_webhook(&self, Parameters(p): Parameters<WebhookCreateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::webhooks::webhook_create(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to update a webhook's URL, events, description, or active flag.")]
    async fn update_webhook(&self, Parameters(p): Parameters<WebhookUpdateParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::webhooks::webhook_update(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to delete a webhook by its UUID.")]
    async fn delete_webhook(&self, Parameters(p): Parameters<WebhookDeleteParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::webhooks::webhook_delete(&self.client, p).await)
    }

    // ── Source ──────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to read the raw content of a file at a branch, tag, or commit.")]
    async fn get_file_source(&self, Parameters(p): Parameters<FileSourceParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::files::file_source(&self.client, p).await)
    }

    #[tool(description = "Use this when you need to list the files and directories at a path in the repository.")]
    async fn list_directory(&self, Parameters(p): Parameters<DirectoryListParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::files::directory_list(&self.client, p).await)
    }

    // ── Users ───────────────────────────────────────────────────────

    #[tool(description = "Use this when you need information about the currently authenticated user.")]
    async fn get_current_user(&self, Parameters(p): Parameters<CurrentUserParams>) -> Result<CallToolResult, ErrorData> {
        respond(crate::tools::users::current_user(&self.client, p).await)
    }
}

#[tool_handler]
impl ServerHandler for BitbucketMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bitbucket-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bitbucket Cloud MCP server with 48 tools covering workspaces, repositories, \
                 branches, tags, commits, pull requests, issues, comments, pipelines, pipeline \
                 variables, webhooks, and source browsing. List tools accept page_size (1-100), \
                 page, query, sort, and output_mode (structured or tabular)."
                    .to_string(),
            ),
        }
    }
}
