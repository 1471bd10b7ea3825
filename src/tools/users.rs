use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{EntityKind, OutputMode};
use crate::tools::common;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CurrentUserParams {
    /// Output mode: structured (JSON) or tabular (markdown). Defaults to structured.
    #[serde(default)]
    pub output_mode: OutputMode,
}

pub async fn current_user(
    client: &BitbucketClient,
    p: CurrentUserParams,
) -> Result<CallToolResult> {
    common::get(client, "/user", p.output_mode, EntityKind::Other).await
}
