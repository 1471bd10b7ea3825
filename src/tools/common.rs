//! Generic resource tool family. Every list/get/create/update/delete tool
//! is an instantiation of one of these functions with a path, an entity
//! kind, and (for lists) extra query pairs.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use crate::client::BitbucketClient;
use crate::error::Result;
use crate::format::{self, EntityKind, OutputMode};
use crate::pagination::{self, PageParams};

/// Fetch a paginated collection, normalize it, and render it.
pub async fn list(
    client: &BitbucketClient,
    path: &str,
    extra: &[(&str, String)],
    page: &PageParams,
    mode: OutputMode,
    kind: EntityKind,
) -> Result<CallToolResult> {
    let mut pairs = page.query_pairs();
    pairs.extend(extra.iter().map(|(k, v)| (*k, v.clone())));
    let raw = client
        .get(&format!("{path}?{}", pagination::encode_pairs(&pairs)))
        .await?;
    let normalized = pagination::normalize(&raw);
    Ok(format::page(&normalized, mode, kind))
}

/// Fetch a single entity and render it.
pub async fn get(
    client: &BitbucketClient,
    path: &str,
    mode: OutputMode,
    kind: EntityKind,
) -> Result<CallToolResult> {
    let entity = client.get(path).await?;
    Ok(format::entity(&entity, mode, kind))
}

/// Create an entity with a POST body and render the created resource.
pub async fn create(
    client: &BitbucketClient,
    path: &str,
    body: &Value,
    mode: OutputMode,
    kind: EntityKind,
) -> Result<CallToolResult> {
    let entity = client.post(path, body).await?;
    Ok(format::entity(&entity, mode, kind))
}

/// Update an entity with a PUT body and render the updated resource.
pub async fn update(
    client: &BitbucketClient,
    path: &str,
    body: &Value,
    mode: OutputMode,
    kind: EntityKind,
) -> Result<CallToolResult> {
    let entity = client.put(path, body).await?;
    Ok(format::entity(&entity, mode, kind))
}

/// Delete an entity and confirm in plain text.
pub async fn remove(
    client: &BitbucketClient,
    path: &str,
    description: &str,
) -> Result<CallToolResult> {
    client.delete(path).await?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "{description} deleted."
    ))]))
}

/// Fetch a raw-text endpoint (diffs, logs, file contents) verbatim.
pub async fn raw(client: &BitbucketClient, path: &str) -> Result<CallToolResult> {
    let text = client.get_raw(path).await?;
    let text = if text.is_empty() {
        "(empty response)".to_string()
    } else {
        text
    };
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
