use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::pagination::NormalizedPage;

/// How a tool renders its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Pretty-printed JSON.
    #[default]
    Structured,
    /// Markdown table / key-value summary.
    Tabular,
}

/// Logical resource type, driving the tabular column layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Workspace,
    Repository,
    Branch,
    Tag,
    Commit,
    PullRequest,
    Issue,
    Pipeline,
    Webhook,
    Comment,
    /// No hand-specified layout; falls back to a generic table.
    Other,
}

const EMPTY_PLACEHOLDER: &str = "No items found.";
const EXCERPT_LEN: usize = 50;

/// Render a normalized page as a tool result.
pub fn page(page: &NormalizedPage, mode: OutputMode, kind: EntityKind) -> CallToolResult {
    CallToolResult::success(vec![Content::text(page_text(page, mode, kind))])
}

/// Render a single entity (or raw value) as a tool result.
pub fn entity(value: &Value, mode: OutputMode, kind: EntityKind) -> CallToolResult {
    CallToolResult::success(vec![Content::text(entity_text(value, mode, kind))])
}

/// Render a normalized page as text. Total over arbitrary input: rendering
/// degrades to best-effort string coercion, it never fails.
pub fn page_text(page: &NormalizedPage, mode: OutputMode, kind: EntityKind) -> String {
    match mode {
        OutputMode::Structured => pretty(&serde_json::to_value(page).unwrap_or(Value::Null)),
        OutputMode::Tabular => {
            if page.items.is_empty() {
                return EMPTY_PLACEHOLDER.to_string();
            }
            let mut out = render_table(&page.items, kind);
            out.push_str(&footer(page));
            out
        }
    }
}

/// Render a single entity as text.
pub fn entity_text(value: &Value, mode: OutputMode, kind: EntityKind) -> String {
    match mode {
        OutputMode::Structured => pretty(value),
        OutputMode::Tabular => match value {
            Value::Array(items) if items.is_empty() => EMPTY_PLACEHOLDER.to_string(),
            Value::Array(items) => render_table(items, kind),
            Value::Object(map) => key_value_lines(map),
            other => coerce(Some(other)),
        },
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn footer(page: &NormalizedPage) -> String {
    let mut out = String::new();
    match page.total {
        Some(total) => out.push_str(&format!("\n\nShowing {} of {total} items.", page.count)),
        None if page.has_more => out.push_str(&format!("\n\nShowing {} items.", page.count)),
        None => {}
    }
    if page.has_more {
        out.push_str(" More results are available on the next page.");
    }
    out
}

// ── Tables ──────────────────────────────────────────────────────────

struct Column {
    header: &'static str,
    cell: fn(&Value) -> String,
}

fn render_table(items: &[Value], kind: EntityKind) -> String {
    match column_spec(kind) {
        Some(columns) => {
            let mut lines = Vec::with_capacity(items.len() + 2);
            lines.push(format!(
                "| {} |",
                columns
                    .iter()
                    .map(|c| c.header)
                    .collect::<Vec<_>>()
                    .join(" | ")
            ));
            lines.push(format!("|{}|", vec!["---"; columns.len()].join("|")));
            for item in items {
                lines.push(format!(
                    "| {} |",
                    columns
                        .iter()
                        .map(|c| cell((c.cell)(item)))
                        .collect::<Vec<_>>()
                        .join(" | ")
                ));
            }
            lines.join("\n")
        }
        None => generic_table(items),
    }
}

/// Hand-specified column layouts per entity kind.
fn column_spec(kind: EntityKind) -> Option<Vec<Column>> {
    let columns: Vec<Column> = match kind {
        EntityKind::Workspace => vec![
            Column { header: "Slug", cell: |v| text_cell(v, &["slug"]) },
            Column { header: "Name", cell: |v| text_cell(v, &["name"]) },
            Column { header: "Private", cell: |v| coerce(get(v, &["is_private"])) },
            Column { header: "Created", cell: |v| date_cell(v, &["created_on"]) },
        ],
        EntityKind::Repository => vec![
            Column { header: "Name", cell: |v| text_cell(v, &["name"]) },
            Column { header: "Full Name", cell: |v| text_cell(v, &["full_name"]) },
            Column { header: "Language", cell: |v| text_cell(v, &["language"]) },
            Column { header: "Private", cell: |v| coerce(get(v, &["is_private"])) },
            Column { header: "Updated", cell: |v| date_cell(v, &["updated_on"]) },
        ],
        EntityKind::Branch => vec![
            Column { header: "Name", cell: |v| text_cell(v, &["name"]) },
            Column { header: "Commit", cell: |v| hash_cell(v, &["target", "hash"]) },
            Column { header: "Author", cell: |v| user_cell(v, &["target", "author"]) },
            Column { header: "Date", cell: |v| date_cell(v, &["target", "date"]) },
        ],
        EntityKind::Tag => vec![
            Column { header: "Name", cell: |v| text_cell(v, &["name"]) },
            Column { header: "Commit", cell: |v| hash_cell(v, &["target", "hash"]) },
            Column { header: "Date", cell: |v| date_cell(v, &["target", "date"]) },
        ],
        EntityKind::Commit => vec![
            Column { header: "Hash", cell: |v| hash_cell(v, &["hash"]) },
            Column { header: "Author", cell: |v| user_cell(v, &["author"]) },
            Column { header: "Date", cell: |v| date_cell(v, &["date"]) },
            Column { header: "Message", cell: |v| excerpt_cell(v, &["message"]) },
        ],
        EntityKind::PullRequest => vec![
            Column { header: "ID", cell: |v| coerce(get(v, &["id"])) },
            Column { header: "Title", cell: |v| text_cell(v, &["title"]) },
            Column { header: "State", cell: |v| text_cell(v, &["state"]) },
            Column { header: "Author", cell: |v| user_cell(v, &["author"]) },
            Column {
                header: "Source -> Dest",
                cell: |v| {
                    let source = get_str(v, &["source", "branch", "name"]).unwrap_or("-");
                    let dest = get_str(v, &["destination", "branch", "name"]).unwrap_or("-");
                    format!("{source} -> {dest}")
                },
            },
        ],
        EntityKind::Issue => vec![
            Column { header: "ID", cell: |v| coerce(get(v, &["id"])) },
            Column { header: "Title", cell: |v| text_cell(v, &["title"]) },
            Column { header: "State", cell: |v| text_cell(v, &["state"]) },
            Column { header: "Priority", cell: |v| text_cell(v, &["priority"]) },
            Column { header: "Assignee", cell: |v| user_cell(v, &["assignee"]) },
        ],
        EntityKind::Pipeline => vec![
            Column { header: "ID", cell: |v| coerce(get(v, &["build_number"])) },
            Column { header: "State", cell: |v| text_cell(v, &["state", "name"]) },
            Column { header: "Branch", cell: |v| text_cell(v, &["target", "ref_name"]) },
            Column { header: "Created", cell: |v| date_cell(v, &["created_on"]) },
        ],
        EntityKind::Webhook => vec![
            Column { header: "ID", cell: |v| hash_cell(v, &["uuid"]) },
            Column { header: "URL", cell: |v| text_cell(v, &["url"]) },
            Column {
                header: "Events",
                cell: |v| match get(v, &["events"]) {
                    Some(Value::Array(events)) => events
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => coerce(other),
                },
            },
            Column { header: "Active", cell: |v| coerce(get(v, &["active"])) },
        ],
        EntityKind::Comment => vec![
            Column { header: "ID", cell: |v| coerce(get(v, &["id"])) },
            Column { header: "Author", cell: |v| user_cell(v, &["user"]) },
            Column { header: "Created", cell: |v| date_cell(v, &["created_on"]) },
            Column { header: "Content", cell: |v| excerpt_cell(v, &["content", "raw"]) },
        ],
        EntityKind::Other => return None,
    };
    Some(columns)
}

/// Fallback table for kinds with no hand-specified layout: the first five
/// keys of the first item, in insertion order.
fn generic_table(items: &[Value]) -> String {
    let keys: Vec<&str> = match items.first() {
        Some(Value::Object(map)) => map.keys().take(5).map(String::as_str).collect(),
        _ => {
            return items
                .iter()
                .map(|item| format!("- {}", coerce(Some(item))))
                .collect::<Vec<_>>()
                .join("\n");
        }
    };

    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(format!("| {} |", keys.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; keys.len()].join("|")));
    for item in items {
        lines.push(format!(
            "| {} |",
            keys.iter()
                .map(|key| cell(coerce(item.get(key))))
                .collect::<Vec<_>>()
                .join(" | ")
        ));
    }
    lines.join("\n")
}

// ── Key/value rendering for single objects ──────────────────────────

fn key_value_lines(map: &serde_json::Map<String, Value>) -> String {
    let mut lines = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => lines.push(format!("**{key}:** -")),
            Value::String(s) => lines.push(format!("**{key}:** {s}")),
            Value::Number(n) => lines.push(format!("**{key}:** {n}")),
            Value::Bool(b) => lines.push(format!("**{key}:** {b}")),
            Value::Array(items) if items.iter().all(|i| !i.is_object() && !i.is_array()) => {
                let joined = items
                    .iter()
                    .map(|i| coerce(Some(i)))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("**{key}:** {joined}"));
            }
            // Nested structures recurse into structured-text rendering.
            nested => lines.push(format!("**{key}:**\n{}", pretty(nested))),
        }
    }
    lines.join("\n")
}

// ── Cell-level rendering rules ──────────────────────────────────────

/// Finalize a cell: collapse newlines, escape pipes, dash out blanks.
fn cell(text: String) -> String {
    let flat = text.replace('\n', " ").replace('|', "\\|");
    let trimmed = flat.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Best-effort string coercion for any JSON shape.
fn coerce(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(obj @ Value::Object(_)) => {
            user_name(obj).unwrap_or_else(|| excerpt_str(&obj.to_string()))
        }
        Some(arr @ Value::Array(_)) => excerpt_str(&arr.to_string()),
    }
}

fn get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(key))
}

fn get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get(value, path).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn text_cell(value: &Value, path: &[&str]) -> String {
    coerce(get(value, path))
}

/// Timestamps render as the date only, no time component.
fn date_cell(value: &Value, path: &[&str]) -> String {
    match get_str(value, path) {
        Some(ts) => date_only(ts),
        None => "-".to_string(),
    }
}

fn date_only(timestamp: &str) -> String {
    timestamp
        .split('T')
        .next()
        .unwrap_or(timestamp)
        .to_string()
}

/// Hashes and UUIDs truncate to 7 characters.
fn hash_cell(value: &Value, path: &[&str]) -> String {
    match get_str(value, path) {
        Some(id) => short_hash(id),
        None => "-".to_string(),
    }
}

fn short_hash(id: &str) -> String {
    let bare = id.trim_start_matches('{').trim_end_matches('}');
    bare.chars().take(7).collect()
}

/// Free text renders as its first line, truncated to 50 characters.
fn excerpt_cell(value: &Value, path: &[&str]) -> String {
    match get_str(value, path) {
        Some(text) => excerpt_str(text),
        None => "-".to_string(),
    }
}

fn excerpt_str(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > EXCERPT_LEN {
        let truncated: String = line.chars().take(EXCERPT_LEN - 3).collect();
        format!("{}...", truncated.trim_end())
    } else {
        line.to_string()
    }
}

/// User-like fields prefer the display name, then nickname/username, then
/// the raw string, else `-`.
fn user_cell(value: &Value, path: &[&str]) -> String {
    match get(value, path) {
        Some(user) => resolve_user(user),
        None => "-".to_string(),
    }
}

fn resolve_user(user: &Value) -> String {
    match user {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Object(_) => user_name(user)
            .or_else(|| {
                // Commit authors nest the account under `user` next to `raw`.
                user.get("user").map(resolve_user).filter(|n| n != "-")
            })
            .or_else(|| get_str(user, &["raw"]).map(str::to_owned))
            .unwrap_or_else(|| "-".to_string()),
        _ => "-".to_string(),
    }
}

fn user_name(user: &Value) -> Option<String> {
    user.get("display_name")
        .or_else(|| user.get("nickname"))
        .or_else(|| user.get("username"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::normalize;
    use serde_json::json;

    fn pr_page() -> NormalizedPage {
        normalize(&json!({
            "size": 2,
            "values": [
                {
                    "id": 42,
                    "title": "Add rate limiting",
                    "state": "OPEN",
                    "author": {"display_name": "Ada Lovelace"},
                    "source": {"branch": {"name": "feature/limits"}},
                    "destination": {"branch": {"name": "main"}}
                },
                {
                    "id": 43,
                    "title": "Fix pagination",
                    "state": "MERGED",
                    "author": {"nickname": "grace"},
                    "source": {"branch": {"name": "bugfix/pages"}},
                    "destination": {"branch": {"name": "main"}}
                }
            ]
        }))
    }

    #[test]
    fn pull_request_table_has_exact_columns_in_input_order() {
        let text = page_text(&pr_page(), OutputMode::Tabular, EntityKind::PullRequest);
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "| ID | Title | State | Author | Source -> Dest |"
        );
        assert_eq!(lines.next().unwrap(), "|---|---|---|---|---|");
        let row1 = lines.next().unwrap();
        assert!(row1.contains("| 42 |"));
        assert!(row1.contains("Ada Lovelace"));
        assert!(row1.contains("feature/limits -> main"));
        let row2 = lines.next().unwrap();
        assert!(row2.contains("| 43 |"));
        assert!(row2.contains("grace"));
    }

    #[test]
    fn empty_collection_renders_placeholder_not_table() {
        let empty = normalize(&json!({"values": []}));
        let text = page_text(&empty, OutputMode::Tabular, EntityKind::Repository);
        assert_eq!(text, "No items found.");
        assert!(!text.contains('|'));
    }

    #[test]
    fn structured_output_round_trips() {
        let page = pr_page();
        let text = page_text(&page, OutputMode::Structured, EntityKind::PullRequest);
        let back: NormalizedPage = serde_json::from_str(&text).unwrap();
        assert_eq!(back, page);
    }

    #[test]
    fn commit_cells_follow_rendering_rules() {
        let commits = normalize(&json!({
            "values": [{
                "hash": "a1b2c3d4e5f6a7b8",
                "date": "2024-03-07T15:04:05+00:00",
                "author": {"raw": "Solo Hacker <solo@example.com>"},
                "message": "Rework the pagination normalizer so that every envelope shape is accepted\n\nLong body here"
            }]
        }));
        let text = page_text(&commits, OutputMode::Tabular, EntityKind::Commit);
        let row = text.lines().nth(2).unwrap();
        assert!(row.contains("| a1b2c3d |"));
        assert!(row.contains("| 2024-03-07 |"));
        assert!(row.contains("Solo Hacker <solo@example.com>"));
        // First line only, truncated to 50 chars.
        assert!(row.contains("Rework the pagination normalizer so that every..."));
        assert!(!row.contains("Long body"));
    }

    #[test]
    fn commit_author_prefers_account_display_name() {
        let commits = normalize(&json!({
            "values": [{
                "hash": "deadbeef00",
                "author": {
                    "raw": "A. Raw <raw@example.com>",
                    "user": {"display_name": "Account Name"}
                }
            }]
        }));
        let text = page_text(&commits, OutputMode::Tabular, EntityKind::Commit);
        assert!(text.contains("Account Name"));
        assert!(!text.contains("A. Raw"));
    }

    #[test]
    fn missing_scalars_render_as_dash() {
        let issues = normalize(&json!({
            "values": [{"id": 7, "title": "Crash on start"}]
        }));
        let text = page_text(&issues, OutputMode::Tabular, EntityKind::Issue);
        let row = text.lines().nth(2).unwrap();
        assert_eq!(row, "| 7 | Crash on start | - | - | - |");
    }

    #[test]
    fn unknown_kind_uses_first_five_keys_in_insertion_order() {
        let page = normalize(&json!({
            "values": [
                {"alpha": 1, "beta": "b", "gamma": null, "delta": true, "epsilon": 5, "zeta": "dropped"}
            ]
        }));
        let text = page_text(&page, OutputMode::Tabular, EntityKind::Other);
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "| alpha | beta | gamma | delta | epsilon |");
        lines.next();
        assert_eq!(lines.next().unwrap(), "| 1 | b | - | true | 5 |");
    }

    #[test]
    fn single_object_renders_key_value_list_with_nested_json() {
        let value = json!({
            "username": "ada",
            "display_name": "Ada Lovelace",
            "links": {"self": {"href": "https://api/x"}}
        });
        let text = entity_text(&value, OutputMode::Tabular, EntityKind::Other);
        assert!(text.contains("**username:** ada"));
        assert!(text.contains("**display_name:** Ada Lovelace"));
        // Nested objects recurse into pretty JSON.
        assert!(text.contains("**links:**\n{"));
        assert!(text.contains("\"href\": \"https://api/x\""));
    }

    #[test]
    fn formatter_is_total_over_arbitrary_input() {
        let oddballs = [
            json!(null),
            json!(3.25),
            json!("plain string"),
            json!([[1, 2], {"deep": {"deeper": []}}, null]),
            json!({"values": [null, 17, "str", {"a": {"b": "c"}}]}),
        ];
        for odd in &oddballs {
            for kind in [EntityKind::PullRequest, EntityKind::Other, EntityKind::Commit] {
                for mode in [OutputMode::Structured, OutputMode::Tabular] {
                    let _ = entity_text(odd, mode, kind);
                    let _ = page_text(&normalize(odd), mode, kind);
                }
            }
        }
    }

    #[test]
    fn pagination_footer_reports_more_results() {
        let page = normalize(&json!({
            "size": 120,
            "next": "https://api/x?page=2",
            "values": [{"id": 1}]
        }));
        let text = page_text(&page, OutputMode::Tabular, EntityKind::Issue);
        assert!(text.contains("Showing 1 of 120 items."));
        assert!(text.contains("More results are available on the next page."));
    }

    #[test]
    fn webhook_uuid_truncates_like_a_hash() {
        let hooks = normalize(&json!({
            "values": [{
                "uuid": "{63a35b8f-1a2b-4c3d-9e8f-001122334455}",
                "url": "https://ci.example.com/hook",
                "events": ["repo:push", "pullrequest:created"],
                "active": true
            }]
        }));
        let text = page_text(&hooks, OutputMode::Tabular, EntityKind::Webhook);
        let row = text.lines().nth(2).unwrap();
        assert!(row.contains("| 63a35b8 |"));
        assert!(row.contains("repo:push, pullrequest:created"));
        assert!(row.contains("| true |"));
    }
}
