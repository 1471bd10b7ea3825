use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound the Bitbucket API accepts for `pagelen`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Common pagination arguments accepted by every list-style tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Number of items per page (1-100). Defaults to 20.
    pub page_size: Option<i64>,
    /// Page number (1-based).
    pub page: Option<i64>,
    /// Filter expression passed through as the API `q` parameter
    /// (e.g. `state="OPEN"` or `name ~ "feature"`).
    pub query: Option<String>,
    /// Sort field; prefix with `-` for descending (e.g. `-updated_on`).
    pub sort: Option<String>,
}

impl PageParams {
    /// Page size clamped to `[1, MAX_PAGE_SIZE]`. Clamping happens here,
    /// before query serialization — out-of-range values never reach the API.
    pub fn clamped_page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Serialize into query pairs, omitting absent fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("pagelen", self.clamped_page_size().to_string())];
        if let Some(page) = self.page {
            pairs.push(("page", page.max(1).to_string()));
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", query.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sort", sort.to_string()));
        }
        pairs
    }

    /// Percent-encoded query string for this page request.
    pub fn query_string(&self) -> String {
        encode_pairs(&self.query_pairs())
    }
}

/// Percent-encode query pairs into a `k=v&k=v` string.
pub fn encode_pairs(pairs: &[(&str, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Uniform projection of Bitbucket's paginated envelope
/// `{size, page, pagelen, next, values}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPage {
    pub items: Vec<Value>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Normalize a raw paginated envelope. Total over arbitrary JSON: malformed
/// input yields an empty page rather than an error. A bare array is accepted
/// as an envelope-less item list.
pub fn normalize(raw: &Value) -> NormalizedPage {
    let items = match raw.get("values").and_then(Value::as_array) {
        Some(values) => values.clone(),
        None => raw.as_array().cloned().unwrap_or_default(),
    };
    let next_cursor = raw
        .get("next")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);
    NormalizedPage {
        count: items.len(),
        total: raw.get("size").and_then(Value::as_u64),
        has_more: next_cursor.is_some(),
        next_cursor,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_always_matches_items_len() {
        let inputs = [
            json!({"values": [{"id": 1}, {"id": 2}], "size": 50, "next": "https://x/2"}),
            json!({"values": []}),
            json!({"size": 10}),
            json!([{"id": 1}]),
            json!("not an envelope"),
            json!(null),
        ];
        for raw in inputs {
            let page = normalize(&raw);
            assert_eq!(page.count, page.items.len());
        }
    }

    #[test]
    fn has_more_follows_next_link() {
        let with_next = normalize(&json!({"values": [1], "next": "https://x/page/2"}));
        assert!(with_next.has_more);
        assert_eq!(with_next.next_cursor.as_deref(), Some("https://x/page/2"));

        let without_next = normalize(&json!({"values": [1, 2]}));
        assert!(!without_next.has_more);
        assert!(without_next.next_cursor.is_none());
    }

    #[test]
    fn total_is_optional() {
        assert_eq!(normalize(&json!({"values": [], "size": 42})).total, Some(42));
        assert_eq!(normalize(&json!({"values": []})).total, None);
    }

    #[test]
    fn malformed_input_yields_empty_page() {
        let page = normalize(&json!({"values": "oops", "next": 7}));
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total, None);
    }

    #[test]
    fn page_size_is_clamped_before_serialization() {
        let params = PageParams {
            page_size: Some(150),
            ..Default::default()
        };
        assert!(params.query_string().contains("pagelen=100"));

        let params = PageParams {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(params.query_string().contains("pagelen=1"));
    }

    #[test]
    fn defaults_and_free_text_encoding() {
        let params = PageParams::default();
        assert_eq!(params.query_string(), "pagelen=20");

        let params = PageParams {
            query: Some(r#"state="OPEN""#.to_string()),
            sort: Some("-updated_on".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let qs = params.query_string();
        assert!(qs.contains("page=2"));
        assert!(qs.contains("q=state%3D%22OPEN%22"));
        assert!(qs.contains("sort=-updated_on"));
    }
}
