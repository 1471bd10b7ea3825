use crate::error::{BitbucketError, Result};

const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

/// Authentication mode, fixed at construction time.
#[derive(Clone)]
pub enum Auth {
    /// OAuth/workspace access token, sent as `Authorization: Bearer`.
    Bearer(String),
    /// Username + app password, sent as `Authorization: Basic`.
    Basic {
        username: String,
        app_password: String,
    },
}

// Manual Debug so credential material never lands in logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Auth::Bearer(***)"),
            Auth::Basic { username, .. } => f
                .debug_struct("Auth::Basic")
                .field("username", username)
                .field("app_password", &"***")
                .finish(),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Bitbucket API (defaults to `https://api.bitbucket.org/2.0`).
    pub base_url: String,
    /// Credentials for every outbound call.
    pub auth: Auth,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Either `BITBUCKET_ACCESS_TOKEN`, or `BITBUCKET_USERNAME` +
    /// `BITBUCKET_APP_PASSWORD`, must be set. `BITBUCKET_BASE_URL` optionally
    /// overrides the API base (e.g. for a mock server).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore missing .env

        let token = std::env::var("BITBUCKET_ACCESS_TOKEN").ok();
        let username = std::env::var("BITBUCKET_USERNAME").ok();
        let app_password = std::env::var("BITBUCKET_APP_PASSWORD").ok();
        let base_url = std::env::var("BITBUCKET_BASE_URL").ok();

        Self::resolve(token, username, app_password, base_url)
    }

    /// Resolve a configuration from explicit values. Token wins when both
    /// modes are supplied; absence of both is a construction-time failure.
    pub fn resolve(
        token: Option<String>,
        username: Option<String>,
        app_password: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            return Ok(Config {
                base_url,
                auth: Auth::Bearer(token),
            });
        }

        match (username, app_password) {
            (Some(username), Some(app_password))
                if !username.is_empty() && !app_password.is_empty() =>
            {
                Ok(Config {
                    base_url,
                    auth: Auth::Basic {
                        username,
                        app_password,
                    },
                })
            }
            _ => Err(BitbucketError::InvalidParams(
                "No Bitbucket credentials found. Set BITBUCKET_ACCESS_TOKEN, or \
                 BITBUCKET_USERNAME + BITBUCKET_APP_PASSWORD."
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_mode_wins_over_basic() {
        let config = Config::resolve(
            Some("tok".into()),
            Some("alice".into()),
            Some("pw".into()),
            None,
        )
        .unwrap();
        assert!(matches!(config.auth, Auth::Bearer(_)));
        assert_eq!(config.base_url, "https://api.bitbucket.org/2.0");
    }

    #[test]
    fn basic_mode_requires_both_halves() {
        assert!(Config::resolve(None, Some("alice".into()), None, None).is_err());
        assert!(Config::resolve(None, None, Some("pw".into()), None).is_err());
        let config =
            Config::resolve(None, Some("alice".into()), Some("pw".into()), None).unwrap();
        assert!(matches!(config.auth, Auth::Basic { .. }));
    }

    #[test]
    fn missing_credentials_fail_at_construction() {
        assert!(Config::resolve(None, None, None, None).is_err());
        assert!(Config::resolve(Some(String::new()), None, None, None).is_err());
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = Config::resolve(
            Some("tok".into()),
            None,
            None,
            Some("http://localhost:8080/2.0/".into()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/2.0");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::resolve(
            None,
            Some("alice".into()),
            Some("s3cret".into()),
            None,
        )
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
    }
}
