//! Process configuration.
//!
//! Credentials can be loaded from the environment:
//! - `TWITTER_API_KEY` - consumer key.
//! - `TWITTER_API_KEY_SECRET` - consumer secret.
//! - `TWITTER_ACCESS_TOKEN` - user-context access token.
//! - `TWITTER_ACCESS_TOKEN_SECRET` - user-context token secret.
//! - `TWITTER_BEARER_TOKEN` - app-only token used for read-only timeline fetches.
//! - `TWITTER_USER_ID` - Optional. Timeline read by the `getUserTweets` tool. Defaults to `252099921`.
//! - `TWITTER_API_BASE` - Optional. Defaults to `https://api.twitter.com`.

use std::fmt;

use crate::error::{Error, Result};

pub const ENV_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_API_KEY_SECRET: &str = "TWITTER_API_KEY_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const ENV_USER_ID: &str = "TWITTER_USER_ID";
pub const ENV_API_BASE: &str = "TWITTER_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_USER_ID: &str = "252099921";

/// OAuth 1.0a user-context credentials. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    token_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Load the four user-context secrets.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` naming the first variable that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::missing_env(name))
        };
        Ok(Credentials {
            consumer_key: required(ENV_API_KEY)?,
            consumer_secret: required(ENV_API_KEY_SECRET)?,
            access_token: required(ENV_ACCESS_TOKEN)?,
            token_secret: required(ENV_ACCESS_TOKEN_SECRET)?,
        })
    }

    /// Fails with `Error::Configuration` if any field is empty.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer key", &self.consumer_key),
            ("consumer secret", &self.consumer_secret),
            ("access token", &self.access_token),
            ("access token secret", &self.token_secret),
        ];
        for (name, value) in fields.iter() {
            if value.is_empty() {
                return Err(Error::Configuration(format!("{} is empty", name)));
            }
        }
        Ok(())
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub(crate) fn token_secret(&self) -> &str {
        &self.token_secret
    }
}

// secrets never reach logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// Everything the Twitter client and tools need.
///
/// Each credential group is optional here; the operation that needs it
/// reports `Error::Configuration` when it is absent.
#[derive(Clone)]
pub struct TwitterConfig {
    pub credentials: Option<Credentials>,
    pub bearer_token: Option<String>,
    pub user_id: String,
    pub api_base: url::Url,
}

impl TwitterConfig {
    pub fn new() -> Self {
        TwitterConfig {
            credentials: None,
            bearer_token: None,
            user_id: DEFAULT_USER_ID.to_string(),
            api_base: default_api_base(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A half-configured credential set is an error, a fully absent one is not.
        let any_credential = [
            ENV_API_KEY,
            ENV_API_KEY_SECRET,
            ENV_ACCESS_TOKEN,
            ENV_ACCESS_TOKEN_SECRET,
        ]
        .iter()
        .any(|name| lookup(*name).map_or(false, |v| !v.is_empty()));
        let credentials = if any_credential {
            Some(Credentials::from_lookup(&lookup)?)
        } else {
            None
        };

        let bearer_token = lookup(ENV_BEARER_TOKEN).filter(|v| !v.is_empty());
        let user_id = lookup(ENV_USER_ID)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        let api_base = match lookup(ENV_API_BASE).filter(|v| !v.is_empty()) {
            Some(raw) => url::Url::parse(&raw).map_err(|e| {
                Error::Configuration(format!("invalid value for {}: {}", ENV_API_BASE, e))
            })?,
            None => default_api_base(),
        };

        Ok(TwitterConfig {
            credentials,
            bearer_token,
            user_id,
            api_base,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_api_base(mut self, api_base: url::Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(missing_credentials)
    }

    pub fn bearer_token(&self) -> Result<&str> {
        self.bearer_token
            .as_deref()
            .ok_or_else(|| Error::missing_env(ENV_BEARER_TOKEN))
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        TwitterConfig::new()
    }
}

impl fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("credentials", &self.credentials)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

pub(crate) fn missing_credentials() -> Error {
    Error::Configuration(format!(
        "OAuth 1.0a credentials are required ({}, {}, {}, {})",
        ENV_API_KEY, ENV_API_KEY_SECRET, ENV_ACCESS_TOKEN, ENV_ACCESS_TOKEN_SECRET
    ))
}

fn default_api_base() -> url::Url {
    url::Url::parse(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        (ENV_API_KEY, "ck"),
        (ENV_API_KEY_SECRET, "cs"),
        (ENV_ACCESS_TOKEN, "at"),
        (ENV_ACCESS_TOKEN_SECRET, "ts"),
    ];

    #[test]
    fn test_credentials_from_lookup() {
        let c = Credentials::from_lookup(lookup_from(FULL)).unwrap();
        assert_eq!(c, Credentials::new("ck", "cs", "at", "ts"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = Credentials::from_lookup(lookup_from(&FULL[..3])).unwrap_err();
        match err {
            Error::Configuration(msg) => assert!(msg.contains(ENV_ACCESS_TOKEN_SECRET)),
            other => panic!("unexpected: {:?}", other),
        }

        let mut empty = FULL.to_vec();
        empty[0] = (ENV_API_KEY, "");
        let err = Credentials::from_lookup(lookup_from(&empty)).unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_validate_empty_field() {
        let c = Credentials::new("ck", "", "at", "ts");
        assert!(matches!(c.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let c = Credentials::new("ck", "super-secret", "at", "token-secret");
        let shown = format!("{:?}", c);
        assert!(!shown.contains("super-secret"));
        assert!(!shown.contains("token-secret"));
        assert!(shown.contains("ck"));

        let config = TwitterConfig::new()
            .with_credentials(c)
            .with_bearer_token("bearer-secret");
        let shown = format!("{:?}", config);
        assert!(!shown.contains("bearer-secret"));
        assert!(!shown.contains("super-secret"));
    }

    #[test]
    fn test_twitter_config_defaults() {
        let config = TwitterConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.credentials.is_none());
        assert!(config.bearer_token.is_none());
        assert_eq!(config.user_id, DEFAULT_USER_ID);
        assert_eq!(config.api_base.as_str(), "https://api.twitter.com/");
        assert!(matches!(config.credentials(), Err(Error::Configuration(_))));
        assert!(matches!(config.bearer_token(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_twitter_config_full() {
        let mut pairs = FULL.to_vec();
        pairs.push((ENV_BEARER_TOKEN, "bearer"));
        pairs.push((ENV_USER_ID, "42"));
        pairs.push((ENV_API_BASE, "http://127.0.0.1:8080"));
        let config = TwitterConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.credentials().unwrap().consumer_key(), "ck");
        assert_eq!(config.bearer_token().unwrap(), "bearer");
        assert_eq!(config.user_id, "42");
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_twitter_config_partial_credentials_rejected() {
        let err = TwitterConfig::from_lookup(lookup_from(&FULL[..1])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_twitter_config_bad_base() {
        let err = TwitterConfig::from_lookup(lookup_from(&[(ENV_API_BASE, "::nope")])).unwrap_err();
        assert!(err.to_string().contains(ENV_API_BASE));
    }
}
