use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::{TwitterConfig, ENV_BEARER_TOKEN};
use crate::error::{Error, Result};
use crate::twitter::model::{DataEnvelope, PostedTweet, TimelineBody, Tweet};
use crate::v1a::{HttpMethod, OAuthSigner, SignableRequest};

pub const MAX_TWEET_CHARS: usize = 280;
pub const MIN_RESULTS: u8 = 1;
pub const MAX_RESULTS: u8 = 10;
pub const TWEET_FIELDS: &str = "created_at,public_metrics,text";

const PATH_TWEETS: &str = "/2/tweets";

/// Thin Twitter API v2 client. Performs no retries and sets no timeout of its own.
#[derive(Clone, Debug)]
pub struct TwitterClient {
    http: reqwest::Client,
    config: TwitterConfig,
    signer: Option<OAuthSigner>,
    bearer: Option<HeaderValue>,
}

impl TwitterClient {
    pub fn new(config: TwitterConfig) -> Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: TwitterConfig, http: reqwest::Client) -> Result<Self> {
        let signer = config.credentials.clone().map(OAuthSigner::new).transpose()?;
        let bearer = config.bearer_token.as_deref().map(bearer_header).transpose()?;
        Ok(TwitterClient {
            http,
            config,
            signer,
            bearer,
        })
    }

    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    fn signer(&self) -> Result<&OAuthSigner> {
        self.signer.as_ref().ok_or_else(crate::config::missing_credentials)
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        self.config.api_base.join(path).map_err(|e| {
            Error::Configuration(format!("cannot build {} from {}: {}", path, self.config.api_base, e))
        })
    }

    /// `POST /2/tweets` with user-context OAuth 1.0a.
    ///
    /// Content is validated before any request is made.
    pub async fn post_tweet(&self, content: &str) -> Result<PostedTweet> {
        validate_tweet(content)?;
        let signer = self.signer()?;
        let url = self.endpoint(PATH_TWEETS)?;

        // the JSON body does not take part in the signature
        let request = SignableRequest::from_url(HttpMethod::Post, &url)?;
        let header = signer.build_authorization_header(&request)?;

        tracing::debug!(endpoint = %request.endpoint(), chars = content.chars().count(), "posting tweet");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, String::from(header))
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "text": content }))
            .send()
            .await?;

        let posted = read_json::<DataEnvelope<PostedTweet>>(response).await?.data;
        tracing::info!(id = %posted.id, "tweet posted");
        Ok(posted)
    }

    /// `GET /2/users/{user_id}/tweets` with the app-only bearer token.
    pub async fn get_user_tweets(&self, user_id: &str, count: u8) -> Result<Vec<Tweet>> {
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&count) {
            return Err(Error::InvalidParameter(format!(
                "count must be between {} and {}, got {}",
                MIN_RESULTS, MAX_RESULTS, count
            )));
        }
        if user_id.is_empty() || !user_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidParameter(format!(
                "user id must be numeric, got {:?}",
                user_id
            )));
        }
        let bearer = self
            .bearer
            .clone()
            .ok_or_else(|| Error::missing_env(ENV_BEARER_TOKEN))?;
        let mut url = self.endpoint(&format!("/2/users/{}/tweets", user_id))?;
        url.query_pairs_mut()
            .append_pair("max_results", &count.to_string())
            .append_pair("tweet.fields", TWEET_FIELDS);

        tracing::debug!(user_id, count, "fetching user tweets");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        Ok(read_json::<TimelineBody>(response).await?.into_tweets())
    }

    /// The default timeline from configuration.
    pub async fn get_configured_user_tweets(&self, count: u8) -> Result<Vec<Tweet>> {
        self.get_user_tweets(&self.config.user_id, count).await
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        Error::Configuration(format!(
            "{} contains characters not allowed in an HTTP header",
            ENV_BEARER_TOKEN
        ))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Non-empty and at most [`MAX_TWEET_CHARS`] characters.
pub fn validate_tweet(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::InvalidParameter("tweet content is empty".into()));
    }
    let chars = content.chars().count();
    if chars > MAX_TWEET_CHARS {
        return Err(Error::InvalidParameter(format!(
            "Tweet content must be {} characters or less, got {}",
            MAX_TWEET_CHARS, chars
        )));
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let raw = response.text().await?;
    if !status.is_success() {
        let err = Error::from_response(status.as_u16(), &raw);
        tracing::warn!(status = status.as_u16(), error = %err, "Twitter API request failed");
        return Err(err);
    }
    serde_json::from_str(&raw).map_err(|e| Error::RemoteApi {
        status: status.as_u16(),
        detail: format!("unexpected response body: {}", e),
        body: serde_json::from_str(&raw).ok(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_tweet_length() {
        assert!(validate_tweet(&"a".repeat(280)).is_ok());
        assert!(matches!(
            validate_tweet(&"a".repeat(281)),
            Err(Error::InvalidParameter(_))
        ));
        // characters, not bytes
        assert!(validate_tweet(&"é".repeat(280)).is_ok());
        assert!(validate_tweet("   ").is_err());
    }

    #[test]
    fn test_missing_credentials_reported_per_operation() {
        let client = TwitterClient::new(TwitterConfig::new().with_bearer_token("b")).unwrap();
        assert!(matches!(client.signer(), Err(Error::Configuration(_))));
        assert_eq!(client.config().bearer_token().unwrap(), "b");
    }

    #[test]
    fn test_invalid_credentials_rejected_at_construction() {
        let config = TwitterConfig::new().with_credentials(crate::Credentials::new("ck", "", "at", "ts"));
        assert!(matches!(TwitterClient::new(config), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_bearer_token_not_header_safe() {
        let config = TwitterConfig::new().with_bearer_token("pasted-token\n");
        match TwitterClient::new(config) {
            Err(Error::Configuration(msg)) => {
                assert!(msg.contains(ENV_BEARER_TOKEN));
                assert!(!msg.contains("pasted-token"));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }

        let client = TwitterClient::new(TwitterConfig::new().with_bearer_token("ok-token")).unwrap();
        let header = client.bearer.as_ref().unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer ok-token");
        assert!(header.is_sensitive());
    }
}
