use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::config::Credentials;
use crate::encoding::{percent_encode, percent_encode_cow};
use crate::error::{Error, Result};
use crate::parameters::RequestParams;
use crate::util;
use crate::v1a::header::AuthorizationHeader;
use crate::v1a::values::*;

type HmacSha1 = Hmac<Sha1>;

const NONCE_BYTES: usize = 16;

/// Method, endpoint and the request parameters that take part in signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignableRequest {
    method: HttpMethod,
    endpoint: String,
    params: RequestParams,
}

impl SignableRequest {
    /// `endpoint` must be absolute and carry no query string; use
    /// [`SignableRequest::from_url`] for URLs with a query.
    pub fn new(method: HttpMethod, endpoint: &str) -> Result<Self> {
        let url = util::parse_url(endpoint)?;
        if url.query().is_some() {
            return Err(Error::InvalidParameter(format!(
                "endpoint {} must not carry a query string",
                endpoint
            )));
        }
        Self::from_url(method, &url)
    }

    /// The query string is stripped from the endpoint and its pairs become
    /// request parameters. A repeated query key is rejected.
    pub fn from_url(method: HttpMethod, url: &url::Url) -> Result<Self> {
        let (endpoint, query) = util::url_to_endpoint_and_queries(url)?;
        Ok(SignableRequest {
            method,
            endpoint,
            params: RequestParams::from(query),
        })
    }

    pub fn param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_params(&self) -> &RequestParams {
        &self.params
    }
}

/// OAuth 1.0a HMAC-SHA1 signer bound to one set of credentials.
#[derive(Clone, Debug)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        Ok(OAuthSigner { credentials })
    }

    /// Start an unsigned parameter set with a fresh nonce and the current time.
    pub fn request<'a>(&'a self, request: &'a SignableRequest) -> Result<OAuthParameterSet<'a>> {
        if let Some(key) = request
            .params
            .iter()
            .map(|(k, _)| k.as_str())
            .find(|k| RESERVED_PARAM_KEYS.contains(k))
        {
            return Err(Error::InvalidParameter(format!(
                "request parameter {} is generated by the signer",
                key
            )));
        }
        Ok(OAuthParameterSet {
            credentials: &self.credentials,
            request,
            nonce: generate_nonce(),
            timestamp: Utc::now().timestamp(),
        })
    }

    pub fn build_authorization_header(&self, request: &SignableRequest) -> Result<AuthorizationHeader> {
        Ok(self.request(request)?.sign())
    }
}

/// The OAuth parameters of one request before signing.
///
/// `sign` is terminal: the signature exists only on the returned header.
#[derive(Debug)]
pub struct OAuthParameterSet<'a> {
    credentials: &'a Credentials,
    request: &'a SignableRequest,
    nonce: String,
    timestamp: i64,
}

impl<'a> OAuthParameterSet<'a> {
    pub fn oauth_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    pub fn oauth_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn oauth_params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert(
            OAUTH_PARAM_KEY_CONSUMER_KEY,
            self.credentials.consumer_key().to_string(),
        );
        params.insert(OAUTH_PARAM_KEY_TOKEN, self.credentials.access_token().to_string());
        params.insert(
            OAUTH_PARAM_KEY_SIGNATURE_METHOD,
            OAUTH_VALUE_SIGMETHOD_HMACSHA1.to_string(),
        );
        params.insert(OAUTH_PARAM_KEY_TIMESTAMP, self.timestamp.to_string());
        params.insert(OAUTH_PARAM_KEY_NONCE, self.nonce.clone());
        params.insert(OAUTH_PARAM_KEY_VERSION, OAUTH_VALUE_VERSION.to_string());
        params
    }

    /// The exact string the signature is computed over.
    pub fn signature_base_string(&self) -> String {
        let oauth_params = self.oauth_params();
        let all_params = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(self.request.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let normalized = normalize_parameters(all_params);
        signature_base_string(self.request.method.as_str(), &self.request.endpoint, &normalized)
    }

    pub fn sign(self) -> AuthorizationHeader {
        tracing::trace!(
            method = %self.request.method,
            endpoint = %self.request.endpoint,
            params = self.request.params.len(),
            "signing request"
        );
        let base_str = self.signature_base_string();
        let key = signing_key(
            self.credentials.consumer_secret(),
            Some(self.credentials.token_secret()),
        );
        let signature = hmac_sha1_signature(&key, &base_str);

        let mut params = self.oauth_params();
        params.insert(OAUTH_PARAM_KEY_SIGNATURE, signature);
        AuthorizationHeader::new(params)
    }
}

/// 16 bytes from the OS RNG, lowercase hex.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Encode every pair, sort, and join as `k=v&k=v`.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded = params
        .into_iter()
        .map(|(k, v)| (percent_encode_cow(k), percent_encode_cow(v)))
        .collect::<Vec<(Cow<str>, Cow<str>)>>();

    // then, alphabetic sort by key
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&")
}

/// `METHOD&enc(endpoint)&enc(normalized params)`
pub fn signature_base_string(http_method: &str, endpoint: &str, normalized_params: &str) -> String {
    // (parameters are encoded twice.)
    let http_method = http_method.to_ascii_uppercase();
    format!(
        "{}&{}&{}",
        percent_encode(&http_method),
        percent_encode(endpoint),
        percent_encode(normalized_params)
    )
}

pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or(""))
    )
}

/// Base64 of the raw HMAC-SHA1 digest.
pub fn hmac_sha1_signature(key: &str, base_str: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC-SHA1 accepts keys of any length");
    mac.update(base_str.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
