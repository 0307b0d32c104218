use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub const OAUTH_VALUE_VERSION: &str = "1.0";
pub const OAUTH_VALUE_SIGMETHOD_HMACSHA1: &str = "HMAC-SHA1";

pub const OAUTH_HEADER: &str = "OAuth";
pub const OAUTH_PARAM_KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_PARAM_KEY_NONCE: &str = "oauth_nonce";
pub const OAUTH_PARAM_KEY_SIGNATURE: &str = "oauth_signature";
pub const OAUTH_PARAM_KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_PARAM_KEY_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_PARAM_KEY_TOKEN: &str = "oauth_token";
pub const OAUTH_PARAM_KEY_VERSION: &str = "oauth_version";

/// Keys the signer generates itself; request parameters may not reuse them.
pub const RESERVED_PARAM_KEYS: [&str; 7] = [
    OAUTH_PARAM_KEY_CONSUMER_KEY,
    OAUTH_PARAM_KEY_NONCE,
    OAUTH_PARAM_KEY_SIGNATURE,
    OAUTH_PARAM_KEY_SIGNATURE_METHOD,
    OAUTH_PARAM_KEY_TIMESTAMP,
    OAUTH_PARAM_KEY_TOKEN,
    OAUTH_PARAM_KEY_VERSION,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<HttpMethod> for &'static str {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(Error::InvalidParameter(format!(
                "unsupported HTTP method: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_http_method_parse() {
    assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
    assert_eq!("Get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
    assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    assert!("BREW".parse::<HttpMethod>().is_err());
}
