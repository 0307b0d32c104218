use std::collections::BTreeMap;
use std::fmt;

use crate::encoding::percent_encode;
use crate::v1a::values::*;

/// A signed `Authorization` header value.
///
/// Holds the raw (unencoded) OAuth parameters including `oauth_signature`.
/// Rendering encodes every key and value and lists them in ascending key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationHeader {
    params: BTreeMap<&'static str, String>,
}

impl AuthorizationHeader {
    pub(crate) fn new(params: BTreeMap<&'static str, String>) -> Self {
        AuthorizationHeader { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn nonce(&self) -> &str {
        self.get(OAUTH_PARAM_KEY_NONCE).unwrap_or_default()
    }

    pub fn timestamp(&self) -> &str {
        self.get(OAUTH_PARAM_KEY_TIMESTAMP).unwrap_or_default()
    }

    pub fn signature(&self) -> &str {
        self.get(OAUTH_PARAM_KEY_SIGNATURE).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.keys().copied()
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", OAUTH_HEADER)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}=\"{}\"", percent_encode(k), percent_encode(v))?;
        }
        Ok(())
    }
}

impl From<AuthorizationHeader> for String {
    fn from(header: AuthorizationHeader) -> Self {
        header.to_string()
    }
}

#[test]
fn test_render_sorted_and_encoded() {
    let mut params = BTreeMap::new();
    params.insert(OAUTH_PARAM_KEY_VERSION, "1.0".to_string());
    params.insert(OAUTH_PARAM_KEY_SIGNATURE, "a+b/c=".to_string());
    params.insert(OAUTH_PARAM_KEY_CONSUMER_KEY, "key with space".to_string());
    let header = AuthorizationHeader::new(params);
    assert_eq!(
        header.to_string(),
        r#"OAuth oauth_consumer_key="key%20with%20space", oauth_signature="a%2Bb%2Fc%3D", oauth_version="1.0""#
    );
    assert_eq!(header.signature(), "a+b/c=");
    assert_eq!(header.nonce(), "");
}
