use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required credential or setting is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input rejected before it reached the signer or the network.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The remote service answered with a non-2xx status.
    #[error("Twitter API error: {status} - {detail}")]
    RemoteApi {
        status: u16,
        detail: String,
        body: Option<serde_json::Value>,
    },

    /// DNS, connect, TLS, reset or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    pub(crate) fn missing_env(name: &str) -> Self {
        Error::Configuration(format!("missing required environment variable: {}", name))
    }

    /// Build a `RemoteApi` error from a raw response body.
    ///
    /// JSON bodies contribute their `detail` (or `title`) field as the message,
    /// anything else is carried verbatim.
    pub fn from_response(status: u16, raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json) => {
                let detail = ["detail", "title"]
                    .iter()
                    .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
                    .map(str::to_string)
                    .unwrap_or_else(|| json.to_string());
                Error::RemoteApi {
                    status,
                    detail,
                    body: Some(json),
                }
            }
            Err(_) => Error::RemoteApi {
                status,
                detail: raw.to_string(),
                body: None,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

#[test]
fn test_from_response_json_detail() {
    let e = Error::from_response(401, r#"{"title":"Unauthorized","detail":"Unauthorized","status":401}"#);
    match e {
        Error::RemoteApi {
            status,
            detail,
            body,
        } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Unauthorized");
            assert_eq!(body.unwrap()["status"], 401);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_from_response_fallbacks() {
    let e = Error::from_response(403, r#"{"title":"Forbidden"}"#);
    assert_eq!(e.to_string(), "Twitter API error: 403 - Forbidden");

    let e = Error::from_response(400, r#"{"errors":[{"message":"bad"}]}"#);
    assert_eq!(
        e.to_string(),
        r#"Twitter API error: 400 - {"errors":[{"message":"bad"}]}"#
    );

    let e = Error::from_response(502, "<html>Bad Gateway</html>");
    assert_eq!(e.status(), Some(502));
    assert_eq!(e.to_string(), "Twitter API error: 502 - <html>Bad Gateway</html>");
}
