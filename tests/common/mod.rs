#![allow(dead_code)]

use axum::Router;
use std::collections::BTreeMap;
use tweetsign::encoding::percent_decode;
use tweetsign::{Credentials, TwitterConfig};

pub const CONSUMER_KEY: &str = "test-consumer-key";
pub const CONSUMER_SECRET: &str = "test-consumer-secret";
pub const ACCESS_TOKEN: &str = "test-access-token";
pub const TOKEN_SECRET: &str = "test-token-secret";
pub const BEARER: &str = "test-bearer-token";

pub fn credentials() -> Credentials {
    Credentials::new(CONSUMER_KEY, CONSUMER_SECRET, ACCESS_TOKEN, TOKEN_SECRET)
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn(router: Router) -> url::Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    url::Url::parse(&format!("http://{}", addr)).unwrap()
}

/// A base URL nothing listens on.
pub fn dead_base() -> url::Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    url::Url::parse(&format!("http://{}", addr)).unwrap()
}

pub fn config(base: url::Url) -> TwitterConfig {
    TwitterConfig::new()
        .with_credentials(credentials())
        .with_bearer_token(BEARER)
        .with_user_id("252099921")
        .with_api_base(base)
}

/// Parse `OAuth k="v", ...` back into decoded pairs.
pub fn parse_oauth_header(value: &str) -> BTreeMap<String, String> {
    value
        .strip_prefix("OAuth ")
        .expect("OAuth scheme")
        .split(", ")
        .map(|pair| {
            let (k, v) = pair.split_once('=').expect("key=value");
            let v = v.trim_matches('"');
            (
                percent_decode(k).unwrap().into_owned(),
                percent_decode(v).unwrap().into_owned(),
            )
        })
        .collect()
}
