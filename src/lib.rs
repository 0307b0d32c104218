pub mod config;
pub mod encoding;
pub mod error;
pub mod parameters;
pub mod tools;
#[cfg(feature = "client")]
pub mod twitter;
pub mod v1a;

mod util;

pub use config::{Credentials, TwitterConfig};
pub use error::{Error, Result};
pub use parameters::RequestParams;
#[cfg(feature = "client")]
pub use twitter::{PostedTweet, PublicMetrics, Tweet, TwitterClient};
pub use v1a::{AuthorizationHeader, HttpMethod, OAuthSigner, SignableRequest};
