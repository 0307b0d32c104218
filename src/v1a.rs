//! OAuth 1.0a request signing (HMAC-SHA1), RFC 5849.
//!
//! ```
//! use tweetsign::v1a::{HttpMethod, OAuthSigner, SignableRequest};
//! use tweetsign::Credentials;
//!
//! let signer = OAuthSigner::new(Credentials::new("ck", "cs", "token", "ts"))?;
//! let request = SignableRequest::new(HttpMethod::Post, "https://api.twitter.com/2/tweets")?;
//! let header = signer
//!     .request(&request)?
//!     .oauth_nonce("abc123")
//!     .oauth_timestamp(1_700_000_000)
//!     .sign();
//! assert!(header.to_string().starts_with("OAuth oauth_consumer_key=\"ck\""));
//! # Ok::<(), tweetsign::Error>(())
//! ```

mod header;
mod signer;
mod values;

pub use header::AuthorizationHeader;
pub use signer::{
    generate_nonce, hmac_sha1_signature, normalize_parameters, signature_base_string,
    signing_key, OAuthParameterSet, OAuthSigner, SignableRequest,
};
pub use values::{HttpMethod, OAUTH_VALUE_SIGMETHOD_HMACSHA1, OAUTH_VALUE_VERSION};
