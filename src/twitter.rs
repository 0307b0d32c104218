//! Twitter API v2 callers.
//!
//! Posting uses OAuth 1.0a user context, timeline reads use the app-only
//! bearer token. The transport is chosen by the operation, never negotiated.

mod client;
mod model;

pub use client::{
    validate_tweet, TwitterClient, MAX_RESULTS, MAX_TWEET_CHARS, MIN_RESULTS, TWEET_FIELDS,
};
pub use model::{PostedTweet, PublicMetrics, Tweet};
