use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

impl Tweet {
    /// Metrics with absent counters read as zero.
    pub fn metrics(&self) -> PublicMetrics {
        self.public_metrics.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

// v2 wraps timelines in {"data": [...], "meta": {...}}; "data" is omitted when empty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TimelineBody {
    Bare(Vec<Tweet>),
    Envelope {
        #[serde(default)]
        data: Vec<Tweet>,
    },
}

impl TimelineBody {
    pub fn into_tweets(self) -> Vec<Tweet> {
        match self {
            TimelineBody::Bare(tweets) => tweets,
            TimelineBody::Envelope { data } => data,
        }
    }
}
