use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::Result;
use crate::tools::{parse_input, Tool, ToolHandler, ToolSchema};
use crate::twitter::{validate_tweet, Tweet, TwitterClient, MAX_RESULTS, MAX_TWEET_CHARS, MIN_RESULTS};

const DEFAULT_COUNT: u8 = 5;

#[derive(Deserialize)]
struct ComposeInput {
    content: String,
}

struct ComposeTweet(Arc<TwitterClient>);

#[async_trait]
impl ToolHandler for ComposeTweet {
    async fn call(&self, input: Value) -> Result<String> {
        let ComposeInput { content } = parse_input("composeTweet", input)?;
        validate_tweet(&content)?;
        let posted = self.0.post_tweet(&content).await?;
        Ok(format!(
            "Tweet posted successfully!\n\nTweet ID: {id}\nContent: \"{content}\"\n\nYou can view it at: https://twitter.com/i/web/status/{id}",
            id = posted.id,
            content = content
        ))
    }
}

fn default_count() -> u8 {
    DEFAULT_COUNT
}

#[derive(Deserialize)]
struct TimelineInput {
    #[serde(default = "default_count")]
    count: u8,
}

struct GetUserTweets(Arc<TwitterClient>);

#[async_trait]
impl ToolHandler for GetUserTweets {
    async fn call(&self, input: Value) -> Result<String> {
        let TimelineInput { count } = parse_input("getUserTweets", input)?;
        let tweets = self.0.get_configured_user_tweets(count).await?;
        Ok(render_timeline(&tweets))
    }
}

pub(crate) fn render_timeline(tweets: &[Tweet]) -> String {
    if tweets.is_empty() {
        return "No recent tweets found.".to_string();
    }
    let body = tweets
        .iter()
        .enumerate()
        .map(|(i, tweet)| {
            let metrics = tweet.metrics();
            let date = tweet
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown date".to_string());
            format!(
                "{}. \"{}\"\n   {}\n   likes: {} | retweets: {} | replies: {}\n",
                i + 1,
                tweet.text,
                date,
                metrics.like_count,
                metrics.retweet_count,
                metrics.reply_count
            )
        })
        .collect::<Vec<String>>()
        .join("\n");
    format!(
        "Here are your {} most recent tweets:\n\n{}",
        tweets.len(),
        body
    )
}

/// `composeTweet` (confirmed) and `getUserTweets` (automatic).
pub fn twitter_tools(client: Arc<TwitterClient>) -> Vec<Tool> {
    vec![
        Tool::confirmed(
            ToolSchema::new(
                "composeTweet",
                "compose and post a tweet to Twitter",
                json!({
                    "type": "object",
                    "properties": {
                        "content": {
                            "type": "string",
                            "maxLength": MAX_TWEET_CHARS,
                            "description": format!("Tweet content, {} characters or less", MAX_TWEET_CHARS)
                        }
                    },
                    "required": ["content"]
                }),
            ),
            ComposeTweet(client.clone()),
        ),
        Tool::automatic(
            ToolSchema::new(
                "getUserTweets",
                "get the user's recent tweets from their timeline",
                json!({
                    "type": "object",
                    "properties": {
                        "count": {
                            "type": "integer",
                            "minimum": MIN_RESULTS,
                            "maximum": MAX_RESULTS,
                            "default": DEFAULT_COUNT,
                            "description": format!("Number of tweets to retrieve ({}-{})", MIN_RESULTS, MAX_RESULTS)
                        }
                    }
                }),
            ),
            GetUserTweets(client),
        ),
    ]
}
