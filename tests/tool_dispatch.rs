#![cfg(feature = "client")]

mod common;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tweetsign::tools::{
    default_dispatcher, Confirmation, MemoryScheduler, ToolCall, ToolDispatcher, ToolOutcome,
    APPROVAL_NO, APPROVAL_YES, DENIED_MESSAGE,
};
use tweetsign::TwitterClient;

use common::*;

async fn dispatcher(posts: Arc<AtomicUsize>, timeline_status: StatusCode) -> ToolDispatcher {
    let router = Router::new()
        .route(
            "/2/tweets",
            post(move |Json(body): Json<Value>| {
                let posts = posts.clone();
                async move {
                    posts.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::CREATED,
                        Json(json!({"data": {"id": "1790000000000000000", "text": body["text"]}})),
                    )
                }
            }),
        )
        .route(
            "/2/users/:id/tweets",
            get(move || async move {
                if timeline_status.is_success() {
                    (
                        timeline_status,
                        Json(json!({
                            "data": [{
                                "id": "1",
                                "text": "gm",
                                "created_at": "2024-03-01T12:00:00.000Z",
                                "public_metrics": {"like_count": 7, "retweet_count": 3, "reply_count": 2}
                            }]
                        })),
                    )
                } else {
                    (timeline_status, Json(json!({"detail": "Unauthorized"})))
                }
            }),
        );
    let client = TwitterClient::new(config(spawn(router).await)).unwrap();
    default_dispatcher(Arc::new(client), Arc::new(MemoryScheduler::new()))
}

#[tokio::test]
async fn test_compose_tweet_requires_approval() {
    let posts = Arc::new(AtomicUsize::new(0));
    let d = dispatcher(posts.clone(), StatusCode::OK).await;
    assert_eq!(d.requiring_confirmation(), ["composeTweet"]);

    let call = ToolCall::new("call-1", "composeTweet", json!({"content": "shipping it"}));
    let outcome = d.dispatch(call.clone()).await;
    assert_eq!(outcome, ToolOutcome::AwaitingConfirmation(call.clone()));
    assert_eq!(posts.load(Ordering::SeqCst), 0);

    match d.resolve(call, Confirmation::from_reply(APPROVAL_YES)).await {
        ToolOutcome::Completed { call_id, output } => {
            assert_eq!(call_id, "call-1");
            assert!(output.starts_with("Tweet posted successfully!"));
            assert!(output.contains("Tweet ID: 1790000000000000000"));
            assert!(output.contains("Content: \"shipping it\""));
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_compose_tweet_denied() {
    let posts = Arc::new(AtomicUsize::new(0));
    let d = dispatcher(posts.clone(), StatusCode::OK).await;
    let call = ToolCall::new("call-2", "composeTweet", json!({"content": "never mind"}));
    let outcome = d.resolve(call, Confirmation::from_reply(APPROVAL_NO)).await;
    assert_eq!(
        outcome,
        ToolOutcome::Denied {
            call_id: "call-2".into(),
            message: DENIED_MESSAGE.into()
        }
    );
    assert_eq!(posts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_compose_tweet_too_long_fails_without_posting() {
    let posts = Arc::new(AtomicUsize::new(0));
    let d = dispatcher(posts.clone(), StatusCode::OK).await;
    let call = ToolCall::new("call-3", "composeTweet", json!({"content": "y".repeat(281)}));
    match d.resolve(call, Confirmation::Approved).await {
        ToolOutcome::Failed { message, .. } => assert!(message.contains("280 characters or less")),
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(posts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_user_tweets_runs_automatically() {
    let d = dispatcher(Arc::new(AtomicUsize::new(0)), StatusCode::OK).await;
    match d
        .dispatch(ToolCall::new("call-4", "getUserTweets", json!({"count": 1})))
        .await
    {
        ToolOutcome::Completed { output, .. } => {
            assert!(output.starts_with("Here are your 1 most recent tweets:"));
            assert!(output.contains("1. \"gm\""));
            assert!(output.contains("likes: 7 | retweets: 3 | replies: 2"));
        }
        other => panic!("unexpected: {:?}", other),
    }

    // count defaults to 5 when omitted
    assert!(matches!(
        d.dispatch(ToolCall::new("call-5", "getUserTweets", Value::Null)).await,
        ToolOutcome::Completed { .. }
    ));
}

#[tokio::test]
async fn test_get_user_tweets_remote_error_is_a_value() {
    let d = dispatcher(Arc::new(AtomicUsize::new(0)), StatusCode::UNAUTHORIZED).await;
    match d
        .dispatch(ToolCall::new("call-6", "getUserTweets", json!({"count": 5})))
        .await
    {
        ToolOutcome::Failed { call_id, message } => {
            assert_eq!(call_id, "call-6");
            assert!(message.contains("401 - Unauthorized"));
        }
        other => panic!("unexpected: {:?}", other),
    }

    match d
        .dispatch(ToolCall::new("call-7", "getUserTweets", json!({"count": 50})))
        .await
    {
        ToolOutcome::Failed { message, .. } => assert!(message.contains("between 1 and 10")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_definitions_cover_every_tool() {
    let d = dispatcher(Arc::new(AtomicUsize::new(0)), StatusCode::OK).await;
    let names: Vec<String> = d
        .definitions()
        .iter()
        .map(|def| def.schema.name.clone())
        .collect();
    assert_eq!(
        names,
        [
            "cancelScheduledTask",
            "composeTweet",
            "getScheduledTasks",
            "getUserTweets",
            "scheduleTask",
        ]
    );
}
