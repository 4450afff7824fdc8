//! # Webhook Routes
//!
//! `POST /webhook` receives forum post events and runs them through the
//! dispatch engine. The caller always gets a 200 acknowledgment for a processed
//! event, whether or not the reply reached the forum; only a ledger write
//! failure is reported as a 500.
//! `GET /` and `GET /health` answer uptime pings.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde_json::json;
use std::sync::Arc;

use crate::application::engine::DispatchEngine;
use crate::domain::payload::WebhookPayload;
use crate::domain::types::{CommandOutcome, DispatchReport, IgnoreReason};
use crate::strings::messages;

pub fn router(engine: Arc<DispatchEngine>) -> Router {
    Router::new()
        .route("/", get(wake_up))
        .route("/health", get(wake_up))
        .route("/webhook", post(webhook))
        .with_state(engine)
}

async fn wake_up() -> &'static str {
    messages::WAKE_UP
}

async fn webhook(State(engine): State<Arc<DispatchEngine>>, body: Bytes) -> Response {
    let payload = match WebhookPayload::parse(&body) {
        Ok(payload) => payload,
        Err(reason) => return acknowledge(&DispatchReport::ignored(reason)).into_response(),
    };

    match engine.dispatch(&payload).await {
        Ok(report) => acknowledge(&report).into_response(),
        Err(e) => {
            tracing::error!("Failed to process webhook: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}

fn acknowledge(report: &DispatchReport) -> (StatusCode, Json<serde_json::Value>) {
    let body = match &report.outcome {
        CommandOutcome::Ignored {
            reason: IgnoreReason::NotAPost,
        } => json!({ "status": "not_a_post" }),
        CommandOutcome::Ignored { reason } => {
            json!({ "status": "ignored", "reason": reason.as_str() })
        }
        outcome => json!({
            "status": "success",
            "outcome": outcome.label(),
            "delivered": report.delivered,
        }),
    };
    (StatusCode::OK, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::AppConfig;
    use crate::testing::{CountingStore, RecordingForum, ScriptedLlm};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Fixture {
        app: Router,
        store: Arc<CountingStore>,
        forum: Arc<RecordingForum>,
    }

    fn fixture_with(store: CountingStore, forum: RecordingForum) -> Fixture {
        let mut config = AppConfig::default();
        config.bot.identity = "PointsBot".into();
        let store = Arc::new(store);
        let forum = Arc::new(forum);
        let engine = Arc::new(DispatchEngine::new(
            &config,
            store.clone(),
            Arc::new(ScriptedLlm::answering("Happy to help!")),
            forum.clone(),
        ));
        Fixture {
            app: router(engine),
            store,
            forum,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CountingStore::default(), RecordingForum::default())
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_json(app: &Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, text) = call(app, request).await;
        (status, serde_json::from_str(&text).unwrap())
    }

    fn post_body(user: &str, raw: &str) -> String {
        json!({ "post": { "username": user, "raw": raw, "topic_id": 3, "post_number": 9 } })
            .to_string()
    }

    #[tokio::test]
    async fn test_wake_up_routes() {
        let f = fixture();
        for uri in ["/", "/health"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, body) = call(&f.app, request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "Bot is awake and tracking points!");
        }
    }

    #[tokio::test]
    async fn test_not_a_post() {
        let f = fixture();
        let (status, body) = post_json(&f.app, r#"{"topic":{"id":1}}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "not_a_post" }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_ignored() {
        let f = fixture();
        let (status, body) = post_json(&f.app, "definitely not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored", "reason": "malformed_payload" }));
    }

    #[tokio::test]
    async fn test_missing_fields_are_ignored() {
        let f = fixture();
        let (status, body) = post_json(&f.app, r#"{"post":{"username":"amy"}}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored", "reason": "malformed_post" }));
    }

    #[tokio::test]
    async fn test_bot_and_untriggered_posts() {
        let f = fixture();

        let (_, body) = post_json(&f.app, &post_body("PointsBot", "/daily")).await;
        assert_eq!(body, json!({ "status": "ignored", "reason": "bot_post" }));

        let (_, body) = post_json(&f.app, &post_body("amy", "nice weather")).await;
        assert_eq!(body, json!({ "status": "ignored", "reason": "no_trigger" }));

        assert_eq!(f.forum.attempts(), 0);
    }

    #[tokio::test]
    async fn test_daily_then_cooldown() {
        let f = fixture();

        let (status, body) = post_json(&f.app, &post_body("amy", "/daily")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "success", "outcome": "rewarded", "delivered": true })
        );

        let (_, body) = post_json(&f.app, &post_body("amy", "/daily")).await;
        assert_eq!(body["outcome"], "on_cooldown");

        let posts = f.forum.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].raw, "⏳ @amy, you can only use /daily once every 24 hours.");
        assert_eq!(f.store.snapshot()["amy"].points, 3);
    }

    #[tokio::test]
    async fn test_free_form_reply() {
        let f = fixture();
        let (_, body) = post_json(&f.app, &post_body("amy", "@PointsBot hello!")).await;
        // "@pointsbot" contains the "points" keyword.
        assert_eq!(body["outcome"], "points_report");

        let (_, body) = post_json(&f.app, &post_body("amy", "/hello")).await;
        assert_eq!(body["outcome"], "free_form");
        assert_eq!(f.forum.posts().last().unwrap().raw, "Happy to help!");
    }

    #[tokio::test]
    async fn test_delivery_failure_still_acknowledged() {
        let f = fixture_with(CountingStore::default(), RecordingForum::failing());
        let (status, body) = post_json(&f.app, &post_body("amy", "/points")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "success", "outcome": "points_report", "delivered": false })
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let f = fixture_with(CountingStore::failing_saves(), RecordingForum::default());
        let (status, body) = post_json(&f.app, &post_body("amy", "/weekly")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "status": "error" }));
        assert_eq!(f.forum.attempts(), 0);
    }
}
