//! `/api/v1/gemini/*` routes end to end with a scripted model.

mod harness;

use ai_client::AiError;
use axum::http::{Method, StatusCode};
use serde_json::json;

use harness::TestApp;
use spendwise_assistant::testing::{transaction, ScriptedModel};
use spendwise_api::store::RecordStore;
use spendwise_common::EntryType;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/gemini/extract-category",
            None,
            Some(json!({"input": "Add shopping as expense"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is not valid or expired");
    assert!(app.model.requests().is_empty());
}

#[tokio::test]
async fn health_check_needs_no_token() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extract_category_returns_draft() {
    let app = TestApp::new(
        ScriptedModel::new().reply("Sure! {\"type\":\"expense\",\"name\":\"shopping\"}"),
    );

    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-category",
            "alice",
            json!({"input": "Add shopping as expense"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"category": {"type": "expense", "name": "shopping"}}));
}

#[tokio::test]
async fn extract_category_without_input_is_bad_request() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app
        .post("/api/v1/gemini/extract-category", "alice", json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Input is required");
}

#[tokio::test]
async fn extract_category_with_prose_reply_returns_raw() {
    let app = TestApp::new(ScriptedModel::new().reply("not json"));
    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-category",
            "alice",
            json!({"input": "Add shopping as expense"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to extract category details");
    assert_eq!(body["raw"], "not json");
}

#[tokio::test]
async fn extract_category_upstream_failure_hides_details() {
    let app = TestApp::new(ScriptedModel::new().fail(AiError::Api {
        status: 400,
        message: "API key not valid".into(),
    }));
    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-category",
            "alice",
            json!({"input": "Add shopping as expense"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Something went wrong while processing the input"}));
}

#[tokio::test]
async fn extract_transaction_resolves_yesterday() {
    let app = TestApp::new(ScriptedModel::new().reply(
        "```json\n{\"type\":\"expense\",\"amount\":500,\"category\":\"groceries\",\"date\":\"2024-06-09\",\"description\":\"Groceries\"}\n```",
    ));

    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-transaction",
            "alice",
            json!({"input": "Spent 500 on groceries yesterday"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transaction"]["date"], "2024-06-09");
    assert_eq!(body["transaction"]["type"], "expense");
    assert_eq!(body["transaction"]["amount"], 500.0);
    let prompt = app.model.last_prompt().unwrap();
    assert!(prompt.contains("\"yesterday\" → \"2024-06-09\""));
}

#[tokio::test]
async fn extract_transaction_rewrites_relative_days() {
    let app = TestApp::new(ScriptedModel::new().reply(
        "{\"type\":\"income\",\"amount\":300,\"category\":\"refund\",\"date\":\"2024-06-13\"}",
    ));
    let (status, _) = app
        .post(
            "/api/v1/gemini/extract-transaction",
            "alice",
            json!({"input": "Refund of 300 expected 3 days later"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app
        .model
        .last_prompt()
        .unwrap()
        .contains("Input: Refund of 300 expected on 2024-06-13"));
}

#[tokio::test]
async fn extract_transaction_failure_includes_detail_and_raw() {
    let app = TestApp::new(ScriptedModel::new().reply("I could not understand that."));
    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-transaction",
            "alice",
            json!({"input": "hmm"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Something went wrong");
    assert!(body["detail"].as_str().unwrap().contains("No JSON object"));
    assert_eq!(body["raw"], "I could not understand that.");
}

#[tokio::test]
async fn extract_transaction_without_input_is_bad_request() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-transaction",
            "alice",
            json!({"input": "  "}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Input is required");
}

// ---------------------------------------------------------------------------
// Chat sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_without_transactions_is_not_found() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app.post_empty("/api/v1/gemini/start", "alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No transactions found for the user");

    let (status, body) = app
        .post("/api/v1/gemini/chat", "alice", json!({"prompt": "hi"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Chat session not initialized");
}

#[tokio::test]
async fn start_then_chat() {
    let app = TestApp::new(
        ScriptedModel::new()
            .reply(" how can i assist you ..")
            .reply("You spent 42 on coffee this month."),
    );
    app.store
        .insert_transaction(transaction("alice", EntryType::Expense, 42.0, "coffee"))
        .await
        .unwrap();

    let (status, body) = app.post_empty("/api/v1/gemini/start", "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Data sent to Gemini", "reply": " how can i assist you .."})
    );

    let (status, body) = app
        .post(
            "/api/v1/gemini/chat",
            "alice",
            json!({"prompt": "How much on coffee?"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "You spent 42 on coffee this month.");
}

#[tokio::test]
async fn start_upstream_failure_is_internal_error() {
    let app = TestApp::new(ScriptedModel::new().fail(AiError::Network {
        message: "timed out".into(),
        retryable: true,
    }));
    app.store
        .insert_transaction(transaction("alice", EntryType::Income, 1000.0, "salary"))
        .await
        .unwrap();

    let (status, body) = app.post_empty("/api/v1/gemini/start", "alice").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to initialize chat"}));
}

#[tokio::test]
async fn chat_failure_is_internal_error() {
    let app = TestApp::new(ScriptedModel::new().reply("hi"));
    app.store
        .insert_transaction(transaction("alice", EntryType::Income, 1000.0, "salary"))
        .await
        .unwrap();
    app.post_empty("/api/v1/gemini/start", "alice").await;

    // No second reply queued: the scripted model fails with a 500.
    let (status, body) = app
        .post("/api/v1/gemini/chat", "alice", json!({"prompt": "summary"}))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process chat prompt");
}

#[tokio::test]
async fn chat_without_prompt_is_bad_request() {
    let app = TestApp::new(ScriptedModel::new().reply("hi"));
    app.store
        .insert_transaction(transaction("alice", EntryType::Income, 1000.0, "salary"))
        .await
        .unwrap();
    app.post_empty("/api/v1/gemini/start", "alice").await;

    let (status, body) = app.post("/api/v1/gemini/chat", "alice", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
}

#[tokio::test]
async fn concurrent_starts_from_different_users_stay_isolated() {
    let app = TestApp::new(ScriptedModel::new().reply("hello").reply("hello"));
    app.store
        .insert_transaction(transaction("alice", EntryType::Expense, 1.0, "alice-books"))
        .await
        .unwrap();
    app.store
        .insert_transaction(transaction("bob", EntryType::Expense, 2.0, "bob-games"))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        app.post_empty("/api/v1/gemini/start", "alice"),
        app.post_empty("/api/v1/gemini/start", "bob"),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    app.model.push(Ok("alice reply".into()));
    let (status, _) = app
        .post("/api/v1/gemini/chat", "alice", json!({"prompt": "list"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let seed = &app.model.requests()[2].messages[0].content;
    assert!(seed.contains("alice-books"));
    assert!(!seed.contains("bob-games"));

    app.model.push(Ok("bob reply".into()));
    let (status, body) = app
        .post("/api/v1/gemini/chat", "bob", json!({"prompt": "list"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "bob reply");
    let seed = &app.model.requests()[3].messages[0].content;
    assert!(seed.contains("bob-games"));
}

#[tokio::test]
async fn ending_a_session_requires_a_new_start() {
    let app = TestApp::new(ScriptedModel::new().reply("hi"));
    app.store
        .insert_transaction(transaction("alice", EntryType::Income, 5.0, "gift"))
        .await
        .unwrap();
    app.post_empty("/api/v1/gemini/start", "alice").await;

    let (status, _) = app
        .send(Method::DELETE, "/api/v1/gemini/session", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .post("/api/v1/gemini/chat", "alice", json!({"prompt": "hi"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Chat session not initialized");
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn absent_body_is_missing_input() {
    let app = TestApp::new(ScriptedModel::new());
    for path in [
        "/api/v1/gemini/extract-category",
        "/api/v1/gemini/extract-transaction",
    ] {
        let (status, body) = app.send(Method::POST, path, Some("alice"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body, json!({"error": "Input is required"}), "{path}");
    }

    let (status, body) = app
        .send(Method::POST, "/api/v1/gemini/chat", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Prompt is required"}));
    assert!(app.model.requests().is_empty());
}

#[tokio::test]
async fn non_string_input_is_missing_input() {
    let app = TestApp::new(ScriptedModel::new());
    let (status, body) = app
        .post(
            "/api/v1/gemini/extract-category",
            "alice",
            json!({"input": 5}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Input is required");

    let (status, body) = app
        .post("/api/v1/gemini/chat", "alice", json!({"prompt": ["hi"]}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
}
