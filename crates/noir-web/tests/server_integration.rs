//! Integration tests for the noir-web server.
//!
//! These tests start a real axum server on a random port, backed by a
//! scripted model, and exercise the REST endpoints.

use std::sync::Arc;

use noir_studio::completion::{CompletionClient, GeneratedImage, ScriptedBackend};
use noir_studio::error::ModelCommunicationError;
use noir_studio::studio::Studio;
use noir_web::{WebConfig, spawn_web};
use serde_json::{Value, json};

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server(backend: ScriptedBackend) -> (Arc<ScriptedBackend>, String) {
    let backend = Arc::new(backend);
    let studio = Arc::new(Studio::new(CompletionClient::new(backend.clone())));
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..Default::default()
    };
    let (addr, _ws_tx) = spawn_web(studio, config).await.unwrap();
    (backend, format!("http://{addr}"))
}

fn character_json(name: &str) -> String {
    json!({
        "name": name,
        "alias": "Static",
        "occupation": "fixer",
        "appearance": "long coat, chrome arm",
        "personality": "patient",
        "backstory": "ex-cop",
        "signature_quote": "Nothing stays buried.",
        "cybernetics": ["optic suite", "arm"]
    })
    .to_string()
}

async fn post(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap()
}

// ── Catalogue ────────────────────────────────────────────────────────

#[tokio::test]
async fn features_lists_the_catalogue() {
    let (_backend, base) = spawn_test_server(ScriptedBackend::new()).await;

    let resp = reqwest::get(format!("{base}/api/features")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    let features = json.as_array().unwrap();
    assert_eq!(features.len(), 19);
    assert_eq!(features[0]["id"], "character-profile");
    assert_eq!(features[0]["mode"], "structured");
    assert_eq!(features[0]["inputs"][0]["name"], "name");
}

#[tokio::test]
async fn schema_endpoint_and_unknown_ids() {
    let (_backend, base) = spawn_test_server(ScriptedBackend::new()).await;

    let resp = reqwest::get(format!("{base}/api/features/glossary/schema"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let schema: Value = resp.json().await.unwrap();
    assert_eq!(schema["type"], "object");
    assert!(schema["properties"]["entries"].is_object());

    let resp = reqwest::get(format!("{base}/api/features/villains/schema"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("{base}/api/features/art-prompt/schema"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

// ── Generation ───────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_result_and_panels() {
    let backend = ScriptedBackend::new().text(character_json("Rei Kisaragi"));
    let (backend, base) = spawn_test_server(backend).await;

    let resp = post(
        format!("{base}/api/generate/character-profile"),
        json!({"name": "Rei Kisaragi", "concept": "ex-cop"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["headline"], "Rei Kisaragi");
    assert_eq!(json["result"]["feature"], "character-profile");
    assert_eq!(json["result"]["data"]["alias"], "Static");
    assert_eq!(json["panels"][0]["field"], "name");
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn missing_input_is_rejected_without_a_call() {
    let (backend, base) = spawn_test_server(ScriptedBackend::new()).await;

    let resp = post(
        format!("{base}/api/generate/character-profile"),
        json!({"name": "Rei", "concept": "   "}),
    )
    .await;
    assert_eq!(resp.status(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["feature"], "character-profile");
    assert!(json["error"].as_str().unwrap().contains("Concept"));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn model_failure_maps_to_bad_gateway() {
    let backend = ScriptedBackend::new().text("this is not json");
    let (_backend, base) = spawn_test_server(backend).await;

    let resp = post(
        format!("{base}/api/generate/glossary"),
        json!({"theme": "undercity slang"}),
    )
    .await;
    assert_eq!(resp.status(), 502);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["feature"], "glossary");
}

#[tokio::test]
async fn art_prompt_is_trimmed() {
    let backend = ScriptedBackend::new().text("  neon koi dissolving into rain  \n");
    let (_backend, base) = spawn_test_server(backend).await;

    let resp = post(
        format!("{base}/api/art-prompt"),
        json!({"transformation": "woman into koi", "mood": "melancholy"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["prompt"], "neon koi dissolving into rain");
}

#[tokio::test]
async fn image_comes_back_as_data_url() {
    let backend = ScriptedBackend::new().images(vec![GeneratedImage::png(vec![1, 2, 3])]);
    let (_backend, base) = spawn_test_server(backend).await;

    let resp = post(format!("{base}/api/image"), json!({"prompt": "alley"})).await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["mime"], "image/png");
    assert_eq!(json["data_url"], "data:image/png;base64,AQID");
}

// ── Batches, matrix, export ──────────────────────────────────────────

#[tokio::test]
async fn partial_batch_keeps_earlier_results() {
    let backend = ScriptedBackend::new()
        .text(character_json("Rei Kisaragi"))
        .text(character_json("Mika Tsukino"))
        .fail(ModelCommunicationError::http(500, "boom"));
    let (backend, base) = spawn_test_server(backend).await;

    let resp = post(format!("{base}/api/batch/characters"), json!({})).await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["feature"], "character-batch");
    assert_eq!(json["total"], 4);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert!(json["error"].as_str().unwrap().contains("2 of 4"));
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn matrix_needs_no_model() {
    let (backend, base) = spawn_test_server(ScriptedBackend::new()).await;

    let resp = reqwest::get(format!("{base}/api/matrix")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 16);
    for entry in entries {
        let prompt = entry["prompt"].as_str().unwrap();
        assert!(prompt.contains(entry["character"].as_str().unwrap()));
        assert!(prompt.contains(entry["location"].as_str().unwrap()));
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn export_single_result() {
    let (_backend, base) = spawn_test_server(ScriptedBackend::new()).await;
    let data: Value = serde_json::from_str(&character_json("Rei Kisaragi")).unwrap();

    let resp = post(
        format!("{base}/api/export"),
        json!({"result": {"feature": "character-profile", "data": data}}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let file: Value = resp.json().await.unwrap();
    assert_eq!(file["filename"], "neo-tokyo-character-profile.md");
    assert_eq!(file["mime"], "text/markdown");
    assert!(file["content"].as_str().unwrap().starts_with("# Rei Kisaragi\n"));
}

#[tokio::test]
async fn batch_export_is_always_markdown() {
    let (_backend, base) = spawn_test_server(ScriptedBackend::new()).await;
    let data: Value = serde_json::from_str(&character_json("Rei Kisaragi")).unwrap();

    let resp = post(
        format!("{base}/api/export"),
        json!({
            "feature": "glossary",
            "results": [{"feature": "character-profile", "data": data}]
        }),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let file: Value = resp.json().await.unwrap();
    assert_eq!(file["filename"], "neo-tokyo-glossary.md");
    assert_eq!(file["mime"], "text/markdown");
}

// ── Guide chat ───────────────────────────────────────────────────────

#[tokio::test]
async fn chat_round_trips_the_transcript() {
    let backend = ScriptedBackend::new()
        .text("Rain's coming. Stay off the Ginza line.")
        .text("Because the Ghost Lotus owns it tonight.");
    let (backend, base) = spawn_test_server(backend).await;

    let resp = post(
        format!("{base}/api/chat"),
        json!({"message": "Which way to the docks?"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let first: Value = resp.json().await.unwrap();
    let transcript = first["transcript"].clone();
    assert_eq!(transcript.as_array().unwrap().len(), 2);
    assert_eq!(transcript[0]["speaker"], "user");
    assert_eq!(transcript[1]["speaker"], "ai");

    let resp = post(
        format!("{base}/api/chat"),
        json!({"transcript": transcript, "message": "Why?"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let second: Value = resp.json().await.unwrap();
    assert_eq!(second["reply"], "Because the Ghost Lotus owns it tonight.");
    assert_eq!(second["transcript"].as_array().unwrap().len(), 4);

    let prompts = backend.prompts();
    assert!(prompts[1].contains("Which way to the docks?"));
    assert!(prompts[1].contains("Stay off the Ginza line."));
}
