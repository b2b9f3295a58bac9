mod common;

use common::TestApp;
use mongodb::bson::oid::ObjectId;
use reqwest::{Client, StatusCode};
use serde_json::json;

#[tokio::test]
async fn saving_without_an_id_creates_a_new_certificate() {
    let app = TestApp::spawn().await;

    let body = app
        .save_certificate(&json!({
            "name": "Employee of the Month",
            "bgImage": "backgrounds/gold.png",
            "elements": [
                { "id": "title", "type": "text", "content": "Well done", "x": 10.0, "y": 20.0, "zIndex": 1 }
            ]
        }))
        .await;

    let id = body["id"].as_str().expect("Missing id in response");
    assert!(ObjectId::parse_str(id).is_ok(), "Response id is not a valid ObjectId");
    assert_eq!(body["name"], "Employee of the Month");
    assert_eq!(body["createdAt"], body["updatedAt"]);

    // Verify the record landed in the store
    let stored = app
        .db
        .find_certificate(ObjectId::parse_str(id).unwrap())
        .await
        .unwrap()
        .expect("Certificate not found in DB");
    assert_eq!(stored.name, "Employee of the Month");
    assert_eq!(stored.bg_image, "backgrounds/gold.png");
    assert_eq!(stored.elements.len(), 1);

    app.cleanup().await;
}

#[tokio::test]
async fn saving_with_an_id_updates_in_place_and_preserves_created_at() {
    let app = TestApp::spawn().await;

    let created = app
        .save_certificate(&json!({ "name": "Original", "bgImage": "", "elements": [] }))
        .await;
    let id = created["id"].as_str().unwrap().to_string();
    let created_at = created["createdAt"].as_str().unwrap().to_string();
    let first_updated_at = created["updatedAt"].as_str().unwrap().to_string();

    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    let count_before = app.db.count_certificates().await.unwrap();
    let updated = app
        .save_certificate(&json!({
            "id": id,
            "name": "Renamed",
            "bgImage": "new.png",
            "elements": [
                { "id": "line", "type": "text", "content": "hi", "x": 1.0, "y": 2.0, "zIndex": 1 }
            ]
        }))
        .await;

    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["bgImage"], "new.png");

    // createdAt survives the update (modulo the store's millisecond precision),
    // updatedAt advances
    let stored_created = chrono::DateTime::parse_from_rfc3339(updated["createdAt"].as_str().unwrap()).unwrap();
    let original_created = chrono::DateTime::parse_from_rfc3339(&created_at).unwrap();
    assert_eq!(
        stored_created.timestamp_millis(),
        original_created.timestamp_millis()
    );
    let new_updated = chrono::DateTime::parse_from_rfc3339(updated["updatedAt"].as_str().unwrap()).unwrap();
    let old_updated = chrono::DateTime::parse_from_rfc3339(&first_updated_at).unwrap();
    assert!(new_updated > old_updated);

    // In place: no new record
    assert_eq!(app.db.count_certificates().await.unwrap(), count_before);

    app.cleanup().await;
}

#[tokio::test]
async fn saving_with_an_empty_name_is_rejected_without_a_store_mutation() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let count_before = app.db.count_certificates().await.unwrap();

    let response = client
        .post(format!("{}/api/certificates/save", app.address))
        .json(&json!({ "name": "", "bgImage": "", "elements": [] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.db.count_certificates().await.unwrap(), count_before);

    app.cleanup().await;
}

#[tokio::test]
async fn an_unparsable_body_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/certificates/save", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await;
}

#[tokio::test]
async fn saving_with_a_malformed_id_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/certificates/save", app.address))
        .json(&json!({ "id": "not-a-hex-id", "name": "Whatever", "bgImage": "", "elements": [] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await;
}

#[tokio::test]
async fn updating_an_unknown_id_returns_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/certificates/save", app.address))
        .json(&json!({
            "id": ObjectId::new().to_hex(),
            "name": "Ghost",
            "bgImage": "",
            "elements": []
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/certificates/save", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    app.cleanup().await;
}
