mod common;

use crate::common::*;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn post(base: &str, path: &str, header: (&str, &str), body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .header(header.0, header.1)
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = response.status();
    (status, response.json().await.expect("json body"))
}

async fn get(base: &str, path: &str, header: (&str, &str)) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .get(format!("{base}{path}"))
        .header(header.0, header.1)
        .send()
        .await
        .expect("request failed");
    let status = response.status();
    (status, response.json().await.expect("json body"))
}

#[tokio::test]
async fn doctor_send_then_fetch_returns_the_message() {
    let base = spawn_server().await;

    let (status, sent) = post(
        &base,
        "/api/doctor/sendMessage",
        ("dToken", DOCTOR_TOKEN),
        json!({ "senderId": "doc1", "receiverId": "pat1", "message": "Hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["success"], true);
    assert_eq!(sent["chat"]["senderId"], "doc1");
    assert_eq!(sent["chat"]["receiverId"], "pat1");
    assert_eq!(sent["chat"]["message"], "Hello");
    assert_eq!(sent["chat"]["isRead"], false);
    assert!(sent["chat"]["timestamp"].is_string());
    assert!(sent["chat"]["_id"].is_string());

    let (_, fetched) = post(
        &base,
        "/api/doctor/getMessage",
        ("dToken", DOCTOR_TOKEN),
        json!({ "userId": "pat1" }),
    )
    .await;
    assert_eq!(fetched["success"], true);
    assert_eq!(fetched["messages"], json!([sent["chat"].clone()]));
}

#[tokio::test]
async fn blank_message_is_rejected_and_nothing_is_stored() {
    let base = spawn_server().await;

    let (status, body) = post(
        &base,
        "/api/doctor/sendMessage",
        ("dToken", DOCTOR_TOKEN),
        json!({ "senderId": "doc1", "receiverId": "pat1", "message": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (_, fetched) = post(
        &base,
        "/api/doctor/getMessage",
        ("dToken", DOCTOR_TOKEN),
        json!({ "userId": "pat1" }),
    )
    .await;
    assert_eq!(fetched["messages"], json!([]));
}

#[tokio::test]
async fn patient_and_doctor_see_the_same_thread() {
    let base = spawn_server().await;

    for (header, body) in [
        (("token", PATIENT_TOKEN), json!({ "receiverId": "doc1", "message": "I feel sick" })),
        (("dtoken", DOCTOR_TOKEN), json!({ "receiverId": "pat1", "message": "Come in at 3" })),
        (("token", PATIENT_TOKEN), json!({ "receiverId": "doc1", "message": "Thanks" })),
    ] {
        let path = if header.0 == "token" {
            "/api/user/send-message"
        } else {
            "/api/doctor/sendMessage"
        };
        let (status, _) = post(&base, path, header, body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, patient_view) = post(
        &base,
        "/api/user/get-messages",
        ("token", PATIENT_TOKEN),
        json!({ "userId": "pat1", "doctorId": "doc1" }),
    )
    .await;
    let (_, doctor_view) = post(
        &base,
        "/api/doctor/getMessage",
        ("dtoken", DOCTOR_TOKEN),
        json!({ "userId": "pat1" }),
    )
    .await;

    assert_eq!(patient_view["messages"], doctor_view["messages"]);
    let texts: Vec<_> = patient_view["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["I feel sick", "Come in at 3", "Thanks"]);
}

#[tokio::test]
async fn claimed_sender_must_match_the_credential() {
    let base = spawn_server().await;

    let (status, body) = post(
        &base,
        "/api/user/send-message",
        ("token", PATIENT_TOKEN),
        json!({ "senderId": "pat2", "receiverId": "doc1", "message": "spoofed" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = post(
        &base,
        "/api/user/get-messages",
        ("token", PATIENT_TOKEN),
        json!({ "userId": "pat2", "doctorId": "doc1" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, thread) = post(
        &base,
        "/api/doctor/getMessage",
        ("dtoken", DOCTOR_TOKEN),
        json!({ "userId": "pat2" }),
    )
    .await;
    assert_eq!(thread["messages"], json!([]));
}

#[tokio::test]
async fn missing_or_wrong_role_token_is_unauthorized() {
    let base = spawn_server().await;

    let (status, body) = post(
        &base,
        "/api/doctor/getMessage",
        ("x-unrelated", "1"),
        json!({ "userId": "pat1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = post(
        &base,
        "/api/doctor/getMessage",
        ("dtoken", PATIENT_TOKEN),
        json!({ "userId": "pat1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_receiver_is_a_validation_error() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/api/user/send-message",
        ("token", PATIENT_TOKEN),
        json!({ "message": "to nobody" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn mark_read_clears_unread_counts() {
    let base = spawn_server().await;

    for (token, text) in [(PATIENT_TOKEN, "a"), (PATIENT_TOKEN, "b"), (OTHER_PATIENT_TOKEN, "c")] {
        post(
            &base,
            "/api/user/send-message",
            ("token", token),
            json!({ "receiverId": "doc1", "message": text }),
        )
        .await;
    }

    let (_, counts) = get(&base, "/api/doctor/unreadCounts", ("dtoken", DOCTOR_TOKEN)).await;
    assert_eq!(counts["counts"], json!({ "pat1": 2, "pat2": 1 }));

    let (_, marked) = post(
        &base,
        "/api/doctor/markRead",
        ("dtoken", DOCTOR_TOKEN),
        json!({ "userId": "pat1" }),
    )
    .await;
    assert_eq!(marked["updated"], 2);

    let (_, counts) = get(&base, "/api/doctor/unreadCounts", ("dtoken", DOCTOR_TOKEN)).await;
    assert_eq!(counts["counts"], json!({ "pat2": 1 }));

    let (_, thread) = post(
        &base,
        "/api/user/get-messages",
        ("token", PATIENT_TOKEN),
        json!({ "doctorId": "doc1" }),
    )
    .await;
    assert!(
        thread["messages"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["isRead"] == true)
    );
}

#[tokio::test]
async fn directory_and_profiles_follow_the_credential() {
    let base = spawn_server().await;

    let (_, patients) = get(&base, "/api/doctor/patients", ("dtoken", DOCTOR_TOKEN)).await;
    assert_eq!(
        patients["users"],
        json!([{ "_id": "pat1", "name": "Adam" }, { "_id": "pat2", "name": "Zoe" }])
    );

    let (_, doctor) = get(&base, "/api/doctor/profile", ("dtoken", DOCTOR_TOKEN)).await;
    assert_eq!(doctor["profileData"]["_id"], "doc1");

    let (_, patient) = get(&base, "/api/user/get-profile", ("token", OTHER_PATIENT_TOKEN)).await;
    assert_eq!(patient["userData"]["_id"], "pat2");
}

#[tokio::test]
async fn unknown_endpoint_and_malformed_body_keep_the_envelope() {
    let base = spawn_server().await;

    let (status, body) = get(&base, "/api/doctor/nope", ("dtoken", DOCTOR_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let response = reqwest::Client::new()
        .post(format!("{base}/api/doctor/getMessage"))
        .header("dtoken", DOCTOR_TOKEN)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn receiver_must_be_a_known_participant_of_the_other_role() {
    let base = spawn_server().await;

    for receiver in ["pat2", "ghost"] {
        let (status, body) = post(
            &base,
            "/api/user/send-message",
            ("token", PATIENT_TOKEN),
            json!({ "receiverId": receiver, "message": "hello?" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    let (_, thread) = post(
        &base,
        "/api/user/get-messages",
        ("token", OTHER_PATIENT_TOKEN),
        json!({ "doctorId": "pat1" }),
    )
    .await;
    assert_eq!(thread["messages"], json!([]));
}
