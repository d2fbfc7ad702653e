mod common;

use serde_json::Value;

async fn change_state(app: &common::TestApp, token: &str, id: i32, state_id: i32) -> reqwest::Response {
    app.client
        .patch(app.url(&format!("/denuncias/{}/estado", id)))
        .bearer_auth(token)
        .json(&serde_json::json!({ "state_id": state_id }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn supplied_timestamp_is_stored_verbatim() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = app
        .client
        .patch(app.url(&format!("/denuncias/{}/estado", complaint_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "state_id": 2,
            "changed_at": "2026-03-20T10:30:00",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/denuncias/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let history = body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["state_id"], 2);
    assert_eq!(history[1]["changed_at"], "2026-03-20T10:30:00");
}

#[tokio::test]
async fn legal_transition_appends_history() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    // Recibida -> En Revisión
    let resp = change_state(&app, &token, complaint_id, 2).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["state_id"], 2);

    let resp = app
        .client
        .get(app.url(&format!("/denuncias/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let history = body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Chronological, last row matches the current state
    assert_eq!(history[0]["state_id"], 1);
    assert_eq!(history[1]["state_id"], 2);
    assert_eq!(body["data"]["complaint"]["state_id"], 2);
}

#[tokio::test]
async fn illegal_transition_is_rejected_without_history() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "vra").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    // Recibida -> En Investigación skips review; not in the table
    let resp = change_state(&app, &token, complaint_id, 6).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "TRANSICION_INVALIDA");

    let resp = app
        .client
        .get(app.url(&format!("/denuncias/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["complaint"]["state_id"], 1);
    assert_eq!(body["data"]["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_state_is_rejected() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = change_state(&app, &token, complaint_id, 42).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "ESTADO_INVALIDO");
}

#[tokio::test]
async fn cerrada_is_terminal() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    // Walk the case to closure: Recibida -> En Revisión -> Inadmisible -> Cerrada
    for state_id in [2, 5, 7] {
        let resp = change_state(&app, &token, complaint_id, state_id).await;
        assert_eq!(resp.status(), 200, "transition to {} failed", state_id);
    }

    // No transition leaves Cerrada, not even reopening to Recibida
    for state_id in 1..=6 {
        let resp = change_state(&app, &token, complaint_id, state_id).await;
        assert_eq!(resp.status(), 400, "Cerrada must reject move to {}", state_id);
    }
}

#[tokio::test]
async fn full_investigation_path_reaches_cerrada() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "admin").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    // Recibida -> En Revisión -> Admisible -> En Investigación -> Cerrada
    for state_id in [2, 4, 6, 7] {
        let resp = change_state(&app, &token, complaint_id, state_id).await;
        assert_eq!(resp.status(), 200, "transition to {} failed", state_id);
    }

    let resp = app
        .client
        .get(app.url(&format!("/denuncias/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["state"]["label"], "Cerrada");
    assert_eq!(body["data"]["history"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn state_change_notifies_reporter() {
    let app = common::spawn_app().await;
    let (_staff, _srut, staff_token) = common::create_account(&app, "dirgegen").await;
    let (_rep_id, rep_rut, rep_token) = common::create_account(&app, "denunciante").await;

    let complaint_id = common::create_test_complaint(&app, Some(&rep_rut)).await;

    let resp = change_state(&app, &staff_token, complaint_id, 2).await;
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/notificaciones"))
        .bearer_auth(&rep_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items
        .iter()
        .any(|n| n["kind"] == "cambio_estado"
            && n["complaint_id"].as_i64() == Some(complaint_id as i64)));
}
