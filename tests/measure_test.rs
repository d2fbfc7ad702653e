mod common;

use serde_json::Value;

async fn request_measure(
    app: &common::TestApp,
    token: &str,
    complaint_id: i32,
    measure_type: &str,
) -> reqwest::Response {
    app.client
        .post(app.url("/solicitudes/medidas"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "denuncia_id": complaint_id,
            "measure_type": measure_type,
            "reason": "La denunciante comparte sala con el denunciado.",
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn measure_request_starts_pending() {
    let app = common::spawn_app().await;
    let (person_id, _rut, token) = common::create_account(&app, "denunciante").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = request_measure(&app, &token, complaint_id, "Separación de espacios").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Pendiente Informe");
    assert_eq!(
        body["data"]["complaint_id"].as_i64().unwrap() as i32,
        complaint_id
    );
    assert_eq!(
        body["data"]["requester_person_id"].as_i64().unwrap() as i32,
        person_id
    );
}

#[tokio::test]
async fn measure_for_unknown_complaint_is_not_found() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;

    let resp = request_measure(&app, &token, 999999, "Separación de espacios").await;

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "DENUNCIA_NO_ENCONTRADA");
}

#[tokio::test]
async fn measure_request_notifies_dirgegen() {
    let app = common::spawn_app().await;
    let (_staff_id, _staff_rut, staff_token) = common::create_account(&app, "dirgegen").await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    request_measure(&app, &token, complaint_id, "Medida académica").await;

    let resp = app
        .client
        .get(app.url("/notificaciones"))
        .bearer_auth(&staff_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items.iter().any(|n| n["kind"] == "nueva_solicitud"
        && n["complaint_id"].as_i64() == Some(complaint_id as i64)));
}

#[tokio::test]
async fn worklist_is_staff_only() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;

    let resp = app
        .client
        .get(app.url("/solicitudes/medidas"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn worklist_lists_pending_requests() {
    let app = common::spawn_app().await;
    let (_staff_id, _staff_rut, staff_token) = common::create_account(&app, "dirgegen").await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    request_measure(&app, &token, complaint_id, "Separación de espacios").await;
    request_measure(&app, &token, complaint_id, "Acompañamiento psicológico").await;

    let resp = app
        .client
        .get(app.url("/solicitudes/medidas"))
        .bearer_auth(&staff_token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items.len() >= 2);
    assert!(items.iter().all(|m| m["status"] == "Pendiente Informe"));
}

#[tokio::test]
async fn own_requests_exclude_other_requesters() {
    let app = common::spawn_app().await;
    let (id_a, _rut_a, token_a) = common::create_account(&app, "denunciante").await;
    let (_id_b, _rut_b, token_b) = common::create_account(&app, "denunciante").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    request_measure(&app, &token_a, complaint_id, "Separación de espacios").await;
    request_measure(&app, &token_b, complaint_id, "Medida académica").await;

    let resp = app
        .client
        .get(app.url("/solicitudes/medidas/mias"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items
        .iter()
        .all(|m| m["requester_person_id"].as_i64() == Some(id_a as i64)));
}
