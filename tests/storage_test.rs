mod common;

use serde_json::Value;

async fn presign_upload(app: &common::TestApp, payload: Value) -> reqwest::Response {
    app.client
        .post(app.url("/storage/subida"))
        .json(&payload)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn presign_upload_issues_url_and_key() {
    let app = common::spawn_app().await;

    let resp = presign_upload(
        &app,
        serde_json::json!({
            "file_name": "captura pantalla.png",
            "content_type": "image/png",
            "size_bytes": 52_000,
        }),
    )
    .await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let key = body["data"]["object_key"].as_str().unwrap();
    // uuid prefix plus the sanitized original name
    assert!(key.ends_with("-captura_pantalla.png"));
    let url = body["data"]["upload_url"].as_str().unwrap();
    assert!(url.contains(key));
    assert!(url.contains("X-Amz-Signature"));
    assert!(body["data"]["expires_in_secs"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn presign_upload_rejects_executable_types() {
    let app = common::spawn_app().await;

    let resp = presign_upload(
        &app,
        serde_json::json!({
            "file_name": "virus.exe",
            "content_type": "application/x-msdownload",
            "size_bytes": 1000,
        }),
    )
    .await;

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn presign_upload_rejects_oversized_files() {
    let app = common::spawn_app().await;

    let resp = presign_upload(
        &app,
        serde_json::json!({
            "file_name": "video.mp4",
            "content_type": "video/mp4",
            "size_bytes": 300 * 1024 * 1024,
        }),
    )
    .await;

    assert_eq!(resp.status(), 413);
}

#[tokio::test]
async fn download_requires_registered_evidence_key() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;

    let resp = app
        .client
        .post(app.url("/storage/descarga"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "object_key": "clave-inexistente.pdf" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn download_presigns_attached_evidence() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;

    // Attach evidence through complaint intake, then request its download URL
    let resp = app
        .client
        .post(app.url("/denuncias"))
        .json(&serde_json::json!({
            "type_id": 1,
            "incident_date": "2026-04-02",
            "narrative": "Relato de prueba con un largo suficiente para pasar validación.",
            "evidence": [{
                "object_key": "e2e-evidencia-acta.pdf",
                "original_name": "acta.pdf",
                "content_type": "application/pdf",
                "size_bytes": 12_345,
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/storage/descarga"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "object_key": "e2e-evidencia-acta.pdf" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["object_key"], "e2e-evidencia-acta.pdf");
    let url = body["data"]["download_url"].as_str().unwrap();
    assert!(url.contains("e2e-evidencia-acta.pdf"));
    assert!(url.contains("X-Amz-Signature"));
}

#[tokio::test]
async fn download_requires_authentication() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/storage/descarga"))
        .json(&serde_json::json!({ "object_key": "cualquiera.pdf" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn delete_is_staff_only() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;

    let resp = app
        .client
        .delete(app.url("/storage/alguna-clave.pdf"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}
