mod common;

use serde_json::Value;

fn report_payload(complaint_id: i32) -> serde_json::Value {
    serde_json::json!({
        "denuncia_id": complaint_id,
        "facts": "Los hechos acreditados durante la indagación preliminar.",
        "analysis": "Análisis jurídico y psicosocial de los antecedentes.",
        "conclusion": "Se recomienda abrir una investigación formal.",
    })
}

#[tokio::test]
async fn filing_report_forces_investigation_state() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["complaint_id"].as_i64().unwrap() as i32,
        complaint_id
    );

    // Filing jumps the case straight to En Investigación, with history
    let resp = app
        .client
        .get(app.url(&format!("/denuncias/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["complaint"]["state_id"], 6);
    let history = body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["state_id"], 6);
    assert_eq!(body["data"]["technical_report"]["complaint_id"], complaint_id);
}

#[tokio::test]
async fn second_report_for_same_complaint_is_rejected() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "INFORME_YA_EXISTE");
}

#[tokio::test]
async fn report_for_unknown_complaint_is_not_found() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;

    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(999999))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "DENUNCIA_NO_ENCONTRADA");
}

#[tokio::test]
async fn update_overwrites_report_in_place() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "dirgegen").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    app.client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/informes-tecnicos/{}", complaint_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "facts": "Hechos corregidos tras nuevos antecedentes.",
            "analysis": "Análisis actualizado.",
            "conclusion": "Se mantiene la recomendación.",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["facts"], "Hechos corregidos tras nuevos antecedentes.");

    // Still exactly one report for the complaint
    let resp = app
        .client
        .get(app.url(&format!("/informes-tecnicos/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["analysis"], "Análisis actualizado.");
}

#[tokio::test]
async fn get_missing_report_is_not_found() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "vrae").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = app
        .client
        .get(app.url(&format!("/informes-tecnicos/{}", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "INFORME_NO_ENCONTRADO");
}

#[tokio::test]
async fn reporter_cannot_file_report() {
    let app = common::spawn_app().await;
    let (_id, _rut, token) = common::create_account(&app, "denunciante").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn only_dirgegen_authors_reports() {
    let app = common::spawn_app().await;
    let (_id, _rut, vra_token) = common::create_account(&app, "vra").await;
    let complaint_id = common::create_test_complaint(&app, None).await;

    // Other review units can read reports but not write them
    let resp = app
        .client
        .post(app.url("/informes-tecnicos"))
        .bearer_auth(&vra_token)
        .json(&report_payload(complaint_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .put(app.url(&format!("/informes-tecnicos/{}", complaint_id)))
        .bearer_auth(&vra_token)
        .json(&serde_json::json!({
            "facts": "x", "analysis": "x", "conclusion": "x",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
