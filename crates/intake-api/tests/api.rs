mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::{RecordingNotifier, app, app_with, body_bytes, body_json, call, complete_record};

async fn open_session(router: &axum::Router) -> String {
    let resp = call(router, "POST", "/sessions", None).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let resp = call(&app.router, "GET", "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn schema_lists_sections_and_dependents() {
    let app = app();
    let schema = body_json(call(&app.router, "GET", "/schema", None).await).await;
    assert_eq!(schema.as_array().unwrap().len(), 19);
    assert_eq!(schema[0]["title"], "Dados Pessoais");

    let deps = body_json(
        call(&app.router, "GET", "/schema/fields/smokes_currently/dependents", None).await,
    )
    .await;
    assert_eq!(
        deps["dependents"],
        json!([
            "smoking_type",
            "smoked_before",
            "smoking_start_age",
            "cigarettes_per_day",
            "pack_years"
        ])
    );
    assert_eq!(deps["derived"], json!(["pack_years"]));

    let resp = call(&app.router, "GET", "/schema/fields/nope/dependents", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn instruments_are_listed() {
    let app = app();
    let list = body_json(call(&app.router, "GET", "/instruments", None).await).await;
    assert!(list.as_array().unwrap().iter().any(|i| i["id"] == "epworth"));

    let snoring = list
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "snoring_intensity")
        .unwrap();
    assert_eq!(snoring["fields"], json!(["snoring_intensity"]));

    let detail = body_json(call(&app.router, "GET", "/instruments/epworth", None).await).await;
    assert_eq!(detail["domains"][0]["subscales"].as_array().unwrap().len(), 9);
    assert_eq!(detail["total_range"]["max"], 24.0);

    let resp = call(&app.router, "GET", "/instruments/psqi", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn field_writes_refresh_derived_values() {
    let app = app();
    let id = open_session(&app.router).await;

    for (item, value) in [("epworth_reading", 3), ("epworth_tv", 3), ("epworth_traffic", 3)] {
        let resp = call(
            &app.router,
            "PUT",
            &format!("/sessions/{id}/fields/{item}"),
            Some(json!(value)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/fields/epworth_passenger"),
        Some(json!(2)),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["record"]["epworth_total"], 11);

    let derived = body_json(call(&app.router, "GET", &format!("/sessions/{id}/derived"), None).await).await;
    assert_eq!(derived["epworth_total"], 11);
    assert_eq!(derived["epworth_band"], "Sonolência excessiva");
    assert!(derived["age"].is_null());
    assert_eq!(derived["age_error"], "birth date is empty");
}

#[tokio::test]
async fn slot_writes_touch_one_slot() {
    let app = app();
    let id = open_session(&app.router).await;

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/slots/surgeries/2"),
        Some(json!({ "value": "Apendicectomia 2010" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(
        body["record"]["surgeries"],
        json!(["", "", "Apendicectomia 2010", "", "", ""])
    );

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/slots/surgeries/6"),
        Some(json!({ "value": "x" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/slots/full_name/0"),
        Some(json!({ "value": "x" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_field_writes_are_rejected() {
    let app = app();
    let id = open_session(&app.router).await;

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/fields/shoe_size"),
        Some(json!(42)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/fields/epworth_tv"),
        Some(json!("muito")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{}/fields/full_name", uuid::Uuid::new_v4()),
        Some(json!("Ana")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_requires_name_then_declaration() {
    let app = app();
    let id = open_session(&app.router).await;

    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"],
        "Por favor, preencha o nome completo."
    );

    call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/fields/full_name"),
        Some(json!("Ana Lúcia")),
    )
    .await;
    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"],
        "Por favor, aceite a declaração de veracidade das informações."
    );

    assert!(app.forms.rows.lock().unwrap().is_empty());
    assert_eq!(app.notifier.count(), 0);
}

#[tokio::test]
async fn session_submission_stores_and_notifies() {
    let app = app();
    let id = open_session(&app.router).await;
    for (name, value) in [
        ("full_name", json!("Ana Lúcia")),
        ("birth_date", json!("1990-02-01")),
        ("declaration", json!(true)),
    ] {
        call(
            &app.router,
            "PUT",
            &format!("/sessions/{id}/fields/{name}"),
            Some(value),
        )
        .await;
    }

    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let receipt = body_json(resp).await;
    assert_eq!(receipt["notification_id"], "email-1");
    assert_eq!(receipt["warnings"], json!([]));

    let rows = app.forms.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    let row = rows.values().next().unwrap();
    assert_eq!(row.id.to_string(), receipt["id"].as_str().unwrap());
    assert_eq!(row.full_name, "Ana Lúcia");
    assert_eq!(row.birth_date.as_deref(), Some("1990-02-01"));
    assert!(row.age > 0);

    drop(rows);

    let sent = app.notifier.sent.lock().unwrap();
    assert_eq!(sent[0].subject, "Novo Formulário Médico - Ana Lúcia");
    assert_eq!(sent[0].attachments[0].filename, "ficha-medica-ana-lucia.pdf");
    assert!(sent[0].attachments[0].bytes.starts_with(b"%PDF"));
    assert!(sent[0].html.contains("Novo Formulário Médico Recebido"));
    drop(sent);

    let resp = call(&app.router, "GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.notifier.count(), 1);
}

#[tokio::test]
async fn rejected_submission_keeps_the_session_open() {
    let app = app();
    let id = open_session(&app.router).await;

    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = call(&app.router, "GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn cleared_birth_date_is_stored_without_an_age() {
    let app = app();
    let id = open_session(&app.router).await;
    for (name, value) in [
        ("full_name", json!("Ana Lúcia")),
        ("declaration", json!(true)),
        ("birth_date", json!("1980-01-01")),
    ] {
        call(
            &app.router,
            "PUT",
            &format!("/sessions/{id}/fields/{name}"),
            Some(value),
        )
        .await;
    }
    let resp = call(
        &app.router,
        "PUT",
        &format!("/sessions/{id}/fields/birth_date"),
        Some(json!("")),
    )
    .await;
    assert_eq!(body_json(resp).await["record"]["age"], 0);

    let resp = call(&app.router, "POST", &format!("/sessions/{id}/submit"), None).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let rows = app.forms.rows.lock().unwrap();
    let row = rows.values().next().unwrap();
    assert_eq!(row.birth_date, None);
    assert_eq!(row.age, 0);
}

#[tokio::test]
async fn out_of_range_answers_are_warnings() {
    let app = app();
    let mut record = complete_record();
    record.epworth.epworth_tv = 7;

    let resp = call(
        &app.router,
        "POST",
        "/forms",
        Some(serde_json::to_value(&record).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let receipt = body_json(resp).await;
    let warnings = receipt["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("Assistindo TV"));
}

#[tokio::test]
async fn notification_failure_keeps_the_row() {
    let app = app_with(RecordingNotifier::failing());
    let resp = call(
        &app.router,
        "POST",
        "/forms",
        Some(serde_json::to_value(complete_record()).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.forms.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stored_forms_can_be_listed_read_and_renotified() {
    let app = app();
    let receipt = body_json(
        call(
            &app.router,
            "POST",
            "/forms",
            Some(serde_json::to_value(complete_record()).unwrap()),
        )
        .await,
    )
    .await;
    let id = receipt["id"].as_str().unwrap();

    let list = body_json(call(&app.router, "GET", "/forms", None).await).await;
    assert_eq!(list[0]["full_name"], "Maria Aparecida");

    let row = body_json(call(&app.router, "GET", &format!("/forms/{id}"), None).await).await;
    assert_eq!(row["referral_source"], "Outro médico");
    assert_eq!(row["form_data"]["declaration"], true);

    let resp = call(&app.router, "POST", &format!("/forms/{id}/notify"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["notification_id"], "email-2");

    let missing = uuid::Uuid::new_v4();
    let resp = call(&app.router, "GET", &format!("/forms/{missing}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_returns_a_named_download() {
    let app = app();
    let resp = call(
        &app.router,
        "POST",
        "/forms/export?format=html",
        Some(serde_json::to_value(complete_record()).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"ficha-medica-maria-aparecida.html\""
    );
    let html = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(html.contains("FICHA DE PRÉ-AVALIAÇÃO MÉDICA"));
}

#[tokio::test]
async fn session_export_defaults_to_pdf_and_checks_precondition() {
    let app = app();
    let id = open_session(&app.router).await;

    let resp = call(&app.router, "POST", &format!("/sessions/{id}/export"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for (name, value) in [("full_name", json!("Ana")), ("declaration", json!(true))] {
        call(
            &app.router,
            "PUT",
            &format!("/sessions/{id}/fields/{name}"),
            Some(value),
        )
        .await;
    }
    let resp = call(&app.router, "POST", &format!("/sessions/{id}/export"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(body_bytes(resp).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn deleted_sessions_are_gone() {
    let app = app();
    let id = open_session(&app.router).await;
    let resp = call(&app.router, "DELETE", &format!("/sessions/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = call(&app.router, "GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
