mod common;

use actix_web::{test, web, App};
use common::{bag, harness, wait_until_terminal, FailingOracle, MockPdfRenderer, SlowOracle};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use visaprep_server::appdata::FieldValue;
use visaprep_server::generation::handlers;

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(web::scope("/api").configure(handlers::config))
                .service(web::resource("/health").route(web::get().to(handlers::health))),
        )
        .await
    };
}

#[actix_web::test]
async fn health_endpoint_answers_ok() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let app = test_app!(h.state.clone());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn requirements_endpoint_lists_fields_per_document_type() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let app = test_app!(h.state.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/requirements/cover_letter")
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let fields = body.as_array().expect("array of requirements");
    assert!(!fields.is_empty());
    assert!(fields
        .iter()
        .any(|f| f["field_key"] == "full_name" && f["priority"] == "critical"));
}

#[actix_web::test]
async fn unknown_document_type_is_404() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let app = test_app!(h.state.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/requirements/tax_return")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn start_is_accepted_and_concurrent_start_conflicts() {
    let h = harness(
        Arc::new(SlowOracle {
            delay: Duration::from_millis(300),
        }),
        MockPdfRenderer::new(),
    );
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(
        application_id,
        bag(&[("full_name", FieldValue::Text("Jane Doe".into()))]),
    );
    let app = test_app!(h.state.clone());

    let start_uri = format!("/api/applications/{application_id}/generate");
    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri(&start_uri).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 202);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "started");
    assert_eq!(body["total_documents"], 8);

    let conflict = test::call_service(
        &app,
        test::TestRequest::post().uri(&start_uri).to_request(),
    )
    .await;
    assert_eq!(conflict.status(), 409);

    let body: serde_json::Value = test::read_body_json(conflict).await;
    assert_eq!(body["error"], "Conflict");

    wait_until_terminal(&h.state, application_id).await;
}

#[actix_web::test]
async fn status_listing_and_download_cover_the_full_flow() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(
        application_id,
        bag(&[
            ("full_name", FieldValue::Text("Jane Doe".into())),
            ("passport_number", FieldValue::Text("AB1234567".into())),
        ]),
    );
    let app = test_app!(h.state.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/applications/{application_id}/generate"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 202);

    wait_until_terminal(&h.state, application_id).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/applications/{application_id}/generation/status"))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let status: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 100);
    assert_eq!(status["documents_completed"], 8);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/applications/{application_id}/documents"))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let documents: serde_json::Value = test::read_body_json(resp).await;
    let documents = documents.as_array().expect("array of documents");
    assert_eq!(documents.len(), 8);

    let document_id = documents[0]["id"].as_str().expect("document id");
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/applications/{application_id}/documents/{document_id}/file"
            ))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"%PDF"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/applications/{application_id}/documents/{}/file",
                Uuid::new_v4()
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn status_for_unknown_application_is_not_started() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let app = test_app!(h.state.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/applications/{}/generation/status",
                Uuid::new_v4()
            ))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "not_started");
    assert_eq!(body["progress"], 0);
}
