mod common;

use common::{bag, harness, wait_until_terminal, FailingOracle, MockPdfRenderer, SlowOracle};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use visaprep_server::appdata::FieldValue;
use visaprep_server::generation::{
    DocumentStatus, DocumentStore, GeneratedDocumentRecord, GenerationError,
};
use visaprep_server::generators::DocumentType;

fn jane_doe() -> Vec<(&'static str, FieldValue)> {
    vec![
        ("full_name", FieldValue::Text("Jane Doe".into())),
        ("passport_number", FieldValue::Text("AB1234567".into())),
    ]
}

#[tokio::test]
async fn full_batch_completes_all_eight_documents() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(application_id, bag(&jane_doe()));

    let initial = h
        .state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("start");
    assert_eq!(initial.status, "started");
    assert_eq!(initial.total_documents, 8);

    let status = wait_until_terminal(&h.state, application_id).await;
    assert_eq!(status.status, "completed");
    assert_eq!(status.progress, 100);
    assert_eq!(status.documents_completed, 8);
    assert!(status.errors.is_empty(), "unexpected errors: {:?}", status.errors);
    assert_eq!(h.renderer.rendered_count(), 8);

    let documents = h
        .state
        .orchestrator
        .list_generated_documents(application_id)
        .await
        .expect("list");
    assert_eq!(documents.len(), 8);
    assert!(documents
        .iter()
        .any(|d| d.file_name == "visiting-card-jane-doe.pdf"));

    let card = h.renderer.rendered_text("Visiting Card").expect("card rendered");
    assert!(card.contains("Jane Doe"));
}

#[tokio::test]
async fn one_failing_document_does_not_stop_the_batch() {
    let h = harness(
        Arc::new(FailingOracle),
        MockPdfRenderer::failing_on(&["Visiting Card"]),
    );
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(application_id, bag(&jane_doe()));

    h.state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("start");
    let status = wait_until_terminal(&h.state, application_id).await;

    // the batch itself completes; the failure is reported per document
    assert_eq!(status.status, "completed");
    assert_eq!(status.documents_completed, 7);
    assert_eq!(status.errors.len(), 1);
    assert!(status.errors[0].starts_with("Visiting Card:"), "{:?}", status.errors);

    let records = h.document_store.all_records();
    assert_eq!(records.len(), 8);
    for record in &records {
        if record.document_type == DocumentType::VisitingCard {
            assert_eq!(record.status, DocumentStatus::Failed);
            assert!(record.error.is_some());
        } else {
            assert_eq!(record.status, DocumentStatus::Completed);
            assert!(record.file_size > 0);
        }
    }

    let documents = h
        .state
        .orchestrator
        .list_generated_documents(application_id)
        .await
        .expect("list");
    assert_eq!(documents.len(), 7);
}

#[tokio::test]
async fn concurrent_start_for_same_application_is_rejected() {
    let h = harness(
        Arc::new(SlowOracle {
            delay: Duration::from_millis(300),
        }),
        MockPdfRenderer::new(),
    );
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(application_id, bag(&jane_doe()));

    h.state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("first start");

    let second = h.state.orchestrator.start_generation(application_id).await;
    assert!(matches!(second, Err(GenerationError::AlreadyRunning(_))));

    // a different application is unaffected
    let other = Uuid::new_v4();
    h.data_store.put_answers(other, bag(&jane_doe()));
    assert!(h.state.orchestrator.start_generation(other).await.is_ok());

    wait_until_terminal(&h.state, application_id).await;
    wait_until_terminal(&h.state, other).await;

    // terminal jobs may be superseded by a fresh attempt
    assert!(h
        .state
        .orchestrator
        .start_generation(application_id)
        .await
        .is_ok());
    wait_until_terminal(&h.state, application_id).await;
}

#[tokio::test]
async fn status_before_any_run_is_not_started() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let status = h
        .state
        .orchestrator
        .get_status(Uuid::new_v4())
        .await
        .expect("status");
    assert_eq!(status.status, "not_started");
    assert_eq!(status.progress, 0);
}

#[tokio::test]
async fn status_is_derived_from_records_when_no_session_exists() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let application_id = Uuid::new_v4();
    let attempt = Uuid::new_v4();

    // durable records only, as after a server restart
    for document_type in DocumentType::ALL {
        let mut record = GeneratedDocumentRecord::new(
            application_id,
            attempt,
            document_type,
            format!("{}.pdf", document_type.file_stem()),
            format!("/tmp/{}.pdf", document_type.file_stem()),
        );
        if document_type == DocumentType::VisitingCard {
            record.mark_failed("render backend exited".to_string());
        } else {
            record.mark_completed(1024);
        }
        h.document_store.insert(&record).await.expect("insert");
    }

    let status = h
        .state
        .orchestrator
        .get_status(application_id)
        .await
        .expect("status");
    assert_eq!(status.status, "completed");
    assert_eq!(status.progress, 100);
    assert_eq!(status.documents_completed, 7);
    assert_eq!(
        status.errors,
        vec!["Visiting Card: render backend exited".to_string()]
    );
}

#[tokio::test]
async fn partial_records_without_a_session_read_as_generating() {
    let h = harness(Arc::new(FailingOracle), MockPdfRenderer::new());
    let application_id = Uuid::new_v4();
    let attempt = Uuid::new_v4();

    for document_type in &DocumentType::ALL[..3] {
        let mut record = GeneratedDocumentRecord::new(
            application_id,
            attempt,
            *document_type,
            format!("{}.pdf", document_type.file_stem()),
            format!("/tmp/{}.pdf", document_type.file_stem()),
        );
        record.mark_completed(1024);
        h.document_store.insert(&record).await.expect("insert");
    }

    let status = h
        .state
        .orchestrator
        .get_status(application_id)
        .await
        .expect("status");
    assert_eq!(status.status, "generating");
    assert_eq!(status.progress, 38);
    assert_eq!(status.documents_completed, 3);
    assert!(status.errors.is_empty());
}

#[tokio::test]
async fn only_completed_documents_are_downloadable() {
    let h = harness(
        Arc::new(FailingOracle),
        MockPdfRenderer::failing_on(&["Cover Letter"]),
    );
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(application_id, bag(&jane_doe()));

    h.state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("start");
    wait_until_terminal(&h.state, application_id).await;

    let records = h.document_store.all_records();
    let completed = records
        .iter()
        .find(|r| r.status == DocumentStatus::Completed)
        .expect("a completed record");
    let failed = records
        .iter()
        .find(|r| r.status == DocumentStatus::Failed)
        .expect("a failed record");

    let path = h
        .state
        .orchestrator
        .get_document_file_path(application_id, completed.id)
        .await
        .expect("path of completed document");
    assert!(path.exists(), "rendered file missing at {}", path.display());

    let denied = h
        .state
        .orchestrator
        .get_document_file_path(application_id, failed.id)
        .await;
    assert!(matches!(denied, Err(GenerationError::DocumentNotFound)));

    let unknown = h
        .state
        .orchestrator
        .get_document_file_path(application_id, Uuid::new_v4())
        .await;
    assert!(matches!(unknown, Err(GenerationError::DocumentNotFound)));
}

#[tokio::test]
async fn fresh_attempt_supersedes_prior_records_in_status() {
    let h = harness(
        Arc::new(FailingOracle),
        MockPdfRenderer::failing_on(&["Home Ties Statement"]),
    );
    let application_id = Uuid::new_v4();
    h.data_store.put_answers(application_id, bag(&jane_doe()));

    h.state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("first attempt");
    let first = wait_until_terminal(&h.state, application_id).await;
    assert_eq!(first.documents_completed, 7);

    h.state
        .orchestrator
        .start_generation(application_id)
        .await
        .expect("second attempt");
    let second = wait_until_terminal(&h.state, application_id).await;
    assert_eq!(second.documents_completed, 7);

    // both attempts left durable records
    assert_eq!(h.document_store.all_records().len(), 16);
}
