//! HTTP endpoints for the generation pipeline.

use super::models::{GeneratedDocumentSummary, GenerationStatusResponse};
use super::GenerationError;
use crate::db::AppState;
use crate::generators::DocumentType;
use crate::requirements;
use crate::ErrorResponse;
use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

#[utoipa::path(
    context_path = "/api",
    tag = "Generation",
    post,
    path = "/applications/{id}/generate",
    responses(
        (status = 202, description = "Generation job accepted", body = GenerationStatusResponse),
        (status = 409, description = "Generation already in progress", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Application id")
    )
)]
pub async fn start_generation(
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.orchestrator.start_generation(id.into_inner()).await {
        Ok(status) => HttpResponse::Accepted().json(status),
        Err(GenerationError::AlreadyRunning(err)) => {
            HttpResponse::Conflict().json(ErrorResponse::conflict(&err.to_string()))
        }
        Err(err) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generation",
    get,
    path = "/applications/{id}/generation/status",
    responses(
        (status = 200, description = "Current job status", body = GenerationStatusResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Application id")
    )
)]
pub async fn get_status(id: web::Path<Uuid>, state: web::Data<AppState>) -> impl Responder {
    match state.orchestrator.get_status(id.into_inner()).await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(err) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generation",
    get,
    path = "/applications/{id}/documents",
    responses(
        (status = 200, description = "Completed documents", body = [GeneratedDocumentSummary]),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Application id")
    )
)]
pub async fn list_documents(id: web::Path<Uuid>, state: web::Data<AppState>) -> impl Responder {
    match state
        .orchestrator
        .list_generated_documents(id.into_inner())
        .await
    {
        Ok(documents) => HttpResponse::Ok().json(documents),
        Err(err) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Generation",
    get,
    path = "/applications/{id}/documents/{document_id}/file",
    responses(
        (status = 200, description = "The generated PDF"),
        (status = 404, description = "Document absent or not completed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Application id"),
        ("document_id" = Uuid, Path, description = "Generated document id")
    )
)]
pub async fn download_document(
    path: web::Path<(Uuid, Uuid)>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    let (application_id, document_id) = path.into_inner();
    match state
        .orchestrator
        .get_document_file_path(application_id, document_id)
        .await
    {
        Ok(file_path) => match NamedFile::open_async(&file_path).await {
            Ok(file) => file.into_response(&req),
            Err(_) => HttpResponse::NotFound()
                .json(ErrorResponse::not_found("Document file is missing from storage")),
        },
        Err(GenerationError::DocumentNotFound) => HttpResponse::NotFound()
            .json(ErrorResponse::not_found("Document not found or not completed")),
        Err(err) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Requirements",
    get,
    path = "/requirements/{document_type}",
    responses(
        (status = 200, description = "Field requirements for the document type",
         body = [requirements::FieldRequirement]),
        (status = 404, description = "Unknown document type", body = ErrorResponse)
    ),
    params(
        ("document_type" = String, Path, description = "Document type, e.g. cover_letter")
    )
)]
pub async fn get_requirements(document_type: web::Path<String>) -> impl Responder {
    match DocumentType::parse(&document_type) {
        Some(dt) => HttpResponse::Ok().json(requirements::requirements_for(dt)),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Unknown document type '{}'",
            document_type
        ))),
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/applications/{id}/generate").route(web::post().to(start_generation)),
    )
    .service(
        web::resource("/applications/{id}/generation/status").route(web::get().to(get_status)),
    )
    .service(web::resource("/applications/{id}/documents").route(web::get().to(list_documents)))
    .service(
        web::resource("/applications/{id}/documents/{document_id}/file")
            .route(web::get().to(download_document)),
    )
    .service(
        web::resource("/requirements/{document_type}").route(web::get().to(get_requirements)),
    );
}
