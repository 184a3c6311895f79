use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod appdata;
pub mod autofill;
pub mod db;
pub mod generation;
pub mod generators;
pub mod oracle;
pub mod requirements;

pub use crate::db::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::generation::handlers::start_generation,
            crate::generation::handlers::get_status,
            crate::generation::handlers::list_documents,
            crate::generation::handlers::download_document,
            crate::generation::handlers::get_requirements,
        ),
        components(
            schemas(
                generation::models::GenerationStatusResponse,
                generation::models::GeneratedDocumentSummary,
                generation::models::DocumentStatus,
                generators::DocumentType,
                requirements::FieldRequirement,
                requirements::FieldKind,
                requirements::Priority,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Generation", description = "Document generation pipeline endpoints."),
            (name = "Requirements", description = "Per-document field requirement metadata.")
        )
    )]
    struct ApiDoc;

    let app_state = web::Data::new(AppState::new().await?);

    let prometheus = PrometheusMetricsBuilder::new("visaprep_server")
        .endpoint("/metrics")
        .build()
        .map_err(|err| anyhow::anyhow!("could not create Prometheus middleware: {err}"))?;

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(generation::handlers::config))
            .service(web::resource("/health").route(web::get().to(generation::handlers::health)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
