use crate::config::AppConfig;
use crate::estimator::VolumeEstimate;
use crate::pipeline;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query},
    http::{StatusCode, header::HeaderValue},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid allowed origin {origin}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
}

#[derive(Debug, Deserialize)]
pub struct ProcessParams {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.5
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    pub volume_mm3: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// Build the service router with body-limit, trace and CORS layers applied.
///
/// The CORS policy admits exactly the configured origin, with credentials,
/// mirroring whatever methods and headers the preflight asks for.
///
/// # Errors
///
/// Returns an error if the configured origin is not a valid header value.
pub fn router(config: &AppConfig) -> Result<Router, ServerError> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ServerError::InvalidOrigin {
            origin: config.allowed_origin.clone(),
            reason: e.to_string(),
        })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/process", post(process_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn process_handler(
    Query(params): Query<ProcessParams>,
    mut multipart: Multipart,
) -> Result<Json<VolumeResponse>, ErrorReply> {
    let upload = read_upload(&mut multipart).await?;

    match pipeline::process(&upload, params.threshold) {
        Ok(VolumeEstimate { volume_mm3, .. }) => Ok(Json(VolumeResponse { volume_mm3 })),
        Err(error) => {
            warn!(%error, "processing failed");
            Err(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing DICOM: {error}"),
            ))
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, ErrorReply> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_reply(
            StatusCode::BAD_REQUEST,
            format!("malformed multipart body: {e}"),
        )
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                error_reply(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read upload: {e}"),
                )
            })?;
            return Ok(bytes.to_vec());
        }
    }

    Err(error_reply(
        StatusCode::UNPROCESSABLE_ENTITY,
        "missing multipart field \"file\"".to_string(),
    ))
}

fn error_reply(status: StatusCode, detail: String) -> ErrorReply {
    (status, Json(ErrorResponse { detail }))
}
