//! HTTP handlers of the catalog API.

use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::error::{BlockingError, InternalError};
use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;

use crate::domain::types::MediaPath;
use crate::forms::{MAX_UPLOAD_BYTES, UploadedFile};
use crate::media::MediaStore;
use crate::services::{ServiceError, ServiceResult};

pub mod categories;
pub mod jewelry;
pub mod main;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of successful responses that carry no record.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorBody::new("Not found")),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        ServiceError::Unavailable => {
            HttpResponse::ServiceUnavailable().json(ErrorBody::new("Database not connected"))
        }
        ServiceError::Internal => {
            HttpResponse::InternalServerError().json(ErrorBody::new("Internal server error"))
        }
    }
}

/// Turn the outcome of a blocking service call into a JSON response.
pub fn respond<T: Serialize>(
    result: Result<ServiceResult<T>, BlockingError>,
    status: StatusCode,
    action: &str,
) -> HttpResponse {
    match result {
        Ok(Ok(body)) => HttpResponse::build(status).json(body),
        Ok(Err(err)) => {
            if matches!(err, ServiceError::Internal | ServiceError::Unavailable) {
                log::error!("Failed to {action}: {err}");
            }
            error_response(err)
        }
        Err(e) => {
            log::error!("Failed to {action}: blocking task failed: {e}");
            error_response(ServiceError::Internal)
        }
    }
}

/// Move an accepted upload into the media store.
pub(crate) fn stage_upload(
    upload: Option<UploadedFile>,
    store: &MediaStore,
) -> ServiceResult<Option<MediaPath>> {
    upload
        .map(|upload| {
            upload.stage(store).map_err(|e| {
                log::error!("Failed to store upload: {e}");
                ServiceError::Internal
            })
        })
        .transpose()
}

/// Cross-origin policy for browser clients: any origin, the API's methods,
/// any request header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}

/// Register the API handlers and the extractor error handlers on an app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_UPLOAD_BYTES * 2)
            .error_handler(|err, _req| {
                let message = err.to_string();
                InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody::new(message)))
                    .into()
            }),
    )
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody::new(message)))
            .into()
    }))
    .service(main::index)
    .service(categories::list_categories)
    .service(categories::get_category)
    .service(categories::create_category)
    .service(categories::update_category)
    .service(categories::delete_category)
    .service(jewelry::list_jewelry)
    .service(jewelry::list_jewelry_by_category)
    .service(jewelry::list_jewelry_by_category_name)
    .service(jewelry::get_jewelry)
    .service(jewelry::create_jewelry)
    .service(jewelry::update_jewelry)
    .service(jewelry::delete_jewelry);
}
