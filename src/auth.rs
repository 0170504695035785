//! Bearer-token gate for mutating endpoints.

use std::future::{Ready, ready};

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::models::config::ServerConfig;
use crate::routes::ErrorBody;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Invalid API token")]
    InvalidToken,
    #[error("Server configuration unavailable")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

/// Proof that the request carried the configured API token.
///
/// Add it as a handler argument to require authentication.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

impl FromRequest for Authorized {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<Authorized, AuthError> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("ServerConfig is not registered as app data");
        return Err(AuthError::NotConfigured);
    };

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    // Compared in constant time.
    if bool::from(token.as_bytes().ct_eq(config.api_token.as_bytes())) {
        Ok(Authorized)
    } else {
        log::warn!("Rejected request to {} with an invalid token", req.path());
        Err(AuthError::InvalidToken)
    }
}
