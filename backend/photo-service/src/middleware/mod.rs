/// HTTP middleware utilities for photo-service
///
/// Provides the bearer-identity extractor. The bearer value is the raw user
/// id resolved upstream; this layer performs no verification beyond shape.
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Caller identity extracted from the `Authorization: Bearer <user_id>` header.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub i64);

fn parse_bearer(value: &str) -> Result<i64, AppError> {
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid Authorization scheme".to_string()))?;

    token
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("malformed bearer identity".to_string()))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))
            .and_then(parse_bearer)
            .map(Identity);

        ready(result)
    }
}
