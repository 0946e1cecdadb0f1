/// Home stream handler
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::Identity;

/// Reverse-chronological photos from every followed user
pub async fn get_stream(state: web::Data<AppState>, identity: Identity) -> Result<HttpResponse> {
    let stream = state.aggregation.home_stream(identity.0).await?;
    Ok(HttpResponse::Ok().json(stream))
}
