use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::registration::{
    self, INVALID_REGISTRATION_ID, RegistrationCreated, RegistrationRequest,
};
use crate::reply::JsonReply;

/// POST /api/register - Save a registration and its members
pub async fn submit(
    pool: web::Data<DbPool>,
    body: web::Json<RegistrationRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    log::info!(
        "Registration received for event: {} | counts: {} {} {}",
        request.event_id,
        request.attending().len(),
        request.might().len(),
        request.cant().len()
    );

    let new = registration::validate_request(&request).inspect_err(|e| {
        log::warn!("Rejected registration: {e}");
    })?;

    let registration_id = registration::create(&pool, &new).await?;

    let mut reply = JsonReply::default();
    reply.send(
        StatusCode::CREATED,
        &RegistrationCreated { message: "Registration saved", registration_id },
    );
    Ok(reply.finish())
}

/// GET /api/registrations - All registration headers, newest first
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let registrations = registration::find_all(&pool).await?;

    let mut reply = JsonReply::default();
    reply.send(StatusCode::OK, &registrations);
    Ok(reply.finish())
}

/// GET /api/registration?id=N - One registration with its members
pub async fn detail(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let id = query
        .get("id")
        .and_then(|raw| registration::parse_positive_id_str(raw))
        .ok_or_else(|| AppError::invalid(INVALID_REGISTRATION_ID))?;

    let detail = registration::find_detail(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    let mut reply = JsonReply::default();
    reply.send(StatusCode::OK, &detail);
    Ok(reply.finish())
}
