pub mod registration_handlers;

use actix_web::{HttpResponse, web};

use crate::errors::AppError;

/// Request bodies above this size are rejected.
const JSON_BODY_LIMIT: usize = 100 * 1024;

/// JSON extractor settings: bad or non-JSON bodies become a 400 with the
/// usual `{"error": ...}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {err}");
            AppError::invalid("Invalid request body").into()
        })
}

/// Configure the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public
            .route("/register", web::post().to(registration_handlers::submit))
            // Admin
            .route("/registrations", web::get().to(registration_handlers::list))
            .route("/registration", web::get().to(registration_handlers::detail)),
    );
}

/// Fallback for unknown routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Not found".to_string()))
}
