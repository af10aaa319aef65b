use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::{ErrorBody, INTERNAL_ERROR};

/// Holds the response for one request outcome.
///
/// Only the first `send` is kept; later calls are ignored so an outcome can
/// never produce two bodies.
#[derive(Default)]
pub struct JsonReply {
    response: Option<HttpResponse>,
}

impl JsonReply {
    /// Store `payload` as the response body. Returns `false` if a response
    /// was already stored.
    pub fn send<T: Serialize>(&mut self, status: StatusCode, payload: &T) -> bool {
        if self.response.is_some() {
            log::debug!("Response already sent, dropping {status} reply");
            return false;
        }
        self.response = Some(HttpResponse::build(status).json(payload));
        true
    }

    pub fn is_sent(&self) -> bool {
        self.response.is_some()
    }

    pub fn finish(self) -> HttpResponse {
        self.response.unwrap_or_else(|| {
            log::warn!("Handler finished without a response");
            HttpResponse::InternalServerError().json(ErrorBody { error: INTERNAL_ERROR })
        })
    }
}
