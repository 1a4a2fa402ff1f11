//! Error type for the roadmap API.
//!
//! Every handler returns `poem::Result`; [`RoadmapError`] converts into a
//! `poem::Error` through [`ResponseError`], rendering a JSON envelope:
//!
//! ```json
//! { "code": "VALIDATION_FAILED", "message": "...", "errors": [{ "field": "name", "message": "..." }] }
//! ```

use poem::{error::ResponseError, http::StatusCode, Body, IntoResponse, Response};
use poem_openapi::error::{ContentTypeError, ParseParamError, ParseRequestPayloadError};
use sea_orm::DbErr;
use serde_json::json;

use crate::validate::ValidationResult;

pub type RoadmapResult<T> = Result<T, RoadmapError>;

#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("insufficient permissions")]
    Forbidden,

    #[error("tenant could not be resolved")]
    MissingTenant,

    #[error("validation failed")]
    Validation(ValidationResult),

    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl RoadmapError {
    pub fn code(&self) -> &'static str {
        match self {
            RoadmapError::Unauthenticated => "UNAUTHORIZED",
            RoadmapError::InvalidToken(_) => "INVALID_TOKEN",
            RoadmapError::Forbidden => "FORBIDDEN",
            RoadmapError::MissingTenant => "MISSING_TENANT",
            RoadmapError::Validation(_) => "VALIDATION_FAILED",
            RoadmapError::MalformedRequest(_) => "BAD_REQUEST",
            RoadmapError::NotFound(_) => "NOT_FOUND",
            RoadmapError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for RoadmapError {
    fn status(&self) -> StatusCode {
        match self {
            RoadmapError::Unauthenticated | RoadmapError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            RoadmapError::Forbidden => StatusCode::FORBIDDEN,
            RoadmapError::MissingTenant
            | RoadmapError::Validation(_)
            | RoadmapError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            RoadmapError::NotFound(_) => StatusCode::NOT_FOUND,
            RoadmapError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn as_response(&self) -> Response {
        let body = match self {
            RoadmapError::Validation(result) => {
                let errors: Vec<_> = result
                    .failures()
                    .iter()
                    .map(|f| json!({ "field": f.field, "message": f.message }))
                    .collect();
                json!({ "code": self.code(), "message": self.to_string(), "errors": errors })
            }
            RoadmapError::Database(err) => {
                // Store details stay in the logs.
                tracing::error!(error = %err, "store operation failed");
                json!({ "code": self.code(), "message": "internal failure" })
            }
            _ => json!({ "code": self.code(), "message": self.to_string() }),
        };

        Response::builder()
            .status(self.status())
            .content_type("application/json")
            .body(Body::from_json(body).unwrap_or_else(|_| Body::empty()))
    }
}

/// Render request binding failures (bad JSON body, unparsable path or
/// content type) in the same envelope as [`RoadmapError`]. Other errors keep
/// their own response.
pub async fn render_request_error(err: poem::Error) -> Response {
    if err.is::<ParseRequestPayloadError>()
        || err.is::<ParseParamError>()
        || err.is::<ContentTypeError>()
    {
        return RoadmapError::MalformedRequest(err.to_string()).as_response();
    }
    err.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RoadmapError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(RoadmapError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(RoadmapError::NotFound("column").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            RoadmapError::Validation(ValidationResult::success()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RoadmapError::Database(DbErr::Custom("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_binding_errors_use_envelope() {
        let err = poem::Error::from(ParseParamError {
            name: "number",
            reason: "failed to parse \"integer_int32\"".into(),
        });
        let resp = render_request_error(err).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.into_body().into_json().await.unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_roadmap_errors_pass_through() {
        let err = poem::Error::from(RoadmapError::Forbidden);
        let resp = render_request_error(err).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = resp.into_body().into_json().await.unwrap();
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(RoadmapError::NotFound("post").to_string(), "post not found");
    }
}
