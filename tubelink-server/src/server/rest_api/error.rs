use crate::lifecycle::{PlayerUnavailable, SubmitLinkError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Type-erased error response
///
/// NOTE: This type is inspired by RFC7807 (Problem Details for HTTP APIs) but spares on a lot of
/// the details to avoid complexity.
///
/// See: <https://www.rfc-editor.org/rfc/rfc7807.html>
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorResponse {
	pub r#type: String,
	pub status: u16,
	pub message: String,
}

impl ApiErrorResponse {
	fn new(r#type: &str, status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			r#type: r#type.to_string(),
			status: status.as_u16(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ApiErrorResponse {
	fn into_response(self) -> Response {
		let status_code = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status_code, Json(self)).into_response()
	}
}

impl From<PlayerUnavailable> for ApiErrorResponse {
	fn from(error: PlayerUnavailable) -> Self {
		Self::new("player_unavailable", StatusCode::SERVICE_UNAVAILABLE, error.to_string())
	}
}

impl From<SubmitLinkError> for ApiErrorResponse {
	fn from(error: SubmitLinkError) -> Self {
		match error {
			SubmitLinkError::InvalidLink(error) => {
				Self::new("invalid_link", StatusCode::UNPROCESSABLE_ENTITY, error.alert_message())
			}
			SubmitLinkError::PlayerUnavailable(error) => error.into(),
		}
	}
}
