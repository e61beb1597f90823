use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use bionli_service::{
	EntitiesRequest, EntitiesResponse, HistoryResponse, QueryRequest, QueryResponse, ServiceError,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/query", post(query))
		.route("/api/history", get(history))
		.route("/api/entities", post(entities))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn query(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<QueryResponse>, ApiError> {
	let query = required_string(&body, "query")?;
	let response = state.service.query(QueryRequest { query }).await?;

	Ok(Json(response))
}

async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
	Json(state.service.history().await)
}

async fn entities(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<EntitiesResponse>, ApiError> {
	let text = required_string(&body, "text")?;
	let response = state.service.extract_entities(EntitiesRequest { text })?;

	Ok(Json(response))
}

// A missing or non-string field is a 400 with the JSON error body.
fn required_string(body: &Bytes, field: &'static str) -> Result<String, ApiError> {
	let payload: Value = serde_json::from_slice(body).map_err(|err| {
		ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_json",
			format!("Request body must be a JSON object: {err}."),
			None,
		)
	})?;

	match payload.get(field) {
		Some(Value::String(value)) => Ok(value.clone()),
		Some(_) => Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("{field} must be a string."),
			Some(vec![field.to_string()]),
		)),
		None => Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("{field} is required."),
			Some(vec![field.to_string()]),
		)),
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::Pipeline { message } | ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Request failed inside the service.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"The request could not be processed.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
