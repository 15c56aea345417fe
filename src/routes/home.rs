use axum::{
	extract::State,
	http::{HeaderMap, StatusCode, Uri},
	response::Response,
};

use crate::{
	services::response::{respond, ServiceError},
	state::AppState,
};

pub(super) async fn index(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Response {
	respond(state.format_for(&headers), Ok((StatusCode::OK, "hello page".into())))
}

pub(super) async fn page_not_found(
	State(state): State<AppState>,
	uri: Uri,
	headers: HeaderMap,
) -> Response {
	respond(state.format_for(&headers), Err(ServiceError::PageNotFound(uri.path().to_string())))
}
