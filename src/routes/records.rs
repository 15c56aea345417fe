use axum::{
	extract::{Path, State},
	http::{HeaderMap, Method},
	response::Response,
};
use bytes::Bytes;

use crate::{
	services::{
		handlers::CrudHandler,
		response::{respond, ServiceError, ServiceResponse},
	},
	state::AppState,
};

use super::Resource;

pub(super) async fn list<E: Resource>(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Response
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	let outcome = CrudHandler::list::<E>(E::repository(&state), state.missing).await;
	respond(state.format_for(&headers), outcome)
}

pub(super) async fn fetch<E: Resource>(
	State(state): State<AppState>,
	Path(raw_id): Path<String>,
	headers: HeaderMap,
) -> Response
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	let outcome = CrudHandler::fetch::<E>(E::repository(&state), &raw_id, state.missing).await;
	respond(state.format_for(&headers), outcome)
}

pub(super) async fn create<E: Resource>(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Response
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	let outcome = CrudHandler::create::<E>(E::repository(&state), &body).await;
	respond(state.format_for(&headers), outcome)
}

pub(super) async fn update<E: Resource>(
	State(state): State<AppState>,
	Path(raw_id): Path<String>,
	headers: HeaderMap,
	body: Bytes,
) -> Response
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	let outcome = CrudHandler::update::<E>(E::repository(&state), &raw_id, &body).await;
	respond(state.format_for(&headers), outcome)
}

pub(super) async fn delete<E: Resource>(
	State(state): State<AppState>,
	Path(raw_id): Path<String>,
	headers: HeaderMap,
) -> Response
where
	ServiceResponse: From<E> + From<Vec<E>>,
{
	let outcome = CrudHandler::delete::<E>(E::repository(&state), &raw_id).await;
	respond(state.format_for(&headers), outcome)
}

/// PUT and DELETE on a collection path.
pub(super) async fn missing_id(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Response {
	respond(state.format_for(&headers), Err(ServiceError::MissingId))
}

pub(super) async fn method_not_allowed(
	State(state): State<AppState>,
	method: Method,
	headers: HeaderMap,
) -> Response {
	respond(state.format_for(&headers), Err(ServiceError::MethodNotAllowed(method.to_string())))
}
