use axum::http::StatusCode;

use crate::{
	adapters::repositories::TRepository,
	domain::{MissingRecord, Phantom, Record},
};

use super::response::{Reply, ServiceError, ServiceResponse};

/// Parses the trailing path segment into a record id.
pub fn parse_id(raw: &str) -> Result<u64, ServiceError> {
	if raw.is_empty() {
		return Err(ServiceError::MissingId);
	}
	raw.parse::<u64>().map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

/// CRUD operations shared by posts and comments.
pub struct CrudHandler;
impl CrudHandler {
	pub async fn list<E>(
		repo: &dyn TRepository<E>,
		missing: MissingRecord,
	) -> Result<Reply, ServiceError>
	where
		E: Record + Phantom,
		ServiceResponse: From<Vec<E>>,
	{
		let mut records = repo.get_all().await?;
		if records.is_empty() && missing == MissingRecord::Placeholder {
			records.push(E::phantom());
		}
		tracing::debug!("Listing {} {}(s)", records.len(), E::NAME);
		Ok((StatusCode::OK, records.into()))
	}

	pub async fn fetch<E>(
		repo: &dyn TRepository<E>,
		raw_id: &str,
		missing: MissingRecord,
	) -> Result<Reply, ServiceError>
	where
		E: Record + Phantom,
		ServiceResponse: From<E>,
	{
		let id = parse_id(raw_id)?;
		match (repo.get(id).await?, missing) {
			(Some(record), _) => Ok((StatusCode::OK, record.into())),
			(None, MissingRecord::Placeholder) => Ok((StatusCode::OK, E::phantom().into())),
			(None, MissingRecord::NotFound) => Err(ServiceError::EntityNotFound { entity: E::NAME, id }),
		}
	}

	pub async fn create<E>(
		repo: &dyn TRepository<E>,
		body: &[u8],
	) -> Result<Reply, ServiceError>
	where
		E: Record,
		ServiceResponse: From<E>,
	{
		let payload: E::Payload = serde_json::from_slice(body)?;
		let record = repo.create(payload).await?;
		tracing::info!("Created {} {}", E::NAME, record.id());
		Ok((StatusCode::CREATED, record.into()))
	}

	/// Overwrites the record named by the path; an id inside the body is ignored.
	pub async fn update<E>(
		repo: &dyn TRepository<E>,
		raw_id: &str,
		body: &[u8],
	) -> Result<Reply, ServiceError>
	where
		E: Record,
		ServiceResponse: From<E>,
	{
		let id = parse_id(raw_id)?;
		let payload: E::Payload = serde_json::from_slice(body)?;
		let record = repo.update(E::from_payload(id, payload)).await?;
		tracing::info!("Updated {} {}", E::NAME, id);
		Ok((StatusCode::OK, record.into()))
	}

	pub async fn delete<E>(
		repo: &dyn TRepository<E>,
		raw_id: &str,
	) -> Result<Reply, ServiceError>
	where
		E: Record,
	{
		let id = parse_id(raw_id)?;
		repo.delete(id).await?;
		tracing::info!("Deleted {} {}", E::NAME, id);
		Ok((StatusCode::OK, id.into()))
	}
}
