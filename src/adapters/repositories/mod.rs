pub(crate) mod comment_repository;
#[cfg(any(test, feature = "test"))]
pub mod memory;
pub(crate) mod post_repository;

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::Record;
use crate::services::response::ServiceError;

/// Entity-level storage access.
///
/// Absence is reported as `None`; translating it into a placeholder is left to the caller.
#[async_trait]
pub trait TRepository<E: Record>: Send + Sync {
	/// Inserts a new record. Without an id in the payload the store assigns one.
	async fn create(
		&self,
		payload: E::Payload,
	) -> Result<E, ServiceError>;

	/// Inserts every record in one transaction, keeping the given ids.
	async fn create_many(
		&self,
		records: Vec<E>,
	) -> Result<usize, ServiceError>;

	async fn get(
		&self,
		id: u64,
	) -> Result<Option<E>, ServiceError>;

	async fn get_all(&self) -> Result<Vec<E>, ServiceError>;

	/// Overwrites an existing record. Fails with `EntityNotFound` when the id is unknown.
	async fn update(
		&self,
		record: E,
	) -> Result<E, ServiceError>;

	/// Removes a record. Deleting an unknown id is not an error.
	async fn delete(
		&self,
		id: u64,
	) -> Result<(), ServiceError>;
}

/// Postgres backed repository.
pub struct Repository<E: Record> {
	pub pool: PgPool,
	pub _phantom: PhantomData<E>,
}

impl<E: Record> Repository<E> {
	pub fn new(pool: PgPool) -> Self {
		Self {
			pool,
			_phantom: Default::default(),
		}
	}
}

/// Ids are unsigned on the wire and `BIGINT` in the store.
pub(crate) fn to_db_id(id: u64) -> Result<i64, ServiceError> {
	i64::try_from(id).map_err(|_| ServiceError::IdOutOfRange(id))
}

pub(crate) fn from_db_id(id: i64) -> u64 {
	id.max(0) as u64
}

/// Blocks other writers on `table` until the transaction ends, so explicit-id inserts and
/// the following `sync_identity` see every committed row.
pub(crate) async fn lock_for_explicit_ids(
	conn: &mut PgConnection,
	table: &str,
) -> Result<(), ServiceError> {
	let statement = format!("LOCK TABLE {table} IN SHARE ROW EXCLUSIVE MODE");
	sqlx::query(&statement).execute(&mut *conn).await?;
	Ok(())
}

/// Moves the identity sequence past explicitly inserted ids. Never moves it backwards.
pub(crate) async fn sync_identity(
	conn: &mut PgConnection,
	table: &str,
) -> Result<(), ServiceError> {
	let statement = format!(
		"SELECT setval(seq, GREATEST((SELECT COALESCE(MAX(id), 0) + 1 FROM {table}), COALESCE(pg_sequence_last_value(seq) + 1, 1)), false) \
		 FROM (SELECT pg_get_serial_sequence('{table}', 'id')::regclass AS seq) AS identity"
	);
	sqlx::query(&statement).execute(&mut *conn).await?;
	Ok(())
}

#[test]
fn test_db_id_conversion() {
	assert_eq!(to_db_id(42).unwrap(), 42);
	assert!(matches!(to_db_id(u64::MAX), Err(ServiceError::IdOutOfRange(_))));
	assert_eq!(from_db_id(7), 7);
}
