use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{domain::Record, services::response::ServiceError};

use super::TRepository;

struct Table<E> {
	rows: BTreeMap<u64, E>,
	next_id: u64,
}

/// Process-local store with the same contract as the Postgres repository.
pub struct MemoryRepository<E: Record> {
	table: RwLock<Table<E>>,
}

impl<E: Record> Default for MemoryRepository<E> {
	fn default() -> Self {
		Self {
			table: RwLock::new(Table {
				rows: BTreeMap::new(),
				next_id: 1,
			}),
		}
	}
}

impl<E: Record> MemoryRepository<E> {
	pub async fn len(&self) -> usize {
		self.table.read().await.rows.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}

impl<E> Table<E> {
	fn insert(
		&mut self,
		id: u64,
		record: E,
		entity: &str,
	) -> Result<(), ServiceError> {
		if self.rows.contains_key(&id) {
			return Err(ServiceError::Persistence(format!("duplicate key value violates unique constraint on {entity} id {id}")));
		}
		self.rows.insert(id, record);
		self.next_id = self.next_id.max(id.saturating_add(1));
		Ok(())
	}
}

#[async_trait]
impl<E: Record> TRepository<E> for MemoryRepository<E> {
	async fn create(
		&self,
		payload: E::Payload,
	) -> Result<E, ServiceError> {
		let mut table = self.table.write().await;
		let id = E::payload_id(&payload).unwrap_or(table.next_id);
		let record = E::from_payload(id, payload);
		table.insert(id, record.clone(), E::NAME)?;
		Ok(record)
	}

	async fn create_many(
		&self,
		records: Vec<E>,
	) -> Result<usize, ServiceError> {
		let mut table = self.table.write().await;
		let mut seen = HashSet::with_capacity(records.len());
		if let Some(duplicate) = records.iter().find(|record| table.rows.contains_key(&record.id()) || !seen.insert(record.id())) {
			return Err(ServiceError::Persistence(format!(
				"duplicate key value violates unique constraint on {} id {}",
				E::NAME,
				duplicate.id()
			)));
		}
		let count = records.len();
		for record in records {
			table.insert(record.id(), record, E::NAME)?;
		}
		Ok(count)
	}

	async fn get(
		&self,
		id: u64,
	) -> Result<Option<E>, ServiceError> {
		Ok(self.table.read().await.rows.get(&id).cloned())
	}

	async fn get_all(&self) -> Result<Vec<E>, ServiceError> {
		Ok(self.table.read().await.rows.values().cloned().collect())
	}

	async fn update(
		&self,
		record: E,
	) -> Result<E, ServiceError> {
		let mut table = self.table.write().await;
		match table.rows.get_mut(&record.id()) {
			Some(stored) => {
				*stored = record.clone();
				Ok(record)
			}
			None => Err(ServiceError::EntityNotFound {
				entity: E::NAME,
				id: record.id(),
			}),
		}
	}

	async fn delete(
		&self,
		id: u64,
	) -> Result<(), ServiceError> {
		self.table.write().await.rows.remove(&id);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::MemoryRepository;
	use crate::{
		adapters::repositories::TRepository,
		domain::post::{Post, PostPayload},
		services::response::ServiceError,
	};

	fn payload(title: &str) -> PostPayload {
		PostPayload {
			id: None,
			user_id: 7,
			title: title.to_string(),
			body: "b".to_string(),
		}
	}

	#[tokio::test]
	async fn test_create_then_get() {
		'_given: {
			let repo = MemoryRepository::<Post>::default();

			'_when: {
				let created = repo.create(payload("t")).await.unwrap();
				let fetched = repo.get(created.id).await.unwrap();

				assert_eq!(fetched, Some(created));
			}
		}
	}

	#[tokio::test]
	async fn test_generated_ids_skip_explicit_ones() {
		let repo = MemoryRepository::<Post>::default();
		let explicit = repo
			.create(PostPayload {
				id: Some(10),
				..payload("explicit")
			})
			.await
			.unwrap();
		let generated = repo.create(payload("generated")).await.unwrap();

		assert_eq!(explicit.id, 10);
		assert_eq!(generated.id, 11);
	}

	#[tokio::test]
	async fn test_duplicate_id_is_rejected() {
		let repo = MemoryRepository::<Post>::default();
		let first = repo.create(payload("a")).await.unwrap();
		let err = repo
			.create(PostPayload {
				id: Some(first.id),
				..payload("b")
			})
			.await
			.unwrap_err();

		assert!(matches!(err, ServiceError::Persistence(_)));
		assert_eq!(repo.len().await, 1);
	}

	#[tokio::test]
	async fn test_batch_with_repeated_id_is_rejected_whole() {
		'_given: {
			let repo = MemoryRepository::<Post>::default();
			let post = |id| Post {
				id,
				user_id: 7,
				title: format!("seeded {id}"),
				body: "b".into(),
			};

			'_when: {
				let err = repo.create_many(vec![post(1), post(2), post(1)]).await.unwrap_err();

				assert!(matches!(err, ServiceError::Persistence(_)));
				assert!(repo.is_empty().await);
			}
		}
	}

	#[tokio::test]
	async fn test_update_unknown_id_fails_without_writing() {
		let repo = MemoryRepository::<Post>::default();
		let err = repo
			.update(Post {
				id: 404,
				user_id: 1,
				title: "t".into(),
				body: "b".into(),
			})
			.await
			.unwrap_err();

		assert!(matches!(err, ServiceError::EntityNotFound { id: 404, .. }));
		assert!(repo.is_empty().await);
	}

	#[tokio::test]
	async fn test_delete_is_idempotent() {
		let repo = MemoryRepository::<Post>::default();
		let created = repo.create(payload("t")).await.unwrap();

		repo.delete(created.id).await.unwrap();
		repo.delete(created.id).await.unwrap();

		assert_eq!(repo.get(created.id).await.unwrap(), None);
	}
}
