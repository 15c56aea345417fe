use async_trait::async_trait;

use crate::{
	domain::comment::{Comment, CommentPayload},
	services::response::ServiceError,
};

use super::{from_db_id, lock_for_explicit_ids, sync_identity, to_db_id, Repository, TRepository};

const COLUMNS: &str = "id, post_id, name, email, body";

#[derive(sqlx::FromRow)]
struct CommentRow {
	id: i64,
	post_id: i64,
	name: String,
	email: String,
	body: String,
}

impl From<CommentRow> for Comment {
	fn from(row: CommentRow) -> Self {
		Comment {
			id: from_db_id(row.id),
			post_id: from_db_id(row.post_id),
			name: row.name,
			email: row.email,
			body: row.body,
		}
	}
}

#[async_trait]
impl TRepository<Comment> for Repository<Comment> {
	async fn create(
		&self,
		payload: CommentPayload,
	) -> Result<Comment, ServiceError> {
		let post_id = to_db_id(payload.post_id)?;
		let row = match payload.id {
			None => {
				let statement = format!("INSERT INTO comments (post_id, name, email, body) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}");
				sqlx::query_as::<_, CommentRow>(&statement)
					.bind(post_id)
					.bind(&payload.name)
					.bind(&payload.email)
					.bind(&payload.body)
					.fetch_one(&self.pool)
					.await?
			}
			Some(id) => {
				let statement =
					format!("INSERT INTO comments (id, post_id, name, email, body) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}");
				let mut trx = self.pool.begin().await?;
		lock_for_explicit_ids(&mut trx, "comments").await?;
				let row = sqlx::query_as::<_, CommentRow>(&statement)
					.bind(to_db_id(id)?)
					.bind(post_id)
					.bind(&payload.name)
					.bind(&payload.email)
					.bind(&payload.body)
					.fetch_one(&mut *trx)
					.await?;
				sync_identity(&mut trx, "comments").await?;
				trx.commit().await?;
				row
			}
		};
		Ok(row.into())
	}

	async fn create_many(
		&self,
		records: Vec<Comment>,
	) -> Result<usize, ServiceError> {
		let mut trx = self.pool.begin().await?;
		lock_for_explicit_ids(&mut trx, "comments").await?;
		for comment in records.iter() {
			sqlx::query("INSERT INTO comments (id, post_id, name, email, body) VALUES ($1, $2, $3, $4, $5)")
				.bind(to_db_id(comment.id)?)
				.bind(to_db_id(comment.post_id)?)
				.bind(&comment.name)
				.bind(&comment.email)
				.bind(&comment.body)
				.execute(&mut *trx)
				.await?;
		}
		sync_identity(&mut trx, "comments").await?;
		trx.commit().await?;
		Ok(records.len())
	}

	async fn get(
		&self,
		id: u64,
	) -> Result<Option<Comment>, ServiceError> {
		let statement = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
		let row = sqlx::query_as::<_, CommentRow>(&statement)
			.bind(to_db_id(id)?)
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.map(Comment::from))
	}

	async fn get_all(&self) -> Result<Vec<Comment>, ServiceError> {
		let statement = format!("SELECT {COLUMNS} FROM comments ORDER BY id");
		let rows = sqlx::query_as::<_, CommentRow>(&statement).fetch_all(&self.pool).await?;
		Ok(rows.into_iter().map(Comment::from).collect())
	}

	async fn update(
		&self,
		record: Comment,
	) -> Result<Comment, ServiceError> {
		let statement = format!("UPDATE comments SET post_id = $2, name = $3, email = $4, body = $5 WHERE id = $1 RETURNING {COLUMNS}");
		let row = sqlx::query_as::<_, CommentRow>(&statement)
			.bind(to_db_id(record.id)?)
			.bind(to_db_id(record.post_id)?)
			.bind(&record.name)
			.bind(&record.email)
			.bind(&record.body)
			.fetch_optional(&self.pool)
			.await?;

		row.map(Comment::from).ok_or(ServiceError::EntityNotFound {
			entity: "comment",
			id: record.id,
		})
	}

	async fn delete(
		&self,
		id: u64,
	) -> Result<(), ServiceError> {
		let result = sqlx::query("DELETE FROM comments WHERE id = $1").bind(to_db_id(id)?).execute(&self.pool).await?;
		tracing::debug!("Deleted {} comment row(s) for id {}", result.rows_affected(), id);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use futures::future::join_all;

	use crate::{
		adapters::repositories::{Repository, TRepository},
		database,
		domain::comment::{Comment, CommentPayload},
	};

	fn comment(id: u64) -> Comment {
		Comment {
			id,
			post_id: 1,
			name: format!("seeded {id}"),
			email: "e@x".into(),
			body: "b".into(),
		}
	}

	#[tokio::test]
	#[ignore = "requires a disposable postgres at DATABASE_URL"]
	async fn test_concurrent_batches_keep_identity_ahead() {
		'_given: {
			dotenv::dotenv().ok();
			let pool = database::connect(&std::env::var("DATABASE_URL").unwrap(), 8).await.unwrap();
			database::reset_schema(&pool).await.unwrap();
			let repo = Repository::<Comment>::new(pool);

			'_when: {
				let batches = (0..8u64).map(|batch| repo.create_many((batch * 5 + 1..=batch * 5 + 5).map(comment).collect()));
				for inserted in join_all(batches).await {
					assert_eq!(inserted.unwrap(), 5);
				}

				let created = repo
					.create(CommentPayload {
						id: None,
						post_id: 1,
						name: "n".into(),
						email: "e@x".into(),
						body: "b".into(),
					})
					.await
					.unwrap();

				assert_eq!(created.id, 41);
				assert_eq!(repo.get_all().await.unwrap().len(), 41);
			}
		}
	}
}
