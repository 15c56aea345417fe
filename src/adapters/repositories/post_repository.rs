use async_trait::async_trait;

use crate::{
	domain::post::{Post, PostPayload},
	services::response::ServiceError,
};

use super::{from_db_id, lock_for_explicit_ids, sync_identity, to_db_id, Repository, TRepository};

#[derive(sqlx::FromRow)]
struct PostRow {
	id: i64,
	user_id: i64,
	title: String,
	body: String,
}

impl From<PostRow> for Post {
	fn from(row: PostRow) -> Self {
		Post {
			id: from_db_id(row.id),
			user_id: from_db_id(row.user_id),
			title: row.title,
			body: row.body,
		}
	}
}

#[async_trait]
impl TRepository<Post> for Repository<Post> {
	async fn create(
		&self,
		payload: PostPayload,
	) -> Result<Post, ServiceError> {
		let user_id = to_db_id(payload.user_id)?;
		let row = match payload.id {
			None => {
				sqlx::query_as::<_, PostRow>("INSERT INTO posts (user_id, title, body) VALUES ($1, $2, $3) RETURNING id, user_id, title, body")
					.bind(user_id)
					.bind(&payload.title)
					.bind(&payload.body)
					.fetch_one(&self.pool)
					.await?
			}
			Some(id) => {
				let mut trx = self.pool.begin().await?;
		lock_for_explicit_ids(&mut trx, "posts").await?;
				let row = sqlx::query_as::<_, PostRow>(
					"INSERT INTO posts (id, user_id, title, body) VALUES ($1, $2, $3, $4) RETURNING id, user_id, title, body",
				)
				.bind(to_db_id(id)?)
				.bind(user_id)
				.bind(&payload.title)
				.bind(&payload.body)
				.fetch_one(&mut *trx)
				.await?;
				sync_identity(&mut trx, "posts").await?;
				trx.commit().await?;
				row
			}
		};
		Ok(row.into())
	}

	async fn create_many(
		&self,
		records: Vec<Post>,
	) -> Result<usize, ServiceError> {
		let mut trx = self.pool.begin().await?;
		lock_for_explicit_ids(&mut trx, "posts").await?;
		for post in records.iter() {
			sqlx::query("INSERT INTO posts (id, user_id, title, body) VALUES ($1, $2, $3, $4)")
				.bind(to_db_id(post.id)?)
				.bind(to_db_id(post.user_id)?)
				.bind(&post.title)
				.bind(&post.body)
				.execute(&mut *trx)
				.await?;
		}
		sync_identity(&mut trx, "posts").await?;
		trx.commit().await?;
		Ok(records.len())
	}

	async fn get(
		&self,
		id: u64,
	) -> Result<Option<Post>, ServiceError> {
		let row = sqlx::query_as::<_, PostRow>("SELECT id, user_id, title, body FROM posts WHERE id = $1")
			.bind(to_db_id(id)?)
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.map(Post::from))
	}

	async fn get_all(&self) -> Result<Vec<Post>, ServiceError> {
		let rows = sqlx::query_as::<_, PostRow>("SELECT id, user_id, title, body FROM posts ORDER BY id")
			.fetch_all(&self.pool)
			.await?;
		Ok(rows.into_iter().map(Post::from).collect())
	}

	async fn update(
		&self,
		record: Post,
	) -> Result<Post, ServiceError> {
		let row = sqlx::query_as::<_, PostRow>(
			"UPDATE posts SET user_id = $2, title = $3, body = $4 WHERE id = $1 RETURNING id, user_id, title, body",
		)
		.bind(to_db_id(record.id)?)
		.bind(to_db_id(record.user_id)?)
		.bind(&record.title)
		.bind(&record.body)
		.fetch_optional(&self.pool)
		.await?;

		row.map(Post::from).ok_or(ServiceError::EntityNotFound { entity: "post", id: record.id })
	}

	async fn delete(
		&self,
		id: u64,
	) -> Result<(), ServiceError> {
		let result = sqlx::query("DELETE FROM posts WHERE id = $1").bind(to_db_id(id)?).execute(&self.pool).await?;
		tracing::debug!("Deleted {} post row(s) for id {}", result.rows_affected(), id);
		Ok(())
	}
}
