use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::services::response::ServiceError;

const DROP_TABLES: &str = "DROP TABLE IF EXISTS comments, posts";

const CREATE_POSTS: &str = "CREATE TABLE posts (
	id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
	user_id BIGINT NOT NULL,
	title TEXT NOT NULL,
	body TEXT NOT NULL
)";

// No foreign key on post_id: removing a post leaves its comments behind.
const CREATE_COMMENTS: &str = "CREATE TABLE comments (
	id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
	post_id BIGINT NOT NULL,
	name TEXT NOT NULL,
	email TEXT NOT NULL,
	body TEXT NOT NULL
)";

pub async fn connect(
	url: &str,
	max_connections: u32,
) -> Result<PgPool, ServiceError> {
	PgPoolOptions::new()
		.max_connections(max_connections)
		.connect(url)
		.await
		.map_err(ServiceError::DatabaseConnection)
}

/// Drops and recreates both tables. Runs once at startup; previous rows are discarded.
pub async fn reset_schema(pool: &PgPool) -> Result<(), ServiceError> {
	let mut trx = pool.begin().await.map_err(ServiceError::DatabaseConnection)?;
	for statement in [DROP_TABLES, CREATE_POSTS, CREATE_COMMENTS] {
		sqlx::query(statement).execute(&mut *trx).await.map_err(ServiceError::DatabaseConnection)?;
	}
	trx.commit().await.map_err(ServiceError::DatabaseConnection)?;
	tracing::info!("Schema for posts and comments recreated");
	Ok(())
}
