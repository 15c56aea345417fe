use std::sync::Arc;

use axum::http::HeaderMap;
use sqlx::PgPool;

use crate::{
	adapters::repositories::{Repository, TRepository},
	domain::{comment::Comment, post::Post, MissingRecord},
	services::response::ResponseFormat,
};

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
	pub posts: Arc<dyn TRepository<Post>>,
	pub comments: Arc<dyn TRepository<Comment>>,
	pub format: ResponseFormat,
	pub missing: MissingRecord,
}

impl AppState {
	pub fn new(
		posts: Arc<dyn TRepository<Post>>,
		comments: Arc<dyn TRepository<Comment>>,
	) -> Self {
		Self {
			posts,
			comments,
			format: ResponseFormat::default(),
			missing: MissingRecord::default(),
		}
	}

	pub fn postgres(pool: PgPool) -> Self {
		Self::new(Arc::new(Repository::<Post>::new(pool.clone())), Arc::new(Repository::<Comment>::new(pool)))
	}

	pub fn with_format(
		mut self,
		format: ResponseFormat,
	) -> Self {
		self.format = format;
		self
	}

	pub fn with_missing(
		mut self,
		missing: MissingRecord,
	) -> Self {
		self.missing = missing;
		self
	}

	/// Format for this request: `Accept` header first, configured default otherwise.
	pub fn format_for(
		&self,
		headers: &HeaderMap,
	) -> ResponseFormat {
		self.format.negotiate(headers)
	}
}
