//! One-time startup seed from a remote read-only API.
//!
//! Posts for a single user are fetched and stored first. Comments are then fetched
//! per post through a pool bounded by the configured concurrency, and the seed
//! completes once every launched fetch has reported back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
	adapters::repositories::TRepository,
	config::SeedSettings,
	domain::{comment::Comment, post::Post},
};

use super::response::ServiceError;

#[derive(Debug)]
pub struct SeedReport {
	pub posts: usize,
	pub comments: usize,
	/// Post ids in the order their comment fetch finished.
	pub completed: Vec<u64>,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
}

pub struct Seeder {
	client: Client,
	settings: SeedSettings,
	posts: Arc<dyn TRepository<Post>>,
	comments: Arc<dyn TRepository<Comment>>,
}

impl Seeder {
	pub fn new(
		client: Client,
		settings: SeedSettings,
		posts: Arc<dyn TRepository<Post>>,
		comments: Arc<dyn TRepository<Comment>>,
	) -> Self {
		Self {
			client,
			settings,
			posts,
			comments,
		}
	}

	fn url(
		&self,
		resource: &str,
		key: &str,
		id: u64,
	) -> String {
		format!("{}/{resource}?{key}={id}", self.settings.source_url.trim_end_matches('/'))
	}

	async fn fetch<T: DeserializeOwned>(
		&self,
		url: &str,
	) -> Result<T, ServiceError> {
		let response = self.client.get(url).send().await?.error_for_status()?;
		Ok(response.json::<T>().await?)
	}

	async fn seed_comments(
		&self,
		post_id: u64,
	) -> Result<(u64, usize), ServiceError> {
		let comments: Vec<Comment> = self.fetch(&self.url("comments", "postId", post_id)).await?;
		let stored = self.comments.create_many(comments).await?;
		Ok((post_id, stored))
	}

	/// Runs the whole seed. The first failure aborts it; nothing is retried.
	pub async fn run(&self) -> Result<SeedReport, ServiceError> {
		let start_time = Utc::now();
		tracing::info!("Seeding posts of user {} from {}", self.settings.user_id, self.settings.source_url);

		let posts: Vec<Post> = self.fetch(&self.url("posts", "userId", self.settings.user_id)).await?;
		let post_ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
		let post_count = self.posts.create_many(posts).await?;
		tracing::info!("Stored {} post(s), fetching their comments", post_count);

		let mut completions = stream::iter(post_ids).map(|post_id| self.seed_comments(post_id)).buffer_unordered(self.settings.concurrency.max(1));

		let mut completed = Vec::with_capacity(post_count);
		let mut comment_count = 0;
		while let Some(outcome) = completions.next().await {
			let (post_id, stored) = outcome?;
			tracing::info!("Stored {} comment(s) of post {} ({}/{})", stored, post_id, completed.len() + 1, post_count);
			completed.push(post_id);
			comment_count += stored;
		}

		Ok(SeedReport {
			posts: post_count,
			comments: comment_count,
			completed,
			start_time,
			end_time: Utc::now(),
		})
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use serde_json::json;
	use wiremock::{
		matchers::{method, path, query_param},
		Mock, MockServer, ResponseTemplate,
	};

	use super::Seeder;
	use crate::{
		adapters::repositories::{memory::MemoryRepository, TRepository},
		config::SeedSettings,
		domain::{comment::Comment, post::Post},
		services::response::ServiceError,
	};

	fn settings(source_url: String) -> SeedSettings {
		SeedSettings {
			source_url,
			user_id: 7,
			concurrency: 2,
			timeout_secs: 5,
		}
	}

	async fn mount_comments(
		server: &MockServer,
		post_id: u64,
		count: u64,
	) {
		let comments: Vec<_> = (0..count)
			.map(|n| json!({"postId": post_id, "id": post_id * 100 + n, "name": "n", "email": "e@x.io", "body": "b"}))
			.collect();
		Mock::given(method("GET"))
			.and(path("/comments"))
			.and(query_param("postId", post_id.to_string()))
			.respond_with(ResponseTemplate::new(200).set_body_json(comments))
			.mount(server)
			.await;
	}

	#[tokio::test]
	async fn test_seed_persists_comments_for_every_post() {
		'_given: {
			let server = MockServer::start().await;
			Mock::given(method("GET"))
				.and(path("/posts"))
				.and(query_param("userId", "7"))
				.respond_with(ResponseTemplate::new(200).set_body_json(json!([
					{"userId": 7, "id": 1, "title": "a", "body": "x"},
					{"userId": 7, "id": 2, "title": "b", "body": "y"},
					{"userId": 7, "id": 3, "title": "c", "body": "z"},
				])))
				.mount(&server)
				.await;
			mount_comments(&server, 1, 2).await;
			mount_comments(&server, 2, 1).await;
			mount_comments(&server, 3, 3).await;

			let posts = Arc::new(MemoryRepository::<Post>::default());
			let comments = Arc::new(MemoryRepository::<Comment>::default());
			let seeder = Seeder::new(reqwest::Client::new(), settings(server.uri()), posts.clone(), comments.clone());

			'_when: {
				let report = seeder.run().await.unwrap();

				assert_eq!(report.posts, 3);
				assert_eq!(report.comments, 6);
				let mut completed = report.completed.clone();
				completed.sort();
				assert_eq!(completed, vec![1, 2, 3]);

				assert_eq!(posts.len().await, 3);
				let stored = comments.get_all().await.unwrap();
				for post_id in 1..=3 {
					assert!(stored.iter().any(|comment| comment.post_id == post_id));
				}
			}
		}
	}

	#[tokio::test]
	async fn test_seed_with_no_posts_completes() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/posts"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
			.mount(&server)
			.await;

		let seeder = Seeder::new(
			reqwest::Client::new(),
			settings(server.uri()),
			Arc::new(MemoryRepository::<Post>::default()),
			Arc::new(MemoryRepository::<Comment>::default()),
		);
		let report = seeder.run().await.unwrap();

		assert_eq!(report.posts, 0);
		assert!(report.completed.is_empty());
	}

	#[tokio::test]
	async fn test_remote_failure_aborts_seed() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/posts"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([{"userId": 7, "id": 1, "title": "a", "body": "x"}])))
			.mount(&server)
			.await;
		Mock::given(method("GET")).and(path("/comments")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

		let posts = Arc::new(MemoryRepository::<Post>::default());
		let seeder = Seeder::new(reqwest::Client::new(), settings(server.uri()), posts.clone(), Arc::new(MemoryRepository::<Comment>::default()));

		let err = seeder.run().await.unwrap_err();
		assert!(matches!(err, ServiceError::HttpError(_)));
	}

	#[tokio::test]
	async fn test_malformed_posts_abort_seed() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/posts"))
			.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
			.mount(&server)
			.await;

		let posts = Arc::new(MemoryRepository::<Post>::default());
		let seeder = Seeder::new(reqwest::Client::new(), settings(server.uri()), posts.clone(), Arc::new(MemoryRepository::<Comment>::default()));

		assert!(seeder.run().await.is_err());
		assert!(posts.is_empty().await);
	}
}
