use std::str::FromStr;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{comment::Comment, post::Post};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
	Post(Post),
	Posts(Vec<Post>),
	Comment(Comment),
	Comments(Vec<Comment>),
	Id(u64),
	Message(String),
}

impl From<Post> for ServiceResponse {
	fn from(value: Post) -> Self {
		ServiceResponse::Post(value)
	}
}

impl From<Vec<Post>> for ServiceResponse {
	fn from(value: Vec<Post>) -> Self {
		ServiceResponse::Posts(value)
	}
}

impl From<Comment> for ServiceResponse {
	fn from(value: Comment) -> Self {
		ServiceResponse::Comment(value)
	}
}

impl From<Vec<Comment>> for ServiceResponse {
	fn from(value: Vec<Comment>) -> Self {
		ServiceResponse::Comments(value)
	}
}

impl From<u64> for ServiceResponse {
	fn from(value: u64) -> Self {
		ServiceResponse::Id(value)
	}
}

impl From<String> for ServiceResponse {
	fn from(value: String) -> Self {
		ServiceResponse::Message(value)
	}
}

impl From<&str> for ServiceResponse {
	fn from(value: &str) -> Self {
		ServiceResponse::Message(value.to_string())
	}
}

#[derive(Serialize)]
struct PostList<'a> {
	#[serde(rename = "Post")]
	post: &'a [Post],
}

#[derive(Serialize)]
struct CommentList<'a> {
	#[serde(rename = "Comment")]
	comment: &'a [Comment],
}

impl ServiceResponse {
	pub fn to_xml(&self) -> Result<String, ServiceError> {
		let encoded = match self {
			ServiceResponse::Post(post) => quick_xml::se::to_string_with_root("Post", post),
			ServiceResponse::Posts(posts) => quick_xml::se::to_string_with_root("Posts", &PostList { post: posts }),
			ServiceResponse::Comment(comment) => quick_xml::se::to_string_with_root("Comment", comment),
			ServiceResponse::Comments(comments) => quick_xml::se::to_string_with_root("Comments", &CommentList { comment: comments }),
			ServiceResponse::Id(id) => quick_xml::se::to_string_with_root("id", id),
			ServiceResponse::Message(message) => quick_xml::se::to_string_with_root("message", message),
		};
		encoded.map_err(|err| ServiceError::Encoding(err.to_string()))
	}

	pub fn to_json(&self) -> Result<String, ServiceError> {
		serde_json::to_string(self).map_err(|err| ServiceError::Encoding(err.to_string()))
	}
}

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("configuration error: {0}")]
	Config(String),
	#[error("database connection error: {0}")]
	DatabaseConnection(#[source] sqlx::Error),
	#[error("{0}")]
	Persistence(String),
	#[error("no such {entity} with id {id}")]
	EntityNotFound { entity: &'static str, id: u64 },
	#[error("wrong id: `{0}`")]
	InvalidId(String),
	#[error("id {0} is out of range")]
	IdOutOfRange(u64),
	#[error("no id")]
	MissingId,
	#[error("{0}")]
	DeserializationError(#[from] serde_json::Error),
	#[error("{0} -there is no such method on this page")]
	MethodNotAllowed(String),
	#[error("no such page: {0}")]
	PageNotFound(String),
	#[error("remote source error: {0}")]
	HttpError(#[from] reqwest::Error),
	#[error("encoding error: {0}")]
	Encoding(String),
	#[error("server error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for ServiceError {
	fn from(value: sqlx::Error) -> Self {
		ServiceError::Persistence(value.to_string())
	}
}

impl ServiceError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServiceError::Persistence(_)
			| ServiceError::InvalidId(_)
			| ServiceError::IdOutOfRange(_)
			| ServiceError::MissingId
			| ServiceError::DeserializationError(_) => StatusCode::BAD_REQUEST,
			ServiceError::EntityNotFound { .. } | ServiceError::PageNotFound(_) => StatusCode::NOT_FOUND,
			ServiceError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			ServiceError::HttpError(_) => StatusCode::BAD_GATEWAY,
			ServiceError::Config(_) | ServiceError::DatabaseConnection(_) | ServiceError::Encoding(_) | ServiceError::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

/// Encoding applied to every response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
	#[default]
	Json,
	Xml,
}

impl FromStr for ResponseFormat {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"xml" => Ok(Self::Xml),
			other => Err(ServiceError::Config(format!("unknown response format `{other}`"))),
		}
	}
}

impl ResponseFormat {
	/// Picks the format asked for in `Accept`, falling back to `self`.
	pub fn negotiate(
		self,
		headers: &HeaderMap,
	) -> Self {
		let Some(accept) = headers.get(header::ACCEPT).and_then(|value| value.to_str().ok()) else {
			return self;
		};
		for media in accept.split(',').map(|part| part.split(';').next().unwrap_or("").trim()) {
			match media {
				"application/xml" | "text/xml" => return Self::Xml,
				"application/json" => return Self::Json,
				_ => continue,
			}
		}
		self
	}

	fn content_type(self) -> &'static str {
		match self {
			Self::Json => "application/json; charset=utf-8",
			Self::Xml => "application/xml; charset=utf-8",
		}
	}

	pub fn render(
		self,
		status: StatusCode,
		response: &ServiceResponse,
	) -> Response {
		let encoded = match self {
			Self::Json => response.to_json(),
			Self::Xml => response.to_xml(),
		};
		match encoded {
			Ok(body) => (status, [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type()))], body).into_response(),
			Err(err) => {
				tracing::error!("Failed to encode response : {}", err);
				(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
			}
		}
	}
}

/// Status and payload produced by a handler before encoding.
pub type Reply = (StatusCode, ServiceResponse);

/// Encodes a handler outcome, turning errors into a message body with their status.
pub fn respond(
	format: ResponseFormat,
	outcome: Result<Reply, ServiceError>,
) -> Response {
	match outcome {
		Ok((status, response)) => format.render(status, &response),
		Err(err) => {
			let status = err.status();
			if status.is_server_error() {
				tracing::error!("{}", err);
			} else {
				tracing::warn!("{}", err);
			}
			format.render(status, &ServiceResponse::Message(err.to_string()))
		}
	}
}

#[cfg(test)]
mod test {
	use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

	use super::{ResponseFormat, ServiceError, ServiceResponse};
	use crate::domain::{comment::Comment, post::Post, Phantom};

	#[test]
	fn test_json_is_bare_value() {
		let jsonified = ServiceResponse::from(vec![Post::phantom()]).to_json().unwrap();
		assert!(jsonified.starts_with('['));
		assert!(jsonified.contains(r#""id":100500"#));

		assert_eq!(ServiceResponse::from(5u64).to_json().unwrap(), "5");
		assert_eq!(ServiceResponse::from("hello page").to_json().unwrap(), r#""hello page""#);
	}

	#[test]
	fn test_xml_roots() {
		let post = Post {
			id: 3,
			user_id: 7,
			title: "a < b".to_string(),
			body: "b".to_string(),
		};
		let xml = ServiceResponse::from(post.clone()).to_xml().unwrap();
		assert!(xml.starts_with("<Post>"));
		assert!(xml.contains("<userId>7</userId>"));
		assert!(xml.contains("a &lt; b"));

		let xml = ServiceResponse::from(vec![post.clone(), post]).to_xml().unwrap();
		assert!(xml.starts_with("<Posts>"));
		assert_eq!(xml.matches("<Post>").count(), 2);

		assert_eq!(ServiceResponse::from(9u64).to_xml().unwrap(), "<id>9</id>");
	}

	#[test]
	fn test_comment_list_xml() {
		let comment = Comment {
			id: 4,
			post_id: 3,
			name: "n".to_string(),
			email: "e@x".to_string(),
			body: "b".to_string(),
		};

		let xml = ServiceResponse::from(vec![comment, Comment::phantom()]).to_xml().unwrap();

		assert!(xml.starts_with("<Comments>"));
		assert!(xml.ends_with("</Comments>"));
		assert_eq!(xml.matches("<Comment>").count(), 2);
		assert!(xml.contains("<postId>3</postId>"));
		assert!(xml.contains("<id>100500</id>"));
	}

	#[test]
	fn test_negotiate() {
		let mut headers = HeaderMap::new();
		assert_eq!(ResponseFormat::Json.negotiate(&headers), ResponseFormat::Json);

		headers.insert(header::ACCEPT, HeaderValue::from_static("text/html, application/xml;q=0.9"));
		assert_eq!(ResponseFormat::Json.negotiate(&headers), ResponseFormat::Xml);

		headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
		assert_eq!(ResponseFormat::Xml.negotiate(&headers), ResponseFormat::Json);

		headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
		assert_eq!(ResponseFormat::Xml.negotiate(&headers), ResponseFormat::Xml);
	}

	#[test]
	fn test_error_status() {
		assert_eq!(ServiceError::MissingId.status(), StatusCode::BAD_REQUEST);
		assert_eq!(ServiceError::EntityNotFound { entity: "post", id: 1 }.status(), StatusCode::NOT_FOUND);
		assert_eq!(ServiceError::MethodNotAllowed("PATCH".into()).to_string(), "PATCH -there is no such method on this page");
	}
}
