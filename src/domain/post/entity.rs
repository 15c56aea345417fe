use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	pub id: u64,
	pub user_id: u64,
	pub title: String,
	pub body: String,
}

/// Body of `POST /posts` and `PUT /posts/{id}`.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
	#[serde(default)]
	pub id: Option<u64>,
	pub user_id: u64,
	pub title: String,
	pub body: String,
}
