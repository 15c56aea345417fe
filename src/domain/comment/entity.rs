use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: u64,
	pub post_id: u64,
	pub name: String,
	pub email: String,
	pub body: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
	#[serde(default)]
	pub id: Option<u64>,
	pub post_id: u64,
	pub name: String,
	pub email: String,
	pub body: String,
}
