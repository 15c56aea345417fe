pub mod entity;

pub use self::entity::{Comment, CommentPayload};

use super::{Phantom, Record, PHANTOM_ID};

impl Record for Comment {
	type Payload = CommentPayload;
	const NAME: &'static str = "comment";

	fn id(&self) -> u64 {
		self.id
	}

	fn payload_id(payload: &CommentPayload) -> Option<u64> {
		payload.id
	}

	fn from_payload(
		id: u64,
		payload: CommentPayload,
	) -> Self {
		Comment {
			id,
			post_id: payload.post_id,
			name: payload.name,
			email: payload.email,
			body: payload.body,
		}
	}
}

impl Phantom for Comment {
	fn phantom() -> Self {
		Comment {
			id: PHANTOM_ID,
			post_id: PHANTOM_ID,
			name: "Phantom Post".to_string(),
			email: "Phantom Email".to_string(),
			body: "you can see this message because there are no comments in the database".to_string(),
		}
	}
}

#[test]
fn test_comment_representation() {
	let comment: Comment =
		serde_json::from_str(r#"{"postId":1,"id":2,"name":"n","email":"e@x.io","body":"b"}"#).unwrap();
	assert_eq!(comment.post_id, 1);
	assert_eq!(comment.id, 2);

	let jsonified = serde_json::to_string(&comment).unwrap();
	assert!(jsonified.contains(r#""postId":1"#));
}
