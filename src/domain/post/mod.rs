pub mod entity;

pub use self::entity::{Post, PostPayload};

use super::{Phantom, Record, PHANTOM_ID};

impl Record for Post {
	type Payload = PostPayload;
	const NAME: &'static str = "post";

	fn id(&self) -> u64 {
		self.id
	}

	fn payload_id(payload: &PostPayload) -> Option<u64> {
		payload.id
	}

	fn from_payload(
		id: u64,
		payload: PostPayload,
	) -> Self {
		Post {
			id,
			user_id: payload.user_id,
			title: payload.title,
			body: payload.body,
		}
	}
}

impl Phantom for Post {
	fn phantom() -> Self {
		Post {
			id: PHANTOM_ID,
			user_id: PHANTOM_ID,
			title: "Phantom Post".to_string(),
			body: "you can see this message because there are no posts in the database".to_string(),
		}
	}
}
