pub mod comment;
pub mod post;

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::services::response::ServiceError;

/// Identifier carried by every placeholder record.
pub const PHANTOM_ID: u64 = 100500;

/// Common surface of the stored entities.
pub trait Record: Clone + Send + Sync + Serialize + 'static {
	/// Body accepted on create/update requests.
	type Payload: DeserializeOwned + Send + 'static;

	/// Human readable entity name, used in log lines and error messages.
	const NAME: &'static str;

	fn id(&self) -> u64;

	/// Optional caller-supplied id carried by a payload.
	fn payload_id(payload: &Self::Payload) -> Option<u64>;

	fn from_payload(
		id: u64,
		payload: Self::Payload,
	) -> Self;
}

/// Fixed, non-persisted record answered in place of an absent lookup.
pub trait Phantom {
	fn phantom() -> Self;
}

/// What a handler answers when a lookup comes back empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingRecord {
	/// Absent record becomes the phantom record, empty list becomes `[phantom]`.
	#[default]
	Placeholder,
	/// Absent record becomes a 404, empty list stays empty.
	NotFound,
}

impl FromStr for MissingRecord {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"placeholder" | "phantom" => Ok(Self::Placeholder),
			"not_found" | "notfound" | "404" => Ok(Self::NotFound),
			other => Err(ServiceError::Config(format!("unknown missing record policy `{other}`"))),
		}
	}
}

#[test]
fn test_missing_record_from_str() {
	assert_eq!("placeholder".parse::<MissingRecord>().unwrap(), MissingRecord::Placeholder);
	assert_eq!("NOT_FOUND".parse::<MissingRecord>().unwrap(), MissingRecord::NotFound);
	assert!("sometimes".parse::<MissingRecord>().is_err());
}
