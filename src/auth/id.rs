//! Strongly typed identifiers for clients, resource owners, and response modes.

// std
use std::borrow::Borrow;
// self
use crate::{_prelude::*, wire};

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		///
		/// Non-empty, free of whitespace, and at most 128 bytes long.
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				Self::try_from(value.into())
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				check_identifier($kind, &value).map(|()| Self(value))
			}
		}
		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple($kind).field(&self.0.as_str()).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (client, user, response mode).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (client, user, response mode).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (client, user, response mode).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ClientId, "Identifier of the OAuth client requesting the grant.", "Client" }
def_id! { UserId, "Identifier of the resource owner approving the grant.", "User" }
def_id! { ResponseModeName, "Registered name of a response mode (for example `query`).", "ResponseMode" }

impl ResponseModeName {
	/// Name of the built-in `query` mode.
	pub fn query() -> Self {
		Self(wire::DEFAULT_RESPONSE_MODE.to_owned())
	}
}

fn check_identifier(kind: &'static str, id: &str) -> Result<(), IdentifierError> {
	match id {
		"" => Err(IdentifierError::Empty { kind }),
		_ if id.chars().any(char::is_whitespace) => Err(IdentifierError::ContainsWhitespace { kind }),
		_ if id.len() > IDENTIFIER_MAX_LEN =>
			Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN }),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn identifiers_reject_blank_and_spaced_values() {
		assert!(ClientId::new(" client-1").is_err(), "Leading whitespace must be rejected.");
		assert!(UserId::new("").is_err());
		assert!(ResponseModeName::new("form post").is_err());

		let client = ClientId::new("client-1").expect("Client fixture should be considered valid.");

		assert_eq!(client.as_ref(), "client-1");
		assert_eq!(format!("{client:?}"), "Client(\"client-1\")");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let user: UserId =
			serde_json::from_str("\"501\"").expect("User should deserialize successfully.");

		assert_eq!(user.as_ref(), "501");
		assert!(serde_json::from_str::<UserId>("\"with space\"").is_err());
		assert_eq!(
			serde_json::to_string(&user).expect("User should serialize successfully."),
			"\"501\""
		);
	}

	#[test]
	fn length_limit_is_inclusive() {
		ResponseModeName::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		let err = ResponseModeName::new("a".repeat(IDENTIFIER_MAX_LEN + 1))
			.expect_err("Overlong names must be rejected.");

		assert_eq!(err, IdentifierError::TooLong { kind: "ResponseMode", max: IDENTIFIER_MAX_LEN });
	}

	#[test]
	fn borrow_supports_lookup_by_str() {
		let mut modes = HashMap::new();

		modes.insert(ResponseModeName::query(), "built-in");

		assert_eq!(modes.get("query"), Some(&"built-in"));
	}
}
