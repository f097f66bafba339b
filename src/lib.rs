//! OAuth 2.0 Authorization Cross Domain Code (ACDC) for authorization servers: issue
//! cross-domain codes from an in-flight authorization transaction and redeem them at a
//! partner's token endpoint through a JWT assertion exchange.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod grant;
pub mod http;
pub mod issue;
pub mod mode;
pub mod obs;
pub mod txn;
pub mod wire;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;
	#[cfg(feature = "test")] pub use parking_lot::Mutex;

	// self
	use crate::{
		auth::{ClientId, UserId},
		txn::{AuthorizationDecision, AuthorizationRequest, Client, Transaction, User},
	};

	/// Redirect URI shared by the transaction fixtures.
	pub const TEST_REDIRECT_URI: &str = "http://www.example.com/auth/callback";
	/// Audience of the partner token endpoint used by the fixtures.
	pub const TEST_AUDIENCE: &str = "https://server.partner.com";
	/// PKCE challenge carried by the fixtures (RFC 7636 appendix B).
	pub const TEST_CODE_CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";
	/// PKCE verifier matching [`TEST_CODE_CHALLENGE`].
	pub const TEST_CODE_VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

	/// Builds the OAuth client used across integration tests.
	pub fn test_client() -> Client {
		Client::new(ClientId::new("1").expect("Client fixture identifier should be valid."))
			.with_name("OAuth Client")
	}

	/// Builds the resource owner used across integration tests.
	pub fn test_user() -> User {
		User::new(UserId::new("501").expect("User fixture identifier should be valid."))
			.with_name("John Doe")
	}

	/// Constructs an approved transaction targeting the partner audience with an S256 PKCE
	/// challenge and the shared redirect URI.
	pub fn allowed_transaction() -> Transaction {
		let request = AuthorizationRequest {
			audience: Some(TEST_AUDIENCE.into()),
			code_challenge: Some(TEST_CODE_CHALLENGE.into()),
			code_challenge_method: Some("S256".into()),
			..Default::default()
		};

		Transaction::new(test_client(), request, AuthorizationDecision::allow())
			.with_user(test_user())
			.with_redirect_uri(TEST_REDIRECT_URI)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
#[cfg(test)] use parking_lot as _;
