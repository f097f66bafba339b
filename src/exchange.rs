//! Token endpoint exchange redeeming cross-domain codes.
//!
//! ACDC is a profile of the JWT authorization grant (RFC 7523): the client presents the
//! cross-domain code as the `assertion` parameter, optionally with the PKCE
//! `code_verifier`, and receives an access token in the usual RFC 6749 section 5.1
//! envelope.

pub mod envelope;
pub mod jwt_acdc;

pub use envelope::*;
pub use jwt_acdc::*;

// self
use crate::{_prelude::*, issue::IssueFuture, txn::Client, wire};

/// Amount of request context handed to the [`TokenIssuer`].
///
/// Each level includes everything from the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeContext {
	/// Client and assertion only.
	#[default]
	Assertion,
	/// Adds the PKCE verifier.
	Verifier,
	/// Adds the parsed request body.
	Body,
	/// Adds the authentication info attached by the client authenticator.
	AuthInfo,
}

/// Token request as seen by the exchange.
///
/// The framework authenticates the client and parses the form body before the exchange
/// runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
	/// Authenticated client.
	pub client: Client,
	/// Parsed request body; `None` when no body parser ran.
	pub body: Option<JsonMap<String, JsonValue>>,
	/// Details recorded by the client authenticator.
	pub auth_info: Option<JsonMap<String, JsonValue>>,
}
impl ExchangeRequest {
	/// Creates a request for `client` with a parsed body.
	pub fn new(client: Client, body: JsonMap<String, JsonValue>) -> Self {
		Self { client, body: Some(body), auth_info: None }
	}

	/// Builds a request from decoded form pairs.
	pub fn from_form_pairs<I, K, V>(client: Client, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let body = pairs.into_iter().map(|(k, v)| (k.into(), JsonValue::String(v.into()))).collect();

		Self::new(client, body)
	}

	/// Attaches authentication info.
	pub fn with_auth_info(mut self, auth_info: JsonMap<String, JsonValue>) -> Self {
		self.auth_info = Some(auth_info);

		self
	}

	/// Non-empty `assertion` parameter.
	pub fn assertion(&self) -> Option<&str> {
		self.param(wire::ASSERTION)
	}

	/// Non-empty PKCE verifier, preferring `code_verifier` over the `code_verifyer`
	/// misspelling found in early drafts.
	pub fn verifier(&self) -> Option<&str> {
		self.param(wire::CODE_VERIFIER).or_else(|| self.param(wire::CODE_VERIFYER))
	}

	fn param(&self, name: &str) -> Option<&str> {
		self.body.as_ref()?.get(name)?.as_str().filter(|value| !value.is_empty())
	}
}

/// Arguments passed to [`TokenIssuer::issue`].
#[derive(Clone, Debug)]
pub struct TokenRequest<'a> {
	/// Authenticated client.
	pub client: &'a Client,
	/// Cross-domain code presented by the client.
	pub assertion: &'a str,
	/// PKCE verifier; only delivered from [`ExchangeContext::Verifier`].
	pub verifier: Option<&'a str>,
	/// Request body; present from [`ExchangeContext::Body`].
	pub body: Option<&'a JsonMap<String, JsonValue>>,
	/// Authentication info; delivered at [`ExchangeContext::AuthInfo`] when the framework
	/// recorded any.
	pub auth_info: Option<&'a JsonMap<String, JsonValue>>,
}
impl<'a> TokenRequest<'a> {
	/// Builds the issuer arguments at the given context level.
	pub fn from_exchange(
		request: &'a ExchangeRequest,
		assertion: &'a str,
		context: ExchangeContext,
	) -> Self {
		Self {
			client: &request.client,
			assertion,
			verifier: if context >= ExchangeContext::Verifier { request.verifier() } else { None },
			body: if context >= ExchangeContext::Body { request.body.as_ref() } else { None },
			auth_info: if context >= ExchangeContext::AuthInfo {
				request.auth_info.as_ref()
			} else {
				None
			},
		}
	}
}

/// Application hook that redeems cross-domain codes.
///
/// Verify the assertion (signature, audience, expiry, PKCE binding) and resolve to
/// [`IssueOutcome::Denied`](crate::issue::IssueOutcome::Denied) when it does not hold; the
/// client then receives `invalid_grant`.
pub trait TokenIssuer: Send + Sync {
	/// Issues tokens for `request`.
	fn issue<'a>(&'a self, request: TokenRequest<'a>) -> IssueFuture<'a, IssuedTokens>;
}
impl<T> TokenIssuer for Arc<T>
where
	T: ?Sized + TokenIssuer,
{
	fn issue<'a>(&'a self, request: TokenRequest<'a>) -> IssueFuture<'a, IssuedTokens> {
		T::issue(self, request)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn request(pairs: &[(&str, &str)]) -> ExchangeRequest {
		ExchangeRequest::from_form_pairs(test_client(), pairs.iter().copied())
	}

	#[test]
	fn verifier_prefers_canonical_spelling() {
		let both = request(&[("code_verifier", "canonical"), ("code_verifyer", "misspelled")]);
		let misspelled = request(&[("code_verifyer", "misspelled")]);
		let empty = request(&[("code_verifier", ""), ("code_verifyer", "misspelled")]);

		assert_eq!(both.verifier(), Some("canonical"));
		assert_eq!(misspelled.verifier(), Some("misspelled"));
		assert_eq!(empty.verifier(), Some("misspelled"));
		assert_eq!(request(&[]).verifier(), None);
	}

	#[test]
	fn context_levels_nest() {
		let mut info = JsonMap::new();

		info.insert("scope".into(), "read".into());

		let request = request(&[("assertion", "eyJ"), ("code_verifier", TEST_CODE_VERIFIER)])
			.with_auth_info(info);
		let assertion = TokenRequest::from_exchange(&request, "eyJ", ExchangeContext::Assertion);

		assert_eq!(assertion.client.id.as_ref(), "1");
		assert_eq!(assertion.assertion, "eyJ");
		assert!(assertion.verifier.is_none() && assertion.body.is_none());

		let verifier = TokenRequest::from_exchange(&request, "eyJ", ExchangeContext::Verifier);

		assert_eq!(verifier.verifier, Some(TEST_CODE_VERIFIER));
		assert!(verifier.body.is_none());

		let body = TokenRequest::from_exchange(&request, "eyJ", ExchangeContext::Body);

		assert_eq!(
			body.body.and_then(|body| body.get("assertion")),
			Some(&JsonValue::from("eyJ"))
		);
		assert!(body.auth_info.is_none());

		let auth_info = TokenRequest::from_exchange(&request, "eyJ", ExchangeContext::AuthInfo);

		assert_eq!(
			auth_info.auth_info.and_then(|info| info.get("scope")),
			Some(&JsonValue::from("read"))
		);
	}
}
