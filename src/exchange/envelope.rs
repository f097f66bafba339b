//! Issued token sets and their JSON envelope (RFC 6749 section 5.1).

// self
use crate::{_prelude::*, auth::TokenSecret, wire};

/// Tokens minted by a [`TokenIssuer`](crate::exchange::TokenIssuer).
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedTokens {
	/// Access token; an empty value is treated as not issued.
	pub access_token: TokenSecret,
	/// Optional refresh token.
	pub refresh_token: Option<TokenSecret>,
	/// Extra response parameters such as `expires_in` or `scope`.
	pub params: JsonMap<String, JsonValue>,
}
impl IssuedTokens {
	/// Creates a token set carrying only an access token.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into(), refresh_token: None, params: JsonMap::new() }
	}

	/// Assembles a token set from loosely shaped issuer output.
	///
	/// A JSON object in `second` is taken as the parameter map and replaces `params`; a
	/// non-empty string becomes the refresh token; anything else is dropped.
	pub fn from_parts(
		access_token: impl Into<TokenSecret>,
		second: Option<JsonValue>,
		params: Option<JsonMap<String, JsonValue>>,
	) -> Self {
		let mut tokens = Self::new(access_token);

		tokens.params = params.unwrap_or_default();

		match second {
			Some(JsonValue::Object(params)) => tokens.params = params,
			Some(JsonValue::String(refresh)) if !refresh.is_empty() =>
				tokens.refresh_token = Some(refresh.into()),
			_ => (),
		}

		tokens
	}

	/// Sets the refresh token; empty values are ignored.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		let refresh_token: TokenSecret = refresh_token.into();

		self.refresh_token = Some(refresh_token).filter(|token| !token.is_empty());

		self
	}

	/// Adds an extra response parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.params.insert(name.into(), value.into());

		self
	}

	/// Replaces the extra response parameters.
	pub fn with_params(mut self, params: JsonMap<String, JsonValue>) -> Self {
		self.params = params;

		self
	}
}

/// Ordered JSON object returned by the token endpoint.
///
/// Fields appear as `access_token`, `refresh_token` (when issued), the extra parameters
/// in issuer order, then `token_type` unless the parameters already supplied a usable one.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenEnvelope(JsonMap<String, JsonValue>);
impl TokenEnvelope {
	/// Serializes the envelope as compact JSON.
	pub fn to_json(&self) -> String {
		JsonValue::Object(self.0.clone()).to_string()
	}

	/// Looks up a field.
	pub fn get(&self, name: &str) -> Option<&JsonValue> {
		self.0.get(name)
	}

	/// Borrows the underlying map.
	pub fn as_map(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}
}
impl From<IssuedTokens> for TokenEnvelope {
	fn from(tokens: IssuedTokens) -> Self {
		let mut map = JsonMap::new();

		map.insert(wire::ACCESS_TOKEN.into(), tokens.access_token.expose().into());

		if let Some(refresh) = tokens.refresh_token.filter(|token| !token.is_empty()) {
			map.insert(wire::REFRESH_TOKEN.into(), refresh.expose().into());
		}

		map.extend(tokens.params);

		let token_type_missing = match map.get(wire::TOKEN_TYPE) {
			None | Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => true,
			Some(JsonValue::String(token_type)) => token_type.is_empty(),
			_ => false,
		};

		if token_type_missing {
			map.insert(wire::TOKEN_TYPE.into(), wire::DEFAULT_TOKEN_TYPE.into());
		}

		Self(map)
	}
}
