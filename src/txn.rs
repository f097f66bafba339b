//! Authorization transaction model supplied by the enclosing authorization framework.
//!
//! A [`Transaction`] is created and populated before the grant responder runs: the framework
//! authenticates the client, records the parsed authorization request, captures the
//! resource owner's decision, and resolves the redirect URI. The responder only borrows it.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, UserId},
	wire,
};

/// Free-form bag used by earlier middleware to hand data to the issuer.
pub type Locals = JsonMap<String, JsonValue>;

/// OAuth client participating in the transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
	/// Registered client identifier.
	pub id: ClientId,
	/// Display name, when registered.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Additional registration metadata.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl Client {
	/// Creates a client with no metadata.
	pub fn new(id: ClientId) -> Self {
		Self { id, name: None, extra: JsonMap::new() }
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}
}

/// Resource owner who approved (or declined) the transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Resource owner identifier.
	pub id: UserId,
	/// Display name, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Additional profile attributes.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl User {
	/// Creates a user with no profile attributes.
	pub fn new(id: UserId) -> Self {
		Self { id, name: None, extra: JsonMap::new() }
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}
}

/// Parsed authorization request as recorded by the framework.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
	/// Partner token endpoint the cross-domain code is intended for.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub audience: Option<String>,
	/// PKCE challenge supplied by the client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_challenge: Option<String>,
	/// PKCE challenge method supplied by the client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_challenge_method: Option<String>,
	/// Requested response mode; `query` when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub response_mode: Option<String>,
	/// Opaque client state echoed on every response.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Parameters contributed by other request extensions.
	#[serde(flatten)]
	pub extensions: JsonMap<String, JsonValue>,
}
impl AuthorizationRequest {
	/// Builds a request from decoded query pairs, keeping unknown parameters as extensions.
	///
	/// Later duplicates overwrite earlier ones.
	pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut request = Self::default();

		for (key, value) in pairs {
			let value = value.into();

			match key.as_ref() {
				"audience" => request.audience = Some(value),
				"code_challenge" => request.code_challenge = Some(value),
				"code_challenge_method" => request.code_challenge_method = Some(value),
				"response_mode" => request.response_mode = Some(value),
				wire::STATE => request.state = Some(value),
				other => {
					request.extensions.insert(other.to_owned(), JsonValue::String(value));
				},
			}
		}

		request
	}

	/// Requested response mode, ignoring empty values.
	pub fn response_mode(&self) -> Option<&str> {
		self.response_mode.as_deref().filter(|mode| !mode.is_empty())
	}

	/// Client state, ignoring empty values.
	pub fn state(&self) -> Option<&str> {
		self.state.as_deref().filter(|state| !state.is_empty())
	}

	/// Requested audience, ignoring empty values.
	pub fn audience(&self) -> Option<&str> {
		self.audience.as_deref().filter(|audience| !audience.is_empty())
	}
}

/// Resource owner's decision on the transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
	/// Whether access was granted.
	pub allow: bool,
	/// Scope granted by the resource owner.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Additional decision data contributed by the consent screen.
	#[serde(flatten)]
	pub extensions: JsonMap<String, JsonValue>,
}
impl AuthorizationDecision {
	/// Decision granting access.
	pub fn allow() -> Self {
		Self { allow: true, ..Default::default() }
	}

	/// Decision declining access.
	pub fn deny() -> Self {
		Self::default()
	}

	/// Records the granted scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}
}

/// PKCE challenge captured from the authorization request; passed through to the issuer
/// so it can be bound into the cross-domain code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkceDescriptor {
	/// Code challenge value.
	pub challenge: Option<String>,
	/// Code challenge method (for example `S256`).
	pub method: Option<String>,
}
impl PkceDescriptor {
	/// Extracts the descriptor from the authorization request.
	pub fn from_request(request: &AuthorizationRequest) -> Self {
		Self {
			challenge: request.code_challenge.clone(),
			method: request.code_challenge_method.clone(),
		}
	}
}

/// In-flight authorization transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Requesting client.
	pub client: Client,
	/// Resource owner; absent when no user has authenticated.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<User>,
	/// Parsed authorization request.
	pub req: AuthorizationRequest,
	/// Authorization decision.
	pub res: AuthorizationDecision,
	/// Validated redirect URI; required for every redirect-based response.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<String>,
	/// Data shared by earlier middleware.
	#[serde(default)]
	pub locals: Locals,
}
impl Transaction {
	/// Creates a transaction without a user, redirect URI, or locals.
	pub fn new(client: Client, req: AuthorizationRequest, res: AuthorizationDecision) -> Self {
		Self { client, user: None, req, res, redirect_uri: None, locals: Locals::new() }
	}

	/// Sets the resource owner.
	pub fn with_user(mut self, user: User) -> Self {
		self.user = Some(user);

		self
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(redirect_uri.into());

		self
	}

	/// Inserts a value into the transaction locals.
	pub fn with_local(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.locals.insert(key.into(), value.into());

		self
	}

	/// Redirect URI, ignoring empty values.
	pub fn redirect_uri(&self) -> Option<&str> {
		self.redirect_uri.as_deref().filter(|uri| !uri.is_empty())
	}

	/// PKCE descriptor derived from the request.
	pub fn pkce(&self) -> PkceDescriptor {
		PkceDescriptor::from_request(&self.req)
	}
}
