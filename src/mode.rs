//! Response modes: strategies that deliver authorization response parameters to the client.
//!
//! A [`ResponseMode`] renders [`ResponseParams`] for a [`Transaction`] and may validate the
//! transaction before any other work happens. [`ResponseModes`] is the registration table
//! built once at startup; `query` is always available and other modes (for example
//! `form_post` or `fragment`) are registered by the application.

pub mod query;

pub use query::*;

// self
use crate::{
	_prelude::*,
	auth::ResponseModeName,
	error::{AuthorizationError, ConfigError},
	http::HttpResponse,
	txn::Transaction,
	wire,
};

/// Strategy that turns response parameters into an HTTP response for the user agent.
///
/// Implementations must be `Send + Sync` so a single registry can serve concurrent requests.
pub trait ResponseMode: Send + Sync {
	/// Renders `params` for `txn`.
	fn render(&self, txn: &Transaction, params: &ResponseParams) -> Result<HttpResponse>;

	/// Checks that `txn` can be answered through this mode.
	///
	/// Runs before the issuer is consulted. The default accepts every transaction.
	fn validate(&self, _txn: &Transaction) -> Result<()> {
		Ok(())
	}
}

/// Ordered authorization response parameters.
///
/// `code` or `error`/`error_description`/`error_uri` always precede `state`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseParams(Vec<(&'static str, String)>);
impl ResponseParams {
	/// Success parameters carrying the cross-domain code.
	pub fn code(code: impl Into<String>, state: Option<&str>) -> Self {
		Self(vec![(wire::CODE, code.into())]).with_state(state)
	}

	/// Denial parameters (`error=access_denied`).
	pub fn access_denied(state: Option<&str>) -> Self {
		Self(vec![(wire::ERROR, wire::ACCESS_DENIED.into())]).with_state(state)
	}

	/// Error parameters derived from `err`; uncoded errors become `server_error`.
	pub fn error(err: &Error, state: Option<&str>) -> Self {
		let mut params = vec![(wire::ERROR, err.code_or_default().to_owned())];

		if let Some(message) = err.message() {
			params.push((wire::ERROR_DESCRIPTION, message));
		}
		if let Some(uri) = err.uri() {
			params.push((wire::ERROR_URI, uri.to_owned()));
		}

		Self(params).with_state(state)
	}

	/// Looks up a parameter by name.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(name, _)| *name == key).map(|(_, value)| value.as_str())
	}

	/// Iterates over the parameters in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (*name, value.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn with_state(mut self, state: Option<&str>) -> Self {
		if let Some(state) = state {
			self.0.push((wire::STATE, state.to_owned()));
		}

		self
	}
}

/// Registration table mapping mode names to strategies.
#[derive(Clone)]
pub struct ResponseModes {
	modes: BTreeMap<ResponseModeName, Arc<dyn ResponseMode>>,
}
impl ResponseModes {
	/// Returns a builder seeded with no custom modes.
	pub fn builder() -> ResponseModesBuilder {
		ResponseModesBuilder::default()
	}

	/// Looks up a mode by exact name.
	pub fn get(&self, name: &str) -> Option<&dyn ResponseMode> {
		self.modes.get(name).map(|mode| mode.as_ref())
	}

	/// Whether a mode is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.modes.contains_key(name)
	}

	/// Registered mode names in lexical order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.modes.keys().map(|name| name.as_ref())
	}

	/// Resolves the mode requested by `txn`, falling back to `default` when the request
	/// names none.
	///
	/// Unknown modes fail with `unsupported_response_mode` and HTTP status 501.
	pub fn resolve(&self, txn: &Transaction, default: &str) -> Result<&dyn ResponseMode> {
		let name = txn.req.response_mode().unwrap_or(default);

		self.get(name).ok_or_else(|| {
			AuthorizationError::new(
				format!("Unsupported response mode: {name}"),
				wire::UNSUPPORTED_RESPONSE_MODE,
			)
			.with_status(501)
			.into()
		})
	}
}
impl Default for ResponseModes {
	fn default() -> Self {
		let mut modes = BTreeMap::new();

		modes.insert(ResponseModeName::query(), Arc::new(QueryMode) as Arc<dyn ResponseMode>);

		Self { modes }
	}
}
impl Debug for ResponseModes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.names()).finish()
	}
}

/// Builder for [`ResponseModes`].
#[derive(Default)]
pub struct ResponseModesBuilder {
	entries: Vec<(String, Arc<dyn ResponseMode>)>,
}
impl ResponseModesBuilder {
	/// Registers `mode` under `name`.
	///
	/// Registering `query` replaces the built-in query mode.
	pub fn register(self, name: impl Into<String>, mode: impl 'static + ResponseMode) -> Self {
		self.register_shared(name, Arc::new(mode))
	}

	/// Registers a shared mode under `name`.
	pub fn register_shared(mut self, name: impl Into<String>, mode: Arc<dyn ResponseMode>) -> Self {
		self.entries.push((name.into(), mode));

		self
	}

	/// Validates names, rejects duplicates, and installs `query` when it was not registered.
	pub fn build(self) -> Result<ResponseModes, ConfigError> {
		let mut modes = BTreeMap::new();

		for (name, mode) in self.entries {
			let name = ResponseModeName::new(&name)?;

			if modes.contains_key(&name) {
				return Err(ConfigError::DuplicateResponseMode { name: name.into() });
			}

			modes.insert(name, mode);
		}

		modes
			.entry(ResponseModeName::query())
			.or_insert_with(|| Arc::new(QueryMode) as Arc<dyn ResponseMode>);

		Ok(ResponseModes { modes })
	}
}
impl Debug for ResponseModesBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.entries.iter().map(|(name, _)| name)).finish()
	}
}
