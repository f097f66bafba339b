//! Serializable responder configuration.
//!
//! Deployments that keep settings in JSON can load an [`AcdcConfig`] and hand its sections
//! to [`AcdcGrantBuilder::config`](crate::grant::AcdcGrantBuilder::config) and
//! [`JwtAcdcExchangeBuilder::config`](crate::exchange::JwtAcdcExchangeBuilder::config).
//! Response modes are behavior and are therefore registered in code, not here.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	exchange::ExchangeContext,
	grant::GrantContext,
	wire,
};

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcdcConfig {
	/// Authorization response settings.
	pub grant: GrantConfig,
	/// Token exchange settings.
	pub exchange: ExchangeConfig,
}
impl AcdcConfig {
	/// Parses a JSON document, reporting the path of the first offending field.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::Parse { source })
	}
}

/// Authorization response settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrantConfig {
	/// Context handed to the code issuer.
	pub context: GrantContext,
	/// Mode used when the request names none; must be registered.
	pub default_response_mode: String,
}
impl Default for GrantConfig {
	fn default() -> Self {
		Self { context: GrantContext::default(), default_response_mode: wire::DEFAULT_RESPONSE_MODE.into() }
	}
}

/// Token exchange settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
	/// Context handed to the token issuer.
	pub context: ExchangeContext,
}
