//! Crate-level error types shared by the grant, exchange, and response-mode layers.

// std
use std::any::Any;
// self
use crate::{_prelude::*, auth::IdentifierError, wire};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed application error accepted by [`Error::application`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

macro_rules! def_oauth_error {
	($name:ident, $doc:literal, $status_for:ident) => {
		#[doc = $doc]
		///
		/// The `code` is surfaced to clients as the `error` parameter, the message as
		/// `error_description`, and the optional URI as `error_uri`.
		#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
		#[error("{message}")]
		pub struct $name {
			message: String,
			code: String,
			uri: Option<String>,
			status: u16,
		}
		impl $name {
			/// Creates a new error; the HTTP status is derived from the code.
			pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
				let code = code.into();
				let status = $status_for(&code);

				Self { message: message.into(), code, uri: None, status }
			}

			/// Attaches a URI identifying a human-readable page about the error.
			pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
				self.uri = Some(uri.into());

				self
			}

			/// Overrides the derived HTTP status.
			pub fn with_status(mut self, status: u16) -> Self {
				self.status = status;

				self
			}

			/// Human-readable description.
			pub fn message(&self) -> &str {
				&self.message
			}

			/// OAuth 2.0 error code.
			pub fn code(&self) -> &str {
				&self.code
			}

			/// Optional error page URI.
			pub fn uri(&self) -> Option<&str> {
				self.uri.as_deref()
			}

			/// HTTP status associated with the error.
			pub fn status(&self) -> u16 {
				self.status
			}
		}
	};
}

def_oauth_error! {
	AuthorizationError,
	"Error raised while processing an authorization request; rendered to the client through \
	 the response mode.",
	authorization_status
}
def_oauth_error! {
	TokenError,
	"Error raised by the token endpoint while redeeming a cross-domain code.",
	token_status
}

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// User-facing authorization error with an OAuth 2.0 code.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Token endpoint error with an OAuth 2.0 code.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Local configuration or usage problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The transaction cannot be answered with a redirect.
	#[error(transparent)]
	Redirect(#[from] RedirectError),
	/// Uncoded failure reported by application code (issuers, completion hooks, custom modes).
	#[error("{source}")]
	Application {
		/// Application-supplied failure.
		source: BoxError,
	},
	/// An issuer panicked while it was being invoked or polled.
	#[error("{message}")]
	IssuerPanicked {
		/// Panic payload rendered as text.
		message: String,
	},
}
impl Error {
	/// Wraps an application failure that carries no OAuth 2.0 code.
	pub fn application(src: impl Into<BoxError>) -> Self {
		Self::Application { source: src.into() }
	}

	/// OAuth 2.0 error code, when the error carries one.
	pub fn code(&self) -> Option<&str> {
		match self {
			Self::Authorization(e) => Some(e.code()),
			Self::Token(e) => Some(e.code()),
			_ => None,
		}
	}

	/// OAuth 2.0 error code, falling back to `server_error` for uncoded errors.
	pub fn code_or_default(&self) -> &str {
		self.code().unwrap_or(wire::SERVER_ERROR)
	}

	/// Error page URI, when the error carries one.
	pub fn uri(&self) -> Option<&str> {
		match self {
			Self::Authorization(e) => e.uri(),
			Self::Token(e) => e.uri(),
			_ => None,
		}
	}

	/// Human-readable description, or `None` when the message is empty.
	pub fn message(&self) -> Option<String> {
		Some(self.to_string()).filter(|message| !message.is_empty())
	}

	/// HTTP status the framework should use when it renders this error itself.
	pub fn status(&self) -> u16 {
		match self {
			Self::Authorization(e) => e.status(),
			Self::Token(e) => e.status(),
			_ => 500,
		}
	}

	pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
		let message = match payload.downcast::<String>() {
			Ok(message) => *message,
			Err(payload) => match payload.downcast::<&'static str>() {
				Ok(message) => (*message).to_owned(),
				Err(_) => "Issuer panicked.".into(),
			},
		};

		Self::IssuerPanicked { message }
	}
}

/// Configuration and usage failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The token request body was not parsed before reaching the exchange.
	#[error("Token request body is missing; parse the request body before the exchange runs.")]
	BodyNotParsed,
	/// Two response modes were registered under the same name.
	#[error("Response mode `{name}` is registered more than once.")]
	DuplicateResponseMode {
		/// Offending mode name.
		name: String,
	},
	/// The configured default response mode is not registered.
	#[error("Default response mode `{name}` is not registered.")]
	UnknownDefaultResponseMode {
		/// Offending mode name.
		name: String,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Configuration document could not be parsed.
	#[error("Configuration is malformed.")]
	Parse {
		/// Structured parsing failure including the failing path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Failures that prevent a redirect from being issued.
#[derive(Debug, ThisError)]
pub enum RedirectError {
	/// The transaction carries no redirect URI.
	#[error("Unable to issue redirect for OAuth 2.0 transaction")]
	MissingRedirectUri,
	/// The transaction's redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirectUri {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

fn authorization_status(code: &str) -> u16 {
	match code {
		wire::INVALID_REQUEST | wire::INVALID_SCOPE => 400,
		wire::UNAUTHORIZED_CLIENT | wire::ACCESS_DENIED => 403,
		wire::UNSUPPORTED_RESPONSE_TYPE => 501,
		wire::TEMPORARILY_UNAVAILABLE => 503,
		_ => 500,
	}
}

fn token_status(code: &str) -> u16 {
	match code {
		wire::INVALID_REQUEST | wire::INVALID_SCOPE => 400,
		wire::INVALID_CLIENT => 401,
		wire::INVALID_GRANT | wire::UNAUTHORIZED_CLIENT => 403,
		wire::UNSUPPORTED_GRANT_TYPE => 501,
		_ => 500,
	}
}
