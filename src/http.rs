//! Transport-agnostic HTTP responses produced by the responders.
//!
//! The crate never writes to a socket. Responders return an [`HttpResponse`] that keeps
//! only primitive data (status, ordered headers, optional body) so any server stack can
//! translate it into its own response type.

/// `Location` header name.
pub const LOCATION: &str = "Location";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Cache-Control` header name.
pub const CACHE_CONTROL: &str = "Cache-Control";
/// `Pragma` header name.
pub const PRAGMA: &str = "Pragma";

/// Status used for authorization redirects.
pub const STATUS_FOUND: u16 = 302;
/// Status used for successful token responses.
pub const STATUS_OK: u16 = 200;

/// Response the framework should send to the user agent or client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Response body, if any.
	pub body: Option<String>,
}
impl HttpResponse {
	/// Creates a bodiless response with the provided status.
	pub fn new(status: u16) -> Self {
		Self { status, headers: Vec::new(), body: None }
	}

	/// Builds a `302 Found` redirect to `location`.
	pub fn redirect(location: impl Into<String>) -> Self {
		Self::new(STATUS_FOUND).with_header(LOCATION, location)
	}

	/// Builds a `200 OK` JSON response that must not be cached (RFC 6749 section 5.1).
	pub fn json_no_store(body: impl Into<String>) -> Self {
		Self::new(STATUS_OK)
			.with_header(CONTENT_TYPE, "application/json")
			.with_header(CACHE_CONTROL, "no-store")
			.with_header(PRAGMA, "no-cache")
			.with_body(body)
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets the body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Looks up the first header matching `name` case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Redirect target, when this is a redirect.
	pub fn location(&self) -> Option<&str> {
		self.header(LOCATION)
	}
}
