//! Built-in `query` response mode (RFC 6749 section 4.1.2).

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::RedirectError,
	http::HttpResponse,
	mode::{ResponseMode, ResponseParams},
	txn::Transaction,
};

/// Redirects to the transaction's redirect URI with the parameters appended to its query.
///
/// Parameters already present on the registered redirect URI are kept; response
/// parameters replace any of them that share a name.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryMode;
impl QueryMode {
	/// Builds the redirect location for `txn` without wrapping it in a response.
	pub fn location(txn: &Transaction, params: &ResponseParams) -> Result<String> {
		let redirect = txn.redirect_uri().ok_or(RedirectError::MissingRedirectUri)?;
		let mut url =
			Url::parse(redirect).map_err(|source| RedirectError::InvalidRedirectUri { source })?;
		let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

		for (name, value) in params.iter() {
			match pairs.iter().position(|(existing, _)| existing == name) {
				Some(idx) => {
					pairs[idx].1 = value.to_owned();

					let mut seen = 0;

					pairs.retain(|(existing, _)| {
						if existing != name {
							return true;
						}

						seen += 1;

						seen == 1
					});
				},
				None => pairs.push((name.to_owned(), value.to_owned())),
			}
		}

		let query = pairs
			.iter()
			.map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
			.collect::<Vec<_>>()
			.join("&");

		url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });

		Ok(url.into())
	}
}
impl ResponseMode for QueryMode {
	fn render(&self, txn: &Transaction, params: &ResponseParams) -> Result<HttpResponse> {
		Ok(HttpResponse::redirect(Self::location(txn, params)?))
	}

	fn validate(&self, txn: &Transaction) -> Result<()> {
		let redirect = txn.redirect_uri().ok_or(RedirectError::MissingRedirectUri)?;

		Url::parse(redirect).map_err(|source| RedirectError::InvalidRedirectUri { source })?;

		Ok(())
	}
}

/// Marks escaped by `byte_serialize` that stay verbatim in redirect queries.
///
/// `'` is absent: `Url::set_query` escapes it again for special schemes.
const KEPT_VERBATIM: [(&str, &str); 4] = [("%21", "!"), ("%28", "("), ("%29", ")"), ("%7E", "~")];

/// Percent-encodes a query component, spelling spaces as `%20` rather than `+` and leaving
/// `! ( ) ~` unescaped.
fn encode_component(value: &str) -> String {
	let encoded =
		form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20");

	KEPT_VERBATIM.iter().fold(encoded, |acc, &(escaped, raw)| acc.replace(escaped, raw))
}
