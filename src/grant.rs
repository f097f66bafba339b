//! Authorization Cross Domain Code grant: issuing cross-domain codes from authorization
//! transactions.
//!
//! The grant answers `response_type=acdc` authorization requests. Once the resource owner
//! has decided, [`AcdcGrant::respond`] asks the application's [`CodeIssuer`] to mint a code
//! for the requested audience, lets the framework complete the transaction, and redirects
//! the user agent back to the client through the selected response mode.
//!
//! References: [Authorization Cross Domain Code 1.0](https://openid.bitbucket.io/draft-acdc-01.html).

pub mod acdc;

pub use acdc::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	issue::IssueFuture,
	txn::{AuthorizationDecision, AuthorizationRequest, Client, Locals, PkceDescriptor, Transaction, User},
};

/// Amount of transaction context handed to the [`CodeIssuer`].
///
/// Each level includes everything from the previous one. Choose the smallest level the
/// issuer needs; it is fixed when the grant is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantContext {
	/// Client, user, audience, and PKCE descriptor only.
	#[default]
	Minimal,
	/// Adds the authorization decision.
	Response,
	/// Adds the authorization request.
	Request,
	/// Adds the transaction locals.
	Locals,
}

/// Arguments passed to [`CodeIssuer::issue`].
#[derive(Clone, Debug)]
pub struct IssueCodeRequest<'a> {
	/// Requesting client.
	pub client: &'a Client,
	/// Resource owner who approved the request.
	pub user: Option<&'a User>,
	/// Partner token endpoint the code is intended for.
	pub audience: Option<&'a str>,
	/// PKCE challenge to bind into the code.
	pub pkce: PkceDescriptor,
	/// Authorization decision; present from [`GrantContext::Response`].
	pub response: Option<&'a AuthorizationDecision>,
	/// Authorization request; present from [`GrantContext::Request`].
	pub request: Option<&'a AuthorizationRequest>,
	/// Transaction locals; present at [`GrantContext::Locals`].
	pub locals: Option<&'a Locals>,
}
impl<'a> IssueCodeRequest<'a> {
	/// Builds the issuer arguments for `txn` at the given context level.
	pub fn from_transaction(txn: &'a Transaction, context: GrantContext) -> Self {
		Self {
			client: &txn.client,
			user: txn.user.as_ref(),
			audience: txn.req.audience(),
			pkce: txn.pkce(),
			response: (context >= GrantContext::Response).then_some(&txn.res),
			request: (context >= GrantContext::Request).then_some(&txn.req),
			locals: (context >= GrantContext::Locals).then_some(&txn.locals),
		}
	}
}

/// Application hook that mints cross-domain codes.
///
/// Resolve to [`IssueOutcome::Denied`](crate::issue::IssueOutcome::Denied) (or an empty code)
/// to refuse the request; the client then receives `access_denied`. Errors are forwarded to
/// the framework untouched.
pub trait CodeIssuer: Send + Sync {
	/// Issues a cross-domain code for `request`.
	fn issue<'a>(&'a self, request: IssueCodeRequest<'a>) -> IssueFuture<'a, TokenSecret>;
}
impl<T> CodeIssuer for Arc<T>
where
	T: ?Sized + CodeIssuer,
{
	fn issue<'a>(&'a self, request: IssueCodeRequest<'a>) -> IssueFuture<'a, TokenSecret> {
		T::issue(self, request)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn context_levels_nest() {
		let txn = allowed_transaction().with_local("service", "acme");
		let minimal = IssueCodeRequest::from_transaction(&txn, GrantContext::Minimal);

		assert_eq!(minimal.client.id.as_ref(), "1");
		assert_eq!(minimal.user.map(|user| user.id.as_ref()), Some("501"));
		assert_eq!(minimal.audience, Some(TEST_AUDIENCE));
		assert_eq!(minimal.pkce.challenge.as_deref(), Some(TEST_CODE_CHALLENGE));
		assert_eq!(minimal.pkce.method.as_deref(), Some("S256"));
		assert!(minimal.response.is_none() && minimal.request.is_none() && minimal.locals.is_none());

		let response = IssueCodeRequest::from_transaction(&txn, GrantContext::Response);

		assert!(response.response.is_some() && response.request.is_none());

		let request = IssueCodeRequest::from_transaction(&txn, GrantContext::Request);

		assert!(request.request.is_some() && request.locals.is_none());

		let locals = IssueCodeRequest::from_transaction(&txn, GrantContext::Locals);

		assert_eq!(
			locals.locals.and_then(|locals| locals.get("service")),
			Some(&JsonValue::from("acme"))
		);
	}
}
