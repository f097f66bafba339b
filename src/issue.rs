//! Issuance hook plumbing shared by the grant and the exchange.
//!
//! Applications plug their credential minting into the responders through
//! [`CodeIssuer`](crate::grant::CodeIssuer) and [`TokenIssuer`](crate::exchange::TokenIssuer).
//! Both return an [`IssueFuture`] resolving to `Result<IssueOutcome<T>>`, which covers the
//! three possible answers: an error, an explicit denial, or an issued credential.

// std
use std::panic::{self, AssertUnwindSafe};
// crates.io
use futures_util::FutureExt;
// self
use crate::_prelude::*;

/// Boxed future returned by issuance hooks.
pub type IssueFuture<'a, T> = Pin<Box<dyn Future<Output = Result<IssueOutcome<T>>> + 'a + Send>>;

/// Non-error answer of an issuance hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueOutcome<T> {
	/// Credential minted for the request.
	Issued(T),
	/// The authorization server refuses to issue a credential.
	Denied,
}
impl<T> IssueOutcome<T> {
	/// Keeps `Issued` values that satisfy `keep`, turning the rest into `Denied`.
	pub fn filter(self, keep: impl FnOnce(&T) -> bool) -> Self {
		match self {
			Self::Issued(value) if keep(&value) => Self::Issued(value),
			_ => Self::Denied,
		}
	}

	/// Converts into an `Option`, mapping `Denied` to `None`.
	pub fn issued(self) -> Option<T> {
		match self {
			Self::Issued(value) => Some(value),
			Self::Denied => None,
		}
	}
}
impl<T> From<Option<T>> for IssueOutcome<T> {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Denied, Self::Issued)
	}
}

/// Runs an issuance hook, converting panics raised while building or polling its future
/// into [`Error::IssuerPanicked`].
///
/// Panics never cross the responder boundary, so a misbehaving hook surfaces through the
/// same error channel as a hook that returns `Err`.
pub(crate) async fn invoke<'a, T, F>(call: F) -> Result<IssueOutcome<T>>
where
	F: FnOnce() -> IssueFuture<'a, T>,
{
	let fut = panic::catch_unwind(AssertUnwindSafe(call)).map_err(Error::from_panic)?;

	AssertUnwindSafe(fut).catch_unwind().await.map_err(Error::from_panic)?
}
