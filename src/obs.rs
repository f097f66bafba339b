//! Optional observability helpers for the grant and exchange responders.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to run every responder call inside a span named
//!   `oauth2_acdc.flow` with the `flow` and `stage` fields, and to emit an event for each
//!   terminal outcome. Issued credentials are never recorded.
//! - Enable `metrics` to increment the `oauth2_acdc_flow_total` counter for every
//!   attempt/issuance/denial/rendered error/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Responder paths observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization response issuing a cross-domain code.
	Grant,
	/// Authorization error rendered through a response mode.
	GrantError,
	/// Token endpoint redeeming a cross-domain code.
	Exchange,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Grant => "grant",
			FlowKind::GrantError => "grant_error",
			FlowKind::Exchange => "exchange",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a responder.
	Attempt,
	/// A credential was issued.
	Issued,
	/// An error was rendered to the client through a response mode.
	Rendered,
	/// The resource owner or the issuer declined; a denial was rendered.
	Denied,
	/// An error was forwarded to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Issued => "issued",
			FlowOutcome::Rendered => "rendered",
			FlowOutcome::Denied => "denied",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a terminal outcome through both the metrics and tracing backends.
pub fn observe_outcome(kind: FlowKind, outcome: FlowOutcome, error: Option<&Error>) {
	record_flow_outcome(kind, outcome);
	trace_flow_outcome(kind, outcome, error);
}
