// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_acdc_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_flow_outcome_records_without_recorder() {
		for kind in [FlowKind::Grant, FlowKind::GrantError, FlowKind::Exchange] {
			for outcome in [
				FlowOutcome::Attempt,
				FlowOutcome::Issued,
				FlowOutcome::Rendered,
				FlowOutcome::Denied,
				FlowOutcome::Failure,
			] {
				record_flow_outcome(kind, outcome);
			}
		}
	}
}
