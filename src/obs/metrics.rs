// self
use crate::obs::GateOutcome;

/// Records an authorization outcome via the global metrics recorder (when enabled).
pub fn record_outcome(outcome: GateOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("token_gate_authorization_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_outcome_noop_without_recorder() {
		record_outcome(GateOutcome::Skipped);
	}
}
