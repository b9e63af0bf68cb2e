//! Optional observability hooks for gate decisions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each authorization inside a `token_gate.authorize` span carrying the
//!   `observability_name`, `is_url_valid`, `additional_claims_provided`, and `scopes` fields.
//! - Enable `metrics` to increment the `token_gate_authorization_total` counter for every
//!   attempt/issue/skip/failure, labeled by `outcome`.
//!
//! Independent of both features, a [`GateObserver`] can be injected through the gate builder to
//! receive the same decisions without committing to a telemetry backend.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Observability name used when the caller configures none.
pub const DEFAULT_OBSERVABILITY_NAME: &str = "token-gate";

/// Outcome labels recorded for each authorization call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOutcome {
	/// Entry to [`TokenGate::get_authorization_token`](crate::gate::TokenGate::get_authorization_token).
	Attempt,
	/// A token was issued.
	Issued,
	/// The host is not allowed; no token and no error.
	Skipped,
	/// An error was propagated back to the caller.
	Failure,
}
impl GateOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateOutcome::Attempt => "attempt",
			GateOutcome::Issued => "issued",
			GateOutcome::Skipped => "skipped",
			GateOutcome::Failure => "failure",
		}
	}
}
impl Display for GateOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Receives gate decisions as they happen.
///
/// Every hook defaults to a no-op so implementors override only what they record.
pub trait GateObserver
where
	Self: Send + Sync,
{
	/// Called once the host policy has judged `url`.
	fn on_host_validated(&self, _url: &Url, _valid: bool) {}

	/// Called once the claims entry has been inspected and decoded.
	fn on_claims(&self, _provided: bool) {}

	/// Called for the attempt and again for the final outcome of every call.
	fn on_outcome(&self, _outcome: GateOutcome) {}
}

/// Observer that records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;
impl GateObserver for NoopObserver {}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcome_labels_are_stable() {
		assert_eq!(GateOutcome::Attempt.to_string(), "attempt");
		assert_eq!(GateOutcome::Issued.as_str(), "issued");
		assert_eq!(GateOutcome::Skipped.as_str(), "skipped");
		assert_eq!(GateOutcome::Failure.as_str(), "failure");
	}
}
