// self
use crate::{_prelude::*, auth::ScopeSet};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span wrapping a single authorization call.
///
/// Decision fields start empty and are filled in by the `record_*` helpers as the gate
/// progresses, so a span for a skipped host never carries `scopes`.
#[derive(Clone, Debug)]
pub struct GateSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GateSpan {
	/// Creates a new span tagged with the gate's observability name.
	pub fn new(observability_name: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"token_gate.authorize",
				observability_name,
				is_url_valid = tracing::field::Empty,
				additional_claims_provided = tracing::field::Empty,
				scopes = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = observability_name;

			Self {}
		}
	}

	/// Records whether the target URL passed the host and scheme checks.
	pub fn record_url_valid(&self, valid: bool) {
		#[cfg(feature = "tracing")]
		self.span.record("is_url_valid", valid);
		#[cfg(not(feature = "tracing"))]
		let _ = valid;
	}

	/// Records whether the caller supplied a claims challenge.
	pub fn record_claims_provided(&self, provided: bool) {
		#[cfg(feature = "tracing")]
		self.span.record("additional_claims_provided", provided);
		#[cfg(not(feature = "tracing"))]
		let _ = provided;
	}

	/// Records the scopes about to be requested.
	pub fn record_scopes(&self, scopes: &ScopeSet) {
		#[cfg(feature = "tracing")]
		self.span.record("scopes", scopes.joined().as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = scopes;
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
