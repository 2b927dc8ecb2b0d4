// self
use crate::obs::{CallKind, CallOutcome};

/// Increments `dep_client_call_total{call, outcome}` (when `metrics` is enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"dep_client_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `dep_client_response_total{call, status}` for every HTTP response received,
/// including non-200 answers that become errors (when `metrics` is enabled).
pub fn record_response_status(kind: CallKind, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"dep_client_response_total",
			"call" => kind.as_str(),
			"status" => status.to_string()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, status);
	}
}
