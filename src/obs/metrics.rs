// self
use crate::obs::{OpKind, OpOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"x_session_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records that an exhausted rate-limit budget emptied the guest token.
pub fn record_guest_invalidated() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("x_session_guest_invalidated_total").increment(1);
	}

	#[cfg(feature = "tracing")]
	{
		tracing::warn!("rate limit exhausted; guest token invalidated");
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_safe_without_a_global_recorder() {
		record_op_outcome(OpKind::GuestActivation, OpOutcome::Failure);
		record_guest_invalidated();
	}
}
