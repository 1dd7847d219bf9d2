//! Optional observability helpers for pipeline operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `x_session.op` with the `op`
//!   and `stage` fields, plus events for guest token invalidation and failures.
//! - Enable `metrics` to increment the `x_session_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and
//!   `x_session_guest_invalidated_total` whenever the rate limit empties the guest token.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Paced, prepared, interpreted platform request.
	Request,
	/// Guest token activation.
	GuestActivation,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Request => "request",
			OpKind::GuestActivation => "guest_activation",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the outcome of an operation result and logs failures.
pub fn record_result<T>(kind: OpKind, result: &Result<T>) {
	match result {
		Ok(_) => record_op_outcome(kind, OpOutcome::Success),
		Err(e) => {
			log_failure(kind, e);
			record_op_outcome(kind, OpOutcome::Failure);
		},
	}
}
