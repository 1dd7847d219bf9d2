// self
use crate::{_prelude::*, obs::OpKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by pipeline operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the operation kind and stage (usually the request path).
	pub fn new(kind: OpKind, stage: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("x_session.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
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

/// Emits a debug event describing a prepared request.
pub fn log_prepared(method: &Method, path: &str, scheme: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%method, path, scheme, "request prepared");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path, scheme);
	}
}

/// Emits an event for an operation failure; platform rejections log at `warn`.
pub fn log_failure(kind: OpKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		match error.status() {
			Some(status) => tracing::warn!(op = kind.as_str(), status, "{error}"),
			None => tracing::debug!(op = kind.as_str(), "{error}"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}
