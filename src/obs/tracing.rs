// self
use crate::{_prelude::*, obs::CallKind, request::Method};

/// Future returned by [`CallSpan::instrument`]; wrapped in the span only with `tracing` on.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; the future itself without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span covering one session bootstrap or one API request.
///
/// Fields: `call` (bootstrap or request), `stage` (call site), plus `method` and `path` of the
/// target once [`record_target`](Self::record_target) is called. Query strings are never
/// recorded because profile lookups carry identifiers there.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `kind` at `stage` with the target fields still empty.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"dep_client.call",
				call = kind.as_str(),
				stage,
				method = tracing::field::Empty,
				path = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the HTTP method and URL path the call targets.
	pub fn record_target(&self, method: Method, url: &Url) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("method", method.as_str());
			self.span.record("path", url.path());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, url);
		}
	}

	/// Runs `fut` inside the span without holding an entered guard across `.await` points.
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

/// Emits a debug event inside the current span (when tracing is enabled).
pub(crate) fn debug_event(message: &'static str, detail: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(detail = %detail, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, detail);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn span_records_target_and_wraps_future() {
		let span = CallSpan::new(CallKind::Request, "span_records_target_and_wraps_future");
		let url = Url::parse("https://dep.example.com/profile?profile_uuid=88B9D2E4")
			.expect("Test URL should parse.");

		span.record_target(Method::Get, &url);

		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
