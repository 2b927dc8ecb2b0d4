//! Per-call deadlines shared by the session bootstrap and the request it guards.
//!
//! A call computes one [`Instant`] up front. The lock wait, the bootstrap exchange, and the API
//! request all draw from what is left of it, so the whole call never outlives the deadline.

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	error::{DeadlineElapsed, TransportError},
};

/// Converts an optional timeout into an absolute deadline starting now.
pub(crate) fn deadline_after(timeout: Option<StdDuration>) -> Option<Instant> {
	timeout.map(|timeout| Instant::now() + timeout)
}

/// Time left before `deadline`; fails once nothing is left.
pub(crate) fn remaining(deadline: Instant) -> Result<StdDuration, TransportError> {
	let left = deadline.saturating_duration_since(Instant::now());

	if left.is_zero() { Err(TransportError::timeout(DeadlineElapsed)) } else { Ok(left) }
}

/// Drives `fut` to completion or fails with [`TransportError::Timeout`] at `deadline`.
pub(crate) async fn run_until<F, T>(deadline: Option<Instant>, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	match deadline {
		Some(deadline) => tokio::time::timeout_at(deadline.into(), fut)
			.await
			.map_err(|elapsed| Error::Transport(TransportError::timeout(elapsed)))?,
		None => fut.await,
	}
}
