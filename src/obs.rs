//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `dep_client.call` with the `call` (bootstrap
//!   or request) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `dep_client_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.
//!
//! Response echoing lives in [`echo`]; it is configured per client rather than through a global
//! flag.

pub mod echo;

mod metrics;
mod tracing;

pub use self::echo::*;
pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// OAuth1-signed session bootstrap.
	SessionBootstrap,
	/// Authenticated API request.
	Request,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::SessionBootstrap => "session_bootstrap",
			CallKind::Request => "request",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
