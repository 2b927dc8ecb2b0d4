//! Diagnostic sinks that mirror raw response bodies.
//!
//! An echo sink receives every successfully-received body as it is decoded, including the
//! session bootstrap response. Sinks are infallible from the client's point of view: a sink that
//! cannot write drops the bytes.

// std
use std::io::Write;
// self
use crate::_prelude::*;

/// Receives raw response bytes for diagnostics.
pub trait EchoSink
where
	Self: Send + Sync,
{
	/// Mirrors one response body.
	fn echo(&self, body: &[u8]);
}

/// Writes bodies to standard output, one per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutEcho;
impl EchoSink for StdoutEcho {
	fn echo(&self, body: &[u8]) {
		let mut stdout = std::io::stdout().lock();

		let _ = stdout.write_all(body);
		let _ = stdout.write_all(b"\n");
	}
}

/// Collects bodies in memory; clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct BufferEcho(Arc<Mutex<Vec<Vec<u8>>>>);
impl BufferEcho {
	/// Returns every body echoed so far, oldest first.
	pub fn bodies(&self) -> Vec<Vec<u8>> {
		self.0.lock().clone()
	}

	/// Returns the echoed bodies as lossy UTF-8 strings.
	pub fn texts(&self) -> Vec<String> {
		self.0.lock().iter().map(|body| String::from_utf8_lossy(body).into_owned()).collect()
	}
}
impl EchoSink for BufferEcho {
	fn echo(&self, body: &[u8]) {
		self.0.lock().push(body.to_vec());
	}
}

/// Emits bodies as `debug` events on the `dep_client::echo` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEcho;
#[cfg(feature = "tracing")]
impl EchoSink for TracingEcho {
	fn echo(&self, body: &[u8]) {
		tracing::debug!(target: "dep_client::echo", body = %String::from_utf8_lossy(body));
	}
}
