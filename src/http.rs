//! Transport primitives for API calls.
//!
//! [`DepHttpClient`] is the client's only dependency on an HTTP stack. The session manager
//! and the executor both hand it fully-built [`RequestEnvelope`]s and receive the raw status
//! plus body back; all interpretation (status checks, JSON decoding) happens above the seam.

// self
use crate::{_prelude::*, error::TransportError, request::RequestEnvelope};

/// Boxed future returned by [`DepHttpClient::send`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by the
/// session manager and the executor behind an [`Arc`]. The returned future must apply
/// [`RequestEnvelope::timeout`] to the whole exchange when it is set, and it must read the full
/// body before resolving.
pub trait DepHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and returns the status and complete body.
	fn send(&self, request: RequestEnvelope) -> HttpFuture<'_>;
}

/// Raw response surfaced by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Complete response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for `200 OK`, the only status the API uses for success.
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}

	/// Returns the body as lossy UTF-8 for diagnostics.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl DepHttpClient for ReqwestHttpClient {
	fn send(&self, request: RequestEnvelope) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let RequestEnvelope { method, url, headers, body, timeout } = request;
			let mut builder = client.request(method.into(), url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}
			if !body.is_empty() {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}
