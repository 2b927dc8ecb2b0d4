//! Request envelope construction: path resolution, JSON bodies, and protocol headers.
//!
//! Every envelope carries `User-Agent`, `Content-Type`, `Accept`, and the protocol version
//! header from the moment it is built. The session header is attached later by the executor
//! because it requires a fresh token.

// self
use crate::{_prelude::*, error::ConstructionError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://mdmenrollment.apple.com";
/// User agent sent on every request.
pub const USER_AGENT: &str = concat!("dep-client/", env!("CARGO_PKG_VERSION"));
/// Media type used for both `Content-Type` and `Accept`.
pub const MEDIA_TYPE: &str = "application/json;charset=UTF8";
/// Protocol version header name.
pub const PROTOCOL_VERSION_HEADER: &str = "X-Server-Protocol-Version";
/// Protocol version spoken by this client.
pub const PROTOCOL_VERSION: &str = "2";
/// Header carrying the session token on authenticated calls.
pub const SESSION_HEADER: &str = "X-ADM-Auth-Session";
/// Session bootstrap path, resolved as an absolute path against the base URL.
pub const SESSION_PATH: &str = "/session";

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Returns the uppercase wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully-resolved request handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEnvelope {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Header set in insertion order.
	pub headers: Vec<(&'static str, String)>,
	/// Serialized JSON body; empty when the request has none.
	pub body: Vec<u8>,
	/// Deadline covering connect, response wait, and body read.
	pub timeout: Option<StdDuration>,
}
impl RequestEnvelope {
	/// Creates a body-less envelope for an absolute `url` carrying the protocol headers.
	pub fn new(method: Method, url: Url, user_agent: &str) -> Self {
		Self {
			method,
			url,
			headers: vec![
				("User-Agent", user_agent.to_owned()),
				("Content-Type", MEDIA_TYPE.to_owned()),
				("Accept", MEDIA_TYPE.to_owned()),
				(PROTOCOL_VERSION_HEADER, PROTOCOL_VERSION.to_owned()),
			],
			body: Vec::new(),
			timeout: None,
		}
	}

	/// Resolves `path` against `base`, serializes `body`, and attaches the protocol headers.
	///
	/// Resolution follows relative-reference rules, so `devices` under `https://host/` yields
	/// `https://host/devices` and `/session` always lands at the host root.
	pub fn build<B>(
		base: &Url,
		user_agent: &str,
		method: Method,
		path: &str,
		body: Option<&B>,
	) -> Result<Self, ConstructionError>
	where
		B: ?Sized + Serialize,
	{
		let url = base
			.join(path)
			.map_err(|source| ConstructionError::InvalidPath { path: path.to_owned(), source })?;
		let mut envelope = Self::new(method, url, user_agent);

		if let Some(body) = body {
			envelope.body = serde_json::to_vec(body).map_err(ConstructionError::Body)?;
		}

		Ok(envelope)
	}

	/// Appends a query pair to the target URL.
	pub fn with_query(mut self, key: &str, value: &str) -> Self {
		self.url.query_pairs_mut().append_pair(key, value);

		self
	}

	/// Sets the deadline applied by the transport.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Replaces (or inserts) a header value; names compare case-insensitively.
	pub fn set_header(&mut self, name: &'static str, value: impl Into<String>) {
		let value = value.into();

		match self.headers.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
			Some(slot) => slot.1 = value,
			None => self.headers.push((name, value)),
		}
	}

	/// Returns the value of a header, if present.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
