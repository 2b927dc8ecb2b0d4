//! Client-level error types shared across the session, request, and service layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::error::Error>;

/// Canonical client error exposed by public APIs.
///
/// Nothing is retried or swallowed internally; every variant is terminal for the call that
/// produced it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client configuration was rejected before any request was made.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request could not be constructed (bad path or unserializable body).
	#[error(transparent)]
	Construction(#[from] ConstructionError),
	/// Session bootstrap failed; the request was not sent.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Network failure while reaching the API.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Successful response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Caller-supplied option is out of range.
	#[error(transparent)]
	Validation(#[from] ValidationError),
}

/// Configuration failures raised while assembling a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Server URL cannot be parsed.
	#[error("Server URL `{url}` is invalid.")]
	InvalidServerUrl {
		/// URL string that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Server URL parses but cannot serve as a base for relative API paths.
	#[error("Server URL `{url}` must be an absolute http(s) URL.")]
	UnsupportedServerUrl {
		/// Offending URL.
		url: String,
	},
	/// A credential field is empty.
	#[error("Credential `{name}` must not be empty.")]
	MissingCredential {
		/// Credential field name.
		name: &'static str,
	},
	/// A required environment variable is unset or not valid unicode.
	#[error("Environment variable `{var}` is not set.")]
	MissingEnv {
		/// Variable name.
		var: &'static str,
	},
}

/// Request construction failures; these indicate programmer error and are not recoverable.
#[derive(Debug, ThisError)]
pub enum ConstructionError {
	/// Relative API path cannot be resolved against the base URL.
	#[error("API path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	Body(#[source] serde_json::Error),
}

/// Session bootstrap failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Session endpoint could not be reached.
	#[error("Session endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Session endpoint rejected the OAuth1 credentials.
	#[error("Session endpoint returned HTTP {status}: {body}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Session endpoint answered with a body that is not a session token.
	#[error("Session endpoint returned a malformed body.")]
	Decode(#[source] JsonPathError),
	/// Session endpoint answered with an empty token.
	#[error("Session endpoint returned an empty auth_session_token.")]
	EmptySessionToken,
	/// Signing key could not be initialized.
	#[error("OAuth1 signing key was rejected.")]
	SigningKey,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Call exceeded its deadline.
	#[error("Call exceeded its deadline.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Source attached to [`TransportError::Timeout`] when a call's deadline passed before the
/// transport produced its own timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Call deadline elapsed.")]
pub struct DeadlineElapsed;

/// Non-success response from the API.
///
/// The vendor's error bodies are unstructured, so the raw text is preserved verbatim.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API returned HTTP {status}: {body}")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl ApiError {
	/// Returns the raw diagnostic body.
	pub fn body(&self) -> &str {
		&self.body
	}
}

/// Response body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested shape.
	#[error("Response body does not match the expected JSON shape at `{}`.", .0.path())]
	Json(#[source] JsonPathError),
}

/// Validation failures for caller-supplied options.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// Page size is above the accepted maximum.
	#[error("Limit must not exceed {max}, got {limit}.")]
	LimitOutOfRange {
		/// Requested page size.
		limit: u32,
		/// Largest accepted page size.
		max: u32,
	},
}
