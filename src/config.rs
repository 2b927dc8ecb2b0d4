//! Client configuration and its validating builder.
//!
//! Setters only record values; [`ClientConfigBuilder::build`] validates everything before any of
//! it takes effect, and repeated calls to the same setter keep the last value.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ConfigError,
	obs::{EchoSink, StdoutEcho},
	request::{DEFAULT_BASE_URL, SESSION_PATH, USER_AGENT},
	session::{Clock, SystemClock},
};

/// Environment variable overriding the server URL in [`ClientConfig::from_env`].
pub const ENV_SERVER_URL: &str = "DEP_SERVER_URL";

/// Validated client configuration.
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth1 credentials used to bootstrap sessions.
	pub credentials: Credentials,
	/// API root every relative path resolves against.
	pub base_url: Url,
	/// User agent sent on every request.
	pub user_agent: String,
	/// Optional sink receiving raw response bodies.
	pub echo: Option<Arc<dyn EchoSink>>,
	/// Time source for session expiry and OAuth1 timestamps.
	pub clock: Arc<dyn Clock>,
	/// Default deadline for envelopes that do not carry their own.
	pub timeout: Option<StdDuration>,
	session_url: Url,
}
impl ClientConfig {
	/// Creates a builder seeded with the provided credentials.
	pub fn builder(credentials: Credentials) -> ClientConfigBuilder {
		ClientConfigBuilder::new(credentials)
	}

	/// Builds a configuration from `DEP_*` environment variables.
	///
	/// Credentials are mandatory; `DEP_SERVER_URL` is optional and defaults to production.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder(Credentials::from_env()?);

		if let Ok(url) = std::env::var(ENV_SERVER_URL) {
			builder = builder.server_url(url);
		}

		builder.build()
	}

	/// Absolute URL of the session bootstrap endpoint.
	pub fn session_url(&self) -> &Url {
		&self.session_url
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("credentials", &self.credentials)
			.field("base_url", &self.base_url.as_str())
			.field("user_agent", &self.user_agent)
			.field("echo_set", &self.echo.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
pub struct ClientConfigBuilder {
	/// Credentials for the client being configured.
	pub credentials: Credentials,
	/// Server URL override; production when unset.
	pub server_url: Option<String>,
	/// User agent override.
	pub user_agent: Option<String>,
	/// Response echo sink.
	pub echo: Option<Arc<dyn EchoSink>>,
	/// Clock override.
	pub clock: Option<Arc<dyn Clock>>,
	/// Default request deadline.
	pub timeout: Option<StdDuration>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided credentials.
	pub fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			server_url: None,
			user_agent: None,
			echo: None,
			clock: None,
			timeout: None,
		}
	}

	/// Points the client at a server other than production (e.g., a local simulator).
	pub fn server_url(mut self, url: impl Into<String>) -> Self {
		self.server_url = Some(url.into());

		self
	}

	/// Mirrors raw response bodies to standard output when `enabled`.
	pub fn debug(mut self, enabled: bool) -> Self {
		self.echo = if enabled { Some(Arc::new(StdoutEcho) as Arc<dyn EchoSink>) } else { None };

		self
	}

	/// Mirrors raw response bodies to a custom sink.
	pub fn echo_sink(mut self, sink: Arc<dyn EchoSink>) -> Self {
		self.echo = Some(sink);

		self
	}

	/// Overrides the time source.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);

		self
	}

	/// Sets the default deadline for every call.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Overrides the user agent.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		self.credentials.validate()?;

		let raw = self.server_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
		let base_url = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidServerUrl { url: raw.to_owned(), source })?;

		if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedServerUrl { url: raw.to_owned() });
		}

		let session_url = base_url
			.join(SESSION_PATH)
			.map_err(|source| ConfigError::InvalidServerUrl { url: raw.to_owned(), source })?;

		Ok(ClientConfig {
			credentials: self.credentials,
			base_url,
			user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_owned()),
			echo: self.echo,
			clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
			timeout: self.timeout,
			session_url,
		})
	}
}
impl Debug for ClientConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfigBuilder")
			.field("credentials", &self.credentials)
			.field("server_url", &self.server_url)
			.field("echo_set", &self.echo.is_some())
			.finish()
	}
}
