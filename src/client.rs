//! Authenticated request pipeline: envelope construction, session attachment, execution, and
//! response decoding.
//!
//! [`Client::execute`] runs a fixed sequence with no retries: ensure a fresh session (failing
//! with [`Error::Auth`] before anything is sent), attach the session header, send, map non-200
//! responses to [`Error::Api`] with the raw body, and decode 200 bodies into the caller's type.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::ClientConfig,
	deadline, decode,
	error::ApiError,
	http::DepHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
	request::{Method, RequestEnvelope, SESSION_HEADER},
	session::SessionManager,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestDepClient = Client<ReqwestHttpClient>;

/// Capability surface consumed by the service facades.
///
/// Facades only know paths, methods, and JSON shapes; everything about sessions, headers, and
/// transports stays behind this trait.
pub trait DepApi
where
	Self: Send + Sync,
{
	/// Builds a body-less request for `path` relative to the configured base URL.
	fn build(&self, method: Method, path: &str) -> Result<RequestEnvelope>;

	/// Builds a request for `path` carrying `body` serialized as JSON.
	fn build_with_body<B>(&self, method: Method, path: &str, body: &B) -> Result<RequestEnvelope>
	where
		B: ?Sized + Serialize;

	/// Executes a request and decodes the JSON response into `T`.
	fn execute<T>(&self, request: RequestEnvelope) -> impl Future<Output = Result<T>> + Send
	where
		T: 'static + Send + DeserializeOwned;
}

/// Client for one credential set.
///
/// Cloning is cheap and clones share the session slot, so a token bootstrapped through one clone
/// is reused by all of them.
pub struct Client<C>
where
	C: ?Sized + DepHttpClient,
{
	http_client: Arc<C>,
	session: Arc<SessionManager<C>>,
}
impl<C> Client<C>
where
	C: ?Sized + DepHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let http_client = http_client.into();
		let session = Arc::new(SessionManager::new(config, http_client.clone()));

		Self { http_client, session }
	}

	/// Returns the validated configuration.
	pub fn config(&self) -> &ClientConfig {
		self.session.config()
	}

	/// Returns the session manager backing this client.
	pub fn session(&self) -> &SessionManager<C> {
		&self.session
	}

	/// Builds a body-less request for `path` relative to the configured base URL.
	pub fn build(&self, method: Method, path: &str) -> Result<RequestEnvelope> {
		let config = self.config();

		Ok(RequestEnvelope::build::<()>(&config.base_url, &config.user_agent, method, path, None)?)
	}

	/// Builds a request for `path` carrying `body` serialized as JSON.
	pub fn build_with_body<B>(&self, method: Method, path: &str, body: &B) -> Result<RequestEnvelope>
	where
		B: ?Sized + Serialize,
	{
		let config = self.config();

		Ok(RequestEnvelope::build(&config.base_url, &config.user_agent, method, path, Some(body))?)
	}

	/// Guarantees a fresh session token, bootstrapping one when needed.
	pub async fn ensure_valid_session(&self) -> Result<Secret> {
		self.session.ensure_valid_session().await
	}

	/// Executes `request` and decodes the 200 response body into `T`.
	///
	/// The envelope's timeout (or the configured default) is turned into one deadline for the
	/// whole call: waiting for or performing the session bootstrap, then the request itself, each
	/// get only what is left of it.
	pub async fn execute<T>(&self, mut request: RequestEnvelope) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "execute");

		span.record_target(request.method, &request.url);
		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let deadline = deadline::deadline_after(request.timeout.or(self.config().timeout));
		let result: Result<T> = span
			.instrument(deadline::run_until(deadline, async move {
				let token = self.session.ensure_valid_session_until(deadline).await?;

				request.set_header(SESSION_HEADER, token.expose());
				request.timeout = deadline.map(deadline::remaining).transpose()?;

				let response = self.http_client.send(request).await?;

				obs::record_response_status(KIND, response.status);

				if !response.is_ok() {
					return Err(Error::Api(ApiError {
						status: response.status,
						body: response.body_text(),
					}));
				}

				Ok(decode::decode_json(self.config().echo.as_deref(), &response.body)?)
			}))
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(err) => {
				obs::debug_event("request failed", err);
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a new client that provisions its own reqwest-backed transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + DepHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), session: self.session.clone() }
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + DepHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("config", self.config()).finish()
	}
}
impl<C> DepApi for Client<C>
where
	C: ?Sized + DepHttpClient,
{
	fn build(&self, method: Method, path: &str) -> Result<RequestEnvelope> {
		Client::build(self, method, path)
	}

	fn build_with_body<B>(&self, method: Method, path: &str, body: &B) -> Result<RequestEnvelope>
	where
		B: ?Sized + Serialize,
	{
		Client::build_with_body(self, method, path, body)
	}

	fn execute<T>(&self, request: RequestEnvelope) -> impl Future<Output = Result<T>> + Send
	where
		T: 'static + Send + DeserializeOwned,
	{
		Client::execute(self, request)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Instant;
	// self
	use super::*;
	use crate::{
		auth::Credentials,
		error::{AuthError, ConstructionError, TransportError},
		http::{HttpFuture, HttpResponse},
	};

	/// Transport that must never be reached.
	struct Unreachable;
	impl DepHttpClient for Unreachable {
		fn send(&self, _request: RequestEnvelope) -> HttpFuture<'_> {
			Box::pin(async {
				Err(TransportError::Io(std::io::Error::other("Transport should not be called.")))
			})
		}
	}

	fn client() -> Client<Unreachable> {
		let config = ClientConfig::builder(Credentials::new("CK_1", "CS_1", "AT_1", "AS_1"))
			.server_url("http://localhost:9000")
			.build()
			.expect("Test configuration should be valid.");

		Client::with_http_client(config, Unreachable)
	}

	#[test]
	fn build_uses_configured_base_and_user_agent() {
		let request = client().build(Method::Get, "account").expect("Account path should build.");

		assert_eq!(request.url.as_str(), "http://localhost:9000/account");
		assert_eq!(request.header("User-Agent"), Some(crate::request::USER_AGENT));
	}

	#[test]
	fn build_surfaces_construction_errors() {
		let err = client()
			.build(Method::Get, "http://[::1")
			.expect_err("Malformed path should not build.");

		assert!(matches!(err, Error::Construction(ConstructionError::InvalidPath { .. })));
	}

	#[tokio::test]
	async fn auth_failure_stops_before_request() {
		let client = client();
		let request = client.build(Method::Get, "account").expect("Account path should build.");
		let err = client
			.execute::<serde_json::Value>(request)
			.await
			.expect_err("Unreachable transport should fail the bootstrap.");

		assert!(matches!(err, Error::Auth(AuthError::Transport(_))));
	}

	/// Answers every request after `delay`, ignoring the envelope timeout, and records the
	/// timeout each envelope carried.
	struct SlowTransport {
		delay: StdDuration,
		timeouts: Mutex<Vec<Option<StdDuration>>>,
	}
	impl SlowTransport {
		fn new(delay: StdDuration) -> Self {
			Self { delay, timeouts: Mutex::new(Vec::new()) }
		}
	}
	impl DepHttpClient for SlowTransport {
		fn send(&self, request: RequestEnvelope) -> HttpFuture<'_> {
			self.timeouts.lock().push(request.timeout);

			let delay = self.delay;
			let body = if request.url.path() == "/session" {
				"{\"auth_session_token\":\"slow-session\"}"
			} else {
				"{}"
			};

			Box::pin(async move {
				tokio::time::sleep(delay).await;

				Ok(HttpResponse::new(200, body))
			})
		}
	}

	fn slow_client(delay: StdDuration) -> (Client<SlowTransport>, Arc<SlowTransport>) {
		let transport = Arc::new(SlowTransport::new(delay));
		let config = ClientConfig::builder(Credentials::new("CK_1", "CS_1", "AT_1", "AS_1"))
			.server_url("http://localhost:9000")
			.build()
			.expect("Test configuration should be valid.");

		(Client::with_http_client(config, transport.clone()), transport)
	}

	#[tokio::test]
	async fn one_deadline_covers_bootstrap_and_request() {
		let (client, transport) = slow_client(StdDuration::from_millis(200));
		let request = client
			.build(Method::Get, "account")
			.expect("Account path should build.")
			.with_timeout(StdDuration::from_millis(300));
		let started = Instant::now();
		let err = client
			.execute::<serde_json::Value>(request)
			.await
			.expect_err("Two 200 ms legs should not fit in a 300 ms deadline.");

		assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
		assert!(started.elapsed() < StdDuration::from_millis(390));
		assert_eq!(transport.timeouts.lock().len(), 2);
	}

	#[tokio::test]
	async fn request_gets_only_the_time_left_after_bootstrap() {
		let (client, transport) = slow_client(StdDuration::from_millis(100));
		let request = client
			.build(Method::Get, "account")
			.expect("Account path should build.")
			.with_timeout(StdDuration::from_secs(2));

		client
			.execute::<serde_json::Value>(request)
			.await
			.expect("Both legs should fit in the deadline.");

		let timeouts = transport.timeouts.lock();
		let bootstrap = timeouts[0].expect("Bootstrap should carry a timeout.");
		let api = timeouts[1].expect("API request should carry a timeout.");

		assert!(bootstrap <= StdDuration::from_secs(2));
		assert!(api <= StdDuration::from_millis(1_900));
		assert!(api < bootstrap);
	}
}
