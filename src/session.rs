//! Session token lifecycle: bootstrap, expiry tracking, and single-flight renewal.
//!
//! [`SessionManager::ensure_valid_session`] is the only path that reads or writes the cached
//! token. The slot lives behind an async mutex held across the bootstrap call, so concurrent
//! callers that find the token missing or stale queue behind the first one and reuse the token
//! it obtained instead of issuing their own bootstrap. The slot is only replaced after a
//! bootstrap fully succeeds.

mod clock;

pub use clock::*;

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	auth::{OAuth1Signer, Secret, SessionResponse, SessionToken},
	config::ClientConfig,
	deadline, decode,
	error::{AuthError, DecodeError},
	http::DepHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan, EchoSink},
	request::{Method, RequestEnvelope},
};

/// Owns the credential set and the mutable session slot for one client instance.
pub struct SessionManager<C>
where
	C: ?Sized + DepHttpClient,
{
	config: ClientConfig,
	http_client: Arc<C>,
	slot: AsyncMutex<Option<SessionToken>>,
}
impl<C> SessionManager<C>
where
	C: ?Sized + DepHttpClient,
{
	/// Creates a manager with an empty session slot.
	pub fn new(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { config, http_client: http_client.into(), slot: AsyncMutex::new(None) }
	}

	/// Returns the configuration the manager was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns a token that is fresh at the time of the call, bootstrapping a new session when
	/// the slot is empty or the cached token reached its expiry.
	///
	/// The configured timeout bounds the whole call, including the wait behind a bootstrap
	/// another caller already started.
	pub async fn ensure_valid_session(&self) -> Result<Secret> {
		self.ensure_valid_session_until(deadline::deadline_after(self.config.timeout)).await
	}

	/// Same as [`ensure_valid_session`](Self::ensure_valid_session) with an absolute deadline.
	///
	/// Past the deadline the call fails with
	/// [`TransportError::Timeout`](crate::error::TransportError::Timeout) and the slot keeps its
	/// previous state.
	pub async fn ensure_valid_session_until(&self, deadline: Option<Instant>) -> Result<Secret> {
		deadline::run_until(deadline, async {
			let mut slot = self.slot.lock().await;
			let now = self.config.clock.now();

			if let Some(current) = slot.as_ref().filter(|token| token.is_fresh_at(now)) {
				return Ok(current.token.clone());
			}

			let fresh = self.bootstrap(deadline).await?;
			let token = fresh.token.clone();

			*slot = Some(fresh);

			Ok(token)
		})
		.await
	}

	/// Drops the cached session so the next call bootstraps.
	pub async fn invalidate(&self) {
		*self.slot.lock().await = None;
	}

	/// Returns the expiry of the cached session, if any.
	pub async fn expires_at(&self) -> Option<OffsetDateTime> {
		self.slot.lock().await.as_ref().map(|token| token.expires_at)
	}

	async fn bootstrap(&self, deadline: Option<Instant>) -> Result<SessionToken, AuthError> {
		const KIND: CallKind = CallKind::SessionBootstrap;

		let span = CallSpan::new(KIND, "bootstrap");

		span.record_target(Method::Get, self.config.session_url());
		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut request = RequestEnvelope::new(
					Method::Get,
					self.config.session_url().clone(),
					&self.config.user_agent,
				);
				let authorization = OAuth1Signer::new(&self.config.credentials).authorization(
					Method::Get,
					&request.url,
					self.config.clock.now(),
				)?;

				request.set_header("Authorization", authorization);
				request.timeout =
					deadline.map(deadline::remaining).transpose().map_err(AuthError::Transport)?;

				let response =
					self.http_client.send(request).await.map_err(AuthError::Transport)?;

				obs::record_response_status(KIND, response.status);

				if !response.is_ok() {
					return Err(AuthError::Rejected {
						status: response.status,
						body: response.body_text(),
					});
				}

				let decoded: SessionResponse = decode::decode_json(self.echo(), &response.body)
					.map_err(|DecodeError::Json(source)| AuthError::Decode(source))?;

				if decoded.auth_session_token.is_empty() {
					return Err(AuthError::EmptySessionToken);
				}

				Ok(SessionToken::issued(decoded.auth_session_token, self.config.clock.now()))
			})
			.await;

		match &result {
			Ok(token) => {
				obs::debug_event("session bootstrapped", &token.expires_at);
				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(err) => {
				obs::debug_event("session bootstrap failed", err);
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	fn echo(&self) -> Option<&dyn EchoSink> {
		self.config.echo.as_deref()
	}
}
impl<C> Debug for SessionManager<C>
where
	C: ?Sized + DepHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionManager")
			.field("session_url", &self.config.session_url().as_str())
			.field("credentials", &self.config.credentials)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{
		auth::Credentials,
		error::TransportError,
		http::{HttpFuture, HttpResponse},
	};

	/// Answers every call with the next scripted response and counts calls.
	struct ScriptedTransport {
		responses: Mutex<Vec<HttpResponse>>,
		calls: AtomicUsize,
		seen: Mutex<Vec<RequestEnvelope>>,
		delay: StdDuration,
	}
	impl ScriptedTransport {
		fn new(responses: Vec<HttpResponse>) -> Self {
			Self {
				responses: Mutex::new(responses),
				calls: AtomicUsize::new(0),
				seen: Default::default(),
				delay: StdDuration::ZERO,
			}
		}

		fn delayed(mut self, delay: StdDuration) -> Self {
			self.delay = delay;

			self
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl DepHttpClient for ScriptedTransport {
		fn send(&self, request: RequestEnvelope) -> HttpFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.seen.lock().push(request);

			let next = {
				let mut responses = self.responses.lock();

				if responses.is_empty() { None } else { Some(responses.remove(0)) }
			};

			let delay = self.delay;

			Box::pin(async move {
				tokio::time::sleep(delay).await;

				next.ok_or_else(|| {
					TransportError::Io(std::io::Error::other("No scripted response left."))
				})
			})
		}
	}

	fn token_response(token: &str) -> HttpResponse {
		HttpResponse::new(200, format!("{{\"auth_session_token\":\"{token}\"}}"))
	}

	fn manager(
		transport: Arc<ScriptedTransport>,
	) -> (SessionManager<ScriptedTransport>, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(datetime!(2025-01-01 00:00 UTC)));
		let dyn_clock: Arc<dyn Clock> = clock.clone();
		let config = ClientConfig::builder(Credentials::new("CK_1", "CS_1", "AT_1", "AS_1"))
			.server_url("https://dep.example.com/api/")
			.clock(dyn_clock)
			.build()
			.expect("Test configuration should be valid.");

		(SessionManager::new(config, transport), clock)
	}

	#[tokio::test]
	async fn bootstrap_signs_and_caches_within_window() {
		let transport = Arc::new(ScriptedTransport::new(vec![token_response("session-1")]));
		let (manager, clock) = manager(transport.clone());
		let first = manager.ensure_valid_session().await.expect("Bootstrap should succeed.");

		clock.advance(Duration::seconds(179));

		let second = manager.ensure_valid_session().await.expect("Cached token should be reused.");

		assert_eq!(first.expose(), "session-1");
		assert_eq!(second.expose(), "session-1");
		assert_eq!(transport.calls(), 1);
		assert_eq!(manager.expires_at().await, Some(datetime!(2025-01-01 00:03 UTC)));

		let seen = transport.seen.lock();
		let request = seen.first().expect("Bootstrap request should be recorded.");

		assert_eq!(request.method, Method::Get);
		assert_eq!(request.url.as_str(), "https://dep.example.com/session");
		assert!(request.body.is_empty());
		assert!(request.header("Authorization").is_some_and(|value| {
			value.starts_with("OAuth ") && value.contains("oauth_token=\"AT_1\"")
		}));
		assert_eq!(request.header("X-Server-Protocol-Version"), Some("2"));
	}

	#[tokio::test]
	async fn expiry_triggers_exactly_one_renewal() {
		let transport = Arc::new(ScriptedTransport::new(vec![
			token_response("session-1"),
			token_response("session-2"),
		]));
		let (manager, clock) = manager(transport.clone());

		manager.ensure_valid_session().await.expect("Bootstrap should succeed.");
		clock.advance(Duration::minutes(3));

		let renewed = manager.ensure_valid_session().await.expect("Renewal should succeed.");
		let reused = manager.ensure_valid_session().await.expect("Renewed token should be reused.");

		assert_eq!(renewed.expose(), "session-2");
		assert_eq!(reused.expose(), "session-2");
		assert_eq!(transport.calls(), 2);
	}

	#[tokio::test]
	async fn failed_renewal_keeps_previous_state() {
		let transport = Arc::new(ScriptedTransport::new(vec![
			token_response("session-1"),
			HttpResponse::new(403, "forbidden"),
		]));
		let (manager, clock) = manager(transport.clone());

		manager.ensure_valid_session().await.expect("Bootstrap should succeed.");
		clock.advance(Duration::minutes(5));

		let err = manager.ensure_valid_session().await.expect_err("Rejected renewal should fail.");

		assert!(matches!(
			err,
			Error::Auth(AuthError::Rejected { status: 403, ref body }) if body == "forbidden"
		));
		assert_eq!(manager.expires_at().await, Some(datetime!(2025-01-01 00:03 UTC)));
	}

	#[tokio::test]
	async fn malformed_and_empty_tokens_are_auth_errors() {
		let transport = Arc::new(ScriptedTransport::new(vec![
			HttpResponse::new(200, "{\"token\":\"wrong-field\"}"),
			token_response(""),
		]));
		let (manager, _clock) = manager(transport);
		let err = manager.ensure_valid_session().await.expect_err("Missing field should fail.");

		assert!(matches!(err, Error::Auth(AuthError::Decode(_))));

		let err = manager.ensure_valid_session().await.expect_err("Empty token should fail.");

		assert!(matches!(err, Error::Auth(AuthError::EmptySessionToken)));
		assert_eq!(manager.expires_at().await, None);
	}

	#[tokio::test]
	async fn invalidate_forces_bootstrap() {
		let transport = Arc::new(ScriptedTransport::new(vec![
			token_response("session-1"),
			token_response("session-2"),
		]));
		let (manager, _clock) = manager(transport.clone());

		manager.ensure_valid_session().await.expect("Bootstrap should succeed.");
		manager.invalidate().await;

		let token = manager.ensure_valid_session().await.expect("Second bootstrap should succeed.");

		assert_eq!(token.expose(), "session-2");
		assert_eq!(transport.calls(), 2);
	}

	#[tokio::test]
	async fn waiting_behind_a_bootstrap_respects_the_deadline() {
		let transport = Arc::new(
			ScriptedTransport::new(vec![token_response("session-1")])
				.delayed(StdDuration::from_millis(500)),
		);
		let (manager, _clock) = manager(transport.clone());
		let (first, second) = tokio::join!(
			manager.ensure_valid_session_until(None),
			manager.ensure_valid_session_until(Some(Instant::now() + StdDuration::from_millis(100))),
		);

		assert_eq!(first.expect("Unbounded caller should get the token.").expose(), "session-1");
		assert!(matches!(
			second.expect_err("Queued caller should give up at its deadline."),
			Error::Transport(TransportError::Timeout { .. })
		));
		assert_eq!(transport.calls(), 1);
	}

	#[tokio::test]
	async fn bootstrap_request_carries_the_remaining_time() {
		let transport = Arc::new(ScriptedTransport::new(vec![token_response("session-1")]));
		let (manager, _clock) = manager(transport.clone());

		manager
			.ensure_valid_session_until(Some(Instant::now() + StdDuration::from_secs(5)))
			.await
			.expect("Bootstrap should succeed.");

		let seen = transport.seen.lock();
		let timeout = seen
			.first()
			.and_then(|request| request.timeout)
			.expect("Bootstrap request should carry a timeout.");

		assert!(timeout <= StdDuration::from_secs(5));
		assert!(timeout > StdDuration::from_secs(4));
	}
}
