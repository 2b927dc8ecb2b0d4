//! Async client for the device enrollment REST API with OAuth1 session bootstrap, single-flight
//! session renewal, and typed JSON services.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod service;
pub mod session;

mod deadline;
mod decode;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::Client,
		config::ClientConfig,
		http::ReqwestHttpClient,
		session::{Clock, ManualClock},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Consumer key used by the test credentials.
	pub const TEST_CONSUMER_KEY: &str = "CK_3a419c0b";
	/// Access token used by the test credentials.
	pub const TEST_ACCESS_TOKEN: &str = "AT_O8473841";

	/// Returns the fixed credential set shared by integration tests.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_CONSUMER_KEY, "CS_3fb23281", TEST_ACCESS_TOKEN, "AS_9d141598")
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] pointed at `server_url` and driven by a [`ManualClock`] so tests
	/// can move time across the session freshness window.
	pub fn build_reqwest_test_client(server_url: &str) -> (ReqwestTestClient, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(
			OffsetDateTime::from_unix_timestamp(1_700_000_000)
				.expect("Fixed test timestamp should be representable."),
		));
		let dyn_clock: Arc<dyn Clock> = clock.clone();
		let config = ClientConfig::builder(test_credentials())
			.server_url(server_url)
			.clock(dyn_clock)
			.build()
			.expect("Test client configuration should be valid.");

		(Client::with_http_client(config, test_reqwest_http_client()), clock)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
