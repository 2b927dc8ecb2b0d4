//! Demonstrates plugging a non-reqwest transport into the client.
//!
//! 1. Implement [`DepHttpClient`] for the transport; it receives fully-built envelopes.
//! 2. Pass it to [`Client::with_http_client`].
//! 3. Observe how transport and API failures surface as distinct [`Error`] variants.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use color_eyre::Result;
// self
use dep_client::{
	auth::Credentials,
	client::Client,
	config::ClientConfig,
	error::{Error, TransportError},
	http::{DepHttpClient, HttpFuture, HttpResponse},
	request::{RequestEnvelope, SESSION_HEADER},
	service::AccountService,
};

/// In-process transport that answers from a fixed script.
struct ScriptedTransport {
	calls: AtomicUsize,
	fail_after: usize,
}
impl DepHttpClient for ScriptedTransport {
	fn send(&self, request: RequestEnvelope) -> HttpFuture<'_> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if call >= self.fail_after {
				return Err(TransportError::network(std::io::Error::other("link down")));
			}

			match (request.url.path(), request.header(SESSION_HEADER)) {
				("/session", _) =>
					Ok(HttpResponse::new(200, "{\"auth_session_token\":\"scripted\"}")),
				("/account", Some("scripted")) =>
					Ok(HttpResponse::new(200, "{\"server_name\":\"scripted-mdm\"}")),
				_ => Ok(HttpResponse::new(401, "UNAUTHORIZED")),
			}
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let credentials = Credentials::new("CK_demo", "CS_demo", "AT_demo", "AS_demo");
	let config = ClientConfig::builder(credentials).server_url("https://dep.invalid").build()?;
	let transport = Arc::new(ScriptedTransport { calls: AtomicUsize::new(0), fail_after: 2 });
	let client: Client<ScriptedTransport> = Client::with_http_client(config, transport.clone());
	let account = client.account().await?;

	println!("Account served by the scripted transport: {}.", account.server_name);

	match client.account().await {
		Err(Error::Transport(err)) => println!("Transport failure surfaced as expected: {err}."),
		other => println!("Unexpected outcome: {other:?}."),
	}

	println!("Transport handled {} requests.", transport.calls.load(Ordering::SeqCst));

	Ok(())
}
