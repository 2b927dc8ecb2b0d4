//! Demonstrates bootstrapping a session against a local simulator and reading the account
//! details with the default reqwest transport, echoing raw bodies to stdout.
//!
//! Set `DEP_CONSUMER_KEY`, `DEP_CONSUMER_SECRET`, `DEP_ACCESS_TOKEN`, `DEP_ACCESS_SECRET`, and
//! optionally `DEP_SERVER_URL` to run it against a real server instead of the mock.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use dep_client::{
	auth::Credentials,
	client::Client,
	config::ClientConfig,
	service::AccountService,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = match ClientConfig::from_env() {
		Ok(config) => config,
		Err(_) => return run_against_mock().await,
	};
	let account = Client::new(config).account().await?;

	println!("Account {} belongs to {}.", account.server_uuid, account.org_name);

	Ok(())
}

async fn run_against_mock() -> Result<()> {
	let server = MockServer::start_async().await;
	let session_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/session").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"auth_session_token\":\"demo-session\"}");
		})
		.await;
	let account_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/account").header("x-adm-auth-session", "demo-session");
			then.status(200).header("content-type", "application/json").body(
				"{\"server_name\":\"demo-mdm\",\"server_uuid\":\"677cd6c2\",\"org_name\":\"Demo Org\",\"urls\":[]}",
			);
		})
		.await;
	let credentials = Credentials::new("CK_demo", "CS_demo", "AT_demo", "AS_demo");
	let config =
		ClientConfig::builder(credentials).server_url(server.base_url()).debug(true).build()?;
	let client = Client::new(config);
	let first = client.account().await?;
	let second = client.account().await?;

	println!("Account {} belongs to {}.", first.server_uuid, first.org_name);
	println!("Second call reused the session: {}.", first == second);

	session_mock.assert_calls_async(1).await;
	account_mock.assert_calls_async(2).await;

	Ok(())
}
