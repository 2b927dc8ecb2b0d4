//! Demonstrates paging through devices with cursor and limit options until the server reports
//! no more pages.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use dep_client::{
	auth::Credentials,
	client::Client,
	config::ClientConfig,
	service::{DeviceRequestOption, DeviceService},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/session");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"auth_session_token\":\"demo-session\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/server/devices").json_body(json!({ "limit": 2 }));
			then.status(200).header("content-type", "application/json").body(
				json!({
					"devices": [
						{ "serial_number": "C8TJ500QF1MN", "model": "IPAD" },
						{ "serial_number": "C02XXXXXXXXX", "model": "MACBOOK PRO" },
					],
					"cursor": "page-2",
					"more_to_follow": true,
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/server/devices")
				.json_body(json!({ "cursor": "page-2", "limit": 2 }));
			then.status(200).header("content-type", "application/json").body(
				json!({
					"devices": [{ "serial_number": "DMPXXXXXXXXX", "model": "IPHONE" }],
					"cursor": "page-3",
					"fetched_until": "2025-03-01T00:00:00Z",
					"more_to_follow": false,
				})
				.to_string(),
			);
		})
		.await;

	let credentials = Credentials::new("CK_demo", "CS_demo", "AT_demo", "AS_demo");
	let config = ClientConfig::builder(credentials).server_url(server.base_url()).build()?;
	let client = Client::new(config);
	let mut options = vec![DeviceRequestOption::limit(2)];

	loop {
		let page = client.fetch_devices(&options).await?;

		for device in &page.devices {
			println!("{} ({})", device.serial_number, device.model);
		}

		if !page.more_to_follow {
			println!("Fetched until {:?}.", page.fetched_until);

			break;
		}

		options = vec![DeviceRequestOption::cursor(page.cursor), DeviceRequestOption::limit(2)];
	}

	if let Err(err) = client.fetch_devices(&[DeviceRequestOption::limit(5_000)]).await {
		println!("Rejected before sending: {err}");
	}

	Ok(())
}
