//! Device listing, sync, and detail endpoints.

// std
use std::collections::HashMap;
// self
use crate::{
	_prelude::*,
	client::DepApi,
	request::Method,
	service::{DeviceRequestOption, DeviceRequestOptions},
};

/// Path of the fetch devices endpoint.
pub const FETCH_DEVICES_PATH: &str = "server/devices";
/// Path of the sync devices endpoint.
pub const SYNC_DEVICES_PATH: &str = "devices/sync";
/// Path of the device details endpoint.
pub const DEVICE_DETAILS_PATH: &str = "devices";

/// Device assigned to the enrollment account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
	/// Hardware serial number.
	pub serial_number: String,
	/// Marketing model name.
	pub model: String,
	/// Device description.
	pub description: String,
	/// Device color.
	pub color: String,
	/// Asset tag, when one was recorded.
	pub asset_tag: String,
	/// Profile status (`empty`, `assigned`, `pushed`, or `removed`).
	pub profile_status: String,
	/// Assigned profile, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub profile_uuid: Option<String>,
	/// When the profile was assigned.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub profile_assign_time: Option<OffsetDateTime>,
	/// When the profile was pushed to the device.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub profile_push_time: Option<OffsetDateTime>,
	/// When the device was assigned to the server.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub device_assigned_date: Option<OffsetDateTime>,
	/// Who assigned the device.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_assigned_by: Option<String>,
	/// Operating system family.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub os: Option<String>,
	/// Device family.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_family: Option<String>,
	/// Sync operation (`added`, `modified`, or `deleted`); sync responses only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub op_type: Option<String>,
	/// Sync operation time; sync responses only.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub op_date: Option<OffsetDateTime>,
}

/// Page returned by the fetch and sync endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceResponse {
	/// Devices on this page.
	pub devices: Vec<Device>,
	/// Continuation token for the next page.
	pub cursor: String,
	/// Point in time the page covers.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub fetched_until: Option<OffsetDateTime>,
	/// Whether another page is available.
	pub more_to_follow: bool,
}

/// Details keyed by serial number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceDetailsResponse {
	/// Device details keyed by serial number.
	pub devices: HashMap<String, Device>,
}

#[derive(Serialize)]
struct DeviceDetailsRequest<'a> {
	devices: &'a [String],
}

/// Device facade.
pub trait DeviceService: DepApi {
	/// Lists devices (`POST server/devices`).
	///
	/// Options are validated before anything is sent.
	fn fetch_devices(
		&self,
		options: &[DeviceRequestOption],
	) -> impl Future<Output = Result<DeviceResponse>> + Send {
		async move {
			let body = DeviceRequestOptions::default().apply_all(options)?;
			let request = self.build_with_body(Method::Post, FETCH_DEVICES_PATH, &body)?;

			self.execute(request).await
		}
	}

	/// Lists changes since `cursor` (`POST devices/sync`).
	///
	/// `cursor` seeds the body; a later [`DeviceRequestOption::Cursor`] overrides it.
	fn sync_devices(
		&self,
		cursor: &str,
		options: &[DeviceRequestOption],
	) -> impl Future<Output = Result<DeviceResponse>> + Send {
		async move {
			let body = DeviceRequestOptions::with_cursor(cursor).apply_all(options)?;
			let request = self.build_with_body(Method::Post, SYNC_DEVICES_PATH, &body)?;

			self.execute(request).await
		}
	}

	/// Fetches details for the given serial numbers (`POST devices`).
	fn device_details(
		&self,
		serials: &[String],
	) -> impl Future<Output = Result<DeviceDetailsResponse>> + Send {
		async move {
			let request = self.build_with_body(
				Method::Post,
				DEVICE_DETAILS_PATH,
				&DeviceDetailsRequest { devices: serials },
			)?;

			self.execute(request).await
		}
	}
}
impl<A> DeviceService for A where A: DepApi {}
