//! Setup profile endpoints.

// std
use std::collections::HashMap;
// self
use crate::{_prelude::*, client::DepApi, request::Method};

/// Path of the define and fetch profile endpoint.
pub const PROFILE_PATH: &str = "profile";
/// Path of the assign profile endpoint.
pub const ASSIGN_PROFILE_PATH: &str = "profile/devices";

/// Setup profile applied to devices during enrollment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
	/// Human-readable name.
	pub profile_name: String,
	/// MDM enrollment URL.
	pub url: String,
	/// Whether the device may pair with a host.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub allow_pairing: bool,
	/// Whether the device is supervised.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub is_supervised: bool,
	/// Whether the device is shared between users.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub is_multi_user: bool,
	/// Whether enrollment cannot be skipped.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub is_mandatory: bool,
	/// Whether setup waits for the MDM server to release the device.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub await_device_configured: bool,
	/// Whether the user may remove the MDM profile.
	pub is_mdm_removable: bool,
	/// Support phone number shown during setup.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub support_phone_number: String,
	/// Support email shown during setup.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub support_email_address: String,
	/// Organization magic string.
	pub org_magic: String,
	/// Anchor certificates, base64 DER.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub anchor_certs: Vec<String>,
	/// Supervising host certificates, base64 DER.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub supervising_host_certs: Vec<String>,
	/// Setup assistant panes to skip.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub skip_setup_items: Vec<String>,
	/// Department shown during setup.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub department: String,
	/// Serial numbers the profile is assigned to on definition.
	pub devices: Vec<String>,
}

/// Result of defining or assigning a profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileResponse {
	/// Identifier of the profile.
	pub profile_uuid: String,
	/// Per-serial outcome (`SUCCESS`, `NOT_ACCESSIBLE`, `FAILED`).
	pub devices: HashMap<String, String>,
}

#[derive(Serialize)]
struct AssignProfileRequest<'a> {
	profile_uuid: &'a str,
	devices: &'a [String],
}

/// Profile facade.
pub trait ProfileService: DepApi {
	/// Defines a profile (`POST profile`).
	fn define_profile(
		&self,
		profile: &Profile,
	) -> impl Future<Output = Result<ProfileResponse>> + Send {
		async move {
			let request = self.build_with_body(Method::Post, PROFILE_PATH, profile)?;

			self.execute(request).await
		}
	}

	/// Assigns a profile to serial numbers (`PUT profile/devices`).
	fn assign_profile(
		&self,
		profile_uuid: &str,
		serials: &[String],
	) -> impl Future<Output = Result<ProfileResponse>> + Send {
		async move {
			let request = self.build_with_body(
				Method::Put,
				ASSIGN_PROFILE_PATH,
				&AssignProfileRequest { profile_uuid, devices: serials },
			)?;

			self.execute(request).await
		}
	}

	/// Fetches a profile by identifier (`GET profile?profile_uuid=…`).
	fn fetch_profile(&self, profile_uuid: &str) -> impl Future<Output = Result<Profile>> + Send {
		async move {
			let request =
				self.build(Method::Get, PROFILE_PATH)?.with_query("profile_uuid", profile_uuid);

			self.execute(request).await
		}
	}
}
impl<A> ProfileService for A where A: DepApi {}
