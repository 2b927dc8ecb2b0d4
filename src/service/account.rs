//! Account details endpoint.

// self
use crate::{_prelude::*, client::DepApi, request::Method};

/// Path of the account details endpoint.
pub const ACCOUNT_PATH: &str = "account";

/// Enrollment account the credentials belong to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
	/// MDM server name.
	pub server_name: String,
	/// MDM server identifier.
	pub server_uuid: String,
	/// Apple ID of the administrator who generated the token.
	pub admin_id: String,
	/// Deprecated; superseded by `admin_id`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub facilitator_id: Option<String>,
	/// Organization name.
	pub org_name: String,
	/// Organization email.
	pub org_email: String,
	/// Organization phone.
	pub org_phone: String,
	/// Organization postal address.
	pub org_address: String,
	/// Endpoint URLs the account may call.
	pub urls: Vec<String>,
}

/// Account facade.
pub trait AccountService: DepApi {
	/// Fetches the account details (`GET account`).
	fn account(&self) -> impl Future<Output = Result<Account>> + Send {
		async move {
			let request = self.build(Method::Get, ACCOUNT_PATH)?;

			self.execute(request).await
		}
	}
}
impl<A> AccountService for A where A: DepApi {}
