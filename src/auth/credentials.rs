//! Static OAuth1 credential set issued with the server token.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Environment variable holding the consumer key.
pub const ENV_CONSUMER_KEY: &str = "DEP_CONSUMER_KEY";
/// Environment variable holding the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "DEP_CONSUMER_SECRET";
/// Environment variable holding the access token.
pub const ENV_ACCESS_TOKEN: &str = "DEP_ACCESS_TOKEN";
/// Environment variable holding the access secret.
pub const ENV_ACCESS_SECRET: &str = "DEP_ACCESS_SECRET";

/// Long-lived OAuth1 consumer and access credentials.
///
/// The consumer pair identifies the client, the access pair identifies the resource owner.
/// Both are immutable once constructed; only the session token derived from them changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// OAuth1 consumer key.
	pub consumer_key: String,
	/// OAuth1 consumer secret.
	pub consumer_secret: Secret,
	/// OAuth1 access token.
	pub access_token: String,
	/// OAuth1 access secret.
	pub access_secret: Secret,
}
impl Credentials {
	/// Creates a credential set from the four values issued by the vendor.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<Secret>,
		access_token: impl Into<String>,
		access_secret: impl Into<Secret>,
	) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: consumer_secret.into(),
			access_token: access_token.into(),
			access_secret: access_secret.into(),
		}
	}

	/// Reads the credential set from `DEP_CONSUMER_KEY`, `DEP_CONSUMER_SECRET`,
	/// `DEP_ACCESS_TOKEN`, and `DEP_ACCESS_SECRET`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self::new(
			read_env(ENV_CONSUMER_KEY)?,
			read_env(ENV_CONSUMER_SECRET)?,
			read_env(ENV_ACCESS_TOKEN)?,
			read_env(ENV_ACCESS_SECRET)?,
		))
	}

	/// Rejects credential sets with empty fields.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let fields = [
			("consumer_key", self.consumer_key.is_empty()),
			("consumer_secret", self.consumer_secret.is_empty()),
			("access_token", self.access_token.is_empty()),
			("access_secret", self.access_secret.is_empty()),
		];

		match fields.into_iter().find(|(_, empty)| *empty) {
			Some((name, _)) => Err(ConfigError::MissingCredential { name }),
			None => Ok(()),
		}
	}
}

fn read_env(var: &'static str) -> Result<String, ConfigError> {
	std::env::var(var).map_err(|_| ConfigError::MissingEnv { var })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secrets() {
		let credentials = Credentials::new("CK_1", "CS_1", "AT_1", "AS_1");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("CK_1"));
		assert!(rendered.contains("AT_1"));
		assert!(!rendered.contains("CS_1"));
		assert!(!rendered.contains("AS_1"));
	}

	#[test]
	fn validate_names_first_empty_field() {
		let credentials = Credentials::new("CK_1", "", "AT_1", "");
		let err = credentials.validate().expect_err("Empty secrets should be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { name: "consumer_secret" }));
		assert!(Credentials::new("a", "b", "c", "d").validate().is_ok());
	}
}
