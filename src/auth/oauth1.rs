//! OAuth1 HMAC-SHA1 request signing used to bootstrap API sessions.
//!
//! The signature base string is `METHOD&enc(url)&enc(params)` where `url` is the normalized
//! scheme/host/port/path and `params` are the sorted, percent-encoded `oauth_*` values plus any
//! query or form pairs. The key is `enc(consumer_secret)&enc(access_secret)`. Nonce and timestamp
//! are the only inputs that vary between calls, so [`OAuth1Signer::authorization_with`] takes
//! them explicitly for reproducible signatures.

// std
use std::{borrow::Cow, fmt::Write as _};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{_prelude::*, auth::Credentials, error::AuthError, request::Method};

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Per-call nonce and timestamp pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthNonce {
	/// Random value unique to the request.
	pub nonce: String,
	/// Unix timestamp in seconds.
	pub timestamp: i64,
}
impl OAuthNonce {
	/// Creates a nonce pair from explicit values.
	pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
		Self { nonce: nonce.into(), timestamp }
	}

	/// Generates a fresh random nonce stamped with `now`.
	pub fn generate(now: OffsetDateTime) -> Self {
		let nonce = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();

		Self { nonce, timestamp: now.unix_timestamp() }
	}
}

/// Produces OAuth1 `Authorization` header values for a credential set.
///
/// The signer holds no state beyond the borrowed credentials.
#[derive(Clone, Copy, Debug)]
pub struct OAuth1Signer<'a> {
	credentials: &'a Credentials,
}
impl<'a> OAuth1Signer<'a> {
	/// Creates a signer for the provided credentials.
	pub fn new(credentials: &'a Credentials) -> Self {
		Self { credentials }
	}

	/// Signs `method` + `url` with a freshly generated nonce stamped at `now`.
	pub fn authorization(
		&self,
		method: Method,
		url: &Url,
		now: OffsetDateTime,
	) -> Result<String, AuthError> {
		self.authorization_with(method, url, &[], &OAuthNonce::generate(now))
	}

	/// Builds the `Authorization` header value for fixed nonce/timestamp inputs.
	///
	/// `form` holds `application/x-www-form-urlencoded` body pairs that participate in the
	/// signature; pass an empty slice for requests without a form body.
	pub fn authorization_with(
		&self,
		method: Method,
		url: &Url,
		form: &[(&str, &str)],
		nonce: &OAuthNonce,
	) -> Result<String, AuthError> {
		let signature = self.signature(method, url, form, nonce)?;
		let mut params = self.oauth_params(nonce);

		params.push(("oauth_signature", Cow::Owned(signature)));
		params.sort_by(|a, b| a.0.cmp(b.0));

		let mut header = String::from("OAuth ");

		for (idx, (key, value)) in params.iter().enumerate() {
			if idx > 0 {
				header.push_str(", ");
			}

			let _ = write!(header, "{}=\"{}\"", encode(key), encode(value));
		}

		Ok(header)
	}

	/// Computes the base64 HMAC-SHA1 signature for fixed nonce/timestamp inputs.
	pub fn signature(
		&self,
		method: Method,
		url: &Url,
		form: &[(&str, &str)],
		nonce: &OAuthNonce,
	) -> Result<String, AuthError> {
		let mut params = self
			.oauth_params(nonce)
			.into_iter()
			.map(|(key, value)| (key.to_owned(), value.into_owned()))
			.collect::<Vec<_>>();

		params.extend(url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())));
		params.extend(form.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())));

		let base = signature_base_string(method, url, &params);
		let key = format!(
			"{}&{}",
			encode(self.credentials.consumer_secret.expose()),
			encode(self.credentials.access_secret.expose())
		);
		let mut mac =
			HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| AuthError::SigningKey)?;

		mac.update(base.as_bytes());

		Ok(STANDARD.encode(mac.finalize().into_bytes()))
	}

	fn oauth_params<'n>(&'n self, nonce: &'n OAuthNonce) -> Vec<(&'static str, Cow<'n, str>)> {
		vec![
			("oauth_consumer_key", Cow::Borrowed(self.credentials.consumer_key.as_str())),
			("oauth_nonce", Cow::Borrowed(nonce.nonce.as_str())),
			("oauth_signature_method", Cow::Borrowed(SIGNATURE_METHOD)),
			("oauth_timestamp", Cow::Owned(nonce.timestamp.to_string())),
			("oauth_token", Cow::Borrowed(self.credentials.access_token.as_str())),
			("oauth_version", Cow::Borrowed(OAUTH_VERSION)),
		]
	}
}

/// Builds the OAuth1 signature base string from a method, URL, and decoded parameter pairs.
pub fn signature_base_string(method: Method, url: &Url, params: &[(String, String)]) -> String {
	let mut encoded = params
		.iter()
		.map(|(key, value)| (encode(key).into_owned(), encode(value).into_owned()))
		.collect::<Vec<_>>();

	encoded.sort();

	let normalized_params =
		encoded.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.as_str(),
		encode(&normalized_url(url)),
		encode(&normalized_params)
	)
}

/// Strips query and fragment, keeping the non-default port.
fn normalized_url(url: &Url) -> String {
	let mut normalized = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

	if let Some(port) = url.port() {
		let _ = write!(normalized, ":{port}");
	}

	normalized.push_str(url.path());

	normalized
}

fn encode(value: &str) -> Cow<'_, str> {
	urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	fn credentials() -> Credentials {
		Credentials::new("CK_3a419c0b", "CS_3fb23281", "AT_O8473841", "AS_9d141598")
	}

	#[test]
	fn session_signature_matches_reference() {
		let credentials = credentials();
		let signer = OAuth1Signer::new(&credentials);
		let nonce = OAuthNonce::new("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg", 1_318_622_958);
		let target = url("https://mdmenrollment.apple.com/session");
		let signature = signer
			.signature(Method::Get, &target, &[], &nonce)
			.expect("Signing should succeed for valid credentials.");

		assert_eq!(signature, "Vptywju9krPcTtBknM6uaDidbzk=");

		let header = signer
			.authorization_with(Method::Get, &target, &[], &nonce)
			.expect("Header construction should succeed for valid credentials.");

		assert_eq!(
			header,
			"OAuth oauth_consumer_key=\"CK_3a419c0b\", \
			 oauth_nonce=\"kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\", \
			 oauth_signature=\"Vptywju9krPcTtBknM6uaDidbzk%3D\", \
			 oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1318622958\", \
			 oauth_token=\"AT_O8473841\", oauth_version=\"1.0\""
		);
	}

	#[test]
	fn reserved_characters_in_secrets_are_encoded_in_key() {
		let credentials = Credentials::new("CK_3a419c0b", "CS&+%/42", "AT_O8473841", "AS%26=+!");
		let signer = OAuth1Signer::new(&credentials);
		let nonce = OAuthNonce::new("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg", 1_318_622_958);
		let signature = signer
			.signature(Method::Get, &url("https://mdmenrollment.apple.com/session"), &[], &nonce)
			.expect("Signing should succeed for valid credentials.");

		// Key is `CS%26%2B%25%2F42&AS%2526%3D%2B%21`.
		assert_eq!(signature, "wJqpfxhVT72x9pdD1uEAM4HSjTo=");
	}

	#[test]
	fn query_pairs_and_port_participate_in_signature() {
		let credentials = credentials();
		let signer = OAuth1Signer::new(&credentials);
		let nonce = OAuthNonce::new("nonce123", 1_700_000_000);
		let target = url("http://localhost:9000/session?b=2%203&a=1");
		let signature = signer
			.signature(Method::Get, &target, &[], &nonce)
			.expect("Signing should succeed for valid credentials.");

		assert_eq!(signature, "AE2tWNyUurmLzSkNl15j5ri6SvY=");
	}

	#[test]
	fn form_pairs_match_published_vector() {
		let credentials = Credentials::new(
			"xvz1evFS4wEEPTGEFPHBog",
			"kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
			"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
			"LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
		);
		let signer = OAuth1Signer::new(&credentials);
		let nonce = OAuthNonce::new("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg", 1_318_622_958);
		let target = url("https://api.twitter.com/1.1/statuses/update.json?include_entities=true");
		let signature = signer
			.signature(
				Method::Post,
				&target,
				&[("status", "Hello Ladies + Gentlemen, a signed OAuth request!")],
				&nonce,
			)
			.expect("Signing should succeed for valid credentials.");

		assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
	}

	#[test]
	fn normalized_url_drops_default_port_and_query() {
		assert_eq!(
			normalized_url(&url("HTTPS://Example.COM:443/session?x=1#frag")),
			"https://example.com/session"
		);
		assert_eq!(
			normalized_url(&url("http://127.0.0.1:9000/session")),
			"http://127.0.0.1:9000/session"
		);
	}

	#[test]
	fn generated_nonces_differ() {
		let now = OffsetDateTime::from_unix_timestamp(1_700_000_000)
			.expect("Fixed timestamp should be representable.");
		let first = OAuthNonce::generate(now);
		let second = OAuthNonce::generate(now);

		assert_eq!(first.nonce.len(), NONCE_LEN);
		assert_eq!(first.timestamp, 1_700_000_000);
		assert_ne!(first.nonce, second.nonce);
	}
}
