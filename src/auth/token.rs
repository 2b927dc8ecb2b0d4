//! Session token issued by the session endpoint and its freshness window.

// self
use crate::{_prelude::*, auth::Secret};

/// Fixed freshness window applied to every issued session token.
///
/// The session endpoint does not declare a TTL, so the client assumes three minutes.
pub const SESSION_TTL: Duration = Duration::minutes(3);

/// Short-lived session token plus the window during which the client reuses it.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
	/// Token value sent in the session header.
	pub token: Secret,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// First instant at which the token is considered stale.
	pub expires_at: OffsetDateTime,
}
impl SessionToken {
	/// Creates a token issued at `issued_at` with the fixed [`SESSION_TTL`].
	pub fn issued(token: impl Into<Secret>, issued_at: OffsetDateTime) -> Self {
		Self { token: token.into(), issued_at, expires_at: issued_at + SESSION_TTL }
	}

	/// Returns `true` while `instant` is strictly before the expiry.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		!self.token.is_empty() && instant < self.expires_at
	}

	/// Time left before expiry at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionToken")
			.field("token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Wire shape returned by the session endpoint.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SessionResponse {
	pub(crate) auth_session_token: String,
}
