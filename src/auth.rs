//! Authentication schemes, the policy that picks one per request, and credential types.

pub mod oauth1;
pub mod secret;

pub use oauth1::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// OAuth1 access token pair issued to a logged-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
	/// OAuth1 access token.
	pub token: TokenSecret,
	/// OAuth1 access token secret.
	pub secret: TokenSecret,
}
impl OAuthCredentials {
	/// Builds a credential pair.
	pub fn new(token: impl Into<TokenSecret>, secret: impl Into<TokenSecret>) -> Self {
		Self { token: token.into(), secret: secret.into() }
	}

	/// Returns `true` when both halves are non-empty and requests may be signed.
	pub fn is_complete(&self) -> bool {
		!self.token.is_empty() && !self.secret.is_empty()
	}
}

/// Authorization scheme applied to one outbound request. Exactly one is chosen per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthScheme {
	/// Static bearer token.
	Bearer,
	/// Per-request OAuth1 signature.
	OAuth1,
	/// Static bearer token plus an anonymous guest token.
	Guest,
}
impl AuthScheme {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScheme::Bearer => "bearer",
			AuthScheme::OAuth1 => "oauth1",
			AuthScheme::Guest => "guest",
		}
	}
}
impl Display for AuthScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Controls whether unauthenticated sessions attach a guest token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestMode {
	/// Never use the guest scheme; unauthenticated sessions fall back to the bearer token.
	#[default]
	Disabled,
	/// Use the guest scheme whenever no OAuth1 pair is set and the session is not logged in.
	WhenUnauthenticated,
}

/// Deterministic selection rule for [`AuthScheme`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthPolicy {
	/// Guest token behavior for unauthenticated sessions.
	pub guest: GuestMode,
}
impl AuthPolicy {
	/// Policy that enables the guest scheme for unauthenticated sessions.
	pub const fn with_guest(guest: GuestMode) -> Self {
		Self { guest }
	}

	/// Picks the scheme for a request.
	///
	/// A complete OAuth1 pair always wins. Otherwise the guest scheme applies when enabled and
	/// the session is not logged in, and the bearer token covers every remaining case.
	pub const fn select(self, oauth_ready: bool, logged_in: bool) -> AuthScheme {
		if oauth_ready {
			return AuthScheme::OAuth1;
		}

		match self.guest {
			GuestMode::WhenUnauthenticated if !logged_in => AuthScheme::Guest,
			_ => AuthScheme::Bearer,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn selection_is_total_and_exclusive() {
		for guest in [GuestMode::Disabled, GuestMode::WhenUnauthenticated] {
			let policy = AuthPolicy::with_guest(guest);

			for logged_in in [false, true] {
				assert_eq!(policy.select(true, logged_in), AuthScheme::OAuth1);
			}
		}

		assert_eq!(AuthPolicy::default().select(false, false), AuthScheme::Bearer);
		assert_eq!(AuthPolicy::default().select(false, true), AuthScheme::Bearer);

		let guest = AuthPolicy::with_guest(GuestMode::WhenUnauthenticated);

		assert_eq!(guest.select(false, false), AuthScheme::Guest);
		assert_eq!(guest.select(false, true), AuthScheme::Bearer);
	}

	#[test]
	fn oauth_pair_requires_both_halves() {
		assert!(OAuthCredentials::new("token", "secret").is_complete());
		assert!(!OAuthCredentials::new("token", "").is_complete());
		assert!(!OAuthCredentials::new("", "secret").is_complete());
	}
}
