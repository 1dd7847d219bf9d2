//! Shared session state: credentials, guest token lifecycle, cookie jar, integrity key state,
//! pacing, and the last observed rate-limit budget.
//!
//! One [`Session`] backs every request of a logical scraping session and is shared across
//! concurrent callers behind an `Arc`. Immutable fields are plain values; everything a request
//! can mutate sits behind a `parking_lot` lock that is never held across an `.await`.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// crates.io
use reqwest::cookie::{CookieStore, Jar};
// self
use crate::{
	_prelude::*,
	auth::{OAuthCredentials, TokenSecret},
	pacing::PacingGate,
	rate_limit::RateLimitStatus,
	error::ConfigError,
	transaction::TransactionKeyState,
};

/// Guest tokens older than this are re-acquired before use.
pub const GUEST_TOKEN_TTL: Duration = Duration::hours(3);
/// Default guest activation endpoint.
pub const GUEST_ACTIVATE_URL: &str = "https://api.twitter.com/1.1/guest/activate.json";
/// Cookie carrying the CSRF token that must be mirrored into a header.
pub const CSRF_COOKIE: &str = "ct0";

/// Guest token value paired with its acquisition time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuestToken {
	/// Token value; empty when unset or invalidated.
	pub value: TokenSecret,
	/// Acquisition instant; `None` is the zero time.
	pub created_at: Option<OffsetDateTime>,
}
impl GuestToken {
	/// Returns `true` when the token is non-empty and younger than [`GUEST_TOKEN_TTL`].
	pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
		if self.value.is_empty() {
			return false;
		}

		match self.created_at {
			Some(created_at) => now - created_at < GUEST_TOKEN_TTL,
			None => false,
		}
	}
}

/// Mutable and immutable state shared by every request in one logical session.
pub struct Session {
	bearer_token: TokenSecret,
	guest_activate_url: Option<Url>,
	cookies: Arc<Jar>,
	pacer: PacingGate,
	logged_in: AtomicBool,
	oauth: RwLock<Option<OAuthCredentials>>,
	transaction_keys: RwLock<Option<TransactionKeyState>>,
	guest: RwLock<GuestToken>,
	rate_limit: Mutex<Option<RateLimitStatus>>,
	guest_refresh: AsyncMutex<()>,
}
impl Session {
	/// Creates a session that authenticates with the given static bearer token.
	pub fn new(bearer_token: impl Into<TokenSecret>) -> Self {
		Self {
			bearer_token: bearer_token.into(),
			guest_activate_url: None,
			cookies: Default::default(),
			pacer: PacingGate::new(0),
			logged_in: AtomicBool::new(false),
			oauth: Default::default(),
			transaction_keys: Default::default(),
			guest: Default::default(),
			rate_limit: Default::default(),
			guest_refresh: Default::default(),
		}
	}

	/// Overrides the guest activation endpoint.
	pub fn with_guest_activate_url(mut self, url: Url) -> Self {
		self.guest_activate_url = Some(url);

		self
	}

	/// Sets the minimum spacing, in seconds, between dispatch starts.
	pub fn with_request_pace(self, seconds: u64) -> Self {
		self.pacer.set_interval_secs(seconds);

		self
	}

	/// Static bearer token.
	pub fn bearer_token(&self) -> &TokenSecret {
		&self.bearer_token
	}

	/// Guest activation endpoint; [`GUEST_ACTIVATE_URL`] unless overridden.
	pub fn guest_activate_url(&self) -> Result<Url, ConfigError> {
		match &self.guest_activate_url {
			Some(url) => Ok(url.clone()),
			None => ConfigError::parse_url(GUEST_ACTIVATE_URL),
		}
	}

	/// Cookie jar shared with the transport.
	pub fn cookie_jar(&self) -> Arc<Jar> {
		Arc::clone(&self.cookies)
	}

	/// Pacing gate shared by every dispatcher bound to this session.
	pub fn pacer(&self) -> &PacingGate {
		&self.pacer
	}

	/// Minimum spacing between dispatch starts, in seconds.
	pub fn request_pace_secs(&self) -> u64 {
		self.pacer.interval_secs()
	}

	/// Updates the spacing between dispatch starts; `0` disables pacing.
	pub fn set_request_pace(&self, seconds: u64) {
		self.pacer.set_interval_secs(seconds);
	}

	/// Returns the OAuth1 pair, if one is installed.
	pub fn oauth(&self) -> Option<OAuthCredentials> {
		self.oauth.read().clone()
	}

	/// Installs an OAuth1 pair; requests are signed once both halves are non-empty.
	pub fn set_oauth(&self, credentials: OAuthCredentials) {
		*self.oauth.write() = Some(credentials);
	}

	/// Removes the OAuth1 pair.
	pub fn clear_oauth(&self) {
		*self.oauth.write() = None;
	}

	/// Returns `true` when a complete OAuth1 pair is installed.
	pub fn oauth_ready(&self) -> bool {
		self.oauth.read().as_ref().is_some_and(OAuthCredentials::is_complete)
	}

	/// Returns `true` when an external login marked the session authenticated.
	pub fn is_logged_in(&self) -> bool {
		self.logged_in.load(Ordering::Acquire)
	}

	/// Marks the session authenticated (or not) through cookies.
	pub fn set_logged_in(&self, logged_in: bool) {
		self.logged_in.store(logged_in, Ordering::Release);
	}

	/// Returns the installed transaction key state.
	pub fn transaction_keys(&self) -> Option<TransactionKeyState> {
		self.transaction_keys.read().clone()
	}

	/// Installs transaction key state.
	pub fn set_transaction_keys(&self, keys: TransactionKeyState) {
		*self.transaction_keys.write() = Some(keys);
	}

	/// Removes transaction key state; subsequent preparations fail.
	pub fn clear_transaction_keys(&self) {
		*self.transaction_keys.write() = None;
	}

	/// Runs `f` against non-empty key state, returning `None` when none is usable.
	pub(crate) fn with_transaction_keys<T>(
		&self,
		f: impl FnOnce(&TransactionKeyState) -> T,
	) -> Option<T> {
		let guard = self.transaction_keys.read();

		guard.as_ref().filter(|keys| !keys.is_empty()).map(f)
	}

	/// Snapshot of the guest token and its creation time.
	pub fn guest(&self) -> GuestToken {
		self.guest.read().clone()
	}

	/// Current guest token value; empty when unset.
	pub fn guest_token(&self) -> TokenSecret {
		self.guest.read().value.clone()
	}

	/// Acquisition instant of the current guest token; `None` is the zero time.
	pub fn guest_created_at(&self) -> Option<OffsetDateTime> {
		self.guest.read().created_at
	}

	/// Stores a guest token acquired at `created_at`.
	pub fn set_guest_token(&self, value: impl Into<TokenSecret>, created_at: OffsetDateTime) {
		*self.guest.write() = GuestToken { value: value.into(), created_at: Some(created_at) };
	}

	/// Resets the guest token to empty and its creation time to the zero time.
	pub fn clear_guest_token(&self) {
		*self.guest.write() = GuestToken::default();
	}

	/// Empties the guest token value, keeping its creation time.
	pub fn invalidate_guest_token(&self) {
		self.guest.write().value = TokenSecret::default();
	}

	/// Returns `true` when the guest token is usable at `now`.
	pub fn guest_token_is_fresh_at(&self, now: OffsetDateTime) -> bool {
		self.guest.read().is_fresh_at(now)
	}

	/// Returns `true` when the guest token is usable right now.
	pub fn guest_token_is_fresh(&self) -> bool {
		self.guest_token_is_fresh_at(OffsetDateTime::now_utc())
	}

	/// Serializes guest activations across every dispatcher bound to this session.
	pub(crate) fn guest_refresh(&self) -> &AsyncMutex<()> {
		&self.guest_refresh
	}

	/// Last rate-limit budget reported by the platform.
	pub fn rate_limit(&self) -> Option<RateLimitStatus> {
		self.rate_limit.lock().clone()
	}

	pub(crate) fn record_rate_limit(&self, status: RateLimitStatus) {
		*self.rate_limit.lock() = Some(status);
	}

	/// Stores cookies for `url` as if received in `Set-Cookie` headers.
	pub fn add_cookie(&self, cookie: &str, url: &Url) {
		self.cookies.add_cookie_str(cookie, url);
	}

	/// Looks up a cookie value the jar would send to `url`.
	pub fn cookie(&self, name: &str, url: &Url) -> Option<String> {
		let header = self.cookies.cookies(url)?;
		let raw = header.to_str().ok()?;

		raw.split(';').filter_map(|pair| pair.trim().split_once('=')).find_map(|(k, v)| {
			if k == name { Some(v.to_owned()) } else { None }
		})
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("guest_activate_url", &self.guest_activate_url.as_ref().map(Url::as_str))
			.field("oauth_ready", &self.oauth_ready())
			.field("logged_in", &self.is_logged_in())
			.field("transaction_keys_set", &self.transaction_keys.read().is_some())
			.field("guest", &*self.guest.read())
			.field("request_pace_secs", &self.request_pace_secs())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn clear_guest_token_resets_to_zero_time() {
		let session = build_test_session();

		session.set_guest_token("guest-1", OffsetDateTime::now_utc());
		session.clear_guest_token();

		assert!(session.guest_token().is_empty());
		assert_eq!(session.guest_created_at(), None);

		session.clear_guest_token();

		assert_eq!(session.guest(), GuestToken::default());
	}

	#[test]
	fn guest_token_freshness_window() {
		let session = build_test_session();
		let now = OffsetDateTime::now_utc();

		session.set_guest_token("guest-1", now - Duration::hours(4));

		assert!(!session.guest_token_is_fresh_at(now));

		session.set_guest_token("guest-1", now - Duration::hours(1));

		assert!(session.guest_token_is_fresh_at(now));
		assert!(session.guest_token_is_fresh());

		session.invalidate_guest_token();

		assert!(!session.guest_token_is_fresh_at(now));
		assert!(session.guest_created_at().is_some());
	}

	#[test]
	fn guest_activation_endpoint_defaults_and_overrides() {
		let session = Session::new(TEST_BEARER);

		assert_eq!(
			session.guest_activate_url().expect("Default endpoint should parse.").as_str(),
			GUEST_ACTIVATE_URL
		);

		let custom = Url::parse("http://127.0.0.1:9/activate.json").expect("Fixture URL should parse.");
		let session = session.with_guest_activate_url(custom.clone());

		assert_eq!(session.guest_activate_url().expect("Override should be kept."), custom);
	}

	#[test]
	fn empty_key_state_is_not_usable() {
		let session = Session::new(TEST_BEARER);

		assert!(session.with_transaction_keys(|_| ()).is_none());

		session.set_transaction_keys(TransactionKeyState {
			key: String::new(),
			..fixture_key_state()
		});

		assert!(session.with_transaction_keys(|_| ()).is_none());

		session.set_transaction_keys(fixture_key_state());

		assert_eq!(session.with_transaction_keys(|keys| keys.random_number), Some(3));
	}

	#[test]
	fn cookie_lookup_finds_csrf_token() {
		let session = build_test_session();
		let url = Url::parse("https://x.com/i/api/graphql/abc/UserByScreenName")
			.expect("Fixture URL should parse.");

		assert_eq!(session.cookie(CSRF_COOKIE, &url), None);

		session.add_cookie("guest_id=v1%3A1; Domain=x.com; Path=/", &url);
		session.add_cookie("ct0=csrf-value; Domain=x.com; Path=/", &url);

		assert_eq!(session.cookie(CSRF_COOKIE, &url).as_deref(), Some("csrf-value"));
	}

	#[test]
	fn oauth_readiness_tracks_both_halves() {
		let session = build_test_session();

		assert!(!session.oauth_ready());

		session.set_oauth(OAuthCredentials::new("token", ""));

		assert!(!session.oauth_ready());

		session.set_oauth(OAuthCredentials::new("token", "secret"));

		assert!(session.oauth_ready());

		session.clear_oauth();

		assert!(!session.oauth_ready());
	}
}
