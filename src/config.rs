//! JSON configuration for building a [`Session`].

// self
use crate::{
	_prelude::*,
	auth::{OAuthCredentials, TokenSecret},
	error::ConfigError,
	session::Session,
	transaction::TransactionKeyState,
};

/// Everything the pipeline needs to start a session.
///
/// ```json
/// {
///   "bearer_token": "AAAA...",
///   "oauth": { "token": "...", "secret": "..." },
///   "transaction_keys": { "key": "...", "key_bytes": [5, 124], "animation_key": "...",
///                         "random_keyword": "...", "random_number": 3 },
///   "request_pace_seconds": 2
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
	/// Static bearer token.
	pub bearer_token: TokenSecret,
	/// OAuth1 access token pair of a logged-in account.
	#[serde(default)]
	pub oauth: Option<OAuthCredentials>,
	/// Integrity key state; requests fail until it is installed.
	#[serde(default)]
	pub transaction_keys: Option<TransactionKeyState>,
	/// Minimum spacing between dispatch starts; `0` disables pacing.
	#[serde(default)]
	pub request_pace_seconds: u64,
	/// Guest activation endpoint override.
	#[serde(default)]
	pub guest_activate_url: Option<Url>,
}
impl SessionConfig {
	/// Creates a configuration with only a bearer token set.
	pub fn new(bearer_token: impl Into<TokenSecret>) -> Self {
		Self {
			bearer_token: bearer_token.into(),
			oauth: None,
			transaction_keys: None,
			request_pace_seconds: 0,
			guest_activate_url: None,
		}
	}

	/// Parses a JSON configuration document.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Parse { source })
	}

	/// Reads and parses a JSON configuration document from disk.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;

		Self::from_json_str(&raw)
	}

	/// Builds the session described by this configuration.
	pub fn into_session(self) -> Session {
		let mut session = Session::new(self.bearer_token).with_request_pace(self.request_pace_seconds);

		if let Some(url) = self.guest_activate_url {
			session = session.with_guest_activate_url(url);
		}

		if let Some(oauth) = self.oauth {
			session.set_oauth(oauth);
		}
		if let Some(keys) = self.transaction_keys {
			session.set_transaction_keys(keys);
		}

		session
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::session::GUEST_ACTIVATE_URL;

	#[test]
	fn minimal_config_uses_defaults() {
		let config = SessionConfig::from_json_str(r#"{"bearer_token":"AAAA"}"#)
			.expect("Minimal config should parse.");

		assert_eq!(config.request_pace_seconds, 0);
		assert!(config.guest_activate_url.is_none());

		let session = config.into_session();

		assert_eq!(
			session.guest_activate_url().expect("Default endpoint should parse.").as_str(),
			GUEST_ACTIVATE_URL
		);

		assert_eq!(session.bearer_token().expose(), "AAAA");
		assert!(session.transaction_keys().is_none());
		assert!(!session.oauth_ready());
	}

	#[test]
	fn full_config_builds_session() {
		let session = SessionConfig::from_json_str(
			r#"{
				"bearer_token": "AAAA",
				"oauth": {"token": "t", "secret": "s"},
				"transaction_keys": {"key": "k", "random_number": 3},
				"request_pace_seconds": 2,
				"guest_activate_url": "http://127.0.0.1:9/activate.json"
			}"#,
		)
		.expect("Full config should parse.")
		.into_session();

		assert!(session.oauth_ready());
		assert_eq!(session.request_pace_secs(), 2);
		assert_eq!(
			session.guest_activate_url().expect("Override should be kept.").path(),
			"/activate.json"
		);
		assert_eq!(session.transaction_keys().map(|keys| keys.key), Some("k".into()));
	}

	#[test]
	fn parse_errors_name_the_field() {
		let err = SessionConfig::from_json_str(r#"{"bearer_token":"AAAA","request_pace_seconds":-1}"#)
			.expect_err("Negative pacing should be rejected.");

		assert!(matches!(err, ConfigError::Parse { .. }));
		assert!(err.to_string().contains("request_pace_seconds"));

		let err = SessionConfig::from_path("/nonexistent/x-session.json")
			.expect_err("Missing file should fail.");

		assert!(matches!(err, ConfigError::Read(_)));
	}
}
