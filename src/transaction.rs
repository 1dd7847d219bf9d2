//! Integrity token contracts: the key material captured from the web client and the strategy
//! that turns it into a per-request `x-client-transaction-id` value.
//!
//! The derivation itself lives outside this crate. Callers plug a [`TransactionIdProvider`]
//! into the dispatcher; the preparer only guarantees that key state is present before the
//! provider is consulted and that provider failures reach the caller unchanged.

// self
use crate::{_prelude::*, error::ConfigError};

/// Key material scraped from the web client's home page and on-demand script.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionKeyState {
	/// Verification key published in the home page markup.
	pub key: String,
	/// Decoded bytes of [`Self::key`].
	#[serde(default)]
	pub key_bytes: Vec<u8>,
	/// Animation key derived from the SVG frames.
	#[serde(default)]
	pub animation_key: String,
	/// Keyword mixed into the hash input.
	#[serde(default)]
	pub random_keyword: String,
	/// Extra byte appended to the token payload.
	#[serde(default)]
	pub random_number: i64,
}
impl TransactionKeyState {
	/// Returns `true` when no verification key is present.
	pub fn is_empty(&self) -> bool {
		self.key.is_empty()
	}

	/// Parses a key state dump.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Parse { source })
	}

	/// Reads and parses a key state dump from disk.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;

		Self::from_json_str(&raw)
	}
}
impl Debug for TransactionKeyState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TransactionKeyState")
			.field("key", &"<redacted>")
			.field("key_bytes_len", &self.key_bytes.len())
			.field("animation_key_set", &!self.animation_key.is_empty())
			.finish()
	}
}

/// Failures reported by a [`TransactionIdProvider`].
#[derive(Debug, ThisError)]
pub enum TransactionIdError {
	/// Key state is present but cannot drive the derivation.
	#[error("Transaction key state is malformed: {reason}.")]
	Malformed {
		/// Provider-supplied description.
		reason: String,
	},
	/// Provider-specific failure.
	#[error("Transaction id generation failed.")]
	Provider {
		/// Underlying failure.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
}
impl TransactionIdError {
	/// Builds a [`TransactionIdError::Malformed`] value.
	pub fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed { reason: reason.into() }
	}

	/// Wraps a provider-specific failure.
	pub fn provider(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Provider { source: Box::new(src) }
	}
}

/// Strategy producing the opaque `x-client-transaction-id` value for one request.
pub trait TransactionIdProvider
where
	Self: Send + Sync,
{
	/// Derives the token for `method` + `path` from the installed key state.
	fn generate(
		&self,
		keys: &TransactionKeyState,
		method: &Method,
		path: &str,
	) -> Result<String, TransactionIdError>;
}
impl<F> TransactionIdProvider for F
where
	F: Send + Sync + Fn(&TransactionKeyState, &Method, &str) -> Result<String, TransactionIdError>,
{
	fn generate(
		&self,
		keys: &TransactionKeyState,
		method: &Method,
		path: &str,
	) -> Result<String, TransactionIdError> {
		self(keys, method, path)
	}
}
