//! Session-level error types shared by the preparer, dispatcher, and guest flow.

// self
use crate::{_prelude::*, auth::SignatureError, transaction::TransactionIdError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Platform failures carry the raw response body because the platform offers no structured
/// error codes; callers match on its content (`"suspended"`, `"not found"`, ...).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Integrity token provider failed; surfaced unchanged.
	#[error(transparent)]
	TokenGeneration(#[from] TransactionIdError),
	/// OAuth1 signer failed.
	#[error(transparent)]
	Signature(#[from] SignatureError),

	/// No usable transaction key state is installed on the session.
	#[error("Transaction key state is missing or empty.")]
	MissingKeyState,
	/// Platform answered with a non-200 status.
	#[error("API error: {status_text}: {body}")]
	Api {
		/// Numeric HTTP status.
		status: u16,
		/// Canonical reason phrase for the status.
		status_text: String,
		/// Raw response body.
		body: String,
	},
	/// A 200 response carried a payload that does not match the requested shape.
	#[error("Response body could not be decoded: {source}.")]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Guest activation endpoint answered with a non-200 status.
	#[error("Guest activation failed with status {status}: {body}")]
	GuestActivation {
		/// Numeric HTTP status.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Guest activation response lacks a string `guest_token` field, or no guest token is
	/// available when the guest scheme was selected.
	#[error("Guest token not found.")]
	GuestTokenMissing,
}
impl Error {
	/// Returns the raw platform response body for API and guest activation failures.
	pub fn api_body(&self) -> Option<&str> {
		match self {
			Self::Api { body, .. } | Self::GuestActivation { body, .. } => Some(body),
			_ => None,
		}
	}

	/// Returns the HTTP status attached to platform failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } | Self::GuestActivation { status, .. } => Some(*status),
			_ => None,
		}
	}

	pub(crate) fn decode(source: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Decode { source }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A computed header value contains bytes HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: reqwest::header::InvalidHeaderValue,
	},
	/// OAuth1 credentials are installed but no signer was configured.
	#[error("OAuth1 credentials are set but no signer is configured.")]
	MissingSigner,
	/// An endpoint URL could not be parsed.
	#[error("Endpoint URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parse failure.
		#[source]
		source: url::ParseError,
	},
	/// Configuration document could not be read.
	#[error("Configuration file could not be read.")]
	Read(#[from] std::io::Error),
	/// Configuration document is malformed.
	#[error("Configuration is malformed: {source}.")]
	Parse {
		/// Structured parsing failure including the field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	pub(crate) fn invalid_header(
		name: &'static str,
		source: reqwest::header::InvalidHeaderValue,
	) -> Self {
		Self::InvalidHeader { name, source }
	}

	pub(crate) fn parse_url(raw: &str) -> Result<Url, Self> {
		Url::parse(raw).map_err(|source| Self::InvalidUrl { url: raw.into(), source })
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
