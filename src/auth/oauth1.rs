//! OAuth1 request signing seam plus the built-in HMAC-SHA1 signer.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::{OAuthCredentials, TokenSecret},
};

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const NONCE_LEN: usize = 32;

/// Failures reported by an [`OAuth1Signer`].
#[derive(Debug, ThisError)]
pub enum SignatureError {
	/// The signing key could not initialize the MAC.
	#[error("OAuth1 signing key was rejected by the MAC implementation.")]
	InvalidKey,
}

/// Produces the `Authorization` header value for an OAuth1-signed request.
pub trait OAuth1Signer
where
	Self: Send + Sync,
{
	/// Signs `method` + `url` with the account's access token pair.
	fn authorization(
		&self,
		method: &Method,
		url: &Url,
		credentials: &OAuthCredentials,
	) -> Result<String, SignatureError>;
}

/// HMAC-SHA1 signer holding the consumer (application) key pair.
#[derive(Clone, Debug)]
pub struct HmacSha1Signer {
	consumer_key: String,
	consumer_secret: TokenSecret,
}
impl HmacSha1Signer {
	/// Creates a signer for the given consumer key pair.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<TokenSecret>) -> Self {
		Self { consumer_key: consumer_key.into(), consumer_secret: consumer_secret.into() }
	}

	/// Signs with a caller-supplied nonce and Unix timestamp.
	pub fn sign_with(
		&self,
		method: &Method,
		url: &Url,
		credentials: &OAuthCredentials,
		nonce: &str,
		timestamp: i64,
	) -> Result<String, SignatureError> {
		let timestamp = timestamp.to_string();
		let mut oauth_params = vec![
			("oauth_consumer_key", self.consumer_key.as_str()),
			("oauth_nonce", nonce),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", timestamp.as_str()),
			("oauth_token", credentials.token.expose()),
			("oauth_version", "1.0"),
		];
		let base = signature_base_string(method, url, &oauth_params);
		let key = format!(
			"{}&{}",
			encode(self.consumer_secret.expose()),
			encode(credentials.secret.expose())
		);
		let mut mac =
			Hmac::<Sha1>::new_from_slice(key.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;

		mac.update(base.as_bytes());

		let signature = STANDARD.encode(mac.finalize().into_bytes());

		oauth_params.push(("oauth_signature", signature.as_str()));
		oauth_params.sort_unstable();

		let fields = oauth_params
			.iter()
			.map(|(k, v)| format!("{k}=\"{}\"", encode(v)))
			.collect::<Vec<_>>()
			.join(", ");

		Ok(format!("OAuth {fields}"))
	}
}
impl OAuth1Signer for HmacSha1Signer {
	fn authorization(
		&self,
		method: &Method,
		url: &Url,
		credentials: &OAuthCredentials,
	) -> Result<String, SignatureError> {
		let nonce = rand::rng()
			.sample_iter(Alphanumeric)
			.take(NONCE_LEN)
			.map(char::from)
			.collect::<String>();

		self.sign_with(method, url, credentials, &nonce, OffsetDateTime::now_utc().unix_timestamp())
	}
}

fn encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Builds the RFC 5849 signature base string from the method, the URL (query parameters are
/// folded into the parameter list), and the protocol parameters.
fn signature_base_string(method: &Method, url: &Url, oauth_params: &[(&str, &str)]) -> String {
	let mut params = url
		.query_pairs()
		.map(|(k, v)| (encode(&k), encode(&v)))
		.chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
		.collect::<Vec<_>>();

	params.sort_unstable();

	let normalized =
		params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
	let mut base_url = url.clone();

	base_url.set_query(None);
	base_url.set_fragment(None);

	format!(
		"{}&{}&{}",
		method.as_str().to_ascii_uppercase(),
		encode(base_url.as_str()),
		encode(&normalized)
	)
}
