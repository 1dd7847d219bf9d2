//! Transport primitives for platform requests.
//!
//! [`HttpTransport`] is the pipeline's only dependency on an HTTP stack. Implementations
//! return a fully buffered [`ApiResponse`], so the connection and body are released before
//! interpretation starts regardless of how the request ends.

// std
use std::ops::Deref;
// crates.io
use reqwest::cookie::Jar;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports that execute prepared requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can serve every
/// concurrent caller of a session.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response.
	fn execute(&self, request: Request) -> TransportFuture<'_>;
}

/// Buffered HTTP response handed to the interpreter.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from its parts.
	pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers, body: body.into() }
	}

	/// Body decoded lossily as UTF-8.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Canonical reason phrase for the status, falling back to the numeric code.
	pub fn status_text(&self) -> String {
		self.status
			.canonical_reason()
			.map(str::to_owned)
			.unwrap_or_else(|| self.status.as_str().to_owned())
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Build it with [`ReqwestTransport::with_cookie_jar`] from the session's jar so `Set-Cookie`
/// responses (notably the CSRF cookie) are visible to the request preparer.
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The client must have been built with `cookie_provider(session.cookie_jar())`; otherwise
	/// `ct0` never reaches the session and no `X-CSRF-Token` header is sent.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose cookie store is the given jar.
	pub fn with_cookie_jar(jar: Arc<Jar>) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.cookie_provider(jar)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: Request) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.0.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}
