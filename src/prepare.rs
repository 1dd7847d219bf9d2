//! Request preparation: browser headers, integrity token, authorization, and CSRF mirroring.

// self
use crate::{
	_prelude::*,
	auth::{AuthPolicy, AuthScheme, OAuth1Signer, OAuthCredentials},
	error::ConfigError,
	session::{CSRF_COOKIE, Session},
	transaction::TransactionIdProvider,
};

/// Header carrying the per-request integrity token.
pub const TRANSACTION_ID_HEADER: &str = "x-client-transaction-id";
/// Header mirroring the CSRF cookie.
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Header carrying the guest token under [`AuthScheme::Guest`].
pub const GUEST_TOKEN_HEADER: &str = "x-guest-token";
/// Static headers a desktop browser sends to the web API.
pub const BROWSER_HEADERS: [(&str, &str); 7] = [
	("authority", "x.com"),
	("accept-language", "en-US,en;q=0.9"),
	("cache-control", "no-cache"),
	("referer", "https://x.com"),
	(
		"user-agent",
		"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
	),
	("x-twitter-active-user", "yes"),
	("x-twitter-client-language", "en"),
];

/// Applies the header transformations every outbound request needs.
///
/// Preparation only touches the request's headers. A failure at any step leaves the request
/// unfit for dispatch.
#[derive(Clone)]
pub struct RequestPreparer {
	transaction_ids: Arc<dyn TransactionIdProvider>,
	signer: Option<Arc<dyn OAuth1Signer>>,
	policy: AuthPolicy,
}
impl RequestPreparer {
	/// Creates a preparer with the given integrity token strategy and the default policy.
	pub fn new(transaction_ids: Arc<dyn TransactionIdProvider>) -> Self {
		Self { transaction_ids, signer: None, policy: AuthPolicy::default() }
	}

	/// Sets the OAuth1 signer used once the session carries a complete OAuth1 pair.
	pub fn with_signer(mut self, signer: Arc<dyn OAuth1Signer>) -> Self {
		self.signer = Some(signer);

		self
	}

	/// Overrides the scheme selection policy.
	pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Scheme selection policy.
	pub fn policy(&self) -> AuthPolicy {
		self.policy
	}

	/// Scheme the next request against `session` would use.
	pub fn select_scheme(&self, session: &Session) -> AuthScheme {
		self.policy.select(session.oauth_ready(), session.is_logged_in())
	}

	/// Prepares `request` for dispatch and returns the scheme it was authorized with.
	pub fn prepare(&self, session: &Session, request: &mut Request) -> Result<AuthScheme> {
		let headers = request.headers_mut();

		for (name, value) in BROWSER_HEADERS {
			headers.insert(name, HeaderValue::from_static(value));
		}

		self.set_transaction_id(session, request)?;

		let oauth = session.oauth().filter(OAuthCredentials::is_complete);
		let scheme = self.policy.select(oauth.is_some(), session.is_logged_in());

		self.set_authorization(session, request, scheme, oauth.as_ref())?;
		set_csrf_token(session, request)?;

		Ok(scheme)
	}

	fn set_transaction_id(&self, session: &Session, request: &mut Request) -> Result<()> {
		let method = request.method().clone();
		let token = session
			.with_transaction_keys(|keys| {
				self.transaction_ids.generate(keys, &method, request.url().path())
			})
			.ok_or(Error::MissingKeyState)??;

		insert_header(request, TRANSACTION_ID_HEADER, &token)
	}

	fn set_authorization(
		&self,
		session: &Session,
		request: &mut Request,
		scheme: AuthScheme,
		oauth: Option<&OAuthCredentials>,
	) -> Result<()> {
		let value = match (scheme, oauth) {
			(AuthScheme::OAuth1, Some(credentials)) => {
				let signer = self.signer.as_ref().ok_or(ConfigError::MissingSigner)?;

				signer.authorization(request.method(), request.url(), credentials)?
			},
			(AuthScheme::OAuth1, None) | (AuthScheme::Bearer, _) => bearer(session),
			(AuthScheme::Guest, _) => {
				let guest = session.guest_token();

				if guest.is_empty() {
					return Err(Error::GuestTokenMissing);
				}

				insert_header(request, GUEST_TOKEN_HEADER, guest.expose())?;

				bearer(session)
			},
		};

		insert_header(request, "authorization", &value)
	}
}
impl Debug for RequestPreparer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestPreparer")
			.field("policy", &self.policy)
			.field("signer_set", &self.signer.is_some())
			.finish()
	}
}

/// `Bearer <token>` header value for the session's static token.
pub(crate) fn bearer(session: &Session) -> String {
	format!("Bearer {}", session.bearer_token().expose())
}

fn set_csrf_token(session: &Session, request: &mut Request) -> Result<()> {
	match session.cookie(CSRF_COOKIE, request.url()) {
		Some(value) => insert_header(request, CSRF_HEADER, &value),
		None => Ok(()),
	}
}

pub(crate) fn insert_header(request: &mut Request, name: &'static str, value: &str) -> Result<()> {
	let value =
		HeaderValue::from_str(value).map_err(|e| ConfigError::invalid_header(name, e))?;

	request.headers_mut().insert(name, value);

	Ok(())
}
