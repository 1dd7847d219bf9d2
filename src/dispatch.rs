//! Dispatcher tying pacing, preparation, transport, and interpretation together.
//!
//! Every call passes the session's pacing gate first, refreshes the guest token when the
//! guest scheme applies and the current one is stale, prepares the request, sends it, and
//! hands the buffered response to the interpreter. Errors from each stage reach the caller
//! unchanged; this layer never retries.

// self
use crate::{
	_prelude::*,
	auth::{AuthPolicy, AuthScheme, OAuth1Signer},
	guest,
	http::{HttpTransport, ReqwestTransport},
	interpret,
	obs::{self, OpKind, OpOutcome, OpSpan},
	prepare::RequestPreparer,
	session::Session,
	transaction::TransactionIdProvider,
};

/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Issues platform requests on behalf of one shared [`Session`].
///
/// Clones share the session and transport, so a dispatcher can be handed to any number of
/// concurrent tasks. Guest activation is single-flighted on the session itself, so separate
/// dispatchers bound to one session also share it.
pub struct Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Session state shared with every other dispatcher bound to it.
	pub session: Arc<Session>,
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	preparer: RequestPreparer,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a dispatcher that reuses the caller-provided transport.
	pub fn with_transport(
		session: Arc<Session>,
		transport: impl Into<Arc<T>>,
		transaction_ids: Arc<dyn TransactionIdProvider>,
	) -> Self {
		Self {
			session,
			transport: transport.into(),
			preparer: RequestPreparer::new(transaction_ids),
		}
	}

	/// Sets the OAuth1 signer applied once the session carries a complete OAuth1 pair.
	pub fn with_signer(mut self, signer: Arc<dyn OAuth1Signer>) -> Self {
		self.preparer = self.preparer.with_signer(signer);

		self
	}

	/// Overrides the scheme selection policy.
	pub fn with_auth_policy(mut self, policy: AuthPolicy) -> Self {
		self.preparer = self.preparer.with_policy(policy);

		self
	}

	/// Request preparer used by this dispatcher.
	pub fn preparer(&self) -> &RequestPreparer {
		&self.preparer
	}

	/// Sends `request` and decodes the JSON payload into `D`.
	pub async fn execute<D>(&self, request: Request) -> Result<D>
	where
		D: DeserializeOwned,
	{
		let body = self.dispatch(request).await?;

		interpret::decode(&body)
	}

	/// Sends `request` when the caller needs no payload; the body is checked but not decoded.
	pub async fn execute_discarding(&self, request: Request) -> Result<()> {
		self.dispatch(request).await.map(|_| ())
	}

	/// Activates a fresh guest token unconditionally.
	pub async fn acquire_guest_token(&self) -> Result<()> {
		guest::acquire_guest_token(&self.session, &*self.transport).await
	}

	/// Activates a guest token when the current one is empty or older than three hours.
	///
	/// Concurrent callers on the same session share one activation: late arrivals re-check
	/// freshness after the in-flight activation finishes.
	pub async fn ensure_guest_token(&self) -> Result<()> {
		if self.session.guest_token_is_fresh() {
			return Ok(());
		}

		let _singleflight = self.session.guest_refresh().lock().await;

		if self.session.guest_token_is_fresh() {
			return Ok(());
		}

		self.acquire_guest_token().await
	}

	async fn dispatch(&self, mut request: Request) -> Result<Vec<u8>> {
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, request.url().path());

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result: Result<Vec<u8>> = span
			.instrument(async move {
				self.session.pacer().pass().await;

				if self.preparer.select_scheme(&self.session) == AuthScheme::Guest {
					self.ensure_guest_token().await?;
				}

				let scheme = self.preparer.prepare(&self.session, &mut request)?;

				obs::log_prepared(request.method(), request.url().path(), scheme.as_str());

				let response = self.transport.execute(request).await?;

				interpret::interpret(&self.session, response)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher whose reqwest transport stores cookies in the session's jar.
	pub fn new(
		session: Arc<Session>,
		transaction_ids: Arc<dyn TransactionIdProvider>,
	) -> Result<Self> {
		let transport = ReqwestTransport::with_cookie_jar(session.cookie_jar())?;

		Ok(Self::with_transport(session, transport, transaction_ids))
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			session: Arc::clone(&self.session),
			transport: Arc::clone(&self.transport),
			preparer: self.preparer.clone(),
		}
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("session", &self.session)
			.field("preparer", &self.preparer)
			.finish()
	}
}
