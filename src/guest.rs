//! Guest token bootstrap: anonymous session credential used before any login.
//!
//! Activation is a bare `POST` carrying only the static bearer token; no integrity token or
//! CSRF header is attached because the call precedes session establishment.

// self
use crate::{
	_prelude::*,
	http::HttpTransport,
	obs::{self, OpKind, OpOutcome, OpSpan},
	prepare,
	session::Session,
};

#[derive(Deserialize)]
struct ActivationBody {
	guest_token: Option<serde_json::Value>,
}

/// Activates a guest token and stores it on `session`, stamped with the current time.
pub async fn acquire_guest_token<T>(session: &Session, transport: &T) -> Result<()>
where
	T: ?Sized + HttpTransport,
{
	const KIND: OpKind = OpKind::GuestActivation;

	let url = session.guest_activate_url()?;
	let span = OpSpan::new(KIND, url.path());

	obs::record_op_outcome(KIND, OpOutcome::Attempt);

	let result: Result<()> = span
		.instrument(async {
			let mut request = Request::new(Method::POST, url);

			prepare::insert_header(&mut request, "authorization", &prepare::bearer(session))?;

			let response = transport.execute(request).await?;

			if response.status != StatusCode::OK {
				return Err(Error::GuestActivation {
					status: response.status.as_u16(),
					body: response.body_text(),
				});
			}

			let token = parse_activation(&response.body)?;

			session.set_guest_token(token, OffsetDateTime::now_utc());

			Ok(())
		})
		.await;

	obs::record_result(KIND, &result);

	result
}

fn parse_activation(body: &[u8]) -> Result<String> {
	let body: ActivationBody = crate::interpret::decode(body)?;

	match body.guest_token {
		Some(serde_json::Value::String(token)) => Ok(token),
		_ => Err(Error::GuestTokenMissing),
	}
}
