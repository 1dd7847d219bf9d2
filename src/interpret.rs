//! Response interpretation: status classification, rate-limit bookkeeping, and JSON decoding.

// self
use crate::{_prelude::*, http::ApiResponse, obs, rate_limit::RateLimitStatus, session::Session};

/// Classifies `response` and applies its side effects to `session`.
///
/// The rate-limit snapshot is recorded first, so an exhausted budget empties the guest token
/// whatever the status. Non-200 responses become [`Error::Api`] carrying the status text and
/// the raw body; they are never decoded. On success the raw body is returned for decoding.
pub fn interpret(session: &Session, response: ApiResponse) -> Result<Vec<u8>> {
	if let Some(status) = RateLimitStatus::from_headers(&response.headers) {
		if status.is_exhausted() {
			session.invalidate_guest_token();
			obs::record_guest_invalidated();
		}

		session.record_rate_limit(status);
	}

	if response.status != StatusCode::OK {
		return Err(Error::Api {
			status: response.status.as_u16(),
			status_text: response.status_text(),
			body: response.body_text(),
		});
	}

	Ok(response.body)
}

/// Decodes a success payload into `T`, reporting the failing JSON path on mismatch.
pub fn decode<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de).map_err(Error::decode)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, rate_limit::RATE_LIMIT_REMAINING};

	#[derive(Debug, Deserialize)]
	struct User {
		id_str: String,
		screen_name: String,
	}

	fn response(status: StatusCode, remaining: Option<&'static str>, body: &str) -> ApiResponse {
		let mut headers = HeaderMap::new();

		if let Some(value) = remaining {
			headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static(value));
		}

		ApiResponse::new(status, headers, body)
	}

	#[test]
	fn suspended_account_surfaces_raw_body() {
		let session = build_test_session();
		let body = r#"{"errors":[{"message":"User has been suspended"}]}"#;
		let err = interpret(&session, response(StatusCode::FORBIDDEN, None, body))
			.expect_err("403 should fail.");

		assert!(err.to_string().contains("suspended"));
		assert!(err.to_string().contains("Forbidden"));
		assert_eq!(err.api_body(), Some(body));
		assert!(matches!(err, Error::Api { status: 403, .. }));
	}

	#[test]
	fn non_200_success_family_is_still_an_error() {
		let session = build_test_session();
		let err = interpret(&session, response(StatusCode::NO_CONTENT, None, ""))
			.expect_err("Only 200 counts as success.");

		assert_eq!(err.status(), Some(204));
	}

	#[test]
	fn exhausted_budget_clears_guest_token_on_success() {
		let session = build_test_session();

		session.set_guest_token("guest-1", OffsetDateTime::now_utc());

		let body = interpret(&session, response(StatusCode::OK, Some("0"), "{}"))
			.expect("200 should succeed.");

		assert_eq!(body, b"{}");
		assert!(session.guest_token().is_empty());
		assert!(session.rate_limit().is_some_and(|status| status.is_exhausted()));
	}

	#[test]
	fn exhausted_budget_clears_guest_token_on_error() {
		let session = build_test_session();

		session.set_guest_token("guest-1", OffsetDateTime::now_utc());

		let _ = interpret(&session, response(StatusCode::TOO_MANY_REQUESTS, Some("0"), "{}"));

		assert!(session.guest_token().is_empty());
	}

	#[test]
	fn remaining_budget_keeps_guest_token() {
		let session = build_test_session();

		session.set_guest_token("guest-1", OffsetDateTime::now_utc());

		interpret(&session, response(StatusCode::OK, Some("12"), "{}"))
			.expect("200 should succeed.");

		assert_eq!(session.guest_token().expose(), "guest-1");
	}

	#[test]
	fn decode_reports_path_of_bad_field() {
		let user: User = decode(br#"{"id_str":"106037940","screen_name":"nomadic_ua"}"#)
			.expect("Well-formed payload should decode.");

		assert_eq!(user.id_str, "106037940");
		assert_eq!(user.screen_name, "nomadic_ua");

		let err = decode::<User>(br#"{"id_str":1,"screen_name":"x"}"#)
			.expect_err("Numeric id_str should be rejected.");

		assert!(matches!(err, Error::Decode { .. }));
		assert!(err.to_string().contains("id_str"));
	}
}
