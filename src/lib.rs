//! Browser-faithful request pipeline for X's internal web API: per-request integrity tokens,
//! CSRF mirroring, guest tokens, OAuth1 signing, and request pacing behind one shared session.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod guest;
pub mod http;
pub mod interpret;
pub mod obs;
pub mod pacing;
pub mod prepare;
pub mod rate_limit;
pub mod session;
pub mod transaction;
#[cfg(test)]
pub mod _preludet {
	//! Convenience re-exports and fixtures for unit tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		session::Session,
		transaction::{TransactionIdError, TransactionIdProvider, TransactionKeyState},
	};

	/// Bearer token used by test sessions.
	pub const TEST_BEARER: &str = "test-bearer-token";

	/// Key state captured from a real session; only its shape matters to the pipeline.
	pub fn fixture_key_state() -> TransactionKeyState {
		TransactionKeyState {
			key: "BXzbpo6bveCCmzg0OZygYVlpHchvM4MNqOrgzqKlNkWgzU3niFjfr6fuXbkgVX74".into(),
			key_bytes: vec![
				5, 124, 219, 166, 142, 155, 189, 224, 130, 155, 56, 52, 57, 156, 160, 97, 89, 105,
				29, 200, 111, 51, 131, 13, 168, 234, 224, 206, 162, 165, 54, 69, 160, 205, 77, 231,
				136, 88, 223, 175, 167, 238, 93, 185, 32, 85, 126, 248,
			],
			animation_key: "bf663100100".into(),
			random_keyword: "obfiowerehiring".into(),
			random_number: 3,
		}
	}

	/// Provider that renders `tid:<METHOD>:<path>` so tests can assert what was signed.
	pub fn echo_transaction_ids() -> Arc<dyn TransactionIdProvider> {
		Arc::new(
			|_: &TransactionKeyState,
			 method: &Method,
			 path: &str|
			 -> std::result::Result<String, TransactionIdError> {
				Ok(format!("tid:{method}:{path}"))
			},
		)
	}

	/// Builds a session with the test bearer token and fixture key state.
	pub fn build_test_session() -> Session {
		let session = Session::new(TEST_BEARER);

		session.set_transaction_keys(fixture_key_state());

		session
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::Path,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, Request, StatusCode,
		header::{HeaderMap, HeaderValue},
	};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
