//! Shared fixtures for integration tests; the crate's `_preludet` exists only under `cfg(test)`.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use x_session::{
	dispatch::ReqwestDispatcher,
	reqwest::{Method, Request},
	session::Session,
	transaction::{TransactionIdError, TransactionIdProvider, TransactionKeyState},
	url::Url,
};

pub const BEARER: &str = "integration-bearer";
pub const GUEST_PATH: &str = "/1.1/guest/activate.json";

pub fn key_state() -> TransactionKeyState {
	TransactionKeyState {
		key: "BXzbpo6bveCCmzg0OZygYVlpHchvM4MNqOrgzqKlNkWgzU3niFjfr6fuXbkgVX74".into(),
		key_bytes: vec![5, 124, 219, 166, 142, 155, 189, 224],
		animation_key: "bf663100100".into(),
		random_keyword: "obfiowerehiring".into(),
		random_number: 3,
	}
}

/// Provider rendering `tid:<METHOD>:<path>` so mocks can match on it.
pub fn transaction_ids() -> std::sync::Arc<dyn TransactionIdProvider> {
	std::sync::Arc::new(
		|_: &TransactionKeyState, method: &Method, path: &str| -> Result<String, TransactionIdError> {
			Ok(format!("tid:{method}:{path}"))
		},
	)
}

/// Session with key state installed and guest activation pointed at the mock server.
pub fn session_for(server: &MockServer) -> std::sync::Arc<Session> {
	let url = Url::parse(&server.url(GUEST_PATH)).expect("Mock guest URL should parse.");
	let session = Session::new(BEARER).with_guest_activate_url(url);

	session.set_transaction_keys(key_state());

	std::sync::Arc::new(session)
}

pub fn dispatcher(session: std::sync::Arc<Session>) -> ReqwestDispatcher {
	ReqwestDispatcher::new(session, transaction_ids())
		.expect("Reqwest dispatcher should build for tests.")
}

pub fn get(server: &MockServer, path_and_query: &str) -> Request {
	Request::new(
		Method::GET,
		Url::parse(&server.url(path_and_query)).expect("Mock request URL should parse."),
	)
}
