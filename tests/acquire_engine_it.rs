#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use authority_broker::{
	auth::{Credential, Token, TokenKind},
	broker::AuthorityBroker,
	cache::MemoryTokenCache,
	config::BrokerConfig,
	engine::OAuth2Engine,
	error::Error,
	rest::ReqwestRestClient,
};

const CLIENT_ID: &str = "11111111-1111-1111-1111-111111111111";
const RESOURCE: &str = "https://management.core.windows.net/";
// The mock authority host plus the plain target host.
const TOKEN_PATH: &str = "/dev.azure.com/oauth2/token";

fn build_broker(server: &MockServer) -> AuthorityBroker<ReqwestRestClient> {
	let engine = Arc::new(OAuth2Engine::new(Arc::new(MemoryTokenCache::default())));
	let authority_host_url =
		Url::parse(&server.base_url()).expect("Mock authority root should parse successfully.");
	let config = BrokerConfig::default().with_authority_host_url(authority_host_url);

	AuthorityBroker::with_config(engine, config)
}

fn target() -> Url {
	Url::parse("https://dev.azure.com/org").expect("Target fixture should parse.")
}

#[tokio::test]
async fn refresh_exchange_renews_the_token_pair() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes("grant_type=refresh_token")
				.body_includes("refresh_token=rt-old")
				.body_includes("resource=");
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"at-new\",\"refresh_token\":\"rt-new\",\"token_type\":\"bearer\",\"expires_in\":1800}",
				);
		})
		.await;
	let broker = build_broker(&server);
	let pair = broker
		.acquire_by_refresh_token(&target(), CLIENT_ID, RESOURCE, &Token::refresh("rt-old"))
		.await
		.expect("Refresh-based renewal should succeed against the mock authority.");

	mock.assert_async().await;

	assert_eq!(pair.access.kind(), TokenKind::Access);
	assert_eq!(pair.access.secret().expose(), "at-new");
	assert_eq!(pair.refresh.as_ref().map(|token| token.secret().expose()), Some("rt-new"));
	assert!(pair.expires_on.is_some());
}

#[tokio::test]
async fn rejected_refresh_tokens_surface_the_authority_reason() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body(
					"{\"error\":\"invalid_grant\",\"error_description\":\"The refresh token has expired.\"}",
				);
		})
		.await;

	let broker = build_broker(&server);
	let err = broker
		.acquire_by_refresh_token(&target(), CLIENT_ID, RESOURCE, &Token::refresh("rt-stale"))
		.await
		.expect_err("An expired refresh token must be rejected by the authority.");

	assert!(matches!(err, Error::Authority(_)));
	assert!(err.to_string().contains("expired"));
}

#[tokio::test]
async fn credentialed_acquisition_seeds_the_cache_for_silent_calls() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes("grant_type=password")
				.body_includes("username=alice");
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"at-cached\",\"token_type\":\"bearer\",\"expires_in\":1800}",
				);
		})
		.await;
	let broker = build_broker(&server);
	let credential = Credential::new("alice", "hunter2");
	let first = broker
		.acquire_with_credentials(&target(), CLIENT_ID, RESOURCE, Some(&credential))
		.await
		.expect("Credentialed acquisition should succeed against the mock authority.");

	assert_eq!(first.access.secret().expose(), "at-cached");

	// The engine cached the exchange; the silent path must not hit the authority again.
	let silent = broker
		.acquire_with_credentials(&target(), CLIENT_ID, RESOURCE, None)
		.await
		.expect("Silent acquisition should be served from the engine's cache.");

	mock.assert_hits_async(1).await;

	assert_eq!(silent.access.secret().expose(), "at-cached");
}
