#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use authority_broker::{
	auth::{PatFormat, Token, TokenKind, TokenScope},
	broker::AuthorityBroker,
	cache::MemoryTokenCache,
	config::BrokerConfig,
	engine::OAuth2Engine,
	error::{AuthorityError, Error, MalformedResponseError, ResultExt},
	rest::ReqwestRestClient,
};

const SESSION_TOKEN_PATH: &str = "/_apis/token/sessiontokens";

fn build_broker(server: &MockServer) -> AuthorityBroker<ReqwestRestClient> {
	let engine = Arc::new(OAuth2Engine::new(Arc::new(MemoryTokenCache::default())));
	let service_url =
		Url::parse(&server.base_url()).expect("Mock service root should parse successfully.");
	let config = BrokerConfig::default().with_token_service_url(service_url);

	AuthorityBroker::with_config(engine, config)
}

fn target() -> Url {
	Url::parse("https://dev.azure.com/org").expect("Target fixture should parse.")
}

fn scope() -> TokenScope {
	TokenScope::new("vso.code_write").expect("Scope fixture should be valid.")
}

#[tokio::test]
async fn issuance_posts_the_scope_and_decodes_the_session_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(SESSION_TOKEN_PATH)
				.query_param("api-version", "1.0")
				.header("authorization", "Bearer at-1")
				.header("content-type", "application/json")
				.json_body(json!({ "scope": "vso.code_write" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"pat-issued\"}");
		})
		.await;
	let broker = build_broker(&server);
	let pat = broker
		.issue_personal_access_token(&target(), &Token::access("at-1"), &scope(), PatFormat::Full)
		.await
		.expect("Personal access token issuance should succeed.");

	mock.assert_async().await;

	assert_eq!(pat.kind(), TokenKind::Personal);
	assert_eq!(pat.secret().expose(), "pat-issued");
}

#[tokio::test]
async fn compact_issuance_requests_the_compact_token_type() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(SESSION_TOKEN_PATH)
				.query_param("api-version", "1.0")
				.query_param("tokentype", "compact");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"pat-compact\"}");
		})
		.await;
	let broker = build_broker(&server);
	let pat = broker
		.issue_personal_access_token(
			&target(),
			&Token::access("at-1"),
			&scope(),
			PatFormat::Compact,
		)
		.await
		.expect("Compact personal access token issuance should succeed.");

	mock.assert_async().await;

	assert_eq!(pat.secret().expose(), "pat-compact");
}

#[tokio::test]
async fn rejected_issuance_surfaces_the_status_and_collapses_to_absence() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(SESSION_TOKEN_PATH);
			then.status(403).body("access denied");
		})
		.await;

	let broker = build_broker(&server);
	let err = broker
		.issue_personal_access_token(&target(), &Token::access("at-1"), &scope(), PatFormat::Full)
		.await
		.expect_err("HTTP 403 must surface as an authority rejection.");

	assert!(matches!(
		err,
		Error::Authority(AuthorityError::PatIssuanceRejected { status: 403 }),
	));
	assert!(
		broker
			.issue_personal_access_token(
				&target(),
				&Token::access("at-1"),
				&scope(),
				PatFormat::Full,
			)
			.await
			.or_absent()
			.is_none()
	);
}

#[tokio::test]
async fn responses_without_the_token_field_are_malformed() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(SESSION_TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"tkn\":\"pat-issued\"}");
		})
		.await;

	let broker = build_broker(&server);
	let err = broker
		.issue_personal_access_token(&target(), &Token::access("at-1"), &scope(), PatFormat::Full)
		.await
		.expect_err("A body without the token field must be malformed.");

	assert!(matches!(
		err,
		Error::MalformedResponse(MalformedResponseError::SessionToken { .. }),
	));
}
