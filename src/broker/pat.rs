//! Personal access token issuance against the token service REST endpoint.

// self
use crate::{
	_prelude::*,
	auth::{PatFormat, Token, TokenKind, TokenScope},
	broker::{AuthorityBroker, record_result},
	error::{AuthorityError, MalformedResponseError},
	obs::{self, Operation, OperationOutcome, OperationSpan},
	rest::{Authorization, RestClient, RestRequest},
};

#[derive(Debug, Deserialize)]
struct SessionTokenResponse {
	token: String,
}

impl<C> AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	/// Mints a personal access token scoped to `scope` for the account behind `target`.
	///
	/// The supplied `access_token` must be of kind [`TokenKind::Access`] with a non-empty
	/// value; violations fail fast before any network call. Only HTTP 200 with a populated
	/// `token` field counts as success. Issuance is not idempotent: every successful call
	/// mints a distinct token on the service side, so retry only after a failure.
	pub async fn issue_personal_access_token(
		&self,
		target: &Url,
		access_token: &Token,
		scope: &TokenScope,
		format: PatFormat,
	) -> Result<Token> {
		const OPERATION: Operation = Operation::PatIssuance;

		let span = OperationSpan::new(OPERATION, "issue_personal_access_token");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				access_token.ensure_kind(TokenKind::Access)?;

				let url = self.config.session_token_url(format)?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					url = %target,
					scope = scope.as_str(),
					compact = format.is_compact(),
					"Requesting a personal access token.",
				);
				#[cfg(not(feature = "tracing"))]
				let _ = target;

				let body = serde_json::json!({ "scope": scope.as_str() });
				let request = RestRequest::post_json(
					url,
					Authorization::bearer(access_token.secret().clone()),
					body.to_string().into_bytes(),
				);
				let response = self.rest_client.execute(request).await?;

				if !response.is_ok() {
					return Err(AuthorityError::PatIssuanceRejected {
						status: response.status,
					}
					.into());
				}

				let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
				let decoded: SessionTokenResponse =
					serde_path_to_error::deserialize(&mut deserializer)
						.map_err(|source| MalformedResponseError::SessionToken { source })?;

				if decoded.token.is_empty() {
					return Err(MalformedResponseError::EmptySessionToken.into());
				}

				Ok(Token::personal(decoded.token))
			})
			.await;

		record_result(OPERATION, &result);

		result
	}
}
