//! The three token acquisition entry points: interactive, credentialed/silent, and
//! refresh-token based.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Token, TokenKind, TokenPair},
	authority::{AuthorityEndpoint, HostMode},
	broker::{AuthorityBroker, ensure_request_inputs, record_result},
	obs::{self, Operation, OperationOutcome, OperationSpan},
	rest::RestClient,
};

impl<C> AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	/// Acquires a token pair interactively, forcing a credential prompt regardless of cached
	/// state.
	///
	/// Blocking from the caller's perspective, since the engine may suspend on user
	/// interaction. The authority endpoint is derived with the DNS-safe host form.
	pub fn acquire_interactive(
		&self,
		target: &Url,
		client_id: &str,
		resource: &str,
		redirect_uri: &Url,
		extra_query: Option<&str>,
	) -> Result<TokenPair> {
		const OPERATION: Operation = Operation::Interactive;

		let span = OperationSpan::new(OPERATION, "acquire_interactive");
		let _guard = span.entered();

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result =
			self.interactive_exchange(target, client_id, resource, redirect_uri, extra_query);

		record_result(OPERATION, &result);

		result
	}

	fn interactive_exchange(
		&self,
		target: &Url,
		client_id: &str,
		resource: &str,
		redirect_uri: &Url,
		extra_query: Option<&str>,
	) -> Result<TokenPair> {
		ensure_request_inputs(client_id, resource)?;

		let authority =
			AuthorityEndpoint::resolve(&self.config.authority_host_url, target, HostMode::DnsSafe)?;
		let auth = self.engine.authenticate_interactive(
			&authority,
			resource,
			client_id,
			redirect_uri,
			extra_query,
		)?;

		TokenPair::from_auth_result(auth)
	}

	/// Acquires a token pair as the supplied user/password pair, or silently as the default
	/// user context (allowing the engine to use cached state) when no credential is given.
	///
	/// The authority endpoint is derived with the plain host form.
	pub async fn acquire_with_credentials(
		&self,
		target: &Url,
		client_id: &str,
		resource: &str,
		credential: Option<&Credential>,
	) -> Result<TokenPair> {
		const OPERATION: Operation = Operation::Credentialed;

		let span = OperationSpan::new(OPERATION, "acquire_with_credentials");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				ensure_request_inputs(client_id, resource)?;

				if let Some(credential) = credential {
					credential.ensure_complete()?;
				}

				let authority = AuthorityEndpoint::resolve(
					&self.config.authority_host_url,
					target,
					HostMode::Plain,
				)?;
				let auth = self
					.engine
					.authenticate_with_credentials(&authority, resource, client_id, credential)
					.await?;

				TokenPair::from_auth_result(auth)
			})
			.await;

		record_result(OPERATION, &result);

		result
	}

	/// Exchanges a refresh token for a new token pair, bypassing interactive and
	/// cached-credential paths.
	///
	/// The `refresh_token` argument must be of kind [`TokenKind::Refresh`] with a non-empty
	/// value; violations fail fast before any network call. The authority endpoint is derived
	/// with the plain host form.
	pub async fn acquire_by_refresh_token(
		&self,
		target: &Url,
		client_id: &str,
		resource: &str,
		refresh_token: &Token,
	) -> Result<TokenPair> {
		const OPERATION: Operation = Operation::RefreshToken;

		let span = OperationSpan::new(OPERATION, "acquire_by_refresh_token");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				ensure_request_inputs(client_id, resource)?;
				refresh_token.ensure_kind(TokenKind::Refresh)?;

				let authority = AuthorityEndpoint::resolve(
					&self.config.authority_host_url,
					target,
					HostMode::Plain,
				)?;
				let auth = self
					.engine
					.authenticate_with_refresh_token(
						&authority,
						refresh_token.secret().expose(),
						client_id,
						resource,
					)
					.await?;

				TokenPair::from_auth_result(auth)
			})
			.await;

		record_result(OPERATION, &result);

		result
	}
}
