//! Basic-credential validation against the token service profile endpoint.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	broker::{AuthorityBroker, record_result},
	obs::{self, Operation, OperationOutcome, OperationSpan},
	rest::{Authorization, RestClient, RestRequest},
};

impl<C> AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	/// Checks whether `credential` authenticates against the account behind `target`.
	///
	/// Structurally incomplete credentials are precondition errors, never `Ok(false)`. Once
	/// the request goes out, only HTTP 200 means valid; every other status means invalid, and
	/// transport faults are swallowed into `Ok(false)` since an unreachable service cannot
	/// vouch for a credential. Validation is read-only and idempotent.
	pub async fn validate_credentials(
		&self,
		target: &Url,
		credential: &Credential,
	) -> Result<bool> {
		const OPERATION: Operation = Operation::CredentialValidation;

		let span = OperationSpan::new(OPERATION, "validate_credentials");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				credential.ensure_complete()?;

				let url = self.config.profile_url()?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					url = %target,
					username = credential.username(),
					"Validating basic credentials.",
				);
				#[cfg(not(feature = "tracing"))]
				let _ = target;

				let request = RestRequest::get(
					url,
					Authorization::basic(credential.basic_authorization()),
				);

				match self.rest_client.execute(request).await {
					Ok(response) => Ok(response.is_ok()),
					Err(error) => {
						obs::record_swallowed_error(OPERATION, &error);

						Ok(false)
					},
				}
			})
			.await;

		record_result(OPERATION, &result);

		result
	}
}
