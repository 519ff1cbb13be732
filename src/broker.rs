//! The authority broker and its five operations.

mod acquire;
mod pat;
mod validate;

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	engine::AuthorizationEngine,
	error::PreconditionError,
	rest::RestClient,
};
#[cfg(feature = "reqwest")] use crate::rest::ReqwestRestClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestAuthorityBroker = AuthorityBroker<ReqwestRestClient>;

/// Coordinates token acquisition, PAT issuance, and credential validation against a single
/// authority host.
///
/// The broker owns the REST transport, the injected authorization engine, and its
/// configuration so individual operations can focus on endpoint resolution, result
/// normalization, and response contracts. It holds no mutable shared state across calls; every
/// operation is independent and idempotent, and repeating a failed acquisition is always safe.
/// The token cache shared across acquisition calls belongs to the engine, not the broker.
#[derive(Clone)]
pub struct AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	/// Authorization engine performing the actual protocol exchange.
	pub engine: Arc<dyn AuthorizationEngine>,
	/// REST transport used for PAT issuance and credential validation.
	pub rest_client: Arc<C>,
	/// Construction-time configuration.
	pub config: BrokerConfig,
}
impl<C> AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	/// Creates a broker that reuses the caller-provided REST transport.
	pub fn with_rest_client(
		engine: Arc<dyn AuthorizationEngine>,
		rest_client: impl Into<Arc<C>>,
		config: BrokerConfig,
	) -> Self {
		Self { engine, rest_client: rest_client.into(), config }
	}
}
#[cfg(feature = "reqwest")]
impl AuthorityBroker<ReqwestRestClient> {
	/// Creates a broker with the default reqwest transport and default configuration.
	pub fn new(engine: Arc<dyn AuthorizationEngine>) -> Self {
		Self::with_config(engine, BrokerConfig::default())
	}

	/// Creates a broker with the default reqwest transport and the provided configuration.
	pub fn with_config(engine: Arc<dyn AuthorizationEngine>, config: BrokerConfig) -> Self {
		Self::with_rest_client(engine, ReqwestRestClient::default(), config)
	}
}
impl<C> Debug for AuthorityBroker<C>
where
	C: ?Sized + RestClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorityBroker").field("config", &self.config).finish_non_exhaustive()
	}
}

/// Records the success/failure outcome for a finished operation.
pub(crate) fn record_result<T>(operation: crate::obs::Operation, result: &Result<T>) {
	use crate::obs::{self, OperationOutcome};

	match result {
		Ok(_) => obs::record_operation_outcome(operation, OperationOutcome::Success),
		Err(_) => obs::record_operation_outcome(operation, OperationOutcome::Failure),
	}
}

/// Guards the client/resource preconditions shared by every acquisition path.
pub(crate) fn ensure_request_inputs(
	client_id: &str,
	resource: &str,
) -> Result<(), PreconditionError> {
	if client_id.is_empty() {
		return Err(PreconditionError::EmptyClientId);
	}
	if resource.is_empty() {
		return Err(PreconditionError::EmptyResource);
	}

	Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
	// self
	use super::*;
	use crate::{
		auth::Credential,
		authority::AuthorityEndpoint,
		engine::{AuthResult, EngineFuture},
		error::AuthorityError,
		rest::{RestFuture, RestRequest},
	};

	/// Engine double that records the authority endpoints it was handed.
	pub(crate) struct MockEngine {
		pub(crate) seen_authorities: RwLock<Vec<String>>,
		pub(crate) result: Result<AuthResult, String>,
	}
	impl MockEngine {
		pub(crate) fn succeeding(result: AuthResult) -> Self {
			Self { seen_authorities: RwLock::new(Vec::new()), result: Ok(result) }
		}

		pub(crate) fn failing(reason: &str) -> Self {
			Self { seen_authorities: RwLock::new(Vec::new()), result: Err(reason.to_owned()) }
		}

		fn answer(&self, authority: &AuthorityEndpoint) -> Result<AuthResult> {
			self.seen_authorities.write().push(authority.as_str().to_owned());

			match &self.result {
				Ok(result) => Ok(result.clone()),
				Err(reason) => Err(AuthorityError::Rejected { reason: reason.clone() }.into()),
			}
		}
	}
	impl AuthorizationEngine for MockEngine {
		fn authenticate_interactive(
			&self,
			authority: &AuthorityEndpoint,
			_resource: &str,
			_client_id: &str,
			_redirect_uri: &Url,
			_extra_query: Option<&str>,
		) -> Result<AuthResult> {
			self.answer(authority)
		}

		fn authenticate_with_credentials<'a>(
			&'a self,
			authority: &'a AuthorityEndpoint,
			_resource: &'a str,
			_client_id: &'a str,
			_credential: Option<&'a Credential>,
		) -> EngineFuture<'a, AuthResult> {
			let answer = self.answer(authority);

			Box::pin(async move { answer })
		}

		fn authenticate_with_refresh_token<'a>(
			&'a self,
			authority: &'a AuthorityEndpoint,
			_refresh_token: &'a str,
			_client_id: &'a str,
			_resource: &'a str,
		) -> EngineFuture<'a, AuthResult> {
			let answer = self.answer(authority);

			Box::pin(async move { answer })
		}
	}

	/// REST transport double that panics: acquisition paths must never touch REST.
	pub(crate) struct NoRestClient;
	impl RestClient for NoRestClient {
		fn execute(&self, request: RestRequest) -> RestFuture<'_> {
			panic!("Acquisition paths must not issue REST calls; got {:?}.", request.method);
		}
	}

	pub(crate) fn broker_with_engine(engine: Arc<MockEngine>) -> AuthorityBroker<NoRestClient> {
		AuthorityBroker::with_rest_client(engine, Arc::new(NoRestClient), BrokerConfig::default())
	}

	#[test]
	fn request_input_guards_fire_before_any_network_call() {
		assert_eq!(ensure_request_inputs("", "resource"), Err(PreconditionError::EmptyClientId));
		assert_eq!(ensure_request_inputs("client", ""), Err(PreconditionError::EmptyResource));
		assert!(ensure_request_inputs("client", "resource").is_ok());
	}
}
