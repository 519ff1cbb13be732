//! Non-interactive [`AuthorizationEngine`] implementation backed by the `oauth2` crate.

// crates.io
use oauth2::{
	AuthUrl, ClientId, EndpointNotSet, EndpointSet, HttpClientError, HttpRequest, HttpResponse,
	RefreshToken, RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse,
	TokenUrl,
	basic::{BasicClient, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	authority::AuthorityEndpoint,
	cache::{CacheKey, TokenCache},
	engine::{AuthResult, AuthorizationEngine, EngineFuture},
	error::{AuthorityError, MalformedResponseError, PreconditionError, TransportError},
	obs::{self, Operation},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Non-interactive engine performing password and refresh-token grants against
/// `<authority>/oauth2/token`.
///
/// The engine owns the token cache shared across acquisition calls: credentialed and refresh
/// exchanges write through it, and silent acquisition without a credential is served from it.
/// Interactive prompts are not supported; [`AuthorizationEngine::authenticate_interactive`]
/// always fails with [`AuthorityError::InteractiveUnsupported`].
pub struct OAuth2Engine {
	http: ReqwestClient,
	cache: Arc<dyn TokenCache>,
}
impl OAuth2Engine {
	/// Creates an engine with a default reqwest client.
	pub fn new(cache: Arc<dyn TokenCache>) -> Self {
		Self::with_client(ReqwestClient::default(), cache)
	}

	/// Creates an engine reusing a caller-configured reqwest client.
	///
	/// Timeouts, proxies, and TLS settings are threaded through this client; the engine itself
	/// adds nothing on top.
	pub fn with_client(client: ReqwestClient, cache: Arc<dyn TokenCache>) -> Self {
		Self { http: client, cache }
	}

	fn oauth_client(
		authority: &AuthorityEndpoint,
		client_id: &str,
	) -> Result<ConfiguredBasicClient> {
		let auth_url = AuthUrl::new(format!("{authority}/oauth2/authorize")).map_err(|_| {
			PreconditionError::UnresolvableAuthority { authority: authority.to_string() }
		})?;
		let token_url = TokenUrl::new(format!("{authority}/oauth2/token")).map_err(|_| {
			PreconditionError::UnresolvableAuthority { authority: authority.to_string() }
		})?;

		Ok(BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url))
	}

	async fn cache_result(
		&self,
		authority: &AuthorityEndpoint,
		client_id: &str,
		resource: &str,
		result: &AuthResult,
	) -> Result<()> {
		let key = CacheKey::new(authority, client_id, resource);

		self.cache.put(key, result.clone()).await?;

		Ok(())
	}

	async fn cached_result(
		&self,
		authority: &AuthorityEndpoint,
		client_id: &str,
		resource: &str,
	) -> Result<Option<AuthResult>> {
		let key = CacheKey::new(authority, client_id, resource);
		let Some(cached) = self.cache.get(&key).await? else {
			return Ok(None);
		};

		// Expired cache entries are evicted rather than returned. An evict failure leaves the
		// stale entry behind but must not fail the acquisition; it is logged and swallowed.
		if let Some(expires_on) = cached.expires_on
			&& expires_on <= OffsetDateTime::now_utc()
		{
			if let Err(error) = self.cache.evict(&key).await {
				obs::record_swallowed_error(Operation::Credentialed, &error);
			}

			return Ok(None);
		}

		Ok(Some(cached))
	}
}
impl Debug for OAuth2Engine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Engine").finish_non_exhaustive()
	}
}
impl AuthorizationEngine for OAuth2Engine {
	fn authenticate_interactive(
		&self,
		_authority: &AuthorityEndpoint,
		_resource: &str,
		_client_id: &str,
		_redirect_uri: &Url,
		_extra_query: Option<&str>,
	) -> Result<AuthResult> {
		Err(AuthorityError::InteractiveUnsupported.into())
	}

	fn authenticate_with_credentials<'a>(
		&'a self,
		authority: &'a AuthorityEndpoint,
		resource: &'a str,
		client_id: &'a str,
		credential: Option<&'a Credential>,
	) -> EngineFuture<'a, AuthResult> {
		Box::pin(async move {
			let Some(credential) = credential else {
				return self
					.cached_result(authority, client_id, resource)
					.await?
					.ok_or_else(|| AuthorityError::CachedStateUnavailable.into());
			};

			credential.ensure_complete()?;

			let client = Self::oauth_client(authority, client_id)?;
			let dispatch = HttpDispatch(self.http.clone());
			let response = client
				.exchange_password(
					&ResourceOwnerUsername::new(credential.username().to_owned()),
					&ResourceOwnerPassword::new(credential.password().to_owned()),
				)
				.add_extra_param("resource", resource)
				.request_async(&dispatch)
				.await
				.map_err(map_token_error)?;
			let result = auth_result_from(response);

			self.cache_result(authority, client_id, resource, &result).await?;

			Ok(result)
		})
	}

	fn authenticate_with_refresh_token<'a>(
		&'a self,
		authority: &'a AuthorityEndpoint,
		refresh_token: &'a str,
		client_id: &'a str,
		resource: &'a str,
	) -> EngineFuture<'a, AuthResult> {
		Box::pin(async move {
			let client = Self::oauth_client(authority, client_id)?;
			let dispatch = HttpDispatch(self.http.clone());
			let secret = RefreshToken::new(refresh_token.to_owned());
			let response = client
				.exchange_refresh_token(&secret)
				.add_extra_param("resource", resource)
				.request_async(&dispatch)
				.await
				.map_err(map_token_error)?;
			let result = auth_result_from(response);

			self.cache_result(authority, client_id, resource, &result).await?;

			Ok(result)
		})
	}
}

/// Minimal [`oauth2::AsyncHttpClient`] adapter over reqwest.
struct HttpDispatch(ReqwestClient);
impl<'c> oauth2::AsyncHttpClient<'c> for HttpDispatch {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

fn auth_result_from(response: oauth2::basic::BasicTokenResponse) -> AuthResult {
	let expires_on = response
		.expires_in()
		.and_then(|delta| i64::try_from(delta.as_secs()).ok())
		.map(|secs| OffsetDateTime::now_utc() + Duration::seconds(secs));

	AuthResult {
		access_token: response.access_token().secret().to_owned(),
		refresh_token: response.refresh_token().map(|token| token.secret().to_owned()),
		expires_on,
	}
}

fn map_token_error(err: BasicRequestTokenError<HttpClientError<ReqwestError>>) -> Error {
	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = response
				.error_description()
				.cloned()
				.unwrap_or_else(|| response.error().as_ref().to_owned());

			AuthorityError::Rejected { reason }.into()
		},
		RequestTokenError::Request(error) => map_http_client_error(error),
		RequestTokenError::Parse(source, _body) =>
			MalformedResponseError::TokenEndpoint { source }.into(),
		RequestTokenError::Other(message) => AuthorityError::Rejected { reason: message }.into(),
	}
}

fn map_http_client_error(err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => TransportError::network(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => AuthorityError::Rejected { reason: message }.into(),
		_ => AuthorityError::Rejected { reason: "Unrecognized transport failure.".into() }.into(),
	}
}
