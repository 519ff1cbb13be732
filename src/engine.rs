//! External authorization engine capability.
//!
//! The hardest true complexity of this system — the interactive/non-interactive OAuth-style
//! protocol exchange, cryptographic validation, and cache discipline — lives behind
//! [`AuthorizationEngine`]. The broker only depends on the trait, so every broker operation is
//! testable against a mock engine without a real identity backend. A reqwest-backed
//! non-interactive implementation ships as [`OAuth2Engine`](oauth2::OAuth2Engine).

#[cfg(feature = "reqwest")] pub mod oauth2;

#[cfg(feature = "reqwest")] pub use self::oauth2::OAuth2Engine;

// self
use crate::{_prelude::*, auth::Credential, authority::AuthorityEndpoint};

/// Future type returned by asynchronous engine operations.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Raw result of a successful authority exchange, before broker normalization.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthResult {
	/// Access token value.
	pub access_token: String,
	/// Refresh token value, when the authority issued one.
	pub refresh_token: Option<String>,
	/// Expiry instant of the access token, when the authority reported one.
	pub expires_on: Option<OffsetDateTime>,
}
impl Debug for AuthResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthResult")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_on", &self.expires_on)
			.finish()
	}
}

/// Authorization engine consumed by the broker as an injected capability.
///
/// Implementations own the protocol exchange with the identity provider and the token cache
/// shared across acquisition calls; the broker never locks or serializes access to that cache.
pub trait AuthorizationEngine
where
	Self: Send + Sync,
{
	/// Authenticates interactively against the authority, forcing a credential prompt for any
	/// user identity regardless of cached state.
	///
	/// Blocking from the caller's perspective; the engine's internal suspension model is opaque
	/// to the broker. `extra_query` is appended to the authorization request when present.
	fn authenticate_interactive(
		&self,
		authority: &AuthorityEndpoint,
		resource: &str,
		client_id: &str,
		redirect_uri: &Url,
		extra_query: Option<&str>,
	) -> Result<AuthResult>;

	/// Authenticates as the supplied user/password pair, or as the default user context
	/// (allowing cached state) when no credential is given.
	fn authenticate_with_credentials<'a>(
		&'a self,
		authority: &'a AuthorityEndpoint,
		resource: &'a str,
		client_id: &'a str,
		credential: Option<&'a Credential>,
	) -> EngineFuture<'a, AuthResult>;

	/// Exchanges a refresh token value directly with the authority for a new access (and
	/// possibly refresh) token, bypassing interactive and cached-credential paths.
	fn authenticate_with_refresh_token<'a>(
		&'a self,
		authority: &'a AuthorityEndpoint,
		refresh_token: &'a str,
		client_id: &'a str,
		resource: &'a str,
	) -> EngineFuture<'a, AuthResult>;
}
