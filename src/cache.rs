//! Token cache capability consumed by authorization engines.
//!
//! The cache is a single long-lived instance shared across all acquisition calls for the
//! broker's lifetime, keyed by authority + client + resource. The broker itself never reads or
//! locks it; that discipline belongs to the engine that owns it.

pub mod memory;

pub use memory::MemoryTokenCache;

// self
use crate::{_prelude::*, authority::AuthorityEndpoint, engine::AuthResult};

/// Future type returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Cache contract implemented by token cache backends.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Stores or replaces the entry for the provided key.
	fn put(&self, key: CacheKey, result: AuthResult) -> CacheFuture<'_, ()>;

	/// Fetches the entry associated with the key, if present.
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AuthResult>>;

	/// Removes and returns the entry associated with the key, if present.
	fn evict<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AuthResult>>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the cache engine.
	#[error("Cache backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a cached authority result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Resolved authority endpoint string.
	pub authority: String,
	/// Client identifier used in the exchange.
	pub client_id: String,
	/// Resource identifier used in the exchange.
	pub resource: String,
}
impl CacheKey {
	/// Builds a key from the authority endpoint and exchange identifiers.
	pub fn new(authority: &AuthorityEndpoint, client_id: &str, resource: &str) -> Self {
		Self {
			authority: authority.as_str().to_owned(),
			client_id: client_id.to_owned(),
			resource: resource.to_owned(),
		}
	}
}
