//! Thread-safe in-memory [`TokenCache`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
	engine::AuthResult,
};

type CacheMap = Arc<RwLock<HashMap<CacheKey, AuthResult>>>;

/// Thread-safe cache backend that keeps authority results in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenCache(CacheMap);
impl MemoryTokenCache {
	fn put_now(map: CacheMap, key: CacheKey, result: AuthResult) -> Result<(), CacheError> {
		map.write().insert(key, result);

		Ok(())
	}

	fn get_now(map: CacheMap, key: CacheKey) -> Option<AuthResult> {
		map.read().get(&key).cloned()
	}

	fn evict_now(map: CacheMap, key: CacheKey) -> Option<AuthResult> {
		map.write().remove(&key)
	}
}
impl TokenCache for MemoryTokenCache {
	fn put(&self, key: CacheKey, result: AuthResult) -> CacheFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::put_now(map, key, result) })
	}

	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AuthResult>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn evict<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<AuthResult>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::evict_now(map, key)) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn key(client_id: &str) -> CacheKey {
		CacheKey {
			authority: "https://login.example.com/common/dev.azure.com".into(),
			client_id: client_id.into(),
			resource: "https://management.core.windows.net/".into(),
		}
	}

	fn result(access: &str) -> AuthResult {
		AuthResult {
			access_token: access.into(),
			refresh_token: Some("rt-1".into()),
			expires_on: None,
		}
	}

	#[tokio::test]
	async fn put_get_evict_round_trip() {
		let cache = MemoryTokenCache::default();

		assert!(cache.get(&key("client-1")).await.expect("Get should succeed.").is_none());

		cache.put(key("client-1"), result("at-1")).await.expect("Put should succeed.");

		let cached = cache
			.get(&key("client-1"))
			.await
			.expect("Get should succeed.")
			.expect("Entry should be present after put.");

		assert_eq!(cached.access_token, "at-1");
		assert!(cache.get(&key("client-2")).await.expect("Get should succeed.").is_none());

		let evicted = cache
			.evict(&key("client-1"))
			.await
			.expect("Evict should succeed.")
			.expect("Evict should return the stored entry.");

		assert_eq!(evicted.access_token, "at-1");
		assert!(cache.get(&key("client-1")).await.expect("Get should succeed.").is_none());
	}
}
