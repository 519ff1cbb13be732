//! Broker configuration and well-known REST endpoint construction.

// self
use crate::{_prelude::*, auth::PatFormat, error::PreconditionError};

/// Default authority host URL: the well-known identity-provider root plus the shared tenant.
pub const DEFAULT_AUTHORITY_HOST_URL: &str = "https://login.microsoftonline.com/common";
/// Default token service root serving PAT issuance and profile validation.
pub const DEFAULT_TOKEN_SERVICE_URL: &str = "https://app.vssps.visualstudio.com";

const API_VERSION: &str = "1.0";
const SESSION_TOKEN_SEGMENTS: [&str; 3] = ["_apis", "token", "sessiontokens"];
const PROFILE_SEGMENTS: [&str; 4] = ["_apis", "profile", "profiles", "me"];

/// Construction-time broker configuration.
///
/// The authority host base URL is the only configurable input of the acquisition paths; the
/// token service URL roots the fixed PAT-issuance and profile endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
	/// Base authority host URL; per-target endpoints are derived from it.
	pub authority_host_url: Url,
	/// Root URL of the token service hosting the PAT and profile endpoints.
	pub token_service_url: Url,
}
impl BrokerConfig {
	/// Replaces the authority host base URL.
	pub fn with_authority_host_url(mut self, url: Url) -> Self {
		self.authority_host_url = url;

		self
	}

	/// Replaces the token service root URL.
	pub fn with_token_service_url(mut self, url: Url) -> Self {
		self.token_service_url = url;

		self
	}

	/// Builds the PAT-issuance endpoint, appending `tokentype=compact` for the compact variant.
	pub fn session_token_url(&self, format: PatFormat) -> Result<Url, PreconditionError> {
		let mut url = self.extended(&SESSION_TOKEN_SEGMENTS)?;

		if format.is_compact() {
			url.query_pairs_mut().append_pair("tokentype", "compact");
		}

		Ok(url)
	}

	/// Builds the profile endpoint used for basic-credential validation.
	pub fn profile_url(&self) -> Result<Url, PreconditionError> {
		self.extended(&PROFILE_SEGMENTS)
	}

	fn extended(&self, segments: &[&str]) -> Result<Url, PreconditionError> {
		let mut url = self.token_service_url.clone();

		url.path_segments_mut()
			.map_err(|_| PreconditionError::OpaqueServiceUrl {
				url: self.token_service_url.to_string(),
			})?
			.pop_if_empty()
			.extend(segments);
		url.query_pairs_mut().append_pair("api-version", API_VERSION);

		Ok(url)
	}
}
impl Default for BrokerConfig {
	fn default() -> Self {
		Self {
			authority_host_url: Url::parse(DEFAULT_AUTHORITY_HOST_URL)
				.expect("Default authority host URL is a compile-time constant."),
			token_service_url: Url::parse(DEFAULT_TOKEN_SERVICE_URL)
				.expect("Default token service URL is a compile-time constant."),
		}
	}
}
