//! Transport primitives for the broker's direct REST calls.
//!
//! The module exposes [`RestClient`] as the broker's only dependency on an HTTP stack for PAT
//! issuance and credential validation. Implementations execute a single request per call and
//! must keep one call's failure from affecting another call's state; pooling connections is
//! allowed under that constraint.

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};

/// Future type returned by [`RestClient::execute`].
pub type RestFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RestResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing the broker's REST exchanges.
pub trait RestClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a single request, yielding the status and raw body.
	///
	/// Non-2xx statuses are not transport errors; they come back as ordinary responses so the
	/// caller can apply its own status contract.
	fn execute(&self, request: RestRequest) -> RestFuture<'_>;
}

/// HTTP method used by broker REST calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestMethod {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
}

/// Authorization header value attached to a REST request.
#[derive(Clone)]
pub enum Authorization {
	/// `Authorization: Bearer <token>`.
	Bearer(TokenSecret),
	/// `Authorization: Basic <base64 pair>`.
	Basic(String),
}
impl Authorization {
	/// Builds a bearer authorization from a token secret.
	pub fn bearer(secret: TokenSecret) -> Self {
		Self::Bearer(secret)
	}

	/// Builds a basic authorization from an already base64-encoded `username:password` pair.
	pub fn basic(encoded: String) -> Self {
		Self::Basic(encoded)
	}

	/// Renders the header value. Callers must avoid logging the result.
	pub fn header_value(&self) -> String {
		match self {
			Self::Bearer(secret) => format!("Bearer {}", secret.expose()),
			Self::Basic(encoded) => format!("Basic {encoded}"),
		}
	}
}
impl Debug for Authorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Bearer(_) => f.write_str("Authorization::Bearer(<redacted>)"),
			Self::Basic(_) => f.write_str("Authorization::Basic(<redacted>)"),
		}
	}
}

/// Single REST request executed by a [`RestClient`].
#[derive(Clone, Debug)]
pub struct RestRequest {
	/// HTTP method.
	pub method: RestMethod,
	/// Absolute request URL.
	pub url: Url,
	/// Authorization header value.
	pub authorization: Authorization,
	/// JSON body for POST requests; sent with `content-type: application/json`.
	pub body: Option<Vec<u8>>,
}
impl RestRequest {
	/// Builds a GET request.
	pub fn get(url: Url, authorization: Authorization) -> Self {
		Self { method: RestMethod::Get, url, authorization, body: None }
	}

	/// Builds a JSON POST request.
	pub fn post_json(url: Url, authorization: Authorization, body: Vec<u8>) -> Self {
		Self { method: RestMethod::Post, url, authorization, body: Some(body) }
	}
}

/// Raw response surfaced to the broker.
#[derive(Clone, Debug)]
pub struct RestResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RestResponse {
	/// Returns `true` for HTTP 200, the only status the broker's REST contracts accept.
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Configure timeouts on the inner client; the broker threads no timeout of its own through
/// REST calls.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestRestClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestRestClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestRestClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestRestClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RestClient for ReqwestRestClient {
	fn execute(&self, request: RestRequest) -> RestFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				RestMethod::Get => client.get(request.url.clone()),
				RestMethod::Post => client.post(request.url.clone()),
			};

			builder = builder.header(AUTHORIZATION, request.authorization.header_value());

			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RestResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authorization_renders_and_redacts() {
		let bearer = Authorization::bearer(TokenSecret::new("at-1"));
		let basic = Authorization::basic("dXNlcjpwYXNz".into());

		assert_eq!(bearer.header_value(), "Bearer at-1");
		assert_eq!(basic.header_value(), "Basic dXNlcjpwYXNz");
		assert!(!format!("{bearer:?}").contains("at-1"));
		assert!(!format!("{basic:?}").contains("dXNlcjpwYXNz"));
	}

	#[test]
	fn only_http_200_is_ok() {
		assert!(RestResponse { status: 200, body: Vec::new() }.is_ok());
		assert!(!RestResponse { status: 201, body: Vec::new() }.is_ok());
		assert!(!RestResponse { status: 403, body: Vec::new() }.is_ok());
	}
}
