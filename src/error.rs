//! Broker-level error taxonomy shared across operations, engines, and caches.
//!
//! Every operation returns a tagged taxonomy that distinguishes precondition violations from
//! authority rejections, transport faults, and malformed responses. Callers who prefer an
//! all-or-nothing rendering use [`ResultExt::or_absent`], which logs the failure and collapses
//! it to an absent result.

// self
use crate::{_prelude::*, auth::TokenKind};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Required inputs were absent or malformed; raised before any network I/O.
	#[error(transparent)]
	Precondition(#[from] PreconditionError),
	/// The identity authority or token service rejected the request.
	#[error(transparent)]
	Authority(#[from] AuthorityError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The remote service answered with a body the broker could not interpret.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),
	/// Token-cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
}

/// Programming-error-level input violations, distinguishable from runtime failures.
///
/// Every variant is produced before the broker touches the network, so repeated calls with the
/// same inputs fail identically and instantly.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PreconditionError {
	/// The client identifier was empty.
	#[error("Client identifier must not be empty.")]
	EmptyClientId,
	/// The resource identifier was empty.
	#[error("Resource identifier must not be empty.")]
	EmptyResource,
	/// The target URI carries no host component to derive an authority from.
	#[error("Target URI `{target}` has no host component.")]
	MissingTargetHost {
		/// Offending target URI.
		target: String,
	},
	/// The configured base URL and target host did not combine into a valid URL.
	#[error("Authority endpoint `{authority}` is not a valid URL.")]
	UnresolvableAuthority {
		/// Candidate authority endpoint string.
		authority: String,
	},
	/// A token of one kind was supplied where another kind is required.
	#[error("Expected a {expected} token but received a {actual} token.")]
	WrongTokenKind {
		/// Kind the operation requires.
		expected: TokenKind,
		/// Kind that was actually supplied.
		actual: TokenKind,
	},
	/// A token with an empty value was supplied to an operation that consumes it.
	#[error("The supplied {kind} token has an empty value.")]
	EmptyTokenValue {
		/// Kind of the offending token.
		kind: TokenKind,
	},
	/// A credential field was absent or empty.
	#[error("Credential {field} must not be empty.")]
	IncompleteCredential {
		/// Name of the missing field.
		field: &'static str,
	},
	/// The requested PAT scope was empty.
	#[error("Token scope must not be empty.")]
	EmptyScope,
	/// The configured service URL cannot carry path segments.
	#[error("Service URL `{url}` cannot be extended with REST paths.")]
	OpaqueServiceUrl {
		/// Offending service URL.
		url: String,
	},
}

/// Failures reported by the identity authority or the token service.
#[derive(Debug, ThisError)]
pub enum AuthorityError {
	/// The authorization engine rejected the exchange.
	#[error("Authority rejected the token request: {reason}.")]
	Rejected {
		/// Authority- or engine-supplied reason string.
		reason: String,
	},
	/// The configured engine cannot show a credential prompt.
	#[error("Authorization engine does not support interactive prompts.")]
	InteractiveUnsupported,
	/// Silent acquisition was requested but the engine holds no cached state.
	#[error("No cached authority state is available for silent acquisition.")]
	CachedStateUnavailable,
	/// The token service answered the PAT request with a non-success status.
	#[error("Token service rejected the personal access token request with HTTP {status}.")]
	PatIssuanceRejected {
		/// HTTP status code returned by the token service.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response bodies that arrived but could not be interpreted.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// The authorization engine produced a result without an access token value.
	#[error("Authority returned an empty access token.")]
	EmptyAccessToken,
	/// The session-token response was missing or mistyped the `token` field.
	#[error("Token service response is missing the session token field.")]
	SessionToken {
		/// Structured decode failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The session-token response carried an empty `token` value.
	#[error("Token service returned an empty session token.")]
	EmptySessionToken,
	/// The authority token endpoint returned malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenEndpoint {
		/// Structured decode failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// All-or-nothing result rendering: any failure becomes absence.
pub trait ResultExt<T> {
	/// Logs the error through [`crate::obs`] and collapses it to `None`.
	fn or_absent(self) -> Option<T>;
}
impl<T> ResultExt<T> for Result<T> {
	fn or_absent(self) -> Option<T> {
		match self {
			Ok(value) => Some(value),
			Err(error) => {
				crate::obs::record_collapsed_error(&error);

				None
			},
		}
	}
}
