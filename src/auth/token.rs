//! Token kinds, redacting secret wrapper, and the normalized authority exchange result.

// self
use crate::{
	_prelude::*,
	engine::AuthResult,
	error::{MalformedResponseError, PreconditionError},
};

/// Redacted token secret wrapper keeping bearer material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Kind of a broker-issued token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Short-lived bearer credential authorizing calls to a protected resource.
	Access,
	/// Longer-lived credential used to obtain a new access token without re-authenticating.
	Refresh,
	/// Scoped personal access token issued by the token service.
	Personal,
}
impl TokenKind {
	/// Returns a stable label suitable for error messages and log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
			TokenKind::Personal => "personal",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable bearer token produced by a successful acquisition or issuance operation.
///
/// Ownership passes entirely to the caller; the broker retains no reference after returning it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	secret: TokenSecret,
	kind: TokenKind,
}
impl Token {
	/// Creates an access token.
	pub fn access(value: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(value), kind: TokenKind::Access }
	}

	/// Creates a refresh token.
	pub fn refresh(value: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(value), kind: TokenKind::Refresh }
	}

	/// Creates a personal access token.
	pub fn personal(value: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(value), kind: TokenKind::Personal }
	}

	/// Returns the token's secret material.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Returns the token's kind.
	pub fn kind(&self) -> TokenKind {
		self.kind
	}

	/// Returns `true` if the token carries no value.
	pub fn is_empty(&self) -> bool {
		self.secret.expose().is_empty()
	}

	/// Guards an operation's token-kind precondition: the kind must match and the value must be
	/// non-empty. Fails before any network call is attempted.
	pub fn ensure_kind(&self, expected: TokenKind) -> Result<(), PreconditionError> {
		if self.kind != expected {
			return Err(PreconditionError::WrongTokenKind { expected, actual: self.kind });
		}
		if self.is_empty() {
			return Err(PreconditionError::EmptyTokenValue { kind: expected });
		}

		Ok(())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token").field("secret", &"<redacted>").field("kind", &self.kind).finish()
	}
}

/// Normalized result of a successful authority exchange.
///
/// Produced only by [`TokenPair::from_auth_result`]; callers never construct one directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
	/// Access token; always present.
	pub access: Token,
	/// Refresh token, when the authority issued one.
	pub refresh: Option<Token>,
	/// Expiry instant of the access token, when the authority reported one.
	pub expires_on: Option<OffsetDateTime>,
}
impl TokenPair {
	/// Normalizes an engine [`AuthResult`] into the broker's token representation.
	///
	/// An empty access token value is a malformed response. An empty refresh token value is
	/// normalized to "no refresh token" so refresh-typed tokens are non-empty by construction.
	pub fn from_auth_result(result: AuthResult) -> Result<Self> {
		if result.access_token.is_empty() {
			return Err(MalformedResponseError::EmptyAccessToken.into());
		}

		let refresh =
			result.refresh_token.filter(|value| !value.is_empty()).map(Token::refresh);

		Ok(Self {
			access: Token::access(result.access_token),
			refresh,
			expires_on: result.expires_on,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");

		let token = Token::access("super-secret");

		assert!(!format!("{token:?}").contains("super-secret"));
	}

	#[test]
	fn ensure_kind_guards_kind_and_value() {
		let access = Token::access("at-1");

		assert!(access.ensure_kind(TokenKind::Access).is_ok());
		assert_eq!(
			access.ensure_kind(TokenKind::Refresh),
			Err(PreconditionError::WrongTokenKind {
				expected: TokenKind::Refresh,
				actual: TokenKind::Access,
			}),
		);

		let empty = Token::refresh("");

		assert_eq!(
			empty.ensure_kind(TokenKind::Refresh),
			Err(PreconditionError::EmptyTokenValue { kind: TokenKind::Refresh }),
		);
	}

	#[test]
	fn normalization_requires_an_access_token() {
		let result = AuthResult {
			access_token: String::new(),
			refresh_token: Some("rt-1".into()),
			expires_on: None,
		};
		let error = TokenPair::from_auth_result(result)
			.expect_err("Empty access tokens should be rejected.");

		assert!(matches!(
			error,
			Error::MalformedResponse(MalformedResponseError::EmptyAccessToken)
		));
	}

	#[test]
	fn normalization_drops_empty_refresh_tokens() {
		let expires = macros::datetime!(2026-01-01 00:00 UTC);
		let pair = TokenPair::from_auth_result(AuthResult {
			access_token: "at-1".into(),
			refresh_token: Some(String::new()),
			expires_on: Some(expires),
		})
		.expect("Normalization should succeed with a populated access token.");

		assert_eq!(pair.access.secret().expose(), "at-1");
		assert_eq!(pair.access.kind(), TokenKind::Access);
		assert!(pair.refresh.is_none());
		assert_eq!(pair.expires_on, Some(expires));
	}
}
