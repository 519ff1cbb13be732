//! PAT scope strings and issuance format selection.

// self
use crate::{_prelude::*, error::PreconditionError};

/// Opaque scope string requested for a personal access token.
///
/// The broker passes the value through to the token service verbatim; it validates presence,
/// never semantic correctness.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenScope(String);
impl TokenScope {
	/// Creates a scope after checking it is non-empty.
	pub fn new(value: impl Into<String>) -> Result<Self, PreconditionError> {
		let value = value.into();

		if value.is_empty() {
			return Err(PreconditionError::EmptyScope);
		}

		Ok(Self(value))
	}

	/// Returns the scope string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for TokenScope {
	type Error = PreconditionError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<TokenScope> for String {
	fn from(value: TokenScope) -> Self {
		value.0
	}
}
impl Display for TokenScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Encoding variant requested for an issued personal access token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatFormat {
	/// Standard session token.
	#[default]
	Full,
	/// Shorter-encoded representation, requested via the `tokentype=compact` query parameter.
	Compact,
}
impl PatFormat {
	/// Returns `true` for the compact variant.
	pub const fn is_compact(self) -> bool {
		matches!(self, PatFormat::Compact)
	}
}
