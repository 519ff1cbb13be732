//! Basic credentials with structural validation and HTTP Basic rendering.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::PreconditionError};

/// Username/password pair supplied per call; never retained by the broker beyond the call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	username: String,
	password: String,
}
impl Credential {
	/// Creates a credential from its raw parts.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}

	/// Returns the username.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Returns the password. Callers must avoid logging this string.
	pub fn password(&self) -> &str {
		&self.password
	}

	/// Structural validation: both fields must be present and non-empty.
	///
	/// Executed once before any network call that uses the credential; a violation is a
	/// precondition failure, never a false-negative validation result.
	pub fn ensure_complete(&self) -> Result<(), PreconditionError> {
		if self.username.is_empty() {
			return Err(PreconditionError::IncompleteCredential { field: "username" });
		}
		if self.password.is_empty() {
			return Err(PreconditionError::IncompleteCredential { field: "password" });
		}

		Ok(())
	}

	/// Renders the base64-encoded `username:password` pair for an HTTP Basic header.
	pub fn basic_authorization(&self) -> String {
		STANDARD.encode(format!("{}:{}", self.username, self.password))
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn structural_validation_checks_both_fields() {
		assert!(Credential::new("alice", "hunter2").ensure_complete().is_ok());
		assert_eq!(
			Credential::new("", "hunter2").ensure_complete(),
			Err(PreconditionError::IncompleteCredential { field: "username" }),
		);
		assert_eq!(
			Credential::new("alice", "").ensure_complete(),
			Err(PreconditionError::IncompleteCredential { field: "password" }),
		);
	}

	#[test]
	fn basic_authorization_encodes_the_pair() {
		let credential = Credential::new("user", "pass");

		// base64("user:pass")
		assert_eq!(credential.basic_authorization(), "dXNlcjpwYXNz");
	}

	#[test]
	fn debug_redacts_the_password() {
		let rendered = format!("{:?}", Credential::new("alice", "hunter2"));

		assert!(rendered.contains("alice"));
		assert!(!rendered.contains("hunter2"));
	}
}
