//! Auth-domain token models, credentials, and PAT scopes.

pub mod credential;
pub mod scope;
pub mod token;

pub use credential::*;
pub use scope::*;
pub use token::*;
