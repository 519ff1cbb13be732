//! Per-target authority endpoint resolution.
//!
//! The authority endpoint for a target resource is the configured base authority host URL plus
//! the host component of the target URI. Two host-extraction modes exist: the interactive path
//! derives a DNS-safe host while the credentialed and refresh paths use the plain host. Both
//! are explicit [`HostMode`] variants selected by call site instead of being unified silently.

// self
use crate::{_prelude::*, error::PreconditionError};

/// Host-extraction mode applied when deriving an authority endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostMode {
	/// DNS-safe host: IPv6 brackets and any trailing root-label dot are stripped.
	DnsSafe,
	/// Plain host component, exactly as the URL carries it.
	Plain,
}

/// Derived authority endpoint: `base + "/" + host_component_of(target)`.
///
/// Recomputed per call and never cached by the broker; caching, if any, belongs to the
/// authorization engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityEndpoint(Url);
impl AuthorityEndpoint {
	/// Resolves the endpoint for a target resource URI.
	///
	/// Pure function of its inputs. Produces exactly one `/` between the base URL and the host
	/// regardless of whether `base` carries a trailing slash. A target without a host component
	/// (e.g. `mailto:`) is a precondition failure.
	pub fn resolve(base: &Url, target: &Url, mode: HostMode) -> Result<Self, PreconditionError> {
		let host = match mode {
			HostMode::Plain => target
				.host_str()
				.ok_or_else(|| PreconditionError::MissingTargetHost {
					target: target.to_string(),
				})?
				.to_owned(),
			HostMode::DnsSafe => dns_safe_host(target)?,
		};
		let authority = format!("{}/{host}", base.as_str().trim_end_matches('/'));
		let url = Url::parse(&authority)
			.map_err(|_| PreconditionError::UnresolvableAuthority { authority })?;

		Ok(Self(url))
	}

	/// Returns the endpoint as a URL.
	pub fn as_url(&self) -> &Url {
		&self.0
	}

	/// Returns the endpoint as a string slice.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}
impl Display for AuthorityEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

fn dns_safe_host(target: &Url) -> Result<String, PreconditionError> {
	let host = target
		.host_str()
		.ok_or_else(|| PreconditionError::MissingTargetHost { target: target.to_string() })?;
	let host = host.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).unwrap_or(host);

	Ok(host.trim_end_matches('.').to_owned())
}
