//! Gate-level error types shared across construction, policy checks, and credential calls.

// self
use crate::_prelude::*;

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical gate error exposed by public APIs.
///
/// A host rejected by the allow-list is not represented here; the gate answers `Ok(None)` so the
/// calling layer can send the request unauthenticated.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Invalid argument supplied while building or configuring the gate.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Plain-text transport requested for a host that is not a loopback alias.
	#[error("URL scheme must be https, got `{scheme}` for host `{host}`.")]
	InsecureTransport {
		/// Scheme carried by the rejected URL.
		scheme: String,
		/// Host carried by the rejected URL.
		host: String,
	},
	/// Conditional-access claims could not be decoded.
	#[error("Conditional-access claims are malformed.")]
	MalformedClaims(#[from] crate::auth::ClaimsError),
	/// The credential source failed; its error is surfaced unchanged.
	#[error(transparent)]
	Credential(#[from] crate::credential::CredentialError),
	/// Issued token cannot be encoded into an `Authorization` header.
	#[cfg(feature = "reqwest")]
	#[error("Access token cannot be used as an Authorization header value.")]
	HeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}

/// Configuration and validation failures raised while constructing a gate.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No credential source was supplied to the builder.
	#[error("A credential source is required to build a token gate.")]
	MissingCredential,
	/// Scope list cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Allowed host list contains an unusable entry.
	#[error("Allowed hosts are invalid.")]
	InvalidHost(#[from] crate::host::HostPolicyError),
	/// Configuration document could not be parsed.
	#[error("Gate configuration is malformed.")]
	Parse {
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
