//! Credential source contract and the built-in static credential.
//!
//! The gate never talks to an identity backend itself. Anything able to turn a
//! [`TokenRequest`] into an [`AccessToken`] (an SDK credential, a workload identity sidecar, a
//! cached token broker) plugs in by implementing [`CredentialSource`].

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenRequest},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`CredentialSource::get_token`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AccessToken, CredentialError>> + 'a + Send>>;

/// Backend that issues access tokens for a [`TokenRequest`].
///
/// Cancellation follows Rust async semantics: when the caller drops the gate's future, the
/// returned [`CredentialFuture`] is dropped with it, so implementations must not rely on being
/// polled to completion.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Requests a token for the provided scopes + claims.
	fn get_token<'a>(&'a self, request: &'a TokenRequest) -> CredentialFuture<'a>;
}

/// Error type produced by [`CredentialSource`] implementations.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// The credential cannot operate in the current environment.
	#[error("Credential unavailable: {message}.")]
	Unavailable {
		/// Human-readable error payload.
		message: String,
	},
	/// The identity backend rejected the request.
	#[error("Authentication failed: {message}.")]
	Authentication {
		/// Backend-supplied message.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Any other backend failure.
	#[error("{source}")]
	Other {
		/// Backend-specific error.
		#[source]
		source: BoxError,
	},
}
impl CredentialError {
	/// Wraps an arbitrary backend error.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}

/// Credential that returns a caller-supplied token, for local development and tests.
///
/// The token can be swapped at runtime with [`StaticCredential::rotate`]; concurrent callers
/// observe either the old or the new token, never a torn value.
#[derive(Debug)]
pub struct StaticCredential {
	token: RwLock<AccessToken>,
}
impl StaticCredential {
	/// Creates a credential that always returns `token`.
	pub fn new(token: impl Into<String>) -> Self {
		Self::from_token(AccessToken::new(token))
	}

	/// Creates a credential from a prepared token (for example one carrying an expiry).
	pub fn from_token(token: AccessToken) -> Self {
		Self { token: RwLock::new(token) }
	}

	/// Replaces the token handed out by subsequent calls.
	pub fn rotate(&self, token: AccessToken) {
		*self.token.write() = token;
	}

	fn current(&self) -> Result<AccessToken, CredentialError> {
		let token = self.token.read().clone();

		if token.is_expired_at(OffsetDateTime::now_utc()) {
			return Err(CredentialError::Unavailable {
				message: "static token has expired".into(),
			});
		}

		Ok(token)
	}
}
impl CredentialSource for StaticCredential {
	fn get_token<'a>(&'a self, _request: &'a TokenRequest) -> CredentialFuture<'a> {
		Box::pin(async move { self.current() })
	}
}
