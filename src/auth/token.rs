//! Access tokens returned by credential sources.

// self
use crate::_prelude::*;

/// Bearer access token issued by a credential source.
///
/// The secret is redacted from `Debug` and `Display`; call [`AccessToken::secret`] only at the
/// point the token is written into a request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	secret: String,
	/// Expiry reported by the credential source, when known.
	pub expires_on: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Wraps a token without expiry metadata.
	pub fn new(secret: impl Into<String>) -> Self {
		Self { secret: secret.into(), expires_on: None }
	}

	/// Attaches the expiry reported by the credential source.
	pub fn with_expires_on(mut self, instant: OffsetDateTime) -> Self {
		self.expires_on = Some(instant);

		self
	}

	/// Returns the raw token value. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		&self.secret
	}

	/// Consumes the token and returns the raw value.
	pub fn into_secret(self) -> String {
		self.secret
	}

	/// Returns true when the token carries an expiry at or before `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_on.is_some_and(|expires_on| expires_on <= now)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("expires_on", &self.expires_on)
			.finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
