//! Conditional-access claims carried by per-call authentication context.

// crates.io
use base64::{DecodeError, Engine as _, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Failures raised while decoding a claims challenge.
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// Claims are not valid standard (padded) base64.
	#[error("Claims are not valid base64.")]
	Base64(#[from] DecodeError),
	/// Decoded claims are not UTF-8 text.
	#[error("Decoded claims are not valid UTF-8.")]
	Utf8(#[from] std::string::FromUtf8Error),
}

/// Per-call authentication context supplied alongside the target URL.
///
/// The only recognized entry is `claims`: a base64-encoded JSON claims challenge returned by a
/// resource that enforces conditional access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationContext {
	/// Base64-encoded claims challenge, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub claims: Option<String>,
}
impl AuthenticationContext {
	/// Context carrying no additional data.
	pub fn none() -> Self {
		Self::default()
	}

	/// Context carrying an encoded claims challenge.
	pub fn with_claims(encoded: impl Into<String>) -> Self {
		Self { claims: Some(encoded.into()) }
	}

	/// Returns true when a non-empty claims challenge is present.
	pub fn has_claims(&self) -> bool {
		self.claims.as_deref().is_some_and(|claims| !claims.is_empty())
	}

	/// Decodes the claims challenge, if present.
	///
	/// An entry that decodes to an empty payload counts as no claims.
	pub fn decode_claims(&self) -> Result<Option<Claims>, ClaimsError> {
		let Some(encoded) = self.claims.as_deref() else {
			return Ok(None);
		};
		let claims = Claims::decode(encoded)?;

		Ok((!claims.as_str().is_empty()).then_some(claims))
	}
}

/// Decoded conditional-access claims payload (JSON text).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(String);
impl Claims {
	/// Decodes a standard base64 claims challenge into its JSON text.
	pub fn decode(encoded: &str) -> Result<Self, ClaimsError> {
		let bytes = STANDARD.decode(encoded)?;

		Ok(Self(String::from_utf8(bytes)?))
	}

	/// Returns the decoded JSON text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Parses the payload into structured JSON.
	pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
		serde_json::from_str(&self.0)
	}
}
impl AsRef<str> for Claims {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for Claims {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
