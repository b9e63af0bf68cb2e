//! Per-call token request handed to credential sources.

// self
use crate::auth::{Claims, ScopeSet};

/// Parameters the gate passes to a credential source for a single call.
///
/// `conditional_access_enabled` is true exactly when `claims` is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequest {
	/// Scopes requested from the credential source.
	pub scopes: ScopeSet,
	/// Decoded claims challenge, when the caller supplied one.
	pub claims: Option<Claims>,
	/// Whether the credential source should request a conditional-access aware token.
	pub conditional_access_enabled: bool,
}
impl TokenRequest {
	/// Creates a request for `scopes` without claims.
	pub fn new(scopes: ScopeSet) -> Self {
		Self { scopes, claims: None, conditional_access_enabled: false }
	}

	/// Attaches (or clears) decoded claims and derives the conditional-access flag.
	pub fn with_claims(mut self, claims: Option<Claims>) -> Self {
		self.conditional_access_enabled = claims.is_some();
		self.claims = claims;

		self
	}

	/// Returns the claims JSON text, or an empty string when none were supplied.
	pub fn claims_str(&self) -> &str {
		self.claims.as_ref().map(Claims::as_str).unwrap_or_default()
	}
}
