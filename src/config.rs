//! Declarative gate configuration.
//!
//! [`GateConfig`] mirrors the optional builder inputs so deployments can keep scopes and allowed
//! hosts in a JSON document next to the rest of their service configuration. Entries are
//! validated while deserializing, and parse failures name the offending field.

// self
use crate::{_prelude::*, auth::ScopeSet, error::ConfigError, host::AllowedHosts};

/// Serializable subset of [`TokenGateBuilder`](crate::gate::TokenGateBuilder) inputs.
///
/// Empty lists mean "use the defaults", matching the builder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
	/// Scopes requested for every token.
	pub scopes: ScopeSet,
	/// Hosts permitted to receive tokens.
	pub allowed_hosts: AllowedHosts,
	/// Name attached to tracing spans.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub observability_name: Option<String>,
}
impl GateConfig {
	/// Parses a JSON configuration document.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })
	}
}
