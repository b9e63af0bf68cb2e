// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	config::GateConfig,
	credential::CredentialSource,
	error::ConfigError,
	gate::TokenGate,
	host::{AllowedHosts, HostPolicy},
	obs::{self, GateObserver, NoopObserver},
};

/// Builder for [`TokenGate`] values.
///
/// Scopes and hosts are copied into the gate on [`build`](Self::build); later changes to the
/// caller's collections never reach a built gate.
#[derive(Default)]
pub struct TokenGateBuilder {
	credential: Option<Arc<dyn CredentialSource>>,
	scopes: Vec<String>,
	allowed_hosts: Vec<String>,
	host_policy: Option<Arc<dyn HostPolicy>>,
	observer: Option<Arc<dyn GateObserver>>,
	observability_name: Option<String>,
}
impl TokenGateBuilder {
	/// Sets the credential source (required).
	pub fn credential(mut self, credential: Arc<dyn CredentialSource>) -> Self {
		self.credential = Some(credential);

		self
	}

	/// Replaces the requested scopes; an empty list selects the default scope.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the allowed hosts; an empty list selects the default hosts.
	pub fn allowed_hosts<I, S>(mut self, hosts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.allowed_hosts = hosts.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the host decision with a custom matcher.
	///
	/// The configured [`AllowedHosts`] remain available through
	/// [`TokenGate::allowed_hosts`] but are no longer consulted.
	pub fn host_policy(mut self, policy: Arc<dyn HostPolicy>) -> Self {
		self.host_policy = Some(policy);

		self
	}

	/// Injects an observer notified of every decision.
	pub fn observer(mut self, observer: Arc<dyn GateObserver>) -> Self {
		self.observer = Some(observer);

		self
	}

	/// Overrides the name attached to tracing spans.
	pub fn observability_name(mut self, name: impl Into<String>) -> Self {
		self.observability_name = Some(name.into());

		self
	}

	/// Applies a configuration document; non-empty entries replace builder values.
	pub fn config(mut self, config: GateConfig) -> Self {
		if !config.scopes.is_empty() {
			self.scopes = config.scopes.as_slice().to_vec();
		}
		if !config.allowed_hosts.is_empty() {
			self.allowed_hosts = config.allowed_hosts.iter().map(str::to_owned).collect();
		}
		if let Some(name) = config.observability_name {
			self.observability_name = Some(name);
		}

		self
	}

	/// Consumes the builder and validates the resulting gate.
	pub fn build(self) -> Result<TokenGate> {
		let credential = self.credential.ok_or(ConfigError::MissingCredential)?;
		let scopes = ScopeSet::or_default_scope(self.scopes).map_err(ConfigError::from)?;
		let allowed_hosts =
			AllowedHosts::or_default_hosts(self.allowed_hosts).map_err(ConfigError::from)?;
		let observability_name = match self.observability_name {
			Some(name) if !name.trim().is_empty() => Arc::from(name),
			_ => Arc::from(obs::DEFAULT_OBSERVABILITY_NAME),
		};

		let host_policy = self.host_policy.unwrap_or_else(|| Arc::new(allowed_hosts.clone()));

		Ok(TokenGate {
			credential,
			scopes,
			allowed_hosts,
			host_policy,
			observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
			observability_name,
		})
	}
}
impl Debug for TokenGateBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGateBuilder")
			.field("credential_set", &self.credential.is_some())
			.field("scopes", &self.scopes)
			.field("allowed_hosts", &self.allowed_hosts)
			.field("host_policy_set", &self.host_policy.is_some())
			.field("observer_set", &self.observer.is_some())
			.field("observability_name", &self.observability_name)
			.finish()
	}
}
