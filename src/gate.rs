//! Token issuance gate.
//!
//! [`TokenGate`] decides, per outbound request, whether a credential source should be asked for
//! a token at all:
//!
//! 1. Hosts outside the allow-list get no token and no error, so the calling layer can send the
//!    request unauthenticated.
//! 2. Allowed hosts must be reached over `https`, except loopback aliases used for local
//!    development.
//! 3. A claims challenge in the [`AuthenticationContext`] is base64-decoded and forwarded with
//!    conditional access enabled.
//! 4. The credential source result (token or error) is returned unchanged.

mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthenticationContext, ScopeSet, TokenRequest},
	credential::CredentialSource,
	host::{self, AllowedHosts, HostPolicy},
	obs::{self, GateObserver, GateOutcome, GateSpan, NoopObserver},
};

/// Immutable gate between an HTTP-calling layer and a [`CredentialSource`].
///
/// All state is fixed at construction and shared behind [`Arc`], so clones are cheap and the
/// gate can serve concurrent calls without locking.
#[derive(Clone)]
pub struct TokenGate {
	credential: Arc<dyn CredentialSource>,
	scopes: ScopeSet,
	allowed_hosts: AllowedHosts,
	host_policy: Arc<dyn HostPolicy>,
	observer: Arc<dyn GateObserver>,
	observability_name: Arc<str>,
}
impl TokenGate {
	/// Creates a gate with the default scope and the default allowed hosts.
	pub fn new(credential: Arc<dyn CredentialSource>) -> Self {
		let allowed_hosts = AllowedHosts::default_hosts();

		Self {
			credential,
			scopes: ScopeSet::default_scope(),
			host_policy: Arc::new(allowed_hosts.clone()),
			allowed_hosts,
			observer: Arc::new(NoopObserver),
			observability_name: Arc::from(obs::DEFAULT_OBSERVABILITY_NAME),
		}
	}

	/// Starts a builder for customized scopes, hosts, and observability.
	pub fn builder() -> TokenGateBuilder {
		TokenGateBuilder::default()
	}

	/// Scopes requested for every token.
	pub fn scopes(&self) -> &ScopeSet {
		&self.scopes
	}

	/// Configured host list.
	///
	/// Decisions go through the gate's [`HostPolicy`], which is this list unless a custom policy
	/// was supplied with [`TokenGateBuilder::host_policy`].
	pub fn allowed_hosts(&self) -> &AllowedHosts {
		&self.allowed_hosts
	}

	/// Name attached to tracing spans.
	pub fn observability_name(&self) -> &str {
		&self.observability_name
	}

	/// Returns a token for `url`, `Ok(None)` when the host is not allowed.
	///
	/// Dropping the returned future cancels the pending credential call.
	pub async fn get_authorization_token(
		&self,
		url: &Url,
		context: &AuthenticationContext,
	) -> Result<Option<AccessToken>> {
		let span = GateSpan::new(&self.observability_name);

		self.record_outcome(GateOutcome::Attempt);

		let result = span.instrument(self.authorize(url, context, &span)).await;

		match &result {
			Ok(Some(_)) => self.record_outcome(GateOutcome::Issued),
			Ok(None) => self.record_outcome(GateOutcome::Skipped),
			Err(_) => self.record_outcome(GateOutcome::Failure),
		}

		result
	}

	async fn authorize(
		&self,
		url: &Url,
		context: &AuthenticationContext,
		span: &GateSpan,
	) -> Result<Option<AccessToken>> {
		let host_allowed = self.host_policy.is_host_allowed(url);

		self.observer.on_host_validated(url, host_allowed);

		if !host_allowed {
			span.record_url_valid(false);

			return Ok(None);
		}

		let host = url.host_str().unwrap_or_default();

		if !url.scheme().eq_ignore_ascii_case("https") && !host::is_loopback_host(host) {
			span.record_url_valid(false);

			return Err(Error::InsecureTransport {
				scheme: url.scheme().to_owned(),
				host: host.to_owned(),
			});
		}

		span.record_url_valid(true);

		let claims = context.decode_claims()?;

		span.record_claims_provided(claims.is_some());
		self.observer.on_claims(claims.is_some());

		let request = TokenRequest::new(self.scopes.clone()).with_claims(claims);

		span.record_scopes(&request.scopes);

		let token = self.credential.get_token(&request).await?;

		Ok(Some(token))
	}

	fn record_outcome(&self, outcome: GateOutcome) {
		obs::record_outcome(outcome);
		self.observer.on_outcome(outcome);
	}
}
impl Debug for TokenGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGate")
			.field("scopes", &self.scopes)
			.field("allowed_hosts", &self.allowed_hosts)
			.field("observability_name", &self.observability_name)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicBool, Ordering};
	// self
	use super::*;
	use crate::{
		_preludet::{CountingObserver, RecordingCredential, build_recording_gate},
		credential::{CredentialError, CredentialFuture},
	};

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[tokio::test]
	async fn issues_token_for_default_host() {
		let (gate, credential) = build_recording_gate("token");
		let token = gate
			.get_authorization_token(&url("https://graph.microsoft.com/v1.0/me"), &Default::default())
			.await
			.expect("Allowed https host should be authorized.")
			.expect("A token should be issued.");

		assert_eq!(token.secret(), "token");

		let request = credential.last_request().expect("Credential should have been called.");

		assert_eq!(request.scopes, ScopeSet::default_scope());
		assert!(!request.conditional_access_enabled);
		assert_eq!(request.claims, None);
	}

	#[tokio::test]
	async fn observer_sees_every_decision() {
		let credential = Arc::new(RecordingCredential::new("token"));
		let observer = Arc::new(CountingObserver::default());
		let gate = TokenGate::builder()
			.credential(credential)
			.observer(observer.clone())
			.build()
			.expect("Gate should build.");
		let ctx = AuthenticationContext::with_claims("e30=");

		gate.get_authorization_token(&url("https://graph.microsoft.com"), &ctx)
			.await
			.expect("Allowed host should be authorized.");
		gate.get_authorization_token(&url("https://example.com"), &ctx)
			.await
			.expect("Disallowed hosts never error.");
		gate.get_authorization_token(&url("http://graph.microsoft.com"), &ctx)
			.await
			.expect_err("Plain http must be rejected.");

		assert_eq!(CountingObserver::get(&observer.hosts_valid), 2);
		assert_eq!(CountingObserver::get(&observer.hosts_invalid), 1);
		assert_eq!(CountingObserver::get(&observer.claims_provided), 1);
		assert_eq!(CountingObserver::get(&observer.issued), 1);
		assert_eq!(CountingObserver::get(&observer.failures), 1);
	}

	struct HangingCredential {
		dropped: Arc<AtomicBool>,
	}
	impl CredentialSource for HangingCredential {
		fn get_token<'a>(&'a self, _request: &'a TokenRequest) -> CredentialFuture<'a> {
			struct DropFlag(Arc<AtomicBool>);
			impl Drop for DropFlag {
				fn drop(&mut self) {
					self.0.store(true, Ordering::SeqCst);
				}
			}

			let flag = DropFlag(self.dropped.clone());

			Box::pin(async move {
				let _flag = flag;

				std::future::pending::<()>().await;

				Err(CredentialError::Unavailable { message: "unreachable".into() })
			})
		}
	}

	#[tokio::test]
	async fn dropping_the_call_cancels_the_credential() {
		let dropped = Arc::new(AtomicBool::new(false));
		let gate = TokenGate::new(Arc::new(HangingCredential { dropped: dropped.clone() }));
		let target = url("https://graph.microsoft.com");
		let ctx = AuthenticationContext::none();
		let outcome = tokio::time::timeout(
			std::time::Duration::from_millis(20),
			gate.get_authorization_token(&target, &ctx),
		)
		.await;

		assert!(outcome.is_err(), "The credential call should still be pending at the deadline.");
		assert!(dropped.load(Ordering::SeqCst), "The pending credential future must be dropped.");
	}

	struct SuffixPolicy(&'static str);
	impl HostPolicy for SuffixPolicy {
		fn is_host_allowed(&self, url: &Url) -> bool {
			url.host_str().is_some_and(|host| host.ends_with(self.0))
		}
	}

	#[tokio::test]
	async fn custom_host_policy_drives_the_decision() {
		let credential = Arc::new(RecordingCredential::new("token"));
		let gate = TokenGate::builder()
			.credential(credential.clone())
			.host_policy(Arc::new(SuffixPolicy(".contoso.com")))
			.build()
			.expect("Gate should build.");
		let ctx = AuthenticationContext::none();

		assert!(
			gate.get_authorization_token(&url("https://api.contoso.com/v1"), &ctx)
				.await
				.expect("Suffix match should be authorized.")
				.is_some()
		);
		assert!(
			gate.get_authorization_token(&url("https://graph.microsoft.com"), &ctx)
				.await
				.expect("Hosts outside the policy never error.")
				.is_none()
		);
		assert!(matches!(
			gate.get_authorization_token(&url("http://api.contoso.com"), &ctx).await,
			Err(Error::InsecureTransport { .. })
		));
		assert_eq!(credential.calls(), 1);
		assert_eq!(gate.allowed_hosts(), &AllowedHosts::default_hosts());
	}

	#[test]
	fn debug_output_omits_the_credential() {
		let (gate, _) = build_recording_gate("secret-token");
		let rendered = format!("{gate:?}");

		assert!(rendered.contains("graph.microsoft.com"));
		assert!(!rendered.contains("secret-token"));
	}
}
