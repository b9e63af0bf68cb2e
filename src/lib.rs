//! Host-aware bearer token gate—decide when outbound HTTPS requests get an access token,
//! validate conditional-access claims, and delegate issuance to any credential source.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod challenge;
pub mod config;
pub mod credential;
pub mod error;
pub mod gate;
pub mod host;
pub mod obs;
#[cfg(feature = "reqwest")] pub mod signer;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and test doubles for integration tests; enabled via `cfg(test)` or
	//! the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		auth::{AccessToken, TokenRequest},
		credential::{CredentialError, CredentialFuture, CredentialSource},
		gate::TokenGate,
		obs::{GateObserver, GateOutcome},
	};

	/// Credential double that hands out a fixed token (or error) and captures every request.
	#[derive(Debug, Default)]
	pub struct RecordingCredential {
		token: String,
		failure: Option<String>,
		requests: Mutex<Vec<TokenRequest>>,
	}
	impl RecordingCredential {
		/// Creates a credential that answers every request with `token`.
		pub fn new(token: impl Into<String>) -> Self {
			Self { token: token.into(), ..Default::default() }
		}

		/// Creates a credential that reports itself unavailable with the provided message.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { failure: Some(message.into()), ..Default::default() }
		}

		/// Number of times the gate invoked the credential.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}

		/// Most recent request observed by the credential.
		pub fn last_request(&self) -> Option<TokenRequest> {
			self.requests.lock().last().cloned()
		}
	}
	impl CredentialSource for RecordingCredential {
		fn get_token<'a>(&'a self, request: &'a TokenRequest) -> CredentialFuture<'a> {
			Box::pin(async move {
				self.requests.lock().push(request.clone());

				match &self.failure {
					Some(message) =>
						Err(CredentialError::Unavailable { message: message.clone() }),
					None => Ok(AccessToken::new(self.token.clone())),
				}
			})
		}
	}

	/// Observer double counting every hook invocation.
	#[derive(Debug, Default)]
	pub struct CountingObserver {
		/// Host validations that passed.
		pub hosts_valid: AtomicUsize,
		/// Host validations that failed.
		pub hosts_invalid: AtomicUsize,
		/// Calls that carried claims.
		pub claims_provided: AtomicUsize,
		/// Calls that ended with an issued token.
		pub issued: AtomicUsize,
		/// Calls that ended with an error.
		pub failures: AtomicUsize,
	}
	impl CountingObserver {
		/// Reads a counter.
		pub fn get(counter: &AtomicUsize) -> usize {
			counter.load(Ordering::Relaxed)
		}
	}
	impl GateObserver for CountingObserver {
		fn on_host_validated(&self, _url: &Url, valid: bool) {
			if valid {
				self.hosts_valid.fetch_add(1, Ordering::Relaxed);
			} else {
				self.hosts_invalid.fetch_add(1, Ordering::Relaxed);
			}
		}

		fn on_claims(&self, provided: bool) {
			if provided {
				self.claims_provided.fetch_add(1, Ordering::Relaxed);
			}
		}

		fn on_outcome(&self, outcome: GateOutcome) {
			match outcome {
				GateOutcome::Issued => {
					self.issued.fetch_add(1, Ordering::Relaxed);
				},
				GateOutcome::Failure => {
					self.failures.fetch_add(1, Ordering::Relaxed);
				},
				GateOutcome::Attempt | GateOutcome::Skipped => {},
			}
		}
	}

	/// Builds a gate with default scopes + hosts backed by a [`RecordingCredential`].
	pub fn build_recording_gate(token: &str) -> (TokenGate, Arc<RecordingCredential>) {
		let credential = Arc::new(RecordingCredential::new(token));
		let gate = TokenGate::new(credential.clone());

		(gate, credential)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::Request as ReqwestRequest;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};
