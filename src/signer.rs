//! Request signing contracts that attach gate-issued bearer tokens to outbound requests.

// crates.io
use reqwest::header::{AUTHORIZATION, HeaderValue};
// self
use crate::{_prelude::*, auth::AuthenticationContext, gate::TokenGate};

/// Boxed future returned by [`RequestSigner::sign`].
pub type SignFuture<'a, Request> = Pin<Box<dyn Future<Output = Result<Request>> + 'a + Send>>;

/// Describes how to authorize an outbound request without constraining the HTTP client type.
pub trait RequestSigner<Request>
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it with authorization state applied.
	fn sign<'a>(
		&'a self,
		request: Request,
		context: &'a AuthenticationContext,
	) -> SignFuture<'a, Request>
	where
		Request: 'a;
}

/// Bearer semantics for [`reqwest::Request`]:
///
/// - a claims challenge in `context` discards any existing `Authorization` header so a fresh
///   token is requested;
/// - an `Authorization` header that is still present is left untouched;
/// - otherwise `Authorization: Bearer <token>` is set when the gate issues a token, and the
///   request is returned unchanged when the host is skipped.
impl RequestSigner<ReqwestRequest> for TokenGate {
	fn sign<'a>(
		&'a self,
		mut request: ReqwestRequest,
		context: &'a AuthenticationContext,
	) -> SignFuture<'a, ReqwestRequest>
	where
		ReqwestRequest: 'a,
	{
		Box::pin(async move {
			if context.has_claims() {
				request.headers_mut().remove(AUTHORIZATION);
			}
			if request.headers().contains_key(AUTHORIZATION) {
				return Ok(request);
			}

			let url = request.url().clone();

			if let Some(token) = self.get_authorization_token(&url, context).await? {
				let mut value = HeaderValue::from_str(&format!("Bearer {}", token.secret()))?;

				value.set_sensitive(true);
				request.headers_mut().insert(AUTHORIZATION, value);
			}

			Ok(request)
		})
	}
}
