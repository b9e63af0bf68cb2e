//! Demonstrates signing outbound `reqwest` requests with a token gate, then retrying after the
//! resource answers with a conditional-access claims challenge.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use token_gate::{
	auth::AuthenticationContext,
	challenge,
	credential::StaticCredential,
	gate::TokenGate,
	reqwest::{Client, Method, Request},
	signer::RequestSigner,
	url::Url,
};

const CLAIMS: &str = "eyJhY2Nlc3NfdG9rZW4iOnsibmJmIjp7ImVzc2VudGlhbCI6dHJ1ZSwgInZhbHVlIjoiMTY1MjgxMzUwOCJ9fX0=";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let challenge_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/me").header("authorization", "Bearer demo-token");
			then.status(401).header(
				"www-authenticate",
				format!("Bearer realm=\"\", error=\"insufficient_claims\", claims=\"{CLAIMS}\""),
			);
		})
		.await;
	let gate = TokenGate::builder()
		.credential(Arc::new(StaticCredential::new("demo-token")))
		.scopes(["api://demo/.default"])
		.allowed_hosts(["127.0.0.1", "localhost"])
		.observability_name("demo-gate")
		.build()?;
	let client = Client::new();
	let target = Url::parse(&server.url("/v1.0/me"))?;
	let request = gate
		.sign(Request::new(Method::GET, target.clone()), &AuthenticationContext::none())
		.await?;
	let response = client.execute(request).await?;

	println!("First attempt answered with {}.", response.status());

	challenge_mock.assert_async().await;

	if let Some(context) = challenge::claims_from_response(&response) {
		let claims = context.decode_claims()?.map(|claims| claims.to_string()).unwrap_or_default();

		println!("Resource requested claims: {claims}.");

		let retry = gate.sign(Request::new(Method::GET, target), &context).await?;

		println!(
			"Retry carries an authorization header: {}.",
			retry.headers().contains_key("authorization")
		);
	}

	Ok(())
}
