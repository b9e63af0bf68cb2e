//! Claims challenge extraction from `WWW-Authenticate` headers.
//!
//! Resources that enforce conditional access reject stale tokens with `401` plus a `Bearer`
//! challenge whose `claims` parameter carries the base64 claims the next token must satisfy:
//!
//! ```text
//! WWW-Authenticate: Bearer realm="", error="insufficient_claims", claims="eyJhY2Nlc3NfdG9rZW4iOnt9fQ=="
//! ```
//!
//! The helpers here turn such a header into an [`AuthenticationContext`] ready to be passed back
//! to [`TokenGate::get_authorization_token`](crate::gate::TokenGate::get_authorization_token).

// std
use std::{iter::Peekable, str::Chars};
// self
use crate::auth::AuthenticationContext;

/// Extracts the `claims` parameter of the first `Bearer` challenge in `header`.
///
/// Returns `None` when no `Bearer` challenge carries a non-empty `claims` parameter.
pub fn claims_from_www_authenticate(header: &str) -> Option<AuthenticationContext> {
	parse_challenges(header)
		.into_iter()
		.filter(|challenge| challenge.scheme.eq_ignore_ascii_case("bearer"))
		.find_map(|challenge| challenge.param("claims").filter(|claims| !claims.is_empty()))
		.map(AuthenticationContext::with_claims)
}

/// Reads a claims challenge from a `401 Unauthorized` response.
#[cfg(feature = "reqwest")]
pub fn claims_from_response(response: &reqwest::Response) -> Option<AuthenticationContext> {
	if response.status() != reqwest::StatusCode::UNAUTHORIZED {
		return None;
	}

	response
		.headers()
		.get_all(reqwest::header::WWW_AUTHENTICATE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.find_map(claims_from_www_authenticate)
}

#[derive(Debug)]
struct Challenge {
	scheme: String,
	params: Vec<(String, String)>,
}
impl Challenge {
	fn param(&self, name: &str) -> Option<String> {
		self.params
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.clone())
	}
}

struct Cursor<'a> {
	chars: Peekable<Chars<'a>>,
}
impl<'a> Cursor<'a> {
	fn new(raw: &'a str) -> Self {
		Self { chars: raw.chars().peekable() }
	}

	fn skip_separators(&mut self) {
		while self.chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
	}

	fn skip_whitespace(&mut self) {
		while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
	}

	fn token(&mut self) -> Option<String> {
		let mut buf = String::new();

		while let Some(c) = self.chars.next_if(|c| is_tchar(*c)) {
			buf.push(c);
		}

		(!buf.is_empty()).then_some(buf)
	}

	fn value(&mut self) -> String {
		let mut buf = String::new();

		if self.chars.next_if_eq(&'"').is_some() {
			let mut escaped = false;

			for c in self.chars.by_ref() {
				match c {
					_ if escaped => {
						buf.push(c);

						escaped = false;
					},
					'\\' => escaped = true,
					'"' => break,
					_ => buf.push(c),
				}
			}
		} else {
			while let Some(c) = self.chars.next_if(|c| !c.is_whitespace() && *c != ',') {
				buf.push(c);
			}
		}

		buf
	}
}

fn parse_challenges(header: &str) -> Vec<Challenge> {
	let mut cursor = Cursor::new(header);
	let mut challenges: Vec<Challenge> = Vec::new();

	loop {
		cursor.skip_separators();

		let Some(token) = cursor.token() else {
			break;
		};

		cursor.skip_whitespace();

		if cursor.chars.next_if_eq(&'=').is_some() {
			cursor.skip_whitespace();

			let value = cursor.value();

			// Parameters before any scheme are malformed and dropped.
			if let Some(current) = challenges.last_mut() {
				current.params.push((token, value));
			}
		} else {
			challenges.push(Challenge { scheme: token, params: Vec::new() });
		}
	}

	challenges
}

// RFC 9110 `tchar`.
fn is_tchar(c: char) -> bool {
	c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CLAIMS: &str = "eyJhY2Nlc3NfdG9rZW4iOnsibmJmIjp7ImVzc2VudGlhbCI6dHJ1ZSwgInZhbHVlIjoiMTYwNDEwNjY1MSJ9fX0=";

	#[test]
	fn extracts_claims_from_bearer_challenge() {
		let header = format!(
			"Bearer realm=\"\", authorization_uri=\"https://login.microsoftonline.com/common/oauth2/authorize\", client_id=\"00000003-0000-0000-c000-000000000000\", error=\"insufficient_claims\", claims=\"{CLAIMS}\""
		);
		let ctx = claims_from_www_authenticate(&header).expect("Claims should be extracted.");

		assert_eq!(ctx.claims.as_deref(), Some(CLAIMS));

		let claims = ctx
			.decode_claims()
			.expect("Extracted claims should decode.")
			.expect("Extracted claims should be present.");

		assert!(claims.as_str().contains("1604106651"));
	}

	#[test]
	fn finds_bearer_among_multiple_challenges() {
		let header = format!("Negotiate, Basic realm=\"files\", bearer claims={CLAIMS}");
		let ctx = claims_from_www_authenticate(&header).expect("Bearer challenge should be found.");

		assert_eq!(ctx.claims.as_deref(), Some(CLAIMS));
	}

	#[test]
	fn quoted_values_unescape() {
		let challenges = parse_challenges(r#"Bearer realm="a \"quoted\" realm", error=invalid_token"#);

		assert_eq!(challenges.len(), 1);
		assert_eq!(challenges[0].param("realm").as_deref(), Some("a \"quoted\" realm"));
		assert_eq!(challenges[0].param("ERROR").as_deref(), Some("invalid_token"));
	}

	#[test]
	fn ignores_challenges_without_claims() {
		assert!(claims_from_www_authenticate("Bearer realm=\"\", error=\"invalid_token\"").is_none());
		assert!(claims_from_www_authenticate("Basic claims=\"e30=\"").is_none());
		assert!(claims_from_www_authenticate("Bearer claims=\"\"").is_none());
		assert!(claims_from_www_authenticate("").is_none());
		assert!(claims_from_www_authenticate("\"unterminated").is_none());
	}
}
