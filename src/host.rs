//! Host allow-list policy consulted before any token is issued.
//!
//! [`HostPolicy`] is the narrow seam the gate consumes; [`AllowedHosts`] is the built-in
//! implementation, an immutable case-insensitive set of exact host names.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

/// Host names the gate serves when the caller supplies none.
pub const DEFAULT_ALLOWED_HOSTS: [&str; 6] = [
	"graph.microsoft.com",
	"graph.microsoft.us",
	"dod-graph.microsoft.us",
	"graph.microsoft.de",
	"microsoftgraph.chinacloudapi.cn",
	"canary.graph.microsoft.com",
];

/// Loopback aliases allowed to receive tokens over plain HTTP for local development.
pub const LOOPBACK_HOSTS: [&str; 4] = ["localhost", "127.0.0.1", "::1", "[::1]"];

/// Errors emitted when validating allowed host entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum HostPolicyError {
	/// Host entries cannot be empty.
	#[error("Allowed host entries cannot be empty.")]
	Empty,
	/// Host entries must be bare host names.
	#[error("Allowed host `{host}` must not contain a scheme prefix.")]
	SchemeInHost {
		/// The offending entry.
		host: String,
	},
	/// Host entries cannot carry a port or path; matching only sees the host name.
	#[error("Allowed host `{host}` must not contain a port or path.")]
	PortOrPath {
		/// The offending entry.
		host: String,
	},
	/// Host entries cannot contain whitespace.
	#[error("Allowed host contains whitespace: {host}.")]
	ContainsWhitespace {
		/// The offending entry.
		host: String,
	},
}

/// Decides whether a URL's host may receive a token.
pub trait HostPolicy
where
	Self: Send + Sync,
{
	/// Returns true when requests to `url` may carry a token.
	fn is_host_allowed(&self, url: &Url) -> bool;
}

/// Immutable set of lower-cased host names permitted to receive tokens.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AllowedHosts(Arc<BTreeSet<String>>);
impl AllowedHosts {
	/// Creates a validated host set from any iterator.
	pub fn new<I, S>(hosts: I) -> Result<Self, HostPolicyError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut set = BTreeSet::new();

		for host in hosts {
			set.insert(normalize(host.as_ref())?);
		}

		Ok(Self(Arc::new(set)))
	}

	/// Validates `hosts`, falling back to [`DEFAULT_ALLOWED_HOSTS`] when none are supplied.
	pub fn or_default_hosts<I, S>(hosts: I) -> Result<Self, HostPolicyError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let set = Self::new(hosts)?;

		if set.is_empty() { Ok(Self::default_hosts()) } else { Ok(set) }
	}

	/// Returns the built-in host set.
	pub fn default_hosts() -> Self {
		Self(Arc::new(DEFAULT_ALLOWED_HOSTS.iter().map(|host| (*host).to_owned()).collect()))
	}

	/// Number of hosts in the set.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no hosts are permitted.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Case-insensitive membership check for a bare host name.
	pub fn contains(&self, host: &str) -> bool {
		self.0.contains(&host.to_ascii_lowercase())
	}

	/// Iterator over the lower-cased hosts in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}
impl HostPolicy for AllowedHosts {
	fn is_host_allowed(&self, url: &Url) -> bool {
		let Some(host) = url.host_str() else {
			return false;
		};

		// IPv6 literals come back bracketed from `Url`.
		self.contains(host) || self.contains(host.trim_start_matches('[').trim_end_matches(']'))
	}
}
impl Debug for AllowedHosts {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_set().entries(self.0.iter()).finish()
	}
}
impl TryFrom<Vec<String>> for AllowedHosts {
	type Error = HostPolicyError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<AllowedHosts> for Vec<String> {
	fn from(value: AllowedHosts) -> Self {
		value.0.iter().cloned().collect()
	}
}

/// Returns true when `host` is one of the [`LOOPBACK_HOSTS`] aliases.
pub fn is_loopback_host(host: &str) -> bool {
	LOOPBACK_HOSTS.iter().any(|alias| alias.eq_ignore_ascii_case(host))
}

fn normalize(host: &str) -> Result<String, HostPolicyError> {
	if host.is_empty() {
		return Err(HostPolicyError::Empty);
	}
	if host.chars().any(char::is_whitespace) {
		return Err(HostPolicyError::ContainsWhitespace { host: host.to_owned() });
	}

	let lowered = host.to_ascii_lowercase();

	if lowered.starts_with("http://") || lowered.starts_with("https://") {
		return Err(HostPolicyError::SchemeInHost { host: host.to_owned() });
	}
	if has_port_or_path(&lowered) {
		return Err(HostPolicyError::PortOrPath { host: host.to_owned() });
	}

	Ok(lowered)
}

fn has_port_or_path(host: &str) -> bool {
	if host.contains('/') {
		return true;
	}

	match host.strip_prefix('[') {
		// Bracketed IPv6 literal: anything after the closing bracket is a port.
		Some(rest) => rest.split_once(']').is_none_or(|(_, tail)| !tail.is_empty()),
		// Bare IPv6 literals carry several colons; a single colon separates a port.
		None => host.matches(':').count() == 1,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn defaults_cover_the_six_national_clouds() {
		let hosts = AllowedHosts::or_default_hosts(Vec::<String>::new())
			.expect("Empty host input should fall back to defaults.");

		assert_eq!(hosts.len(), 6);

		for host in DEFAULT_ALLOWED_HOSTS {
			assert!(hosts.contains(host), "Default hosts should include {host}.");
		}
	}

	#[test]
	fn matching_is_case_insensitive_and_port_agnostic() {
		let hosts = AllowedHosts::new(["Graph.Microsoft.com"]).expect("Host should be valid.");

		assert!(hosts.is_host_allowed(&url("https://GRAPH.microsoft.com/v1.0/me")));
		assert!(hosts.is_host_allowed(&url("https://graph.microsoft.com:8443/v1.0/me")));
		assert!(!hosts.is_host_allowed(&url("https://differenthost.com")));
		assert!(!hosts.is_host_allowed(&url("https://sub.graph.microsoft.com")));
	}

	#[test]
	fn ipv6_literals_match_with_or_without_brackets() {
		let bare = AllowedHosts::new(["::1"]).expect("Bare IPv6 literal should be valid.");
		let bracketed = AllowedHosts::new(["[::1]"]).expect("Bracketed literal should be valid.");
		let target = url("http://[::1]:8080/api");

		assert!(bare.is_host_allowed(&target));
		assert!(bracketed.is_host_allowed(&target));
	}

	#[test]
	fn invalid_entries_are_rejected() {
		assert_eq!(AllowedHosts::new([""]), Err(HostPolicyError::Empty));
		assert!(matches!(
			AllowedHosts::new(["https://graph.microsoft.com"]),
			Err(HostPolicyError::SchemeInHost { .. })
		));
		assert!(matches!(
			AllowedHosts::new(["HTTP://example.com"]),
			Err(HostPolicyError::SchemeInHost { .. })
		));
		for entry in ["localhost:8080", "[::1]:8080", "example.com/api", "[::1"] {
			assert!(
				matches!(AllowedHosts::new([entry]), Err(HostPolicyError::PortOrPath { .. })),
				"{entry} should be rejected."
			);
		}

		assert!(AllowedHosts::new(["::1", "[::1]", "fe80::1"]).is_ok());
		assert!(matches!(
			AllowedHosts::new(["two hosts"]),
			Err(HostPolicyError::ContainsWhitespace { .. })
		));
	}

	#[test]
	fn loopback_aliases() {
		for alias in LOOPBACK_HOSTS {
			assert!(is_loopback_host(alias));
		}

		assert!(is_loopback_host("LOCALHOST"));
		assert!(!is_loopback_host("localhost.example.com"));
		assert!(!is_loopback_host("127.0.0.2"));
	}

	#[test]
	fn serde_round_trip_validates() {
		let hosts: AllowedHosts = serde_json::from_str("[\"example.com\"]")
			.expect("Host array should deserialize successfully.");

		assert!(hosts.contains("EXAMPLE.com"));
		assert!(serde_json::from_str::<AllowedHosts>("[\"https://example.com\"]").is_err());
		assert_eq!(
			serde_json::to_string(&hosts).expect("Host set should serialize."),
			"[\"example.com\"]"
		);
	}
}
