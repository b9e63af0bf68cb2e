//! Ordered scope lists requested from credential sources.

// std
use std::{collections::HashSet, slice::Iter};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered list of distinct resource scopes.
///
/// Unlike OAuth `scope` parameters, resource scopes such as `https://graph.microsoft.com/.default`
/// are order sensitive for some identity backends, so the caller's order is preserved and only
/// repeated entries are dropped (first occurrence wins). The list is shared behind an [`Arc`] and
/// never mutated after construction.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(Arc<[String]>);
impl ScopeSet {
	/// Scope requested when the caller supplies none.
	pub const DEFAULT_SCOPE: &'static str = "https://graph.microsoft.com/.default";

	/// Creates a validated scope list from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut seen = HashSet::new();
		let mut ordered = Vec::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
			}
			if seen.insert(owned.clone()) {
				ordered.push(owned);
			}
		}

		Ok(Self(Arc::from(ordered)))
	}

	/// Validates `scopes`, falling back to [`ScopeSet::DEFAULT_SCOPE`] when none are supplied.
	pub fn or_default_scope<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let set = Self::new(scopes)?;

		if set.is_empty() { Ok(Self::default_scope()) } else { Ok(set) }
	}

	/// Returns the single-entry default scope list.
	pub fn default_scope() -> Self {
		Self(Arc::from(vec![Self::DEFAULT_SCOPE.to_owned()]))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the scopes joined with `,`, the form recorded on observability spans.
	pub fn joined(&self) -> String {
		self.0.join(",")
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.0).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join(" "))
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeSet {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
impl TryFrom<Vec<String>> for ScopeSet {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeSet::new(values).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_keep_caller_order_and_drop_repeats() {
		let scopes = ScopeSet::new(["User.Read", "Mail.Send", "User.Read"])
			.expect("Scope list with a repeat should be valid.");

		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["User.Read", "Mail.Send"]);
		assert_eq!(scopes.joined(), "User.Read,Mail.Send");
		assert!(scopes.contains("Mail.Send"));
		assert!(!scopes.contains("Files.Read"));
	}

	#[test]
	fn empty_input_falls_back_to_default_scope() {
		let scopes = ScopeSet::or_default_scope(Vec::<String>::new())
			.expect("Empty scope input should fall back to the default scope.");

		assert_eq!(scopes.as_slice(), [ScopeSet::DEFAULT_SCOPE.to_owned()]);

		let custom = ScopeSet::or_default_scope(["api://app/.default"])
			.expect("Explicit scopes should be kept.");

		assert_eq!(custom.len(), 1);
		assert!(custom.contains("api://app/.default"));
	}

	#[test]
	fn invalid_scopes_error() {
		assert_eq!(ScopeSet::new([""]), Err(ScopeValidationError::Empty));
		assert!(matches!(
			ScopeSet::new(["contains space"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
		assert!(ScopeSet::from_str("").is_ok(), "Empty string represents an empty scope list.");
		assert!(ScopeSet::from_str("   ").is_err(), "Whitespace-only input must be rejected.");
	}

	#[test]
	fn deserialization_validates_entries() {
		let scopes: ScopeSet = serde_json::from_str("[\"b\",\"a\"]")
			.expect("Scope array should deserialize successfully.");

		assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["b", "a"]);
		assert!(serde_json::from_str::<ScopeSet>("[\"with space\"]").is_err());
	}
}
