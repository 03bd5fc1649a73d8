//! Session key derivation.

use std::fmt;

/// Marker used in place of a target id when the caller wants the endpoint's
/// default tab.
const DEFAULT_TARGET: &str = "default";

/// Stable identity of one (endpoint, target) pair.
///
/// Two keys built from the same pair always compare equal, so they index the
/// same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
	endpoint: String,
	target: String,
}

impl SessionKey {
	/// Derives the key for `endpoint` and an optional target id.
	pub fn new(endpoint: impl Into<String>, target_id: Option<&str>) -> Self {
		Self {
			endpoint: endpoint.into(),
			target: target_id.unwrap_or(DEFAULT_TARGET).to_string(),
		}
	}

	/// The endpoint address this key was derived from.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// The target id, or `None` when the key addresses the default tab.
	pub fn target_id(&self) -> Option<&str> {
		(self.target != DEFAULT_TARGET).then_some(self.target.as_str())
	}
}

impl fmt::Display for SessionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}#{}", self.endpoint, self.target)
	}
}
