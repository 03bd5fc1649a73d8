//! Relay error types.

use thiserror::Error;

/// Result alias used throughout the relay.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to relay callers.
///
/// Only primary, caller-initiated commands produce errors. Best-effort
/// cleanup paths (frame acknowledgement, stop commands during teardown,
/// channel release) are logged and swallowed so logical state transitions
/// always complete.
#[derive(Debug, Error)]
pub enum Error {
	/// Target resolution or session open failed; the operation was aborted
	/// with no partial state retained.
	#[error("backend unavailable: {context}")]
	BackendUnavailable {
		/// What the backend refused to do.
		context: String,
	},

	/// A protocol command round-trip failed.
	#[error("{command} failed: {message}")]
	CommandFailed {
		/// The command that failed.
		command: String,
		/// Backend-reported reason.
		message: String,
	},

	/// An operation that reuses an existing session was called against a key
	/// with no registered session.
	#[error("no active session for '{key}'")]
	NoActiveSession {
		/// The unknown session key.
		key: String,
	},
}

impl Error {
	pub(crate) fn backend_unavailable(source: impl std::fmt::Display) -> Self {
		Self::BackendUnavailable {
			context: source.to_string(),
		}
	}
}
