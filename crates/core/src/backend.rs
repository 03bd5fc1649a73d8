//! Capability traits for the browser control backend.
//!
//! The relay never owns a browser process or speaks the wire protocol
//! itself. Everything it needs from the outside world passes through these
//! three traits: locate a tab, open a command/event channel to it, and wait
//! for page readiness. Production code implements them over a real protocol
//! connection; tests implement them in memory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Synchronous event listener invoked on every backend-pushed event.
///
/// Listeners run on the backend's delivery path and must not block; spawn
/// any slow work onto a task.
pub type EventListener = Arc<dyn Fn(Value) + Send + Sync>;

/// Locates tabs and opens protocol sessions against them.
#[async_trait]
pub trait BrowserBackend: Send + Sync {
	/// Locates (or creates) the logical tab for `endpoint` and `target_id`.
	///
	/// A missing `target_id` selects the endpoint's default tab.
	async fn resolve_target(
		&self,
		endpoint: &str,
		target_id: Option<&str>,
	) -> Result<Arc<dyn PageHandle>>;

	/// Opens a command/event channel for a resolved tab.
	async fn open_session(&self, page: &Arc<dyn PageHandle>) -> Result<Arc<dyn SessionChannel>>;
}

/// A per-tab protocol channel: send commands, subscribe to pushed events.
#[async_trait]
pub trait SessionChannel: Send + Sync {
	/// Issues a protocol command and awaits its reply.
	///
	/// Implementations report round-trip failures as
	/// [`Error::CommandFailed`](crate::Error::CommandFailed) naming `method`.
	async fn send(&self, method: &str, params: Value) -> Result<Value>;

	/// Subscribes `listener` to backend-pushed events named `method`.
	fn on_event(&self, method: &str, listener: EventListener);

	/// Releases the channel. Best-effort; callers swallow the error.
	async fn close(&self) -> Result<()>;
}

/// Back-reference to the logical tab a session is attached to.
///
/// The relay never releases the page; it belongs to the backend.
#[async_trait]
pub trait PageHandle: Send + Sync {
	/// Waits until the page reports content readiness, up to `timeout`.
	async fn wait_for_ready(&self, timeout: Duration) -> Result<()>;
}
