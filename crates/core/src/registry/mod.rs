//! Session registry: ownership and lifecycle of per-tab sessions.

mod input;
mod navigate;

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tabcast_protocol::{ScreencastFrame, StreamConfig};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::{BrowserBackend, PageHandle, SessionChannel};
use crate::error::{Error, Result};
use crate::key::SessionKey;
use crate::streaming::{FrameCallback, FrameSink, frame_listener};

/// One registered streaming session.
struct SessionRecord {
	channel: Arc<dyn SessionChannel>,
	page: Arc<dyn PageHandle>,
	sink: Arc<FrameSink>,
}

/// Per-key cell. All mutating operations for a key hold this lock across
/// their backend round-trips, which serializes replace/stop/start races.
#[derive(Default)]
struct Slot {
	record: Option<SessionRecord>,
}

/// Diagnostics snapshot of a registered session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
	/// Whether frames are currently being delivered.
	pub streaming: bool,
}

/// The registry of live per-tab sessions.
///
/// Owns every registered [`SessionChannel`] exclusively and guarantees at
/// most one live stream per [`SessionKey`]. Construct one per process and
/// call [`stop_all`](Self::stop_all) at shutdown; tests construct isolated
/// instances over a mock backend.
pub struct SessionRegistry {
	backend: Arc<dyn BrowserBackend>,
	slots: DashMap<SessionKey, Arc<Mutex<Slot>>>,
}

impl SessionRegistry {
	/// Creates a registry over the given backend.
	pub fn new(backend: Arc<dyn BrowserBackend>) -> Self {
		Self {
			backend,
			slots: DashMap::new(),
		}
	}

	/// Starts a screencast stream for `key`, delivering frames to `on_frame`.
	///
	/// A live stream under the same key is fully stopped first, so a restart
	/// never leaves two backend sessions attached to one tab. On a start
	/// failure the partially built session is rolled back and the error is
	/// returned; no streaming entry survives a failed start.
	pub async fn start_streaming<F>(
		&self,
		key: &SessionKey,
		config: StreamConfig,
		on_frame: F,
	) -> Result<SessionKey>
	where
		F: Fn(ScreencastFrame) + Send + Sync + 'static,
	{
		let slot = self.slot(key);
		let mut slot = slot.lock().await;

		if let Some(existing) = slot.record.take() {
			debug!(key = %key, "replacing live session");
			teardown(key, existing).await;
		}

		let page = self
			.backend
			.resolve_target(key.endpoint(), key.target_id())
			.await
			.map_err(unavailable)?;
		let channel = self.backend.open_session(&page).await.map_err(unavailable)?;

		let callback: FrameCallback = Arc::new(on_frame);
		let sink = FrameSink::new(callback);
		sink.begin_start();

		// Subscribe before the start command so the first frame cannot race
		// the subscription.
		channel.on_event(
			"Page.screencastFrame",
			frame_listener(Arc::clone(&sink), Arc::clone(&channel)),
		);

		if let Err(error) = channel.send("Page.startScreencast", config.to_params()).await {
			sink.abort_start();
			if let Err(close_error) = channel.close().await {
				debug!(key = %key, error = %close_error, "channel release failed after start failure");
			}
			return Err(error);
		}

		sink.activate();
		slot.record = Some(SessionRecord {
			channel,
			page,
			sink,
		});
		debug!(key = %key, "stream started");
		Ok(key.clone())
	}

	/// Stops the stream for `key` and removes its record.
	///
	/// Succeeds on unknown keys. Backend failures during teardown are logged
	/// and swallowed; the record is removed either way.
	pub async fn stop_streaming(&self, key: &SessionKey) -> Result<()> {
		let Some(slot) = self.existing_slot(key) else {
			return Ok(());
		};
		let mut slot = slot.lock().await;
		let Some(record) = slot.record.take() else {
			return Ok(());
		};
		teardown(key, record).await;
		debug!(key = %key, "stream stopped");
		Ok(())
	}

	/// Returns a status snapshot for `key`, or `None` when no session is
	/// registered.
	pub async fn lookup(&self, key: &SessionKey) -> Option<SessionStatus> {
		let slot = self.existing_slot(key)?;
		let slot = slot.lock().await;
		slot.record.as_ref().map(|record| SessionStatus {
			streaming: record.sink.is_streaming(),
		})
	}

	/// Stops every registered stream, tolerating individual failures.
	pub async fn stop_all(&self) {
		// Snapshot the keys; the map may be mutated while we drive stops.
		let keys: Vec<SessionKey> = self.slots.iter().map(|entry| entry.key().clone()).collect();
		for key in keys {
			if let Err(error) = self.stop_streaming(&key).await {
				warn!(key = %key, error = %error, "stop failed during shutdown");
			}
		}
	}

	/// Returns the handles of the registered session for `key`, if any.
	pub(crate) async fn registered(
		&self,
		key: &SessionKey,
	) -> Option<(Arc<dyn SessionChannel>, Arc<dyn PageHandle>)> {
		let slot = self.existing_slot(key)?;
		let slot = slot.lock().await;
		slot.record
			.as_ref()
			.map(|record| (Arc::clone(&record.channel), Arc::clone(&record.page)))
	}

	/// Returns the per-key slot, creating it on first use. Slots are kept
	/// for the registry's lifetime so every operation for a key contends on
	/// the same mutex.
	fn slot(&self, key: &SessionKey) -> Arc<Mutex<Slot>> {
		Arc::clone(&self.slots.entry(key.clone()).or_default())
	}

	fn existing_slot(&self, key: &SessionKey) -> Option<Arc<Mutex<Slot>>> {
		self.slots.get(key).map(|entry| Arc::clone(entry.value()))
	}
}

/// Stops a session's stream and releases its channel, best-effort.
///
/// The sink is retired first: the callback is cleared and the streaming
/// phase left before any teardown command goes out, so frames racing the
/// stop are dropped rather than delivered stale.
async fn teardown(key: &SessionKey, record: SessionRecord) {
	record.sink.retire();
	if let Err(error) = record
		.channel
		.send("Page.stopScreencast", serde_json::json!({}))
		.await
	{
		warn!(key = %key, error = %error, "stop command failed during teardown");
	}
	if let Err(error) = record.channel.close().await {
		warn!(key = %key, error = %error, "channel release failed during teardown");
	}
	record.sink.finish();
}

/// Classifies resolve/open failures as backend unavailability.
fn unavailable(error: Error) -> Error {
	match error {
		err @ Error::BackendUnavailable { .. } => err,
		other => Error::backend_unavailable(other),
	}
}
