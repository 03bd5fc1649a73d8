//! Per-session streaming state machine and frame delivery.
//!
//! Each streaming session owns a [`FrameSink`]: the stream phase and the
//! caller's frame callback held in a single mutex cell, so teardown clears
//! the callback and leaves the streaming phase in one atomic step. Frames
//! that arrive after that step observe a non-streaming phase and are
//! dropped without reaching the stale callback.
//!
//! Acknowledgements are the backend's backpressure signal: a well-behaved
//! backend withholds the next frame until the previous one is acked, so the
//! ack is spawned fire-and-forget before callback delivery and its failure
//! is only logged.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tabcast_protocol::ScreencastFrame;

use crate::backend::{EventListener, SessionChannel};

/// Caller-supplied frame consumer.
///
/// Invoked once per delivered frame, in delivery order, until the stream is
/// stopped. The callback is fire-and-forget: it runs on the event-delivery
/// path and must hand slow work to a task of its own.
pub type FrameCallback = Arc<dyn Fn(ScreencastFrame) + Send + Sync>;

/// Lifecycle of one streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamPhase {
	/// Constructed, start command not yet issued.
	Idle,
	/// Start command in flight.
	Starting,
	/// Frames are being delivered.
	Streaming,
	/// Teardown began; callback already cleared.
	Stopping,
	/// Terminal.
	Stopped,
}

struct SinkState {
	phase: StreamPhase,
	callback: Option<FrameCallback>,
}

/// Phase and callback cell for one streaming session.
pub(crate) struct FrameSink {
	state: Mutex<SinkState>,
}

impl FrameSink {
	/// Creates a sink in `Idle` holding the caller's callback.
	pub(crate) fn new(callback: FrameCallback) -> Arc<Self> {
		Arc::new(Self {
			state: Mutex::new(SinkState {
				phase: StreamPhase::Idle,
				callback: Some(callback),
			}),
		})
	}

	pub(crate) fn phase(&self) -> StreamPhase {
		self.state.lock().phase
	}

	pub(crate) fn is_streaming(&self) -> bool {
		self.phase() == StreamPhase::Streaming
	}

	/// `Idle -> Starting`. Returns `false` when the sink already moved on.
	pub(crate) fn begin_start(&self) -> bool {
		let mut state = self.state.lock();
		if state.phase != StreamPhase::Idle {
			return false;
		}
		state.phase = StreamPhase::Starting;
		true
	}

	/// `Starting -> Streaming` after the start command succeeded.
	pub(crate) fn activate(&self) -> bool {
		let mut state = self.state.lock();
		if state.phase != StreamPhase::Starting {
			return false;
		}
		state.phase = StreamPhase::Streaming;
		true
	}

	/// `Starting -> Stopped` after the start command failed. Clears the
	/// callback; the sink never delivered and never will.
	pub(crate) fn abort_start(&self) {
		let mut state = self.state.lock();
		state.phase = StreamPhase::Stopped;
		state.callback = None;
	}

	/// Enters `Stopping` and clears the callback in the same step.
	///
	/// This runs before the stop command is sent, so frames racing the
	/// teardown are dropped structurally rather than by a late check.
	pub(crate) fn retire(&self) {
		let mut state = self.state.lock();
		state.phase = StreamPhase::Stopping;
		state.callback = None;
	}

	/// `Stopping -> Stopped` once best-effort cleanup finished.
	pub(crate) fn finish(&self) {
		let mut state = self.state.lock();
		if state.phase == StreamPhase::Stopping {
			state.phase = StreamPhase::Stopped;
		}
	}

	/// Hands a frame to the callback if the stream is live.
	fn deliver(&self, frame: ScreencastFrame) {
		let callback = {
			let state = self.state.lock();
			if state.phase != StreamPhase::Streaming {
				return;
			}
			state.callback.clone()
		};
		if let Some(callback) = callback {
			callback(frame);
		}
	}
}

/// Builds the listener registered for screencast frame events.
///
/// Every parseable frame is acknowledged with its own correlation id,
/// whether or not it is delivered; the ack send is spawned so callback work
/// can never delay it.
pub(crate) fn frame_listener(
	sink: Arc<FrameSink>,
	channel: Arc<dyn SessionChannel>,
) -> EventListener {
	Arc::new(move |params| {
		let frame: ScreencastFrame = match serde_json::from_value(params) {
			Ok(frame) => frame,
			Err(error) => {
				tracing::warn!(error = %error, "dropping malformed screencast frame event");
				return;
			}
		};

		let session_id = frame.session_id;
		let channel = Arc::clone(&channel);
		tokio::spawn(async move {
			if let Err(error) = channel
				.send("Page.screencastFrameAck", json!({ "sessionId": session_id }))
				.await
			{
				tracing::debug!(error = %error, session_id, "frame acknowledgement failed");
			}
		});

		sink.deliver(frame);
	})
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	fn counting_sink() -> (Arc<FrameSink>, Arc<AtomicUsize>) {
		let delivered = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&delivered);
		let sink = FrameSink::new(Arc::new(move |_frame| {
			counter.fetch_add(1, Ordering::SeqCst);
		}));
		(sink, delivered)
	}

	fn frame(session_id: u64) -> ScreencastFrame {
		ScreencastFrame {
			data: "AA==".into(),
			metadata: None,
			session_id,
		}
	}

	#[test]
	fn happy_path_transitions() {
		let (sink, _) = counting_sink();
		assert_eq!(sink.phase(), StreamPhase::Idle);
		assert!(sink.begin_start());
		assert_eq!(sink.phase(), StreamPhase::Starting);
		assert!(sink.activate());
		assert!(sink.is_streaming());
		sink.retire();
		assert_eq!(sink.phase(), StreamPhase::Stopping);
		sink.finish();
		assert_eq!(sink.phase(), StreamPhase::Stopped);
	}

	#[test]
	fn begin_start_rejected_after_leaving_idle() {
		let (sink, _) = counting_sink();
		assert!(sink.begin_start());
		assert!(!sink.begin_start());
	}

	#[test]
	fn activate_rejected_outside_starting() {
		let (sink, _) = counting_sink();
		assert!(!sink.activate());
		sink.begin_start();
		sink.abort_start();
		assert!(!sink.activate());
		assert_eq!(sink.phase(), StreamPhase::Stopped);
	}

	#[test]
	fn deliver_invokes_callback_only_while_streaming() {
		let (sink, delivered) = counting_sink();

		sink.deliver(frame(1));
		assert_eq!(delivered.load(Ordering::SeqCst), 0);

		sink.begin_start();
		sink.deliver(frame(2));
		assert_eq!(delivered.load(Ordering::SeqCst), 0);

		sink.activate();
		sink.deliver(frame(3));
		assert_eq!(delivered.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn retire_drops_frames_arriving_during_teardown() {
		let (sink, delivered) = counting_sink();
		sink.begin_start();
		sink.activate();
		sink.deliver(frame(1));
		assert_eq!(delivered.load(Ordering::SeqCst), 1);

		sink.retire();
		sink.deliver(frame(2));
		sink.finish();
		sink.deliver(frame(3));
		assert_eq!(delivered.load(Ordering::SeqCst), 1);
	}
}
