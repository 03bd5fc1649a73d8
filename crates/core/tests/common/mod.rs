//! In-memory backend doubles for the relay integration tests.
//!
//! [`MockBackend`] records every command send in one ordered log, hands out
//! scripted failures, and lets tests push events at a channel's listeners
//! the way a real backend would.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tabcast::{BrowserBackend, Error, EventListener, PageHandle, Result, SessionChannel};

/// One recorded command round-trip.
#[derive(Debug, Clone)]
pub struct SentCommand {
	pub channel_id: usize,
	pub method: String,
	pub params: Value,
}

pub struct MockBackend {
	log: Arc<Mutex<Vec<SentCommand>>>,
	fail_methods: Arc<Mutex<HashSet<String>>>,
	refuse_targets: AtomicBool,
	refuse_sessions: AtomicBool,
	ready_times_out: Arc<AtomicBool>,
	ready_waits: Arc<AtomicUsize>,
	channels: Mutex<Vec<Arc<MockChannel>>>,
}

impl MockBackend {
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			log: Arc::new(Mutex::new(Vec::new())),
			fail_methods: Arc::new(Mutex::new(HashSet::new())),
			refuse_targets: AtomicBool::new(false),
			refuse_sessions: AtomicBool::new(false),
			ready_times_out: Arc::new(AtomicBool::new(false)),
			ready_waits: Arc::new(AtomicUsize::new(0)),
			channels: Mutex::new(Vec::new()),
		})
	}

	/// Makes every future send of `method` fail.
	pub fn fail_command(&self, method: &str) {
		self.fail_methods.lock().insert(method.to_string());
	}

	/// Makes target resolution fail.
	pub fn refuse_targets(&self) {
		self.refuse_targets.store(true, Ordering::SeqCst);
	}

	/// Makes session opening fail.
	pub fn refuse_sessions(&self) {
		self.refuse_sessions.store(true, Ordering::SeqCst);
	}

	/// Makes readiness waits time out.
	pub fn time_out_readiness(&self) {
		self.ready_times_out.store(true, Ordering::SeqCst);
	}

	/// Number of readiness waits observed.
	pub fn ready_waits(&self) -> usize {
		self.ready_waits.load(Ordering::SeqCst)
	}

	/// Total channels ever opened.
	pub fn channels_opened(&self) -> usize {
		self.channels.lock().len()
	}

	/// Channels opened and not yet closed.
	pub fn live_channels(&self) -> usize {
		self.channels
			.lock()
			.iter()
			.filter(|channel| !channel.is_closed())
			.count()
	}

	/// The `index`-th channel opened.
	pub fn channel(&self, index: usize) -> Arc<MockChannel> {
		Arc::clone(&self.channels.lock()[index])
	}

	/// Ordered snapshot of every command sent on any channel.
	pub fn commands(&self) -> Vec<SentCommand> {
		self.log.lock().clone()
	}

	/// Commands named `method`, in send order.
	pub fn commands_named(&self, method: &str) -> Vec<SentCommand> {
		self.commands()
			.into_iter()
			.filter(|command| command.method == method)
			.collect()
	}
}

#[async_trait]
impl BrowserBackend for MockBackend {
	async fn resolve_target(
		&self,
		endpoint: &str,
		_target_id: Option<&str>,
	) -> Result<Arc<dyn PageHandle>> {
		if self.refuse_targets.load(Ordering::SeqCst) {
			return Err(Error::BackendUnavailable {
				context: format!("no tab reachable at {endpoint}"),
			});
		}
		Ok(Arc::new(MockPage {
			times_out: Arc::clone(&self.ready_times_out),
			waits: Arc::clone(&self.ready_waits),
		}))
	}

	async fn open_session(&self, _page: &Arc<dyn PageHandle>) -> Result<Arc<dyn SessionChannel>> {
		if self.refuse_sessions.load(Ordering::SeqCst) {
			return Err(Error::BackendUnavailable {
				context: "session open refused".into(),
			});
		}
		let mut channels = self.channels.lock();
		let channel = Arc::new(MockChannel {
			id: channels.len(),
			log: Arc::clone(&self.log),
			fail_methods: Arc::clone(&self.fail_methods),
			listeners: Mutex::new(HashMap::new()),
			closed: AtomicBool::new(false),
		});
		channels.push(Arc::clone(&channel));
		Ok(channel)
	}
}

pub struct MockChannel {
	id: usize,
	log: Arc<Mutex<Vec<SentCommand>>>,
	fail_methods: Arc<Mutex<HashSet<String>>>,
	listeners: Mutex<HashMap<String, EventListener>>,
	closed: AtomicBool,
}

impl MockChannel {
	/// Pushes an event at this channel's subscribed listener, as the backend
	/// would.
	pub fn emit(&self, method: &str, params: Value) {
		let listener = self.listeners.lock().get(method).cloned();
		if let Some(listener) = listener {
			listener(params);
		}
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SessionChannel for MockChannel {
	async fn send(&self, method: &str, params: Value) -> Result<Value> {
		self.log.lock().push(SentCommand {
			channel_id: self.id,
			method: method.to_string(),
			params,
		});
		if self.fail_methods.lock().contains(method) {
			return Err(Error::CommandFailed {
				command: method.to_string(),
				message: "injected failure".into(),
			});
		}
		Ok(Value::Null)
	}

	fn on_event(&self, method: &str, listener: EventListener) {
		self.listeners.lock().insert(method.to_string(), listener);
	}

	async fn close(&self) -> Result<()> {
		self.closed.store(true, Ordering::SeqCst);
		if self.fail_methods.lock().contains("close") {
			return Err(Error::CommandFailed {
				command: "close".into(),
				message: "injected failure".into(),
			});
		}
		Ok(())
	}
}

struct MockPage {
	times_out: Arc<AtomicBool>,
	waits: Arc<AtomicUsize>,
}

#[async_trait]
impl PageHandle for MockPage {
	async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
		self.waits.fetch_add(1, Ordering::SeqCst);
		if self.times_out.load(Ordering::SeqCst) {
			return Err(Error::CommandFailed {
				command: "waitForReady".into(),
				message: format!("no readiness signal within {}ms", timeout.as_millis()),
			});
		}
		Ok(())
	}
}

/// Lets spawned fire-and-forget work (frame acks) run to completion.
pub async fn settle() {
	for _ in 0..32 {
		tokio::task::yield_now().await;
	}
}
