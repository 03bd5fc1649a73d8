//! Input injection methods for [`SessionRegistry`].

use std::sync::Arc;
use std::time::Duration;

use tabcast_protocol::{KeyEvent, MouseButton, MouseEvent, options};
use tracing::debug;

use super::{SessionRegistry, unavailable};
use crate::backend::SessionChannel;
use crate::error::Result;
use crate::key::SessionKey;

/// Channel borrowed for one input operation: either the registered
/// session's channel, or a throwaway channel acquired for this call alone.
enum ChannelLease {
	Registered(Arc<dyn SessionChannel>),
	Ephemeral(Arc<dyn SessionChannel>),
}

impl ChannelLease {
	fn channel(&self) -> &Arc<dyn SessionChannel> {
		match self {
			Self::Registered(channel) | Self::Ephemeral(channel) => channel,
		}
	}

	/// Releases a throwaway channel, best-effort. Registered channels stay
	/// owned by the registry and are not touched.
	async fn release(self) {
		if let Self::Ephemeral(channel) = self {
			if let Err(error) = channel.close().await {
				debug!(error = %error, "throwaway session release failed");
			}
		}
	}
}

impl SessionRegistry {
	/// Injects a single mouse event into the tab for `key`.
	///
	/// Reuses the registered session when one exists; otherwise a throwaway
	/// session is opened for this call, used once, and released on every
	/// exit path without ever entering the registry.
	pub async fn dispatch_mouse_event(&self, key: &SessionKey, event: MouseEvent) -> Result<()> {
		let lease = self.lease_channel(key).await?;
		let result = lease
			.channel()
			.send("Input.dispatchMouseEvent", event.to_params())
			.await;
		lease.release().await;
		result.map(drop)
	}

	/// Injects a single keyboard event into the tab for `key`.
	///
	/// Session resolution works as in
	/// [`dispatch_mouse_event`](Self::dispatch_mouse_event).
	pub async fn dispatch_key_event(&self, key: &SessionKey, event: KeyEvent) -> Result<()> {
		let lease = self.lease_channel(key).await?;
		let result = lease
			.channel()
			.send("Input.dispatchKeyEvent", event.to_params())
			.await;
		lease.release().await;
		result.map(drop)
	}

	/// Clicks at `(x, y)`: a button press immediately followed by a release
	/// at the same coordinates. `None` means the left button.
	pub async fn send_click(
		&self,
		key: &SessionKey,
		x: f64,
		y: f64,
		button: Option<MouseButton>,
	) -> Result<()> {
		self.click_with_count(key, x, y, button.unwrap_or(MouseButton::Left), 1)
			.await
	}

	/// Double-clicks at `(x, y)`.
	pub async fn send_double_click(
		&self,
		key: &SessionKey,
		x: f64,
		y: f64,
		button: Option<MouseButton>,
	) -> Result<()> {
		self.click_with_count(key, x, y, button.unwrap_or(MouseButton::Left), 2)
			.await
	}

	/// Types `text` by issuing one character-insertion event per character.
	///
	/// `delay` paces consecutive keystrokes to avoid overwhelming the
	/// backend; `None` uses the default and a zero duration disables pacing.
	pub async fn send_text(
		&self,
		key: &SessionKey,
		text: &str,
		delay: Option<Duration>,
	) -> Result<()> {
		let delay =
			delay.unwrap_or_else(|| Duration::from_millis(options::DEFAULT_KEYSTROKE_DELAY_MS));
		let lease = self.lease_channel(key).await?;
		let channel = Arc::clone(lease.channel());
		let result: Result<()> = async {
			for (index, ch) in text.chars().enumerate() {
				if index > 0 && !delay.is_zero() {
					tokio::time::sleep(delay).await;
				}
				channel
					.send(
						"Input.dispatchKeyEvent",
						KeyEvent::char_input(ch.to_string()).to_params(),
					)
					.await?;
			}
			Ok(())
		}
		.await;
		lease.release().await;
		result
	}

	/// Presses and releases `key_value`, carrying the same modifiers on both
	/// events.
	pub async fn press_key(
		&self,
		key: &SessionKey,
		key_value: &str,
		modifiers: Option<u32>,
	) -> Result<()> {
		let lease = self.lease_channel(key).await?;
		let channel = Arc::clone(lease.channel());
		let result: Result<()> = async {
			channel
				.send(
					"Input.dispatchKeyEvent",
					with_modifiers(KeyEvent::down(key_value), modifiers).to_params(),
				)
				.await?;
			channel
				.send(
					"Input.dispatchKeyEvent",
					with_modifiers(KeyEvent::up(key_value), modifiers).to_params(),
				)
				.await?;
			Ok(())
		}
		.await;
		lease.release().await;
		result
	}

	async fn click_with_count(
		&self,
		key: &SessionKey,
		x: f64,
		y: f64,
		button: MouseButton,
		count: u32,
	) -> Result<()> {
		let lease = self.lease_channel(key).await?;
		let channel = Arc::clone(lease.channel());
		let result: Result<()> = async {
			channel
				.send(
					"Input.dispatchMouseEvent",
					MouseEvent::pressed(x, y)
						.button(button)
						.click_count(count)
						.to_params(),
				)
				.await?;
			channel
				.send(
					"Input.dispatchMouseEvent",
					MouseEvent::released(x, y)
						.button(button)
						.click_count(count)
						.to_params(),
				)
				.await?;
			Ok(())
		}
		.await;
		lease.release().await;
		result
	}

	/// Resolves the channel for an input operation: the registered session
	/// when present, a fresh unregistered one otherwise.
	async fn lease_channel(&self, key: &SessionKey) -> Result<ChannelLease> {
		if let Some((channel, _page)) = self.registered(key).await {
			return Ok(ChannelLease::Registered(channel));
		}
		let page = self
			.backend
			.resolve_target(key.endpoint(), key.target_id())
			.await
			.map_err(unavailable)?;
		let channel = self.backend.open_session(&page).await.map_err(unavailable)?;
		Ok(ChannelLease::Ephemeral(channel))
	}
}

fn with_modifiers(event: KeyEvent, modifiers: Option<u32>) -> KeyEvent {
	match modifiers {
		Some(modifiers) => event.modifiers(modifiers),
		None => event,
	}
}
