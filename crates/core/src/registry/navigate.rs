//! Navigation methods for [`SessionRegistry`].

use std::time::Duration;

use tabcast_protocol::options;
use tracing::warn;

use super::SessionRegistry;
use crate::error::{Error, Result};
use crate::key::SessionKey;

impl SessionRegistry {
	/// Navigates the tab registered under `key` to `url`.
	///
	/// Requires an existing session; the stream, if any, is preserved. After
	/// the navigate command succeeds the call waits (bounded) for the page
	/// to report readiness. A readiness timeout is logged and swallowed,
	/// not surfaced, because the navigation itself was already accepted.
	pub async fn navigate(&self, key: &SessionKey, url: &str) -> Result<()> {
		let Some((channel, page)) = self.registered(key).await else {
			return Err(Error::NoActiveSession {
				key: key.to_string(),
			});
		};

		channel
			.send("Page.navigate", serde_json::json!({ "url": url }))
			.await?;

		let timeout = Duration::from_millis(options::DEFAULT_READY_TIMEOUT_MS);
		if let Err(error) = page.wait_for_ready(timeout).await {
			warn!(key = %key, url, error = %error, "page readiness wait did not complete");
		}
		Ok(())
	}
}
