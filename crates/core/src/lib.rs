//! Session relay for driving and observing remote browser tabs.
//!
//! This crate multiplexes any number of (endpoint, target) pairs, each
//! identifying a browser tab, into independent streaming and
//! input-injection sessions:
//!
//! - [`SessionRegistry`] owns every live session and guarantees at most one
//!   active screencast stream per tab, serializing start/stop races per key.
//! - Frames are pushed by the backend, acknowledged automatically, and
//!   handed to a caller-supplied [`FrameCallback`].
//! - Mouse and keyboard events can be injected with or without an active
//!   stream; keys without a registered session get a throwaway session that
//!   is used once and released.
//!
//! The browser itself lives elsewhere: everything this crate needs from it
//! flows through the [`backend`] capability traits.

pub mod backend;
pub mod error;
pub mod key;
pub mod registry;
pub mod streaming;

pub use backend::{BrowserBackend, EventListener, PageHandle, SessionChannel};
pub use error::{Error, Result};
pub use key::SessionKey;
pub use registry::{SessionRegistry, SessionStatus};
pub use streaming::FrameCallback;

pub use tabcast_protocol as protocol;
