//! Wire types for the tab relay protocol.
//!
//! These types describe the payloads exchanged with a browser control
//! backend: screencast stream configuration and frames, and mouse/keyboard
//! input events. They carry no I/O of their own; image data stays an opaque
//! base64 string end to end.

pub mod input;
pub mod options;
pub mod stream;

pub use input::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
pub use stream::{FrameMetadata, ImageFormat, ScreencastFrame, StreamConfig};
