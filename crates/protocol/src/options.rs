//! Protocol-wide default values.

/// Default screencast JPEG quality (0-100).
pub const DEFAULT_QUALITY: u32 = 80;

/// Default maximum screencast frame width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;

/// Default maximum screencast frame height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;

/// Default frame sampling rate (1 = every compositor frame).
pub const DEFAULT_EVERY_NTH_FRAME: u32 = 1;

/// Default bound on the post-navigation readiness wait.
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 10_000;

/// Default pause between synthesized keystrokes when typing text.
pub const DEFAULT_KEYSTROKE_DELAY_MS: u64 = 25;
