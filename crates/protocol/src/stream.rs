//! Screencast stream configuration and frame payloads.

use serde::{Deserialize, Serialize};

use crate::options;

/// Image encoding for screencast frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
	/// JPEG frames (lossy, `quality` applies).
	Jpeg,
	/// PNG frames (lossless, `quality` ignored by the backend).
	Png,
}

impl ImageFormat {
	/// Protocol string for this format.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Jpeg => "jpeg",
			Self::Png => "png",
		}
	}
}

/// Configuration for a screencast stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
	/// Frame image encoding.
	pub format: ImageFormat,
	/// Compression quality, 0-100. Only meaningful for JPEG.
	pub quality: u32,
	/// Maximum frame width in pixels.
	pub max_width: u32,
	/// Maximum frame height in pixels.
	pub max_height: u32,
	/// Capture every Nth compositor frame (1 = every frame).
	pub every_nth_frame: u32,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			format: ImageFormat::Jpeg,
			quality: options::DEFAULT_QUALITY,
			max_width: options::DEFAULT_MAX_WIDTH,
			max_height: options::DEFAULT_MAX_HEIGHT,
			every_nth_frame: options::DEFAULT_EVERY_NTH_FRAME,
		}
	}
}

impl StreamConfig {
	/// Creates a configuration with default values.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the frame image format.
	pub fn format(mut self, format: ImageFormat) -> Self {
		self.format = format;
		self
	}

	/// Sets the compression quality (clamped to 100).
	pub fn quality(mut self, quality: u32) -> Self {
		self.quality = quality.min(100);
		self
	}

	/// Sets the maximum frame dimensions.
	pub fn max_size(mut self, width: u32, height: u32) -> Self {
		self.max_width = width;
		self.max_height = height;
		self
	}

	/// Sets the frame sampling rate.
	pub fn every_nth_frame(mut self, n: u32) -> Self {
		self.every_nth_frame = n.max(1);
		self
	}

	/// Builds the stream-start command payload.
	pub fn to_params(&self) -> serde_json::Value {
		serde_json::json!({
			"format": self.format.as_str(),
			"quality": self.quality,
			"maxWidth": self.max_width,
			"maxHeight": self.max_height,
			"everyNthFrame": self.every_nth_frame,
		})
	}
}

/// A single screencast frame pushed by the backend.
///
/// `session_id` is the frame's correlation identifier; every delivered frame
/// must be acknowledged back to the backend carrying this exact value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreencastFrame {
	/// Base64-encoded image bytes. Never decoded by the relay.
	pub data: String,
	/// Viewport metadata captured with the frame.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<FrameMetadata>,
	/// Correlation id to echo in the frame acknowledgement.
	pub session_id: u64,
}

/// Viewport metadata attached to a screencast frame, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetadata {
	/// Top offset of the page content in CSS pixels.
	pub offset_top: f64,
	/// Page scale factor.
	pub page_scale_factor: f64,
	/// Device screen width in device-independent pixels.
	pub device_width: f64,
	/// Device screen height in device-independent pixels.
	pub device_height: f64,
	/// Horizontal scroll position in CSS pixels.
	pub scroll_offset_x: f64,
	/// Vertical scroll position in CSS pixels.
	pub scroll_offset_y: f64,
	/// Frame capture time, if the backend reports one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<f64>,
}
