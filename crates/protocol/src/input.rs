//! Mouse and keyboard event payloads.
//!
//! Payloads are built field-by-field so that options the caller never
//! supplied are omitted from the command entirely, instead of being sent as
//! placeholder values the backend may reject.

/// Mouse event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
	/// Button pressed.
	Pressed,
	/// Button released.
	Released,
	/// Pointer moved.
	Moved,
	/// Wheel scrolled.
	Wheel,
}

impl MouseEventKind {
	/// Protocol string for this subtype.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pressed => "mousePressed",
			Self::Released => "mouseReleased",
			Self::Moved => "mouseMoved",
			Self::Wheel => "mouseWheel",
		}
	}
}

/// Mouse button. There is deliberately no `None` variant: an event without a
/// button omits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
	Left,
	Middle,
	Right,
	Back,
	Forward,
}

impl MouseButton {
	/// Protocol string for this button.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Left => "left",
			Self::Middle => "middle",
			Self::Right => "right",
			Self::Back => "back",
			Self::Forward => "forward",
		}
	}
}

/// A single mouse event to inject into a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
	/// Event subtype.
	pub kind: MouseEventKind,
	/// Pointer x coordinate in CSS pixels.
	pub x: f64,
	/// Pointer y coordinate in CSS pixels.
	pub y: f64,
	/// Button involved, when the subtype has one.
	pub button: Option<MouseButton>,
	/// Consecutive click count (1 = single click).
	pub click_count: Option<u32>,
	/// Horizontal wheel delta; wheel events only.
	pub delta_x: Option<f64>,
	/// Vertical wheel delta; wheel events only.
	pub delta_y: Option<f64>,
	/// Modifier key bitmask.
	pub modifiers: Option<u32>,
}

impl MouseEvent {
	/// Creates a bare event of the given subtype at `(x, y)`.
	pub fn new(kind: MouseEventKind, x: f64, y: f64) -> Self {
		Self {
			kind,
			x,
			y,
			button: None,
			click_count: None,
			delta_x: None,
			delta_y: None,
			modifiers: None,
		}
	}

	/// A button-press event.
	pub fn pressed(x: f64, y: f64) -> Self {
		Self::new(MouseEventKind::Pressed, x, y)
	}

	/// A button-release event.
	pub fn released(x: f64, y: f64) -> Self {
		Self::new(MouseEventKind::Released, x, y)
	}

	/// A pointer-move event.
	pub fn moved(x: f64, y: f64) -> Self {
		Self::new(MouseEventKind::Moved, x, y)
	}

	/// A wheel event with the given deltas.
	pub fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
		let mut event = Self::new(MouseEventKind::Wheel, x, y);
		event.delta_x = Some(delta_x);
		event.delta_y = Some(delta_y);
		event
	}

	/// Sets the button.
	pub fn button(mut self, button: MouseButton) -> Self {
		self.button = Some(button);
		self
	}

	/// Sets the click count.
	pub fn click_count(mut self, count: u32) -> Self {
		self.click_count = Some(count);
		self
	}

	/// Sets the modifier bitmask.
	pub fn modifiers(mut self, modifiers: u32) -> Self {
		self.modifiers = Some(modifiers);
		self
	}

	/// Builds the dispatch command payload, omitting unset fields.
	pub fn to_params(&self) -> serde_json::Value {
		let mut params = serde_json::Map::new();
		params.insert("type".into(), self.kind.as_str().into());
		params.insert("x".into(), self.x.into());
		params.insert("y".into(), self.y.into());
		if let Some(button) = self.button {
			params.insert("button".into(), button.as_str().into());
		}
		if let Some(count) = self.click_count {
			params.insert("clickCount".into(), count.into());
		}
		if let Some(delta) = self.delta_x {
			params.insert("deltaX".into(), delta.into());
		}
		if let Some(delta) = self.delta_y {
			params.insert("deltaY".into(), delta.into());
		}
		if let Some(modifiers) = self.modifiers {
			params.insert("modifiers".into(), modifiers.into());
		}
		serde_json::Value::Object(params)
	}
}

/// Keyboard event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
	/// Key pressed down.
	Down,
	/// Key released.
	Up,
	/// Character insertion.
	Char,
}

impl KeyEventKind {
	/// Protocol string for this subtype.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Down => "keyDown",
			Self::Up => "keyUp",
			Self::Char => "char",
		}
	}
}

/// A single keyboard event to inject into a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
	/// Event subtype.
	pub kind: KeyEventKind,
	/// Key value, e.g. `"Enter"` or `"a"`.
	pub key: Option<String>,
	/// Physical key code, e.g. `"KeyA"`.
	pub code: Option<String>,
	/// Text generated by the event; required for `Char` insertion.
	pub text: Option<String>,
	/// Modifier key bitmask.
	pub modifiers: Option<u32>,
}

impl KeyEvent {
	/// Creates a bare event of the given subtype.
	pub fn new(kind: KeyEventKind) -> Self {
		Self {
			kind,
			key: None,
			code: None,
			text: None,
			modifiers: None,
		}
	}

	/// A key-down event for `key`.
	pub fn down(key: impl Into<String>) -> Self {
		Self::new(KeyEventKind::Down).key(key)
	}

	/// A key-up event for `key`.
	pub fn up(key: impl Into<String>) -> Self {
		Self::new(KeyEventKind::Up).key(key)
	}

	/// A character-insertion event for `text`.
	pub fn char_input(text: impl Into<String>) -> Self {
		Self::new(KeyEventKind::Char).text(text)
	}

	/// Sets the key value.
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Sets the physical key code.
	pub fn code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	/// Sets the generated text.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	/// Sets the modifier bitmask.
	pub fn modifiers(mut self, modifiers: u32) -> Self {
		self.modifiers = Some(modifiers);
		self
	}

	/// Builds the dispatch command payload, omitting unset fields.
	pub fn to_params(&self) -> serde_json::Value {
		let mut params = serde_json::Map::new();
		params.insert("type".into(), self.kind.as_str().into());
		if let Some(key) = &self.key {
			params.insert("key".into(), key.as_str().into());
		}
		if let Some(code) = &self.code {
			params.insert("code".into(), code.as_str().into());
		}
		if let Some(text) = &self.text {
			params.insert("text".into(), text.as_str().into());
		}
		if let Some(modifiers) = self.modifiers {
			params.insert("modifiers".into(), modifiers.into());
		}
		serde_json::Value::Object(params)
	}
}
