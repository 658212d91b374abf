//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Maximum length of the email body in characters (Unicode scalar values).
pub const MAX_EMAIL_CHARS: usize = 1000;

/// Default sampling temperature for the completion service.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Step size used by the temperature slider.
pub const TEMPERATURE_STEP: f32 = 0.05;

/// Request timeout in seconds for the completion and feedback services.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;

/// Maximum length of the optional feedback comment in characters.
pub const MAX_FEEDBACK_COMMENT_CHARS: usize = 500;

// === UI Constants ===

/// Fixed width of the settings sidebar in columns.
pub const SETTINGS_SIDEBAR_WIDTH: u16 = 32;

/// Minimum terminal width to show the settings sidebar next to the editor.
/// Below this width, settings are stacked above the editor.
pub const MIN_SIDEBAR_VIEW_WIDTH: u16 = 90;

/// Lines scrolled per PageUp/PageDown in the output pane.
pub const OUTPUT_PAGE_LINES: i32 = 10;
