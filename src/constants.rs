//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Environment variable holding the backend base URL
pub const API_URL_ENV: &str = "WHODO_API_URL";

/// Default backend base URL when the environment variable is unset
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Log file written into the working directory (the terminal belongs to the TUI)
pub const LOG_FILE: &str = "whodo.log";

/// Seconds a toast stays visible in the status bar
pub const TOAST_SECS: u64 = 4;

/// Minimum length accepted for name fields, matching the form rules
pub const MIN_NAME_LEN: usize = 2;

/// Date format used for form input and wire payloads
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Date format used in the listing tables
pub const DATE_DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "WhoDo TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
