/*! Error types for deskshell operations. */

use super::AppId;

/// Errors that can occur during deskshell operations.
///
/// Registry mutations never fail: closing, minimizing or restoring an absent
/// window is a no-op. Errors come from lookups and configuration.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
  #[error("Window not found: {0}")]
  WindowNotFound(AppId),

  #[error("App not registered with the launcher: {0}")]
  UnknownApp(AppId),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Failed to parse configuration: {0}")]
  Config(#[from] serde_json::Error),
}

/// Result type for deskshell operations.
pub type DeskResult<T> = Result<T, DeskError>;
