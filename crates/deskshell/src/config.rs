/*!
Configuration for deskshell.

All values have sensible defaults matching the portfolio shell. Create a
custom config to override:

```
use deskshell::DeskConfig;

let config = DeskConfig {
    compact_breakpoint: 800.0,
    ..Default::default()
};
assert!(config.validate().is_ok());
```

Or load one from JSON, where every field is optional:

```
use deskshell::DeskConfig;

let config = DeskConfig::from_json(r#"{ "margin": 24 }"#).unwrap();
assert_eq!(config.margin, 24.0);
assert_eq!(config.chrome_reserve, 10.0);
```
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{AppId, DeskError, DeskResult, Size};

/// Largest accepted `initial_z`. Leaves 2^52 focus changes before tokens
/// leave the range a JavaScript number holds exactly.
pub const MAX_INITIAL_Z: u64 = 1 << 52;

/// deskshell configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
  /// Minimum gap between a freshly opened window and the viewport edge.
  /// Default: 10px.
  pub margin: f64,

  /// Height kept free below a maximized window.
  /// Default: 10px.
  pub chrome_reserve: f64,

  /// Smallest size a window can be resized to. Keeps the title bar and
  /// close button usable.
  /// Default: 350x300.
  pub min_size: Size,

  /// Initial size for apps without an entry in `sizes`.
  /// Default: 800x600.
  pub default_size: Size,

  /// Initial size per app.
  pub sizes: HashMap<AppId, Size>,

  /// First z-order token handed out. At most [`MAX_INITIAL_Z`].
  /// Default: 100.
  pub initial_z: u64,

  /// Viewports narrower than this use the compact (phone) form factor.
  /// Default: 650px.
  pub compact_breakpoint: f64,

  /// Capacity of the event broadcast channel.
  /// Default: 5000 events.
  pub event_channel_capacity: usize,
}

impl Default for DeskConfig {
  fn default() -> Self {
    Self {
      margin: 10.0,
      chrome_reserve: 10.0,
      min_size: Size::new(350.0, 300.0),
      default_size: Size::new(800.0, 600.0),
      sizes: default_sizes(),
      initial_z: 100,
      compact_breakpoint: 650.0,
      event_channel_capacity: 5000,
    }
  }
}

fn default_sizes() -> HashMap<AppId, Size> {
  [
    ("about", 800.0),
    ("resume", 850.0),
    ("projects", 900.0),
    ("blog", 850.0),
    ("links", 750.0),
    ("contact", 800.0),
  ]
  .into_iter()
  .map(|(id, w)| (AppId::new(id), Size::new(w, 600.0)))
  .collect()
}

impl DeskConfig {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse a JSON config. Missing fields take their defaults.
  pub fn from_json(json: &str) -> DeskResult<Self> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Check that every value is usable.
  pub fn validate(&self) -> DeskResult<()> {
    let non_negative = |name: &str, v: f64| {
      if v.is_finite() && v >= 0.0 {
        Ok(())
      } else {
        Err(DeskError::InvalidConfig(format!(
          "{name} must be a finite, non-negative number (got {v})"
        )))
      }
    };
    let positive_size = |name: &str, s: Size| {
      if s.w.is_finite() && s.h.is_finite() && s.w > 0.0 && s.h > 0.0 {
        Ok(())
      } else {
        Err(DeskError::InvalidConfig(format!(
          "{name} must be positive (got {}x{})",
          s.w, s.h
        )))
      }
    };

    non_negative("margin", self.margin)?;
    non_negative("chrome_reserve", self.chrome_reserve)?;
    non_negative("compact_breakpoint", self.compact_breakpoint)?;
    positive_size("min_size", self.min_size)?;
    positive_size("default_size", self.default_size)?;
    for (id, size) in &self.sizes {
      positive_size(&format!("sizes.{id}"), *size)?;
    }
    if self.initial_z > MAX_INITIAL_Z {
      return Err(DeskError::InvalidConfig(format!(
        "initial_z must be at most {MAX_INITIAL_Z} (got {})",
        self.initial_z
      )));
    }
    if self.event_channel_capacity == 0 {
      return Err(DeskError::InvalidConfig(
        "event_channel_capacity must be at least 1".into(),
      ));
    }
    Ok(())
  }
}
