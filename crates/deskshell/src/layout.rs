/*!
Layout engine.

Pure geometry: where a window spawns, how big it may be, and what
"maximized" means for a given viewport. Holds no window state.
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::DeskConfig;
use crate::types::{AppId, Bounds, Size};

/// Which shell layout the viewport calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FormFactor {
  /// Free-floating windows, double-click icons.
  Desktop,
  /// Phone-sized viewport: windows fill the screen, icons open on tap.
  Compact,
}

/// Geometry rules derived from [`DeskConfig`].
#[derive(Debug, Clone)]
pub struct LayoutEngine {
  margin: f64,
  chrome_reserve: f64,
  min_size: Size,
  default_size: Size,
  sizes: HashMap<AppId, Size>,
  compact_breakpoint: f64,
}

impl LayoutEngine {
  /// Engine for `config`.
  pub fn new(config: &DeskConfig) -> Self {
    Self {
      margin: config.margin,
      chrome_reserve: config.chrome_reserve,
      min_size: config.min_size,
      default_size: config.default_size,
      sizes: config.sizes.clone(),
      compact_breakpoint: config.compact_breakpoint,
    }
  }

  /// Preferred size for an app. Unknown apps get the default size.
  pub fn preferred_size(&self, id: &AppId) -> Size {
    self.sizes.get(id).copied().unwrap_or(self.default_size)
  }

  /// Centered spawn geometry, pinned at least `margin` from the top-left
  /// edge so the title bar is always reachable.
  ///
  /// When the window is larger than the viewport the lower bound wins and
  /// the window sits at `(margin, margin)`.
  pub fn initial_geometry(&self, id: &AppId, viewport: Size) -> Bounds {
    let size = self.preferred_size(id);
    let center = |extent: f64, length: f64| {
      let centered = extent / 2.0 - length / 2.0;
      centered.min(extent - length - self.margin).max(self.margin)
    };
    Bounds::new(
      center(viewport.w, size.w),
      center(viewport.h, size.h),
      size.w,
      size.h,
    )
  }

  /// Geometry of a maximized window: the whole viewport minus the chrome
  /// reserve at the bottom.
  pub fn maximized_geometry(&self, viewport: Size) -> Bounds {
    Bounds::new(
      0.0,
      0.0,
      viewport.w,
      (viewport.h - self.chrome_reserve).max(0.0),
    )
  }

  /// Enforce the minimum window size. There is no maximum.
  pub fn clamp_size(&self, size: Size) -> Size {
    size.at_least(self.min_size)
  }

  /// Smallest free-form window size.
  pub const fn min_size(&self) -> Size {
    self.min_size
  }

  /// `Compact` below the breakpoint width.
  pub fn form_factor(&self, viewport: Size) -> FormFactor {
    if viewport.w < self.compact_breakpoint {
      FormFactor::Compact
    } else {
      FormFactor::Desktop
    }
  }
}
