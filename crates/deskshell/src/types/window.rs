/*! Window type representing an open window instance. */

use super::{AppId, Bounds, MountId, ZOrder};
use crate::content::ContentStatus;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An open window, as seen by renderers and the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Window {
  pub id: AppId,
  pub title: String,
  /// Bounds to render at. Full-viewport geometry while maximized.
  pub bounds: Bounds,
  /// Free-form geometry restored when un-maximizing.
  pub restore_bounds: Bounds,
  pub maximized: bool,
  pub minimized: bool,
  pub z_order: ZOrder,
  pub content: ContentStatus,
  pub mount: MountId,
}

impl Window {
  /// Whether the window is currently drawn.
  pub const fn is_visible(&self) -> bool {
    !self.minimized
  }
}
