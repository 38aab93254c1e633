/*! Event types for state changes and synchronization. */

use super::{AppId, MountId, Size, Window, ZOrder};
use crate::content::ContentStatus;
use crate::layout::FormFactor;
use serde::Serialize;
use ts_rs::TS;

/// Full desktop state, sent on connection.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct Snapshot {
  /// Open windows in open order.
  pub windows: Vec<Window>,
  /// Window IDs in z-order (front to back), minimized windows included.
  pub z_order: Vec<AppId>,
  pub viewport: Size,
  pub form_factor: FormFactor,
}

impl Snapshot {
  /// Look up a window in the snapshot.
  pub fn window(&self, id: &AppId) -> Option<&Window> {
    self.windows.iter().find(|w| &w.id == id)
  }
}

/// Events emitted when state changes.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  // Initial sync (on connection)
  #[serde(rename = "sync:init")]
  SyncInit(Snapshot),

  // Window lifecycle
  #[serde(rename = "window:opened")]
  WindowOpened { window: Window },
  #[serde(rename = "window:changed")]
  WindowChanged { window: Window },
  #[serde(rename = "window:closed")]
  WindowClosed { window_id: AppId },

  // Stacking
  #[serde(rename = "focus:window")]
  FocusWindow { window_id: AppId, z_order: ZOrder },

  // Hosted content resolution
  #[serde(rename = "content:changed")]
  ContentChanged {
    window_id: AppId,
    mount: MountId,
    status: ContentStatus,
  },

  // Viewport
  #[serde(rename = "viewport:changed")]
  ViewportChanged {
    viewport: Size,
    form_factor: FormFactor,
  },
}
