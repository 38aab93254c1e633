/*!
Registry - the single source of truth for open windows.

All fields are private. Mutations go through methods that maintain invariants
and emit events. This guarantees:
- At most one window per `AppId`
- Z-order tokens are unique and only ever grow
- Events are always emitted

## Module Structure

- `mod.rs` - Registry struct, entry type, viewport state, event emission
- `windows.rs` - Window lifecycle, stacking, maximize, pointer sessions
*/

mod windows;

use async_broadcast::Sender;

use crate::content::ContentHandle;
use crate::core::input::Interaction;
use crate::layout::{FormFactor, LayoutEngine};
use crate::stacking::StackingController;
use crate::types::{AppId, Bounds, Event, MountId, Size, Snapshot, Window, ZOrder};

/// Per-window state.
#[derive(Debug)]
pub(crate) struct CachedWindow {
  pub(crate) id: AppId,
  pub(crate) title: String,
  /// Free-form geometry. Left untouched while maximized so un-maximizing
  /// restores it exactly.
  pub(crate) geometry: Bounds,
  pub(crate) maximized: bool,
  pub(crate) minimized: bool,
  pub(crate) z_order: ZOrder,
  pub(crate) content: ContentHandle,
  pub(crate) interaction: Option<Interaction>,
}

impl CachedWindow {
  /// Whether drag and resize are allowed.
  pub(crate) const fn is_free_form(&self) -> bool {
    !self.maximized && !self.minimized
  }
}

/// Broadcast an event, logging if the channel overflows.
pub(crate) fn broadcast(tx: &Sender<Event>, event: Event) {
  if let Err(e) = tx.try_broadcast(event) {
    if e.is_full() {
      log::error!(
        "Event channel overflow - events are being dropped. \
         Consider increasing event_channel_capacity or processing events faster."
      );
    }
  }
}

/// Internal state storage with automatic event emission.
pub(crate) struct Registry {
  events_tx: Sender<Event>,

  /// Open windows in open order.
  windows: Vec<CachedWindow>,

  stacking: StackingController,
  layout: LayoutEngine,
  viewport: Size,
  form_factor: FormFactor,
  next_mount: u64,
}

impl std::fmt::Debug for Registry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Registry")
      .field("windows", &self.windows.len())
      .field("viewport", &self.viewport)
      .field("form_factor", &self.form_factor)
      .finish_non_exhaustive()
  }
}

impl Registry {
  pub(crate) fn new(
    events_tx: Sender<Event>,
    layout: LayoutEngine,
    stacking: StackingController,
    viewport: Size,
  ) -> Self {
    let viewport = viewport.sanitized();
    Self {
      events_tx,
      windows: Vec::new(),
      stacking,
      form_factor: layout.form_factor(viewport),
      layout,
      viewport,
      next_mount: 0,
    }
  }

  /// Emit an event.
  pub(super) fn emit(&self, event: Event) {
    broadcast(&self.events_tx, event);
  }

  pub(super) fn emit_window_changed(&self, id: &AppId) {
    if let Some(window) = self.window(id) {
      self.emit(Event::WindowChanged {
        window: self.build_window(window),
      });
    }
  }

  pub(crate) fn window(&self, id: &AppId) -> Option<&CachedWindow> {
    self.windows.iter().find(|w| &w.id == id)
  }

  pub(super) fn window_mut(&mut self, id: &AppId) -> Option<&mut CachedWindow> {
    self.windows.iter_mut().find(|w| &w.id == id)
  }

  pub(crate) fn windows(&self) -> impl Iterator<Item = &CachedWindow> {
    self.windows.iter()
  }

  pub(crate) fn contains(&self, id: &AppId) -> bool {
    self.window(id).is_some()
  }

  pub(crate) fn mount_of(&self, id: &AppId) -> Option<MountId> {
    self.window(id).map(|w| w.content.mount_id())
  }

  /// Reserve a fresh mount identity.
  pub(crate) fn mint_mount(&mut self) -> MountId {
    let mount = MountId(self.next_mount);
    self.next_mount += 1;
    mount
  }

  pub(crate) const fn viewport(&self) -> Size {
    self.viewport
  }

  pub(crate) const fn form_factor(&self) -> FormFactor {
    self.form_factor
  }

  /// Bounds a window should be drawn at right now.
  pub(crate) fn effective_bounds(&self, window: &CachedWindow) -> Bounds {
    if window.maximized {
      self.layout.maximized_geometry(self.viewport)
    } else {
      window.geometry
    }
  }

  /// Convert a registry entry to the public `Window` type.
  pub(crate) fn build_window(&self, window: &CachedWindow) -> Window {
    Window {
      id: window.id.clone(),
      title: window.title.clone(),
      bounds: self.effective_bounds(window),
      restore_bounds: window.geometry,
      maximized: window.maximized,
      minimized: window.minimized,
      z_order: window.z_order,
      content: window.content.status(),
      mount: window.content.mount_id(),
    }
  }

  /// Window IDs front to back, minimized windows included.
  pub(crate) fn z_order(&self) -> Vec<AppId> {
    let mut by_z: Vec<&CachedWindow> = self.windows.iter().collect();
    by_z.sort_by(|a, b| b.z_order.cmp(&a.z_order));
    by_z.into_iter().map(|w| w.id.clone()).collect()
  }

  /// Topmost visible window containing the point.
  pub(crate) fn window_at(&self, point: crate::types::Point) -> Option<&CachedWindow> {
    self
      .windows
      .iter()
      .filter(|w| !w.minimized && self.effective_bounds(w).contains(point))
      .max_by_key(|w| w.z_order)
  }

  pub(crate) fn build_snapshot(&self) -> Snapshot {
    Snapshot {
      windows: self.windows.iter().map(|w| self.build_window(w)).collect(),
      z_order: self.z_order(),
      viewport: self.viewport,
      form_factor: self.form_factor,
    }
  }

  /// Whether any window depends on viewport size.
  pub(crate) fn has_maximized(&self) -> bool {
    self.windows.iter().any(|w| w.maximized)
  }

  /// Apply a new viewport size.
  ///
  /// Maximized windows follow the viewport; free-form windows are left alone.
  /// Entering the compact form factor maximizes every window.
  pub(crate) fn set_viewport(&mut self, viewport: Size) {
    let viewport = viewport.sanitized();
    let previous = self.form_factor;
    self.viewport = viewport;
    self.form_factor = self.layout.form_factor(viewport);

    if previous == FormFactor::Desktop && self.form_factor == FormFactor::Compact {
      log::debug!("[registry] entering compact layout, maximizing all windows");
      for window in &mut self.windows {
        window.maximized = true;
        window.interaction = None;
      }
    }

    self.emit(Event::ViewportChanged {
      viewport,
      form_factor: self.form_factor,
    });

    let changed: Vec<Window> = self
      .windows
      .iter()
      .filter(|w| w.maximized)
      .map(|w| self.build_window(w))
      .collect();
    for window in changed {
      self.emit(Event::WindowChanged { window });
    }
  }
}
