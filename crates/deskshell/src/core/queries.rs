/*!
Queries and viewport handling on Desktop.
*/

use super::input::ChromeButton;
use super::Desktop;
use crate::content::{ContentStatus, Surface};
use crate::layout::FormFactor;
use crate::types::{AppId, DeskError, DeskResult, Point, Size, Snapshot, Window};

impl Desktop {
  /// Whether `id` has a window, minimized or not.
  pub fn is_open(&self, id: &AppId) -> bool {
    self.read(|r| r.contains(id))
  }

  /// Whether `id` is open and parked in the taskbar.
  pub fn is_minimized(&self, id: &AppId) -> bool {
    self.read(|r| r.window(id).is_some_and(|w| w.minimized))
  }

  /// Whether `id` is open and filling the viewport.
  pub fn is_maximized(&self, id: &AppId) -> bool {
    self.read(|r| r.window(id).is_some_and(|w| w.maximized))
  }

  /// Get one window.
  pub fn window(&self, id: &AppId) -> DeskResult<Window> {
    self.read(|r| {
      r.window(id)
        .map(|w| r.build_window(w))
        .ok_or_else(|| DeskError::WindowNotFound(id.clone()))
    })
  }

  /// All open windows in the order they were opened.
  pub fn windows(&self) -> Vec<Window> {
    self.read(|r| r.windows().map(|w| r.build_window(w)).collect())
  }

  /// Visible windows back to front, the order to draw them in.
  pub fn render_order(&self) -> Vec<Window> {
    self.read(|r| {
      let mut visible: Vec<Window> = r
        .windows()
        .filter(|w| !w.minimized)
        .map(|w| r.build_window(w))
        .collect();
      visible.sort_by_key(|w| w.z_order);
      visible
    })
  }

  /// Every open window id, front to back, minimized windows included.
  pub fn z_order(&self) -> Vec<AppId> {
    self.read(|r| r.z_order())
  }

  /// The visible window on top, if any.
  pub fn frontmost(&self) -> Option<AppId> {
    self.read(|r| {
      r.windows()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_order)
        .map(|w| w.id.clone())
    })
  }

  /// Topmost visible window containing `point`.
  pub fn window_at(&self, point: Point) -> Option<AppId> {
    self.read(|r| r.window_at(point).map(|w| w.id.clone()))
  }

  /// Full state, as sent in `sync:init`.
  pub fn snapshot(&self) -> Snapshot {
    self.read(|r| r.build_snapshot())
  }

  /// Resolution state of a window's content.
  pub fn content_status(&self, id: &AppId) -> Option<ContentStatus> {
    self.read(|r| r.window(id).map(|w| w.content.status()))
  }

  /// Render a window's content area.
  ///
  /// `f` runs under the read lock: it must not call back into this Desktop.
  pub fn with_surface<R>(&self, id: &AppId, f: impl FnOnce(Surface<'_>) -> R) -> Option<R> {
    self.read(|r| r.window(id).map(|w| f(w.content.surface())))
  }

  /// Borrow a window's content as its concrete type.
  ///
  /// Returns `None` if the window is closed, its content failed to mount, or
  /// it is not a `T`. `f` runs under the read lock.
  pub fn with_content<T: 'static, R>(&self, id: &AppId, f: impl FnOnce(&T) -> R) -> Option<R> {
    self.read(|r| {
      let content = r.window(id)?.content.content()?;
      content.as_any().downcast_ref::<T>().map(f)
    })
  }

  // === Viewport ===

  /// Last reported viewport size.
  pub fn viewport(&self) -> Size {
    self.read(|r| r.viewport())
  }

  /// Layout the current viewport calls for.
  pub fn form_factor(&self) -> FormFactor {
    self.read(|r| r.form_factor())
  }

  /// Title-bar buttons for the current form factor.
  pub fn chrome_buttons(&self) -> &'static [ChromeButton] {
    ChromeButton::for_form_factor(self.form_factor())
  }

  /// Report a new viewport size. Maximized windows follow it.
  pub fn set_viewport(&self, viewport: Size) {
    self.write(|r| r.set_viewport(viewport));
  }

  /// Whether any window depends on the viewport size. When `false` the host
  /// may stop forwarding resize events.
  pub fn needs_viewport_updates(&self) -> bool {
    self.read(|r| r.has_maximized())
  }
}
