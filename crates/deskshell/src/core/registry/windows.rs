/*!
Window operations on the Registry.

Every operation is a no-op on an unknown id. Nothing here calls into hosted
content; handles are only moved in and out.
*/

use super::{CachedWindow, Registry};
use crate::content::ContentHandle;
use crate::core::input::{drag_origin, resize_bounds, Interaction, ResizeEdge};
use crate::layout::FormFactor;
use crate::types::{AppId, Bounds, Event, MountId, Point, Size, ZOrder};

impl Registry {
  /// Insert a freshly mounted window.
  ///
  /// Gives the handle back if the id is already taken, so the caller can drop
  /// it outside the lock.
  pub(crate) fn insert(
    &mut self,
    id: AppId,
    title: String,
    content: ContentHandle,
  ) -> Result<ZOrder, ContentHandle> {
    if self.contains(&id) {
      return Err(content);
    }

    let geometry = self.layout.initial_geometry(&id, self.viewport);
    let z_order = self.stacking.bump();
    content.attach();

    log::debug!("[registry] open {id} at {geometry:?} z={z_order}");
    self.windows.push(CachedWindow {
      id: id.clone(),
      title,
      geometry,
      maximized: self.form_factor == FormFactor::Compact,
      minimized: false,
      z_order,
      content,
      interaction: None,
    });

    if let Some(window) = self.window(&id) {
      self.emit(Event::WindowOpened {
        window: self.build_window(window),
      });
    }
    Ok(z_order)
  }

  /// Remove a window. With `mount` set, only removes that exact mount.
  ///
  /// Returns the removed entry; dropping it unmounts the content.
  pub(crate) fn close_mount(&mut self, id: &AppId, mount: Option<MountId>) -> Option<CachedWindow> {
    let index = self.windows.iter().position(|w| &w.id == id)?;
    if let Some(mount) = mount {
      if self.windows.get(index)?.content.mount_id() != mount {
        log::debug!("[registry] ignoring close of stale mount {mount} for {id}");
        return None;
      }
    }

    let removed = self.windows.remove(index);
    log::debug!("[registry] close {id}");
    self.emit(Event::WindowClosed {
      window_id: id.clone(),
    });
    Some(removed)
  }

  /// Hide a window. Geometry, maximize state and content are kept.
  pub(crate) fn minimize(&mut self, id: &AppId) -> bool {
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    if window.minimized {
      return false;
    }
    window.minimized = true;
    window.interaction = None;

    log::debug!("[registry] minimize {id}");
    self.emit_window_changed(id);
    true
  }

  /// Unhide a window and bring it to the front.
  pub(crate) fn restore(&mut self, id: &AppId) -> Option<ZOrder> {
    let z_order = self.stacking.peek();
    let window = self.window_mut(id)?;
    window.minimized = false;
    window.z_order = z_order;
    self.stacking.bump();

    log::debug!("[registry] restore {id} z={z_order}");
    self.emit_window_changed(id);
    self.emit(Event::FocusWindow {
      window_id: id.clone(),
      z_order,
    });
    Some(z_order)
  }

  /// Bring a visible window to the front.
  pub(crate) fn focus(&mut self, id: &AppId) -> Option<ZOrder> {
    if self.window(id)?.minimized {
      return None;
    }
    let z_order = self.stacking.bump();
    if let Some(window) = self.window_mut(id) {
      window.z_order = z_order;
    }

    self.emit(Event::FocusWindow {
      window_id: id.clone(),
      z_order,
    });
    Some(z_order)
  }

  /// Flip between free-form and full-viewport geometry.
  ///
  /// Returns the new maximized state, or `None` if nothing changed (unknown
  /// window, or compact layout where windows are always maximized).
  pub(crate) fn toggle_maximize(&mut self, id: &AppId) -> Option<bool> {
    if self.form_factor == FormFactor::Compact {
      return None;
    }
    let window = self.window_mut(id)?;
    window.maximized = !window.maximized;
    window.interaction = None;
    let maximized = window.maximized;

    log::debug!("[registry] {id} maximized={maximized}");
    self.emit_window_changed(id);
    Some(maximized)
  }

  // === Pointer sessions ===

  /// Start dragging. Refused while maximized or minimized.
  pub(crate) fn begin_drag(&mut self, id: &AppId, pointer: Point) -> bool {
    if !pointer.is_finite() {
      return false;
    }
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    if !window.is_free_form() {
      return false;
    }
    window.interaction = Some(Interaction::Drag {
      grab: pointer.delta_from(window.geometry.origin()),
    });
    self.focus(id);
    true
  }

  /// Move the window with the pointer. Only during a drag. Non-finite
  /// pointers are ignored and leave the session open.
  pub(crate) fn drag_to(&mut self, id: &AppId, pointer: Point) -> bool {
    if !pointer.is_finite() {
      return false;
    }
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    let Some(Interaction::Drag { grab }) = window.interaction else {
      return false;
    };
    let origin = drag_origin(grab, pointer);
    window.geometry = Bounds::from_parts(origin, window.geometry.size());

    log::trace!("[registry] drag {id} to {origin:?}");
    self.emit_window_changed(id);
    true
  }

  /// Commit the final drag position and end the session.
  pub(crate) fn end_drag(&mut self, id: &AppId, pointer: Point) -> bool {
    if !self.drag_to(id, pointer) {
      return false;
    }
    if let Some(window) = self.window_mut(id) {
      window.interaction = None;
    }
    true
  }

  /// Start resizing from an edge. Refused while maximized or minimized.
  pub(crate) fn begin_resize(&mut self, id: &AppId, edge: ResizeEdge, pointer: Point) -> bool {
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    if !window.is_free_form() {
      return false;
    }
    window.interaction = Some(Interaction::Resize {
      edge,
      start_pointer: pointer,
      start: window.geometry,
    });
    self.focus(id);
    true
  }

  /// Resize with the pointer. Only during a resize.
  pub(crate) fn resize_to(&mut self, id: &AppId, pointer: Point) -> bool {
    let min = self.layout.min_size();
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    let Some(Interaction::Resize {
      edge,
      start_pointer,
      start,
    }) = window.interaction
    else {
      return false;
    };
    window.geometry = resize_bounds(edge, start, start_pointer, pointer, min);

    log::trace!("[registry] resize {id} to {:?}", window.geometry);
    self.emit_window_changed(id);
    true
  }

  /// Commit the final size and end the session.
  pub(crate) fn end_resize(&mut self, id: &AppId, pointer: Point) -> bool {
    if !self.resize_to(id, pointer) {
      return false;
    }
    if let Some(window) = self.window_mut(id) {
      window.interaction = None;
    }
    true
  }

  /// Commit a position directly, as a finished drag would.
  pub(crate) fn move_to(&mut self, id: &AppId, origin: Point) -> bool {
    if !origin.is_finite() {
      return false;
    }
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    if window.maximized {
      return false;
    }
    window.geometry = Bounds::from_parts(origin, window.geometry.size());
    self.emit_window_changed(id);
    true
  }

  /// Commit a size directly, clamped to the minimum.
  pub(crate) fn resize_to_size(&mut self, id: &AppId, size: Size) -> bool {
    let size = self.layout.clamp_size(size);
    let Some(window) = self.window_mut(id) else {
      return false;
    };
    if window.maximized {
      return false;
    }
    window.geometry = Bounds::from_parts(window.geometry.origin(), size);
    self.emit_window_changed(id);
    true
  }
}
