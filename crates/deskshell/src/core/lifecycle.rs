/*!
Window lifecycle on Desktop: open, close, minimize, restore, focus, maximize.

Content factories and unmount hooks run with no lock held.
*/

use std::sync::Arc;

use super::input::ChromeButton;
use super::Desktop;
use crate::content::{Content, ContentContext, ContentHandle, ContentResult};
use crate::types::{AppId, Point, ZOrder};

impl Desktop {
  /// Open a window, mounting its content with `factory`.
  ///
  /// If `id` is already open nothing happens, `factory` is dropped without
  /// being called, and this returns `false`.
  pub fn open<F>(&self, id: impl Into<AppId>, title: impl Into<String>, factory: F) -> bool
  where
    F: FnOnce(ContentContext) -> ContentResult<Box<dyn Content>>,
  {
    let id = id.into();

    // Step 1: Check and reserve a mount id (quick write, releases lock)
    let Some(mount) = self.write(|r| (!r.contains(&id)).then(|| r.mint_mount())) else {
      log::debug!("[desktop] {id} already open");
      return false;
    };

    // Step 2: Run the factory (NO LOCK)
    let handle = ContentHandle::mount(
      &id,
      mount,
      Arc::downgrade(&self.state),
      self.events(),
      factory,
    );

    // Step 3: Insert (quick write)
    match self.write(|r| r.insert(id.clone(), title.into(), handle)) {
      Ok(_) => true,
      Err(handle) => {
        log::debug!("[desktop] {id} was opened concurrently, discarding mount {mount}");
        drop(handle);
        false
      }
    }
  }

  /// Close a window and unmount its content. No-op if not open.
  pub fn close(&self, id: &AppId) -> bool {
    let removed = self.write(|r| r.close_mount(id, None));
    // Unmount hook runs here.
    removed.is_some()
  }

  /// Hide a window, keeping its geometry and content.
  pub fn minimize(&self, id: &AppId) -> bool {
    self.write(|r| r.minimize(id))
  }

  /// Show a window again and bring it to the front.
  pub fn restore(&self, id: &AppId) -> Option<ZOrder> {
    self.write(|r| r.restore(id))
  }

  /// Bring a visible window to the front.
  pub fn focus(&self, id: &AppId) -> Option<ZOrder> {
    self.write(|r| r.focus(id))
  }

  /// Toggle maximized. Returns the new state, or `None` if nothing changed.
  pub fn toggle_maximize(&self, id: &AppId) -> Option<bool> {
    self.write(|r| r.toggle_maximize(id))
  }

  /// Dispatch a title-bar button. Returns whether anything changed.
  pub fn press(&self, id: &AppId, button: ChromeButton) -> bool {
    match button {
      ChromeButton::Minimize => self.minimize(id),
      ChromeButton::Maximize => self.toggle_maximize(id).is_some(),
      ChromeButton::Close => self.close(id),
    }
  }

  /// Click on the desktop: focus the topmost visible window under `point`.
  pub fn click_at(&self, point: Point) -> Option<AppId> {
    self.write(|r| {
      let id = r.window_at(point)?.id.clone();
      r.focus(&id);
      Some(id)
    })
  }
}
