/*!
Hosted content.

Window content is owned by external collaborators (pages, widgets, a web
front end). The window manager only mounts it once per open, shows a
placeholder while it resolves, and unmounts it on close.

## Lifecycle

```text
factory(ctx) ──► ContentHandle { Pending } ──► Ready
      │                               └──────► Failed { reason }
      └─ error / panic ──► ContentHandle { Failed }   (placeholder, window still usable)
```

- The factory runs exactly once per open and never while the registry lock
  is held.
- [`ContentResolver`] settles the status. Settling is one-shot: the first
  `ready`/`fail` wins.
- Once the window is closed the handle is dropped and every resolver for it
  becomes inert. A load that finishes later is simply discarded.
*/

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use async_broadcast::Sender;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::core::{broadcast, Registry};
use crate::types::{AppId, Event, MountId};

/// Content hosted inside a window.
pub trait Content: Send + Sync + 'static {
  /// Called once, before the window appears in the registry.
  fn on_mount(&mut self, _window: &AppId) {}

  /// Called once when the window closes (or the desktop is torn down).
  fn on_unmount(&mut self) {}

  /// Access the concrete type, for hosts that need to downcast.
  fn as_any(&self) -> &dyn Any;
}

/// Error a content factory can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("content failed to load: {reason}")]
pub struct ContentError {
  pub reason: String,
}

impl ContentError {
  pub fn new(reason: impl Into<String>) -> Self {
    Self {
      reason: reason.into(),
    }
  }
}

/// Result type for content factories.
pub type ContentResult<T> = Result<T, ContentError>;

/// Resolution state of a window's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum ContentStatus {
  Pending,
  Ready,
  Failed { reason: String },
}

impl ContentStatus {
  pub const fn is_settled(&self) -> bool {
    !matches!(self, Self::Pending)
  }
}

/// What a window should draw inside its chrome.
#[derive(Debug)]
pub enum Surface<'a> {
  /// Content is still resolving.
  Loading,
  /// Content failed; draw a placeholder. The window stays draggable and closable.
  Failed { reason: String },
  Content(&'a dyn Content),
}

impl<'a> std::fmt::Debug for dyn Content + 'a {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Content").finish_non_exhaustive()
  }
}

struct Cell {
  status: ContentStatus,
  /// Set once the window is in the registry. Until then settling is silent
  /// because `window:opened` will carry the status.
  mounted: bool,
}

/// One mounted piece of content, owned by its window.
pub(crate) struct ContentHandle {
  window: AppId,
  mount: MountId,
  cell: Arc<Mutex<Cell>>,
  content: Option<Box<dyn Content>>,
  mount_hook_ran: bool,
}

impl std::fmt::Debug for ContentHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContentHandle")
      .field("window", &self.window)
      .field("mount", &self.mount)
      .field("status", &self.status())
      .finish_non_exhaustive()
  }
}

impl ContentHandle {
  /// Run `factory` and wrap whatever it produces.
  ///
  /// Errors and panics become a `Failed` handle with no content.
  pub(crate) fn mount<F>(
    window: &AppId,
    mount: MountId,
    state: Weak<RwLock<Registry>>,
    events: Sender<Event>,
    factory: F,
  ) -> Self
  where
    F: FnOnce(ContentContext) -> ContentResult<Box<dyn Content>>,
  {
    let cell = Arc::new(Mutex::new(Cell {
      status: ContentStatus::Pending,
      mounted: false,
    }));
    let ctx = ContentContext {
      resolver: ContentResolver {
        window: window.clone(),
        mount,
        cell: Arc::downgrade(&cell),
        events,
      },
      controls: WindowControls {
        window: window.clone(),
        mount,
        state,
      },
    };

    let outcome = match catch_unwind(AssertUnwindSafe(|| factory(ctx))) {
      Ok(result) => result,
      Err(payload) => Err(ContentError::new(panic_message(payload.as_ref()))),
    };

    let mut handle = Self {
      window: window.clone(),
      mount,
      cell,
      content: None,
      mount_hook_ran: false,
    };

    match outcome {
      Ok(mut content) => {
        content.on_mount(window);
        handle.mount_hook_ran = true;
        handle.content = Some(content);
      }
      Err(e) => {
        log::warn!("[content] {window} failed to mount: {e}");
        handle.cell.lock().status = ContentStatus::Failed { reason: e.reason };
      }
    }
    handle
  }

  pub(crate) const fn mount_id(&self) -> MountId {
    self.mount
  }

  pub(crate) fn status(&self) -> ContentStatus {
    self.cell.lock().status.clone()
  }

  /// Mark the handle as live in the registry. Later settles emit events.
  pub(crate) fn attach(&self) {
    self.cell.lock().mounted = true;
  }

  pub(crate) fn content(&self) -> Option<&dyn Content> {
    self.content.as_deref()
  }

  pub(crate) fn surface(&self) -> Surface<'_> {
    match (self.status(), self.content.as_deref()) {
      (ContentStatus::Ready, Some(content)) => Surface::Content(content),
      (ContentStatus::Failed { reason }, _) => Surface::Failed { reason },
      (ContentStatus::Ready, None) => Surface::Failed {
        reason: "content missing".into(),
      },
      (ContentStatus::Pending, _) => Surface::Loading,
    }
  }
}

impl Drop for ContentHandle {
  fn drop(&mut self) {
    self.cell.lock().mounted = false;
    if let Some(mut content) = self.content.take() {
      if self.mount_hook_ran {
        content.on_unmount();
      }
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    format!("content panicked: {s}")
  } else if let Some(s) = payload.downcast_ref::<String>() {
    format!("content panicked: {s}")
  } else {
    "content panicked".to_owned()
  }
}

/// Everything a content factory receives.
#[derive(Debug, Clone)]
pub struct ContentContext {
  pub resolver: ContentResolver,
  pub controls: WindowControls,
}

/// Settles a window's content status. Cheap to clone; hand it to async loaders.
#[derive(Clone)]
pub struct ContentResolver {
  window: AppId,
  mount: MountId,
  cell: Weak<Mutex<Cell>>,
  events: Sender<Event>,
}

impl std::fmt::Debug for ContentResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContentResolver")
      .field("window", &self.window)
      .field("mount", &self.mount)
      .finish_non_exhaustive()
  }
}

impl ContentResolver {
  /// Content finished loading.
  ///
  /// Returns `false` if the window is gone or the status was already settled.
  pub fn ready(&self) -> bool {
    self.settle(ContentStatus::Ready)
  }

  /// Content failed to load. The window shows a placeholder instead.
  ///
  /// Returns `false` if the window is gone or the status was already settled.
  pub fn fail(&self, reason: impl Into<String>) -> bool {
    self.settle(ContentStatus::Failed {
      reason: reason.into(),
    })
  }

  pub fn window(&self) -> &AppId {
    &self.window
  }

  /// Whether the window this resolver belongs to is still open.
  pub fn is_live(&self) -> bool {
    self.cell.strong_count() > 0
  }

  fn settle(&self, status: ContentStatus) -> bool {
    let Some(cell) = self.cell.upgrade() else {
      log::debug!(
        "[content] {} (mount {}) settled after close, discarding",
        self.window,
        self.mount
      );
      return false;
    };

    let mut cell = cell.lock();
    if cell.status.is_settled() {
      return false;
    }
    if let ContentStatus::Failed { reason } = &status {
      log::warn!("[content] {} failed: {reason}", self.window);
    }
    cell.status = status.clone();
    if cell.mounted {
      broadcast(
        &self.events,
        Event::ContentChanged {
          window_id: self.window.clone(),
          mount: self.mount,
          status,
        },
      );
    }
    true
  }
}

/// Chrome hooks exposed to content: the `onClose` / `onMinimize` callbacks.
///
/// Bound to a single mount. Controls from a closed window do nothing, even if
/// a new window with the same id has since been opened.
#[derive(Clone)]
pub struct WindowControls {
  window: AppId,
  mount: MountId,
  state: Weak<RwLock<Registry>>,
}

impl std::fmt::Debug for WindowControls {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WindowControls")
      .field("window", &self.window)
      .field("mount", &self.mount)
      .finish_non_exhaustive()
  }
}

impl WindowControls {
  /// Close the window. Returns `false` if it was already closed.
  pub fn close(&self) -> bool {
    let Some(state) = self.state.upgrade() else {
      return false;
    };
    let removed = state.write().close_mount(&self.window, Some(self.mount));
    // Unmount runs here, after the lock is released.
    removed.is_some()
  }

  /// Minimize the window. Returns `false` if it is closed or already minimized.
  pub fn minimize(&self) -> bool {
    let Some(state) = self.state.upgrade() else {
      return false;
    };
    let mut registry = state.write();
    if registry.mount_of(&self.window) != Some(self.mount) {
      return false;
    }
    registry.minimize(&self.window)
  }

  pub fn window(&self) -> &AppId {
    &self.window
  }
}

/// Content that needs nothing from the window manager. Ready immediately.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
  pub label: String,
}

impl StaticContent {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
    }
  }

  /// A factory that mounts a `StaticContent` and resolves it on the spot.
  pub fn factory(
    label: impl Into<String>,
  ) -> impl FnOnce(ContentContext) -> ContentResult<Box<dyn Content>> {
    let label = label.into();
    move |ctx| {
      ctx.resolver.ready();
      Ok(Box::new(Self::new(label)) as Box<dyn Content>)
    }
  }
}

impl Content for StaticContent {
  fn as_any(&self) -> &dyn Any {
    self
  }
}
