/*!
Core Desktop instance - owns all window state and event broadcasting.

# Module Structure

- `mod.rs` - Desktop struct, construction, events
- `registry/` - Registry with private fields + operations + event emission
- `input.rs` - drag/resize math and title-bar buttons
- `lifecycle.rs` - open, close, minimize, restore, focus, maximize
- `pointer.rs` - drag and resize sessions
- `queries.rs` - lookups, snapshots, content access, viewport

# Example

```
use deskshell::{AppId, Desktop, Size, StaticContent};

let desktop = Desktop::new(Size::new(1200.0, 800.0)).unwrap();
let mut events = desktop.subscribe();

assert!(desktop.open("about", "About me", StaticContent::factory("About me")));
assert!(desktop.is_open(&AppId::new("about")));
assert!(events.try_recv().is_ok());
```
*/

pub(crate) mod input;
mod lifecycle;
mod pointer;
mod queries;
mod registry;

#[cfg(test)]
mod tests;

pub(crate) use registry::{broadcast, Registry};

use std::sync::Arc;

use async_broadcast::{InactiveReceiver, Sender};
use parking_lot::RwLock;

use crate::config::DeskConfig;
use crate::layout::LayoutEngine;
use crate::stacking::StackingController;
use crate::types::{DeskResult, Event, Size};

/// Viewport assumed until the host reports one.
const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Main Desktop instance - owns windows, stacking and event broadcasting.
///
/// Clone is cheap (Arc bumps) - share freely across threads. Dropping the
/// last clone closes every window and unmounts its content.
pub struct Desktop {
  pub(crate) state: Arc<RwLock<Registry>>,
  events_tx: Sender<Event>,
  events_keepalive: InactiveReceiver<Event>,
}

impl Clone for Desktop {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
      events_tx: self.events_tx.clone(),
      events_keepalive: self.events_keepalive.clone(),
    }
  }
}

impl std::fmt::Debug for Desktop {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Desktop").finish_non_exhaustive()
  }
}

/// Builder for configuring a Desktop instance.
///
/// # Example
///
/// ```
/// use deskshell::{DeskConfig, Desktop, FormFactor, Size};
///
/// let desktop = Desktop::builder()
///     .config(DeskConfig { compact_breakpoint: 900.0, ..Default::default() })
///     .viewport(Size::new(800.0, 600.0))
///     .build()
///     .unwrap();
/// assert_eq!(desktop.form_factor(), FormFactor::Compact);
/// ```
#[derive(Debug, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct DesktopBuilder {
  config: DeskConfig,
  viewport: Size,
}

impl Default for DesktopBuilder {
  fn default() -> Self {
    Self {
      config: DeskConfig::default(),
      viewport: DEFAULT_VIEWPORT,
    }
  }
}

impl DesktopBuilder {
  /// Replace the whole configuration.
  pub fn config(mut self, config: DeskConfig) -> Self {
    self.config = config;
    self
  }

  /// Initial viewport size. Default: 1280x800.
  pub const fn viewport(mut self, viewport: Size) -> Self {
    self.viewport = viewport;
    self
  }

  /// Build the Desktop. Fails if the configuration is invalid.
  pub fn build(self) -> DeskResult<Desktop> {
    self.config.validate()?;

    let (mut tx, rx) = async_broadcast::broadcast(self.config.event_channel_capacity);
    tx.set_overflow(true); // Drop oldest messages when full

    let registry = Registry::new(
      tx.clone(),
      LayoutEngine::new(&self.config),
      StackingController::new(self.config.initial_z),
      self.viewport,
    );
    log::debug!("[desktop] created with {registry:?}");

    Ok(Desktop {
      state: Arc::new(RwLock::new(registry)),
      events_tx: tx,
      events_keepalive: rx.deactivate(),
    })
  }
}

impl Desktop {
  /// Create a Desktop with default configuration.
  pub fn new(viewport: Size) -> DeskResult<Self> {
    Self::builder().viewport(viewport).build()
  }

  /// Create a builder for configuring a new Desktop.
  pub fn builder() -> DesktopBuilder {
    DesktopBuilder::default()
  }

  /// Subscribe to events from this instance.
  pub fn subscribe(&self) -> async_broadcast::Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  pub(crate) fn events(&self) -> Sender<Event> {
    self.events_tx.clone()
  }

  /// Read state. Never call content code inside the closure.
  #[inline]
  pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. Never call content code inside the closure.
  #[inline]
  pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.state.write())
  }
}
