/*!
deskshell - window manager for a browser desktop shell

```
use deskshell::{AppId, Desktop, IconGesture, LaunchOutcome, Launcher, Point, Size};

// Create instance for the current viewport
let desktop = Desktop::new(Size::new(1200.0, 800.0)).unwrap();
let launcher = Launcher::with_static_portfolio();

// Double-click a desktop icon
let about = AppId::new("about");
let outcome = launcher.icon_gesture(&desktop, &about, IconGesture::DoubleClick).unwrap();
assert_eq!(outcome, LaunchOutcome::Opened);

// Drag it by the title bar
let origin = desktop.window(&about).unwrap().bounds.origin();
desktop.begin_drag(&about, origin);
desktop.end_drag(&about, Point::new(50.0, 50.0));

// Maximized windows follow the viewport
desktop.toggle_maximize(&about);
desktop.set_viewport(Size::new(800.0, 600.0));
assert_eq!(desktop.window(&about).unwrap().bounds.h, 590.0);

// Subscribe to events
let mut events = desktop.subscribe();
desktop.close(&about);
assert!(events.try_recv().is_ok());
```
*/

mod config;
mod content;
mod core;
mod launcher;
mod layout;
mod stacking;

mod types;
pub use types::*;

pub use crate::config::{DeskConfig, MAX_INITIAL_Z};
pub use crate::content::{
  Content, ContentContext, ContentError, ContentResolver, ContentResult, ContentStatus,
  StaticContent, Surface, WindowControls,
};
pub use crate::core::input::{ChromeButton, ResizeEdge};
pub use crate::core::{Desktop, DesktopBuilder};
pub use crate::launcher::{
  IconGesture, LaunchOutcome, Launcher, LauncherIcon, SharedFactory, TaskbarEntry,
};
pub use crate::layout::{FormFactor, LayoutEngine};
