/*!
Launcher surface: desktop icons and taskbar entries.

The launcher holds a catalog of apps and turns icon and taskbar gestures into
Desktop operations:

| window state      | activation result        |
|-------------------|--------------------------|
| not open          | open (`Opened`)          |
| open, minimized   | restore (`Restored`)     |
| open, visible     | bring to front (`Focused`) |

Desktop icons activate on double-click; in the compact layout a single tap
is enough. Taskbar entries always activate on click.
*/

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::content::{Content, ContentContext, ContentResult, StaticContent};
use crate::core::Desktop;
use crate::layout::FormFactor;
use crate::types::{AppId, DeskError, DeskResult};

/// Reusable content factory: called once per open.
pub type SharedFactory =
  Arc<dyn Fn(ContentContext) -> ContentResult<Box<dyn Content>> + Send + Sync>;

/// Pointer gesture on a desktop icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IconGesture {
  Click,
  DoubleClick,
}

/// What an activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LaunchOutcome {
  Opened,
  Restored,
  Focused,
  /// The gesture does not activate anything in this layout.
  Ignored,
}

/// A desktop icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LauncherIcon {
  pub id: AppId,
  pub label: String,
  pub icon: String,
}

/// A taskbar button with its running indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskbarEntry {
  pub id: AppId,
  pub label: String,
  pub icon: String,
  pub running: bool,
  pub minimized: bool,
}

struct App {
  icon: LauncherIcon,
  factory: SharedFactory,
}

/// Catalog of launchable apps, in display order.
#[derive(Default)]
pub struct Launcher {
  apps: Vec<App>,
}

impl std::fmt::Debug for Launcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list()
      .entries(self.apps.iter().map(|a| &a.icon.id))
      .finish()
  }
}

/// The portfolio apps: id, label, icon.
const PORTFOLIO: [(&str, &str, &str); 6] = [
  ("about", "About me", "user"),
  ("resume", "Resume", "file-text"),
  ("projects", "Projects", "folder"),
  ("blog", "Blog", "book-open"),
  ("links", "Links", "link"),
  ("contact", "Contact me", "mail"),
];

impl Launcher {
  pub fn new() -> Self {
    Self::default()
  }

  /// The six portfolio apps, all backed by `factory`.
  ///
  /// The factory can tell apps apart via `ctx.resolver.window()`.
  pub fn with_portfolio_apps(factory: SharedFactory) -> Self {
    let mut launcher = Self::new();
    for (id, label, icon) in PORTFOLIO {
      launcher.register(id, label, icon, Arc::clone(&factory));
    }
    launcher
  }

  /// Portfolio apps showing static placeholder content.
  pub fn with_static_portfolio() -> Self {
    Self::with_portfolio_apps(Arc::new(|ctx: ContentContext| {
      let label = ctx.resolver.window().to_string();
      StaticContent::factory(label)(ctx)
    }))
  }

  /// Add an app, or replace the entry with the same id.
  pub fn register(
    &mut self,
    id: impl Into<AppId>,
    label: impl Into<String>,
    icon: impl Into<String>,
    factory: SharedFactory,
  ) -> &mut Self {
    let icon = LauncherIcon {
      id: id.into(),
      label: label.into(),
      icon: icon.into(),
    };
    let app = App { icon, factory };
    match self.apps.iter_mut().find(|a| a.icon.id == app.icon.id) {
      Some(existing) => *existing = app,
      None => self.apps.push(app),
    }
    self
  }

  pub fn contains(&self, id: &AppId) -> bool {
    self.app(id).is_ok()
  }

  fn app(&self, id: &AppId) -> DeskResult<&App> {
    self
      .apps
      .iter()
      .find(|a| &a.icon.id == id)
      .ok_or_else(|| DeskError::UnknownApp(id.clone()))
  }

  /// Desktop icons in display order.
  pub fn icons(&self) -> Vec<LauncherIcon> {
    self.apps.iter().map(|a| a.icon.clone()).collect()
  }

  /// Taskbar entries with live running/minimized state.
  pub fn taskbar(&self, desktop: &Desktop) -> Vec<TaskbarEntry> {
    self
      .apps
      .iter()
      .map(|a| TaskbarEntry {
        id: a.icon.id.clone(),
        label: a.icon.label.clone(),
        icon: a.icon.icon.clone(),
        running: desktop.is_open(&a.icon.id),
        minimized: desktop.is_minimized(&a.icon.id),
      })
      .collect()
  }

  /// Handle a gesture on a desktop icon.
  pub fn icon_gesture(
    &self,
    desktop: &Desktop,
    id: &AppId,
    gesture: IconGesture,
  ) -> DeskResult<LaunchOutcome> {
    let primary = match desktop.form_factor() {
      FormFactor::Desktop => IconGesture::DoubleClick,
      FormFactor::Compact => IconGesture::Click,
    };
    if gesture != primary {
      self.app(id)?;
      return Ok(LaunchOutcome::Ignored);
    }
    self.activate(desktop, id)
  }

  /// Handle a click on a taskbar entry.
  pub fn taskbar_click(&self, desktop: &Desktop, id: &AppId) -> DeskResult<LaunchOutcome> {
    self.activate(desktop, id)
  }

  /// Open, restore or focus `id`.
  pub fn activate(&self, desktop: &Desktop, id: &AppId) -> DeskResult<LaunchOutcome> {
    let app = self.app(id)?;

    if desktop.is_minimized(id) && desktop.restore(id).is_some() {
      return Ok(LaunchOutcome::Restored);
    }
    if desktop.focus(id).is_some() {
      return Ok(LaunchOutcome::Focused);
    }

    let factory = Arc::clone(&app.factory);
    if desktop.open(id.clone(), app.icon.label.clone(), move |ctx| factory(ctx)) {
      log::debug!("[launcher] opened {id}");
      Ok(LaunchOutcome::Opened)
    } else {
      // Lost a race with another opener; the window exists now.
      Ok(
        desktop
          .focus(id)
          .map_or(LaunchOutcome::Ignored, |_| LaunchOutcome::Focused),
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Size;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn setup(w: f64) -> (Desktop, Launcher) {
    (
      Desktop::new(Size::new(w, 800.0)).unwrap(),
      Launcher::with_static_portfolio(),
    )
  }

  #[test]
  fn portfolio_catalog() {
    let launcher = Launcher::with_static_portfolio();
    let labels: Vec<String> = launcher.icons().into_iter().map(|i| i.label).collect();
    assert_eq!(
      labels,
      ["About me", "Resume", "Projects", "Blog", "Links", "Contact me"]
    );
  }

  #[test]
  fn dispatch_policy() {
    let (desktop, launcher) = setup(1200.0);
    let about = AppId::new("about");
    let resume = AppId::new("resume");

    assert_eq!(launcher.activate(&desktop, &about).unwrap(), LaunchOutcome::Opened);
    assert_eq!(launcher.activate(&desktop, &resume).unwrap(), LaunchOutcome::Opened);
    assert_eq!(desktop.frontmost(), Some(resume.clone()));

    assert_eq!(launcher.activate(&desktop, &about).unwrap(), LaunchOutcome::Focused);
    assert_eq!(desktop.frontmost(), Some(about.clone()));
    assert_eq!(desktop.windows().len(), 2);

    desktop.minimize(&about);
    assert_eq!(
      launcher.taskbar_click(&desktop, &about).unwrap(),
      LaunchOutcome::Restored
    );
    assert!(!desktop.is_minimized(&about));
  }

  #[test]
  fn window_title_comes_from_label() {
    let (desktop, launcher) = setup(1200.0);
    let about = AppId::new("about");
    launcher.activate(&desktop, &about).unwrap();
    assert_eq!(desktop.window(&about).unwrap().title, "About me");
  }

  #[test]
  fn desktop_icons_need_double_click() {
    let (desktop, launcher) = setup(1200.0);
    let blog = AppId::new("blog");
    assert_eq!(
      launcher.icon_gesture(&desktop, &blog, IconGesture::Click).unwrap(),
      LaunchOutcome::Ignored
    );
    assert!(!desktop.is_open(&blog));
    assert_eq!(
      launcher.icon_gesture(&desktop, &blog, IconGesture::DoubleClick).unwrap(),
      LaunchOutcome::Opened
    );
  }

  #[test]
  fn compact_icons_open_on_tap() {
    let (desktop, launcher) = setup(400.0);
    let links = AppId::new("links");
    assert_eq!(
      launcher.icon_gesture(&desktop, &links, IconGesture::Click).unwrap(),
      LaunchOutcome::Opened
    );
    assert!(desktop.is_maximized(&links));
  }

  #[test]
  fn unknown_app_is_an_error() {
    let (desktop, launcher) = setup(1200.0);
    let guestbook = AppId::new("guestbook");
    assert!(matches!(
      launcher.activate(&desktop, &guestbook),
      Err(DeskError::UnknownApp(_))
    ));
    assert!(launcher
      .icon_gesture(&desktop, &guestbook, IconGesture::Click)
      .is_err());
  }

  #[test]
  fn taskbar_shows_running_and_minimized() {
    let (desktop, launcher) = setup(1200.0);
    launcher.activate(&desktop, &AppId::new("projects")).unwrap();
    launcher.activate(&desktop, &AppId::new("contact")).unwrap();
    desktop.minimize(&AppId::new("contact"));

    let entries = launcher.taskbar(&desktop);
    let state: Vec<(&str, bool, bool)> = entries
      .iter()
      .map(|e| (e.id.as_str(), e.running, e.minimized))
      .collect();
    assert_eq!(
      state,
      vec![
        ("about", false, false),
        ("resume", false, false),
        ("projects", true, false),
        ("blog", false, false),
        ("links", false, false),
        ("contact", true, true),
      ]
    );
  }

  #[test]
  fn shared_factory_runs_once_per_open() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut launcher = Launcher::new();
    launcher.register(
      "resume",
      "Resume",
      "file-text",
      Arc::new(move |ctx: ContentContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        StaticContent::factory("Resume")(ctx)
      }),
    );
    let desktop = Desktop::new(Size::new(1200.0, 800.0)).unwrap();
    let resume = AppId::new("resume");

    launcher.activate(&desktop, &resume).unwrap();
    launcher.activate(&desktop, &resume).unwrap();
    desktop.minimize(&resume);
    launcher.activate(&desktop, &resume).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    desktop.close(&resume);
    launcher.activate(&desktop, &resume).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn register_replaces_existing_entry() {
    let mut launcher = Launcher::with_static_portfolio();
    let factory: SharedFactory = Arc::new(|ctx: ContentContext| StaticContent::factory("x")(ctx));
    launcher.register("blog", "Notes", "pen", factory);
    assert_eq!(launcher.icons().len(), 6);
    assert!(launcher.icons().iter().any(|i| i.label == "Notes"));
  }
}
