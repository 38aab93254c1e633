use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use super::input::{ChromeButton, ResizeEdge};
use super::Desktop;
use crate::content::{Content, ContentError, ContentResolver, ContentStatus, StaticContent, Surface};
use crate::layout::FormFactor;
use crate::types::{AppId, Bounds, Event, Point, Size};

fn desktop(w: f64, h: f64) -> Desktop {
  Desktop::new(Size::new(w, h)).unwrap()
}

fn id(s: &str) -> AppId {
  AppId::new(s)
}

fn open(desktop: &Desktop, app: &str) -> bool {
  desktop.open(app, app, StaticContent::factory(app))
}

fn drain(rx: &mut async_broadcast::Receiver<Event>) -> Vec<Event> {
  std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

// === Registry ===

#[test]
fn open_is_idempotent_and_skips_factory() {
  let d = desktop(1200.0, 800.0);
  assert!(open(&d, "about"));

  let called = AtomicUsize::new(0);
  let again = d.open("about", "About me", |_ctx| {
    called.fetch_add(1, Ordering::SeqCst);
    Ok(Box::new(StaticContent::new("dup")) as Box<dyn Content>)
  });
  assert!(!again);
  assert_eq!(called.load(Ordering::SeqCst), 0);
  assert_eq!(d.windows().len(), 1);
}

#[test]
fn about_then_resume_then_about_again() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  open(&d, "resume");
  assert_eq!(d.frontmost(), Some(id("resume")));

  open(&d, "about");
  let ids: Vec<AppId> = d.windows().into_iter().map(|w| w.id).collect();
  assert_eq!(ids, vec![id("about"), id("resume")]);
}

#[test]
fn huge_initial_z_is_rejected_at_build() {
  let config = crate::DeskConfig {
    initial_z: u64::MAX,
    ..Default::default()
  };
  assert!(Desktop::builder().config(config).build().is_err());
}

#[test]
fn largest_initial_z_still_gives_unique_tokens() {
  let config = crate::DeskConfig {
    initial_z: crate::config::MAX_INITIAL_Z,
    ..Default::default()
  };
  let d = Desktop::builder().config(config).build().unwrap();
  open(&d, "about");
  open(&d, "resume");
  let about = d.window(&id("about")).unwrap().z_order;
  let resume = d.window(&id("resume")).unwrap().z_order;
  assert!(resume > about);
}

#[test]
fn first_window_gets_initial_z() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  assert_eq!(d.window(&id("about")).unwrap().z_order.0, 100);
  open(&d, "blog");
  assert_eq!(d.window(&id("blog")).unwrap().z_order.0, 101);
}

#[test]
fn missing_window_is_an_error_for_queries_only() {
  let d = desktop(1200.0, 800.0);
  let ghost = id("ghost");
  assert!(d.window(&ghost).is_err());
  assert!(!d.close(&ghost));
  assert!(!d.minimize(&ghost));
  assert!(d.restore(&ghost).is_none());
  assert!(d.focus(&ghost).is_none());
  assert!(d.toggle_maximize(&ghost).is_none());
  assert!(!d.begin_drag(&ghost, Point::new(0.0, 0.0)));
}

#[test]
fn close_then_open_is_fresh() {
  let d = desktop(1200.0, 800.0);
  open(&d, "links");
  let first = d.window(&id("links")).unwrap();
  d.move_to(&id("links"), Point::new(5.0, 5.0));
  d.toggle_maximize(&id("links"));

  assert!(d.close(&id("links")));
  assert!(!d.is_open(&id("links")));
  open(&d, "links");

  let second = d.window(&id("links")).unwrap();
  assert_ne!(first.mount, second.mount);
  assert_eq!(second.bounds, first.bounds);
  assert!(!second.maximized);
}

// === State machine ===

#[test]
fn minimize_and_restore_preserve_state() {
  let d = desktop(1200.0, 800.0);
  open(&d, "blog");
  open(&d, "about");
  let blog = id("blog");
  d.move_to(&blog, Point::new(42.0, 17.0));
  let before = d.window(&blog).unwrap();

  assert!(d.minimize(&blog));
  assert!(!d.minimize(&blog), "already minimized");
  assert!(d.is_minimized(&blog));
  assert!(d.render_order().iter().all(|w| w.id != blog));
  assert!(d.z_order().contains(&blog));

  let z = d.restore(&blog).unwrap();
  let after = d.window(&blog).unwrap();
  assert_eq!(after.bounds, before.bounds);
  assert_eq!(after.mount, before.mount);
  assert_eq!(after.maximized, before.maximized);
  assert!(z > before.z_order);
  assert_eq!(d.frontmost(), Some(blog));
}

#[test]
fn focus_ignores_minimized_windows() {
  let d = desktop(1200.0, 800.0);
  open(&d, "blog");
  d.minimize(&id("blog"));
  assert!(d.focus(&id("blog")).is_none());
  assert!(d.is_minimized(&id("blog")));
}

#[test]
fn maximize_round_trip_is_exact() {
  let d = desktop(1200.0, 800.0);
  let projects = id("projects");
  open(&d, "projects");
  d.move_to(&projects, Point::new(33.3, 44.4));
  d.resize_to_size(&projects, Size::new(701.7, 455.5));
  let before = d.window(&projects).unwrap().bounds;

  assert_eq!(d.toggle_maximize(&projects), Some(true));
  assert_eq!(
    d.window(&projects).unwrap().bounds,
    Bounds::new(0.0, 0.0, 1200.0, 790.0)
  );
  assert_eq!(d.toggle_maximize(&projects), Some(false));
  assert_eq!(d.window(&projects).unwrap().bounds, before);
}

#[test]
fn maximized_window_follows_viewport() {
  let d = desktop(1200.0, 800.0);
  let projects = id("projects");
  open(&d, "projects");
  open(&d, "about");
  let about_before = d.window(&id("about")).unwrap().bounds;
  d.toggle_maximize(&projects);
  assert!(d.needs_viewport_updates());

  d.set_viewport(Size::new(800.0, 600.0));
  assert_eq!(
    d.window(&projects).unwrap().bounds,
    Bounds::new(0.0, 0.0, 800.0, 590.0)
  );
  assert_eq!(d.window(&id("about")).unwrap().bounds, about_before);
}

#[test]
fn viewport_changes_emit_events_for_maximized_windows() {
  let d = desktop(1200.0, 800.0);
  open(&d, "projects");
  open(&d, "about");
  d.toggle_maximize(&id("projects"));
  let mut rx = d.subscribe();

  d.set_viewport(Size::new(1000.0, 700.0));
  let events = drain(&mut rx);
  assert!(matches!(events[0], Event::ViewportChanged { .. }));
  let changed: Vec<&AppId> = events
    .iter()
    .filter_map(|e| match e {
      Event::WindowChanged { window } => Some(&window.id),
      _ => None,
    })
    .collect();
  assert_eq!(changed, vec![&id("projects")]);
}

#[test]
fn garbage_viewport_is_sanitized() {
  let d = desktop(1200.0, 800.0);
  d.set_viewport(Size::new(f64::NAN, -20.0));
  assert_eq!(d.viewport(), Size::new(0.0, 0.0));
  assert_eq!(d.form_factor(), FormFactor::Compact);
}

#[test]
fn chrome_buttons_dispatch() {
  let d = desktop(1200.0, 800.0);
  let contact = id("contact");
  open(&d, "contact");
  assert_eq!(d.chrome_buttons().len(), 3);

  assert!(d.press(&contact, ChromeButton::Maximize));
  assert!(d.is_maximized(&contact));
  assert!(d.press(&contact, ChromeButton::Minimize));
  assert!(d.is_minimized(&contact));
  assert!(d.press(&contact, ChromeButton::Close));
  assert!(!d.is_open(&contact));
}

// === Compact form factor ===

#[test]
fn compact_windows_are_always_maximized() {
  let d = desktop(400.0, 700.0);
  assert_eq!(d.form_factor(), FormFactor::Compact);
  assert!(!d.chrome_buttons().contains(&ChromeButton::Maximize));

  open(&d, "about");
  let about = d.window(&id("about")).unwrap();
  assert!(about.maximized);
  assert_eq!(about.bounds, Bounds::new(0.0, 0.0, 400.0, 690.0));
  assert!(d.toggle_maximize(&id("about")).is_none());
  assert!(!d.begin_drag(&id("about"), Point::new(10.0, 10.0)));
}

#[test]
fn entering_compact_maximizes_everything() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  open(&d, "resume");
  let restore = d.window(&id("about")).unwrap().restore_bounds;

  d.set_viewport(Size::new(500.0, 800.0));
  assert!(d.windows().iter().all(|w| w.maximized));

  d.set_viewport(Size::new(1200.0, 800.0));
  assert!(d.is_maximized(&id("about")));
  d.toggle_maximize(&id("about"));
  assert_eq!(d.window(&id("about")).unwrap().bounds, restore);
}

// === Pointer ===

#[test]
fn drag_then_resize_below_minimum() {
  let d = desktop(1200.0, 800.0);
  let about = id("about");
  open(&d, "about");
  let start = d.window(&about).unwrap().bounds;

  let grab = Point::new(start.x + 20.0, start.y + 10.0);
  assert!(d.begin_drag(&about, grab));
  assert!(d.drag_to(&about, Point::new(300.0, 300.0)));
  assert!(d.end_drag(&about, Point::new(70.0, 60.0)));
  assert_eq!(d.window(&about).unwrap().bounds.origin(), Point::new(50.0, 50.0));
  assert!(!d.drag_to(&about, Point::new(0.0, 0.0)), "session ended");

  d.resize_to_size(&about, Size::new(100.0, 100.0));
  assert_eq!(
    d.window(&about).unwrap().bounds,
    Bounds::new(50.0, 50.0, 350.0, 300.0)
  );
}

#[test]
fn resize_session_from_top_left_anchors_far_corner() {
  let d = desktop(1200.0, 800.0);
  let blog = id("blog");
  open(&d, "blog");
  d.move_to(&blog, Point::new(100.0, 100.0));
  let start = d.window(&blog).unwrap().bounds;

  assert!(d.begin_resize(&blog, ResizeEdge::TopLeft, Point::new(100.0, 100.0)));
  assert!(d.end_resize(&blog, Point::new(5000.0, 5000.0)));
  let b = d.window(&blog).unwrap().bounds;
  assert_eq!(b.size(), Size::new(350.0, 300.0));
  assert_eq!(b.x + b.w, start.x + start.w);
  assert_eq!(b.y + b.h, start.y + start.h);
}

#[test]
fn non_finite_pointer_leaves_geometry_alone() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  let about = id("about");
  let before = d.window(&about).unwrap().bounds;

  assert!(!d.begin_drag(&about, Point::new(f64::NAN, 10.0)));
  assert!(d.begin_drag(&about, before.origin()));
  assert!(!d.drag_to(&about, Point::new(f64::INFINITY, 0.0)));
  assert!(!d.end_drag(&about, Point::new(0.0, f64::NAN)));
  assert!(!d.move_to(&about, Point::new(f64::NEG_INFINITY, 5.0)));
  assert_eq!(d.window(&about).unwrap().bounds, before);

  assert!(d.end_drag(&about, Point::new(before.x + 5.0, before.y)));
  let after = d.window(&about).unwrap().bounds;
  assert_eq!(after.x, before.x + 5.0);
  assert!(after.y.is_finite());

  d.toggle_maximize(&about);
  d.toggle_maximize(&about);
  assert_eq!(d.window(&about).unwrap().bounds, after);
}

#[test]
fn maximize_cancels_drag_and_refuses_new_sessions() {
  let d = desktop(1200.0, 800.0);
  let about = id("about");
  open(&d, "about");
  assert!(d.begin_drag(&about, Point::new(200.0, 110.0)));
  d.toggle_maximize(&about);
  assert!(!d.drag_to(&about, Point::new(0.0, 0.0)));
  assert!(!d.begin_resize(&about, ResizeEdge::Right, Point::new(0.0, 0.0)));
  assert!(!d.move_to(&about, Point::new(0.0, 0.0)));
}

#[test]
fn begin_drag_brings_window_to_front() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  open(&d, "resume");
  let about = d.window(&id("about")).unwrap().bounds;
  d.begin_drag(&id("about"), about.origin());
  assert_eq!(d.frontmost(), Some(id("about")));
}

#[test]
fn click_hits_topmost_visible_window() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  open(&d, "resume");
  d.move_to(&id("about"), Point::new(0.0, 0.0));
  d.move_to(&id("resume"), Point::new(400.0, 0.0));

  // Overlap region: resume is on top.
  assert_eq!(d.click_at(Point::new(500.0, 100.0)), Some(id("resume")));
  // About only.
  assert_eq!(d.click_at(Point::new(100.0, 100.0)), Some(id("about")));
  assert_eq!(d.frontmost(), Some(id("about")));

  d.minimize(&id("about"));
  assert_eq!(d.window_at(Point::new(100.0, 100.0)), None);
  assert_eq!(d.click_at(Point::new(5000.0, 5000.0)), None);
}

// === Scenarios ===

#[test]
fn minimize_blog_then_close_about() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  open(&d, "blog");
  d.minimize(&id("blog"));
  d.close(&id("about"));

  let windows = d.windows();
  assert_eq!(windows.len(), 1);
  assert_eq!(windows[0].id, id("blog"));
  assert!(windows[0].minimized);
  assert!(d.render_order().is_empty());
  assert_eq!(d.frontmost(), None);
}

#[test]
fn event_sequence_for_open_focus_close() {
  let d = desktop(1200.0, 800.0);
  let mut rx = d.subscribe();
  open(&d, "about");
  d.focus(&id("about"));
  d.close(&id("about"));

  let names: Vec<&str> = drain(&mut rx)
    .iter()
    .map(|e| match e {
      Event::WindowOpened { .. } => "opened",
      Event::FocusWindow { .. } => "focus",
      Event::WindowClosed { .. } => "closed",
      _ => "other",
    })
    .collect();
  assert_eq!(names, vec!["opened", "focus", "closed"]);
}

// === Content ===

struct Tracked {
  unmounted: Arc<AtomicUsize>,
}

impl Content for Tracked {
  fn on_unmount(&mut self) {
    self.unmounted.fetch_add(1, Ordering::SeqCst);
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

#[test]
fn factory_runs_once_across_minimize_and_restore() {
  let d = desktop(1200.0, 800.0);
  let calls = Arc::new(AtomicUsize::new(0));
  let unmounted = Arc::new(AtomicUsize::new(0));

  let (c, u) = (Arc::clone(&calls), Arc::clone(&unmounted));
  d.open("resume", "Resume", move |ctx| {
    c.fetch_add(1, Ordering::SeqCst);
    ctx.resolver.ready();
    Ok(Box::new(Tracked { unmounted: u }) as Box<dyn Content>)
  });
  let mount = d.window(&id("resume")).unwrap().mount;

  d.minimize(&id("resume"));
  d.restore(&id("resume"));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(unmounted.load(Ordering::SeqCst), 0);
  assert_eq!(d.window(&id("resume")).unwrap().mount, mount);

  d.close(&id("resume"));
  assert_eq!(unmounted.load(Ordering::SeqCst), 1);
}

#[test]
fn content_failure_stays_local() {
  let d = desktop(1200.0, 800.0);
  open(&d, "about");
  assert!(d.open("blog", "Blog", |_ctx| Err(ContentError::new("feed down"))));
  assert!(d.open("projects", "Projects", |_ctx| -> crate::content::ContentResult<Box<dyn Content>> {
    panic!("bad build")
  }));

  assert_eq!(d.content_status(&id("about")), Some(ContentStatus::Ready));
  assert!(matches!(
    d.content_status(&id("blog")),
    Some(ContentStatus::Failed { .. })
  ));
  assert_eq!(
    d.with_surface(&id("projects"), |s| matches!(s, Surface::Failed { .. })),
    Some(true)
  );

  // The failed window is still a normal window.
  assert!(d.begin_drag(&id("blog"), Point::new(200.0, 110.0)));
  assert!(d.end_drag(&id("blog"), Point::new(210.0, 120.0)));
  assert!(d.close(&id("blog")));
}

#[test]
fn late_resolution_after_close_is_discarded() {
  let d = desktop(1200.0, 800.0);
  let saved: Arc<Mutex<Option<ContentResolver>>> = Arc::default();
  let slot = Arc::clone(&saved);
  d.open("blog", "Blog", move |ctx| {
    *slot.lock().unwrap() = Some(ctx.resolver);
    Ok(Box::new(StaticContent::new("Blog")) as Box<dyn Content>)
  });
  assert_eq!(d.content_status(&id("blog")), Some(ContentStatus::Pending));
  assert_eq!(
    d.with_surface(&id("blog"), |s| matches!(s, Surface::Loading)),
    Some(true)
  );

  let resolver = saved.lock().unwrap().take().unwrap();
  d.close(&id("blog"));
  assert!(!resolver.ready());

  // A new Blog window is not affected by the old resolver.
  open(&d, "blog");
  assert!(!resolver.fail("stale"));
  assert_eq!(d.content_status(&id("blog")), Some(ContentStatus::Ready));
}

#[test]
fn resolution_after_open_emits_content_changed() {
  let d = desktop(1200.0, 800.0);
  let saved: Arc<Mutex<Option<ContentResolver>>> = Arc::default();
  let slot = Arc::clone(&saved);
  d.open("contact", "Contact me", move |ctx| {
    *slot.lock().unwrap() = Some(ctx.resolver);
    Ok(Box::new(StaticContent::new("Contact")) as Box<dyn Content>)
  });

  let mut rx = d.subscribe();
  let resolver = saved.lock().unwrap().take().unwrap();
  assert!(resolver.ready());
  let events = drain(&mut rx);
  assert!(matches!(
    events.as_slice(),
    [Event::ContentChanged { status: ContentStatus::Ready, .. }]
  ));
}

#[test]
fn content_controls_close_and_minimize_their_own_window() {
  let d = desktop(1200.0, 800.0);
  let saved: Arc<Mutex<Option<crate::content::WindowControls>>> = Arc::default();
  let slot = Arc::clone(&saved);
  d.open("contact", "Contact me", move |ctx| {
    *slot.lock().unwrap() = Some(ctx.controls);
    ctx.resolver.ready();
    Ok(Box::new(StaticContent::new("Contact")) as Box<dyn Content>)
  });
  let controls = saved.lock().unwrap().take().unwrap();

  assert!(controls.minimize());
  assert!(d.is_minimized(&id("contact")));
  assert!(controls.close());
  assert!(!d.is_open(&id("contact")));

  // Stale controls do not touch a reopened window.
  open(&d, "contact");
  assert!(!controls.minimize());
  assert!(!controls.close());
  assert!(d.is_open(&id("contact")));
}

#[test]
fn downcast_content() {
  let d = desktop(1200.0, 800.0);
  open(&d, "links");
  let label = d.with_content(&id("links"), |c: &StaticContent| c.label.clone());
  assert_eq!(label.as_deref(), Some("links"));
  assert_eq!(d.with_content(&id("links"), |_: &Tracked| ()), None);
}

#[test]
fn dropping_desktop_unmounts_content() {
  let unmounted = Arc::new(AtomicUsize::new(0));
  {
    let d = desktop(1200.0, 800.0);
    let u = Arc::clone(&unmounted);
    d.open("about", "About me", move |_ctx| {
      Ok(Box::new(Tracked { unmounted: u }) as Box<dyn Content>)
    });
  }
  assert_eq!(unmounted.load(Ordering::SeqCst), 1);
}

// === Properties ===

const APPS: [&str; 6] = ["about", "resume", "projects", "blog", "links", "contact"];

#[derive(Debug, Clone)]
enum Op {
  Open(usize),
  Close(usize),
  Minimize(usize),
  Restore(usize),
  Focus(usize),
  Maximize(usize),
  Drag(usize, f64, f64),
  Viewport(f64, f64),
}

fn any_op() -> impl Strategy<Value = Op> {
  let app = 0..APPS.len();
  prop_oneof![
    app.clone().prop_map(Op::Open),
    app.clone().prop_map(Op::Close),
    app.clone().prop_map(Op::Minimize),
    app.clone().prop_map(Op::Restore),
    app.clone().prop_map(Op::Focus),
    app.clone().prop_map(Op::Maximize),
    (app, -500.0..2000.0f64, -500.0..2000.0f64).prop_map(|(a, x, y)| Op::Drag(a, x, y)),
    (0.0..2500.0f64, 0.0..1500.0f64).prop_map(|(w, h)| Op::Viewport(w, h)),
  ]
}

fn apply(d: &Desktop, op: &Op) {
  match *op {
    Op::Open(a) => {
      open(d, APPS[a]);
    }
    Op::Close(a) => {
      d.close(&id(APPS[a]));
    }
    Op::Minimize(a) => {
      d.minimize(&id(APPS[a]));
    }
    Op::Restore(a) => {
      d.restore(&id(APPS[a]));
    }
    Op::Focus(a) => {
      d.focus(&id(APPS[a]));
    }
    Op::Maximize(a) => {
      d.toggle_maximize(&id(APPS[a]));
    }
    Op::Drag(a, x, y) => {
      let app = id(APPS[a]);
      if let Ok(w) = d.window(&app) {
        d.begin_drag(&app, w.bounds.origin());
        d.end_drag(&app, Point::new(x, y));
      }
    }
    Op::Viewport(w, h) => d.set_viewport(Size::new(w, h)),
  }
}

proptest! {
  #[test]
  fn ids_and_z_orders_stay_unique(ops in prop::collection::vec(any_op(), 0..60)) {
    let d = desktop(1200.0, 800.0);
    for op in &ops {
      apply(&d, op);
      let windows = d.windows();
      let ids: HashSet<&AppId> = windows.iter().map(|w| &w.id).collect();
      prop_assert_eq!(ids.len(), windows.len());
      let zs: HashSet<u64> = windows.iter().map(|w| w.z_order.0).collect();
      prop_assert_eq!(zs.len(), windows.len());
    }
  }

  #[test]
  fn free_form_windows_respect_minimum(ops in prop::collection::vec(any_op(), 0..40), w in -100.0..2000.0f64, h in -100.0..2000.0f64) {
    let d = desktop(1200.0, 800.0);
    for op in &ops {
      apply(&d, op);
    }
    for window in d.windows() {
      d.resize_to_size(&window.id, Size::new(w, h));
    }
    for window in d.windows() {
      prop_assert!(window.restore_bounds.w >= 350.0);
      prop_assert!(window.restore_bounds.h >= 300.0);
    }
  }

  #[test]
  fn focus_tokens_strictly_increase(picks in prop::collection::vec(0..APPS.len(), 1..40)) {
    let d = desktop(1200.0, 800.0);
    for app in APPS {
      open(&d, app);
    }
    let mut last = d.window(&id("contact")).unwrap().z_order;
    for pick in picks {
      let z = d.focus(&id(APPS[pick])).unwrap();
      prop_assert!(z > last);
      prop_assert_eq!(d.frontmost(), Some(id(APPS[pick])));
      last = z;
    }
  }

  #[test]
  fn maximize_round_trip_any_viewport(vw in 0.0..3000.0f64, vh in 0.0..2000.0f64) {
    let d = desktop(1200.0, 800.0);
    open(&d, "projects");
    let before = d.window(&id("projects")).unwrap().bounds;
    d.toggle_maximize(&id("projects"));
    d.set_viewport(Size::new(vw.max(650.0), vh));
    d.toggle_maximize(&id("projects"));
    prop_assert_eq!(d.window(&id("projects")).unwrap().bounds, before);
  }
}
