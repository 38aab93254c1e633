/*!
RPC request/response types and dispatch.
*/

#![allow(missing_docs)]

use deskshell::{
  AppId, ChromeButton, Desktop, IconGesture, LaunchOutcome, Launcher, Point, ResizeEdge, Size,
  Snapshot, TaskbarEntry, ZOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use ts_rs::TS;

use crate::remote::RemoteContent;

/// RPC request.
#[derive(Debug, Deserialize, TS)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
#[ts(export)]
pub enum RpcRequest {
  /// Get a snapshot of current state.
  Snapshot,
  /// Open a window hosting front-end content. Defaults the title to the
  /// launcher label.
  Open {
    window_id: AppId,
    #[serde(default)]
    title: Option<String>,
  },
  Close { window_id: AppId },
  Minimize { window_id: AppId },
  Restore { window_id: AppId },
  /// Bring a window to the front (click on its body).
  Focus { window_id: AppId },
  ToggleMaximize { window_id: AppId },
  /// Title-bar button.
  Press {
    window_id: AppId,
    button: ChromeButton,
  },
  /// Click on the desktop; focuses whatever window is under the pointer.
  ClickAt { x: f64, y: f64 },
  BeginDrag { window_id: AppId, x: f64, y: f64 },
  DragTo { window_id: AppId, x: f64, y: f64 },
  EndDrag { window_id: AppId, x: f64, y: f64 },
  BeginResize {
    window_id: AppId,
    edge: ResizeEdge,
    x: f64,
    y: f64,
  },
  ResizeTo { window_id: AppId, x: f64, y: f64 },
  EndResize { window_id: AppId, x: f64, y: f64 },
  SetViewport { w: f64, h: f64 },
  /// Icon gesture, or a taskbar click when `gesture` is omitted.
  Launch {
    window_id: AppId,
    #[serde(default)]
    gesture: Option<IconGesture>,
  },
  /// Taskbar entries with running indicators.
  Taskbar,
  /// The front end finished loading a window's page.
  ContentReady { window_id: AppId },
  /// The front end failed to load a window's page.
  ContentFailed { window_id: AppId, reason: String },
}

/// RPC response.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RpcResponse {
  /// Full state snapshot.
  Snapshot(Box<Snapshot>),
  /// Whether the operation changed anything.
  Changed(bool),
  /// New stacking token, if the window was raised.
  Raised(Option<ZOrder>),
  /// New maximized state, if it changed.
  Maximized(Option<bool>),
  /// Window hit by a click.
  Hit(Option<AppId>),
  Launched(LaunchOutcome),
  Taskbar(Vec<TaskbarEntry>),
  /// No data.
  Null,
}

pub fn dispatch_json(
  desktop: &Desktop,
  launcher: &Launcher,
  method: &str,
  args: &JsonValue,
) -> JsonValue {
  let request_value = json!({ "method": method, "args": args });

  match serde_json::from_value::<RpcRequest>(request_value) {
    Ok(request) => match dispatch(desktop, launcher, request) {
      Ok(response) => json!({ "result": response }),
      Err(e) => {
        log::warn!("[rpc] {method} failed: {e}");
        json!({ "error": e })
      }
    },
    Err(e) => {
      log::warn!("[rpc] Invalid request for {method}: {e}");
      json!({ "error": format!("Invalid request: {}", e) })
    }
  }
}

pub fn dispatch(
  desktop: &Desktop,
  launcher: &Launcher,
  request: RpcRequest,
) -> Result<RpcResponse, String> {
  match request {
    RpcRequest::Snapshot => Ok(RpcResponse::Snapshot(Box::new(desktop.snapshot()))),

    RpcRequest::Open { window_id, title } => {
      let title = title
        .or_else(|| {
          launcher
            .icons()
            .into_iter()
            .find(|i| i.id == window_id)
            .map(|i| i.label)
        })
        .unwrap_or_else(|| window_id.to_string());
      let factory = RemoteContent::factory();
      let opened = desktop.open(window_id, title, move |ctx| factory(ctx));
      Ok(RpcResponse::Changed(opened))
    }

    RpcRequest::Close { window_id } => Ok(RpcResponse::Changed(desktop.close(&window_id))),
    RpcRequest::Minimize { window_id } => Ok(RpcResponse::Changed(desktop.minimize(&window_id))),
    RpcRequest::Restore { window_id } => Ok(RpcResponse::Raised(desktop.restore(&window_id))),
    RpcRequest::Focus { window_id } => Ok(RpcResponse::Raised(desktop.focus(&window_id))),
    RpcRequest::ToggleMaximize { window_id } => Ok(RpcResponse::Maximized(
      desktop.toggle_maximize(&window_id),
    )),
    RpcRequest::Press { window_id, button } => {
      Ok(RpcResponse::Changed(desktop.press(&window_id, button)))
    }
    RpcRequest::ClickAt { x, y } => Ok(RpcResponse::Hit(desktop.click_at(Point::new(x, y)))),

    RpcRequest::BeginDrag { window_id, x, y } => Ok(RpcResponse::Changed(
      desktop.begin_drag(&window_id, Point::new(x, y)),
    )),
    RpcRequest::DragTo { window_id, x, y } => Ok(RpcResponse::Changed(
      desktop.drag_to(&window_id, Point::new(x, y)),
    )),
    RpcRequest::EndDrag { window_id, x, y } => Ok(RpcResponse::Changed(
      desktop.end_drag(&window_id, Point::new(x, y)),
    )),
    RpcRequest::BeginResize {
      window_id,
      edge,
      x,
      y,
    } => Ok(RpcResponse::Changed(desktop.begin_resize(
      &window_id,
      edge,
      Point::new(x, y),
    ))),
    RpcRequest::ResizeTo { window_id, x, y } => Ok(RpcResponse::Changed(
      desktop.resize_to(&window_id, Point::new(x, y)),
    )),
    RpcRequest::EndResize { window_id, x, y } => Ok(RpcResponse::Changed(
      desktop.end_resize(&window_id, Point::new(x, y)),
    )),

    RpcRequest::SetViewport { w, h } => {
      desktop.set_viewport(Size::new(w, h));
      Ok(RpcResponse::Null)
    }

    RpcRequest::Launch { window_id, gesture } => {
      let outcome = match gesture {
        Some(gesture) => launcher.icon_gesture(desktop, &window_id, gesture),
        None => launcher.taskbar_click(desktop, &window_id),
      };
      outcome
        .map(RpcResponse::Launched)
        .map_err(|e| e.to_string())
    }

    RpcRequest::Taskbar => Ok(RpcResponse::Taskbar(launcher.taskbar(desktop))),

    RpcRequest::ContentReady { window_id } => {
      let resolver = RemoteContent::resolver(desktop, &window_id)
        .ok_or_else(|| format!("No front-end content for window: {window_id}"))?;
      Ok(RpcResponse::Changed(resolver.ready()))
    }

    RpcRequest::ContentFailed { window_id, reason } => {
      let resolver = RemoteContent::resolver(desktop, &window_id)
        .ok_or_else(|| format!("No front-end content for window: {window_id}"))?;
      Ok(RpcResponse::Changed(resolver.fail(reason)))
    }
  }
}
