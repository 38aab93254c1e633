/*!
Drag and resize sessions on Desktop.

A session starts with `begin_*`, follows the pointer with `*_to`, and commits
with `end_*`. Sessions are refused while a window is maximized or minimized,
and are cancelled if it becomes either.
*/

use super::input::ResizeEdge;
use super::Desktop;
use crate::types::{AppId, Point, Size};

impl Desktop {
  /// Grab the title bar at `pointer`. Brings the window to the front.
  pub fn begin_drag(&self, id: &AppId, pointer: Point) -> bool {
    self.write(|r| r.begin_drag(id, pointer))
  }

  /// Follow the pointer during a drag.
  pub fn drag_to(&self, id: &AppId, pointer: Point) -> bool {
    self.write(|r| r.drag_to(id, pointer))
  }

  /// Drop the window at `pointer`.
  pub fn end_drag(&self, id: &AppId, pointer: Point) -> bool {
    self.write(|r| r.end_drag(id, pointer))
  }

  /// Grab `edge` at `pointer`. Brings the window to the front.
  pub fn begin_resize(&self, id: &AppId, edge: ResizeEdge, pointer: Point) -> bool {
    self.write(|r| r.begin_resize(id, edge, pointer))
  }

  /// Follow the pointer during a resize.
  pub fn resize_to(&self, id: &AppId, pointer: Point) -> bool {
    self.write(|r| r.resize_to(id, pointer))
  }

  /// Finish a resize at `pointer`.
  pub fn end_resize(&self, id: &AppId, pointer: Point) -> bool {
    self.write(|r| r.end_resize(id, pointer))
  }

  /// Move a window's top-left corner, as a completed drag would.
  pub fn move_to(&self, id: &AppId, origin: Point) -> bool {
    self.write(|r| r.move_to(id, origin))
  }

  /// Set a window's size, as a completed resize would. Clamped to the minimum.
  pub fn resize_to_size(&self, id: &AppId, size: Size) -> bool {
    self.write(|r| r.resize_to_size(id, size))
  }
}
