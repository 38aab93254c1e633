/*!
Pointer and chrome input: drag/resize sessions and title-bar buttons.

The math here is pure; `Registry` decides when a session may start.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::layout::FormFactor;
use crate::types::{Bounds, Point, Size};

/// Edge or corner grabbed to resize a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResizeEdge {
  Top,
  Bottom,
  Left,
  Right,
  TopLeft,
  TopRight,
  BottomLeft,
  BottomRight,
}

impl ResizeEdge {
  const fn moves_left(self) -> bool {
    matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
  }

  const fn moves_right(self) -> bool {
    matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
  }

  const fn moves_top(self) -> bool {
    matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
  }

  const fn moves_bottom(self) -> bool {
    matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
  }
}

/// Title-bar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChromeButton {
  Minimize,
  Maximize,
  Close,
}

impl ChromeButton {
  /// Buttons shown in the title bar, left to right.
  ///
  /// Compact windows are always full-screen, so they have no maximize toggle.
  pub const fn for_form_factor(form_factor: FormFactor) -> &'static [ChromeButton] {
    match form_factor {
      FormFactor::Desktop => &[Self::Minimize, Self::Maximize, Self::Close],
      FormFactor::Compact => &[Self::Minimize, Self::Close],
    }
  }
}

/// An in-progress pointer session on one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Interaction {
  /// `grab` is the pointer offset from the window origin at drag start.
  Drag { grab: Point },
  Resize {
    edge: ResizeEdge,
    start_pointer: Point,
    start: Bounds,
  },
}

/// Window origin for a drag, keeping the grab offset under the pointer.
pub(crate) fn drag_origin(grab: Point, pointer: Point) -> Point {
  pointer.delta_from(grab)
}

/// Bounds after moving `edge` by the pointer delta.
///
/// Width and height never drop below `min`. When a left or top edge hits the
/// minimum, the opposite edge stays where it was.
pub(crate) fn resize_bounds(
  edge: ResizeEdge,
  start: Bounds,
  start_pointer: Point,
  pointer: Point,
  min: Size,
) -> Bounds {
  let d = pointer.delta_from(start_pointer);

  let mut w = start.w;
  if edge.moves_right() {
    w += d.x;
  } else if edge.moves_left() {
    w -= d.x;
  }
  let mut h = start.h;
  if edge.moves_bottom() {
    h += d.y;
  } else if edge.moves_top() {
    h -= d.y;
  }

  let size = Size::new(w, h).at_least(min);
  let x = if edge.moves_left() {
    start.x + start.w - size.w
  } else {
    start.x
  };
  let y = if edge.moves_top() {
    start.y + start.h - size.h
  } else {
    start.y
  };
  Bounds::new(x, y, size.w, size.h)
}
