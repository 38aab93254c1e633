/*! Geometry types in device-independent viewport pixels. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rectangle bounds in viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Bounds {
  pub x: f64,
  pub y: f64,
  pub w: f64,
  pub h: f64,
}

impl Bounds {
  pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
    Self { x, y, w, h }
  }

  /// Bounds of the given size placed at `origin`.
  pub const fn from_parts(origin: Point, size: Size) -> Self {
    Self {
      x: origin.x,
      y: origin.y,
      w: size.w,
      h: size.h,
    }
  }

  pub const fn origin(&self) -> Point {
    Point::new(self.x, self.y)
  }

  pub const fn size(&self) -> Size {
    Size::new(self.w, self.h)
  }

  /// Check if a point is contained within these bounds (edges inclusive).
  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.x
      && point.x <= self.x + self.w
      && point.y >= self.y
      && point.y <= self.y + self.h
  }
}

/// Width and height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Size {
  pub w: f64,
  pub h: f64,
}

impl Size {
  pub const fn new(w: f64, h: f64) -> Self {
    Self { w, h }
  }

  /// Replace non-finite or negative components with zero.
  ///
  /// Used for viewport reports, which come straight from the host.
  pub fn sanitized(self) -> Self {
    let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    Self::new(fix(self.w), fix(self.h))
  }

  /// Raise each component to at least `min`. Non-finite components become `min`.
  pub fn at_least(self, min: Size) -> Self {
    let fix = |v: f64, m: f64| if v.is_finite() { v.max(m) } else { m };
    Self::new(fix(self.w, min.w), fix(self.h, min.h))
  }
}

/// A 2D point in viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }

  pub fn is_finite(&self) -> bool {
    self.x.is_finite() && self.y.is_finite()
  }

  /// Offset from `other` to `self`.
  pub fn delta_from(&self, other: Point) -> Point {
    Point::new(self.x - other.x, self.y - other.y)
  }
}
