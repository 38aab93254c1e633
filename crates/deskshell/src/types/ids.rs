/*! Identifier types. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Stable key of a logical application, e.g. `"about"`.
///
/// Distinct from the window title shown to the user.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into, TS,
)]
#[ts(export)]
pub struct AppId(pub String);

impl AppId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for AppId {
  fn from(id: &str) -> Self {
    Self(id.to_owned())
  }
}

/// Stacking token. Higher renders on top.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into, TS,
)]
#[ts(export)]
pub struct ZOrder(#[ts(type = "number")] pub u64);

/// Identity of one content mount. Every open mints a new one.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into, TS,
)]
#[ts(export)]
pub struct MountId(#[ts(type = "number")] pub u64);
