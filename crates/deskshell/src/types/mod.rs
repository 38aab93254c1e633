/*! Core types for deskshell.

Regenerate TypeScript types: `cargo test -p deskshell export_bindings`
*/

#![allow(missing_docs)]

mod error;
mod event;
mod geometry;
mod ids;
mod window;

pub use error::{DeskError, DeskResult};
pub use event::{Event, Snapshot};
pub use geometry::{Bounds, Point, Size};
pub use ids::{AppId, MountId, ZOrder};
pub use window::Window;
