//! View-side state for the line synchronization protocol: the line cache the
//! renderer draws from, the updater that applies decoded envelopes to it,
//! and the scrollbar marker overlay.
//!
//! Updates are applied build-then-swap: the renderer only ever observes a
//! fully old or fully new cache, never a partially applied one.

mod cache;
mod markers;

pub use cache::{
  ApplyError,
  LineCache,
  SharedLineCache,
};
pub use markers::{
  Color,
  LineCount,
  Marker,
  MarkerOverlay,
  MarkerRect,
  TrackGeometry,
};
