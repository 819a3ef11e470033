use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::SharedLineCache;

/// Opaque marker color, 8-bit RGBA. The renderer maps it to whatever its
/// drawing layer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

/// A colored mark tied to a logical line of the current view, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
  pub line:  usize,
  pub color: Color,
}

/// Geometry of the scrollbar track the markers project onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
  pub width:      f64,
  pub height:     f64,
  pub knob_width: f64,
}

/// One projected marker rectangle, in track coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerRect {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
  pub color:  Color,
}

const MARKER_HEIGHT: f64 = 1.0;

/// Line-count capability the overlay reads at layout time.
///
/// An explicit injected dependency instead of a back-reference into the view
/// resolved mid-draw.
pub trait LineCount: Send + Sync {
  fn line_count(&self) -> usize;
}

impl LineCount for SharedLineCache {
  fn line_count(&self) -> usize {
    self.load().len()
  }
}

/// Projects line markers onto the scrollbar track.
///
/// Markers are replaced wholesale by [`set_markers`](Self::set_markers) and
/// have no lifecycle beyond that. Replacement is atomic with respect to
/// concurrent [`layout`](Self::layout) calls.
pub struct MarkerOverlay {
  source:  Arc<dyn LineCount>,
  markers: RwLock<Vec<Marker>>,
}

impl MarkerOverlay {
  pub fn new(source: Arc<dyn LineCount>) -> Self {
    Self {
      source,
      markers: RwLock::new(Vec::new()),
    }
  }

  /// Replaces the whole marker set.
  pub fn set_markers(&self, markers: Vec<Marker>) {
    *self.markers.write() = markers;
  }

  /// Computes marker rectangles for the current view.
  ///
  /// Each marker lands at `(line - 0.5) / total * track.height`, pinned to
  /// the knob's strip at the right edge of the track. An empty view yields
  /// an empty layout. Markers past the end of the view are left out of the
  /// layout but kept in state; the core may grow the view back under them.
  pub fn layout(&self, track: TrackGeometry) -> Vec<MarkerRect> {
    let total = self.source.line_count();
    if total == 0 {
      return Vec::new();
    }

    let x = track.width - track.knob_width;
    self
      .markers
      .read()
      .iter()
      .filter(|marker| (1..=total).contains(&marker.line))
      .map(|marker| MarkerRect {
        x,
        y: (marker.line as f64 - 0.5) / total as f64 * track.height,
        width: track.knob_width,
        height: MARKER_HEIGHT,
        color: marker.color,
      })
      .collect()
  }
}
