use std::sync::Arc;

use arc_swap::ArcSwap;
use ribbon_protocol::{
  Line,
  Op,
  Update,
};
use thiserror::Error;
use tracing::{
  debug,
  warn,
};

/// The full ordered set of visual lines backing the current view.
///
/// Created empty at session start and replaced wholesale by each successful
/// [`apply_update`](LineCache::apply_update).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineCache {
  lines:    Vec<Line>,
  pristine: bool,
}

/// The update referenced previous-buffer content that does not exist.
///
/// Either way the only consistent recovery is to keep the previous cache and
/// wait for the core to send a corrective update.
#[derive(Debug, Error)]
pub enum ApplyError {
  #[error("copy of {n} lines at index {ln} out of range of a {len}-line buffer")]
  CopyOutOfRange { ln: usize, n: usize, len: usize },
  #[error("operations consumed {consumed} previous lines but the buffer holds {len}")]
  ReadPastEnd { consumed: usize, len: usize },
}

impl LineCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn line(&self, ix: usize) -> Option<&Line> {
    self.lines.get(ix)
  }

  pub fn lines(&self) -> &[Line] {
    &self.lines
  }

  /// Whether the last applied envelope reported the document as matching
  /// its on-disk state.
  pub fn is_pristine(&self) -> bool {
    self.pristine
  }

  /// Applies a decoded update, producing the successor cache.
  ///
  /// Walks the previous buffer with a read cursor, appending per operation:
  /// copies and updates pull records from the absolute index they name,
  /// inserts carry their own lines, skips drop previous content, and
  /// invalidates append placeholder records to be re-fetched on demand.
  ///
  /// On any inconsistency the partial result is discarded and `self` stays
  /// the current state, so a bad update degrades to a stale view instead of
  /// a corrupted one.
  pub fn apply_update(&self, update: &Update) -> Result<LineCache, ApplyError> {
    let prev_len = self.lines.len();
    let mut new_lines = Vec::new();
    let mut old_ix = 0usize;

    for op in &update.ops {
      match op {
        // Update carries no metadata payload of its own on this protocol
        // version, so the referenced records are taken verbatim.
        Op::Copy { n, ln } | Op::Update { n, ln } => {
          let end = ln
            .checked_add(*n)
            .filter(|&end| end <= prev_len)
            .ok_or(ApplyError::CopyOutOfRange {
              ln:  *ln,
              n:   *n,
              len: prev_len,
            })?;
          new_lines.extend_from_slice(&self.lines[*ln..end]);
          // Tracking hint for the common linear walk; non-linear copies
          // (line reordering) leave the cursor where it was.
          if *ln == old_ix {
            old_ix = end;
          }
        },
        Op::Insert { lines, .. } => new_lines.extend_from_slice(lines),
        Op::Skip { n } => old_ix = consume(old_ix, *n, prev_len)?,
        Op::Invalidate { n } => {
          // Bounding the cursor first also bounds the placeholder count.
          old_ix = consume(old_ix, *n, prev_len)?;
          new_lines.resize_with(new_lines.len() + n, Line::default);
        },
      }
    }

    debug!(
      lines = new_lines.len(),
      pristine = update.pristine,
      "applied update"
    );
    Ok(LineCache {
      lines:    new_lines,
      pristine: update.pristine,
    })
  }
}

/// Advances the read cursor into the previous buffer, keeping it in bounds.
///
/// The cursor never moves backwards, so checking each advance accepts
/// exactly the operation streams the end-of-walk check would, while wire
/// counts large enough to overflow the cursor are caught here too.
fn consume(old_ix: usize, n: usize, prev_len: usize) -> Result<usize, ApplyError> {
  old_ix
    .checked_add(n)
    .filter(|&next| next <= prev_len)
    .ok_or(ApplyError::ReadPastEnd {
      consumed: old_ix.saturating_add(n),
      len:      prev_len,
    })
}

/// Cache handle shared between the message thread and the renderer.
///
/// Readers take an [`Arc`] snapshot; `apply_update` swaps in the successor
/// atomically and only after the whole walk succeeded, so a snapshot is
/// always an entire consistent buffer.
#[derive(Debug)]
pub struct SharedLineCache {
  inner: ArcSwap<LineCache>,
}

impl SharedLineCache {
  pub fn new() -> Self {
    Self {
      inner: ArcSwap::from_pointee(LineCache::new()),
    }
  }

  /// Consistent snapshot for rendering.
  pub fn load(&self) -> Arc<LineCache> {
    self.inner.load_full()
  }

  /// Applies `update` to the current cache and publishes the result.
  ///
  /// A failed apply leaves the published cache untouched; the view goes
  /// stale until the core resends.
  pub fn apply_update(&self, update: &Update) -> Result<(), ApplyError> {
    let prev = self.inner.load();
    match prev.apply_update(update) {
      Ok(next) => {
        self.inner.store(Arc::new(next));
        Ok(())
      },
      Err(err) => {
        warn!(error = %err, "discarding inconsistent update, keeping previous cache");
        Err(err)
      },
    }
  }
}

impl Default for SharedLineCache {
  fn default() -> Self {
    Self::new()
  }
}
