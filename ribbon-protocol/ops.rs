use serde::Deserialize;

use crate::line::{
  Line,
  LineDoc,
};

/// One decoded update instruction.
///
/// `n` is the number of new-buffer lines the operation accounts for (zero
/// for `Skip`, which only consumes previous lines). `ln` is an absolute
/// index into the *previous* buffer; the core tracks positions on its side,
/// so it is not relative to however far the walk has read.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
  /// Carry `n` lines over from the previous buffer, starting at `ln`.
  Copy { n: usize, ln: usize },
  /// Metadata refresh of `n` previous lines at `ln`. The protocol carries no
  /// separate metadata payload on this operation, so applying it degenerates
  /// to a copy of the referenced records.
  Update { n: usize, ln: usize },
  /// Append `n` wholly new lines carried in the operation itself.
  Insert { n: usize, lines: Vec<Line> },
  /// Drop `n` previous lines from the new buffer.
  Skip { n: usize },
  /// Append `n` placeholder lines whose content must be re-fetched on
  /// demand, consuming `n` previous lines.
  Invalidate { n: usize },
}

impl Op {
  /// How many lines this operation appends to the new buffer.
  pub fn appended(&self) -> usize {
    match self {
      Op::Copy { n, .. } | Op::Update { n, .. } | Op::Invalidate { n } => *n,
      Op::Insert { lines, .. } => lines.len(),
      Op::Skip { .. } => 0,
    }
  }
}

/// Wire shape of one operation document.
///
/// The `op` tag selects the kind and, with it, which auxiliary fields are
/// required: `ln` for copy/update, `lines` for ins. An unknown tag or a
/// missing required field fails the operation, and with it the enclosing
/// envelope. Extra keys are ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "op")]
pub(crate) enum OpDoc {
  #[serde(rename = "copy")]
  Copy { n: u64, ln: u64 },
  #[serde(rename = "update")]
  Update { n: u64, ln: u64 },
  #[serde(rename = "ins")]
  Insert { n: u64, lines: Vec<LineDoc> },
  #[serde(rename = "skip")]
  Skip { n: u64 },
  #[serde(rename = "invalidate")]
  Invalidate { n: u64 },
}

impl From<OpDoc> for Op {
  fn from(doc: OpDoc) -> Self {
    match doc {
      OpDoc::Copy { n, ln } => Op::Copy {
        n:  n as usize,
        ln: ln as usize,
      },
      OpDoc::Update { n, ln } => Op::Update {
        n:  n as usize,
        ln: ln as usize,
      },
      OpDoc::Insert { n, lines } => Op::Insert {
        n:     n as usize,
        lines: lines.into_iter().map(Line::from).collect(),
      },
      OpDoc::Skip { n } => Op::Skip { n: n as usize },
      OpDoc::Invalidate { n } => Op::Invalidate { n: n as usize },
    }
  }
}
