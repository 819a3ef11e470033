use serde::Deserialize;

use crate::style::{
  StyleSpan,
  decode_style_runs,
};

/// One visual line of the view.
///
/// A line carrying a `line_num` starts a new logical line; a line without
/// one continues (soft-wraps) the previous logical line. Cursor offsets are
/// UTF-16 code units into `text`, like style span offsets.
///
/// The `Default` value is the placeholder the updater appends for
/// invalidated ranges: empty text, no cursors, no styles, no number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
  pub text:     String,
  pub cursor:   Vec<usize>,
  pub styles:   Vec<StyleSpan>,
  pub line_num: Option<u64>,
}

/// Wire shape of one line document inside an `ins` operation.
///
/// `text` is the minimum viable content and therefore mandatory; everything
/// else defaults. Styles arrive as the flat run encoding and are decoded
/// against `text` on conversion.
#[derive(Debug, Deserialize)]
pub(crate) struct LineDoc {
  text:   String,
  #[serde(default)]
  cursor: Vec<usize>,
  ln:     Option<u64>,
  #[serde(default)]
  styles: Vec<i64>,
}

impl From<LineDoc> for Line {
  fn from(doc: LineDoc) -> Self {
    let styles = decode_style_runs(&doc.styles, &doc.text);
    Line {
      text: doc.text,
      cursor: doc.cursor,
      styles,
      line_num: doc.ln,
    }
  }
}
