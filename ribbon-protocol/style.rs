use serde::{
  Deserialize,
  Serialize,
};
use tracing::warn;

/// A contiguous run within one line's text sharing a single style.
///
/// Offsets and lengths are in UTF-16 code units, the indexing the core
/// process uses on the wire. Spans within a line are non-overlapping and
/// sorted by `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpan {
  pub start:    usize,
  pub len:      usize,
  pub style_id: isize,
}

/// Decodes the flat `[start_delta, len, style_id, ...]` run encoding against
/// the line's text.
///
/// Integers group in triples; `start_delta` is relative to the end of the
/// previous span (or 0 for the first). Decoding is deliberately permissive:
/// a trailing partial triple, a negative delta or length, or a span running
/// past the end of the text stops decoding and the valid prefix is returned.
/// The surrounding protocol prefers a partially styled line over dropping
/// the whole line.
pub fn decode_style_runs(raw: &[i64], text: &str) -> Vec<StyleSpan> {
  let text_len = text.encode_utf16().count();
  let mut spans = Vec::with_capacity(raw.len() / 3);
  let mut pos = 0usize;

  for triple in raw.chunks_exact(3) {
    let (delta, len, style_id) = (triple[0], triple[1], triple[2]);
    if delta < 0 || len < 0 {
      warn!(delta, len, "negative style run field, dropping tail");
      break;
    }
    let Some(start) = pos.checked_add(delta as usize) else {
      warn!(delta, "style run offset overflow, dropping tail");
      break;
    };
    let Some(end) = start.checked_add(len as usize) else {
      warn!(len, "style run offset overflow, dropping tail");
      break;
    };
    if end > text_len {
      warn!(start, end, text_len, "style run past end of line, dropping tail");
      break;
    }
    spans.push(StyleSpan {
      start,
      len: len as usize,
      style_id: style_id as isize,
    });
    pos = end;
  }

  if raw.len() % 3 != 0 {
    warn!(
      extra = raw.len() % 3,
      "style run array length not a multiple of three, dropping tail"
    );
  }

  spans
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deltas_accumulate_from_previous_end() {
    let spans = decode_style_runs(&[0, 3, 5, 2, 4, 7], "aaaaaaaaa");
    assert_eq!(spans, vec![
      StyleSpan {
        start: 0,
        len: 3,
        style_id: 5
      },
      StyleSpan {
        start: 5,
        len: 4,
        style_id: 7
      },
    ]);
  }

  #[test]
  fn partial_trailing_triple_is_dropped() {
    let spans = decode_style_runs(&[0, 3, 5, 2], "aaaaaaaaa");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0], StyleSpan {
      start: 0,
      len: 3,
      style_id: 5
    });
  }

  #[test]
  fn negative_delta_stops_decoding() {
    let spans = decode_style_runs(&[0, 3, 5, -1, 2, 7], "aaaaaaaaa");
    assert_eq!(spans.len(), 1);
  }

  #[test]
  fn negative_length_stops_decoding() {
    let spans = decode_style_runs(&[0, -3, 5], "aaaaaaaaa");
    assert!(spans.is_empty());
  }

  #[test]
  fn overrun_stops_decoding() {
    let spans = decode_style_runs(&[0, 3, 5, 2, 100, 7], "aaaaaaaaa");
    assert_eq!(spans.len(), 1);
  }

  #[test]
  fn offsets_are_utf16_code_units() {
    // "日本語" is 3 UTF-16 code units but 9 UTF-8 bytes.
    assert_eq!(decode_style_runs(&[0, 3, 1], "日本語").len(), 1);
    assert!(decode_style_runs(&[0, 4, 1], "日本語").is_empty());
  }

  #[test]
  fn huge_offsets_soft_truncate_instead_of_wrapping() {
    // A hostile tail must not overflow past the bounds check; the valid
    // prefix still comes back.
    let spans = decode_style_runs(&[0, 2, 1, i64::MAX, i64::MAX, 1], "ab");
    assert_eq!(spans, vec![StyleSpan {
      start:    0,
      len:      2,
      style_id: 1
    }]);
    assert!(decode_style_runs(&[i64::MAX, i64::MAX, 1], "ab").is_empty());
  }

  #[test]
  fn empty_input_decodes_to_no_spans() {
    assert!(decode_style_runs(&[], "text").is_empty());
  }
}
