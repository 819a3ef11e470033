use serde::Deserialize;
use serde_json::{
  Map,
  Value,
};
use thiserror::Error;
use tracing::warn;

use crate::ops::{
  Op,
  OpDoc,
};

/// Failure to decode a protocol document into its typed form.
#[derive(Debug, Error)]
pub enum ProtocolError {
  #[error("malformed field in protocol message: {0}")]
  MalformedField(#[from] serde_json::Error),
  #[error("ins op declares {declared} lines but carries {carried}")]
  InsertCountMismatch { declared: usize, carried: usize },
}

/// A decoded update envelope: the ordered operation list plus metadata.
///
/// Annotations are opaque to this core and passed through untouched for
/// whoever renders selections, find highlights and the like. `pristine`
/// signals that the document once again matches its on-disk state.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
  pub annotations: Vec<Map<String, Value>>,
  pub ops:         Vec<Op>,
  pub pristine:    bool,
}

#[derive(Debug, Deserialize)]
struct UpdateMsg {
  update: UpdateDoc,
}

#[derive(Debug, Deserialize)]
struct UpdateDoc {
  annotations: Vec<Map<String, Value>>,
  ops:         Vec<OpDoc>,
  #[serde(default)]
  pristine:    bool,
}

impl Update {
  /// Decodes the full `{"update": {...}}` message.
  ///
  /// Decoding is all-or-nothing: one malformed operation or line rejects the
  /// whole envelope, since a partial operation list cannot be applied
  /// without corrupting the line accounting. The sender is the source of
  /// truth and is expected to follow up with a corrective update.
  pub fn from_value(value: &Value) -> Result<Update, ProtocolError> {
    let msg = UpdateMsg::deserialize(value).map_err(|err| {
      warn!(error = %err, "rejecting malformed update envelope");
      ProtocolError::MalformedField(err)
    })?;
    let doc = msg.update;

    let mut ops = Vec::with_capacity(doc.ops.len());
    for op in doc.ops {
      // An ins count disagreeing with its payload would silently break the
      // line accounting downstream, so it falls under the same abort policy
      // as a malformed field.
      if let OpDoc::Insert { n, lines } = &op {
        if *n as usize != lines.len() {
          warn!(
            declared = *n,
            carried = lines.len(),
            "rejecting ins op with mismatched count"
          );
          return Err(ProtocolError::InsertCountMismatch {
            declared: *n as usize,
            carried:  lines.len(),
          });
        }
      }
      ops.push(Op::from(op));
    }

    Ok(Update {
      annotations: doc.annotations,
      ops,
      pristine: doc.pristine,
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn minimal_insert_envelope() {
    let value = json!({
      "update": {
        "ops": [{ "op": "ins", "n": 1, "lines": [{ "text": "hi" }] }],
        "annotations": [],
      }
    });
    let update = Update::from_value(&value).unwrap();

    assert!(!update.pristine);
    assert!(update.annotations.is_empty());
    assert_eq!(update.ops.len(), 1);
    let Op::Insert { n, lines } = &update.ops[0] else {
      panic!("expected insert");
    };
    assert_eq!(*n, 1);
    assert_eq!(lines[0].text, "hi");
    assert!(lines[0].cursor.is_empty());
    assert!(lines[0].styles.is_empty());
    assert_eq!(lines[0].line_num, None);
  }

  #[test]
  fn pristine_flag_propagates() {
    let value = json!({
      "update": { "ops": [], "annotations": [], "pristine": true }
    });
    assert!(Update::from_value(&value).unwrap().pristine);
  }

  #[test]
  fn unknown_op_rejects_the_whole_envelope() {
    let value = json!({
      "update": {
        "ops": [
          { "op": "skip", "n": 1 },
          { "op": "bogus", "n": 1 },
        ],
        "annotations": [],
      }
    });
    assert!(Update::from_value(&value).is_err());
  }

  #[test]
  fn missing_update_key_is_fatal() {
    assert!(Update::from_value(&json!({ "ops": [], "annotations": [] })).is_err());
  }

  #[test]
  fn missing_annotations_is_fatal() {
    assert!(Update::from_value(&json!({ "update": { "ops": [] } })).is_err());
  }

  #[test]
  fn non_object_annotation_is_fatal() {
    let value = json!({
      "update": { "ops": [], "annotations": [1, 2] }
    });
    assert!(Update::from_value(&value).is_err());
  }

  #[test]
  fn annotations_pass_through_untouched() {
    let value = json!({
      "update": {
        "ops": [],
        "annotations": [{ "type": "selection", "ranges": [[0, 0, 0, 4]] }],
      }
    });
    let update = Update::from_value(&value).unwrap();
    assert_eq!(update.annotations.len(), 1);
    assert_eq!(update.annotations[0]["type"], json!("selection"));
  }

  #[test]
  fn ins_count_must_match_its_payload() {
    let value = json!({
      "update": {
        "ops": [{ "op": "ins", "n": 2, "lines": [{ "text": "only one" }] }],
        "annotations": [],
      }
    });
    let err = Update::from_value(&value).unwrap_err();
    assert!(matches!(err, ProtocolError::InsertCountMismatch {
      declared: 2,
      carried:  1,
    }));
  }

  #[test]
  fn malformed_line_rejects_the_whole_envelope() {
    let value = json!({
      "update": {
        "ops": [{ "op": "ins", "n": 1, "lines": [{ "cursor": [0] }] }],
        "annotations": [],
      }
    });
    assert!(Update::from_value(&value).is_err());
  }
}
