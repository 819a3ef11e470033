use serde::Deserialize;
use serde_json::Value;

use crate::envelope::ProtocolError;

/// Descriptor of a plugin advertised by the core process.
///
/// Pass-through value object from the `available_plugins` notification;
/// plugin lifecycle itself is managed outside this core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Plugin {
  pub name:    String,
  pub running: bool,
}

impl Plugin {
  pub fn from_value(value: &Value) -> Result<Plugin, ProtocolError> {
    Plugin::deserialize(value).map_err(ProtocolError::from)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn decodes_name_and_running() {
    let plugin = Plugin::from_value(&json!({ "name": "syntect", "running": true })).unwrap();
    assert_eq!(plugin, Plugin {
      name:    "syntect".to_string(),
      running: true,
    });
  }

  #[test]
  fn missing_running_is_an_error() {
    assert!(Plugin::from_value(&json!({ "name": "syntect" })).is_err());
  }
}
