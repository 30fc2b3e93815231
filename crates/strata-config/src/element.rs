use serde::{Deserialize, Serialize};

use crate::enums::GatewayKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDef {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(flatten)]
  pub element_type: ElementType,
  /// Explicit join marker. Multiple incoming flows alone never make a join.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub join: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementType {
  Start,
  End,
  /// Atomic unit of work delegated to the handler registered for `actor`.
  Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actor: Option<String>,
    /// Handler reference, defaults to the element id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handler: Option<String>,
  },
  /// Reference to another process, resolved before execution.
  CallActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actor: Option<String>,
    called_element: String,
  },
  Gateway {
    gateway: GatewayKind,
  },
}
