use serde::{Deserialize, Serialize};

use crate::element::ElementDef;
use crate::flow::{FlowDef, MessageFlowDef};

fn default_executable() -> bool {
  true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDef {
  pub process_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Abstract diagrams (capability maps, participant pools) set this to false.
  #[serde(default = "default_executable")]
  pub executable: bool,
  #[serde(default)]
  pub pools: Vec<String>,
  pub elements: Vec<ElementDef>,
  #[serde(default)]
  pub flows: Vec<FlowDef>,
  #[serde(default)]
  pub message_flows: Vec<MessageFlowDef>,
}

impl ProcessDef {
  /// Parse a JSON process document.
  pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(source)
  }
}
