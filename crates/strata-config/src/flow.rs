use serde::{Deserialize, Serialize};

/// A sequence flow between two elements of the same process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDef {
  pub id: String,
  pub from: String,
  pub to: String,
  /// Guard expression. A gateway flow without one is the default branch.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
}

/// A message flow between two pools. Display ordering only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFlowDef {
  pub id: String,
  pub from: String,
  pub to: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}
