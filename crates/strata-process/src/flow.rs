use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceFlow {
  pub flow_id: String,
  pub source: String,
  pub target: String,
  /// `None` on a gateway flow marks the default branch.
  pub guard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageFlow {
  pub flow_id: String,
  pub source_pool: String,
  pub target_pool: String,
  pub label: Option<String>,
}
