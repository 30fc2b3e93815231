use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
  /// First guard that evaluates true wins.
  Exclusive,
  /// Every guard that evaluates true is taken.
  Inclusive,
  /// Every outgoing flow is taken without evaluation.
  Parallel,
}
