use serde::Serialize;
use strata_process::ActorTag;

/// One audit record. `actor` is attribution only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
  pub sequence: usize,
  pub process_id: String,
  pub instance_id: String,
  pub task_id: String,
  pub actor: Option<ActorTag>,
  pub event: TraceEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
  /// A start event, atomic task or call activity finished.
  Completed,
  /// A gateway activated these flows.
  Branched { flows: Vec<String> },
  /// A join merged tokens that arrived on these flows.
  Joined { flows: Vec<String> },
  /// A token reached an end event.
  Ended,
  SubprocessStarted { target_process_id: String },
  Failed { reason: String },
}
