use serde::Serialize;
use strata_config::GatewayKind;

use crate::actor::ActorTag;

/// An outgoing branch of a gateway, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guard {
  pub flow_id: String,
  /// `None` is the default branch.
  pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
  Start,
  End,
  Atomic {
    actor: ActorTag,
    handler_ref: String,
  },
  CallActivity {
    actor: ActorTag,
    target_process_id: String,
  },
  Gateway {
    kind: GatewayKind,
    outgoing_guards: Vec<Guard>,
  },
}

/// A task within one process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
  pub task_id: String,
  pub name: String,
  #[serde(flatten)]
  pub kind: TaskKind,
  /// Explicit join marker.
  pub join: bool,
}

impl Task {
  /// Owning actor, for atomic tasks and call activities.
  pub fn actor(&self) -> Option<ActorTag> {
    match &self.kind {
      TaskKind::Atomic { actor, .. } | TaskKind::CallActivity { actor, .. } => Some(*actor),
      _ => None,
    }
  }

  pub fn kind_label(&self) -> &'static str {
    match &self.kind {
      TaskKind::Start => "start",
      TaskKind::End => "end",
      TaskKind::Atomic { .. } => "task",
      TaskKind::CallActivity { .. } => "call_activity",
      TaskKind::Gateway { .. } => "gateway",
    }
  }

  pub fn is_end(&self) -> bool {
    matches!(self.kind, TaskKind::End)
  }

  pub fn gateway_kind(&self) -> Option<GatewayKind> {
    match &self.kind {
      TaskKind::Gateway { kind, .. } => Some(*kind),
      _ => None,
    }
  }
}
