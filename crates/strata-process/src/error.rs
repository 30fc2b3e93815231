use strata_condition::ConditionError;
use thiserror::Error;

/// A process source that cannot be loaded into an executable definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
  /// Two elements share an id.
  #[error("process '{process_id}': duplicate task id '{task_id}'")]
  DuplicateTaskId { process_id: String, task_id: String },

  /// Two flows share an id.
  #[error("process '{process_id}': duplicate flow id '{flow_id}'")]
  DuplicateFlowId { process_id: String, flow_id: String },

  /// A flow points at a task that does not exist.
  #[error("process '{process_id}': flow '{flow_id}' references unknown task '{task_id}'")]
  UnknownFlowEndpoint {
    process_id: String,
    flow_id: String,
    task_id: String,
  },

  #[error("process '{process_id}': expected exactly one start event, found {count}")]
  StartEventCount { process_id: String, count: usize },

  #[error("process '{process_id}': no end event")]
  MissingEndEvent { process_id: String },

  /// Wrong number of outgoing flows for the task kind.
  #[error(
    "process '{process_id}': task '{task_id}' must have {expected} outgoing flow(s), found {found}"
  )]
  InvalidOutgoing {
    process_id: String,
    task_id: String,
    expected: &'static str,
    found: usize,
  },

  #[error("process '{process_id}': gateway '{task_id}' has no outgoing flows")]
  GatewayWithoutOutgoing { process_id: String, task_id: String },

  /// A guard on a flow whose source cannot branch on it.
  #[error(
    "process '{process_id}': flow '{flow_id}' has a guard but its source '{task_id}' is not an exclusive or inclusive gateway"
  )]
  GuardOutsideGateway {
    process_id: String,
    flow_id: String,
    task_id: String,
  },

  #[error("process '{process_id}': gateway '{task_id}' has more than one default flow")]
  MultipleDefaultFlows { process_id: String, task_id: String },

  #[error("process '{process_id}': invalid guard on flow '{flow_id}': {source}")]
  InvalidGuard {
    process_id: String,
    flow_id: String,
    #[source]
    source: ConditionError,
  },

  /// A join marker needs at least two incoming flows.
  #[error(
    "process '{process_id}': join '{task_id}' needs at least two incoming flows, found {incoming}"
  )]
  InvalidJoin {
    process_id: String,
    task_id: String,
    incoming: usize,
  },

  #[error("process '{process_id}': task '{task_id}' has unknown actor '{actor}'")]
  UnknownActor {
    process_id: String,
    task_id: String,
    actor: String,
  },
}
