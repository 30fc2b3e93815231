use strata_process::ActorTag;
use thiserror::Error;

/// Run-time failure recorded on a failed workflow instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
  /// A gateway guard references a variable missing from the token's data.
  #[error("gateway '{task_id}': guard on flow '{flow_id}' references undefined variable '{variable}'")]
  Evaluation {
    task_id: String,
    flow_id: String,
    variable: String,
  },

  /// A gateway guard failed to evaluate for any other reason.
  #[error("gateway '{task_id}': guard on flow '{flow_id}' failed: {message}")]
  Condition {
    task_id: String,
    flow_id: String,
    message: String,
  },

  /// No guard matched and the gateway has no default flow.
  #[error("gateway '{task_id}': no applicable branch")]
  NoApplicableBranch { task_id: String },

  /// The actor's handler failed or no handler is registered for it.
  #[error("task '{task_id}' ({actor}) failed: {message}")]
  Handler {
    task_id: String,
    actor: ActorTag,
    message: String,
  },

  #[error("step budget of {max_steps} exceeded")]
  StepBudgetExceeded { max_steps: usize },

  /// The child instance of a call activity failed.
  #[error("call activity '{task_id}' failed in process '{process_id}': {source}")]
  Subprocess {
    task_id: String,
    process_id: String,
    #[source]
    source: Box<ExecutionError>,
  },

  /// The instance references something its closed set does not contain.
  #[error("invalid instance state: {message}")]
  InvalidState { message: String },
}

impl ExecutionError {
  /// The innermost failure, following call activity nesting.
  pub fn root_cause(&self) -> &ExecutionError {
    match self {
      ExecutionError::Subprocess { source, .. } => source.root_cause(),
      other => other,
    }
  }
}
