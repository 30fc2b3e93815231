use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strata_process::{ActorTag, ClosedDefinitionSet};
use tracing::{error, info};

use crate::error::ExecutionError;
use crate::trace::{TraceEntry, TraceEvent};

/// Token and workflow data.
pub type DataMap = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
  Ready,
  Running,
  WaitingOnSubprocess,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
  Running,
  Completed,
  Failed,
}

/// A token positioned at one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskInstance {
  pub token_id: u64,
  pub task_id: String,
  /// Flow the token arrived on. `None` for the start token and join merges.
  pub arrived_via: Option<String>,
  /// Visible only to this task's handler and guards, then handed to its
  /// successors.
  pub local_data: DataMap,
  pub state: TaskState,
}

/// The mutable record of one running process.
#[derive(Debug, Clone)]
pub struct WorkflowInstance {
  pub(crate) instance_id: String,
  pub(crate) process_id: String,
  pub(crate) closed_set: Arc<ClosedDefinitionSet>,
  pub(crate) tokens: VecDeque<TaskInstance>,
  pub(crate) history: Vec<TaskInstance>,
  pub(crate) abandoned: Vec<TaskInstance>,
  pub(crate) children: Vec<WorkflowInstance>,
  /// Final local data of tokens that reached an end event, in arrival order.
  pub(crate) terminal: Vec<DataMap>,
  pub(crate) global_data: Option<DataMap>,
  pub(crate) status: InstanceStatus,
  pub(crate) failure_reason: Option<ExecutionError>,
  pub(crate) steps_taken: usize,
  pub(crate) trace: Vec<TraceEntry>,
  next_token: u64,
}

impl WorkflowInstance {
  /// A running instance with one token on the start event of `process_id`.
  /// The caller guarantees the process is in the closed set.
  pub(crate) fn new(
    closed_set: Arc<ClosedDefinitionSet>,
    process_id: &str,
    start_task: &str,
    initial_data: DataMap,
  ) -> Self {
    let mut instance = Self {
      instance_id: uuid::Uuid::new_v4().to_string(),
      process_id: process_id.to_string(),
      closed_set,
      tokens: VecDeque::new(),
      history: Vec::new(),
      abandoned: Vec::new(),
      children: Vec::new(),
      terminal: Vec::new(),
      global_data: None,
      status: InstanceStatus::Running,
      failure_reason: None,
      steps_taken: 0,
      trace: Vec::new(),
      next_token: 0,
    };
    instance.spawn(start_task, None, initial_data);
    instance
  }

  pub fn instance_id(&self) -> &str {
    &self.instance_id
  }

  /// Process this instance runs. For a child instance, the call activity
  /// target.
  pub fn root_process_id(&self) -> &str {
    &self.process_id
  }

  pub fn closed_set(&self) -> &Arc<ClosedDefinitionSet> {
    &self.closed_set
  }

  pub fn status(&self) -> InstanceStatus {
    self.status
  }

  pub fn is_terminal(&self) -> bool {
    self.status != InstanceStatus::Running
  }

  /// Workflow-global data, assembled once at completion.
  pub fn global_data(&self) -> Option<&DataMap> {
    match self.status {
      InstanceStatus::Completed => self.global_data.as_ref(),
      _ => None,
    }
  }

  pub fn failure_reason(&self) -> Option<&ExecutionError> {
    match self.status {
      InstanceStatus::Failed => self.failure_reason.as_ref(),
      _ => None,
    }
  }

  /// Active tokens in the order they will be considered.
  pub fn tokens(&self) -> impl Iterator<Item = &TaskInstance> {
    self.tokens.iter()
  }

  /// Task ids of the tokens currently ready, in queue order.
  pub fn ready_tasks(&self) -> Vec<&str> {
    self
      .tokens
      .iter()
      .filter(|t| t.state == TaskState::Ready)
      .map(|t| t.task_id.as_str())
      .collect()
  }

  /// Tokens that have been processed, in processing order.
  pub fn completed_tokens(&self) -> &[TaskInstance] {
    &self.history
  }

  /// Tokens left behind when the instance failed.
  pub fn abandoned_tokens(&self) -> &[TaskInstance] {
    &self.abandoned
  }

  /// Child instances created by call activities, in creation order.
  pub fn children(&self) -> &[WorkflowInstance] {
    &self.children
  }

  /// Audit trail, including the entries of every child instance.
  pub fn trace(&self) -> &[TraceEntry] {
    &self.trace
  }

  pub fn steps_taken(&self) -> usize {
    self.steps_taken
  }

  pub(crate) fn spawn(&mut self, task_id: &str, arrived_via: Option<String>, local_data: DataMap) {
    let token_id = self.next_token_id();
    self.tokens.push_back(TaskInstance {
      token_id,
      task_id: task_id.to_string(),
      arrived_via,
      local_data,
      state: TaskState::Ready,
    });
  }

  pub(crate) fn next_token_id(&mut self) -> u64 {
    self.next_token += 1;
    self.next_token
  }

  pub(crate) fn record(&mut self, task_id: &str, actor: Option<ActorTag>, event: TraceEvent) {
    self.trace.push(TraceEntry {
      sequence: self.trace.len(),
      process_id: self.process_id.clone(),
      instance_id: self.instance_id.clone(),
      task_id: task_id.to_string(),
      actor,
      event,
    });
  }

  /// Append a finished child's trail to this one.
  pub(crate) fn absorb_trace(&mut self, entries: &[TraceEntry]) {
    for entry in entries {
      let mut entry = entry.clone();
      entry.sequence = self.trace.len();
      self.trace.push(entry);
    }
  }

  /// Assemble global data from every terminal token and finish.
  pub(crate) fn complete(&mut self) {
    let mut global = DataMap::new();
    for data in &self.terminal {
      for (key, value) in data {
        global.insert(key.clone(), value.clone());
      }
    }
    self.global_data = Some(global);
    self.status = InstanceStatus::Completed;

    info!(
      instance_id = %self.instance_id,
      process_id = %self.process_id,
      steps = self.steps_taken,
      "workflow_completed"
    );
  }

  /// Record a failure and abandon every remaining token.
  pub(crate) fn fail(&mut self, reason: ExecutionError) {
    self.abandoned.extend(self.tokens.drain(..));
    self.status = InstanceStatus::Failed;

    error!(
      instance_id = %self.instance_id,
      process_id = %self.process_id,
      error = %reason,
      "workflow_failed"
    );
    self.failure_reason = Some(reason);
  }
}
