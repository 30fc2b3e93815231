use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use strata_condition::{ConditionError, ConditionEvaluator};
use strata_process::{
  ActorTag, ClosedDefinitionSet, GatewayKind, Guard, ProcessDefinition, Task, TaskKind,
};
use strata_resolver::{ResolveError, Resolver};
use tracing::{error, info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::ExecutionError;
use crate::handler::{HandlerRegistry, Invocation};
use crate::instance::{DataMap, InstanceStatus, TaskInstance, TaskState, WorkflowInstance};
use crate::trace::TraceEvent;

/// Result of a single engine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
  /// One token was processed at this task.
  Advanced { task_id: String },
  /// Every ready token is waiting at a join that is not yet satisfied.
  Blocked,
  /// The instance is completed or failed.
  Finished,
}

/// Steps shared by a top-level call and every nested child instance.
#[derive(Debug)]
struct StepBudget {
  limit: usize,
  used: usize,
}

impl StepBudget {
  fn new(limit: usize) -> Self {
    Self { limit, used: 0 }
  }

  /// Take one step. Returns false once the budget is spent.
  fn charge(&mut self) -> bool {
    if self.used >= self.limit {
      return false;
    }
    self.used += 1;
    true
  }
}

/// The workflow engine.
///
/// Owns a resolver, the handler registry and configuration. Instances are
/// driven one token at a time on the caller's task; there is no implicit
/// parallelism.
pub struct Engine<R: Resolver> {
  resolver: R,
  handlers: HandlerRegistry,
  conditions: ConditionEvaluator,
  config: EngineConfig,
}

impl<R: Resolver> Engine<R> {
  pub fn new(resolver: R, handlers: HandlerRegistry) -> Self {
    Self {
      resolver,
      handlers,
      conditions: ConditionEvaluator::new(),
      config: EngineConfig::default(),
    }
  }

  pub fn with_config(mut self, config: EngineConfig) -> Self {
    self.config = config;
    self
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  pub fn handlers(&self) -> &HandlerRegistry {
    &self.handlers
  }

  /// Resolve a root process into a closed definition set.
  pub async fn resolve(&self, root_process_id: &str) -> Result<ClosedDefinitionSet, ResolveError> {
    self.resolver.resolve(root_process_id).await
  }

  /// Resolve, then run to completion or failure within `max_steps`.
  ///
  /// Only build-time errors are returned as `Err`; run-time failures are
  /// recorded on the returned instance.
  #[instrument(name = "workflow_run", skip(self, initial_data))]
  pub async fn run(
    &self,
    root_process_id: &str,
    initial_data: DataMap,
    max_steps: usize,
  ) -> Result<WorkflowInstance, ResolveError> {
    let closed_set = self.resolve(root_process_id).await?;
    let mut instance = self.start(Arc::new(closed_set), initial_data)?;
    self.run_instance(&mut instance, max_steps).await;
    Ok(instance)
  }

  /// Create a running instance of the set's root.
  pub fn start(
    &self,
    closed_set: Arc<ClosedDefinitionSet>,
    initial_data: DataMap,
  ) -> Result<WorkflowInstance, ResolveError> {
    let root = closed_set.root();
    if !root.is_executable() {
      return Err(ResolveError::NonExecutableRoot {
        process_id: root.process_id().to_string(),
      });
    }

    let process_id = root.process_id().to_string();
    let start_task = root.start_task().task_id.clone();
    let instance = WorkflowInstance::new(closed_set, &process_id, &start_task, initial_data);

    info!(
      instance_id = %instance.instance_id,
      process_id = %process_id,
      "workflow_started"
    );
    Ok(instance)
  }

  /// Process a single ready token.
  ///
  /// Call activities run their child instance to completion inside the
  /// step, bounded by the configured step budget.
  #[instrument(
    name = "workflow_step",
    skip_all,
    fields(
      process_id = %instance.process_id,
      instance_id = %instance.instance_id,
    )
  )]
  pub async fn step(&self, instance: &mut WorkflowInstance) -> StepOutcome {
    let mut budget = StepBudget::new(self.config.max_steps);
    self.step_inner(instance, &mut budget).await
  }

  /// Step until the instance is terminal or `max_steps` is spent.
  pub async fn run_instance(&self, instance: &mut WorkflowInstance, max_steps: usize) {
    let mut budget = StepBudget::new(max_steps);
    self.drive(instance, &mut budget).await;
  }

  fn drive<'a>(
    &'a self,
    instance: &'a mut WorkflowInstance,
    budget: &'a mut StepBudget,
  ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
      while self.step_inner(instance, budget).await != StepOutcome::Finished {}
    })
  }

  async fn step_inner(
    &self,
    instance: &mut WorkflowInstance,
    budget: &mut StepBudget,
  ) -> StepOutcome {
    if instance.status != InstanceStatus::Running {
      return StepOutcome::Finished;
    }
    if !budget.charge() {
      warn!(
        instance_id = %instance.instance_id,
        max_steps = budget.limit,
        "step budget exhausted"
      );
      instance.fail(ExecutionError::StepBudgetExceeded {
        max_steps: budget.limit,
      });
      return StepOutcome::Finished;
    }
    instance.steps_taken += 1;

    let closed_set = Arc::clone(&instance.closed_set);
    let Some(definition) = closed_set.get(&instance.process_id) else {
      let message = format!("process '{}' is not in the closed set", instance.process_id);
      instance.fail(ExecutionError::InvalidState { message });
      return StepOutcome::Finished;
    };

    let Some((token, arrivals)) = next_token(instance, definition) else {
      for task_id in instance.ready_tasks() {
        info!(instance_id = %instance.instance_id, task_id, "join_waiting");
      }
      return StepOutcome::Blocked;
    };

    let task_id = token.task_id.clone();
    self.advance(instance, definition, token, arrivals, budget).await;
    StepOutcome::Advanced { task_id }
  }

  /// Process one token and spawn its successors.
  async fn advance(
    &self,
    instance: &mut WorkflowInstance,
    definition: &ProcessDefinition,
    mut token: TaskInstance,
    arrivals: Vec<String>,
    budget: &mut StepBudget,
  ) {
    let Some(task) = definition.task(&token.task_id) else {
      let message = format!(
        "task '{}' is not in process '{}'",
        token.task_id,
        definition.process_id()
      );
      instance.history.push(token);
      instance.fail(ExecutionError::InvalidState { message });
      return;
    };

    token.state = TaskState::Running;
    if !arrivals.is_empty() {
      instance.record(&task.task_id, None, TraceEvent::Joined { flows: arrivals });
    }

    let result = match &task.kind {
      TaskKind::Start => {
        instance.record(&task.task_id, None, TraceEvent::Completed);
        Ok(definition.graph().outgoing(&task.task_id).to_vec())
      }
      TaskKind::End => {
        instance.record(&task.task_id, None, TraceEvent::Ended);
        instance.terminal.push(token.local_data.clone());
        Ok(Vec::new())
      }
      TaskKind::Atomic { actor, handler_ref } => self
        .run_atomic(instance, task, *actor, handler_ref, &mut token)
        .await
        .map(|()| definition.graph().outgoing(&task.task_id).to_vec()),
      TaskKind::CallActivity {
        actor,
        target_process_id,
      } => self
        .run_call_activity(instance, task, *actor, target_process_id, &mut token, budget)
        .await
        .map(|()| definition.graph().outgoing(&task.task_id).to_vec()),
      TaskKind::Gateway {
        kind,
        outgoing_guards,
      } => self
        .select_branches(&task.task_id, *kind, outgoing_guards, &token.local_data)
        .inspect(|flows| {
          info!(
            instance_id = %instance.instance_id,
            task_id = %task.task_id,
            flows = ?flows,
            "gateway_branched"
          );
          instance.record(&task.task_id, None, TraceEvent::Branched { flows: flows.clone() });
        }),
    };

    match result {
      Ok(flows) => {
        token.state = TaskState::Completed;
        for flow_id in flows {
          if let Some(flow) = definition.flow(&flow_id) {
            instance.spawn(&flow.target, Some(flow_id), token.local_data.clone());
          }
        }
        instance.history.push(token);
        if instance.tokens.is_empty() {
          instance.complete();
        }
      }
      Err(reason) => {
        token.state = TaskState::Failed;
        error!(
          instance_id = %instance.instance_id,
          task_id = %task.task_id,
          actor = ?task.actor(),
          error = %reason,
          "task_failed"
        );
        instance.record(
          &task.task_id,
          task.actor(),
          TraceEvent::Failed {
            reason: reason.to_string(),
          },
        );
        instance.history.push(token);
        instance.fail(reason);
      }
    }
  }

  async fn run_atomic(
    &self,
    instance: &mut WorkflowInstance,
    task: &Task,
    actor: ActorTag,
    handler_ref: &str,
    token: &mut TaskInstance,
  ) -> Result<(), ExecutionError> {
    info!(
      instance_id = %instance.instance_id,
      task_id = %task.task_id,
      actor = %actor,
      "task_started"
    );

    let handler = self.handlers.get(actor).ok_or_else(|| ExecutionError::Handler {
      task_id: task.task_id.clone(),
      actor,
      message: format!("no handler registered for actor '{actor}'"),
    })?;

    let invocation = Invocation {
      process_id: &instance.process_id,
      instance_id: &instance.instance_id,
      task_id: &task.task_id,
      task_name: &task.name,
      handler_ref,
      actor,
    };
    let data = std::mem::take(&mut token.local_data);
    token.local_data = handler
      .handle(&invocation, data)
      .await
      .map_err(|e| ExecutionError::Handler {
        task_id: task.task_id.clone(),
        actor,
        message: e.message,
      })?;

    info!(
      instance_id = %instance.instance_id,
      task_id = %task.task_id,
      actor = %actor,
      "task_completed"
    );
    instance.record(&task.task_id, Some(actor), TraceEvent::Completed);
    Ok(())
  }

  async fn run_call_activity(
    &self,
    instance: &mut WorkflowInstance,
    task: &Task,
    actor: ActorTag,
    target_process_id: &str,
    token: &mut TaskInstance,
    budget: &mut StepBudget,
  ) -> Result<(), ExecutionError> {
    info!(
      instance_id = %instance.instance_id,
      task_id = %task.task_id,
      actor = %actor,
      target_process_id,
      "task_started"
    );

    let closed_set = Arc::clone(&instance.closed_set);
    let Some(target) = closed_set.get(target_process_id) else {
      return Err(ExecutionError::InvalidState {
        message: format!("call target '{target_process_id}' is not in the closed set"),
      });
    };

    token.state = TaskState::WaitingOnSubprocess;
    instance.record(
      &task.task_id,
      Some(actor),
      TraceEvent::SubprocessStarted {
        target_process_id: target_process_id.to_string(),
      },
    );

    let mut child = WorkflowInstance::new(
      Arc::clone(&closed_set),
      target_process_id,
      &target.start_task().task_id,
      token.local_data.clone(),
    );
    info!(
      instance_id = %child.instance_id,
      process_id = %target_process_id,
      parent_instance_id = %instance.instance_id,
      "workflow_started"
    );
    self.drive(&mut child, budget).await;

    instance.absorb_trace(&child.trace);
    let outcome = match child.status {
      InstanceStatus::Completed => {
        if let Some(global) = &child.global_data {
          for (key, value) in global {
            token.local_data.insert(key.clone(), value.clone());
          }
        }
        Ok(())
      }
      _ => Err(ExecutionError::Subprocess {
        task_id: task.task_id.clone(),
        process_id: target_process_id.to_string(),
        source: Box::new(child.failure_reason.clone().unwrap_or_else(|| {
          ExecutionError::InvalidState {
            message: format!("child instance of '{target_process_id}' did not finish"),
          }
        })),
      }),
    };
    instance.children.push(child);

    if outcome.is_ok() {
      info!(
        instance_id = %instance.instance_id,
        task_id = %task.task_id,
        actor = %actor,
        "task_completed"
      );
      instance.record(&task.task_id, Some(actor), TraceEvent::Completed);
    }
    outcome
  }

  /// Choose the flows a gateway activates.
  ///
  /// Every guard is evaluated before any branch is chosen, so a missing
  /// variable fails the gateway even when another branch would match.
  fn select_branches(
    &self,
    task_id: &str,
    kind: GatewayKind,
    guards: &[Guard],
    data: &DataMap,
  ) -> Result<Vec<String>, ExecutionError> {
    if kind == GatewayKind::Parallel {
      return Ok(guards.iter().map(|g| g.flow_id.clone()).collect());
    }

    let mut matched = Vec::new();
    for guard in guards {
      let Some(condition) = &guard.condition else {
        continue;
      };
      let taken = self
        .conditions
        .evaluate(condition, data)
        .map_err(|e| match e {
          ConditionError::MissingVariable { variable } => ExecutionError::Evaluation {
            task_id: task_id.to_string(),
            flow_id: guard.flow_id.clone(),
            variable,
          },
          other => ExecutionError::Condition {
            task_id: task_id.to_string(),
            flow_id: guard.flow_id.clone(),
            message: other.to_string(),
          },
        })?;
      if taken {
        matched.push(guard.flow_id.clone());
      }
    }

    if kind == GatewayKind::Exclusive {
      matched.truncate(1);
    }
    if matched.is_empty()
      && let Some(default) = guards.iter().find(|g| g.condition.is_none())
    {
      matched.push(default.flow_id.clone());
    }
    if matched.is_empty() {
      return Err(ExecutionError::NoApplicableBranch {
        task_id: task_id.to_string(),
      });
    }
    Ok(matched)
  }
}

/// Take the next processable token in FIFO order.
///
/// A token at a join is only taken once the join is satisfied, together with
/// the first token from each other incoming flow. Returns the token and the
/// flows merged into it, or `None` when every token is waiting.
fn next_token(
  instance: &mut WorkflowInstance,
  definition: &ProcessDefinition,
) -> Option<(TaskInstance, Vec<String>)> {
  let graph = definition.graph();
  for index in 0..instance.tokens.len() {
    let task_id = &instance.tokens[index].task_id;
    let joining = definition.task(task_id).filter(|t| {
      graph.is_join_point(&t.task_id) && t.gateway_kind() != Some(GatewayKind::Exclusive)
    });

    let Some(join) = joining else {
      let token = instance.tokens.remove(index)?;
      return Some((token, Vec::new()));
    };

    if let Some(picked) = join_arrivals(instance, definition, join) {
      return Some(merge_arrivals(instance, join, picked));
    }
  }
  None
}

/// Queue positions of the tokens a satisfied join merges, or `None` if the
/// join must keep waiting.
fn join_arrivals(
  instance: &WorkflowInstance,
  definition: &ProcessDefinition,
  join: &Task,
) -> Option<Vec<usize>> {
  let mut picked = Vec::new();
  let mut delivered: Vec<&str> = Vec::new();
  for (index, token) in instance.tokens.iter().enumerate() {
    if token.task_id != join.task_id {
      continue;
    }
    if let Some(via) = token.arrived_via.as_deref()
      && !delivered.contains(&via)
    {
      delivered.push(via);
      picked.push(index);
    }
  }

  let graph = definition.graph();
  let all_delivered = graph
    .incoming(&join.task_id)
    .iter()
    .all(|flow| delivered.contains(&flow.as_str()));

  // An inclusive join also fires once nothing else can still reach it.
  let unreachable = join.gateway_kind() == Some(GatewayKind::Inclusive)
    && !instance
      .tokens
      .iter()
      .filter(|t| t.task_id != join.task_id)
      .any(|t| graph.can_reach(&t.task_id, &join.task_id));

  (all_delivered || (unreachable && !picked.is_empty())).then_some(picked)
}

fn merge_arrivals(
  instance: &mut WorkflowInstance,
  join: &Task,
  picked: Vec<usize>,
) -> (TaskInstance, Vec<String>) {
  let mut arrived: Vec<TaskInstance> = picked
    .iter()
    .rev()
    .filter_map(|&index| instance.tokens.remove(index))
    .collect();
  arrived.reverse();

  let mut local_data = DataMap::new();
  let mut flows = Vec::with_capacity(arrived.len());
  for mut token in arrived {
    for (key, value) in &token.local_data {
      local_data.insert(key.clone(), value.clone());
    }
    flows.extend(token.arrived_via.clone());
    token.state = TaskState::Completed;
    instance.history.push(token);
  }

  let token = TaskInstance {
    token_id: instance.next_token_id(),
    task_id: join.task_id.clone(),
    arrived_via: None,
    local_data,
    state: TaskState::Ready,
  };
  (token, flows)
}
