use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use strata_condition::ConditionEvaluator;
use strata_config::{ElementType, GatewayKind, ProcessDef};

use crate::actor::ActorTag;
use crate::error::DefinitionError;
use crate::flow::{MessageFlow, SequenceFlow};
use crate::graph::Graph;
use crate::task::{Guard, Task, TaskKind};

/// A validated process, immutable after load.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessDefinition {
  process_id: String,
  name: String,
  executable: bool,
  pools: Vec<String>,
  tasks: Vec<Task>,
  flows: Vec<SequenceFlow>,
  message_flows: Vec<MessageFlow>,
  #[serde(skip)]
  task_index: HashMap<String, usize>,
  #[serde(skip)]
  flow_index: HashMap<String, usize>,
  #[serde(skip)]
  start: usize,
  #[serde(skip)]
  graph: Graph,
}

/// One task together with the flows entering and leaving it.
#[derive(Debug, Clone, Serialize)]
pub struct ElementDetail<'a> {
  pub task: &'a Task,
  pub incoming: Vec<&'a SequenceFlow>,
  pub outgoing: Vec<&'a SequenceFlow>,
}

/// Load and validate a process definition.
pub fn load(def: ProcessDef) -> Result<ProcessDefinition, DefinitionError> {
  ProcessDefinition::load(def)
}

impl ProcessDefinition {
  /// Validate a source definition and build its indexes.
  pub fn load(def: ProcessDef) -> Result<Self, DefinitionError> {
    let process_id = def.process_id;

    let mut task_index = HashMap::new();
    let mut tasks = Vec::with_capacity(def.elements.len());
    for element in def.elements {
      if task_index.contains_key(&element.id) {
        return Err(DefinitionError::DuplicateTaskId {
          process_id,
          task_id: element.id,
        });
      }
      let kind = match element.element_type {
        ElementType::Start => TaskKind::Start,
        ElementType::End => TaskKind::End,
        ElementType::Task { actor, handler } => TaskKind::Atomic {
          actor: parse_actor(&process_id, &element.id, actor, ActorTag::AutomationHook)?,
          handler_ref: handler.unwrap_or_else(|| element.id.clone()),
        },
        ElementType::CallActivity {
          actor,
          called_element,
        } => TaskKind::CallActivity {
          actor: parse_actor(&process_id, &element.id, actor, ActorTag::NestedProcess)?,
          target_process_id: called_element,
        },
        ElementType::Gateway { gateway } => TaskKind::Gateway {
          kind: gateway,
          outgoing_guards: Vec::new(),
        },
      };
      task_index.insert(element.id.clone(), tasks.len());
      tasks.push(Task {
        name: element.name.unwrap_or_else(|| element.id.clone()),
        task_id: element.id,
        kind,
        join: element.join,
      });
    }

    let conditions = ConditionEvaluator::new();
    let mut flow_index = HashMap::new();
    let mut flows = Vec::with_capacity(def.flows.len());
    for flow in def.flows {
      if flow_index.contains_key(&flow.id) {
        return Err(DefinitionError::DuplicateFlowId {
          process_id,
          flow_id: flow.id,
        });
      }
      for endpoint in [&flow.from, &flow.to] {
        if !task_index.contains_key(endpoint) {
          return Err(DefinitionError::UnknownFlowEndpoint {
            process_id,
            flow_id: flow.id,
            task_id: endpoint.clone(),
          });
        }
      }

      let guard = flow
        .condition
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
      let source_kind = tasks[task_index[&flow.from]].gateway_kind();
      let guard = match (guard, source_kind) {
        (None, _) => None,
        // Parallel gateways never evaluate their flows.
        (Some(_), Some(GatewayKind::Parallel)) => None,
        (Some(expression), Some(_)) => {
          if let Err(source) = conditions.validate(&expression) {
            return Err(DefinitionError::InvalidGuard {
              process_id,
              flow_id: flow.id,
              source,
            });
          }
          Some(expression)
        }
        (Some(_), None) => {
          return Err(DefinitionError::GuardOutsideGateway {
            process_id,
            flow_id: flow.id,
            task_id: flow.from,
          });
        }
      };

      flow_index.insert(flow.id.clone(), flows.len());
      flows.push(SequenceFlow {
        flow_id: flow.id,
        source: flow.from,
        target: flow.to,
        guard,
      });
    }

    let starts: Vec<usize> = tasks
      .iter()
      .enumerate()
      .filter(|(_, t)| matches!(t.kind, TaskKind::Start))
      .map(|(i, _)| i)
      .collect();
    if starts.len() != 1 {
      return Err(DefinitionError::StartEventCount {
        process_id,
        count: starts.len(),
      });
    }
    if !tasks.iter().any(Task::is_end) {
      return Err(DefinitionError::MissingEndEvent { process_id });
    }

    let graph = Graph::new(&tasks, &flows);

    for task in &mut tasks {
      let outgoing = graph.outgoing(&task.task_id);
      let incoming = graph.incoming(&task.task_id);

      match &mut task.kind {
        TaskKind::End => {
          if !outgoing.is_empty() {
            return Err(DefinitionError::InvalidOutgoing {
              process_id,
              task_id: task.task_id.clone(),
              expected: "no",
              found: outgoing.len(),
            });
          }
        }
        TaskKind::Start | TaskKind::Atomic { .. } | TaskKind::CallActivity { .. } => {
          if outgoing.len() != 1 {
            return Err(DefinitionError::InvalidOutgoing {
              process_id,
              task_id: task.task_id.clone(),
              expected: "exactly one",
              found: outgoing.len(),
            });
          }
        }
        TaskKind::Gateway {
          kind,
          outgoing_guards,
        } => {
          if outgoing.is_empty() {
            return Err(DefinitionError::GatewayWithoutOutgoing {
              process_id,
              task_id: task.task_id.clone(),
            });
          }
          *outgoing_guards = outgoing
            .iter()
            .map(|flow_id| Guard {
              flow_id: flow_id.clone(),
              condition: flows[flow_index[flow_id]].guard.clone(),
            })
            .collect();
          let defaults = outgoing_guards
            .iter()
            .filter(|g| g.condition.is_none())
            .count();
          if *kind != GatewayKind::Parallel && defaults > 1 {
            return Err(DefinitionError::MultipleDefaultFlows {
              process_id,
              task_id: task.task_id.clone(),
            });
          }
        }
      }

      if task.join && incoming.len() < 2 {
        return Err(DefinitionError::InvalidJoin {
          process_id,
          task_id: task.task_id.clone(),
          incoming: incoming.len(),
        });
      }
    }

    let message_flows = def
      .message_flows
      .into_iter()
      .map(|m| MessageFlow {
        flow_id: m.id,
        source_pool: m.from,
        target_pool: m.to,
        label: m.label,
      })
      .collect();

    Ok(Self {
      name: def.name.unwrap_or_else(|| process_id.clone()),
      process_id,
      executable: def.executable,
      pools: def.pools,
      tasks,
      flows,
      message_flows,
      task_index,
      flow_index,
      start: starts[0],
      graph,
    })
  }

  pub fn process_id(&self) -> &str {
    &self.process_id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Whether the definition may be the root of a workflow instance.
  pub fn is_executable(&self) -> bool {
    self.executable
  }

  /// Tasks in document order.
  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn task(&self, task_id: &str) -> Option<&Task> {
    self.task_index.get(task_id).map(|&i| &self.tasks[i])
  }

  pub fn flows(&self) -> &[SequenceFlow] {
    &self.flows
  }

  pub fn flow(&self, flow_id: &str) -> Option<&SequenceFlow> {
    self.flow_index.get(flow_id).map(|&i| &self.flows[i])
  }

  pub fn message_flows(&self) -> &[MessageFlow] {
    &self.message_flows
  }

  pub fn pools(&self) -> &[String] {
    &self.pools
  }

  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  /// The single start event.
  pub fn start_task(&self) -> &Task {
    &self.tasks[self.start]
  }

  /// Call activity targets in document order, without repeats.
  pub fn call_targets(&self) -> Vec<&str> {
    let mut seen = HashSet::new();
    self
      .tasks
      .iter()
      .filter_map(|t| match &t.kind {
        TaskKind::CallActivity {
          target_process_id, ..
        } => Some(target_process_id.as_str()),
        _ => None,
      })
      .filter(|id| seen.insert(*id))
      .collect()
  }

  /// A task with its incoming and outgoing flows.
  pub fn element(&self, task_id: &str) -> Option<ElementDetail<'_>> {
    let task = self.task(task_id)?;
    let lookup = |ids: &[String]| -> Vec<&SequenceFlow> {
      ids.iter().filter_map(|id| self.flow(id)).collect()
    };
    Some(ElementDetail {
      task,
      incoming: lookup(self.graph.incoming(task_id)),
      outgoing: lookup(self.graph.outgoing(task_id)),
    })
  }

  /// Every actor that owns at least one task.
  pub fn actors(&self) -> BTreeSet<ActorTag> {
    self.tasks.iter().filter_map(Task::actor).collect()
  }

  /// Pools ranked by message flow direction.
  ///
  /// A pool that sends a message comes before the pool receiving it. Ties and
  /// cycles fall back to declaration order.
  pub fn pool_order(&self) -> Vec<&str> {
    let mut pools: Vec<&str> = self.pools.iter().map(String::as_str).collect();
    for m in &self.message_flows {
      for pool in [m.source_pool.as_str(), m.target_pool.as_str()] {
        if !pools.contains(&pool) {
          pools.push(pool);
        }
      }
    }

    let mut in_degree: HashMap<&str, usize> = pools.iter().map(|p| (*p, 0)).collect();
    let mut edges: HashSet<(&str, &str)> = HashSet::new();
    for m in &self.message_flows {
      let edge = (m.source_pool.as_str(), m.target_pool.as_str());
      if edge.0 != edge.1 && edges.insert(edge) {
        *in_degree.entry(edge.1).or_default() += 1;
      }
    }

    let mut ordered = Vec::with_capacity(pools.len());
    let mut remaining = pools;
    while !remaining.is_empty() {
      let next = remaining
        .iter()
        .position(|p| in_degree.get(p).copied().unwrap_or(0) == 0)
        .unwrap_or(0);
      let pool = remaining.remove(next);
      for (from, to) in &edges {
        if *from == pool
          && let Some(degree) = in_degree.get_mut(to)
        {
          *degree = degree.saturating_sub(1);
        }
      }
      ordered.push(pool);
    }
    ordered
  }

  /// Tasks ordered for display.
  ///
  /// Sorted by distance from the start event, then by the rank of the pool
  /// matching the task's actor, then by document order. Unreachable tasks
  /// come last.
  pub fn display_order(&self) -> Vec<&Task> {
    let distances = self.graph.distances_from(&self.start_task().task_id);
    let pool_rank: HashMap<ActorTag, usize> = self
      .pool_order()
      .into_iter()
      .enumerate()
      .filter_map(|(rank, pool)| ActorTag::from_label(pool).map(|tag| (tag, rank)))
      .rev()
      .collect();

    let mut ordered: Vec<(usize, &Task)> = self.tasks.iter().enumerate().collect();
    ordered.sort_by_key(|(index, task)| {
      (
        distances.get(&task.task_id).copied().unwrap_or(usize::MAX),
        task
          .actor()
          .and_then(|a| pool_rank.get(&a).copied())
          .unwrap_or(usize::MAX),
        *index,
      )
    });
    ordered.into_iter().map(|(_, task)| task).collect()
  }
}

fn parse_actor(
  process_id: &str,
  task_id: &str,
  actor: Option<String>,
  default: ActorTag,
) -> Result<ActorTag, DefinitionError> {
  match actor {
    None => Ok(default),
    Some(label) => ActorTag::from_label(&label).ok_or_else(|| DefinitionError::UnknownActor {
      process_id: process_id.to_string(),
      task_id: task_id.to_string(),
      actor: label,
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn def(value: serde_json::Value) -> ProcessDef {
    serde_json::from_value(value).unwrap()
  }

  fn triage() -> ProcessDef {
    def(json!({
      "process_id": "triage",
      "name": "Triage",
      "pools": ["decision-maker", "state-store"],
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "record", "type": "task", "actor": "state-store" },
        { "id": "review", "type": "task", "actor": "Decision Maker", "handler": "review_ticket" },
        { "id": "route", "type": "gateway", "gateway": "exclusive" },
        { "id": "escalate", "type": "call_activity", "called_element": "escalation" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "record" },
        { "id": "f2", "from": "record", "to": "review" },
        { "id": "f3", "from": "review", "to": "route" },
        { "id": "f4", "from": "route", "to": "escalate", "condition": "severity > 3" },
        { "id": "f5", "from": "route", "to": "end" },
        { "id": "f6", "from": "escalate", "to": "end" }
      ],
      "message_flows": [
        { "id": "m1", "from": "decision-maker", "to": "state-store" }
      ]
    }))
  }

  #[test]
  fn test_load_valid_process() {
    let process = load(triage()).unwrap();
    assert_eq!(process.process_id(), "triage");
    assert_eq!(process.name(), "Triage");
    assert!(process.is_executable());
    assert_eq!(process.start_task().task_id, "start");

    let review = process.task("review").unwrap();
    assert_eq!(
      review.kind,
      TaskKind::Atomic {
        actor: ActorTag::DecisionMaker,
        handler_ref: "review_ticket".to_string()
      }
    );
    assert_eq!(review.name, "review");

    let route = process.task("route").unwrap();
    let TaskKind::Gateway {
      outgoing_guards, ..
    } = &route.kind
    else {
      panic!("expected gateway");
    };
    assert_eq!(
      outgoing_guards,
      &vec![
        Guard {
          flow_id: "f4".to_string(),
          condition: Some("severity > 3".to_string())
        },
        Guard {
          flow_id: "f5".to_string(),
          condition: None
        },
      ]
    );
  }

  #[test]
  fn test_defaults_for_actor_and_handler() {
    let process = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "work", "type": "task" },
        { "id": "sub", "type": "call_activity", "called_element": "child" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "work" },
        { "id": "f2", "from": "work", "to": "sub" },
        { "id": "f3", "from": "sub", "to": "end" }
      ]
    })))
    .unwrap();

    assert_eq!(process.name(), "p");
    assert_eq!(
      process.task("work").unwrap().kind,
      TaskKind::Atomic {
        actor: ActorTag::AutomationHook,
        handler_ref: "work".to_string()
      }
    );
    assert_eq!(process.task("sub").unwrap().actor(), Some(ActorTag::NestedProcess));
  }

  #[test]
  fn test_unknown_flow_endpoint() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "nowhere" }
      ]
    })))
    .unwrap_err();

    assert_eq!(
      err,
      DefinitionError::UnknownFlowEndpoint {
        process_id: "p".to_string(),
        flow_id: "f1".to_string(),
        task_id: "nowhere".to_string()
      }
    );
  }

  #[test]
  fn test_gateway_without_outgoing() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "gw", "type": "gateway", "gateway": "exclusive" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "gw" }
      ]
    })))
    .unwrap_err();

    assert!(matches!(err, DefinitionError::GatewayWithoutOutgoing { task_id, .. } if task_id == "gw"));
  }

  #[test]
  fn test_start_event_count() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "s1", "type": "start" },
        { "id": "s2", "type": "start" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "s1", "to": "end" },
        { "id": "f2", "from": "s2", "to": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::StartEventCount { count: 2, .. }));

    let err = load(def(json!({
      "process_id": "p",
      "elements": [{ "id": "end", "type": "end" }]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::StartEventCount { count: 0, .. }));
  }

  #[test]
  fn test_missing_end_event() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "work", "type": "task" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "work" },
        { "id": "f2", "from": "work", "to": "start" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::MissingEndEvent { .. }));
  }

  #[test]
  fn test_duplicate_ids() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "start", "type": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateTaskId { .. }));

    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "end" },
        { "id": "f1", "from": "start", "to": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateFlowId { .. }));
  }

  #[test]
  fn test_task_needs_single_outgoing_flow() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "work", "type": "task" },
        { "id": "a", "type": "end" },
        { "id": "b", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "work" },
        { "id": "f2", "from": "work", "to": "a" },
        { "id": "f3", "from": "work", "to": "b" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(
      err,
      DefinitionError::InvalidOutgoing { ref task_id, found: 2, .. } if task_id == "work"
    ));
  }

  #[test]
  fn test_guard_rules() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "end", "condition": "x > 1" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::GuardOutsideGateway { .. }));

    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "gw", "type": "gateway", "gateway": "exclusive" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "gw" },
        { "id": "f2", "from": "gw", "to": "end", "condition": "x >" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidGuard { ref flow_id, .. } if flow_id == "f2"));

    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "gw", "type": "gateway", "gateway": "inclusive" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "gw" },
        { "id": "f2", "from": "gw", "to": "end" },
        { "id": "f3", "from": "gw", "to": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::MultipleDefaultFlows { .. }));
  }

  #[test]
  fn test_parallel_gateway_ignores_guards() {
    let process = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "fork", "type": "gateway", "gateway": "parallel" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "fork" },
        { "id": "f2", "from": "fork", "to": "end", "condition": "x > 1" },
        { "id": "f3", "from": "fork", "to": "end" }
      ]
    })))
    .unwrap();
    assert_eq!(process.flow("f2").unwrap().guard, None);
  }

  #[test]
  fn test_join_needs_two_incoming() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "merge", "type": "gateway", "gateway": "parallel", "join": true },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "merge" },
        { "id": "f2", "from": "merge", "to": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidJoin { incoming: 1, .. }));
  }

  #[test]
  fn test_unknown_actor() {
    let err = load(def(json!({
      "process_id": "p",
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "work", "type": "task", "actor": "accountant" },
        { "id": "end", "type": "end" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "work" },
        { "id": "f2", "from": "work", "to": "end" }
      ]
    })))
    .unwrap_err();
    assert!(matches!(err, DefinitionError::UnknownActor { ref actor, .. } if actor == "accountant"));
  }

  #[test]
  fn test_queries() {
    let process = load(triage()).unwrap();

    assert_eq!(process.call_targets(), vec!["escalation"]);
    assert_eq!(
      process.actors().into_iter().collect::<Vec<_>>(),
      vec![ActorTag::DecisionMaker, ActorTag::StateStore, ActorTag::NestedProcess]
    );

    let detail = process.element("end").unwrap();
    let incoming: Vec<&str> = detail.incoming.iter().map(|f| f.flow_id.as_str()).collect();
    assert_eq!(incoming, vec!["f5", "f6"]);
    assert!(detail.outgoing.is_empty());
    assert!(process.element("missing").is_none());
  }

  #[test]
  fn test_pool_order_follows_message_flows() {
    let mut source = triage();
    source.pools = vec!["state-store".to_string(), "decision-maker".to_string()];
    let process = load(source).unwrap();
    assert_eq!(process.pool_order(), vec!["decision-maker", "state-store"]);
  }

  #[test]
  fn test_display_order() {
    let process = load(def(json!({
      "process_id": "p",
      "pools": ["state-store", "decision-maker"],
      "elements": [
        { "id": "end", "type": "end" },
        { "id": "store", "type": "task", "actor": "state-store" },
        { "id": "decide", "type": "task", "actor": "decision-maker" },
        { "id": "fork", "type": "gateway", "gateway": "parallel" },
        { "id": "merge", "type": "gateway", "gateway": "parallel", "join": true },
        { "id": "start", "type": "start" }
      ],
      "flows": [
        { "id": "f1", "from": "start", "to": "fork" },
        { "id": "f2", "from": "fork", "to": "store" },
        { "id": "f3", "from": "fork", "to": "decide" },
        { "id": "f4", "from": "store", "to": "merge" },
        { "id": "f5", "from": "decide", "to": "merge" },
        { "id": "f6", "from": "merge", "to": "end" }
      ],
      "message_flows": [
        { "id": "m1", "from": "decision-maker", "to": "state-store", "label": "persist decision" }
      ]
    })))
    .unwrap();

    let order: Vec<&str> = process
      .display_order()
      .into_iter()
      .map(|t| t.task_id.as_str())
      .collect();
    assert_eq!(order, vec!["start", "fork", "decide", "store", "merge", "end"]);
  }

  #[test]
  fn test_serializes_overview() {
    let process = load(triage()).unwrap();
    let value = serde_json::to_value(&process).unwrap();
    assert_eq!(value["process_id"], "triage");
    assert_eq!(value["tasks"][2]["type"], "atomic");
    assert_eq!(value["tasks"][2]["actor"], "decision-maker");
    assert!(value.get("graph").is_none());
  }
}
