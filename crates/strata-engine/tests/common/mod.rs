#![allow(dead_code)]

use serde_json::{Value, json};
use strata_config::ProcessDef;
use strata_engine::{DataMap, Engine, EngineConfig, HandlerError, HandlerRegistry, handler_fn};
use strata_process::ActorTag;
use strata_registry::MemoryRegistry;
use strata_resolver::StandardResolver;

pub type TestEngine = Engine<StandardResolver<MemoryRegistry>>;

/// Build an engine over in-memory JSON process definitions.
pub fn create_engine(defs: Vec<Value>, handlers: HandlerRegistry) -> TestEngine {
  let registry = MemoryRegistry::new();
  for value in defs {
    let def: ProcessDef = serde_json::from_value(value).expect("invalid process fixture");
    registry.register(def).expect("malformed process fixture");
  }
  Engine::new(StandardResolver::new(registry), handlers).with_config(EngineConfig {
    max_steps: 200,
  })
}

/// Every actor marks the task it ran: `{"<task name>": true, "last": "<task name>"}`.
pub fn marking_handlers() -> HandlerRegistry {
  let mut registry = HandlerRegistry::new();
  for actor in ActorTag::ALL {
    registry.register(
      actor,
      handler_fn(|name, mut data| {
        data.insert(name.to_string(), json!(true));
        data.insert("last".to_string(), json!(name));
        Ok(data)
      }),
    );
  }
  registry
}

/// Marking handlers, except `actor` always fails.
pub fn failing_handlers(actor: ActorTag, message: &'static str) -> HandlerRegistry {
  let mut registry = marking_handlers();
  registry.register(actor, handler_fn(move |_, _| Err(HandlerError::new(message))));
  registry
}

pub fn data(value: Value) -> DataMap {
  match value {
    Value::Object(map) => map,
    other => panic!("expected an object, got {other}"),
  }
}

/// A process that runs `tasks` in sequence, then calls each of `calls`.
pub fn sequence(process_id: &str, tasks: &[&str], calls: &[&str]) -> Value {
  let mut elements = vec![json!({ "id": "start", "type": "start" })];
  let mut flows = Vec::new();
  let mut previous = "start".to_string();

  let steps = tasks
    .iter()
    .map(|t| (t.to_string(), json!({ "id": t, "type": "task", "actor": "automation-hook" })))
    .chain(calls.iter().map(|c| {
      let id = format!("call_{c}");
      (id.clone(), json!({ "id": id, "type": "call_activity", "called_element": c }))
    }));

  for (i, (id, element)) in steps.enumerate() {
    elements.push(element);
    flows.push(json!({ "id": format!("f{i}"), "from": previous, "to": id }));
    previous = id;
  }
  elements.push(json!({ "id": "end", "type": "end" }));
  flows.push(json!({ "id": "f_end", "from": previous, "to": "end" }));

  json!({
    "process_id": process_id,
    "elements": elements,
    "flows": flows
  })
}

/// Exclusive gateway: `x > 10` leads to "big", the default to "small".
pub fn threshold() -> Value {
  json!({
    "process_id": "threshold",
    "elements": [
      { "id": "start", "type": "start" },
      { "id": "route", "type": "gateway", "gateway": "exclusive" },
      { "id": "big", "type": "task", "actor": "decision-maker" },
      { "id": "small", "type": "task", "actor": "state-store" },
      { "id": "end", "type": "end" }
    ],
    "flows": [
      { "id": "f_start", "from": "start", "to": "route" },
      { "id": "f_big", "from": "route", "to": "big", "condition": "x > 10" },
      { "id": "f_small", "from": "route", "to": "small" },
      { "id": "f_big_end", "from": "big", "to": "end" },
      { "id": "f_small_end", "from": "small", "to": "end" }
    ]
  })
}

/// Parallel fork into a, b and c. Branch c only reaches the join when
/// `x > 0`; otherwise it ends on its own and the join never fires.
pub fn fork_join() -> Value {
  json!({
    "process_id": "fork_join",
    "elements": [
      { "id": "start", "type": "start" },
      { "id": "fork", "type": "gateway", "gateway": "parallel" },
      { "id": "a", "type": "task" },
      { "id": "b", "type": "task", "actor": "knowledge-index" },
      { "id": "c", "type": "task", "actor": "filesystem-deploy" },
      { "id": "check", "type": "gateway", "gateway": "exclusive" },
      { "id": "join", "type": "gateway", "gateway": "parallel", "join": true },
      { "id": "end", "type": "end" },
      { "id": "skip_end", "type": "end" }
    ],
    "flows": [
      { "id": "f_start", "from": "start", "to": "fork" },
      { "id": "f_a", "from": "fork", "to": "a" },
      { "id": "f_b", "from": "fork", "to": "b" },
      { "id": "f_c", "from": "fork", "to": "c" },
      { "id": "f_a_join", "from": "a", "to": "join" },
      { "id": "f_b_join", "from": "b", "to": "join" },
      { "id": "f_c_check", "from": "c", "to": "check" },
      { "id": "f_c_join", "from": "check", "to": "join", "condition": "x > 0" },
      { "id": "f_skip", "from": "check", "to": "skip_end" },
      { "id": "f_end", "from": "join", "to": "end" }
    ]
  })
}

/// Inclusive fork into a (`x > 0`), b then b2 (`x > 1`) and c (`x > 10`),
/// merged again by an inclusive join.
pub fn inclusive_join() -> Value {
  json!({
    "process_id": "inclusive_join",
    "elements": [
      { "id": "start", "type": "start" },
      { "id": "fork", "type": "gateway", "gateway": "inclusive" },
      { "id": "a", "type": "task" },
      { "id": "b", "type": "task" },
      { "id": "b2", "type": "task" },
      { "id": "c", "type": "task" },
      { "id": "join", "type": "gateway", "gateway": "inclusive", "join": true },
      { "id": "end", "type": "end" }
    ],
    "flows": [
      { "id": "f_start", "from": "start", "to": "fork" },
      { "id": "f_a", "from": "fork", "to": "a", "condition": "x > 0" },
      { "id": "f_b", "from": "fork", "to": "b", "condition": "x > 1" },
      { "id": "f_c", "from": "fork", "to": "c", "condition": "x > 10" },
      { "id": "f_b_b2", "from": "b", "to": "b2" },
      { "id": "f_a_join", "from": "a", "to": "join" },
      { "id": "f_b_join", "from": "b2", "to": "join" },
      { "id": "f_c_join", "from": "c", "to": "join" },
      { "id": "f_end", "from": "join", "to": "end" }
    ]
  })
}

/// Parallel fork into a and b, merged by an exclusive gateway marked as a
/// join.
pub fn exclusive_merge() -> Value {
  json!({
    "process_id": "exclusive_merge",
    "elements": [
      { "id": "start", "type": "start" },
      { "id": "fork", "type": "gateway", "gateway": "parallel" },
      { "id": "a", "type": "task" },
      { "id": "b", "type": "task" },
      { "id": "merge", "type": "gateway", "gateway": "exclusive", "join": true },
      { "id": "end", "type": "end" }
    ],
    "flows": [
      { "id": "f_start", "from": "start", "to": "fork" },
      { "id": "f_a", "from": "fork", "to": "a" },
      { "id": "f_b", "from": "fork", "to": "b" },
      { "id": "f_a_merge", "from": "a", "to": "merge" },
      { "id": "f_b_merge", "from": "b", "to": "merge" },
      { "id": "f_end", "from": "merge", "to": "end" }
    ]
  })
}
